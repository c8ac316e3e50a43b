//! # API Module
//!
//! HTTP handlers of the web front end. Each handler is a thin composition of
//! the services held in [`crate::server::AppState`].
//!
//! ## Endpoints
//!
//! ### Link lookup
//!
//! - [`index`] - `GET /` landing page with the link form
//! - [`resolve`] - `POST /resolve` resolves a pasted link and renders the record
//!
//! ### Catalog JSON
//!
//! - [`search`] - `GET /api/search?q=` one hit per entity type
//! - [`list_tracks`] - `GET /api/tracks/list?id=&album=` full track listing
//! - [`track_details`] - `GET /api/tracks/{track_id}` single track
//!
//! ### Authentication
//!
//! - [`login`] - `GET /login` redirects to Spotify's consent page
//! - [`callback`] - `GET /callback` completes the code exchange
//! - [`logout`] - `GET /logout` clears the session
//!
//! ### Now playing
//!
//! - [`now_playing`] - `GET /now-playing` current track, lyrics and interpretation
//! - [`analyze_lyrics`] - `POST /analyze-lyrics` interpretation on demand
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health` status and version
//!
//! ## Sessions
//!
//! Handlers that need the user's token take a [`crate::management::Session`]
//! extractor, backed by the `sid` cookie (see [`session`]).

mod analyze;
mod callback;
mod catalog;
mod health;
mod index;
mod login;
mod now_playing;
mod resolve;
pub mod session;

pub use analyze::analyze_lyrics;
pub use callback::callback;
pub use catalog::list_tracks;
pub use catalog::search;
pub use catalog::track_details;
pub use health::health;
pub use index::index;
pub use login::login;
pub use login::login_location;
pub use login::logout;
pub use now_playing::NOTHING_PLAYING;
pub use now_playing::now_playing;
pub use resolve::INVALID_LINK;
pub use resolve::resolve;
