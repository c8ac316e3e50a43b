mod auth;
mod session;

pub use auth::SessionToken;
pub use auth::SessionTokenManager;
pub use session::DEFAULT_IDLE_TTL;
pub use session::MemorySessionStore;
pub use session::Session;
pub use session::SessionStore;
pub use session::TOKEN_KEY;
