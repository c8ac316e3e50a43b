//! Spotify Link & Lyrics Web Front End Library
//!
//! This library provides the building blocks of a small web front end around the
//! Spotify Web API. Pasted links (tracks, albums, playlists, shortened links and
//! links from other streaming services) are resolved to catalog entities, and a
//! signed-in user can look at the currently playing track together with its
//! lyrics and a generated interpretation of them.
//!
//! # Modules
//!
//! - `api` - HTTP handlers composing the services below
//! - `config` - Configuration management and environment variables
//! - `enrichment` - Lyrics lookup and commentary generation
//! - `error` - Error taxonomy shared by all services
//! - `management` - Session storage and token lifecycle management
//! - `resolver` - Link normalization into (entity type, id) pairs
//! - `server` - Router construction and HTTP server startup
//! - `spotify` - Spotify Web API clients (catalog and user authorization)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `views` - HTML rendering of the pages

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod management;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod views;

/// Prints an informational message with a blue bullet point.
///
/// Used for console status lines of the binary, such as the startup banner.
/// Request-level logging goes through `tracing` instead.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal startup errors (missing configuration, unusable
/// listen address). Never call it from a request handler.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
