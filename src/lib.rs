//! Facebook Graph CLI Library
//!
//! This library implements a command-line client for the Facebook Graph API.
//! It covers the OAuth2 authorization-code login flow (completed through a
//! short-lived local HTTP listener), paginated traversal of Graph connection
//! endpoints, and text/HTML rendering of the items they return.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the local OAuth callback endpoint
//! - `cli` - Command-line interface implementations
//! - `config` - Persisted application credentials and access token
//! - `error` - Error taxonomy shared across the crate
//! - `format` - Text/HTML renderers for Graph items
//! - `graph` - Graph API client, auth flow, and pagination engine
//! - `server` - Single-use local HTTP server for the OAuth redirect
//! - `types` - Data structures and wire types

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod server;
pub mod types;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
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
/// The message is a single diagnostic line and the process terminates with
/// exit code 1, so this must only be used for fatal conditions: a failed
/// remote call, a missing access token, an unusable configuration.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, e.g. a callback that arrived without an authorization code.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
