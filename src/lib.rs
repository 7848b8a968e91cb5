//! Spotify Inline Bot Library
//!
//! This library implements a personal Telegram inline bot that lists the owner's
//! currently playing and recently played Spotify tracks and, once a result is
//! picked, replaces the placeholder message with the real audio.
//!
//! # Modules
//!
//! - `bot` - Event handlers: login flow, inline queries and result fulfillment
//! - `cli` - Command-line helpers for logging in and inspecting tracks
//! - `config` - Configuration management and environment variables
//! - `management` - Persistent token store, file reference cache and track index
//! - `media` - song.link resolution, download and transcoding
//! - `platform` - The messaging platform boundary the bot talks to
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod bot;
pub mod cli;
pub mod config;
pub mod management;
pub mod media;
pub mod platform;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary glue where several module errors meet. Library modules
/// return their own error enums.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Bot started");
/// info!("Answered inline query with {} results", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures such as missing configuration. Failures
/// while serving events are reported with [`warning!`] instead so the process
/// keeps running.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: a fulfillment that could not be delivered,
/// an inline query that had to be answered with an error, and so on.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
