//! # Spotify Integration Module
//!
//! The streaming side of the bot: OAuth authorization-code login, lazy token
//! refresh and the two player endpoints the inline answers are built from.
//!
//! ```text
//! Bot handlers / CLI
//!          ↓
//! SpotifyClient::get_tracks   (currently playing + recently played)
//!          ↓
//! SpotifyClient::get          (bearer auth, one refresh-and-retry on 401)
//!          ↓
//! TokenRefresher              (single-flight, debounced refresh grant)
//!          ↓
//! TokenStore                  (spotify.json in the data directory)
//! ```
//!
//! ## Error Types
//!
//! Everything returns [`SpotifyError`]. A non-2xx answer from the token
//! endpoint or a second 401 is propagated to the caller untouched, there is
//! no retry beyond the single refresh cycle.

use std::fmt;

use reqwest::{Response, StatusCode};

use crate::management::StateError;

pub mod auth;
pub mod client;
pub mod tracks;

pub use auth::{TokenRefresher, authorize_url, extract_code};
pub use client::SpotifyClient;

#[derive(Debug)]
pub enum SpotifyError {
    NotAuthenticated,
    MissingCode,
    InvalidUrl(String),
    Http(reqwest::Error),
    Status { status: StatusCode, body: String },
    State(StateError),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::NotAuthenticated => write!(f, "not logged in to Spotify"),
            SpotifyError::MissingCode => write!(f, "redirect URL does not contain a code"),
            SpotifyError::InvalidUrl(e) => write!(f, "invalid URL: {e}"),
            SpotifyError::Http(e) => write!(f, "Spotify request failed: {e}"),
            SpotifyError::Status { status, body } => write!(f, "Spotify answered {status}: {body}"),
            SpotifyError::State(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

impl From<StateError> for SpotifyError {
    fn from(err: StateError) -> Self {
        SpotifyError::State(err)
    }
}

impl SpotifyError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SpotifyError::Status { status, .. } => Some(*status),
            SpotifyError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Passes 2xx responses through and turns everything else into [`SpotifyError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Status { status, body })
}
