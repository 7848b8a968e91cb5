//! # CLI Module
//!
//! Command-line helpers around the bot's Spotify side. The bot itself logs
//! in through its private chat; these commands do the same from a terminal
//! and let the owner check what an inline query would show.
//!
//! - [`auth_url`] - Prints (and tries to open) the Spotify authorization URL
//! - [`login`] - Exchanges a pasted redirect URL for tokens
//! - [`tracks`] - Lists the tracks an inline query would currently offer

use std::sync::Arc;

use crate::{
    Res,
    config::Config,
    management::TokenStore,
    spotify::{SpotifyClient, TokenRefresher},
};

mod auth;
mod tracks;

pub use auth::auth_url;
pub use auth::login;
pub use tracks::tracks;

async fn spotify_client(config: &Config) -> Res<SpotifyClient> {
    config.ensure_data_dir().await?;
    let http = config.http_client()?;
    let tokens = Arc::new(TokenStore::load(&config.token_path()).await?);
    let refresher = Arc::new(TokenRefresher::new(config, http.clone(), Arc::clone(&tokens)));
    Ok(SpotifyClient::new(config, http, tokens, refresher))
}
