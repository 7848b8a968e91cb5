use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{SpotifyError, TokenRefresher, ensure_success};
use crate::{config::Config, management::TokenStore};

/// Bearer-authenticated access to the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Arc<TokenStore>,
    refresher: Arc<TokenRefresher>,
}

impl SpotifyClient {
    pub fn new(
        config: &Config,
        http: Client,
        tokens: Arc<TokenStore>,
        refresher: Arc<TokenRefresher>,
    ) -> Self {
        SpotifyClient {
            http,
            api_url: config.spotify_api_url.clone(),
            tokens,
            refresher,
        }
    }

    /// GETs `path` below the API base URL.
    ///
    /// Returns `Ok(None)` for `204 No Content`. A `401` triggers one token
    /// refresh and one retry; a second `401` is returned as an error.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, SpotifyError> {
        let url = format!("{}{}", self.api_url, path);
        let mut refresh_on_401 = true;

        loop {
            let token = self
                .tokens
                .access_token()
                .await
                .ok_or(SpotifyError::NotAuthenticated)?;
            let response = self.http.get(&url).bearer_auth(token).send().await?;

            if response.status() == StatusCode::UNAUTHORIZED && refresh_on_401 {
                self.refresher.ensure_fresh_token().await?;
                refresh_on_401 = false;
                continue; // retry once
            }

            let response = ensure_success(response).await?;
            if response.status() == StatusCode::NO_CONTENT {
                return Ok(None);
            }
            return Ok(Some(response.json::<T>().await?));
        }
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }
}
