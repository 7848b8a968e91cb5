use std::sync::Arc;

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use super::{SpotifyError, ensure_success};
use crate::{config::Config, info, management::TokenStore, types::TokenResponse, utils};

/// A refresh started this soon after the previous grant is skipped.
pub const REFRESH_DEBOUNCE_SECS: f64 = 10.0;

pub const SCOPES: [&str; 4] = [
    "user-read-recently-played",
    "user-read-playback-position",
    "user-read-playback-state",
    "user-read-currently-playing",
];

/// Builds the URL the owner opens to grant access to their player state.
pub fn authorize_url(config: &Config) -> Result<String, SpotifyError> {
    let scope = SCOPES.join(" ");
    let url = Url::parse_with_params(
        &format!("{}/authorize", config.spotify_accounts_url),
        &[
            ("response_type", "code"),
            ("client_id", config.spotify_client_id.as_str()),
            ("scope", scope.as_str()),
            ("redirect_uri", config.spotify_redirect_uri.as_str()),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
    Ok(url.to_string())
}

/// Pulls the authorization code out of the redirect URL pasted by the owner.
pub fn extract_code(redirect_url: &str) -> Result<String, SpotifyError> {
    let url = Url::parse(redirect_url.trim()).map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, code)| code.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or(SpotifyError::MissingCode)
}

/// Performs token grants against the accounts service.
///
/// Refreshes are single-flight: the lock is held for the whole grant, and a
/// caller that waited on it finds the token already renewed and returns
/// without another request.
pub struct TokenRefresher {
    http: Client,
    accounts_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    tokens: Arc<TokenStore>,
    refresh_lock: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(config: &Config, http: Client, tokens: Arc<TokenStore>) -> Self {
        TokenRefresher {
            http,
            accounts_url: config.spotify_accounts_url.clone(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            tokens,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Makes sure the next request goes out with a usable access token.
    ///
    /// # Errors
    ///
    /// A non-2xx answer from the token endpoint is returned as
    /// [`SpotifyError::Status`]; the stored tokens are left untouched.
    pub async fn ensure_fresh_token(&self) -> Result<(), SpotifyError> {
        let _guard = self.refresh_lock.lock().await;

        let auth = self.tokens.snapshot().await;
        if let Some(refreshed_at) = auth.refreshed_at {
            if utils::unix_now() - refreshed_at < REFRESH_DEBOUNCE_SECS {
                return Ok(());
            }
        }
        let refresh_token = auth.refresh_token.ok_or(SpotifyError::NotAuthenticated)?;

        let response = self
            .http
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;

        self.tokens
            .update_access_token(token.access_token, token.refresh_token, utils::unix_now())
            .await?;
        info!("Spotify access token refreshed");
        Ok(())
    }

    /// Exchanges an authorization code for the first pair of tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<(), SpotifyError> {
        let response = self
            .http
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;
        let refresh_token = token.refresh_token.ok_or(SpotifyError::NotAuthenticated)?;

        self.tokens
            .set_tokens(token.access_token, refresh_token, utils::unix_now())
            .await?;
        Ok(())
    }

    /// Handles the redirect URL pasted by the owner: parse the code, exchange it.
    pub async fn process_redirect(&self, redirect_url: &str) -> Result<(), SpotifyError> {
        let code = extract_code(redirect_url)?;
        self.exchange_code(&code).await
    }

    fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }
}
