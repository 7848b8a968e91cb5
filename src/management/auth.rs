use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::state::{StateError, load_document, persist_document};
use crate::types::SpotifyAuth;

/// Spotify credentials backed by a JSON document that is rewritten on every change.
pub struct TokenStore {
    path: PathBuf,
    auth: Mutex<SpotifyAuth>,
}

impl TokenStore {
    pub fn new(path: PathBuf, auth: SpotifyAuth) -> Self {
        TokenStore {
            path,
            auth: Mutex::new(auth),
        }
    }

    /// Loads the store from `path`; a missing file means logged out.
    pub async fn load(path: &Path) -> Result<Self, StateError> {
        let auth = load_document(path).await?;
        Ok(Self::new(path.to_path_buf(), auth))
    }

    pub async fn snapshot(&self) -> SpotifyAuth {
        self.auth.lock().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.auth.lock().await.access_token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.lock().await.access_token.is_some()
    }

    /// Stores the result of an authorization code grant.
    pub async fn set_tokens(
        &self,
        access_token: String,
        refresh_token: String,
        refreshed_at: f64,
    ) -> Result<(), StateError> {
        let mut auth = self.auth.lock().await;
        auth.access_token = Some(access_token);
        auth.refresh_token = Some(refresh_token);
        auth.refreshed_at = Some(refreshed_at);
        persist_document(&self.path, &*auth).await
    }

    /// Stores the result of a refresh grant. The refresh token is only
    /// replaced when the provider rotated it.
    pub async fn update_access_token(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        refreshed_at: f64,
    ) -> Result<(), StateError> {
        let mut auth = self.auth.lock().await;
        auth.access_token = Some(access_token);
        if let Some(refresh_token) = refresh_token {
            auth.refresh_token = Some(refresh_token);
        }
        auth.refreshed_at = Some(refreshed_at);
        persist_document(&self.path, &*auth).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
