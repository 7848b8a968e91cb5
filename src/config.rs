//! Configuration management for the Spotify inline bot.
//!
//! Configuration is read once at startup from environment variables and an
//! optional `.env` file, then passed around as an explicit [`Config`] value.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then one in the working directory
//! 3. Application defaults (where applicable)

use std::{
    env, fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SONGLINK_API_URL: &str = "https://api.song.link/v1-alpha.1";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has an invalid value: {value:?}"),
            ConfigError::Io(e) => write!(f, "cannot prepare configuration directory: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at `<data_local_dir>/spotinline/.env`:
/// - Linux: `~/.local/share/spotinline/.env`
/// - macOS: `~/Library/Application Support/spotinline/.env`
/// - Windows: `%LOCALAPPDATA%/spotinline/.env`
///
/// A missing file is fine, the process environment alone may carry
/// everything. Variables already present in the environment are not
/// overwritten.
pub async fn load_env() -> Result<(), ConfigError> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotinline/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    load_env_file(&path)?;
    // a .env in the working directory is picked up as well
    tolerate_missing(dotenv::dotenv().map(|_| ()))
}

/// Loads one `.env` file. A missing file is skipped, a malformed one is an error.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    tolerate_missing(dotenv::from_path(path))
}

fn tolerate_missing(loaded: Result<(), dotenv::Error>) -> Result<(), ConfigError> {
    match loaded {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Invalid {
            key: ".env",
            value: e.to_string(),
        }),
    }
}

/// Everything the bot needs from the outside world, loaded once.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_id: i32,
    pub api_hash: String,
    pub bot_token: String,
    pub owner_id: i64,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub data_dir: PathBuf,
    pub proxy_url: Option<String>,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    pub songlink_api_url: String,
    pub ytdlp_bin: String,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for any unset required variable and
    /// [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_id: parsed("TELEGRAM_API_ID")?,
            api_hash: required("TELEGRAM_API_HASH")?,
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            owner_id: parsed("OWNER_ID")?,
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            data_dir: PathBuf::from(optional("DATA_DIR").unwrap_or_else(|| "data".to_string())),
            proxy_url: optional("PROXY_URL"),
            spotify_api_url: or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            spotify_accounts_url: or_default("SPOTIFY_ACCOUNTS_URL", DEFAULT_SPOTIFY_ACCOUNTS_URL),
            songlink_api_url: or_default("SONGLINK_API_URL", DEFAULT_SONGLINK_API_URL),
            ytdlp_bin: or_default("YTDLP_BIN", "yt-dlp"),
            ffmpeg_bin: or_default("FFMPEG_BIN", "ffmpeg"),
            ffprobe_bin: or_default("FFPROBE_BIN", "ffprobe"),
        })
    }

    /// Creates the data directory holding the token and cache documents.
    pub async fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        async_fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// Builds the shared HTTP client, routed through the proxy when one is set.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder().timeout(std::time::Duration::from_secs(30));
        if let Some(proxy) = &self.proxy_url {
            let proxy = reqwest::Proxy::all(proxy).map_err(|_| ConfigError::Invalid {
                key: "PROXY_URL",
                value: proxy.clone(),
            })?;
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(|e| ConfigError::Invalid {
            key: "PROXY_URL",
            value: e.to_string(),
        })
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("spotify.json")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("cache.json")
    }

    pub fn empty_file_path(&self) -> PathBuf {
        self.data_dir.join("empty.mp3")
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(key: &'static str) -> Result<T, ConfigError> {
    let value = required(key)?;
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
