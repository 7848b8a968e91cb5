//! # Bot Runtime
//!
//! Event handlers tying the Spotify client, the caches and the media pipeline
//! to the messaging platform.
//!
//! ## Flow
//!
//! ```text
//! InlineQuery ──► get_tracks ──► build_result (per track) ──► answer
//!                                   │  placeholder cache hit: cached document
//!                                   └─ miss: shared silent file, cached afterwards
//!
//! InlineResultChosen ──► TrackIndex ──► final cache hit? ──► edit message
//!                                           └─ miss: song.link ► yt-dlp ► ffmpeg ► upload
//! ```
//!
//! Answering a query never waits for a download; the heavy work happens
//! only after the owner picked a result, and the sent message is upgraded in
//! place. Every handler runs as its own task and reports its failures to the
//! owner instead of propagating them.

use std::{fmt, path::PathBuf, sync::Arc};

use reqwest::Client;
use tokio::sync::{RwLock, mpsc};

use crate::{
    Res,
    config::Config,
    info,
    management::{ContentCache, StateError, TokenStore, TrackIndex},
    media::{self, AudioTools, MediaError, SongLink, YtDlp},
    platform::{Event, Platform, PlatformError, UploadedFile},
    spotify::{SpotifyClient, SpotifyError, TokenRefresher},
};

mod fulfill;
mod inline;
mod login;

pub use fulfill::{FulfillError, Stage};
pub use inline::{LOADING_BUTTON_TEXT, MAX_INLINE_RESULTS, MAX_STALE_RETRIES, SWITCH_PM_PARAM};

#[derive(Debug)]
pub enum BotError {
    UnknownTrack(String),
    Platform(PlatformError),
    State(StateError),
    Spotify(SpotifyError),
    Media(MediaError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::UnknownTrack(id) => write!(f, "track {id} was not offered recently"),
            BotError::Platform(e) => write!(f, "{e}"),
            BotError::State(e) => write!(f, "{e}"),
            BotError::Spotify(e) => write!(f, "{e}"),
            BotError::Media(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BotError {}

impl From<PlatformError> for BotError {
    fn from(err: PlatformError) -> Self {
        BotError::Platform(err)
    }
}

impl From<StateError> for BotError {
    fn from(err: StateError) -> Self {
        BotError::State(err)
    }
}

impl From<SpotifyError> for BotError {
    fn from(err: SpotifyError) -> Self {
        BotError::Spotify(err)
    }
}

impl From<MediaError> for BotError {
    fn from(err: MediaError) -> Self {
        BotError::Media(err)
    }
}

pub struct Bot {
    config: Config,
    platform: Arc<dyn Platform>,
    tools: Arc<dyn AudioTools>,
    spotify: SpotifyClient,
    songlink: SongLink,
    cache: Arc<ContentCache>,
    tracks: TrackIndex,
    empty_file_path: PathBuf,
    empty_file: RwLock<Option<UploadedFile>>,
}

impl Bot {
    pub fn new(
        config: &Config,
        http: Client,
        tokens: Arc<TokenStore>,
        cache: Arc<ContentCache>,
        platform: Arc<dyn Platform>,
        tools: Arc<dyn AudioTools>,
    ) -> Self {
        let refresher = Arc::new(TokenRefresher::new(config, http.clone(), Arc::clone(&tokens)));
        Bot {
            config: config.clone(),
            platform,
            tools,
            spotify: SpotifyClient::new(config, http.clone(), tokens, refresher),
            songlink: SongLink::new(config, http),
            cache,
            tracks: TrackIndex::new(),
            empty_file_path: config.empty_file_path(),
            empty_file: RwLock::new(None),
        }
    }

    /// Loads persisted state from the data directory and wires the production
    /// media tools.
    pub async fn from_config(config: &Config, platform: Arc<dyn Platform>) -> Res<Self> {
        config.ensure_data_dir().await?;
        let http = config.http_client()?;
        let tokens = Arc::new(TokenStore::load(&config.token_path()).await?);
        let cache = Arc::new(ContentCache::load(&config.cache_path()).await?);
        media::ensure_silent_placeholder(&config.ffmpeg_bin, &config.empty_file_path()).await?;

        let tools: Arc<dyn AudioTools> = Arc::new(YtDlp::new(config));
        Ok(Self::new(config, http, tokens, cache, platform, tools))
    }

    /// Uploads the shared silent file. Must run before the first inline query.
    pub async fn start(&self) -> Result<(), PlatformError> {
        self.update_empty_file().await?;
        info!("Bot started");
        Ok(())
    }

    /// Dispatches events until the sender side of the channel is dropped.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<Event>) {
        while let Some(event) = events.recv().await {
            let bot = Arc::clone(&self);
            tokio::spawn(async move { bot.handle(event).await });
        }
        info!("Event stream closed, bot stopped");
    }

    pub async fn handle(&self, event: Event) {
        match event {
            Event::PrivateMessage(message) => self.on_private_message(message).await,
            Event::InlineQuery(query) => self.on_inline_query(query).await,
            Event::InlineResultChosen(chosen) => self.on_result_chosen(chosen).await,
        }
    }

    pub async fn update_empty_file(&self) -> Result<UploadedFile, PlatformError> {
        let uploaded = self.platform.upload_file(&self.empty_file_path).await?;
        *self.empty_file.write().await = Some(uploaded.clone());
        Ok(uploaded)
    }

    pub fn spotify(&self) -> &SpotifyClient {
        &self.spotify
    }

    pub fn tracks(&self) -> &TrackIndex {
        &self.tracks
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }
}
