#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use spotinline::{
    bot::Bot,
    config::Config,
    management::{ContentCache, TokenStore},
    media::{AudioTools, MediaError, TranscodedAudio},
    platform::{
        AudioAttributes, DocumentSource, InlineAnswer, InlineDraft, InlineMessageId, InlineResult,
        MessageEdit, Platform, PlatformError, UploadedFile,
    },
    types::{CachedFileReference, SpotifyAuth, Track},
};

pub const OWNER_ID: i64 = 42;

// Helper function to create a config pointing every remote service at `base_url`
pub fn test_config(data_dir: &Path, base_url: &str) -> Config {
    Config {
        api_id: 1,
        api_hash: "hash".to_string(),
        bot_token: "1:token".to_string(),
        owner_id: OWNER_ID,
        spotify_client_id: "client".to_string(),
        spotify_client_secret: "secret".to_string(),
        spotify_redirect_uri: "https://example.com/callback".to_string(),
        data_dir: data_dir.to_path_buf(),
        proxy_url: None,
        spotify_api_url: base_url.to_string(),
        spotify_accounts_url: base_url.to_string(),
        songlink_api_url: base_url.to_string(),
        ytdlp_bin: "yt-dlp".to_string(),
        ffmpeg_bin: "ffmpeg".to_string(),
        ffprobe_bin: "ffprobe".to_string(),
    }
}

// Helper function to create a logged in store whose last refresh is long past
pub fn logged_in(path: PathBuf, access_token: &str) -> Arc<TokenStore> {
    Arc::new(TokenStore::new(
        path,
        SpotifyAuth {
            access_token: Some(access_token.to_string()),
            refresh_token: Some("refresh".to_string()),
            refreshed_at: Some(0.0),
        },
    ))
}

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artist: artist.to_string(),
    }
}

pub fn reference(id: i64) -> CachedFileReference {
    CachedFileReference {
        id,
        access_hash: id * 10,
        file_reference: vec![0xde, 0xad, id as u8],
    }
}

// Counts down `counter`, reporting whether it was still above zero
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Records everything the bot asks of the messaging platform.
#[derive(Default)]
pub struct FakePlatform {
    pub file_uploads: AtomicUsize,
    pub registrations: AtomicUsize,
    /// Upcoming builds from an uploaded file that fail as stale.
    pub stale_builds: AtomicUsize,
    /// Upcoming builds from a cached document that fail as stale.
    pub stale_cached_builds: AtomicUsize,
    /// Upcoming edits carrying media that fail with an expired reference.
    pub stale_edits: AtomicUsize,
    pub audio_uploads: Mutex<Vec<AudioAttributes>>,
    pub answers: Mutex<Vec<(i64, InlineAnswer)>>,
    pub edits: Mutex<Vec<(InlineMessageId, MessageEdit)>>,
    pub sent: Mutex<Vec<(i64, String)>>,
    cached_builds: AtomicUsize,
    next_id: AtomicI64,
}

impl FakePlatform {
    pub fn last_answer(&self) -> Option<InlineAnswer> {
        self.answers.lock().unwrap().last().map(|(_, a)| a.clone())
    }

    pub fn last_edit(&self) -> Option<MessageEdit> {
        self.edits.lock().unwrap().last().map(|(_, e)| e.clone())
    }

    pub fn last_sent(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, t)| t.clone())
    }

    pub fn cached_builds(&self) -> usize {
        self.cached_builds.load(Ordering::SeqCst)
    }

    fn next_reference(&self) -> CachedFileReference {
        reference(100 + self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, PlatformError> {
        let n = self.file_uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedFile {
            id: n as i64,
            parts: 1,
            name: path.display().to_string(),
        })
    }

    async fn build_document_result(
        &self,
        source: DocumentSource,
        draft: InlineDraft,
    ) -> Result<InlineResult, PlatformError> {
        let document = match source {
            DocumentSource::Cached(reference) => {
                self.cached_builds.fetch_add(1, Ordering::SeqCst);
                if take_one(&self.stale_cached_builds) {
                    return Err(PlatformError::FilePartMissing("cached part".to_string()));
                }
                reference
            }
            DocumentSource::Upload(_) => {
                if take_one(&self.stale_builds) {
                    return Err(PlatformError::FilePartMissing("part 0".to_string()));
                }
                self.registrations.fetch_add(1, Ordering::SeqCst);
                self.next_reference()
            }
        };
        Ok(InlineResult { draft, document })
    }

    async fn answer_inline_query(
        &self,
        query_id: i64,
        answer: InlineAnswer,
    ) -> Result<(), PlatformError> {
        self.answers.lock().unwrap().push((query_id, answer));
        Ok(())
    }

    async fn upload_audio(
        &self,
        _path: &Path,
        attributes: AudioAttributes,
    ) -> Result<CachedFileReference, PlatformError> {
        self.audio_uploads.lock().unwrap().push(attributes);
        Ok(self.next_reference())
    }

    async fn edit_inline_message(
        &self,
        message_id: &InlineMessageId,
        edit: MessageEdit,
    ) -> Result<(), PlatformError> {
        if edit.media.is_some() && take_one(&self.stale_edits) {
            return Err(PlatformError::FileReferenceExpired("edit media".to_string()));
        }
        self.edits.lock().unwrap().push((message_id.clone(), edit));
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Stands in for yt-dlp and ffmpeg, writing dummy files into the scratch dir.
#[derive(Default)]
pub struct FakeTools {
    pub downloads: Mutex<Vec<String>>,
    pub transcodes: AtomicUsize,
    pub fail_download: bool,
}

#[async_trait]
impl AudioTools for FakeTools {
    async fn download(&self, video_id: &str, dir: &Path) -> Result<PathBuf, MediaError> {
        self.downloads.lock().unwrap().push(video_id.to_string());
        if self.fail_download {
            return Err(MediaError::UnexpectedFileCount(0));
        }
        let path = dir.join("dl.webm");
        std::fs::write(&path, b"webm")?;
        Ok(path)
    }

    async fn transcode(&self, input: &Path, dir: &Path) -> Result<TranscodedAudio, MediaError> {
        self.transcodes.fetch_add(1, Ordering::SeqCst);
        assert!(input.is_file());
        let path = dir.join("audio.mp3");
        std::fs::write(&path, b"mp3")?;
        Ok(TranscodedAudio {
            path,
            duration: 215,
        })
    }
}

pub struct Harness {
    pub bot: Arc<Bot>,
    pub platform: Arc<FakePlatform>,
    pub tools: Arc<FakeTools>,
    pub tokens: Arc<TokenStore>,
    pub dir: tempfile::TempDir,
}

// Helper function to assemble a started bot around the fakes
pub async fn harness(base_url: &str, tokens: Option<&str>, tools: FakeTools) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), base_url);
    let tokens = match tokens {
        Some(access_token) => logged_in(config.token_path(), access_token),
        None => Arc::new(TokenStore::load(&config.token_path()).await.unwrap()),
    };
    let cache = Arc::new(ContentCache::load(&config.cache_path()).await.unwrap());
    let platform = Arc::new(FakePlatform::default());
    let tools = Arc::new(tools);

    let bot = Bot::new(
        &config,
        reqwest::Client::new(),
        Arc::clone(&tokens),
        cache,
        platform.clone(),
        tools.clone(),
    );
    bot.start().await.unwrap();

    Harness {
        bot: Arc::new(bot),
        platform,
        tools,
        tokens,
        dir,
    }
}
