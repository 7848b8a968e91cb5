use std::fmt;

use super::{Bot, BotError};
use crate::{
    info,
    management::Namespace,
    media::MediaError,
    platform::{AudioAttributes, ChosenInlineResult, MessageEdit, PlatformError},
    success,
    types::{CachedFileReference, Track},
    utils, warning,
};

/// Where a fulfillment run currently is, reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Downloading,
    Transcoding,
    Uploading,
    Delivering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Downloading => "downloading",
            Stage::Transcoding => "transcoding",
            Stage::Uploading => "uploading",
            Stage::Delivering => "delivering",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct FulfillError {
    pub stage: Stage,
    pub source: BotError,
}

impl fmt::Display for FulfillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed while {}: {}", self.stage, self.source)
    }
}

impl std::error::Error for FulfillError {}

fn at<E: Into<BotError>>(stage: Stage) -> impl FnOnce(E) -> FulfillError {
    move |e| FulfillError {
        stage,
        source: e.into(),
    }
}

impl Bot {
    /// A result was picked: replace the placeholder message with the real audio.
    ///
    /// Never leaves the message on "Loading...": any failure turns it into
    /// the error text with the link bar.
    pub(crate) async fn on_result_chosen(&self, chosen: ChosenInlineResult) {
        let track_id = chosen.result_id.clone();
        match self.fulfill(&chosen).await {
            Ok(()) => success!("Delivered track {}", track_id),
            Err(e) => {
                warning!("Error loading track {}: {}", track_id, e);
                let edit = MessageEdit {
                    text: utils::error_text(&track_id),
                    media: None,
                };
                if let Err(e) = self.platform.edit_inline_message(&chosen.message_id, edit).await {
                    warning!("Cannot report failure for track {}: {}", track_id, e);
                }
            }
        }
    }

    /// Delivers the cached upload of the chosen track, or uploads it first on
    /// a miss. A cached upload the platform no longer accepts is dropped and
    /// the track uploaded once more.
    async fn fulfill(&self, chosen: &ChosenInlineResult) -> Result<(), FulfillError> {
        let track_id = chosen.result_id.as_str();
        let track = self
            .tracks
            .get(track_id)
            .ok_or_else(|| at(Stage::Resolving)(BotError::UnknownTrack(track_id.to_string())))?;

        if let Some(reference) = self.cache.get(Namespace::Final, track_id).await {
            match self.deliver(chosen, reference).await {
                Err(e) if e.is_stale() => {
                    info!("Cached upload of {} went stale ({}), uploading again", track_id, e);
                    self.cache.remove(Namespace::Final, track_id).await;
                    self.persist_cache().await;
                }
                delivered => return delivered.map_err(at(Stage::Delivering)),
            }
        }

        let reference = self.upload_track(&track).await?;
        self.deliver(chosen, reference)
            .await
            .map_err(at(Stage::Delivering))
    }

    async fn deliver(
        &self,
        chosen: &ChosenInlineResult,
        reference: CachedFileReference,
    ) -> Result<(), PlatformError> {
        let edit = MessageEdit {
            text: utils::link_bar(&chosen.result_id),
            media: Some(reference),
        };
        self.platform
            .edit_inline_message(&chosen.message_id, edit)
            .await
    }

    /// Resolves, downloads, transcodes and uploads `track`, caching the upload.
    async fn upload_track(&self, track: &Track) -> Result<CachedFileReference, FulfillError> {
        let video_id = self
            .songlink
            .spotify_to_youtube(&track.id)
            .await
            .map_err(at(Stage::Resolving))?;

        // removed together with everything in it when dropped
        let scratch = tempfile::Builder::new()
            .prefix("spotinline-")
            .tempdir()
            .map_err(|e| at(Stage::Downloading)(MediaError::Io(e)))?;
        let downloaded = self
            .tools
            .download(&video_id, scratch.path())
            .await
            .map_err(at(Stage::Downloading))?;
        let audio = self
            .tools
            .transcode(&downloaded, scratch.path())
            .await
            .map_err(at(Stage::Transcoding))?;

        let attributes = AudioAttributes {
            duration: audio.duration,
            title: track.name.clone(),
            performer: track.artist.clone(),
        };
        let reference = self
            .platform
            .upload_audio(&audio.path, attributes)
            .await
            .map_err(at(Stage::Uploading))?;

        self.cache
            .put(Namespace::Final, &track.id, reference.clone())
            .await;
        self.persist_cache().await;
        Ok(reference)
    }

    /// Write failures are only logged, the in-memory entry keeps serving.
    async fn persist_cache(&self) {
        if let Err(e) = self.cache.persist().await {
            warning!("Cannot persist file reference cache: {}", e);
        }
    }
}
