use super::{Bot, BotError};
use crate::{
    info,
    management::Namespace,
    platform::{
        AudioAttributes, DocumentSource, InlineAnswer, InlineButton, InlineDraft, InlineQuery,
        InlineResult, PlatformError,
    },
    types::Track,
    utils, warning,
};

pub const MAX_INLINE_RESULTS: usize = 5;
/// How often a result is rebuilt after its placeholder or the shared silent
/// upload went stale.
pub const MAX_STALE_RETRIES: usize = 1;
pub const SWITCH_PM_PARAM: &str = "meow";
pub const LOADING_BUTTON_TEXT: &str = "Loading...";

enum BuildOutcome {
    Ready(InlineResult),
    /// The platform rejected the source; `cached` tells a stale placeholder
    /// reference apart from a stale silent upload.
    Stale { error: PlatformError, cached: bool },
    Failed(BotError),
}

fn switch_pm(text: &str) -> InlineAnswer {
    InlineAnswer::SwitchPm {
        text: text.to_string(),
        param: SWITCH_PM_PARAM.to_string(),
    }
}

fn draft_for(track: &Track) -> InlineDraft {
    InlineDraft {
        id: track.id.clone(),
        title: track.name.clone(),
        description: track.artist.clone(),
        attributes: AudioAttributes {
            duration: 1,
            title: track.name.clone(),
            performer: track.artist.clone(),
        },
        text: utils::link_bar(&track.id),
        buttons: vec![InlineButton {
            text: LOADING_BUTTON_TEXT.to_string(),
            data: b"loading".to_vec(),
        }],
    }
}

impl Bot {
    pub(crate) async fn on_inline_query(&self, query: InlineQuery) {
        let answer = self.answer_for(&query).await;
        if let Err(e) = self.platform.answer_inline_query(query.query_id, answer).await {
            warning!("Cannot answer inline query {}: {}", query.query_id, e);
        }
    }

    async fn answer_for(&self, query: &InlineQuery) -> InlineAnswer {
        if query.sender_id != self.config.owner_id {
            return switch_pm("You are not the bot owner :(");
        }
        if !self.spotify.tokens().is_authenticated().await {
            return switch_pm("Login first");
        }

        let mut tracks = match self.spotify.get_tracks().await {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Error loading tracks: {}", e);
                return switch_pm("Error :(");
            }
        };
        tracks.truncate(MAX_INLINE_RESULTS);
        self.tracks.remember_all(&tracks);

        let mut results = Vec::with_capacity(tracks.len());
        for track in &tracks {
            match self.build_result(track).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warning!("Error building inline result for {}: {}", track.id, e);
                    return switch_pm("Error :(");
                }
            }
        }
        InlineAnswer::Results(results)
    }

    /// Builds the inline result for `track`, backed by its cached placeholder
    /// document or, on a miss, by the shared silent file.
    ///
    /// A stale cached placeholder is dropped so the next attempt registers a
    /// fresh one from the silent file; a stale silent upload is uploaded again.
    /// Either way the build is retried at most [`MAX_STALE_RETRIES`] times.
    pub async fn build_result(&self, track: &Track) -> Result<InlineResult, BotError> {
        let mut stale_retries = 0;
        loop {
            match self.try_build_result(track).await {
                BuildOutcome::Ready(result) => return Ok(result),
                BuildOutcome::Stale { error, cached } if stale_retries < MAX_STALE_RETRIES => {
                    stale_retries += 1;
                    if cached {
                        info!(
                            "Placeholder for {} went stale ({}), registering it again",
                            track.id, error
                        );
                        self.cache.remove(Namespace::Placeholder, &track.id).await;
                        self.cache.persist().await?;
                    } else {
                        info!("Silent file upload went stale ({}), uploading again", error);
                        self.update_empty_file().await?;
                    }
                }
                BuildOutcome::Stale { error, .. } => return Err(error.into()),
                BuildOutcome::Failed(e) => return Err(e),
            }
        }
    }

    async fn try_build_result(&self, track: &Track) -> BuildOutcome {
        let cached = self.cache.get(Namespace::Placeholder, &track.id).await;
        let empty_file = self.empty_file.read().await.clone();
        let source = match &cached {
            Some(reference) => DocumentSource::Cached(reference.clone()),
            None => match empty_file {
                Some(file) => DocumentSource::Upload(file),
                None => {
                    return BuildOutcome::Stale {
                        error: PlatformError::FilePartMissing(
                            "silent file was never uploaded".to_string(),
                        ),
                        cached: false,
                    };
                }
            },
        };

        let result = match self.platform.build_document_result(source, draft_for(track)).await {
            Ok(result) => result,
            Err(error) if error.is_stale() => {
                return BuildOutcome::Stale {
                    error,
                    cached: cached.is_some(),
                };
            }
            Err(e) => return BuildOutcome::Failed(e.into()),
        };

        if cached.is_none() {
            self.cache
                .put(Namespace::Placeholder, &track.id, result.document.clone())
                .await;
            if let Err(e) = self.cache.persist().await {
                return BuildOutcome::Failed(e.into());
            }
        }
        BuildOutcome::Ready(result)
    }
}
