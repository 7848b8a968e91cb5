//! The messaging platform as the bot sees it.
//!
//! The bot never talks to Telegram directly. The embedding program wraps its
//! MTProto client in a [`Platform`] implementation and feeds incoming updates
//! to [`crate::bot::Bot::run`] as [`Event`]s.

use std::{fmt, path::Path};

use async_trait::async_trait;

use crate::types::CachedFileReference;

/// A local file uploaded to the platform but not yet attached to anything.
///
/// Upload parts expire on the platform side; using an expired handle fails
/// with [`PlatformError::FilePartMissing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: i64,
    pub parts: i32,
    pub name: String,
}

/// What an inline document result is backed by.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// A freshly uploaded file; building the result registers it as a document.
    Upload(UploadedFile),
    /// A document registered earlier.
    Cached(CachedFileReference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAttributes {
    pub duration: u32,
    pub title: String,
    pub performer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub data: Vec<u8>,
}

/// Everything an inline document result shows, minus the media.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub attributes: AudioAttributes,
    /// HTML message text sent along with the document.
    pub text: String,
    pub buttons: Vec<InlineButton>,
}

/// A result ready to be put into an inline answer.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineResult {
    pub draft: InlineDraft,
    /// The document the result points at, reusable in later answers.
    pub document: CachedFileReference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineAnswer {
    Results(Vec<InlineResult>),
    /// No results, only a button leading to a private chat with the bot.
    SwitchPm { text: String, param: String },
}

/// Opaque id of a message sent through an inline result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineMessageId(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct MessageEdit {
    pub text: String,
    pub media: Option<CachedFileReference>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrivateMessage {
    pub chat_id: i64,
    pub sender_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineQuery {
    pub query_id: i64,
    pub sender_id: i64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChosenInlineResult {
    pub result_id: String,
    pub sender_id: i64,
    pub message_id: InlineMessageId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PrivateMessage(PrivateMessage),
    InlineQuery(InlineQuery),
    InlineResultChosen(ChosenInlineResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// An uploaded file's parts are gone on the platform side.
    FilePartMissing(String),
    /// The client library could not marshal the request, usually a stale handle.
    Marshalling(String),
    /// A stored document reference is no longer accepted by the platform.
    FileReferenceExpired(String),
    Rpc { code: i32, message: String },
    Io(String),
}

impl PlatformError {
    /// Errors caused by a stale upload handle or document reference, fixed
    /// by uploading the file again.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            PlatformError::FilePartMissing(_)
                | PlatformError::Marshalling(_)
                | PlatformError::FileReferenceExpired(_)
        )
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::FilePartMissing(e) => write!(f, "file part missing: {e}"),
            PlatformError::Marshalling(e) => write!(f, "cannot marshal request: {e}"),
            PlatformError::FileReferenceExpired(e) => write!(f, "file reference expired: {e}"),
            PlatformError::Rpc { code, message } => write!(f, "rpc error {code}: {message}"),
            PlatformError::Io(e) => write!(f, "platform I/O error: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Uploads a local file, returning a handle usable for a short while.
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, PlatformError>;

    /// Builds an inline document result, registering uploaded files as documents.
    async fn build_document_result(
        &self,
        source: DocumentSource,
        draft: InlineDraft,
    ) -> Result<InlineResult, PlatformError>;

    async fn answer_inline_query(
        &self,
        query_id: i64,
        answer: InlineAnswer,
    ) -> Result<(), PlatformError>;

    /// Uploads an audio file as a standalone document with the given attributes.
    async fn upload_audio(
        &self,
        path: &Path,
        attributes: AudioAttributes,
    ) -> Result<CachedFileReference, PlatformError>;

    async fn edit_inline_message(
        &self,
        message_id: &InlineMessageId,
        edit: MessageEdit,
    ) -> Result<(), PlatformError>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError>;
}
