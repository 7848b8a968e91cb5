//! Turning a Spotify track id into an uploadable audio file.
//!
//! [`SongLink`] maps the Spotify id to a YouTube video id, [`AudioTools`]
//! downloads the best audio stream for it and normalizes it to MP3. The
//! production implementation ([`YtDlp`]) shells out to `yt-dlp`, `ffmpeg`
//! and `ffprobe`.

use std::{fmt, process::ExitStatus};

use reqwest::StatusCode;

mod songlink;
mod tools;

pub use songlink::SongLink;
pub use tools::{AudioTools, TranscodedAudio, YtDlp, ensure_silent_placeholder};

#[derive(Debug)]
pub enum MediaError {
    Http(reqwest::Error),
    Status { status: StatusCode, body: String },
    NoYoutubeMatch(String),
    MalformedEntityId(String),
    Io(std::io::Error),
    Process { program: String, status: ExitStatus },
    UnexpectedFileCount(usize),
    Duration(String),
    Worker(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Http(e) => write!(f, "song.link request failed: {e}"),
            MediaError::Status { status, body } => write!(f, "song.link answered {status}: {body}"),
            MediaError::NoYoutubeMatch(id) => write!(f, "no YouTube match for track {id}"),
            MediaError::MalformedEntityId(id) => write!(f, "unexpected song.link entity id {id:?}"),
            MediaError::Io(e) => write!(f, "I/O error: {e}"),
            MediaError::Process { program, status } => write!(f, "{program} exited with {status}"),
            MediaError::UnexpectedFileCount(n) => {
                write!(f, "expected exactly one downloaded file, found {n}")
            }
            MediaError::Duration(out) => write!(f, "cannot read audio duration from {out:?}"),
            MediaError::Worker(e) => write!(f, "download worker failed: {e}"),
        }
    }
}

impl std::error::Error for MediaError {}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Http(err)
    }
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        MediaError::Io(err)
    }
}
