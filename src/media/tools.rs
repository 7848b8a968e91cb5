use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use super::MediaError;
use crate::{config::Config, info};

/// Normalized audio ready for upload.
#[derive(Debug, Clone)]
pub struct TranscodedAudio {
    pub path: PathBuf,
    /// Whole seconds, at least 1.
    pub duration: u32,
}

/// External downloader and transcoder used by the fulfillment pipeline.
#[async_trait]
pub trait AudioTools: Send + Sync {
    /// Downloads the best audio stream of `video_id` into `dir` and returns the file.
    async fn download(&self, video_id: &str, dir: &Path) -> Result<PathBuf, MediaError>;

    /// Converts `input` to MP3 inside `dir`.
    async fn transcode(&self, input: &Path, dir: &Path) -> Result<TranscodedAudio, MediaError>;
}

/// `yt-dlp` + `ffmpeg` + `ffprobe` from the `PATH` (or configured binaries).
pub struct YtDlp {
    ytdlp_bin: String,
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl YtDlp {
    pub fn new(config: &Config) -> Self {
        YtDlp {
            ytdlp_bin: config.ytdlp_bin.clone(),
            ffmpeg_bin: config.ffmpeg_bin.clone(),
            ffprobe_bin: config.ffprobe_bin.clone(),
        }
    }

    async fn probe_duration(&self, path: &Path) -> Result<u32, MediaError> {
        let output = Command::new(&self.ffprobe_bin)
            .args(["-v", "error", "-show_entries", "format=duration", "-of"])
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(MediaError::Process {
                program: self.ffprobe_bin.clone(),
                status: output.status,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let seconds: f64 = stdout.parse().map_err(|_| MediaError::Duration(stdout.clone()))?;
        Ok((seconds.round() as u32).max(1))
    }
}

#[async_trait]
impl AudioTools for YtDlp {
    async fn download(&self, video_id: &str, dir: &Path) -> Result<PathBuf, MediaError> {
        let ytdlp_bin = self.ytdlp_bin.clone();
        let video_id = video_id.to_string();
        let dir = dir.to_path_buf();

        // yt-dlp blocks for the whole transfer, keep it off the runtime threads
        tokio::task::spawn_blocking(move || -> Result<PathBuf, MediaError> {
            let template = dir.join("dl.%(ext)s");
            let status = std::process::Command::new(&ytdlp_bin)
                .args(["--format", "bestaudio", "--quiet", "--no-playlist", "--output"])
                .arg(&template)
                .arg("--")
                .arg(&video_id)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()?;
            if !status.success() {
                return Err(MediaError::Process {
                    program: ytdlp_bin,
                    status,
                });
            }

            let files = std::fs::read_dir(&dir)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()?;
            match files.as_slice() {
                [file] => Ok(file.clone()),
                other => Err(MediaError::UnexpectedFileCount(other.len())),
            }
        })
        .await
        .map_err(|e| MediaError::Worker(e.to_string()))?
    }

    async fn transcode(&self, input: &Path, dir: &Path) -> Result<TranscodedAudio, MediaError> {
        let output = dir.join("audio.mp3");
        let status = Command::new(&self.ffmpeg_bin)
            .arg("-i")
            .arg(input)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !status.success() {
            return Err(MediaError::Process {
                program: self.ffmpeg_bin.clone(),
                status,
            });
        }

        let duration = self.probe_duration(&output).await?;
        Ok(TranscodedAudio {
            path: output,
            duration,
        })
    }
}

/// Creates the one second silent MP3 used behind placeholder results, unless it exists.
pub async fn ensure_silent_placeholder(ffmpeg_bin: &str, path: &Path) -> Result<(), MediaError> {
    if path.is_file() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let status = Command::new(ffmpeg_bin)
        .args(["-y", "-f", "lavfi", "-i", "anullsrc=r=44100:cl=mono", "-t", "1"])
        .args(["-codec:a", "libmp3lame", "-q:a", "9"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    if !status.success() {
        return Err(MediaError::Process {
            program: ffmpeg_bin.to_string(),
            status,
        });
    }
    info!("Generated silent placeholder at {}", path.display());
    Ok(())
}
