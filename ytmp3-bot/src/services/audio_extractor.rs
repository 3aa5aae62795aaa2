//! Audio extraction via yt-dlp
//!
//! Downloads the best audio stream, transcodes it to MP3 with ffmpeg (driven
//! by yt-dlp), and writes the video thumbnail next to it. The info record is
//! read from yt-dlp's `--dump-json` output.
//!
//! No timeout is applied: a running extraction completes or fails on its own.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::RequestError;
use crate::models::VideoInfo;

/// Number of stderr lines kept in extraction errors
const STDERR_TAIL_LINES: usize = 5;

/// Fetches a link's audio track into a target directory
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Download and transcode the audio for `url` into `target_dir`
    ///
    /// Returns the info record. Succeeding here does not guarantee an audio
    /// file exists; the caller checks the directory.
    async fn extract(&self, url: &str, target_dir: &Path) -> Result<VideoInfo, RequestError>;
}

/// yt-dlp command-line extractor
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: String,
    audio_quality: String,
}

impl YtDlpExtractor {
    /// # Arguments
    /// * `binary` - yt-dlp executable name or path
    /// * `audio_quality` - MP3 bitrate in kbps (e.g. "192")
    pub fn new(binary: impl Into<String>, audio_quality: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            audio_quality: audio_quality.into(),
        }
    }

    /// Command-line arguments for one extraction
    pub fn build_args(&self, url: &str, target_dir: &Path) -> Vec<String> {
        let template = target_dir.join("%(title)s.%(ext)s");
        vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--no-playlist".into(),
            "--write-thumbnail".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            "mp3".into(),
            "--audio-quality".into(),
            format!("{}K", self.audio_quality),
            "--add-metadata".into(),
            "--quiet".into(),
            "--no-warnings".into(),
            "--dump-json".into(),
            "--no-simulate".into(),
            "--output".into(),
            template.to_string_lossy().into_owned(),
            "--".into(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl AudioExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str, target_dir: &Path) -> Result<VideoInfo, RequestError> {
        let args = self.build_args(url, target_dir);
        tracing::debug!(
            binary = %self.binary,
            url = %url,
            dir = %target_dir.display(),
            "Running extractor"
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                RequestError::Extraction(format!("failed to run {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr, STDERR_TAIL_LINES);
            tracing::warn!(
                status = %output.status,
                stderr = %tail,
                "Extractor exited unsuccessfully"
            );
            return Err(RequestError::Extraction(if tail.is_empty() {
                format!("{} exited with {}", self.binary, output.status)
            } else {
                tail
            }));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        VideoInfo::from_extractor_output(&stdout)
            .map_err(|e| RequestError::Extraction(format!("unreadable info record: {}", e)))
    }
}

/// Last `lines` non-empty lines of `stderr`, joined with newlines
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}
