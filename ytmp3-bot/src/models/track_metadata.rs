//! Track metadata derived from the extractor's info record

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::services::title_normalizer::normalize_title;

/// Album tag written to every track
pub const ALBUM_NAME: &str = "Malik's YTMP3";

/// Fallback for missing title/uploader fields
pub const UNKNOWN: &str = "Unknown";

/// Info record printed by the extractor
///
/// Only the fields the bot consumes are kept; everything else in the
/// extractor's JSON is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub uploader: String,
    /// Thumbnail URL
    pub thumbnail: Option<String>,
}

/// Wire shape of the info record; yt-dlp prints `null` for unavailable fields
#[derive(Debug, Deserialize)]
struct RawVideoInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl VideoInfo {
    /// Parse the first JSON object found in extractor stdout
    pub fn from_extractor_output(stdout: &str) -> Result<Self, serde_json::Error> {
        let line = stdout
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with('{'))
            .unwrap_or("{}");
        let raw: RawVideoInfo = serde_json::from_str(line)?;
        Ok(Self {
            title: non_blank(raw.title).unwrap_or_else(|| UNKNOWN.to_string()),
            uploader: non_blank(raw.uploader).unwrap_or_else(|| UNKNOWN.to_string()),
            thumbnail: non_blank(raw.thumbnail),
        })
    }
}

/// Cover image source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub path: PathBuf,
    pub mime_type: &'static str,
}

impl CoverImage {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_for_path(&path);
        Self { path, mime_type }
    }
}

/// Infer image MIME type from the file extension
///
/// `.png` → `image/png`, `.webp` → `image/webp`, everything else (including
/// `.jpg`/`.jpeg` and no extension) → `image/jpeg`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Tag values for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub raw_title: String,
    pub cleaned_title: String,
    pub uploader: String,
    pub album: &'static str,
    pub cover: Option<CoverImage>,
}

impl TrackMetadata {
    /// Build tag values; the cleaned title is always derived from the raw one
    pub fn new(info: &VideoInfo, cover: Option<CoverImage>) -> Self {
        Self {
            raw_title: info.title.clone(),
            cleaned_title: normalize_title(&info.title),
            uploader: info.uploader.clone(),
            album: ALBUM_NAME,
            cover,
        }
    }
}
