//! Cover art lookup
//!
//! Prefers the thumbnail the extractor already wrote into the working
//! directory; otherwise downloads the info record's thumbnail URL. A missing
//! cover is never an error.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoverError;
use crate::models::{CoverImage, VideoInfo};
use crate::services::workspace::find_cover;

/// File name used for downloaded covers
pub const FETCHED_COVER_NAME: &str = "cover.jpg";

/// Downloads a cover image into a directory
#[async_trait]
pub trait CoverFetcher: Send + Sync {
    async fn fetch(&self, url: &str, target_dir: &Path) -> Result<PathBuf, CoverError>;
}

/// HTTP cover fetcher
pub struct HttpCoverFetcher {
    http_client: reqwest::Client,
}

impl HttpCoverFetcher {
    /// Build a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, CoverError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoverError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl CoverFetcher for HttpCoverFetcher {
    async fn fetch(&self, url: &str, target_dir: &Path) -> Result<PathBuf, CoverError> {
        tracing::debug!(url = %url, "Fetching cover");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        let cover_path = target_dir.join(FETCHED_COVER_NAME);
        tokio::fs::write(&cover_path, &bytes).await?;
        Ok(cover_path)
    }
}

/// Find or fetch the cover for a request
///
/// Fetch failures are logged and yield `None`.
pub async fn locate_cover(
    dir: &Path,
    info: &VideoInfo,
    fetcher: &dyn CoverFetcher,
) -> Option<CoverImage> {
    match find_cover(dir) {
        Ok(Some(path)) => {
            tracing::debug!(cover = %path.display(), "Using downloaded thumbnail");
            return Some(CoverImage::from_path(path));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(dir = %dir.display(), "Failed to scan for thumbnail: {}", e),
    }

    let url = info.thumbnail.as_deref()?;
    match fetcher.fetch(url, dir).await {
        Ok(path) => {
            tracing::debug!(cover = %path.display(), "Fetched thumbnail");
            Some(CoverImage::from_path(path))
        }
        Err(e) => {
            tracing::warn!(url = %url, "Thumbnail download error: {}", e);
            None
        }
    }
}
