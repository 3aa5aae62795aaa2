//! Test fakes for the orchestrator's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ytmp3_bot::auth::{AuthorizationPolicy, DenyAll, UsernamePolicy};
use ytmp3_bot::error::{CoverError, RequestError, RequestResult};
use ytmp3_bot::gateway::{AudioDelivery, ChatGateway};
use ytmp3_bot::models::VideoInfo;
use ytmp3_bot::services::{AudioExtractor, CoverFetcher, RequestOrchestrator, Workspace};
use ytmp3_bot::AppContext;
use ytmp3_common::config::TomlConfig;

/// Files the fake extractor drops into the working directory
#[derive(Debug, Clone, Default)]
pub struct ExtractorScript {
    pub files: Vec<(String, Vec<u8>)>,
    pub info: Option<VideoInfo>,
    pub fail_with: Option<String>,
}

pub struct FakeExtractor {
    script: ExtractorScript,
    pub calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(script: ExtractorScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// Writes `<title>.mp3` (and optionally a thumbnail) like yt-dlp would
    pub fn with_audio(
        title: &str,
        thumbnail_file: Option<&str>,
        thumbnail_url: Option<&str>,
    ) -> Self {
        let mut files = vec![(format!("{}.mp3", title), vec![0u8; 256])];
        if let Some(name) = thumbnail_file {
            files.push((name.to_string(), b"thumbnail-on-disk".to_vec()));
        }
        Self::new(ExtractorScript {
            files,
            info: Some(VideoInfo {
                title: title.to_string(),
                uploader: "Uploader".to_string(),
                thumbnail: thumbnail_url.map(String::from),
            }),
            fail_with: None,
        })
    }
}

#[async_trait]
impl AudioExtractor for FakeExtractor {
    async fn extract(&self, _url: &str, target_dir: &Path) -> Result<VideoInfo, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.script.fail_with {
            return Err(RequestError::Extraction(message.clone()));
        }
        for (name, data) in &self.script.files {
            std::fs::write(target_dir.join(name), data)?;
        }
        Ok(self.script.info.clone().unwrap_or(VideoInfo {
            title: "Unknown".to_string(),
            uploader: "Unknown".to_string(),
            thumbnail: None,
        }))
    }
}

/// Cover fetcher writing fixed bytes, or failing
pub struct FakeCoverFetcher {
    pub bytes: Option<Vec<u8>>,
    pub calls: AtomicUsize,
}

impl FakeCoverFetcher {
    pub fn serving(bytes: &[u8]) -> Self {
        Self {
            bytes: Some(bytes.to_vec()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            bytes: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CoverFetcher for FakeCoverFetcher {
    async fn fetch(&self, _url: &str, target_dir: &Path) -> Result<PathBuf, CoverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.bytes {
            Some(bytes) => {
                let path = target_dir.join("cover.jpg");
                std::fs::write(&path, bytes)?;
                Ok(path)
            }
            None => Err(CoverError::Network("connection refused".to_string())),
        }
    }
}

/// Gateway event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    Status(String),
    Audio(AudioDelivery),
    StatusCleared,
}

#[derive(Default)]
pub struct RecordingGateway {
    pub events: Mutex<Vec<GatewayEvent>>,
}

impl RecordingGateway {
    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GatewayEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn deliveries(&self) -> Vec<AudioDelivery> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GatewayEvent::Audio(d) => Some(d),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn update_status(&self, text: &str) -> RequestResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(GatewayEvent::Status(text.to_string()));
        Ok(())
    }

    async fn send_audio(&self, delivery: &AudioDelivery) -> RequestResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(GatewayEvent::Audio(delivery.clone()));
        Ok(())
    }

    async fn clear_status(&self) -> RequestResult<()> {
        self.events.lock().unwrap().push(GatewayEvent::StatusCleared);
        Ok(())
    }
}

pub fn orchestrator(
    root: &Path,
    extractor: Arc<FakeExtractor>,
    fetcher: Arc<FakeCoverFetcher>,
) -> RequestOrchestrator {
    let workspace = Workspace::open(root).unwrap();
    RequestOrchestrator::new(workspace, extractor, fetcher)
}

pub fn context(
    root: &Path,
    extractor: Arc<FakeExtractor>,
    fetcher: Arc<FakeCoverFetcher>,
    admin: Option<&str>,
) -> AppContext {
    let auth: Arc<dyn AuthorizationPolicy> = match admin {
        Some(name) => Arc::new(UsernamePolicy::new(Some(name.to_string()))),
        None => Arc::new(DenyAll),
    };
    AppContext::new(TomlConfig::default(), orchestrator(root, extractor, fetcher), auth)
}
