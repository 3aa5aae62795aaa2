//! Download request orchestrator
//!
//! Drives one [`RequestSession`] through its states:
//! RECEIVED → DOWNLOADING → LOCATING_COVER → TAGGING → SENDING → DONE
//!
//! Each transition is logged and mirrored to the requester's status message.
//! Any fatal error moves the session to FAILED. Cover and tagging problems are
//! absorbed by their services and never fail the request.
//!
//! Working directories are left on disk whatever the outcome.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{RequestError, RequestResult};
use crate::gateway::{AudioDelivery, ChatGateway};
use crate::models::{RequestSession, RequestState};
use crate::services::audio_extractor::AudioExtractor;
use crate::services::cover_locator::{locate_cover, CoverFetcher};
use crate::services::metadata_writer::{apply_metadata, TagOutcome};
use crate::services::workspace::{find_audio, Workspace};

/// Outcome of a successful request
#[derive(Debug, Clone)]
pub struct DeliveredTrack {
    pub request_dir: PathBuf,
    pub audio_path: PathBuf,
    pub title: String,
    pub uploader: String,
    pub cover_embedded: bool,
    /// Tagging failed and the raw title was used
    pub tag_fallback: bool,
}

/// Request orchestrator service
pub struct RequestOrchestrator {
    workspace: Workspace,
    extractor: Arc<dyn AudioExtractor>,
    cover_fetcher: Arc<dyn CoverFetcher>,
}

impl RequestOrchestrator {
    /// Create new orchestrator
    ///
    /// # Arguments
    /// * `workspace` - Root of per-request working directories
    /// * `extractor` - Audio download backend
    /// * `cover_fetcher` - Fallback thumbnail downloader
    pub fn new(
        workspace: Workspace,
        extractor: Arc<dyn AudioExtractor>,
        cover_fetcher: Arc<dyn CoverFetcher>,
    ) -> Self {
        Self {
            workspace,
            extractor,
            cover_fetcher,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run `session` to DONE or FAILED
    ///
    /// On error the session is already FAILED with the error message recorded;
    /// reporting it to the requester is left to the caller.
    pub async fn process(
        &self,
        session: &mut RequestSession,
        gateway: &dyn ChatGateway,
    ) -> RequestResult<DeliveredTrack> {
        match self.run(session, gateway).await {
            Ok(track) => Ok(track),
            Err(e) => {
                if let Some(transition) = session.fail(e.to_string()) {
                    tracing::error!(
                        user_id = session.user_id,
                        url = %session.url,
                        from = %transition.old_state,
                        "Request failed: {}",
                        e
                    );
                }
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        session: &mut RequestSession,
        gateway: &dyn ChatGateway,
    ) -> RequestResult<DeliveredTrack> {
        if let Some(text) = session.state.status_text() {
            gateway.update_status(text).await?;
        }

        // RECEIVED → DOWNLOADING
        let request_dir = self
            .workspace
            .create_request_dir(session.user_id, session.received_unix)?;
        advance(session, RequestState::Downloading, gateway).await?;

        let info = self.extractor.extract(&session.url, &request_dir).await?;
        let audio_path = find_audio(&request_dir)?.ok_or(RequestError::NoAudio)?;
        tracing::debug!(audio = %audio_path.display(), title = %info.title, "Audio downloaded");

        // DOWNLOADING → LOCATING_COVER
        advance(session, RequestState::LocatingCover, gateway).await?;
        let cover = locate_cover(&request_dir, &info, self.cover_fetcher.as_ref()).await;

        // LOCATING_COVER → TAGGING
        advance(session, RequestState::Tagging, gateway).await?;
        let tagged = {
            let audio_path = audio_path.clone();
            let info = info.clone();
            tokio::task::spawn_blocking(move || apply_metadata(&audio_path, cover, &info))
                .await
                .map_err(|e| ytmp3_common::Error::Internal(format!("tagging task failed: {}", e)))?
        };
        let cover_embedded = tagged.cover_embedded();
        let tag_fallback = matches!(tagged.outcome, TagOutcome::Fallback(_));

        // TAGGING → SENDING
        advance(session, RequestState::Sending, gateway).await?;
        let delivery = AudioDelivery {
            audio_path: audio_path.clone(),
            title: tagged.title.clone(),
            performer: info.uploader.clone(),
            source_url: session.url.clone(),
        };
        gateway.send_audio(&delivery).await?;
        gateway.clear_status().await?;

        // SENDING → DONE
        advance(session, RequestState::Done, gateway).await?;

        Ok(DeliveredTrack {
            request_dir,
            audio_path,
            title: tagged.title,
            uploader: info.uploader,
            cover_embedded,
            tag_fallback,
        })
    }
}

/// Transition `session` and mirror the new state to the status message
async fn advance(
    session: &mut RequestSession,
    to: RequestState,
    gateway: &dyn ChatGateway,
) -> RequestResult<()> {
    let transition = session
        .transition_to(to)
        .map_err(|e| ytmp3_common::Error::Internal(e.to_string()))?;

    tracing::info!(
        user_id = session.user_id,
        from = %transition.old_state,
        to = %transition.new_state,
        "Request state transition"
    );

    if let Some(text) = to.status_text() {
        gateway.update_status(text).await?;
    }
    Ok(())
}
