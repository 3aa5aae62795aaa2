//! Outbound chat boundary
//!
//! The orchestrator reports progress and delivers the result through
//! [`ChatGateway`]; the Telegram implementation, including the caption
//! markup, lives in `telegram::gateway`.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::RequestResult;

/// Tagged audio file ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDelivery {
    pub audio_path: PathBuf,
    pub title: String,
    pub performer: String,
    /// Link the user sent
    pub source_url: String,
}

/// Conversation with one requester
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Show `text` in the request's status message, posting it if needed
    async fn update_status(&self, text: &str) -> RequestResult<()>;

    /// Send the audio file as a reply
    async fn send_audio(&self, delivery: &AudioDelivery) -> RequestResult<()>;

    /// Remove the status message
    async fn clear_status(&self) -> RequestResult<()>;
}
