//! Command and message handling, independent of the chat transport
//!
//! - `/start`: static greeting
//! - `/clear`: privileged; wipes every working directory
//! - free text: YouTube link → download request

use crate::auth::Requester;
use crate::error::RequestError;
use crate::gateway::ChatGateway;
use crate::models::RequestSession;
use crate::services::DeliveredTrack;
use crate::AppContext;

/// `/start` reply
pub const GREETING: &str =
    "🎵 Hey! Send me a YouTube link and I'll convert it to MP3 with cover art!";

/// Reply to text without a YouTube link
pub const INVALID_LINK_REPLY: &str = "⚠️ Please send a valid YouTube link";

/// `/clear` confirmation
pub const CLEARED_REPLY: &str = "🗑 Files deleted";

/// Substrings that mark a message as a YouTube link
pub const LINK_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// User-visible text for a failed request
pub fn error_reply(err: &dyn std::fmt::Display) -> String {
    format!("❌ Error: {}", err)
}

/// Whether `text` mentions a YouTube link
pub fn is_youtube_link(text: &str) -> bool {
    LINK_MARKERS.iter().any(|m| text.contains(m))
}

/// The link to download from `text`
///
/// The first whitespace-separated token carrying a link marker, or the whole
/// trimmed text when no single token does.
pub fn extract_link(text: &str) -> &str {
    text.split_whitespace()
        .find(|token| is_youtube_link(token))
        .unwrap_or_else(|| text.trim())
}

/// Result of `/clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Requester is not privileged; nothing was touched
    Denied,
    /// Number of entries removed
    Cleared(usize),
}

/// Run `/clear` for `requester`
pub fn clear_workspace(
    ctx: &AppContext,
    requester: &Requester,
) -> ytmp3_common::Result<ClearOutcome> {
    if !ctx.auth.is_privileged(requester) {
        tracing::warn!(
            user_id = requester.id,
            username = ?requester.username,
            "Unprivileged /clear ignored"
        );
        return Ok(ClearOutcome::Denied);
    }

    let removed = ctx.orchestrator.workspace().clear_all()?;
    Ok(ClearOutcome::Cleared(removed))
}

/// Result of a free-text message
#[derive(Debug)]
pub enum TextOutcome {
    /// No YouTube link; no request was created
    Rejected,
    /// Audio delivered
    Delivered(DeliveredTrack),
    /// Request failed
    Failed(RequestError),
}

/// Handle a free-text message
pub async fn handle_text(
    ctx: &AppContext,
    requester: &Requester,
    text: &str,
    gateway: &dyn ChatGateway,
) -> TextOutcome {
    if !is_youtube_link(text) {
        return TextOutcome::Rejected;
    }

    let mut session = RequestSession::new(requester.id, extract_link(text));
    tracing::info!(user_id = requester.id, url = %session.url, "Request received");

    match ctx.orchestrator.process(&mut session, gateway).await {
        Ok(track) => {
            tracing::info!(
                user_id = requester.id,
                title = %track.title,
                cover_embedded = track.cover_embedded,
                "Request done"
            );
            TextOutcome::Delivered(track)
        }
        Err(e) => TextOutcome::Failed(e),
    }
}
