//! Download request state machine
//!
//! A request progresses through 5 states in strict order, never moving back:
//! RECEIVED → DOWNLOADING → LOCATING_COVER → TAGGING → SENDING → DONE
//!
//! FAILED is reachable from any non-terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Download request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    /// Link accepted, working directory not yet created
    Received,
    /// Audio extraction running
    Downloading,
    /// Looking for a thumbnail on disk, or fetching one
    LocatingCover,
    /// Writing ID3 tags
    Tagging,
    /// Uploading the tagged file
    Sending,
    /// Request finished successfully
    Done,
    /// Request failed with a fatal error
    Failed,
}

impl RequestState {
    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Done | RequestState::Failed)
    }

    /// The single state that follows this one on the success path
    pub fn next(self) -> Option<RequestState> {
        match self {
            RequestState::Received => Some(RequestState::Downloading),
            RequestState::Downloading => Some(RequestState::LocatingCover),
            RequestState::LocatingCover => Some(RequestState::Tagging),
            RequestState::Tagging => Some(RequestState::Sending),
            RequestState::Sending => Some(RequestState::Done),
            RequestState::Done | RequestState::Failed => None,
        }
    }

    /// Whether `self → to` is a legal transition
    pub fn can_transition_to(self, to: RequestState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == RequestState::Failed || self.next() == Some(to)
    }

    /// Progress text shown to the requester while in this state
    pub fn status_text(self) -> Option<&'static str> {
        match self {
            RequestState::Received => Some("🔄 Processing..."),
            RequestState::Downloading => Some("📥 Downloading audio and cover..."),
            RequestState::LocatingCover => Some("🖼️ Processing cover..."),
            RequestState::Tagging => Some("📝 Adding metadata..."),
            RequestState::Sending => Some("📤 Sending file..."),
            RequestState::Done | RequestState::Failed => None,
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestState::Received => "RECEIVED",
            RequestState::Downloading => "DOWNLOADING",
            RequestState::LocatingCover => "LOCATING_COVER",
            RequestState::Tagging => "TAGGING",
            RequestState::Sending => "SENDING",
            RequestState::Done => "DONE",
            RequestState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Rejected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Illegal transition {from} → {to}")]
pub struct IllegalTransition {
    pub from: RequestState,
    pub to: RequestState,
}

/// State transition event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub old_state: RequestState,
    pub new_state: RequestState,
    pub transitioned_at: DateTime<Utc>,
}

/// Download request (in-memory state)
///
/// Identified by the requesting user and the Unix timestamp at which it was
/// received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSession {
    /// Requesting user id
    pub user_id: u64,

    /// Source link as sent by the user
    pub url: String,

    /// Current workflow state
    pub state: RequestState,

    /// Unix timestamp (seconds) the request was received
    pub received_unix: i64,

    /// Session start time
    pub started_at: DateTime<Utc>,

    /// Session end time (if done/failed)
    pub ended_at: Option<DateTime<Utc>>,

    /// Failure message (if failed)
    pub failure: Option<String>,
}

impl RequestSession {
    /// Create new request session in RECEIVED
    pub fn new(user_id: u64, url: impl Into<String>) -> Self {
        let started_at = ytmp3_common::time::now();
        Self {
            user_id,
            url: url.into(),
            state: RequestState::Received,
            received_unix: started_at.timestamp(),
            started_at,
            ended_at: None,
            failure: None,
        }
    }

    /// Transition to new state
    pub fn transition_to(
        &mut self,
        new_state: RequestState,
    ) -> Result<StateTransition, IllegalTransition> {
        if !self.state.can_transition_to(new_state) {
            return Err(IllegalTransition {
                from: self.state,
                to: new_state,
            });
        }

        let transition = StateTransition {
            old_state: self.state,
            new_state,
            transitioned_at: Utc::now(),
        };
        self.state = new_state;

        if new_state.is_terminal() {
            self.ended_at = Some(Utc::now());
        }

        Ok(transition)
    }

    /// Move to FAILED, recording the message
    ///
    /// No-op when already terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> Option<StateTransition> {
        let transition = self.transition_to(RequestState::Failed).ok()?;
        self.failure = Some(message.into());
        Some(transition)
    }
}
