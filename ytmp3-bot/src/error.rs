//! Error types for ytmp3-bot
//!
//! Request failures are split by severity:
//! - [`RequestError`] is fatal for the request and is reported to the user
//! - [`CoverError`] and [`TagError`] are recovered locally and never abort a request

use thiserror::Error;

/// Fatal request error
#[derive(Debug, Error)]
pub enum RequestError {
    /// Extraction finished but left no audio artifact in the working directory
    #[error("Failed to download audio")]
    NoAudio,

    /// The extraction tool could not be run or exited unsuccessfully
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Working directory could not be created or read
    #[error("Workspace error: {0}")]
    Workspace(#[from] std::io::Error),

    /// Outbound chat call failed (status edit, audio upload)
    #[error("Transport error: {0}")]
    Transport(String),

    /// ytmp3-common error
    #[error(transparent)]
    Common(#[from] ytmp3_common::Error),
}

/// Cover art fetch failure (recoverable: request proceeds without cover)
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tag write failure (recoverable: caller falls back to the raw title)
#[derive(Debug, Error)]
pub enum TagError {
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    #[error("Failed to read cover {0}: {1}")]
    CoverRead(String, std::io::Error),
}

impl From<teloxide::RequestError> for RequestError {
    fn from(err: teloxide::RequestError) -> Self {
        RequestError::Transport(err.to_string())
    }
}

/// Result type for request processing
pub type RequestResult<T> = Result<T, RequestError>;
