//! Data models for ytmp3-bot
//!
//! - Download request state machine
//! - Track metadata assembled from the extractor's info record

pub mod request_session;
pub mod track_metadata;

pub use request_session::{IllegalTransition, RequestSession, RequestState, StateTransition};
pub use track_metadata::{mime_for_path, CoverImage, TrackMetadata, VideoInfo, ALBUM_NAME};
