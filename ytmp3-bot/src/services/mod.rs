//! Service modules for the download workflow
//!
//! - `title_normalizer`: video title cleanup
//! - `workspace`: per-request working directories
//! - `audio_extractor`: yt-dlp download and transcode
//! - `cover_locator`: thumbnail lookup and fallback fetch
//! - `metadata_writer`: ID3 tagging
//! - `request_orchestrator`: request state machine

pub mod audio_extractor;
pub mod cover_locator;
pub mod metadata_writer;
pub mod request_orchestrator;
pub mod title_normalizer;
pub mod workspace;

pub use audio_extractor::{AudioExtractor, YtDlpExtractor};
pub use cover_locator::{locate_cover, CoverFetcher, HttpCoverFetcher};
pub use metadata_writer::{apply_metadata, write_tags, TagOutcome, TaggedTrack};
pub use request_orchestrator::{DeliveredTrack, RequestOrchestrator};
pub use title_normalizer::normalize_title;
pub use workspace::{find_audio, find_cover, Workspace};
