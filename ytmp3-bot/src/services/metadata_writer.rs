//! ID3 tag writer
//!
//! Writes title (cleaned), artist (uploader), album and an optional
//! front-cover picture into the MP3 in place. Existing frames of the same
//! kind are replaced, so rewriting with the same inputs yields the same tag.

use id3::frame::{Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

use crate::error::TagError;
use crate::models::{CoverImage, TrackMetadata, VideoInfo};

/// Description stored on the embedded picture frame
const COVER_DESCRIPTION: &str = "Cover";

/// Result of a tagging attempt
#[derive(Debug)]
pub enum TagOutcome {
    /// Tags written
    Written { cover_embedded: bool },
    /// Tag write failed; the raw title is used instead
    Fallback(TagError),
}

/// Title to report for the track, plus how it was obtained
#[derive(Debug)]
pub struct TaggedTrack {
    pub title: String,
    pub outcome: TagOutcome,
}

impl TaggedTrack {
    pub fn cover_embedded(&self) -> bool {
        matches!(self.outcome, TagOutcome::Written { cover_embedded: true })
    }
}

/// Write `meta` into the file at `audio_path`
///
/// Returns whether a cover was embedded.
pub fn write_tags(audio_path: &Path, meta: &TrackMetadata) -> Result<bool, TagError> {
    let mut tag = match Tag::read_from_path(audio_path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => return Err(e.into()),
    };

    tag.set_title(meta.cleaned_title.as_str());
    tag.set_artist(meta.uploader.as_str());
    tag.set_album(meta.album);

    let cover_embedded = match &meta.cover {
        Some(cover) if cover.path.exists() => {
            let data = std::fs::read(&cover.path)
                .map_err(|e| TagError::CoverRead(cover.path.display().to_string(), e))?;
            tag.remove_picture_by_type(PictureType::CoverFront);
            tag.add_frame(Picture {
                mime_type: cover.mime_type.to_string(),
                picture_type: PictureType::CoverFront,
                description: COVER_DESCRIPTION.to_string(),
                data,
            });
            true
        }
        _ => false,
    };

    tag.write_to_path(audio_path, Version::Id3v24)?;
    Ok(cover_embedded)
}

/// Tag the track and return the title to present
///
/// Never fails: on a tag write error the failure is logged and the raw,
/// uncleaned title is returned.
pub fn apply_metadata(
    audio_path: &Path,
    cover: Option<CoverImage>,
    info: &VideoInfo,
) -> TaggedTrack {
    let meta = TrackMetadata::new(info, cover);

    match write_tags(audio_path, &meta) {
        Ok(cover_embedded) => {
            tracing::debug!(
                file = %audio_path.display(),
                title = %meta.cleaned_title,
                artist = %meta.uploader,
                cover_embedded,
                "Wrote tags"
            );
            TaggedTrack {
                title: meta.cleaned_title,
                outcome: TagOutcome::Written { cover_embedded },
            }
        }
        Err(e) => {
            tracing::warn!(file = %audio_path.display(), "Metadata error: {}", e);
            TaggedTrack {
                title: meta.raw_title,
                outcome: TagOutcome::Fallback(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ALBUM_NAME;
    use tempfile::TempDir;

    fn info(title: &str) -> VideoInfo {
        VideoInfo {
            title: title.to_string(),
            uploader: "Uploader".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_writes_text_frames() {
        let tmp = TempDir::new().unwrap();
        let audio = tmp.path().join("song.mp3");
        std::fs::write(&audio, vec![0u8; 128]).unwrap();

        let tagged = apply_metadata(&audio, None, &info("Song (Official Video)"));
        assert_eq!(tagged.title, "Song");
        assert!(matches!(tagged.outcome, TagOutcome::Written { cover_embedded: false }));

        let tag = Tag::read_from_path(&audio).unwrap();
        assert_eq!(tag.title(), Some("Song"));
        assert_eq!(tag.artist(), Some("Uploader"));
        assert_eq!(tag.album(), Some(ALBUM_NAME));
        assert_eq!(tag.pictures().count(), 0);
    }

    #[test]
    fn test_embeds_png_cover() {
        let tmp = TempDir::new().unwrap();
        let audio = tmp.path().join("song.mp3");
        let cover = tmp.path().join("thumb.png");
        std::fs::write(&audio, vec![0u8; 128]).unwrap();
        std::fs::write(&cover, b"\x89PNG fake").unwrap();

        let tagged = apply_metadata(&audio, Some(CoverImage::from_path(&cover)), &info("Song"));
        assert!(tagged.cover_embedded());

        let tag = Tag::read_from_path(&audio).unwrap();
        let picture = tag.pictures().next().unwrap();
        assert_eq!(picture.mime_type, "image/png");
        assert_eq!(picture.picture_type, PictureType::CoverFront);
        assert_eq!(picture.data, b"\x89PNG fake".to_vec());
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let audio = tmp.path().join("song.mp3");
        let cover = tmp.path().join("cover.jpg");
        std::fs::write(&audio, vec![0u8; 128]).unwrap();
        std::fs::write(&cover, b"jpeg").unwrap();

        apply_metadata(&audio, Some(CoverImage::from_path(&cover)), &info("Song [HD]"));
        let first = Tag::read_from_path(&audio).unwrap();
        apply_metadata(&audio, Some(CoverImage::from_path(&cover)), &info("Song [HD]"));
        let second = Tag::read_from_path(&audio).unwrap();

        assert_eq!(second.title(), Some("Song"));
        assert_eq!(first.title(), second.title());
        assert_eq!(first.artist(), second.artist());
        assert_eq!(first.album(), second.album());
        assert_eq!(second.pictures().count(), 1);
        assert_eq!(first.frames().count(), second.frames().count());
    }

    #[test]
    fn test_missing_audio_falls_back_to_raw_title() {
        let tmp = TempDir::new().unwrap();
        let audio = tmp.path().join("missing.mp3");

        let tagged = apply_metadata(&audio, None, &info("Song (Official Video)"));
        assert_eq!(tagged.title, "Song (Official Video)");
        assert!(matches!(tagged.outcome, TagOutcome::Fallback(_)));
    }
}
