//! Per-request working directories
//!
//! Layout under the root folder:
//! ```text
//! <root>/
//!   user_<id>_<unix-ts>/
//!     <title>.mp3
//!     <title>.webp | cover.jpg
//! ```
//!
//! Directories are not removed when a request finishes; only [`Workspace::clear_all`]
//! deletes them.

use std::io;
use std::path::{Path, PathBuf};

/// Extensions accepted as the request's audio artifact
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

/// Extensions accepted as a cover image
pub const COVER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Root of all request working directories
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open the workspace, creating the root directory if missing
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
            tracing::info!(root = %root.display(), "Created working-directory root");
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh directory for one request
    ///
    /// Named `user_<id>_<ts>`. A second request from the same user within the
    /// same second gets `user_<id>_<ts>_2`, `_3`, ...
    pub fn create_request_dir(&self, user_id: u64, unix_ts: i64) -> io::Result<PathBuf> {
        let base = format!("user_{}_{}", user_id, unix_ts);
        let mut candidate = self.root.join(&base);
        let mut attempt = 1u32;

        loop {
            match std::fs::create_dir(&candidate) {
                Ok(()) => {
                    tracing::debug!(dir = %candidate.display(), "Created request directory");
                    return Ok(candidate);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                    candidate = self.root.join(format!("{}_{}", base, attempt));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Remove every entry under the root
    ///
    /// Directories are removed recursively, files directly. Returns the number
    /// of top-level entries removed.
    pub fn clear_all(&self) -> io::Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
            removed += 1;
        }
        tracing::info!(root = %self.root.display(), removed, "Cleared working directories");
        Ok(removed)
    }
}

/// First audio artifact in `dir`, by file name
pub fn find_audio(dir: &Path) -> io::Result<Option<PathBuf>> {
    find_first_with_extension(dir, AUDIO_EXTENSIONS)
}

/// First cover image in `dir`, by file name
pub fn find_cover(dir: &Path) -> io::Result<Option<PathBuf>> {
    find_first_with_extension(dir, COVER_EXTENSIONS)
}

fn find_first_with_extension(dir: &Path, extensions: &[&str]) -> io::Result<Option<PathBuf>> {
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matched = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
            .unwrap_or(false);
        if matched {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("src");
        let ws = Workspace::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(ws.root(), root.as_path());
    }

    #[test]
    fn test_request_dir_name() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let dir = ws.create_request_dir(123, 1_700_000_000).unwrap();
        assert_eq!(dir.file_name().unwrap(), "user_123_1700000000");
        assert!(dir.is_dir());
    }

    #[test]
    fn test_same_second_requests_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let first = ws.create_request_dir(7, 100).unwrap();
        let second = ws.create_request_dir(7, 100).unwrap();
        let third = ws.create_request_dir(7, 100).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.file_name().unwrap(), "user_7_100_2");
        assert_eq!(third.file_name().unwrap(), "user_7_100_3");
    }

    #[test]
    fn test_find_audio_and_cover() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.mp3"), b"x").unwrap();
        std::fs::write(tmp.path().join("a.mp3"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(tmp.path().join("thumb.WEBP"), b"x").unwrap();

        assert_eq!(find_audio(tmp.path()).unwrap(), Some(tmp.path().join("a.mp3")));
        assert_eq!(find_cover(tmp.path()).unwrap(), Some(tmp.path().join("thumb.WEBP")));
    }

    #[test]
    fn test_find_in_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(find_audio(tmp.path()).unwrap().is_none());
        assert!(find_cover(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_clear_all_removes_dirs_and_files() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let dir = ws.create_request_dir(1, 1).unwrap();
        std::fs::write(dir.join("song.mp3"), b"x").unwrap();
        std::fs::write(tmp.path().join("stray.txt"), b"x").unwrap();

        assert_eq!(ws.clear_all().unwrap(), 2);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert!(ws.root().is_dir());
    }
}
