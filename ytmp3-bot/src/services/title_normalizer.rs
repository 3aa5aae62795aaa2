//! Video title cleanup
//!
//! Strips promotional annotations such as "(Official Video)" or
//! "[Remastered 2020]" from a video title while keeping featured-artist
//! credits like "(feat. Someone)".
//!
//! Steps:
//! 1. Collect feat annotations from the raw title, in order of appearance
//! 2. Remove noise parentheticals and every square-bracketed group
//! 3. Collapse whitespace and trim
//! 4. Re-append any collected feat annotation no longer present

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that mark a parenthetical as noise (case-insensitive, substring)
pub const NOISE_KEYWORDS: &[&str] = &[
    "audio", "official", "video", "from", "movie", "lyric", "version",
];

static FEAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\((?:ft\.|feat\.|featuring)[^)]*\)").expect("feat pattern is valid")
});

static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let mut patterns: Vec<Regex> = NOISE_KEYWORDS
        .iter()
        .map(|word| {
            Regex::new(&format!(r"(?i)\([^)]*{}[^)]*\)", regex::escape(word)))
                .expect("noise pattern is valid")
        })
        .collect();
    patterns.push(Regex::new(r"\[[^\]]*\]").expect("bracket pattern is valid"));
    patterns
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Featured-artist annotations in `title`, verbatim, in order of appearance
pub fn feat_annotations(title: &str) -> Vec<&str> {
    FEAT_PATTERN.find_iter(title).map(|m| m.as_str()).collect()
}

/// Clean a raw video title
///
/// Deterministic and side-effect free.
pub fn normalize_title(raw: &str) -> String {
    let feats = feat_annotations(raw);

    let mut cleaned = raw.to_string();
    for pattern in NOISE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let mut cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();

    for feat in feats {
        if !cleaned.contains(feat) {
            if !cleaned.is_empty() {
                cleaned.push(' ');
            }
            cleaned.push_str(feat);
        }
    }

    cleaned
}
