//! Asset references.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Video,
    Pdf,
    Music,
}

impl AssetKind {
    /// File extensions accepted for this kind (lowercase, without dot).
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Image => &["jpg", "jpeg", "png", "webp"],
            AssetKind::Video => &["mp4", "mov", "avi", "mkv"],
            AssetKind::Pdf => &["pdf"],
            AssetKind::Music => &["mp3"],
        }
    }

    /// Whether `path` has an extension accepted for this kind.
    /// Extension match is case-insensitive.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let lower = e.to_ascii_lowercase();
                self.extensions().contains(&lower.as_str())
            })
            .unwrap_or(false)
    }

    /// Subdirectory name for this kind within a theme directory.
    pub fn theme_subdir(&self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::Video => "videos",
            AssetKind::Pdf => "pdfs",
            AssetKind::Music => "music",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Pdf => "pdf",
            AssetKind::Music => "music",
        };
        write!(f, "{}", s)
    }
}

/// A path plus a kind tag. Source assets are never mutated; the reference
/// only promises the file existed at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub path: PathBuf,
    pub kind: AssetKind,
}

impl AssetRef {
    pub fn new(path: impl Into<PathBuf>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(AssetKind::Image.matches(Path::new("a/b/photo.JPG")));
        assert!(AssetKind::Video.matches(Path::new("clip.Mp4")));
        assert!(!AssetKind::Image.matches(Path::new("clip.mp4")));
        assert!(!AssetKind::Pdf.matches(Path::new("noext")));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AssetKind::Pdf).unwrap(), "\"pdf\"");
    }
}
