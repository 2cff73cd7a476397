//! Key-point cache schema (`content.json`).
//!
//! One cache file per theme, produced by `preprocess-pdfs` and consumed
//! read-only by the brief builder. The file is deliberately
//! human-editable: operators curate key points by hand between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extraction results for a single PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfEntry {
    pub filename: String,
    pub key_points: Vec<String>,
    pub word_count: usize,
    pub character_count: usize,
    pub pages_processed: usize,
}

/// Aggregated summary across all PDFs in the theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPointSummary {
    pub combined_key_points: Vec<String>,
    pub total_word_count: usize,
    pub total_character_count: usize,
    pub total_pdfs: usize,
}

/// The per-theme key-point cache.
///
/// When present and not forced stale, `summary.combined_key_points` is
/// authoritative over re-deriving points from raw PDF text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPointCache {
    pub theme: String,
    pub processed_at: DateTime<Utc>,
    #[serde(default)]
    pub pdfs: Vec<PdfEntry>,
    #[serde(default)]
    pub summary: KeyPointSummary,
}

impl KeyPointCache {
    /// File name of the cache within a theme directory.
    pub const FILE_NAME: &'static str = "content.json";

    /// Whether the cache carries any usable key points.
    pub fn has_key_points(&self) -> bool {
        !self.summary.combined_key_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip_matches_schema() {
        let json = r#"{
            "theme": "kombucha_benefits",
            "processed_at": "2026-01-10T12:00:00Z",
            "pdfs": [
                {
                    "filename": "study.pdf",
                    "key_points": ["Kombucha supports gut health."],
                    "word_count": 420,
                    "character_count": 2800,
                    "pages_processed": 10
                }
            ],
            "summary": {
                "combined_key_points": ["Kombucha supports gut health."],
                "total_word_count": 420,
                "total_character_count": 2800,
                "total_pdfs": 1
            }
        }"#;

        let cache: KeyPointCache = serde_json::from_str(json).unwrap();
        assert!(cache.has_key_points());
        assert_eq!(cache.pdfs[0].pages_processed, 10);
        assert_eq!(cache.summary.total_pdfs, 1);
    }

    #[test]
    fn test_cache_tolerates_missing_sections() {
        let json = r#"{"theme": "t", "processed_at": "2026-01-10T12:00:00Z"}"#;
        let cache: KeyPointCache = serde_json::from_str(json).unwrap();
        assert!(!cache.has_key_points());
    }
}
