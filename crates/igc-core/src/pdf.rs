//! PDF text extraction and key-point scoring.

use std::path::Path;

use lopdf::Document;
use tracing::warn;

use crate::error::{CoreError, CoreResult};

/// Default page cap per PDF; research papers front-load their findings.
pub const DEFAULT_MAX_PAGES: usize = 10;
/// Default key points kept per PDF.
pub const DEFAULT_MAX_POINTS: usize = 10;

/// Sentences containing these score higher during key-point selection.
const SCORING_KEYWORDS: &[&str] = &[
    "kombucha",
    "benefit",
    "health",
    "probiotic",
    "antioxidant",
    "research",
    "study",
    "scientific",
    "improve",
    "reduce",
    "digest",
    "immune",
    "gut",
    "bacteria",
];

/// Source of raw PDF text. Injectable so the pipeline is testable without
/// real PDF fixtures.
pub trait PdfTextExtractor: Send + Sync {
    /// Extract text from the first `max_pages` pages of `path`.
    fn extract_text(&self, path: &Path, max_pages: usize) -> CoreResult<String>;
}

/// `lopdf`-backed extractor used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path, max_pages: usize) -> CoreResult<String> {
        let doc = Document::load(path)
            .map_err(|e| CoreError::pdf_failed(path, format!("failed to open: {e}")))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().take(max_pages).collect();

        let mut chunks = Vec::with_capacity(page_numbers.len());
        for page in page_numbers {
            match doc.extract_text(&[page]) {
                Ok(text) if !text.trim().is_empty() => chunks.push(text),
                Ok(_) => {}
                Err(e) => {
                    // Scanned or malformed pages are common; keep what we have.
                    warn!(path = %path.display(), page, error = %e, "skipping unreadable PDF page");
                }
            }
        }

        Ok(chunks.join("\n\n"))
    }
}

/// Score sentences by domain keyword hits and keep the best `max_points`,
/// padding with unscored sentences when there are not enough hits.
pub fn extract_key_points(text: &str, max_points: usize) -> Vec<String> {
    let sentences: Vec<String> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > 20)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let mut scored: Vec<(usize, &String)> = sentences
        .iter()
        .filter_map(|sentence| {
            let lower = sentence.to_lowercase();
            let score = SCORING_KEYWORDS.iter().filter(|k| lower.contains(**k)).count();
            (score > 0).then_some((score, sentence))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut key_points: Vec<String> = scored
        .into_iter()
        .take(max_points)
        .map(|(_, s)| s.clone())
        .collect();

    if key_points.len() < max_points {
        for sentence in &sentences {
            if key_points.len() >= max_points {
                break;
            }
            if !key_points.contains(sentence) {
                key_points.push(sentence.clone());
            }
        }
    }

    key_points
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Kombucha is rich in probiotic bacteria that support gut health. \
        The weather was mild on Tuesday afternoon in the valley. \
        A recent research study found kombucha may improve digestive and immune function. \
        Short one. \
        Another sentence without any of the special vocabulary at all here.";

    #[test]
    fn test_keyword_sentences_rank_first() {
        let points = extract_key_points(SAMPLE, 2);
        assert_eq!(points.len(), 2);
        // Highest keyword density leads.
        assert!(points[0].contains("study"));
        assert!(points[1].contains("probiotic"));
    }

    #[test]
    fn test_pads_with_unscored_sentences() {
        let points = extract_key_points(SAMPLE, 4);
        assert_eq!(points.len(), 4);
        assert!(points.iter().any(|p| p.contains("weather")));
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        let points = extract_key_points("Tiny. Also small bits.", 5);
        assert!(points.is_empty());
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let points = extract_key_points("Kombucha   supports\n gut    health every single day.", 1);
        assert_eq!(points[0], "Kombucha supports gut health every single day");
    }
}
