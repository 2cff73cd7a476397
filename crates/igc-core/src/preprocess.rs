//! PDF preprocessing: produces the per-theme `content.json` cache.
//!
//! The cache is deliberately human-editable; operators curate key points
//! between runs, and an existing cache is only rewritten with `--force`.

use chrono::Utc;
use tracing::{info, warn};

use igc_caption::CaptionSupplier;
use igc_models::{AssetKind, KeyPointCache, KeyPointSummary, PdfEntry};

use crate::catalog::AssetCatalog;
use crate::error::{CoreError, CoreResult};
use crate::pdf::{extract_key_points, PdfTextExtractor, DEFAULT_MAX_PAGES, DEFAULT_MAX_POINTS};

#[derive(Debug, Clone, Copy)]
pub struct PreprocessOptions {
    /// Page cap per PDF.
    pub max_pages: usize,
    /// Key points kept per PDF.
    pub max_points: usize,
    /// Rewrite an existing cache.
    pub force: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_points: DEFAULT_MAX_POINTS,
            force: false,
        }
    }
}

/// Result of preprocessing one theme.
#[derive(Debug, Clone)]
pub enum PreprocessOutcome {
    /// Cache written (or rewritten with `force`).
    Written(KeyPointCache),
    /// An existing cache was left untouched.
    Existing(KeyPointCache),
    /// The theme has no PDFs with extractable text.
    NoPdfText,
}

/// Preprocess one theme's PDFs into `content.json`.
///
/// `supplier` refines raw key points into audience-friendly sentences;
/// refinement failure degrades to the raw points with a warning.
pub async fn preprocess_theme(
    catalog: &AssetCatalog,
    extractor: &dyn PdfTextExtractor,
    supplier: Option<&dyn CaptionSupplier>,
    theme: &str,
    options: &PreprocessOptions,
) -> CoreResult<PreprocessOutcome> {
    catalog.require_theme(theme)?;

    if !options.force {
        if let Some(existing) = catalog.load_cache(theme)? {
            info!(%theme, "cache already exists, leaving it untouched");
            return Ok(PreprocessOutcome::Existing(existing));
        }
    }

    let pdfs = catalog.assets_for(theme, AssetKind::Pdf)?;
    if pdfs.is_empty() {
        return Ok(PreprocessOutcome::NoPdfText);
    }

    info!(%theme, pdfs = pdfs.len(), "preprocessing theme PDFs");

    let mut entries: Vec<PdfEntry> = Vec::new();
    let mut combined_text_parts: Vec<String> = Vec::new();
    let mut total_word_count = 0;
    let mut total_character_count = 0;

    for pdf in &pdfs {
        let text = match extractor.extract_text(&pdf.path, options.max_pages) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(path = %pdf.path.display(), "no text extracted, skipping");
                continue;
            }
            Err(e) => {
                warn!(path = %pdf.path.display(), error = %e, "extraction failed, skipping");
                continue;
            }
        };

        let raw_points = extract_key_points(&text, options.max_points);
        let key_points = refine(supplier, &raw_points, theme, options.max_points).await;

        let word_count = text.split_whitespace().count();
        let character_count = text.chars().count();
        total_word_count += word_count;
        total_character_count += character_count;

        let filename = pdf
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        entries.push(PdfEntry {
            filename,
            key_points,
            word_count,
            character_count,
            pages_processed: options.max_pages,
        });
        combined_text_parts.push(text);
    }

    if entries.is_empty() {
        return Ok(PreprocessOutcome::NoPdfText);
    }

    // Summary points come from the combined text so cross-PDF ranking holds.
    let combined_text = combined_text_parts.join("\n\n---\n\n");
    let raw_summary = extract_key_points(&combined_text, options.max_points * entries.len());
    let combined_key_points =
        refine(supplier, &raw_summary, theme, options.max_points * entries.len()).await;

    let cache = KeyPointCache {
        theme: theme.to_string(),
        processed_at: Utc::now(),
        summary: KeyPointSummary {
            combined_key_points,
            total_word_count,
            total_character_count,
            total_pdfs: entries.len(),
        },
        pdfs: entries,
    };

    let path = catalog.cache_path(theme);
    let json = serde_json::to_string_pretty(&cache)?;
    std::fs::write(&path, json).map_err(|e| CoreError::write_failed(&path, e.to_string()))?;
    info!(%theme, path = %path.display(), points = cache.summary.combined_key_points.len(), "cache written");

    Ok(PreprocessOutcome::Written(cache))
}

async fn refine(
    supplier: Option<&dyn CaptionSupplier>,
    raw: &[String],
    theme: &str,
    max_points: usize,
) -> Vec<String> {
    if let Some(supplier) = supplier {
        match supplier.refine_key_points(raw, theme).await {
            Ok(refined) if !refined.is_empty() => return truncated(refined, max_points),
            Ok(_) => {}
            Err(e) => {
                warn!(%theme, error = %e, "LLM refinement failed, keeping raw key points");
            }
        }
    }
    truncated(raw.to_vec(), max_points)
}

fn truncated(mut points: Vec<String>, max_points: usize) -> Vec<String> {
    points.truncate(max_points);
    points
}
