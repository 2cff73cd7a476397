//! Batch generation.
//!
//! Runs a sequence of feed and reel generations over randomly picked
//! themes. Items are strictly isolated: every error is caught, recorded
//! with its reason, and the run continues. The summary is the authoritative
//! record of the run.

use std::path::PathBuf;

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::{error, info};

use igc_models::{BatchItem, BatchSummary, ContentType, ItemOutcome};

use crate::error::{CoreError, CoreResult};
use crate::generator::{ContentGenerator, GenerateRequest};

/// Parameters for one batch run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub feeds: usize,
    pub reels: usize,
    /// Themes to draw from; empty means every theme in the catalog.
    pub themes: Vec<String>,
    /// Music pinned for every reel; `None` picks a random track per reel.
    pub music: Option<PathBuf>,
    pub use_quote: bool,
    pub llm_refine: bool,
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self {
            feeds: 3,
            reels: 3,
            themes: Vec::new(),
            music: None,
            use_quote: true,
            llm_refine: true,
        }
    }
}

/// Run a batch. Fails fast only when no theme is available at all;
/// everything after that is per-item.
pub async fn run_batch<R: Rng>(
    generator: &ContentGenerator,
    request: &BatchRequest,
    rng: &mut R,
) -> CoreResult<BatchSummary> {
    let themes = if request.themes.is_empty() {
        generator.catalog().list_themes()
    } else {
        request.themes.clone()
    };
    if themes.is_empty() {
        return Err(CoreError::config(
            "No themes available for batch generation",
        ));
    }

    info!(
        feeds = request.feeds,
        reels = request.reels,
        themes = themes.len(),
        "starting batch"
    );

    let mut summary = BatchSummary::default();
    let mut index = 0;

    for _ in 0..request.feeds {
        let theme = pick(&themes, rng);
        let item = run_item(generator, request, theme, ContentType::Feed, index, rng).await;
        summary.push(item);
        index += 1;
    }

    for _ in 0..request.reels {
        let theme = pick(&themes, rng);
        let item = run_item(generator, request, theme, ContentType::Reel, index, rng).await;
        summary.push(item);
        index += 1;
    }

    Ok(summary)
}

fn pick<R: Rng>(themes: &[String], rng: &mut R) -> String {
    themes
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| themes[0].clone())
}

async fn run_item<R: Rng>(
    generator: &ContentGenerator,
    request: &BatchRequest,
    theme: String,
    content_type: ContentType,
    index: usize,
    rng: &mut R,
) -> BatchItem {
    info!(index, %theme, %content_type, "batch item selected");

    let mut gen_request = GenerateRequest::new(theme.clone(), content_type);
    gen_request.brief.use_quote = request.use_quote;
    gen_request.brief.llm_refine = request.llm_refine;

    if content_type == ContentType::Reel {
        // Batch reels are combined reels with music.
        gen_request.combined = true;
        gen_request.music = request.music.clone().or_else(|| {
            generator
                .catalog()
                .music_tracks()
                .choose(rng)
                .map(|t| t.path.clone())
        });
    }

    let outcome = match generator.generate(&gen_request, rng).await {
        Ok(result) => {
            info!(index, media = %result.output_media.display(), "batch item written");
            ItemOutcome::Written { result }
        }
        Err(e) => {
            error!(index, %theme, error = %e, "batch item failed");
            ItemOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    BatchItem {
        index,
        theme,
        content_type,
        outcome,
    }
}

/// Render the human-readable batch report printed by the CLI.
pub fn format_summary(summary: &BatchSummary) -> String {
    let (feed_ok, feed_total) = summary.counts_for(ContentType::Feed);
    let (reel_ok, reel_total) = summary.counts_for(ContentType::Reel);

    let mut out = String::new();
    out.push_str("Batch Generation Complete\n");
    out.push_str(&format!("Feed posts: {feed_ok}/{feed_total} successful\n"));
    out.push_str(&format!("Reels: {reel_ok}/{reel_total} successful\n"));

    let failures = summary.failure_reasons();
    if !failures.is_empty() {
        out.push_str("Failures:\n");
        for (index, reason) in failures {
            out.push_str(&format!("  [{index}] {reason}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use igc_models::GenerationResult;

    fn item(index: usize, content_type: ContentType, ok: bool) -> BatchItem {
        BatchItem {
            index,
            theme: "gut_health".into(),
            content_type,
            outcome: if ok {
                ItemOutcome::Written {
                    result: GenerationResult {
                        theme: "gut_health".into(),
                        content_type,
                        generated_at: chrono::Utc::now(),
                        sources: vec![],
                        output_media: "m".into(),
                        caption_file: "c".into(),
                        metadata_file: "d".into(),
                    },
                }
            } else {
                ItemOutcome::Failed {
                    reason: "renderer exploded".into(),
                }
            },
        }
    }

    #[test]
    fn test_summary_report_counts_and_reasons() {
        let mut summary = BatchSummary::default();
        summary.push(item(0, ContentType::Feed, true));
        summary.push(item(1, ContentType::Feed, true));
        summary.push(item(2, ContentType::Reel, false));

        let report = format_summary(&summary);
        assert!(report.contains("Feed posts: 2/2 successful"));
        assert!(report.contains("Reels: 0/1 successful"));
        assert!(report.contains("[2] renderer exploded"));
    }

    #[test]
    fn test_clean_report_has_no_failure_section() {
        let mut summary = BatchSummary::default();
        summary.push(item(0, ContentType::Feed, true));
        assert!(!format_summary(&summary).contains("Failures"));
    }
}
