//! Content generation pipeline.
//!
//! One `generate` call runs brief resolution, caption generation, rendering
//! into a private work directory, and the output writer, in that order.
//! Supplier failures degrade to the deterministic fallback caption; every
//! other failure is fatal to the invocation.

use std::path::PathBuf;

use rand::Rng;
use tracing::{info, warn};

use igc_caption::{fallback_caption, CaptionSupplier};
use igc_models::brief::clamp_chars;
use igc_models::{CaptionData, ContentBrief, ContentType, GenerationResult, OverlayWindow};

use crate::brief::{BriefBuilder, BriefRequest};
use crate::catalog::AssetCatalog;
use crate::config::Settings;
use crate::error::CoreResult;
use crate::output::OutputWriter;
use crate::pdf::PdfTextExtractor;
use crate::quotes::QuoteCollection;
use crate::render::MediaRenderer;

/// Character cap for the feed overlay line.
const FEED_OVERLAY_CHARS: usize = 100;
/// Character cap per reel overlay window.
const REEL_OVERLAY_CHARS: usize = 80;
/// Hard cap per clip slot when spacing reel overlays, seconds.
const MAX_CLIP_SECONDS: f64 = 10.0;

/// Quote window in a combined reel: early, while the opening clip plays.
const COMBINED_QUOTE_WINDOW: (f64, f64) = (1.0, 4.0);
/// Health-benefit window in a combined reel: after the quote clears.
const COMBINED_BENEFIT_WINDOW: (f64, f64) = (6.0, 5.0);

/// One generation request as received from the CLI or the batch runner.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub brief: BriefRequest,
    /// Background music for reels; `None` renders without audio.
    pub music: Option<PathBuf>,
    /// Combined reel: quote early in the timeline, health benefit later.
    pub combined: bool,
}

impl GenerateRequest {
    pub fn new(theme: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            brief: BriefRequest::new(theme, content_type),
            music: None,
            combined: false,
        }
    }
}

/// Space reel overlay windows evenly across the clip slots, one key point
/// per clip, each shown for at most five seconds.
pub fn reel_overlays(
    key_points: &[String],
    num_clips: usize,
    max_duration: f64,
) -> Vec<OverlayWindow> {
    if key_points.is_empty() || num_clips == 0 {
        return Vec::new();
    }
    let clip_duration = (max_duration / num_clips as f64).min(MAX_CLIP_SECONDS);
    key_points
        .iter()
        .take(num_clips)
        .enumerate()
        .map(|(i, point)| {
            OverlayWindow::new(
                clamp_chars(point, REEL_OVERLAY_CHARS),
                i as f64 * clip_duration,
                (clip_duration - 1.0).min(5.0),
            )
        })
        .collect()
}

/// Overlay plan for a combined reel: the quote first, then one health
/// benefit. Either window is dropped when its text is absent.
pub fn combined_overlays(quote: Option<&str>, benefit: Option<&str>) -> Vec<OverlayWindow> {
    let mut overlays = Vec::new();
    if let Some(quote) = quote {
        overlays.push(OverlayWindow::new(
            clamp_chars(quote, REEL_OVERLAY_CHARS),
            COMBINED_QUOTE_WINDOW.0,
            COMBINED_QUOTE_WINDOW.1,
        ));
    }
    if let Some(benefit) = benefit {
        overlays.push(OverlayWindow::new(
            clamp_chars(benefit, REEL_OVERLAY_CHARS),
            COMBINED_BENEFIT_WINDOW.0,
            COMBINED_BENEFIT_WINDOW.1,
        ));
    }
    overlays
}

/// The pipeline orchestrator. Owns its collaborators; the renderer,
/// supplier and PDF extractor are injected seams.
pub struct ContentGenerator {
    settings: Settings,
    catalog: AssetCatalog,
    quotes: QuoteCollection,
    renderer: Box<dyn MediaRenderer>,
    supplier: Option<Box<dyn CaptionSupplier>>,
    extractor: Box<dyn PdfTextExtractor>,
    writer: OutputWriter,
}

impl ContentGenerator {
    pub fn new(
        settings: Settings,
        renderer: Box<dyn MediaRenderer>,
        supplier: Option<Box<dyn CaptionSupplier>>,
        extractor: Box<dyn PdfTextExtractor>,
    ) -> CoreResult<Self> {
        let catalog = AssetCatalog::new(&settings.paths.assets_dir);
        let quotes = QuoteCollection::load(&catalog.quotes_file())?;
        let writer = OutputWriter::new(&settings.paths.output_dir);

        Ok(Self {
            settings,
            catalog,
            quotes,
            renderer,
            supplier,
            extractor,
            writer,
        })
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the full pipeline for one request.
    pub async fn generate<R: Rng>(
        &self,
        request: &GenerateRequest,
        rng: &mut R,
    ) -> CoreResult<GenerationResult> {
        let builder = BriefBuilder::new(
            &self.catalog,
            &self.settings,
            self.extractor.as_ref(),
            &self.quotes,
        );
        let mut brief_request = request.brief.clone();
        if request.combined {
            brief_request.use_quote = true;
        }
        let brief = builder
            .build(&brief_request, self.supplier.as_deref(), rng)
            .await?;

        info!(
            theme = %brief.theme,
            content_type = %brief.content_type,
            assets = brief.assets.len(),
            "brief resolved"
        );

        let caption = self.caption_for(&brief).await;

        let workdir = tempfile::tempdir()?;
        let rendered = workdir
            .path()
            .join(format!("render.{}", brief.content_type.media_extension()));

        match brief.content_type {
            ContentType::Feed => {
                let overlay = brief.overlay_text(FEED_OVERLAY_CHARS);
                self.renderer
                    .render_feed(&brief.assets[0].path, overlay.as_deref(), &rendered)
                    .await?;
            }
            ContentType::Reel => {
                let clips: Vec<PathBuf> = brief.assets.iter().map(|a| a.path.clone()).collect();
                let overlays = if request.combined {
                    combined_overlays(brief.quote.as_deref(), brief.key_points.first().map(String::as_str))
                } else {
                    reel_overlays(
                        &brief.key_points,
                        clips.len(),
                        self.settings.instagram.reel_duration.max,
                    )
                };
                self.renderer
                    .render_reel(&clips, &overlays, request.music.as_deref(), &rendered)
                    .await?;
            }
        }

        self.writer.write(&rendered, &brief, &caption).await
    }

    /// Caption via the supplier when one is configured; the supplier already
    /// retries once internally, so a failure here degrades to the fallback.
    async fn caption_for(&self, brief: &ContentBrief) -> CaptionData {
        match &self.supplier {
            Some(supplier) => match supplier.generate(brief).await {
                Ok(caption) => caption,
                Err(e) => {
                    warn!(theme = %brief.theme, error = %e, "caption supplier failed, using fallback caption");
                    fallback_caption(brief)
                }
            },
            None => fallback_caption(brief),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Point number {i}.")).collect()
    }

    #[test]
    fn test_reel_overlays_are_spaced_per_clip() {
        let overlays = reel_overlays(&points(3), 3, 90.0);
        assert_eq!(overlays.len(), 3);
        // 90s / 3 clips capped at 10s per clip
        assert!((overlays[1].start - 10.0).abs() < 1e-9);
        assert!((overlays[0].duration - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reel_overlays_never_outnumber_clips() {
        let overlays = reel_overlays(&points(10), 2, 90.0);
        assert_eq!(overlays.len(), 2);
    }

    #[test]
    fn test_no_key_points_means_no_overlays() {
        assert!(reel_overlays(&[], 3, 90.0).is_empty());
    }

    #[test]
    fn test_combined_overlays_order_and_windows() {
        let overlays = combined_overlays(Some("A quote"), Some("A benefit"));
        assert_eq!(overlays.len(), 2);
        assert!(overlays[0].start < overlays[1].start);
        assert!(overlays[0].end() <= overlays[1].start);
    }

    #[test]
    fn test_combined_overlays_tolerate_missing_text() {
        assert_eq!(combined_overlays(None, Some("b")).len(), 1);
        assert!(combined_overlays(None, None).is_empty());
    }

    #[test]
    fn test_overlay_text_is_clamped() {
        let long = vec!["x".repeat(400)];
        let overlays = reel_overlays(&long, 1, 90.0);
        assert_eq!(overlays[0].text.chars().count(), REEL_OVERLAY_CHARS);
    }
}
