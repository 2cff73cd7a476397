//! Renderer seam between orchestration and FFmpeg.
//!
//! The generator talks to [`MediaRenderer`]; production wires in the
//! FFmpeg-backed implementation, integration tests substitute fakes that
//! write marker files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use igc_media::{render_feed_image, render_reel, FeedSpec, ReelSpec, TextStyle};
use igc_models::OverlayWindow;

use crate::config::Settings;
use crate::error::CoreResult;

/// Renders briefs into media files at caller-supplied paths.
#[async_trait]
pub trait MediaRenderer: Send + Sync {
    /// Compose a feed image from `source` into `output`.
    async fn render_feed(
        &self,
        source: &Path,
        overlay_text: Option<&str>,
        output: &Path,
    ) -> CoreResult<()>;

    /// Assemble a reel from `clips` into `output`.
    async fn render_reel(
        &self,
        clips: &[PathBuf],
        overlays: &[OverlayWindow],
        music: Option<&Path>,
        output: &Path,
    ) -> CoreResult<()>;
}

/// FFmpeg-backed renderer configured from the settings file.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    feed_spec: FeedSpec,
    reel_spec: ReelSpec,
}

impl FfmpegRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        let brand = &settings.brand;
        let instagram = &settings.instagram;

        let text_style = TextStyle {
            font_file: brand.fonts.font_file.clone(),
            ..TextStyle::default()
        };

        let feed_spec = FeedSpec {
            width: instagram.feed_dimensions.width,
            height: instagram.feed_dimensions.height,
            background: brand.colors.background.clone(),
            text_style: text_style.clone(),
            ..FeedSpec::default()
        };

        let reel_spec = ReelSpec {
            width: instagram.reel_dimensions.width,
            height: instagram.reel_dimensions.height,
            min_duration: instagram.reel_duration.min,
            max_duration: instagram.reel_duration.max,
            text_style: TextStyle {
                font_size: 60,
                ..text_style
            },
            ..ReelSpec::default()
        };

        Self {
            feed_spec,
            reel_spec,
        }
    }

    pub fn reel_spec(&self) -> &ReelSpec {
        &self.reel_spec
    }
}

#[async_trait]
impl MediaRenderer for FfmpegRenderer {
    async fn render_feed(
        &self,
        source: &Path,
        overlay_text: Option<&str>,
        output: &Path,
    ) -> CoreResult<()> {
        render_feed_image(source, output, overlay_text, &self.feed_spec).await?;
        Ok(())
    }

    async fn render_reel(
        &self,
        clips: &[PathBuf],
        overlays: &[OverlayWindow],
        music: Option<&Path>,
        output: &Path,
    ) -> CoreResult<()> {
        render_reel(clips, output, overlays, music, &self.reel_spec).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_follow_settings() {
        let mut settings = Settings::default();
        settings.brand.colors.background = "#101010".to_string();
        settings.instagram.reel_duration.max = 60.0;

        let renderer = FfmpegRenderer::from_settings(&settings);
        assert_eq!(renderer.feed_spec.background, "#101010");
        assert!((renderer.reel_spec.max_duration - 60.0).abs() < f64::EPSILON);
        assert_eq!(renderer.reel_spec.width, 1080);
    }
}
