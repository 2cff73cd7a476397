//! Feed image composition.
//!
//! A feed post is a single FFmpeg pass over one source image: fit into the
//! target square, pad with the brand background color, and draw the
//! overlay text in a semi-transparent box.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::filters::{filter_drawtext, filter_fit_pad, TextPosition, TextStyle};
use crate::probe::probe_media;

/// Target geometry and styling for a feed image.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub width: u32,
    pub height: u32,
    /// Background color for padding, `#rrggbb`.
    pub background: String,
    pub text_style: TextStyle,
    /// Timeout for the FFmpeg pass, seconds.
    pub timeout_secs: u64,
}

impl Default for FeedSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            background: "#ffffff".to_string(),
            text_style: TextStyle::default(),
            timeout_secs: 60,
        }
    }
}

impl FeedSpec {
    /// drawtext wrap width derived from frame width and font size.
    fn wrap_chars(&self) -> usize {
        ((self.width as usize).saturating_sub(120) / (self.text_style.font_size as usize / 2))
            .max(8)
    }
}

/// Compose a feed image from `source` into `output`.
///
/// The source is never upscale-cropped; mismatched aspect ratios are
/// letterboxed onto the brand background. Undecodable sources are rejected
/// by a probe before FFmpeg runs.
pub async fn render_feed_image(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    overlay_text: Option<&str>,
    spec: &FeedSpec,
) -> MediaResult<()> {
    let source = source.as_ref();
    let output = output.as_ref();

    // Undecodable sources fail here, before FFmpeg runs.
    probe_media(source).await?;

    info!(
        "Composing feed image: {} -> {} ({}x{})",
        source.display(),
        output.display(),
        spec.width,
        spec.height
    );

    let mut filter = filter_fit_pad(spec.width, spec.height, &spec.background);
    if let Some(text) = overlay_text {
        let drawtext = filter_drawtext(
            text,
            &spec.text_style,
            TextPosition::Bottom,
            spec.wrap_chars(),
            None,
        );
        filter = format!("{},{}", filter, drawtext);
    }

    let cmd = FfmpegCommand::new(source, output)
        .video_filter(filter)
        .single_frame()
        .image_quality(2);

    FfmpegRunner::new()
        .with_timeout(spec.timeout_secs)
        .run(&cmd)
        .await?;

    info!("Feed image written: {}", output.display());
    Ok(())
}
