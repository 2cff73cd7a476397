//! Reel assembly.
//!
//! A reel is a single FFmpeg pass: each selected clip is read for its slot
//! duration, scaled and centre-cropped to the vertical frame, concatenated,
//! then overlay text windows are drawn and music is mixed in. Music is
//! looped with `-stream_loop -1` and bounded by `-shortest` plus the output
//! duration, so it never outlasts the video.

use std::path::{Path, PathBuf};
use tracing::info;

use igc_models::OverlayWindow;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{filter_drawtext, filter_portrait_fill, TextPosition, TextStyle};
use crate::probe::probe_media;

/// Target geometry, duration envelope and styling for a reel.
#[derive(Debug, Clone)]
pub struct ReelSpec {
    pub width: u32,
    pub height: u32,
    /// Duration envelope in seconds.
    pub min_duration: f64,
    pub max_duration: f64,
    /// Hard cap per clip slot, seconds.
    pub max_clip_duration: f64,
    pub fps: u32,
    /// Music volume relative to full scale.
    pub music_volume: f32,
    pub text_style: TextStyle,
    /// Timeout for the FFmpeg pass, seconds.
    pub timeout_secs: u64,
}

impl Default for ReelSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            min_duration: 15.0,
            max_duration: 90.0,
            max_clip_duration: 10.0,
            fps: 30,
            music_volume: 0.3,
            text_style: TextStyle {
                font_size: 60,
                ..TextStyle::default()
            },
            timeout_secs: 600,
        }
    }
}

impl ReelSpec {
    fn wrap_chars(&self) -> usize {
        ((self.width as usize).saturating_sub(100) / (self.text_style.font_size as usize / 2))
            .max(8)
    }
}

/// One clip slot in the assembly plan.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClipSlot {
    pub path: PathBuf,
    pub duration: f64,
}

/// Distribute the duration envelope across clips.
///
/// First pass spreads the remaining envelope evenly over the remaining
/// clips, capped per clip. If the result is shorter than the envelope
/// minimum, clips are repeated cyclically until the minimum is reached.
pub(crate) fn plan_slots(clips: &[PathBuf], spec: &ReelSpec) -> Vec<ClipSlot> {
    let mut slots: Vec<ClipSlot> = Vec::new();
    let mut total = 0.0_f64;

    for (i, clip) in clips.iter().enumerate() {
        let remaining = spec.max_duration - total;
        if remaining <= 0.0 {
            break;
        }
        let duration = (remaining / (clips.len() - i) as f64).min(spec.max_clip_duration);
        slots.push(ClipSlot {
            path: clip.clone(),
            duration,
        });
        total += duration;
    }

    // Loop to reach the envelope minimum
    let mut i = 0;
    while total < spec.min_duration && !clips.is_empty() {
        let duration = (spec.min_duration - total).min(spec.max_clip_duration);
        slots.push(ClipSlot {
            path: clips[i % clips.len()].clone(),
            duration,
        });
        total += duration;
        i += 1;
    }

    slots
}

/// Total planned duration, clamped to the envelope maximum.
pub(crate) fn planned_duration(slots: &[ClipSlot], spec: &ReelSpec) -> f64 {
    slots
        .iter()
        .map(|s| s.duration)
        .sum::<f64>()
        .min(spec.max_duration)
}

/// Assemble a reel from `clips` into `output`.
///
/// Overlay windows past the final duration are dropped; windows crossing
/// the end are truncated to it.
pub async fn render_reel(
    clips: &[PathBuf],
    output: impl AsRef<Path>,
    overlays: &[OverlayWindow],
    music: Option<&Path>,
    spec: &ReelSpec,
) -> MediaResult<()> {
    let output = output.as_ref();

    if clips.is_empty() {
        return Err(MediaError::invalid_media("At least one clip is required"));
    }

    // Reject undecodable sources before the single FFmpeg pass. Clips may
    // repeat when the pool is short; probe each path once.
    let mut probed: Vec<&Path> = Vec::new();
    for clip in clips {
        if !probed.contains(&clip.as_path()) {
            probe_media(clip).await?;
            probed.push(clip.as_path());
        }
    }

    let slots = plan_slots(clips, spec);
    let total = planned_duration(&slots, spec);

    info!(
        "Assembling reel: {} slot(s), {:.1}s -> {}",
        slots.len(),
        total,
        output.display()
    );

    // First input seeds the command; remaining slots and music follow.
    let mut cmd = FfmpegCommand::new(&slots[0].path, output).input_duration(slots[0].duration);
    for slot in &slots[1..] {
        cmd = cmd.input(&slot.path).input_duration(slot.duration);
    }

    let music_index = if let Some(music) = music {
        cmd = cmd.input(music).loop_input();
        Some(slots.len())
    } else {
        None
    };

    let mut graph: Vec<String> = Vec::new();
    for (i, _) in slots.iter().enumerate() {
        graph.push(format!(
            "[{i}:v]{},setsar=1,fps={}[v{i}]",
            filter_portrait_fill(spec.width, spec.height),
            spec.fps
        ));
    }

    let concat_inputs: String = (0..slots.len()).map(|i| format!("[v{i}]")).collect();
    let mut chain = format!(
        "{}concat=n={}:v=1:a=0,format=yuv420p",
        concat_inputs,
        slots.len()
    );
    for overlay in overlays {
        if overlay.start >= total {
            continue;
        }
        let end = overlay.end().min(total);
        chain.push(',');
        chain.push_str(&filter_drawtext(
            &overlay.text,
            &spec.text_style,
            TextPosition::Bottom,
            spec.wrap_chars(),
            Some((overlay.start, end)),
        ));
    }
    graph.push(format!("{}[vout]", chain));

    if let Some(idx) = music_index {
        graph.push(format!(
            "[{idx}:a]volume={:.2}[aout]",
            spec.music_volume
        ));
    }

    cmd = cmd
        .filter_complex(graph.join(";"))
        .map("[vout]")
        .video_codec("libx264")
        .preset("medium")
        .crf(20)
        .duration(total);

    if music_index.is_some() {
        cmd = cmd.map("[aout]").audio_codec("aac").shortest();
    }

    FfmpegRunner::new()
        .with_timeout(spec.timeout_secs)
        .run(&cmd)
        .await?;

    info!("Reel written: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_slots_capped_per_clip() {
        let spec = ReelSpec::default();
        let slots = plan_slots(&paths(&["a.mp4", "b.mp4", "c.mp4"]), &spec);
        assert_eq!(slots.len(), 3);
        for slot in &slots {
            assert!(slot.duration <= spec.max_clip_duration + 1e-9);
        }
        // 3 clips at 10s each already clear the 15s minimum
        assert!((planned_duration(&slots, &spec) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_short_pool_loops_to_minimum() {
        let spec = ReelSpec::default();
        let slots = plan_slots(&paths(&["a.mp4"]), &spec);
        let total: f64 = slots.iter().map(|s| s.duration).sum();
        assert!(total >= spec.min_duration - 1e-9);
        // Looping reuses the same clip
        assert!(slots.iter().all(|s| s.path == PathBuf::from("a.mp4")));
    }

    #[test]
    fn test_total_never_exceeds_maximum() {
        let spec = ReelSpec {
            max_duration: 25.0,
            ..ReelSpec::default()
        };
        let many: Vec<PathBuf> = (0..40).map(|i| PathBuf::from(format!("c{i}.mp4"))).collect();
        let slots = plan_slots(&many, &spec);
        assert!(planned_duration(&slots, &spec) <= 25.0 + 1e-9);
    }

    #[tokio::test]
    async fn test_empty_clip_list_rejected() {
        let err = render_reel(&[], "out.mp4", &[], None, &ReelSpec::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidMedia(_)));
    }

    #[tokio::test]
    async fn test_missing_clip_rejected_before_assembly() {
        let clips = vec![PathBuf::from("/nonexistent/clip.mp4")];
        let err = render_reel(&clips, "out.mp4", &[], None, &ReelSpec::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
