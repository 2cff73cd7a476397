//! FFmpeg progress parsing.

use serde::{Deserialize, Serialize};

/// Progress information from FFmpeg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegProgress {
    /// Current frame number
    pub frame: u64,
    /// Current FPS
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Output time as string (HH:MM:SS.microseconds)
    pub out_time: String,
    /// Encoding speed (e.g. 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Progress percentage given total duration in milliseconds.
    pub fn percentage(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 {
            return 0.0;
        }
        ((self.out_time_ms as f64 / total_duration_ms as f64) * 100.0).min(100.0)
    }
}

/// Parse a line from FFmpeg's `-progress pipe:2` output.
///
/// Returns an updated snapshot when the line completes a progress block
/// (`progress=continue` / `progress=end`), `None` for intermediate keys and
/// non-progress stderr lines.
pub(crate) fn parse_progress_line(
    line: &str,
    current: &mut FfmpegProgress,
) -> Option<FfmpegProgress> {
    let line = line.trim();
    let (key, value) = line.split_once('=')?;

    match key {
        "out_time_ms" | "out_time_us" => {
            // Both keys are reported in microseconds by modern FFmpeg
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
            None
        }
        "out_time" => {
            current.out_time = value.to_string();
            None
        }
        "frame" => {
            if let Ok(frame) = value.parse() {
                current.frame = frame;
            }
            None
        }
        "fps" => {
            if let Ok(fps) = value.parse() {
                current.fps = fps;
            }
            None
        }
        "speed" => {
            if let Ok(speed) = value.trim_end_matches('x').parse() {
                current.speed = speed;
            }
            None
        }
        "progress" => {
            current.is_complete = value == "end";
            Some(current.clone())
        }
        _ => None,
    }
}
