//! FFmpeg filter builders for feed and reel composition.

use std::path::PathBuf;

/// Brand text styling applied to drawtext overlays.
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Optional font file; FFmpeg falls back to its default font when None.
    pub font_file: Option<PathBuf>,
    pub font_size: u32,
    /// Text color as `#rrggbb`.
    pub font_color: String,
    /// Box color as `#rrggbb`.
    pub box_color: String,
    /// Box opacity, 0.0..=1.0.
    pub box_opacity: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_file: None,
            font_size: 48,
            font_color: "#333333".to_string(),
            box_color: "#ffffff".to_string(),
            box_opacity: 0.78,
        }
    }
}

/// Vertical placement of a text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPosition {
    Top,
    Center,
    Bottom,
}

impl TextPosition {
    /// drawtext `y` expression for this position.
    fn y_expr(&self, padding: u32) -> String {
        match self {
            TextPosition::Top => format!("{}", padding),
            TextPosition::Center => "(h-text_h)/2".to_string(),
            TextPosition::Bottom => format!("h-text_h-{}", padding),
        }
    }
}

/// Convert `#rrggbb` (or `rrggbb`) to FFmpeg's `0xRRGGBB` form.
pub fn ffmpeg_color(hex: &str) -> String {
    format!("0x{}", hex.trim_start_matches('#'))
}

/// Fit a frame into `w`x`h` and pad the remainder with `background`
/// (letterbox, centred; never an upscaling crop).
pub fn filter_fit_pad(w: u32, h: u32, background: &str) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color={}",
        ffmpeg_color(background)
    )
}

/// Fill a portrait frame: scale up to cover, then centre-crop.
pub fn filter_portrait_fill(w: u32, h: u32) -> String {
    format!("scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}")
}

/// Escape text for use inside a drawtext `text=` argument.
///
/// drawtext treats `\`, `'`, `:` and `%` specially; `,` and `;` would
/// terminate the filter argument inside a filtergraph.
pub fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\\\'"),
            ':' => out.push_str("\\:"),
            '%' => out.push_str("\\%"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap text to roughly `max_chars` characters per line for drawtext,
/// which renders newlines but does not wrap on its own.
pub fn wrap_text(text: &str, max_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Build a drawtext filter, horizontally centred.
///
/// `window` limits visibility to a `(start, end)` interval in seconds;
/// `None` keeps the text visible for the whole output.
pub fn filter_drawtext(
    text: &str,
    style: &TextStyle,
    position: TextPosition,
    wrap_at: usize,
    window: Option<(f64, f64)>,
) -> String {
    let wrapped = wrap_text(text, wrap_at);
    let escaped = escape_drawtext(&wrapped);

    let mut parts = vec![
        format!("text='{}'", escaped),
        format!("fontsize={}", style.font_size),
        format!("fontcolor={}", ffmpeg_color(&style.font_color)),
        "box=1".to_string(),
        format!(
            "boxcolor={}@{:.2}",
            ffmpeg_color(&style.box_color),
            style.box_opacity
        ),
        "boxborderw=18".to_string(),
        "x=(w-text_w)/2".to_string(),
        format!("y={}", position.y_expr(60)),
        "line_spacing=10".to_string(),
    ];

    if let Some(font_file) = &style.font_file {
        parts.insert(0, format!("fontfile={}", font_file.display()));
    }

    if let Some((start, end)) = window {
        parts.push(format!("enable='between(t\\,{:.2}\\,{:.2})'", start, end));
    }

    format!("drawtext={}", parts.join(":"))
}
