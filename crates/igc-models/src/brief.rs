//! Content briefs.
//!
//! A brief is the resolved textual and asset payload handed to the
//! renderers for one generation request. It is built fresh per request and
//! discarded after use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::AssetRef;

/// Instagram content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Square feed post (image).
    Feed,
    /// Vertical short video.
    Reel,
}

impl ContentType {
    /// Output subdirectory for this content type.
    pub fn output_subdir(&self) -> &'static str {
        match self {
            ContentType::Feed => "feed_posts",
            ContentType::Reel => "reels",
        }
    }

    /// Media file extension for this content type.
    pub fn media_extension(&self) -> &'static str {
        match self {
            ContentType::Feed => "jpg",
            ContentType::Reel => "mp4",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Feed => write!(f, "feed"),
            ContentType::Reel => write!(f, "reel"),
        }
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feed" => Ok(ContentType::Feed),
            "reel" => Ok(ContentType::Reel),
            _ => Err(ContentTypeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown content type: {0} (expected feed or reel)")]
pub struct ContentTypeParseError(String);

/// A text overlay scheduled at a time window within a reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayWindow {
    pub text: String,
    /// Start time in seconds from the beginning of the reel.
    pub start: f64,
    /// Display duration in seconds.
    pub duration: f64,
}

impl OverlayWindow {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// The resolved payload for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBrief {
    /// Theme name.
    pub theme: String,

    /// Content type being produced.
    pub content_type: ContentType,

    /// Ordered key points derived from the cache or raw PDF text.
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Optional quote pulled from the quotes collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,

    /// Selected source assets, in render order.
    pub assets: Vec<AssetRef>,

    /// Hashtags to seed the caption with (base + custom pools).
    #[serde(default)]
    pub hashtags: Vec<String>,

    /// Audience tags fed into the caption prompt.
    #[serde(default)]
    pub target_audience: Vec<String>,
}

/// Context used when a brief carries neither key points nor a quote.
pub const DEFAULT_CONTEXT: &str = "Kombucha benefits and health information.";

impl ContentBrief {
    /// Text context handed to the caption supplier: key points as prose,
    /// the quote when no key points were resolved, or the fixed default
    /// stub when the brief carries neither.
    pub fn context_text(&self) -> String {
        if !self.key_points.is_empty() {
            self.key_points.join(" ")
        } else if let Some(quote) = &self.quote {
            quote.clone()
        } else {
            DEFAULT_CONTEXT.to_string()
        }
    }

    /// The short overlay line for a feed image. An attached quote wins
    /// over the key points: a quote card shows the quote.
    pub fn overlay_text(&self, max_chars: usize) -> Option<String> {
        self.quote
            .as_ref()
            .or_else(|| self.key_points.first())
            .map(|s| clamp_chars(s, max_chars))
    }
}

/// Clamp a string to at most `max_chars` characters on a char boundary.
pub fn clamp_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
