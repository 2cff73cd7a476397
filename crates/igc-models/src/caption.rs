//! Caption payloads returned by the AI supplier.

use serde::{Deserialize, Serialize};

/// Caption, hashtags and call-to-action for one piece of content.
///
/// `format_for_instagram` must stay deterministic: re-running a generation
/// with identical inputs and a fixed supplier response produces a
/// byte-identical caption file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionData {
    pub caption: String,
    /// Ordered hashtag list (base pool first, then custom, then AI-added).
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Call to action appended after the caption.
    pub cta: String,
}

impl CaptionData {
    /// Render the Instagram-ready caption text: caption, blank line, CTA,
    /// blank line, hashtags space-joined. Empty sections are skipped.
    pub fn format_for_instagram(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !self.caption.is_empty() {
            lines.push(self.caption.clone());
            lines.push(String::new());
        }
        if !self.cta.is_empty() {
            lines.push(self.cta.clone());
            lines.push(String::new());
        }
        if !self.hashtags.is_empty() {
            lines.push(self.hashtags.join(" "));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_full_caption() {
        let data = CaptionData {
            caption: "Gut health matters.".into(),
            hashtags: vec!["#kombucha".into(), "#health".into()],
            cta: "Try it today!".into(),
        };
        assert_eq!(
            data.format_for_instagram(),
            "Gut health matters.\n\nTry it today!\n\n#kombucha #health"
        );
    }

    #[test]
    fn test_format_skips_empty_sections() {
        let data = CaptionData {
            caption: "Only a caption.".into(),
            hashtags: vec![],
            cta: String::new(),
        };
        assert_eq!(data.format_for_instagram(), "Only a caption.\n");
    }

    #[test]
    fn test_format_is_deterministic() {
        let data = CaptionData {
            caption: "c".into(),
            hashtags: vec!["#a".into()],
            cta: "cta".into(),
        };
        assert_eq!(data.format_for_instagram(), data.format_for_instagram());
    }
}
