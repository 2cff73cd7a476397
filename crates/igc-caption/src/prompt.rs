//! Prompt construction and response parsing.
//!
//! The caption prompt asks for a `CAPTION:` / `HASHTAGS:` / `CTA:` layout;
//! refinement asks for a numbered list. Both parsers tolerate sloppy model
//! output and fall back to the pools passed in.

use igc_models::{CaptionData, ContentBrief};

use crate::DEFAULT_CTA;

/// Maximum context characters embedded in the caption prompt.
const MAX_CONTEXT_CHARS: usize = 2000;

/// Maximum AI-added hashtags appended after the configured pools.
const MAX_AI_HASHTAGS: usize = 10;

/// System message for caption generation.
pub const CAPTION_SYSTEM: &str = "You are an expert social media content creator \
specializing in health and wellness content for Instagram.";

/// System message for key-point refinement.
pub const REFINE_SYSTEM: &str = "You are an expert at translating scientific research \
into clear, engaging, and accessible information for the general public.";

/// Build the caption prompt for a brief.
pub fn build_caption_prompt(brief: &ContentBrief, language: &str) -> String {
    let language = language_name(language);
    let audience = if brief.target_audience.is_empty() {
        "general audience".to_string()
    } else {
        brief.target_audience.join(" and ")
    };

    let context = igc_models::brief::clamp_chars(&brief.context_text(), MAX_CONTEXT_CHARS);
    let kind = match brief.content_type {
        igc_models::ContentType::Reel => "Reel",
        igc_models::ContentType::Feed => "Feed post",
    };

    format!(
        "Create an engaging Instagram {kind} caption in {language} for a kombucha business.\n\
         \n\
         Theme: {theme}\n\
         Target Audience: {audience}\n\
         \n\
         Content Context:\n{context}\n\
         \n\
         Requirements:\n\
         1. Write a captivating caption (2-4 sentences) highlighting key benefits or findings\n\
         2. Make it engaging and suitable for {audience}\n\
         3. Include relevant hashtags\n\
         4. Add a call-to-action appropriate for the audience\n\
         \n\
         Hashtags to consider: {hashtags}\n\
         \n\
         Format your response as:\n\
         CAPTION: [caption text]\n\
         HASHTAGS: [hashtags, one per line]\n\
         CTA: [call to action]\n\
         \n\
         Write in {language}.",
        theme = brief.theme,
        hashtags = brief.hashtags.join(", "),
    )
}

/// Build the key-point refinement prompt.
pub fn build_refine_prompt(points: &[String], theme: &str, max_points: usize) -> String {
    let raw: String = points
        .iter()
        .take(20)
        .map(|p| format!("- {}\n", p))
        .collect();

    format!(
        "Rewrite the key takeaways below for regular people who want to learn about \
         kombucha in simple terms.\n\
         \n\
         Theme: {theme}\n\
         \n\
         Raw content:\n{raw}\n\
         Requirements:\n\
         1. Keep each takeaway short (1-2 sentences, max 150 characters)\n\
         2. Plain everyday language, no jargon\n\
         3. Focus on practical benefits\n\
         4. Return exactly {max_points} takeaways\n\
         \n\
         Format your response as a numbered list, one takeaway per line."
    )
}

/// Parse a `CAPTION:/HASHTAGS:/CTA:` response.
///
/// The configured hashtag pool always comes first; AI-added hashtags are
/// appended (bounded). Missing sections fall back to pool + default CTA.
pub fn parse_caption_response(response: &str, pool: &[String]) -> CaptionData {
    let caption = section(response, "CAPTION:", &["HASHTAGS:", "CTA:"])
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut hashtags: Vec<String> = pool.to_vec();
    if let Some(block) = section(response, "HASHTAGS:", &["CTA:"]) {
        let ai_tags: Vec<String> = block
            .lines()
            .flat_map(|l| l.split_whitespace())
            .filter(|t| t.starts_with('#'))
            .map(str::to_string)
            .filter(|t| !hashtags.contains(t))
            .take(MAX_AI_HASHTAGS)
            .collect();
        hashtags.extend(ai_tags);
    }

    let cta = section(response, "CTA:", &[])
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CTA.to_string());

    CaptionData {
        caption,
        hashtags,
        cta,
    }
}

/// Parse a numbered-list refinement response. Returns the raw points when
/// nothing usable came back.
pub fn parse_refined_points(response: &str, raw: &[String], max_points: usize) -> Vec<String> {
    let refined: Vec<String> = response
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')', '-', '*'])
                .trim()
                .to_string()
        })
        .filter(|line| line.chars().count() > 10)
        .take(max_points)
        .collect();

    if refined.is_empty() {
        raw.iter().take(max_points).cloned().collect()
    } else {
        refined
    }
}

/// Text between `marker` and the earliest of `stops` (or end of input).
fn section<'a>(text: &'a str, marker: &str, stops: &[&str]) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    let end = stops.iter().filter_map(|s| rest.find(s)).min();
    Some(match end {
        Some(end) => &rest[..end],
        None => rest,
    })
}

fn language_name(code: &str) -> &str {
    match code {
        "pt" => "Portuguese",
        "es" => "Spanish",
        "de" => "German",
        "fr" => "French",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igc_models::ContentType;

    #[test]
    fn test_parse_full_response() {
        let response = "CAPTION: Gut health starts here.\n\
                        HASHTAGS:\n#kombucha\n#wellness\n\
                        CTA: Visit us in Madeira!";
        let data = parse_caption_response(response, &["#base".to_string()]);
        assert_eq!(data.caption, "Gut health starts here.");
        assert_eq!(data.hashtags, vec!["#base", "#kombucha", "#wellness"]);
        assert_eq!(data.cta, "Visit us in Madeira!");
    }

    #[test]
    fn test_parse_missing_sections_fall_back() {
        let data = parse_caption_response("nothing structured here", &["#pool".to_string()]);
        assert!(data.caption.is_empty());
        assert_eq!(data.hashtags, vec!["#pool"]);
        assert_eq!(data.cta, DEFAULT_CTA);
    }

    #[test]
    fn test_parse_deduplicates_pool_tags() {
        let response = "CAPTION: c\nHASHTAGS:\n#pool\n#new\nCTA: x";
        let data = parse_caption_response(response, &["#pool".to_string()]);
        assert_eq!(data.hashtags, vec!["#pool", "#new"]);
    }

    #[test]
    fn test_parse_refined_numbered_list() {
        let response = "1. Kombucha supports digestion naturally.\n\
                        2) Its probiotics help your gut bacteria.\n\
                        too short";
        let points = parse_refined_points(response, &[], 10);
        assert_eq!(
            points,
            vec![
                "Kombucha supports digestion naturally.",
                "Its probiotics help your gut bacteria."
            ]
        );
    }

    #[test]
    fn test_refinement_falls_back_to_raw() {
        let raw = vec!["raw point that is long enough".to_string()];
        let points = parse_refined_points("??", &raw, 5);
        assert_eq!(points, raw);
    }

    #[test]
    fn test_caption_prompt_mentions_theme_and_language() {
        let brief = ContentBrief {
            theme: "immune_system".into(),
            content_type: ContentType::Reel,
            key_points: vec!["Point.".into()],
            quote: None,
            assets: vec![],
            hashtags: vec!["#a".into()],
            target_audience: vec!["athletes".into()],
        };
        let prompt = build_caption_prompt(&brief, "pt");
        assert!(prompt.contains("Theme: immune_system"));
        assert!(prompt.contains("Portuguese"));
        assert!(prompt.contains("Reel"));
        assert!(prompt.contains("athletes"));
    }
}
