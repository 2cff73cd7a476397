//! Brand extraction from the configured website.
//!
//! Fetches the homepage, pulls colors and fonts out of `<style>` blocks and
//! inline styles, and merges the findings into the settings file. The
//! heuristics favour keeping the existing defaults over writing garbage.

use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

use crate::config::{Brand, BrandColors, BrandFonts};
use crate::error::{CoreError, CoreResult};

/// Homepage fetch bound.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Near-white and near-black values that appear on almost every site and
/// tell us nothing about the brand.
const NOISE_COLORS: &[&str] = &["#ffffff", "#000000", "#f5f5f5", "#fafafa"];

/// Fetch the homepage and extract a brand block from it.
pub async fn extract_brand(website: &str) -> CoreResult<Brand> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .map_err(|e| CoreError::Brand(e.to_string()))?;

    info!(%website, "fetching website for brand extraction");
    let html = client
        .get(website)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| CoreError::Brand(format!("failed to fetch {website}: {e}")))?
        .text()
        .await
        .map_err(|e| CoreError::Brand(e.to_string()))?;

    Ok(brand_from_html(&html, website))
}

/// Pure extraction over already-fetched HTML (unit-testable offline).
pub fn brand_from_html(html: &str, website: &str) -> Brand {
    let document = Html::parse_document(html);
    let css = collect_css(&document);

    let colors = extract_colors(&css);
    let fonts = extract_fonts(&css);
    let name = extract_brand_name(&document);

    Brand {
        name,
        website: website.to_string(),
        colors,
        fonts,
    }
}

/// `<style>` block contents plus inline `style=` attributes.
fn collect_css(document: &Html) -> String {
    let mut css = String::new();

    if let Ok(style) = Selector::parse("style") {
        for el in document.select(&style) {
            css.push_str(&el.text().collect::<String>());
            css.push('\n');
        }
    }
    if let Ok(any) = Selector::parse("[style]") {
        for el in document.select(&any) {
            if let Some(inline) = el.value().attr("style") {
                css.push_str(inline);
                css.push('\n');
            }
        }
    }
    css
}

fn extract_colors(css: &str) -> BrandColors {
    let mut found: Vec<String> = Vec::new();
    let mut push = |color: String| {
        if !found.contains(&color) {
            found.push(color);
        }
    };

    // 3- or 6-digit hex
    if let Ok(hex) = Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b") {
        for cap in hex.captures_iter(css) {
            push(expand_hex(&cap[1]));
        }
    }
    // rgb()/rgba(), alpha discarded
    if let Ok(rgb) = Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)") {
        for cap in rgb.captures_iter(css) {
            if let (Ok(r), Ok(g), Ok(b)) = (cap[1].parse::<u8>(), cap[2].parse::<u8>(), cap[3].parse::<u8>()) {
                push(format!("#{r:02x}{g:02x}{b:02x}"));
            }
        }
    }

    let filtered: Vec<&String> = found
        .iter()
        .filter(|c| !NOISE_COLORS.contains(&c.as_str()) && !c.starts_with("#f"))
        .collect();

    let defaults = BrandColors::default();
    BrandColors {
        primary: filtered.first().map(|c| (*c).clone()).unwrap_or(defaults.primary),
        secondary: filtered.get(1).map(|c| (*c).clone()).unwrap_or(defaults.secondary),
        accent: filtered.get(2).map(|c| (*c).clone()).unwrap_or(defaults.accent),
        text: defaults.text,
        background: defaults.background,
    }
}

/// `#abc` -> `#aabbcc`, everything lowercased.
fn expand_hex(hex: &str) -> String {
    if hex.len() == 3 {
        let mut out = String::with_capacity(7);
        out.push('#');
        for c in hex.chars() {
            out.push(c);
            out.push(c);
        }
        out.to_lowercase()
    } else {
        format!("#{}", hex.to_lowercase())
    }
}

fn extract_fonts(css: &str) -> BrandFonts {
    let mut found: Vec<String> = Vec::new();

    if let Ok(family) = Regex::new(r"(?i)font-family:\s*([^;}]+)") {
        for cap in family.captures_iter(css) {
            let first = cap[1]
                .split(',')
                .next()
                .unwrap_or("")
                .trim()
                .trim_matches(['"', '\''])
                .to_string();
            if is_valid_font_name(&first) && !found.contains(&first) {
                found.push(first);
            }
        }
    }

    let defaults = BrandFonts::default();
    match found.as_slice() {
        [] => defaults,
        [only] => BrandFonts {
            heading: only.clone(),
            body: only.clone(),
            ..defaults
        },
        [first, .., last] => BrandFonts {
            heading: first.clone(),
            body: last.clone(),
            ..defaults
        },
    }
}

/// Reject CSS variables, keywords and anything that is not a plain name.
fn is_valid_font_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() < 50
        && !name.starts_with("var(")
        && !name.starts_with("--")
        && !matches!(name.to_lowercase().as_str(), "inherit" | "initial" | "unset")
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-')
}

fn extract_brand_name(document: &Html) -> String {
    let fallback = "Real Health Kombucha".to_string();
    let Ok(title) = Selector::parse("title") else {
        return fallback;
    };
    document
        .select(&title)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| t.to_lowercase().contains("kombucha"))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r##"<html>
      <head>
        <title>Real Health Kombucha - Live Cultures</title>
        <style>
          h1 { color: #1a5f3f; font-family: "Playfair Display", serif; }
          .cta { background: rgb(139, 195, 74); font-family: Lato, sans-serif; }
          body { color: #333; background: #fff; }
        </style>
      </head>
      <body>
        <div style="color: #4caf50"></div>
      </body>
    </html>"##;

    #[test]
    fn test_colors_in_document_order() {
        let brand = brand_from_html(HTML, "https://example.com/");
        assert_eq!(brand.colors.primary, "#1a5f3f");
        assert_eq!(brand.colors.secondary, "#333333");
        assert_eq!(brand.colors.accent, "#4caf50");
    }

    #[test]
    fn test_noise_colors_filtered() {
        let brand = brand_from_html(
            "<style>a { color: #ffffff; background: #fafafa; }</style>",
            "https://example.com/",
        );
        // Nothing usable, defaults win
        assert_eq!(brand.colors, BrandColors::default());
    }

    #[test]
    fn test_fonts_first_is_heading_last_is_body() {
        let brand = brand_from_html(HTML, "https://example.com/");
        assert_eq!(brand.fonts.heading, "Playfair Display");
        assert_eq!(brand.fonts.body, "Lato");
    }

    #[test]
    fn test_css_variables_rejected_as_fonts() {
        let brand = brand_from_html(
            "<style>p { font-family: var(--main-font); }</style>",
            "https://example.com/",
        );
        assert_eq!(brand.fonts.heading, "Arial");
    }

    #[test]
    fn test_brand_name_from_title() {
        let brand = brand_from_html(HTML, "https://example.com/");
        assert_eq!(brand.name, "Real Health Kombucha - Live Cultures");
    }

    #[test]
    fn test_expand_short_hex() {
        assert_eq!(expand_hex("3aF"), "#33aaff");
        assert_eq!(expand_hex("1A5F3F"), "#1a5f3f");
    }
}
