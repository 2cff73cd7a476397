//! Quote collection parsing and random selection.
//!
//! `quotes.txt` is a lightweight markdown-ish format: `## Category` headers
//! introduce categories, `#`-prefixed and `---` lines are ignored, everything
//! else is a quote (surrounding quote marks stripped).

use std::path::Path;

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::error::CoreResult;

/// Returned when the collection is empty or missing.
pub const DEFAULT_QUOTE: &str = "Kombucha: Nature's probiotic powerhouse.";

/// Quotes shorter than this are treated as noise.
const MIN_QUOTE_LEN: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct QuoteCollection {
    categories: Vec<(String, Vec<String>)>,
}

impl QuoteCollection {
    /// Load from `quotes.txt`. A missing file yields an empty collection.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }

    pub fn parse(raw: &str) -> Self {
        let mut categories: Vec<(String, Vec<String>)> = Vec::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("---") {
                continue;
            }
            if let Some(header) = line.strip_prefix("##").filter(|h| !h.starts_with('#')) {
                let name = header.trim().to_string();
                if !categories.iter().any(|(n, _)| *n == name) {
                    categories.push((name, Vec::new()));
                }
            } else if line.starts_with('#') {
                continue;
            } else if let Some((_, quotes)) = categories.last_mut() {
                let quote = line.trim_matches(['"', '\'']).trim();
                if quote.len() > MIN_QUOTE_LEN {
                    quotes.push(quote.to_string());
                }
            }
        }

        Self { categories }
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn in_category(&self, category: &str) -> &[String] {
        self.categories
            .iter()
            .find(|(n, _)| n == category)
            .map(|(_, q)| q.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, q)| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Random quote, optionally limited to one category. Falls back to a
    /// fixed default when nothing matches.
    pub fn random_quote<R: Rng>(&self, rng: &mut R, category: Option<&str>) -> String {
        let pool: Vec<&String> = match category {
            Some(c) if !self.in_category(c).is_empty() => self.in_category(c).iter().collect(),
            _ => self.categories.iter().flat_map(|(_, q)| q).collect(),
        };
        pool.choose(rng)
            .map(|q| q.to_string())
            .unwrap_or_else(|| DEFAULT_QUOTE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = "\
# Kombucha quotes collection
---
## Health & Wellness
\"Your gut is your second brain, feed it well.\"
Fermentation is transformation in a jar.
## Humor
tiny
'Kombucha: the drink that bites back.'
";

    #[test]
    fn test_parse_categories_and_quotes() {
        let quotes = QuoteCollection::parse(SAMPLE);
        assert_eq!(quotes.categories(), vec!["Health & Wellness", "Humor"]);
        assert_eq!(quotes.in_category("Health & Wellness").len(), 2);
        assert_eq!(
            quotes.in_category("Humor"),
            &["Kombucha: the drink that bites back.".to_string()]
        );
    }

    #[test]
    fn test_short_lines_and_comments_skipped() {
        let quotes = QuoteCollection::parse(SAMPLE);
        assert_eq!(quotes.len(), 3);
    }

    #[test]
    fn test_random_quote_respects_category() {
        let quotes = QuoteCollection::parse(SAMPLE);
        let mut rng = StdRng::seed_from_u64(7);
        let q = quotes.random_quote(&mut rng, Some("Humor"));
        assert_eq!(q, "Kombucha: the drink that bites back.");
    }

    #[test]
    fn test_unknown_category_uses_full_pool() {
        let quotes = QuoteCollection::parse(SAMPLE);
        let mut rng = StdRng::seed_from_u64(7);
        let q = quotes.random_quote(&mut rng, Some("nope"));
        assert!(!q.is_empty());
    }

    #[test]
    fn test_empty_collection_falls_back() {
        let quotes = QuoteCollection::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(quotes.random_quote(&mut rng, None), DEFAULT_QUOTE);
    }
}
