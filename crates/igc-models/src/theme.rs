//! Theme definitions.
//!
//! A theme is a named grouping of assets and hashtags representing one
//! content topic. Themes are loaded from the settings file at startup and
//! are read-only for the duration of a run.

use serde::{Deserialize, Serialize};

/// Hashtag pools for a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagSet {
    /// Brand-wide hashtags, always included.
    #[serde(default)]
    pub base: Vec<String>,
    /// Theme-specific hashtags.
    #[serde(default)]
    pub custom: Vec<String>,
}

impl HashtagSet {
    /// Base hashtags plus up to `custom_limit` custom hashtags, in order.
    pub fn combined(&self, custom_limit: usize) -> Vec<String> {
        self.base
            .iter()
            .chain(self.custom.iter().take(custom_limit))
            .cloned()
            .collect()
    }
}

/// A content theme as declared in the settings file.
///
/// Asset locations are not stored here; the catalog resolves them from the
/// assets root by theme name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme directory name (e.g. `kombucha_benefits`).
    pub name: String,
    /// Audience tags fed into the caption prompt.
    #[serde(default)]
    pub target_audience: Vec<String>,
    /// Hashtag pools.
    #[serde(default)]
    pub hashtags: HashtagSet,
}

impl Theme {
    /// A theme with no settings entry: name only, empty audience and
    /// hashtags. Absence of configuration is a normal state.
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_hashtags_respect_custom_limit() {
        let tags = HashtagSet {
            base: vec!["#a".into(), "#b".into()],
            custom: vec!["#c".into(), "#d".into(), "#e".into()],
        };
        assert_eq!(tags.combined(2), vec!["#a", "#b", "#c", "#d"]);
    }

    #[test]
    fn test_theme_deserializes_with_missing_fields() {
        let theme: Theme = serde_yaml_like_json(r#"{"name": "gut_health"}"#);
        assert_eq!(theme.name, "gut_health");
        assert!(theme.target_audience.is_empty());
        assert!(theme.hashtags.base.is_empty());
    }

    fn serde_yaml_like_json(s: &str) -> Theme {
        serde_json::from_str(s).unwrap()
    }
}
