//! Settings: the process-wide, read-only configuration value.
//!
//! Loaded once from `config/settings.yaml` and passed explicitly to every
//! component constructor; there is no ambient global. A default settings
//! file is written on first run so `igc config` always has something to
//! show.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use igc_models::Theme;

use crate::error::{CoreError, CoreResult};

/// Environment variable holding the AI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Brand color palette, `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#1a5f3f".to_string(),
            secondary: "#8bc34a".to_string(),
            accent: "#4caf50".to_string(),
            text: "#333333".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

/// Brand font selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFonts {
    pub heading: String,
    pub body: String,
    /// Optional font file used by drawtext overlays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
}

impl Default for BrandFonts {
    fn default() -> Self {
        Self {
            heading: "Arial".to_string(),
            body: "Arial".to_string(),
            font_file: None,
        }
    }
}

/// Brand identity block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub colors: BrandColors,
    #[serde(default)]
    pub fonts: BrandFonts,
}

/// AI provider settings. The key itself lives in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    pub provider: String,
    pub model: String,
    pub language: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationEnvelope {
    pub min: f64,
    pub max: f64,
}

/// Instagram output geometry and duration bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramSettings {
    pub feed_dimensions: Dimensions,
    pub reel_dimensions: Dimensions,
    pub reel_duration: DurationEnvelope,
}

impl Default for InstagramSettings {
    fn default() -> Self {
        Self {
            feed_dimensions: Dimensions {
                width: 1080,
                height: 1080,
            },
            reel_dimensions: Dimensions {
                width: 1080,
                height: 1920,
            },
            reel_duration: DurationEnvelope {
                min: 15.0,
                max: 90.0,
            },
        }
    }
}

/// Filesystem roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSettings {
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Complete settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub brand: Brand,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub instagram: InstagramSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config/settings.yaml")
    }

    /// Load settings, creating a default file when none exists.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            info!("Created default settings at {}", path.display());
            return Ok(settings);
        }

        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&raw)?;
        Ok(settings)
    }

    /// Write settings back to disk (used by `extract-brand`).
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_yaml::to_string(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Settings entry for a theme, or an unconfigured default.
    pub fn theme(&self, name: &str) -> Theme {
        self.themes
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .unwrap_or_else(|| Theme::unconfigured(name))
    }

    /// AI API key, read from the environment once at startup.
    pub fn api_key_from_env() -> CoreResult<String> {
        std::env::var(API_KEY_ENV)
            .map_err(|_| CoreError::config(format!("{} not set", API_KEY_ENV)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config/settings.yaml");

        let settings = Settings::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_roundtrip_preserves_themes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");

        let mut settings = Settings::default();
        settings.themes.push(Theme {
            name: "gut_health".into(),
            target_audience: vec!["health_conscious".into()],
            hashtags: Default::default(),
        });
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.theme("gut_health").target_audience.len(), 1);
    }

    #[test]
    fn test_unknown_theme_gets_unconfigured_default() {
        let settings = Settings::default();
        let theme = settings.theme("missing");
        assert_eq!(theme.name, "missing");
        assert!(theme.hashtags.base.is_empty());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings: Settings =
            serde_yaml::from_str("brand:\n  name: Acme Kombucha\n").unwrap();
        assert_eq!(settings.brand.name, "Acme Kombucha");
        assert_eq!(settings.instagram.feed_dimensions.width, 1080);
    }
}
