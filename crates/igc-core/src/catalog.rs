//! Theme asset catalog.
//!
//! Scans the assets root on every call: restartable, always reflects the
//! current filesystem, no staleness guarantees. Layout:
//!
//! ```text
//! assets/<theme>/{images,videos,pdfs}/...
//! assets/<theme>/content.json          # key-point cache, optional
//! assets/shared/{images,videos}/...    # theme-independent pool
//! assets/music/*.mp3
//! assets/quotes/quotes.txt
//! ```

use std::path::{Path, PathBuf};

use igc_models::{AssetKind, AssetRef, KeyPointCache};

use crate::error::{CoreError, CoreResult};

/// Directories under the assets root that are not themes.
const RESERVED_DIRS: &[&str] = &["shared", "music", "quotes"];

/// Per-theme asset counts for the `themes`/`stats` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeStats {
    pub images: usize,
    pub videos: usize,
    pub pdfs: usize,
}

/// Read-only view over the assets directory tree.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    assets_root: PathBuf,
}

impl AssetCatalog {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
        }
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Sorted theme names currently present on disk.
    pub fn list_themes(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.assets_root) else {
            return Vec::new();
        };

        let mut themes: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .filter(|name| !RESERVED_DIRS.contains(&name.as_str()))
            .collect();
        themes.sort();
        themes
    }

    /// Fail with `ThemeNotFound` unless `theme` exists on disk.
    pub fn require_theme(&self, theme: &str) -> CoreResult<()> {
        let known = self.list_themes();
        if known.iter().any(|t| t == theme) {
            Ok(())
        } else {
            Err(CoreError::ThemeNotFound(theme.to_string()))
        }
    }

    /// Assets of `kind` for a theme. An empty result is a normal state,
    /// never an error; only an unknown theme fails.
    pub fn assets_for(&self, theme: &str, kind: AssetKind) -> CoreResult<Vec<AssetRef>> {
        self.require_theme(theme)?;
        let dir = self.assets_root.join(theme).join(kind.theme_subdir());
        Ok(scan_dir(&dir, kind))
    }

    /// Theme-independent shared pool for images/videos.
    pub fn shared_assets(&self, kind: AssetKind) -> Vec<AssetRef> {
        let dir = self.assets_root.join("shared").join(kind.theme_subdir());
        scan_dir(&dir, kind)
    }

    /// Music tracks available for reels.
    pub fn music_tracks(&self) -> Vec<AssetRef> {
        scan_dir(&self.assets_root.join("music"), AssetKind::Music)
    }

    /// Location of the quotes collection.
    pub fn quotes_file(&self) -> PathBuf {
        self.assets_root.join("quotes").join("quotes.txt")
    }

    /// Location of a theme's key-point cache.
    pub fn cache_path(&self, theme: &str) -> PathBuf {
        self.assets_root.join(theme).join(KeyPointCache::FILE_NAME)
    }

    /// Load a theme's key-point cache if one exists.
    pub fn load_cache(&self, theme: &str) -> CoreResult<Option<KeyPointCache>> {
        let path = self.cache_path(theme);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        let cache: KeyPointCache = serde_json::from_str(&raw)?;
        Ok(Some(cache))
    }

    pub fn theme_stats(&self, theme: &str) -> CoreResult<ThemeStats> {
        Ok(ThemeStats {
            images: self.assets_for(theme, AssetKind::Image)?.len(),
            videos: self.assets_for(theme, AssetKind::Video)?.len(),
            pdfs: self.assets_for(theme, AssetKind::Pdf)?.len(),
        })
    }
}

/// Sorted, kind-filtered listing of one directory. Missing directory means
/// no assets.
fn scan_dir(dir: &Path, kind: AssetKind) -> Vec<AssetRef> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut assets: Vec<AssetRef> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && kind.matches(p))
        .map(|p| AssetRef::new(p, kind))
        .collect();
    assets.sort_by(|a, b| a.path.cmp(&b.path));
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    fn fixture() -> (TempDir, AssetCatalog) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("gut_health/images/a.jpg"));
        touch(&root.join("gut_health/images/b.PNG"));
        touch(&root.join("gut_health/images/notes.txt"));
        touch(&root.join("gut_health/videos/clip.mp4"));
        touch(&root.join("immune_system/pdfs/study.pdf"));
        touch(&root.join("shared/images/stock.jpg"));
        touch(&root.join("music/track.mp3"));
        touch(&root.join("quotes/quotes.txt"));
        touch(&root.join(".hidden/images/x.jpg"));
        let catalog = AssetCatalog::new(root);
        (dir, catalog)
    }

    #[test]
    fn test_list_themes_skips_reserved_and_hidden() {
        let (_dir, catalog) = fixture();
        assert_eq!(catalog.list_themes(), vec!["gut_health", "immune_system"]);
    }

    #[test]
    fn test_assets_for_filters_by_kind_case_insensitive() {
        let (_dir, catalog) = fixture();
        let images = catalog.assets_for("gut_health", AssetKind::Image).unwrap();
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|a| a.kind == AssetKind::Image));
    }

    #[test]
    fn test_missing_kind_dir_is_empty_not_error() {
        let (_dir, catalog) = fixture();
        let videos = catalog
            .assets_for("immune_system", AssetKind::Video)
            .unwrap();
        assert!(videos.is_empty());
    }

    #[test]
    fn test_unknown_theme_is_not_found() {
        let (_dir, catalog) = fixture();
        let err = catalog.assets_for("missing", AssetKind::Image).unwrap_err();
        assert!(matches!(err, CoreError::ThemeNotFound(_)));
    }

    #[test]
    fn test_shared_pool_and_music() {
        let (_dir, catalog) = fixture();
        assert_eq!(catalog.shared_assets(AssetKind::Image).len(), 1);
        assert_eq!(catalog.music_tracks().len(), 1);
    }

    #[test]
    fn test_stats() {
        let (_dir, catalog) = fixture();
        let stats = catalog.theme_stats("gut_health").unwrap();
        assert_eq!(
            stats,
            ThemeStats {
                images: 2,
                videos: 1,
                pdfs: 0
            }
        );
    }

    #[test]
    fn test_load_cache_absent_is_none() {
        let (_dir, catalog) = fixture();
        assert!(catalog.load_cache("gut_health").unwrap().is_none());
    }
}
