//! Core error types.
//!
//! Taxonomy per the pipeline contract: within a single `generate`
//! invocation every variant is fatal to that invocation; within a batch
//! run every variant is caught per item. Supplier failures never reach
//! this enum from the caption path; the pipeline degrades to the
//! fallback caption instead.

use std::path::PathBuf;
use thiserror::Error;

use igc_caption::SupplierError;
use igc_media::MediaError;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    #[error("No usable {kind} assets for theme '{theme}' (theme dir and shared pool are empty)")]
    InsufficientAssets { theme: String, kind: String },

    #[error("Asset not found: {0}")]
    AssetNotFound(PathBuf),

    #[error("Render failed: {0}")]
    Render(#[from] MediaError),

    #[error("Supplier failed: {0}")]
    Supplier(#[from] SupplierError),

    #[error("Write failed for {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF extraction failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("Brand extraction failed: {0}")]
    Brand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    pub fn insufficient_assets(theme: impl Into<String>, kind: impl ToString) -> Self {
        Self::InsufficientAssets {
            theme: theme.into(),
            kind: kind.to_string(),
        }
    }

    pub fn write_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn pdf_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Pdf {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
