//! Shared data models for the IGC content generator.
//!
//! This crate provides Serde-serializable types for:
//! - Themes and asset references
//! - Content briefs handed to renderers
//! - Caption payloads returned by the AI supplier
//! - The per-theme key-point cache (`content.json`)
//! - Generation results and batch summaries

pub mod asset;
pub mod brief;
pub mod caption;
pub mod generation;
pub mod keypoints;
pub mod theme;

// Re-export common types
pub use asset::{AssetKind, AssetRef};
pub use brief::{ContentBrief, ContentType, ContentTypeParseError, OverlayWindow};
pub use caption::CaptionData;
pub use generation::{BatchItem, BatchSummary, GenerationResult, ItemOutcome};
pub use keypoints::{KeyPointCache, KeyPointSummary, PdfEntry};
pub use theme::{HashtagSet, Theme};
