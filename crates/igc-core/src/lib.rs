//! Content generation orchestration.
//!
//! This crate wires the catalog, brief builder, caption supplier, FFmpeg
//! renderers and output writer into the generation pipeline, and adds the
//! supporting operations: settings, PDF preprocessing, quote handling,
//! brand extraction and batch runs.

pub mod batch;
pub mod brand;
pub mod brief;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod pdf;
pub mod preprocess;
pub mod quotes;
pub mod render;

pub use batch::{format_summary, run_batch, BatchRequest};
pub use brief::{key_point_source, BriefBuilder, BriefRequest, KeyPointSource};
pub use catalog::{AssetCatalog, ThemeStats};
pub use config::{Settings, API_KEY_ENV};
pub use error::{CoreError, CoreResult};
pub use generator::{ContentGenerator, GenerateRequest};
pub use output::OutputWriter;
pub use pdf::{LopdfExtractor, PdfTextExtractor};
pub use preprocess::{preprocess_theme, PreprocessOptions, PreprocessOutcome};
pub use quotes::QuoteCollection;
pub use render::{FfmpegRenderer, MediaRenderer};
