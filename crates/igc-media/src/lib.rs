//! FFmpeg CLI wrapper for feed image and reel rendering.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building (multiple inputs, filter graphs)
//! - Progress parsing from `-progress pipe:2`
//! - Timeout enforcement via tokio
//! - Feed image composition (fit + pad + text overlay)
//! - Reel assembly (trim, portrait crop, concat, timed overlays, music)
//! - Media probing via FFprobe

pub mod command;
pub mod error;
pub mod feed;
pub mod filters;
pub mod fs_utils;
pub mod probe;
pub mod progress;
pub mod reel;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use feed::{render_feed_image, FeedSpec};
pub use filters::{TextPosition, TextStyle};
pub use fs_utils::move_file;
pub use probe::{probe_media, MediaInfo};
pub use progress::FfmpegProgress;
pub use reel::{render_reel, ReelSpec};
