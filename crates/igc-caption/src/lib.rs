//! AI caption/hashtag supplier.
//!
//! The supplier is a narrow seam: one trait with a caption call and a
//! key-point refinement call. Production uses the OpenAI adapter; tests
//! substitute fakes. The supplier is fallible and slow by contract; the
//! pipeline degrades to [`fallback_caption`] instead of aborting.

pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

use igc_models::{CaptionData, ContentBrief};

pub use openai::OpenAiSupplier;

/// Result type for supplier operations.
pub type SupplierResult<T> = Result<T, SupplierError>;

/// Errors from the AI text service.
#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI response malformed: {0}")]
    MalformedResponse(String),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("AI call failed after retry: {0}")]
    RetriesExhausted(String),
}

/// External AI text collaborator.
#[async_trait]
pub trait CaptionSupplier: Send + Sync {
    /// Produce caption, hashtags and CTA for a brief.
    async fn generate(&self, brief: &ContentBrief) -> SupplierResult<CaptionData>;

    /// Rewrite raw key points into short, audience-friendly sentences.
    async fn refine_key_points(
        &self,
        points: &[String],
        theme: &str,
    ) -> SupplierResult<Vec<String>>;
}

/// Default CTA used when the AI omits one or is unavailable.
pub const DEFAULT_CTA: &str = "Try our kombucha today!";

/// Deterministic caption used when the supplier fails.
///
/// Takes the first sentence of the brief context (clamped) so repeated
/// runs over the same brief produce byte-identical output.
pub fn fallback_caption(brief: &ContentBrief) -> CaptionData {
    let context = brief.context_text();
    let first_sentence = context
        .split('.')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| igc_models::brief::clamp_chars(s, 200))
        .unwrap_or_else(|| "Discover the benefits of kombucha!".to_string());

    let hashtags = if brief.hashtags.is_empty() {
        vec!["#kombucha".to_string(), "#healthy".to_string()]
    } else {
        brief.hashtags.clone()
    };

    CaptionData {
        caption: format!("{}.", first_sentence.trim_end_matches('.')),
        hashtags,
        cta: DEFAULT_CTA.to_string(),
    }
}
