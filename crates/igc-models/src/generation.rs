//! Generation results and batch summaries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brief::ContentType;

/// Record of one successfully written generation.
///
/// Every referenced source asset existed in the catalog at selection time;
/// the output writer guarantees the media and caption files exist before
/// this record is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub theme: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub generated_at: DateTime<Utc>,
    /// Source assets used, in render order.
    pub sources: Vec<PathBuf>,
    pub output_media: PathBuf,
    pub caption_file: PathBuf,
    pub metadata_file: PathBuf,
}

/// Outcome of one batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ItemOutcome {
    Written { result: GenerationResult },
    Failed { reason: String },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Written { .. })
    }
}

/// One batch item: a single feed or reel request within a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    pub theme: String,
    pub content_type: ContentType,
    pub outcome: ItemOutcome,
}

/// Summary of a batch run, append-only during execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    pub fn push(&mut self, item: BatchItem) {
        self.items.push(item);
    }

    /// (succeeded, total) for one content type.
    pub fn counts_for(&self, content_type: ContentType) -> (usize, usize) {
        let of_type: Vec<_> = self
            .items
            .iter()
            .filter(|i| i.content_type == content_type)
            .collect();
        let ok = of_type.iter().filter(|i| i.outcome.is_success()).count();
        (ok, of_type.len())
    }

    pub fn total_failures(&self) -> usize {
        self.items.iter().filter(|i| !i.outcome.is_success()).count()
    }

    /// Retained error reasons, with item index, for the final report.
    pub fn failure_reasons(&self) -> Vec<(usize, &str)> {
        self.items
            .iter()
            .filter_map(|i| match &i.outcome {
                ItemOutcome::Failed { reason } => Some((i.index, reason.as_str())),
                ItemOutcome::Written { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(index: usize, content_type: ContentType, reason: &str) -> BatchItem {
        BatchItem {
            index,
            theme: "t".into(),
            content_type,
            outcome: ItemOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    fn written(index: usize, content_type: ContentType) -> BatchItem {
        BatchItem {
            index,
            theme: "t".into(),
            content_type,
            outcome: ItemOutcome::Written {
                result: GenerationResult {
                    theme: "t".into(),
                    content_type,
                    generated_at: Utc::now(),
                    sources: vec![],
                    output_media: "out.jpg".into(),
                    caption_file: "out_caption.txt".into(),
                    metadata_file: "out_metadata.json".into(),
                },
            },
        }
    }

    #[test]
    fn test_counts_split_by_content_type() {
        let mut summary = BatchSummary::default();
        summary.push(written(0, ContentType::Feed));
        summary.push(failed(1, ContentType::Feed, "unreadable asset"));
        summary.push(written(2, ContentType::Reel));

        assert_eq!(summary.counts_for(ContentType::Feed), (1, 2));
        assert_eq!(summary.counts_for(ContentType::Reel), (1, 1));
        assert_eq!(summary.total_failures(), 1);
        assert_eq!(summary.failure_reasons(), vec![(1, "unreadable asset")]);
    }
}
