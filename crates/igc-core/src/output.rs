//! Output writer.
//!
//! Persists one generation as exactly three artifacts, in a fixed order:
//! media first, then the caption file, then the metadata record. A failure
//! at any step stops the sequence, so a metadata record never points at a
//! missing media or caption file.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use serde::Serialize;
use tracing::info;

use igc_media::move_file;
use igc_models::{CaptionData, ContentBrief, GenerationResult};

use crate::error::{CoreError, CoreResult};

/// Timestamp format used in output filenames.
const STEM_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Everything a reviewer needs to reconstruct one generation.
#[derive(Debug, Serialize)]
struct MetadataRecord<'a> {
    #[serde(flatten)]
    result: &'a GenerationResult,
    caption_data: &'a CaptionData,
}

/// Writes generations under the output root
/// (`output/{feed_posts,reels}/<theme>_<timestamp>.*`).
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_root: PathBuf,
}

impl OutputWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Persist `rendered_media` plus caption and metadata for one brief.
    ///
    /// The media file is moved from the render work dir (EXDEV-safe), so
    /// the work dir holds nothing once this returns.
    pub async fn write(
        &self,
        rendered_media: &Path,
        brief: &ContentBrief,
        caption: &CaptionData,
    ) -> CoreResult<GenerationResult> {
        let dir = self.output_root.join(brief.content_type.output_subdir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::write_failed(&dir, e.to_string()))?;

        let ext = brief.content_type.media_extension();
        let stem = unique_stem(&dir, &brief.theme, ext);
        let media_path = dir.join(format!("{stem}.{ext}"));
        let caption_path = dir.join(format!("{stem}_caption.txt"));
        let metadata_path = dir.join(format!("{stem}_metadata.json"));

        // 1. Media
        move_file(rendered_media, &media_path)
            .await
            .map_err(|e| CoreError::write_failed(&media_path, e.to_string()))?;

        // 2. Caption
        tokio::fs::write(&caption_path, caption.format_for_instagram())
            .await
            .map_err(|e| CoreError::write_failed(&caption_path, e.to_string()))?;

        let result = GenerationResult {
            theme: brief.theme.clone(),
            content_type: brief.content_type,
            generated_at: Utc::now(),
            sources: brief.assets.iter().map(|a| a.path.clone()).collect(),
            output_media: media_path.clone(),
            caption_file: caption_path.clone(),
            metadata_file: metadata_path.clone(),
        };

        // 3. Metadata
        let record = MetadataRecord {
            result: &result,
            caption_data: caption,
        };
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&metadata_path, json)
            .await
            .map_err(|e| CoreError::write_failed(&metadata_path, e.to_string()))?;

        info!(
            "Wrote {}: {}",
            brief.content_type,
            media_path.display()
        );
        Ok(result)
    }
}

/// `<theme>_<timestamp>`, suffixed with a counter when a batch lands
/// several items in the same second.
fn unique_stem(dir: &Path, theme: &str, ext: &str) -> String {
    let base = format!("{}_{}", theme, Local::now().format(STEM_TIME_FORMAT));
    if !dir.join(format!("{base}.{ext}")).exists() {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if !dir.join(format!("{candidate}.{ext}")).exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igc_models::{AssetKind, AssetRef, ContentType};
    use tempfile::TempDir;

    fn brief(content_type: ContentType) -> ContentBrief {
        ContentBrief {
            theme: "gut_health".into(),
            content_type,
            key_points: vec!["Probiotics support digestion.".into()],
            quote: None,
            assets: vec![AssetRef::new("assets/gut_health/images/a.jpg", AssetKind::Image)],
            hashtags: vec!["#kombucha".into()],
            target_audience: vec![],
        }
    }

    fn caption() -> CaptionData {
        CaptionData {
            caption: "Probiotics support digestion.".into(),
            hashtags: vec!["#kombucha".into()],
            cta: "Try it!".into(),
        }
    }

    #[tokio::test]
    async fn test_writes_three_artifacts_in_order() {
        let dir = TempDir::new().unwrap();
        let rendered = dir.path().join("work/render.jpg");
        tokio::fs::create_dir_all(rendered.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&rendered, b"jpeg").await.unwrap();

        let writer = OutputWriter::new(dir.path().join("output"));
        let result = writer
            .write(&rendered, &brief(ContentType::Feed), &caption())
            .await
            .unwrap();

        assert!(!rendered.exists());
        assert!(result.output_media.exists());
        assert!(result.caption_file.exists());
        assert!(result.metadata_file.exists());
        assert!(result
            .output_media
            .parent()
            .unwrap()
            .ends_with("feed_posts"));

        let caption_text = std::fs::read_to_string(&result.caption_file).unwrap();
        assert!(caption_text.contains("Probiotics support digestion."));

        let metadata: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&result.metadata_file).unwrap()).unwrap();
        assert_eq!(metadata["theme"], "gut_health");
        assert_eq!(metadata["type"], "feed");
        assert_eq!(metadata["caption_data"]["cta"], "Try it!");
    }

    #[tokio::test]
    async fn test_same_second_writes_get_distinct_stems() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("output"));

        for i in 0..2u8 {
            let rendered = dir.path().join(format!("render{i}.jpg"));
            tokio::fs::write(&rendered, [i]).await.unwrap();
            writer
                .write(&rendered, &brief(ContentType::Feed), &caption())
                .await
                .unwrap();
        }

        let media: Vec<_> = std::fs::read_dir(dir.path().join("output/feed_posts"))
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|x| x == "jpg"))
            .collect();
        assert_eq!(media.len(), 2);
    }

    #[tokio::test]
    async fn test_media_failure_stops_the_sequence() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("output"));

        // Rendered media vanished before the move
        let missing = dir.path().join("gone.mp4");
        writer
            .write(&missing, &brief(ContentType::Reel), &caption())
            .await
            .unwrap_err();

        // Neither caption nor metadata may exist after the media failure
        let reels = dir.path().join("output/reels");
        let leftovers = std::fs::read_dir(&reels)
            .map(|i| i.count())
            .unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_unwritable_output_root_fails_before_moving_media() {
        let dir = TempDir::new().unwrap();
        let rendered = dir.path().join("render.jpg");
        tokio::fs::write(&rendered, b"jpeg").await.unwrap();

        // A plain file where the output root should be
        let root = dir.path().join("output");
        tokio::fs::write(&root, b"not a dir").await.unwrap();

        let writer = OutputWriter::new(&root);
        let err = writer
            .write(&rendered, &brief(ContentType::Feed), &caption())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Write { .. }));
        // Source is untouched
        assert!(rendered.exists());
    }

    #[tokio::test]
    async fn test_caption_failure_leaves_no_metadata() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        let feed_dir = out.join("feed_posts");
        let writer = OutputWriter::new(&out);

        // The stem is second-resolution; retry if the clock rolls over
        // between the test and the writer computing it.
        for _ in 0..3 {
            let _ = std::fs::remove_dir_all(&feed_dir);
            tokio::fs::create_dir_all(&feed_dir).await.unwrap();

            let rendered = dir.path().join("render.jpg");
            tokio::fs::write(&rendered, b"jpeg").await.unwrap();

            // A directory squatting on the caption path makes step 2 fail
            // after the media move succeeded
            let stem = unique_stem(&feed_dir, "gut_health", "jpg");
            tokio::fs::create_dir_all(feed_dir.join(format!("{stem}_caption.txt")))
                .await
                .unwrap();

            match writer
                .write(&rendered, &brief(ContentType::Feed), &caption())
                .await
            {
                Err(CoreError::Write { .. }) => {
                    let metadata = std::fs::read_dir(&feed_dir)
                        .unwrap()
                        .flatten()
                        .filter(|e| {
                            e.file_name().to_string_lossy().ends_with("_metadata.json")
                        })
                        .count();
                    assert_eq!(metadata, 0);
                    return;
                }
                Ok(_) => continue,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        panic!("caption failure was never induced");
    }
}
