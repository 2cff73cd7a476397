//! Content brief construction.
//!
//! Resolves one generation request into a [`ContentBrief`]: selects source
//! assets, resolves key points through the cache/raw-PDF/default precedence,
//! and optionally attaches a quote. The only side effect is the optional
//! supplier call used for LLM refinement.

use std::path::PathBuf;

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::{debug, warn};

use igc_caption::CaptionSupplier;
use igc_models::{AssetKind, AssetRef, ContentBrief, ContentType};

use crate::catalog::AssetCatalog;
use crate::config::Settings;
use crate::error::{CoreError, CoreResult};
use crate::pdf::{extract_key_points, PdfTextExtractor, DEFAULT_MAX_POINTS};
use crate::quotes::QuoteCollection;

/// Clips per reel when selecting automatically.
pub const REEL_CLIP_COUNT: usize = 3;

/// Page cap per PDF when extracting at generation time (the preprocessing
/// cache uses a deeper cap).
pub const GENERATION_MAX_PAGES: usize = 5;

/// Custom hashtags appended after the base pool.
const MAX_CUSTOM_HASHTAGS: usize = 10;

/// One generation request, before resolution.
#[derive(Debug, Clone)]
pub struct BriefRequest {
    pub theme: String,
    pub content_type: ContentType,
    /// Explicit assets; when non-empty they are used verbatim.
    pub explicit_assets: Vec<PathBuf>,
    /// Derive key points from PDF content (cache or raw extraction).
    pub use_pdf_content: bool,
    /// Attach a random quote from the quotes collection.
    pub use_quote: bool,
    /// Refine raw-extracted key points through the supplier.
    pub llm_refine: bool,
    /// Treat an existing key-point cache as stale.
    pub force_stale: bool,
}

impl BriefRequest {
    pub fn new(theme: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            theme: theme.into(),
            content_type,
            explicit_assets: Vec::new(),
            use_pdf_content: true,
            use_quote: false,
            llm_refine: false,
            force_stale: false,
        }
    }
}

/// Where the key points for a request come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPointSource {
    /// `content.json` summary; raw PDF extraction must not run.
    Cache,
    /// Extract and score from the theme's PDFs now.
    RawPdf { refine: bool },
    /// No PDF content requested or available.
    DefaultStub,
}

/// The key-point precedence decision, isolated from I/O.
pub fn key_point_source(
    cache_present: bool,
    force_stale: bool,
    use_pdf_content: bool,
    llm_refine: bool,
) -> KeyPointSource {
    if !use_pdf_content {
        KeyPointSource::DefaultStub
    } else if cache_present && !force_stale {
        KeyPointSource::Cache
    } else {
        KeyPointSource::RawPdf { refine: llm_refine }
    }
}

/// Builds [`ContentBrief`] values from requests against a catalog.
pub struct BriefBuilder<'a> {
    catalog: &'a AssetCatalog,
    settings: &'a Settings,
    extractor: &'a dyn PdfTextExtractor,
    quotes: &'a QuoteCollection,
}

impl<'a> BriefBuilder<'a> {
    pub fn new(
        catalog: &'a AssetCatalog,
        settings: &'a Settings,
        extractor: &'a dyn PdfTextExtractor,
        quotes: &'a QuoteCollection,
    ) -> Self {
        Self {
            catalog,
            settings,
            extractor,
            quotes,
        }
    }

    /// Resolve a request into a brief. `supplier` is only consulted when the
    /// request asks for LLM refinement; its failure degrades to raw points.
    pub async fn build<R: Rng>(
        &self,
        request: &BriefRequest,
        supplier: Option<&dyn CaptionSupplier>,
        rng: &mut R,
    ) -> CoreResult<ContentBrief> {
        let assets = self.select_assets(request, rng)?;
        let key_points = self.resolve_key_points(request, supplier).await?;

        let quote = request
            .use_quote
            .then(|| self.quotes.random_quote(rng, None));

        let theme = self.settings.theme(&request.theme);

        Ok(ContentBrief {
            theme: request.theme.clone(),
            content_type: request.content_type,
            key_points,
            quote,
            assets,
            hashtags: theme.hashtags.combined(MAX_CUSTOM_HASHTAGS),
            target_audience: theme.target_audience,
        })
    }

    /// Asset selection policy: explicit-verbatim, else random among theme
    /// assets, else the shared pool, else `InsufficientAssets`.
    fn select_assets<R: Rng>(
        &self,
        request: &BriefRequest,
        rng: &mut R,
    ) -> CoreResult<Vec<AssetRef>> {
        let kind = match request.content_type {
            ContentType::Feed => AssetKind::Image,
            ContentType::Reel => AssetKind::Video,
        };

        if !request.explicit_assets.is_empty() {
            self.catalog.require_theme(&request.theme)?;
            return request
                .explicit_assets
                .iter()
                .map(|path| {
                    if path.is_file() {
                        Ok(AssetRef::new(path.clone(), kind))
                    } else {
                        Err(CoreError::AssetNotFound(path.clone()))
                    }
                })
                .collect();
        }

        let mut pool = self.catalog.assets_for(&request.theme, kind)?;
        if pool.is_empty() {
            pool = self.catalog.shared_assets(kind);
            if !pool.is_empty() {
                debug!(theme = %request.theme, %kind, "theme pool empty, using shared assets");
            }
        }
        if pool.is_empty() {
            return Err(CoreError::insufficient_assets(&request.theme, kind));
        }

        match request.content_type {
            ContentType::Feed => {
                // pool is non-empty, choose cannot fail
                Ok(pool.choose(rng).cloned().into_iter().collect())
            }
            ContentType::Reel => {
                if pool.len() >= REEL_CLIP_COUNT {
                    Ok(pool
                        .choose_multiple(rng, REEL_CLIP_COUNT)
                        .cloned()
                        .collect())
                } else {
                    // Repeat the available clips to fill the reel.
                    Ok(pool.iter().cycle().take(REEL_CLIP_COUNT).cloned().collect())
                }
            }
        }
    }

    async fn resolve_key_points(
        &self,
        request: &BriefRequest,
        supplier: Option<&dyn CaptionSupplier>,
    ) -> CoreResult<Vec<String>> {
        let cache = if request.use_pdf_content {
            self.catalog.load_cache(&request.theme)?
        } else {
            None
        };
        let cache_present = cache.as_ref().is_some_and(|c| c.has_key_points());

        match key_point_source(
            cache_present,
            request.force_stale,
            request.use_pdf_content,
            request.llm_refine,
        ) {
            KeyPointSource::Cache => match cache {
                Some(cache) => {
                    debug!(theme = %request.theme, "using key-point cache");
                    Ok(cache.summary.combined_key_points)
                }
                None => Ok(Vec::new()),
            },
            KeyPointSource::RawPdf { refine } => {
                let text = self.combined_pdf_text(&request.theme)?;
                if text.trim().is_empty() {
                    return Ok(Vec::new());
                }
                let raw = extract_key_points(&text, DEFAULT_MAX_POINTS);
                if refine {
                    if let Some(supplier) = supplier {
                        match supplier.refine_key_points(&raw, &request.theme).await {
                            Ok(refined) if !refined.is_empty() => return Ok(refined),
                            Ok(_) => {}
                            Err(e) => {
                                warn!(theme = %request.theme, error = %e, "key-point refinement failed, keeping raw points");
                            }
                        }
                    }
                }
                Ok(raw)
            }
            KeyPointSource::DefaultStub => Ok(Vec::new()),
        }
    }

    fn combined_pdf_text(&self, theme: &str) -> CoreResult<String> {
        let pdfs = self.catalog.assets_for(theme, AssetKind::Pdf)?;
        let mut chunks = Vec::with_capacity(pdfs.len());
        for pdf in &pdfs {
            match self.extractor.extract_text(&pdf.path, GENERATION_MAX_PAGES) {
                Ok(text) if !text.trim().is_empty() => chunks.push(text),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %pdf.path.display(), error = %e, "skipping unreadable PDF");
                }
            }
        }
        Ok(chunks.join("\n\n---\n\n"))
    }
}
