//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use igc_caption::{CaptionSupplier, OpenAiSupplier};
use igc_core::{
    brand, format_summary, preprocess_theme, run_batch, AssetCatalog, BatchRequest,
    ContentGenerator, FfmpegRenderer, GenerateRequest, LopdfExtractor, PreprocessOptions,
    PreprocessOutcome, QuoteCollection, Settings, API_KEY_ENV,
};
use igc_models::ContentType;

/// Default website when neither settings nor the flag name one.
const DEFAULT_WEBSITE: &str = "https://www.realhealthkombucha.com/";

pub struct GenerateArgs {
    pub theme: String,
    pub content_type: ContentType,
    pub image: Option<PathBuf>,
    pub videos: Vec<PathBuf>,
    pub music: Option<PathBuf>,
    pub no_pdf: bool,
    pub use_quote: bool,
    pub combined: bool,
    pub llm_refine: bool,
}

/// The supplier is optional: without an API key every caption comes from
/// the deterministic fallback and refinement is skipped.
fn maybe_supplier(settings: &Settings) -> Option<Box<dyn CaptionSupplier>> {
    let key = match Settings::api_key_from_env() {
        Ok(key) => key,
        Err(_) => {
            warn!("{API_KEY_ENV} not set; captions will use the deterministic fallback");
            return None;
        }
    };
    match OpenAiSupplier::new(key, &settings.ai.model, &settings.ai.language) {
        Ok(supplier) => Some(Box::new(supplier)),
        Err(e) => {
            warn!(error = %e, "AI supplier unavailable, using fallback captions");
            None
        }
    }
}

fn build_generator(settings: Settings) -> anyhow::Result<ContentGenerator> {
    let supplier = maybe_supplier(&settings);
    let renderer = FfmpegRenderer::from_settings(&settings);
    ContentGenerator::new(
        settings,
        Box::new(renderer),
        supplier,
        Box::new(LopdfExtractor),
    )
    .context("failed to initialise the content generator")
}

pub async fn extract_brand(
    mut settings: Settings,
    settings_path: &Path,
    website: Option<String>,
) -> anyhow::Result<()> {
    let url = website
        .or_else(|| (!settings.brand.website.is_empty()).then(|| settings.brand.website.clone()))
        .unwrap_or_else(|| DEFAULT_WEBSITE.to_string());

    println!("Extracting brand information from {url}...");
    let extracted = brand::extract_brand(&url).await?;

    println!("  Name:      {}", extracted.name);
    println!("  Primary:   {}", extracted.colors.primary);
    println!("  Secondary: {}", extracted.colors.secondary);
    println!("  Accent:    {}", extracted.colors.accent);
    println!("  Heading:   {}", extracted.fonts.heading);
    println!("  Body:      {}", extracted.fonts.body);

    settings.brand = extracted;
    settings.save(settings_path)?;
    println!("Brand information saved to {}", settings_path.display());
    Ok(())
}

pub async fn preprocess_pdfs(
    settings: Settings,
    theme: Option<String>,
    all: bool,
    force: bool,
    max_pages: usize,
    no_llm_refine: bool,
) -> anyhow::Result<()> {
    let catalog = AssetCatalog::new(&settings.paths.assets_dir);
    let themes = match (&theme, all) {
        (Some(theme), _) => vec![theme.clone()],
        (None, true) => catalog.list_themes(),
        (None, false) => bail!("specify --theme <name> or --all"),
    };

    let supplier = if no_llm_refine {
        None
    } else {
        maybe_supplier(&settings)
    };
    let options = PreprocessOptions {
        max_pages,
        force,
        ..PreprocessOptions::default()
    };

    let mut wrote_anything = false;
    for theme in &themes {
        let outcome = preprocess_theme(
            &catalog,
            &LopdfExtractor,
            supplier.as_deref(),
            theme,
            &options,
        )
        .await?;
        match outcome {
            PreprocessOutcome::Written(cache) => {
                wrote_anything = true;
                println!(
                    "{theme}: {} PDF(s), {} key points -> {}",
                    cache.summary.total_pdfs,
                    cache.summary.combined_key_points.len(),
                    catalog.cache_path(theme).display()
                );
            }
            PreprocessOutcome::Existing(_) => {
                wrote_anything = true;
                println!("{theme}: cache already exists (use --force to reprocess)");
            }
            PreprocessOutcome::NoPdfText => {
                println!("{theme}: no PDFs with extractable text");
            }
        }
    }

    if !wrote_anything && theme.is_some() {
        bail!("no PDFs found or processing failed");
    }
    Ok(())
}

pub fn themes(settings: Settings) -> anyhow::Result<()> {
    let catalog = AssetCatalog::new(&settings.paths.assets_dir);
    let themes = catalog.list_themes();
    if themes.is_empty() {
        println!(
            "No themes found under {}",
            settings.paths.assets_dir.display()
        );
        return Ok(());
    }

    println!("Available themes:");
    for theme in &themes {
        let stats = catalog.theme_stats(theme)?;
        let cached = catalog.cache_path(theme).exists();
        println!(
            "  {theme}: {} image(s), {} video(s), {} PDF(s){}",
            stats.images,
            stats.videos,
            stats.pdfs,
            if cached { ", cached key points" } else { "" }
        );
    }
    Ok(())
}

pub async fn generate(settings: Settings, args: GenerateArgs) -> anyhow::Result<()> {
    let generator = build_generator(settings)?;
    let mut rng = StdRng::from_os_rng();

    let mut request = GenerateRequest::new(&args.theme, args.content_type);
    request.brief.explicit_assets = match args.content_type {
        ContentType::Feed => args.image.into_iter().collect(),
        ContentType::Reel => args.videos,
    };
    request.brief.use_pdf_content = !args.no_pdf;
    request.brief.use_quote = args.use_quote;
    request.brief.llm_refine = args.llm_refine;
    request.music = args.music;
    request.combined = args.combined;

    println!(
        "Generating {} content for theme: {}",
        args.content_type, args.theme
    );
    let result = generator.generate(&request, &mut rng).await?;

    println!("Generated successfully!");
    println!("  Media:    {}", result.output_media.display());
    println!("  Caption:  {}", result.caption_file.display());
    println!("  Metadata: {}", result.metadata_file.display());
    Ok(())
}

pub async fn batch_generate(
    settings: Settings,
    feeds: usize,
    reels: usize,
    themes: Vec<String>,
    music: Option<PathBuf>,
    use_quote: bool,
    llm_refine: bool,
) -> anyhow::Result<()> {
    let generator = build_generator(settings)?;
    let mut rng = StdRng::from_os_rng();

    let request = BatchRequest {
        feeds,
        reels,
        themes,
        music,
        use_quote,
        llm_refine,
    };
    let summary = run_batch(&generator, &request, &mut rng).await?;

    print!("{}", format_summary(&summary));

    if summary.total_failures() > 0 {
        // The summary above already lists every failure
        std::process::exit(1);
    }
    Ok(())
}

pub fn stats(settings: Settings, theme: Option<String>) -> anyhow::Result<()> {
    let catalog = AssetCatalog::new(&settings.paths.assets_dir);
    let themes = match theme {
        Some(theme) => vec![theme],
        None => catalog.list_themes(),
    };

    let mut totals = (0usize, 0usize, 0usize);
    for theme in &themes {
        let stats = catalog.theme_stats(theme)?;
        println!("{theme}:");
        println!("  Images: {}", stats.images);
        println!("  Videos: {}", stats.videos);
        println!("  PDFs:   {}", stats.pdfs);
        totals.0 += stats.images;
        totals.1 += stats.videos;
        totals.2 += stats.pdfs;
    }

    if themes.len() > 1 {
        println!(
            "Total: {} image(s), {} video(s), {} PDF(s) across {} theme(s)",
            totals.0,
            totals.1,
            totals.2,
            themes.len()
        );
    }

    let quotes = QuoteCollection::load(&catalog.quotes_file())?;
    if !quotes.is_empty() {
        println!("Quotes: {} in {} categories", quotes.len(), quotes.categories().len());
    }
    let music = catalog.music_tracks().len();
    if music > 0 {
        println!("Music tracks: {music}");
    }
    Ok(())
}

pub fn show_config(settings: &Settings, settings_path: &Path) -> anyhow::Result<()> {
    println!("# {}", settings_path.display());
    print!("{}", serde_yaml::to_string(settings)?);
    println!(
        "# {}: {}",
        API_KEY_ENV,
        if Settings::api_key_from_env().is_ok() {
            "set"
        } else {
            "not set"
        }
    );
    Ok(())
}
