//! Instagram content generator CLI.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use igc_core::Settings;
use igc_models::ContentType;

#[derive(Parser)]
#[command(name = "igc", version, about = "Instagram content generator")]
struct Cli {
    /// Settings file (created with defaults when missing)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract brand colors and fonts from the website into the settings file
    ExtractBrand {
        /// Override the website configured in settings
        #[arg(long)]
        website: Option<String>,
    },

    /// Preprocess theme PDFs into the per-theme content.json cache
    PreprocessPdfs {
        /// Theme to preprocess
        #[arg(short, long)]
        theme: Option<String>,

        /// Preprocess every theme
        #[arg(long, conflicts_with = "theme")]
        all: bool,

        /// Rewrite an existing cache
        #[arg(long)]
        force: bool,

        /// Page cap per PDF
        #[arg(long, default_value_t = 10)]
        max_pages: usize,

        /// Skip LLM refinement of extracted key points
        #[arg(long)]
        no_llm_refine: bool,
    },

    /// List themes with their asset counts
    Themes,

    /// Generate one feed post or reel
    Generate {
        /// Theme to generate for
        #[arg(short, long)]
        theme: String,

        /// Content type: feed or reel
        #[arg(long = "type", value_name = "TYPE")]
        content_type: ContentType,

        /// Specific image to use (feed posts)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Specific videos to use (reels, repeatable)
        #[arg(short, long)]
        videos: Vec<PathBuf>,

        /// Background music file (reels)
        #[arg(short, long)]
        music: Option<PathBuf>,

        /// Skip PDF content entirely
        #[arg(long)]
        no_pdf: bool,

        /// Overlay a quote from the quotes collection
        #[arg(long)]
        use_quote: bool,

        /// Combined reel: footage plus quote and health-benefit overlays
        #[arg(long)]
        combined: bool,

        /// Refine key points through the AI supplier
        #[arg(long)]
        llm_refine: bool,
    },

    /// Generate several feed posts and reels in one run
    BatchGenerate {
        /// Number of feed posts
        #[arg(short, long, default_value_t = 3)]
        feeds: usize,

        /// Number of reels
        #[arg(short, long, default_value_t = 3)]
        reels: usize,

        /// Themes to draw from (repeatable; all themes when omitted)
        #[arg(short, long)]
        themes: Vec<String>,

        /// Music pinned for every reel (random track per reel when omitted)
        #[arg(short, long)]
        music: Option<PathBuf>,

        /// Generate without quotes
        #[arg(long)]
        no_use_quote: bool,

        /// Skip LLM refinement
        #[arg(long)]
        no_llm_refine: bool,
    },

    /// Show asset statistics
    Stats {
        /// Limit to one theme
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Print the active configuration
    Config,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("igc=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .ok();

    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let settings_path = cli.config.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path)?;
    info!(settings = %settings_path.display(), "settings loaded");

    match cli.command {
        Commands::ExtractBrand { website } => {
            commands::extract_brand(settings, &settings_path, website).await
        }
        Commands::PreprocessPdfs {
            theme,
            all,
            force,
            max_pages,
            no_llm_refine,
        } => commands::preprocess_pdfs(settings, theme, all, force, max_pages, no_llm_refine).await,
        Commands::Themes => commands::themes(settings),
        Commands::Generate {
            theme,
            content_type,
            image,
            videos,
            music,
            no_pdf,
            use_quote,
            combined,
            llm_refine,
        } => {
            commands::generate(
                settings,
                commands::GenerateArgs {
                    theme,
                    content_type,
                    image,
                    videos,
                    music,
                    no_pdf,
                    use_quote,
                    combined,
                    llm_refine,
                },
            )
            .await
        }
        Commands::BatchGenerate {
            feeds,
            reels,
            themes,
            music,
            no_use_quote,
            no_llm_refine,
        } => {
            commands::batch_generate(
                settings,
                feeds,
                reels,
                themes,
                music,
                !no_use_quote,
                !no_llm_refine,
            )
            .await
        }
        Commands::Stats { theme } => commands::stats(settings, theme),
        Commands::Config => commands::show_config(&settings, &settings_path),
    }
}
