use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use clonescope::analysis::orchestrator::{self, DEFAULT_THRESHOLD};
use clonescope::config::Config;
use clonescope::embedding::catalog::{find_model, DEFAULT_MODEL, KNOWN_MODELS};
use clonescope::embedding::registry::ModelRegistry;

/// clonescope: semantic clone and plagiarism detection.
///
/// Compares texts with sentence embedding models and flags pairs whose
/// cosine similarity meets a threshold.
#[derive(Parser)]
#[command(name = "clonescope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load models and start the HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind (default: CLONESCOPE_BIND or 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (default: CLONESCOPE_PORT or 5001)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Download ONNX models from HuggingFace
    DownloadModels {
        /// Model to download (repeatable; default: all known models)
        #[arg(long = "model")]
        models: Vec<String>,
    },

    /// Compare the contents of files and report likely clones
    Analyze {
        /// Files to compare; each file is one text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Flag pairs at or above this cosine similarity
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Model to use (repeatable; default: all-MiniLM-L6-v2)
        #[arg(long = "model")]
        models: Vec<String>,
    },

    /// Show which models are downloaded and ready to load
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("clonescope=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { bind, port } => {
            info!(model_dir = %config.model_dir.display(), "Loading embedding models...");
            let registry = ModelRegistry::load(&config.model_dir, &config.models);
            info!("Starting server with {} models loaded", registry.len());

            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let port = port.unwrap_or(config.port);
            let state = clonescope::web::AppState::new(registry);
            clonescope::web::run_server(state, &bind, port).await?;
        }

        Commands::DownloadModels { models } => {
            let specs = if models.is_empty() {
                KNOWN_MODELS.iter().collect::<Vec<_>>()
            } else {
                models
                    .iter()
                    .map(|name| {
                        find_model(name).with_context(|| {
                            format!(
                                "Unknown model {name:?}. Known models: {}",
                                KNOWN_MODELS
                                    .iter()
                                    .map(|m| m.name)
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            };

            println!("Downloading ONNX models...");
            println!("  Destination: {}", config.model_dir.display());

            for spec in specs {
                clonescope::embedding::download::download_model(&config.model_dir, spec).await?;
            }

            println!("\n{}", "Models downloaded successfully.".bold());
            println!("You can now run `clonescope serve` or `clonescope analyze`.");
        }

        Commands::Analyze {
            files,
            threshold,
            models,
        } => {
            let models = if models.is_empty() {
                vec![DEFAULT_MODEL.to_string()]
            } else {
                models
            };

            let mut texts = Vec::with_capacity(files.len());
            for path in &files {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                texts.push(text);
            }

            // Blank files are dropped by the orchestrator; keep labels aligned.
            let labels: Vec<String> = files
                .iter()
                .zip(&texts)
                .filter(|(_, t)| !t.trim().is_empty())
                .map(|(p, _)| p.display().to_string())
                .collect();

            let registry = ModelRegistry::load(&config.model_dir, &models);
            let report = orchestrator::analyze(&registry, texts, threshold, &models).await?;
            clonescope::output::terminal::display_report(&report, &labels);
        }

        Commands::Status => {
            clonescope::output::terminal::display_model_status(&config.model_dir);
        }
    }

    Ok(())
}
