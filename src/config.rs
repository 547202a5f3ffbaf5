use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::embedding::catalog::known_model_names;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (CLONESCOPE_BIND)
    pub bind: String,
    /// Port the HTTP server listens on (CLONESCOPE_PORT)
    pub port: u16,
    /// Directory containing one subdirectory per model (CLONESCOPE_MODEL_DIR)
    pub model_dir: PathBuf,
    /// Models to load at startup (CLONESCOPE_MODELS, comma-separated)
    pub models: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only a malformed port is an error.
    pub fn load() -> Result<Self> {
        let port = match env::var("CLONESCOPE_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("CLONESCOPE_PORT is not a valid port: {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let model_dir = env::var("CLONESCOPE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embedding::download::default_model_dir());

        let models = env::var("CLONESCOPE_MODELS")
            .ok()
            .map(|raw| parse_model_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(known_model_names);

        Ok(Self {
            bind: env::var("CLONESCOPE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            port,
            model_dir,
            models,
        })
    }
}

/// Split a comma-separated model list, dropping empty entries.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
