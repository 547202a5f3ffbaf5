// Analysis orchestrator: runs the full pipeline for each requested model.
//
//   discard blank texts -> normalize whitespace -> embed -> similarity
//   matrix -> clone detection
//
// Models run one after another. Identifiers the registry does not hold are
// skipped without error, so a client can list several candidate models and
// get results for whichever are loaded.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use super::clones::{detect_clones, round_to, ClonePair};
use super::preprocess::{discard_blank, normalize_whitespace};
use super::similarity::similarity_matrix;
use crate::embedding::registry::ModelRegistry;

/// Threshold used when a request does not supply one.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Errors from a single analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Please provide at least 2 texts to compare")]
    TooFewTexts,

    #[error("Please provide at least 2 non-empty texts")]
    TooFewNonEmptyTexts,

    #[error("{model}: {source:#}")]
    Embedding {
        model: String,
        source: anyhow::Error,
    },

    #[error("{model}: expected {expected} embeddings of one dimension, got {detail}")]
    MalformedEmbeddings {
        model: String,
        expected: usize,
        detail: String,
    },
}

impl AnalysisError {
    /// True for errors the caller can fix by resubmitting different input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::TooFewTexts | Self::TooFewNonEmptyTexts)
    }
}

/// Per-model result.
#[derive(Debug, Clone, Serialize)]
pub struct ModelAnalysis {
    pub similarity_matrix: Vec<Vec<f64>>,
    pub clones: Vec<ClonePair>,
    /// Seconds spent embedding, comparing and detecting, rounded to 3 decimals.
    pub processing_time: f64,
    pub threshold: f64,
}

/// Result of one analysis across all requested models.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// The submitted texts after blank entries were removed.
    pub texts: Vec<String>,
    pub results: BTreeMap<String, ModelAnalysis>,
    pub text_count: usize,
}

/// Analyze `texts` with every model in `models` that the registry holds.
pub async fn analyze(
    registry: &ModelRegistry,
    texts: Vec<String>,
    threshold: f64,
    models: &[String],
) -> Result<AnalysisReport, AnalysisError> {
    if texts.len() < 2 {
        return Err(AnalysisError::TooFewTexts);
    }

    let texts = discard_blank(texts);
    if texts.len() < 2 {
        return Err(AnalysisError::TooFewNonEmptyTexts);
    }

    let mut results = BTreeMap::new();

    for model in models {
        if results.contains_key(model) {
            continue;
        }
        let Some(embedder) = registry.get(model) else {
            debug!(model = %model, "Requested model not loaded, skipping");
            continue;
        };

        let start = Instant::now();

        let processed: Vec<String> = texts.iter().map(|t| normalize_whitespace(t)).collect();
        let embeddings =
            embedder
                .embed_batch(&processed)
                .await
                .map_err(|source| AnalysisError::Embedding {
                    model: model.clone(),
                    source,
                })?;
        check_embeddings(model, &embeddings, texts.len())?;

        let matrix = similarity_matrix(&embeddings);
        let clones = detect_clones(&matrix, threshold);

        let elapsed = start.elapsed().as_secs_f64();
        debug!(
            model = %model,
            clones = clones.len(),
            elapsed_secs = elapsed,
            "Model analysis complete"
        );

        results.insert(
            model.clone(),
            ModelAnalysis {
                similarity_matrix: matrix,
                clones,
                processing_time: round_to(elapsed, 3),
                threshold,
            },
        );
    }

    let text_count = texts.len();
    Ok(AnalysisReport {
        texts,
        results,
        text_count,
    })
}

/// Reject provider output that would break the N×N invariant.
fn check_embeddings(
    model: &str,
    embeddings: &[Vec<f64>],
    expected: usize,
) -> Result<(), AnalysisError> {
    let malformed = |detail: String| AnalysisError::MalformedEmbeddings {
        model: model.to_string(),
        expected,
        detail,
    };

    if embeddings.len() != expected {
        return Err(malformed(format!("{} vectors", embeddings.len())));
    }
    if let Some(first) = embeddings.first() {
        if embeddings.iter().any(|e| e.len() != first.len()) {
            return Err(malformed("vectors of differing length".to_string()));
        }
    }
    Ok(())
}
