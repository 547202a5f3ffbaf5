// Model registry: the set of embedders that loaded at startup.
//
// Built once before the server starts, then wrapped in an Arc and shared
// read-only by every request. There is no reload: a model that fails to
// load stays absent for the life of the process.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{describe_model, find_model};
use super::download::model_subdir;
use super::onnx::SentenceEmbedder;
use super::traits::Embedder;

/// One loaded model.
struct LoadedModel {
    name: String,
    embedder: Arc<dyn Embedder>,
}

/// Entry in the GET /api/models listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

/// Immutable, ordered set of loaded embedders keyed by model identifier.
#[derive(Default)]
pub struct ModelRegistry {
    models: Vec<LoadedModel>,
}

impl ModelRegistry {
    /// Load every named model from `model_dir`.
    ///
    /// Failures are logged and skipped. Names outside the catalog are
    /// skipped too, since their input layout and token limit are unknown.
    pub fn load(model_dir: &Path, names: &[String]) -> Self {
        let mut registry = Self::default();

        for name in names {
            let Some(spec) = find_model(name) else {
                warn!(model = %name, "Unknown model identifier, skipping");
                continue;
            };
            if registry.contains(spec.name) {
                continue;
            }

            match SentenceEmbedder::load(&model_subdir(model_dir, spec.name), spec) {
                Ok(embedder) => {
                    info!(model = spec.name, "Loaded model");
                    registry = registry.with_model(spec.name, Arc::new(embedder));
                }
                Err(e) => {
                    warn!(model = spec.name, error = %e, "Failed to load model");
                }
            }
        }

        info!(models_loaded = registry.len(), "Model loading finished");
        registry
    }

    /// Add an embedder under `name`, replacing any existing one.
    pub fn with_model(mut self, name: impl Into<String>, embedder: Arc<dyn Embedder>) -> Self {
        let name = name.into();
        match self.models.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.embedder = embedder,
            None => self.models.push(LoadedModel { name, embedder }),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Embedder> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.embedder.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Loaded model identifiers, in load order.
    pub fn names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    /// Loaded models with their descriptions, in load order.
    pub fn list(&self) -> Vec<ModelInfo> {
        self.models
            .iter()
            .map(|m| ModelInfo {
                name: m.name.clone(),
                description: describe_model(&m.name).to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct ConstEmbedder(f64);

    #[async_trait]
    impl Embedder for ConstEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
            Ok(texts.iter().map(|_| vec![self.0]).collect())
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ModelRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get("all-MiniLM-L6-v2").is_none());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_names_keep_insertion_order() {
        let registry = ModelRegistry::default()
            .with_model("all-mpnet-base-v2", Arc::new(ConstEmbedder(1.0)))
            .with_model("all-MiniLM-L6-v2", Arc::new(ConstEmbedder(2.0)));
        assert_eq!(
            registry.names(),
            vec!["all-mpnet-base-v2", "all-MiniLM-L6-v2"]
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_with_model_replaces_same_name() {
        let registry = ModelRegistry::default()
            .with_model("m", Arc::new(ConstEmbedder(1.0)))
            .with_model("m", Arc::new(ConstEmbedder(7.0)));
        assert_eq!(registry.len(), 1);
        let out = registry
            .get("m")
            .unwrap()
            .embed_batch(&["x".to_string()])
            .await
            .unwrap();
        assert_eq!(out, vec![vec![7.0]]);
    }

    #[test]
    fn test_list_uses_catalog_descriptions() {
        let registry = ModelRegistry::default()
            .with_model("paraphrase-MiniLM-L6-v2", Arc::new(ConstEmbedder(1.0)))
            .with_model("custom", Arc::new(ConstEmbedder(1.0)));
        let list = registry.list();
        assert_eq!(
            list[0].description,
            "Optimized for paraphrase detection and semantic similarity"
        );
        assert_eq!(list[1].description, "Sentence transformer model");
    }

    #[test]
    fn test_load_skips_missing_and_unknown_models() {
        let dir = std::env::temp_dir().join("clonescope-registry-test-nonexistent");
        let names = vec!["all-MiniLM-L6-v2".to_string(), "not-a-model".to_string()];
        let registry = ModelRegistry::load(&dir, &names);
        assert!(registry.is_empty());
    }
}
