// Embedder trait: the seam between the analysis pipeline and a model.
//
// The default implementation runs a sentence-transformers model locally
// through ONNX Runtime. Tests plug in deterministic fakes.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning texts into dense vectors. Implementations must be
/// async so CPU-bound inference can be moved off the runtime threads.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    /// All vectors from one embedder share the same dimensionality.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}
