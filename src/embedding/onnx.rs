// Local sentence embedder backed by ONNX Runtime.
//
// Each catalog model is a sentence-transformers export: the ONNX graph
// returns last_hidden_state [batch, seq_len, dim], and the sentence vector
// is the mean of the token vectors weighted by the attention mask (the
// pooling every catalog model was trained with).
//
// Dimensionality is read off the output tensor, so the same code serves
// the 384-dim MiniLM models and the 768-dim mpnet model.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::catalog::ModelSpec;
use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::traits::Embedder;

/// Sentence embedder for one catalog model.
///
/// `Session::run` takes `&mut self`, and inference is moved to
/// spawn_blocking which needs `'static` handles, hence Arc<Mutex<Session>>.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    uses_token_type_ids: bool,
}

impl SentenceEmbedder {
    /// Load a model and its tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Run `clonescope download-models` first if they don't exist.
    pub fn load(model_dir: &Path, spec: &ModelSpec) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `clonescope download-models` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `clonescope download-models` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer for {}: {}", spec.name, e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: spec.max_tokens,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!(model = spec.name, dir = %model_dir.display(), "Loaded sentence embedding model");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            uses_token_type_ids: spec.uses_token_type_ids,
        })
    }
}

#[async_trait]
impl Embedder for SentenceEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let uses_token_type_ids = self.uses_token_type_ids;
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            embed_sync(&session, &tokenizer, uses_token_type_ids, &texts)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run inference and mean-pool. Runs on a blocking thread.
fn embed_sync(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    uses_token_type_ids: bool,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        anyhow::bail!("Tokenizer produced no tokens for any input text");
    }

    // Right-pad every sequence to max_len with pad id 0 and mask 0.
    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let pad_len = max_len - enc.get_ids().len();
        input_ids_flat.extend(enc.get_ids().iter().map(|&id| id as i64));
        input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        attention_mask_flat.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids_flat)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat.clone()))
        .context("Failed to create attention_mask tensor")?;

    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        // MPNet exports reject an unexpected token_type_ids input
        let run_result = if uses_token_type_ids {
            let token_type_ids_tensor =
                Tensor::from_array((shape, vec![0i64; batch_size * max_len]))
                    .context("Failed to create token_type_ids tensor")?;
            session.run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
        } else {
            session.run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            })
        };
        let outputs = run_result.context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    let token_count = batch_size * max_len;
    if hidden_states.is_empty() || hidden_states.len() % token_count != 0 {
        anyhow::bail!(
            "Unexpected embedding output size {} for batch {}x{}",
            hidden_states.len(),
            batch_size,
            max_len
        );
    }
    let dim = hidden_states.len() / token_count;

    let embeddings = mean_pool(&hidden_states, &attention_mask_flat, batch_size, max_len, dim);

    debug!(batch_size, dim, "Computed sentence embeddings");

    Ok(embeddings)
}

/// Average token vectors per sequence, weighted by the attention mask.
///
/// `hidden` is laid out [batch, seq_len, dim] row-major; `mask` is
/// [batch, seq_len]. A sequence with an all-zero mask pools to a zero vector.
pub(crate) fn mean_pool(
    hidden: &[f32],
    mask: &[i64],
    batch_size: usize,
    seq_len: usize,
    dim: usize,
) -> Vec<Vec<f64>> {
    let mut embeddings = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let mut sum = vec![0.0_f64; dim];
        let mut mask_sum = 0.0_f64;

        for j in 0..seq_len {
            let mask_val = mask[i * seq_len + j] as f64;
            if mask_val > 0.0 {
                mask_sum += mask_val;
                let offset = (i * seq_len + j) * dim;
                for (k, acc) in sum.iter_mut().enumerate() {
                    *acc += hidden[offset + k] as f64 * mask_val;
                }
            }
        }

        if mask_sum > 0.0 {
            for val in &mut sum {
                *val /= mask_sum;
            }
        }

        embeddings.push(sum);
    }

    embeddings
}
