// Shared test fixtures: deterministic embedders that need no model files.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use clonescope::embedding::registry::ModelRegistry;
use clonescope::embedding::traits::Embedder;

/// Bag-of-words embedder: each lowercase word is hashed into one of
/// `DIM` buckets. Identical texts get identical vectors; texts with no
/// words in common are (barring a hash collision) orthogonal.
pub struct BagOfWordsEmbedder;

const DIM: usize = 1024;

fn bucket(word: &str) -> usize {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % DIM as u64) as usize
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; DIM];
                for word in text
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                {
                    v[bucket(&word.to_lowercase())] += 1.0;
                }
                v
            })
            .collect())
    }
}

/// Embedder that always fails, standing in for an inference error.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
        anyhow::bail!("ONNX inference failed: out of memory")
    }
}

/// Embedder that returns one vector too few.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
    }
}

/// Registry holding all three catalog identifiers backed by the fake embedder.
pub fn full_registry() -> ModelRegistry {
    ModelRegistry::default()
        .with_model("all-MiniLM-L6-v2", Arc::new(BagOfWordsEmbedder))
        .with_model("paraphrase-MiniLM-L6-v2", Arc::new(BagOfWordsEmbedder))
        .with_model("all-mpnet-base-v2", Arc::new(BagOfWordsEmbedder))
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
