// The fixed allowlist of sentence embedding models the service knows how
// to download, load and describe.

/// Static facts about a known model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Identifier used in requests, responses and on-disk directory names.
    pub name: &'static str,
    /// Human-readable description returned by GET /api/models.
    pub description: &'static str,
    /// HuggingFace repository holding the ONNX export and tokenizer.
    pub hf_repo: &'static str,
    /// Longest token sequence the model was trained on; longer input is truncated.
    pub max_tokens: usize,
    /// BERT-family exports take a `token_type_ids` input, MPNet does not.
    pub uses_token_type_ids: bool,
}

/// Model used when a request does not name any.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Description for identifiers outside the catalog.
pub const GENERIC_DESCRIPTION: &str = "Sentence transformer model";

pub static KNOWN_MODELS: [ModelSpec; 3] = [
    ModelSpec {
        name: "all-MiniLM-L6-v2",
        description: "Fast and efficient model, good for general purpose similarity",
        hf_repo: "sentence-transformers/all-MiniLM-L6-v2",
        max_tokens: 256,
        uses_token_type_ids: true,
    },
    ModelSpec {
        name: "paraphrase-MiniLM-L6-v2",
        description: "Optimized for paraphrase detection and semantic similarity",
        hf_repo: "sentence-transformers/paraphrase-MiniLM-L6-v2",
        max_tokens: 128,
        uses_token_type_ids: true,
    },
    ModelSpec {
        name: "all-mpnet-base-v2",
        description: "Higher quality embeddings, slower but more accurate",
        hf_repo: "sentence-transformers/all-mpnet-base-v2",
        max_tokens: 384,
        uses_token_type_ids: false,
    },
];

/// Look up a catalog entry by identifier.
pub fn find_model(name: &str) -> Option<&'static ModelSpec> {
    KNOWN_MODELS.iter().find(|m| m.name == name)
}

/// Description for any identifier, falling back to a generic one.
pub fn describe_model(name: &str) -> &'static str {
    find_model(name)
        .map(|m| m.description)
        .unwrap_or(GENERIC_DESCRIPTION)
}

/// All catalog identifiers, in catalog order.
pub fn known_model_names() -> Vec<String> {
    KNOWN_MODELS.iter().map(|m| m.name.to_string()).collect()
}
