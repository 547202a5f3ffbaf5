// Text preprocessing applied before embedding.
//
// Only whitespace is normalized. Case and punctuation are left for the
// model's own tokenizer to handle (the MiniLM tokenizers lowercase on
// their own; mpnet's does too).

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop entries that are empty or whitespace-only, keeping the rest
/// unmodified and in their original order.
pub fn discard_blank(texts: Vec<String>) -> Vec<String> {
    texts.into_iter().filter(|t| !t.trim().is_empty()).collect()
}
