// Similarity analysis: preprocessing, cosine matrix, clone detection and
// the per-model orchestration that ties them to the embedders.

pub mod clones;
pub mod orchestrator;
pub mod preprocess;
pub mod similarity;
