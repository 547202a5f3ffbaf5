// Sentence embeddings: model catalog, download, ONNX inference and the
// load-once registry the server reads from.

pub mod catalog;
pub mod download;
pub mod onnx;
pub mod registry;
pub mod traits;
