// clonescope: semantic clone and plagiarism detection.
//
// This is the library root. Each module corresponds to a major subsystem
// of the analysis service.

pub mod analysis;
pub mod config;
pub mod embedding;
pub mod output;

#[cfg(feature = "web")]
pub mod web;
