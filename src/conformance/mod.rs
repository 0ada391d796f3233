//! Corpus-driven conformance testing.
//!
//! Test vectors live in a JSON corpus (see `corpus/corpus.json`). Each
//! vector is parsed with this crate and the resulting tree or error code is
//! compared with the expectation recorded next to it.

pub mod corpus;

pub use corpus::{
    matches_json, run_vector, Corpus, CorpusResults, CorpusRunner, Expected, TestResult,
    TestVector,
};

use thiserror::Error;

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors loading a corpus.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The corpus file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
    /// The corpus file is not a valid corpus document.
    #[error("malformed corpus: {0}")]
    Format(String),
}
