//! minijson - a small JSON reader producing an owned value tree.
//!
//! Documents are read into memory in one piece (bounded by
//! [`json::Limits`]), tokenized into position-tagged tokens, and parsed by a
//! recursive descent parser into a tree of [`json::Value`]s owned by a
//! [`json::Root`].
//!
//! # Modules
//!
//! - [`json`] - lexer, parser, value tree and path lookup
//! - [`error`] - error codes shared by every stage
//! - [`conformance`] - corpus-driven conformance runner
//!
//! Strings are kept exactly as written between their quotes; escape
//! sequences are not decoded. There is no serializer.

// Library code reports failures through ErrorCode rather than panicking.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod conformance;
pub mod error;
pub mod json;

// Re-export commonly used types
pub use conformance::{CorpusResults, CorpusRunner, TestResult};
pub use error::{ErrorCode, JsonResult};
pub use json::{parse, parse_file, parse_with_limits, Limits, Root, Value};
