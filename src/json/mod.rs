//! JSON tokenizing, parsing and the value tree.
//!
//! The pipeline runs in three stages:
//!
//! - [`lexer`] - turns a byte buffer into a [`TokenStream`] of
//!   `(kind, offset, len)` descriptors
//! - [`parser`] - recursive descent over the token stream, building a tree
//! - [`types`] - the tree: [`Value`], [`Array`], [`Object`], [`Property`],
//!   owned by a [`Root`]
//!
//! Supporting modules:
//!
//! - [`token`] - token kinds and the token stream
//! - [`hasher`] - key hashing for [`Object`] buckets
//! - [`path`] - value lookup by `a.b[0]` paths
//! - [`limits`] - input size, nesting depth and bare-root policy
//!
//! # Example
//!
//! ```
//! use minijson::json::{Lexer, Limits, Parser, Value};
//!
//! let source = br#"{"clubs": ["chess", "go"]}"#;
//! let tokens = Lexer::from_bytes(source, Limits::strict()).unwrap().tokenize_all();
//! let root = Parser::new(source, tokens, Limits::strict()).parse().unwrap();
//!
//! let first = root.lookup("clubs[0]").unwrap();
//! assert_eq!(first.and_then(Value::as_str), Some("chess"));
//! root.destroy();
//! ```

pub mod hasher;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod path;
pub mod token;
pub mod types;

// Re-export commonly used items
pub use hasher::hash_key;
pub use lexer::{tokenize, Lexer};
pub use limits::Limits;
pub use parser::{parse, parse_file, parse_with_limits, Parser};
pub use path::{Path, PathSegment};
pub use token::{Token, TokenKind, TokenStream};
pub use types::{Array, Insertion, Object, Property, Root, Value};
