//! Error codes for the minijson pipeline.
//!
//! Every failure the lexer, parser or path lookup can report is a variant of
//! [`ErrorCode`]. Each variant carries a stable numeric code so that callers
//! (and the conformance corpus) can compare failures without matching on
//! message text.
//!
//! Construction failures (I/O, size, encoding) use codes 10 and up, parser
//! failures use codes 1 through 9, path failures use 20.

use thiserror::Error;

use crate::json::token::TokenKind;

/// All errors reported by the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ErrorCode {
    /// The token stream holds nothing but the end-of-input marker.
    #[error("EmptyTokenStream")]
    EmptyTokenStream,

    /// A token is present but not valid at this grammar position.
    #[error("UnexpectedToken({kind} at offset {offset})")]
    UnexpectedToken {
        /// Kind of the offending token
        kind: TokenKind,
        /// Byte offset of the token in the source
        offset: usize,
    },

    /// A lexically unknown token reached a position expecting a value.
    #[error("UnknownToken(offset {offset}, length {len})")]
    UnknownToken {
        /// Byte offset of the token in the source
        offset: usize,
        /// Span length of the token
        len: usize,
    },

    /// Bracket and brace counts do not return to zero.
    #[error("UnbalancedNesting({0})")]
    UnbalancedNesting(/* depth */ i64),

    /// An integer literal does not fit in an `i64`.
    #[error("InvalidNumber(offset {offset})")]
    InvalidNumber {
        /// Byte offset of the literal in the source
        offset: usize,
    },

    /// Arrays and objects nest deeper than the configured limit.
    #[error("NestingTooDeep({0}, {1})")]
    NestingTooDeep(/* depth */ u64, /* limit */ u64),

    /// A scalar document root while bare roots are disabled.
    #[error("BareRootRejected({kind})")]
    BareRootRejected {
        /// Kind of the scalar root token
        kind: TokenKind,
    },

    /// The input exceeds the configured maximum size.
    #[error("InputTooLarge({0}, {1})")]
    InputTooLarge(/* size */ u64, /* limit */ u64),

    /// The input is not valid UTF-8.
    #[error("InvalidUtf8")]
    InvalidUtf8,

    /// The input could not be read.
    #[error("Io({0})")]
    Io(/* reason */ String),

    /// A lookup path could not be parsed.
    #[error("InvalidPath({0})")]
    InvalidPath(/* reason */ String),
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::EmptyTokenStream => 1,
            ErrorCode::UnexpectedToken { .. } => 2,
            ErrorCode::UnknownToken { .. } => 3,
            ErrorCode::UnbalancedNesting(_) => 4,
            ErrorCode::InvalidNumber { .. } => 5,
            ErrorCode::NestingTooDeep(_, _) => 6,
            ErrorCode::BareRootRejected { .. } => 7,
            ErrorCode::InputTooLarge(_, _) => 10,
            ErrorCode::InvalidUtf8 => 11,
            ErrorCode::Io(_) => 12,
            ErrorCode::InvalidPath(_) => 20,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::EmptyTokenStream => "EmptyTokenStream",
            ErrorCode::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorCode::UnknownToken { .. } => "UnknownToken",
            ErrorCode::UnbalancedNesting(_) => "UnbalancedNesting",
            ErrorCode::InvalidNumber { .. } => "InvalidNumber",
            ErrorCode::NestingTooDeep(_, _) => "NestingTooDeep",
            ErrorCode::BareRootRejected { .. } => "BareRootRejected",
            ErrorCode::InputTooLarge(_, _) => "InputTooLarge",
            ErrorCode::InvalidUtf8 => "InvalidUtf8",
            ErrorCode::Io(_) => "Io",
            ErrorCode::InvalidPath(_) => "InvalidPath",
        }
    }

    /// Returns true for errors raised by the parser (as opposed to input
    /// construction or path syntax).
    pub fn is_parse_error(&self) -> bool {
        (1..10).contains(&self.code())
    }
}

/// Result type for minijson operations.
pub type JsonResult<T> = Result<T, ErrorCode>;
