//! Tokens and the token stream.
//!
//! A [`Token`] is a `(kind, offset, len)` descriptor into the source buffer.
//! Tokens never copy text; the parser asks for a token's text only when it
//! builds a string value or a property name.

use std::fmt;

use serde::Serialize;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Bytes between a pair of quotes
    StringBody,
    /// Colon `:`
    Colon,
    /// Digits with no decimal point
    Integer,
    /// Digits with exactly one decimal point
    Float,
    /// The `null` literal
    Null,
    /// Comma `,`
    Comma,
    /// End of input
    EndOfInput,
    /// Anything the lexer could not classify
    Unknown,
}

impl TokenKind {
    /// Returns true for `[` and `{`.
    pub fn opens(self) -> bool {
        matches!(self, TokenKind::LeftBracket | TokenKind::LeftBrace)
    }

    /// Returns true for `]` and `}`.
    pub fn closes(self) -> bool {
        matches!(self, TokenKind::RightBracket | TokenKind::RightBrace)
    }

    /// Returns true for tokens that stand for a scalar value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::StringBody | TokenKind::Integer | TokenKind::Float | TokenKind::Null
        )
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftBracket => "left bracket",
            TokenKind::RightBracket => "right bracket",
            TokenKind::LeftBrace => "left brace",
            TokenKind::RightBrace => "right brace",
            TokenKind::StringBody => "string",
            TokenKind::Colon => "colon",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Null => "null",
            TokenKind::Comma => "comma",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token: kind plus a span into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Byte offset of the first byte of the span
    pub offset: usize,
    /// Span length in bytes
    pub len: usize,
}

impl Token {
    /// Create a token.
    pub const fn new(kind: TokenKind, offset: usize, len: usize) -> Self {
        Self { kind, offset, len }
    }

    /// Byte offset one past the end of the span.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Raw bytes of the span, or `None` if the span lies outside `source`.
    pub fn bytes<'s>(&self, source: &'s [u8]) -> Option<&'s [u8]> {
        source.get(self.offset..self.end())
    }

    /// Text of the span, or `None` if the span lies outside `source` or is
    /// not valid UTF-8.
    pub fn text<'s>(&self, source: &'s [u8]) -> Option<&'s str> {
        self.bytes(source).and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Ordered, growable sequence of tokens for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `capacity` tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Append a token.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Token at `index`.
    pub fn get(&self, index: usize) -> Option<Token> {
        self.tokens.get(index).copied()
    }

    /// Number of tokens, including the end-of-input marker.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no token was pushed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Allocated capacity.
    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Kinds of all tokens in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Tokens as a slice.
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
