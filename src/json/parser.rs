//! Recursive descent parser over a token stream.
//!
//! The parser reads the [`TokenStream`] produced by the
//! [`Lexer`](super::Lexer) together with the original source buffer, which
//! it re-reads to materialize string values, property names and number text.
//!
//! Parsing stops at the first error; the error is returned and also kept as
//! the parser's error state. There is no recovery and no partial tree.

use std::borrow::Cow;
use std::path::Path;

use tracing::debug;

use super::lexer::Lexer;
use super::limits::Limits;
use super::token::{Token, TokenKind, TokenStream};
use super::types::{Array, Object, Property, Root, Value};
use crate::error::{ErrorCode, JsonResult};

/// Where a parsed value is going to live.
///
/// The same value parsing serves the document root, array elements and
/// object properties; the slot turns the parsed [`Value`] into what its
/// container stores.
trait Slot {
    type Output;

    fn fill(self, value: Value) -> Self::Output;
}

struct RootSlot;

impl Slot for RootSlot {
    type Output = Value;

    fn fill(self, value: Value) -> Value {
        value
    }
}

struct ElementSlot;

impl Slot for ElementSlot {
    type Output = Value;

    fn fill(self, value: Value) -> Value {
        value
    }
}

struct PropertySlot(String);

impl Slot for PropertySlot {
    type Output = Property;

    fn fill(self, value: Value) -> Property {
        Property::new(self.0, value)
    }
}

/// Object grammar states.
#[derive(Debug)]
enum ObjectState {
    /// Just after `{`: a key or `}`
    FirstKeyOrEnd,
    /// After a comma: a key
    ExpectKey,
    /// After a key
    ExpectColon(String),
    /// After a colon
    ExpectValue(String),
    /// After a value: `,` or `}`
    ExpectCommaOrEnd,
}

/// Array grammar states.
#[derive(Debug, Clone, Copy)]
enum ArrayState {
    /// Just after `[`: a value or `]`
    FirstValueOrEnd,
    /// After a comma: a value
    ExpectValue,
    /// After a value: `,` or `]`
    ExpectCommaOrEnd,
}

/// JSON parser over a token stream and its source buffer.
pub struct Parser<'a> {
    source: &'a [u8],
    tokens: TokenStream,
    cursor: usize,
    limits: Limits,
    depth: u64,
    error: Option<ErrorCode>,
}

impl<'a> Parser<'a> {
    /// Create a parser. `tokens` must have been produced from `source`.
    pub fn new(source: &'a [u8], tokens: TokenStream, limits: Limits) -> Self {
        Self {
            source,
            tokens,
            cursor: 0,
            limits,
            depth: 0,
            error: None,
        }
    }

    /// The error of the last [`parse`](Self::parse) call, if it failed.
    pub fn error(&self) -> Option<&ErrorCode> {
        self.error.as_ref()
    }

    /// The token stream being parsed.
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Parse the token stream into a document tree.
    pub fn parse(&mut self) -> JsonResult<Root> {
        self.cursor = 0;
        self.depth = 0;
        self.error = None;

        match self.parse_document() {
            Ok(value) => {
                let root = Root::new(value);
                debug!(root = %root, tokens = self.tokens.len(), "parsed document");
                Ok(root)
            }
            Err(e) => {
                debug!(error = %e, cursor = self.cursor, "parse failed");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn parse_document(&mut self) -> JsonResult<Value> {
        let first = self.current();
        if first.kind == TokenKind::EndOfInput {
            return Err(ErrorCode::EmptyTokenStream);
        }

        self.check_balance()?;

        let value = match first.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_value(RootSlot)?,
            kind if kind.is_scalar() => {
                if !self.limits.allow_bare_root {
                    return Err(ErrorCode::BareRootRejected { kind });
                }
                self.parse_value(RootSlot)?
            }
            TokenKind::Unknown => return Err(unknown(first)),
            _ => return Err(unexpected(first)),
        };

        // Nothing may follow the root value.
        let trailing = self.current();
        if trailing.kind != TokenKind::EndOfInput {
            return Err(unexpected(trailing));
        }

        Ok(value)
    }

    /// Scan the whole stream once and require every `[`/`{` to be matched
    /// by a `]`/`}`.
    fn check_balance(&self) -> JsonResult<()> {
        let depth = self.tokens.iter().fold(0i64, |depth, token| {
            if token.kind.opens() {
                depth + 1
            } else if token.kind.closes() {
                depth - 1
            } else {
                depth
            }
        });

        if depth == 0 {
            Ok(())
        } else {
            Err(ErrorCode::UnbalancedNesting(depth))
        }
    }

    /// Current token. Past the end of the stream this is an end-of-input
    /// token at the end of the source.
    fn current(&self) -> Token {
        self.tokens
            .get(self.cursor)
            .unwrap_or_else(|| Token::new(TokenKind::EndOfInput, self.source.len(), 0))
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn text(&self, token: Token) -> JsonResult<&'a str> {
        let source: &'a [u8] = self.source;
        token.text(source).ok_or(ErrorCode::InvalidUtf8)
    }

    fn enter(&mut self) -> JsonResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(ErrorCode::NestingTooDeep(
                self.depth,
                self.limits.max_nesting_depth,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parse the value at the cursor into `slot`.
    fn parse_value<S: Slot>(&mut self, slot: S) -> JsonResult<S::Output> {
        let token = self.current();
        let value = match token.kind {
            TokenKind::LeftBrace => Value::Object(self.parse_object()?),
            TokenKind::LeftBracket => Value::Array(self.parse_array()?),
            TokenKind::StringBody | TokenKind::Integer | TokenKind::Float | TokenKind::Null => {
                let value = self.parse_primitive(token)?;
                self.advance();
                value
            }
            TokenKind::Unknown => return Err(unknown(token)),
            _ => return Err(unexpected(token)),
        };
        Ok(slot.fill(value))
    }

    /// Convert a scalar token to a value.
    fn parse_primitive(&self, token: Token) -> JsonResult<Value> {
        match token.kind {
            TokenKind::StringBody => Ok(Value::String(self.text(token)?.to_string())),
            TokenKind::Integer => self
                .text(token)?
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ErrorCode::InvalidNumber {
                    offset: token.offset,
                }),
            TokenKind::Float => self
                .text(token)?
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ErrorCode::InvalidNumber {
                    offset: token.offset,
                }),
            TokenKind::Null => Ok(Value::Null),
            _ => Err(unexpected(token)),
        }
    }

    /// Count the colons on the nesting level that starts at the cursor,
    /// stopping at the brace that closes it.
    fn count_level_colons(&self) -> usize {
        let mut depth = 0usize;
        let mut colons = 0usize;

        for token in self.tokens.as_slice().iter().skip(self.cursor) {
            match token.kind {
                kind if kind.opens() => depth += 1,
                kind if kind.closes() => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Colon if depth == 0 => colons += 1,
                TokenKind::EndOfInput => break,
                _ => {}
            }
        }

        colons
    }

    /// Parse an object starting at its `{`.
    fn parse_object(&mut self) -> JsonResult<Object> {
        self.enter()?;
        self.advance();

        let mut object = Object::with_capacity(self.count_level_colons());
        let mut state = ObjectState::FirstKeyOrEnd;

        loop {
            let token = self.current();
            state = match (state, token.kind) {
                (ObjectState::FirstKeyOrEnd | ObjectState::ExpectCommaOrEnd, TokenKind::RightBrace) => {
                    self.advance();
                    break;
                }
                (ObjectState::FirstKeyOrEnd | ObjectState::ExpectKey, TokenKind::StringBody) => {
                    let key = self.text(token)?.to_string();
                    self.advance();
                    ObjectState::ExpectColon(key)
                }
                (ObjectState::ExpectColon(key), TokenKind::Colon) => {
                    self.advance();
                    ObjectState::ExpectValue(key)
                }
                (ObjectState::ExpectValue(key), _) => {
                    let property = self.parse_value(PropertySlot(key))?;
                    object.insert(property);
                    ObjectState::ExpectCommaOrEnd
                }
                (ObjectState::ExpectCommaOrEnd, TokenKind::Comma) => {
                    self.advance();
                    ObjectState::ExpectKey
                }
                _ => return Err(unexpected(token)),
            };
        }

        self.leave();
        Ok(object)
    }

    /// Parse an array starting at its `[`.
    fn parse_array(&mut self) -> JsonResult<Array> {
        self.enter()?;
        self.advance();

        let mut array = Array::new();
        let mut state = ArrayState::FirstValueOrEnd;

        loop {
            let token = self.current();
            state = match (state, token.kind) {
                (ArrayState::FirstValueOrEnd | ArrayState::ExpectCommaOrEnd, TokenKind::RightBracket) => {
                    self.advance();
                    break;
                }
                (ArrayState::FirstValueOrEnd | ArrayState::ExpectValue, _) => {
                    array.push(self.parse_value(ElementSlot)?);
                    ArrayState::ExpectCommaOrEnd
                }
                (ArrayState::ExpectCommaOrEnd, TokenKind::Comma) => {
                    self.advance();
                    ArrayState::ExpectValue
                }
                (ArrayState::ExpectCommaOrEnd, _) => return Err(unexpected(token)),
            };
        }

        self.leave();
        Ok(array)
    }
}

fn unexpected(token: Token) -> ErrorCode {
    ErrorCode::UnexpectedToken {
        kind: token.kind,
        offset: token.offset,
    }
}

fn unknown(token: Token) -> ErrorCode {
    ErrorCode::UnknownToken {
        offset: token.offset,
        len: token.len,
    }
}

/// Parse a JSON document with strict limits.
pub fn parse(input: &[u8]) -> JsonResult<Root> {
    parse_with_limits(input, Limits::strict())
}

/// Parse a JSON document with custom limits.
pub fn parse_with_limits(input: &[u8], limits: Limits) -> JsonResult<Root> {
    let tokens = Lexer::from_bytes(input, limits)?.tokenize_all();
    Parser::new(input, tokens, limits).parse()
}

/// Read a JSON file in one piece and parse it.
pub fn parse_file<P: AsRef<Path>>(path: P, limits: Limits) -> JsonResult<Root> {
    let mut lexer = Lexer::from_path(path, limits)?;
    let tokens = lexer.tokenize_all();
    let source: Cow<'static, [u8]> = lexer.into_source();
    let mut parser = Parser::new(&source, tokens, limits);
    parser.parse()
}
