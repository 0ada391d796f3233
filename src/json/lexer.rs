//! JSON lexer/tokenizer.
//!
//! Converts raw input bytes into a [`TokenStream`] for the parser. The lexer
//! never fails once constructed: input it cannot classify becomes
//! [`TokenKind::Unknown`] tokens and the parser decides whether they are
//! fatal.
//!
//! Construction is where the input is vetted: the buffer must fit the
//! configured size limit and be valid UTF-8.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::trace;

use super::limits::Limits;
use super::token::{Token, TokenKind, TokenStream};
use crate::error::{ErrorCode, JsonResult};

const NULL_LITERAL: &[u8] = b"null";

/// Initial token stream capacity; the stream doubles as it fills.
const INITIAL_STREAM_CAPACITY: usize = 8;

/// JSON lexer over an owned or borrowed source buffer.
#[derive(Debug)]
pub struct Lexer<'a> {
    source: Cow<'a, [u8]>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over a borrowed buffer.
    pub fn from_bytes(input: &'a [u8], limits: Limits) -> JsonResult<Self> {
        Self::new(Cow::Borrowed(input), limits)
    }

    fn new(source: Cow<'a, [u8]>, limits: Limits) -> JsonResult<Self> {
        check_size(source.len() as u64, &limits)?;

        if std::str::from_utf8(&source).is_err() {
            return Err(ErrorCode::InvalidUtf8);
        }

        Ok(Self { source, pos: 0 })
    }

    /// The source buffer.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Give up the lexer and hand its source buffer to the caller.
    pub fn into_source(self) -> Cow<'a, [u8]> {
        self.source
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Read the next token. Once the input is exhausted every call returns
    /// an end-of-input token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(byte) = self.peek() else {
            return Token::new(TokenKind::EndOfInput, self.source.len(), 0);
        };

        match byte {
            b'[' => self.punct(TokenKind::LeftBracket),
            b']' => self.punct(TokenKind::RightBracket),
            b'{' => self.punct(TokenKind::LeftBrace),
            b'}' => self.punct(TokenKind::RightBrace),
            b':' => self.punct(TokenKind::Colon),
            b',' => self.punct(TokenKind::Comma),
            b'"' => self.read_string(),
            b'n' => self.read_null(),
            b'0'..=b'9' => self.read_number(),
            _ => self.punct(TokenKind::Unknown),
        }
    }

    /// Tokenize the rest of the input. The stream always ends with exactly
    /// one end-of-input token.
    pub fn tokenize_all(&mut self) -> TokenStream {
        let mut stream = TokenStream::with_capacity(INITIAL_STREAM_CAPACITY);
        loop {
            let token = self.next_token();
            stream.push(token);
            if token.kind == TokenKind::EndOfInput {
                break;
            }
        }
        trace!(
            tokens = stream.len(),
            bytes = self.source.len(),
            "tokenized input"
        );
        stream
    }

    /// Single-byte token at the current position.
    fn punct(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.pos, 1);
        self.pos += 1;
        token
    }

    /// Read a string body. The span excludes both quotes; the closing quote
    /// is consumed when present. Backslashes are ordinary bytes.
    fn read_string(&mut self) -> Token {
        // Opening quote
        self.pos += 1;
        let start = self.pos;

        while let Some(b) = self.peek() {
            if b == b'"' {
                let token = Token::new(TokenKind::StringBody, start, self.pos - start);
                self.pos += 1;
                return token;
            }
            self.pos += 1;
        }

        // Unterminated: the body runs to the end of the buffer.
        Token::new(TokenKind::StringBody, start, self.pos - start)
    }

    /// Read digits with at most one decimal point. A second point ends the
    /// literal, which is then unknown.
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut points = 0;

        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' if points == 0 => points += 1,
                b'.' => return Token::new(TokenKind::Unknown, start, self.pos - start),
                _ => break,
            }
            self.pos += 1;
        }

        let kind = if points == 0 {
            TokenKind::Integer
        } else {
            TokenKind::Float
        };
        Token::new(kind, start, self.pos - start)
    }

    /// Match `null` byte by byte. A mismatch yields an unknown token spanning
    /// the bytes matched so far.
    fn read_null(&mut self) -> Token {
        let start = self.pos;
        let matched = NULL_LITERAL
            .iter()
            .zip(self.source[start..].iter())
            .take_while(|(expected, actual)| expected == actual)
            .count();

        // The current byte is 'n', so at least one byte always matches.
        let len = matched.max(1);
        self.pos += len;

        let kind = if matched == NULL_LITERAL.len() {
            TokenKind::Null
        } else {
            TokenKind::Unknown
        };
        Token::new(kind, start, len)
    }
}

impl Lexer<'static> {
    /// Create a lexer over the contents of a file, read in one piece.
    ///
    /// Files larger than `limits.max_input_size` are rejected before they
    /// are read.
    pub fn from_path<P: AsRef<Path>>(path: P, limits: Limits) -> JsonResult<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| io_error(path, &e))?;
        check_size(metadata.len(), &limits)?;

        let bytes = fs::read(path).map_err(|e| io_error(path, &e))?;
        Self::new(Cow::Owned(bytes), limits)
    }
}

fn check_size(len: u64, limits: &Limits) -> JsonResult<()> {
    if limits.accepts_size(len) {
        Ok(())
    } else {
        Err(ErrorCode::InputTooLarge(len, limits.max_input_size))
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> ErrorCode {
    ErrorCode::Io(format!("{}: {}", path.display(), err))
}

/// Tokenize a borrowed buffer in one call.
pub fn tokenize(input: &[u8], limits: Limits) -> JsonResult<TokenStream> {
    Ok(Lexer::from_bytes(input, limits)?.tokenize_all())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        tokenize(input.as_bytes(), Limits::lenient())
            .unwrap()
            .iter()
            .copied()
            .collect()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("{}[],:"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_whitespace_skipped() {
        let tokens = lex(" \t\r\n[ 1 ]\n");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::LeftBracket, 4, 1),
                Token::new(TokenKind::Integer, 6, 1),
                Token::new(TokenKind::RightBracket, 8, 1),
                Token::new(TokenKind::EndOfInput, 10, 0),
            ]
        );
    }

    #[test]
    fn test_string_span_excludes_quotes() {
        let tokens = lex(r#""hello","#);
        assert_eq!(tokens[0], Token::new(TokenKind::StringBody, 1, 5));
        assert_eq!(tokens[1], Token::new(TokenKind::Comma, 7, 1));
    }

    #[test]
    fn test_backslash_is_ordinary() {
        let source = br#""a\nb""#;
        let stream = tokenize(source, Limits::lenient()).unwrap();
        let token = stream.get(0).unwrap();
        assert_eq!(token.text(source), Some(r"a\nb"));
    }

    #[test]
    fn test_empty_string() {
        let tokens = lex(r#""""#);
        assert_eq!(tokens[0], Token::new(TokenKind::StringBody, 1, 0));
        assert_eq!(tokens[1].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let tokens = lex(r#""abc"#);
        assert_eq!(tokens[0], Token::new(TokenKind::StringBody, 1, 3));
        assert_eq!(tokens[1], Token::new(TokenKind::EndOfInput, 4, 0));
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 3.25 7.");
        assert_eq!(tokens[0], Token::new(TokenKind::Integer, 0, 2));
        assert_eq!(tokens[1], Token::new(TokenKind::Float, 3, 4));
        assert_eq!(tokens[2], Token::new(TokenKind::Float, 8, 2));
    }

    #[test]
    fn test_second_decimal_point_is_unknown() {
        let tokens = lex("1.2.3");
        assert_eq!(tokens[0], Token::new(TokenKind::Unknown, 0, 3));
        assert_eq!(tokens[1], Token::new(TokenKind::Unknown, 3, 1));
        assert_eq!(tokens[2], Token::new(TokenKind::Integer, 4, 1));
    }

    #[test]
    fn test_minus_sign_is_unknown() {
        assert_eq!(
            kinds("-1"),
            vec![TokenKind::Unknown, TokenKind::Integer, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_null_literal() {
        let tokens = lex("null,");
        assert_eq!(tokens[0], Token::new(TokenKind::Null, 0, 4));
        assert_eq!(tokens[1], Token::new(TokenKind::Comma, 4, 1));
    }

    #[test]
    fn test_misspelled_null() {
        let tokens = lex("nul]");
        assert_eq!(tokens[0], Token::new(TokenKind::Unknown, 0, 3));
        assert_eq!(tokens[1], Token::new(TokenKind::RightBracket, 3, 1));

        let tokens = lex("nx");
        assert_eq!(tokens[0], Token::new(TokenKind::Unknown, 0, 1));
        assert_eq!(tokens[1], Token::new(TokenKind::Unknown, 1, 1));
    }

    #[test]
    fn test_truncated_null_at_end() {
        let tokens = lex("nu");
        assert_eq!(tokens[0], Token::new(TokenKind::Unknown, 0, 2));
        assert_eq!(tokens[1], Token::new(TokenKind::EndOfInput, 2, 0));
    }

    #[test]
    fn test_other_bytes_unknown() {
        assert_eq!(
            kinds("true"),
            vec![
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_single_end_of_input() {
        let stream = tokenize(b"", Limits::strict()).unwrap();
        assert_eq!(stream.kinds(), vec![TokenKind::EndOfInput]);

        let mut lexer = Lexer::from_bytes(b"[", Limits::strict()).unwrap();
        let stream = lexer.tokenize_all();
        assert_eq!(stream.len(), 2);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_input_too_large() {
        let limits = Limits::strict().with_max_input_size(10);
        let result = Lexer::from_bytes(b"this is more than 10 bytes", limits);
        assert_eq!(result.unwrap_err(), ErrorCode::InputTooLarge(26, 10));
    }

    #[test]
    fn test_invalid_utf8() {
        let invalid = [b'"', 0xFF, 0xFE, b'"'];
        let result = Lexer::from_bytes(&invalid, Limits::strict());
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidUtf8);
    }

    #[test]
    fn test_into_source_returns_buffer() {
        let mut lexer = Lexer::from_bytes(b"[1]", Limits::strict()).unwrap();
        let _ = lexer.tokenize_all();
        assert_eq!(&*lexer.into_source(), b"[1]");
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Lexer::from_path("/definitely/not/here.json", Limits::strict());
        assert_eq!(result.unwrap_err().code(), 12);
    }
}
