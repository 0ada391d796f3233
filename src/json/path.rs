//! Value lookup by path.
//!
//! A path is a sequence of object keys and array indices written as
//! `clubs[0]`, `a.b[2].c` or `[1].x`. Keys may not contain `.`, `[` or `]`.
//! The empty path addresses the value it is resolved from.

use std::fmt;

use super::types::Value;
use crate::error::{ErrorCode, JsonResult};

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object property name
    Key(String),
    /// Array element index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A parsed lookup path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Build a path from segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse the textual path syntax.
    pub fn parse(input: &str) -> JsonResult<Self> {
        let mut segments = Vec::new();
        let mut rest = input;

        while let Some(first) = rest.chars().next() {
            match first {
                '[' => {
                    let close = rest
                        .find(']')
                        .ok_or_else(|| invalid(input, "unclosed '['"))?;
                    let digits = &rest[1..close];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(invalid(input, "index must be a non-negative integer"));
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| invalid(input, "index out of range"))?;
                    segments.push(PathSegment::Index(index));
                    rest = &rest[close + 1..];
                }
                ']' => return Err(invalid(input, "unmatched ']'")),
                '.' => {
                    if segments.is_empty() {
                        return Err(invalid(input, "path cannot start with '.'"));
                    }
                    let (key, tail) = split_key(&rest[1..]);
                    if key.is_empty() {
                        return Err(invalid(input, "empty key"));
                    }
                    segments.push(PathSegment::Key(key.to_string()));
                    rest = tail;
                }
                _ => {
                    if !segments.is_empty() {
                        return Err(invalid(input, "expected '.' or '[' between segments"));
                    }
                    let (key, tail) = split_key(rest);
                    segments.push(PathSegment::Key(key.to_string()));
                    rest = tail;
                }
            }
        }

        Ok(Self { segments })
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true for the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk the path from `value`. Any step that does not match the shape
    /// of the tree yields `None`.
    pub fn resolve<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                PathSegment::Key(key) => current.get(key),
                PathSegment::Index(index) => current.get_index(*index),
            })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Path {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a key off the front of `input`, stopping at `.`, `[` or `]`.
fn split_key(input: &str) -> (&str, &str) {
    let end = input.find(['.', '[', ']']).unwrap_or(input.len());
    input.split_at(end)
}

fn invalid(path: &str, reason: &str) -> ErrorCode {
    ErrorCode::InvalidPath(format!("{path:?}: {reason}"))
}
