//! Input limits and parsing policy.
//!
//! Documents are loaded into memory in one piece, so the input size is
//! bounded up front rather than streamed. Nesting depth is bounded because
//! the parser recurses once per nested array or object.

/// Default maximum input size in bytes.
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 10_000;

/// Default maximum nesting depth for arrays/objects.
pub const DEFAULT_MAX_NESTING_DEPTH: u64 = 64;

/// Limits and policy applied while lexing and parsing.
///
/// Plain `Copy` data; pass it by value to [`Lexer`](super::Lexer) and
/// [`Parser`](super::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input size in bytes
    pub max_input_size: u64,
    /// Maximum nesting depth for arrays/objects
    pub max_nesting_depth: u64,
    /// Whether a lone scalar (string, number, null) is accepted as the
    /// document root
    pub allow_bare_root: bool,
}

impl Limits {
    /// Strict JSON documents: small inputs, array or object roots only.
    pub const fn strict() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            allow_bare_root: false,
        }
    }

    /// Lenient limits for tooling and debugging.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 1024 * 1024, // 1 MiB
            max_nesting_depth: 512,
            allow_bare_root: true,
        }
    }

    /// Replace the maximum input size.
    pub const fn with_max_input_size(mut self, max_input_size: u64) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    /// Replace the maximum nesting depth.
    pub const fn with_max_nesting_depth(mut self, max_nesting_depth: u64) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    /// Replace the bare-root policy.
    pub const fn with_bare_root(mut self, allow_bare_root: bool) -> Self {
        self.allow_bare_root = allow_bare_root;
        self
    }

    /// Check whether an input of `len` bytes is within the size limit.
    pub fn accepts_size(&self, len: u64) -> bool {
        len <= self.max_input_size
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::strict()
    }
}
