//! Object key hashing.
//!
//! Keys are read as a base-5 positional number whose digits are the key's
//! byte values. Only the first [`MAX_HASHED_KEY_LEN`] bytes contribute, so
//! keys sharing that prefix always hash alike.

/// Number of leading key bytes that contribute to the hash.
pub const MAX_HASHED_KEY_LEN: usize = 12;

/// Positional base of the hash.
pub const KEY_HASH_BASE: u64 = 5;

/// Hash an object key.
pub fn hash_key(key: &str) -> u64 {
    key.as_bytes()
        .iter()
        .take(MAX_HASHED_KEY_LEN)
        .fold((0u64, 1u64), |(sum, place), &byte| {
            (
                sum.wrapping_add(place.wrapping_mul(u64::from(byte))),
                place.wrapping_mul(KEY_HASH_BASE),
            )
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key() {
        assert_eq!(hash_key(""), 0);
    }

    #[test]
    fn test_positional_weights() {
        // 'a' = 97, 'b' = 98
        assert_eq!(hash_key("a"), 97);
        assert_eq!(hash_key("ab"), 97 + 5 * 98);
        assert_eq!(hash_key("ba"), 98 + 5 * 97);
        assert_ne!(hash_key("ab"), hash_key("ba"));
    }

    #[test]
    fn test_truncated_to_prefix() {
        let a = "abcdefghijkl_first";
        let b = "abcdefghijkl_second";
        assert_eq!(hash_key(a), hash_key(b));
        assert_eq!(hash_key(a), hash_key("abcdefghijkl"));
        assert_ne!(hash_key("abcdefghijk"), hash_key("abcdefghijkl"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hash_key("clubs"), hash_key("clubs"));
    }
}
