//! Partial-key derivation
//!
//! The auth1 response names a window into a fixed key; auth2 expects that
//! window base64-encoded.

use base64::{engine::general_purpose, Engine as _};

/// Fixed key shared by every radiko HTML5 client
pub const AUTH_KEY: &[u8] = b"bcd151073c03b352e1ef2fd66c32209da9ca0afa";

/// Base64 of `key[offset..offset + length]`, or `None` when the window
/// does not fit inside `key`.
pub fn derive_partial_key_from(key: &[u8], offset: usize, length: usize) -> Option<String> {
    let end = offset.checked_add(length)?;
    let window = key.get(offset..end)?;
    Some(general_purpose::STANDARD.encode(window))
}

/// [`derive_partial_key_from`] over [`AUTH_KEY`]
pub fn derive_partial_key(offset: usize, length: usize) -> Option<String> {
    derive_partial_key_from(AUTH_KEY, offset, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_window() {
        // AUTH_KEY[5..15] == b"1073c03b35"
        assert_eq!(derive_partial_key(5, 10).as_deref(), Some("MTA3M2MwM2IzNQ=="));
    }

    #[test]
    fn test_deterministic() {
        let first = derive_partial_key(8, 16);
        for _ in 0..10 {
            assert_eq!(derive_partial_key(8, 16), first);
        }
    }

    #[test]
    fn test_changes_with_inputs() {
        let base = derive_partial_key(5, 10);
        assert_ne!(derive_partial_key(6, 10), base);
        assert_ne!(derive_partial_key(5, 11), base);
    }

    #[test]
    fn test_whole_key_and_empty_window() {
        assert_eq!(
            derive_partial_key(0, AUTH_KEY.len()),
            Some(general_purpose::STANDARD.encode(AUTH_KEY))
        );
        assert_eq!(derive_partial_key(3, 0).as_deref(), Some(""));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(derive_partial_key(AUTH_KEY.len(), 1), None);
        assert_eq!(derive_partial_key(35, 10), None);
        assert_eq!(derive_partial_key(usize::MAX, 2), None);
    }

    #[test]
    fn test_custom_key() {
        assert_eq!(derive_partial_key_from(b"abcdef", 1, 3).as_deref(), Some("YmNk"));
    }
}
