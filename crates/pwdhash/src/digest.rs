use base64::{Engine, engine::general_purpose::URL_SAFE};
use sha2::{Digest, Sha512};

/// Length of every string returned by [`digest`]: 64 hash bytes in padded
/// base64.
pub const DIGEST_LEN: usize = 88;

/// Computes the SHA-512 digest of `input`, encoded as URL-safe base64 with
/// padding.
///
/// The hash runs over the exact UTF-8 bytes of `input`, so the output is
/// stable across processes and implementations.
///
/// # Example
/// ```
/// assert_eq!(
///     pwdhash::digest("angryMonkey"),
///     "ZEHhWB65gUlzdVwtDQArEyx-KVLzp_aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A-gf7Q=="
/// );
/// ```
pub fn digest(input: &str) -> String {
    URL_SAFE.encode(Sha512::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vector() {
        assert_eq!(
            digest("angryMonkey"),
            "ZEHhWB65gUlzdVwtDQArEyx-KVLzp_aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A-gf7Q=="
        );
    }

    #[test]
    fn empty_input_has_a_digest() {
        assert_eq!(
            digest(""),
            "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg_SpIdNs6c5H0NE8XYXysP-DGNKHfuwvY7kxvUdBeoGlODJ6-SfaPg=="
        );
    }

    #[test]
    fn hashes_multibyte_input_bytes_verbatim() {
        assert_eq!(
            digest("héllo wörld"),
            "qsyIGUT5rnCEZJyRYJtDZETWbyifyjvEIU5GXpnyVu-oqNxEfkFmAIfBCB5HGEGalO7j1rU2tGu3ZM3X90f-OA=="
        );
    }

    #[test]
    fn is_deterministic_with_fixed_length() {
        let inputs = ["", "a", "angryMonkey", "🦀🦀🦀", &"x".repeat(1024)];
        for input in inputs {
            let first = digest(input);
            assert_eq!(first, digest(input));
            assert_eq!(first.len(), DIGEST_LEN);
        }
    }

    #[test]
    fn differs_on_whitespace() {
        assert_ne!(digest("angryMonkey"), digest("angryMonkey "));
    }
}
