// gate-server/src/utils/token.rs
use rand::{thread_rng, Rng};
use rand::distributions::Alphanumeric;
use sha2::{Sha256, Digest};
use subtle::ConstantTimeEq;

/// Generate a cryptographically secure random token of specified length
pub fn generate_secure_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash a string using SHA-256, hex encoded
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Exact match of two secrets. Both sides are digested first so the
/// comparison time does not depend on the secret's length either.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    hash_string(provided)
        .as_bytes()
        .ct_eq(hash_string(expected).as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token = generate_secure_token(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_secure_token(32));
    }

    #[test]
    fn test_hash_string() {
        let hash = hash_string("test string");
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex characters
        assert_eq!(hash, hash_string("test string"));
    }

    #[test]
    fn test_secrets_match_is_exact() {
        assert!(secrets_match("secret1", "secret1"));
        assert!(!secrets_match("secret1", "Secret1"));
        assert!(!secrets_match("secret1 ", "secret1"));
        assert!(!secrets_match("", "secret1"));
    }
}
