//! Team join identifier generation.
//!
//! A join identifier is a short secret code handed out by a team owner so
//! other users can request membership. It is distinct from the team's public
//! slug and must not be derivable from it.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated join identifier.
pub const IDENTIFIER_LEN: usize = 15;

/// Length of the random salt mixed into the hash input.
const SALT_LEN: usize = 12;

/// Generates a join identifier from a seed string (typically the team title).
///
/// The identifier is a 15-character slice of the hex-encoded SHA-256 digest
/// of a random salt concatenated with the seed. The salt makes repeated calls
/// with the same seed produce different identifiers, and the digest cannot be
/// reversed to recover the seed.
///
/// Uniqueness is enforced by the storage layer; callers regenerate on a
/// unique-constraint violation.
pub fn generate_identifier(seed: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(seed.as_bytes());
    let digest = hex::encode(hasher.finalize());

    digest[..IDENTIFIER_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identifier_length() {
        let id = generate_identifier("My Team");
        assert_eq!(id.len(), IDENTIFIER_LEN);
    }

    #[test]
    fn test_identifier_is_lowercase_hex() {
        let id = generate_identifier("My Team");
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_seed_produces_different_identifiers() {
        // The random salt means two calls with the same seed must not match.
        let a = generate_identifier("duplicate");
        let b = generate_identifier("duplicate");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identifier_does_not_contain_seed() {
        let seed = "verysecretteamname";
        let id = generate_identifier(seed);
        assert!(!id.contains(seed));
        assert!(!seed.contains(&id));
    }

    #[test]
    fn test_distinct_seeds_produce_distinct_identifiers() {
        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let id = generate_identifier(&format!("team-{}", i));
            assert!(seen.insert(id), "collision after {} identifiers", i);
        }
    }

    #[test]
    fn test_empty_seed() {
        let id = generate_identifier("");
        assert_eq!(id.len(), IDENTIFIER_LEN);
    }

    #[test]
    fn test_unicode_seed() {
        let id = generate_identifier("团队名称");
        assert_eq!(id.len(), IDENTIFIER_LEN);
    }
}
