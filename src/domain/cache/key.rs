//! Cache key generation strategies

use std::fmt::Debug;

use sha2::{Digest, Sha256};

/// Trait for generating cache keys from input text
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a cache key for the given input
    fn generate(&self, input: &str) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, input: &str) -> String {
        format!("{}:{}", namespace, self.generate(input))
    }
}

/// Content-addressed keys: hex SHA-256 of the exact input bytes
#[derive(Debug, Clone, Default)]
pub struct ContentHashKeyGenerator;

impl ContentHashKeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for ContentHashKeyGenerator {
    fn generate(&self, input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let generator = ContentHashKeyGenerator::new();
        assert_eq!(
            generator.generate("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_stable_and_distinct() {
        let generator = ContentHashKeyGenerator::new();

        assert_eq!(generator.generate("prompt"), generator.generate("prompt"));
        assert_ne!(generator.generate("prompt"), generator.generate("prompt "));
        assert_eq!(generator.generate("prompt").len(), 64);
    }

    #[test]
    fn test_generate_with_namespace() {
        let generator = ContentHashKeyGenerator::new();
        let key = generator.generate_with_namespace("completions", "abc");

        assert!(key.starts_with("completions:ba7816bf"));
    }
}
