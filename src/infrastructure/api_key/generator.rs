//! Secret token generation
//!
//! Tokens are a fixed prefix followed by random lowercase alphanumeric
//! characters. The thread RNG is used and uniqueness is not checked.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_SECRET_PREFIX: &str = "tvly-";
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// Generator for API key secrets
#[derive(Debug, Clone)]
pub struct SecretGenerator {
    /// Prefix for all generated secrets (e.g., "tvly-")
    prefix: String,
    /// Number of random characters after the prefix
    length: usize,
}

impl SecretGenerator {
    pub fn new(prefix: impl Into<String>, length: usize) -> Self {
        Self {
            prefix: prefix.into(),
            length,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a new secret
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..self.length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        format!("{}{}", self.prefix, suffix)
    }

    /// Deterministic secret of this generator's shape built from `seed`
    ///
    /// Characters outside the alphabet are dropped and the rest is padded
    /// with `0` or cut to the configured length.
    pub fn fixed(&self, seed: &str) -> String {
        let suffix: String = seed
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .filter(|b| ALPHABET.contains(b))
            .map(char::from)
            .chain(std::iter::repeat('0'))
            .take(self.length)
            .collect();

        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_PREFIX, DEFAULT_SECRET_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_format() {
        let generator = SecretGenerator::default();
        let secret = generator.generate();

        assert!(secret.starts_with("tvly-"));
        assert_eq!(secret.len(), "tvly-".len() + 32);
    }

    #[test]
    fn test_suffix_is_lowercase_alphanumeric() {
        let secret = SecretGenerator::default().generate();
        let suffix = &secret["tvly-".len()..];

        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_custom_prefix_and_length() {
        let generator = SecretGenerator::new("sk_", 8);
        let secret = generator.generate();

        assert!(secret.starts_with("sk_"));
        assert_eq!(secret.len(), 11);
    }

    #[test]
    fn test_secrets_differ() {
        let generator = SecretGenerator::default();
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_fixed_secret_has_generated_shape() {
        let generator = SecretGenerator::default();

        assert_eq!(
            generator.fixed("new-api-key"),
            format!("tvly-newapikey{}", "0".repeat(23))
        );
        assert_eq!(generator.fixed("cli"), generator.fixed("cli"));
        assert_eq!(SecretGenerator::new("sk_", 4).fixed("Default"), "sk_defa");
    }
}
