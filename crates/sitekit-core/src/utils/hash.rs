//! Hashing helpers: random tokens and Gravatar links

use md5::Md5;
use sha2::{Digest, Sha512};

/// Longest token [`generate_hash`] can produce (hex SHA-512)
pub const MAX_HASH_LENGTH: usize = 128;

/// Random lowercase hex token of `length` characters (capped at 128)
///
/// # Examples
/// ```
/// use sitekit_core::utils::hash::generate_hash;
/// let token = generate_hash(80);
/// assert_eq!(token.len(), 80);
/// assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn generate_hash(length: usize) -> String {
    let seed: [u8; 32] = rand::random();
    let digest = Sha512::digest(seed);
    let mut token = hex::encode(digest);
    token.truncate(length.min(MAX_HASH_LENGTH));
    token
}

/// Options for [`gravatar_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravatarOptions {
    /// Default image type shown when no avatar exists
    pub default_type: String,
    pub size: u32,
    /// Maximum rating allowed (`g`, `pg`, `r`, `x`)
    pub rating: String,
}

impl Default for GravatarOptions {
    fn default() -> Self {
        Self {
            default_type: "wavatar".to_string(),
            size: 80,
            rating: "g".to_string(),
        }
    }
}

/// Gravatar image link for an email address
///
/// The query separators are already HTML-encoded (`&amp;`) so the link can
/// be written straight into an `<img src>` attribute.
pub fn gravatar_url(email: &str, options: &GravatarOptions) -> String {
    let digest = Md5::digest(email.to_lowercase().as_bytes());
    format!(
        "http://www.gravatar.com/avatar/{:x}?d={}&amp;s={}&amp;r={}",
        digest, options.default_type, options.size, options.rating
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hash_length() {
        assert_eq!(generate_hash(80).len(), 80);
        assert_eq!(generate_hash(10).len(), 10);
        assert_eq!(generate_hash(500).len(), MAX_HASH_LENGTH);
        assert_eq!(generate_hash(0), "");
    }

    #[test]
    fn test_generate_hash_is_random() {
        assert_ne!(generate_hash(64), generate_hash(64));
    }

    #[test]
    fn test_gravatar_url_defaults() {
        let url = gravatar_url("MyEmailAddress@example.com", &GravatarOptions::default());
        assert_eq!(
            url,
            "http://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?d=wavatar&amp;s=80&amp;r=g"
        );
    }

    #[test]
    fn test_gravatar_url_is_case_insensitive() {
        let options = GravatarOptions {
            default_type: "identicon".to_string(),
            size: 120,
            rating: "pg".to_string(),
        };
        let lower = gravatar_url("user@example.com", &options);
        let upper = gravatar_url("USER@EXAMPLE.COM", &options);
        assert_eq!(lower, upper);
        assert!(lower.ends_with("?d=identicon&amp;s=120&amp;r=pg"));
    }
}
