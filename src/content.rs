//! Local compose and env file content.
//!
//! This module reads the files referenced by path-based projects, computes
//! the digests stored in content-hash mode, and parses `.env` documents.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ResourceError, Result};

/// Hasher for file contents kept in state as digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentHasher;

impl ContentHasher {
    /// Creates a new content hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the lowercase hex SHA-256 digest of `content`.
    #[must_use]
    pub fn hash(&self, content: &str) -> String {
        hex::encode(Sha256::digest(content.as_bytes()))
    }

    /// Compares two digests in constant time.
    #[must_use]
    pub fn hashes_match(hash1: &str, hash2: &str) -> bool {
        if hash1.len() != hash2.len() {
            return false;
        }

        hash1
            .bytes()
            .zip(hash2.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Reads a compose or env file.
///
/// # Errors
///
/// Returns [`ResourceError::FileRead`] naming `what` and the path.
pub fn read_content(what: &'static str, path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path)).map_err(|e| {
        ResourceError::FileRead {
            what,
            path: path.into(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Parses a dotenv document into a key/value map.
///
/// Returns `None` when the document is not valid dotenv syntax.
#[must_use]
pub fn parse_env(content: &str) -> Option<BTreeMap<String, String>> {
    dotenvy::from_read_iter(content.as_bytes())
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_hash_is_sha256_hex() {
        let hasher = ContentHasher::new();
        assert_eq!(
            hasher.hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hasher.hash("abc"), hasher.hash("abc"));
        assert_ne!(hasher.hash("abc"), hasher.hash("abd"));
    }

    #[test]
    fn test_hashes_match() {
        assert!(ContentHasher::hashes_match("abc123", "abc123"));
        assert!(!ContentHasher::hashes_match("abc123", "abc124"));
        assert!(!ContentHasher::hashes_match("abc123", "abc12"));
    }

    #[test]
    fn test_read_content() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "services: {{}}").expect("write");
        let path = file.path().to_string_lossy().to_string();
        assert_eq!(read_content("compose", &path).expect("read"), "services: {}");
    }

    #[test]
    fn test_read_missing_file_names_kind() {
        let err = read_content("env", "/nonexistent/.env").expect_err("missing");
        assert!(err.to_string().starts_with("read env file failed (/nonexistent/.env)"));
    }

    #[test]
    fn test_parse_env() {
        let vars = parse_env("# comment\nA=1\nB=\"two words\"\n").expect("valid dotenv");
        assert_eq!(vars.get("A").map(String::as_str), Some("1"));
        assert_eq!(vars.get("B").map(String::as_str), Some("two words"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        assert_eq!(parse_env("not a valid line\n"), None);
    }
}
