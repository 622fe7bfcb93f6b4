//! SHA-256 content checksums.
//!
//! One canonical format, `sha256:<hex>`, used for the content identity of
//! URL-addressed channel manifests.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module.
const PREFIX: &str = "sha256:";

/// Compute the checksum of string content as `sha256:<hex>`.
pub fn content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the checksum of a file's contents as `sha256:<hex>`.
pub fn file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}
