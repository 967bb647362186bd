//! Content digests for cached artifacts
//!
//! A digest is the lowercase hex SHA256 of a file's full contents. It only has
//! to be stable across runs and change on any byte change.

use crate::error::{PrebundleError, PrebundleResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Hash raw bytes
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hash a file's contents
pub async fn digest_file(path: &Path) -> PrebundleResult<String> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| PrebundleError::io(format!("reading {}", path.display()), e))?;

    Ok(digest_bytes(&contents))
}
