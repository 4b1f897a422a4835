//! Content digests for module payloads.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of a payload as lowercase hex.
///
/// Pure and deterministic. Accepts any string, including the empty one.
#[must_use]
pub fn digest(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}
