// ==========================================
// Order Batch Ingestion Service - Content digest
// ==========================================
// SHA-256 over the raw uploaded bytes, before any parsing. The digest
// is half of the idempotency natural key: a byte-identical re-upload
// under the same key is detected as a replay.
// ==========================================

use sha2::{Digest, Sha256};

/// Compute the lowercase SHA-256 hex digest (64 chars) of a byte blob.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
