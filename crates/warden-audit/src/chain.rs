//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. log_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the execution record

use sha2::{Digest, Sha256};

use warden_contracts::execution::ExecutionRecord;

use crate::event::AuditEntry;

/// Compute the SHA-256 hash for a single audit entry.
///
/// Commits to the entry's log, its position, its link to the previous entry
/// and the full execution record. Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON, which cannot happen for
/// `ExecutionRecord`: it has no maps with non-string keys.
pub fn hash_entry(
    log_id: &str,
    sequence: u64,
    record: &ExecutionRecord,
    prev_hash: &str,
) -> String {
    let record_json =
        serde_json::to_vec(record).expect("ExecutionRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(log_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// Valid when every entry links to its predecessor (`GENESIS_HASH` for the
/// first), carries the next sequence number, and its `this_hash` matches the
/// value recomputed from its own fields. An empty chain is valid.
pub fn verify_chain(entries: &[AuditEntry]) -> bool {
    let mut expected_prev = AuditEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        let recomputed = hash_entry(&entry.log_id, entry.sequence, &entry.record, &entry.prev_hash);
        if entry.this_hash != recomputed {
            return false;
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
