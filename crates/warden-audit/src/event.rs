//! Audit entry and trail types.
//!
//! `AuditEntry` wraps an `ExecutionRecord` with its chain position and the
//! hashes that make tampering detectable. `AuditTrail` is the sealed export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_contracts::execution::ExecutionRecord;

/// A single link in the SHA-256 hash chain.
///
/// Modifying any field, including those of the embedded `record`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The trail this entry belongs to. One trail spans many executions.
    pub log_id: String,

    pub record: ExecutionRecord,

    /// Hash of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Computed by `hash_entry()` over (log_id, sequence, prev_hash, record).
    pub this_hash: String,
}

impl AuditEntry {
    /// The `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed copy of a trail, produced by `InMemoryAuditWriter::export_log()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    pub log_id: String,

    /// All entries in chain order.
    pub entries: Vec<AuditEntry>,

    /// Executions that reached a terminal state, in the order they finished.
    pub finalized_executions: Vec<String>,

    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty if the trail is empty.
    pub terminal_hash: String,
}
