//! In-memory implementation of `AuditWriter`.
//!
//! `InMemoryAuditWriter` keeps the whole chain in a `Vec` behind a `Mutex`, so
//! one writer can be shared by every execution an agent runs, including
//! concurrent ones. Entries from concurrent executions interleave in the chain;
//! each carries its `execution_id` so `records_for()` can pull one apart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use warden_contracts::{
    error::{WardenError, WardenResult},
    execution::{ExecutionId, ExecutionRecord},
};
use warden_core::traits::AuditWriter;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{AuditEntry, AuditTrail},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    pub(crate) entries: Vec<AuditEntry>,
    pub(crate) last_hash: String,
    pub(crate) finalized: Vec<String>,
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only audit writer backed by a SHA-256 hash chain.
pub struct InMemoryAuditWriter {
    log_id: String,
    pub(crate) state: Mutex<InMemoryState>,
}

impl InMemoryAuditWriter {
    /// Create an empty trail. The first entry links to `GENESIS_HASH`.
    pub fn new(log_id: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
            state: Mutex::new(InMemoryState {
                entries: Vec::new(),
                last_hash: AuditEntry::GENESIS_HASH.to_string(),
                finalized: Vec::new(),
            }),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export a sealed copy of every entry written so far.
    pub fn export_log(&self) -> AuditTrail {
        let state = self.read();
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        AuditTrail {
            log_id: self.log_id.clone(),
            entries: state.entries.clone(),
            finalized_executions: state.finalized.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// The records of a single execution, in the order they were written.
    pub fn records_for(&self, execution_id: &ExecutionId) -> Vec<ExecutionRecord> {
        self.read()
            .entries
            .iter()
            .filter(|e| &e.record.execution_id == execution_id)
            .map(|e| e.record.clone())
            .collect()
    }

    /// Check that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().entries)
    }

    // Read-only access tolerates a poisoned lock.
    fn read(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_for_write(&self) -> WardenResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| WardenError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
            completed: Vec::new(),
        })
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    fn write(&self, record: &ExecutionRecord) -> WardenResult<()> {
        let mut state = self.lock_for_write()?;

        let sequence = state.entries.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(&self.log_id, sequence, record, &prev_hash);

        debug!(
            log_id = %self.log_id,
            execution_id = %record.execution_id,
            sequence,
            "audit entry appended"
        );

        state.entries.push(AuditEntry {
            sequence,
            log_id: self.log_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }

    fn finalize(&self, execution_id: &str) -> WardenResult<()> {
        let mut state = self.lock_for_write()?;
        state.finalized.push(execution_id.to_string());

        info!(
            log_id = %self.log_id,
            execution_id = %execution_id,
            entry_count = state.entries.len(),
            terminal_hash = %state.last_hash,
            "execution audit finalized"
        );

        Ok(())
    }
}
