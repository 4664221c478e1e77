//! # warden-audit
//!
//! Append-only, SHA-256 hash-chained execution trail for the WARDEN runtime.
//!
//! ## Overview
//!
//! Every decision the executor records (a rejected plan, or one action's
//! outcome) is wrapped in an `AuditEntry` that links to the previous entry
//! via its SHA-256 hash. Tampering with any entry breaks the chain and is
//! detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_audit::InMemoryAuditWriter;
//!
//! let audit = Arc::new(InMemoryAuditWriter::new("wallet-main"));
//! // Pass `audit.clone()` to `ExecutionCoordinator::new(...)`, then:
//! assert!(audit.verify_integrity());
//! let trail = audit.export_log();
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use event::{AuditEntry, AuditTrail};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use warden_contracts::{
        action::{Action, Amount},
        execution::{ActionOutcome, ExecutionEvent, ExecutionId, ExecutionRecord, TxSignature},
        policy::PolicyViolation,
    };
    use warden_core::traits::AuditWriter;

    use super::{AuditEntry, InMemoryAuditWriter};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn executed(id: &ExecutionId, index: usize, to: &str) -> ExecutionRecord {
        ExecutionRecord::now(
            id,
            ExecutionEvent::Action {
                index,
                action: Action::Transfer {
                    to: to.to_string(),
                    amount: Amount::from(100),
                },
                outcome: ActionOutcome::Executed {
                    signature: TxSignature::new(format!("sig-{index}")),
                },
            },
        )
    }

    fn rejected(id: &ExecutionId) -> ExecutionRecord {
        ExecutionRecord::now(
            id,
            ExecutionEvent::Rejected {
                violations: vec![PolicyViolation::at(0, "to", "not allowlisted")],
            },
        )
    }

    fn three_entries(writer: &InMemoryAuditWriter) -> ExecutionId {
        let id = ExecutionId::new();
        writer.write(&executed(&id, 0, "alice")).unwrap();
        writer.write(&executed(&id, 1, "bob")).unwrap();
        writer.write(&executed(&id, 2, "carol")).unwrap();
        id
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let writer = InMemoryAuditWriter::new("log-integrity");
        three_entries(&writer);

        assert_eq!(writer.len(), 3);
        assert!(writer.verify_integrity(), "chain must be valid after sequential writes");
    }

    /// Rewriting the recipient of an executed transfer breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let writer = InMemoryAuditWriter::new("log-tamper");
        three_entries(&writer);

        {
            let mut state = writer.state.lock().unwrap();
            if let ExecutionEvent::Action { action, .. } = &mut state.entries[0].record.event {
                *action = Action::Transfer {
                    to: "mallory".to_string(),
                    amount: Amount::from(100),
                };
            }
        }

        assert!(
            !writer.verify_integrity(),
            "chain must detect tampering with a stored entry"
        );
    }

    /// Dropping an entry from the middle is detected through the linkage.
    #[test]
    fn test_removed_entry_is_detected() {
        let writer = InMemoryAuditWriter::new("log-gap");
        three_entries(&writer);

        let mut trail = writer.export_log();
        trail.entries.remove(1);
        assert!(!super::verify_chain(&trail.entries));
    }

    #[test]
    fn test_genesis_hash() {
        let writer = InMemoryAuditWriter::new("log-genesis");
        writer.write(&rejected(&ExecutionId::new())).unwrap();

        let trail = writer.export_log();
        assert_eq!(trail.entries.len(), 1);
        assert_eq!(
            trail.entries[0].prev_hash,
            AuditEntry::GENESIS_HASH,
            "first entry must link to the genesis sentinel hash"
        );
    }

    #[test]
    fn test_sequence_monotonic() {
        let writer = InMemoryAuditWriter::new("log-seq");
        three_entries(&writer);

        let trail = writer.export_log();
        for (idx, entry) in trail.entries.iter().enumerate() {
            assert_eq!(entry.sequence, idx as u64);
        }
    }

    #[test]
    fn test_export_log() {
        let writer = InMemoryAuditWriter::new("log-export");
        let id = three_entries(&writer);
        writer.finalize(&id.to_string()).unwrap();

        let trail = writer.export_log();

        assert_eq!(trail.log_id, "log-export");
        assert_eq!(trail.entries.len(), 3);
        assert_eq!(trail.finalized_executions, vec![id.to_string()]);
        assert_eq!(
            trail.terminal_hash,
            trail.entries.last().unwrap().this_hash,
            "terminal_hash must equal the last entry's this_hash"
        );
        assert!(super::verify_chain(&trail.entries));
    }

    /// One trail spans executions; records can be pulled apart by id.
    #[test]
    fn test_records_for_separates_executions() {
        let writer = InMemoryAuditWriter::new("log-multi");
        let first = ExecutionId::new();
        let second = ExecutionId::new();

        writer.write(&executed(&first, 0, "alice")).unwrap();
        writer.write(&rejected(&second)).unwrap();
        writer.write(&executed(&first, 1, "bob")).unwrap();

        assert_eq!(writer.records_for(&first).len(), 2);
        let second_records = writer.records_for(&second);
        assert_eq!(second_records.len(), 1);
        assert!(matches!(
            second_records[0].event,
            ExecutionEvent::Rejected { .. }
        ));
        assert!(writer.verify_integrity());
    }

    /// The same record at the same position in two trails hashes differently.
    #[test]
    fn test_hash_commits_to_log_id() {
        let record = rejected(&ExecutionId::new());
        let a = super::hash_entry("log-a", 0, &record, AuditEntry::GENESIS_HASH);
        let b = super::hash_entry("log-b", 0, &record, AuditEntry::GENESIS_HASH);

        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_verify_empty() {
        let writer = InMemoryAuditWriter::new("log-empty");
        assert!(writer.is_empty());
        assert!(writer.verify_integrity(), "an empty chain must be considered valid");
        assert!(super::verify_chain(&[]));
        assert_eq!(writer.export_log().terminal_hash, "");
    }
}
