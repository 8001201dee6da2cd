//! # Ledger-Deadline Watchdog
//!
//! Wall-clock timeouts only protect callers who wait. The [`TxFailManager`]
//! protects everyone else: at blob-generation time the core registers a
//! fail event keyed on a target ledger sequence, and if the chain closes
//! that sequence before the transaction settles, the watchdog resolves the
//! transaction's correlation future with the registered error. The caller
//! eventually observes a timeout even if the node never says a word.
//!
//! Registration is fire-and-forget. Firing goes through
//! [`TransactionSyncManager::notify`], which is an idempotent no-op when the
//! transaction already settled and deregistered.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::SdkError;
use crate::sync::{TransactionSyncManager, TxNotification};

#[derive(Debug, Clone)]
struct PendingDeadline {
    target_seq: u64,
    error_code: u32,
    error_message: String,
}

/// Registry of ledger-sequence deadlines for in-flight transactions.
pub struct TxFailManager {
    sync_manager: Arc<TransactionSyncManager>,
    // tx hash -> deadline registered at blob-generation time
    pending: DashMap<String, PendingDeadline>,
}

impl TxFailManager {
    /// Creates a watchdog that fires into the given sync registry.
    pub fn new(sync_manager: Arc<TransactionSyncManager>) -> Self {
        Self {
            sync_manager,
            pending: DashMap::new(),
        }
    }

    /// Registers a deadline: if the ledger closes `target_seq` before the
    /// transaction for `tx_hash` settles, resolve its future with `error`.
    ///
    /// Re-registering the same hash replaces the previous deadline; the
    /// core only does this when a blob hash genuinely recurs (same sponsor,
    /// nonce, and contents), where the later deadline is the correct one.
    pub fn final_notify_fail_event(&self, target_seq: u64, tx_hash: &str, error: SdkError) {
        tracing::debug!(tx_hash, target_seq, "registered final-notify deadline");
        self.pending.insert(
            tx_hash.to_string(),
            PendingDeadline {
                target_seq,
                error_code: error.code(),
                error_message: error.to_string(),
            },
        );
    }

    /// Processes a ledger close: fires every deadline at or below `seq`.
    ///
    /// Call this from the same feed that drives
    /// [`NodeManager::record_ledger_close`](crate::node::NodeManager::record_ledger_close).
    pub fn on_ledger_closed(&self, seq: u64) {
        let expired: Vec<(String, PendingDeadline)> = self
            .pending
            .iter()
            .filter(|entry| entry.value().target_seq <= seq)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        for (tx_hash, deadline) in expired {
            self.pending.remove(&tx_hash);
            let fired = self.sync_manager.notify(
                &tx_hash,
                TxNotification::failure(deadline.error_code.to_string(), deadline.error_message),
            );
            tracing::warn!(
                tx_hash,
                target_seq = deadline.target_seq,
                ledger_seq = seq,
                fired,
                "final-notify deadline passed"
            );
        }
    }

    /// Number of deadlines still pending.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
