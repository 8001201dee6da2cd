//! Observed chain state.
//!
//! The SDK does not run consensus; it mirrors what the connected node last
//! told it: the latest closed ledger sequence and which hash algorithm the
//! chain currently accepts. Whatever event feed the embedding application
//! runs (websocket ledger stream, polling loop) pushes updates in through
//! [`NodeManager::record_ledger_close`] and [`NodeManager::set_supported_hash`].

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::crypto::HashAlgorithm;

/// Shared view of the connected node's chain state.
///
/// Thread safety: height is an atomic, the hash algorithm sits behind a
/// `parking_lot::RwLock`. Reads on the blob-generation path never block on
/// writers for more than a pointer-sized copy.
#[derive(Debug, Default)]
pub struct NodeManager {
    last_seq: AtomicU64,
    supported_hash: RwLock<HashAlgorithm>,
}

impl NodeManager {
    /// Creates a manager with height 0 and the default hash algorithm.
    /// The first ledger-close event brings it up to date.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest ledger sequence observed from the node.
    pub fn last_seq(&self) -> u64 {
        self.last_seq.load(Ordering::Acquire)
    }

    /// The hash algorithm the chain currently advertises.
    pub fn supported_hash(&self) -> HashAlgorithm {
        *self.supported_hash.read()
    }

    /// Records a ledger close. Sequences only move forward; a stale or
    /// duplicate event is ignored.
    pub fn record_ledger_close(&self, seq: u64) {
        self.last_seq.fetch_max(seq, Ordering::AcqRel);
    }

    /// Updates the advertised hash algorithm (chain governance upgrade).
    pub fn set_supported_hash(&self, algorithm: HashAlgorithm) {
        *self.supported_hash.write() = algorithm;
    }
}
