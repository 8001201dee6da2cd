//! # Sequence Allocation
//!
//! Per-sponsor nonce bookkeeping. The chain demands a strictly increasing
//! sequence number per account; the [`SequenceManager`] hands them out
//! locally so a burst of transactions from one sponsor doesn't have to
//! round-trip to the node for every allocation.
//!
//! The cache is deliberately pessimistic about failure: any submission that
//! fails after consuming a number calls [`SequenceManager::reset`], which
//! drops the cached counter so the next allocation re-reads ground truth
//! from the chain instead of building on a number that may never have
//! reached the ledger.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::SdkError;
use crate::rpc::TransportError;

/// Source of on-chain nonce truth for an account.
///
/// Usually backed by the same RPC endpoint the submission goes through;
/// injected as a trait so tests can pin it and the transport stays outside
/// this crate.
#[async_trait]
pub trait SequenceSource: Send + Sync {
    /// The highest nonce the chain has executed for `address`.
    async fn latest_nonce(&self, address: &str) -> Result<u64, TransportError>;
}

/// Allocates and resets per-sponsor sequence numbers.
///
/// Allocate and reset are individually atomic per address: the map entry is
/// locked for the duration of the bump, so two tasks allocating for the same
/// sponsor can never receive the same number from one cache generation.
pub struct SequenceManager {
    source: Box<dyn SequenceSource>,
    // address -> next unused sequence number
    next: DashMap<String, u64>,
}

impl SequenceManager {
    /// Creates a manager over the given chain-truth source.
    pub fn new(source: impl SequenceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            next: DashMap::new(),
        }
    }

    /// Returns the next unused sequence number for `address`, consuming it.
    ///
    /// On a cache miss the chain is asked for its executed nonce and the
    /// allocation continues from there. The fetch happens outside the entry
    /// lock; if two tasks race the miss, the entry API keeps one seed and
    /// both still receive distinct numbers.
    pub async fn next_sequence(&self, address: &str) -> Result<u64, SdkError> {
        if let Some(mut entry) = self.next.get_mut(address) {
            let allocated = *entry;
            *entry += 1;
            return Ok(allocated);
        }

        let on_chain = self.source.latest_nonce(address).await?;
        let mut entry = self.next.entry(address.to_string()).or_insert(on_chain + 1);
        let allocated = *entry;
        *entry += 1;
        Ok(allocated)
    }

    /// Forgets the cached counter for `address`.
    ///
    /// The next [`next_sequence`](Self::next_sequence) call re-reads chain
    /// truth. Called automatically by the submission path on failure and
    /// available to callers who know the cache has gone stale.
    pub fn reset(&self, address: &str) {
        self.next.remove(address);
        tracing::debug!(address, "sequence cache reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct FixedSource {
        nonce: u64,
        fetches: Arc<AtomicU64>,
    }

    impl FixedSource {
        fn new(nonce: u64) -> (Self, Arc<AtomicU64>) {
            let fetches = Arc::new(AtomicU64::new(0));
            (
                Self {
                    nonce,
                    fetches: fetches.clone(),
                },
                fetches,
            )
        }
    }

    #[async_trait]
    impl SequenceSource for FixedSource {
        async fn latest_nonce(&self, _address: &str) -> Result<u64, TransportError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.nonce)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SequenceSource for FailingSource {
        async fn latest_nonce(&self, _address: &str) -> Result<u64, TransportError> {
            Err(TransportError::new("node unreachable"))
        }
    }

    #[tokio::test]
    async fn allocates_monotonically_from_chain_truth() {
        let (source, _) = FixedSource::new(7);
        let manager = SequenceManager::new(source);
        assert_eq!(manager.next_sequence("mer1aaaa").await.unwrap(), 8);
        assert_eq!(manager.next_sequence("mer1aaaa").await.unwrap(), 9);
        assert_eq!(manager.next_sequence("mer1aaaa").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn fetches_chain_truth_once_per_cache_generation() {
        let (source, fetches) = FixedSource::new(0);
        let manager = SequenceManager::new(source);
        manager.next_sequence("mer1aaaa").await.unwrap();
        manager.next_sequence("mer1aaaa").await.unwrap();
        manager.next_sequence("mer1aaaa").await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        manager.reset("mer1aaaa");
        manager.next_sequence("mer1aaaa").await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reset_forces_reread_of_ground_truth() {
        let (source, _) = FixedSource::new(3);
        let manager = SequenceManager::new(source);
        assert_eq!(manager.next_sequence("mer1bbbb").await.unwrap(), 4);
        assert_eq!(manager.next_sequence("mer1bbbb").await.unwrap(), 5);
        manager.reset("mer1bbbb");
        // Chain still reports 3, so allocation restarts at 4.
        assert_eq!(manager.next_sequence("mer1bbbb").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn addresses_are_independent() {
        let (source, _) = FixedSource::new(0);
        let manager = SequenceManager::new(source);
        assert_eq!(manager.next_sequence("mer1aaaa").await.unwrap(), 1);
        assert_eq!(manager.next_sequence("mer1bbbb").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn source_failure_surfaces_as_transport_error() {
        let manager = SequenceManager::new(FailingSource);
        let err = manager.next_sequence("mer1cccc").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TransportError);
    }
}
