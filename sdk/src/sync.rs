//! # Outcome Correlation
//!
//! A submitted transaction's fate arrives out-of-band: the node pushes a
//! notification (or the ledger-deadline watchdog fires) some unknown time
//! after the RPC acknowledgment. This module is the rendezvous point:
//!
//! 1. Before submitting, the core registers a correlation future for the
//!    blob hash with the [`TransactionSyncManager`].
//! 2. Whatever consumes the node's event stream calls
//!    [`TransactionSyncManager::notify`] when an outcome for that hash
//!    arrives, resolving the future.
//! 3. In synchronous mode the core awaits the future under a wall-clock
//!    ceiling; in asynchronous mode the caller holds the future themselves.
//!
//! At most one registration may be live per transaction hash. Deregistration
//! is RAII ([`RegistrationGuard`]) so it happens on every exit path —
//! success, error return, or timeout.

use dashmap::DashMap;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::error::SdkError;

// ---------------------------------------------------------------------------
// Notification payload
// ---------------------------------------------------------------------------

/// The outcome delivered for a submitted transaction.
///
/// Mirrors the node's notification schema: no code (or code `"0"`) means
/// the transaction settled successfully; anything else is a failure code
/// with an accompanying message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxNotification {
    /// Failure code, if any. `None` or `"0"` both mean success.
    pub error_code: Option<String>,
    /// Failure message accompanying the code.
    pub error_message: Option<String>,
}

impl TxNotification {
    /// A successful settlement notification.
    pub fn success() -> Self {
        Self {
            error_code: None,
            error_message: None,
        }
    }

    /// A failure notification with the node's code and message.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    /// Whether this notification reports success.
    pub fn is_success(&self) -> bool {
        match self.error_code.as_deref() {
            None | Some("0") => true,
            Some(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Correlation future
// ---------------------------------------------------------------------------

/// A one-shot future for the outcome of a single submitted transaction.
///
/// Obtained from [`TransactionSyncManager::register`]; resolved by the
/// notification stream; consumed by awaiting it.
#[derive(Debug)]
pub struct AsyncFutureTx {
    tx_hash: String,
    receiver: oneshot::Receiver<TxNotification>,
}

impl AsyncFutureTx {
    /// The transaction hash this future is keyed on.
    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    /// Suspends until the notification arrives or `limit` elapses.
    ///
    /// Outcomes:
    /// - notification delivered → `Ok(notification)`
    /// - `limit` elapsed → [`SdkError::RemoteTimeout`]
    /// - channel torn down before resolution (registration removed while
    ///   the wait was in flight) → [`SdkError::WaitInterrupted`]
    pub async fn await_within(self, limit: Duration) -> Result<TxNotification, SdkError> {
        match tokio::time::timeout(limit, self.receiver).await {
            Ok(Ok(notification)) => Ok(notification),
            Ok(Err(_closed)) => Err(SdkError::WaitInterrupted),
            Err(_elapsed) => Err(SdkError::RemoteTimeout {
                waited_secs: limit.as_secs(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry of in-flight correlation futures, keyed by transaction hash.
///
/// Shared process-wide; its internal map is its own synchronization. The
/// invariant it enforces: at most one live registration per hash.
#[derive(Debug, Default)]
pub struct TransactionSyncManager {
    pending: DashMap<String, oneshot::Sender<TxNotification>>,
}

impl TransactionSyncManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a correlation future for `tx_hash`.
    ///
    /// Fails with [`SdkError::DuplicateRegistration`] if a future for this
    /// hash is already outstanding — two concurrent waits on one hash is a
    /// caller bug the registry refuses to paper over.
    pub fn register(&self, tx_hash: &str) -> Result<AsyncFutureTx, SdkError> {
        use dashmap::mapref::entry::Entry;

        let (sender, receiver) = oneshot::channel();
        match self.pending.entry(tx_hash.to_string()) {
            Entry::Occupied(_) => Err(SdkError::DuplicateRegistration {
                tx_hash: tx_hash.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(sender);
                Ok(AsyncFutureTx {
                    tx_hash: tx_hash.to_string(),
                    receiver,
                })
            }
        }
    }

    /// Resolves the future for `tx_hash`, if one is outstanding.
    ///
    /// Completion is idempotent: notifying a hash with no live registration
    /// (never registered, already resolved, or already removed) is a no-op.
    /// Returns whether a waiter was actually resolved.
    pub fn notify(&self, tx_hash: &str, notification: TxNotification) -> bool {
        match self.pending.remove(tx_hash) {
            Some((_, sender)) => sender.send(notification).is_ok(),
            None => false,
        }
    }

    /// Drops the registration for `tx_hash`, if any.
    ///
    /// Best-effort and unconditional: callers invoke this (usually through
    /// [`RegistrationGuard`]) on every exit path. A waiter still blocked on
    /// the future observes [`SdkError::WaitInterrupted`].
    pub fn remove(&self, tx_hash: &str) {
        self.pending.remove(tx_hash);
    }

    /// Number of outstanding registrations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Scoped deregistration of a correlation future.
///
/// Holding one of these guarantees [`TransactionSyncManager::remove`] runs
/// when the scope exits, whatever path it exits by. This is the only
/// sanctioned way the submission path releases its registration.
#[must_use = "the guard deregisters on drop; binding it to _ defeats the point"]
pub struct RegistrationGuard<'a> {
    manager: &'a TransactionSyncManager,
    tx_hash: String,
}

impl<'a> RegistrationGuard<'a> {
    /// Guards the registration for `tx_hash`.
    pub fn new(manager: &'a TransactionSyncManager, tx_hash: impl Into<String>) -> Self {
        Self {
            manager,
            tx_hash: tx_hash.into(),
        }
    }
}

impl Drop for RegistrationGuard<'_> {
    fn drop(&mut self) {
        self.manager.remove(&self.tx_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_resolves_registered_future() {
        let manager = TransactionSyncManager::new();
        let future = manager.register("abc123").unwrap();
        assert!(manager.notify("abc123", TxNotification::success()));
        let outcome = future.await_within(Duration::from_secs(1)).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(manager.pending_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let manager = TransactionSyncManager::new();
        let _first = manager.register("abc123").unwrap();
        let err = manager.register("abc123").unwrap_err();
        assert!(matches!(err, SdkError::DuplicateRegistration { .. }));
        // The original registration survives the rejected attempt.
        assert_eq!(manager.pending_count(), 1);
    }

    #[tokio::test]
    async fn notify_without_registration_is_a_noop() {
        let manager = TransactionSyncManager::new();
        assert!(!manager.notify("missing", TxNotification::success()));
    }

    #[tokio::test]
    async fn notify_is_idempotent_after_resolution() {
        let manager = TransactionSyncManager::new();
        let future = manager.register("abc123").unwrap();
        assert!(manager.notify("abc123", TxNotification::failure("99", "rejected")));
        assert!(!manager.notify("abc123", TxNotification::success()));
        let outcome = future.await_within(Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome.error_code.as_deref(), Some("99"));
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_future_times_out() {
        let manager = TransactionSyncManager::new();
        let future = manager.register("abc123").unwrap();
        let err = future.await_within(Duration::from_secs(500)).await.unwrap_err();
        assert!(matches!(err, SdkError::RemoteTimeout { waited_secs: 500 }));
    }

    #[tokio::test]
    async fn removal_mid_wait_surfaces_as_interrupted() {
        let manager = TransactionSyncManager::new();
        let future = manager.register("abc123").unwrap();
        manager.remove("abc123");
        let err = future.await_within(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, SdkError::WaitInterrupted));
    }

    #[tokio::test]
    async fn guard_deregisters_on_drop() {
        let manager = TransactionSyncManager::new();
        let _future = manager.register("abc123").unwrap();
        {
            let _guard = RegistrationGuard::new(&manager, "abc123");
            assert_eq!(manager.pending_count(), 1);
        }
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn success_predicate_accepts_none_and_zero() {
        assert!(TxNotification::success().is_success());
        assert!(TxNotification {
            error_code: Some("0".into()),
            error_message: None
        }
        .is_success());
        assert!(!TxNotification::failure("4", "bad nonce").is_success());
    }
}
