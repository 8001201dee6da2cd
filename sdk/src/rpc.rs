//! # RPC Boundary
//!
//! The wire types the core produces for submission and the [`RpcService`]
//! trait it submits through. The actual transport (HTTP, gRPC, whatever the
//! deployment uses) lives outside this crate — the core only cares that
//! submission either succeeds or fails with a [`TransportError`] that may
//! carry the chain's own verdict.
//!
//! ## Submission payload
//!
//! One request holds one or more transaction items; each item is the
//! hex-encoded canonical blob plus an ordered list of
//! `{public key, hex signature}` entries — signers' computed signatures
//! first, then precomputed digests, in list order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One signature entry in the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// Hex-encoded public key of the signer.
    pub public_key: String,
    /// Hex-encoded signature over the raw blob bytes.
    pub sign_data: String,
}

/// One transaction inside a submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    /// Hex-encoded canonical transaction blob.
    pub transaction_blob: String,
    /// Ordered signature entries: computed signatures, then digests.
    pub signatures: Vec<SignatureEntry>,
}

/// The full submission request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTransactionRequest {
    /// Transaction items. The core always submits exactly one.
    pub items: Vec<TransactionItem>,
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// A chain-level rejection relayed through the transport layer.
///
/// When the node synchronously refuses a transaction (bad nonce, fee below
/// floor, malformed envelope), the transport surfaces the node's code and
/// message here instead of burying them in an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRejection {
    /// Chain-assigned rejection code.
    pub code: i32,
    /// Chain-assigned rejection message.
    pub message: String,
}

/// Failure raised by an [`RpcService`] implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    rejection: Option<ChainRejection>,
}

impl TransportError {
    /// A transport failure with no chain-level verdict (timeouts, DNS,
    /// connection resets).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            rejection: None,
        }
    }

    /// A transport failure wrapping the chain's own rejection.
    pub fn with_rejection(message: impl Into<String>, rejection: ChainRejection) -> Self {
        Self {
            message: message.into(),
            rejection: Some(rejection),
        }
    }

    /// The chain's verdict, if the node got far enough to give one.
    pub fn chain_rejection(&self) -> Option<&ChainRejection> {
        self.rejection.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Minimal remote-node surface the transaction core needs.
///
/// Implementations are expected to be cheap to clone behind an `Arc` and
/// safe to call from multiple tasks.
#[async_trait]
pub trait RpcService: Send + Sync {
    /// Delivers a signed submission to the node.
    ///
    /// A successful return means the node acknowledged receipt — not that
    /// the transaction settled. Settlement arrives out-of-band through the
    /// notification stream (see [`crate::sync::TransactionSyncManager`]).
    async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
    ) -> Result<(), TransportError>;
}
