//! # Transaction Module
//!
//! Construction, signing, and submission of Meridian transactions.
//!
//! ```text
//! types.rs     — Signer / Digest / detachable form / commit result
//! blob.rs      — TransactionBlob: canonical bytes + content hash
//! envelope.rs  — Canonical byte encoding + the Operation contract
//! lifecycle.rs — The Transaction state machine: build, freeze, submit, wait
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** — mutate an open [`Transaction`] via the chained builder
//!    calls.
//! 2. **Generate** — [`Transaction::generate_blob`] allocates the nonce and
//!    produces the immutable [`TransactionBlob`]. Exactly once.
//! 3. **Sign** — attach signers and/or precomputed digests; or detach with
//!    [`Transaction::for_serializable`] for an external signer.
//! 4. **Commit** — [`Transaction::commit`] freezes, validates,
//!    self-verifies, submits, and (synchronously) waits for the outcome.

pub mod blob;
pub mod envelope;
pub mod lifecycle;
pub mod types;

pub use blob::TransactionBlob;
pub use envelope::{EnvelopeBuilder, OpaqueOperation, Operation, ENVELOPE_VERSION};
pub use lifecycle::{
    SdkContext, Transaction, HIGH_FINAL_NOTIFY_SEQ_OFFSET, LOW_FINAL_NOTIFY_SEQ_OFFSET,
    MID_FINAL_NOTIFY_SEQ_OFFSET, SYNC_WAIT_CEILING,
};
pub use types::{Digest, Signer, TransactionCommittedResult, TransactionSerializable};
