// Copyright (c) 2026 Meridian Labs. MIT License.
// See LICENSE for details.

//! # Meridian SDK — Transaction Core
//!
//! The transaction-construction and submission core of the Meridian client
//! SDK: assemble a signed, chain-consumable transaction from a caller's
//! intent, submit it to a remote node, and — when asked — block until the
//! node's asynchronous outcome notification arrives or a timeout fires.
//!
//! The hard part is the lifecycle state machine and its concurrency
//! contract, and that is what this crate is about. Everything around it —
//! the transport, key storage, the node itself — stays behind traits.
//!
//! ## Architecture
//!
//! - **transaction** — The [`Transaction`](transaction::Transaction) builder
//!   and one-shot executor, the canonical envelope encoding, and the blob.
//! - **sequence** — Per-sponsor nonce allocation with reset-to-chain-truth.
//! - **sync** — The correlation-future registry resolving submitted hashes
//!   against the node's out-of-band notification stream.
//! - **fail** — The ledger-sequence-deadline watchdog: a timeout the caller
//!   observes even if the node never replies.
//! - **node** — The SDK's mirror of observed chain state.
//! - **rpc** — Wire types and the submission trait.
//! - **crypto** — Blob hashing and hex-keyed Ed25519 operations.
//! - **error** — One typed error surface with stable codes.
//!
//! ## A complete flow
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use meridian_sdk::transaction::{OpaqueOperation, SdkContext, Transaction};
//! # async fn demo(ctx: SdkContext) -> Result<(), meridian_sdk::SdkError> {
//! let mut tx = Transaction::new("mer1qw508d6...", ctx);
//! tx.set_fee_limit(1_000)?
//!     .set_gas_price(1)?
//!     .set_metadata("invoice 42")?
//!     .add_operation(OpaqueOperation::new(1, vec![0x01]))?;
//! tx.generate_blob().await?;
//! let result = tx.commit_with_signer("aabb...", "ccdd...").await?;
//! assert!(result.confirmed);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod fail;
pub mod node;
pub mod rpc;
pub mod sequence;
pub mod sync;
pub mod transaction;

pub use error::{ErrorKind, SdkError};
pub use transaction::{SdkContext, Transaction};
