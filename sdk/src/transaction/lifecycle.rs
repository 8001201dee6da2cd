//! # Transaction Lifecycle
//!
//! The mutable builder and one-shot executor at the heart of the SDK.
//!
//! A [`Transaction`] moves through a strict lifecycle:
//!
//! 1. **Open** — builder calls mutate it (operations, signers, fees, memo).
//! 2. **Blob generated** — [`Transaction::generate_blob`] locks in the
//!    nonce, the operation set, and the ledger-sequence deadline. At most
//!    once per instance.
//! 3. **Committed** — [`Transaction::commit`] freezes the instance
//!    irreversibly, validates, signs, self-verifies, and submits. In
//!    synchronous mode it then suspends on the correlation future until the
//!    outcome notification, the ledger deadline, or the wall-clock ceiling.
//!
//! There is no reuse after commit: every mutating call on a committed
//! transaction fails with [`SdkError::AlreadyFinalized`].
//!
//! A single instance is a single-owner builder — it is not meant to be
//! shared across concurrent build/commit operations. The collaborators it
//! drives (sequence cache, correlation registry, deadline watchdog) are the
//! process-wide shared state, and they carry their own synchronization.

use std::sync::Arc;
use std::time::Duration;

use crate::crypto::{sign_raw, verify_raw};
use crate::error::SdkError;
use crate::fail::TxFailManager;
use crate::node::NodeManager;
use crate::rpc::{RpcService, SignatureEntry, SubmitTransactionRequest, TransactionItem};
use crate::sequence::SequenceManager;
use crate::sync::{RegistrationGuard, TransactionSyncManager, TxNotification};

use super::blob::TransactionBlob;
use super::envelope::{EnvelopeBuilder, Operation};
use super::types::{
    Digest, Signer, TransactionCommittedResult, TransactionSerializable,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Final-notify offset for callers in a hurry: ~10 ledgers of grace.
pub const LOW_FINAL_NOTIFY_SEQ_OFFSET: u64 = 10;

/// The default final-notify offset. One ledger closes every few seconds,
/// so 20 ledgers is a comfortable settlement window without letting a dead
/// transaction linger for minutes.
pub const MID_FINAL_NOTIFY_SEQ_OFFSET: u64 = 20;

/// Final-notify offset for congested-network tolerance.
pub const HIGH_FINAL_NOTIFY_SEQ_OFFSET: u64 = 30;

/// Wall-clock ceiling for a synchronous commit: roughly 50 block intervals
/// at the 10-second target spacing. If nothing has arrived by then, the
/// ledger-deadline watchdog has long since had its chance too.
pub const SYNC_WAIT_CEILING: Duration = Duration::from_secs(500);

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The shared collaborators a transaction drives.
///
/// One context is built per connected node/process and cloned (cheaply,
/// all `Arc`s) into every transaction.
#[derive(Clone)]
pub struct SdkContext {
    /// Per-sponsor nonce allocation and rollback.
    pub sequence_manager: Arc<SequenceManager>,
    /// The remote submission endpoint.
    pub rpc: Arc<dyn RpcService>,
    /// Correlation-future registry for outcome notifications.
    pub sync_manager: Arc<TransactionSyncManager>,
    /// Observed chain height and advertised hash algorithm.
    pub node_manager: Arc<NodeManager>,
    /// Ledger-sequence-deadline watchdog.
    pub fail_manager: Arc<TxFailManager>,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Open accepts mutations; Committed accepts nothing, ever again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Committed,
}

/// A transaction under construction and, eventually, in flight.
pub struct Transaction {
    ctx: SdkContext,
    sponsor_address: String,
    nonce: u64,
    final_notify_seq_offset: u64,
    operations: Vec<Box<dyn Operation>>,
    signers: Vec<Signer>,
    digests: Vec<Digest>,
    blob: Option<TransactionBlob>,
    // Deadline ledger sequence fixed at blob time; None until then and for
    // resumed transactions (their originator registered the watchdog).
    specified_seq: Option<u64>,
    metadata: Option<String>,
    fee_limit: u64,
    gas_price: u64,
    ceil_ledger_seq: Option<u64>,
    state: Lifecycle,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("sponsor_address", &self.sponsor_address)
            .field("nonce", &self.nonce)
            .field("final_notify_seq_offset", &self.final_notify_seq_offset)
            .field("operations", &self.operations.len())
            .field("signers", &self.signers.len())
            .field("digests", &self.digests)
            .field("blob", &self.blob)
            .field("specified_seq", &self.specified_seq)
            .field("metadata", &self.metadata)
            .field("fee_limit", &self.fee_limit)
            .field("gas_price", &self.gas_price)
            .field("ceil_ledger_seq", &self.ceil_ledger_seq)
            .field("state", &self.state)
            .finish()
    }
}

impl Transaction {
    /// Creates an open transaction for `sponsor_address`.
    pub fn new(sponsor_address: impl Into<String>, ctx: SdkContext) -> Self {
        Self {
            ctx,
            sponsor_address: sponsor_address.into(),
            nonce: 0,
            final_notify_seq_offset: MID_FINAL_NOTIFY_SEQ_OFFSET,
            operations: Vec::new(),
            signers: Vec::new(),
            digests: Vec::new(),
            blob: None,
            specified_seq: None,
            metadata: None,
            fee_limit: 0,
            gas_price: 0,
            ceil_ledger_seq: None,
            state: Lifecycle::Open,
        }
    }

    /// Resumes a transaction from its detached form: the blob and fee terms
    /// are already fixed, so the only meaningful mutations left are adding
    /// signers or digests before committing.
    pub fn from_serializable(detached: TransactionSerializable, ctx: SdkContext) -> Self {
        let mut tx = Self::new("", ctx);
        tx.blob = Some(detached.blob);
        tx.signers = detached.signers;
        tx.fee_limit = detached.fee_limit;
        tx.gas_price = detached.gas_price;
        tx
    }

    // -- builder surface ----------------------------------------------------

    /// The shared build step: guard on the open state, apply, return self
    /// for chaining. Every mutating method funnels through here so the
    /// finalized-state check lives in exactly one place.
    fn build_step(
        &mut self,
        apply: impl FnOnce(&mut Self),
    ) -> Result<&mut Self, SdkError> {
        match self.state {
            Lifecycle::Open => {
                apply(self);
                Ok(self)
            }
            Lifecycle::Committed => Err(SdkError::AlreadyFinalized),
        }
    }

    /// Attaches a signing keypair (hex-encoded halves).
    pub fn add_signer(
        &mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<&mut Self, SdkError> {
        let signer = Signer::new(public_key, private_key);
        self.build_step(|tx| tx.signers.push(signer))
    }

    /// Attaches an externally produced signature.
    pub fn add_digest(
        &mut self,
        public_key: impl Into<String>,
        origin_digest: Vec<u8>,
    ) -> Result<&mut Self, SdkError> {
        let digest = Digest::new(public_key, origin_digest);
        self.build_step(|tx| tx.digests.push(digest))
    }

    /// Sets the fee limit. Must be positive by commit time.
    pub fn set_fee_limit(&mut self, fee_limit: u64) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| tx.fee_limit = fee_limit)
    }

    /// Sets the gas price. Must be positive by commit time.
    pub fn set_gas_price(&mut self, gas_price: u64) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| tx.gas_price = gas_price)
    }

    /// Sets an upper ledger-sequence bound on validity.
    pub fn set_ceil_ledger_seq(&mut self, ceil: u64) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| tx.ceil_ledger_seq = Some(ceil))
    }

    /// Overrides the final-notify offset (ledgers past current height
    /// before the deadline watchdog declares a timeout). Sensible values
    /// sit in `[LOW_FINAL_NOTIFY_SEQ_OFFSET, HIGH_FINAL_NOTIFY_SEQ_OFFSET]`.
    pub fn set_final_notify_seq_offset(&mut self, offset: u64) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| tx.final_notify_seq_offset = offset)
    }

    /// Appends an operation to the envelope, in call order.
    pub fn add_operation(
        &mut self,
        operation: impl Operation + 'static,
    ) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| tx.operations.push(Box::new(operation)))
    }

    /// Appends an already-boxed operation; `None` is a no-op, not an error,
    /// so callers can thread optional operations straight through.
    pub fn add_boxed_operation(
        &mut self,
        operation: Option<Box<dyn Operation>>,
    ) -> Result<&mut Self, SdkError> {
        self.build_step(|tx| {
            if let Some(op) = operation {
                tx.operations.push(op);
            }
        })
    }

    /// Attaches opaque transaction metadata.
    pub fn set_metadata(&mut self, metadata: impl Into<String>) -> Result<&mut Self, SdkError> {
        let metadata = metadata.into();
        self.build_step(|tx| tx.metadata = Some(metadata))
    }

    // -- accessors ----------------------------------------------------------

    /// The nonce allocated at blob time (0 before then).
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The ledger-sequence deadline fixed at blob time.
    pub fn specified_seq(&self) -> Option<u64> {
        self.specified_seq
    }

    /// The generated blob, or [`SdkError::MissingBlob`] if generation has
    /// not happened yet.
    pub fn blob(&self) -> Result<&TransactionBlob, SdkError> {
        self.blob.as_ref().ok_or(SdkError::MissingBlob)
    }

    /// Detaches the built state for an external signer or a later process.
    /// Requires a generated blob — there is nothing useful to detach before
    /// that.
    pub fn for_serializable(&self) -> Result<TransactionSerializable, SdkError> {
        Ok(TransactionSerializable {
            blob: self.blob()?.clone(),
            signers: self.signers.clone(),
            fee_limit: self.fee_limit,
            gas_price: self.gas_price,
        })
    }

    /// Drops the sponsor's cached sequence so the next allocation re-reads
    /// chain truth. The submit path does this automatically on failure;
    /// this is the explicit handle for callers who know better.
    pub fn reset_sponsor_address(&self) {
        self.ctx.sequence_manager.reset(&self.sponsor_address);
    }

    // -- blob generation ----------------------------------------------------

    /// Serializes the transaction into its canonical blob.
    ///
    /// Preconditions, each failing distinctly: a sponsor address is set, no
    /// blob exists yet, the operation list is non-empty, and the
    /// transaction is still open.
    ///
    /// Side effects, in order: consumes one sequence number for the sponsor
    /// (the caller owns resetting it if this transaction never reaches the
    /// ledger — the submit path resets automatically on failure), fixes the
    /// ledger-sequence deadline at `observed height + final-notify offset`,
    /// and registers the deadline fail event with the watchdog so the
    /// outcome is eventually observable even if the node never replies.
    pub async fn generate_blob(&mut self) -> Result<&TransactionBlob, SdkError> {
        self.check_generate_blob_status()?;

        self.nonce = self
            .ctx
            .sequence_manager
            .next_sequence(&self.sponsor_address)
            .await?;

        let specified_seq = self.ctx.node_manager.last_seq() + self.final_notify_seq_offset;
        tracing::debug!(
            sponsor = %self.sponsor_address,
            nonce = self.nonce,
            specified_seq,
            "generating transaction blob"
        );

        let mut envelope = EnvelopeBuilder::new();
        envelope
            .write_str(&self.sponsor_address)
            .write_u64(self.nonce)
            .write_u64(self.fee_limit)
            .write_u64(self.gas_price)
            .write_opt_str(self.metadata.as_deref())
            .write_opt_u64(self.ceil_ledger_seq);
        for operation in &self.operations {
            operation.build_transaction(&mut envelope, specified_seq)?;
        }

        let blob = TransactionBlob::new(envelope.finish(), self.ctx.node_manager.supported_hash());
        self.ctx.fail_manager.final_notify_fail_event(
            specified_seq,
            blob.hash(),
            SdkError::LedgerDeadlineTimeout {
                target_seq: specified_seq,
            },
        );

        self.specified_seq = Some(specified_seq);
        self.blob = Some(blob);
        self.blob()
    }

    fn check_generate_blob_status(&self) -> Result<(), SdkError> {
        if self.sponsor_address.is_empty() {
            return Err(SdkError::EmptySponsor);
        }
        if self.blob.is_some() {
            return Err(SdkError::BlobAlreadyGenerated);
        }
        if self.operations.is_empty() {
            return Err(SdkError::EmptyOperations);
        }
        if self.state == Lifecycle::Committed {
            return Err(SdkError::AlreadyFinalized);
        }
        Ok(())
    }

    // -- commit / submission -------------------------------------------------

    /// Convenience for the single-signer case: attach one keypair, then
    /// commit synchronously.
    pub async fn commit_with_signer(
        &mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<TransactionCommittedResult, SdkError> {
        self.add_signer(public_key, private_key)?;
        self.commit(true).await
    }

    /// Freezes the transaction and submits it.
    ///
    /// This is the one-shot transition out of the open state; a second call
    /// (or any later mutation) fails with [`SdkError::AlreadyFinalized`].
    /// Validation runs entirely before any network call: at least one signer
    /// or digest, complete signer key material, a generated blob, positive
    /// fee limit and gas price.
    ///
    /// Submission registers the correlation future, assembles and
    /// self-verifies the signing payload, then calls the RPC service. A
    /// transport failure triggers exactly one compensating sequence reset
    /// for the sponsor before the error is surfaced; a chain verdict inside
    /// the transport error comes back as [`SdkError::ChainRejection`].
    ///
    /// With `sync` set, the call then suspends until the outcome
    /// notification, the ledger-deadline watchdog, or the
    /// [`SYNC_WAIT_CEILING`] — whichever fires first. The correlation
    /// registration is released on every exit path.
    pub async fn commit(&mut self, sync: bool) -> Result<TransactionCommittedResult, SdkError> {
        if self.blob.is_none() {
            self.generate_blob().await?;
        }
        self.complete()?;
        self.check_commit_status()?;

        let tx_hash = self.blob()?.hash().to_string();
        tracing::debug!(tx_hash = %tx_hash, sync, "submitting transaction");

        let future = self.ctx.sync_manager.register(&tx_hash)?;
        let _registration = RegistrationGuard::new(&self.ctx.sync_manager, &tx_hash);

        let request = self.signing_request()?;
        self.verify_pre(&request)?;

        if let Err(transport) = self.ctx.rpc.submit_transaction(&request).await {
            tracing::warn!(
                tx_hash = %tx_hash,
                sponsor = %self.sponsor_address,
                error = %transport,
                "submission failed, resetting sponsor sequence"
            );
            self.ctx.sequence_manager.reset(&self.sponsor_address);
            return Err(transport.into());
        }

        if sync {
            let outcome = future.await_within(SYNC_WAIT_CEILING).await?;
            if !outcome.is_success() {
                return Err(self.wait_failure(outcome));
            }
            tracing::debug!(tx_hash = %tx_hash, "transaction confirmed");
            return Ok(TransactionCommittedResult {
                tx_hash,
                confirmed: true,
            });
        }

        Ok(TransactionCommittedResult {
            tx_hash,
            confirmed: false,
        })
    }

    /// The one-shot open→committed transition.
    fn complete(&mut self) -> Result<(), SdkError> {
        match self.state {
            Lifecycle::Open => {
                self.state = Lifecycle::Committed;
                Ok(())
            }
            Lifecycle::Committed => Err(SdkError::AlreadyFinalized),
        }
    }

    fn check_commit_status(&self) -> Result<(), SdkError> {
        if self.signers.is_empty() && self.digests.is_empty() {
            return Err(SdkError::NoSignatures);
        }
        for signer in &self.signers {
            if signer.public_key.is_empty() {
                return Err(SdkError::EmptyPublicKey);
            }
            if signer.private_key.is_empty() {
                return Err(SdkError::EmptyPrivateKey);
            }
        }
        if self.blob.is_none() {
            return Err(SdkError::MissingBlob);
        }
        if self.fee_limit == 0 {
            return Err(SdkError::IllegalFeeLimit {
                got: self.fee_limit,
            });
        }
        if self.gas_price == 0 {
            return Err(SdkError::IllegalGasPrice {
                got: self.gas_price,
            });
        }
        Ok(())
    }

    /// Assembles the submission payload: each signer's freshly computed
    /// signature (hex), then each precomputed digest hex-encoded verbatim,
    /// list order preserved.
    ///
    /// Cryptographic faults during signing are collapsed into
    /// [`SdkError::SignatureMaterial`] — the raw fault never escapes.
    fn signing_request(&self) -> Result<SubmitTransactionRequest, SdkError> {
        let blob = self.blob()?;
        let mut entries = Vec::with_capacity(self.signers.len() + self.digests.len());

        for signer in &self.signers {
            let signature = sign_raw(blob.bytes(), &signer.private_key, &signer.public_key)
                .map_err(|_| SdkError::SignatureMaterial)?;
            entries.push(SignatureEntry {
                public_key: signer.public_key.clone(),
                sign_data: hex::encode(signature),
            });
        }
        for digest in &self.digests {
            entries.push(SignatureEntry {
                public_key: digest.public_key.clone(),
                sign_data: hex::encode(&digest.origin_digest),
            });
        }

        Ok(SubmitTransactionRequest {
            items: vec![TransactionItem {
                transaction_blob: blob.hex(),
                signatures: entries,
            }],
        })
    }

    /// Verifies every payload entry against the blob bytes before paying
    /// for a network round trip. Catches key/material mismatches and
    /// corrupted digests locally.
    fn verify_pre(&self, request: &SubmitTransactionRequest) -> Result<(), SdkError> {
        let blob = self.blob()?;
        for item in &request.items {
            for entry in &item.signatures {
                let signature = hex::decode(&entry.sign_data).map_err(|_| {
                    SdkError::SignatureVerifyFailed {
                        public_key: entry.public_key.clone(),
                    }
                })?;
                if !verify_raw(blob.bytes(), &signature, &entry.public_key) {
                    return Err(SdkError::SignatureVerifyFailed {
                        public_key: entry.public_key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Maps a failure notification onto the SDK error surface. The
    /// watchdog's deadline firings carry the ledger-deadline code; anything
    /// else is the chain's own verdict, passed through.
    fn wait_failure(&self, outcome: TxNotification) -> SdkError {
        let deadline_code = SdkError::LedgerDeadlineTimeout { target_seq: 0 }
            .code()
            .to_string();
        let code = outcome.error_code.unwrap_or_default();
        if code == deadline_code {
            return SdkError::LedgerDeadlineTimeout {
                target_seq: self.specified_seq.unwrap_or_default(),
            };
        }
        SdkError::Rejected {
            code,
            message: outcome.error_message.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::TransportError;
    use crate::sequence::SequenceSource;
    use crate::transaction::envelope::OpaqueOperation;
    use async_trait::async_trait;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct StubSource(u64);

    #[async_trait]
    impl SequenceSource for StubSource {
        async fn latest_nonce(&self, _address: &str) -> Result<u64, TransportError> {
            Ok(self.0)
        }
    }

    struct AckRpc {
        calls: AtomicU64,
    }

    #[async_trait]
    impl RpcService for AckRpc {
        async fn submit_transaction(
            &self,
            _request: &SubmitTransactionRequest,
        ) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_ctx() -> (SdkContext, Arc<AckRpc>) {
        let rpc = Arc::new(AckRpc {
            calls: AtomicU64::new(0),
        });
        let sync_manager = Arc::new(TransactionSyncManager::new());
        let ctx = SdkContext {
            sequence_manager: Arc::new(SequenceManager::new(StubSource(0))),
            rpc: rpc.clone(),
            sync_manager: sync_manager.clone(),
            node_manager: Arc::new(NodeManager::new()),
            fail_manager: Arc::new(TxFailManager::new(sync_manager)),
        };
        (ctx, rpc)
    }

    fn fresh_pair() -> (String, String) {
        let signing_key = SigningKey::generate(&mut OsRng);
        (
            hex::encode(signing_key.verifying_key().to_bytes()),
            hex::encode(signing_key.to_bytes()),
        )
    }

    fn payment_op() -> OpaqueOperation {
        OpaqueOperation::new(1, vec![0x01, 0x02, 0x03])
    }

    async fn built_tx(ctx: SdkContext) -> Transaction {
        let mut tx = Transaction::new("mer1sponsor", ctx);
        tx.set_fee_limit(100)
            .unwrap()
            .set_gas_price(1)
            .unwrap()
            .add_operation(payment_op())
            .unwrap();
        tx.generate_blob().await.unwrap();
        tx
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_hash() {
        let (ctx_a, _) = test_ctx();
        let (ctx_b, _) = test_ctx();
        let tx_a = built_tx(ctx_a).await;
        let tx_b = built_tx(ctx_b).await;
        assert_eq!(tx_a.blob().unwrap().hash(), tx_b.blob().unwrap().hash());
        assert!(!tx_a.blob().unwrap().bytes().is_empty());
    }

    #[tokio::test]
    async fn metadata_changes_the_hash() {
        let (ctx_a, _) = test_ctx();
        let (ctx_b, _) = test_ctx();
        let plain = built_tx(ctx_a).await;

        let mut with_memo = Transaction::new("mer1sponsor", ctx_b);
        with_memo
            .set_fee_limit(100)
            .unwrap()
            .set_gas_price(1)
            .unwrap()
            .set_metadata("invoice 7")
            .unwrap()
            .add_operation(payment_op())
            .unwrap();
        with_memo.generate_blob().await.unwrap();

        assert_ne!(
            plain.blob().unwrap().hash(),
            with_memo.blob().unwrap().hash()
        );
    }

    #[tokio::test]
    async fn none_operation_is_a_noop() {
        let (ctx_a, _) = test_ctx();
        let (ctx_b, _) = test_ctx();
        let plain = built_tx(ctx_a).await;

        let mut with_none = Transaction::new("mer1sponsor", ctx_b);
        with_none
            .set_fee_limit(100)
            .unwrap()
            .set_gas_price(1)
            .unwrap()
            .add_operation(payment_op())
            .unwrap()
            .add_boxed_operation(None)
            .unwrap();
        with_none.generate_blob().await.unwrap();

        assert_eq!(
            plain.blob().unwrap().hash(),
            with_none.blob().unwrap().hash()
        );
    }

    #[tokio::test]
    async fn blob_generation_is_one_shot() {
        let (ctx, _) = test_ctx();
        let mut tx = built_tx(ctx).await;
        let err = tx.generate_blob().await.unwrap_err();
        assert!(matches!(err, SdkError::BlobAlreadyGenerated));
    }

    #[tokio::test]
    async fn blob_preconditions_fail_distinctly() {
        let (ctx, _) = test_ctx();
        let mut no_sponsor = Transaction::new("", ctx.clone());
        no_sponsor.add_operation(payment_op()).unwrap();
        assert!(matches!(
            no_sponsor.generate_blob().await.unwrap_err(),
            SdkError::EmptySponsor
        ));

        let mut no_ops = Transaction::new("mer1sponsor", ctx);
        assert!(matches!(
            no_ops.generate_blob().await.unwrap_err(),
            SdkError::EmptyOperations
        ));
    }

    #[tokio::test]
    async fn blob_fixes_deadline_and_registers_watchdog() {
        let (ctx, _) = test_ctx();
        ctx.node_manager.record_ledger_close(100);
        let mut tx = Transaction::new("mer1sponsor", ctx.clone());
        tx.set_fee_limit(100)
            .unwrap()
            .set_gas_price(1)
            .unwrap()
            .set_final_notify_seq_offset(HIGH_FINAL_NOTIFY_SEQ_OFFSET)
            .unwrap()
            .add_operation(payment_op())
            .unwrap();
        tx.generate_blob().await.unwrap();

        assert_eq!(tx.specified_seq(), Some(130));
        assert_eq!(ctx.fail_manager.pending_count(), 1);
        assert_eq!(tx.nonce(), 1);
    }

    #[tokio::test]
    async fn mutations_after_commit_are_rejected() {
        let (ctx, _) = test_ctx();
        let mut tx = built_tx(ctx).await;
        let (public_key, private_key) = fresh_pair();
        tx.add_signer(&public_key, &private_key).unwrap();
        tx.commit(false).await.unwrap();

        assert!(matches!(
            tx.add_signer("aa", "bb").unwrap_err(),
            SdkError::AlreadyFinalized
        ));
        assert!(matches!(
            tx.set_fee_limit(5).unwrap_err(),
            SdkError::AlreadyFinalized
        ));
        assert!(matches!(
            tx.commit(false).await.unwrap_err(),
            SdkError::AlreadyFinalized
        ));
    }

    #[tokio::test]
    async fn commit_preconditions_abort_before_transport() {
        let (ctx, rpc) = test_ctx();
        let mut no_signers = built_tx(ctx.clone()).await;
        assert!(matches!(
            no_signers.commit(false).await.unwrap_err(),
            SdkError::NoSignatures
        ));

        let mut empty_private = built_tx(ctx.clone()).await;
        empty_private.add_signer("aabb", "").unwrap();
        assert!(matches!(
            empty_private.commit(false).await.unwrap_err(),
            SdkError::EmptyPrivateKey
        ));

        let (public_key, private_key) = fresh_pair();
        let mut zero_fee = Transaction::new("mer1sponsor", ctx.clone());
        zero_fee
            .set_gas_price(1)
            .unwrap()
            .add_operation(payment_op())
            .unwrap()
            .add_signer(&public_key, &private_key)
            .unwrap();
        assert!(matches!(
            zero_fee.commit(false).await.unwrap_err(),
            SdkError::IllegalFeeLimit { got: 0 }
        ));

        assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
        // Failed commits must not leave registrations behind.
        assert_eq!(ctx.sync_manager.pending_count(), 0);
    }

    #[tokio::test]
    async fn async_commit_returns_hash_without_confirmation() {
        let (ctx, rpc) = test_ctx();
        let mut tx = built_tx(ctx.clone()).await;
        let expected_hash = tx.blob().unwrap().hash().to_string();
        let (public_key, private_key) = fresh_pair();
        tx.add_signer(&public_key, &private_key).unwrap();

        let result = tx.commit(false).await.unwrap();
        assert_eq!(result.tx_hash, expected_hash);
        assert!(!result.confirmed);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.sync_manager.pending_count(), 0);
    }

    #[tokio::test]
    async fn resumed_transaction_submits_the_original_blob() {
        let (ctx, _) = test_ctx();
        let tx = built_tx(ctx.clone()).await;
        let detached = tx.for_serializable().unwrap();
        let original_hash = tx.blob().unwrap().hash().to_string();

        let (ctx2, rpc2) = test_ctx();
        let mut resumed = Transaction::from_serializable(detached, ctx2);
        let (public_key, private_key) = fresh_pair();
        resumed.add_signer(&public_key, &private_key).unwrap();
        let result = resumed.commit(false).await.unwrap();
        assert_eq!(result.tx_hash, original_hash);
        assert_eq!(rpc2.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn for_serializable_requires_a_blob() {
        let (ctx, _) = test_ctx();
        let tx = Transaction::new("mer1sponsor", ctx);
        assert!(matches!(
            tx.for_serializable().unwrap_err(),
            SdkError::MissingBlob
        ));
    }
}
