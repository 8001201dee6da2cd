//! Error types for the Meridian SDK transaction core.
//!
//! Every failure that can escape a public API is an [`SdkError`]. Each
//! variant carries a stable numeric code (see [`SdkError::code`]) so callers
//! integrating against the SDK can branch on codes without string-matching
//! messages. Raw transport or cryptographic faults never cross this boundary
//! unwrapped.

use thiserror::Error;

use crate::rpc::TransportError;

/// Coarse classification of an [`SdkError`].
///
/// Codes identify one failure; kinds identify a family of failures that
/// callers typically handle the same way (retry, re-read chain state, fix
/// inputs, give up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A mutation or commit was attempted after the transaction was frozen.
    FinalizedStateViolation,
    /// A local validation failed before any network interaction.
    PreconditionViolation,
    /// Key material could not produce a signature.
    SignatureMaterialError,
    /// The local pre-submission signature self-check failed.
    SignatureVerificationError,
    /// The RPC layer failed to deliver the submission.
    TransportError,
    /// The chain itself rejected the transaction.
    ChainRejectionError,
    /// The wall-clock wait ceiling elapsed before an outcome arrived.
    RemoteTimeoutError,
    /// The ledger advanced past the registered deadline without an outcome.
    LedgerDeadlineTimeoutError,
    /// The notification channel was torn down mid-wait.
    WaitInterrupted,
    /// A correlation future was already registered for this hash.
    DuplicateRegistration,
}

/// Errors surfaced by the transaction construction and submission core.
///
/// Precondition and state violations are raised synchronously, before any
/// network call. Signature errors are intentionally vague about *why* the
/// key material failed — leaking details about keys through error messages
/// is a classic footgun.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Mutation or commit attempted after `commit()` froze the transaction.
    #[error("transaction already finalized")]
    AlreadyFinalized,

    /// Blob generation requires a sponsor address.
    #[error("sponsor address must not be empty")]
    EmptySponsor,

    /// `generate_blob` was called a second time on the same transaction.
    #[error("transaction blob already generated")]
    BlobAlreadyGenerated,

    /// Blob generation requires at least one operation.
    #[error("operation list must not be empty")]
    EmptyOperations,

    /// Commit (or blob access) requires a generated blob.
    #[error("transaction blob has not been generated")]
    MissingBlob,

    /// Commit requires at least one signer or precomputed digest.
    #[error("at least one signer or digest is required")]
    NoSignatures,

    /// A signer was supplied with an empty public key.
    #[error("signer public key must not be empty")]
    EmptyPublicKey,

    /// A signer was supplied with an empty private key.
    #[error("signer private key must not be empty")]
    EmptyPrivateKey,

    /// Fee limit must be strictly positive at commit time.
    #[error("fee limit must be positive, got {got}")]
    IllegalFeeLimit {
        /// The offending fee limit.
        got: u64,
    },

    /// Gas price must be strictly positive at commit time.
    #[error("gas price must be positive, got {got}")]
    IllegalGasPrice {
        /// The offending gas price.
        got: u64,
    },

    /// Signing failed. Deliberately vague about the key material.
    #[error("public/private key mismatch or invalid key material")]
    SignatureMaterial,

    /// The local self-check of a signature against the blob bytes failed.
    #[error("signature verification failed for public key {public_key}")]
    SignatureVerifyFailed {
        /// Hex-encoded public key whose entry failed verification.
        public_key: String,
    },

    /// The RPC layer failed without a chain-level verdict.
    #[error("transport failure during submission: {message}")]
    Transport {
        /// Description from the transport layer.
        message: String,
    },

    /// The chain rejected the transaction during submission.
    #[error("chain rejected transaction (code {code}): {message}")]
    ChainRejection {
        /// Chain-assigned rejection code.
        code: i32,
        /// Chain-assigned rejection message.
        message: String,
    },

    /// The out-of-band outcome notification carried a failure code.
    #[error("transaction failed with code {code}: {message}")]
    Rejected {
        /// Failure code delivered by the notification stream.
        code: String,
        /// Failure message delivered by the notification stream.
        message: String,
    },

    /// The synchronous wait exceeded the wall-clock ceiling.
    #[error("no outcome within {waited_secs}s wall-clock ceiling")]
    RemoteTimeout {
        /// Seconds waited before giving up.
        waited_secs: u64,
    },

    /// The ledger reached the registered deadline sequence first.
    #[error("ledger passed sequence {target_seq} before the transaction settled")]
    LedgerDeadlineTimeout {
        /// Ledger sequence registered as the deadline at blob time.
        target_seq: u64,
    },

    /// The notification channel closed before delivering an outcome.
    #[error("outcome wait interrupted: notification channel closed")]
    WaitInterrupted,

    /// A correlation future for this hash is already outstanding.
    #[error("correlation future already registered for hash {tx_hash}")]
    DuplicateRegistration {
        /// The transaction hash with an outstanding registration.
        tx_hash: String,
    },
}

impl SdkError {
    /// Stable numeric code for this error. Part of the public contract:
    /// codes never change meaning across releases.
    pub fn code(&self) -> u32 {
        match self {
            Self::AlreadyFinalized => 11001,
            Self::EmptySponsor => 11002,
            Self::BlobAlreadyGenerated => 11003,
            Self::EmptyOperations => 11004,
            Self::MissingBlob => 11005,
            Self::NoSignatures => 11006,
            Self::EmptyPublicKey => 11007,
            Self::EmptyPrivateKey => 11008,
            Self::IllegalFeeLimit { .. } => 11009,
            Self::IllegalGasPrice { .. } => 11010,
            Self::SignatureMaterial => 11011,
            Self::SignatureVerifyFailed { .. } => 11012,
            Self::Transport { .. } => 11013,
            Self::ChainRejection { .. } => 11014,
            Self::Rejected { .. } => 11015,
            Self::RemoteTimeout { .. } => 11016,
            Self::LedgerDeadlineTimeout { .. } => 11017,
            Self::WaitInterrupted => 11018,
            Self::DuplicateRegistration { .. } => 11019,
        }
    }

    /// The family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyFinalized => ErrorKind::FinalizedStateViolation,
            Self::EmptySponsor
            | Self::BlobAlreadyGenerated
            | Self::EmptyOperations
            | Self::MissingBlob
            | Self::NoSignatures
            | Self::EmptyPublicKey
            | Self::EmptyPrivateKey
            | Self::IllegalFeeLimit { .. }
            | Self::IllegalGasPrice { .. } => ErrorKind::PreconditionViolation,
            Self::SignatureMaterial => ErrorKind::SignatureMaterialError,
            Self::SignatureVerifyFailed { .. } => ErrorKind::SignatureVerificationError,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::ChainRejection { .. } | Self::Rejected { .. } => ErrorKind::ChainRejectionError,
            Self::RemoteTimeout { .. } => ErrorKind::RemoteTimeoutError,
            Self::LedgerDeadlineTimeout { .. } => ErrorKind::LedgerDeadlineTimeoutError,
            Self::WaitInterrupted => ErrorKind::WaitInterrupted,
            Self::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
        }
    }
}

impl From<TransportError> for SdkError {
    /// A transport failure that wraps a chain-level verdict is surfaced as
    /// [`SdkError::ChainRejection`]; a bare transport failure stays a
    /// [`SdkError::Transport`].
    fn from(err: TransportError) -> Self {
        match err.chain_rejection() {
            Some(rejection) => SdkError::ChainRejection {
                code: rejection.code,
                message: rejection.message.clone(),
            },
            None => SdkError::Transport {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{ChainRejection, TransportError};

    #[test]
    fn codes_are_distinct() {
        let errors = vec![
            SdkError::AlreadyFinalized,
            SdkError::EmptySponsor,
            SdkError::BlobAlreadyGenerated,
            SdkError::EmptyOperations,
            SdkError::MissingBlob,
            SdkError::NoSignatures,
            SdkError::EmptyPublicKey,
            SdkError::EmptyPrivateKey,
            SdkError::IllegalFeeLimit { got: 0 },
            SdkError::IllegalGasPrice { got: 0 },
            SdkError::SignatureMaterial,
            SdkError::SignatureVerifyFailed {
                public_key: "ab".into(),
            },
            SdkError::Transport {
                message: "down".into(),
            },
            SdkError::ChainRejection {
                code: 4,
                message: "bad nonce".into(),
            },
            SdkError::Rejected {
                code: "93".into(),
                message: "fee too low".into(),
            },
            SdkError::RemoteTimeout { waited_secs: 500 },
            SdkError::LedgerDeadlineTimeout { target_seq: 42 },
            SdkError::WaitInterrupted,
            SdkError::DuplicateRegistration {
                tx_hash: "ff".into(),
            },
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len(), "every error needs its own code");
    }

    #[test]
    fn precondition_family_groups_builder_checks() {
        assert_eq!(
            SdkError::EmptySponsor.kind(),
            ErrorKind::PreconditionViolation
        );
        assert_eq!(
            SdkError::IllegalFeeLimit { got: 0 }.kind(),
            ErrorKind::PreconditionViolation
        );
        assert_eq!(
            SdkError::AlreadyFinalized.kind(),
            ErrorKind::FinalizedStateViolation
        );
    }

    #[test]
    fn transport_error_with_chain_verdict_becomes_chain_rejection() {
        let err = TransportError::with_rejection(
            "HTTP 400",
            ChainRejection {
                code: 111,
                message: "insufficient balance".into(),
            },
        );
        let sdk: SdkError = err.into();
        match sdk {
            SdkError::ChainRejection { code, ref message } => {
                assert_eq!(code, 111);
                assert_eq!(message, "insufficient balance");
            }
            other => panic!("expected ChainRejection, got {other:?}"),
        }
    }

    #[test]
    fn bare_transport_error_stays_transport() {
        let err = TransportError::new("connection refused");
        let sdk: SdkError = err.into();
        assert_eq!(sdk.kind(), ErrorKind::TransportError);
    }
}
