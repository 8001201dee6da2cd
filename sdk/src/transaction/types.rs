//! Value types carried by a transaction: signer credentials, precomputed
//! digests, the detachable serialized form, and the commit result.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::blob::TransactionBlob;

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// A signing credential: hex-encoded Ed25519 public and private key.
///
/// The private key is used exactly once, at submission time, to sign the
/// blob's canonical bytes. It is never persisted unsigned and never logged —
/// `Debug` redacts it.
///
/// `Serialize` exists only for the detach/resume path
/// ([`TransactionSerializable`]); serializing signers is a deliberate act,
/// and where the serialized form ends up is the caller's responsibility.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    /// Hex-encoded public key.
    pub public_key: String,
    /// Hex-encoded private key.
    pub private_key: String,
}

impl Signer {
    /// Creates a signer from hex-encoded key halves.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// A signature produced outside this process (hardware signer, front-end,
/// air-gapped machine), carried verbatim into the submission payload.
///
/// The SDK never recomputes a digest — it hex-encodes the raw bytes as-is.
/// It does, however, self-verify them against the blob before submission
/// like any other signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// Hex-encoded public key the signature claims to belong to.
    pub public_key: String,
    /// Raw signature bytes, exactly as the external signer produced them.
    pub origin_digest: Vec<u8>,
}

impl Digest {
    /// Creates a digest from a public key and raw signature bytes.
    pub fn new(public_key: impl Into<String>, origin_digest: Vec<u8>) -> Self {
        Self {
            public_key: public_key.into(),
            origin_digest,
        }
    }
}

// ---------------------------------------------------------------------------
// Detachable form
// ---------------------------------------------------------------------------

/// The detachable state of a built transaction: enough to hand to another
/// process (or an offline signer) and later resume into a fresh
/// [`Transaction`](super::Transaction) for signing and submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSerializable {
    /// The generated blob.
    pub blob: TransactionBlob,
    /// Signers attached so far.
    pub signers: Vec<Signer>,
    /// Fee limit in the smallest fee unit.
    pub fee_limit: u64,
    /// Gas price in the smallest fee unit.
    pub gas_price: u64,
}

// ---------------------------------------------------------------------------
// Commit result
// ---------------------------------------------------------------------------

/// What a successful `commit` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCommittedResult {
    /// Hash of the submitted transaction, hex-encoded.
    pub tx_hash: String,
    /// `true` when a synchronous commit observed a success notification;
    /// `false` for asynchronous commits, where the outcome is still in
    /// flight and arrives through the notification stream.
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signer_debug_redacts_private_key() {
        let signer = Signer::new("aabbcc", "super-secret-key");
        let rendered = format!("{signer:?}");
        assert!(rendered.contains("aabbcc"));
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn digest_carries_raw_bytes_verbatim() {
        let digest = Digest::new("aabb", vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(digest.origin_digest, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
