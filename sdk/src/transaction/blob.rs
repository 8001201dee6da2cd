//! The immutable product of blob generation.

use serde::{Deserialize, Serialize};

use crate::crypto::HashAlgorithm;

/// The canonical binary encoding of a built transaction plus its content
/// hash.
///
/// Produced exactly once per transaction by
/// [`Transaction::generate_blob`](super::Transaction::generate_blob) and
/// never mutated afterward. The hash is computed with whatever algorithm
/// the node advertised at generation time and recorded alongside the bytes
/// so a resumed transaction hashes consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBlob {
    bytes: Vec<u8>,
    hash_algorithm: HashAlgorithm,
    hash_hex: String,
}

impl TransactionBlob {
    /// Wraps canonical bytes, stamping them with `algorithm`.
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithm) -> Self {
        let hash_hex = algorithm.digest_hex(&bytes);
        Self {
            bytes,
            hash_algorithm: algorithm,
            hash_hex,
        }
    }

    /// The raw canonical bytes. This is what gets signed.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes hex-encoded, as the wire payload wants them.
    pub fn hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// The hex-encoded content hash. Doubles as the transaction's
    /// correlation key for the notification stream.
    pub fn hash(&self) -> &str {
        &self.hash_hex
    }

    /// Which algorithm stamped the hash.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }
}
