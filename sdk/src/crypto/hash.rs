//! # Hashing
//!
//! Content hashing for transaction blobs. The node advertises which
//! algorithm the chain currently accepts (see
//! [`NodeManager::supported_hash`](crate::node::NodeManager::supported_hash));
//! the SDK hashes whatever the node asks for and refuses to support a third
//! option without a very good reason:
//!
//! - **SHA-256** — the chain's launch algorithm and the default.
//! - **BLAKE3** — faster on every platform; enabled chain-side by governance
//!   when the validator set upgrades.
//!
//! Both produce 32 bytes, so a blob hash is always 64 hex characters
//! regardless of which algorithm stamped it.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hash algorithm identifier advertised by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HashAlgorithm {
    /// SHA-256. The default until the chain says otherwise.
    #[default]
    Sha256,
    /// BLAKE3. 256-bit output, keyed off the same 32-byte digest size.
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

impl HashAlgorithm {
    /// Hashes `data` with this algorithm. Always 32 bytes out.
    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(data);
                let result = hasher.finalize();
                let mut output = [0u8; 32];
                output.copy_from_slice(&result);
                output
            }
            Self::Blake3 => *blake3::hash(data).as_bytes(),
        }
    }

    /// Hashes `data` and returns the digest hex-encoded (64 characters).
    pub fn digest_hex(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}
