//! Cryptographic primitives consumed by the transaction core: blob hashing
//! and hex-keyed Ed25519 signing/verification. Don't roll your own.

pub mod hash;
pub mod keys;

pub use hash::HashAlgorithm;
pub use keys::{sign_raw, verify_raw, KeyError};
