//! # Key Operations
//!
//! Ed25519 signing and verification over raw blob bytes, keyed by
//! hex-encoded key material.
//!
//! The SDK never generates or stores keys — callers hand in hex strings
//! (possibly sourced from a vault, an HSM, or a front-end) and get back raw
//! signature bytes. Key bytes are never logged. If you add logging to this
//! module, you will be asked to leave.
//!
//! Errors are intentionally vague about *why* key material was rejected;
//! see [`KeyError`].

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

/// Errors from key material handling.
///
/// Deliberately coarse — distinguishing "wrong length" from "not a valid
/// scalar" in messages leaks structure about secrets for zero caller benefit.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: not 32 bytes of valid hex")]
    InvalidSecretKey,

    #[error("invalid public key: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("public key does not match the supplied secret key")]
    KeypairMismatch,
}

fn decode_signing_key(private_key_hex: &str) -> Result<SigningKey, KeyError> {
    let bytes = hex::decode(private_key_hex).map_err(|_| KeyError::InvalidSecretKey)?;
    let seed: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
    Ok(SigningKey::from_bytes(&seed))
}

fn decode_verifying_key(public_key_hex: &str) -> Result<VerifyingKey, KeyError> {
    let bytes = hex::decode(public_key_hex).map_err(|_| KeyError::InvalidPublicKey)?;
    let point: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
    VerifyingKey::from_bytes(&point).map_err(|_| KeyError::InvalidPublicKey)
}

/// Signs `message` with the hex-encoded secret key, checking first that the
/// supplied public key is actually the public half of that secret key.
///
/// The pairing check exists because the public key travels with the
/// signature in the submission payload — signing with a mismatched pair
/// would produce a payload the chain is guaranteed to reject, so we catch
/// it here instead of paying a network round trip.
///
/// Returns the raw 64-byte Ed25519 signature.
pub fn sign_raw(
    message: &[u8],
    private_key_hex: &str,
    public_key_hex: &str,
) -> Result<Vec<u8>, KeyError> {
    let signing_key = decode_signing_key(private_key_hex)?;
    let claimed = decode_verifying_key(public_key_hex)?;
    if signing_key.verifying_key() != claimed {
        return Err(KeyError::KeypairMismatch);
    }
    let signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

/// Verifies `signature` over `message` against a hex-encoded public key.
///
/// Any malformation — bad hex, wrong lengths, invalid point — verifies as
/// `false`. No panics, no partial states, just a boolean.
pub fn verify_raw(message: &[u8], signature: &[u8], public_key_hex: &str) -> bool {
    let Ok(verifying_key) = decode_verifying_key(public_key_hex) else {
        return false;
    };
    let Ok(sig) = DalekSignature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &sig).is_ok()
}
