//! # Canonical Envelope Encoding
//!
//! The deterministic byte format a transaction serializes into before
//! hashing and signing. The format is a concatenation of fields with
//! null-byte separators for strings and fixed-width little-endian integers.
//! JSON/serde is intentionally avoided here because field ordering is not
//! guaranteed across serialization formats, and two encoders disagreeing by
//! one byte means two different transaction hashes.
//!
//! Field order is fixed by [`Transaction::generate_blob`]
//! (super::Transaction::generate_blob): version, source address, nonce, fee
//! limit, gas price, optional metadata, optional ceiling sequence, then each
//! operation's contribution in list order. Operations receive the specified
//! (deadline) sequence so they can embed their own sub-deadline if their
//! encoding calls for one.

use crate::error::SdkError;

/// Envelope format version. Bump on any change to the canonical layout —
/// old and new encoders must never produce colliding bytes.
pub const ENVELOPE_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// EnvelopeBuilder
// ---------------------------------------------------------------------------

/// Accumulates the canonical byte encoding of one transaction.
///
/// Write methods append in call order; there is no reordering, padding, or
/// deduplication. The builder is deliberately dumb — determinism lives in
/// the fixed call sequence of the transaction core, not in cleverness here.
#[derive(Debug)]
pub struct EnvelopeBuilder {
    buf: Vec<u8>,
}

impl EnvelopeBuilder {
    /// Starts an envelope with the version preamble.
    pub fn new() -> Self {
        let mut builder = Self {
            buf: Vec::with_capacity(256),
        };
        builder.write_u16(ENVELOPE_VERSION);
        builder
    }

    /// Appends a UTF-8 string terminated by a null separator.
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0x00);
        self
    }

    /// Appends a fixed-width little-endian u16.
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends a fixed-width little-endian u64.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Appends length-prefixed raw bytes (u32 little-endian length).
    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf
            .extend_from_slice(&(value.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    /// Appends an optional string: presence flag, then the string if set.
    pub fn write_opt_str(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(s) => {
                self.buf.push(0x01);
                self.write_str(s);
            }
            None => {
                self.buf.push(0x00);
            }
        }
        self
    }

    /// Appends an optional u64: presence flag, then the value if set.
    pub fn write_opt_u64(&mut self, value: Option<u64>) -> &mut Self {
        match value {
            Some(v) => {
                self.buf.push(0x01);
                self.write_u64(v);
            }
            None => {
                self.buf.push(0x00);
            }
        }
        self
    }

    /// Consumes the builder and returns the canonical bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written (never true after `new`, which
    /// writes the version preamble).
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Operation contract
// ---------------------------------------------------------------------------

/// One operation's contribution to the transaction envelope.
///
/// The core treats operations as opaque: it calls each one in list order
/// with the shared builder and the specified (deadline) ledger sequence.
/// The catalog of concrete operation types lives outside this crate;
/// [`OpaqueOperation`] covers callers who encode their own.
pub trait Operation: Send + Sync {
    /// Appends this operation's canonical encoding to the envelope.
    fn build_transaction(
        &self,
        envelope: &mut EnvelopeBuilder,
        specified_seq: u64,
    ) -> Result<(), SdkError>;
}

/// An operation whose body the caller has already encoded.
///
/// Writes a type tag, the payload (length-prefixed), and — when
/// [`with_expiry`](Self::with_expiry) is set — the specified sequence as the
/// operation's own sub-deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueOperation {
    op_type: u16,
    payload: Vec<u8>,
    embed_expiry: bool,
}

impl OpaqueOperation {
    /// Creates an opaque operation with a type tag and encoded payload.
    pub fn new(op_type: u16, payload: Vec<u8>) -> Self {
        Self {
            op_type,
            payload,
            embed_expiry: false,
        }
    }

    /// Also embed the transaction's specified sequence as this operation's
    /// sub-deadline.
    pub fn with_expiry(mut self) -> Self {
        self.embed_expiry = true;
        self
    }
}

impl Operation for OpaqueOperation {
    fn build_transaction(
        &self,
        envelope: &mut EnvelopeBuilder,
        specified_seq: u64,
    ) -> Result<(), SdkError> {
        envelope.write_u16(self.op_type);
        envelope.write_bytes(&self.payload);
        envelope.write_opt_u64(self.embed_expiry.then_some(specified_seq));
        Ok(())
    }
}
