//! Serialized record flowing from the emitter to the sinks.

use bytes::Bytes;

/// One serialized record (JSON, no trailing newline).
///
/// Cloning is cheap: the payload is reference counted and shared by every sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Zero-based emission index
    pub seq: u64,
    /// JSON bytes
    pub payload: Bytes,
}

impl EncodedRecord {
    pub fn new(seq: u64, payload: impl Into<Bytes>) -> Self {
        Self {
            seq,
            payload: payload.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }
}
