//! Error types for the protocol layer.
//!
//! Each crate in Turnwise defines its own error enum, so a
//! `ProtocolError` always means a wire-format problem, never a game or
//! registry one.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a value into frame bytes).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown request tag,
    /// missing fields, or wrong field types.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
