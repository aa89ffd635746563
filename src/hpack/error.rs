//! HPACK errors.

use thiserror::Error;

use super::huffman::HuffmanError;
use crate::frame::ErrorCode;

/// HPACK encoding or decoding error.
///
/// Any decoding error leaves the dynamic table out of step with the peer's
/// encoder, so the connection layer treats it as a connection error of type
/// [`ErrorCode::CompressionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HpackError {
    /// Not enough data to decode.
    #[error("incomplete HPACK data")]
    Incomplete,

    /// Invalid integer encoding.
    #[error("invalid HPACK integer encoding")]
    InvalidInteger,

    /// Invalid string encoding.
    #[error("invalid HPACK string encoding")]
    InvalidString,

    /// Invalid Huffman encoding.
    #[error("invalid Huffman encoding: {0}")]
    InvalidHuffman(#[from] HuffmanError),

    /// Invalid table index.
    #[error("invalid table index: {0}")]
    InvalidIndex(usize),

    /// Table size update above the negotiated limit.
    #[error("invalid table size update: {size} exceeds {max}")]
    InvalidTableSize { size: usize, max: usize },

    /// Table size update after the first header field of a block.
    #[error("table size update after a header field")]
    SizeUpdateNotAtStart,

    /// Decoded header list exceeds SETTINGS_MAX_HEADER_LIST_SIZE.
    #[error("header list size {size} exceeds limit {max}")]
    HeaderListTooLarge { size: usize, max: usize },

    /// Header name is not a valid token.
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),
}

impl HpackError {
    /// HTTP/2 error code a connection should report for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            // Only the offending stream is refused; the table stays in sync.
            HpackError::HeaderListTooLarge { .. } => ErrorCode::RefusedStream,
            HpackError::InvalidHeaderName(_) => ErrorCode::ProtocolError,
            _ => ErrorCode::CompressionError,
        }
    }
}
