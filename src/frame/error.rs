//! HTTP/2 frame errors.

use std::fmt;

use super::types::{FrameType, Parity, SettingId};

macro_rules! error_codes {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// HTTP/2 error codes (RFC 7540 Section 7).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum ErrorCode {
            $($(#[$doc])* $variant = $code,)+
        }

        impl ErrorCode {
            /// Map a wire code to a known error code, if any.
            pub fn try_from_u32(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(ErrorCode::$variant),)+
                    _ => None,
                }
            }

            /// Registered name, as written in the RFC.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => $name,)+
                }
            }
        }
    };
}

error_codes! {
    /// Graceful shutdown.
    NoError = 0x0 => "NO_ERROR",
    /// Generic protocol violation.
    ProtocolError = 0x1 => "PROTOCOL_ERROR",
    /// Unexpected failure inside the peer.
    InternalError = 0x2 => "INTERNAL_ERROR",
    /// Peer broke flow control.
    FlowControlError = 0x3 => "FLOW_CONTROL_ERROR",
    /// SETTINGS went unacknowledged.
    SettingsTimeout = 0x4 => "SETTINGS_TIMEOUT",
    /// Frame arrived on a half-closed stream.
    StreamClosed = 0x5 => "STREAM_CLOSED",
    /// Frame length is wrong for its type.
    FrameSizeError = 0x6 => "FRAME_SIZE_ERROR",
    /// Stream refused before any processing.
    RefusedStream = 0x7 => "REFUSED_STREAM",
    /// Stream no longer needed.
    Cancel = 0x8 => "CANCEL",
    /// HPACK context can no longer be maintained.
    CompressionError = 0x9 => "COMPRESSION_ERROR",
    /// CONNECT tunnel was reset or closed abnormally.
    ConnectError = 0xa => "CONNECT_ERROR",
    /// Peer is generating excessive load.
    EnhanceYourCalm = 0xb => "ENHANCE_YOUR_CALM",
    /// Transport security is too weak.
    InadequateSecurity = 0xc => "INADEQUATE_SECURITY",
    /// Retry the request over HTTP/1.1.
    Http11Required = 0xd => "HTTP_1_1_REQUIRED",
}

impl ErrorCode {
    /// Map a wire code to an error code. Unknown codes are treated as
    /// INTERNAL_ERROR.
    pub fn from_u32(code: u32) -> Self {
        Self::try_from_u32(code).unwrap_or(ErrorCode::InternalError)
    }

    pub fn to_u32(self) -> u32 {
        self as u32
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> u32 {
        code.to_u32()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad classification of a [`FrameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single value is out of range or violates a protocol rule.
    MalformedArgument,
    /// The combination of fields is inconsistent, or a required field is
    /// missing.
    InvalidState,
    /// More input is needed before a frame can be read.
    Incomplete,
}

/// Frame building, parsing and encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Not enough data to parse frame (need more bytes).
    #[error("incomplete frame data: need {needed} bytes, have {available}")]
    Incomplete { needed: usize, available: usize },

    /// Frame exceeds maximum allowed size.
    #[error("frame size {size} exceeds maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },

    /// A value does not fit its wire field.
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldTooWide {
        field: &'static str,
        value: u64,
        bits: u8,
    },

    /// Flags outside those defined for the frame type.
    #[error("flags 0x{flags:02x} not allowed on {frame_type} frame")]
    IllegalFlags { frame_type: FrameType, flags: u8 },

    /// Frame type must be sent on the connection (stream 0).
    #[error("{frame_type} frame must be sent on stream 0")]
    StreamIdMustBeZero { frame_type: FrameType },

    /// Frame requires non-zero stream ID.
    #[error("{frame_type} frame requires non-zero stream ID")]
    StreamIdRequired { frame_type: FrameType },

    /// A stream identifier with the wrong initiator parity.
    #[error("{field} {id} must be {expected}")]
    StreamParity {
        field: &'static str,
        id: u32,
        expected: Parity,
    },

    /// Payload length not legal for a fixed-size frame type.
    #[error("{frame_type} frame expected {expected} bytes, got {actual}")]
    InvalidPayloadLength {
        frame_type: FrameType,
        expected: usize,
        actual: usize,
    },

    /// Payload shorter than the fixed part of the frame.
    #[error("{frame_type} frame needs at least {minimum} bytes, got {actual}")]
    PayloadTooShort {
        frame_type: FrameType,
        minimum: usize,
        actual: usize,
    },

    /// SETTINGS payload is not a whole number of parameters.
    #[error("SETTINGS payload length {actual} is not a multiple of 6")]
    InvalidSettingsLength { actual: usize },

    /// Pad length outside the supported range.
    #[error("padding length {pad_length} exceeds 254")]
    PadTooLong { pad_length: u8 },

    /// Invalid padding length.
    #[error("padding length {pad_length} exceeds payload length {payload_length}")]
    InvalidPadding {
        pad_length: u8,
        payload_length: usize,
    },

    /// Invalid setting value.
    #[error("invalid value {value} for setting {id}")]
    InvalidSettingValue { id: SettingId, value: u32 },

    /// Invalid window update increment.
    #[error("invalid window increment {increment}")]
    InvalidWindowIncrement { increment: u32 },

    /// A field required to build the frame was never set.
    #[error("{frame_type} frame is missing {field}")]
    MissingField {
        frame_type: FrameType,
        field: &'static str,
    },

    /// Declared payload size disagrees with the frame contents.
    #[error("{frame_type} frame declares {declared} payload bytes, contents need {computed}")]
    PayloadSizeMismatch {
        frame_type: FrameType,
        declared: u32,
        computed: u64,
    },

    /// A field was set without the flag that puts it on the wire.
    #[error("{field} set on {frame_type} frame without the {flag} flag")]
    FlagRequired {
        frame_type: FrameType,
        field: &'static str,
        flag: &'static str,
    },

    /// SETTINGS acknowledgment carrying parameters.
    #[error("SETTINGS acknowledgment must not carry parameters")]
    AckWithSettings,

    /// A stream declared as depending on itself.
    #[error("stream {stream_id} cannot depend on itself")]
    SelfDependency { stream_id: u32 },

    /// Only servers may send PUSH_PROMISE.
    #[error("PUSH_PROMISE can only be sent by a server")]
    PushFromClient,
}

impl FrameError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::Incomplete { .. } => ErrorKind::Incomplete,
            FrameError::MissingField { .. }
            | FrameError::PayloadSizeMismatch { .. }
            | FrameError::FlagRequired { .. }
            | FrameError::AckWithSettings
            | FrameError::SelfDependency { .. }
            | FrameError::PushFromClient => ErrorKind::InvalidState,
            _ => ErrorKind::MalformedArgument,
        }
    }

    /// The error code a connection should report to its peer when a
    /// received frame fails with this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            FrameError::FrameTooLarge { .. }
            | FrameError::InvalidPayloadLength { .. }
            | FrameError::PayloadTooShort { .. }
            | FrameError::InvalidSettingsLength { .. }
            | FrameError::PayloadSizeMismatch { .. }
            | FrameError::AckWithSettings => ErrorCode::FrameSizeError,
            FrameError::InvalidSettingValue {
                id: SettingId::InitialWindowSize,
                ..
            } => ErrorCode::FlowControlError,
            FrameError::Incomplete { .. } => ErrorCode::InternalError,
            _ => ErrorCode::ProtocolError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_wire_mapping() {
        let known = [
            (0x1, ErrorCode::ProtocolError, "PROTOCOL_ERROR"),
            (0x7, ErrorCode::RefusedStream, "REFUSED_STREAM"),
            (0x9, ErrorCode::CompressionError, "COMPRESSION_ERROR"),
            (0xd, ErrorCode::Http11Required, "HTTP_1_1_REQUIRED"),
        ];
        for (raw, code, name) in known {
            assert_eq!(ErrorCode::from_u32(raw), code);
            assert_eq!(code.to_string(), name);
        }
        for raw in 0x0..=0xd {
            let code = ErrorCode::try_from_u32(raw).unwrap();
            assert_eq!(u32::from(code), raw);
        }
    }

    #[test]
    fn test_unregistered_error_code_is_internal() {
        assert_eq!(ErrorCode::try_from_u32(0xe), None);
        assert_eq!(ErrorCode::from_u32(0xe), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_u32(u32::MAX), ErrorCode::InternalError);
    }

    #[test]
    fn test_frame_too_large_message() {
        let err = FrameError::FrameTooLarge {
            size: 16_385,
            max: 16_384,
        };
        assert_eq!(err.to_string(), "frame size 16385 exceeds maximum 16384");
        assert_eq!(err.error_code(), ErrorCode::FrameSizeError);
    }

    #[test]
    fn test_frame_error_stream_display() {
        let err = FrameError::StreamIdMustBeZero {
            frame_type: FrameType::Settings,
        };
        assert_eq!(format!("{}", err), "SETTINGS frame must be sent on stream 0");

        let err = FrameError::StreamIdRequired {
            frame_type: FrameType::Data,
        };
        assert_eq!(format!("{}", err), "DATA frame requires non-zero stream ID");

        let err = FrameError::StreamParity {
            field: "promised stream ID",
            id: 3,
            expected: Parity::Even,
        };
        assert_eq!(format!("{}", err), "promised stream ID 3 must be even");
    }

    #[test]
    fn test_frame_error_messages() {
        let cases = [
            (
                FrameError::InvalidPayloadLength {
                    frame_type: FrameType::Ping,
                    expected: 8,
                    actual: 10,
                },
                "PING frame expected 8 bytes, got 10",
            ),
            (
                FrameError::InvalidPadding {
                    pad_length: 100,
                    payload_length: 50,
                },
                "padding length 100 exceeds payload length 50",
            ),
            (
                FrameError::InvalidSettingValue {
                    id: SettingId::MaxFrameSize,
                    value: 0,
                },
                "invalid value 0 for setting SETTINGS_MAX_FRAME_SIZE",
            ),
        ];
        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_frame_error_kind() {
        assert_eq!(
            FrameError::Incomplete {
                needed: 9,
                available: 3
            }
            .kind(),
            ErrorKind::Incomplete
        );
        assert_eq!(
            FrameError::InvalidWindowIncrement { increment: 0 }.kind(),
            ErrorKind::MalformedArgument
        );
        assert_eq!(FrameError::AckWithSettings.kind(), ErrorKind::InvalidState);
        assert_eq!(FrameError::PushFromClient.kind(), ErrorKind::InvalidState);
        assert_eq!(
            FrameError::PayloadSizeMismatch {
                frame_type: FrameType::Headers,
                declared: 15,
                computed: 21,
            }
            .kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn test_frame_error_code() {
        let err = FrameError::InvalidPayloadLength {
            frame_type: FrameType::Ping,
            expected: 8,
            actual: 4,
        };
        assert_eq!(err.error_code(), ErrorCode::FrameSizeError);

        let err = FrameError::InvalidSettingValue {
            id: SettingId::InitialWindowSize,
            value: 0x8000_0000,
        };
        assert_eq!(err.error_code(), ErrorCode::FlowControlError);

        let err = FrameError::InvalidWindowIncrement { increment: 0 };
        assert_eq!(err.error_code(), ErrorCode::ProtocolError);
    }
}
