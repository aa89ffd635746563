//! h2codec - HTTP/2 frame codec and HPACK header compression.
//!
//! This crate covers the wire level of HTTP/2 and nothing above it: it
//! turns frames into bytes and bytes into frames, and compresses header
//! lists. Connection state, flow control and stream multiplexing belong to
//! the layer built on top of it.
//!
//! # Features
//!
//! - Validating builders for all ten HTTP/2 frame types
//! - Frame encoding and decoding, with decoded fields re-validated by the
//!   same builders
//! - HPACK static and dynamic tables, Huffman coding, and a lazy decoder
//! - TOML configuration of the codecs for one endpoint
//!
//! # Architecture
//!
//! - `frame`: HTTP/2 frame types, builders, encoding, and decoding
//! - `hpack`: HPACK header compression
//! - `config`: codec configuration
//!
//! ```
//! use bytes::BytesMut;
//! use h2codec::frame::builder::PingBuilder;
//! use h2codec::{BuildContext, Frame, FrameBuilder, FrameDecoder, FrameEncoder, Role};
//!
//! let mut builder = PingBuilder::new(BuildContext::new(Role::Client, false));
//! builder.set_opaque_data(0xFEDC_BA98_7654_3210)?;
//! let ping = Frame::from(builder.build()?);
//!
//! let mut buf = BytesMut::new();
//! FrameEncoder::new().encode(&ping, &mut buf);
//!
//! let decoded = FrameDecoder::for_role(Role::Server, true).decode(&mut buf)?;
//! assert_eq!(decoded, Some(ping));
//! # Ok::<(), h2codec::FrameError>(())
//! ```

pub mod config;
pub mod frame;
pub mod hpack;

// Re-export commonly used types
pub use config::{CodecConfig, ConfigError};

pub use frame::{
    BuildContext, CONNECTION_PREFACE, ContinuationFrame, DEFAULT_HEADER_TABLE_SIZE,
    DEFAULT_INITIAL_WINDOW_SIZE, DEFAULT_MAX_CONCURRENT_STREAMS, DEFAULT_MAX_FRAME_SIZE,
    DataFrame, ErrorCode, ErrorKind, FRAME_HEADER_SIZE, Frame, FrameBuilder, FrameDecoder,
    FrameEncoder, FrameError, FrameHeader, FrameType, GoAwayFrame, HeadersFrame, PingFrame,
    Priority, PriorityFrame, PushPromiseFrame, Role, RstStreamFrame, Setting, SettingId,
    Settings, SettingsFrame, StreamId, WindowUpdateFrame,
};

pub use hpack::{HeaderField, HeaderName, HpackDecoder, HpackEncoder, HpackError};
