//! HTTP/2 frame type definitions.
//!
//! Frames are immutable once built. Fields are only reachable through
//! accessors; the only way to produce a frame is through its builder
//! (see [`crate::frame::builder`]) or the frame decoder, both of which
//! validate every field.

use std::fmt;

use bytes::Bytes;

use super::error::ErrorCode;

/// HTTP/2 frame types (RFC 7540 Section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    GoAway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
}

impl FrameType {
    /// Try to convert a byte to a frame type.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x0 => Some(FrameType::Data),
            0x1 => Some(FrameType::Headers),
            0x2 => Some(FrameType::Priority),
            0x3 => Some(FrameType::RstStream),
            0x4 => Some(FrameType::Settings),
            0x5 => Some(FrameType::PushPromise),
            0x6 => Some(FrameType::Ping),
            0x7 => Some(FrameType::GoAway),
            0x8 => Some(FrameType::WindowUpdate),
            0x9 => Some(FrameType::Continuation),
            _ => None,
        }
    }

    /// The wire code for this frame type.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Flags that are defined for this frame type.
    pub fn legal_flags(self) -> u8 {
        match self {
            FrameType::Data => flags::END_STREAM | flags::PADDED,
            FrameType::Headers => {
                flags::END_STREAM | flags::END_HEADERS | flags::PADDED | flags::PRIORITY
            }
            FrameType::Settings | FrameType::Ping => flags::ACK,
            FrameType::PushPromise => flags::END_HEADERS | flags::PADDED,
            FrameType::Continuation => flags::END_HEADERS,
            FrameType::Priority
            | FrameType::RstStream
            | FrameType::GoAway
            | FrameType::WindowUpdate => 0,
        }
    }

    /// Payload size for frame types whose payload has a fixed length.
    pub fn fixed_payload_size(self) -> Option<u32> {
        match self {
            FrameType::Priority => Some(5),
            FrameType::RstStream | FrameType::WindowUpdate => Some(4),
            FrameType::Ping => Some(8),
            _ => None,
        }
    }

    /// Which stream identifiers a frame of this type may be sent on.
    pub fn stream_rule(self) -> StreamRule {
        match self {
            FrameType::Settings | FrameType::Ping | FrameType::GoAway => StreamRule::Zero,
            FrameType::WindowUpdate => StreamRule::Any,
            FrameType::Data
            | FrameType::Headers
            | FrameType::Priority
            | FrameType::RstStream
            | FrameType::PushPromise
            | FrameType::Continuation => StreamRule::NonZero,
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Data => "DATA",
            FrameType::Headers => "HEADERS",
            FrameType::Priority => "PRIORITY",
            FrameType::RstStream => "RST_STREAM",
            FrameType::Settings => "SETTINGS",
            FrameType::PushPromise => "PUSH_PROMISE",
            FrameType::Ping => "PING",
            FrameType::GoAway => "GOAWAY",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
            FrameType::Continuation => "CONTINUATION",
        };
        f.write_str(name)
    }
}

/// Stream identifier constraint for a frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRule {
    /// The frame applies to the connection as a whole (stream 0).
    Zero,
    /// The frame is associated with a stream (stream id > 0).
    NonZero,
    /// Either the connection or a stream.
    Any,
}

/// Frame flags.
pub mod flags {
    /// DATA/HEADERS frame: indicates this is the last frame of the stream.
    pub const END_STREAM: u8 = 0x1;
    /// SETTINGS/PING frame: this is an acknowledgment.
    pub const ACK: u8 = 0x1;
    /// HEADERS/PUSH_PROMISE/CONTINUATION frame: the header block ends here.
    pub const END_HEADERS: u8 = 0x4;
    /// DATA/HEADERS/PUSH_PROMISE frame: padding is present.
    pub const PADDED: u8 = 0x8;
    /// HEADERS frame: priority information is present.
    pub const PRIORITY: u8 = 0x20;
}

/// Expected parity of a stream identifier.
///
/// Client-initiated streams are odd, server-initiated streams are even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    /// Whether `id` has this parity.
    #[inline]
    pub fn matches(self, id: u32) -> bool {
        match self {
            Parity::Odd => id % 2 == 1,
            Parity::Even => id.is_multiple_of(2),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Odd => f.write_str("odd"),
            Parity::Even => f.write_str("even"),
        }
    }
}

/// Stream identifier (31 bits, high bit reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct StreamId(pub u32);

impl StreamId {
    /// Connection-level stream (stream 0).
    pub const CONNECTION: StreamId = StreamId(0);

    /// Largest legal stream identifier.
    pub const MAX: StreamId = StreamId(0x7FFF_FFFF);

    /// Create a new stream ID, masking the reserved bit.
    #[inline]
    pub fn new(id: u32) -> Self {
        StreamId(id & 0x7FFF_FFFF)
    }

    /// Get the raw stream ID value.
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Check if this is the connection-level stream.
    #[inline]
    pub fn is_connection_level(self) -> bool {
        self.0 == 0
    }

    /// Check if this is a client-initiated stream (odd numbers).
    #[inline]
    pub fn is_client_initiated(self) -> bool {
        self.0 % 2 == 1
    }

    /// Check if this is a server-initiated stream (even numbers, non-zero).
    #[inline]
    pub fn is_server_initiated(self) -> bool {
        self.0 != 0 && self.0.is_multiple_of(2)
    }
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        StreamId::new(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common 9-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length (24 bits).
    pub length: u32,
    /// Frame type code.
    pub frame_type: u8,
    /// Frame flags.
    pub flags: u8,
    /// Stream identifier.
    pub stream_id: StreamId,
}

impl FrameHeader {
    /// Create a new frame header.
    pub fn new(frame_type: FrameType, flags: u8, stream_id: StreamId, length: u32) -> Self {
        Self {
            length,
            frame_type: frame_type as u8,
            flags,
            stream_id,
        }
    }

    /// Parse a header from its 9-byte wire form.
    pub fn parse(buf: &[u8; 9]) -> Self {
        // Length is 24 bits (3 bytes), big-endian
        let length = ((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | (buf[2] as u32);

        // Stream ID is 31 bits (4 bytes), big-endian, high bit reserved
        let stream_id = StreamId::new(u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]));

        Self {
            length,
            frame_type: buf[3],
            flags: buf[4],
            stream_id,
        }
    }

    /// Get the frame type as an enum, if known.
    pub fn get_type(&self) -> Option<FrameType> {
        FrameType::from_u8(self.frame_type)
    }

    /// Check if a flag is set.
    #[inline]
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

/// A fully validated HTTP/2 frame.
///
/// Frames of unknown type never appear here: the decoder discards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(DataFrame),
    Headers(HeadersFrame),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    WindowUpdate(WindowUpdateFrame),
    Continuation(ContinuationFrame),
}

impl Frame {
    /// The common header of this frame.
    pub fn header(&self) -> &FrameHeader {
        match self {
            Frame::Data(f) => &f.header,
            Frame::Headers(f) => &f.header,
            Frame::Priority(f) => &f.header,
            Frame::RstStream(f) => &f.header,
            Frame::Settings(f) => &f.header,
            Frame::PushPromise(f) => &f.header,
            Frame::Ping(f) => &f.header,
            Frame::GoAway(f) => &f.header,
            Frame::WindowUpdate(f) => &f.header,
            Frame::Continuation(f) => &f.header,
        }
    }

    /// The kind of this frame.
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Data(_) => FrameType::Data,
            Frame::Headers(_) => FrameType::Headers,
            Frame::Priority(_) => FrameType::Priority,
            Frame::RstStream(_) => FrameType::RstStream,
            Frame::Settings(_) => FrameType::Settings,
            Frame::PushPromise(_) => FrameType::PushPromise,
            Frame::Ping(_) => FrameType::Ping,
            Frame::GoAway(_) => FrameType::GoAway,
            Frame::WindowUpdate(_) => FrameType::WindowUpdate,
            Frame::Continuation(_) => FrameType::Continuation,
        }
    }

    /// Get the stream ID for this frame.
    pub fn stream_id(&self) -> StreamId {
        self.header().stream_id
    }

    /// Get the frame flags.
    pub fn flags(&self) -> u8 {
        self.header().flags
    }

    /// Get the declared payload size.
    pub fn payload_size(&self) -> u32 {
        self.header().length
    }

    /// Total encoded size, header included.
    pub fn encoded_len(&self) -> usize {
        super::FRAME_HEADER_SIZE + self.payload_size() as usize
    }
}

macro_rules! frame_common {
    ($($variant:ident => $frame:ty),* $(,)?) => {
        $(
            impl $frame {
                /// The common frame header.
                #[inline]
                pub fn header(&self) -> &FrameHeader {
                    &self.header
                }

                /// The stream this frame belongs to.
                #[inline]
                pub fn stream_id(&self) -> StreamId {
                    self.header.stream_id
                }

                /// The raw flags byte.
                #[inline]
                pub fn flags(&self) -> u8 {
                    self.header.flags
                }

                /// The payload size in bytes.
                #[inline]
                pub fn payload_size(&self) -> u32 {
                    self.header.length
                }
            }

            impl From<$frame> for Frame {
                fn from(frame: $frame) -> Frame {
                    Frame::$variant(frame)
                }
            }
        )*
    };
}

frame_common!(
    Data => DataFrame,
    Headers => HeadersFrame,
    Priority => PriorityFrame,
    RstStream => RstStreamFrame,
    Settings => SettingsFrame,
    PushPromise => PushPromiseFrame,
    Ping => PingFrame,
    GoAway => GoAwayFrame,
    WindowUpdate => WindowUpdateFrame,
    Continuation => ContinuationFrame,
);

/// DATA frame (type=0x0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub(crate) header: FrameHeader,
    pub(crate) pad_length: Option<u8>,
    pub(crate) data: Bytes,
}

impl DataFrame {
    pub fn end_stream(&self) -> bool {
        self.header.has_flag(flags::END_STREAM)
    }

    /// Padding length, present only when the PADDED flag is set.
    pub fn pad_length(&self) -> Option<u8> {
        self.pad_length
    }

    /// Application data, padding removed.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Stream priority information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    /// Whether the dependency is exclusive.
    pub exclusive: bool,
    /// Stream dependency.
    pub dependency: StreamId,
    /// Weight (1-256, stored as 0-255).
    pub weight: u8,
}

impl Priority {
    /// Default weight on the wire (RFC 7540 Section 5.3.5, weight 16).
    pub const DEFAULT_WEIGHT: u8 = 15;

    /// Pack the exclusive bit and dependency into the first priority word.
    #[inline]
    pub(crate) fn dependency_word(&self) -> u32 {
        let mut dep = self.dependency.value();
        if self.exclusive {
            dep |= 0x8000_0000;
        }
        dep
    }
}

/// HEADERS frame (type=0x1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame {
    pub(crate) header: FrameHeader,
    pub(crate) pad_length: Option<u8>,
    pub(crate) priority: Option<Priority>,
    pub(crate) fragment: Bytes,
}

impl HeadersFrame {
    pub fn end_stream(&self) -> bool {
        self.header.has_flag(flags::END_STREAM)
    }

    pub fn end_headers(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    pub fn pad_length(&self) -> Option<u8> {
        self.pad_length
    }

    /// Priority block, present only when the PRIORITY flag is set.
    pub fn priority(&self) -> Option<&Priority> {
        self.priority.as_ref()
    }

    /// HPACK-encoded header block fragment.
    pub fn fragment(&self) -> &Bytes {
        &self.fragment
    }
}

/// PRIORITY frame (type=0x2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityFrame {
    pub(crate) header: FrameHeader,
    pub(crate) priority: Priority,
}

impl PriorityFrame {
    pub fn priority(&self) -> &Priority {
        &self.priority
    }
}

/// RST_STREAM frame (type=0x3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub(crate) header: FrameHeader,
    pub(crate) error_code: u32,
}

impl RstStreamFrame {
    /// The error code, with unknown values read as INTERNAL_ERROR.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_u32(self.error_code)
    }

    /// The error code exactly as carried on the wire.
    pub fn raw_error_code(&self) -> u32 {
        self.error_code
    }
}

/// SETTINGS frame (type=0x4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFrame {
    pub(crate) header: FrameHeader,
    pub(crate) settings: Settings,
}

impl SettingsFrame {
    pub fn is_ack(&self) -> bool {
        self.header.has_flag(flags::ACK)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Individual setting in a SETTINGS frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub id: SettingId,
    pub value: u32,
}

/// Known setting identifiers (RFC 7540 Section 6.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SettingId {
    HeaderTableSize = 0x1,
    EnablePush = 0x2,
    MaxConcurrentStreams = 0x3,
    InitialWindowSize = 0x4,
    MaxFrameSize = 0x5,
    MaxHeaderListSize = 0x6,
}

impl SettingId {
    /// All known settings in wire order.
    pub const ALL: [SettingId; 6] = [
        SettingId::HeaderTableSize,
        SettingId::EnablePush,
        SettingId::MaxConcurrentStreams,
        SettingId::InitialWindowSize,
        SettingId::MaxFrameSize,
        SettingId::MaxHeaderListSize,
    ];

    /// Map a wire identifier to a known setting. Unknown identifiers
    /// must be ignored by the receiver.
    pub fn from_u16(id: u16) -> Option<Self> {
        match id {
            0x1 => Some(SettingId::HeaderTableSize),
            0x2 => Some(SettingId::EnablePush),
            0x3 => Some(SettingId::MaxConcurrentStreams),
            0x4 => Some(SettingId::InitialWindowSize),
            0x5 => Some(SettingId::MaxFrameSize),
            0x6 => Some(SettingId::MaxHeaderListSize),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Initial value of this setting before any SETTINGS frame is seen.
    pub fn default_value(self) -> u32 {
        match self {
            SettingId::HeaderTableSize => super::DEFAULT_HEADER_TABLE_SIZE,
            SettingId::EnablePush => super::DEFAULT_ENABLE_PUSH,
            SettingId::MaxConcurrentStreams => super::DEFAULT_MAX_CONCURRENT_STREAMS,
            SettingId::InitialWindowSize => super::DEFAULT_INITIAL_WINDOW_SIZE,
            SettingId::MaxFrameSize => super::DEFAULT_MAX_FRAME_SIZE,
            SettingId::MaxHeaderListSize => super::DEFAULT_MAX_HEADER_LIST_SIZE,
        }
    }

    /// Whether `value` is legal for this setting.
    pub fn accepts(self, value: u32) -> bool {
        match self {
            SettingId::EnablePush => value <= 1,
            // Must not exceed 2^31 - 1
            SettingId::InitialWindowSize => value <= 0x7FFF_FFFF,
            SettingId::MaxFrameSize => {
                (super::DEFAULT_MAX_FRAME_SIZE..=super::MAX_FRAME_SIZE).contains(&value)
            }
            _ => true,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingId::HeaderTableSize => "SETTINGS_HEADER_TABLE_SIZE",
            SettingId::EnablePush => "SETTINGS_ENABLE_PUSH",
            SettingId::MaxConcurrentStreams => "SETTINGS_MAX_CONCURRENT_STREAMS",
            SettingId::InitialWindowSize => "SETTINGS_INITIAL_WINDOW_SIZE",
            SettingId::MaxFrameSize => "SETTINGS_MAX_FRAME_SIZE",
            SettingId::MaxHeaderListSize => "SETTINGS_MAX_HEADER_LIST_SIZE",
        };
        f.write_str(name)
    }
}

/// Sparse set of SETTINGS parameters.
///
/// Each of the six known parameters is either present with a value or
/// absent. Iteration yields present parameters in identifier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    values: [Option<u32>; 6],
}

impl Settings {
    /// An empty parameter set.
    pub const fn new() -> Self {
        Self { values: [None; 6] }
    }

    /// All six parameters populated with their initial values.
    pub fn defaults() -> Self {
        let mut settings = Self::new();
        for id in SettingId::ALL {
            settings.set(id, id.default_value());
        }
        settings
    }

    /// The configured value of a parameter, if present.
    pub fn get(&self, id: SettingId) -> Option<u32> {
        self.values[id.slot()]
    }

    /// The configured value, or the protocol default when absent.
    pub fn value_or_default(&self, id: SettingId) -> u32 {
        self.get(id).unwrap_or_else(|| id.default_value())
    }

    /// Store a parameter value without validating it.
    pub fn set(&mut self, id: SettingId, value: u32) {
        self.values[id.slot()] = Some(value);
    }

    /// Remove a parameter.
    pub fn clear(&mut self, id: SettingId) {
        self.values[id.slot()] = None;
    }

    /// Number of parameters present.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present parameters in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = Setting> + '_ {
        SettingId::ALL
            .iter()
            .filter_map(|&id| self.get(id).map(|value| Setting { id, value }))
    }

    /// Apply another set on top of this one, keeping values it omits.
    pub fn merge(&mut self, other: &Settings) {
        for setting in other.iter() {
            self.set(setting.id, setting.value);
        }
    }
}

/// PUSH_PROMISE frame (type=0x5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPromiseFrame {
    pub(crate) header: FrameHeader,
    pub(crate) pad_length: Option<u8>,
    pub(crate) promised_stream_id: StreamId,
    pub(crate) fragment: Bytes,
}

impl PushPromiseFrame {
    pub fn end_headers(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    pub fn pad_length(&self) -> Option<u8> {
        self.pad_length
    }

    /// The server-initiated stream being reserved.
    pub fn promised_stream_id(&self) -> StreamId {
        self.promised_stream_id
    }

    /// HPACK-encoded header block fragment.
    pub fn fragment(&self) -> &Bytes {
        &self.fragment
    }
}

/// PING frame (type=0x6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingFrame {
    pub(crate) header: FrameHeader,
    pub(crate) opaque_data: u64,
}

impl PingFrame {
    pub fn is_ack(&self) -> bool {
        self.header.has_flag(flags::ACK)
    }

    /// The 64 bits of opaque data, in network byte order.
    pub fn opaque_data(&self) -> u64 {
        self.opaque_data
    }
}

/// GOAWAY frame (type=0x7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub(crate) header: FrameHeader,
    pub(crate) last_stream_id: StreamId,
    pub(crate) error_code: u32,
    pub(crate) debug_data: Option<Bytes>,
}

impl GoAwayFrame {
    pub fn last_stream_id(&self) -> StreamId {
        self.last_stream_id
    }

    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_u32(self.error_code)
    }

    pub fn raw_error_code(&self) -> u32 {
        self.error_code
    }

    /// Additional debug data, `None` when the frame carries none.
    pub fn debug_data(&self) -> Option<&Bytes> {
        self.debug_data.as_ref()
    }
}

/// WINDOW_UPDATE frame (type=0x8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub(crate) header: FrameHeader,
    pub(crate) increment: u32,
}

impl WindowUpdateFrame {
    pub fn window_size_increment(&self) -> u32 {
        self.increment
    }
}

/// CONTINUATION frame (type=0x9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationFrame {
    pub(crate) header: FrameHeader,
    pub(crate) fragment: Bytes,
}

impl ContinuationFrame {
    pub fn end_headers(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    /// HPACK-encoded header block fragment.
    pub fn fragment(&self) -> &Bytes {
        &self.fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FrameType tests

    #[test]
    fn test_frame_type_codes() {
        for code in 0u8..=9 {
            assert_eq!(FrameType::from_u8(code).unwrap().code(), code);
        }
        assert_eq!(FrameType::from_u8(0x4), Some(FrameType::Settings));
        assert_eq!(FrameType::from_u8(0x9), Some(FrameType::Continuation));
        // 0xa (ALTSVC) and up are extensions this codec skips.
        assert_eq!(FrameType::from_u8(0xa), None);
        assert_eq!(FrameType::from_u8(0xff), None);
    }

    #[test]
    fn test_frame_type_display() {
        assert_eq!(FrameType::RstStream.to_string(), "RST_STREAM");
        assert_eq!(FrameType::WindowUpdate.to_string(), "WINDOW_UPDATE");
    }

    #[test]
    fn test_legal_flags() {
        assert_eq!(
            FrameType::Data.legal_flags(),
            flags::END_STREAM | flags::PADDED
        );
        assert_eq!(FrameType::Headers.legal_flags(), 0x2d);
        assert_eq!(FrameType::Priority.legal_flags(), 0);
        assert_eq!(FrameType::Ping.legal_flags(), flags::ACK);
        assert_eq!(FrameType::Continuation.legal_flags(), flags::END_HEADERS);
    }

    #[test]
    fn test_fixed_payload_sizes() {
        assert_eq!(FrameType::Ping.fixed_payload_size(), Some(8));
        assert_eq!(FrameType::Priority.fixed_payload_size(), Some(5));
        assert_eq!(FrameType::RstStream.fixed_payload_size(), Some(4));
        assert_eq!(FrameType::WindowUpdate.fixed_payload_size(), Some(4));
        assert_eq!(FrameType::Data.fixed_payload_size(), None);
        assert_eq!(FrameType::Settings.fixed_payload_size(), None);
    }

    #[test]
    fn test_stream_rules() {
        assert_eq!(FrameType::Settings.stream_rule(), StreamRule::Zero);
        assert_eq!(FrameType::GoAway.stream_rule(), StreamRule::Zero);
        assert_eq!(FrameType::Data.stream_rule(), StreamRule::NonZero);
        assert_eq!(FrameType::WindowUpdate.stream_rule(), StreamRule::Any);
    }

    // StreamId tests

    #[test]
    fn test_stream_id_masks_reserved_bit() {
        let id = StreamId::new(0x80000001);
        assert_eq!(id.value(), 1);
    }

    #[test]
    fn test_stream_id_initiator() {
        assert!(StreamId::new(1).is_client_initiated());
        assert!(!StreamId::new(2).is_client_initiated());
        assert!(StreamId::new(2).is_server_initiated());
        assert!(!StreamId::new(0).is_server_initiated());
        assert!(StreamId::CONNECTION.is_connection_level());
    }

    #[test]
    fn test_parity_matches() {
        assert!(Parity::Odd.matches(1));
        assert!(!Parity::Odd.matches(2));
        assert!(Parity::Even.matches(4));
        assert!(!Parity::Even.matches(7));
    }

    // FrameHeader tests

    #[test]
    fn test_frame_header_parse() {
        let header = FrameHeader::parse(&[0x00, 0x01, 0x02, 0x01, 0x25, 0x80, 0x00, 0x00, 0x03]);
        assert_eq!(header.length, 258);
        assert_eq!(header.get_type(), Some(FrameType::Headers));
        assert!(header.has_flag(flags::PRIORITY));
        assert!(header.has_flag(flags::END_HEADERS));
        assert!(!header.has_flag(flags::PADDED));
        // Reserved bit is dropped
        assert_eq!(header.stream_id.value(), 3);
    }

    // Settings tests

    #[test]
    fn test_setting_id_from_u16() {
        assert_eq!(SettingId::from_u16(0x1), Some(SettingId::HeaderTableSize));
        assert_eq!(SettingId::from_u16(0x6), Some(SettingId::MaxHeaderListSize));
        assert_eq!(SettingId::from_u16(0x0), None);
        assert_eq!(SettingId::from_u16(0x99), None);
    }

    #[test]
    fn test_setting_id_accepts() {
        assert!(SettingId::EnablePush.accepts(1));
        assert!(!SettingId::EnablePush.accepts(2));
        assert!(SettingId::InitialWindowSize.accepts(0x7FFF_FFFF));
        assert!(!SettingId::InitialWindowSize.accepts(0x8000_0000));
        assert!(!SettingId::MaxFrameSize.accepts(16_383));
        assert!(SettingId::MaxFrameSize.accepts(16_777_215));
        assert!(!SettingId::MaxFrameSize.accepts(16_777_216));
        assert!(SettingId::HeaderTableSize.accepts(0));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::defaults();
        assert_eq!(settings.len(), 6);
        assert_eq!(settings.get(SettingId::HeaderTableSize), Some(4096));
        assert_eq!(settings.get(SettingId::EnablePush), Some(1));
        assert_eq!(settings.get(SettingId::MaxConcurrentStreams), Some(100));
        assert_eq!(settings.get(SettingId::InitialWindowSize), Some(65_535));
        assert_eq!(settings.get(SettingId::MaxFrameSize), Some(16_384));
        assert_eq!(settings.get(SettingId::MaxHeaderListSize), Some(u32::MAX));
    }

    #[test]
    fn test_settings_sparse() {
        let mut settings = Settings::new();
        assert!(settings.is_empty());

        settings.set(SettingId::MaxFrameSize, 32_768);
        settings.set(SettingId::HeaderTableSize, 0);
        assert_eq!(settings.len(), 2);

        let ids: Vec<_> = settings.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SettingId::HeaderTableSize, SettingId::MaxFrameSize]);

        assert_eq!(settings.value_or_default(SettingId::EnablePush), 1);

        settings.clear(SettingId::HeaderTableSize);
        assert_eq!(settings.get(SettingId::HeaderTableSize), None);
    }

    #[test]
    fn test_settings_merge() {
        let mut local = Settings::defaults();
        let mut update = Settings::new();
        update.set(SettingId::InitialWindowSize, 1_000_000);
        local.merge(&update);
        assert_eq!(local.get(SettingId::InitialWindowSize), Some(1_000_000));
        assert_eq!(local.get(SettingId::MaxFrameSize), Some(16_384));
    }

    #[test]
    fn test_priority_dependency_word() {
        let priority = Priority {
            exclusive: true,
            dependency: StreamId::new(3),
            weight: 0,
        };
        assert_eq!(priority.dependency_word(), 0x8000_0003);
    }
}
