//! HTTP/2 frame encoding.

use bytes::{BufMut, BytesMut};
use tracing::warn;

use super::builder::{
    BuildContext, FrameBuilder, GoAwayBuilder, PingBuilder, RstStreamBuilder, SettingsBuilder,
    WindowUpdateBuilder,
};
use super::error::{ErrorCode, FrameError};
use super::types::*;
use super::{CONNECTION_PREFACE, DEFAULT_MAX_FRAME_SIZE};

/// Frame encoder that writes HTTP/2 frames to a byte buffer.
///
/// Encoding a built frame cannot fail: every frame was validated when it
/// was built. The helper methods that build and encode in one step use
/// the encoder's [`BuildContext`].
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    max_frame_size: u32,
    ctx: BuildContext,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    /// Create a new frame encoder with default settings.
    pub fn new() -> Self {
        Self::with_context(BuildContext::default())
    }

    /// Create an encoder whose helpers build frames in `ctx`.
    pub fn with_context(ctx: BuildContext) -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            ctx,
        }
    }

    /// Set the maximum frame size advertised by the peer.
    pub fn set_max_frame_size(&mut self, size: u32) {
        self.max_frame_size = size;
    }

    /// Get the maximum frame size.
    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Whether the frame fits within the peer's maximum frame size.
    pub fn fits(&self, frame: &Frame) -> bool {
        frame.payload_size() <= self.max_frame_size
    }

    /// Encode a frame to the buffer.
    pub fn encode(&self, frame: &Frame, buf: &mut BytesMut) {
        if !self.fits(frame) {
            warn!(
                frame_type = %frame.frame_type(),
                size = frame.payload_size(),
                max = self.max_frame_size,
                "encoding frame larger than peer maximum"
            );
        }
        buf.reserve(frame.encoded_len());
        self.encode_into(frame, buf);
    }

    /// Encode a frame into a caller-provided slice, returning the number
    /// of bytes written.
    pub fn encode_to_slice(&self, frame: &Frame, out: &mut [u8]) -> Result<usize, FrameError> {
        let needed = frame.encoded_len();
        if out.len() < needed {
            return Err(FrameError::Incomplete {
                needed,
                available: out.len(),
            });
        }
        let mut dst = &mut out[..needed];
        self.encode_into(frame, &mut dst);
        Ok(needed)
    }

    /// Encode a frame into any buffer with room for it.
    pub fn encode_into<B: BufMut>(&self, frame: &Frame, buf: &mut B) {
        write_header(buf, frame.header());

        match frame {
            Frame::Data(f) => {
                put_padded(buf, f.pad_length, |buf| buf.put_slice(&f.data));
            }
            Frame::Headers(f) => {
                put_padded(buf, f.pad_length, |buf| {
                    if let Some(priority) = &f.priority {
                        put_priority(buf, priority);
                    }
                    buf.put_slice(&f.fragment);
                });
            }
            Frame::Priority(f) => put_priority(buf, &f.priority),
            Frame::RstStream(f) => buf.put_u32(f.error_code),
            Frame::Settings(f) => {
                for setting in f.settings.iter() {
                    buf.put_u16(setting.id.to_u16());
                    buf.put_u32(setting.value);
                }
            }
            Frame::PushPromise(f) => {
                put_padded(buf, f.pad_length, |buf| {
                    buf.put_u32(f.promised_stream_id.value() & 0x7FFF_FFFF);
                    buf.put_slice(&f.fragment);
                });
            }
            Frame::Ping(f) => buf.put_u64(f.opaque_data),
            Frame::GoAway(f) => {
                buf.put_u32(f.last_stream_id.value() & 0x7FFF_FFFF);
                buf.put_u32(f.error_code);
                if let Some(debug_data) = &f.debug_data {
                    buf.put_slice(debug_data);
                }
            }
            Frame::WindowUpdate(f) => buf.put_u32(f.increment & 0x7FFF_FFFF),
            Frame::Continuation(f) => buf.put_slice(&f.fragment),
        }
    }
}

/// Write a frame header to the buffer.
#[inline]
fn write_header<B: BufMut>(buf: &mut B, header: &FrameHeader) {
    // Length (24 bits, big-endian)
    buf.put_u8((header.length >> 16) as u8);
    buf.put_u8((header.length >> 8) as u8);
    buf.put_u8(header.length as u8);

    buf.put_u8(header.frame_type);
    buf.put_u8(header.flags);

    // Stream ID (31 bits, big-endian, high bit reserved)
    buf.put_u32(header.stream_id.value() & 0x7FFF_FFFF);
}

#[inline]
fn put_priority<B: BufMut>(buf: &mut B, priority: &Priority) {
    buf.put_u32(priority.dependency_word());
    buf.put_u8(priority.weight);
}

/// Write the pad length byte, the body, then zeroed padding.
#[inline]
fn put_padded<B: BufMut>(buf: &mut B, pad_length: Option<u8>, body: impl FnOnce(&mut B)) {
    if let Some(pad) = pad_length {
        buf.put_u8(pad);
    }
    body(buf);
    if let Some(pad) = pad_length {
        buf.put_bytes(0, pad as usize);
    }
}

/// Helper functions for encoding specific frames directly.
impl FrameEncoder {
    /// Encode the client connection preface to the buffer.
    pub fn encode_connection_preface(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(CONNECTION_PREFACE);
    }

    /// Encode a SETTINGS frame carrying `settings`.
    pub fn encode_settings(&self, settings: &Settings, buf: &mut BytesMut) -> Result<(), FrameError> {
        let mut builder = SettingsBuilder::new(self.ctx);
        builder.set_settings(settings)?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }

    /// Encode a SETTINGS ACK frame.
    pub fn encode_settings_ack(&self, buf: &mut BytesMut) -> Result<(), FrameError> {
        let mut builder = SettingsBuilder::new(self.ctx);
        builder.set_flags(flags::ACK)?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }

    /// Encode a PING response (ACK) echoing the peer's opaque data.
    pub fn encode_ping_ack(&self, data: u64, buf: &mut BytesMut) -> Result<(), FrameError> {
        let mut builder = PingBuilder::new(self.ctx);
        builder.set_flags(flags::ACK)?.set_opaque_data(data)?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }

    /// Encode a WINDOW_UPDATE frame directly.
    pub fn write_window_update(
        &self,
        stream_id: StreamId,
        increment: u32,
        buf: &mut BytesMut,
    ) -> Result<(), FrameError> {
        let mut builder = WindowUpdateBuilder::new(self.ctx);
        builder
            .set_stream_id(stream_id.value())?
            .set_window_size_increment(increment)?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }

    /// Encode a RST_STREAM frame directly.
    pub fn write_rst_stream(
        &self,
        stream_id: StreamId,
        error_code: ErrorCode,
        buf: &mut BytesMut,
    ) -> Result<(), FrameError> {
        let mut builder = RstStreamBuilder::new(self.ctx);
        builder
            .set_stream_id(stream_id.value())?
            .set_error_code(error_code)?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }

    /// Encode a GOAWAY frame directly.
    pub fn write_goaway(
        &self,
        last_stream_id: StreamId,
        error_code: ErrorCode,
        debug_data: &[u8],
        buf: &mut BytesMut,
    ) -> Result<(), FrameError> {
        let mut builder = GoAwayBuilder::new(self.ctx);
        builder
            .set_last_stream_id(last_stream_id.value())?
            .set_error_code(error_code)?
            .set_debug_data(bytes::Bytes::copy_from_slice(debug_data))?;
        self.encode(&builder.build()?.into(), buf);
        Ok(())
    }
}
