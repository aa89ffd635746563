//! HTTP/2 frame decoding.
//!
//! Every field read off the wire goes through the matching frame builder,
//! so a decoded frame satisfies the same rules as one built locally.
//! Structural checks the parser itself depends on (fixed payload lengths,
//! padding bounds) apply even when validation is off.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use super::builder::*;
use super::error::FrameError;
use super::types::*;
use super::{DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE};

/// Frame decoder that parses HTTP/2 frames from a byte buffer.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    max_frame_size: u32,
    ctx: BuildContext,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder for a client endpoint, reading frames a server
    /// sent.
    pub fn new() -> Self {
        Self::for_role(Role::Client, true)
    }

    /// Create a decoder for an endpoint acting as `local`.
    pub fn for_role(local: Role, validate: bool) -> Self {
        Self::with_context(BuildContext::inbound(local, validate))
    }

    /// Create a decoder that builds frames in `ctx`. `ctx.role` is the
    /// role of the peer that sent the frames.
    pub fn with_context(ctx: BuildContext) -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            ctx,
        }
    }

    /// Set the maximum frame size.
    pub fn set_max_frame_size(&mut self, size: u32) {
        self.max_frame_size = size;
    }

    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Try to decode a frame from the buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol error.
    ///
    /// On success, the consumed bytes are removed from the buffer. Frames
    /// of unknown type are consumed and skipped.
    pub fn decode(&self, buf: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        loop {
            // Need at least the header
            if buf.len() < FRAME_HEADER_SIZE {
                return Ok(None);
            }

            let mut raw = [0u8; FRAME_HEADER_SIZE];
            raw.copy_from_slice(&buf[..FRAME_HEADER_SIZE]);
            let header = FrameHeader::parse(&raw);
            self.check_size(&header)?;

            // Check if we have the full frame
            let total_len = FRAME_HEADER_SIZE + header.length as usize;
            if buf.len() < total_len {
                return Ok(None);
            }

            buf.advance(FRAME_HEADER_SIZE);
            let payload = buf.split_to(header.length as usize).freeze();

            match header.get_type() {
                Some(frame_type) => return self.parse_frame(frame_type, header, payload).map(Some),
                None => skip_unknown(&header),
            }
        }
    }

    /// Read one frame from a 9-byte header and its payload.
    ///
    /// Returns `Ok(None)` for frame types this decoder does not know.
    /// Bytes in `payload` past the declared length are ignored.
    pub fn read_frame(
        &self,
        header: &[u8; FRAME_HEADER_SIZE],
        payload: &[u8],
    ) -> Result<Option<Frame>, FrameError> {
        let header = FrameHeader::parse(header);
        self.check_size(&header)?;

        let length = header.length as usize;
        if payload.len() < length {
            return Err(FrameError::Incomplete {
                needed: length,
                available: payload.len(),
            });
        }

        match header.get_type() {
            Some(frame_type) => {
                let payload = Bytes::copy_from_slice(&payload[..length]);
                self.parse_frame(frame_type, header, payload).map(Some)
            }
            None => {
                skip_unknown(&header);
                Ok(None)
            }
        }
    }

    fn check_size(&self, header: &FrameHeader) -> Result<(), FrameError> {
        if header.length > self.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: header.length,
                max: self.max_frame_size,
            });
        }
        Ok(())
    }

    /// Parse a frame given its header and payload.
    fn parse_frame(
        &self,
        frame_type: FrameType,
        mut header: FrameHeader,
        payload: Bytes,
    ) -> Result<Frame, FrameError> {
        trace!(
            frame_type = %frame_type,
            stream_id = header.stream_id.value(),
            length = header.length,
            flags = header.flags,
            "decoding frame"
        );

        // Undefined flags are ignored on receipt. Without validation they
        // are kept, as the builder would keep them.
        let flags = if self.ctx.validate {
            header.flags & frame_type.legal_flags()
        } else {
            header.flags
        };
        if flags != header.flags {
            trace!(
                frame_type = %frame_type,
                ignored = header.flags & !flags,
                "ignoring undefined flags"
            );
        }
        header.flags = flags;

        let frame: Frame = match frame_type {
            FrameType::Data => self.parse_data(header, flags, payload)?.into(),
            FrameType::Headers => self.parse_headers(header, flags, payload)?.into(),
            FrameType::Priority => self.parse_priority(header, payload)?.into(),
            FrameType::RstStream => self.parse_rst_stream(header, payload)?.into(),
            FrameType::Settings => self.parse_settings(header, flags, payload)?.into(),
            FrameType::PushPromise => self.parse_push_promise(header, flags, payload)?.into(),
            FrameType::Ping => self.parse_ping(header, flags, payload)?.into(),
            FrameType::GoAway => self.parse_goaway(header, payload)?.into(),
            FrameType::WindowUpdate => self.parse_window_update(header, payload)?.into(),
            FrameType::Continuation => self.parse_continuation(header, flags, payload)?.into(),
        };
        Ok(frame)
    }

    /// Apply the header fields every frame shares.
    fn start<B: FrameBuilder>(
        &self,
        builder: &mut B,
        header: &FrameHeader,
        flags: u8,
        declare_size: bool,
    ) -> Result<(), FrameError> {
        builder.set_flags(flags)?;
        builder.set_stream_id(header.stream_id.value())?;
        if declare_size {
            builder.set_payload_size(header.length)?;
        }
        Ok(())
    }

    fn parse_data(
        &self,
        header: FrameHeader,
        flags: u8,
        mut payload: Bytes,
    ) -> Result<DataFrame, FrameError> {
        let pad_length = split_padding(flags, &mut payload, 0)?;

        let mut builder = DataBuilder::new(self.ctx);
        self.start(&mut builder, &header, flags, true)?;
        if let Some(pad) = pad_length {
            builder.set_pad_length(pad)?;
        }
        builder.set_data(payload)?;
        builder.build()
    }

    fn parse_headers(
        &self,
        header: FrameHeader,
        flags: u8,
        mut payload: Bytes,
    ) -> Result<HeadersFrame, FrameError> {
        let has_priority = flags & flags::PRIORITY != 0;
        let pad_length = split_padding(flags, &mut payload, if has_priority { 5 } else { 0 })?;

        let mut builder = HeadersBuilder::new(self.ctx);
        self.start(&mut builder, &header, flags, true)?;
        if let Some(pad) = pad_length {
            builder.set_pad_length(pad)?;
        }

        if has_priority {
            if payload.len() < 5 {
                return Err(FrameError::PayloadTooShort {
                    frame_type: FrameType::Headers,
                    minimum: 5,
                    actual: payload.len(),
                });
            }
            let (exclusive, dependency, weight) = read_priority(&mut payload);
            builder
                .set_exclusive(exclusive)?
                .set_dependency_stream(dependency)?
                .set_weight(weight)?;
        }

        builder.set_fragment(payload)?;
        builder.build()
    }

    fn parse_priority(
        &self,
        header: FrameHeader,
        mut payload: Bytes,
    ) -> Result<PriorityFrame, FrameError> {
        expect_length(FrameType::Priority, &payload)?;

        let mut builder = PriorityBuilder::new(self.ctx);
        self.start(&mut builder, &header, header.flags, true)?;
        let (exclusive, dependency, weight) = read_priority(&mut payload);
        builder
            .set_exclusive(exclusive)?
            .set_dependency_stream(dependency)?
            .set_weight(weight)?;
        builder.build()
    }

    fn parse_rst_stream(
        &self,
        header: FrameHeader,
        mut payload: Bytes,
    ) -> Result<RstStreamFrame, FrameError> {
        expect_length(FrameType::RstStream, &payload)?;

        let mut builder = RstStreamBuilder::new(self.ctx);
        self.start(&mut builder, &header, header.flags, true)?;
        builder.set_error_code(payload.get_u32())?;
        builder.build()
    }

    fn parse_settings(
        &self,
        header: FrameHeader,
        flags: u8,
        mut payload: Bytes,
    ) -> Result<SettingsFrame, FrameError> {
        // SETTINGS payload must be a multiple of 6 bytes
        if !payload.len().is_multiple_of(6) {
            return Err(FrameError::InvalidSettingsLength {
                actual: payload.len(),
            });
        }

        let mut builder = SettingsBuilder::new(self.ctx);
        // Unknown and repeated parameters collapse, so the size is
        // recomputed rather than declared.
        self.start(&mut builder, &header, flags, false)?;

        if flags & flags::ACK != 0 && !payload.is_empty() && self.ctx.validate {
            return Err(FrameError::AckWithSettings);
        }

        while payload.has_remaining() {
            let id = payload.get_u16();
            let value = payload.get_u32();
            match SettingId::from_u16(id) {
                Some(id) => {
                    if let Err(e) = builder.set_parameter(id, value) {
                        warn!(setting = %id, value, "rejecting SETTINGS value");
                        return Err(e);
                    }
                }
                None => trace!(id, value, "ignoring unknown setting"),
            }
        }
        builder.build()
    }

    fn parse_push_promise(
        &self,
        header: FrameHeader,
        flags: u8,
        mut payload: Bytes,
    ) -> Result<PushPromiseFrame, FrameError> {
        let pad_length = split_padding(flags, &mut payload, 4)?;
        if payload.len() < 4 {
            return Err(FrameError::PayloadTooShort {
                frame_type: FrameType::PushPromise,
                minimum: 4,
                actual: payload.len(),
            });
        }

        let mut builder = PushPromiseBuilder::new(self.ctx);
        self.start(&mut builder, &header, flags, true)?;
        if let Some(pad) = pad_length {
            builder.set_pad_length(pad)?;
        }
        builder.set_promised_stream_id(payload.get_u32() & 0x7FFF_FFFF)?;
        builder.set_fragment(payload)?;
        builder.build()
    }

    fn parse_ping(
        &self,
        header: FrameHeader,
        flags: u8,
        mut payload: Bytes,
    ) -> Result<PingFrame, FrameError> {
        expect_length(FrameType::Ping, &payload)?;

        let mut builder = PingBuilder::new(self.ctx);
        self.start(&mut builder, &header, flags, true)?;
        builder.set_opaque_data(payload.get_u64())?;
        builder.build()
    }

    fn parse_goaway(
        &self,
        header: FrameHeader,
        mut payload: Bytes,
    ) -> Result<GoAwayFrame, FrameError> {
        // GOAWAY frame payload is at least 8 bytes
        if payload.len() < 8 {
            return Err(FrameError::PayloadTooShort {
                frame_type: FrameType::GoAway,
                minimum: 8,
                actual: payload.len(),
            });
        }

        let mut builder = GoAwayBuilder::new(self.ctx);
        self.start(&mut builder, &header, header.flags, true)?;
        builder
            .set_last_stream_id(payload.get_u32() & 0x7FFF_FFFF)?
            .set_error_code(payload.get_u32())?
            .set_debug_data(payload)?;
        builder.build()
    }

    fn parse_window_update(
        &self,
        header: FrameHeader,
        mut payload: Bytes,
    ) -> Result<WindowUpdateFrame, FrameError> {
        expect_length(FrameType::WindowUpdate, &payload)?;

        let mut builder = WindowUpdateBuilder::new(self.ctx);
        self.start(&mut builder, &header, header.flags, true)?;
        builder.set_window_size_increment(payload.get_u32() & 0x7FFF_FFFF)?;
        builder.build()
    }

    fn parse_continuation(
        &self,
        header: FrameHeader,
        flags: u8,
        payload: Bytes,
    ) -> Result<ContinuationFrame, FrameError> {
        let mut builder = ContinuationBuilder::new(self.ctx);
        self.start(&mut builder, &header, flags, true)?;
        builder.set_fragment(payload)?;
        builder.build()
    }
}

fn skip_unknown(header: &FrameHeader) {
    debug!(
        frame_type = header.frame_type,
        stream_id = header.stream_id.value(),
        length = header.length,
        "skipping frame of unknown type"
    );
}

/// Check the payload length of a fixed-size frame type.
fn expect_length(frame_type: FrameType, payload: &Bytes) -> Result<(), FrameError> {
    if let Some(expected) = frame_type.fixed_payload_size()
        && payload.len() != expected as usize
    {
        return Err(FrameError::InvalidPayloadLength {
            frame_type,
            expected: expected as usize,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// Read the exclusive bit, dependency and weight of a priority block.
fn read_priority(payload: &mut Bytes) -> (bool, u32, u8) {
    let first = payload.get_u32();
    let exclusive = (first & 0x8000_0000) != 0;
    let dependency = first & 0x7FFF_FFFF;
    let weight = payload.get_u8();
    (exclusive, dependency, weight)
}

/// Strip the pad length byte and trailing padding from a padded payload.
///
/// `fixed` is the number of bytes that must remain between the pad length
/// byte and the padding (priority block, promised stream ID).
fn split_padding(flags: u8, payload: &mut Bytes, fixed: usize) -> Result<Option<u8>, FrameError> {
    if flags & flags::PADDED == 0 {
        return Ok(None);
    }

    let payload_length = payload.len();
    if payload.is_empty() {
        return Err(FrameError::InvalidPadding {
            pad_length: 0,
            payload_length,
        });
    }

    let pad_length = payload.get_u8();

    // Padding length must leave room for the fixed fields
    if pad_length as usize + fixed > payload.len() {
        return Err(FrameError::InvalidPadding {
            pad_length,
            payload_length,
        });
    }

    payload.truncate(payload.len() - pad_length as usize);
    Ok(Some(pad_length))
}
