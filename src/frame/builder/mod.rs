//! Validating frame builders.
//!
//! Every frame kind has a builder. Setters check the value they are given
//! and fail with [`ErrorKind::MalformedArgument`]; `build()` checks the
//! combination of fields and fails with [`ErrorKind::InvalidState`].
//!
//! [`ErrorKind::MalformedArgument`]: crate::frame::ErrorKind::MalformedArgument
//! [`ErrorKind::InvalidState`]: crate::frame::ErrorKind::InvalidState
//!
//! `build()` takes the builder by value, so a builder produces at most one
//! frame and cannot be touched afterwards:
//!
//! ```compile_fail
//! use h2codec::frame::builder::{BuildContext, FrameBuilder, PingBuilder};
//!
//! let builder = PingBuilder::new(BuildContext::default());
//! let first = builder.build();
//! let second = builder.build();
//! ```
//!
//! ```compile_fail
//! use h2codec::frame::builder::{BuildContext, FrameBuilder, PingBuilder};
//!
//! let mut builder = PingBuilder::new(BuildContext::default());
//! let ping = builder.build();
//! builder.set_opaque_data(1);
//! ```
//!
//! Builders are also confined to the thread that created them:
//!
//! ```compile_fail
//! use h2codec::frame::builder::{BuildContext, PingBuilder};
//!
//! fn assert_send<T: Send>(_: T) {}
//! assert_send(PingBuilder::new(BuildContext::default()));
//! ```
//!
//! A typical build:
//!
//! ```
//! use h2codec::frame::builder::{BuildContext, FrameBuilder, PingBuilder, Role};
//! use h2codec::frame::flags;
//!
//! let mut builder = PingBuilder::new(BuildContext::new(Role::Client, false));
//! builder.set_flags(flags::ACK)?.set_opaque_data(0xFEDC_BA98_7654_3210)?;
//! let ping = builder.build()?;
//! assert!(ping.is_ack());
//! assert_eq!(ping.payload_size(), 8);
//! # Ok::<(), h2codec::frame::FrameError>(())
//! ```

mod continuation;
mod data;
mod goaway;
mod headers;
mod ping;
mod priority;
mod push_promise;
mod rst_stream;
mod settings;
mod window_update;

use std::marker::PhantomData;

use serde::Deserialize;
use tracing::{debug, trace};

pub use self::continuation::ContinuationBuilder;
pub use self::data::DataBuilder;
pub use self::goaway::GoAwayBuilder;
pub use self::headers::HeadersBuilder;
pub use self::ping::PingBuilder;
pub use self::priority::PriorityBuilder;
pub use self::push_promise::PushPromiseBuilder;
pub use self::rst_stream::RstStreamBuilder;
pub use self::settings::SettingsBuilder;
pub use self::window_update::WindowUpdateBuilder;

use super::error::{ErrorCode, FrameError};
use super::types::{FrameHeader, FrameType, Parity, StreamId, StreamRule, flags};
use super::{MAX_FRAME_SIZE, MAX_PAD_LENGTH};

/// Which end of the connection an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Server,
}

impl Role {
    /// The role at the other end of the connection.
    pub fn peer(self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }

    /// Parity of stream identifiers this role initiates.
    pub fn initiated_parity(self) -> Parity {
        match self {
            Role::Client => Parity::Odd,
            Role::Server => Parity::Even,
        }
    }
}

/// Context a frame is built in.
///
/// `role` is the role of the endpoint that originates the frame. When
/// `request` is set, HEADERS, DATA and CONTINUATION frames belong to a
/// stream the originator opened, and their stream identifier must have
/// the originator's parity. Clearing `validate` skips all protocol checks
/// and leaves correctness to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    pub role: Role,
    pub request: bool,
    pub validate: bool,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(Role::Client, false)
    }
}

impl BuildContext {
    /// A validating context.
    pub fn new(role: Role, request: bool) -> Self {
        Self {
            role,
            request,
            validate: true,
        }
    }

    /// Turn protocol validation on or off.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Context for frames received from the peer of `local`.
    pub fn inbound(local: Role, validate: bool) -> Self {
        let peer = local.peer();
        Self {
            role: peer,
            request: peer == Role::Client,
            validate,
        }
    }

    /// Required parity of stream-bound HEADERS, DATA and CONTINUATION.
    pub(crate) fn stream_parity(&self) -> Option<Parity> {
        self.request.then(|| self.role.initiated_parity())
    }

    /// Required parity of a GOAWAY last stream identifier, which names a
    /// stream the receiver initiated.
    pub(crate) fn receiver_parity(&self) -> Parity {
        self.role.peer().initiated_parity()
    }
}

/// Setters shared by every frame builder.
///
/// Each setter returns the builder so calls can be chained with `?`.
pub trait FrameBuilder: Sized {
    /// The frame this builder produces.
    type Frame;

    #[doc(hidden)]
    fn core(&mut self) -> &mut BuilderCore;

    /// Set the raw flags byte. With validation, bits not defined for the
    /// frame type are rejected.
    fn set_flags(&mut self, flags: u8) -> Result<&mut Self, FrameError> {
        self.core().set_flags(flags)?;
        Ok(self)
    }

    /// Declare the payload size. When never set, the size is computed
    /// from the frame contents.
    fn set_payload_size(&mut self, size: u32) -> Result<&mut Self, FrameError> {
        self.core().set_payload_size(size)?;
        Ok(self)
    }

    /// Set the stream identifier.
    fn set_stream_id(&mut self, id: u32) -> Result<&mut Self, FrameError> {
        self.core().set_stream_id(id)?;
        Ok(self)
    }

    /// Check the combination of fields and produce the frame.
    fn build(self) -> Result<Self::Frame, FrameError>;
}

/// State common to every builder.
#[doc(hidden)]
#[derive(Debug)]
pub struct BuilderCore {
    frame_type: FrameType,
    ctx: BuildContext,
    flags: u8,
    payload_size: Option<u32>,
    stream_id: Option<u32>,
    stream_parity: Option<Parity>,
    // Builders are single-use and stay on the creating thread.
    _local: PhantomData<*const ()>,
}

impl BuilderCore {
    pub(crate) fn new(frame_type: FrameType, ctx: BuildContext) -> Self {
        Self {
            frame_type,
            ctx,
            flags: 0,
            payload_size: None,
            stream_id: None,
            stream_parity: None,
            _local: PhantomData,
        }
    }

    /// Require stream identifiers of the given parity.
    pub(crate) fn with_stream_parity(mut self, parity: Option<Parity>) -> Self {
        self.stream_parity = parity;
        self
    }

    #[inline]
    pub(crate) fn validate(&self) -> bool {
        self.ctx.validate
    }

    #[inline]
    pub(crate) fn ctx(&self) -> &BuildContext {
        &self.ctx
    }

    #[inline]
    pub(crate) fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    pub(crate) fn stream_id(&self) -> u32 {
        self.stream_id.unwrap_or(0)
    }

    fn set_flags(&mut self, flags: u8) -> Result<(), FrameError> {
        if self.validate() && flags & !self.frame_type.legal_flags() != 0 {
            return Err(FrameError::IllegalFlags {
                frame_type: self.frame_type,
                flags,
            });
        }
        self.flags = flags;
        Ok(())
    }

    fn set_payload_size(&mut self, size: u32) -> Result<(), FrameError> {
        if self.validate() {
            check_width("payload size", size as u64, 24)?;

            if let Some(expected) = self.frame_type.fixed_payload_size()
                && size != expected
            {
                return Err(FrameError::InvalidPayloadLength {
                    frame_type: self.frame_type,
                    expected: expected as usize,
                    actual: size as usize,
                });
            }

            let minimum = match self.frame_type {
                FrameType::GoAway => 8,
                FrameType::PushPromise => 4,
                _ => 0,
            };
            if (size as usize) < minimum {
                return Err(FrameError::PayloadTooShort {
                    frame_type: self.frame_type,
                    minimum,
                    actual: size as usize,
                });
            }

            if self.frame_type == FrameType::Settings && size % 6 != 0 {
                return Err(FrameError::InvalidSettingsLength {
                    actual: size as usize,
                });
            }
        }
        self.payload_size = Some(size);
        Ok(())
    }

    fn set_stream_id(&mut self, id: u32) -> Result<(), FrameError> {
        if self.validate() {
            check_width("stream ID", id as u64, 31)?;
            if let Some(parity) = self.stream_parity
                && id != 0
                && !parity.matches(id)
            {
                return Err(FrameError::StreamParity {
                    field: "stream ID",
                    id,
                    expected: parity,
                });
            }
        }
        self.stream_id = Some(id);
        Ok(())
    }

    /// Resolve the padding prefix: the pad length when the PADDED flag is
    /// set, defaulting to zero.
    pub(crate) fn padding(&self, pad_length: Option<u8>) -> Result<Option<u8>, FrameError> {
        if self.has_flag(flags::PADDED) {
            return Ok(Some(pad_length.unwrap_or(0)));
        }
        if pad_length.is_some() && self.validate() {
            return Err(self.flag_required("pad length", "PADDED"));
        }
        Ok(None)
    }

    pub(crate) fn flag_required(&self, field: &'static str, flag: &'static str) -> FrameError {
        FrameError::FlagRequired {
            frame_type: self.frame_type,
            field,
            flag,
        }
    }

    pub(crate) fn missing(&self, field: &'static str) -> FrameError {
        FrameError::MissingField {
            frame_type: self.frame_type,
            field,
        }
    }

    /// Cross-field checks shared by every kind. Produces the frame header
    /// for a payload of `computed` bytes.
    pub(crate) fn finish(&self, computed: u64) -> Result<FrameHeader, FrameError> {
        if computed > MAX_FRAME_SIZE as u64 {
            return Err(FrameError::FieldTooWide {
                field: "payload size",
                value: computed,
                bits: 24,
            });
        }

        let stream_id = self.stream_id();
        // The header always carries the serialized length. A declared size
        // is only a claim to check.
        let length = computed as u32;
        if let Some(declared) = self.payload_size
            && declared != length
        {
            if self.validate() {
                return Err(FrameError::PayloadSizeMismatch {
                    frame_type: self.frame_type,
                    declared,
                    computed,
                });
            }
            trace!(
                frame_type = %self.frame_type,
                declared,
                computed,
                "declared payload size ignored"
            );
        }

        if self.validate() {
            match self.frame_type.stream_rule() {
                StreamRule::Zero if stream_id != 0 => {
                    return Err(FrameError::StreamIdMustBeZero {
                        frame_type: self.frame_type,
                    });
                }
                StreamRule::NonZero if stream_id == 0 => {
                    return Err(FrameError::StreamIdRequired {
                        frame_type: self.frame_type,
                    });
                }
                _ => {}
            }
        }

        trace!(
            frame_type = %self.frame_type,
            stream_id,
            length,
            flags = self.flags,
            "frame built"
        );

        Ok(FrameHeader::new(
            self.frame_type,
            self.flags,
            StreamId::new(stream_id),
            length,
        ))
    }
}

/// Fail when `value` needs more than `bits` bits.
pub(crate) fn check_width(field: &'static str, value: u64, bits: u8) -> Result<(), FrameError> {
    if value >> bits != 0 {
        return Err(FrameError::FieldTooWide { field, value, bits });
    }
    Ok(())
}

/// Check a pad length against the supported range.
pub(crate) fn check_pad_length(validate: bool, pad_length: u8) -> Result<(), FrameError> {
    if validate && pad_length > MAX_PAD_LENGTH {
        return Err(FrameError::PadTooLong { pad_length });
    }
    Ok(())
}

/// Normalize an error code for sending. With validation, codes outside
/// the registered range are replaced by INTERNAL_ERROR.
pub(crate) fn normalize_error_code(validate: bool, code: u32) -> u32 {
    if validate && ErrorCode::try_from_u32(code).is_none() {
        debug!(code, "unknown error code replaced with INTERNAL_ERROR");
        return ErrorCode::InternalError.to_u32();
    }
    code
}
