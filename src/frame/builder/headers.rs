use bytes::Bytes;

use super::{BuildContext, BuilderCore, FrameBuilder, check_pad_length, check_width};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, HeadersFrame, Priority, StreamId, flags};

/// Builder for HEADERS frames.
///
/// When the PRIORITY flag is set and no priority fields are given, the
/// frame carries the default priority: non-exclusive, dependent on
/// stream 0, weight 16.
#[derive(Debug)]
pub struct HeadersBuilder {
    core: BuilderCore,
    pad_length: Option<u8>,
    exclusive: Option<bool>,
    dependency: Option<u32>,
    weight: Option<u8>,
    fragment: Bytes,
}

impl HeadersBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Headers, ctx)
                .with_stream_parity(ctx.stream_parity()),
            pad_length: None,
            exclusive: None,
            dependency: None,
            weight: None,
            fragment: Bytes::new(),
        }
    }

    pub fn set_pad_length(&mut self, pad_length: u8) -> Result<&mut Self, FrameError> {
        check_pad_length(self.core.validate(), pad_length)?;
        self.pad_length = Some(pad_length);
        Ok(self)
    }

    pub fn set_exclusive(&mut self, exclusive: bool) -> Result<&mut Self, FrameError> {
        self.exclusive = Some(exclusive);
        Ok(self)
    }

    pub fn set_dependency_stream(&mut self, stream_id: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() {
            check_width("dependency stream ID", stream_id as u64, 31)?;
        }
        self.dependency = Some(stream_id);
        Ok(self)
    }

    /// Raw weight byte; the effective weight is one more.
    pub fn set_weight(&mut self, weight: u8) -> Result<&mut Self, FrameError> {
        self.weight = Some(weight);
        Ok(self)
    }

    /// HPACK-encoded header block fragment.
    pub fn set_fragment(&mut self, fragment: impl Into<Bytes>) -> Result<&mut Self, FrameError> {
        self.fragment = fragment.into();
        Ok(self)
    }

    fn priority(&self) -> Result<Option<Priority>, FrameError> {
        let any_set = self.exclusive.is_some() || self.dependency.is_some() || self.weight.is_some();

        if !self.core.has_flag(flags::PRIORITY) {
            if any_set && self.core.validate() {
                return Err(self.core.flag_required("priority", "PRIORITY"));
            }
            return Ok(None);
        }

        let dependency = self.dependency.unwrap_or(0);
        let stream_id = self.core.stream_id();
        if self.core.validate() && dependency != 0 && dependency == stream_id {
            return Err(FrameError::SelfDependency { stream_id });
        }

        Ok(Some(Priority {
            exclusive: self.exclusive.unwrap_or(false),
            dependency: StreamId::new(dependency),
            weight: self.weight.unwrap_or(Priority::DEFAULT_WEIGHT),
        }))
    }
}

impl FrameBuilder for HeadersBuilder {
    type Frame = HeadersFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<HeadersFrame, FrameError> {
        let pad_length = self.core.padding(self.pad_length)?;
        let priority = self.priority()?;

        let computed = pad_length.map_or(0, |pad| 1 + pad as u64)
            + priority.map_or(0, |_| 5)
            + self.fragment.len() as u64;
        let header = self.core.finish(computed)?;

        Ok(HeadersFrame {
            header,
            pad_length,
            priority,
            fragment: self.fragment,
        })
    }
}
