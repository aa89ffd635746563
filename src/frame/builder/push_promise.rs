use bytes::Bytes;

use super::{BuildContext, BuilderCore, FrameBuilder, Role, check_pad_length, check_width};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, Parity, PushPromiseFrame, StreamId};

/// Builder for PUSH_PROMISE frames.
///
/// Only a server sends PUSH_PROMISE. It is carried on a client-initiated
/// (odd) stream and reserves a server-initiated (even) stream.
#[derive(Debug)]
pub struct PushPromiseBuilder {
    core: BuilderCore,
    pad_length: Option<u8>,
    promised_stream_id: Option<u32>,
    fragment: Bytes,
}

impl PushPromiseBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::PushPromise, ctx)
                .with_stream_parity(Some(Parity::Odd)),
            pad_length: None,
            promised_stream_id: None,
            fragment: Bytes::new(),
        }
    }

    pub fn set_pad_length(&mut self, pad_length: u8) -> Result<&mut Self, FrameError> {
        check_pad_length(self.core.validate(), pad_length)?;
        self.pad_length = Some(pad_length);
        Ok(self)
    }

    pub fn set_promised_stream_id(&mut self, stream_id: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() {
            check_width("promised stream ID", stream_id as u64, 31)?;
            if stream_id == 0 || !Parity::Even.matches(stream_id) {
                return Err(FrameError::StreamParity {
                    field: "promised stream ID",
                    id: stream_id,
                    expected: Parity::Even,
                });
            }
        }
        self.promised_stream_id = Some(stream_id);
        Ok(self)
    }

    pub fn set_fragment(&mut self, fragment: impl Into<Bytes>) -> Result<&mut Self, FrameError> {
        self.fragment = fragment.into();
        Ok(self)
    }
}

impl FrameBuilder for PushPromiseBuilder {
    type Frame = PushPromiseFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<PushPromiseFrame, FrameError> {
        let validate = self.core.validate();
        if validate && self.core.ctx().role == Role::Client {
            return Err(FrameError::PushFromClient);
        }

        let promised_stream_id = match self.promised_stream_id {
            Some(id) => id,
            None if validate => return Err(self.core.missing("promised stream ID")),
            None => 0,
        };

        let pad_length = self.core.padding(self.pad_length)?;
        let computed = pad_length.map_or(0, |pad| 1 + pad as u64) + 4 + self.fragment.len() as u64;
        let header = self.core.finish(computed)?;

        Ok(PushPromiseFrame {
            header,
            pad_length,
            promised_stream_id: StreamId::new(promised_stream_id),
            fragment: self.fragment,
        })
    }
}
