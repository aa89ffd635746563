use bytes::Bytes;

use super::{BuildContext, BuilderCore, FrameBuilder};
use crate::frame::error::FrameError;
use crate::frame::types::{ContinuationFrame, FrameType};

/// Builder for CONTINUATION frames.
#[derive(Debug)]
pub struct ContinuationBuilder {
    core: BuilderCore,
    fragment: Bytes,
}

impl ContinuationBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Continuation, ctx)
                .with_stream_parity(ctx.stream_parity()),
            fragment: Bytes::new(),
        }
    }

    pub fn set_fragment(&mut self, fragment: impl Into<Bytes>) -> Result<&mut Self, FrameError> {
        self.fragment = fragment.into();
        Ok(self)
    }
}

impl FrameBuilder for ContinuationBuilder {
    type Frame = ContinuationFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<ContinuationFrame, FrameError> {
        let header = self.core.finish(self.fragment.len() as u64)?;
        Ok(ContinuationFrame {
            header,
            fragment: self.fragment,
        })
    }
}
