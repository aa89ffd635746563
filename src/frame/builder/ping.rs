use super::{BuildContext, BuilderCore, FrameBuilder};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, PingFrame};

/// Builder for PING frames. The opaque data defaults to zero.
#[derive(Debug)]
pub struct PingBuilder {
    core: BuilderCore,
    opaque_data: u64,
}

impl PingBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Ping, ctx),
            opaque_data: 0,
        }
    }

    pub fn set_opaque_data(&mut self, data: u64) -> Result<&mut Self, FrameError> {
        self.opaque_data = data;
        Ok(self)
    }
}

impl FrameBuilder for PingBuilder {
    type Frame = PingFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<PingFrame, FrameError> {
        let header = self.core.finish(8)?;
        Ok(PingFrame {
            header,
            opaque_data: self.opaque_data,
        })
    }
}
