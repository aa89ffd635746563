use super::{BuildContext, BuilderCore, FrameBuilder, normalize_error_code};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, RstStreamFrame};

/// Builder for RST_STREAM frames. The error code is required.
#[derive(Debug)]
pub struct RstStreamBuilder {
    core: BuilderCore,
    error_code: Option<u32>,
}

impl RstStreamBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::RstStream, ctx),
            error_code: None,
        }
    }

    /// Set the error code. With validation, unknown codes are sent as
    /// INTERNAL_ERROR.
    pub fn set_error_code(&mut self, code: impl Into<u32>) -> Result<&mut Self, FrameError> {
        self.error_code = Some(normalize_error_code(self.core.validate(), code.into()));
        Ok(self)
    }
}

impl FrameBuilder for RstStreamBuilder {
    type Frame = RstStreamFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<RstStreamFrame, FrameError> {
        let error_code = match self.error_code {
            Some(code) => code,
            None if self.core.validate() => return Err(self.core.missing("error code")),
            None => 0,
        };
        let header = self.core.finish(4)?;
        Ok(RstStreamFrame { header, error_code })
    }
}
