use super::{BuildContext, BuilderCore, FrameBuilder, check_width};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, WindowUpdateFrame};

/// Builder for WINDOW_UPDATE frames, on the connection (stream 0) or a
/// stream. The increment is required.
#[derive(Debug)]
pub struct WindowUpdateBuilder {
    core: BuilderCore,
    increment: Option<u32>,
}

impl WindowUpdateBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::WindowUpdate, ctx),
            increment: None,
        }
    }

    /// Flow-control window increment, 1 to 2^31-1.
    pub fn set_window_size_increment(&mut self, increment: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() {
            check_width("window size increment", increment as u64, 31)?;
            if increment == 0 {
                return Err(FrameError::InvalidWindowIncrement { increment });
            }
        }
        self.increment = Some(increment);
        Ok(self)
    }
}

impl FrameBuilder for WindowUpdateBuilder {
    type Frame = WindowUpdateFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<WindowUpdateFrame, FrameError> {
        let increment = match self.increment {
            Some(increment) => increment,
            None if self.core.validate() => {
                return Err(self.core.missing("window size increment"));
            }
            None => 0,
        };
        let header = self.core.finish(4)?;
        Ok(WindowUpdateFrame { header, increment })
    }
}
