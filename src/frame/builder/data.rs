use bytes::Bytes;

use super::{BuildContext, BuilderCore, FrameBuilder, check_pad_length};
use crate::frame::error::FrameError;
use crate::frame::types::{DataFrame, FrameType};

/// Builder for DATA frames.
#[derive(Debug)]
pub struct DataBuilder {
    core: BuilderCore,
    pad_length: Option<u8>,
    data: Bytes,
}

impl DataBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Data, ctx).with_stream_parity(ctx.stream_parity()),
            pad_length: None,
            data: Bytes::new(),
        }
    }

    /// Number of padding bytes. Only written when the PADDED flag is set.
    pub fn set_pad_length(&mut self, pad_length: u8) -> Result<&mut Self, FrameError> {
        check_pad_length(self.core.validate(), pad_length)?;
        self.pad_length = Some(pad_length);
        Ok(self)
    }

    pub fn set_data(&mut self, data: impl Into<Bytes>) -> Result<&mut Self, FrameError> {
        self.data = data.into();
        Ok(self)
    }
}

impl FrameBuilder for DataBuilder {
    type Frame = DataFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<DataFrame, FrameError> {
        let pad_length = self.core.padding(self.pad_length)?;
        let padding = pad_length.map_or(0, |pad| 1 + pad as u64);
        let header = self.core.finish(padding + self.data.len() as u64)?;

        Ok(DataFrame {
            header,
            pad_length,
            data: self.data,
        })
    }
}
