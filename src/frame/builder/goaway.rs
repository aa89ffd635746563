use bytes::Bytes;

use super::{BuildContext, BuilderCore, FrameBuilder, check_width, normalize_error_code};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, GoAwayFrame, StreamId};

/// Builder for GOAWAY frames.
///
/// The last stream identifier names a stream the receiver opened, so it
/// must be zero or have the receiver's parity. The error code is
/// required.
#[derive(Debug)]
pub struct GoAwayBuilder {
    core: BuilderCore,
    last_stream_id: u32,
    error_code: Option<u32>,
    debug_data: Option<Bytes>,
}

impl GoAwayBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::GoAway, ctx),
            last_stream_id: 0,
            error_code: None,
            debug_data: None,
        }
    }

    pub fn set_last_stream_id(&mut self, stream_id: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() {
            check_width("last stream ID", stream_id as u64, 31)?;
            let parity = self.core.ctx().receiver_parity();
            if stream_id != 0 && !parity.matches(stream_id) {
                return Err(FrameError::StreamParity {
                    field: "last stream ID",
                    id: stream_id,
                    expected: parity,
                });
            }
        }
        self.last_stream_id = stream_id;
        Ok(self)
    }

    pub fn set_error_code(&mut self, code: impl Into<u32>) -> Result<&mut Self, FrameError> {
        self.error_code = Some(normalize_error_code(self.core.validate(), code.into()));
        Ok(self)
    }

    /// Opaque diagnostic data. Empty data is the same as none.
    pub fn set_debug_data(&mut self, data: impl Into<Bytes>) -> Result<&mut Self, FrameError> {
        let data = data.into();
        self.debug_data = (!data.is_empty()).then_some(data);
        Ok(self)
    }
}

impl FrameBuilder for GoAwayBuilder {
    type Frame = GoAwayFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<GoAwayFrame, FrameError> {
        let error_code = match self.error_code {
            Some(code) => code,
            None if self.core.validate() => return Err(self.core.missing("error code")),
            None => 0,
        };

        let debug_len = self.debug_data.as_ref().map_or(0, |data| data.len() as u64);
        let header = self.core.finish(8 + debug_len)?;

        Ok(GoAwayFrame {
            header,
            last_stream_id: StreamId::new(self.last_stream_id),
            error_code,
            debug_data: self.debug_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::builder::Role;
    use crate::frame::error::ErrorCode;
    use crate::frame::types::Parity;

    #[test]
    fn test_goaway_build() {
        let mut builder = GoAwayBuilder::new(BuildContext::new(Role::Server, false));
        builder
            .set_last_stream_id(1)
            .unwrap()
            .set_error_code(ErrorCode::Http11Required)
            .unwrap();
        let frame = builder.build().unwrap();

        assert_eq!(frame.last_stream_id().value(), 1);
        assert_eq!(frame.error_code(), ErrorCode::Http11Required);
        assert_eq!(frame.payload_size(), 8);
        assert_eq!(frame.debug_data(), None);
    }

    #[test]
    fn test_goaway_debug_data() {
        let mut builder = GoAwayBuilder::new(BuildContext::new(Role::Server, false));
        builder
            .set_error_code(ErrorCode::EnhanceYourCalm)
            .unwrap()
            .set_debug_data(&b"too many requests"[..])
            .unwrap();
        let frame = builder.build().unwrap();
        assert_eq!(frame.payload_size(), 8 + 17);
        assert_eq!(&frame.debug_data().unwrap()[..], b"too many requests");
    }

    #[test]
    fn test_goaway_empty_debug_data_is_none() {
        let mut builder = GoAwayBuilder::new(BuildContext::default());
        builder
            .set_error_code(ErrorCode::NoError)
            .unwrap()
            .set_debug_data(Bytes::new())
            .unwrap();
        assert_eq!(builder.build().unwrap().debug_data(), None);
    }

    #[test]
    fn test_goaway_last_stream_parity() {
        // A client's GOAWAY names the last server-initiated stream
        let mut builder = GoAwayBuilder::new(BuildContext::new(Role::Client, false));
        assert!(matches!(
            builder.set_last_stream_id(3),
            Err(FrameError::StreamParity {
                expected: Parity::Even,
                ..
            })
        ));
        assert!(builder.set_last_stream_id(2).is_ok());
        assert!(builder.set_last_stream_id(0).is_ok());
    }

    #[test]
    fn test_goaway_minimum_payload() {
        let mut builder = GoAwayBuilder::new(BuildContext::default());
        assert!(matches!(
            builder.set_payload_size(7),
            Err(FrameError::PayloadTooShort { minimum: 8, .. })
        ));
    }

    #[test]
    fn test_goaway_requires_error_code() {
        let builder = GoAwayBuilder::new(BuildContext::default());
        assert!(matches!(
            builder.build(),
            Err(FrameError::MissingField { .. })
        ));
    }

    #[test]
    fn test_goaway_nonzero_stream() {
        let mut builder = GoAwayBuilder::new(BuildContext::default());
        builder
            .set_stream_id(1)
            .unwrap()
            .set_error_code(ErrorCode::NoError)
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(FrameError::StreamIdMustBeZero { .. })
        ));
    }
}
