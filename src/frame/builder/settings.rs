use super::{BuildContext, BuilderCore, FrameBuilder};
use crate::frame::error::FrameError;
use crate::frame::types::{FrameType, SettingId, Settings, SettingsFrame, flags};

/// Builder for SETTINGS frames.
#[derive(Debug)]
pub struct SettingsBuilder {
    core: BuilderCore,
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            core: BuilderCore::new(FrameType::Settings, ctx),
            settings: Settings::new(),
        }
    }

    /// Set one parameter. With validation, values outside the legal range
    /// for the parameter are rejected.
    pub fn set_parameter(&mut self, id: SettingId, value: u32) -> Result<&mut Self, FrameError> {
        if self.core.validate() && !id.accepts(value) {
            return Err(FrameError::InvalidSettingValue { id, value });
        }
        self.settings.set(id, value);
        Ok(self)
    }

    /// Set every parameter present in `settings`.
    pub fn set_settings(&mut self, settings: &Settings) -> Result<&mut Self, FrameError> {
        for setting in settings.iter() {
            self.set_parameter(setting.id, setting.value)?;
        }
        Ok(self)
    }

    /// Populate all six parameters with their initial values.
    pub fn set_defaults(&mut self) -> Result<&mut Self, FrameError> {
        self.settings = Settings::defaults();
        Ok(self)
    }
}

impl FrameBuilder for SettingsBuilder {
    type Frame = SettingsFrame;

    fn core(&mut self) -> &mut BuilderCore {
        &mut self.core
    }

    fn build(self) -> Result<SettingsFrame, FrameError> {
        if self.core.has_flag(flags::ACK) && !self.settings.is_empty() && self.core.validate() {
            return Err(FrameError::AckWithSettings);
        }

        let header = self.core.finish(6 * self.settings.len() as u64)?;
        Ok(SettingsFrame {
            header,
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::error::ErrorKind;

    #[test]
    fn test_settings_build() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        builder
            .set_parameter(SettingId::MaxConcurrentStreams, 250)
            .unwrap()
            .set_parameter(SettingId::InitialWindowSize, 1 << 20)
            .unwrap();
        let frame = builder.build().unwrap();

        assert!(!frame.is_ack());
        assert_eq!(frame.payload_size(), 12);
        assert_eq!(
            frame.settings().get(SettingId::MaxConcurrentStreams),
            Some(250)
        );
        assert_eq!(frame.settings().get(SettingId::HeaderTableSize), None);
    }

    #[test]
    fn test_settings_defaults() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        builder.set_defaults().unwrap();
        let frame = builder.build().unwrap();
        assert_eq!(frame.payload_size(), 36);
        assert_eq!(frame.settings().len(), 6);
    }

    #[test]
    fn test_settings_ack() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        builder.set_flags(flags::ACK).unwrap();
        let frame = builder.build().unwrap();
        assert!(frame.is_ack());
        assert_eq!(frame.payload_size(), 0);
    }

    #[test]
    fn test_settings_ack_with_parameters() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        builder
            .set_flags(flags::ACK)
            .unwrap()
            .set_parameter(SettingId::EnablePush, 0)
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err, FrameError::AckWithSettings);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_settings_invalid_values() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        assert!(matches!(
            builder.set_parameter(SettingId::EnablePush, 2),
            Err(FrameError::InvalidSettingValue {
                id: SettingId::EnablePush,
                value: 2
            })
        ));
        assert!(builder.set_parameter(SettingId::MaxFrameSize, 1000).is_err());
        assert!(
            builder
                .set_parameter(SettingId::InitialWindowSize, 0x8000_0000)
                .is_err()
        );
    }

    #[test]
    fn test_settings_payload_multiple_of_six() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        assert!(matches!(
            builder.set_payload_size(7),
            Err(FrameError::InvalidSettingsLength { actual: 7 })
        ));
        assert!(builder.set_payload_size(12).is_ok());
    }

    #[test]
    fn test_settings_nonzero_stream() {
        let mut builder = SettingsBuilder::new(BuildContext::default());
        builder.set_stream_id(1).unwrap();
        assert!(matches!(
            builder.build(),
            Err(FrameError::StreamIdMustBeZero {
                frame_type: FrameType::Settings
            })
        ));
    }
}
