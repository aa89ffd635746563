//! Codec configuration.
//!
//! One [`CodecConfig`] describes the local endpoint of a connection and
//! produces the frame and HPACK codecs for it.
//!
//! ```toml
//! role = "server"
//! validate = true
//! max_frame_size = 32768
//! header_table_size = 4096
//! max_header_list_size = 65536
//! huffman = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::frame::{
    BuildContext, DEFAULT_HEADER_TABLE_SIZE, DEFAULT_MAX_FRAME_SIZE, DEFAULT_MAX_HEADER_LIST_SIZE,
    FrameDecoder, FrameEncoder, Role, SettingId, Settings,
};
use crate::hpack::{HpackDecoder, HpackEncoder};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_frame_size ({0}) must be between 16384 and 16777215")]
    MaxFrameSize(u32),
}

/// Codec configuration loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Role of the local endpoint: "client" or "server"
    #[serde(default)]
    pub role: Role,

    /// Validate frames on build and on read
    #[serde(default = "default_validate")]
    pub validate: bool,

    /// Largest frame payload we accept (SETTINGS_MAX_FRAME_SIZE)
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: u32,

    /// Size of our HPACK decoding table (SETTINGS_HEADER_TABLE_SIZE)
    #[serde(default = "default_header_table_size")]
    pub header_table_size: u32,

    /// Largest decoded header list we accept (SETTINGS_MAX_HEADER_LIST_SIZE)
    #[serde(default = "default_max_header_list_size")]
    pub max_header_list_size: u32,

    /// Huffman-code HPACK string literals when it saves space
    #[serde(default = "default_huffman")]
    pub huffman: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            role: Role::default(),
            validate: default_validate(),
            max_frame_size: default_max_frame_size(),
            header_table_size: default_header_table_size(),
            max_header_list_size: default_max_header_list_size(),
            huffman: default_huffman(),
        }
    }
}

fn default_validate() -> bool {
    true
}

fn default_max_frame_size() -> u32 {
    DEFAULT_MAX_FRAME_SIZE
}

fn default_header_table_size() -> u32 {
    DEFAULT_HEADER_TABLE_SIZE
}

fn default_max_header_list_size() -> u32 {
    DEFAULT_MAX_HEADER_LIST_SIZE
}

fn default_huffman() -> bool {
    true
}

impl CodecConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SettingId::MaxFrameSize.accepts(self.max_frame_size) {
            return Err(ConfigError::MaxFrameSize(self.max_frame_size));
        }
        Ok(())
    }

    /// Context for frames this endpoint sends.
    pub fn outbound_context(&self, request: bool) -> BuildContext {
        BuildContext::new(self.role, request).with_validation(self.validate)
    }

    /// Encoder for frames this endpoint sends. Its frame size limit stays
    /// at the protocol default until the peer's SETTINGS arrive.
    pub fn frame_encoder(&self) -> FrameEncoder {
        FrameEncoder::with_context(self.outbound_context(false))
    }

    /// Decoder for frames the peer sends.
    pub fn frame_decoder(&self) -> FrameDecoder {
        let mut decoder = FrameDecoder::for_role(self.role, self.validate);
        decoder.set_max_frame_size(self.max_frame_size);
        decoder
    }

    /// HPACK encoder for header blocks this endpoint sends.
    pub fn hpack_encoder(&self) -> HpackEncoder {
        let mut encoder = HpackEncoder::new();
        encoder.set_huffman(self.huffman);
        encoder
    }

    /// HPACK decoder for header blocks the peer sends.
    pub fn hpack_decoder(&self) -> HpackDecoder {
        let mut decoder = HpackDecoder::with_table_size(self.header_table_size as usize);
        decoder.set_max_header_list_size(self.max_header_list_size as usize);
        decoder
    }

    /// SETTINGS to announce at connection start: every value that differs
    /// from the protocol default.
    pub fn local_settings(&self) -> Settings {
        let mut settings = Settings::new();
        let values = [
            (SettingId::HeaderTableSize, self.header_table_size),
            (SettingId::MaxFrameSize, self.max_frame_size),
            (SettingId::MaxHeaderListSize, self.max_header_list_size),
        ];
        for (id, value) in values {
            if value != id.default_value() {
                settings.set(id, value);
            }
        }
        settings
    }
}
