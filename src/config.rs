//! Configuration constants and types for pixpack.

use serde::{Deserialize, Serialize};

/// Bytes carried by one RGB pixel.
pub const CHANNEL_COUNT: usize = 3;

/// Width of the big-endian content length field of a record.
pub const LENGTH_FIELD_WIDTH: usize = 4;

/// Longest container name a record can carry (1-byte length prefix).
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Largest file a record can carry (4-byte length prefix).
pub const MAX_CONTENT_LEN: u64 = u32::MAX as u64;

/// Extension of the images written and accepted, compared case-insensitively.
pub const IMAGE_EXTENSION: &str = "png";

/// Separator used inside container names, independent of the host platform.
pub const NAME_SEPARATOR: char = '/';

/// Default cap on the decoded RGB buffer of a single image (1 GiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 1 << 30;

/// Zlib effort used when saving the canvas. All levels are lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl std::str::FromStr for PngCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(PngCompression::Fast),
            "default" => Ok(PngCompression::Default),
            "best" => Ok(PngCompression::Best),
            other => Err(format!("unknown compression level: {}", other)),
        }
    }
}

impl From<PngCompression> for png::Compression {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        }
    }
}

/// Settings shared by encode and decode runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Compression used when the canvas is saved.
    pub compression: PngCompression,

    /// Upper bound on the decoded RGB buffer of one candidate image.
    pub max_image_bytes: u64,

    /// Replace files that already exist in the output directory.
    pub overwrite: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            compression: PngCompression::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            overwrite: true,
        }
    }
}

impl ConvertConfig {
    /// Load a configuration from a JSON document.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(crate::Error::Config)?;
        Ok(config)
    }

    /// Load a configuration file written as JSON.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_image_bytes < CHANNEL_COUNT as u64 {
            return Err(format!(
                "max_image_bytes must be at least {} (one pixel)",
                CHANNEL_COUNT
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ConvertConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.overwrite);
        assert_eq!(config.compression, PngCompression::Default);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ConvertConfig::from_json(r#"{ "compression": "best" }"#).unwrap();
        assert_eq!(config.compression, PngCompression::Best);
        assert_eq!(config.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_invalid_json_limit_rejected() {
        let result = ConvertConfig::from_json(r#"{ "max_image_bytes": 1 }"#);
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pixpack.json");
        std::fs::write(&path, r#"{ "overwrite": false }"#).unwrap();

        let config = ConvertConfig::from_file(&path).unwrap();
        assert!(!config.overwrite);

        let missing = ConvertConfig::from_file(&dir.path().join("absent.json"));
        assert_eq!(missing.unwrap_err().kind(), crate::ErrorKind::Io);
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!("FAST".parse::<PngCompression>(), Ok(PngCompression::Fast));
        assert!("ultra".parse::<PngCompression>().is_err());
    }
}
