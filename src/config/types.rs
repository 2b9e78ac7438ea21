//! Configuration type definitions.

use crate::constants::DEFAULT_AGGRESSIVENESS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Filesystem locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Default separation settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Inference device configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Force GPU (CUDA), fail if unavailable.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}

/// Filesystem locations used by the batch job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding model weights (`<name>.onnx` files).
    /// Defaults to `uvr5_weights` under the config directory.
    pub weights_dir: Option<PathBuf>,

    /// Directory for reformatted temp files.
    /// Defaults to the platform temp directory.
    pub temp_dir: Option<PathBuf>,
}

/// Default separation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name to use.
    pub model: Option<String>,

    /// Separation aggressiveness (0-20).
    pub aggressiveness: u32,

    /// Output stem format.
    pub format: StemFormat,

    /// Output directory for vocal stems.
    pub vocal_dir: PathBuf,

    /// Output directory for instrumental stems.
    pub instrumental_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: None,
            aggressiveness: DEFAULT_AGGRESSIVENESS,
            format: StemFormat::Wav,
            vocal_dir: PathBuf::from("opt/vocal"),
            instrumental_dir: PathBuf::from("opt/instrument"),
        }
    }
}

/// Supported output stem formats, passed through to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemFormat {
    /// 32-bit float WAV.
    #[default]
    Wav,
    /// FLAC (converted from WAV via ffmpeg).
    Flac,
    /// MP3 (converted from WAV via ffmpeg).
    Mp3,
    /// MPEG-4 audio (converted from WAV via ffmpeg).
    M4a,
}

impl StemFormat {
    /// File extension for this format, without a leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
        }
    }
}

impl std::fmt::Display for StemFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for StemFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            "mp3" => Ok(Self::Mp3),
            "m4a" | "aac" => Ok(Self::M4a),
            other => Err(format!("unknown stem format: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_format_from_str() {
        assert_eq!("wav".parse::<StemFormat>().ok(), Some(StemFormat::Wav));
        assert_eq!("FLAC".parse::<StemFormat>().ok(), Some(StemFormat::Flac));
        assert_eq!("mp3".parse::<StemFormat>().ok(), Some(StemFormat::Mp3));
        assert_eq!("m4a".parse::<StemFormat>().ok(), Some(StemFormat::M4a));
        assert_eq!("aac".parse::<StemFormat>().ok(), Some(StemFormat::M4a));
        assert!("ogg".parse::<StemFormat>().is_err());
    }

    #[test]
    fn test_stem_format_display() {
        assert_eq!(StemFormat::Wav.to_string(), "wav");
        assert_eq!(StemFormat::M4a.to_string(), "m4a");
    }

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.aggressiveness, 10);
        assert_eq!(defaults.format, StemFormat::Wav);
        assert!(defaults.model.is_none());
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [inference]
            device = "gpu"

            [defaults]
            aggressiveness = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.inference.device, InferenceDevice::Gpu);
        assert_eq!(config.defaults.aggressiveness, 15);
        assert_eq!(config.defaults.format, StemFormat::Wav);
    }
}
