//! Media format probing via ffprobe.

use crate::constants::canonical;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Parsed probe result: the audio streams of a media file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeInfo {
    /// Audio streams in declaration order.
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
}

/// Format fields of a single audio stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamInfo {
    /// Channel count.
    #[serde(default)]
    pub channels: Option<u32>,
    /// Sample rate; ffprobe reports this as a string.
    #[serde(default)]
    pub sample_rate: Option<String>,
}

impl ProbeInfo {
    /// Whether the first audio stream already matches the canonical model
    /// input format (stereo, 44.1 kHz). The sample rate is compared as the
    /// string ffprobe reports.
    pub fn is_canonical(&self) -> bool {
        self.streams.first().is_some_and(|s| {
            s.channels == Some(canonical::CHANNELS)
                && s.sample_rate.as_deref() == Some(canonical::SAMPLE_RATE)
        })
    }
}

/// Probes media files for stream format information.
pub trait MediaProber {
    /// Probe a file, returning its audio stream layout.
    fn probe(&self, path: &Path) -> Result<ProbeInfo>;
}

/// `MediaProber` backed by the external `ffprobe` tool.
#[derive(Debug, Default)]
pub struct Ffprobe;

impl MediaProber for Ffprobe {
    fn probe(&self, path: &Path) -> Result<ProbeInfo> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "a",
                "-show_streams",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| Error::Probe {
                path: path.to_path_buf(),
                reason: format!("failed to spawn ffprobe: {e}"),
            })?;

        if !output.status.success() {
            return Err(Error::Probe {
                path: path.to_path_buf(),
                reason: format!(
                    "ffprobe exited with status {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| Error::ProbeParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
