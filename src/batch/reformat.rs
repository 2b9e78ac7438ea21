//! Fallback transcoding to the canonical PCM format.

use crate::constants::canonical;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::warn;

/// Transcodes media files to canonical 16-bit PCM stereo 44.1 kHz WAV.
///
/// Transcoding is fire-and-forget: failures are logged but never propagated.
/// A missing output file surfaces later as an invoke failure on the
/// reformatted path.
pub trait Transcoder {
    /// Transcode `input` to a canonical WAV at `output`, overwriting it.
    fn to_canonical_wav(&self, input: &Path, output: &Path);
}

/// `Transcoder` backed by the external `ffmpeg` tool.
#[derive(Debug, Default)]
pub struct FfmpegTranscoder;

impl Transcoder for FfmpegTranscoder {
    fn to_canonical_wav(&self, input: &Path, output: &Path) {
        let status = Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .args([
                "-vn",
                "-acodec",
                "pcm_s16le",
                "-ac",
                &canonical::CHANNELS.to_string(),
                "-ar",
                canonical::SAMPLE_RATE,
            ])
            .arg(output)
            .arg("-y")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if !status.success() => {
                warn!(
                    "ffmpeg reformat of {} exited with status {:?}",
                    input.display(),
                    status.code()
                );
            }
            Err(e) => {
                warn!("Failed to spawn ffmpeg for {}: {e}", input.display());
            }
            Ok(_) => {
                crate::cleanup::register_temp(output);
            }
        }
    }
}
