//! Writing separated stems to the output directories.

use crate::config::StemFormat;
use crate::constants::{canonical, stem_prefixes};
use crate::error::{Error, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::warn;

/// A vocal/instrumental stem pair, interleaved stereo f32.
#[derive(Debug, Clone)]
pub struct StemPair {
    /// Sample rate of both stems.
    pub sample_rate: u32,
    /// Vocal stem.
    pub vocals: Vec<f32>,
    /// Instrumental stem.
    pub instrumental: Vec<f32>,
}

impl StemPair {
    /// Write both stems, the vocal one under `vocal_dir` and the
    /// instrumental one under `instrumental_dir`.
    ///
    /// Stems are written as WAV first; other formats are converted in place
    /// with ffmpeg.
    pub fn write(
        &self,
        vocal_dir: &Path,
        instrumental_dir: &Path,
        base_name: &str,
        format: StemFormat,
    ) -> Result<(PathBuf, PathBuf)> {
        let vocal = write_stem(
            &self.vocals,
            self.sample_rate,
            vocal_dir,
            &format!("{}{base_name}", stem_prefixes::VOCAL),
            format,
        )?;
        let instrumental = write_stem(
            &self.instrumental,
            self.sample_rate,
            instrumental_dir,
            &format!("{}{base_name}", stem_prefixes::INSTRUMENT),
            format,
        )?;
        Ok((vocal, instrumental))
    }
}

/// Write one interleaved stereo stem, converting to the requested format.
fn write_stem(
    samples: &[f32],
    sample_rate: u32,
    dir: &Path,
    stem_name: &str,
    format: StemFormat,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreate {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let wav_path = dir.join(format!("{stem_name}.wav"));
    #[allow(clippy::cast_possible_truncation)]
    let channels = canonical::CHANNELS as u16;
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(&wav_path, spec).map_err(|e| Error::StemWrite {
        path: wav_path.clone(),
        source: e,
    })?;
    for &sample in samples {
        writer.write_sample(sample).map_err(|e| Error::StemWrite {
            path: wav_path.clone(),
            source: e,
        })?;
    }
    writer.finalize().map_err(|e| Error::StemWrite {
        path: wav_path.clone(),
        source: e,
    })?;

    if format == StemFormat::Wav {
        return Ok(wav_path);
    }
    Ok(convert_in_place(&wav_path, format))
}

/// Convert a written WAV to the requested format next to it, removing the
/// WAV on success. A failed conversion keeps the WAV and returns its path.
fn convert_in_place(wav_path: &Path, format: StemFormat) -> PathBuf {
    let target = wav_path.with_extension(format.extension());

    let status = Command::new("ffmpeg")
        .arg("-i")
        .arg(wav_path)
        .arg(&target)
        .arg("-y")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => {
            if let Err(e) = std::fs::remove_file(wav_path) {
                warn!("Failed to remove intermediate {}: {e}", wav_path.display());
            }
            target
        }
        Ok(status) => {
            warn!(
                "ffmpeg conversion to {format} exited with status {:?}, keeping WAV",
                status.code()
            );
            wav_path.to_path_buf()
        }
        Err(e) => {
            warn!("Failed to spawn ffmpeg for {format} conversion: {e}, keeping WAV");
            wav_path.to_path_buf()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_wav_stem_pair() {
        let dir = TempDir::new().unwrap();
        let vocal_dir = dir.path().join("vocal");
        let instrumental_dir = dir.path().join("instrument");

        let pair = StemPair {
            sample_rate: 44_100,
            vocals: vec![0.0; 8820],
            instrumental: vec![0.0; 8820],
        };
        let (vocal, instrumental) = pair
            .write(&vocal_dir, &instrumental_dir, "track", StemFormat::Wav)
            .unwrap();

        assert!(vocal.ends_with("vocal_track.wav"));
        assert!(instrumental.ends_with("instrument_track.wav"));
        assert!(vocal.exists());
        assert!(instrumental.exists());

        let reader = hound::WavReader::open(&vocal).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 44_100);
    }

    #[test]
    fn test_write_creates_nested_output_dirs() {
        let dir = TempDir::new().unwrap();
        let vocal_dir = dir.path().join("a").join("b");
        let instrumental_dir = dir.path().join("c").join("d");

        let pair = StemPair {
            sample_rate: 44_100,
            vocals: vec![0.1, -0.1],
            instrumental: vec![0.2, -0.2],
        };
        pair.write(&vocal_dir, &instrumental_dir, "x", StemFormat::Wav)
            .unwrap();
        assert!(vocal_dir.join("vocal_x.wav").exists());
        assert!(instrumental_dir.join("instrument_x.wav").exists());
    }
}
