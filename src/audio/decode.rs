//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio data.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved f32 samples in range [-1.0, 1.0], channels preserved.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: usize,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Interleaved stereo view of the audio: mono is duplicated onto both
    /// channels, wider layouts are downmixed to the first two channels.
    pub fn into_stereo(self) -> Vec<f32> {
        match self.channels {
            2 => self.samples,
            1 => self.samples.iter().flat_map(|&s| [s, s]).collect(),
            n => self
                .samples
                .chunks(n)
                .flat_map(|frame| {
                    let left = frame.first().copied().unwrap_or(0.0);
                    let right = frame.get(1).copied().unwrap_or(left);
                    [left, right]
                })
                .collect(),
        }
    }
}

/// Decode an audio file to interleaved f32 samples.
///
/// Supports WAV, FLAC, MP3, and AAC formats.
pub fn decode_audio_file(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    // Create hint from file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    // Probe the file
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    // Create decoder
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    // Decode all packets
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        append_interleaved(&decoded, channels, &mut samples);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Append decoded samples to the output buffer, interleaving channels.
fn append_interleaved(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::F32(buf) => {
            let frames = buf.frames();
            for i in 0..frames {
                for ch in 0..channels {
                    output.push(buf.chan(ch)[i]);
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            const I16_NORM: f32 = 32768.0;
            let frames = buf.frames();
            for i in 0..frames {
                for ch in 0..channels {
                    output.push(f32::from(buf.chan(ch)[i]) / I16_NORM);
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            const I32_NORM: f32 = 2_147_483_648.0;
            let frames = buf.frames();
            for i in 0..frames {
                for ch in 0..channels {
                    #[allow(clippy::cast_precision_loss)]
                    output.push(buf.chan(ch)[i] as f32 / I32_NORM);
                }
            }
        }
        _ => {
            // Unsupported sample format, skip
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::TempDir;

    fn write_test_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_stereo_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        write_test_wav(&path, 2, &[0, 16384, -16384, 0]);

        let decoded = decode_audio_file(&path).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.frames(), 2);
        assert!((decoded.samples[1] - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_into_stereo_duplicates_mono() {
        let decoded = DecodedAudio {
            samples: vec![0.1, 0.2],
            sample_rate: 44_100,
            channels: 1,
        };
        assert_eq!(decoded.into_stereo(), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn test_into_stereo_downmixes_wide_layouts() {
        let decoded = DecodedAudio {
            samples: vec![0.1, 0.2, 0.9, 0.3, 0.4, 0.9],
            sample_rate: 44_100,
            channels: 3,
        };
        assert_eq!(decoded.into_stereo(), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_decode_missing_file_fails() {
        assert!(decode_audio_file(Path::new("/no/such/file.wav")).is_err());
    }
}
