//! MDX-Net dereverberation backend.

use crate::audio::decode_audio_file;
use crate::config::{InferenceDevice, StemFormat};
use crate::error::{Error, Result};
use crate::separator::Separator;
use crate::separator::model::OnnxStemModel;
use crate::separator::stems::StemPair;
use std::path::Path;
use tracing::{debug, info};

/// Dereverberation backend. Splits the input into a fixed number of chunks
/// per file instead of fixed-length windows; the dry signal goes to the vocal
/// directory, the reverb tail to the instrumental directory.
pub struct MdxDereverb {
    model: Option<OnnxStemModel>,
    chunks: usize,
    device: InferenceDevice,
}

impl MdxDereverb {
    /// Load the dereverberation model from `weights` onto `device`.
    pub fn new(chunks: usize, weights: &Path, device: InferenceDevice) -> Result<Self> {
        info!("Loading dereverberation model: {}", weights.display());
        Ok(Self {
            model: Some(OnnxStemModel::load(weights, device)?),
            chunks: chunks.max(1),
            device,
        })
    }
}

impl Separator for MdxDereverb {
    fn separate(
        &mut self,
        input: &Path,
        vocal_dir: &Path,
        instrumental_dir: &Path,
        format: StemFormat,
        _variant: bool,
    ) -> Result<()> {
        let model = self.model.as_mut().ok_or(Error::BackendReleased)?;
        debug!(
            "Dereverberating {} in {} chunks on {:?}",
            input.display(),
            self.chunks,
            self.device
        );

        let decoded = decode_audio_file(input)?;
        let sample_rate = decoded.sample_rate;
        let stereo = decoded.into_stereo();
        let frames = stereo.len() / 2;
        let window_frames = frames.div_ceil(self.chunks).max(1);

        let (dry, reverb) = model.run_windows(&stereo, window_frames, input)?;

        let base = input.file_stem().map_or_else(
            || "output".to_string(),
            |s| s.to_string_lossy().into_owned(),
        );
        StemPair {
            sample_rate,
            vocals: dry,
            instrumental: reverb,
        }
        .write(vocal_dir, instrumental_dir, &base, format)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.model = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_missing_weights_fails() {
        let result = MdxDereverb::new(15, Path::new("/no/vocals.onnx"), InferenceDevice::Cpu);
        assert!(result.is_err());
    }
}
