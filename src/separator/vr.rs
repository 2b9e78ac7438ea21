//! Vocal-removal backends (standard and echo-removal variants).

use crate::audio::decode_audio_file;
use crate::config::{InferenceDevice, StemFormat};
use crate::constants::{VR_WINDOW_SECS, canonical};
use crate::error::{Error, Result};
use crate::separator::model::OnnxStemModel;
use crate::separator::stems::StemPair;
use crate::separator::Separator;
use std::path::Path;
use tracing::{debug, info};

/// Frames per inference window.
const fn window_frames() -> usize {
    (VR_WINDOW_SECS * canonical::SAMPLE_RATE_HZ) as usize
}

/// Decode, run the model, and weight the residual by aggressiveness.
///
/// The model emits (instrumental, vocals). The residual between the mix and
/// the stem sum is assigned proportionally: higher aggressiveness pushes more
/// of it into the vocal stem.
fn run_separation(
    model: &mut OnnxStemModel,
    input: &Path,
    aggressiveness: u32,
) -> Result<StemPair> {
    let decoded = decode_audio_file(input)?;
    let sample_rate = decoded.sample_rate;
    let stereo = decoded.into_stereo();

    let (mut instrumental, mut vocals) = model.run_windows(&stereo, window_frames(), input)?;

    #[allow(clippy::cast_precision_loss)]
    let bias = aggressiveness as f32 / 100.0;
    let len = stereo.len().min(vocals.len()).min(instrumental.len());
    for i in 0..len {
        let residual = stereo[i] - vocals[i] - instrumental[i];
        vocals[i] += residual * bias;
        instrumental[i] += residual * (1.0 - bias);
    }
    vocals.truncate(len);
    instrumental.truncate(len);

    Ok(StemPair {
        sample_rate,
        vocals,
        instrumental,
    })
}

/// Stem name for an input file, without its extension.
fn base_name(input: &Path) -> String {
    input.file_stem().map_or_else(
        || "output".to_string(),
        |s| s.to_string_lossy().into_owned(),
    )
}

/// Standard vocal/instrumental separation backend.
pub struct VocalRemover {
    model: Option<OnnxStemModel>,
    aggressiveness: u32,
    device: InferenceDevice,
}

impl VocalRemover {
    /// Load the model from `weights` onto `device`.
    pub fn new(aggressiveness: u32, weights: &Path, device: InferenceDevice) -> Result<Self> {
        info!("Loading vocal removal model: {}", weights.display());
        Ok(Self {
            model: Some(OnnxStemModel::load(weights, device)?),
            aggressiveness,
            device,
        })
    }
}

impl Separator for VocalRemover {
    fn separate(
        &mut self,
        input: &Path,
        vocal_dir: &Path,
        instrumental_dir: &Path,
        format: StemFormat,
        variant: bool,
    ) -> Result<()> {
        let model = self.model.as_mut().ok_or(Error::BackendReleased)?;
        debug!(
            "Separating {} (device={:?}, agg={})",
            input.display(),
            self.device,
            self.aggressiveness
        );

        let mut pair = run_separation(model, input, self.aggressiveness)?;
        if variant {
            // HP3 weights are trained with the stem targets swapped
            std::mem::swap(&mut pair.vocals, &mut pair.instrumental);
        }

        pair.write(vocal_dir, instrumental_dir, &base_name(input), format)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.model = None;
        Ok(())
    }
}

/// Echo-removal variant: the vocal output directory receives the de-echoed
/// vocal, the instrumental directory the echo residue.
pub struct EchoRemover {
    model: Option<OnnxStemModel>,
    aggressiveness: u32,
    device: InferenceDevice,
}

impl EchoRemover {
    /// Load the model from `weights` onto `device`.
    pub fn new(aggressiveness: u32, weights: &Path, device: InferenceDevice) -> Result<Self> {
        info!("Loading echo removal model: {}", weights.display());
        Ok(Self {
            model: Some(OnnxStemModel::load(weights, device)?),
            aggressiveness,
            device,
        })
    }
}

impl Separator for EchoRemover {
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
            "De-echoing {} (device={:?}, agg={})",
            input.display(),
            self.device,
            self.aggressiveness
        );

        let pair = run_separation(model, input, self.aggressiveness)?;
        pair.write(vocal_dir, instrumental_dir, &base_name(input), format)?;
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
    fn test_base_name_strips_extension() {
        assert_eq!(base_name(Path::new("/in/track.wav")), "track");
        assert_eq!(base_name(Path::new("song.reformatted.wav")), "song.reformatted");
    }

    #[test]
    fn test_new_missing_weights_fails() {
        let result = VocalRemover::new(10, Path::new("/no/weights.onnx"), InferenceDevice::Cpu);
        assert!(result.is_err());
    }
}
