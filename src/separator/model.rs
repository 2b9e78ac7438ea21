//! Shared ONNX session wrapper for the separation backends.
//!
//! All backends use the same waveform interface: input `[1, 2, N]`
//! interleaved-then-planar stereo, output `[1, 2, 2, N]` where stem 0 is the
//! model's primary target and stem 1 its complement.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
use ndarray::Array3;
use ort::session::{
    Session,
    builder::{GraphOptimizationLevel, SessionBuilder},
};
use ort::value::Tensor;
use std::path::Path;
use tracing::debug;

/// One ONNX stem-separation session.
pub struct OnnxStemModel {
    session: Session,
}

impl OnnxStemModel {
    /// Load a model from its weights file onto the selected device.
    pub fn load(path: &Path, device: InferenceDevice) -> Result<Self> {
        if !path.exists() {
            return Err(Error::WeightsNotFound {
                path: path.to_path_buf(),
            });
        }

        #[cfg(not(feature = "cuda"))]
        if device == InferenceDevice::Gpu {
            return Err(Error::BackendBuild {
                model: path.display().to_string(),
                reason: "GPU inference requested but CUDA support is not compiled in \
                         (rebuild with --features cuda)"
                    .to_string(),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| with_device(b, device))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| Error::BackendBuild {
                model: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { session })
    }

    /// Run interleaved stereo audio through the model window by window,
    /// returning the concatenated interleaved (primary, complement) stems.
    pub fn run_windows(
        &mut self,
        stereo: &[f32],
        window_frames: usize,
        input_path: &Path,
    ) -> Result<(Vec<f32>, Vec<f32>)> {
        let mut primary = Vec::with_capacity(stereo.len());
        let mut complement = Vec::with_capacity(stereo.len());

        let window_samples = window_frames.max(1) * 2;
        for window in stereo.chunks(window_samples) {
            let (p, c) = self.run_window(window, input_path)?;
            primary.extend(p);
            complement.extend(c);
        }

        Ok((primary, complement))
    }

    /// Run one window of interleaved stereo audio through the model.
    fn run_window(&mut self, window: &[f32], input_path: &Path) -> Result<(Vec<f32>, Vec<f32>)> {
        let frames = window.len() / 2;
        debug!("Running inference window of {frames} frames");

        let mut input = Array3::<f32>::zeros((1, 2, frames));
        for (i, frame) in window.chunks_exact(2).enumerate() {
            input[[0, 0, i]] = frame[0];
            input[[0, 1, i]] = frame[1];
        }

        let tensor = Tensor::from_array(input).map_err(|e| Error::Separation {
            path: input_path.to_path_buf(),
            reason: format!("failed to create input tensor: {e}"),
        })?;

        let outputs = self
            .session
            .run(ort::inputs!["input" => tensor])
            .map_err(|e| Error::Separation {
                path: input_path.to_path_buf(),
                reason: format!("inference failed: {e}"),
            })?;

        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| Error::Separation {
                path: input_path.to_path_buf(),
                reason: "model produced no output tensor".to_string(),
            })?
            .1;

        let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| Error::Separation {
            path: input_path.to_path_buf(),
            reason: format!("failed to extract output tensor: {e}"),
        })?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        if dims.len() != 4 || dims[1] < 2 || dims[2] < 2 {
            return Err(Error::Separation {
                path: input_path.to_path_buf(),
                reason: format!("unexpected output shape {dims:?}, expected [1, 2, 2, N]"),
            });
        }

        #[allow(clippy::cast_sign_loss)]
        let channels = dims[2] as usize;
        #[allow(clippy::cast_sign_loss)]
        let out_frames = dims[3] as usize;

        // Flat index into the row-major [1, stems, channels, frames] tensor
        let flat = |stem: usize, ch: usize, i: usize| i + out_frames * (ch + channels * stem);
        let extract = |stem: usize| {
            let mut interleaved = Vec::with_capacity(out_frames * 2);
            for i in 0..out_frames {
                interleaved.push(data[flat(stem, 0, i)]);
                interleaved.push(data[flat(stem, 1, i)]);
            }
            interleaved
        };

        Ok((extract(0), extract(1)))
    }
}

impl std::fmt::Debug for OnnxStemModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxStemModel").finish_non_exhaustive()
    }
}

/// Register execution providers for the selected device. `Auto` registers
/// CUDA and lets ort fall back to CPU; `Gpu` turns a registration failure
/// into a session error.
#[cfg(feature = "cuda")]
fn with_device(builder: SessionBuilder, device: InferenceDevice) -> ort::Result<SessionBuilder> {
    use ort::execution_providers::CUDAExecutionProvider;

    match device {
        InferenceDevice::Cpu => Ok(builder),
        InferenceDevice::Auto => {
            builder.with_execution_providers([CUDAExecutionProvider::default().build()])
        }
        InferenceDevice::Gpu => builder.with_execution_providers([
            CUDAExecutionProvider::default().build().error_on_failure(),
        ]),
    }
}

#[cfg(not(feature = "cuda"))]
fn with_device(builder: SessionBuilder, _device: InferenceDevice) -> ort::Result<SessionBuilder> {
    Ok(builder)
}
