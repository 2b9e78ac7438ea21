//! Separation backends.
//!
//! Three mutually exclusive backends implement the [`Separator`] trait:
//! the standard vocal remover, its echo-removal variant, and the MDX-Net
//! dereverberation model. Selection is by model-name rules; construction
//! parameters come from the resolved configuration.

mod dereverb;
mod model;
mod stems;
mod vr;

pub use dereverb::MdxDereverb;
pub use stems::StemPair;
pub use vr::{EchoRemover, VocalRemover};

use crate::config::{InferenceDevice, StemFormat};
use crate::constants::{
    DEREVERB_CHUNKS, DEREVERB_WEIGHTS_FILE, WEIGHTS_EXTENSION, model_names,
};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// An audio source-separation engine producing vocal and instrumental stems.
pub trait Separator {
    /// Separate `input` into stems written under the two output directories.
    ///
    /// `variant` is the pretrained-variant flag; callers pass it only on the
    /// direct (non-reformatted) invocation. Backends that have no variant
    /// behavior ignore it.
    fn separate(
        &mut self,
        input: &Path,
        vocal_dir: &Path,
        instrumental_dir: &Path,
        format: StemFormat,
        variant: bool,
    ) -> Result<()>;

    /// Release model resources. Further `separate` calls fail.
    fn release(&mut self) -> Result<()>;
}

/// Which backend a model name selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// MDX-Net dereverberation backend.
    Dereverb,
    /// Echo-removal variant of the vocal remover.
    DeEcho,
    /// Standard vocal remover.
    Standard,
}

impl BackendKind {
    /// Select a backend by model name: exact dereverb sentinel, then the
    /// echo-removal marker substring, else the standard backend.
    pub fn for_model(model_name: &str) -> Self {
        if model_name == model_names::DEREVERB {
            Self::Dereverb
        } else if model_name.contains(model_names::DEECHO_MARKER) {
            Self::DeEcho
        } else {
            Self::Standard
        }
    }
}

/// Location of a model's weights under the weights root.
pub fn weights_path(weights_dir: &Path, model_name: &str) -> PathBuf {
    if model_name == model_names::DEREVERB {
        weights_dir.join(model_names::DEREVERB).join(DEREVERB_WEIGHTS_FILE)
    } else {
        weights_dir.join(format!("{model_name}{WEIGHTS_EXTENSION}"))
    }
}

/// Builds separation backends for a batch.
pub trait BackendFactory {
    /// Construct the backend selected by `model_name`. Not retried;
    /// construction errors abort the batch before the file loop.
    fn build(&self, model_name: &str, aggressiveness: u32) -> Result<Box<dyn Separator>>;
}

/// `BackendFactory` wired to the resolved configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredFactory {
    /// Directory holding model weights.
    pub weights_dir: PathBuf,
    /// Inference device.
    pub device: InferenceDevice,
}

impl BackendFactory for ConfiguredFactory {
    fn build(&self, model_name: &str, aggressiveness: u32) -> Result<Box<dyn Separator>> {
        let weights = weights_path(&self.weights_dir, model_name);
        match BackendKind::for_model(model_name) {
            BackendKind::Dereverb => Ok(Box::new(MdxDereverb::new(
                DEREVERB_CHUNKS,
                &weights,
                self.device,
            )?)),
            BackendKind::DeEcho => Ok(Box::new(EchoRemover::new(
                aggressiveness,
                &weights,
                self.device,
            )?)),
            BackendKind::Standard => Ok(Box::new(VocalRemover::new(
                aggressiveness,
                &weights,
                self.device,
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_dereverb_exact_match() {
        assert_eq!(
            BackendKind::for_model("onnx_dereverb_By_FoxJoy"),
            BackendKind::Dereverb
        );
        // A name merely containing the sentinel is not the dereverb backend
        assert_eq!(
            BackendKind::for_model("onnx_dereverb_By_FoxJoy_v2"),
            BackendKind::Standard
        );
    }

    #[test]
    fn test_backend_kind_deecho_substring() {
        assert_eq!(
            BackendKind::for_model("VR-DeEchoNormal"),
            BackendKind::DeEcho
        );
        assert_eq!(
            BackendKind::for_model("VR-DeEchoDeReverb"),
            BackendKind::DeEcho
        );
    }

    #[test]
    fn test_backend_kind_default_standard() {
        assert_eq!(BackendKind::for_model("HP2-vocals"), BackendKind::Standard);
        assert_eq!(BackendKind::for_model("HP5-karaoke"), BackendKind::Standard);
    }

    #[test]
    fn test_weights_path_standard() {
        let path = weights_path(Path::new("/weights"), "HP5-karaoke");
        assert_eq!(path, PathBuf::from("/weights/HP5-karaoke.onnx"));
    }

    #[test]
    fn test_weights_path_dereverb() {
        let path = weights_path(Path::new("/weights"), "onnx_dereverb_By_FoxJoy");
        assert_eq!(
            path,
            PathBuf::from("/weights/onnx_dereverb_By_FoxJoy/vocals.onnx")
        );
    }

    #[test]
    fn test_factory_missing_weights_fails() {
        let factory = ConfiguredFactory {
            weights_dir: PathBuf::from("/nonexistent-weights"),
            device: InferenceDevice::Cpu,
        };
        assert!(factory.build("HP2-vocals", 10).is_err());
    }
}
