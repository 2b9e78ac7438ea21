//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "stemsep";

/// Default aggressiveness for the vocal-removal backends.
pub const DEFAULT_AGGRESSIVENESS: u32 = 10;

/// Maximum allowed aggressiveness value.
pub const MAX_AGGRESSIVENESS: u32 = 20;

/// Canonical audio format the separation models are trained on.
pub mod canonical {
    /// Required channel count.
    pub const CHANNELS: u32 = 2;

    /// Required sample rate as ffprobe reports it (string-typed field).
    pub const SAMPLE_RATE: &str = "44100";

    /// Required sample rate in Hz.
    pub const SAMPLE_RATE_HZ: u32 = 44_100;
}

/// Model-name sentinels that select a backend variant.
pub mod model_names {
    /// Exact name selecting the MDX-Net dereverberation backend.
    pub const DEREVERB: &str = "onnx_dereverb_By_FoxJoy";

    /// Substring marking the echo-removal backend variant.
    pub const DEECHO_MARKER: &str = "DeEcho";

    /// Substring marking the HP3 pretrained variant.
    pub const HP3_MARKER: &str = "HP3";
}

/// Extension appended to a model name to locate its weights file.
pub const WEIGHTS_EXTENSION: &str = ".onnx";

/// Weights filename for the dereverberation backend, inside its model
/// directory under the weights root.
pub const DEREVERB_WEIGHTS_FILE: &str = "vocals.onnx";

/// Fixed chunk count for the dereverberation backend.
pub const DEREVERB_CHUNKS: usize = 15;

/// Suffix appended to the basename of a transcoded temp file.
pub const REFORMATTED_SUFFIX: &str = ".reformatted.wav";

/// Inference window length in seconds for the vocal-removal backends.
pub const VR_WINDOW_SECS: u32 = 20;

/// Filename prefixes for written stems.
pub mod stem_prefixes {
    /// Vocal stem prefix.
    pub const VOCAL: &str = "vocal_";
    /// Instrumental stem prefix.
    pub const INSTRUMENT: &str = "instrument_";
}
