//! Error types for stemsep.

/// Result type alias for stemsep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for stemsep.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No input files or directories were supplied.
    #[error("no input files or directories supplied")]
    NoInputs,

    /// No model was specified on the CLI or in configuration.
    #[error("no model specified (use -m or set defaults.model in config)")]
    ModelNotSpecified,

    /// Failed to read a path manifest file.
    #[error("failed to read path manifest '{path}'")]
    ManifestRead {
        /// Path to the manifest file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a path manifest file.
    #[error("failed to parse path manifest '{path}'")]
    ManifestParse {
        /// Path to the manifest file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Model weights file does not exist.
    #[error("model weights not found: {path}")]
    WeightsNotFound {
        /// Path to the missing weights file.
        path: std::path::PathBuf,
    },

    /// Failed to build a separation backend.
    #[error("failed to build separation backend '{model}': {reason}")]
    BackendBuild {
        /// Model name the backend was built for.
        model: String,
        /// Description of the build failure.
        reason: String,
    },

    /// Separation inference failed.
    #[error("separation failed for '{path}': {reason}")]
    Separation {
        /// Path to the input file.
        path: std::path::PathBuf,
        /// Description of the inference failure.
        reason: String,
    },

    /// Backend was invoked after its resources were released.
    #[error("separation backend already released")]
    BackendReleased,

    /// Media probe failed.
    #[error("failed to probe '{path}': {reason}")]
    Probe {
        /// Path to the probed file.
        path: std::path::PathBuf,
        /// Description of the probe failure.
        reason: String,
    },

    /// Failed to parse probe output.
    #[error("failed to parse probe output for '{path}'")]
    ProbeParse {
        /// Path to the probed file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to write a stem file.
    #[error("failed to write stem file '{path}'")]
    StemWrite {
        /// Path to the stem file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreate {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Render the error with its full source chain.
    ///
    /// Result-log failure lines carry the whole chain so a caller reading
    /// only the log can still see the root cause.
    pub fn detail(&self) -> String {
        use std::error::Error as _;

        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
