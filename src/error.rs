//! Error types for audio loading.
//!
//! Every variant names the offending path so a failing leaf in a large
//! recursive load can be located from the message alone.

use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for audio loading operations.
pub type Result<T> = std::result::Result<T, AudioError>;

/// Why a `::[...]` slice annotation could not be parsed.
#[derive(Debug, Error)]
pub enum SliceError {
    /// The annotation contains whitespace.
    #[error("slice annotation {annotation:?} contains whitespace")]
    Whitespace {
        /// The annotation as written.
        annotation: String,
    },

    /// The annotation does not match `[start:stop,channel]`.
    #[error("slice annotation {annotation:?} does not match [start:stop,channel]")]
    NoMatch {
        /// The annotation as written.
        annotation: String,
    },

    /// A bound does not fit into a sample index.
    #[error("invalid slice bound: {0}")]
    Bound(#[from] ParseIntError),
}

/// Errors that can occur while resolving, decoding or selecting audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Malformed slice annotation.
    #[error("malformed slice annotation in {path}")]
    Format {
        /// Annotated path.
        path: String,
        /// What was wrong with the annotation.
        #[source]
        source: SliceError,
    },

    /// Bad parameter or parameter combination.
    #[error("invalid argument for {path}: {reason}")]
    InvalidArgument {
        /// Path or config the argument applied to.
        path: String,
        /// What was wrong.
        reason: String,
    },

    /// Valid request that this loader cannot serve.
    #[error("not supported for {path}: {reason}")]
    NotSupported {
        /// Requested path.
        path: String,
        /// What is unsupported.
        reason: String,
    },

    /// The file's sample rate differs from the expected one.
    #[error("requested sampling rate is {expected} but the audiofile {path} has {actual}")]
    SampleRateMismatch {
        /// Loaded path.
        path: String,
        /// Requested sample rate.
        expected: u32,
        /// Sample rate of the file.
        actual: u32,
    },

    /// The decoder rejected the file. `message` carries the content probe.
    #[error("{message}")]
    Decode {
        /// Decoded path.
        path: String,
        /// Human-readable summary including what the file contains.
        message: String,
        /// Decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No target dtype is known for the file's native encoding.
    #[error("no dtype mapping for subtype {subtype} of {path}")]
    UnsupportedSubtype {
        /// Loaded path.
        path: String,
        /// Native encoding of the file.
        subtype: String,
    },

    /// I/O error while opening or reading a file.
    #[error("io error for {path}: {source}")]
    Io {
        /// Path being opened or read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Loader configuration could not be read.
    #[error("invalid loader config {path}: {source}")]
    Config {
        /// Config file.
        path: String,
        /// YAML syntax error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl AudioError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a not supported error.
    #[must_use]
    pub fn not_supported(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotSupported {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error.
    #[must_use]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Format { path, .. }
            | Self::InvalidArgument { path, .. }
            | Self::NotSupported { path, .. }
            | Self::SampleRateMismatch { path, .. }
            | Self::Decode { path, .. }
            | Self::UnsupportedSubtype { path, .. }
            | Self::Io { path, .. }
            | Self::Config { path, .. } => path,
        }
    }
}
