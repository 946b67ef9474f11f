//! # paderbox-audio
//!
//! Audio loading for speech-recognition experiments.
//!
//! ## Features
//!
//! - Paths that carry their own read window: `speech.wav::[8000:16000,0]`
//! - Start/stop/frames in samples or seconds
//! - WAV via hound, FLAC/Ogg/MP3/M4A and more via symphonia
//! - `(channel, sample)` buffers with channel selection and fill-value padding
//! - Recursive loading of nested lists and maps of paths
//! - Descriptive errors that say what a file really contains
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paderbox_audio::{load_audio, ChannelSelection, LoadOptions};
//!
//! let speech = load_audio("speech.wav::[8000:16000]", &LoadOptions::new())?;
//! assert_eq!(speech.shape(), &[8000]);
//!
//! let options = LoadOptions::new().channel(ChannelSelection::List(vec![1, 3, 5]));
//! let observation = load_audio("observation.wav", &options)?;
//! assert_eq!(observation.shape(), &[3, 38520]);
//! ```

#![warn(missing_docs)]

pub mod audio;
pub mod config;
pub mod error;
pub mod utils;

// Re-exports for convenience
pub use audio::{
    load_audio, load_audio_with_sample_rate, recursive_load_audio, AudioLoader, AudioTree,
    ChannelSelection, Dtype, LoadOptions, LoadedTree, Signal, Unit,
};
pub use config::{DtypeSetting, LoaderConfig};
pub use error::{AudioError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
