//! Audio loading
//!
//! - Slice annotations in paths (`speech.wav::[8000:16000,0]`)
//! - Sample/second unit resolution
//! - Decoding via hound (WAV) and symphonia (FLAC, Ogg, MP3, M4A, ...)
//! - `(channel, sample)` signals with channel selection and padding
//! - Recursive loading of nested path collections
//! - Metadata, raw PCM and WAV output helpers

mod codec;
mod dtype;
mod info;
mod loader;
mod output;
mod probe;
mod raw;
mod recursive;
mod request;
mod signal;
mod slice;
mod source;
mod wav;

pub use dtype::{Dtype, RawSamples, Subtype};
pub use info::{audio_channels, audio_duration, audio_info, audio_length, audio_shape, AudioInfo};
pub use loader::{load_audio, load_audio_with_sample_rate, open_audio_source, AudioLoader};
pub use output::AudioOutput;
pub use probe::{describe_bytes, describe_file, is_nist_sphere_file};
pub use raw::{read_from_byte_string, read_raw};
pub use recursive::{recursive_load_audio, AudioTree, LoadedTree};
pub use request::{AudioRequest, ChannelSelection, LoadOptions, Unit};
pub use signal::Signal;
pub use slice::{parse_audio_slice, SlicedPath, SLICE_DELIMITER};
pub use source::{Backend, DecodeFailure, DecodeResult, SoundSource, SourceInfo};
