//! Common interface of the decoding backends

use std::fs::File;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use super::codec::CodecSource;
use super::dtype::{RawSamples, Subtype};
use super::wav::WavSource;

/// Failure inside a decoder, before it is enriched with a file probe.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    /// hound rejected the file.
    #[error("wav decoder: {0}")]
    Wav(#[from] hound::Error),

    /// symphonia rejected the file.
    #[error("codec decoder: {0}")]
    Codec(#[from] symphonia::core::errors::Error),

    /// The stream decoded but is not usable.
    #[error("{0}")]
    Stream(&'static str),
}

/// Result of a decoder call.
pub type DecodeResult<T> = std::result::Result<T, DecodeFailure>;

/// Stream parameters known after opening, without decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    /// Frames per second.
    pub sample_rate: u32,
    /// Channels per frame.
    pub channels: usize,
    /// Length in frames, if the container states it.
    pub frames: Option<u64>,
    /// Native sample encoding.
    pub subtype: Subtype,
}

/// An opened audio file that can serve one bounded read.
///
/// Dropping the source closes the file.
pub trait SoundSource {
    /// Stream parameters read when the source was opened.
    fn info(&self) -> &SourceInfo;

    /// Number of frames in the stream. May decode the whole stream when the
    /// container does not state its length.
    fn frames(&mut self) -> DecodeResult<u64>;

    /// Read up to `frames` interleaved frames starting at frame `start`.
    /// Returns fewer frames when the stream ends first.
    fn read(&mut self, start: u64, frames: u64) -> DecodeResult<RawSamples>;
}

/// Which backend handles a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// hound, with a symphonia fallback for encodings hound rejects.
    Wav,
    /// symphonia with automatic format detection.
    Codec,
    /// symphonia, samples read as 16-bit and scaled by 1/32768.
    Lossy,
}

impl Backend {
    /// Choose a backend from the file extension.
    pub fn for_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("wav") => Self::Wav,
            Some("m4a") => Self::Lossy,
            _ => Self::Codec,
        }
    }
}

/// Lowercase extension of `path`.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Open `path` with `backend`, reading from the already opened `file`.
pub fn open_source(path: &Path, backend: Backend, file: File) -> DecodeResult<Box<dyn SoundSource>> {
    let ext = extension(path);
    match backend {
        Backend::Wav => match WavSource::open(file) {
            Ok(source) => Ok(Box::new(source)),
            // hound reports encodings it does not implement (e.g. 64-bit
            // float) either as unsupported or as a format error.
            Err(e @ (hound::Error::Unsupported | hound::Error::FormatError(_))) => {
                warn!(path = %path.display(), error = %e, "wav encoding not readable by hound, retrying with symphonia");
                let file = File::open(path).map_err(hound::Error::IoError)?;
                let source = CodecSource::open(file, ext.as_deref(), false)?;
                Ok(Box::new(source))
            }
            Err(e) => Err(e.into()),
        },
        Backend::Codec | Backend::Lossy => {
            let lossy = backend == Backend::Lossy;
            debug!(path = %path.display(), lossy, "opening with symphonia");
            let source = CodecSource::open(file, ext.as_deref(), lossy)?;
            Ok(Box::new(source))
        }
    }
}
