//! File metadata without decoding samples

use std::path::Path;

use super::dtype::Subtype;
use super::loader::open_audio_source;
use crate::error::{AudioError, Result};
use crate::utils::normalize_path;

/// Stream parameters of an audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    /// Frames per second.
    pub sample_rate: u32,
    /// Channels per frame.
    pub channels: usize,
    /// Length in frames.
    pub frames: u64,
    /// Native sample encoding.
    pub subtype: Subtype,
}

impl AudioInfo {
    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate)
    }

    /// Shape [`load_audio`](super::load_audio) returns for the whole file:
    /// `[frames]` for mono, `[channels, frames]` otherwise.
    pub fn shape(&self) -> Vec<usize> {
        if self.channels == 1 {
            vec![self.frames as usize]
        } else {
            vec![self.channels, self.frames as usize]
        }
    }
}

/// Read the stream parameters of `path`.
///
/// Only containers that do not state their length are decoded.
pub fn audio_info<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
    let path = normalize_path(path);
    let mut source = open_audio_source(&path)?;
    let frames = source.frames().map_err(|e| AudioError::Decode {
        path: path.clone(),
        message: format!("Could not determine the length of {path}"),
        source: Box::new(e),
    })?;
    let info = source.info();
    Ok(AudioInfo {
        sample_rate: info.sample_rate,
        channels: info.channels,
        frames,
        subtype: info.subtype.clone(),
    })
}

/// Number of frames in `path`.
pub fn audio_length<P: AsRef<Path>>(path: P) -> Result<u64> {
    audio_info(path).map(|info| info.frames)
}

/// Length of `path` in seconds.
pub fn audio_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
    audio_info(path).map(|info| info.duration())
}

/// Number of channels in `path`.
pub fn audio_channels<P: AsRef<Path>>(path: P) -> Result<usize> {
    audio_info(path).map(|info| info.channels)
}

/// Shape of the signal stored in `path`, see [`AudioInfo::shape`].
pub fn audio_shape<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    audio_info(path).map(|info| info.shape())
}
