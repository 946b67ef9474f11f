//! Writing signals to WAV files

use std::path::Path;

use ndarray::ArrayD;

use super::signal::Signal;
use crate::error::{AudioError, Result};

/// Audio output handler
pub struct AudioOutput;

impl AudioOutput {
    /// Save a `(sample,)` or `(channel, sample)` signal to a WAV file.
    ///
    /// `Int16` and `Int32` are written as PCM of that width, floating point
    /// signals as 32-bit float.
    pub fn save<P: AsRef<Path>>(signal: &Signal, sample_rate: u32, path: P) -> Result<()> {
        let path = path.as_ref();
        let label = path.display().to_string();
        match signal {
            Signal::Int16(a) => {
                let (channels, samples) = interleave(a, &label)?;
                write(path, spec(channels, sample_rate, 16, false), samples)
            }
            Signal::Int32(a) => {
                let (channels, samples) = interleave(a, &label)?;
                write(path, spec(channels, sample_rate, 32, false), samples)
            }
            Signal::Float32(a) => {
                let (channels, samples) = interleave(a, &label)?;
                write(path, spec(channels, sample_rate, 32, true), samples)
            }
            Signal::Float64(a) => {
                let (channels, samples) = interleave(&a.mapv(|s| s as f32), &label)?;
                write(path, spec(channels, sample_rate, 32, true), samples)
            }
        }
    }

    /// Save mono float samples as 16-bit PCM, clamping to full scale.
    pub fn save_pcm16<P: AsRef<Path>>(samples: &[f32], sample_rate: u32, path: P) -> Result<()> {
        let pcm = samples
            .iter()
            .map(|&s| (s * 32767.0).clamp(-32767.0, 32767.0) as i16)
            .collect();
        write(path.as_ref(), spec(1, sample_rate, 16, false), pcm)
    }
}

fn spec(channels: u16, sample_rate: u32, bits_per_sample: u16, float: bool) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format: if float {
            hound::SampleFormat::Float
        } else {
            hound::SampleFormat::Int
        },
    }
}

/// Frame-major samples of a 1-D or `(channel, sample)` array.
fn interleave<T: Copy>(signal: &ArrayD<T>, label: &str) -> Result<(u16, Vec<T>)> {
    let channels = match signal.ndim() {
        1 => 1,
        2 => signal.shape()[0],
        n => {
            return Err(AudioError::invalid_argument(
                label,
                format!("cannot write a {n}-dimensional signal"),
            ))
        }
    };
    let channels = u16::try_from(channels)
        .map_err(|_| AudioError::invalid_argument(label, format!("too many channels: {channels}")))?;
    Ok((channels, signal.t().iter().copied().collect()))
}

fn write<S: hound::Sample + Copy>(path: &Path, spec: hound::WavSpec, samples: Vec<S>) -> Result<()> {
    let label = path.display().to_string();
    let wav_error = |e: hound::Error| match e {
        hound::Error::IoError(e) => AudioError::io(&label, e),
        other => AudioError::invalid_argument(&label, other.to_string()),
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;
    for sample in samples {
        writer.write_sample(sample).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)
}
