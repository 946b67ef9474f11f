//! RIFF/WAVE files via hound

use std::fs::File;
use std::io::{BufReader, ErrorKind};

use tracing::warn;

use super::dtype::{RawSamples, Subtype};
use super::source::{DecodeResult, SoundSource, SourceInfo};

/// A seekable WAV file.
pub struct WavSource {
    reader: hound::WavReader<BufReader<File>>,
    info: SourceInfo,
}

impl WavSource {
    /// Parse the header of `file`.
    pub fn open(file: File) -> Result<Self, hound::Error> {
        let reader = hound::WavReader::new(BufReader::new(file))?;
        let spec = reader.spec();
        let subtype = match spec.sample_format {
            hound::SampleFormat::Float => Subtype::Float,
            hound::SampleFormat::Int if spec.bits_per_sample == 8 => Subtype::PcmU8,
            hound::SampleFormat::Int => {
                Subtype::pcm(u32::from(spec.bits_per_sample)).ok_or(hound::Error::Unsupported)?
            }
        };
        let info = SourceInfo {
            sample_rate: spec.sample_rate,
            channels: usize::from(spec.channels),
            frames: Some(u64::from(reader.duration())),
            subtype,
        };
        Ok(Self { reader, info })
    }
}

impl SoundSource for WavSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn frames(&mut self) -> DecodeResult<u64> {
        Ok(u64::from(self.reader.duration()))
    }

    fn read(&mut self, start: u64, frames: u64) -> DecodeResult<RawSamples> {
        let total = u64::from(self.reader.duration());
        let start = start.min(total);
        let frames = frames.min(total - start);
        self.reader.seek(start as u32).map_err(hound::Error::IoError)?;

        let n = (frames as usize) * self.info.channels;
        let spec = self.reader.spec();
        let raw = match spec.sample_format {
            hound::SampleFormat::Float => {
                RawSamples::Float32(available(self.reader.samples::<f32>(), n)?)
            }
            hound::SampleFormat::Int => RawSamples::Int {
                bits: u32::from(spec.bits_per_sample),
                samples: available(self.reader.samples::<i32>(), n)?,
            },
        };
        Ok(raw)
    }
}

/// Take up to `n` samples. A data chunk cut short of the length in the
/// header yields the samples that exist.
fn available<S>(samples: impl Iterator<Item = hound::Result<S>>, n: usize) -> DecodeResult<Vec<S>> {
    let mut out = Vec::with_capacity(n);
    for sample in samples.take(n) {
        match sample {
            Ok(sample) => out.push(sample),
            Err(hound::Error::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                warn!(read = out.len(), expected = n, "wav data ends before the length in its header");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}
