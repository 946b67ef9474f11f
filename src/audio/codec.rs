//! Everything else via symphonia: FLAC, Ogg/Vorbis, MP3, AIFF, CAF,
//! MP4/AAC, and WAV encodings hound cannot read.

use std::fs::File;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::{
    Decoder, DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F32LE,
    CODEC_TYPE_PCM_F64BE, CODEC_TYPE_PCM_F64LE,
};
use symphonia::core::conv::ConvertibleSample;
use symphonia::core::errors::Error;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::SampleFormat;
use tracing::{debug, warn};

use super::dtype::{RawSamples, Subtype};
use super::source::{DecodeFailure, DecodeResult, SoundSource, SourceInfo};

/// How decoded buffers are converted before they leave the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleKind {
    /// Full-scale 32-bit integers.
    Int,
    Float32,
    Float64,
    /// 16-bit integers, for the lossy path.
    Int16,
}

/// A symphonia format reader with a decoder for its default track.
pub struct CodecSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: SourceInfo,
    kind: SampleKind,
    /// Whole stream, kept when its length had to be counted by decoding.
    buffered: Option<RawSamples>,
}

impl CodecSource {
    /// Probe `file` and prepare a decoder. With `lossy`, samples are read as
    /// 16-bit integers regardless of the codec.
    pub fn open(file: File, extension: Option<&str>, lossy: bool) -> DecodeResult<Self> {
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format = probed.format;

        let track = format
            .default_track()
            .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .or_else(|| {
                format
                    .tracks()
                    .iter()
                    .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            })
            .ok_or(DecodeFailure::Stream("no supported audio track"))?;
        let params = &track.codec_params;

        let decoder = symphonia::default::get_codecs().make(params, &DecoderOptions::default())?;
        let sample_rate = params
            .sample_rate
            .ok_or(DecodeFailure::Stream("unknown sample rate"))?;
        let channels = params
            .channels
            .ok_or(DecodeFailure::Stream("unknown channel layout"))?
            .count();

        let codec = params.codec;
        let subtype = if codec == CODEC_TYPE_PCM_F32LE || codec == CODEC_TYPE_PCM_F32BE {
            Some(Subtype::Float)
        } else if codec == CODEC_TYPE_PCM_F64LE || codec == CODEC_TYPE_PCM_F64BE {
            Some(Subtype::Double)
        } else {
            match (params.sample_format, params.bits_per_sample) {
                (Some(format), _) => subtype_of(format),
                (None, Some(bits)) => Subtype::pcm(bits),
                (None, None) => None,
            }
        }
        .unwrap_or_else(|| {
            let name = symphonia::default::get_codecs()
                .get_codec(params.codec)
                .map(|d| d.short_name)
                .unwrap_or("unknown");
            Subtype::Codec(name.to_string())
        });

        let kind = if lossy {
            SampleKind::Int16
        } else {
            match subtype {
                Subtype::Float | Subtype::Codec(_) => SampleKind::Float32,
                Subtype::Double => SampleKind::Float64,
                _ => SampleKind::Int,
            }
        };

        let info = SourceInfo {
            sample_rate,
            channels,
            frames: params.n_frames,
            subtype,
        };
        debug!(?info, ?kind, "probed codec source");

        Ok(Self {
            track_id: track.id,
            format,
            decoder,
            info,
            kind,
            buffered: None,
        })
    }

    fn empty(&self) -> RawSamples {
        match self.kind {
            SampleKind::Int => RawSamples::Int {
                bits: 32,
                samples: Vec::new(),
            },
            SampleKind::Int16 => RawSamples::Int {
                bits: 16,
                samples: Vec::new(),
            },
            SampleKind::Float32 => RawSamples::Float32(Vec::new()),
            SampleKind::Float64 => RawSamples::Float64(Vec::new()),
        }
    }

    /// Decode packets and keep frames `[start, start + frames)`.
    fn decode_window(&mut self, start: u64, frames: u64) -> DecodeResult<RawSamples> {
        let end = start.saturating_add(frames);
        let channels = self.info.channels;
        let mut out = self.empty();
        let mut position = 0u64;

        while position < end {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(Error::ResetRequired) => {
                    warn!(position, "stream changed parameters mid-file, stopping at this frame");
                    break;
                }
                Err(err) => return Err(err.into()),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(Error::DecodeError(msg)) => {
                    warn!(msg, "skipping undecodable packet");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let n = decoded.frames() as u64;
            let decoded_channels = decoded.spec().channels.count();
            if let Some((a, b)) = chunk_bounds(position, n, start, end, decoded_channels, channels)? {
                let chunk = match self.kind {
                    SampleKind::Int => RawSamples::Int {
                        bits: 32,
                        samples: interleaved::<i32>(decoded)[a..b].to_vec(),
                    },
                    SampleKind::Int16 => RawSamples::Int {
                        bits: 16,
                        samples: interleaved::<i16>(decoded)[a..b]
                            .iter()
                            .map(|&s| i32::from(s))
                            .collect(),
                    },
                    SampleKind::Float32 => {
                        RawSamples::Float32(interleaved::<f32>(decoded)[a..b].to_vec())
                    }
                    SampleKind::Float64 => {
                        RawSamples::Float64(interleaved::<f64>(decoded)[a..b].to_vec())
                    }
                };
                out.extend(chunk);
            }
            position += n;
        }
        Ok(out)
    }
}

impl SoundSource for CodecSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn frames(&mut self) -> DecodeResult<u64> {
        if let Some(frames) = self.info.frames {
            return Ok(frames);
        }
        let all = self.decode_window(0, u64::MAX)?;
        let frames = (all.len() / self.info.channels.max(1)) as u64;
        self.buffered = Some(all);
        self.info.frames = Some(frames);
        Ok(frames)
    }

    fn read(&mut self, start: u64, frames: u64) -> DecodeResult<RawSamples> {
        let Some(all) = self.buffered.take() else {
            return self.decode_window(start, frames);
        };
        let channels = self.info.channels.max(1);
        let total = all.len() / channels;
        let lo = (start as usize).min(total) * channels;
        let hi = (start.saturating_add(frames) as usize).min(total) * channels;
        Ok(match all {
            RawSamples::Int { bits, samples } => RawSamples::Int {
                bits,
                samples: samples[lo..hi].to_vec(),
            },
            RawSamples::Float32(samples) => RawSamples::Float32(samples[lo..hi].to_vec()),
            RawSamples::Float64(samples) => RawSamples::Float64(samples[lo..hi].to_vec()),
        })
    }
}

/// Sample range `[a, b)` of a decoded buffer of `frames` frames starting at
/// stream frame `position` that falls into the window `[start, end)`.
///
/// The buffer must have the channel count the container declared.
fn chunk_bounds(
    position: u64,
    frames: u64,
    start: u64,
    end: u64,
    decoded_channels: usize,
    channels: usize,
) -> DecodeResult<Option<(usize, usize)>> {
    if decoded_channels != channels {
        return Err(DecodeFailure::Stream(
            "decoded channel count differs from the container's",
        ));
    }
    let lo = start.max(position);
    let hi = end.min(position.saturating_add(frames));
    if lo >= hi {
        return Ok(None);
    }
    let a = (lo - position) as usize * channels;
    let b = (hi - position) as usize * channels;
    Ok(Some((a, b)))
}

fn subtype_of(format: SampleFormat) -> Option<Subtype> {
    match format {
        SampleFormat::U8 => Some(Subtype::PcmU8),
        SampleFormat::S8 => Some(Subtype::PcmS8),
        SampleFormat::S16 => Some(Subtype::Pcm16),
        SampleFormat::S24 => Some(Subtype::Pcm24),
        SampleFormat::S32 => Some(Subtype::Pcm32),
        SampleFormat::F32 => Some(Subtype::Float),
        SampleFormat::F64 => Some(Subtype::Double),
        _ => None,
    }
}

/// Copy a decoded buffer into interleaved samples of type `S`.
fn interleaved<S: ConvertibleSample>(decoded: AudioBufferRef<'_>) -> Vec<S> {
    let spec = *decoded.spec();
    let mut buf = SampleBuffer::<S>::new(decoded.capacity() as u64, spec);
    buf.copy_interleaved_ref(decoded);
    buf.samples().to_vec()
}
