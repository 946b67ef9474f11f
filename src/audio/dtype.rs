//! Sample types: what decoders produce and what callers ask for

use std::fmt;
use std::str::FromStr;

/// Numeric type of a returned signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dtype {
    /// 16-bit integers, full scale for 16-bit PCM.
    Int16,
    /// 32-bit integers, full scale for 32-bit PCM.
    Int32,
    /// 32-bit floats in `[-1, 1)` for integer PCM.
    Float32,
    /// 64-bit floats in `[-1, 1)` for integer PCM.
    #[default]
    Float64,
}

impl FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int16" => Ok(Self::Int16),
            "int32" => Ok(Self::Int32),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            other => Err(format!(
                "dtype must be one of int16, int32, float32, float64, got {other:?}"
            )),
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        })
    }
}

/// Native sample encoding reported by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtype {
    /// Unsigned 8-bit PCM.
    PcmU8,
    /// Signed 8-bit PCM.
    PcmS8,
    /// Signed 16-bit PCM.
    Pcm16,
    /// Signed 24-bit PCM.
    Pcm24,
    /// Signed 32-bit PCM.
    Pcm32,
    /// 32-bit IEEE float.
    Float,
    /// 64-bit IEEE float.
    Double,
    /// A compressed codec, named by its short name (e.g. `vorbis`, `aac`).
    Codec(String),
}

impl Subtype {
    /// Integer PCM subtype for `bits` per sample.
    pub fn pcm(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::PcmS8),
            16 => Some(Self::Pcm16),
            24 => Some(Self::Pcm24),
            32 => Some(Self::Pcm32),
            _ => None,
        }
    }

    /// Dtype used when the caller asks for the native type.
    ///
    /// Only 16-bit PCM and 32/64-bit float map onto a dtype; everything else
    /// must be requested explicitly.
    pub fn native_dtype(&self) -> Option<Dtype> {
        match self {
            Self::Pcm16 => Some(Dtype::Int16),
            Self::Float => Some(Dtype::Float32),
            Self::Double => Some(Dtype::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PcmU8 => f.write_str("PCM_U8"),
            Self::PcmS8 => f.write_str("PCM_S8"),
            Self::Pcm16 => f.write_str("PCM_16"),
            Self::Pcm24 => f.write_str("PCM_24"),
            Self::Pcm32 => f.write_str("PCM_32"),
            Self::Float => f.write_str("FLOAT"),
            Self::Double => f.write_str("DOUBLE"),
            Self::Codec(name) => write!(f, "{}", name.to_uppercase()),
        }
    }
}

/// Interleaved samples as they come out of a decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSamples {
    /// Integer PCM, right-aligned in an `i32` with `bits` significant bits.
    Int {
        /// Significant bits per sample.
        bits: u32,
        /// Interleaved samples.
        samples: Vec<i32>,
    },
    /// 32-bit float samples as stored.
    Float32(Vec<f32>),
    /// 64-bit float samples as stored.
    Float64(Vec<f64>),
}

impl RawSamples {
    /// Number of samples over all channels.
    pub fn len(&self) -> usize {
        match self {
            Self::Int { samples, .. } => samples.len(),
            Self::Float32(samples) => samples.len(),
            Self::Float64(samples) => samples.len(),
        }
    }

    /// Whether no sample was read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append another chunk of the same kind.
    ///
    /// Chunks from one source always share a kind; a mismatching chunk is
    /// converted to `f64`.
    pub fn extend(&mut self, other: RawSamples) {
        match (self, other) {
            (Self::Int { samples, bits }, Self::Int { samples: more, bits: b }) if *bits == b => {
                samples.extend(more)
            }
            (Self::Float32(samples), Self::Float32(more)) => samples.extend(more),
            (Self::Float64(samples), Self::Float64(more)) => samples.extend(more),
            (this, other) => {
                let mut samples = this.to_f64();
                samples.extend(other.to_f64());
                *this = Self::Float64(samples);
            }
        }
    }

    /// Normalised floating point samples in `[-1, 1)` for integer PCM.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Self::Int { bits, samples } => {
                let scale = 1.0 / (1u64 << (bits - 1)) as f64;
                samples.iter().map(|&s| f64::from(s) * scale).collect()
            }
            Self::Float32(samples) => samples.iter().map(|&s| f64::from(s)).collect(),
            Self::Float64(samples) => samples.clone(),
        }
    }

    /// Like [`RawSamples::to_f64`], narrowed to `f32`.
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            Self::Float32(samples) => samples.clone(),
            _ => self.to_f64().into_iter().map(|s| s as f32).collect(),
        }
    }

    /// 16-bit samples. Integer PCM is rescaled by bit shifting; floats are
    /// rounded and saturated without scaling.
    pub fn to_i16(&self) -> Vec<i16> {
        match self {
            Self::Int { bits, samples } => samples
                .iter()
                .map(|&s| shift_bits(s, *bits, 16) as i16)
                .collect(),
            _ => self.to_f64().into_iter().map(|s| s.round() as i16).collect(),
        }
    }

    /// 32-bit samples, same rules as [`RawSamples::to_i16`].
    pub fn to_i32(&self) -> Vec<i32> {
        match self {
            Self::Int { bits, samples } => {
                samples.iter().map(|&s| shift_bits(s, *bits, 32)).collect()
            }
            Self::Float32(samples) => samples.iter().map(|&s| s.round() as i32).collect(),
            Self::Float64(samples) => samples.iter().map(|&s| s.round() as i32).collect(),
        }
    }
}

fn shift_bits(sample: i32, from: u32, to: u32) -> i32 {
    if from > to {
        sample >> (from - to)
    } else {
        // Widen first: 16 -> 32 bits would overflow an i32 shift of the sign bit.
        ((i64::from(sample)) << (to - from)) as i32
    }
}
