//! Load parameters and their resolution into a sample-based request
//!
//! `LoadOptions` is what callers write; `AudioRequest` is what the decoders
//! see: slice annotation applied, seconds converted to samples.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use super::dtype::Dtype;
use super::slice::{parse_audio_slice, SlicedPath, SLICE_DELIMITER};
use crate::error::{AudioError, Result};

/// Unit of `start`, `stop` and `frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Sample (frame) indices.
    #[default]
    Samples,
    /// Seconds, converted with the file's sample rate.
    Seconds,
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "samples" => Ok(Self::Samples),
            "seconds" => Ok(Self::Seconds),
            other => Err(format!("unit must be 'samples' or 'seconds', got {other:?}")),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Samples => f.write_str("samples"),
            Self::Seconds => f.write_str("seconds"),
        }
    }
}

/// Channels to keep from a multichannel file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelection {
    /// A single channel; the channel axis is dropped.
    Index(usize),
    /// Explicit channels in the given order.
    List(Vec<usize>),
    /// Half-open range `[start, stop)`, either bound open.
    Range {
        /// First channel, 0 when open.
        start: Option<usize>,
        /// Channel after the last one, all remaining when open.
        stop: Option<usize>,
    },
}

impl ChannelSelection {
    /// Resolve against `channels` available channels.
    ///
    /// Returns the selected indices, or `None` if an explicit index is out of
    /// range. Ranges clamp like numpy slices.
    pub fn indices(&self, channels: usize) -> Option<Vec<usize>> {
        match self {
            Self::Index(i) => (*i < channels).then(|| vec![*i]),
            Self::List(list) => list
                .iter()
                .all(|&i| i < channels)
                .then(|| list.clone()),
            Self::Range { start, stop } => {
                let start = start.unwrap_or(0).min(channels);
                let stop = stop.unwrap_or(channels).min(channels);
                Some((start..stop.max(start)).collect())
            }
        }
    }
}

impl FromStr for ChannelSelection {
    type Err = String;

    /// `"2"`, `"1,3,5"`, `"0:2"`, `":4"` or `"1:"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bound = |b: &str| -> std::result::Result<Option<usize>, String> {
            if b.is_empty() {
                Ok(None)
            } else {
                b.parse().map(Some).map_err(|e| format!("invalid channel {b:?}: {e}"))
            }
        };
        if let Some((start, stop)) = s.split_once(':') {
            return Ok(Self::Range {
                start: bound(start)?,
                stop: bound(stop)?,
            });
        }
        if s.contains(',') {
            let list = s
                .split(',')
                .map(|c| c.trim().parse().map_err(|e| format!("invalid channel {c:?}: {e}")))
                .collect::<std::result::Result<Vec<usize>, String>>()?;
            return Ok(Self::List(list));
        }
        s.parse()
            .map(Self::Index)
            .map_err(|e| format!("invalid channel {s:?}: {e}"))
    }
}

/// Caller-facing load parameters.
///
/// `start`, `stop` and `frames` are expressed in `unit`. With
/// [`Unit::Samples`] they must be whole numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Number of frames to read; `None` or negative reads the rest of the file.
    pub frames: Option<f64>,
    /// Where to start reading; negative counts from the end.
    pub start: f64,
    /// Index after the last frame; negative counts from the end.
    pub stop: Option<f64>,
    /// Channels to keep; all when `None`.
    pub channel: Option<ChannelSelection>,
    /// Target sample type; `None` keeps the file's native subtype.
    pub dtype: Option<Dtype>,
    /// Pads short reads up to `frames`.
    pub fill_value: Option<f64>,
    /// Fail unless the file has this sample rate.
    pub expected_sample_rate: Option<u32>,
    /// Unit of `start`, `stop` and `frames`.
    pub unit: Unit,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            frames: None,
            start: 0.0,
            stop: None,
            channel: None,
            dtype: Some(Dtype::default()),
            fill_value: None,
            expected_sample_rate: None,
            unit: Unit::Samples,
        }
    }
}

impl LoadOptions {
    /// Options reading the whole file as `Float64`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this many frames; negative reads the rest of the file.
    pub fn frames(mut self, frames: impl Into<f64>) -> Self {
        self.frames = Some(frames.into());
        self
    }

    /// Start reading here; negative counts from the end.
    pub fn start(mut self, start: impl Into<f64>) -> Self {
        self.start = start.into();
        self
    }

    /// Stop before this frame; negative counts from the end.
    pub fn stop(mut self, stop: impl Into<f64>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    /// Keep only the selected channels.
    pub fn channel(mut self, channel: ChannelSelection) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Target dtype, or `None` for the file's native subtype.
    pub fn dtype(mut self, dtype: Option<Dtype>) -> Self {
        self.dtype = dtype;
        self
    }

    /// Pad reads that end early up to the requested length.
    pub fn fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Fail with a sample rate mismatch unless the file has `sample_rate`.
    pub fn expected_sample_rate(mut self, sample_rate: u32) -> Self {
        self.expected_sample_rate = Some(sample_rate);
        self
    }

    /// Interpret `start`, `stop` and `frames` in `unit`.
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Frames with the "rest of file" sentinel normalised to `None`.
    fn frames_requested(&self) -> Option<f64> {
        self.frames.filter(|f| *f >= 0.0)
    }

    fn is_unsliced(&self) -> bool {
        self.start == 0.0
            && self.stop.is_none()
            && self.channel.is_none()
            && self.frames_requested().is_none()
    }
}

/// Fully resolved load parameters, in samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRequest {
    /// Real path, annotation removed.
    pub path: String,
    /// First frame; negative counts from the end.
    pub start: i64,
    /// Frame after the last one; negative counts from the end.
    pub stop: Option<i64>,
    /// Frames to read, exclusive with `stop`.
    pub frames: Option<i64>,
    /// Channels to keep.
    pub channel: Option<ChannelSelection>,
    /// Target sample type, `None` for native.
    pub dtype: Option<Dtype>,
    /// Padding for short reads.
    pub fill_value: Option<f64>,
    /// Required sample rate.
    pub expected_sample_rate: Option<u32>,
}

impl AudioRequest {
    /// Resolve `path` and `options` into a request.
    ///
    /// `sample_rate_of` is only called for [`Unit::Seconds`]; it should
    /// perform a metadata-only open of the source.
    pub fn resolve<F>(path: &str, options: &LoadOptions, sample_rate_of: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<u32>,
    {
        if path.contains(SLICE_DELIMITER) {
            if options.unit != Unit::Samples || !options.is_unsliced() {
                return Err(AudioError::invalid_argument(
                    path,
                    "a slice annotation cannot be combined with start, stop, frames, channel \
                     or a unit other than samples",
                ));
            }
            let SlicedPath {
                path,
                start,
                stop,
                channel,
            } = parse_audio_slice(path)?;
            debug!(%path, start, ?stop, ?channel, "parsed slice annotation");
            return Ok(Self {
                path,
                start,
                stop,
                frames: None,
                channel,
                dtype: options.dtype,
                fill_value: options.fill_value,
                expected_sample_rate: options.expected_sample_rate,
            });
        }

        let frames = options.frames_requested();
        if frames.is_some() && options.stop.is_some() {
            return Err(AudioError::invalid_argument(
                path,
                "only one of frames and stop may be used",
            ));
        }

        let (start, stop, frames) = match options.unit {
            Unit::Samples => (
                whole_samples(path, "start", options.start)?,
                options.stop.map(|s| whole_samples(path, "stop", s)).transpose()?,
                frames.map(|f| whole_samples(path, "frames", f)).transpose()?,
            ),
            Unit::Seconds => {
                if options.stop.is_some_and(|s| s < 0.0) {
                    return Err(AudioError::not_supported(
                        path,
                        "a negative stop is not supported with unit 'seconds'",
                    ));
                }
                let sample_rate = f64::from(sample_rate_of(path)?);
                let to_samples = |seconds: f64| (seconds * sample_rate).round_ties_even() as i64;
                let start = to_samples(options.start);
                // Zero stays zero, it does not mean "rest of file".
                let frames = frames.map(|f| if f > 0.0 { to_samples(f) } else { 0 });
                let stop = options
                    .stop
                    .map(|s| if s > 0.0 { to_samples(s) } else { 0 });
                debug!(path, sample_rate, start, ?stop, ?frames, "converted seconds to samples");
                (start, stop, frames)
            }
        };

        Ok(Self {
            path: path.to_string(),
            start,
            stop,
            frames,
            channel: options.channel.clone(),
            dtype: options.dtype,
            fill_value: options.fill_value,
            expected_sample_rate: options.expected_sample_rate,
        })
    }

    /// First frame and number of frames to read from a source of `total`
    /// frames. The count may exceed what is left; the reader fills or
    /// truncates.
    pub fn window(&self, total: u64) -> (u64, u64) {
        let total = total as i64;
        let clamp = |index: i64| {
            let index = if index < 0 { index + total } else { index };
            index.clamp(0, total)
        };
        let start = clamp(self.start);
        let stop = clamp(self.stop.unwrap_or(total)).max(start);
        let frames = self.frames.unwrap_or(stop - start).max(0);
        (start as u64, frames as u64)
    }

    /// Whether only the full file from the beginning is requested.
    pub fn is_whole_file(&self) -> bool {
        self.start == 0 && self.stop.is_none()
    }
}

fn whole_samples(path: &str, name: &str, value: f64) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(AudioError::invalid_argument(
            path,
            format!("{name} must be a whole number of samples, got {value}"),
        ))
    }
}
