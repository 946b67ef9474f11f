//! Decoded signal buffers
//!
//! A [`Signal`] is laid out as `(channel, sample)`; single-channel results
//! without an explicit channel request are one-dimensional `(sample,)`.

use ndarray::{Array2, ArrayD, Axis, IxDyn};

use super::dtype::{Dtype, RawSamples};
use super::request::ChannelSelection;

/// An n-dimensional audio buffer of one of the supported dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// [`Dtype::Int16`] samples.
    Int16(ArrayD<i16>),
    /// [`Dtype::Int32`] samples.
    Int32(ArrayD<i32>),
    /// [`Dtype::Float32`] samples.
    Float32(ArrayD<f32>),
    /// [`Dtype::Float64`] samples.
    Float64(ArrayD<f64>),
}

macro_rules! map_signal {
    ($signal:expr, $arr:ident => $body:expr) => {
        match $signal {
            Signal::Int16($arr) => Signal::Int16($body),
            Signal::Int32($arr) => Signal::Int32($body),
            Signal::Float32($arr) => Signal::Float32($body),
            Signal::Float64($arr) => Signal::Float64($body),
        }
    };
}

macro_rules! with_signal {
    ($signal:expr, $arr:ident => $body:expr) => {
        match $signal {
            Signal::Int16($arr) => $body,
            Signal::Int32($arr) => $body,
            Signal::Float32($arr) => $body,
            Signal::Float64($arr) => $body,
        }
    };
}

impl Signal {
    /// Build a `(channel, sample)` signal from interleaved decoder output.
    ///
    /// With `fill_value` set, the sample axis is padded up to `frames`.
    pub fn from_interleaved(
        raw: &RawSamples,
        dtype: Dtype,
        channels: usize,
        frames: usize,
        fill_value: Option<f64>,
    ) -> Self {
        let pad_to = fill_value.map(|_| frames * channels);
        let fill = fill_value.unwrap_or_default();
        match dtype {
            Dtype::Int16 => Self::Int16(deinterleave(raw.to_i16(), channels, pad_to, fill.round() as i16)),
            Dtype::Int32 => Self::Int32(deinterleave(raw.to_i32(), channels, pad_to, fill.round() as i32)),
            Dtype::Float32 => Self::Float32(deinterleave(raw.to_f32(), channels, pad_to, fill as f32)),
            Dtype::Float64 => Self::Float64(deinterleave(raw.to_f64(), channels, pad_to, fill)),
        }
    }

    /// Empty one-dimensional `Float64` signal.
    pub fn empty() -> Self {
        Self::Float64(ArrayD::zeros(IxDyn(&[0])))
    }

    /// Numeric type of the samples.
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::Int16(_) => Dtype::Int16,
            Self::Int32(_) => Dtype::Int32,
            Self::Float32(_) => Dtype::Float32,
            Self::Float64(_) => Dtype::Float64,
        }
    }

    /// `[sample]`, `[channel, sample]`, or with a leading stack axis.
    pub fn shape(&self) -> &[usize] {
        with_signal!(self, a => a.shape())
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_signal!(self, a => a.len())
    }

    /// Whether the signal holds no sample.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the selected channels of a `(channel, sample)` signal.
    ///
    /// An index drops the channel axis. Returns `None` if an index is out of
    /// range or the signal is not two-dimensional.
    pub fn select_channels(self, selection: &ChannelSelection) -> Option<Self> {
        if self.ndim() != 2 {
            return None;
        }
        let indices = selection.indices(self.shape()[0])?;
        let index = matches!(selection, ChannelSelection::Index(_));
        Some(map_signal!(self, a => {
            if index {
                a.index_axis(Axis(0), indices[0]).to_owned()
            } else {
                a.select(Axis(0), &indices)
            }
        }))
    }

    /// Drop the channel axis of a single-channel `(1, sample)` signal.
    pub fn squeeze_mono(self) -> Self {
        if self.ndim() == 2 && self.shape()[0] == 1 {
            map_signal!(self, a => a.index_axis_move(Axis(0), 0))
        } else {
            self
        }
    }

    /// Stack signals of identical dtype and shape along a new first axis.
    pub fn stack(signals: &[Signal]) -> Option<Self> {
        let first = signals.first()?;
        if signals
            .iter()
            .any(|s| s.dtype() != first.dtype() || s.shape() != first.shape())
        {
            return None;
        }
        macro_rules! stack_as {
            ($variant:ident) => {{
                let views: Vec<_> = signals
                    .iter()
                    .filter_map(|s| match s {
                        Signal::$variant(a) => Some(a.view()),
                        _ => None,
                    })
                    .collect();
                ndarray::stack(Axis(0), &views).ok().map(Signal::$variant)
            }};
        }
        match first {
            Signal::Int16(_) => stack_as!(Int16),
            Signal::Int32(_) => stack_as!(Int32),
            Signal::Float32(_) => stack_as!(Float32),
            Signal::Float64(_) => stack_as!(Float64),
        }
    }

    /// Copy as `f64` without rescaling.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            Self::Int16(a) => a.mapv(f64::from),
            Self::Int32(a) => a.mapv(f64::from),
            Self::Float32(a) => a.mapv(f64::from),
            Self::Float64(a) => a.clone(),
        }
    }

    /// Largest absolute sample value, 0 for an empty signal.
    pub fn peak(&self) -> f64 {
        self.to_f64().iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// The samples if this is a `Float64` signal.
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Float64(a) => Some(a),
            _ => None,
        }
    }

    /// The samples if this is a `Float32` signal.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Self::Float32(a) => Some(a),
            _ => None,
        }
    }

    /// The samples if this is an `Int16` signal.
    pub fn as_i16(&self) -> Option<&ArrayD<i16>> {
        match self {
            Self::Int16(a) => Some(a),
            _ => None,
        }
    }

    /// The samples if this is an `Int32` signal.
    pub fn as_i32(&self) -> Option<&ArrayD<i32>> {
        match self {
            Self::Int32(a) => Some(a),
            _ => None,
        }
    }
}

/// Interleaved `(sample, channel)` data to a standard-layout `(channel, sample)` array.
fn deinterleave<T: Clone>(
    mut data: Vec<T>,
    channels: usize,
    pad_to: Option<usize>,
    fill: T,
) -> ArrayD<T> {
    let channels = channels.max(1);
    if let Some(len) = pad_to {
        if data.len() < len {
            data.resize(len, fill);
        }
    }
    // Partial trailing frames cannot be placed on the grid.
    data.truncate(data.len() - data.len() % channels);
    let frames = data.len() / channels;
    let interleaved = Array2::from_shape_vec((frames, channels), data)
        .expect("length is a multiple of the channel count");
    interleaved
        .reversed_axes()
        .as_standard_layout()
        .into_owned()
        .into_dyn()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stereo() -> Signal {
        // frames: (0, 10), (1, 11), (2, 12)
        let raw = RawSamples::Float64(vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
        Signal::from_interleaved(&raw, Dtype::Float64, 2, 3, None)
    }

    #[test]
    fn test_from_interleaved_transposes() {
        let signal = stereo();
        assert_eq!(signal.shape(), &[2, 3]);
        assert_eq!(
            signal.as_f64().unwrap(),
            &array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]].into_dyn()
        );
    }

    #[test]
    fn test_fill_value_pads_to_frames() {
        let raw = RawSamples::Int {
            bits: 16,
            samples: vec![1, 2],
        };
        let signal = Signal::from_interleaved(&raw, Dtype::Int16, 1, 5, Some(-1.0));
        assert_eq!(signal.shape(), &[1, 5]);
        assert_eq!(
            signal.as_i16().unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, -1, -1, -1]
        );

        let signal = Signal::from_interleaved(&raw, Dtype::Int16, 1, 5, None);
        assert_eq!(signal.shape(), &[1, 2]);
    }

    #[test]
    fn test_select_channels() {
        let one = stereo().select_channels(&ChannelSelection::Index(1)).unwrap();
        assert_eq!(one.shape(), &[3]);
        assert_eq!(one.as_f64().unwrap(), &array![10.0, 11.0, 12.0].into_dyn());

        let list = stereo()
            .select_channels(&ChannelSelection::List(vec![1, 0, 1]))
            .unwrap();
        assert_eq!(list.shape(), &[3, 3]);

        let range = stereo()
            .select_channels(&ChannelSelection::Range {
                start: Some(1),
                stop: None,
            })
            .unwrap();
        assert_eq!(range.shape(), &[1, 3]);

        assert!(stereo().select_channels(&ChannelSelection::Index(2)).is_none());
    }

    #[test]
    fn test_squeeze_mono() {
        let raw = RawSamples::Float32(vec![0.5, 0.25]);
        let signal = Signal::from_interleaved(&raw, Dtype::Float32, 1, 2, None);
        assert_eq!(signal.squeeze_mono().shape(), &[2]);
        assert_eq!(stereo().squeeze_mono().shape(), &[2, 3]);
    }

    #[test]
    fn test_stack() {
        let stacked = Signal::stack(&[stereo(), stereo()]).unwrap();
        assert_eq!(stacked.shape(), &[2, 2, 3]);

        let mono = Signal::from_interleaved(&RawSamples::Float64(vec![1.0]), Dtype::Float64, 1, 1, None);
        assert!(Signal::stack(&[stereo(), mono]).is_none());

        let as_f32 = Signal::from_interleaved(
            &RawSamples::Float64(vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0]),
            Dtype::Float32,
            2,
            3,
            None,
        );
        assert!(Signal::stack(&[stereo(), as_f32]).is_none());
        assert!(Signal::stack(&[]).is_none());
    }

    #[test]
    fn test_peak() {
        assert_eq!(stereo().peak(), 12.0);
        assert_eq!(Signal::empty().peak(), 0.0);
        assert_eq!(Signal::empty().shape(), &[0]);
    }
}
