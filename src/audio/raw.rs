//! Headerless and in-memory audio

use std::io::Cursor;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};

use super::dtype::{Dtype, RawSamples};
use super::signal::Signal;
use crate::error::{AudioError, Result};
use crate::utils::normalize_path;

/// Read headerless little-endian samples (e.g. TIDIGITS) as a 1-D signal.
///
/// Samples keep their stored values; nothing is rescaled.
pub fn read_raw<P: AsRef<Path>>(path: P, dtype: Dtype) -> Result<Signal> {
    let path = normalize_path(path);
    let bytes = std::fs::read(&path).map_err(|e| AudioError::io(&path, e))?;

    let width = match dtype {
        Dtype::Int16 => 2,
        Dtype::Int32 | Dtype::Float32 => 4,
        Dtype::Float64 => 8,
    };
    if bytes.len() % width != 0 {
        return Err(AudioError::invalid_argument(
            &path,
            format!("{} bytes is not a multiple of the {dtype} sample size", bytes.len()),
        ));
    }

    let n = bytes.len() / width;
    let shape = IxDyn(&[n]);
    let chunks = bytes.chunks_exact(width);
    let signal = match dtype {
        Dtype::Int16 => Signal::Int16(from_vec(
            shape,
            chunks.map(|b| i16::from_le_bytes([b[0], b[1]])).collect(),
        )),
        Dtype::Int32 => Signal::Int32(from_vec(
            shape,
            chunks
                .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        )),
        Dtype::Float32 => Signal::Float32(from_vec(
            shape,
            chunks
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        )),
        Dtype::Float64 => Signal::Float64(from_vec(
            shape,
            chunks
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect(),
        )),
    };
    Ok(signal)
}

fn from_vec<T>(shape: IxDyn, data: Vec<T>) -> ArrayD<T> {
    ArrayD::from_shape_vec(shape, data).expect("one sample per element")
}

/// Parse a complete WAV file held in memory.
///
/// Returns a `Float32` `(channel, sample)` signal divided by its largest
/// sample value. Signals without a positive maximum are returned unscaled.
pub fn read_from_byte_string(bytes: &[u8]) -> Result<Signal> {
    let label = "<wav bytes>";
    let wav_error = |e: hound::Error| AudioError::Decode {
        path: label.to_string(),
        message: format!("Could not parse {} bytes as WAV", bytes.len()),
        source: Box::new(e),
    };

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(wav_error)?;
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(wav_error)?,
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32))
            .collect::<std::result::Result<_, _>>()
            .map_err(wav_error)?,
    };

    let channels = usize::from(spec.channels);
    let frames = samples.len() / channels.max(1);
    let signal = Signal::from_interleaved(
        &RawSamples::Float32(samples),
        Dtype::Float32,
        channels,
        frames,
        None,
    );
    let Signal::Float32(mut data) = signal else {
        unreachable!("requested Float32");
    };
    let max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > 0.0 {
        data.mapv_inplace(|s| s / max);
    }
    Ok(Signal::Float32(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_raw_int16() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("digits.raw");
        let bytes: Vec<u8> = [1i16, -2, 300].iter().flat_map(|s| s.to_le_bytes()).collect();
        std::fs::write(&path, bytes).unwrap();

        let signal = read_raw(&path, Dtype::Int16).unwrap();
        assert_eq!(
            signal.as_i16().unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1, -2, 300]
        );
    }

    #[test]
    fn test_read_raw_rejects_partial_samples() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odd.raw");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();
        let err = read_raw(&path, Dtype::Int16).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument { .. }));
    }

    #[test]
    fn test_read_from_byte_string() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [100i16, 200, -100, 400] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let signal = read_from_byte_string(cursor.get_ref()).unwrap();
        assert_eq!(signal.shape(), &[2, 2]);
        let data = signal.as_f32().unwrap();
        assert_eq!(data[[0, 0]], 0.25);
        assert_eq!(data[[0, 1]], -0.25);
        assert_eq!(data[[1, 1]], 1.0);
    }

    #[test]
    fn test_read_from_garbage() {
        assert!(read_from_byte_string(b"not a wav").is_err());
    }
}
