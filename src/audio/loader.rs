//! Audio file loading
//!
//! The single-path pipeline: slice annotation and unit resolution, backend
//! dispatch by extension, bounded read with fill/truncate, transpose to
//! `(channel, sample)`, channel selection.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use super::dtype::Dtype;
use super::probe::describe_file;
use super::request::{AudioRequest, LoadOptions};
use super::signal::Signal;
use super::source::{extension, open_source, Backend, DecodeFailure, SoundSource};
use crate::error::{AudioError, Result};
use crate::utils::normalize_path;

/// Audio loader with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct AudioLoader {
    options: LoadOptions,
}

impl AudioLoader {
    /// Create a loader that applies `options` to every path.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Options applied to every load.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load `path` as a signal.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Signal> {
        load_audio(path, &self.options)
    }

    /// Load `path` and also return its sample rate.
    pub fn load_with_sample_rate<P: AsRef<Path>>(&self, path: P) -> Result<(Signal, u32)> {
        load_audio_with_sample_rate(path, &self.options)
    }
}

/// Load an audio file as a `(channel, sample)` signal, or `(sample,)` for
/// single-channel files.
///
/// `path` may carry a slice annotation, `speech.wav::[8000:16000]` or
/// `observation.wav::[:,0]`, which replaces `start`, `stop` and `channel`.
pub fn load_audio<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Signal> {
    load_audio_with_sample_rate(path, options).map(|(signal, _)| signal)
}

/// Like [`load_audio`], additionally returning the file's sample rate.
pub fn load_audio_with_sample_rate<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<(Signal, u32)> {
    let path = normalize_path(path);
    let request = AudioRequest::resolve(&path, options, |p| {
        Ok(open_audio_source(p)?.info().sample_rate)
    })?;
    decode(&request)
}

/// Open `path` (without slice annotation) with the backend for its extension.
pub fn open_audio_source(path: &str) -> Result<Box<dyn SoundSource>> {
    let real = Path::new(path);
    let file = File::open(real).map_err(|e| AudioError::io(path, e))?;
    open_source(real, Backend::for_path(real), file).map_err(|e| decode_error(path, e))
}

fn decode(request: &AudioRequest) -> Result<(Signal, u32)> {
    let path = request.path.as_str();
    let backend = Backend::for_path(Path::new(path));
    if backend == Backend::Lossy && !request.is_whole_file() {
        return Err(AudioError::not_supported(
            path,
            "partial loading (start/stop) is not supported for m4a files",
        ));
    }

    let mut source = open_audio_source(path)?;
    let info = source.info().clone();
    let dtype = match (request.dtype, backend) {
        (Some(dtype), _) => dtype,
        (None, Backend::Lossy) => Dtype::Float64,
        (None, _) => info
            .subtype
            .native_dtype()
            .ok_or_else(|| AudioError::UnsupportedSubtype {
                path: path.to_string(),
                subtype: info.subtype.to_string(),
            })?,
    };

    let total = source.frames().map_err(|e| decode_error(path, e))?;
    let (start, frames) = request.window(total);
    debug!(path, ?backend, %dtype, total, start, frames, "reading window");
    let raw = source.read(start, frames).map_err(|e| decode_error(path, e))?;
    drop(source);

    let signal = Signal::from_interleaved(
        &raw,
        dtype,
        info.channels,
        frames as usize,
        request.fill_value,
    );

    if let Some(expected) = request.expected_sample_rate {
        if expected != info.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                path: path.to_string(),
                expected,
                actual: info.sample_rate,
            });
        }
    }

    let signal = match &request.channel {
        Some(selection) => {
            let selected = signal.select_channels(selection).ok_or_else(|| {
                AudioError::invalid_argument(
                    path,
                    format!(
                        "channel selection {selection:?} is out of range for {} channels",
                        info.channels
                    ),
                )
            })?;
            if selected.is_empty() {
                return Err(AudioError::invalid_argument(path, "selection would be empty"));
            }
            selected
        }
        None => signal.squeeze_mono(),
    };

    Ok((signal, info.sample_rate))
}

/// Wrap a decoder failure with a description of the file's actual content.
fn decode_error(path: &str, failure: DecodeFailure) -> AudioError {
    let probe = describe_file(path);
    let message = match extension(Path::new(path)).as_deref() {
        Some("wav") => format!("Could not read {path}.\nFile format:\n{probe}"),
        Some(ext) => format!("Wrong suffix .{ext} in {path}.\nFile format:\n{probe}"),
        None => format!("Could not read {path} (no suffix).\nFile format:\n{probe}"),
    };
    AudioError::Decode {
        path: path.to_string(),
        message,
        source: Box::new(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::request::ChannelSelection;
    use crate::audio::source::tests::write_f64_wav;
    use tempfile::TempDir;

    /// Mono 16-bit file where sample `i` has value `i`.
    fn ramp(dir: &TempDir, name: &str, frames: i16) -> String {
        let path = dir.path().join(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample(i).unwrap();
        }
        writer.finalize().unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_native_dtype_keeps_integers() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "ramp.wav", 100);
        let signal = load_audio(&path, &LoadOptions::new().dtype(None)).unwrap();
        let samples = signal.as_i16().unwrap();
        assert_eq!(samples.shape(), &[100]);
        assert_eq!(samples[[42]], 42);
    }

    #[test]
    fn test_default_dtype_is_normalised_float64() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "ramp.wav", 100);
        let signal = load_audio(&path, &LoadOptions::new()).unwrap();
        assert_eq!(signal.as_f64().unwrap()[[64]], 64.0 / 32768.0);
    }

    #[test]
    fn test_annotation_window() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "ramp.wav", 100);
        let signal = load_audio(
            format!("{path}::[10:20]"),
            &LoadOptions::new().dtype(Some(Dtype::Int32)),
        )
        .unwrap();
        let samples = signal.as_i32().unwrap();
        assert_eq!(samples.shape(), &[10]);
        assert_eq!(samples[[0]], 10 << 16);
    }

    #[test]
    fn test_fill_value() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "ramp.wav", 100);
        let options = LoadOptions::new().start(90).frames(20).dtype(None);
        assert_eq!(load_audio(&path, &options).unwrap().shape(), &[10]);

        let signal = load_audio(&path, &options.fill_value(-7.0)).unwrap();
        let samples = signal.as_i16().unwrap();
        assert_eq!(samples.shape(), &[20]);
        assert_eq!(samples[[9]], 99);
        assert_eq!(samples[[10]], -7);
    }

    #[test]
    fn test_truncated_wav_is_short_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "cut.wav", 1000);
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 100]).unwrap();

        let signal = load_audio(&path, &LoadOptions::new().dtype(None)).unwrap();
        let samples = signal.as_i16().unwrap();
        assert_eq!(samples.shape(), &[950]);
        assert_eq!(samples[[949]], 949);

        let padded = load_audio(&path, &LoadOptions::new().dtype(None).fill_value(0.0)).unwrap();
        assert_eq!(padded.shape(), &[1000]);
    }

    #[test]
    fn test_double_wav_native_dtype() {
        let dir = TempDir::new().unwrap();
        let path = write_f64_wav(dir.path(), &[0.125, -0.5, 0.75, 1.5]);

        let signal = load_audio(&path, &LoadOptions::new().dtype(None)).unwrap();
        let Signal::Float64(samples) = &signal else {
            panic!("expected Float64, got {:?}", signal.dtype());
        };
        assert_eq!(samples.iter().copied().collect::<Vec<_>>(), vec![0.125, -0.5, 0.75, 1.5]);

        let sliced = format!("{}::[1:3]", path.display());
        let signal = load_audio(&sliced, &LoadOptions::new().dtype(None)).unwrap();
        assert_eq!(signal.as_f64().unwrap().iter().copied().collect::<Vec<_>>(), vec![-0.5, 0.75]);
    }

    #[test]
    fn test_channel_on_mono_file() {
        let dir = TempDir::new().unwrap();
        let path = ramp(&dir, "ramp.wav", 100);
        let options = LoadOptions::new().channel(ChannelSelection::Index(0));
        assert_eq!(load_audio(&path, &options).unwrap().shape(), &[100]);

        let options = LoadOptions::new().channel(ChannelSelection::List(vec![0]));
        assert_eq!(load_audio(&path, &options).unwrap().shape(), &[1, 100]);

        let options = LoadOptions::new().channel(ChannelSelection::Index(1));
        let err = load_audio(&path, &options).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument { .. }));
    }

    #[test]
    fn test_m4a_rejects_partial_reads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.m4a");
        std::fs::write(&path, b"").unwrap();
        let err = load_audio(&path, &LoadOptions::new().start(10)).unwrap_err();
        assert!(matches!(err, AudioError::NotSupported { .. }), "{err}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_audio("/nonexistent/speech.wav", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }), "{err}");
        assert_eq!(err.path(), "/nonexistent/speech.wav");
    }

    #[test]
    fn test_decode_error_mentions_content() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("sphere.wav");
        std::fs::write(&wav, b"NIST_1A\n   1024\nsample_count -i 10\nend_head\n").unwrap();
        let err = load_audio(&wav, &LoadOptions::new()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Could not read"), "{message}");
        assert!(message.contains("NIST SPHERE file"), "{message}");

        let sph = dir.path().join("123_1pcbe_shn.sph");
        std::fs::copy(&wav, &sph).unwrap();
        let err = load_audio(&sph, &LoadOptions::new()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Wrong suffix .sph in"), "{message}");
        assert!(message.contains("NIST SPHERE file"), "{message}");
    }
}
