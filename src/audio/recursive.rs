//! Loading nested collections of paths

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::loader::load_audio;
use super::request::LoadOptions;
use super::signal::Signal;
use crate::error::Result;

/// A nested structure of audio paths.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioTree {
    /// A single path, possibly with a slice annotation.
    Leaf(PathBuf),
    /// An ordered list, stacked when the entries allow it.
    Seq(Vec<AudioTree>),
    /// Named entries, loaded one by one.
    Map(BTreeMap<String, AudioTree>),
}

impl From<&str> for AudioTree {
    fn from(path: &str) -> Self {
        Self::Leaf(PathBuf::from(path))
    }
}

impl From<String> for AudioTree {
    fn from(path: String) -> Self {
        Self::Leaf(PathBuf::from(path))
    }
}

impl From<&Path> for AudioTree {
    fn from(path: &Path) -> Self {
        Self::Leaf(path.to_path_buf())
    }
}

impl From<PathBuf> for AudioTree {
    fn from(path: PathBuf) -> Self {
        Self::Leaf(path)
    }
}

impl<T: Into<AudioTree>> From<Vec<T>> for AudioTree {
    fn from(entries: Vec<T>) -> Self {
        Self::Seq(entries.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AudioTree>> From<BTreeMap<String, T>> for AudioTree {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// The result of [`recursive_load_audio`], mirroring the input structure.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedTree {
    /// A leaf, or a sequence of equally shaped leaves stacked on a new axis.
    Signal(Signal),
    /// A sequence that could not be stacked.
    Seq(Vec<LoadedTree>),
    /// Loaded map entries under their keys.
    Map(BTreeMap<String, LoadedTree>),
}

impl LoadedTree {
    /// The signal, if this node is one.
    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            Self::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    /// Take the signal, if this node is one.
    pub fn into_signal(self) -> Option<Signal> {
        match self {
            Self::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Load every leaf of `tree` with the same options.
///
/// Sequence entries that all load to signals of one shape and dtype are
/// stacked into a single signal with a new leading axis; otherwise the
/// sequence is returned entry by entry. Maps are never stacked. The first
/// failing leaf aborts the whole load.
pub fn recursive_load_audio(tree: &AudioTree, options: &LoadOptions) -> Result<LoadedTree> {
    match tree {
        AudioTree::Leaf(path) => load_audio(path, options).map(LoadedTree::Signal),
        AudioTree::Map(entries) => entries
            .iter()
            .map(|(key, entry)| Ok((key.clone(), recursive_load_audio(entry, options)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(LoadedTree::Map),
        AudioTree::Seq(entries) => {
            let loaded = entries
                .iter()
                .map(|entry| recursive_load_audio(entry, options))
                .collect::<Result<Vec<_>>>()?;
            if loaded.is_empty() {
                return Ok(LoadedTree::Signal(Signal::empty()));
            }
            if !loaded.iter().all(|l| matches!(l, LoadedTree::Signal(_))) {
                return Ok(LoadedTree::Seq(loaded));
            }
            let signals: Vec<Signal> = loaded.into_iter().filter_map(LoadedTree::into_signal).collect();
            Ok(match Signal::stack(&signals) {
                Some(stacked) => LoadedTree::Signal(stacked),
                None => LoadedTree::Seq(signals.into_iter().map(LoadedTree::Signal).collect()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;
    use tempfile::TempDir;

    fn silence(dir: &TempDir, name: &str, frames: usize) -> PathBuf {
        let path = dir.path().join(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_leaf() {
        let dir = TempDir::new().unwrap();
        let a = silence(&dir, "a.wav", 50);
        let loaded = recursive_load_audio(&a.into(), &LoadOptions::new()).unwrap();
        assert_eq!(loaded.as_signal().unwrap().shape(), &[50]);
    }

    #[test]
    fn test_equal_shapes_stack() {
        let dir = TempDir::new().unwrap();
        let a = silence(&dir, "a.wav", 50);
        let tree = AudioTree::from(vec![a.clone(), a]);
        let loaded = recursive_load_audio(&tree, &LoadOptions::new()).unwrap();
        assert_eq!(loaded.as_signal().unwrap().shape(), &[2, 50]);
    }

    #[test]
    fn test_nested_mixed_shapes_stay_a_list() {
        let dir = TempDir::new().unwrap();
        let a = silence(&dir, "a.wav", 50);
        let b = silence(&dir, "b.wav", 30);
        let tree = AudioTree::Seq(vec![
            a.into(),
            AudioTree::from(vec![b.clone(), b]),
        ]);
        let loaded = recursive_load_audio(&tree, &LoadOptions::new()).unwrap();
        let LoadedTree::Seq(entries) = loaded else {
            panic!("expected a sequence");
        };
        assert_eq!(entries[0].as_signal().unwrap().shape(), &[50]);
        assert_eq!(entries[1].as_signal().unwrap().shape(), &[2, 30]);
    }

    #[test]
    fn test_map_keeps_keys() {
        let dir = TempDir::new().unwrap();
        let a = silence(&dir, "a.wav", 50);
        let tree = AudioTree::from(BTreeMap::from([
            ("x".to_string(), a.clone()),
            ("y".to_string(), a),
        ]));
        let LoadedTree::Map(entries) = recursive_load_audio(&tree, &LoadOptions::new()).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(entries["y"].as_signal().unwrap().shape(), &[50]);
    }

    #[test]
    fn test_empty_sequence() {
        let loaded = recursive_load_audio(&AudioTree::Seq(vec![]), &LoadOptions::new()).unwrap();
        assert_eq!(loaded.as_signal().unwrap().shape(), &[0]);
    }

    #[test]
    fn test_leaf_error_aborts() {
        let dir = TempDir::new().unwrap();
        let a = silence(&dir, "a.wav", 50);
        let tree = AudioTree::from(vec![a, dir.path().join("missing.wav")]);
        let err = recursive_load_audio(&tree, &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }));
    }
}
