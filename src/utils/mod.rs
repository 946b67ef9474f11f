//! Utility functions and helpers
//!
//! This module provides common utilities used across the crate.

use std::path::{Path, PathBuf};

/// Home directory of the current user, if the platform reports one.
pub fn home_dir() -> Option<PathBuf> {
    Some(directories::BaseDirs::new()?.home_dir().to_path_buf())
}

/// Collapse a path-like value into the string the loaders work on.
///
/// A leading `~` is expanded to the user's home directory. Slice annotations
/// (`::[...]`) pass through untouched, non-UTF-8 components are replaced
/// lossily.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref().to_string_lossy();
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = home_dir() {
            return format!("{}{}", home.display(), &path[1..]);
        }
    }
    path.into_owned()
}
