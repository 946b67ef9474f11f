//! Slice annotations embedded in paths
//!
//! A path can carry its own read window and channel selection after a double
//! colon: `speech.wav::[8000:16000]`, `observation.wav::[:,0]`,
//! `observation.wav::[:16000,:2]`. The sample part is always a slice; the
//! channel part is optional and is either an index or a slice.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::request::ChannelSelection;
use crate::error::{AudioError, Result, SliceError};

/// Separator between the real path and its annotation.
pub const SLICE_DELIMITER: &str = "::";

const SLICE_PATTERN: &str = r"^\[(?P<start>\d+)?:(?P<stop>\d+)?(?:,(?:(?P<channel_start>\d+)?:(?P<channel_stop>\d+)?|(?P<channel>\d+)?))?\]$";

fn slice_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SLICE_PATTERN).expect("slice pattern is valid"))
}

/// A path with its slice annotation decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicedPath {
    /// The real path, without annotation.
    pub path: String,
    /// First frame, 0 when omitted.
    pub start: i64,
    /// Frame after the last one, `None` for the end of the file.
    pub stop: Option<i64>,
    /// Channel index or range, if annotated.
    pub channel: Option<ChannelSelection>,
}

impl fmt::Display for SlicedPath {
    /// Writes the annotated form back. Channel lists have no annotation and
    /// are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<usize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}{SLICE_DELIMITER}[{}:", self.path, self.start)?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        match &self.channel {
            Some(ChannelSelection::Index(i)) => write!(f, ",{i}")?,
            Some(ChannelSelection::Range { start, stop }) => {
                write!(f, ",{}:{}", opt(*start), opt(*stop))?
            }
            Some(ChannelSelection::List(_)) | None => {}
        }
        f.write_str("]")
    }
}

/// Split `path` at its last `::` and decode the annotation.
pub fn parse_audio_slice(path: &str) -> Result<SlicedPath> {
    let format_error = |source| AudioError::Format {
        path: path.to_string(),
        source,
    };

    let (real_path, annotation) = path.rsplit_once(SLICE_DELIMITER).ok_or_else(|| {
        format_error(SliceError::NoMatch {
            annotation: String::new(),
        })
    })?;
    if annotation.chars().any(char::is_whitespace) {
        return Err(format_error(SliceError::Whitespace {
            annotation: annotation.to_string(),
        }));
    }

    let caps = slice_regex().captures(annotation).ok_or_else(|| {
        format_error(SliceError::NoMatch {
            annotation: annotation.to_string(),
        })
    })?;

    let group = |name: &str| -> std::result::Result<Option<i64>, SliceError> {
        caps.name(name)
            .map(|m| m.as_str().parse::<i64>())
            .transpose()
            .map_err(SliceError::from)
    };
    let channel_group = |name: &str| -> std::result::Result<Option<usize>, SliceError> {
        caps.name(name)
            .map(|m| m.as_str().parse::<usize>())
            .transpose()
            .map_err(SliceError::from)
    };

    let start = group("start").map_err(format_error)?;
    let stop = group("stop").map_err(format_error)?;
    let channel_start = channel_group("channel_start").map_err(format_error)?;
    let channel_stop = channel_group("channel_stop").map_err(format_error)?;
    let channel_index = channel_group("channel").map_err(format_error)?;

    let channel = match (channel_index, channel_start, channel_stop) {
        (Some(index), _, _) => Some(ChannelSelection::Index(index)),
        (None, None, None) => None,
        (None, start, stop) => Some(ChannelSelection::Range { start, stop }),
    };

    Ok(SlicedPath {
        path: real_path.to_string(),
        start: start.unwrap_or(0),
        stop,
        channel,
    })
}
