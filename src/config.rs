//! Loader configuration
//!
//! Defaults for [`LoadOptions`] read from a YAML file:
//!
//! ```yaml
//! dtype: float32          # int16 | int32 | float32 | float64 | native
//! unit: seconds           # samples | seconds
//! expected_sample_rate: 16000
//! fill_value: 0.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::audio::{Dtype, LoadOptions, Unit};
use crate::error::{AudioError, Result};

/// Configured sample type: a fixed [`Dtype`] or the file's native subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtypeSetting {
    /// [`Dtype::Int16`]
    Int16,
    /// [`Dtype::Int32`]
    Int32,
    /// [`Dtype::Float32`]
    Float32,
    /// [`Dtype::Float64`]
    #[default]
    Float64,
    /// Keep the file's native subtype.
    Native,
}

impl DtypeSetting {
    /// Target dtype, `None` for [`DtypeSetting::Native`].
    pub fn dtype(self) -> Option<Dtype> {
        match self {
            Self::Int16 => Some(Dtype::Int16),
            Self::Int32 => Some(Dtype::Int32),
            Self::Float32 => Some(Dtype::Float32),
            Self::Float64 => Some(Dtype::Float64),
            Self::Native => None,
        }
    }
}

impl From<Dtype> for DtypeSetting {
    fn from(dtype: Dtype) -> Self {
        match dtype {
            Dtype::Int16 => Self::Int16,
            Dtype::Int32 => Self::Int32,
            Dtype::Float32 => Self::Float32,
            Dtype::Float64 => Self::Float64,
        }
    }
}

impl FromStr for DtypeSetting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            other => other
                .parse::<Dtype>()
                .map(Self::from)
                .map_err(|e| format!("{e} or native")),
        }
    }
}

impl fmt::Display for DtypeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dtype() {
            Some(dtype) => write!(f, "{dtype}"),
            None => f.write_str("native"),
        }
    }
}

/// Loader defaults
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Target sample type.
    pub dtype: DtypeSetting,
    /// Unit of `start`, `stop` and `frames`.
    pub unit: Unit,
    /// Required sample rate.
    pub expected_sample_rate: Option<u32>,
    /// Padding for short reads.
    pub fill_value: Option<f64>,
}

impl LoaderConfig {
    /// Load a config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| AudioError::io(&origin, e))?;
        Self::from_yaml(&content, origin)
    }

    /// Parse a config from YAML text; `origin` names it in errors.
    ///
    /// Text that is not YAML is a [`AudioError::Config`] error; valid YAML
    /// with unknown keys or values is [`AudioError::InvalidArgument`].
    pub fn from_yaml(content: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| AudioError::Config {
                path: origin.clone(),
                source,
            })?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
            .map_err(|e| AudioError::invalid_argument(origin, e.to_string()))
    }

    /// Load options carrying these defaults.
    pub fn to_options(&self) -> LoadOptions {
        let mut options = LoadOptions::new().dtype(self.dtype.dtype()).unit(self.unit);
        options.expected_sample_rate = self.expected_sample_rate;
        options.fill_value = self.fill_value;
        options
    }
}
