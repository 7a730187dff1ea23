//! TOML-loadable reader and writer settings.
//!
//! ```toml
//! format = "row_binary_with_names_and_types"
//!
//! [codec]
//! default_time_zone = "Europe/Berlin"
//! strict_enums = false
//! ```

use std::{fs, path::Path};

use rowbinary_codec::CodecOptions;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{FormatError, format::Format};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderOptions {
    pub format: Format,
    pub codec: CodecOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterOptions {
    pub format: Format,
    pub codec: CodecOptions,
}

impl ReaderOptions {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, FormatError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, FormatError> {
        load(path)
    }
}

impl WriterOptions {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, FormatError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, FormatError> {
        load(path)
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, FormatError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}
