//! Format variants and column schema.

use std::{fmt, str::FromStr};

use rowbinary_core::TypeDescriptor;
use rowbinary_typename::{TypeNameError, parse_type_name};
use serde::Deserialize;

/// Framing around the per-value RowBinary codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Values only; the schema comes from the caller.
    #[default]
    RowBinary,
    /// Header with the column count and names.
    RowBinaryWithNames,
    /// Header with the column count, names and type names.
    RowBinaryWithNamesAndTypes,
    /// Values only, each preceded by a "use column default" byte. Write side only.
    RowBinaryWithDefaults,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::RowBinary,
        Format::RowBinaryWithNames,
        Format::RowBinaryWithNamesAndTypes,
        Format::RowBinaryWithDefaults,
    ];

    /// Format name as the server spells it.
    pub fn name(self) -> &'static str {
        match self {
            Format::RowBinary => "RowBinary",
            Format::RowBinaryWithNames => "RowBinaryWithNames",
            Format::RowBinaryWithNamesAndTypes => "RowBinaryWithNamesAndTypes",
            Format::RowBinaryWithDefaults => "RowBinaryWithDefaults",
        }
    }

    pub fn has_names(self) -> bool {
        matches!(
            self,
            Format::RowBinaryWithNames | Format::RowBinaryWithNamesAndTypes
        )
    }

    pub fn has_types(self) -> bool {
        self == Format::RowBinaryWithNamesAndTypes
    }

    pub fn is_readable(self) -> bool {
        self != Format::RowBinaryWithDefaults
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the server spelling (`RowBinaryWithNames`) and the config
/// spelling (`row_binary_with_names`).
impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Format::ALL
            .into_iter()
            .find(|format| format.name().to_lowercase() == squashed)
            .ok_or_else(|| format!("unknown format '{s}'"))
    }
}

/// One column of a row schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: TypeDescriptor,
    /// The server fills this column from its default expression when a row
    /// leaves it NULL (`RowBinaryWithDefaults` only).
    pub has_default: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }

    /// Column whose type is given by its server type name.
    pub fn parse(name: impl Into<String>, type_name: &str) -> Result<Self, TypeNameError> {
        Ok(Self::new(name, parse_type_name(type_name)?))
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}
