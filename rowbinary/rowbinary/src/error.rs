//! Error types for row reading and writing.

use rowbinary_core::{CodecError, ErrorKind};
use rowbinary_typename::TypeNameError;

use crate::Format;

/// Errors produced by [`RowReader`](crate::RowReader) and
/// [`RowWriter`](crate::RowWriter).
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// I/O error while loading an options file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An options file is not valid TOML or has unknown keys.
    #[error("invalid options: {0}")]
    Options(#[from] toml::de::Error),

    /// The header could not be read or written.
    #[error("{format} header: {source}")]
    Header {
        format: Format,
        #[source]
        source: CodecError,
    },

    /// A type name in the header does not parse.
    #[error(transparent)]
    TypeName(#[from] TypeNameError),

    /// The format carries no types, and no schema was supplied.
    #[error("{format} needs a column schema")]
    MissingSchema { format: Format },

    /// The header names a column the schema does not have.
    #[error("column '{name}' is not in the schema")]
    UnknownColumn { name: String },

    /// The header type of a column differs from the schema.
    #[error("column '{name}' has type {actual} in the header, schema expects {expected}")]
    ColumnMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// The format is write-only.
    #[error("{format} cannot be read")]
    NotReadable { format: Format },

    /// A row passed to the writer has the wrong number of values.
    #[error("row has {actual} values, schema has {expected} columns")]
    RowLength { expected: usize, actual: usize },

    /// A value failed to decode or encode.
    #[error("row {row}, column '{column}': {source}")]
    Value {
        row: u64,
        column: String,
        #[source]
        source: CodecError,
    },
}

impl FormatError {
    /// Underlying codec error, if there is one.
    pub fn codec_error(&self) -> Option<&CodecError> {
        match self {
            FormatError::Header { source, .. } | FormatError::Value { source, .. } => Some(source),
            FormatError::TypeName(TypeNameError::Type { source, .. }) => Some(source),
            _ => None,
        }
    }

    /// Codec error category, if this wraps a codec error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FormatError::TypeName(e) => Some(e.kind()),
            _ => self.codec_error().map(CodecError::kind),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.codec_error().is_some_and(CodecError::is_truncated)
    }
}
