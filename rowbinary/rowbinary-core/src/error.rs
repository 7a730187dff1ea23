//! Error types shared by the decoder, encoder, and coercion layer.

use std::fmt;

/// Classification of every [`CodecError`].
///
/// The codec only classifies failures; deciding whether a condition is a
/// connection-level or data-level fault is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fewer bytes were available than the type requires.
    Truncated,
    /// Well-formed bytes or input that violate the type's own domain.
    InvalidValue,
    /// A conversion or rescale that would lose information.
    Overflow,
    /// A type, tag byte, or conversion pair that is not implemented.
    UnsupportedType,
    /// No type could be derived for a dynamically typed value.
    CannotInferType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Truncated => "truncated stream",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::Overflow => "overflow",
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::CannotInferType => "cannot infer type",
        })
    }
}

/// Error returned by value decoding, encoding, and coercion.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The cursor ran out of bytes in the middle of a value.
    #[error("truncated stream: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// The value does not belong to the domain of `type_name`.
    #[error("invalid {type_name} value: {detail}")]
    InvalidValue { type_name: String, detail: String },

    /// `value` does not fit into `target` without losing information.
    #[error("value {value} overflows {target}")]
    Overflow { value: String, target: String },

    /// A type or type tag the codec does not implement.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// No conversion is defined from the source representation to the target type.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: &'static str, to: String },

    /// Text input did not match the target type's grammar.
    #[error("failed to parse '{input}' as {target}: {source}")]
    Parse {
        input: String,
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A dynamically typed value has no derivable type descriptor.
    #[error("cannot infer type: {0}")]
    CannotInferType(String),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Truncated { .. } => ErrorKind::Truncated,
            CodecError::InvalidValue { .. } | CodecError::Parse { .. } => ErrorKind::InvalidValue,
            CodecError::Overflow { .. } => ErrorKind::Overflow,
            CodecError::UnsupportedType(_) | CodecError::UnsupportedConversion { .. } => {
                ErrorKind::UnsupportedType
            }
            CodecError::CannotInferType(_) => ErrorKind::CannotInferType,
        }
    }

    pub fn invalid(type_name: impl fmt::Display, detail: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            type_name: type_name.to_string(),
            detail: detail.into(),
        }
    }

    pub fn overflow(value: impl fmt::Display, target: impl fmt::Display) -> Self {
        CodecError::Overflow {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub fn parse(
        input: &str,
        target: impl fmt::Display,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CodecError::Parse {
            input: input.to_string(),
            target: target.to_string(),
            source: source.into(),
        }
    }

    /// True when the stream simply ended, as opposed to carrying bad data.
    pub fn is_truncated(&self) -> bool {
        self.kind() == ErrorKind::Truncated
    }
}

impl From<bytes::TryGetError> for CodecError {
    fn from(e: bytes::TryGetError) -> Self {
        CodecError::Truncated {
            needed: e.requested,
            available: e.available,
        }
    }
}

/// Error returned by the strict `Value::try_*` accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value type mismatch: expected {expected}, found {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: &'static str,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: &'static str) -> Self {
        Self {
            expected: expected.into(),
            actual,
        }
    }
}
