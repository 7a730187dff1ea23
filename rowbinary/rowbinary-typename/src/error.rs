use rowbinary_core::{CodecError, ErrorKind};

/// Failure to turn a type name into a [`rowbinary_core::TypeDescriptor`].
#[derive(Debug, thiserror::Error)]
pub enum TypeNameError {
    /// The text is not a well-formed type expression.
    #[error("cannot parse type name '{input}' at offset {offset}: {detail}")]
    Syntax {
        input: String,
        offset: usize,
        detail: String,
    },

    /// Well-formed, but names an unknown kind or has invalid parameters.
    #[error("invalid type name '{input}'")]
    Type {
        input: String,
        #[source]
        source: CodecError,
    },
}

impl TypeNameError {
    /// Codec error category; syntax errors count as invalid values.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeNameError::Syntax { .. } => ErrorKind::InvalidValue,
            TypeNameError::Type { source, .. } => source.kind(),
        }
    }
}
