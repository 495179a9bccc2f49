//! Error types for the MoveCodec decode pipeline.

use thiserror::Error;

/// Errors raised while parsing or composing Move type strings.
///
/// A malformed type string is a configuration problem, never a data problem
/// the caller can recover from by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeNameError {
    #[error("Malformed type string '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
}

impl TypeNameError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a binary [`Layout`](crate::layout::Layout) while parsing
/// or serializing BCS bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Unexpected end of input: needed {needed} more bytes")]
    UnexpectedEof { needed: usize },

    #[error("{count} trailing bytes after value")]
    TrailingBytes { count: usize },

    #[error("Invalid bool byte {byte:#04x}")]
    InvalidBool { byte: u8 },

    #[error("Length prefix overflows u32")]
    LengthOverflow,

    #[error("Length prefix is not in its shortest ULEB128 form")]
    NonCanonicalLength,

    #[error("Layout expected {expected}, got {got}")]
    ValueMismatch { expected: String, got: String },

    #[error("Missing struct field '{field}' while serializing")]
    MissingField { field: String },
}

/// Coarse classification of a [`DecodeError`], independent of where in a
/// nested value it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field is missing or a value cannot be coerced to its declared type.
    Shape,
    /// The declared type string disagrees with the requested descriptor.
    TypeMismatch,
    /// The instantiated type arguments disagree in count or identity.
    GenericArgumentMismatch,
}

/// Errors that can occur while decoding a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {expected}: {got}")]
    InvalidValue { expected: String, got: String },

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error(
        "Generic argument mismatch: expected {expected}, got {got} (arguments [{}] vs [{}], first divergence at position {position})",
        .expected_args.join(", "),
        .got_args.join(", ")
    )]
    GenericArgumentMismatch {
        /// Full type the descriptor stands for.
        expected: String,
        /// Full type declared by the input.
        got: String,
        expected_args: Vec<String>,
        got_args: Vec<String>,
        position: usize,
    },

    #[error("{type_name} is not a record type")]
    NotARecord { type_name: String },

    #[error("Invalid type name: {0}")]
    TypeName(#[from] TypeNameError),

    #[error("BCS error: {0}")]
    Layout(#[from] LayoutError),

    #[error("In field '{field}': {source}")]
    InField {
        field: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn invalid(expected: impl Into<String>, got: &serde_json::Value) -> Self {
        Self::InvalidValue {
            expected: expected.into(),
            got: got.to_string(),
        }
    }

    /// Wraps this error with the name of the field it occurred in.
    pub fn in_field(self, field: &str) -> Self {
        Self::InField {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any field-path wrappers.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Dotted path of the field the error occurred in, e.g. `value.vec`.
    pub fn field_path(&self) -> Option<String> {
        let mut parts = Vec::new();
        let mut cur = self;
        while let DecodeError::InField { field, source } = cur {
            parts.push(field.as_str());
            cur = source;
        }
        (!parts.is_empty()).then(|| parts.join("."))
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            DecodeError::TypeMismatch { .. } | DecodeError::TypeName(_) => ErrorKind::TypeMismatch,
            DecodeError::GenericArgumentMismatch { .. } => ErrorKind::GenericArgumentMismatch,
            _ => ErrorKind::Shape,
        }
    }

    /// Returns `true` for both base-name and generic-argument mismatches:
    /// either way the input claims to be a different type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TypeMismatch | ErrorKind::GenericArgumentMismatch
        )
    }
}
