//! Parse failures for typed IDs.

use thiserror::Error;

/// Why a string could not be turned into a typed ID. Every variant names the
/// ID type that was being parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("{kind} is empty")]
    Empty { kind: &'static str },

    #[error("{input:?} is not a {kind}: expected the {prefix}_ prefix")]
    WrongPrefix {
        kind: &'static str,
        prefix: &'static str,
        input: String,
    },

    #[error("{kind} {input:?} does not end in a valid ULID")]
    MalformedUlid { kind: &'static str, input: String },

    /// Cluster IDs never contain whitespace or control characters.
    #[error("{kind} {input:?} contains whitespace or control characters")]
    IllegalCharacter { kind: &'static str, input: String },
}

impl IdError {
    /// Name of the ID type that failed to parse.
    pub fn kind(&self) -> &'static str {
        match self {
            IdError::Empty { kind }
            | IdError::WrongPrefix { kind, .. }
            | IdError::MalformedUlid { kind, .. }
            | IdError::IllegalCharacter { kind, .. } => kind,
        }
    }
}
