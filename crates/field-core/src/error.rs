//! Error types for conversion, navigation, coercion, and JSON interchange.

use std::sync::Arc;

use thiserror::Error;

use crate::types::FieldType;

/// Errors produced while building or reading a [`Field`](crate::Field) tree.
///
/// The type is `Clone` so an `err` Field can carry it and hand back the exact
/// same failure to every later operation in a chain.
#[derive(Error, Debug, Clone)]
pub enum FieldError {
    /// The input contains a shape the value model cannot represent
    /// (enum variants, non-scalar map keys, out-of-range 128-bit integers).
    #[error("type: {type_name}, value: {value} cannot be converted")]
    UnsupportedType { type_name: String, value: String },

    /// A map key or array index along the path does not exist.
    /// `path` is the dot-joined prefix up to and including the failing segment.
    #[error("path [{path}] does not exist")]
    PathNotFound { path: String },

    /// The path continued past a terminal node, or an array was given a
    /// segment that is not a base-10 index.
    #[error("path [{path}] cannot be navigated: reached {found}")]
    PathTypeMismatch { path: String, found: FieldType },

    /// An accessor could not coerce the value into the requested type.
    #[error("{value}, {from} cannot convert {to}")]
    Conversion {
        value: String,
        from: FieldType,
        to: &'static str,
    },

    /// Decoding JSON text failed.
    #[error("JSON decode error: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// Encoding a Field to JSON text failed.
    #[error("JSON encode error: {0}")]
    Encode(#[source] Arc<serde_json::Error>),

    /// The operation was applied to a `nil` Field.
    #[error("has error, type == {found}")]
    InvalidState { found: FieldType },

    /// The operation only applies to one Field type.
    #[error("only {expected} supports this operation, found {found}")]
    WrongType {
        expected: FieldType,
        found: FieldType,
    },

    /// A `Serialize` implementation reported its own error during conversion,
    /// or an error message restored from a JSON dump.
    #[error("{0}")]
    Custom(String),
}

impl FieldError {
    pub(crate) fn conversion(value: impl ToString, from: FieldType, to: &'static str) -> Self {
        FieldError::Conversion {
            value: value.to_string(),
            from,
            to,
        }
    }

    pub(crate) fn unsupported(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        FieldError::UnsupportedType {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Decode(Arc::new(err))
    }
}

impl PartialEq for FieldError {
    fn eq(&self, other: &Self) -> bool {
        use FieldError::*;
        match (self, other) {
            (
                UnsupportedType { type_name, value },
                UnsupportedType {
                    type_name: t2,
                    value: v2,
                },
            ) => type_name == t2 && value == v2,
            (PathNotFound { path }, PathNotFound { path: p2 }) => path == p2,
            (PathTypeMismatch { path, found }, PathTypeMismatch { path: p2, found: f2 }) => {
                path == p2 && found == f2
            }
            (
                Conversion { value, from, to },
                Conversion {
                    value: v2,
                    from: f2,
                    to: t2,
                },
            ) => value == v2 && from == f2 && to == t2,
            // serde_json errors carry no equality; compare their rendering.
            (Decode(a), Decode(b)) | (Encode(a), Encode(b)) => a.to_string() == b.to_string(),
            (InvalidState { found }, InvalidState { found: f2 }) => found == f2,
            (
                WrongType { expected, found },
                WrongType {
                    expected: e2,
                    found: f2,
                },
            ) => expected == e2 && found == f2,
            (Custom(a), Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl serde::ser::Error for FieldError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        FieldError::Custom(msg.to_string())
    }
}

/// Convenience alias used throughout field-core.
pub type Result<T> = std::result::Result<T, FieldError>;
