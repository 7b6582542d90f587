//! The `Field` tagged union and its type discriminator.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Discriminator of a [`Field`]. Displays as the lowercase tag name
/// (`nil`, `err`, `int`, ...), which is also its JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nil,
    Err,
    Int,
    Uint,
    Float,
    String,
    Bool,
    Bytes,
    Array,
    Map,
}

impl FieldType {
    /// The tag name, e.g. `"uint"`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Nil => "nil",
            FieldType::Err => "err",
            FieldType::Int => "int",
            FieldType::Uint => "uint",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Bytes => "bytes",
            FieldType::Array => "array",
            FieldType::Map => "map",
        }
    }

    /// True for the single-value types a path cannot descend into.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            FieldType::Int
                | FieldType::Uint
                | FieldType::Float
                | FieldType::String
                | FieldType::Bool
                | FieldType::Bytes
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a converted value tree.
///
/// Each variant owns exactly the payload its type needs; containers own their
/// children outright, so a tree is acyclic and has no shared nodes. Nothing in
/// this crate mutates a Field after the converter has built it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field {
    /// Absent or untyped value.
    #[default]
    Nil,
    /// A failure captured inline. Every operation on it reports this error.
    Err(FieldError),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Array(Vec<Field>),
    /// Keyed children. Key order carries no meaning.
    Map(BTreeMap<String, Field>),
}

impl Field {
    pub fn nil() -> Self {
        Field::Nil
    }

    /// Wrap a failure as a sentinel `err` Field.
    pub fn error(err: FieldError) -> Self {
        Field::Err(err)
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Nil => FieldType::Nil,
            Field::Err(_) => FieldType::Err,
            Field::Int(_) => FieldType::Int,
            Field::Uint(_) => FieldType::Uint,
            Field::Float(_) => FieldType::Float,
            Field::String(_) => FieldType::String,
            Field::Bool(_) => FieldType::Bool,
            Field::Bytes(_) => FieldType::Bytes,
            Field::Array(_) => FieldType::Array,
            Field::Map(_) => FieldType::Map,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Field::Nil)
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Field::Err(_))
    }

    /// The captured failure of an `err` Field.
    pub fn error_ref(&self) -> Option<&FieldError> {
        match self {
            Field::Err(err) => Some(err),
            _ => None,
        }
    }

    /// Fail for the two terminal states: `err` returns its own error, `nil`
    /// returns [`FieldError::InvalidState`]. Everything else passes.
    pub fn check(&self) -> Result<&Field> {
        match self {
            Field::Err(err) => Err(err.clone()),
            Field::Nil => Err(FieldError::InvalidState {
                found: FieldType::Nil,
            }),
            other => Ok(other),
        }
    }

    /// Number of children for `array` and `map`, 0 for everything else.
    pub fn len(&self) -> usize {
        match self {
            Field::Array(items) => items.len(),
            Field::Map(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of a `map` Field; empty for every other type.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let entries = match self {
            Field::Map(entries) => Some(entries),
            _ => None,
        };
        entries.into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    /// Generic escape hatch: the raw payload, or `None` for `nil`/`err`.
    pub fn value(&self) -> Option<ValueRef<'_>> {
        Some(match self {
            Field::Nil | Field::Err(_) => return None,
            Field::Int(i) => ValueRef::Int(*i),
            Field::Uint(u) => ValueRef::Uint(*u),
            Field::Float(f) => ValueRef::Float(*f),
            Field::String(s) => ValueRef::String(s),
            Field::Bool(b) => ValueRef::Bool(*b),
            Field::Bytes(b) => ValueRef::Bytes(b),
            Field::Array(items) => ValueRef::Array(items),
            Field::Map(entries) => ValueRef::Map(entries),
        })
    }
}

/// Borrowed payload of a Field, as returned by [`Field::value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(&'a str),
    Bool(bool),
    Bytes(&'a [u8]),
    Array(&'a [Field]),
    Map(&'a BTreeMap<String, Field>),
}
