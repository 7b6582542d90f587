//! Typed accessors over the fixed coercion matrix.
//!
//! `int`, `uint`, `float` and `bool` sources convert freely into one another
//! with Rust `as` semantics (floats truncate toward zero and saturate, `NaN`
//! becomes 0, `bool` is 0/1). Strings convert when they parse. `bytes` only
//! yields `bytes`, and containers never coerce to a scalar.

use std::borrow::Cow;

use crate::error::{FieldError, Result};
use crate::types::Field;

impl Field {
    /// Coerce to `i64`. Strings must be a decimal integer.
    pub fn int(&self) -> Result<i64> {
        match self.check()? {
            Field::Int(i) => Ok(*i),
            Field::Uint(u) => Ok(*u as i64),
            Field::Float(f) => Ok(*f as i64),
            Field::Bool(b) => Ok(i64::from(*b)),
            Field::String(s) => s.parse().map_err(|_| self.cannot("int64")),
            _ => Err(self.cannot("int64")),
        }
    }

    /// Coerce to `u64`. Strings must be a non-negative decimal integer.
    pub fn uint(&self) -> Result<u64> {
        match self.check()? {
            Field::Int(i) => Ok(*i as u64),
            Field::Uint(u) => Ok(*u),
            Field::Float(f) => Ok(*f as u64),
            Field::Bool(b) => Ok(u64::from(*b)),
            Field::String(s) => s.parse().map_err(|_| self.cannot("uint64")),
            _ => Err(self.cannot("uint64")),
        }
    }

    /// Coerce to `f64`. Strings accept the general float syntax.
    pub fn float(&self) -> Result<f64> {
        match self.check()? {
            Field::Int(i) => Ok(*i as f64),
            Field::Uint(u) => Ok(*u as f64),
            Field::Float(f) => Ok(*f),
            Field::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Field::String(s) => s.parse().map_err(|_| self.cannot("float64")),
            _ => Err(self.cannot("float64")),
        }
    }

    /// Coerce to `bool`: numbers are true when nonzero, strings when
    /// non-empty.
    pub fn bool(&self) -> Result<bool> {
        match self.check()? {
            Field::Int(i) => Ok(*i != 0),
            Field::Uint(u) => Ok(*u != 0),
            Field::Float(f) => Ok(*f != 0.0),
            Field::Bool(b) => Ok(*b),
            Field::String(s) => Ok(!s.is_empty()),
            _ => Err(self.cannot("bool")),
        }
    }

    /// Text form of a scalar. Floats use the shortest decimal that
    /// round-trips, without an exponent.
    pub fn string(&self) -> Result<Cow<'_, str>> {
        match self.check()? {
            Field::String(s) => Ok(Cow::Borrowed(s)),
            Field::Int(i) => Ok(Cow::Owned(i.to_string())),
            Field::Uint(u) => Ok(Cow::Owned(u.to_string())),
            Field::Float(f) => Ok(Cow::Owned(f.to_string())),
            Field::Bool(b) => Ok(Cow::Borrowed(if *b { "true" } else { "false" })),
            _ => Err(self.cannot("string")),
        }
    }

    /// Raw bytes of a `bytes` Field, or the UTF-8 encoding of a `string`.
    pub fn bytes(&self) -> Result<&[u8]> {
        match self.check()? {
            Field::Bytes(b) => Ok(b),
            Field::String(s) => Ok(s.as_bytes()),
            _ => Err(self.cannot("[]byte")),
        }
    }

    fn cannot(&self, to: &'static str) -> FieldError {
        FieldError::conversion(self.describe(), self.field_type(), to)
    }

    /// Short rendering of the payload for error messages.
    fn describe(&self) -> String {
        match self {
            Field::Nil => "<nil>".to_owned(),
            Field::Err(err) => err.to_string(),
            Field::Int(i) => i.to_string(),
            Field::Uint(u) => u.to_string(),
            Field::Float(f) => f.to_string(),
            Field::String(s) => format!("{s:?}"),
            Field::Bool(b) => b.to_string(),
            Field::Bytes(b) => format!("{b:?}"),
            Field::Array(items) => format!("[{} items]", items.len()),
            Field::Map(entries) => format!("{{{} entries}}", entries.len()),
        }
    }
}
