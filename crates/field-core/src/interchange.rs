//! JSON interchange: the tagged dump of a Field, and decoding raw JSON bytes.
//!
//! The dump mirrors the tagged union itself, not the value it was built
//! from:
//!
//! ```text
//! {"type":"int","value":5}
//! {"type":"bytes","value":[104,105]}
//! {"type":"array","array_value":[{"type":"bool","value":true}]}
//! {"type":"map","map_value":{"k":{"type":"string","value":"v"}}}
//! {"type":"nil"}
//! {"type":"err","error":"path [a] does not exist"}
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::convert::{convert, Passthrough, FIELD_TOKEN};
use crate::error::{FieldError, Result};
use crate::types::{Field, FieldType};

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(FIELD_TOKEN, &Passthrough(self))
    }
}

/// Borrowed dump layout of one Field.
#[derive(Serialize)]
pub(crate) struct Tagged<'a> {
    #[serde(rename = "type")]
    ty: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Scalar<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    array_value: Option<&'a [Field]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_value: Option<&'a BTreeMap<String, Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Scalar<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(&'a str),
    Bool(bool),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Field> for Tagged<'a> {
    fn from(field: &'a Field) -> Self {
        let mut tagged = Tagged {
            ty: field.field_type(),
            value: None,
            array_value: None,
            map_value: None,
            error: None,
        };
        match field {
            Field::Nil => {}
            Field::Err(err) => tagged.error = Some(err.to_string()),
            Field::Int(i) => tagged.value = Some(Scalar::Int(*i)),
            Field::Uint(u) => tagged.value = Some(Scalar::Uint(*u)),
            Field::Float(f) => tagged.value = Some(Scalar::Float(*f)),
            Field::String(s) => tagged.value = Some(Scalar::String(s)),
            Field::Bool(b) => tagged.value = Some(Scalar::Bool(*b)),
            Field::Bytes(b) => tagged.value = Some(Scalar::Bytes(b)),
            Field::Array(items) => tagged.array_value = Some(items),
            Field::Map(entries) => tagged.map_value = Some(entries),
        }
        tagged
    }
}

/// Owned dump layout, read back by [`Field::from_json`].
#[derive(Deserialize)]
struct Dump {
    #[serde(rename = "type")]
    ty: FieldType,
    value: Option<Value>,
    array_value: Option<Vec<Dump>>,
    map_value: Option<BTreeMap<String, Dump>>,
    error: Option<String>,
}

impl TryFrom<Dump> for Field {
    type Error = FieldError;

    fn try_from(dump: Dump) -> Result<Field> {
        let Dump {
            ty,
            value,
            array_value,
            map_value,
            error,
        } = dump;
        let malformed = |to: &'static str| {
            let shown = value
                .as_ref()
                .map_or_else(|| "<missing>".to_owned(), Value::to_string);
            FieldError::conversion(shown, ty, to)
        };
        let field = match ty {
            FieldType::Nil => Field::Nil,
            FieldType::Err => Field::Err(FieldError::Custom(error.unwrap_or_default())),
            FieldType::Int => Field::Int(
                value
                    .as_ref()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| malformed("int64"))?,
            ),
            FieldType::Uint => Field::Uint(
                value
                    .as_ref()
                    .and_then(Value::as_u64)
                    .ok_or_else(|| malformed("uint64"))?,
            ),
            // serde_json writes non-finite floats as null.
            FieldType::Float => match &value {
                None | Some(Value::Null) => Field::Float(f64::NAN),
                Some(v) => Field::Float(v.as_f64().ok_or_else(|| malformed("float64"))?),
            },
            FieldType::String => match &value {
                Some(Value::String(s)) => Field::String(s.clone()),
                _ => return Err(malformed("string")),
            },
            FieldType::Bool => Field::Bool(
                value
                    .as_ref()
                    .and_then(Value::as_bool)
                    .ok_or_else(|| malformed("bool"))?,
            ),
            FieldType::Bytes => match &value {
                None => Field::Bytes(Vec::new()),
                Some(v) => Field::Bytes(Vec::<u8>::deserialize(v)?),
            },
            FieldType::Array => Field::Array(
                array_value
                    .unwrap_or_default()
                    .into_iter()
                    .map(Field::try_from)
                    .collect::<Result<_>>()?,
            ),
            FieldType::Map => Field::Map(
                map_value
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, dump)| Ok((key, Field::try_from(dump)?)))
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(field)
    }
}

impl Field {
    /// Tagged JSON dump of this Field.
    ///
    /// # Errors
    ///
    /// Fails with the stored error for `err`, and with
    /// [`FieldError::InvalidState`] for `nil`.
    pub fn to_json(&self) -> Result<String> {
        self.check()?;
        serde_json::to_string(self).map_err(|e| FieldError::Encode(Arc::new(e)))
    }

    /// Indented form of [`Field::to_json`].
    pub fn to_json_pretty(&self) -> Result<String> {
        self.check()?;
        serde_json::to_string_pretty(self).map_err(|e| FieldError::Encode(Arc::new(e)))
    }

    /// Rebuild a Field from its tagged dump (the output of
    /// [`Field::to_json`]). A dumped `err` comes back as
    /// [`FieldError::Custom`] carrying the original message.
    pub fn from_json(json: &str) -> Result<Field> {
        let dump: Dump = serde_json::from_str(json)?;
        Field::try_from(dump)
    }

    /// Decode the raw JSON held by a `bytes` Field into `T`.
    ///
    /// ```
    /// use field_core::Field;
    ///
    /// let raw = Field::Bytes(br#"{"x": [1, 2]}"#.to_vec());
    /// let value: serde_json::Value = raw.json_unmarshal().unwrap();
    /// assert_eq!(value["x"][1], 2);
    /// ```
    pub fn json_unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        match self.check()? {
            Field::Bytes(bytes) => Ok(serde_json::from_slice(bytes)?),
            other => Err(FieldError::WrongType {
                expected: FieldType::Bytes,
                found: other.field_type(),
            }),
        }
    }

    /// Decode the raw JSON held by a `bytes` Field into a fresh generic tree.
    ///
    /// Never fails directly: a prior error state, a non-`bytes` Field, a
    /// decode failure or a conversion failure all come back as an `err`
    /// Field. JSON numbers become `uint` (non-negative integers), `int`
    /// (negative integers) or `float`.
    pub fn bytes_to_field(&self) -> Field {
        let decoded = match self.check() {
            Ok(Field::Bytes(bytes)) => serde_json::from_slice::<Value>(bytes),
            Ok(other) => {
                return Field::Err(FieldError::WrongType {
                    expected: FieldType::Bytes,
                    found: other.field_type(),
                })
            }
            Err(err) => return Field::Err(err),
        };
        match decoded.map_err(FieldError::from).and_then(|value| convert(&value)) {
            Ok(field) => field,
            Err(err) => {
                debug!(error = %err, "raw JSON could not be decoded into a field tree");
                Field::Err(err)
            }
        }
    }
}
