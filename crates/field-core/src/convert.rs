//! Converter: any `Serialize` value → [`Field`] tree.
//!
//! Serde's `Serializer` trait is the reflection layer here. Each concrete
//! input type drives the [`FieldSerializer`] through exactly the calls that
//! describe its shape (scalar, sequence, map, or struct).
//!
//! One case is decided per value: serde reports no element type for a
//! sequence, so a sequence is `bytes` when each of its elements was a bare
//! `u8`. An empty `Vec<u8>` therefore becomes an empty `array`, and
//! `Option<u8>` or newtype-wrapped elements never count as bytes.
//!
//! # Classification
//!
//! | Input | Field |
//! |---|---|
//! | `None`, `()`, JSON `null` | `nil` |
//! | `i8..i64`, `isize`, in-range `i128` | `int` |
//! | `u8..u64`, `usize`, in-range `u128` | `uint` |
//! | `f32`, `f64` | `float` |
//! | `String`, `&str`, `char` | `string` |
//! | `bool` | `bool` |
//! | `serialize_bytes`, non-empty sequences and tuples of bare `u8`, `RawValue` | `bytes` |
//! | other sequences and tuples, all tuple structs | `array` |
//! | maps with scalar keys | `map` |
//! | structs (unit structs included) | `map` |
//! | enum variants, non-scalar map keys | `UnsupportedType` error |
//!
//! `Some`, references, smart pointers and newtype structs are transparent.
//! A [`Field`] passed in is returned unchanged.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde::ser::{
    Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple,
    SerializeTupleStruct, Serializer,
};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::naming::NameTable;
use crate::types::Field;

/// Newtype-struct name `Field` serializes under, so the converter can
/// recognize an already-built tree.
pub(crate) const FIELD_TOKEN: &str = "$field_core::private::Field";

/// Struct name serde_json gives `RawValue`; its single field holds raw JSON.
const RAW_VALUE_TOKEN: &str = "$serde_json::private::RawValue";

/// Convert `value` with the default configuration.
///
/// # Errors
///
/// Returns [`FieldError::UnsupportedType`] if `value` (or anything nested in
/// it) has a shape the value model cannot represent. No partial tree is
/// returned.
///
/// # Examples
///
/// ```
/// use field_core::{convert, Field};
///
/// #[derive(serde::Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let field = convert(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(field.get(["y"]).int().unwrap(), -2);
/// ```
pub fn convert<T: Serialize + ?Sized>(value: &T) -> Result<Field> {
    Converter::new().convert(value)
}

/// Configured converter. Holds the [`NameTable`] applied to struct fields.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    names: NameTable,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `names` to resolve struct field keys.
    pub fn names(mut self, names: NameTable) -> Self {
        self.names = names;
        self
    }

    pub fn name_table(&self) -> &NameTable {
        &self.names
    }

    /// Convert `value` into a Field tree. See [`convert`].
    pub fn convert<T: Serialize + ?Sized>(&self, value: &T) -> Result<Field> {
        value
            .serialize(FieldSerializer::new(&self.names))
            .inspect_err(|err| debug!(error = %err, "conversion aborted"))
    }
}

thread_local! {
    static PASSTHROUGH_ARMED: Cell<bool> = const { Cell::new(false) };
    static PASSTHROUGH_SLOT: RefCell<Option<Field>> = const { RefCell::new(None) };
}

/// Serialize body of a `Field`. While the converter is waiting for a
/// pass-through it hands over a clone; every other serializer gets the
/// tagged dump.
pub(crate) struct Passthrough<'a>(pub(crate) &'a Field);

impl Serialize for Passthrough<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if PASSTHROUGH_ARMED.with(|armed| armed.replace(false)) {
            PASSTHROUGH_SLOT.with(|slot| *slot.borrow_mut() = Some(self.0.clone()));
            return serializer.serialize_unit();
        }
        crate::interchange::Tagged::from(self.0).serialize(serializer)
    }
}

/// Disarms the pass-through hook and drops any unclaimed capture, even when
/// serialization fails halfway.
struct PassthroughGuard;

impl PassthroughGuard {
    fn arm() -> Self {
        PASSTHROUGH_ARMED.with(|armed| armed.set(true));
        PassthroughGuard
    }

    fn take(&self) -> Option<Field> {
        PASSTHROUGH_SLOT.with(|slot| slot.borrow_mut().take())
    }
}

impl Drop for PassthroughGuard {
    fn drop(&mut self) {
        PASSTHROUGH_ARMED.with(|armed| armed.set(false));
        PASSTHROUGH_SLOT.with(|slot| slot.borrow_mut().take());
    }
}

/// The `Serializer` that builds one Field.
///
/// `byte` is set by sequence builders: it records whether the element just
/// serialized was a `u8`, which is how `Vec<u8>` becomes `bytes`.
struct FieldSerializer<'a> {
    names: &'a NameTable,
    byte: Option<&'a Cell<bool>>,
}

impl<'a> FieldSerializer<'a> {
    fn new(names: &'a NameTable) -> Self {
        Self { names, byte: None }
    }
}

impl<'a> Serializer for FieldSerializer<'a> {
    type Ok = Field;
    type Error = FieldError;

    type SerializeSeq = SeqBuilder<'a>;
    type SerializeTuple = SeqBuilder<'a>;
    type SerializeTupleStruct = SeqBuilder<'a>;
    type SerializeTupleVariant = Impossible<Field, FieldError>;
    type SerializeMap = MapBuilder<'a>;
    type SerializeStruct = StructBuilder<'a>;
    type SerializeStructVariant = Impossible<Field, FieldError>;

    fn serialize_bool(self, v: bool) -> Result<Field> {
        Ok(Field::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Field> {
        Ok(Field::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Field> {
        Ok(Field::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Field> {
        Ok(Field::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Field> {
        Ok(Field::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Field> {
        i64::try_from(v)
            .map(Field::Int)
            .map_err(|_| FieldError::unsupported("i128", v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Field> {
        if let Some(byte) = self.byte {
            byte.set(true);
        }
        Ok(Field::Uint(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Field> {
        Ok(Field::Uint(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Field> {
        Ok(Field::Uint(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Field> {
        Ok(Field::Uint(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Field> {
        u64::try_from(v)
            .map(Field::Uint)
            .map_err(|_| FieldError::unsupported("u128", v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Field> {
        Ok(Field::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Field> {
        Ok(Field::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Field> {
        Ok(Field::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Field> {
        Ok(Field::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Field> {
        Ok(Field::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Field> {
        Ok(Field::Nil)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Field> {
        value.serialize(FieldSerializer::new(self.names))
    }

    fn serialize_unit(self) -> Result<Field> {
        Ok(Field::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Field> {
        Ok(Field::Map(BTreeMap::new()))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Field> {
        Err(FieldError::unsupported(name, variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Field> {
        if name != FIELD_TOKEN {
            return value.serialize(FieldSerializer::new(self.names));
        }
        let guard = PassthroughGuard::arm();
        let fallback = value.serialize(FieldSerializer::new(self.names))?;
        Ok(guard.take().unwrap_or(fallback))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Field> {
        Err(FieldError::unsupported(name, variant))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder<'a>> {
        Ok(SeqBuilder::new(self.names, len.unwrap_or(0), true))
    }

    // `[u8; N]` serializes as a tuple, so plain tuples keep byte detection.
    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder<'a>> {
        Ok(SeqBuilder::new(self.names, len, true))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder<'a>> {
        Ok(SeqBuilder::new(self.names, len, false))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(FieldError::unsupported(name, variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder<'a>> {
        Ok(MapBuilder {
            names: self.names,
            entries: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<StructBuilder<'a>> {
        Ok(StructBuilder {
            names: self.names,
            name,
            entries: BTreeMap::new(),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(FieldError::unsupported(name, variant))
    }
}

/// Builds `array`, or `bytes` when byte detection is on and every element
/// turned out to be a bare `u8`.
struct SeqBuilder<'a> {
    names: &'a NameTable,
    items: Vec<Field>,
    all_bytes: bool,
}

impl<'a> SeqBuilder<'a> {
    fn new(names: &'a NameTable, len: usize, detect_bytes: bool) -> Self {
        Self {
            names,
            items: Vec::with_capacity(len),
            all_bytes: detect_bytes,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let byte = Cell::new(false);
        let field = value.serialize(FieldSerializer {
            names: self.names,
            byte: Some(&byte),
        })?;
        self.all_bytes &= byte.get();
        self.items.push(field);
        Ok(())
    }

    fn finish(self) -> Field {
        if self.all_bytes && !self.items.is_empty() {
            let bytes: Option<Vec<u8>> = self
                .items
                .iter()
                .map(|item| match item {
                    Field::Uint(b) => u8::try_from(*b).ok(),
                    _ => None,
                })
                .collect();
            if let Some(bytes) = bytes {
                return Field::Bytes(bytes);
            }
        }
        Field::Array(self.items)
    }
}

impl SerializeSeq for SeqBuilder<'_> {
    type Ok = Field;
    type Error = FieldError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Field> {
        Ok(self.finish())
    }
}

impl SerializeTuple for SeqBuilder<'_> {
    type Ok = Field;
    type Error = FieldError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Field> {
        Ok(self.finish())
    }
}

impl SerializeTupleStruct for SeqBuilder<'_> {
    type Ok = Field;
    type Error = FieldError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Field> {
        Ok(self.finish())
    }
}

struct MapBuilder<'a> {
    names: &'a NameTable,
    entries: BTreeMap<String, Field>,
    pending_key: Option<String>,
}

impl SerializeMap for MapBuilder<'_> {
    type Ok = Field;
    type Error = FieldError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        let key = key.serialize(FieldSerializer::new(self.names))?;
        self.pending_key = Some(key_string(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| FieldError::Custom("map value serialized before its key".into()))?;
        let value = value.serialize(FieldSerializer::new(self.names))?;
        self.entries.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Field> {
        Ok(Field::Map(self.entries))
    }
}

/// String form of a map key. Only scalar keys have one.
fn key_string(key: Field) -> Result<String> {
    match key {
        Field::String(s) => Ok(s),
        Field::Int(i) => Ok(i.to_string()),
        Field::Uint(u) => Ok(u.to_string()),
        Field::Float(f) => Ok(f.to_string()),
        Field::Bool(b) => Ok(b.to_string()),
        other => Err(FieldError::unsupported(
            "map key",
            other.field_type().as_str(),
        )),
    }
}

struct StructBuilder<'a> {
    names: &'a NameTable,
    name: &'static str,
    entries: BTreeMap<String, Field>,
}

impl SerializeStruct for StructBuilder<'_> {
    type Ok = Field;
    type Error = FieldError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value.serialize(FieldSerializer::new(self.names))?;
        let key = if self.name == RAW_VALUE_TOKEN {
            key
        } else {
            self.names.resolve(self.name, key)
        };
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(mut self) -> Result<Field> {
        if self.name == RAW_VALUE_TOKEN {
            if let Some(Field::String(json)) = self.entries.remove(RAW_VALUE_TOKEN) {
                return Ok(Field::Bytes(json.into_bytes()));
            }
        }
        Ok(Field::Map(self.entries))
    }
}
