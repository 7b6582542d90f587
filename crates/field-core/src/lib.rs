//! # field-core
//!
//! A reflective value model for Rust. [`convert()`] takes any value that
//! implements `serde::Serialize` (scalars, sequences, maps, structs, nested
//! arbitrarily) and turns it into a [`Field`]: a tagged-union tree that can be
//! navigated by path, coerced to scalar types, iterated, and dumped to JSON
//! without knowing its shape in advance.
//!
//! ## Quick start
//!
//! ```rust
//! use field_core::convert;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Record {
//!     name: String,
//!     nums: Vec<i32>,
//! }
//!
//! let tree = convert(&Record { name: "a".into(), nums: vec![1, 2, 3] }).unwrap();
//!
//! assert_eq!(tree.get(["nums", "1"]).int().unwrap(), 2);
//! assert!(tree.get(["nums", "9"]).is_err());
//! assert!(tree.get(["name"]).bool().unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the `Field` tagged union and `FieldType` discriminator
//! - [`convert`](mod@convert): `Serialize` value → `Field`
//! - [`naming`]: struct field name overrides (`NameTable`)
//! - [`path`]: multi-step navigation (`Field::get`, `Lookup`)
//! - [`coerce`]: typed accessors (`int`, `uint`, `float`, `bool`, `string`, `bytes`)
//! - [`range`]: `map_range` / `array_range` visitors
//! - [`interchange`]: tagged JSON dump and raw-JSON decoding
//! - [`error`]: `FieldError`

pub mod coerce;
pub mod convert;
pub mod error;
pub mod interchange;
pub mod naming;
pub mod path;
pub mod range;
pub mod types;

pub use convert::{convert, Converter};
pub use error::{FieldError, Result};
pub use naming::NameTable;
pub use path::Lookup;
pub use types::{Field, FieldType, ValueRef};
