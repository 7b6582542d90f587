//! Visitor-style iteration over `map` and `array` children.

use crate::error::FieldError;
use crate::types::{Field, FieldType};

impl Field {
    /// Call `visit` for every entry of a `map` Field.
    ///
    /// Fails before visiting anything if the Field is `err`, `nil`, or not a
    /// map. The first error returned by `visit` stops the walk and is
    /// returned as-is. Entry order is unspecified.
    ///
    /// ```
    /// use field_core::{convert, FieldError};
    /// use serde_json::json;
    ///
    /// let tree = convert(&json!({"a": 1, "b": 2})).unwrap();
    /// let mut total = 0;
    /// tree.map_range(|_, v| -> Result<(), FieldError> {
    ///     total += v.int()?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(total, 3);
    /// ```
    pub fn map_range<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        E: From<FieldError>,
        F: FnMut(&str, &Field) -> Result<(), E>,
    {
        match self.check()? {
            Field::Map(entries) => {
                for (key, item) in entries {
                    visit(key, item)?;
                }
                Ok(())
            }
            other => Err(wrong_type(FieldType::Map, other).into()),
        }
    }

    /// Call `visit` for every element of an `array` Field in index order.
    ///
    /// Same failure rules as [`Field::map_range`].
    pub fn array_range<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        E: From<FieldError>,
        F: FnMut(usize, &Field) -> Result<(), E>,
    {
        match self.check()? {
            Field::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    visit(index, item)?;
                }
                Ok(())
            }
            other => Err(wrong_type(FieldType::Array, other).into()),
        }
    }
}

fn wrong_type(expected: FieldType, found: &Field) -> FieldError {
    FieldError::WrongType {
        expected,
        found: found.field_type(),
    }
}
