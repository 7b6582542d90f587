//! Path navigation through `map` and `array` Fields.
//!
//! A path is a list of segments. Against a `map` a segment is a key; against
//! an `array` it is a base-10 index. Navigation never returns an error
//! directly: a failure becomes a [`Lookup::Failed`] that carries an `err`
//! Field, and every later `get` or accessor on it reports that same first
//! failure.
//!
//! ```
//! use field_core::convert;
//! use serde_json::json;
//!
//! let tree = convert(&json!({"users": [{"name": "Amy"}, {"name": "Bob"}]})).unwrap();
//! assert_eq!(tree.get(["users", "1", "name"]).string().unwrap(), "Bob");
//! assert_eq!(tree.get(["users"]).get(["0"]).get(["name"]).string().unwrap(), "Amy");
//! assert_eq!(tree.get_path("users.1.name").string().unwrap(), "Bob");
//!
//! let missing = tree.get(["users", "7", "name"]);
//! assert!(missing.is_err());
//! assert_eq!(missing.int().unwrap_err().to_string(), "path [users.7] does not exist");
//! ```

use std::ops::Deref;

use tracing::trace;

use crate::error::{FieldError, Result};
use crate::types::{Field, FieldType};

/// Result of a navigation step.
///
/// Dereferences to [`Field`], so accessors and iteration work on it
/// directly, and [`Lookup::get`] continues the walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// The node reached, borrowed from the tree.
    Found(&'a Field),
    /// An `err` Field describing where navigation stopped.
    Failed(Field),
}

impl<'a> Lookup<'a> {
    fn failed(err: FieldError) -> Self {
        trace!(error = %err, "navigation failed");
        Lookup::Failed(Field::Err(err))
    }

    /// Continue navigating from this node.
    pub fn get<I, S>(self, path: I) -> Lookup<'a>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self {
            Lookup::Found(field) => field.get(path),
            Lookup::Failed(field) => Lookup::Failed(field),
        }
    }

    /// Dot-separated form of [`Lookup::get`].
    pub fn get_path(self, path: &str) -> Lookup<'a> {
        self.get(split_path(path))
    }

    /// The borrowed node, or the navigation error.
    pub fn ok(self) -> Result<&'a Field> {
        match self {
            Lookup::Found(field) => Ok(field),
            Lookup::Failed(Field::Err(err)) => Err(err),
            Lookup::Failed(other) => Err(FieldError::InvalidState {
                found: other.field_type(),
            }),
        }
    }

    /// Detach from the tree, cloning a found node.
    pub fn into_owned(self) -> Field {
        match self {
            Lookup::Found(field) => field.clone(),
            Lookup::Failed(field) => field,
        }
    }
}

impl Deref for Lookup<'_> {
    type Target = Field;

    fn deref(&self) -> &Field {
        match self {
            Lookup::Found(field) => field,
            Lookup::Failed(field) => field,
        }
    }
}

impl AsRef<Field> for Lookup<'_> {
    fn as_ref(&self) -> &Field {
        self
    }
}

impl Field {
    /// Walk `path` from this node.
    ///
    /// - `err` receivers fail with their own error, `nil` receivers with
    ///   [`FieldError::InvalidState`], even for an empty path.
    /// - A missing key or out-of-range index fails with
    ///   [`FieldError::PathNotFound`].
    /// - A non-numeric index, or any segment left over once a scalar or
    ///   `bytes` node is reached, fails with [`FieldError::PathTypeMismatch`].
    ///
    /// The failing path is reported as the dot-joined prefix ending at the
    /// segment that failed.
    pub fn get<I, S>(&self, path: I) -> Lookup<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Err(err) = self.check() {
            return Lookup::failed(err);
        }

        let mut walked: Vec<String> = Vec::new();
        let mut node = self;
        for segment in path {
            let segment = segment.as_ref();
            walked.push(segment.to_owned());
            node = match node {
                Field::Map(entries) => match entries.get(segment) {
                    Some(child) => child,
                    None => {
                        return Lookup::failed(FieldError::PathNotFound {
                            path: walked.join("."),
                        })
                    }
                },
                Field::Array(items) => {
                    let Ok(index) = segment.parse::<usize>() else {
                        return Lookup::failed(FieldError::PathTypeMismatch {
                            path: walked.join("."),
                            found: FieldType::Array,
                        });
                    };
                    match items.get(index) {
                        Some(child) => child,
                        None => {
                            return Lookup::failed(FieldError::PathNotFound {
                                path: walked.join("."),
                            })
                        }
                    }
                }
                Field::Err(err) => return Lookup::failed(err.clone()),
                Field::Nil => {
                    return Lookup::failed(FieldError::InvalidState {
                        found: FieldType::Nil,
                    })
                }
                scalar => {
                    return Lookup::failed(FieldError::PathTypeMismatch {
                        path: walked.join("."),
                        found: scalar.field_type(),
                    })
                }
            };
        }
        Lookup::Found(node)
    }

    /// Walk a dot-separated path, e.g. `"users.1.name"`. An empty string is
    /// the empty path.
    pub fn get_path(&self, path: &str) -> Lookup<'_> {
        self.get(split_path(path))
    }
}

fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}
