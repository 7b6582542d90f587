//! Public-name resolution for struct fields.
//!
//! Serde already applies `#[serde(rename = "...")]`, so the name the
//! converter sees is the declared name or its tag-style override. A
//! [`NameTable`] lets the caller remap those names without touching the type.

use std::collections::HashMap;

/// Lookup table of struct field name → public key.
///
/// Entries scoped to a struct (by its Rust type name) win over global ones.
/// Map keys are never renamed.
///
/// ```
/// use field_core::NameTable;
///
/// let names = NameTable::new()
///     .rename("id", "ID")
///     .rename_in("User", "id", "user_id");
/// assert_eq!(names.resolve("User", "id"), "user_id");
/// assert_eq!(names.resolve("Order", "id"), "ID");
/// assert_eq!(names.resolve("Order", "total"), "total");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    global: HashMap<String, String>,
    scoped: HashMap<String, HashMap<String, String>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename `field` in every struct.
    pub fn rename(mut self, field: impl Into<String>, public: impl Into<String>) -> Self {
        self.global.insert(field.into(), public.into());
        self
    }

    /// Rename `field` only inside the struct named `struct_name`.
    pub fn rename_in(
        mut self,
        struct_name: impl Into<String>,
        field: impl Into<String>,
        public: impl Into<String>,
    ) -> Self {
        self.scoped
            .entry(struct_name.into())
            .or_default()
            .insert(field.into(), public.into());
        self
    }

    /// The public key for `field` of `struct_name`, falling back to `field`.
    pub fn resolve<'a>(&'a self, struct_name: &str, field: &'a str) -> &'a str {
        self.scoped
            .get(struct_name)
            .and_then(|fields| fields.get(field))
            .or_else(|| self.global.get(field))
            .map(String::as_str)
            .unwrap_or(field)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.scoped.is_empty()
    }
}
