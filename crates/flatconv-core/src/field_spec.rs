//! Field classification.
//!
//! A [`FieldSpec`] assigns known column names to exactly one
//! [`FieldCategory`]. Columns it does not know are passthrough strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw token that stands for "no value" in upstream exports.
pub const DEFAULT_NULL_SENTINEL: &str = "\\N";

/// How a field's raw text is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    /// Base-10 integer; unparseable text becomes null.
    Integer,
    /// Floating-point number; unparseable text becomes null.
    Float,
    /// Stringified literal structure; unparseable text is kept as-is.
    LiteralList,
    /// Comma-separated list of strings.
    CommaList,
    #[default]
    Passthrough,
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldCategory::Integer => write!(f, "integer"),
            FieldCategory::Float => write!(f, "float"),
            FieldCategory::LiteralList => write!(f, "literal_list"),
            FieldCategory::CommaList => write!(f, "comma_list"),
            FieldCategory::Passthrough => write!(f, "passthrough"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("field {field:?} is declared as both {first} and {second}")]
    ConflictingCategory {
        field: String,
        first: FieldCategory,
        second: FieldCategory,
    },
}

/// Closed mapping from field name to [`FieldCategory`], plus the null
/// sentinel shared by every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    categories: HashMap<String, FieldCategory>,
    null_sentinel: String,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            categories: HashMap::new(),
            null_sentinel: DEFAULT_NULL_SENTINEL.to_string(),
        }
    }
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.null_sentinel = sentinel.into();
        self
    }

    /// Declare `field` as `category`. Re-declaring the same category is a
    /// no-op; declaring a different one is an error.
    pub fn declare(
        &mut self,
        field: impl Into<String>,
        category: FieldCategory,
    ) -> Result<(), SpecError> {
        let field = field.into();
        match self.categories.get(&field) {
            Some(&first) if first != category => Err(SpecError::ConflictingCategory {
                field,
                first,
                second: category,
            }),
            Some(_) => Ok(()),
            None => {
                self.categories.insert(field, category);
                Ok(())
            }
        }
    }

    pub fn declare_all<I, S>(&mut self, fields: I, category: FieldCategory) -> Result<(), SpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .try_for_each(|field| self.declare(field, category))
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn with(
        mut self,
        field: impl Into<String>,
        category: FieldCategory,
    ) -> Result<Self, SpecError> {
        self.declare(field, category)?;
        Ok(self)
    }

    pub fn category(&self, field: &str) -> FieldCategory {
        self.categories.get(field).copied().unwrap_or_default()
    }

    pub fn null_sentinel(&self) -> &str {
        &self.null_sentinel
    }

    pub fn is_null_sentinel(&self, token: &str) -> bool {
        token == self.null_sentinel
    }

    /// Number of explicitly declared fields.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
