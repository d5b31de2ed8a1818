//! Normalizer — coerces a [`RawRecord`] into a typed [`NormalizedRecord`].
//!
//! Each cell is trimmed, checked against the null rules, then dispatched on
//! its [`FieldCategory`]. Coercion failures never escape: numeric fields
//! degrade to null and literal-list fields keep their trimmed text.
//!
//! Comma-list fields are the one exception to the empty-means-null rule: an
//! empty cell (or the null sentinel) yields an empty list.

use crate::field_spec::{FieldCategory, FieldSpec};
use crate::literal::{self, strip_digit_separators};
use crate::types::{FieldValue, NormalizedRecord, RawRecord};

/// Normalise every field of `raw`, keeping header order.
pub fn normalize(raw: &RawRecord, spec: &FieldSpec) -> NormalizedRecord {
    let mut record = NormalizedRecord::with_capacity(raw.len());
    for (name, value) in raw.iter() {
        record.insert(name, normalize_field(name, value, spec));
    }
    record
}

/// Normalise a single cell. `None` is a cell absent from a short row.
pub fn normalize_field(name: &str, value: Option<&str>, spec: &FieldSpec) -> FieldValue {
    let Some(value) = value else {
        return FieldValue::Null;
    };
    let value = value.trim();

    match spec.category(name) {
        FieldCategory::CommaList if spec.is_null_sentinel(value) => FieldValue::List(Vec::new()),
        FieldCategory::CommaList => FieldValue::List(split_comma_list(value)),
        _ if value.is_empty() || spec.is_null_sentinel(value) => FieldValue::Null,
        FieldCategory::Integer => {
            parse_integer(value).map_or(FieldValue::Null, FieldValue::Integer)
        }
        FieldCategory::Float => parse_float(value).map_or(FieldValue::Null, FieldValue::Float),
        FieldCategory::LiteralList => match literal::parse(value) {
            Ok(parsed) => FieldValue::Literal(parsed),
            Err(err) => {
                tracing::trace!(field = name, %err, "literal parse failed, keeping text");
                FieldValue::Text(value.to_string())
            }
        },
        FieldCategory::Passthrough => FieldValue::Text(value.to_string()),
    }
}

/// Base-10 integer with optional sign and `_` digit separators.
pub fn parse_integer(text: &str) -> Option<i64> {
    strip_digit_separators(text.trim(), 10)?.parse().ok()
}

/// Finite floating-point number; `nan` and `inf` are rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    strip_digit_separators(text.trim(), 10)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Split on commas, trim each piece and drop the empty ones.
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
