//! Domain-specific assertion macros for flatconv harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! field and the record being checked.

/// Assert that a `NormalizedRecord` field equals a JSON value.
///
/// ```rust
/// assert_field!(record, "numVotes", 142);
/// ```
#[macro_export]
macro_rules! assert_field {
    ($record:expr, $key:expr, $value:tt) => {{
        let record: &flatconv_core::NormalizedRecord = &$record;
        let key: &str = $key;
        let expected = serde_json::json!($value);
        match record.get(key) {
            Some(actual) => {
                let actual = serde_json::to_value(actual).expect("field serialises");
                pretty_assertions::assert_eq!(actual, expected, "field {:?}", key);
            }
            None => panic!(
                "assert_field! failed: field {:?} not found.\n  Available: {:?}",
                key,
                record.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that a `NormalizedRecord` field is null.
#[macro_export]
macro_rules! assert_null {
    ($record:expr, $key:expr) => {{
        let record: &flatconv_core::NormalizedRecord = &$record;
        let key: &str = $key;
        match record.get(key) {
            Some(value) if value.is_null() => {}
            Some(value) => panic!("assert_null! failed: field {:?} is {:?}", key, value),
            None => panic!("assert_null! failed: field {:?} not found", key),
        }
    }};
}
