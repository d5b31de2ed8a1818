//! flatconv-core — shared types and the record normalizer.
//!
//! This crate holds everything the format adapters share: the record types,
//! the [`FieldSpec`] classification, the [`normalizer`], the safe
//! [`literal`] parser and the layered [`config`].
//!
//! # Pipeline
//!
//! ```text
//! RawRecord ──► normalize(spec) ──► NormalizedRecord ──► adapter sink
//! ```

pub mod config;
pub mod field_spec;
pub mod literal;
pub mod normalizer;
pub mod types;

pub use config::{Config, Delimiter, Profile};
pub use field_spec::{FieldCategory, FieldSpec, SpecError, DEFAULT_NULL_SENTINEL};
pub use literal::{Literal, LiteralError};
pub use normalizer::normalize;
pub use types::{FieldValue, NormalizedRecord, RawRecord};
