//! Shared data model for the cellview workspace.
//!
//! This crate holds the value types every other crate agrees on:
//!
//! - **schema**: declared observation/variable fields and their types
//! - **dimension**: selection-dimension kinds deduced from field types
//! - **clip**: validated clip quantile pairs
//! - **names**: selection-engine dimension naming
//! - **options**: configuration for World transitions
//! - **error**: the [`WorldError`] type and [`Result`] alias

pub mod clip;
pub mod dimension;
pub mod error;
pub mod names;
pub mod options;
pub mod schema;

pub use clip::ClipQuantiles;
pub use dimension::{DimensionType, deduce_dimension_type};
pub use error::{Result, WorldError};
pub use options::WorldOptions;
pub use schema::{AnnotationField, FieldType, Schema};
