//! Selection-dimension kinds deduced from schema field types.

use crate::schema::{AnnotationField, FieldType};

/// Kind of selection dimension a schema field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionType {
    /// Discrete labels (string, categorical or boolean fields).
    Enum,
    /// 32-bit integer scalar.
    Int32Scalar,
    /// 32-bit float scalar.
    Float32Scalar,
    /// No selection dimension can be built for this field.
    Unsupported,
}

impl DimensionType {
    /// Map a declared field type to its dimension kind.
    pub fn of(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::String | FieldType::Categorical | FieldType::Boolean => Self::Enum,
            FieldType::Int32 => Self::Int32Scalar,
            FieldType::Float32 => Self::Float32Scalar,
            FieldType::Unsupported(_) => Self::Unsupported,
        }
    }

    /// True for scalar (clip-sensitive) dimensions.
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Int32Scalar | Self::Float32Scalar)
    }
}

/// Deduce the dimension kind for a schema field, logging unsupported types.
///
/// Unsupported fields are a soft degrade: the caller skips them when
/// registering selection dimensions.
pub fn deduce_dimension_type(field: &AnnotationField, field_name: &str) -> DimensionType {
    let dimension = DimensionType::of(&field.field_type);
    if dimension == DimensionType::Unsupported {
        tracing::warn!(
            field = field_name,
            field_type = %field.field_type,
            "unknown metadata schema type, field excluded from selection"
        );
    }
    dimension
}
