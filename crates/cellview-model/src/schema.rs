//! Dataset schema: declared observation and variable fields.
//!
//! The schema is owned upstream (it arrives with the dataset and is edited by
//! whoever handles annotation commands). World transitions only ever replace
//! it wholesale with the schema supplied by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a schema field.
///
/// Deserializes from the type name used in dataset schemas. Names outside the
/// supported set are kept verbatim in [`FieldType::Unsupported`] so that
/// diagnostics can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Categorical,
    Boolean,
    Int32,
    Float32,
    Unsupported(String),
}

impl FieldType {
    /// Returns the declared type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Categorical => "categorical",
            Self::Boolean => "boolean",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::Unsupported(name) => name,
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value {
            "string" => Self::String,
            "categorical" => Self::Categorical,
            "boolean" => Self::Boolean,
            "int32" => Self::Int32,
            "float32" => Self::Float32,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single annotation field declared by the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationField {
    /// Field (column) name.
    pub name: String,

    /// Declared value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Known category labels, for categorical fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    /// Whether users may edit labels of this field.
    #[serde(default)]
    pub writable: bool,
}

impl AnnotationField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            categories: None,
            writable: false,
        }
    }

    /// Create a writable categorical field with the given labels.
    pub fn user_category(name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Categorical,
            categories: Some(categories),
            writable: true,
        }
    }
}

/// Declared shape and fields of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Number of observations (rows) in the full dataset.
    pub n_obs: usize,
    /// Number of variables in the full dataset.
    pub n_var: usize,
    /// Observation annotation fields, in declaration order.
    #[serde(default)]
    pub obs: Vec<AnnotationField>,
    /// Variable annotation fields, in declaration order.
    #[serde(default)]
    pub var: Vec<AnnotationField>,
}

impl Schema {
    pub fn new(n_obs: usize, n_var: usize) -> Self {
        Self {
            n_obs,
            n_var,
            ..Default::default()
        }
    }

    /// Look up an observation field by name.
    pub fn obs_field(&self, name: &str) -> Option<&AnnotationField> {
        self.obs.iter().find(|field| field.name == name)
    }

    /// Append an observation field.
    #[must_use]
    pub fn with_obs_field(mut self, field: AnnotationField) -> Self {
        self.obs.push(field);
        self
    }

    /// Remove an observation field, if present.
    #[must_use]
    pub fn without_obs_field(mut self, name: &str) -> Self {
        self.obs.retain(|field| field.name != name);
        self
    }

    /// Rename an observation field, keeping its position.
    #[must_use]
    pub fn with_renamed_obs_field(mut self, from: &str, to: &str) -> Self {
        for field in &mut self.obs {
            if field.name == from {
                field.name = to.to_string();
            }
        }
        self
    }

    /// Add a label to a categorical observation field.
    #[must_use]
    pub fn with_category_label(mut self, field_name: &str, label: &str) -> Self {
        if let Some(field) = self.obs.iter_mut().find(|f| f.name == field_name) {
            let categories = field.categories.get_or_insert_with(Vec::new);
            if !categories.iter().any(|c| c == label) {
                categories.push(label.to_string());
            }
        }
        self
    }
}
