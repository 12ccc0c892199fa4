//! Field schemas for filterable entity columns.
//!
//! Every entity list declares which columns may appear in a filter and what
//! type each column carries. Clause validation fails closed: an unknown
//! field or a type-invalid operator is a programmer error surfaced loudly,
//! never a clause silently dropped from the encoded filter.

use serde::{Deserialize, Serialize};

use crate::filter::FilterOp;

/// Declared type of a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-text column. When `case_insensitive` is set, `contains`
    /// lowers both the column and the operand in the encoded filter.
    Text { case_insensitive: bool },
    /// Numeric column (integer or float).
    Number,
    /// Date column; values travel as ISO 8601 strings.
    Date,
    /// Boolean column.
    Bool,
    /// UUID foreign-key column.
    Uuid,
}

impl FieldType {
    /// Whether `op` is valid against a column of this type.
    #[must_use]
    pub fn supports(self, op: FilterOp) -> bool {
        match self {
            Self::Text { .. } => matches!(
                op,
                FilterOp::Eq | FilterOp::Ne | FilterOp::Contains | FilterOp::In
            ),
            Self::Number | Self::Date => matches!(
                op,
                FilterOp::Eq
                    | FilterOp::Ne
                    | FilterOp::Gt
                    | FilterOp::Ge
                    | FilterOp::Lt
                    | FilterOp::Le
                    | FilterOp::In
            ),
            Self::Bool => matches!(op, FilterOp::Eq | FilterOp::Ne),
            Self::Uuid => matches!(op, FilterOp::Eq | FilterOp::Ne | FilterOp::In),
        }
    }
}

/// Single filterable column definition within an entity schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Name of the column as the backend filter dialect knows it.
    pub name: String,
    /// Declared column type, driving operator validity and encoding.
    pub field_type: FieldType,
}

/// Errors from validating a filter clause against a schema.
///
/// These are programmer errors: with validated UI inputs they should be
/// caught in development and tests, not observed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown filter field: {field}")]
    UnknownField { field: String },
    #[error("operator {op} not valid for field {field} of type {field_type:?}")]
    InvalidOperator {
        field: String,
        op: FilterOp,
        field_type: FieldType,
    },
}

/// Filterable-column schema for one entity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name (route segment, e.g. `"test-runs"`).
    pub entity: String,
    /// Declared filterable columns.
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Creates an empty schema for the named entity.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a text column.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, case_insensitive: bool) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: FieldType::Text { case_insensitive },
        });
        self
    }

    /// Adds a numeric column.
    #[must_use]
    pub fn number(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: FieldType::Number,
        });
        self
    }

    /// Adds a date column.
    #[must_use]
    pub fn date(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: FieldType::Date,
        });
        self
    }

    /// Adds a boolean column.
    #[must_use]
    pub fn boolean(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: FieldType::Bool,
        });
        self
    }

    /// Adds a UUID column.
    #[must_use]
    pub fn uuid(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            field_type: FieldType::Uuid,
        });
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates that `field` exists and accepts `op`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownField` for an undeclared column and
    /// `SchemaError::InvalidOperator` for a type-invalid operator. Both
    /// are logged at `warn` so they fail loudly during development.
    pub fn validate(&self, field: &str, op: FilterOp) -> Result<&FieldDef, SchemaError> {
        let Some(def) = self.field(field) else {
            tracing::warn!(entity = %self.entity, field, "filter references unknown field");
            return Err(SchemaError::UnknownField {
                field: field.to_string(),
            });
        };
        if !def.field_type.supports(op) {
            tracing::warn!(
                entity = %self.entity,
                field,
                %op,
                "filter operator invalid for field type"
            );
            return Err(SchemaError::InvalidOperator {
                field: field.to_string(),
                op,
                field_type: def.field_type,
            });
        }
        Ok(def)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
