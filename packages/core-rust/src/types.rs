use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Runtime value for filter operands and row fields.
///
/// Supports the JSON-compatible types the backend's `$filter` dialect can
/// compare against. Used as the operand type in `FilterClause` and as the
/// accessor result when evaluating filters locally.
///
/// `List` is only meaningful as the right-hand side of an `in` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8). Dates travel as ISO 8601 strings.
    String(String),
    /// Multi-value operand for `in` clauses.
    List(Vec<Scalar>),
}

impl Scalar {
    /// Returns the string payload, or `None` for non-string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Numeric view of the value, coercing `Int` to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Ordering used by comparison operators and local sorting.
    ///
    /// Numbers compare numerically across `Int`/`Float`; strings compare
    /// lexicographically (which orders ISO 8601 dates chronologically).
    /// Mixed or unordered types return `None`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Null, Self::Null) => Some(std::cmp::Ordering::Equal),
            _ => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
        }
    }

    /// Converts a raw JSON value into a `Scalar`.
    ///
    /// JSON objects have no scalar representation and collapse to `Null`;
    /// callers that need nested fields address them by dotted path instead
    /// (see [`JsonRow::field`]).
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null | serde_json::Value::Object(_) => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                Self::Int,
            ),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => {
                Self::List(items.iter().map(Self::from_json).collect())
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Implemented by every entity row rendered in a grid.
///
/// The id is the unique handle for selection tracking and per-row mutations.
pub trait Row: Send + Sync + 'static {
    /// Unique identifier of this row within its entity.
    fn id(&self) -> &str;
}

/// Returns true when `candidate` is shaped like a canonical UUID.
///
/// Used by callers that accept "name or UUID" inputs and need to decide
/// which lookup path to take before issuing a request.
#[must_use]
pub fn looks_like_uuid(candidate: &str) -> bool {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    let re = UUID_RE.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("static UUID pattern is valid")
    });
    re.is_match(candidate)
}

/// Dynamic row backed by a raw JSON object.
///
/// The normalization point for entities without a dedicated row struct:
/// the payload is validated once at the data-access boundary (an `id`
/// string must be present) and downstream code reads fields by dotted
/// path without further shape checks.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRow {
    id: String,
    value: serde_json::Value,
}

impl JsonRow {
    /// Validates a raw JSON object into a row.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not an object or carries no
    /// string `id` field.
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("row payload has no string `id` field"))?
            .to_string();
        Ok(Self { id, value })
    }

    /// Reads a field by name or dotted path (`"assignee.displayName"`).
    #[must_use]
    pub fn field(&self, path: &str) -> Option<Scalar> {
        let mut current = &self.value;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(Scalar::from_json(current))
    }

    /// The underlying JSON payload.
    #[must_use]
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl Row for JsonRow {
    fn id(&self) -> &str {
        &self.id
    }
}

impl<'de> Deserialize<'de> for JsonRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
