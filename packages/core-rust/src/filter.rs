//! Structural filters and the OData-like `$filter` codec.
//!
//! Grids describe filters as field/operator/value clauses combined with
//! logical AND. [`encode_odata`] turns an expression into the textual
//! dialect the backend expects (`contains(tolower(name), tolower('x'))`,
//! `priority gt 1`, clauses joined with ` and `); [`decode_odata`] parses
//! exactly that dialect back, for tests and for reference backends that
//! evaluate filters locally via [`FilterExpression::matches`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{EntitySchema, FieldType, SchemaError};
use crate::types::Scalar;

// ---------------------------------------------------------------------------
// Clause model
// ---------------------------------------------------------------------------

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    In,
}

impl FilterOp {
    /// The token this operator renders as in the filter dialect.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Contains => "contains",
            Self::In => "in",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "contains" => Some(Self::Contains),
            "in" => Some(Self::In),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One field/operator/value triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOp,
    pub value: Scalar,
}

impl FilterClause {
    /// Creates a clause from parts.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: FilterOp, value: impl Into<Scalar>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an equality clause.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for a substring clause.
    #[must_use]
    pub fn contains(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::new(field, FilterOp::Contains, value)
    }
}

/// Ordered AND-combination of clauses.
///
/// Immutable value object: the builder methods return a new expression,
/// and grid code rebuilds the expression on every filter-UI change rather
/// than mutating in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterExpression {
    clauses: Vec<FilterClause>,
}

impl FilterExpression {
    /// The empty expression (matches everything, encodes to `""`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new expression with `clause` appended.
    #[must_use]
    pub fn and(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// The clauses in order.
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Evaluates the expression against one row, mirroring the backend's
    /// semantics for the encoded dialect (used by reference backends and
    /// client-side previews).
    ///
    /// `fields` resolves a column name to the row's value; a missing
    /// column fails the clause.
    ///
    /// # Errors
    ///
    /// Returns a schema error when a clause references an unknown field
    /// or a type-invalid operator, identical to [`encode_odata`].
    pub fn matches<F>(&self, schema: &EntitySchema, fields: F) -> Result<bool, FilterError>
    where
        F: Fn(&str) -> Option<Scalar>,
    {
        for clause in &self.clauses {
            let def = schema.validate(&clause.field, clause.operator)?;
            let case_insensitive =
                matches!(def.field_type, FieldType::Text { case_insensitive: true });
            let Some(actual) = fields(&clause.field) else {
                return Ok(false);
            };
            if !clause_matches(&actual, clause, case_insensitive) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn scalar_eq(actual: &Scalar, expected: &Scalar, case_insensitive: bool) -> bool {
    match (actual, expected) {
        (Scalar::String(a), Scalar::String(b)) if case_insensitive => {
            a.to_lowercase() == b.to_lowercase()
        }
        _ => actual.compare(expected) == Some(std::cmp::Ordering::Equal),
    }
}

fn clause_matches(actual: &Scalar, clause: &FilterClause, case_insensitive: bool) -> bool {
    use std::cmp::Ordering;
    match clause.operator {
        FilterOp::Eq => scalar_eq(actual, &clause.value, case_insensitive),
        FilterOp::Ne => !scalar_eq(actual, &clause.value, case_insensitive),
        FilterOp::Gt => actual.compare(&clause.value) == Some(Ordering::Greater),
        FilterOp::Ge => matches!(
            actual.compare(&clause.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => actual.compare(&clause.value) == Some(Ordering::Less),
        FilterOp::Le => matches!(
            actual.compare(&clause.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Contains => match (actual, &clause.value) {
            (Scalar::String(hay), Scalar::String(needle)) => {
                if case_insensitive {
                    hay.to_lowercase().contains(&needle.to_lowercase())
                } else {
                    hay.contains(needle.as_str())
                }
            }
            _ => false,
        },
        FilterOp::In => match &clause.value {
            Scalar::List(options) => options
                .iter()
                .any(|opt| scalar_eq(actual, opt, case_insensitive)),
            _ => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding a filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("`in` filter on {field} requires a list value")]
    InRequiresList { field: String },
    #[error("contains filter on {field} requires a string value, got {got}")]
    ContainsRequiresString { field: String, got: &'static str },
    #[error("list value only valid with the `in` operator (field {field})")]
    UnexpectedList { field: String },
    #[error("field {field} expects a UUID literal, got {value}")]
    ExpectedUuid { field: String, value: String },
    #[error("could not parse filter: {reason}")]
    Parse { reason: String },
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes an expression into the backend's `$filter` dialect.
///
/// Clauses are validated against `schema` (fail closed), rendered in
/// order, and joined with ` and `. String literals are single-quoted with
/// embedded quotes doubled; `contains` on a case-insensitive text column
/// lowers both sides with `tolower(...)`.
///
/// Pure and referentially transparent: safe to memoize on
/// `(expression, schema)`. The empty expression encodes to `""` and the
/// caller omits the query parameter.
///
/// # Errors
///
/// Returns [`FilterError::Schema`] for unknown fields or type-invalid
/// operators, and value-shape errors (`in` without a list, `contains`
/// without a string, non-UUID literal on a UUID column).
pub fn encode_odata(
    expression: &FilterExpression,
    schema: &EntitySchema,
) -> Result<String, FilterError> {
    let mut parts = Vec::with_capacity(expression.len());
    for clause in expression.clauses() {
        let def = schema.validate(&clause.field, clause.operator)?;
        parts.push(encode_clause(clause, def.field_type)?);
    }
    Ok(parts.join(" and "))
}

fn encode_clause(clause: &FilterClause, field_type: FieldType) -> Result<String, FilterError> {
    let field = clause.field.as_str();
    match clause.operator {
        FilterOp::Contains => {
            let Scalar::String(needle) = &clause.value else {
                return Err(FilterError::ContainsRequiresString {
                    field: field.to_string(),
                    got: clause.value.type_name(),
                });
            };
            let quoted = quote(needle);
            if matches!(field_type, FieldType::Text { case_insensitive: true }) {
                Ok(format!("contains(tolower({field}), tolower({quoted}))"))
            } else {
                Ok(format!("contains({field},{quoted})"))
            }
        }
        FilterOp::In => {
            let Scalar::List(options) = &clause.value else {
                return Err(FilterError::InRequiresList {
                    field: field.to_string(),
                });
            };
            let rendered = options
                .iter()
                .map(|opt| encode_literal(field, opt, field_type))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{field} in ({})", rendered.join(",")))
        }
        op => {
            let literal = encode_literal(field, &clause.value, field_type)?;
            Ok(format!("{field} {} {literal}", op.token()))
        }
    }
}

fn encode_literal(
    field: &str,
    value: &Scalar,
    field_type: FieldType,
) -> Result<String, FilterError> {
    if matches!(field_type, FieldType::Uuid) {
        let candidate = value.as_str().unwrap_or_default();
        if !crate::types::looks_like_uuid(candidate) {
            return Err(FilterError::ExpectedUuid {
                field: field.to_string(),
                value: candidate.to_string(),
            });
        }
    }
    match value {
        Scalar::Null => Ok("null".to_string()),
        Scalar::Bool(b) => Ok(b.to_string()),
        Scalar::Int(i) => Ok(i.to_string()),
        Scalar::Float(f) => Ok(f.to_string()),
        Scalar::String(s) => Ok(quote(s)),
        Scalar::List(_) => Err(FilterError::UnexpectedList {
            field: field.to_string(),
        }),
    }
}

/// Single-quotes a string literal, doubling embedded quotes.
fn quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parses a filter string in exactly the dialect [`encode_odata`] emits.
///
/// Intended for tests and for reference backends that need the structural
/// clauses back; it is not a general OData parser (no `or`, no grouping).
/// The result is not schema-validated; validation happens when the
/// expression is encoded or evaluated.
///
/// # Errors
///
/// Returns [`FilterError::Parse`] naming the offending fragment.
pub fn decode_odata(input: &str) -> Result<FilterExpression, FilterError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(FilterExpression::new());
    }
    let mut expression = FilterExpression::new();
    for segment in split_outside_quotes(input, " and ") {
        expression = expression.and(decode_clause(segment.trim())?);
    }
    Ok(expression)
}

/// Splits on `separator` while ignoring occurrences inside quoted literals.
fn split_outside_quotes<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    let bytes = input.as_bytes();
    let sep = separator.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            in_quotes = !in_quotes;
            i += 1;
        } else if !in_quotes && bytes[i..].starts_with(sep) {
            parts.push(&input[start..i]);
            i += sep.len();
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(&input[start..]);
    parts
}

fn decode_clause(segment: &str) -> Result<FilterClause, FilterError> {
    if let Some(inner) = segment
        .strip_prefix("contains(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return decode_contains(segment, inner);
    }
    if let Some((field, list)) = split_in_clause(segment) {
        let options = split_outside_quotes(list, ",")
            .into_iter()
            .map(|part| decode_literal(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(FilterClause::new(field, FilterOp::In, Scalar::List(options)));
    }

    let mut tokens = segment.splitn(3, ' ');
    let (Some(field), Some(op), Some(literal)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(parse_error(segment));
    };
    let operator = FilterOp::from_token(op).ok_or_else(|| parse_error(segment))?;
    Ok(FilterClause::new(field, operator, decode_literal(literal)?))
}

fn decode_contains(segment: &str, inner: &str) -> Result<FilterClause, FilterError> {
    let parts = split_outside_quotes(inner, ",");
    let [field_part, value_part] = parts.as_slice() else {
        return Err(parse_error(segment));
    };
    let field_part = field_part.trim();
    let value_part = value_part.trim();

    let field = field_part
        .strip_prefix("tolower(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(field_part);
    let literal = value_part
        .strip_prefix("tolower(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(value_part);

    Ok(FilterClause::new(
        field,
        FilterOp::Contains,
        decode_literal(literal.trim())?,
    ))
}

/// Recognizes `field in (...)` with the parens outside any quotes.
fn split_in_clause(segment: &str) -> Option<(&str, &str)> {
    let idx = find_outside_quotes(segment, " in (")?;
    let field = &segment[..idx];
    let list = segment[idx + " in (".len()..].strip_suffix(')')?;
    Some((field, list))
}

fn find_outside_quotes(input: &str, needle: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut in_quotes = false;
    for i in 0..bytes.len() {
        if bytes[i] == b'\'' {
            in_quotes = !in_quotes;
        } else if !in_quotes && bytes[i..].starts_with(needle.as_bytes()) {
            return Some(i);
        }
    }
    None
}

fn decode_literal(raw: &str) -> Result<Scalar, FilterError> {
    if let Some(inner) = raw.strip_prefix('\'') {
        let inner = inner.strip_suffix('\'').ok_or_else(|| parse_error(raw))?;
        return Ok(Scalar::String(inner.replace("''", "'")));
    }
    match raw {
        "null" => Ok(Scalar::Null),
        "true" => Ok(Scalar::Bool(true)),
        "false" => Ok(Scalar::Bool(false)),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Ok(Scalar::Int(i))
            } else if let Ok(f) = raw.parse::<f64>() {
                Ok(Scalar::Float(f))
            } else {
                Err(parse_error(raw))
            }
        }
    }
}

fn parse_error(fragment: &str) -> FilterError {
    FilterError::Parse {
        reason: format!("unrecognized fragment: {fragment}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn schema() -> EntitySchema {
        EntitySchema::new("tests")
            .text("name", true)
            .text("status", false)
            .number("priority")
            .date("createdAt")
            .boolean("archived")
            .uuid("projectId")
    }

    #[test]
    fn filter_op_serializes_lowercase() {
        let json = serde_json::to_string(&FilterOp::Eq).unwrap();
        assert_eq!(json, "\"eq\"");
        let json = serde_json::to_string(&FilterOp::Contains).unwrap();
        assert_eq!(json, "\"contains\"");
    }

    #[test]
    fn encode_comparison_clause() {
        let expr = FilterExpression::new().and(FilterClause::new("priority", FilterOp::Gt, 1));
        assert_eq!(encode_odata(&expr, &schema()).unwrap(), "priority gt 1");
    }

    #[test]
    fn encode_case_insensitive_contains() {
        let expr = FilterExpression::new().and(FilterClause::contains("name", "smoke"));
        assert_eq!(
            encode_odata(&expr, &schema()).unwrap(),
            "contains(tolower(name), tolower('smoke'))"
        );
    }

    #[test]
    fn encode_case_sensitive_contains() {
        let expr = FilterExpression::new().and(FilterClause::contains("status", "pass"));
        assert_eq!(
            encode_odata(&expr, &schema()).unwrap(),
            "contains(status,'pass')"
        );
    }

    #[test]
    fn encode_escapes_embedded_quotes() {
        let expr = FilterExpression::new().and(FilterClause::eq("status", "it's fine"));
        assert_eq!(
            encode_odata(&expr, &schema()).unwrap(),
            "status eq 'it''s fine'"
        );
    }

    #[test]
    fn encode_joins_clauses_with_and() {
        let expr = FilterExpression::new()
            .and(FilterClause::contains("name", "smoke"))
            .and(FilterClause::new("priority", FilterOp::Gt, 1))
            .and(FilterClause::eq("archived", false));
        assert_eq!(
            encode_odata(&expr, &schema()).unwrap(),
            "contains(tolower(name), tolower('smoke')) and priority gt 1 and archived eq false"
        );
    }

    #[test]
    fn encode_in_clause() {
        let expr = FilterExpression::new().and(FilterClause::new(
            "status",
            FilterOp::In,
            Scalar::List(vec!["passed".into(), "failed".into()]),
        ));
        assert_eq!(
            encode_odata(&expr, &schema()).unwrap(),
            "status in ('passed','failed')"
        );
    }

    #[test]
    fn encode_empty_expression() {
        assert_eq!(encode_odata(&FilterExpression::new(), &schema()).unwrap(), "");
    }

    #[test]
    fn encode_rejects_unknown_field() {
        let expr = FilterExpression::new().and(FilterClause::eq("nope", "x"));
        let err = encode_odata(&expr, &schema()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Schema(SchemaError::UnknownField { field }) if field == "nope"
        ));
    }

    #[test]
    fn encode_rejects_in_without_list() {
        let expr = FilterExpression::new().and(FilterClause::new("status", FilterOp::In, "x"));
        assert!(matches!(
            encode_odata(&expr, &schema()).unwrap_err(),
            FilterError::InRequiresList { .. }
        ));
    }

    #[test]
    fn encode_rejects_non_uuid_on_uuid_field() {
        let expr = FilterExpression::new().and(FilterClause::eq("projectId", "not-a-uuid"));
        assert!(matches!(
            encode_odata(&expr, &schema()).unwrap_err(),
            FilterError::ExpectedUuid { field, .. } if field == "projectId"
        ));

        let expr = FilterExpression::new().and(FilterClause::eq(
            "projectId",
            "b3e0c1d2-4f5a-4b6c-8d7e-9f0a1b2c3d4e",
        ));
        assert!(encode_odata(&expr, &schema()).is_ok());
    }

    #[test]
    fn decode_round_trips_quoted_and() {
        // The literal contains the clause separator; quoting must protect it.
        let expr = FilterExpression::new()
            .and(FilterClause::eq("status", "rock and roll"))
            .and(FilterClause::new("priority", FilterOp::Le, 3));
        let encoded = encode_odata(&expr, &schema()).unwrap();
        assert_eq!(decode_odata(&encoded).unwrap(), expr);
    }

    #[test]
    fn decode_round_trips_contains_forms() {
        for clause in [
            FilterClause::contains("name", "a 'quoted' needle"),
            FilterClause::contains("status", "plain"),
        ] {
            let expr = FilterExpression::new().and(clause);
            let encoded = encode_odata(&expr, &schema()).unwrap();
            assert_eq!(decode_odata(&encoded).unwrap(), expr);
        }
    }

    #[test]
    fn decode_round_trips_in_clause() {
        let expr = FilterExpression::new().and(FilterClause::new(
            "status",
            FilterOp::In,
            Scalar::List(vec!["a,b".into(), "c".into()]),
        ));
        let encoded = encode_odata(&expr, &schema()).unwrap();
        assert_eq!(decode_odata(&encoded).unwrap(), expr);
    }

    #[test]
    fn decode_empty_is_empty_expression() {
        assert!(decode_odata("").unwrap().is_empty());
        assert!(decode_odata("   ").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_odata("status").is_err());
        assert!(decode_odata("status resembles 'x'").is_err());
        assert!(decode_odata("status eq 'unterminated").is_err());
    }

    #[test]
    fn float_literal_with_fraction_round_trips() {
        let expr = FilterExpression::new().and(FilterClause::new("priority", FilterOp::Gt, 1.5));
        let encoded = encode_odata(&expr, &schema()).unwrap();
        assert_eq!(encoded, "priority gt 1.5");
        assert_eq!(decode_odata(&encoded).unwrap(), expr);
    }

    #[test]
    fn whole_float_decodes_as_int() {
        // `2.0` renders as `2`; the decoded triple is numerically equal but
        // comes back as Int. Callers comparing triples numerically are fine.
        let expr = FilterExpression::new().and(FilterClause::new("priority", FilterOp::Gt, 2.0));
        let encoded = encode_odata(&expr, &schema()).unwrap();
        let decoded = decode_odata(&encoded).unwrap();
        assert_eq!(decoded.clauses()[0].value, Scalar::Int(2));
    }

    #[test]
    fn matches_contains_is_case_insensitive_when_marked() {
        let s = schema();
        let expr = FilterExpression::new().and(FilterClause::contains("name", "SMOKE"));
        let hit = expr
            .matches(&s, |f| (f == "name").then(|| Scalar::from("nightly smoke suite")))
            .unwrap();
        assert!(hit);

        let expr = FilterExpression::new().and(FilterClause::contains("status", "PASS"));
        let miss = expr
            .matches(&s, |f| (f == "status").then(|| Scalar::from("passed")))
            .unwrap();
        assert!(!miss, "status column is case-sensitive");
    }

    #[test]
    fn matches_numeric_comparison_and_missing_field() {
        let s = schema();
        let expr = FilterExpression::new().and(FilterClause::new("priority", FilterOp::Gt, 1));
        assert!(expr.matches(&s, |_| Some(Scalar::Int(2))).unwrap());
        assert!(!expr.matches(&s, |_| Some(Scalar::Int(1))).unwrap());
        assert!(!expr.matches(&s, |_| None).unwrap());
    }

    #[test]
    fn matches_in_clause() {
        let s = schema();
        let expr = FilterExpression::new().and(FilterClause::new(
            "status",
            FilterOp::In,
            Scalar::List(vec!["passed".into(), "failed".into()]),
        ));
        assert!(expr.matches(&s, |_| Some(Scalar::from("failed"))).unwrap());
        assert!(!expr.matches(&s, |_| Some(Scalar::from("skipped"))).unwrap());
    }

    #[test]
    fn matches_propagates_schema_errors() {
        let s = schema();
        let expr = FilterExpression::new().and(FilterClause::eq("nope", "x"));
        assert!(expr.matches(&s, |_| None).is_err());
    }

    // ---- Property: encode/decode round-trip over valid clause shapes ----

    fn text_value() -> impl Strategy<Value = Scalar> {
        // Printable strings including quotes, commas, and the ` and `
        // separator, which are the hazardous cases for quoting.
        prop_oneof![
            "[ -~]{0,24}".prop_map(Scalar::String),
            Just(Scalar::String("it's 'quoted', and then".to_string())),
        ]
    }

    fn arb_clause() -> impl Strategy<Value = FilterClause> {
        prop_oneof![
            (text_value(), prop_oneof![Just(FilterOp::Eq), Just(FilterOp::Ne)])
                .prop_map(|(v, op)| FilterClause::new("status", op, v)),
            text_value().prop_map(|v| FilterClause::new("name", FilterOp::Contains, v)),
            (any::<i64>(), prop_oneof![
                Just(FilterOp::Eq),
                Just(FilterOp::Gt),
                Just(FilterOp::Ge),
                Just(FilterOp::Lt),
                Just(FilterOp::Le),
            ])
                .prop_map(|(v, op)| FilterClause::new("priority", op, v)),
            any::<bool>().prop_map(|v| FilterClause::eq("archived", v)),
            prop::collection::vec(text_value(), 1..4).prop_map(|vs| {
                FilterClause::new("status", FilterOp::In, Scalar::List(vs))
            }),
        ]
    }

    proptest! {
        #[test]
        fn encode_decode_round_trip(clauses in prop::collection::vec(arb_clause(), 0..5)) {
            let expr = clauses
                .into_iter()
                .fold(FilterExpression::new(), FilterExpression::and);
            let encoded = encode_odata(&expr, &schema()).unwrap();
            let decoded = decode_odata(&encoded).unwrap();
            prop_assert_eq!(decoded, expr);
        }
    }
}
