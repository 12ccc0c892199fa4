//! In-memory [`ListSource`] backed by [`DashMap`].
//!
//! Reference backend for demos and tests: honors the same wire contract
//! as the HTTP source (encoded `$filter`, skip/limit, sort) by decoding
//! the filter and evaluating it locally, so a container wired to this
//! source behaves exactly like one wired to the real backend.

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use gridline_core::{
    decode_odata, EntitySchema, FilterExpression, ListResult, ListSource, PageRequest, Row,
    Scalar, SortDirection,
};

/// Field accessor resolving a column name to a row's value.
type FieldAccessor<R> = Box<dyn Fn(&R, &str) -> Option<Scalar> + Send + Sync>;

/// In-memory entity store implementing the paginated-list contract.
///
/// Rows are keyed by id; iteration order is normalized by sorting on id
/// before any requested sort is applied, so pages are deterministic.
pub struct InMemoryListSource<R> {
    schema: EntitySchema,
    rows: DashMap<String, R>,
    fields: FieldAccessor<R>,
}

impl<R: Row + Clone> InMemoryListSource<R> {
    /// Creates an empty store for `schema`, with `fields` resolving the
    /// schema's column names against a row.
    #[must_use]
    pub fn new<F>(schema: EntitySchema, fields: F) -> Self
    where
        F: Fn(&R, &str) -> Option<Scalar> + Send + Sync + 'static,
    {
        Self {
            schema,
            rows: DashMap::new(),
            fields: Box::new(fields),
        }
    }

    /// Inserts or replaces a row, returning the previous one if any.
    pub fn insert(&self, row: R) -> Option<R> {
        self.rows.insert(row.id().to_string(), row)
    }

    /// Removes a row by id, returning it if present.
    pub fn remove(&self, id: &str) -> Option<R> {
        self.rows.remove(id).map(|(_, row)| row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl<R: Row + Clone> ListSource<R> for InMemoryListSource<R> {
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<ListResult<R>> {
        let expression = match &request.filter {
            Some(filter) => decode_odata(filter)?,
            None => FilterExpression::new(),
        };

        let mut matched = Vec::new();
        for entry in self.rows.iter() {
            let row = entry.value();
            if expression.matches(&self.schema, |field| (self.fields)(row, field))? {
                matched.push(row.clone());
            }
        }
        matched.sort_by(|a, b| a.id().cmp(b.id()));

        if let Some(sort_by) = &request.sort_by {
            let direction = request.sort_order.unwrap_or(SortDirection::Asc);
            matched.sort_by(|a, b| {
                let ordering = match ((self.fields)(a, sort_by), (self.fields)(b, sort_by)) {
                    (Some(va), Some(vb)) => va.compare(&vb).unwrap_or(Ordering::Equal),
                    // Rows missing the sort column go last.
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total_count = matched.len() as u64;
        let skipped = matched
            .into_iter()
            .skip(usize::try_from(request.skip).unwrap_or(usize::MAX));
        let rows: Vec<R> = if request.limit == 0 {
            skipped.collect()
        } else {
            skipped.take(request.limit as usize).collect()
        };
        Ok(ListResult::new(rows, total_count))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use gridline_core::{encode_odata, FilterClause};

    use super::*;

    #[derive(Debug, Clone)]
    struct RunRow {
        id: String,
        name: String,
        priority: i64,
    }

    impl Row for RunRow {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn schema() -> EntitySchema {
        EntitySchema::new("test-runs").text("name", true).number("priority")
    }

    fn accessor(row: &RunRow, field: &str) -> Option<Scalar> {
        match field {
            "name" => Some(Scalar::String(row.name.clone())),
            "priority" => Some(Scalar::Int(row.priority)),
            _ => None,
        }
    }

    fn seeded() -> InMemoryListSource<RunRow> {
        let source = InMemoryListSource::new(schema(), accessor);
        for (i, (name, priority)) in [
            ("smoke nightly", 3),
            ("Smoke weekly", 1),
            ("regression", 2),
            ("load", 0),
            ("smoke canary", 2),
        ]
        .iter()
        .enumerate()
        {
            source.insert(RunRow {
                id: format!("run-{i}"),
                name: (*name).to_string(),
                priority: *priority,
            });
        }
        source
    }

    #[tokio::test]
    async fn filters_sorts_and_paginates() {
        let source = seeded();
        let expr = FilterExpression::new().and(FilterClause::contains("name", "smoke"));
        let request = PageRequest {
            skip: 0,
            limit: 2,
            filter: Some(encode_odata(&expr, &schema()).unwrap()),
            sort_by: Some("priority".to_string()),
            sort_order: Some(SortDirection::Desc),
        };

        let result = source.fetch_page(&request).await.unwrap();
        // Case-insensitive contains matches all three smoke rows; the
        // page holds two of them, highest priority first.
        assert_eq!(result.total_count, 3);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].priority, 3);
        assert_eq!(result.rows[1].priority, 2);
    }

    #[tokio::test]
    async fn skip_past_end_yields_empty_page_with_full_count() {
        let source = seeded();
        let request = PageRequest {
            skip: 10,
            limit: 5,
            ..PageRequest::default()
        };
        let result = source.fetch_page(&request).await.unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.total_count, 5);
    }

    #[tokio::test]
    async fn zero_limit_returns_everything() {
        let source = seeded();
        let result = source.fetch_page(&PageRequest::default()).await.unwrap();
        assert_eq!(result.rows.len(), 5);
        // Deterministic id order when no sort is requested.
        assert_eq!(result.rows[0].id, "run-0");
    }

    #[tokio::test]
    async fn unknown_filter_field_is_an_error() {
        let source = seeded();
        let request = PageRequest {
            filter: Some("bogus eq 'x'".to_string()),
            ..PageRequest::default()
        };
        assert!(source.fetch_page(&request).await.is_err());
    }

    #[tokio::test]
    async fn insert_and_remove_round_trip() {
        let source = seeded();
        assert_eq!(source.len(), 5);
        assert!(source.remove("run-0").is_some());
        assert!(source.remove("run-0").is_none());
        assert_eq!(source.len(), 4);
    }
}
