//! HTTP [`ListSource`] for the backend's paginated-list routes.
//!
//! Every list endpoint speaks the same shape: `skip`, `limit`,
//! `sort_by`, `sort_order`, and `$filter` query parameters in, a
//! `{ "data": [...], "pagination": { "totalCount": n } }` envelope out.
//! Rows deserialize straight into the typed row at this boundary, so
//! downstream code never re-shapes loosely-typed payloads.

use std::marker::PhantomData;

use async_trait::async_trait;
use gridline_core::{ListResult, ListSource, PageRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Errors from the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("list request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Standard paginated-list response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationMeta {
    total_count: u64,
}

/// `ListSource` hitting one paginated REST route.
pub struct HttpListSource<R> {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    _rows: PhantomData<fn() -> R>,
}

impl<R> HttpListSource<R> {
    /// Creates a source for the list route at `endpoint`
    /// (e.g. `https://api.example.dev/test-runs`).
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: reqwest::Url) -> Self {
        Self {
            client,
            endpoint,
            _rows: PhantomData,
        }
    }

    /// The endpoint with the request's query parameters applied.
    fn request_url(&self, request: &PageRequest) -> reqwest::Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("skip", &request.skip.to_string());
            pairs.append_pair("limit", &request.limit.to_string());
            if let Some(sort_by) = &request.sort_by {
                pairs.append_pair("sort_by", sort_by);
            }
            if let Some(sort_order) = request.sort_order {
                pairs.append_pair("sort_order", sort_order.as_str());
            }
            if let Some(filter) = &request.filter {
                pairs.append_pair("$filter", filter);
            }
        }
        url
    }
}

#[async_trait]
impl<R> ListSource<R> for HttpListSource<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<ListResult<R>> {
        let url = self.request_url(request);
        tracing::debug!(%url, "fetching list page");
        let envelope: ListEnvelope<R> = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SourceError::Transport)?
            .error_for_status()
            .map_err(SourceError::Transport)?
            .json()
            .await
            .map_err(SourceError::Transport)?;
        Ok(ListResult::new(
            envelope.data,
            envelope.pagination.total_count,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use gridline_core::{JsonRow, PaginationModel, SortSpec};

    use super::*;

    fn source() -> HttpListSource<JsonRow> {
        let endpoint = reqwest::Url::parse("https://api.example.dev/test-runs").unwrap();
        HttpListSource::new(reqwest::Client::new(), endpoint)
    }

    #[test]
    fn request_url_carries_all_parameters() {
        let request = PageRequest::from_parts(
            PaginationModel::new(2, 10),
            Some(&SortSpec::desc("createdAt")),
            Some("contains(tolower(name), tolower('smoke'))".to_string()),
        );
        let url = source().request_url(&request);

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("skip".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("sort_by".to_string(), "createdAt".to_string()),
                ("sort_order".to_string(), "desc".to_string()),
                (
                    "$filter".to_string(),
                    "contains(tolower(name), tolower('smoke'))".to_string()
                ),
            ]
        );
    }

    #[test]
    fn request_url_omits_absent_parameters() {
        let request = PageRequest {
            skip: 0,
            limit: 25,
            ..PageRequest::default()
        };
        let url = source().request_url(&request);
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["skip".to_string(), "limit".to_string()]);
    }

    #[test]
    fn envelope_deserializes_camel_case() {
        let payload = r#"{
            "data": [
                { "id": "run-1", "name": "smoke", "status": "passed" },
                { "id": "run-2", "name": "load", "status": "failed" }
            ],
            "pagination": { "totalCount": 41 }
        }"#;
        let envelope: ListEnvelope<JsonRow> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.pagination.total_count, 41);
        assert_eq!(gridline_core::Row::id(&envelope.data[0]), "run-1");
    }

    #[test]
    fn envelope_tolerates_missing_data_array() {
        let payload = r#"{ "pagination": { "totalCount": 0 } }"#;
        let envelope: ListEnvelope<JsonRow> = serde_json::from_str(payload).unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn envelope_rejects_rows_without_ids() {
        let payload = r#"{
            "data": [ { "name": "no id here" } ],
            "pagination": { "totalCount": 1 }
        }"#;
        let result: Result<ListEnvelope<JsonRow>, _> = serde_json::from_str(payload);
        assert!(result.is_err());
    }
}
