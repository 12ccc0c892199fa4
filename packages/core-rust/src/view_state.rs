//! View-state codec for URL query strings.
//!
//! Pages persist their tab, pagination, sort, and free-text filter into
//! the route's query string so views are shareable and survive reloads.
//! This codec is the pure middle layer: it maps view state to and from
//! key/value pairs, leaving percent-encoding to the transport (or the
//! browser), so the mapping is independently testable.

use serde::{Deserialize, Serialize};

use crate::page::{PaginationModel, SortDirection, SortSpec};

/// Restorable UI state of one list page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Active tab, when the page has tabbed sections.
    pub tab: Option<String>,
    pub pagination: PaginationModel,
    pub sort: Option<SortSpec>,
    /// Free-text filter as the user typed it (not the encoded `$filter`).
    pub filter_text: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: None,
            pagination: PaginationModel::default(),
            sort: None,
            filter_text: None,
        }
    }
}

impl ViewState {
    /// Serializes to query-string pairs, omitting defaults.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(tab) = &self.tab {
            pairs.push(("tab".to_string(), tab.clone()));
        }
        if self.pagination.page() != 0 {
            pairs.push(("page".to_string(), self.pagination.page().to_string()));
        }
        pairs.push((
            "pageSize".to_string(),
            self.pagination.page_size().to_string(),
        ));
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy".to_string(), sort.field.clone()));
            pairs.push(("sortOrder".to_string(), sort.direction.as_str().to_string()));
        }
        if let Some(filter) = &self.filter_text {
            if !filter.is_empty() {
                pairs.push(("filter".to_string(), filter.clone()));
            }
        }
        pairs
    }

    /// Restores view state from query-string pairs.
    ///
    /// Lenient by design: unknown keys are ignored, malformed numbers
    /// fall back to defaults, and a `sortBy` without a `sortOrder`
    /// defaults to ascending. A shared URL never fails to open.
    #[must_use]
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::default();
        let mut sort_by: Option<String> = None;
        let mut sort_order = SortDirection::Asc;
        for (key, value) in pairs {
            match key {
                "tab" => state.tab = Some(value.to_string()),
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        state.pagination = state.pagination.with_page(page);
                    }
                }
                "pageSize" => {
                    if let Ok(size) = value.parse::<u32>() {
                        state.pagination = state.pagination.with_page_size(size);
                    }
                }
                "sortBy" => sort_by = Some(value.to_string()),
                "sortOrder" => {
                    sort_order = match value {
                        "desc" => SortDirection::Desc,
                        _ => SortDirection::Asc,
                    };
                }
                "filter" if !value.is_empty() => {
                    state.filter_text = Some(value.to_string());
                }
                _ => {}
            }
        }
        state.sort = sort_by.map(|field| SortSpec {
            field,
            direction: sort_order,
        });
        state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
