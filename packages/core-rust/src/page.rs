//! Pagination, sorting, and paged-result contracts.

use serde::{Deserialize, Serialize};

/// Grid pagination state: zero-based page index and page size.
///
/// `page_size` is always at least 1 (clamped at construction). The
/// reset-to-first-page rule on filter or sort changes is owned by the
/// feature container, so a new filter never silently shows page 5 of a
/// now-empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationModel {
    page: u32,
    page_size: u32,
}

impl PaginationModel {
    /// Creates a model, clamping `page_size` to at least 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    /// Zero-based page index.
    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip: `page * page_size`.
    #[must_use]
    pub fn skip(self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Copy of this model positioned at the first page.
    #[must_use]
    pub fn first_page(self) -> Self {
        Self { page: 0, ..self }
    }

    /// Copy with a different page index.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    /// Copy with a different page size (clamped to at least 1).
    #[must_use]
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..self
        }
    }
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self { page: 0, page_size: 25 }
    }
}

/// Sort direction for server-side ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire token (`"asc"` / `"desc"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Column and direction of a server-side sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Wire-level parameters of one paged list fetch.
///
/// This is the contract handed to a [`crate::traits::ListSource`]; the
/// filter is already encoded in the backend's `$filter` dialect. A
/// `limit` of 0 means "no limit" (the backend returns everything past
/// `skip`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u32,
    pub filter: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
}

impl PageRequest {
    /// Assembles a request from grid state.
    ///
    /// An empty encoded filter collapses to `None` so the transport omits
    /// the `$filter` parameter entirely.
    #[must_use]
    pub fn from_parts(
        pagination: PaginationModel,
        sort: Option<&SortSpec>,
        filter: Option<String>,
    ) -> Self {
        Self {
            skip: pagination.skip(),
            limit: pagination.page_size(),
            filter: filter.filter(|f| !f.is_empty()),
            sort_by: sort.map(|s| s.field.clone()),
            sort_order: sort.map(|s| s.direction),
        }
    }
}

/// One page of rows plus the unpaginated filtered count.
///
/// `total_count` drives the pager control; `rows.len()` never exceeds the
/// requested page size (the server's invariant, trusted here).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListResult<R> {
    pub rows: Vec<R>,
    pub total_count: u64,
}

impl<R> ListResult<R> {
    #[must_use]
    pub fn new(rows: Vec<R>, total_count: u64) -> Self {
        Self { rows, total_count }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
