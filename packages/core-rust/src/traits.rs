use async_trait::async_trait;

use crate::page::{ListResult, PageRequest};

/// Paginated-list data source for one entity.
///
/// The one contract a backend route must satisfy: given skip/limit, an
/// optional encoded filter, and an optional sort, return one page of rows
/// plus the unpaginated filtered count. Controllers are agnostic to the
/// transport behind it (HTTP client, in-memory store, test stub).
#[async_trait]
pub trait ListSource<R: Send + 'static>: Send + Sync {
    /// Fetches one page.
    ///
    /// # Errors
    ///
    /// Any transport or decode failure; the controller preserves its last
    /// good page and surfaces the message alongside it.
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<ListResult<R>>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Fire-and-forget sink for user-facing status messages.
/// Implementations observe messages and render them however the shell
/// chooses (toast, banner, log line); callers never await delivery.
pub trait Notifier: Send + Sync {
    /// Called once per consolidated status message.
    fn show(&self, message: &str, severity: Severity);
}
