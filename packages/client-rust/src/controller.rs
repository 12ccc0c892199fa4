//! List query controller: one authoritative fetch at a time.
//!
//! Wraps a [`ListSource`] and owns the fetch lifecycle for one grid:
//! re-issue on parameter change, keep the previous page visible while a
//! new one loads, preserve stale data when a fetch fails, and discard
//! late responses that a newer request has superseded.
//!
//! Uses `ArcSwap` for lock-free page snapshots and an atomic issuance
//! token so result application is ordered by request issuance, never by
//! response arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use gridline_core::{ListResult, ListSource, PageRequest};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

/// Query controller for one paginated entity list.
///
/// All methods take `&self`; the controller is designed to live in an
/// `Arc` shared between the render loop (reads) and event handlers
/// (parameter changes and refetches).
pub struct ListQueryController<R: Send + Sync + 'static> {
    source: Arc<dyn ListSource<R>>,
    /// Last successfully committed page. Never cleared when a fetch is
    /// issued or fails, so the grid keeps rendering stale rows instead of
    /// flashing to empty.
    data: ArcSwapOption<ListResult<R>>,
    error: RwLock<Option<String>>,
    request: RwLock<PageRequest>,
    /// Monotonically increasing fetch token. A response commits only if
    /// its token still equals the latest issued one.
    issued: AtomicU64,
    in_flight: AtomicU64,
    /// Serializes the check-then-commit section against concurrent fetches.
    commit_lock: Mutex<()>,
    version: watch::Sender<u64>,
}

impl<R: Send + Sync + 'static> ListQueryController<R> {
    /// Creates a controller with no data loaded and default parameters.
    #[must_use]
    pub fn new(source: Arc<dyn ListSource<R>>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            source,
            data: ArcSwapOption::const_empty(),
            error: RwLock::new(None),
            request: RwLock::new(PageRequest::default()),
            issued: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
            version,
        }
    }

    /// Last committed page, if any.
    #[must_use]
    pub fn data(&self) -> Option<Arc<ListResult<R>>> {
        self.data.load_full()
    }

    /// Whether any issued fetch is still in flight (including superseded
    /// ones still completing on the wire).
    #[must_use]
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failed fetch, cleared by the next
    /// successful one.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Total row count of the last committed page's filtered set.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.data.load().as_ref().map(|page| page.total_count)
    }

    /// Current fetch parameters.
    #[must_use]
    pub fn request(&self) -> PageRequest {
        self.request.read().clone()
    }

    /// State-version receiver for render loops: the value bumps after
    /// every commit, discard, or loading transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Stores new parameters and issues exactly one fetch for them.
    ///
    /// A fetch already in flight is superseded: its eventual result is
    /// discarded on arrival.
    pub async fn set_request(&self, request: PageRequest) {
        *self.request.write() = request.clone();
        self.run_fetch(request).await;
    }

    /// Re-issues the current parameters unconditionally (used after
    /// mutations). Obeys the same supersession rule as `set_request`.
    pub async fn refetch(&self) {
        let request = self.request.read().clone();
        self.run_fetch(request).await;
    }

    async fn run_fetch(&self, request: PageRequest) {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.bump_version();
        tracing::debug!(token, skip = request.skip, limit = request.limit, "issuing list fetch");

        let result = self.source.fetch_page(&request).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        {
            let _commit = self.commit_lock.lock();
            if token == self.issued.load(Ordering::SeqCst) {
                match result {
                    Ok(page) => {
                        tracing::debug!(token, rows = page.len(), total = page.total_count, "list fetch committed");
                        self.data.store(Some(Arc::new(page)));
                        *self.error.write() = None;
                    }
                    Err(err) => {
                        tracing::warn!(token, error = %err, "list fetch failed; keeping last loaded page");
                        *self.error.write() = Some(err.to_string());
                    }
                }
            } else {
                tracing::debug!(token, "discarding superseded list response");
            }
        }
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
