//! Feature containers: one entity's list page, fully wired.
//!
//! A container composes the schema, query controller, selection tracker,
//! batch executor, and notifier for a single entity list (tasks, test
//! runs, tokens, …) and enforces the cross-cutting policies the pieces
//! deliberately leave to their caller: page reset on filter/sort change,
//! selection clearing on any view change, one consolidated notification
//! per batch, and refusal of overlapping destructive batches.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use gridline_core::{
    encode_odata, BatchOutcome, EntitySchema, FilterError, FilterExpression, ListResult,
    ListSource, Notifier, PageRequest, PaginationModel, Row, SelectionTracker, Severity,
    SortSpec,
};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::batch::BatchExecutor;
use crate::controller::ListQueryController;

// ---------------------------------------------------------------------------
// Errors and phases
// ---------------------------------------------------------------------------

/// Errors surfaced by container operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// A destructive batch is already in flight; the UI keeps its
    /// delete/execute buttons disabled until it resolves.
    #[error("a mutation is already in flight for this list")]
    MutationPending,
}

/// Render phase of a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    /// Nothing loaded yet and nothing in flight.
    Idle,
    /// A fetch is in flight (possibly with stale rows still visible).
    Loading,
    /// Rows loaded, no outstanding error.
    Loaded,
    /// The last fetch failed; stale rows, if any, stay visible under a
    /// dismissible banner.
    LoadedWithError,
}

// ---------------------------------------------------------------------------
// EntityListContainer
// ---------------------------------------------------------------------------

/// View parameters owned by the container.
struct ViewParams {
    pagination: PaginationModel,
    filter: FilterExpression,
    /// `filter` pre-encoded at the last `set_filter`, so sort and
    /// pagination changes never re-run fallible encoding.
    encoded_filter: String,
    sort: Option<SortSpec>,
}

/// One entity's list page: grid state plus the actions bound to it.
///
/// All methods take `&self`; containers live in an `Arc`, owned by the
/// page that created them. Nothing is shared across containers.
pub struct EntityListContainer<R: Row> {
    schema: EntitySchema,
    controller: ListQueryController<R>,
    executor: BatchExecutor,
    notifier: Arc<dyn Notifier>,
    params: Mutex<ViewParams>,
    selection: Mutex<SelectionTracker>,
    mutation_pending: AtomicBool,
}

impl<R: Row> EntityListContainer<R> {
    /// Wires a container for `schema`'s entity against `source`.
    #[must_use]
    pub fn new(
        schema: EntitySchema,
        source: Arc<dyn ListSource<R>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            schema,
            controller: ListQueryController::new(source),
            executor: BatchExecutor::new(),
            notifier,
            params: Mutex::new(ViewParams {
                pagination: PaginationModel::default(),
                filter: FilterExpression::new(),
                encoded_filter: String::new(),
                sort: None,
            }),
            selection: Mutex::new(SelectionTracker::new()),
            mutation_pending: AtomicBool::new(false),
        }
    }

    /// Replaces the batch executor (e.g. to cap batch concurrency).
    #[must_use]
    pub fn with_executor(mut self, executor: BatchExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Entity name (route segment) this container serves.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.schema.entity
    }

    #[must_use]
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Issues the initial fetch for the current view parameters.
    pub async fn load(&self) {
        let request = self.current_request();
        self.controller.set_request(request).await;
    }

    /// Applies a new filter: encodes it (fail closed — on a schema error
    /// nothing changes), resets to the first page, clears the selection,
    /// and refetches.
    ///
    /// # Errors
    ///
    /// Returns the encoding error when the expression references unknown
    /// fields or type-invalid operators.
    pub async fn set_filter(&self, filter: FilterExpression) -> Result<(), ContainerError> {
        let request = {
            let mut params = self.params.lock();
            let encoded = encode_odata(&filter, &self.schema)?;
            params.filter = filter;
            params.encoded_filter = encoded;
            params.pagination = params.pagination.first_page();
            Self::request_for(&params)
        };
        self.selection.lock().clear();
        self.controller.set_request(request).await;
        Ok(())
    }

    /// Applies a new sort: resets to the first page, clears the
    /// selection, and refetches.
    pub async fn set_sort(&self, sort: Option<SortSpec>) {
        let request = {
            let mut params = self.params.lock();
            params.sort = sort;
            params.pagination = params.pagination.first_page();
            Self::request_for(&params)
        };
        self.selection.lock().clear();
        self.controller.set_request(request).await;
    }

    /// Applies a pagination change from the grid: clears the selection
    /// and refetches with the current filter and sort.
    pub async fn set_pagination(&self, page: u32, page_size: u32) {
        let request = {
            let mut params = self.params.lock();
            params.pagination = PaginationModel::new(page, page_size);
            Self::request_for(&params)
        };
        self.selection.lock().clear();
        self.controller.set_request(request).await;
    }

    /// Refetches the current page (used after out-of-band mutations).
    pub async fn refresh(&self) {
        self.controller.refetch().await;
    }

    fn request_for(params: &ViewParams) -> PageRequest {
        PageRequest::from_parts(
            params.pagination,
            params.sort.as_ref(),
            Some(params.encoded_filter.clone()),
        )
    }

    fn current_request(&self) -> PageRequest {
        Self::request_for(&self.params.lock())
    }

    // ---- read accessors -------------------------------------------------

    /// Rows of the last committed page.
    #[must_use]
    pub fn rows(&self) -> Option<Arc<ListResult<R>>> {
        self.controller.data()
    }

    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.controller.total_count()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.controller.error()
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationModel {
        self.params.lock().pagination
    }

    #[must_use]
    pub fn filter(&self) -> FilterExpression {
        self.params.lock().filter.clone()
    }

    #[must_use]
    pub fn sort(&self) -> Option<SortSpec> {
        self.params.lock().sort.clone()
    }

    /// Render phase derived from controller state.
    #[must_use]
    pub fn phase(&self) -> ContainerPhase {
        if self.controller.loading() {
            return ContainerPhase::Loading;
        }
        match (self.controller.data(), self.controller.error()) {
            (None, None) => ContainerPhase::Idle,
            (_, Some(_)) => ContainerPhase::LoadedWithError,
            (Some(_), None) => ContainerPhase::Loaded,
        }
    }

    /// State-version receiver for render loops.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.controller.subscribe()
    }

    // ---- selection ------------------------------------------------------

    /// Toggles one row, constrained to ids on the loaded page. Returns
    /// `false` (and leaves the selection untouched) for an id that is not
    /// currently visible.
    pub fn toggle_row(&self, id: &str) -> bool {
        let visible = self
            .controller
            .data()
            .is_some_and(|page| page.rows.iter().any(|row| row.id() == id));
        if !visible {
            tracing::debug!(entity = %self.entity(), id, "ignoring toggle for off-page row");
            return false;
        }
        self.selection.lock().toggle_one(id);
        true
    }

    /// Selects exactly the rows on the loaded page.
    pub fn select_visible(&self) {
        let ids: Vec<String> = self
            .controller
            .data()
            .map(|page| page.rows.iter().map(|row| row.id().to_string()).collect())
            .unwrap_or_default();
        self.selection.lock().select_all(ids);
    }

    pub fn clear_selection(&self) {
        self.selection.lock().clear();
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.lock().selected()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.lock().is_selected(id)
    }

    /// Whether a destructive batch is in flight (UI disables its
    /// delete/execute actions while true).
    #[must_use]
    pub fn is_mutation_pending(&self) -> bool {
        self.mutation_pending.load(Ordering::SeqCst)
    }

    // ---- batch mutations -------------------------------------------------

    /// Runs `op` over the selected ids with all-settled semantics, shows
    /// one consolidated notification, refetches the list, and clears the
    /// selection.
    ///
    /// An empty selection settles immediately with an empty outcome and
    /// no notification.
    ///
    /// # Errors
    ///
    /// `ContainerError::MutationPending` when another batch is still in
    /// flight for this list.
    pub async fn run_selected<Op, Fut, E>(&self, op: Op) -> Result<BatchOutcome, ContainerError>
    where
        Op: Fn(String) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        if self
            .mutation_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ContainerError::MutationPending);
        }

        let ids = self.selection.lock().selected();
        if ids.is_empty() {
            self.mutation_pending.store(false, Ordering::SeqCst);
            return Ok(BatchOutcome::default());
        }

        let outcome = self.executor.run(&ids, op).await;
        let severity = if outcome.is_all_success() {
            Severity::Success
        } else {
            Severity::Warning
        };
        self.notifier.show(&outcome.summary(), severity);

        self.controller.refetch().await;
        self.selection.lock().clear();
        self.mutation_pending.store(false, Ordering::SeqCst);
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// ListPage and ContainerRegistry
// ---------------------------------------------------------------------------

/// Row-type-erased view of a container, for shell code that renders
/// navigation and status across entity pages.
pub trait ListPage: Send + Sync + 'static {
    fn entity(&self) -> &str;
    fn phase(&self) -> ContainerPhase;
    fn total_count(&self) -> Option<u64>;
    fn selected_count(&self) -> usize;
}

impl<R: Row> ListPage for EntityListContainer<R> {
    fn entity(&self) -> &str {
        Self::entity(self)
    }

    fn phase(&self) -> ContainerPhase {
        Self::phase(self)
    }

    fn total_count(&self) -> Option<u64> {
        Self::total_count(self)
    }

    fn selected_count(&self) -> usize {
        self.selection.lock().len()
    }
}

/// Registry of containers keyed by entity name.
///
/// The console shell registers one container per entity page and looks
/// them up by route segment — either type-erased (`page`) for nav/status
/// rendering, or typed (`get::<R>`) for the page itself.
#[derive(Default)]
pub struct ContainerRegistry {
    pages: DashMap<String, Arc<dyn ListPage>>,
    typed: DashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ContainerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container under its entity name. A later registration
    /// with the same name replaces the earlier one.
    pub fn register<R: Row>(&self, container: Arc<EntityListContainer<R>>) {
        let entity = container.entity().to_string();
        self.pages
            .insert(entity.clone(), Arc::clone(&container) as Arc<dyn ListPage>);
        self.typed.insert(entity, container);
    }

    /// Type-erased lookup by entity name.
    #[must_use]
    pub fn page(&self, entity: &str) -> Option<Arc<dyn ListPage>> {
        self.pages.get(entity).map(|entry| Arc::clone(entry.value()))
    }

    /// Typed lookup by entity name and row type.
    #[must_use]
    pub fn get<R: Row>(&self, entity: &str) -> Option<Arc<EntityListContainer<R>>> {
        self.typed
            .get(entity)
            .and_then(|entry| Arc::clone(entry.value()).downcast::<EntityListContainer<R>>().ok())
    }

    /// Registered entity names in lexicographic order.
    #[must_use]
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pages.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
