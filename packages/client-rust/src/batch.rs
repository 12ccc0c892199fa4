//! All-settled batch execution over selected row ids.

use std::fmt;
use std::future::Future;

use futures_util::future;
use futures_util::stream::{self, StreamExt};
use gridline_core::{BatchFailure, BatchOutcome};

/// Runs one async operation per row id and aggregates the outcomes.
///
/// All-settled semantics: one failing item never aborts the others, the
/// call never rejects as a whole, and per-id errors are preserved so the
/// caller can report "3 succeeded, 1 failed: conflict" in one message.
/// The executor does exactly that and nothing else — selection state,
/// cache invalidation, and notifications are composed by the caller
/// after [`BatchExecutor::run`] resolves.
///
/// Dispatch is unbounded by default (every request fires at once, the
/// reference behavior); [`BatchExecutor::with_concurrency`] opts into a
/// cap for selections large enough to overwhelm the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchExecutor {
    concurrency: Option<usize>,
}

impl BatchExecutor {
    /// Executor with unbounded dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of operations in flight at once (clamped to at
    /// least 1).
    #[must_use]
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit.max(1));
        self
    }

    /// Executes `op(id)` for every id and returns the settled outcome.
    ///
    /// Outcomes are order-independent per id; `succeeded` and `failed`
    /// together always account for every input id.
    pub async fn run<Op, Fut, E>(&self, ids: &[String], op: Op) -> BatchOutcome
    where
        Op: Fn(String) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let op = &op;
        let attempts = ids.iter().cloned().map(|id| async move {
            let result = op(id.clone()).await;
            (id, result)
        });

        let settled: Vec<(String, Result<(), E>)> = match self.concurrency {
            None => future::join_all(attempts).await,
            Some(limit) => stream::iter(attempts).buffer_unordered(limit).collect().await,
        };

        let mut outcome = BatchOutcome::default();
        for (id, result) in settled {
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(error) => {
                    tracing::debug!(%id, %error, "batch item failed");
                    outcome.failed.push(BatchFailure {
                        id,
                        error: error.to_string(),
                    });
                }
            }
        }
        if !outcome.is_all_success() {
            tracing::warn!(
                succeeded = outcome.succeeded.len(),
                failed = outcome.failed.len(),
                "batch completed with failures"
            );
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
