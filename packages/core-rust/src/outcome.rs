//! Aggregated results of batch mutations.

use serde::{Deserialize, Serialize};

/// One failed item of a batch, with its error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of an all-settled batch over a set of row ids.
///
/// Invariant: `succeeded.len() + failed.len()` equals the number of ids
/// the batch was invoked with. Produced once per batch invocation and
/// consumed whole, so the UI shows exactly one consolidated message
/// instead of one notification per item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Total number of items the batch settled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether every item succeeded.
    #[must_use]
    pub fn is_all_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// The single consolidated notification line for this batch.
    ///
    /// `"2 succeeded"` when everything worked, otherwise
    /// `"1 succeeded, 1 failed: conflict"` with the first failure's
    /// message as the headline reason.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("{} succeeded", self.succeeded.len())
        } else {
            format!(
                "{} succeeded, {} failed: {}",
                self.succeeded.len(),
                self.failed.len(),
                self.failed[0].error
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
