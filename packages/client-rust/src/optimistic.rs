//! Optimistic local updates with unconditional rollback.

/// Optimistic-update cell for a single piece of form or detail state.
///
/// State machine: `Idle -> Pending { previous } -> Idle`, leaving via
/// either [`OptimisticCell::commit`] (keep the staged value) or
/// [`OptimisticCell::rollback`] (restore the value from before the first
/// stage). Staging again while pending keeps the original pre-optimistic
/// value, so rollback always lands on what the server last confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticCell<T: Clone> {
    value: T,
    previous: Option<T>,
}

impl<T: Clone> OptimisticCell<T> {
    /// Creates a cell holding a confirmed value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            previous: None,
        }
    }

    /// Current value, staged or confirmed.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether a staged value awaits confirmation.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.previous.is_some()
    }

    /// Stages `next` optimistically, remembering the confirmed value the
    /// first time.
    pub fn stage(&mut self, next: T) {
        if self.previous.is_none() {
            self.previous = Some(self.value.clone());
        }
        self.value = next;
    }

    /// Confirms the staged value; the cell returns to `Idle`.
    pub fn commit(&mut self) {
        self.previous = None;
    }

    /// Restores the last confirmed value. Returns `false` when nothing
    /// was pending (the call is then a no-op).
    pub fn rollback(&mut self) -> bool {
        match self.previous.take() {
            Some(previous) => {
                self.value = previous;
                true
            }
            None => false,
        }
    }
}
