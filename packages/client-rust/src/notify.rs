//! Notification sinks.

use gridline_core::{Notifier, Severity};
use parking_lot::Mutex;

/// Routes notifications to `tracing` at a level matching their severity.
/// The default sink for headless shells and services.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => tracing::info!(message),
            Severity::Warning => tracing::warn!(message),
            Severity::Error => tracing::error!(message),
        }
    }
}

/// Collects notifications in memory for tests and demo shells.
#[derive(Debug, Default)]
pub struct BufferedNotifier {
    shown: Mutex<Vec<(String, Severity)>>,
}

impl BufferedNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything shown so far, in order.
    #[must_use]
    pub fn shown(&self) -> Vec<(String, Severity)> {
        self.shown.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.lock().is_empty()
    }
}

impl Notifier for BufferedNotifier {
    fn show(&self, message: &str, severity: Severity) {
        self.shown.lock().push((message.to_string(), severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_notifier_records_in_order() {
        let notifier = BufferedNotifier::new();
        notifier.show("first", Severity::Info);
        notifier.show("second", Severity::Error);

        assert_eq!(notifier.len(), 2);
        assert_eq!(
            notifier.shown(),
            vec![
                ("first".to_string(), Severity::Info),
                ("second".to_string(), Severity::Error),
            ]
        );
    }
}
