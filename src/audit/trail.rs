//! In-memory audit trail recorder.

use std::sync::{Mutex, MutexGuard};

use super::{AuditEvent, AuditSink};

/// In-memory recorder for audit events.
///
/// Shared between requests, so it locks internally. In production you would
/// typically forward events to a persistent audit log instead.
///
/// # Example
///
/// ```
/// use access_gate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditSink, AuditTrail};
///
/// let trail = AuditTrail::new();
///
/// trail.record(AuditEvent::new(
///     "req-123",
///     Some("42"),
///     AuditEventKind::Logout,
///     AuditOutcome::Success,
/// ));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-pushed Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<AuditEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AuditSink for AuditTrail {
    fn record(&self, event: AuditEvent) {
        self.lock().push(event);
    }
}
