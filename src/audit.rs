//! Audit trail support.
//!
//! This module provides:
//! - `AuditEvent`: record of a login, logout or denial
//! - `AuditSink`: destination for events
//! - `AuditTrail`: in-memory sink
//! - `TracingAudit`: sink that emits events through tracing
//!
//! Attach a sink with [`AuthorizationGate::audit`](crate::AuthorizationGate::audit)
//! or [`PrincipalResolver::audit`](crate::PrincipalResolver::audit).

mod emit;
mod event;
mod trail;

pub use emit::TracingAudit;
pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;

/// Destination for audit events.
///
/// Sinks are shared by every request, so they must be thread-safe.
pub trait AuditSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: AuditEvent);
}

impl<S: AuditSink + ?Sized> AuditSink for std::sync::Arc<S> {
    fn record(&self, event: AuditEvent) {
        (**self).record(event)
    }
}
