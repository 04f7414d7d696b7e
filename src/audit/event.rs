//! Audit event schema and types.
//!
//! Events carry identifiers only: the principal's session identifier, the
//! request id and the request URI. Principals themselves are never stored.

use std::fmt;

use crate::response::DenialKind;

/// Kind of audit event being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// A principal was bound to the session
    Login,
    /// The principal was removed from the session
    Logout,
    /// The gate or the error interceptor denied a request
    AccessDenied,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::Login => write!(f, "login"),
            AuditEventKind::Logout => write!(f, "logout"),
            AuditEventKind::AccessDenied => write!(f, "access_denied"),
        }
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Operation succeeded
    Success,
    /// Operation was denied by policy
    Denied,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Denied => write!(f, "denied"),
        }
    }
}

/// A structured audit event.
///
/// # Example
///
/// ```
/// use access_gate::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new(
///     "req-123",
///     Some("42"),
///     AuditEventKind::Login,
///     AuditOutcome::Success,
/// )
/// .with_uri("/account/login");
///
/// assert_eq!(event.request_id(), "req-123");
/// assert_eq!(event.principal(), Some("42"));
/// assert_eq!(event.uri(), Some("/account/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Request identifier for correlation
    request_id: String,
    /// Session identifier of the principal, None for anonymous requests
    principal: Option<String>,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    uri: Option<String>,
    /// Set on denials only
    reason: Option<DenialKind>,
}

impl AuditEvent {
    /// Creates a new audit event with required fields.
    pub fn new(
        request_id: impl Into<String>,
        principal: Option<impl Into<String>>,
        kind: AuditEventKind,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            principal: principal.map(Into::into),
            kind,
            outcome,
            uri: None,
            reason: None,
        }
    }

    /// Sets the request URI.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the denial reason.
    pub fn with_reason(mut self, reason: DenialKind) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the principal's session identifier, if any.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the operation outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the request URI, if set.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the denial reason, if set.
    pub fn reason(&self) -> Option<DenialKind> {
        self.reason
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}, principal={}",
            self.kind,
            self.outcome,
            self.request_id,
            self.principal.as_deref().unwrap_or("<none>")
        )?;

        if let Some(uri) = &self.uri {
            write!(f, ", uri={}", uri)?;
        }
        if let Some(reason) = self.reason {
            write!(f, ", reason={}", reason)?;
        }

        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_event_kind_display() {
        assert_eq!(AuditEventKind::Login.to_string(), "login");
        assert_eq!(AuditEventKind::AccessDenied.to_string(), "access_denied");
    }

    #[test]
    fn audit_event_minimal() {
        let event = AuditEvent::new(
            "req-123",
            Some("42"),
            AuditEventKind::Login,
            AuditOutcome::Success,
        );

        assert_eq!(event.kind(), AuditEventKind::Login);
        assert_eq!(event.outcome(), AuditOutcome::Success);
        assert!(event.uri().is_none());
        assert!(event.reason().is_none());
    }

    #[test]
    fn audit_event_display_includes_optional_fields() {
        let event = AuditEvent::new(
            "req-9",
            None::<String>,
            AuditEventKind::AccessDenied,
            AuditOutcome::Denied,
        )
        .with_uri("/orders")
        .with_reason(DenialKind::Unauthenticated);

        assert_eq!(
            event.to_string(),
            "AuditEvent[kind=access_denied, outcome=denied, request_id=req-9, \
             principal=<none>, uri=/orders, reason=unauthenticated]"
        );
    }
}
