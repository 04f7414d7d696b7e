//! Audit sink that writes events through tracing.

use super::{AuditEvent, AuditSink};

/// Emits every audit event as a structured tracing event on target
/// `access_audit`.
///
/// Route that target to a dedicated file or collector in your subscriber
/// configuration to keep an audit log separate from application logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "access_audit",
            request_id = %event.request_id(),
            principal = ?event.principal(),
            kind = %event.kind(),
            outcome = %event.outcome(),
            uri = ?event.uri(),
            reason = ?event.reason(),
            "audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEventKind, AuditOutcome};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn record_emits_on_audit_target() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(true)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingAudit.record(
                AuditEvent::new(
                    "req-1",
                    Some("42"),
                    AuditEventKind::Login,
                    AuditOutcome::Success,
                )
                .with_uri("/login"),
            );
        });

        let output = captured.contents();
        assert!(output.contains("access_audit"), "{output}");
        assert!(output.contains("kind=login"), "{output}");
        assert!(output.contains("request_id=req-1"), "{output}");
        assert!(output.contains("outcome=success"), "{output}");
    }
}
