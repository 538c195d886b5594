//! Audit sink backed by structured logs.

use turnstile_store::{AuditEvent, AuditSink};
use turnstile_types::VerificationStatus;

/// Emits every audit event as a structured `tracing` event under the
/// `turnstile::audit` target, for deployments whose compliance pipeline
/// ingests the log stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

fn status_label(status: Option<VerificationStatus>) -> String {
    match status {
        Some(s) => s.to_string(),
        None => "absent".to_string(),
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::Decision {
                identity,
                address,
                server,
                verdict,
                rule,
                at,
            } => {
                tracing::info!(
                    target: "turnstile::audit",
                    identity = %identity,
                    address = ?address,
                    server = %server,
                    verdict = %verdict,
                    rule = %rule,
                    at = at.as_secs(),
                    "decision"
                );
            }
            AuditEvent::Transition {
                identity,
                from,
                to,
                reason,
                at,
                ..
            } => {
                tracing::info!(
                    target: "turnstile::audit",
                    identity = %identity,
                    from = %status_label(from),
                    to = %status_label(to),
                    reason = reason.as_deref().unwrap_or(""),
                    at = at.as_secs(),
                    "verification transition"
                );
            }
            AuditEvent::FetchFailure {
                identity,
                error,
                at,
            } => {
                tracing::warn!(
                    target: "turnstile::audit",
                    identity = %identity,
                    error = %error,
                    at = at.as_secs(),
                    "reputation fetch failure"
                );
            }
        }
    }
}
