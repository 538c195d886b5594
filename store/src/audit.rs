//! Audit events and the compliance sink port.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use turnstile_types::{
    DecidingRule, PlayerId, ProfileAttributes, Timestamp, VerificationStatus, Verdict,
};

/// An event emitted for compliance logging.
///
/// `from`/`to` of `None` in a [`AuditEvent::Transition`] mean the absent
/// state (no record).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// One per `evaluate` call.
    Decision {
        identity: PlayerId,
        address: Option<IpAddr>,
        server: String,
        verdict: Verdict,
        rule: DecidingRule,
        at: Timestamp,
    },
    /// One per verification state change.
    Transition {
        identity: PlayerId,
        from: Option<VerificationStatus>,
        to: Option<VerificationStatus>,
        attributes: Option<ProfileAttributes>,
        reason: Option<String>,
        at: Timestamp,
    },
    /// A reputation fetch failed or timed out; the identity reverted toward
    /// absent and will be retried.
    FetchFailure {
        identity: PlayerId,
        error: String,
        at: Timestamp,
    },
}

/// Fire-and-forget audit sink. Implementations must not block the caller;
/// the engine never acts on the outcome of a `record` call.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}
