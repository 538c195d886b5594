//! Nullable audit sink — records events for assertions.

use std::sync::Mutex;
use turnstile_store::{AuditEvent, AuditSink};
use turnstile_types::VerificationStatus;

/// Captures every audit event in memory, in emission order.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The verification transitions observed so far, as (from, to) pairs.
    /// `None` is the absent state.
    pub fn transitions(&self) -> Vec<(Option<VerificationStatus>, Option<VerificationStatus>)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                AuditEvent::Transition { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn decision_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, AuditEvent::Decision { .. }))
            .count()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}
