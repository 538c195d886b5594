//! Keyed single-flight coordination.
//!
//! At most one refresh flight exists per identity at any time. The first
//! caller to begin a flight becomes its *leader* and runs the fetch; every
//! concurrent caller *joins* the existing flight and can await its result.
//! Ownership is explicit: the map hands out a guard whose drop always
//! releases the slot, so a panicking or aborted leader can never wedge an
//! identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use turnstile_types::{PlayerId, VerificationStatus};

/// How a refresh flight ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshResult {
    /// The fetch-and-judge cycle completed; the record now has this status.
    Completed(VerificationStatus),
    /// The fetch failed or timed out; the identity reverted toward absent.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum FlightState {
    InFlight,
    Done(RefreshResult),
}

type SlotMap = Arc<Mutex<HashMap<PlayerId, watch::Receiver<FlightState>>>>;

/// Arena of in-flight refreshes, keyed by identity.
#[derive(Default)]
pub struct FlightMap {
    slots: SlotMap,
}

/// Result of [`FlightMap::begin`].
pub enum Flight {
    /// This caller owns the flight and must run the refresh.
    Leader(FlightGuard),
    /// Another caller is already refreshing this identity.
    Joined(RefreshHandle),
}

impl FlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim or join the flight for `key`.
    pub fn begin(&self, key: &PlayerId) -> Flight {
        let mut slots = self.slots.lock().unwrap();
        if let Some(rx) = slots.get(key) {
            return Flight::Joined(RefreshHandle { rx: rx.clone() });
        }
        let (tx, rx) = watch::channel(FlightState::InFlight);
        slots.insert(key.clone(), rx);
        Flight::Leader(FlightGuard {
            key: key.clone(),
            tx,
            slots: Arc::clone(&self.slots),
            finished: false,
        })
    }

    /// Attach to the flight for `key` without claiming leadership.
    pub fn join(&self, key: &PlayerId) -> Option<RefreshHandle> {
        self.slots
            .lock()
            .unwrap()
            .get(key)
            .map(|rx| RefreshHandle { rx: rx.clone() })
    }

    /// Whether a flight is currently active for `key`.
    pub fn in_flight(&self, key: &PlayerId) -> bool {
        self.slots.lock().unwrap().contains_key(key)
    }

    /// Number of active flights (across all identities).
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Leadership of one flight. Dropping without [`FlightGuard::finish`]
/// releases the slot and reports [`RefreshResult::Failed`] to joiners.
pub struct FlightGuard {
    key: PlayerId,
    tx: watch::Sender<FlightState>,
    slots: SlotMap,
    finished: bool,
}

impl FlightGuard {
    /// A handle on this flight's own result, for the leader to hand out.
    pub fn handle(&self) -> RefreshHandle {
        RefreshHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish the result and release the slot.
    pub fn finish(mut self, result: RefreshResult) {
        self.complete(result);
    }

    fn complete(&mut self, result: RefreshResult) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.slots.lock().unwrap().remove(&self.key);
        // Joiners may all have gone away; that is fine.
        let _ = self.tx.send(FlightState::Done(result));
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.complete(RefreshResult::Failed);
    }
}

/// A joiner's view of an in-flight refresh.
#[derive(Clone, Debug)]
pub struct RefreshHandle {
    rx: watch::Receiver<FlightState>,
}

impl RefreshHandle {
    /// Wait for the flight to end and return its result.
    pub async fn outcome(mut self) -> RefreshResult {
        loop {
            {
                let state = self.rx.borrow();
                if let FlightState::Done(result) = &*state {
                    return result.clone();
                }
            }
            if self.rx.changed().await.is_err() {
                // Leader gone; the final value (if any) is already visible.
                let state = self.rx.borrow();
                return match &*state {
                    FlightState::Done(result) => result.clone(),
                    FlightState::InFlight => RefreshResult::Failed,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PlayerId {
        PlayerId::parse(s).unwrap()
    }

    #[test]
    fn first_caller_leads_rest_join() {
        let map = FlightMap::new();
        let id = key("STEAM_1:0:1");

        let first = map.begin(&id);
        assert!(matches!(first, Flight::Leader(_)));
        assert!(map.in_flight(&id));

        assert!(matches!(map.begin(&id), Flight::Joined(_)));
        assert!(matches!(map.begin(&id), Flight::Joined(_)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn identities_do_not_share_flights() {
        let map = FlightMap::new();
        let a = map.begin(&key("STEAM_1:0:1"));
        let b = map.begin(&key("STEAM_1:0:2"));
        assert!(matches!(a, Flight::Leader(_)));
        assert!(matches!(b, Flight::Leader(_)));
        assert_eq!(map.len(), 2);
    }

    #[tokio::test]
    async fn finish_releases_and_notifies() {
        let map = FlightMap::new();
        let id = key("STEAM_1:0:1");

        let guard = match map.begin(&id) {
            Flight::Leader(g) => g,
            Flight::Joined(_) => panic!("expected to lead"),
        };
        let joiner = match map.begin(&id) {
            Flight::Joined(h) => h,
            Flight::Leader(_) => panic!("expected to join"),
        };

        guard.finish(RefreshResult::Completed(VerificationStatus::Allowed));
        assert!(!map.in_flight(&id));
        assert_eq!(
            joiner.outcome().await,
            RefreshResult::Completed(VerificationStatus::Allowed)
        );
    }

    #[tokio::test]
    async fn dropped_leader_reports_failure() {
        let map = FlightMap::new();
        let id = key("STEAM_1:0:1");

        let guard = match map.begin(&id) {
            Flight::Leader(g) => g,
            Flight::Joined(_) => panic!("expected to lead"),
        };
        let joiner = guard.handle();

        drop(guard);
        assert!(!map.in_flight(&id));
        assert_eq!(joiner.outcome().await, RefreshResult::Failed);
    }

    #[tokio::test]
    async fn slot_is_reusable_after_completion() {
        let map = FlightMap::new();
        let id = key("STEAM_1:0:1");

        match map.begin(&id) {
            Flight::Leader(g) => g.finish(RefreshResult::Failed),
            Flight::Joined(_) => panic!("expected to lead"),
        }
        assert!(matches!(map.begin(&id), Flight::Leader(_)));
    }
}
