//! Nullable reputation fetcher — scripted results, no network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;
use turnstile_types::{PlayerId, ProfileAttributes};
use turnstile_verification::{FetchError, ReputationFetcher};

/// A programmable fetcher.
///
/// Responses are scripted per identity; unscripted identities succeed with
/// the default response. Every call is counted, and an optional latency
/// (virtual time under a paused tokio runtime) lets single-flight tests
/// hold many callers against one in-flight fetch.
pub struct StubFetcher {
    default: Result<ProfileAttributes, FetchError>,
    scripted: Mutex<HashMap<PlayerId, Result<ProfileAttributes, FetchError>>>,
    latency_ms: AtomicU64,
    calls: AtomicU32,
}

impl StubFetcher {
    /// Every fetch succeeds with `attributes` unless scripted otherwise.
    pub fn returning(attributes: ProfileAttributes) -> Self {
        Self {
            default: Ok(attributes),
            scripted: Mutex::new(HashMap::new()),
            latency_ms: AtomicU64::new(0),
            calls: AtomicU32::new(0),
        }
    }

    /// Every fetch fails with `error` unless scripted otherwise.
    pub fn failing(error: FetchError) -> Self {
        Self {
            default: Err(error),
            scripted: Mutex::new(HashMap::new()),
            latency_ms: AtomicU64::new(0),
            calls: AtomicU32::new(0),
        }
    }

    /// Script the response for a specific identity.
    pub fn script(&self, identity: PlayerId, response: Result<ProfileAttributes, FetchError>) {
        self.scripted.lock().unwrap().insert(identity, response);
    }

    /// Delay every fetch by this many milliseconds.
    pub fn set_latency_ms(&self, ms: u64) {
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Total number of fetch calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReputationFetcher for StubFetcher {
    fn fetch<'a>(
        &'a self,
        identity: &'a PlayerId,
    ) -> BoxFuture<'a, Result<ProfileAttributes, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .scripted
            .lock()
            .unwrap()
            .get(identity)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        let latency = self.latency_ms.load(Ordering::SeqCst);
        Box::pin(async move {
            if latency > 0 {
                tokio::time::sleep(Duration::from_millis(latency)).await;
            }
            response
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}
