//! Staleness-aware verification cache with single-flight refresh.
//!
//! The cache owns all writes to the verification store. An evaluation only
//! ever reads cached state synchronously ([`VerificationCache::get`]) and
//! schedules background work ([`VerificationCache::ensure_fresh`]); the
//! external reputation fetch runs on a spawned task with a timeout and is
//! never awaited on the evaluation path. A fetch that outlives the request
//! that triggered it still completes and updates the cache for the next
//! evaluation.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use turnstile_store::{AuditEvent, AuditSink, StoreError, VerificationRecord, VerificationStore};
use turnstile_types::{Clock, PlayerId, ProfileAttributes, VerificationStatus};

use crate::fetcher::{FetchError, ReputationFetcher};
use crate::policy::{Judgement, VerdictPolicy};
use crate::singleflight::{Flight, FlightMap, RefreshHandle, RefreshResult};

/// Cache timing knobs.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    /// How long a terminal verdict stays fresh.
    pub verdict_ttl_secs: u64,
    /// Age after which a pending record with no live flight may be retried
    /// (bounds duplicate fetches after a crash mid-fetch).
    pub pending_retry_secs: u64,
    /// Budget for one reputation fetch before it counts as failed.
    pub fetch_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            verdict_ttl_secs: 24 * 60 * 60,
            pending_retry_secs: 120,
            fetch_timeout_secs: 10,
        }
    }
}

/// What an evaluation observed about the connecting player; stamped onto
/// the record when a refresh begins.
#[derive(Clone, Debug, Default)]
pub struct Sighting {
    pub display_name: Option<String>,
    pub address: Option<IpAddr>,
}

/// Pure read of the cached state. `status` of `None` means absent.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheReadout {
    pub status: Option<VerificationStatus>,
    pub attributes: Option<ProfileAttributes>,
    pub reason: Option<String>,
    /// Terminal verdict past its TTL: serve it, but refresh.
    pub is_stale: bool,
}

/// What `ensure_fresh` did.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The record is terminal (or verified) and within its TTL.
    Fresh,
    /// This call started a background refresh.
    Scheduled(RefreshHandle),
    /// A refresh was already in flight; attached to it.
    Joined(RefreshHandle),
    /// A pending record is young enough that retrying would duplicate a
    /// fetch some other process may still be running.
    Throttled,
}

pub struct VerificationCache {
    store: Arc<dyn VerificationStore>,
    fetcher: Arc<dyn ReputationFetcher>,
    policy: Arc<dyn VerdictPolicy>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    flights: FlightMap,
    config: CacheConfig,
}

impl VerificationCache {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        fetcher: Arc<dyn ReputationFetcher>,
        policy: Arc<dyn VerdictPolicy>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            policy,
            audit,
            clock,
            flights: FlightMap::new(),
            config,
        }
    }

    /// Read the cached state. Never touches the network.
    pub fn get(&self, identity: &PlayerId) -> Result<CacheReadout, StoreError> {
        let now = self.clock.now();
        Ok(match self.store.get(identity)? {
            None => CacheReadout {
                status: None,
                attributes: None,
                reason: None,
                is_stale: false,
            },
            Some(record) => CacheReadout {
                is_stale: record.is_stale(self.config.verdict_ttl_secs, now),
                status: Some(record.status),
                attributes: record.attributes,
                reason: record.reason,
            },
        })
    }

    /// Make sure a refresh is under way if the cached state is absent or
    /// stale. Idempotent under concurrency: at most one fetch per identity
    /// is ever in flight, and concurrent callers attach to it.
    ///
    /// Must be called from within a Tokio runtime (the refresh is spawned).
    pub fn ensure_fresh(
        self: &Arc<Self>,
        identity: &PlayerId,
        sighting: &Sighting,
    ) -> Result<RefreshOutcome, StoreError> {
        let now = self.clock.now();
        let record = self.store.get(identity)?;

        let due = record.as_ref().map_or(true, |r| {
            r.refresh_due(
                self.config.verdict_ttl_secs,
                self.config.pending_retry_secs,
                now,
            )
        });

        if !due {
            if record.as_ref().map(|r| r.status) == Some(VerificationStatus::Pending) {
                return Ok(match self.flights.join(identity) {
                    Some(handle) => RefreshOutcome::Joined(handle),
                    None => RefreshOutcome::Throttled,
                });
            }
            return Ok(RefreshOutcome::Fresh);
        }

        match self.flights.begin(identity) {
            Flight::Joined(handle) => Ok(RefreshOutcome::Joined(handle)),
            Flight::Leader(guard) => {
                // Re-read under leadership: another flight may have run to
                // completion between the first read and claiming the slot,
                // and acting on the old snapshot would clobber its verdict.
                let record = self.store.get(identity)?;
                if let Some(r) = &record {
                    if !r.refresh_due(
                        self.config.verdict_ttl_secs,
                        self.config.pending_retry_secs,
                        now,
                    ) {
                        guard.finish(RefreshResult::Completed(r.status));
                        return Ok(RefreshOutcome::Fresh);
                    }
                }
                if let Err(e) = self.mark_pending(identity, record, sighting, now) {
                    // Guard drop releases the slot and reports failure.
                    return Err(e);
                }
                let handle = guard.handle();
                let cache = Arc::clone(self);
                let id = identity.clone();
                tokio::spawn(async move {
                    cache.run_refresh(id, guard).await;
                });
                Ok(RefreshOutcome::Scheduled(handle))
            }
        }
    }

    /// Persist the `pending` entry for a refresh that is about to start.
    ///
    /// A `verified` record is refreshed in place and left untouched here:
    /// re-entering `pending` is reserved for terminal records, so only the
    /// documented lifecycle transitions are ever observable.
    fn mark_pending(
        &self,
        identity: &PlayerId,
        record: Option<VerificationRecord>,
        sighting: &Sighting,
        now: turnstile_types::Timestamp,
    ) -> Result<(), StoreError> {
        let prior = record.as_ref().map(|r| r.status);
        if prior == Some(VerificationStatus::Verified) {
            return Ok(());
        }

        let mut pending = match record {
            None => VerificationRecord::pending(identity.clone(), now),
            Some(mut existing) => {
                existing.status = VerificationStatus::Pending;
                existing.attributes = None;
                existing.reason = None;
                existing.updated_at = now;
                existing
            }
        };
        if let Some(name) = &sighting.display_name {
            pending.display_name = Some(name.clone());
        }
        if let Some(addr) = sighting.address {
            pending.last_address = Some(addr);
        }
        self.store.put(&pending)?;

        if prior != Some(VerificationStatus::Pending) {
            self.audit.record(AuditEvent::Transition {
                identity: identity.clone(),
                from: prior,
                to: Some(VerificationStatus::Pending),
                attributes: None,
                reason: None,
                at: now,
            });
        }
        Ok(())
    }

    async fn run_refresh(self: Arc<Self>, identity: PlayerId, guard: crate::singleflight::FlightGuard) {
        let budget = Duration::from_secs(self.config.fetch_timeout_secs);
        let fetched = match tokio::time::timeout(budget, self.fetcher.fetch(&identity)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };

        match fetched {
            Ok(attributes) => match self.complete_refresh(&identity, attributes) {
                Ok(status) => guard.finish(RefreshResult::Completed(status)),
                Err(e) => {
                    tracing::warn!(identity = %identity, error = %e, "verification write failed");
                    guard.finish(RefreshResult::Failed);
                }
            },
            Err(e) => {
                tracing::warn!(
                    identity = %identity,
                    fetcher = self.fetcher.name(),
                    error = %e,
                    "reputation fetch failed"
                );
                self.audit.record(AuditEvent::FetchFailure {
                    identity: identity.clone(),
                    error: e.to_string(),
                    at: self.clock.now(),
                });
                self.abandon(&identity);
                guard.finish(RefreshResult::Failed);
            }
        }
    }

    /// Store fetched attributes (`verified`), then run the policy and
    /// persist its terminal status, if it reached one.
    fn complete_refresh(
        &self,
        identity: &PlayerId,
        attributes: ProfileAttributes,
    ) -> Result<VerificationStatus, StoreError> {
        let now = self.clock.now();
        let mut record = self
            .store
            .get(identity)?
            .unwrap_or_else(|| VerificationRecord::pending(identity.clone(), now));
        let prior = record.status;

        record.status = VerificationStatus::Verified;
        record.attributes = Some(attributes.clone());
        record.reason = None;
        record.updated_at = now;
        self.store.put(&record)?;
        if prior != VerificationStatus::Verified {
            self.audit.record(AuditEvent::Transition {
                identity: identity.clone(),
                from: Some(prior),
                to: Some(VerificationStatus::Verified),
                attributes: Some(attributes.clone()),
                reason: None,
                at: now,
            });
        }

        let (status, reason) = match self.policy.judge(&attributes) {
            Judgement::Allow => (VerificationStatus::Allowed, None),
            Judgement::Deny(reason) => (VerificationStatus::Denied, Some(reason)),
            Judgement::Undecided => {
                tracing::debug!(identity = %identity, "policy undecided, record stays verified");
                return Ok(VerificationStatus::Verified);
            }
        };

        record.status = status;
        record.reason = reason.clone();
        record.updated_at = now;
        self.store.put(&record)?;
        self.audit.record(AuditEvent::Transition {
            identity: identity.clone(),
            from: Some(VerificationStatus::Verified),
            to: Some(status),
            attributes: Some(attributes),
            reason,
            at: now,
        });
        tracing::info!(identity = %identity, status = %status, "verification resolved");
        Ok(status)
    }

    /// Failure path: a pending record reverts to absent so a later
    /// evaluation can retry. A verified record that failed an in-place
    /// refresh keeps its previous data.
    fn abandon(&self, identity: &PlayerId) {
        match self.store.get(identity) {
            Ok(Some(record)) if record.status == VerificationStatus::Pending => {
                match self.store.delete(identity) {
                    Ok(()) => self.audit.record(AuditEvent::Transition {
                        identity: identity.clone(),
                        from: Some(VerificationStatus::Pending),
                        to: None,
                        attributes: None,
                        reason: None,
                        at: self.clock.now(),
                    }),
                    Err(e) => {
                        tracing::warn!(identity = %identity, error = %e, "failed to discard pending record");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(identity = %identity, error = %e, "failed to read record after fetch failure");
            }
        }
    }

    /// Whether a refresh is currently in flight for `identity`.
    pub fn refresh_in_flight(&self, identity: &PlayerId) -> bool {
        self.flights.in_flight(identity)
    }
}
