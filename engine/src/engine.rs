//! Evaluation pipeline: ban check → whitelist check → verification cache.

use std::net::IpAddr;
use std::sync::Arc;

use turnstile_store::{
    AuditEvent, AuditSink, BanEntry, BanStore, ConnectionEvent, ConnectionLogStore, StoreError,
    WhitelistStore,
};
use turnstile_types::{Clock, DecidingRule, PlayerId, Verdict, VerificationStatus};
use turnstile_verification::{Sighting, VerificationCache};

use crate::EngineError;

/// Which game server asked for the evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerContext {
    pub name: String,
}

/// One connection attempt, as reported by the game-server plugin.
#[derive(Clone, Debug)]
pub struct ConnectionRequest {
    /// Raw identity string; validated before anything else happens.
    pub identity: String,
    pub display_name: Option<String>,
    pub address: Option<IpAddr>,
    pub server: ServerContext,
}

/// The engine's answer: the verdict plus the rule that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub rule: DecidingRule,
}

/// Orchestrates the three record sources into one verdict.
///
/// Bans and whitelist are read-only here (the admin subsystem writes them);
/// the verification cache is owned via `ensure_fresh` scheduling. Evaluation
/// itself never blocks on the reputation fetch.
pub struct AccessEngine {
    bans: Arc<dyn BanStore>,
    whitelist: Arc<dyn WhitelistStore>,
    connections: Arc<dyn ConnectionLogStore>,
    cache: Arc<VerificationCache>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl AccessEngine {
    pub fn new(
        bans: Arc<dyn BanStore>,
        whitelist: Arc<dyn WhitelistStore>,
        connections: Arc<dyn ConnectionLogStore>,
        cache: Arc<VerificationCache>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bans,
            whitelist,
            connections,
            cache,
            audit,
            clock,
        }
    }

    /// Evaluate a connection attempt.
    ///
    /// Strict precedence: an enforceable ban denies (overriding everything),
    /// an approved whitelist entry allows (bypassing verification), and
    /// otherwise the cached verification state decides. A backing-store
    /// failure yields [`Verdict::Unknown`] rather than a silent allow.
    ///
    /// Side effects of every call: one connection-log append (best-effort)
    /// and one audit decision event. Must be called from within a Tokio
    /// runtime, since a refresh may be spawned.
    pub fn evaluate(&self, request: &ConnectionRequest) -> Result<Evaluation, EngineError> {
        let identity = PlayerId::parse(&request.identity)?;
        let evaluation = self.decide(&identity, request);

        let now = self.clock.now();
        let log_entry = ConnectionEvent {
            identity: identity.clone(),
            display_name: request.display_name.clone(),
            address: request.address,
            server: request.server.name.clone(),
            at: now,
        };
        if let Err(e) = self.connections.append(&log_entry) {
            // Logging must never fail the evaluation.
            tracing::warn!(identity = %identity, error = %e, "connection log append failed");
        }

        self.audit.record(AuditEvent::Decision {
            identity: identity.clone(),
            address: request.address,
            server: request.server.name.clone(),
            verdict: evaluation.verdict.clone(),
            rule: evaluation.rule,
            at: now,
        });
        tracing::debug!(
            identity = %identity,
            verdict = %evaluation.verdict,
            rule = %evaluation.rule,
            "evaluated connection"
        );
        Ok(evaluation)
    }

    fn decide(&self, identity: &PlayerId, request: &ConnectionRequest) -> Evaluation {
        match self.enforceable_ban(identity, request.address) {
            Ok(Some(ban)) => {
                return Evaluation {
                    verdict: Verdict::deny(ban.display_reason(), ban.expires_at),
                    rule: DecidingRule::Ban,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(identity = %identity, error = %e, "ban store unavailable");
                return Evaluation {
                    verdict: Verdict::Unknown,
                    rule: DecidingRule::Ban,
                };
            }
        }

        match self.whitelist.entry(identity) {
            Ok(Some(entry)) if entry.is_approved() => {
                return Evaluation {
                    verdict: Verdict::Allow,
                    rule: DecidingRule::Whitelist,
                };
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(identity = %identity, error = %e, "whitelist store unavailable");
                return Evaluation {
                    verdict: Verdict::Unknown,
                    rule: DecidingRule::Whitelist,
                };
            }
        }

        let readout = match self.cache.get(identity) {
            Ok(readout) => readout,
            Err(e) => {
                tracing::error!(identity = %identity, error = %e, "verification store unavailable");
                return Evaluation {
                    verdict: Verdict::Unknown,
                    rule: DecidingRule::VerificationMiss,
                };
            }
        };

        let sighting = Sighting {
            display_name: request.display_name.clone(),
            address: request.address,
        };

        match readout.status {
            Some(VerificationStatus::Allowed) => {
                if readout.is_stale {
                    self.schedule_refresh(identity, &sighting);
                }
                Evaluation {
                    verdict: Verdict::Allow,
                    rule: DecidingRule::VerificationHit,
                }
            }
            Some(VerificationStatus::Denied) => {
                if readout.is_stale {
                    self.schedule_refresh(identity, &sighting);
                }
                let reason = readout
                    .reason
                    .unwrap_or_else(|| "verification denied".to_string());
                Evaluation {
                    verdict: Verdict::deny(reason, None),
                    rule: DecidingRule::VerificationHit,
                }
            }
            // Absent, pending, or fetched-but-undecided: verification has
            // not concluded, so the verdict is pending and a refresh is
            // scheduled if one is due.
            None | Some(VerificationStatus::Pending) | Some(VerificationStatus::Verified) => {
                self.schedule_refresh(identity, &sighting);
                Evaluation {
                    verdict: Verdict::Pending,
                    rule: DecidingRule::VerificationMiss,
                }
            }
        }
    }

    /// Any enforceable ban against the identity or its address.
    fn enforceable_ban(
        &self,
        identity: &PlayerId,
        address: Option<IpAddr>,
    ) -> Result<Option<BanEntry>, StoreError> {
        let now = self.clock.now();
        let mut bans = self.bans.bans_for_identity(identity)?;
        if let Some(addr) = address {
            bans.extend(self.bans.bans_for_address(&addr)?);
        }
        Ok(bans.into_iter().find(|b| b.is_enforceable(now)))
    }

    fn schedule_refresh(&self, identity: &PlayerId, sighting: &Sighting) {
        if let Err(e) = self.cache.ensure_fresh(identity, sighting) {
            // The verdict already reflects cached state; a failed schedule
            // only delays the refresh to a later evaluation.
            tracing::warn!(identity = %identity, error = %e, "could not schedule verification refresh");
        }
    }
}
