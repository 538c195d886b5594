//! The verification cache.
//!
//! Staleness-aware layer over the verification store. Owns the
//! pending → verified → allowed/denied state machine, per-identity
//! single-flight coordination of the external reputation lookup, and the
//! pluggable policy that turns fetched attributes into a terminal verdict.
//!
//! The *fetcher* is modular: the cache specifies *that* a reputation lookup
//! happens, not *how*. The shipped [`SteamProfileFetcher`] talks to the
//! Steam Web API; tests substitute deterministic fetchers.

pub mod cache;
pub mod fetcher;
pub mod policy;
pub mod singleflight;
pub mod steam;

pub use cache::{CacheConfig, CacheReadout, RefreshOutcome, Sighting, VerificationCache};
pub use fetcher::{FetchError, ReputationFetcher};
pub use policy::{Judgement, ThresholdPolicy, VerdictPolicy};
pub use singleflight::{FlightMap, RefreshHandle, RefreshResult};
pub use steam::SteamProfileFetcher;
