//! The reputation fetcher port.

use futures_util::future::BoxFuture;
use thiserror::Error;
use turnstile_types::{PlayerId, ProfileAttributes};

/// Why a reputation lookup failed. All variants are transient: the identity
/// reverts toward absent and a later evaluation retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("reputation lookup timed out")]
    Timeout,

    #[error("reputation source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response from reputation source: {0}")]
    Malformed(String),
}

/// External reputation source.
///
/// `fetch` is the only operation in the workspace permitted to suspend on
/// I/O; the cache always runs it on a background task with a timeout, never
/// on an evaluation's critical path. The boxed-future form keeps the trait
/// object safe so the cache can hold `Arc<dyn ReputationFetcher>`.
pub trait ReputationFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        identity: &'a PlayerId,
    ) -> BoxFuture<'a, Result<ProfileAttributes, FetchError>>;

    /// Short name for logs and audit events.
    fn name(&self) -> &str;
}
