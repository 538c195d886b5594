//! Connection log. Append-only; never read for decisions.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use turnstile_types::{PlayerId, Timestamp};

/// One evaluated connection attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub identity: PlayerId,
    pub display_name: Option<String>,
    pub address: Option<IpAddr>,
    /// Which game server the player tried to join.
    pub server: String,
    pub at: Timestamp,
}

/// Append-only sink for connection attempts, written on every evaluation
/// regardless of verdict. Audit/analytics only.
pub trait ConnectionLogStore: Send + Sync {
    fn append(&self, event: &ConnectionEvent) -> Result<(), StoreError>;
}
