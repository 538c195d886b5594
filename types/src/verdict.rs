//! The engine's output vocabulary.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The decision engine's answer for a connection attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The identity may connect.
    Allow,
    /// The identity may not connect.
    Deny {
        /// Human-readable reason, shown to admins (and optionally the player).
        reason: String,
        /// When the underlying ban lapses, if it is temporary.
        expires_at: Option<Timestamp>,
    },
    /// Verification has not completed. How a deployment treats this
    /// (provisional entry, a waiting queue, or deny-by-default) is caller
    /// policy and must be documented wherever this verdict is consumed;
    /// the engine takes no stance.
    Pending,
    /// A backing store was unreachable, so no trustworthy answer exists.
    /// Deployments choose fail-open or fail-closed explicitly; the engine
    /// never silently defaults to `Allow`.
    Unknown,
}

impl Verdict {
    pub fn deny(reason: impl Into<String>, expires_at: Option<Timestamp>) -> Self {
        Self::Deny {
            reason: reason.into(),
            expires_at,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny { reason, .. } => write!(f, "deny ({reason})"),
            Self::Pending => f.write_str("pending"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Which check produced a verdict. Carried on every audit event so
/// operators can see why a player was admitted or turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecidingRule {
    /// An enforceable ban matched (or the ban store failed).
    Ban,
    /// An approved whitelist entry matched (or the whitelist store failed).
    Whitelist,
    /// The verification cache held a terminal verdict.
    VerificationHit,
    /// The verification cache had no terminal verdict yet.
    VerificationMiss,
}

impl fmt::Display for DecidingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ban => "ban",
            Self::Whitelist => "whitelist",
            Self::VerificationHit => "verification_hit",
            Self::VerificationMiss => "verification_miss",
        };
        f.write_str(s)
    }
}
