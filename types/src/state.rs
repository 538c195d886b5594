//! Record status enums and the verification lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a ban applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanScope {
    /// The ban targets the platform account id.
    Account,
    /// The ban targets a network address.
    Ip,
}

/// Lifecycle status of a ban record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanStatus {
    /// In force (subject to the expiry timestamp).
    Active,
    /// Lifted by an administrator.
    Unbanned,
    /// Marked expired by the admin subsystem's sweeper.
    Expired,
}

/// Approval status of a whitelist entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Approved,
    Pending,
    Rejected,
}

/// Status of a verification record.
///
/// The lifecycle is one-way: `Pending` → `Verified` → `Allowed` | `Denied`,
/// except that a terminal status may be superseded by a fresh fetch cycle
/// re-entering `Pending`. Absence of a record precedes `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// A fetch has been requested but has not completed.
    Pending,
    /// Profile attributes were fetched; no terminal judgment yet.
    Verified,
    /// Terminal: the identity may connect.
    Allowed,
    /// Terminal: the identity may not connect.
    Denied,
}

impl VerificationStatus {
    /// Whether this status is a cached final verdict.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Allowed | Self::Denied)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// `Pending` → `Pending` is permitted (a retry of a stalled fetch) and
    /// `Verified` → `Verified` is permitted (an in-place attribute refresh);
    /// neither introduces a new observable transition.
    pub fn can_transition_to(&self, next: VerificationStatus) -> bool {
        use VerificationStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Verified)
                | (Verified, Verified)
                | (Verified, Allowed)
                | (Verified, Denied)
                | (Allowed, Pending)
                | (Denied, Pending)
        )
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Allowed => "allowed",
            Self::Denied => "denied",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VerificationStatus::*;

    #[test]
    fn terminal_statuses() {
        assert!(Allowed.is_terminal());
        assert!(Denied.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Verified.is_terminal());
    }

    #[test]
    fn lifecycle_moves_forward() {
        assert!(Pending.can_transition_to(Verified));
        assert!(Verified.can_transition_to(Allowed));
        assert!(Verified.can_transition_to(Denied));
    }

    #[test]
    fn terminal_statuses_reenter_pending_on_refresh() {
        assert!(Allowed.can_transition_to(Pending));
        assert!(Denied.can_transition_to(Pending));
    }

    #[test]
    fn illegal_transitions_rejected() {
        assert!(!Pending.can_transition_to(Allowed));
        assert!(!Pending.can_transition_to(Denied));
        assert!(!Verified.can_transition_to(Pending));
        assert!(!Allowed.can_transition_to(Verified));
        assert!(!Allowed.can_transition_to(Denied));
        assert!(!Denied.can_transition_to(Allowed));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&Denied).unwrap(), "\"denied\"");
        let s: VerificationStatus = serde_json::from_str("\"allowed\"").unwrap();
        assert_eq!(s, Allowed);
    }
}
