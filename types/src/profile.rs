//! Profile attributes returned by a reputation lookup.

use serde::{Deserialize, Serialize};

/// Attributes fetched from the upstream reputation source.
///
/// Every field is optional: the upstream may hide a profile, omit a game, or
/// not compute a rating at all. What the values *mean* (thresholds, scoring)
/// belongs to the verdict policy, not to this type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    /// Platform account level.
    pub account_level: Option<u32>,
    /// Minutes played in the tracked game.
    pub playtime_minutes: Option<u64>,
    /// Upstream-computed reputation rating.
    pub reputation_rating: Option<f64>,
}

impl ProfileAttributes {
    /// True when the upstream supplied nothing at all.
    pub fn is_empty(&self) -> bool {
        self.account_level.is_none()
            && self.playtime_minutes.is_none()
            && self.reputation_rating.is_none()
    }
}
