//! The judgment step: fetched attributes → terminal verdict.
//!
//! Kept separate from the fetch so the two phases are independently
//! testable and a deployment can substitute its own rules (or none,
//! leaving records in `verified` for a downstream system to judge).

use turnstile_types::ProfileAttributes;

/// What the policy concluded about a set of fetched attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Judgement {
    /// Persist `allowed`.
    Allow,
    /// Persist `denied` with this reason.
    Deny(String),
    /// Leave the record in `verified`; someone downstream decides.
    Undecided,
}

/// Policy invoked once per completed fetch.
pub trait VerdictPolicy: Send + Sync {
    fn judge(&self, attributes: &ProfileAttributes) -> Judgement;
}

/// Minimum-requirements policy.
///
/// Each configured threshold must be met by a *present* attribute; a
/// missing attribute leaves the judgment undecided rather than denying,
/// since the upstream may simply not expose that field. With no thresholds
/// configured every judgment is `Undecided`, which matches deployments
/// where "verified" only means "data fetched".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThresholdPolicy {
    pub min_account_level: Option<u32>,
    pub min_playtime_minutes: Option<u64>,
    pub min_reputation_rating: Option<f64>,
}

impl ThresholdPolicy {
    pub fn is_empty(&self) -> bool {
        self.min_account_level.is_none()
            && self.min_playtime_minutes.is_none()
            && self.min_reputation_rating.is_none()
    }
}

impl VerdictPolicy for ThresholdPolicy {
    fn judge(&self, attributes: &ProfileAttributes) -> Judgement {
        if self.is_empty() || attributes.is_empty() {
            return Judgement::Undecided;
        }

        let mut undecided = false;

        if let Some(min) = self.min_account_level {
            match attributes.account_level {
                Some(level) if level < min => {
                    return Judgement::Deny(format!("account level {level} below minimum {min}"));
                }
                Some(_) => {}
                None => undecided = true,
            }
        }

        if let Some(min) = self.min_playtime_minutes {
            match attributes.playtime_minutes {
                Some(minutes) if minutes < min => {
                    return Judgement::Deny(format!(
                        "playtime {minutes} minutes below minimum {min}"
                    ));
                }
                Some(_) => {}
                None => undecided = true,
            }
        }

        if let Some(min) = self.min_reputation_rating {
            match attributes.reputation_rating {
                Some(rating) if rating < min => {
                    return Judgement::Deny(format!("rating {rating:.2} below minimum {min:.2}"));
                }
                Some(_) => {}
                None => undecided = true,
            }
        }

        if undecided {
            Judgement::Undecided
        } else {
            Judgement::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(level: Option<u32>, minutes: Option<u64>, rating: Option<f64>) -> ProfileAttributes {
        ProfileAttributes {
            account_level: level,
            playtime_minutes: minutes,
            reputation_rating: rating,
        }
    }

    #[test]
    fn empty_policy_never_decides() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.judge(&attrs(Some(50), Some(9000), Some(3.0))), Judgement::Undecided);
        assert_eq!(policy.judge(&ProfileAttributes::default()), Judgement::Undecided);
    }

    #[test]
    fn all_thresholds_met_allows() {
        let policy = ThresholdPolicy {
            min_account_level: Some(10),
            min_playtime_minutes: Some(600),
            min_reputation_rating: None,
        };
        assert_eq!(policy.judge(&attrs(Some(10), Some(600), None)), Judgement::Allow);
    }

    #[test]
    fn shortfall_denies_with_a_reason() {
        let policy = ThresholdPolicy {
            min_account_level: Some(10),
            ..Default::default()
        };
        match policy.judge(&attrs(Some(3), None, None)) {
            Judgement::Deny(reason) => assert!(reason.contains("account level 3"), "{reason}"),
            other => panic!("expected deny, got {other:?}"),
        }
    }

    #[test]
    fn fetch_with_no_attributes_at_all_leaves_undecided() {
        let policy = ThresholdPolicy {
            min_account_level: Some(10),
            min_playtime_minutes: Some(600),
            min_reputation_rating: Some(1.5),
        };
        assert_eq!(
            policy.judge(&ProfileAttributes::default()),
            Judgement::Undecided
        );
    }

    #[test]
    fn missing_attribute_leaves_undecided() {
        let policy = ThresholdPolicy {
            min_playtime_minutes: Some(600),
            ..Default::default()
        };
        assert_eq!(policy.judge(&attrs(Some(99), None, None)), Judgement::Undecided);
    }

    #[test]
    fn deny_wins_over_missing_data() {
        // One attribute missing, another below threshold: deny.
        let policy = ThresholdPolicy {
            min_account_level: Some(10),
            min_playtime_minutes: Some(600),
            min_reputation_rating: None,
        };
        assert_eq!(
            policy.judge(&attrs(None, Some(30), None)),
            Judgement::Deny("playtime 30 minutes below minimum 600".into())
        );
    }
}
