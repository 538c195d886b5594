//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use turnstile_verification::{CacheConfig, ThresholdPolicy};

use crate::EngineError;

/// Configuration for the decision engine and its verification cache.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long a cached terminal verdict stays fresh, in seconds.
    #[serde(default = "default_verdict_ttl")]
    pub verdict_ttl_secs: u64,

    /// Age after which a stuck pending record may be retried, in seconds.
    #[serde(default = "default_pending_retry")]
    pub pending_retry_secs: u64,

    /// Budget for one reputation fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Thresholds for the automatic verdict policy. All unset means the
    /// policy never decides and records stay `verified`.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Steam Web API fetcher settings.
    #[serde(default)]
    pub steam: SteamConfig,
}

/// Minimums for [`ThresholdPolicy`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub min_account_level: Option<u32>,
    pub min_playtime_minutes: Option<u64>,
    pub min_reputation_rating: Option<f64>,
}

/// Settings for the Steam reputation fetcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SteamConfig {
    #[serde(default)]
    pub api_key: String,

    /// App whose playtime counts toward verification.
    #[serde(default = "default_app_id")]
    pub app_id: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_verdict_ttl() -> u64 {
    24 * 60 * 60
}

fn default_pending_retry() -> u64 {
    120
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_app_id() -> u32 {
    730
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }

    /// The cache timing knobs this configuration implies.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            verdict_ttl_secs: self.verdict_ttl_secs,
            pending_retry_secs: self.pending_retry_secs,
            fetch_timeout_secs: self.fetch_timeout_secs,
        }
    }

    /// The threshold policy this configuration implies.
    pub fn threshold_policy(&self) -> ThresholdPolicy {
        ThresholdPolicy {
            min_account_level: self.policy.min_account_level,
            min_playtime_minutes: self.policy.min_playtime_minutes,
            min_reputation_rating: self.policy.min_reputation_rating,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verdict_ttl_secs: default_verdict_ttl(),
            pending_retry_secs: default_pending_retry(),
            fetch_timeout_secs: default_fetch_timeout(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            policy: PolicyConfig::default(),
            steam: SteamConfig::default(),
        }
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            app_id: default_app_id(),
        }
    }
}
