//! The decision engine.
//!
//! Answers "may this identity connect now?" by combining three
//! independently maintained sources of truth in strict precedence order:
//! bans, the whitelist, and the verification cache. Evaluations are
//! synchronous and never wait on the network; missing or stale reputation
//! data only schedules a background refresh for the next evaluation.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;

pub use audit::TracingAuditSink;
pub use config::{EngineConfig, PolicyConfig, SteamConfig};
pub use engine::{AccessEngine, ConnectionRequest, Evaluation, ServerContext};
pub use error::EngineError;
pub use logging::{init_logging, LogFormat};
