//! Record types and abstract storage traits for Turnstile.
//!
//! Every storage backend (SQL, key-value, in-memory for testing) implements
//! these traits. The decision engine and verification cache depend only on
//! the traits, never on a concrete backend. The audit sink lives here too:
//! it is the engine's outbound port, implemented by whatever compliance
//! pipeline a deployment runs.

pub mod audit;
pub mod ban;
pub mod connection;
pub mod error;
pub mod verification;
pub mod whitelist;

pub use audit::{AuditEvent, AuditSink};
pub use ban::{BanDuration, BanEntry, BanStore};
pub use connection::{ConnectionEvent, ConnectionLogStore};
pub use error::StoreError;
pub use verification::{VerificationRecord, VerificationStore};
pub use whitelist::{WhitelistEntry, WhitelistStore};
