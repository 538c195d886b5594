//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the decision engine (clock, stores, the
//! reputation source, the audit pipeline) are abstracted behind traits.
//! This crate provides test-friendly implementations that return
//! deterministic values, can be controlled programmatically, and never
//! touch the filesystem or network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod audit;
pub mod clock;
pub mod fetcher;
pub mod store;

pub use audit::RecordingAuditSink;
pub use clock::NullClock;
pub use fetcher::StubFetcher;
pub use store::MemoryStore;
