//! Fundamental types for the Turnstile access-control engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: player identities, timestamps, record status enums, profile
//! attributes, and the engine's verdict vocabulary.

pub mod identity;
pub mod profile;
pub mod state;
pub mod time;
pub mod verdict;

pub use identity::{IdentityError, PlayerId};
pub use profile::ProfileAttributes;
pub use state::{ApprovalStatus, BanScope, BanStatus, VerificationStatus};
pub use time::{Clock, SystemClock, Timestamp};
pub use verdict::{DecidingRule, Verdict};
