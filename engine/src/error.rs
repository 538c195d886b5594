use thiserror::Error;
use turnstile_types::IdentityError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed caller input. Permanent: retrying with the same identity
    /// cannot succeed.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),

    #[error("config error: {0}")]
    Config(String),
}
