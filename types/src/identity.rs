//! Player identity type.
//!
//! A [`PlayerId`] is the stable, platform-issued identifier for a player
//! (e.g. `STEAM_1:0:11101`, `[U:1:22202]`, or a 64-bit account id rendered
//! in decimal). The engine treats it as an opaque key; the only structure
//! enforced here is the character set and length, so that malformed caller
//! input is rejected before it reaches any store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest identity accepted. Platform ids are far shorter; the bound only
/// guards the stores against pathological input.
pub const MAX_IDENTITY_LEN: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity is empty")]
    Empty,

    #[error("identity is {0} characters, maximum is {MAX_IDENTITY_LEN}")]
    TooLong(usize),

    #[error("identity contains forbidden character {0:?}")]
    ForbiddenCharacter(char),
}

/// A validated player identity.
///
/// Construct with [`PlayerId::parse`] (or `FromStr`); construction is the
/// single validation point for the whole workspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Validate and wrap a raw identity string.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        if raw.len() > MAX_IDENTITY_LEN {
            return Err(IdentityError::TooLong(raw.len()));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '[' | ']')))
        {
            return Err(IdentityError::ForbiddenCharacter(c));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_platform_formats() {
        for raw in ["STEAM_1:0:11101", "[U:1:22202]", "76561197960287930", "bot-7"] {
            assert!(PlayerId::parse(raw).is_ok(), "rejected {raw}");
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(PlayerId::parse(""), Err(IdentityError::Empty));
    }

    #[test]
    fn rejects_over_length() {
        let raw = "7".repeat(MAX_IDENTITY_LEN + 1);
        assert_eq!(PlayerId::parse(&raw), Err(IdentityError::TooLong(65)));
    }

    #[test]
    fn rejects_forbidden_characters() {
        assert_eq!(
            PlayerId::parse("steam id"),
            Err(IdentityError::ForbiddenCharacter(' '))
        );
        assert_eq!(
            PlayerId::parse("x;DROP"),
            Err(IdentityError::ForbiddenCharacter(';'))
        );
    }

    #[test]
    fn serde_round_trip_validates() {
        let id: PlayerId = serde_json::from_str("\"STEAM_1:0:11101\"").unwrap();
        assert_eq!(id.as_str(), "STEAM_1:0:11101");
        assert!(serde_json::from_str::<PlayerId>("\"not valid!\"").is_err());
    }
}
