//! Steam Web API reputation fetcher.
//!
//! Pulls the account level (`IPlayerService/GetSteamLevel`) and the played
//! minutes for one tracked app (`IPlayerService/GetOwnedGames`). Both fields
//! are optional upstream: a private profile simply yields `None`. The rating
//! attribute is never supplied by this source and is left unset.
//!
//! Expects the identity in 64-bit SteamID form; converting vanity names and
//! legacy formats is the admin subsystem's job.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use turnstile_types::{PlayerId, ProfileAttributes};

use crate::fetcher::{FetchError, ReputationFetcher};

const STEAM_API_URL: &str = "https://api.steampowered.com";

#[derive(Debug, Deserialize)]
struct LevelEnvelope {
    response: LevelBody,
}

#[derive(Debug, Deserialize)]
struct LevelBody {
    player_level: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    response: OwnedGamesBody,
}

#[derive(Debug, Deserialize, Default)]
struct OwnedGamesBody {
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u32,
    /// Minutes across all time.
    playtime_forever: u64,
}

/// HTTP client for the Steam Web API.
pub struct SteamProfileFetcher {
    base_url: String,
    api_key: String,
    /// App whose playtime counts (e.g. 730 for CS).
    app_id: u32,
    client: reqwest::Client,
}

impl SteamProfileFetcher {
    /// Create a fetcher against the public Steam API.
    pub fn new(api_key: &str, app_id: u32) -> Self {
        Self::with_url(STEAM_API_URL, api_key, app_id)
    }

    /// Create a fetcher against a custom base URL (tests, proxies).
    pub fn with_url(base_url: &str, api_key: &str, app_id: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            app_id,
            client: reqwest::Client::new(),
        }
    }

    fn level_url(&self, steam_id: &str) -> String {
        format!(
            "{}/IPlayerService/GetSteamLevel/v1/?key={}&steamid={}",
            self.base_url, self.api_key, steam_id
        )
    }

    fn owned_games_url(&self, steam_id: &str) -> String {
        format!(
            "{}/IPlayerService/GetOwnedGames/v0001/?key={}&steamid={}&format=json",
            self.base_url, self.api_key, steam_id
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FetchError::Unavailable(format!("HTTP {}", resp.status())));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }

    async fn account_level(&self, steam_id: &str) -> Result<Option<u32>, FetchError> {
        let envelope: LevelEnvelope = self.get_json(&self.level_url(steam_id)).await?;
        Ok(envelope.response.player_level)
    }

    async fn playtime_minutes(&self, steam_id: &str) -> Result<Option<u64>, FetchError> {
        let envelope: OwnedGamesEnvelope = self.get_json(&self.owned_games_url(steam_id)).await?;
        Ok(match envelope.response.games {
            // A games list without the tracked app means zero minutes, not
            // missing data.
            Some(games) => Some(
                games
                    .iter()
                    .find(|g| g.appid == self.app_id)
                    .map(|g| g.playtime_forever)
                    .unwrap_or(0),
            ),
            None => None,
        })
    }
}

impl ReputationFetcher for SteamProfileFetcher {
    fn fetch<'a>(
        &'a self,
        identity: &'a PlayerId,
    ) -> BoxFuture<'a, Result<ProfileAttributes, FetchError>> {
        Box::pin(async move {
            let steam_id = identity.as_str();
            let account_level = self.account_level(steam_id).await?;
            let playtime_minutes = self.playtime_minutes(steam_id).await?;
            Ok(ProfileAttributes {
                account_level,
                playtime_minutes,
                reputation_rating: None,
            })
        })
    }

    fn name(&self) -> &str {
        "steam"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url() {
        let fetcher = SteamProfileFetcher::new("key", 730);
        assert_eq!(fetcher.base_url, STEAM_API_URL);
        assert_eq!(fetcher.app_id, 730);
    }

    #[test]
    fn custom_url_is_normalized() {
        let fetcher = SteamProfileFetcher::with_url("http://localhost:9000/", "key", 730);
        assert_eq!(fetcher.base_url, "http://localhost:9000");
    }

    #[test]
    fn urls_carry_key_and_id() {
        let fetcher = SteamProfileFetcher::with_url("http://x", "k123", 730);
        assert_eq!(
            fetcher.level_url("76561198000000000"),
            "http://x/IPlayerService/GetSteamLevel/v1/?key=k123&steamid=76561198000000000"
        );
        assert!(fetcher
            .owned_games_url("76561198000000000")
            .ends_with("steamid=76561198000000000&format=json"));
    }

    #[test]
    fn owned_games_body_tolerates_missing_list() {
        // Private profiles return an empty response object.
        let envelope: OwnedGamesEnvelope = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(envelope.response.games.is_none());
    }

    #[test]
    fn level_envelope_parses() {
        let envelope: LevelEnvelope =
            serde_json::from_str(r#"{"response":{"player_level":42}}"#).unwrap();
        assert_eq!(envelope.response.player_level, Some(42));
    }
}
