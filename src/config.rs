use std::env;
use std::time::Duration;

use crate::recommend::executor::MAX_DEADLINE;
use crate::spotify::{DEFAULT_API_BASE, DEFAULT_TOKEN_URL};

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub spotify: SpotifyConfig,
    /// Budget for the live part of a recommendation request.
    pub recommend_deadline: Duration,
    pub backfill_previews: bool,
    pub emotion_classifier_url: Option<String>,
    pub sentiment_scorer_url: Option<String>,
    pub default_limit: usize,
}

#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl SpotifyConfig {
    /// Both halves of the client credentials, when present.
    pub fn credentials(&self) -> Option<(String, String)> {
        Some((self.client_id.clone()?, self.client_secret.clone()?))
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id_present", &self.client_id.is_some())
            .field("client_secret_present", &self.client_secret.is_some())
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Trimmed value of `key`, treating blank as unset.
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match optional(key) {
        Some(v) => v
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, v)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = parsed("PORT", 8081)?;

        let spotify = SpotifyConfig {
            client_id: optional("SPOTIFY_CLIENT_ID"),
            client_secret: optional("SPOTIFY_CLIENT_SECRET"),
            api_base: optional("SPOTIFY_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: optional("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            timeout: Duration::from_secs(parsed("SPOTIFY_TIMEOUT_SECS", 15)?),
        };

        let recommend_deadline = Duration::from_millis(parsed("RECOMMEND_DEADLINE_MS", 20_000)?);
        if recommend_deadline > MAX_DEADLINE {
            anyhow::bail!(
                "RECOMMEND_DEADLINE_MS must be at most {}",
                MAX_DEADLINE.as_millis()
            );
        }
        let backfill_previews = parsed("BACKFILL_PREVIEWS", true)?;

        let default_limit: usize = parsed("DEFAULT_PLAYLIST_LIMIT", 10)?;
        if !(1..=50).contains(&default_limit) {
            anyhow::bail!("DEFAULT_PLAYLIST_LIMIT must be between 1 and 50");
        }

        Ok(Self {
            port,
            spotify,
            recommend_deadline,
            backfill_previews,
            emotion_classifier_url: optional("EMOTION_CLASSIFIER_URL"),
            sentiment_scorer_url: optional("SENTIMENT_SCORER_URL"),
            default_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotify(id: Option<&str>, secret: Option<&str>) -> SpotifyConfig {
        SpotifyConfig {
            client_id: id.map(String::from),
            client_secret: secret.map(String::from),
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    #[test]
    fn test_credentials_need_both_halves() {
        assert_eq!(
            spotify(Some("id"), Some("secret")).credentials(),
            Some(("id".to_string(), "secret".to_string()))
        );
        assert_eq!(spotify(Some("id"), None).credentials(), None);
        assert_eq!(spotify(None, Some("secret")).credentials(), None);
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", spotify(Some("id"), Some("hunter2")));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("client_secret_present: true"));
    }

    #[test]
    fn test_oversized_deadline_is_rejected() {
        std::env::set_var("RECOMMEND_DEADLINE_MS", "18446744073709551615");
        let result = Config::from_env();
        std::env::remove_var("RECOMMEND_DEADLINE_MS");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("RECOMMEND_DEADLINE_MS"), "{err}");
    }
}
