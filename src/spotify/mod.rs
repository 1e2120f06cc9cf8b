//! Spotify Web API client.
//!
//! Uses Client Credentials flow for server-to-server authentication.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::SpotifyConfig;
use crate::error::SpotifyError;
use crate::recommend::query::RecommendationQuery;
use crate::recommend::source::{RecommendationPage, RecommendationSource};

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Spotify API client with token caching.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl SpotifyClient {
    /// Builds a client from configuration. Fails when credentials are missing.
    pub fn new(config: &SpotifyConfig) -> Result<Self, SpotifyError> {
        let (client_id, client_secret) = config
            .credentials()
            .ok_or(SpotifyError::MissingCredentials)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpotifyError::Http(format!("build client: {}", e)))?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            api_base: config.api_base.clone(),
            token_url: config.token_url.clone(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Ensures we have a valid access token, refreshing if needed.
    async fn ensure_token(&self) -> Result<String, SpotifyError> {
        {
            let guard = self.token.read().await;
            if let Some(ref t) = *guard {
                if t.expires_at > Instant::now() {
                    return Ok(t.access_token.clone());
                }
            }
        }

        let token = self.fetch_token().await?;
        {
            let mut guard = self.token.write().await;
            *guard = Some(token.clone());
        }
        Ok(token.access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, SpotifyError> {
        let params = [
            ("grant_type", "client_credentials"),
        ];
        let auth = base64::engine::general_purpose::STANDARD.encode(
            format!("{}:{}", self.client_id, self.client_secret).as_bytes(),
        );

        let res = self
            .client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", auth))
            .form(&params)
            .send()
            .await
            .map_err(|e| SpotifyError::Auth(format!("token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(format!("token request failed: {} - {}", status, body)));
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| SpotifyError::Auth(format!("token parse failed: {}", e)))?;
        let expires_at = Instant::now() + Duration::from_secs(body.expires_in.saturating_sub(60));

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at,
        })
    }

    /// Authenticated GET against the API, decoding the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let token = self.ensure_token().await?;
        let url = format!("{}/{}", self.api_base, path);

        let res = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::Status { status, body });
        }

        res.json()
            .await
            .map_err(|e| SpotifyError::Parse(format!("{} parse failed: {}", path, e)))
    }

    /// Search for tracks in the Spotify catalog.
    pub async fn search_tracks(
        &self,
        q: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<SearchTracksResponse, SpotifyError> {
        let limit = limit.unwrap_or(20).clamp(1, 50);
        let offset = offset.unwrap_or(0).min(1000);

        let body: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("q", q.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(SearchTracksResponse {
            tracks: body.tracks.items,
            total: body.tracks.total,
            limit: body.tracks.limit,
            offset: body.tracks.offset,
        })
    }
}

#[async_trait]
impl RecommendationSource for SpotifyClient {
    async fn authenticate(&self) -> Result<(), SpotifyError> {
        self.ensure_token().await.map(|_| ())
    }

    async fn recommendations(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationPage, SpotifyError> {
        debug!(params = ?query.to_params(), "requesting recommendations");
        let body: RecommendationsResponse = self.get_json("recommendations", &query.to_params()).await?;

        let tracks = body.tracks.map(|items| {
            items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<Track>(item) {
                    Ok(track) => Some(track),
                    Err(e) => {
                        warn!(error = %e, "skipping malformed recommendation item");
                        None
                    }
                })
                .collect()
        });
        Ok(RecommendationPage { tracks })
    }

    async fn track(&self, id: &str) -> Result<Track, SpotifyError> {
        let path = format!("tracks/{}", urlencoding::encode(id));
        self.get_json(&path, &[]).await
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TracksPage,
}

#[derive(Deserialize)]
struct TracksPage {
    items: Vec<Track>,
    total: u32,
    limit: u32,
    offset: u32,
}

/// Raw `/recommendations` body. Items stay untyped so one bad entry does not
/// sink the whole page.
#[derive(Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Option<Vec<serde_json::Value>>,
}

/// Response from track search.
pub struct SearchTracksResponse {
    pub tracks: Vec<Track>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

/// A Spotify track (simplified).
#[derive(Clone, Debug, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u32,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Album {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}
