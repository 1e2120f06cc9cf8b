//! HTTP handlers for the mood playlist API.
//!
//! Language handling differs per entrypoint: `/emotion/detect` rejects an
//! unsupported language with a 400, every other playlist route falls back
//! to english.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::{decode_image, EmotionClassifier, EmotionReading, SentimentReading, SentimentScorer};
use crate::error::AppError;
use crate::locale::{self, Locale};
use crate::mood::{self, Mood};
use crate::recommend::{PlaylistSource, Recommender, Track};
use crate::spotify::{self, SpotifyClient};

/// Largest playlist a request may ask for.
pub const MAX_LIMIT: usize = 50;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub spotify: Option<SpotifyClient>,
    pub classifier: Arc<dyn EmotionClassifier>,
    pub scorer: Arc<dyn SentimentScorer>,
    pub default_limit: usize,
}

impl AppState {
    fn limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).clamp(1, MAX_LIMIT)
    }

    async fn classify(&self, image: &str) -> Result<EmotionReading, AppError> {
        let bytes = decode_image(image).map_err(|e| AppError::BadRequest(e.to_string()))?;
        match self.classifier.classify(&bytes).await {
            Ok(reading) => Ok(reading),
            Err(e) => {
                warn!(error = %e, "emotion classifier failed, assuming neutral");
                Ok(EmotionReading::neutral_fallback())
            }
        }
    }
}

/// Resolves `language`, rejecting anything given but unsupported.
fn strict_locale(language: Option<&str>) -> Result<Locale, AppError> {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(Locale::default()),
        Some(raw) => locale::resolve(Some(raw)).ok_or_else(|| AppError::UnsupportedLanguage {
            language: raw.to_string(),
            supported: locale::supported_languages(),
        }),
    }
}

fn lenient_locale(language: Option<&str>) -> Locale {
    locale::resolve(language).unwrap_or_default()
}

/// Query parameters for search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query (required).
    pub q: String,
    /// Max results (1-50, default 20).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Pagination offset (0-1000).
    #[serde(default)]
    pub offset: Option<u32>,
}

/// API response for track search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub tracks: Vec<SearchTrackResponse>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

/// Single catalog hit. Search results carry no mood.
#[derive(Debug, Serialize)]
pub struct SearchTrackResponse {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub duration_ms: u32,
    pub explicit: bool,
    pub artists: Vec<crate::recommend::Artist>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub spotify_url: Option<String>,
}

fn search_hit(t: &spotify::Track) -> SearchTrackResponse {
    // Search pages list the largest image first; prefer the medium one.
    let image = t.album.images.get(1).or_else(|| t.album.images.first());
    SearchTrackResponse {
        id: t.id.clone(),
        name: t.name.clone(),
        uri: t.uri.clone(),
        duration_ms: t.duration_ms,
        explicit: t.explicit,
        artists: t
            .artists
            .iter()
            .map(|a| crate::recommend::Artist {
                id: a.id.clone().unwrap_or_default(),
                name: a.name.clone(),
            })
            .collect(),
        image_url: image.and_then(|i| i.url.clone()),
        preview_url: t.preview_url.clone(),
        spotify_url: t.external_urls.spotify.clone(),
    }
}

#[derive(Debug, Deserialize)]
pub struct EmotionDetectionRequest {
    /// Base64 image, optionally as a data URL.
    pub image: String,
    pub language: Option<String>,
    #[serde(default)]
    pub include_playlist: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EmotionDetectionResponse {
    pub emotion: Mood,
    pub confidence: f64,
    pub emotion_scores: HashMap<String, f64>,
    pub playlist: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct MoodDetectionRequest {
    pub image: String,
    pub language: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MoodDetectionResponse {
    /// Mood the playlist was built for, after randomization.
    pub emotion: Mood,
    pub detected: Mood,
    pub confidence: f64,
    pub playlist: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub text: String,
    pub language: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TextAnalysisResponse {
    pub sentiment_scores: HashMap<String, f64>,
    pub compound: f64,
    pub mood: Mood,
    pub recommendations: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    pub mood: String,
    pub limit: Option<usize>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub mood: Mood,
    pub source: PlaylistSource,
    pub tracks: Vec<Track>,
}

/// GET /health - Health check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/languages - Supported recommendation languages.
pub async fn languages() -> impl IntoResponse {
    Json(locale::supported_languages())
}

/// GET /api/v1/emotions - Canonical moods.
pub async fn emotions() -> impl IntoResponse {
    Json(Mood::ALL.iter().map(|m| m.as_str()).collect::<Vec<_>>())
}

/// GET /api/v1/search - Search Spotify for tracks.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest("query 'q' is required and cannot be empty".into()));
    }
    let spotify = state
        .spotify
        .as_ref()
        .ok_or_else(|| AppError::Spotify("spotify client is not configured".into()))?;

    let result = spotify
        .search_tracks(&params.q, params.limit, params.offset)
        .await?;

    let response = SearchResponse {
        tracks: result.tracks.iter().map(search_hit).collect(),
        total: result.total,
        limit: result.limit,
        offset: result.offset,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// POST /api/v1/emotion/detect - Classify a face image, optionally with a playlist.
pub async fn detect_emotion(
    State(state): State<AppState>,
    Json(req): Json<EmotionDetectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let locale = strict_locale(req.language.as_deref())?;
    let reading = state.classify(&req.image).await?;
    let emotion = mood::normalize_emotion_label(&reading.emotion);
    info!(%emotion, confidence = reading.confidence, "emotion detected");

    let playlist = if req.include_playlist {
        let limit = state.limit(req.limit);
        state.recommender.recommend(emotion, locale, limit).await.tracks
    } else {
        Vec::new()
    };

    Ok(Json(EmotionDetectionResponse {
        emotion,
        confidence: reading.confidence,
        emotion_scores: reading.emotion_scores,
        playlist,
    }))
}

/// POST /api/v1/mood/detect - Classify a face image and build a playlist
/// around a possibly drifted mood.
pub async fn detect_mood(
    State(state): State<AppState>,
    Json(req): Json<MoodDetectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let locale = lenient_locale(req.language.as_deref());
    let reading = state.classify(&req.image).await?;
    let detected = mood::normalize_emotion_label(&reading.emotion);
    let emotion = mood::randomize(detected, reading.confidence, &mut StdRng::from_entropy());
    info!(%detected, %emotion, confidence = reading.confidence, "mood detected");

    let playlist = state
        .recommender
        .recommend(emotion, locale, state.limit(req.limit))
        .await;

    Ok(Json(MoodDetectionResponse {
        emotion,
        detected,
        confidence: reading.confidence,
        playlist: playlist.tracks,
    }))
}

/// POST /api/v1/mood/text - Score free text and recommend for its mood.
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(req): Json<TextAnalysisRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("text is required and cannot be empty".into()));
    }
    let locale = lenient_locale(req.language.as_deref());

    let reading = match state.scorer.score(&req.text).await {
        Ok(reading) => reading,
        Err(e) => {
            warn!(error = %e, "sentiment scorer failed, assuming neutral");
            SentimentReading::neutral_fallback()
        }
    };
    let mood = mood::normalize_sentiment(reading.compound);
    info!(%mood, compound = reading.compound, "text sentiment scored");

    let playlist = state
        .recommender
        .recommend(mood, locale, state.limit(req.limit))
        .await;

    Ok(Json(TextAnalysisResponse {
        sentiment_scores: reading.scores,
        compound: reading.compound,
        mood,
        recommendations: playlist.tracks,
    }))
}

/// GET /api/v1/mood/playlist - Playlist for a mood name.
pub async fn mood_playlist(
    State(state): State<AppState>,
    Query(params): Query<PlaylistQuery>,
) -> impl IntoResponse {
    let limit = state.limit(params.limit);
    let playlist = state
        .recommender
        .fetch_tracks(&params.mood, limit, params.language.as_deref())
        .await;

    Json(PlaylistResponse {
        mood: mood::normalize_emotion_label(&params.mood),
        source: playlist.source,
        tracks: playlist.tracks,
    })
}

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/languages", get(languages))
        .route("/api/v1/emotions", get(emotions))
        .route("/api/v1/search", get(search))
        .route("/api/v1/emotion/detect", post(detect_emotion))
        .route("/api/v1/mood/detect", post(detect_mood))
        .route("/api/v1/mood/text", post(analyze_text))
        .route("/api/v1/mood/playlist", get(mood_playlist))
}
