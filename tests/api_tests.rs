//! Router-level tests against an offline recommender and stub classifiers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::Engine;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use mood_playlist::classifier::{EmotionClassifier, EmotionReading, SentimentReading, SentimentScorer};
use mood_playlist::error::ClassifierError;
use mood_playlist::recommend::Recommender;
use mood_playlist::{build_router, AppState};

struct FixedClassifier(Option<&'static str>);

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<EmotionReading, ClassifierError> {
        match self.0 {
            Some(label) => Ok(EmotionReading {
                emotion: label.to_string(),
                confidence: 0.9,
                emotion_scores: HashMap::from([(label.to_string(), 0.9)]),
            }),
            None => Err(ClassifierError::Unavailable),
        }
    }
}

struct FixedScorer(Option<f64>);

#[async_trait]
impl SentimentScorer for FixedScorer {
    async fn score(&self, _text: &str) -> Result<SentimentReading, ClassifierError> {
        match self.0 {
            Some(compound) => Ok(SentimentReading {
                compound,
                scores: HashMap::from([("compound".to_string(), compound)]),
            }),
            None => Err(ClassifierError::Unavailable),
        }
    }
}

fn setup_app(label: Option<&'static str>, compound: Option<f64>) -> axum::Router {
    build_router(AppState {
        recommender: Recommender::offline(),
        spotify: None,
        classifier: Arc::new(FixedClassifier(label)),
        scorer: Arc::new(FixedScorer(compound)),
        default_limit: 10,
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn image() -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(b"fake jpeg bytes");
    format!("data:image/jpeg;base64,{b64}")
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn ids(tracks: &Value) -> Vec<String> {
    tracks
        .as_array()
        .expect("tracks array")
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let response = setup_app(None, None).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_languages_and_emotions() {
    let app = setup_app(None, None);

    let response = app.clone().oneshot(get("/api/v1/languages")).await.unwrap();
    let languages = extract_json(response.into_body()).await;
    assert_eq!(languages.as_array().unwrap().len(), 8);
    assert!(languages.as_array().unwrap().contains(&json!("korean")));

    let response = app.oneshot(get("/api/v1/emotions")).await.unwrap();
    let emotions = extract_json(response.into_body()).await;
    assert_eq!(
        emotions,
        json!(["happy", "sad", "angry", "neutral", "surprised", "fearful", "disgusted"])
    );
}

#[tokio::test]
async fn test_emotion_detect_rejects_unsupported_language() {
    let request = post_json(
        "/api/v1/emotion/detect",
        json!({ "image": image(), "language": "klingon", "include_playlist": true }),
    );
    let response = setup_app(Some("happy"), None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Unsupported language: klingon."));
    assert!(message.contains("english"));
}

#[tokio::test]
async fn test_emotion_detect_with_playlist() {
    let request = post_json(
        "/api/v1/emotion/detect",
        json!({ "image": image(), "language": "KO", "include_playlist": true, "limit": 5 }),
    );
    let response = setup_app(Some("Fear"), None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["emotion"], "fearful");
    let ids = ids(&body["playlist"]);
    assert_eq!(ids.len(), 5);
    assert!(ids.iter().all(|id| id.starts_with("mock_fearful_")));
}

#[tokio::test]
async fn test_emotion_detect_without_playlist() {
    let request = post_json("/api/v1/emotion/detect", json!({ "image": image() }));
    let response = setup_app(Some("sad"), None).oneshot(request).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["emotion"], "sad");
    assert_eq!(body["playlist"], json!([]));
}

#[tokio::test]
async fn test_classifier_failure_falls_back_to_neutral() {
    let request = post_json(
        "/api/v1/emotion/detect",
        json!({ "image": image(), "include_playlist": true }),
    );
    let response = setup_app(None, None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["emotion"], "neutral");
    assert_eq!(body["confidence"], 0.5);
    assert_eq!(ids(&body["playlist"]).len(), 10);
}

#[tokio::test]
async fn test_invalid_image_is_bad_request() {
    let request = post_json("/api/v1/emotion/detect", json!({ "image": "%%%" }));
    let response = setup_app(Some("happy"), None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mood_detect_stays_near_detection() {
    let request = post_json(
        "/api/v1/mood/detect",
        json!({ "image": image(), "language": "klingon", "limit": 3 }),
    );
    let response = setup_app(Some("happy"), None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["detected"], "happy");
    let emotion = body["emotion"].as_str().unwrap().to_string();
    assert!(["happy", "surprised", "neutral"].contains(&emotion.as_str()));
    let ids = ids(&body["playlist"]);
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id.starts_with(&format!("mock_{emotion}_"))));
}

#[tokio::test]
async fn test_text_mood() {
    let request = post_json(
        "/api/v1/mood/text",
        json!({ "text": "what a wonderful day", "limit": 4 }),
    );
    let response = setup_app(None, Some(0.8)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mood"], "happy");
    assert_eq!(body["compound"], 0.8);
    assert_eq!(ids(&body["recommendations"]).len(), 4);
}

#[tokio::test]
async fn test_text_mood_scorer_failure_is_neutral() {
    let request = post_json("/api/v1/mood/text", json!({ "text": "hmm" }));
    let response = setup_app(None, None).oneshot(request).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mood"], "neutral");
    assert_eq!(body["compound"], 0.0);
}

#[tokio::test]
async fn test_text_mood_requires_text() {
    let request = post_json("/api/v1/mood/text", json!({ "text": "   " }));
    let response = setup_app(None, Some(0.8)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mood_playlist_is_lenient() {
    let response = setup_app(None, None)
        .oneshot(get("/api/v1/mood/playlist?mood=melancholy&limit=500&language=klingon"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mood"], "neutral");
    assert_eq!(body["source"], "synthetic");
    let ids = ids(&body["tracks"]);
    assert_eq!(ids.len(), 50);
    assert!(ids.iter().all(|id| id.starts_with("mock_neutral_")));
}

#[tokio::test]
async fn test_search_without_spotify_is_bad_gateway() {
    let response = setup_app(None, None)
        .oneshot(get("/api/v1/search?q=daft+punk"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
