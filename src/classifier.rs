//! Clients for the external emotion classifier and sentiment scorer.
//!
//! Both are black boxes reached over HTTP. When either is missing or fails,
//! handlers substitute [`EmotionReading::neutral_fallback`] or a zero
//! compound score rather than failing the request.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ClassifierError;

const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(30);

/// Output of the vision classifier.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EmotionReading {
    pub emotion: String,
    pub confidence: f64,
    #[serde(default)]
    pub emotion_scores: HashMap<String, f64>,
}

impl EmotionReading {
    pub fn neutral_fallback() -> Self {
        let emotion_scores = [
            ("angry", 0.05),
            ("disgust", 0.05),
            ("fear", 0.05),
            ("happy", 0.1),
            ("sad", 0.1),
            ("surprise", 0.05),
            ("neutral", 0.6),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            emotion: "neutral".to_string(),
            confidence: 0.5,
            emotion_scores,
        }
    }
}

/// Output of the sentiment scorer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SentimentReading {
    pub compound: f64,
    #[serde(default)]
    pub scores: HashMap<String, f64>,
}

impl SentimentReading {
    pub fn neutral_fallback() -> Self {
        Self {
            compound: 0.0,
            scores: HashMap::new(),
        }
    }
}

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<EmotionReading, ClassifierError>;
}

#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<SentimentReading, ClassifierError>;
}

/// Decodes a base64 image, accepting `data:<mime>;base64,` URLs.
pub fn decode_image(payload: &str) -> Result<Vec<u8>, ClassifierError> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ClassifierError::InvalidImage(format!("invalid base64 data: {}", e)))?;
    if bytes.is_empty() {
        return Err(ClassifierError::InvalidImage("empty image".into()));
    }
    Ok(bytes)
}

fn http_client() -> Result<Client, ClassifierError> {
    Client::builder()
        .timeout(CLASSIFIER_TIMEOUT)
        .build()
        .map_err(|e| ClassifierError::Http(format!("build client: {}", e)))
}

async fn post_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: Option<&str>,
    body: serde_json::Value,
) -> Result<T, ClassifierError> {
    let url = url.ok_or(ClassifierError::Unavailable)?;
    let res = client.post(url).json(&body).send().await?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(ClassifierError::Http(format!("{} - {}", status, body)));
    }

    res.json()
        .await
        .map_err(|e| ClassifierError::Parse(e.to_string()))
}

/// Vision classifier behind an HTTP endpoint taking `{"image": <base64>}`.
pub struct RemoteEmotionClassifier {
    client: Client,
    url: Option<String>,
}

impl RemoteEmotionClassifier {
    pub fn new(url: Option<String>) -> Result<Self, ClassifierError> {
        Ok(Self {
            client: http_client()?,
            url,
        })
    }
}

#[async_trait]
impl EmotionClassifier for RemoteEmotionClassifier {
    async fn classify(&self, image: &[u8]) -> Result<EmotionReading, ClassifierError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let reading: EmotionReading =
            post_json(&self.client, self.url.as_deref(), json!({ "image": encoded })).await?;
        if !(0.0..=1.0).contains(&reading.confidence) {
            return Err(ClassifierError::Parse(format!(
                "confidence out of range: {}",
                reading.confidence
            )));
        }
        Ok(reading)
    }
}

/// Sentiment scorer behind an HTTP endpoint taking `{"text": ...}`.
pub struct RemoteSentimentScorer {
    client: Client,
    url: Option<String>,
}

impl RemoteSentimentScorer {
    pub fn new(url: Option<String>) -> Result<Self, ClassifierError> {
        Ok(Self {
            client: http_client()?,
            url,
        })
    }
}

#[async_trait]
impl SentimentScorer for RemoteSentimentScorer {
    async fn score(&self, text: &str) -> Result<SentimentReading, ClassifierError> {
        let reading: SentimentReading =
            post_json(&self.client, self.url.as_deref(), json!({ "text": text })).await?;
        Ok(SentimentReading {
            compound: reading.compound.clamp(-1.0, 1.0),
            ..reading
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_data_url() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG");
        assert_eq!(decode_image(&encoded).unwrap(), b"\x89PNG");
        let data_url = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_image(&data_url).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image("not base64!!"),
            Err(ClassifierError::InvalidImage(_))
        ));
        assert!(matches!(decode_image(""), Err(ClassifierError::InvalidImage(_))));
    }

    #[test]
    fn test_neutral_fallback_reading() {
        let r = EmotionReading::neutral_fallback();
        assert_eq!(r.emotion, "neutral");
        assert_eq!(r.confidence, 0.5);
        assert_eq!(r.emotion_scores.len(), 7);
        assert_eq!(r.emotion_scores["neutral"], 0.6);
    }

    #[tokio::test]
    async fn test_unconfigured_remote_is_unavailable() {
        let classifier = RemoteEmotionClassifier::new(None).unwrap();
        assert!(matches!(
            classifier.classify(b"img").await,
            Err(ClassifierError::Unavailable)
        ));
        let scorer = RemoteSentimentScorer::new(None).unwrap();
        assert!(matches!(
            scorer.score("hello").await,
            Err(ClassifierError::Unavailable)
        ));
    }
}
