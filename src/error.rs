use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures talking to the catalog/recommendation API.
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("spotify credentials are not configured")]
    MissingCredentials,
    #[error("spotify auth failed: {0}")]
    Auth(String),
    #[error("spotify request failed: {0}")]
    Http(String),
    #[error("spotify API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("spotify parse failed: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SpotifyError {
    fn from(e: reqwest::Error) -> Self {
        SpotifyError::Http(e.to_string())
    }
}

/// Failures of the emotion classifier or sentiment scorer.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier is not configured")]
    Unavailable,
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("classifier request failed: {0}")]
    Http(String),
    #[error("classifier response malformed: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        ClassifierError::Http(e.to_string())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Spotify(String),
    BadRequest(String),
    UnsupportedLanguage {
        language: String,
        supported: Vec<&'static str>,
    },
}

impl From<SpotifyError> for AppError {
    fn from(e: SpotifyError) -> Self {
        AppError::Spotify(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Spotify(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnsupportedLanguage { language, supported } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Unsupported language: {}. Supported languages: {}",
                    language,
                    supported.join(", ")
                ),
            ),
        };
        (
            status,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(SpotifyError::MissingCredentials), StatusCode::BAD_GATEWAY),
            (AppError::BadRequest("empty".into()), StatusCode::BAD_REQUEST),
            (
                AppError::UnsupportedLanguage {
                    language: "klingon".into(),
                    supported: vec!["english"],
                },
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
