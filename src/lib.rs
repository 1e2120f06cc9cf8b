pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod mood;
pub mod recommend;
pub mod spotify;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

/// Full application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    handlers::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
