use std::net::SocketAddr;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mood_playlist::classifier::{RemoteEmotionClassifier, RemoteSentimentScorer};
use mood_playlist::config::Config;
use mood_playlist::error::SpotifyError;
use mood_playlist::recommend::{RecommendationSource, Recommender, RecommenderOptions};
use mood_playlist::spotify::SpotifyClient;
use mood_playlist::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let spotify = match SpotifyClient::new(&config.spotify) {
        Ok(client) => Some(client),
        Err(SpotifyError::MissingCredentials) => {
            warn!("spotify credentials not set, serving generated playlists only");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let source = spotify
        .clone()
        .map(|client| Arc::new(client) as Arc<dyn RecommendationSource>);
    let recommender = Recommender::new(
        source,
        RecommenderOptions {
            deadline: config.recommend_deadline,
            backfill_previews: config.backfill_previews,
        },
    );

    let state = AppState {
        recommender,
        spotify,
        classifier: Arc::new(RemoteEmotionClassifier::new(config.emotion_classifier_url.clone())?),
        scorer: Arc::new(RemoteSentimentScorer::new(config.sentiment_scorer_url.clone())?),
        default_limit: config.default_limit,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
