use async_trait::async_trait;

use crate::error::SpotifyError;
use crate::recommend::query::RecommendationQuery;
use crate::spotify::Track;

/// One page of recommender output. `tracks` is `None` when the response
/// carried no track list at all.
#[derive(Clone, Debug, Default)]
pub struct RecommendationPage {
    pub tracks: Option<Vec<Track>>,
}

/// External recommendation service the executor degrades around.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Confirms the client can authenticate.
    async fn authenticate(&self) -> Result<(), SpotifyError>;

    async fn recommendations(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationPage, SpotifyError>;

    /// Single-track lookup, used to backfill missing preview URLs.
    async fn track(&self, id: &str) -> Result<Track, SpotifyError>;
}
