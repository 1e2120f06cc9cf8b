//! Recommendation executor.
//!
//! Runs a request through an explicit degradation ladder:
//!
//! 1. `ClientCheck`: no client or failed auth goes straight to the mock fallback.
//! 2. `PrimaryQuery`: the mood/locale query. A full page finishes the request;
//!    a short page, an empty page or an error moves on to the retry.
//! 3. `RetryQuery`: one relaxed query with broad genre seeds, merged into what
//!    is already held. Anything collected so far is returned; with nothing
//!    collected the request falls through to the mock fallback.
//! 4. `MockFallback`: locally generated tracks, which cannot fail.
//!
//! Cancellation or the request deadline interrupts whichever network stage
//! is running and jumps straight to the mock fallback, dropping anything
//! collected so far.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::locale::{self, Locale};
use crate::mood::{normalize_emotion_label, Mood};
use crate::recommend::mock;
use crate::recommend::query::{self, RecommendationQuery};
use crate::recommend::source::{RecommendationPage, RecommendationSource};
use crate::recommend::track::{Playlist, PlaylistSource, Track};

/// Upper bound on a request deadline.
pub const MAX_DEADLINE: Duration = Duration::from_secs(600);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    ClientCheck,
    PrimaryQuery,
    RetryQuery,
    MockFallback,
    Done,
}

#[derive(Clone, Debug)]
pub struct RecommenderOptions {
    /// Budget for all network stages of one request.
    pub deadline: Duration,
    /// Look up each track missing a preview URL once.
    pub backfill_previews: bool,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(20),
            backfill_previews: true,
        }
    }
}

/// Tracks collected so far, unique by id and capped at the limit.
struct Harvest {
    limit: usize,
    tracks: Vec<Track>,
    seen: HashSet<String>,
}

impl Harvest {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            tracks: Vec::with_capacity(limit),
            seen: HashSet::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.tracks.len() >= self.limit
    }

    fn holds(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    fn push(&mut self, track: Track) -> bool {
        if self.is_full() || !self.seen.insert(track.id.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }
}

/// Mood-driven playlist generation over an optional external recommender.
#[derive(Clone)]
pub struct Recommender {
    source: Option<Arc<dyn RecommendationSource>>,
    options: RecommenderOptions,
}

impl Recommender {
    pub fn new(source: Option<Arc<dyn RecommendationSource>>, options: RecommenderOptions) -> Self {
        Self { source, options }
    }

    /// A recommender that always serves generated tracks.
    pub fn offline() -> Self {
        Self::new(None, RecommenderOptions::default())
    }

    /// Playlist for a raw mood string and optional language token.
    ///
    /// Unknown moods use `neutral`, unknown or missing languages use
    /// `english`. Returns `limit` tracks at most and at least one when
    /// `limit >= 1`; never fails.
    pub async fn fetch_tracks(&self, mood: &str, limit: usize, language: Option<&str>) -> Playlist {
        let mood = normalize_emotion_label(mood);
        let locale = locale::resolve(language).unwrap_or_default();
        self.recommend(mood, locale, limit).await
    }

    pub async fn recommend(&self, mood: Mood, locale: Locale, limit: usize) -> Playlist {
        let mut rng = StdRng::from_entropy();
        self.recommend_with(mood, locale, limit, &CancellationToken::new(), &mut rng)
            .await
    }

    /// Same as [`Recommender::recommend`] with a caller-supplied random
    /// source and cancellation token.
    pub async fn recommend_with<R: Rng + Send>(
        &self,
        mood: Mood,
        locale: Locale,
        limit: usize,
        cancel: &CancellationToken,
        rng: &mut R,
    ) -> Playlist {
        let deadline = Instant::now() + self.options.deadline.min(MAX_DEADLINE);
        let query = query::build(mood, locale, limit, rng);
        let mut harvest = Harvest::new(limit);
        let mut synthetic = false;
        let mut stage = if limit == 0 { Stage::Done } else { Stage::ClientCheck };

        loop {
            debug!(?stage, collected = harvest.tracks.len(), "recommendation ladder");
            stage = match (stage, self.source.as_deref()) {
                (Stage::Done, _) => break,
                (Stage::MockFallback, _) => {
                    harvest.tracks = mock::generate(mood, limit, rng);
                    synthetic = true;
                    Stage::Done
                }
                (_, None) => {
                    warn!("no recommendation client configured, using mock tracks");
                    Stage::MockFallback
                }
                (Stage::ClientCheck, Some(source)) => {
                    match guarded(cancel, deadline, source.authenticate()).await {
                        Ok(Ok(())) => Stage::PrimaryQuery,
                        Ok(Err(e)) => {
                            warn!(error = %e, "recommendation client unavailable, using mock tracks");
                            Stage::MockFallback
                        }
                        Err(Interrupted) => {
                            warn!("recommendation request interrupted during client check");
                            Stage::MockFallback
                        }
                    }
                }
                (Stage::PrimaryQuery, Some(source)) => {
                    self.primary(source, &query, mood, &mut harvest, cancel, deadline)
                        .await
                }
                (Stage::RetryQuery, Some(source)) => {
                    retry(source, &query.relaxed(), mood, &mut harvest, cancel, deadline).await
                }
            };
        }

        let source = if synthetic {
            PlaylistSource::Synthetic
        } else if harvest.is_full() {
            PlaylistSource::Live
        } else {
            PlaylistSource::Partial
        };
        let mut tracks = harvest.tracks;
        tracks.truncate(limit);

        info!(
            %mood,
            %locale,
            limit,
            returned = tracks.len(),
            ?source,
            "playlist ready"
        );
        Playlist { tracks, source }
    }

    async fn primary(
        &self,
        source: &dyn RecommendationSource,
        query: &RecommendationQuery,
        mood: Mood,
        harvest: &mut Harvest,
        cancel: &CancellationToken,
        deadline: Instant,
    ) -> Stage {
        let items = match guarded(cancel, deadline, source.recommendations(query)).await {
            Ok(Ok(RecommendationPage { tracks: Some(items) })) if !items.is_empty() => items,
            Ok(Ok(_)) => {
                warn!("recommender returned no tracks, retrying with relaxed seeds");
                return Stage::RetryQuery;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "recommendation query failed, retrying with relaxed seeds");
                return Stage::RetryQuery;
            }
            Err(Interrupted) => {
                warn!("recommendation request interrupted during primary query");
                return Stage::MockFallback;
            }
        };

        info!(received = items.len(), "received recommendations");
        for raw in &items {
            if harvest.is_full() {
                break;
            }
            if harvest.holds(&raw.id) {
                continue;
            }
            let mut track = Track::project(raw, mood);
            if track.preview_url.is_none() && self.options.backfill_previews {
                match backfill_preview(source, &track.id, cancel, deadline).await {
                    Ok(url) => track.preview_url = url,
                    Err(Interrupted) => {
                        warn!("recommendation request interrupted during preview backfill");
                        return Stage::MockFallback;
                    }
                }
            }
            harvest.push(track);
        }

        if harvest.is_full() {
            Stage::Done
        } else if cancel.is_cancelled() || Instant::now() >= deadline {
            warn!("recommendation request interrupted after primary query");
            Stage::MockFallback
        } else {
            warn!(
                got = harvest.tracks.len(),
                wanted = harvest.limit,
                "short recommendation page, supplementing with relaxed seeds"
            );
            Stage::RetryQuery
        }
    }
}

async fn retry(
    source: &dyn RecommendationSource,
    query: &RecommendationQuery,
    mood: Mood,
    harvest: &mut Harvest,
    cancel: &CancellationToken,
    deadline: Instant,
) -> Stage {
    match guarded(cancel, deadline, source.recommendations(query)).await {
        Ok(Ok(RecommendationPage { tracks: Some(items) })) => {
            let before = harvest.tracks.len();
            for raw in &items {
                if harvest.is_full() {
                    break;
                }
                harvest.push(Track::project(raw, mood));
            }
            debug!(added = harvest.tracks.len() - before, "merged relaxed recommendations");
        }
        Ok(Ok(RecommendationPage { tracks: None })) => {
            warn!("relaxed recommendation response had no track list");
        }
        Ok(Err(e)) => warn!(error = %e, "relaxed recommendation query failed"),
        Err(Interrupted) => {
            warn!("recommendation request interrupted during retry");
            return Stage::MockFallback;
        }
    }

    if harvest.tracks.is_empty() {
        Stage::MockFallback
    } else {
        Stage::Done
    }
}

/// Best-effort preview URL lookup; lookup failures are logged and ignored.
async fn backfill_preview(
    source: &dyn RecommendationSource,
    id: &str,
    cancel: &CancellationToken,
    deadline: Instant,
) -> Result<Option<String>, Interrupted> {
    match guarded(cancel, deadline, source.track(id)).await? {
        Ok(full) => Ok(full.preview_url),
        Err(e) => {
            debug!(track_id = id, error = %e, "preview lookup failed");
            Ok(None)
        }
    }
}

/// The request was cancelled or ran past its deadline.
#[derive(Debug)]
struct Interrupted;

/// Runs `fut` unless the request is cancelled or its deadline passes first.
async fn guarded<F: Future>(
    cancel: &CancellationToken,
    deadline: Instant,
    fut: F,
) -> Result<F::Output, Interrupted> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted),
        res = tokio::time::timeout_at(deadline, fut) => res.map_err(|_| Interrupted),
    }
}
