//! Builds bounded recommendation queries from a mood and a locale.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::locale::{Locale, LocaleProfile};
use crate::mood::Mood;
use crate::recommend::profile::MoodQueryProfile;

/// Upper bound on combined seeds the recommendations endpoint accepts.
pub const MAX_SEEDS: usize = 5;

/// Per-category cap applied before the combined cap.
const SEEDS_PER_CATEGORY: usize = 2;

const DEFAULT_GENRE: &str = "pop";

/// Broad genres used when retrying with relaxed seeds.
pub const FALLBACK_GENRES: [&str; 3] = ["pop", "rock", "electronic"];

/// Genre, artist and track seeds sent with a recommendation query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeedSet {
    pub genres: Vec<String>,
    pub artists: Vec<String>,
    pub tracks: Vec<String>,
}

impl SeedSet {
    pub fn len(&self) -> usize {
        self.genres.len() + self.artists.len() + self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seeds restricted to broad genres, for the relaxed retry.
    pub fn relaxed() -> Self {
        Self {
            genres: FALLBACK_GENRES.iter().map(|g| g.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Caps the combined seed count at `max`, keeping one of each category
    /// when all three are present and then preferring tracks, then genres.
    fn capped(self, max: usize) -> Self {
        if self.len() <= max {
            return self;
        }

        let all_present =
            !self.genres.is_empty() && !self.artists.is_empty() && !self.tracks.is_empty();
        let mut genres = self.genres.into_iter();
        let mut artists = self.artists.into_iter();
        let mut tracks = self.tracks.into_iter();
        let mut out = SeedSet::default();

        if all_present {
            out.genres.extend(genres.next());
            out.artists.extend(artists.next());
            out.tracks.extend(tracks.next());
        }

        while out.len() < max {
            if let Some(t) = tracks.next() {
                out.tracks.push(t);
            } else if let Some(g) = genres.next() {
                out.genres.push(g);
            } else if let Some(a) = artists.next() {
                out.artists.push(a);
            } else {
                break;
            }
        }
        out
    }
}

/// A fully resolved query for the recommendations endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationQuery {
    pub limit: usize,
    pub market: String,
    pub target_valence: Option<f64>,
    pub target_energy: Option<f64>,
    pub min_tempo: Option<u32>,
    pub max_tempo: Option<u32>,
    pub seeds: SeedSet,
}

impl RecommendationQuery {
    /// Same audio targets, broad genre seeds only.
    pub fn relaxed(&self) -> Self {
        Self {
            seeds: SeedSet::relaxed(),
            ..self.clone()
        }
    }

    /// Flat `key=value` pairs for the HTTP query string.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("market", self.market.clone()),
        ];
        if let Some(v) = self.target_valence {
            params.push(("target_valence", format!("{v:.3}")));
        }
        if let Some(e) = self.target_energy {
            params.push(("target_energy", format!("{e:.3}")));
        }
        if let Some(t) = self.min_tempo {
            params.push(("min_tempo", t.to_string()));
        }
        if let Some(t) = self.max_tempo {
            params.push(("max_tempo", t.to_string()));
        }
        if !self.seeds.genres.is_empty() {
            params.push(("seed_genres", self.seeds.genres.join(",")));
        }
        if !self.seeds.artists.is_empty() {
            params.push(("seed_artists", self.seeds.artists.join(",")));
        }
        if !self.seeds.tracks.is_empty() {
            params.push(("seed_tracks", self.seeds.tracks.join(",")));
        }
        params
    }
}

/// Builds the recommendation query for `mood` in `locale`.
pub fn build<R: Rng + ?Sized>(
    mood: Mood,
    locale: Locale,
    limit: usize,
    rng: &mut R,
) -> RecommendationQuery {
    build_from(
        MoodQueryProfile::for_mood(mood),
        locale.profile(),
        limit,
        rng,
    )
}

fn build_from<R: Rng + ?Sized>(
    profile: &MoodQueryProfile,
    locale: &LocaleProfile,
    limit: usize,
    rng: &mut R,
) -> RecommendationQuery {
    let sampled = SeedSet {
        genres: profile
            .genres
            .iter()
            .take(SEEDS_PER_CATEGORY)
            .map(|g| g.to_string())
            .collect(),
        artists: sample(locale.seed_artists, rng),
        tracks: sample(locale.seed_tracks, rng),
    };

    let mut seeds = sampled.capped(MAX_SEEDS);
    if seeds.is_empty() {
        seeds.genres.push(DEFAULT_GENRE.to_string());
    }

    RecommendationQuery {
        limit,
        market: locale.market.to_string(),
        target_valence: Some(rng.gen_range(profile.valence.clone())),
        target_energy: Some(rng.gen_range(profile.energy.clone())),
        min_tempo: Some(*profile.tempo.start()),
        max_tempo: Some(*profile.tempo.end()),
        seeds,
    }
}

fn sample<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> Vec<String> {
    pool.choose_multiple(rng, SEEDS_PER_CATEGORY)
        .map(|s| s.to_string())
        .collect()
}
