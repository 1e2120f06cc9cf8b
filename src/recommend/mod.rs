//! Mood-to-playlist pipeline: query building, execution with fallbacks,
//! and track projection.

pub mod executor;
pub mod mock;
pub mod profile;
pub mod query;
pub mod source;
pub mod track;

pub use executor::{Recommender, RecommenderOptions};
pub use source::{RecommendationPage, RecommendationSource};
pub use track::{Artist, Playlist, PlaylistSource, Track};
