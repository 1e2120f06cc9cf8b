//! Canonical track records and their projection from catalog items.

use serde::Serialize;

use crate::mood::Mood;
use crate::spotify;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// A recommended track, as returned to every caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub mood: Mood,
    pub uri: String,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
}

impl Track {
    /// Projects a catalog item, tagging it with the mood it was fetched for.
    pub fn project(raw: &spotify::Track, mood: Mood) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            artists: raw
                .artists
                .iter()
                .map(|a| Artist {
                    id: a.id.clone().unwrap_or_default(),
                    name: a.name.clone(),
                })
                .collect(),
            mood,
            uri: raw.uri.clone(),
            image_url: raw.album.images.first().and_then(|i| i.url.clone()),
            preview_url: raw.preview_url.clone(),
        }
    }
}

/// Where the tracks of a playlist came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistSource {
    /// Filled to the requested limit by the recommender.
    Live,
    /// Recommender tracks, but fewer than requested.
    Partial,
    /// Generated locally.
    Synthetic,
}

/// Ordered tracks for one request, never longer than the requested limit.
#[derive(Clone, Debug, Serialize)]
pub struct Playlist {
    pub tracks: Vec<Track>,
    pub source: PlaylistSource,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> spotify::Track {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_project_full_item() {
        let item = raw(serde_json::json!({
            "id": "t1",
            "name": "Song",
            "uri": "spotify:track:t1",
            "artists": [{"id": "a1", "name": "Artist"}],
            "album": {"name": "Album", "images": [{"url": "https://img/1"}, {"url": "https://img/2"}]},
            "preview_url": "https://preview/1"
        }));
        let track = Track::project(&item, Mood::Happy);
        assert_eq!(track.id, "t1");
        assert_eq!(track.mood, Mood::Happy);
        assert_eq!(track.artists, vec![Artist { id: "a1".into(), name: "Artist".into() }]);
        assert_eq!(track.image_url.as_deref(), Some("https://img/1"));
        assert_eq!(track.preview_url.as_deref(), Some("https://preview/1"));
    }

    #[test]
    fn test_project_tolerates_missing_optional_fields() {
        let item = raw(serde_json::json!({
            "id": "t2",
            "name": "Bare",
            "uri": "spotify:track:t2",
            "artists": [{"name": "Nobody"}]
        }));
        let track = Track::project(&item, Mood::Sad);
        assert_eq!(track.image_url, None);
        assert_eq!(track.preview_url, None);
        assert_eq!(track.artists[0].id, "");
    }

    #[test]
    fn test_project_with_null_preview() {
        let item = raw(serde_json::json!({
            "id": "t3",
            "name": "Nulls",
            "uri": "spotify:track:t3",
            "artists": [],
            "album": {"name": "A", "images": []},
            "preview_url": null
        }));
        let track = Track::project(&item, Mood::Neutral);
        assert_eq!(track.preview_url, None);
        assert_eq!(track.image_url, None);
    }
}
