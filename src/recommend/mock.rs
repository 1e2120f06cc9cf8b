//! Synthetic tracks for when the recommender cannot be reached.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::mood::Mood;
use crate::recommend::track::{Artist, Track};

type ArtistPool = [(&'static str, &'static str); 3];

fn artists(mood: Mood) -> &'static ArtistPool {
    match mood {
        Mood::Happy => &[
            ("happy1", "Happy Vibes"),
            ("happy2", "Sunshine Band"),
            ("happy3", "Joyful Noise"),
        ],
        Mood::Sad => &[
            ("sad1", "Melancholy"),
            ("sad2", "Blue Notes"),
            ("sad3", "Teardrops"),
        ],
        Mood::Angry => &[
            ("angry1", "Rage Machine"),
            ("angry2", "Fury"),
            ("angry3", "Thunder"),
        ],
        Mood::Neutral => &[
            ("neutral1", "Ambient Sounds"),
            ("neutral2", "Background Noise"),
            ("neutral3", "Elevator Music"),
        ],
        Mood::Surprised => &[
            ("surprised1", "Unexpected"),
            ("surprised2", "Shock Wave"),
            ("surprised3", "Astonished"),
        ],
        Mood::Fearful => &[
            ("fearful1", "Haunted"),
            ("fearful2", "Shadows"),
            ("fearful3", "Suspense"),
        ],
        Mood::Disgusted => &[
            ("disgusted1", "Revulsion"),
            ("disgusted2", "Distaste"),
            ("disgusted3", "Aversion"),
        ],
    }
}

fn titles(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "Dancing in the Sun", "Celebration", "Good Vibes Only", "Happy Day",
            "Upbeat Rhythm", "Joyful Morning", "Sunshine Smile", "Positive Energy",
            "Bright Future", "Cheerful Melody", "Uplifting", "Radiant Joy",
        ],
        Mood::Sad => &[
            "Rainy Day", "Lost Love", "Melancholy Blues", "Teardrops",
            "Lonely Night", "Fading Memories", "Silent Tears", "Empty Room",
            "Broken Heart", "Goodbye", "Missing You", "Distant Echo",
        ],
        Mood::Angry => &[
            "Rage Against", "Fury", "Boiling Point", "Breaking Point",
            "Explosive", "Burning Inside", "Unleashed", "Shattered",
            "Eruption", "Fierce", "Intensity", "Outburst",
        ],
        Mood::Neutral => &[
            "Background Noise", "Ambient Sounds", "Middle Ground", "Balance",
            "Harmony", "Equilibrium", "Steady Flow", "Even Keel",
            "Moderate", "Balanced", "Centered", "Stable",
        ],
        Mood::Surprised => &[
            "Unexpected Turn", "Sudden Shift", "Plot Twist", "Revelation",
            "Astonished", "Shock Wave", "Jaw Dropper", "Surprise Party",
            "Out of Nowhere", "Unforeseen", "Startled", "Amazed",
        ],
        Mood::Fearful => &[
            "Shadows", "Haunted", "Dark Corner", "Suspense",
            "Creeping Fear", "Tension Rising", "Apprehension", "Dread",
            "Foreboding", "Anxious Mind", "Unease", "Trepidation",
        ],
        Mood::Disgusted => &[
            "Revulsion", "Distaste", "Aversion", "Repulsed",
            "Turned Off", "Nauseated", "Repelled", "Grossed Out",
            "Revolting", "Sickening", "Offensive", "Unpalatable",
        ],
    }
}

/// Generates exactly `limit` synthetic tracks for `mood`.
///
/// Ids take the form `mock_<mood>_<index>_<suffix>`, so they are unique within
/// one playlist. No network access.
pub fn generate<R: Rng + ?Sized>(mood: Mood, limit: usize, rng: &mut R) -> Vec<Track> {
    let artist_pool = artists(mood);
    let title_pool = titles(mood);

    (0..limit)
        .map(|i| {
            let (artist_id, artist_name) = artist_pool
                .choose(rng)
                .copied()
                .unwrap_or(artist_pool[0]);
            let title = title_pool.choose(rng).copied().unwrap_or("Untitled");
            let id = format!("mock_{}_{}_{}", mood, i, rng.gen_range(1000..10000));

            Track {
                uri: format!("spotify:track:{id}"),
                id,
                name: format!("{} {}", title, i + 1),
                artists: vec![Artist {
                    id: artist_id.to_string(),
                    name: artist_name.to_string(),
                }],
                mood,
                image_url: None,
                preview_url: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generates_exact_count_with_unique_ids() {
        let mut rng = StdRng::seed_from_u64(8);
        for mood in Mood::ALL {
            for limit in [0, 1, 7, 50] {
                let tracks = generate(mood, limit, &mut rng);
                assert_eq!(tracks.len(), limit);
                let ids: HashSet<_> = tracks.iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids.len(), limit);
            }
        }
    }

    #[test]
    fn test_tracks_draw_from_mood_pools() {
        let mut rng = StdRng::seed_from_u64(17);
        let tracks = generate(Mood::Fearful, 20, &mut rng);
        for (i, t) in tracks.iter().enumerate() {
            assert!(t.id.starts_with(&format!("mock_fearful_{i}_")));
            assert_eq!(t.uri, format!("spotify:track:{}", t.id));
            assert_eq!(t.mood, Mood::Fearful);
            assert!(t.name.ends_with(&format!(" {}", i + 1)));
            assert!(artists(Mood::Fearful).iter().any(|(id, _)| *id == t.artists[0].id));
            assert!(t.preview_url.is_none() && t.image_url.is_none());
        }
    }
}
