//! Per-mood audio targets for recommendation queries.

use std::ops::RangeInclusive;

use crate::mood::Mood;

/// Audio feature targets and preferred genres for one mood.
///
/// Valence and energy are sampled from their ranges on every query; the tempo
/// range is passed to the recommender as min/max bounds.
#[derive(Debug)]
pub struct MoodQueryProfile {
    pub valence: RangeInclusive<f64>,
    pub energy: RangeInclusive<f64>,
    pub tempo: RangeInclusive<u32>,
    pub genres: &'static [&'static str],
}

static HAPPY: MoodQueryProfile = MoodQueryProfile {
    valence: 0.7..=0.9,
    energy: 0.7..=0.9,
    tempo: 120..=140,
    genres: &["pop", "dance", "happy"],
};

static SAD: MoodQueryProfile = MoodQueryProfile {
    valence: 0.1..=0.3,
    energy: 0.2..=0.4,
    tempo: 60..=90,
    genres: &["acoustic", "sad", "piano"],
};

static ANGRY: MoodQueryProfile = MoodQueryProfile {
    valence: 0.3..=0.5,
    energy: 0.8..=1.0,
    tempo: 140..=180,
    genres: &["rock", "metal", "punk"],
};

static NEUTRAL: MoodQueryProfile = MoodQueryProfile {
    valence: 0.4..=0.6,
    energy: 0.4..=0.6,
    tempo: 90..=120,
    genres: &["pop", "indie", "alternative"],
};

static SURPRISED: MoodQueryProfile = MoodQueryProfile {
    valence: 0.5..=0.7,
    energy: 0.6..=0.8,
    tempo: 100..=130,
    genres: &["electronic", "dance", "pop"],
};

static FEARFUL: MoodQueryProfile = MoodQueryProfile {
    valence: 0.1..=0.3,
    energy: 0.5..=0.7,
    tempo: 80..=100,
    genres: &["ambient", "soundtrack", "classical"],
};

static DISGUSTED: MoodQueryProfile = MoodQueryProfile {
    valence: 0.2..=0.4,
    energy: 0.6..=0.8,
    tempo: 110..=130,
    genres: &["rock", "alternative", "indie"],
};

impl MoodQueryProfile {
    pub fn for_mood(mood: Mood) -> &'static MoodQueryProfile {
        match mood {
            Mood::Happy => &HAPPY,
            Mood::Sad => &SAD,
            Mood::Angry => &ANGRY,
            Mood::Neutral => &NEUTRAL,
            Mood::Surprised => &SURPRISED,
            Mood::Fearful => &FEARFUL,
            Mood::Disgusted => &DISGUSTED,
        }
    }
}
