//! Canonical mood vocabulary and the normalizers that feed it.
//!
//! Every mood that reaches the recommendation pipeline goes through one of
//! [`normalize_emotion_label`] or [`normalize_sentiment`]; neither can fail.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest chance that a detected mood is re-rolled, regardless of confidence.
const MIN_REROLL_CHANCE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
    Fearful,
    Disgusted,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Neutral,
        Mood::Surprised,
        Mood::Fearful,
        Mood::Disgusted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Neutral => "neutral",
            Mood::Surprised => "surprised",
            Mood::Fearful => "fearful",
            Mood::Disgusted => "disgusted",
        }
    }

    /// Moods a detection may drift to when re-rolled. Includes the mood itself.
    fn adjacent(self) -> &'static [Mood] {
        match self {
            Mood::Happy => &[Mood::Surprised, Mood::Neutral, Mood::Happy],
            Mood::Sad => &[Mood::Neutral, Mood::Fearful, Mood::Sad],
            Mood::Neutral => &[Mood::Happy, Mood::Sad, Mood::Neutral],
            Mood::Angry => &[Mood::Surprised, Mood::Fearful, Mood::Angry],
            Mood::Surprised => &[Mood::Happy, Mood::Neutral, Mood::Surprised],
            Mood::Fearful => &[Mood::Sad, Mood::Neutral, Mood::Fearful],
            Mood::Disgusted => &[Mood::Angry, Mood::Neutral, Mood::Disgusted],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a raw classifier label onto the canonical vocabulary.
///
/// Accepts the canonical names, the short classifier forms (`fear`,
/// `disgust`, `surprise`) and the looser text-sentiment labels. Anything else
/// becomes [`Mood::Neutral`].
pub fn normalize_emotion_label(raw: &str) -> Mood {
    match raw.trim().to_lowercase().as_str() {
        "happy" => Mood::Happy,
        "sad" => Mood::Sad,
        "angry" => Mood::Angry,
        "neutral" => Mood::Neutral,
        "surprised" | "surprise" => Mood::Surprised,
        "fearful" | "fear" => Mood::Fearful,
        "disgusted" | "disgust" => Mood::Disgusted,
        // text-sentiment vocabulary
        "energetic" => Mood::Surprised,
        "calm" | "chill" => Mood::Neutral,
        _ => Mood::Neutral,
    }
}

/// Maps a compound sentiment score in `[-1, 1]` to a mood.
pub fn normalize_sentiment(compound: f64) -> Mood {
    if compound >= 0.5 {
        Mood::Happy
    } else if compound <= -0.5 {
        Mood::Sad
    } else if compound >= 0.2 {
        Mood::Surprised
    } else if compound <= -0.2 {
        Mood::Angry
    } else {
        Mood::Neutral
    }
}

/// Probability that [`randomize`] re-rolls a detection made with `confidence`.
pub fn reroll_chance(confidence: f64) -> f64 {
    let confidence = if confidence.is_nan() { 0.0 } else { confidence };
    (1.0 - confidence).clamp(MIN_REROLL_CHANCE, 1.0)
}

/// Occasionally swaps `mood` for one of its neighbours so repeated detections
/// do not always yield the same playlist. Low confidence re-rolls more often.
pub fn randomize<R: Rng + ?Sized>(mood: Mood, confidence: f64, rng: &mut R) -> Mood {
    if rng.gen_bool(reroll_chance(confidence)) {
        mood.adjacent().choose(rng).copied().unwrap_or(mood)
    } else {
        mood
    }
}
