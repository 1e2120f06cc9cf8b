//! Supported recommendation locales and their seed pools.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

/// A supported language/region bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Hindi,
    Bangla,
    Korean,
    Spanish,
    Japanese,
    French,
    Portuguese,
}

/// Market code and curated seeds for one locale.
#[derive(Debug)]
pub struct LocaleProfile {
    pub market: &'static str,
    pub seed_artists: &'static [&'static str],
    pub seed_tracks: &'static [&'static str],
}

static ENGLISH: LocaleProfile = LocaleProfile {
    market: "US",
    seed_artists: &[
        "06HL4z0CvFAxyc27GXpf02", // Taylor Swift
        "3TVXtAsR1Inumwj472S9r4", // Drake
        "6eUKZXaKkcviH0Ku9w2n3V", // Ed Sheeran
        "1uNFoZAHBGtllmzznpCI3s", // Justin Bieber
        "66CXWjxzNUsdJxJ2JdwvnR", // Ariana Grande
        "0du5cEVh5yTK9QJze8zA0C", // Bruno Mars
        "3WrFJ7ztbogyGnTHbHJFl2", // The Beatles
        "6M2wZ9GZgrQXHCFfjv46we", // Dua Lipa
        "1Xyo4u8uXC1ZmMpatF05PJ", // The Weeknd
        "0C8ZW7ezQVs4URX5aX7Kqx", // Selena Gomez
    ],
    seed_tracks: &[
        "2takcwOaAZWiXQijPHIx7B",
        "0VjIjW4GlUZAMYd2vXMi3b",
        "7qiZfU4dY1lWllzX7mPBI3",
    ],
};

static HINDI: LocaleProfile = LocaleProfile {
    market: "IN",
    seed_artists: &[
        "1wRPtKGflJrBx9BmLsSwlU", // Arijit Singh
        "4YRxDV8wJFPHPTeXepOstw", // Jubin Nautiyal
        "5f4QpKfy7ptCHwTqspnSJI", // Neha Kakkar
        "4WUepByoeqcedHoYhSNHRt", // A.R. Rahman
        "0ZUKzU83dg0WfNmQR4FpXG", // Shreya Ghoshal
    ],
    seed_tracks: &[
        "5wHqgVs1zikTUKsK01IUbV",
        "0KYP5Qe9ihAMvQzRVqrNxZ",
        "6rZVy6FIG7lSJQMFXHo12z",
    ],
};

static BANGLA: LocaleProfile = LocaleProfile {
    market: "BD",
    seed_artists: &[
        "6PvvGcCY2XtUcuJyEZpyJW", // Miles
        "1W9sHAhVyTEQDXVFRXk9yu", // Shironamhin
        "5IEuvKZG8IHY7kMURADNhS", // Cryptic Fate
        "4fEkbug6kZzzJ8eYX6Kbbp", // Black
        "1uU7g3DNSbsu0QjSvDRqYE", // Nemesis
    ],
    seed_tracks: &[],
};

static KOREAN: LocaleProfile = LocaleProfile {
    market: "KR",
    seed_artists: &[
        "3Nrfpe0tUJi4K4DXYWgMUX", // BTS
        "41MozSoPIsD1dJM0CLPjZF", // BLACKPINK
        "2AMysGXOe0zzZJMtH3Nizb", // TWICE
        "4Uc4O8hMuU5QDzWHOJOAHD", // EXO
        "4rCSDrYm1yT0VaLP78j66p", // IU
    ],
    seed_tracks: &[
        "5KawlOMHjWeUjQtnuRs22c",
        "4TnjEaWOeW0eKTKIpJG0L2",
        "0WMGDXXMbHLGC7pVuJZ7xA",
    ],
};

static SPANISH: LocaleProfile = LocaleProfile {
    market: "ES",
    seed_artists: &[
        "4q3ewBCX7sLwd24euuV69X", // Bad Bunny
        "790FomKkXshlbRYZFtlgla", // KAROL G
        "1vyhD5VmyZ7KMfW5gqLgo5", // J Balvin
        "0EmeFodog0BfRgEMvOorUz", // Shakira
        "1i8SpTcr7yvDOmTqDMmeu6", // Enrique Iglesias
    ],
    seed_tracks: &[],
};

static JAPANESE: LocaleProfile = LocaleProfile {
    market: "JP",
    seed_artists: &[
        "2DlGxzQSjYe5N6G9nkYghR", // YOASOBI
        "5Vo1hnCRmCM6M4thZQrkU2", // Official HIGE DANdism
        "6zYpuEmxNFJwQQnUJfUVKi", // LiSA
        "4nBPzFONLDzAcj8VDhtrDt", // RADWIMPS
        "5qqxHdMGrAMwBTcgDIRpjK", // ONE OK ROCK
    ],
    seed_tracks: &[],
};

static FRENCH: LocaleProfile = LocaleProfile {
    market: "FR",
    seed_artists: &[
        "1URnnhqYAYcqOAhzQcmrQC", // Daft Punk
        "4VMYDCV2IEDYJArk749S6m", // David Guetta
        "3Q2j5apfdrbjsWcIXHVODZ", // Christine and the Queens
        "4NHQUGzhtTLFvgF5SZesLK", // Stromae
        "7GhRU8m1iMlMmPw7QLRUSR", // Zaz
    ],
    seed_tracks: &[],
};

static PORTUGUESE: LocaleProfile = LocaleProfile {
    market: "BR",
    seed_artists: &[
        "7FNnA9vBm6EKceENgCGRMb", // Anitta
        "7GuRQRmIpXcqkQeiv0qOhD", // Caetano Veloso
        "4j7qoFhpRkdTxRsY4nRjfD", // Marisa Monte
        "4JpKVNYnzcRt0un5mdDn0z", // Seu Jorge
        "0oSGxhjXVqpkHRzMmBYNK6", // Gilberto Gil
    ],
    seed_tracks: &[],
};

impl Locale {
    pub const ALL: [Locale; 8] = [
        Locale::English,
        Locale::Hindi,
        Locale::Bangla,
        Locale::Korean,
        Locale::Spanish,
        Locale::Japanese,
        Locale::French,
        Locale::Portuguese,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::English => "english",
            Locale::Hindi => "hindi",
            Locale::Bangla => "bangla",
            Locale::Korean => "korean",
            Locale::Spanish => "spanish",
            Locale::Japanese => "japanese",
            Locale::French => "french",
            Locale::Portuguese => "portuguese",
        }
    }

    pub fn profile(self) -> &'static LocaleProfile {
        match self {
            Locale::English => &ENGLISH,
            Locale::Hindi => &HINDI,
            Locale::Bangla => &BANGLA,
            Locale::Korean => &KOREAN,
            Locale::Spanish => &SPANISH,
            Locale::Japanese => &JAPANESE,
            Locale::French => &FRENCH,
            Locale::Portuguese => &PORTUGUESE,
        }
    }

    fn from_name(name: &str) -> Option<Locale> {
        Locale::ALL.into_iter().find(|l| l.as_str() == name)
    }

    fn from_code(code: &str) -> Option<Locale> {
        let name = match code {
            "en" | "eng" => "english",
            "hi" | "hin" => "hindi",
            "bn" | "ben" => "bangla",
            "ko" | "kor" => "korean",
            "es" | "spa" => "spanish",
            "ja" | "jpn" => "japanese",
            "fr" | "fra" => "french",
            "pt" | "por" => "portuguese",
            _ => return None,
        };
        Locale::from_name(name)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a free-form language token to a supported locale.
///
/// Matches locale names case-insensitively, then 2/3-letter language codes.
/// Returns `None` for missing, blank or unsupported input; picking a default
/// is left to the caller.
pub fn resolve(input: Option<&str>) -> Option<Locale> {
    let raw = input.map(str::trim).filter(|s| !s.is_empty())?;
    let normalized = raw.to_lowercase();

    if let Some(locale) = Locale::from_name(&normalized) {
        debug!(input = raw, %locale, "language matched exactly");
        return Some(locale);
    }
    if let Some(locale) = Locale::from_code(&normalized) {
        debug!(input = raw, %locale, "language matched by code");
        return Some(locale);
    }

    warn!(input = raw, "unsupported language");
    None
}

/// Names of every supported locale, in table order.
pub fn supported_languages() -> Vec<&'static str> {
    Locale::ALL.iter().map(|l| l.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_names_and_codes() {
        assert_eq!(resolve(Some("EN")), Some(Locale::English));
        assert_eq!(resolve(Some("en")), Some(Locale::English));
        assert_eq!(resolve(Some("english")), Some(Locale::English));
        assert_eq!(resolve(Some("English")), Some(Locale::English));
        assert_eq!(resolve(Some("eng")), Some(Locale::English));
        assert_eq!(resolve(Some("bn")), Some(Locale::Bangla));
        assert_eq!(resolve(Some("jpn")), Some(Locale::Japanese));
        assert_eq!(resolve(Some("PT")), Some(Locale::Portuguese));
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        assert_eq!(resolve(Some("klingon")), None);
        assert_eq!(resolve(Some("de")), None);
        assert_eq!(resolve(Some("")), None);
        assert_eq!(resolve(Some("   ")), None);
        assert_eq!(resolve(None), None);
    }

    #[test]
    fn test_every_locale_round_trips_by_name() {
        for locale in Locale::ALL {
            assert_eq!(resolve(Some(locale.as_str())), Some(locale));
        }
    }

    #[test]
    fn test_profiles_have_market_and_artists() {
        for locale in Locale::ALL {
            let profile = locale.profile();
            assert_eq!(profile.market.len(), 2);
            assert!(!profile.seed_artists.is_empty(), "{locale} has no artists");
        }
        assert!(!Locale::English.profile().seed_tracks.is_empty());
        assert!(Locale::Bangla.profile().seed_tracks.is_empty());
    }
}
