//! Fixed vocabularies used by the recommender.

/// Weather values the recommender knows how to map onto seasons.
pub const KNOWN_WEATHER: &[&str] = &["warm", "cold", "rainy", "windy"];

pub const KNOWN_SEASONS: &[&str] = &["spring", "summer", "fall", "winter"];

pub const KNOWN_OCCASIONS: &[&str] = &["casual", "work", "party", "gym", "formal", "date"];

/// Colors that go with anything.
pub const NEUTRAL_COLORS: &[&str] = &["black", "white", "gray", "brown", "navy"];

const WEATHER_SEASONS: &[(&str, &[&str])] = &[
    ("cold", &["winter", "fall"]),
    ("warm", &["summer", "spring"]),
    ("rainy", &["fall", "winter"]),
    ("windy", &["fall", "spring"]),
];

/// Seasons appropriate for a weather value.
///
/// Unrecognized weather yields an empty set, so only season-less items match it.
pub fn seasons_for_weather(weather: &str) -> &'static [&'static str] {
    WEATHER_SEASONS
        .iter()
        .find(|(name, _)| *name == weather)
        .map(|(_, seasons)| *seasons)
        .unwrap_or(&[])
}

pub fn is_neutral_color(color: &str) -> bool {
    NEUTRAL_COLORS.contains(&color)
}

#[cfg(test)]
mod tests {
    use super::{is_neutral_color, seasons_for_weather, KNOWN_SEASONS, KNOWN_WEATHER};

    #[test]
    fn weather_maps_to_expected_seasons() {
        assert_eq!(seasons_for_weather("cold"), &["winter", "fall"]);
        assert_eq!(seasons_for_weather("warm"), &["summer", "spring"]);
        assert_eq!(seasons_for_weather("rainy"), &["fall", "winter"]);
        assert_eq!(seasons_for_weather("windy"), &["fall", "spring"]);
    }

    #[test]
    fn unknown_weather_has_no_seasons() {
        assert!(seasons_for_weather("foggy").is_empty());
        assert!(seasons_for_weather("Cold").is_empty());
    }

    #[test]
    fn every_known_weather_maps_into_known_seasons() {
        for weather in KNOWN_WEATHER {
            let seasons = seasons_for_weather(weather);
            assert!(!seasons.is_empty(), "{weather} should map to seasons");
            assert!(seasons.iter().all(|season| KNOWN_SEASONS.contains(season)));
        }
    }

    #[test]
    fn neutral_colors() {
        assert!(is_neutral_color("navy"));
        assert!(!is_neutral_color("coral"));
    }
}
