use serde::{Deserialize, Serialize};

/// Visual theme derived from the weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Clear,
    Cloudy,
    Rain,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label and theme for a set of WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherMeta {
    pub label: &'static str,
    pub theme: Theme,
}

struct Entry {
    codes: &'static [i32],
    meta: WeatherMeta,
}

const fn entry(codes: &'static [i32], label: &'static str, theme: Theme) -> Entry {
    Entry {
        codes,
        meta: WeatherMeta { label, theme },
    }
}

/// Ordered, non-overlapping code table.
/// See: https://open-meteo.com/en/docs#weathervariables
const WEATHER_TABLE: &[Entry] = &[
    entry(&[0], "Clear sky", Theme::Clear),
    entry(&[1, 2, 3], "Cloud cover", Theme::Cloudy),
    entry(&[45, 48], "Fog and mist", Theme::Cloudy),
    entry(&[51, 53, 55, 56, 57], "Drizzle", Theme::Rain),
    entry(&[61, 63, 65, 66, 67], "Rain", Theme::Rain),
    entry(&[71, 73, 75, 77], "Snow", Theme::Cloudy),
    entry(&[80, 81, 82], "Rain showers", Theme::Rain),
    entry(&[85, 86], "Snow showers", Theme::Cloudy),
    entry(&[95, 96, 99], "Thunderstorm", Theme::Rain),
];

/// Used for codes missing from the table
pub const UNKNOWN_WEATHER: WeatherMeta = WeatherMeta {
    label: "Unknown skies",
    theme: Theme::Clear,
};

/// Classify a WMO weather code. Unknown codes get `UNKNOWN_WEATHER`.
pub fn classify(code: i32) -> WeatherMeta {
    WEATHER_TABLE
        .iter()
        .find(|e| e.codes.contains(&code))
        .map(|e| e.meta)
        .unwrap_or(UNKNOWN_WEATHER)
}

/// Classify a code that may be absent from the response
pub fn classify_opt(code: Option<i32>) -> WeatherMeta {
    code.map(classify).unwrap_or(UNKNOWN_WEATHER)
}
