//! Display strings for temperatures, readings and labels.
//!
//! Non-finite or missing inputs render as [`PLACEHOLDER`].

use chrono::NaiveDate;

use crate::convert::{round_half_up, to_fahrenheit, to_scale};

/// Shown in place of a value that is missing or not a number.
pub const PLACEHOLDER: &str = "--";

/// Label used when a load has no place name.
pub const CURRENT_LOCATION: &str = "Current location";

fn whole(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Rounded scale value of a Celsius temperature, without unit.
pub fn scale_value(celsius: f64) -> String {
    let scale = to_scale(celsius);
    if !scale.is_finite() {
        return PLACEHOLDER.to_string();
    }
    whole(scale).to_string()
}

/// A Celsius temperature on the Northwind scale, e.g. `53 °Ñ`.
pub fn scale(celsius: f64) -> String {
    if !celsius.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{} °Ñ", scale_value(celsius))
}

/// A scale value that is already converted, e.g. `50 °Ñ`.
pub fn scale_reading(scale: f64) -> String {
    if !scale.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{} °Ñ", whole(scale))
}

pub fn celsius(celsius: f64) -> String {
    if !celsius.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.1} °C", celsius)
}

/// Fahrenheit reading of a Celsius temperature.
pub fn fahrenheit(celsius: f64) -> String {
    let f = to_fahrenheit(celsius);
    if !f.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.1} °F", f)
}

/// Apparent temperature on the Northwind scale.
pub fn feels_like(celsius: Option<f64>) -> String {
    match celsius {
        Some(c) if c.is_finite() => scale(c),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn humidity(percent: Option<f64>) -> String {
    match percent {
        Some(p) if p.is_finite() => format!("{}%", whole(p)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Wind speed in km/h.
pub fn wind(speed: Option<f64>) -> String {
    match speed {
        Some(s) if s.is_finite() => format!("{} km/h", whole(s)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Daily range as `max / min °Ñ`; placeholder unless both ends are known.
pub fn daily_range(min_celsius: Option<f64>, max_celsius: Option<f64>) -> String {
    match (min_celsius, max_celsius) {
        (Some(min), Some(max)) if min.is_finite() && max.is_finite() => format!(
            "{} / {} °Ñ",
            whole(to_scale(max)),
            whole(to_scale(min))
        ),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Forecast card title, e.g. `Wed · Jan 3`.
pub fn day_title(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%a · %b %-d").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Join the non-empty parts of a place name with ", ".
pub fn location_label(name: Option<&str>, admin1: Option<&str>, country: Option<&str>) -> String {
    [name, admin1, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Status line after a search with results.
pub fn found_spots(count: usize) -> String {
    format!("Found {} spot{}.", count, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_rounds_to_whole_degrees() {
        assert_eq!(scale_value(20.0), "53");
        assert_eq!(scale(20.0), "53 °Ñ");
        assert_eq!(scale(0.0), "0 °Ñ");
        assert_eq!(scale(-10.0), "-26 °Ñ");
    }

    #[test]
    fn test_scale_reading_for_converted_values() {
        assert_eq!(scale_reading(49.6), "50 °Ñ");
        assert_eq!(scale_reading(f64::NAN), PLACEHOLDER);
    }

    #[test]
    fn test_celsius_and_fahrenheit_one_decimal() {
        assert_eq!(celsius(20.0), "20.0 °C");
        assert_eq!(celsius(-3.26), "-3.3 °C");
        assert_eq!(fahrenheit(20.0), "68.0 °F");
        assert_eq!(fahrenheit(-40.0), "-40.0 °F");
    }

    #[test]
    fn test_non_finite_renders_placeholder() {
        assert_eq!(scale(f64::NAN), PLACEHOLDER);
        assert_eq!(celsius(f64::INFINITY), PLACEHOLDER);
        assert_eq!(fahrenheit(f64::NAN), PLACEHOLDER);
        assert_eq!(scale_value(f64::NAN), PLACEHOLDER);
    }

    #[test]
    fn test_optional_readings() {
        assert_eq!(humidity(Some(64.4)), "64%");
        assert_eq!(humidity(None), PLACEHOLDER);
        assert_eq!(feels_like(Some(18.0)), "48 °Ñ");
        assert_eq!(feels_like(Some(f64::NAN)), PLACEHOLDER);
        assert_eq!(wind(Some(12.6)), "13 km/h");
        assert_eq!(wind(Some(0.0)), "0 km/h");
        assert_eq!(wind(None), PLACEHOLDER);
    }

    #[test]
    fn test_daily_range_needs_both_ends() {
        assert_eq!(daily_range(Some(10.0), Some(20.0)), "53 / 26 °Ñ");
        assert_eq!(daily_range(None, Some(20.0)), PLACEHOLDER);
        assert_eq!(daily_range(Some(10.0), Some(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn test_day_title() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3);
        assert_eq!(day_title(date), "Wed · Jan 3");
        assert_eq!(day_title(None), PLACEHOLDER);
    }

    #[test]
    fn test_location_label() {
        assert_eq!(
            location_label(Some("Paris"), Some("Île-de-France"), Some("France")),
            "Paris, Île-de-France, France"
        );
        assert_eq!(location_label(Some("Paris"), Some(""), None), "Paris");
        assert_eq!(location_label(None, None, None), "");
    }

    #[test]
    fn test_found_spots_pluralizes() {
        assert_eq!(found_spots(1), "Found 1 spot.");
        assert_eq!(found_spots(4), "Found 4 spots.");
    }
}
