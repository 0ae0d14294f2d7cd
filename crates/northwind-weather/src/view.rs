//! View model: everything a rendering surface needs, computed by pure
//! functions from a [`Forecast`].

use serde::Serialize;

use crate::align::closest_index;
use crate::condition::{classify, classify_opt, Theme};
use crate::convert::{clamp_scale, to_celsius, to_scale, SCALE_MAX, SCALE_MIN};
use crate::format;
use crate::gesture::{ThermoControl, INITIAL_VALUE};
use crate::types::{Forecast, Place};

/// Status line shown above the weather
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub enum Status {
    #[default]
    Idle,
    Gathering,
    Updated,
    LoadFailed,
    Locating,
    GeolocationUnsupported,
    GeolocationDenied,
    GeolocationTimedOut,
    Searching,
    Found(usize),
    NoMatches,
    SearchFailed,
}

impl Status {
    pub fn message(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Gathering => "Gathering weather...".to_string(),
            Self::Updated => "Updated just now.".to_string(),
            Self::LoadFailed => "Unable to load weather. Please try again.".to_string(),
            Self::Locating => "Locating you...".to_string(),
            Self::GeolocationUnsupported => {
                "Geolocation not supported on this device.".to_string()
            }
            Self::GeolocationDenied => {
                "Location access denied. Search for a city instead.".to_string()
            }
            Self::GeolocationTimedOut => {
                "Location request timed out. Search for a city instead.".to_string()
            }
            Self::Searching => "Searching...".to_string(),
            Self::Found(count) => format::found_spots(*count),
            Self::NoMatches => "No matches found. Try another search.".to_string(),
            Self::SearchFailed => "Search failed. Please try again.".to_string(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Main readout for the loaded location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub location: String,
    /// Rounded scale value without unit, e.g. "53"
    pub scale_value: String,
    pub celsius: String,
    pub summary: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
}

/// Side-by-side comparison of the three units plus the static thermometer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleView {
    pub scale: String,
    pub celsius: String,
    pub fahrenheit: String,
    /// Height of the unfilled part, percent from the top
    pub fill_cover_percent: f64,
    /// Pointer offset from the top, percent
    pub pointer_top_percent: f64,
    /// Set when the temperature is off the 0–100 °Ñ range
    pub note: Option<String>,
}

impl ScaleView {
    /// `None` for a non-finite temperature; the previous view stays.
    pub fn from_celsius(celsius: f64) -> Option<Self> {
        if !celsius.is_finite() {
            return None;
        }
        let scale = to_scale(celsius);
        let fraction = ((scale - SCALE_MIN) / (SCALE_MAX - SCALE_MIN)).clamp(0.0, 1.0);
        let offset = (1.0 - fraction) * 100.0;

        let note = if scale < SCALE_MIN {
            Some("Below the scale range, anchored to 0°Ñ.".to_string())
        } else if scale > SCALE_MAX {
            Some("Above the scale range, anchored to 100°Ñ.".to_string())
        } else {
            None
        };

        Some(Self {
            scale: format::scale_reading(scale),
            celsius: format::celsius(celsius),
            fahrenheit: format::fahrenheit(celsius),
            fill_cover_percent: offset,
            pointer_top_percent: offset,
            note,
        })
    }
}

/// Readout of the draggable thermometer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveReading {
    pub scale: String,
    pub celsius: String,
    pub fahrenheit: String,
    /// Filled share of the tube, increases with the value
    pub fill_percent: f64,
    /// Handle offset from the top, decreases as the value rises
    pub handle_top_percent: f64,
    pub aria_value_now: i64,
}

impl InteractiveReading {
    pub fn from_scale(scale: f64) -> Self {
        let clamped = if scale.is_finite() {
            clamp_scale(scale)
        } else {
            INITIAL_VALUE
        };
        let percent = (clamped - SCALE_MIN) / (SCALE_MAX - SCALE_MIN);
        let celsius = to_celsius(clamped);

        Self {
            scale: format::scale_reading(clamped),
            celsius: format::celsius(celsius),
            fahrenheit: format::fahrenheit(celsius),
            fill_percent: percent * 100.0,
            handle_top_percent: (1.0 - percent) * 100.0,
            aria_value_now: crate::convert::round_half_up(clamped) as i64,
        }
    }
}

impl Default for InteractiveReading {
    fn default() -> Self {
        Self::from_scale(INITIAL_VALUE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub title: String,
    pub label: String,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub enum ForecastPanel {
    /// Nothing loaded yet
    #[default]
    Empty,
    Unavailable,
    Cards(Vec<ForecastCard>),
}

impl ForecastPanel {
    pub const UNAVAILABLE_TEXT: &'static str = "Forecast unavailable.";
}

/// Horizontal pager between the weather views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewSwitcher {
    count: usize,
    active: usize,
}

impl ViewSwitcher {
    pub fn new(count: usize) -> Self {
        Self { count, active: 0 }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Pressed state of every button; exactly one is active.
    pub fn pressed(&self) -> Vec<bool> {
        (0..self.count).map(|i| i == self.active).collect()
    }

    /// Activate `index` and return the scroll offset for it.
    pub fn select(&mut self, index: usize, view_width: f64) -> f64 {
        self.set_active(index);
        Self::usable_width(view_width) * self.active as f64
    }

    /// Sync the active button with a scroll position.
    pub fn on_scroll(&mut self, scroll_left: f64, view_width: f64) -> usize {
        let index = crate::convert::round_half_up(scroll_left / Self::usable_width(view_width));
        self.set_active(if index.is_finite() && index > 0.0 { index as usize } else { 0 });
        self.active
    }

    fn set_active(&mut self, index: usize) {
        self.active = index.min(self.count.saturating_sub(1));
    }

    fn usable_width(width: f64) -> f64 {
        if width > 0.0 {
            width
        } else {
            1.0
        }
    }
}

/// Number of views: current, scale comparison, forecast.
pub const VIEW_COUNT: usize = 3;

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self::new(VIEW_COUNT)
    }
}

/// Complete state of the display
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ViewModel {
    pub status: Status,
    pub theme: Theme,
    pub current: Option<CurrentPanel>,
    pub scale: Option<ScaleView>,
    /// Readout of `thermometer`; refreshed whenever the control changes
    pub interactive: InteractiveReading,
    /// The one draggable thermometer, moved by loads and by drags
    #[serde(skip)]
    pub thermometer: ThermoControl,
    pub forecast: ForecastPanel,
    pub results: Vec<Place>,
    pub switcher: ViewSwitcher,
}

/// Weather-dependent part of the view for one successful load
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub theme: Theme,
    pub current: CurrentPanel,
    pub scale: Option<ScaleView>,
    pub interactive_value: f64,
    pub forecast: ForecastPanel,
}

/// Build the weather view for a fetched forecast.
///
/// `forecast_days` bounds the daily entries considered; the first one is
/// today and is not shown as a card.
pub fn build_view(forecast: &Forecast, label: Option<&str>, forecast_days: usize) -> WeatherView {
    let current = &forecast.current;
    let meta = classify(current.weather_code);

    let index = match current.observation_time {
        Some(at) => closest_index(&forecast.series.hourly_times(), at),
        None => 0,
    };
    let sample = forecast.series.hourly.get(index);

    let location = label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(format::CURRENT_LOCATION)
        .to_string();

    let panel = CurrentPanel {
        location,
        scale_value: format::scale_value(current.temperature_celsius),
        celsius: format::celsius(current.temperature_celsius),
        summary: meta.label.to_string(),
        feels_like: format::feels_like(sample.and_then(|s| s.apparent_temperature)),
        humidity: format::humidity(sample.and_then(|s| s.humidity)),
        wind: format::wind(current.wind_speed),
    };

    WeatherView {
        theme: meta.theme,
        current: panel,
        scale: ScaleView::from_celsius(current.temperature_celsius),
        interactive_value: to_scale(current.temperature_celsius),
        forecast: build_forecast(forecast, forecast_days),
    }
}

fn build_forecast(forecast: &Forecast, forecast_days: usize) -> ForecastPanel {
    let Some(daily) = &forecast.series.daily else {
        return ForecastPanel::Unavailable;
    };

    let cards = daily
        .iter()
        .take(forecast_days)
        .skip(1)
        .map(|day| ForecastCard {
            title: format::day_title(day.date),
            label: classify_opt(day.weather_code).label.to_string(),
            range: format::daily_range(day.min_temp, day.max_temp),
        })
        .collect();

    ForecastPanel::Cards(cards)
}

impl ViewModel {
    /// Apply a successful load. Previous search results are left alone.
    pub fn apply_weather(&mut self, weather: WeatherView) {
        self.theme = weather.theme;
        self.current = Some(weather.current);
        if weather.scale.is_some() {
            self.scale = weather.scale;
        }
        if weather.interactive_value.is_finite() {
            self.thermometer.set_value(weather.interactive_value);
            self.sync_thermometer();
        }
        self.forecast = weather.forecast;
    }

    /// Copy the control's value into the readout.
    pub fn sync_thermometer(&mut self) {
        self.interactive = self.thermometer.reading();
    }
}
