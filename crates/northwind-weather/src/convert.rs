//! Temperature conversions between Celsius, Fahrenheit and the Northwind
//! scale (°Ñ).
//!
//! The Northwind scale is Celsius stretched by exactly 45/17, so 0–100 °Ñ
//! covers 0 °C to roughly 37.8 °C. All functions are total: NaN and
//! infinities pass straight through, callers guard before display.

/// Ratio between one degree Ñ and one degree Celsius.
pub const SCALE_FACTOR: f64 = 45.0 / 17.0;

/// Bottom of the displayed scale range.
pub const SCALE_MIN: f64 = 0.0;

/// Top of the displayed scale range.
pub const SCALE_MAX: f64 = 100.0;

/// Celsius to scale value.
pub fn to_scale(celsius: f64) -> f64 {
    celsius * SCALE_FACTOR
}

/// Celsius to Fahrenheit.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Scale value back to Celsius.
pub fn to_celsius(scale: f64) -> f64 {
    scale / SCALE_FACTOR
}

/// Clamp a scale value into the displayed range.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(SCALE_MIN, SCALE_MAX)
}

/// Round half-way cases towards positive infinity, so -0.5 becomes 0.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
