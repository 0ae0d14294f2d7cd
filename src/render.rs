//! Plain-text rendering of the view model.

use std::fmt::Write;

use northwind_weather::view::{ForecastPanel, InteractiveReading, ScaleView};
use northwind_weather::ViewModel;

const TUBE_WIDTH: usize = 20;

pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();

    let status = view.status.message();
    if !status.is_empty() {
        let _ = writeln!(out, "{}", status);
    }

    if !view.results.is_empty() {
        let _ = writeln!(out);
        for (i, place) in view.results.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, place.label());
        }
        let _ = writeln!(out, "Pass --pick N to load one.");
    }

    let Some(current) = &view.current else {
        return out;
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "{}  [{}]", current.location, view.theme);
    let _ = writeln!(
        out,
        "  {} °Ñ  {}  {}",
        current.scale_value, current.celsius, current.summary
    );
    let _ = writeln!(
        out,
        "  Feels like {} · Humidity {} · Wind {}",
        current.feels_like, current.humidity, current.wind
    );

    if let Some(scale) = &view.scale {
        let _ = writeln!(out);
        render_scale(&mut out, scale);
    }

    let _ = writeln!(out);
    render_interactive(&mut out, &view.interactive);

    let _ = writeln!(out);
    let _ = writeln!(out, "Forecast");
    match &view.forecast {
        ForecastPanel::Empty => {}
        ForecastPanel::Unavailable => {
            let _ = writeln!(out, "  {}", ForecastPanel::UNAVAILABLE_TEXT);
        }
        ForecastPanel::Cards(cards) => {
            for card in cards {
                let _ = writeln!(out, "  {:<14}{:<24}{}", card.title, card.label, card.range);
            }
        }
    }

    out
}

fn render_scale(out: &mut String, scale: &ScaleView) {
    let _ = writeln!(out, "Scale");
    let _ = writeln!(
        out,
        "  {} | {} | {}",
        scale.scale, scale.celsius, scale.fahrenheit
    );
    let _ = writeln!(out, "  {}", tube(100.0 - scale.fill_cover_percent));
    if let Some(note) = &scale.note {
        let _ = writeln!(out, "  {}", note);
    }
}

pub fn render_interactive(out: &mut String, reading: &InteractiveReading) {
    let _ = writeln!(
        out,
        "  {} {:>6} | {} | {}",
        tube(reading.fill_percent),
        reading.scale,
        reading.celsius,
        reading.fahrenheit
    );
}

/// Horizontal thermometer filled to `percent`.
fn tube(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * TUBE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(TUBE_WIDTH - filled)
    )
}
