mod cli;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use northwind_core::{AppError, Config, ConfigError};
use northwind_weather::convert::to_scale;
use northwind_weather::format;
use northwind_weather::session::SearchOutcome;
use northwind_weather::{
    FileStore, FixedGeolocator, Haptics, LocationSession, Rect, SessionSettings, WeatherProvider,
};

use crate::cli::{Cli, Command};

const THERMOMETER_WIDTH: f64 = 20.0;

/// Rings the terminal bell in place of a vibration motor
#[derive(Debug, Default)]
struct BellHaptics {
    pulses: usize,
}

impl Haptics for BellHaptics {
    fn pulse(&mut self, duration: Duration) {
        self.pulses += 1;
        tracing::debug!("Haptic pulse ({} ms)", duration.as_millis());
        eprint!("\x07");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    northwind_core::init()?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if let Some(Command::Convert { celsius }) = cli.command {
        convert(celsius);
        return Ok(());
    }

    let (mut config, _) = Config::load_validated(cli.config_dir.as_deref()).map_err(
        |e| match e.downcast::<ConfigError>() {
            Ok(config_error) => AppError::Config(config_error),
            Err(e) => AppError::Other(e),
        },
    )?;

    if let Some(at) = cli.at {
        config.geolocation.latitude = Some(at.latitude);
        config.geolocation.longitude = Some(at.longitude);
    }

    let provider = WeatherProvider::new(&config.weather)?;
    let store = Arc::new(FileStore::new(config.state_path()));
    let geolocator = Arc::new(FixedGeolocator::from_config(&config.geolocation));
    let session = LocationSession::new(provider, store, geolocator, SessionSettings::from(&config));

    tracing::debug!("State file: {}", config.state_path().display());

    match cli.command {
        None => {
            let outcome = session.restore().await;
            tracing::debug!("Startup finished: {:?}", outcome);
        }
        Some(Command::Search { query, pick }) => {
            let outcome = session.search(&query.join(" ")).await;
            if let (SearchOutcome::Found(_), Some(pick)) = (outcome, pick) {
                let selected = match pick.checked_sub(1) {
                    Some(index) => session.select(index).await,
                    None => None,
                };
                if selected.is_none() {
                    eprintln!("No result number {}.", pick);
                }
            }
        }
        Some(Command::Load {
            latitude,
            longitude,
            label,
        }) => {
            let coordinate = northwind_weather::Coordinate::new(latitude, longitude);
            if !coordinate.is_valid() {
                eprintln!("{} is not a valid position.", coordinate);
                return Ok(());
            }
            session.load_coordinate(coordinate, label).await;
        }
        Some(Command::Here) => {
            session.use_geolocation().await;
        }
        Some(Command::Drag {
            positions,
            height,
            load,
        }) => {
            if load {
                session.restore().await;
            }
            drag(&session, &positions, height);
            return Ok(());
        }
        Some(Command::Convert { .. }) => {}
    }

    print!("{}", render::render(&session.view()));
    Ok(())
}

fn convert(celsius: f64) {
    println!(
        "{} | {} | {}",
        format::scale(celsius),
        format::celsius(celsius),
        format::fahrenheit(celsius)
    );
    if let Some(scale) = northwind_weather::view::ScaleView::from_celsius(celsius) {
        if let Some(note) = scale.note {
            println!("{}", note);
        }
    }
    tracing::debug!("{} °C is {} on the scale", celsius, to_scale(celsius));
}

fn drag(session: &LocationSession, positions: &[f64], height: f64) {
    session.set_thermometer_bounds(Rect::new(0.0, 0.0, THERMOMETER_WIDTH, height));
    let mut haptics = BellHaptics::default();
    let pointer = 1;
    let mut captured = false;

    let mut out = String::new();
    render::render_interactive(&mut out, &session.view().interactive);
    println!("{:<10}{}", "start", out.trim_end());

    for &y in positions {
        let before = haptics.pulses;
        let accepted = if captured {
            session.pointer_move(pointer, y, &mut haptics).is_some()
        } else {
            captured = session.pointer_down(pointer, THERMOMETER_WIDTH / 2.0, y, &mut haptics);
            captured
        };
        if !accepted {
            println!("y={:<8}ignored", y);
            continue;
        }

        out.clear();
        render::render_interactive(&mut out, &session.view().interactive);
        let tick = if haptics.pulses > before { "  tick" } else { "" };
        println!("y={:<8}{}{}", y, out.trim_end(), tick);
    }

    if captured {
        session.pointer_up(pointer);
    }
}
