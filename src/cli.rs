use std::path::PathBuf;

use clap::{Parser, Subcommand};
use northwind_weather::Coordinate;

/// Weather lookup on the Northwind scale
#[derive(Debug, Parser)]
#[command(name = "northwind", version, about)]
pub struct Cli {
    /// Directory holding config.toml and state.json
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Device position used for geolocation, as LAT,LON
    #[arg(long, global = true, value_parser = parse_position, allow_hyphen_values = true)]
    pub at: Option<Coordinate>,

    /// Without a command, reload the last location or fall back to geolocation
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for a place by name
    Search {
        #[arg(required = true)]
        query: Vec<String>,

        /// Load the Nth result (1-based)
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Load weather for a coordinate
    Load {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        #[arg(long)]
        label: Option<String>,
    },
    /// Load weather for the device position
    Here,
    /// Show a Celsius temperature in all three units
    Convert {
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },
    /// Drag the thermometer through a series of pointer positions
    Drag {
        /// Vertical positions, 0 being the top of the control
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<f64>,

        /// Height of the control
        #[arg(long, default_value_t = 100.0, value_parser = parse_height)]
        height: f64,

        /// Reload the last location first so the drag starts at its temperature
        #[arg(long)]
        load: bool,
    },
}

fn parse_position(raw: &str) -> Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {:?}", raw))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {}", e))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {}", e))?;
    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        return Err(format!("{} is not a valid position", coordinate));
    }
    Ok(coordinate)
}

fn parse_height(raw: &str) -> Result<f64, String> {
    let height: f64 = raw.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    if !height.is_finite() || height <= 0.0 {
        return Err(format!("height must be a positive number, got {}", raw));
    }
    Ok(height)
}
