//! Weather lookup for Northwind
//!
//! Open-Meteo forecasts and place search, the °Ñ temperature scale, the
//! draggable thermometer and the session that ties them to a view model.

pub mod align;
pub mod condition;
pub mod convert;
pub mod error;
pub mod format;
pub mod geocode;
pub mod gesture;
pub mod location;
pub mod provider;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use condition::{classify, Theme, WeatherMeta};
pub use error::{LocationError, WeatherError};
pub use gesture::{Haptics, PointerId, Rect, ThermoControl};
pub use location::{FixedGeolocator, GeolocationOptions, Geolocator};
pub use provider::WeatherProvider;
pub use session::{
    GeolocationOutcome, LoadOutcome, LocationSession, SearchOutcome, SessionSettings,
    StartupOutcome,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
pub use view::{Status, ViewModel};
