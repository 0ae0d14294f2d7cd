//! Location session: search, select, fetch, render, persist, restore.
//!
//! Every entry point isolates its own failures and reports them through the
//! view's status line. Loads and searches each carry a sequence number; a
//! response that arrives after a newer request of the same kind started is
//! dropped without touching the view or the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use northwind_core::Config;
use parking_lot::Mutex;

use crate::error::LocationError;
use crate::format::CURRENT_LOCATION;
use crate::gesture::{Haptics, PointerId, Rect};
use crate::location::{locate, GeolocationOptions, Geolocator};
use crate::provider::WeatherProvider;
use crate::store::{load_location, save_location, KeyValueStore};
use crate::types::{Coordinate, PersistedLocation};
use crate::view::{build_view, Status, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// A newer load started before this one finished
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, nothing sent
    Ignored,
    Found(usize),
    NoMatches,
    Failed,
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationOutcome {
    Loaded(LoadOutcome),
    Unsupported,
    Denied,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    Restored(LoadOutcome),
    Geolocated(GeolocationOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub geolocation: GeolocationOptions,
    pub forecast_days: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            geolocation: GeolocationOptions::default(),
            forecast_days: 5,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            geolocation: GeolocationOptions::from(&config.geolocation),
            forecast_days: config.ui.forecast_days,
        }
    }
}

pub struct LocationSession {
    provider: WeatherProvider,
    store: Arc<dyn KeyValueStore>,
    geolocator: Arc<dyn Geolocator>,
    settings: SessionSettings,
    view: Mutex<ViewModel>,
    load_seq: AtomicU64,
    search_seq: AtomicU64,
}

impl LocationSession {
    pub fn new(
        provider: WeatherProvider,
        store: Arc<dyn KeyValueStore>,
        geolocator: Arc<dyn Geolocator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            provider,
            store,
            geolocator,
            settings,
            view: Mutex::new(ViewModel::default()),
            load_seq: AtomicU64::new(0),
            search_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view
    pub fn view(&self) -> ViewModel {
        self.view.lock().clone()
    }

    pub fn status(&self) -> Status {
        self.view.lock().status.clone()
    }

    fn set_status(&self, status: Status) {
        self.view.lock().status = status;
    }

    /// Switch to a view; returns the scroll offset for it.
    pub fn select_view(&self, index: usize, view_width: f64) -> f64 {
        self.view.lock().switcher.select(index, view_width)
    }

    /// Sync the active view with a scroll position.
    pub fn sync_scroll(&self, scroll_left: f64, view_width: f64) -> usize {
        self.view.lock().switcher.on_scroll(scroll_left, view_width)
    }

    /// Lay out the draggable thermometer.
    pub fn set_thermometer_bounds(&self, bounds: Rect) {
        self.view.lock().thermometer.set_bounds(bounds);
    }

    /// Start dragging the thermometer. Returns whether the pointer was captured.
    pub fn pointer_down(
        &self,
        pointer: PointerId,
        x: f64,
        y: f64,
        haptics: &mut impl Haptics,
    ) -> bool {
        let mut view = self.view.lock();
        let captured = view.thermometer.pointer_down(pointer, x, y, haptics);
        view.sync_thermometer();
        captured
    }

    pub fn pointer_move(
        &self,
        pointer: PointerId,
        y: f64,
        haptics: &mut impl Haptics,
    ) -> Option<f64> {
        let mut view = self.view.lock();
        let value = view.thermometer.pointer_move(pointer, y, haptics);
        view.sync_thermometer();
        value
    }

    pub fn pointer_up(&self, pointer: PointerId) -> bool {
        self.view.lock().thermometer.pointer_up(pointer)
    }

    pub fn pointer_cancel(&self, pointer: PointerId) -> bool {
        self.view.lock().thermometer.pointer_cancel(pointer)
    }

    /// Fetch and render weather for a location, then remember it.
    ///
    /// On failure the previous weather stays on screen.
    pub async fn load(&self, location: PersistedLocation) -> LoadOutcome {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let coordinate = location.coordinate();
        self.set_status(Status::Gathering);

        let result = self
            .provider
            .fetch(coordinate)
            .await
            .map(|forecast| {
                build_view(&forecast, location.label.as_deref(), self.settings.forecast_days)
            });

        // Checked under the view lock so a newer load cannot land in between
        let mut view = self.view.lock();
        if self.load_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("Dropping stale weather for {} (load #{})", coordinate, seq);
            return LoadOutcome::Superseded;
        }

        let weather = match result {
            Ok(weather) => weather,
            Err(e) => {
                tracing::error!("Failed to load weather for {}: {}", coordinate, e);
                view.status = Status::LoadFailed;
                return LoadOutcome::Failed;
            }
        };

        view.apply_weather(weather);

        // The weather on screen is valid even if it cannot be remembered
        if let Err(e) = save_location(self.store.as_ref(), &location) {
            tracing::warn!("Failed to save last location: {}", e);
        }

        view.status = Status::Updated;
        drop(view);

        tracing::info!(
            "Loaded weather for {}",
            location.label.as_deref().unwrap_or(CURRENT_LOCATION)
        );
        LoadOutcome::Loaded
    }

    /// Load a coordinate with an optional label.
    pub async fn load_coordinate(
        &self,
        coordinate: Coordinate,
        label: Option<String>,
    ) -> LoadOutcome {
        self.load(PersistedLocation::new(coordinate, label)).await
    }

    /// Search places by name and list the matches.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }

        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut view = self.view.lock();
            view.status = Status::Searching;
            view.results.clear();
        }

        let result = self.provider.search(query).await;

        let mut view = self.view.lock();
        if self.search_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("Dropping stale results for {:?}", query);
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(places) if places.is_empty() => {
                view.status = Status::NoMatches;
                SearchOutcome::NoMatches
            }
            Ok(places) => {
                let count = places.len();
                tracing::info!("Found {} place(s) for {:?}", count, query);
                view.status = Status::Found(count);
                view.results = places;
                SearchOutcome::Found(count)
            }
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", query, e);
                view.status = Status::SearchFailed;
                SearchOutcome::Failed
            }
        }
    }

    /// Pick one of the listed search results and load it.
    /// Returns `None` when there is no result at `index`.
    pub async fn select(&self, index: usize) -> Option<LoadOutcome> {
        let place = {
            let mut view = self.view.lock();
            let place = view.results.get(index).cloned()?;
            view.results.clear();
            place
        };

        Some(self.load_coordinate(place.coordinate(), Some(place.label())).await)
    }

    /// Ask for the device position and load weather there.
    pub async fn use_geolocation(&self) -> GeolocationOutcome {
        if !self.geolocator.is_supported() {
            self.set_status(Status::GeolocationUnsupported);
            return GeolocationOutcome::Unsupported;
        }

        self.set_status(Status::Locating);

        match locate(self.geolocator.as_ref(), &self.settings.geolocation).await {
            Ok(coordinate) => {
                let outcome = self
                    .load_coordinate(coordinate, Some(CURRENT_LOCATION.to_string()))
                    .await;
                GeolocationOutcome::Loaded(outcome)
            }
            Err(LocationError::Unsupported) => {
                self.set_status(Status::GeolocationUnsupported);
                GeolocationOutcome::Unsupported
            }
            Err(LocationError::Timeout) => {
                tracing::warn!("Geolocation timed out");
                self.set_status(Status::GeolocationTimedOut);
                GeolocationOutcome::TimedOut
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.set_status(Status::GeolocationDenied);
                GeolocationOutcome::Denied
            }
        }
    }

    /// Startup: reload the remembered location, or fall back to geolocation.
    pub async fn restore(&self) -> StartupOutcome {
        match load_location(self.store.as_ref()) {
            Some(location) => {
                tracing::debug!("Restoring saved location {}", location.coordinate());
                StartupOutcome::Restored(self.load(location).await)
            }
            None => StartupOutcome::Geolocated(self.use_geolocation().await),
        }
    }
}
