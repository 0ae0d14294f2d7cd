//! Integration tests for LocationSession using wiremock.
//!
//! These tests drive the whole load/search/restore flow against a mock
//! Open-Meteo server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use northwind_core::WeatherConfig;
use northwind_weather::store::{load_location, LAST_LOCATION_KEY};
use northwind_weather::view::ForecastPanel;
use northwind_weather::{
    Coordinate, GeolocationOptions, GeolocationOutcome, Geolocator, Haptics, KeyValueStore,
    LoadOutcome, LocationError, LocationSession, MemoryStore, PersistedLocation, Rect,
    SearchOutcome, SessionSettings, StartupOutcome, Status, Theme, WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Geolocator that records how often it was asked
struct RecordingGeolocator {
    answer: Option<Coordinate>,
    deny: bool,
    hang: bool,
    calls: AtomicUsize,
}

impl RecordingGeolocator {
    fn granting(coordinate: Coordinate) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(coordinate),
            deny: false,
            hang: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn denying() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            deny: true,
            hang: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn unsupported() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            deny: false,
            hang: false,
            calls: AtomicUsize::new(0),
        })
    }

    /// Supported, but the position never arrives
    fn silent() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            deny: false,
            hang: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geolocator for RecordingGeolocator {
    fn is_supported(&self) -> bool {
        self.answer.is_some() || self.deny || self.hang
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.answer.ok_or(LocationError::PermissionDenied)
    }
}

/// Helper to build a forecast body
fn forecast_body(temperature: f64, code: i32) -> serde_json::Value {
    serde_json::json!({
        "current_weather": {
            "temperature": temperature,
            "weathercode": code,
            "windspeed": 14.2,
            "time": "2024-06-01T12:00"
        },
        "hourly": {
            "time": ["2024-06-01T11:00", "2024-06-01T12:00", "2024-06-01T13:00"],
            "relative_humidity_2m": [50, 61, 70],
            "apparent_temperature": [18.0, 19.0, 20.0]
        },
        "daily": {
            "time": [
                "2024-06-01", "2024-06-02", "2024-06-03",
                "2024-06-04", "2024-06-05", "2024-06-06"
            ],
            "weather_code": [0, 3, 61, 95, 1000, 0],
            "temperature_2m_max": [22.0, 23.0, 24.0, 25.0, 26.0, 27.0],
            "temperature_2m_min": [12.0, 13.0, 14.0, null, 16.0, 17.0]
        }
    })
}

/// Counts haptic pulses
#[derive(Default)]
struct PulseCounter {
    pulses: usize,
}

impl Haptics for PulseCounter {
    fn pulse(&mut self, _duration: Duration) {
        self.pulses += 1;
    }
}

fn session(
    server: &MockServer,
    store: Arc<MemoryStore>,
    geolocator: Arc<RecordingGeolocator>,
) -> LocationSession {
    session_with_settings(server, store, geolocator, SessionSettings::default())
}

fn session_with_settings(
    server: &MockServer,
    store: Arc<MemoryStore>,
    geolocator: Arc<RecordingGeolocator>,
    settings: SessionSettings,
) -> LocationSession {
    let config = WeatherConfig {
        forecast_url: format!("{}/v1/forecast", server.uri()),
        geocoding_url: format!("{}/v1/search", server.uri()),
        ..WeatherConfig::default()
    };
    let provider = WeatherProvider::new(&config).unwrap();
    LocationSession::new(provider, store, geolocator, settings)
}

async fn mount_forecast(server: &MockServer, latitude: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", latitude))
        .and(query_param("current_weather", "true"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_load_renders_and_persists() {
    let server = MockServer::start().await;
    mount_forecast(&server, "38.72", forecast_body(20.0, 0)).await;

    let store = Arc::new(MemoryStore::new());
    let session = session(&server, store.clone(), RecordingGeolocator::unsupported());

    let outcome = session
        .load_coordinate(Coordinate::new(38.72, -9.14), Some("Lisbon, Portugal".into()))
        .await;
    assert_eq!(outcome, LoadOutcome::Loaded);

    let view = session.view();
    assert_eq!(view.status, Status::Updated);
    assert_eq!(view.theme, Theme::Clear);

    let current = view.current.expect("current panel");
    assert_eq!(current.scale_value, "53");
    assert_eq!(current.location, "Lisbon, Portugal");
    assert_eq!(current.humidity, "61%");
    assert_eq!(current.wind, "14 km/h");
    assert_eq!(view.interactive.aria_value_now, 53);

    let ForecastPanel::Cards(cards) = view.forecast else {
        panic!("expected forecast cards");
    };
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0].label, "Cloud cover");
    assert_eq!(cards[2].range, "--");
    assert_eq!(cards[3].label, "Unknown skies");

    let saved = load_location(store.as_ref()).expect("saved location");
    assert_eq!(saved.coordinate(), Coordinate::new(38.72, -9.14));
    assert_eq!(saved.label.as_deref(), Some("Lisbon, Portugal"));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_view() {
    let server = MockServer::start().await;
    mount_forecast(&server, "10", forecast_body(20.0, 95)).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "20"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let session = session(&server, store.clone(), RecordingGeolocator::unsupported());

    session.load_coordinate(Coordinate::new(10.0, 10.0), None).await;
    let before = session.view();
    assert_eq!(before.theme, Theme::Rain);

    let outcome = session
        .load_coordinate(Coordinate::new(20.0, 20.0), Some("Elsewhere".into()))
        .await;
    assert_eq!(outcome, LoadOutcome::Failed);

    let after = session.view();
    assert_eq!(after.status, Status::LoadFailed);
    assert_eq!(after.current, before.current);
    assert_eq!(
        load_location(store.as_ref()).map(|l| l.coordinate()),
        Some(Coordinate::new(10.0, 10.0))
    );
}

#[tokio::test]
async fn test_missing_current_weather_is_a_failure() {
    let server = MockServer::start().await;
    mount_forecast(&server, "1", serde_json::json!({ "hourly": { "time": [] } })).await;

    let store = Arc::new(MemoryStore::new());
    let session = session(&server, store.clone(), RecordingGeolocator::unsupported());

    let outcome = session.load_coordinate(Coordinate::new(1.0, 1.0), None).await;
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(session.status(), Status::LoadFailed);
    assert!(session.view().current.is_none());
    assert!(store.get(LAST_LOCATION_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_restore_uses_saved_location_without_geolocation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "51.5"))
        .and(query_param("longitude", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(15.0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let saved = PersistedLocation::new(Coordinate::new(51.5, -0.12), Some("London".into()));
    let store = Arc::new(MemoryStore::with_entry(
        LAST_LOCATION_KEY,
        &serde_json::to_string(&saved).unwrap(),
    ));
    let geo = RecordingGeolocator::granting(Coordinate::new(0.0, 0.0));
    let session = session(&server, store, geo.clone());

    let outcome = session.restore().await;
    assert_eq!(outcome, StartupOutcome::Restored(LoadOutcome::Loaded));
    assert_eq!(geo.calls(), 0);
    assert_eq!(session.view().current.unwrap().location, "London");
}

#[tokio::test]
async fn test_restore_with_malformed_payload_falls_back_to_geolocation() {
    let server = MockServer::start().await;
    mount_forecast(&server, "47.6", forecast_body(5.0, 61)).await;

    let store = Arc::new(MemoryStore::with_entry(LAST_LOCATION_KEY, "{oops"));
    let geo = RecordingGeolocator::granting(Coordinate::new(47.6, -122.3));
    let session = session(&server, store, geo.clone());

    let outcome = session.restore().await;
    assert_eq!(
        outcome,
        StartupOutcome::Geolocated(GeolocationOutcome::Loaded(LoadOutcome::Loaded))
    );
    assert_eq!(geo.calls(), 1);
    assert_eq!(session.view().current.unwrap().location, "Current location");
}

#[tokio::test]
async fn test_geolocation_denied_and_unsupported_statuses() {
    let server = MockServer::start().await;

    let denied = session(&server, Arc::new(MemoryStore::new()), RecordingGeolocator::denying());
    assert_eq!(
        denied.restore().await,
        StartupOutcome::Geolocated(GeolocationOutcome::Denied)
    );
    assert_eq!(denied.status(), Status::GeolocationDenied);

    let unsupported = session(
        &server,
        Arc::new(MemoryStore::new()),
        RecordingGeolocator::unsupported(),
    );
    assert_eq!(
        unsupported.use_geolocation().await,
        GeolocationOutcome::Unsupported
    );
    assert_eq!(unsupported.status(), Status::GeolocationUnsupported);
    assert_ne!(denied.status().message(), unsupported.status().message());
}

#[tokio::test]
async fn test_geolocation_timeout_status() {
    let server = MockServer::start().await;
    let geo = RecordingGeolocator::silent();
    let settings = SessionSettings {
        geolocation: GeolocationOptions {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(50),
        },
        ..SessionSettings::default()
    };
    let session = session_with_settings(
        &server,
        Arc::new(MemoryStore::new()),
        geo.clone(),
        settings,
    );

    assert_eq!(session.use_geolocation().await, GeolocationOutcome::TimedOut);
    assert_eq!(geo.calls(), 1);
    assert_eq!(session.status(), Status::GeolocationTimedOut);
    assert_eq!(
        session.status().message(),
        "Location request timed out. Search for a city instead."
    );
    assert!(session.view().current.is_none());
}

#[tokio::test]
async fn test_search_then_select() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Portland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "name": "Portland", "admin1": "Oregon", "country": "United States",
                  "latitude": 45.52, "longitude": -122.68 },
                { "name": "Portland", "admin1": "Maine", "country": "United States",
                  "latitude": 43.66, "longitude": -70.26 }
            ]
        })))
        .mount(&server)
        .await;
    mount_forecast(&server, "43.66", forecast_body(8.0, 45)).await;

    let store = Arc::new(MemoryStore::new());
    let session = session(&server, store.clone(), RecordingGeolocator::unsupported());

    assert_eq!(session.search("  Portland ").await, SearchOutcome::Found(2));
    assert_eq!(session.status().message(), "Found 2 spots.");
    assert_eq!(session.view().results.len(), 2);

    assert_eq!(session.select(1).await, Some(LoadOutcome::Loaded));
    let view = session.view();
    assert!(view.results.is_empty());
    assert_eq!(view.current.unwrap().location, "Portland, Maine, United States");
    assert_eq!(view.theme, Theme::Cloudy);
    assert_eq!(
        load_location(store.as_ref()).unwrap().label.as_deref(),
        Some("Portland, Maine, United States")
    );

    assert_eq!(session.select(0).await, None);
}

#[tokio::test]
async fn test_search_tri_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Nowhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = session(
        &server,
        Arc::new(MemoryStore::new()),
        RecordingGeolocator::unsupported(),
    );

    assert_eq!(session.search("   ").await, SearchOutcome::Ignored);
    assert_eq!(session.status(), Status::Idle);

    assert_eq!(session.search("Nowhere").await, SearchOutcome::NoMatches);
    assert_eq!(session.status(), Status::NoMatches);

    assert_eq!(session.search("Broken").await, SearchOutcome::Failed);
    assert_eq!(session.status(), Status::SearchFailed);
}

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body(30.0, 95))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_forecast(&server, "2", forecast_body(20.0, 0)).await;

    let store = Arc::new(MemoryStore::new());
    let session = session(&server, store.clone(), RecordingGeolocator::unsupported());

    let (slow, fast) = tokio::join!(
        session.load_coordinate(Coordinate::new(1.0, 1.0), Some("Slow".into())),
        session.load_coordinate(Coordinate::new(2.0, 2.0), Some("Fast".into())),
    );

    assert_eq!(slow, LoadOutcome::Superseded);
    assert_eq!(fast, LoadOutcome::Loaded);

    let view = session.view();
    assert_eq!(view.current.unwrap().location, "Fast");
    assert_eq!(view.theme, Theme::Clear);
    assert_eq!(view.status, Status::Updated);
    assert_eq!(load_location(store.as_ref()).unwrap().label.as_deref(), Some("Fast"));
}

#[tokio::test]
async fn test_stale_search_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "results": [{ "name": "Slowtown", "latitude": 1.0, "longitude": 1.0 }]
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let session = session(
        &server,
        Arc::new(MemoryStore::new()),
        RecordingGeolocator::unsupported(),
    );

    let (slow, fast) = tokio::join!(session.search("Slow"), session.search("Fast"));

    assert_eq!(slow, SearchOutcome::Superseded);
    assert_eq!(fast, SearchOutcome::NoMatches);

    let view = session.view();
    assert_eq!(view.status, Status::NoMatches);
    assert!(view.results.is_empty());
}

#[tokio::test]
async fn test_load_and_drag_share_one_thermometer() {
    let server = MockServer::start().await;
    mount_forecast(&server, "38.72", forecast_body(20.0, 0)).await;

    let session = session(
        &server,
        Arc::new(MemoryStore::new()),
        RecordingGeolocator::unsupported(),
    );
    session.set_thermometer_bounds(Rect::new(0.0, 0.0, 20.0, 100.0));

    session.load_coordinate(Coordinate::new(38.72, -9.14), None).await;
    let view = session.view();
    assert_eq!(view.interactive.scale, "53 °Ñ");
    assert_eq!(view.interactive, view.thermometer.reading());

    let mut haptics = PulseCounter::default();
    assert!(session.pointer_down(1, 10.0, 90.0, &mut haptics));
    let view = session.view();
    assert_eq!(view.interactive.scale, "10 °Ñ");
    assert_eq!(view.interactive, view.thermometer.reading());

    assert_eq!(session.pointer_move(1, 50.0, &mut haptics), Some(50.0));
    assert_eq!(haptics.pulses, 1);
    assert_eq!(session.view().interactive.aria_value_now, 50);

    assert_eq!(session.pointer_move(2, 0.0, &mut haptics), None);
    assert!(session.pointer_up(1));
    assert_eq!(session.pointer_move(1, 0.0, &mut haptics), None);
    assert_eq!(session.view().interactive.scale, "50 °Ñ");

    // A later load moves the same control
    session.load_coordinate(Coordinate::new(38.72, -9.14), None).await;
    let view = session.view();
    assert_eq!(view.interactive.scale, "53 °Ñ");
    assert_eq!(view.interactive, view.thermometer.reading());
}

#[tokio::test]
async fn test_view_switcher_through_session() {
    let server = MockServer::start().await;
    let session = session(
        &server,
        Arc::new(MemoryStore::new()),
        RecordingGeolocator::unsupported(),
    );

    assert_eq!(session.select_view(1, 400.0), 400.0);
    assert_eq!(session.view().switcher.active(), 1);
    assert_eq!(session.sync_scroll(790.0, 400.0), 2);
}
