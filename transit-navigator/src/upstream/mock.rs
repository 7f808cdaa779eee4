//! Mock transit source for running without API access.
//!
//! Serves canned JSON payloads as if they were live API responses. Payloads
//! are parsed on every request exactly like the real client parses a body,
//! so malformed fixtures surface as [`UpstreamError::Json`].
//!
//! Can be scripted in code (tests) or loaded from a directory of JSON files
//! (offline development, see [`MockTransitSource::from_dir`]).

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::StopKey;

use super::error::UpstreamError;
use super::source::{StopQuery, TransitSource};
use super::types::{StopResponse, StopScheduleResponse, StopsResponse, TripsResponse};

/// Mock transit source serving canned payloads.
///
/// Unnamed stop queries get the area payload. Named queries get the payload
/// scripted for that name (case-insensitive) and an empty list otherwise,
/// which exercises the search fallback.
#[derive(Clone, Default)]
pub struct MockTransitSource {
    area: Option<Value>,
    named: HashMap<String, Value>,
    stops: HashMap<StopKey, Value>,
    schedules: HashMap<StopKey, Value>,
    trips: HashMap<(StopKey, StopKey), Value>,
    any_trip: Option<Value>,
    delays: HashMap<String, Duration>,
    failing: bool,
    /// Every stop query received, shared between clones.
    requests: Arc<Mutex<Vec<StopQuery>>>,
}

impl MockTransitSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload for proximity queries (no name).
    pub fn with_area_stops(mut self, payload: Value) -> Self {
        self.area = Some(payload);
        self
    }

    /// Payload for name queries matching `name`.
    pub fn with_named_stops(mut self, name: &str, payload: Value) -> Self {
        self.named.insert(name.to_lowercase(), payload);
        self
    }

    /// Payload for `stops/{key}.json`.
    pub fn with_stop(mut self, key: StopKey, payload: Value) -> Self {
        self.stops.insert(key, payload);
        self
    }

    /// Payload for `stops/{key}/schedule.json`.
    pub fn with_schedule(mut self, key: StopKey, payload: Value) -> Self {
        self.schedules.insert(key, payload);
        self
    }

    /// Payload for a trip between two specific stops.
    pub fn with_trip(mut self, origin: StopKey, destination: StopKey, payload: Value) -> Self {
        self.trips.insert((origin, destination), payload);
        self
    }

    /// Payload for trips between stops without a specific entry.
    pub fn with_any_trip(mut self, payload: Value) -> Self {
        self.any_trip = Some(payload);
        self
    }

    /// Delay responses to name queries matching `name`.
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_lowercase(), delay);
        self
    }

    /// Make every request fail as if upstream were down.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Stop queries received so far, in arrival order.
    pub fn requests(&self) -> Vec<StopQuery> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Load canned payloads from a directory.
    ///
    /// Recognised files: `stops.json` (area stops), `trips.json` (any trip),
    /// `stop-{key}.json` and `schedule-{key}.json`. At least one must exist.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let dir = dir.as_ref();
        let mut source = Self::new();
        let mut loaded = 0usize;

        let entries = std::fs::read_dir(dir).map_err(|e| UpstreamError::Fixture {
            message: format!("failed to read fixture directory {}: {e}", dir.display()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| UpstreamError::Fixture {
                message: format!("failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let slot = match stem {
                "stops" => FixtureSlot::Area,
                "trips" => FixtureSlot::AnyTrip,
                _ => match fixture_key(stem) {
                    Some(slot) => slot,
                    None => continue,
                },
            };

            let text = std::fs::read_to_string(&path).map_err(|e| UpstreamError::Fixture {
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            let payload: Value = serde_json::from_str(&text).map_err(|e| UpstreamError::Fixture {
                message: format!("failed to parse {}: {e}", path.display()),
            })?;

            match slot {
                FixtureSlot::Area => source.area = Some(payload),
                FixtureSlot::AnyTrip => source.any_trip = Some(payload),
                FixtureSlot::Stop(key) => {
                    source.stops.insert(key, payload);
                }
                FixtureSlot::Schedule(key) => {
                    source.schedules.insert(key, payload);
                }
            }
            loaded += 1;
        }

        if loaded == 0 {
            return Err(UpstreamError::Fixture {
                message: format!("no fixture files found in {}", dir.display()),
            });
        }

        Ok(source)
    }

    fn check_available(&self) -> Result<(), UpstreamError> {
        if self.failing {
            return Err(UpstreamError::Api {
                status: 503,
                message: "mock upstream unavailable".to_string(),
            });
        }
        Ok(())
    }
}

enum FixtureSlot {
    Area,
    AnyTrip,
    Stop(StopKey),
    Schedule(StopKey),
}

fn fixture_key(stem: &str) -> Option<FixtureSlot> {
    if let Some(key) = stem.strip_prefix("stop-") {
        return key.parse().ok().map(|k| FixtureSlot::Stop(StopKey(k)));
    }
    if let Some(key) = stem.strip_prefix("schedule-") {
        return key.parse().ok().map(|k| FixtureSlot::Schedule(StopKey(k)));
    }
    None
}

/// Parse a canned payload the way the real client parses a response body.
fn parse<T: DeserializeOwned>(payload: &Value) -> Result<T, UpstreamError> {
    serde_json::from_value(payload.clone()).map_err(|e| UpstreamError::Json {
        message: e.to_string(),
        body: Some(payload.to_string().chars().take(500).collect()),
    })
}

impl TransitSource for MockTransitSource {
    async fn stops(&self, query: &StopQuery) -> Result<StopsResponse, UpstreamError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.clone());

        let name = query.name.as_deref().map(str::to_lowercase);
        if let Some(delay) = name.as_ref().and_then(|n| self.delays.get(n)) {
            tokio::time::sleep(*delay).await;
        }

        self.check_available()?;

        let payload = match &name {
            None => self.area.as_ref(),
            Some(name) => self.named.get(name),
        };
        match payload {
            Some(payload) => parse(payload),
            None => Ok(StopsResponse::default()),
        }
    }

    async fn stop(&self, key: StopKey) -> Result<StopResponse, UpstreamError> {
        self.check_available()?;
        self.stops
            .get(&key)
            .map(parse)
            .unwrap_or(Err(UpstreamError::NotFound))
    }

    async fn stop_schedule(
        &self,
        key: StopKey,
        _max_results_per_route: u8,
        _start: NaiveDateTime,
    ) -> Result<StopScheduleResponse, UpstreamError> {
        self.check_available()?;
        self.schedules
            .get(&key)
            .map(parse)
            .unwrap_or(Err(UpstreamError::NotFound))
    }

    async fn trips(
        &self,
        origin: StopKey,
        destination: StopKey,
    ) -> Result<TripsResponse, UpstreamError> {
        self.check_available()?;
        match self
            .trips
            .get(&(origin, destination))
            .or(self.any_trip.as_ref())
        {
            Some(payload) => parse(payload),
            None => parse(&json!({ "trips": [] })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CITY_CENTRE;
    use tempfile::tempdir;

    #[tokio::test]
    async fn named_queries_are_scripted() {
        let source = MockTransitSource::new()
            .with_named_stops("Osborne", json!({ "stops": [{ "key": 1, "number": 1 }] }));

        let hit = source
            .stops(&StopQuery::near(CITY_CENTRE, 5000).named("osborne"))
            .await
            .unwrap();
        assert_eq!(hit.stops.len(), 1);

        let miss = source
            .stops(&StopQuery::near(CITY_CENTRE, 5000).named("Portage"))
            .await
            .unwrap();
        assert!(miss.stops.is_empty());
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn failing_source_errors_everywhere() {
        let source = MockTransitSource::new().failing();
        assert!(source.stops(&StopQuery::near(CITY_CENTRE, 500)).await.is_err());
        assert!(source.stop(StopKey(1)).await.is_err());
        assert!(source.trips(StopKey(1), StopKey(2)).await.is_err());
    }

    #[tokio::test]
    async fn malformed_payload_is_json_error() {
        let source = MockTransitSource::new().with_area_stops(json!({ "stops": "nope" }));
        let result = source.stops(&StopQuery::near(CITY_CENTRE, 500)).await;
        assert!(matches!(result, Err(UpstreamError::Json { .. })));
    }

    #[tokio::test]
    async fn unknown_stop_is_not_found() {
        let source = MockTransitSource::new();
        assert!(matches!(
            source.stop(StopKey(42)).await,
            Err(UpstreamError::NotFound)
        ));
    }

    #[tokio::test]
    async fn load_fixture_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("stops.json"),
            r#"{ "stops": [ { "key": 10064, "number": 10064, "name": "Portage at Main" } ] }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("schedule-10064.json"),
            r#"{ "stop-schedule": { "stop": { "key": 10064, "number": 10064 } } }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = MockTransitSource::from_dir(dir.path()).unwrap();
        let stops = source.stops(&StopQuery::near(CITY_CENTRE, 500)).await.unwrap();
        assert_eq!(stops.stops.len(), 1);

        let start = crate::domain::parse_upstream_time("2024-05-01T10:00:00").unwrap();
        let schedule = source.stop_schedule(StopKey(10064), 10, start).await.unwrap();
        assert!(schedule.stop_schedule.is_some());
    }

    #[test]
    fn empty_fixture_directory_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            MockTransitSource::from_dir(dir.path()),
            Err(UpstreamError::Fixture { .. })
        ));
    }

    #[test]
    fn invalid_fixture_json_is_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("trips.json"), "{ not json").unwrap();
        assert!(MockTransitSource::from_dir(dir.path()).is_err());
    }
}
