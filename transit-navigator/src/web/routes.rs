//! HTTP route handlers.
//!
//! Upstream failures never surface as HTTP errors here: the resolvers have
//! already degraded them to empty lists or `null`. Only malformed requests
//! are rejected.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{Coordinate, RouteSchedules, StopKey, truncate_for_display};
use crate::resolve::SearchRequest;
use crate::upstream::TransitSource;

use super::dto::*;
use super::state::AppState;

/// Departures listed per route in a schedule response.
const DEPARTURES_PER_ROUTE: usize = 3;

/// Hard cap on search results a client may ask for.
const MAX_SEARCH_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router<S: TransitSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/near", get(near_stops::<S>))
        .route("/api/stops/search", get(search_stops::<S>))
        .route("/api/stops/:key", get(stop_detail::<S>))
        .route("/api/stops/:key/schedule", get(stop_schedule::<S>))
        .route("/api/trips", get(plan_trip::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stops around a point, for map markers.
async fn near_stops<S: TransitSource>(
    State(state): State<AppState<S>>,
    Query(req): Query<NearRequest>,
) -> Result<Json<StopListResponse>, AppError> {
    let at = coordinate(req.lat, req.lon)?;
    let stops = state.navigator.map_stops(at, req.distance).await;
    Ok(Json(StopListResponse { stops }))
}

/// Search stops by name or number.
async fn search_stops<S: TransitSource>(
    State(state): State<AppState<S>>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<StopListResponse>, AppError> {
    let config = state.navigator.config();
    let hint = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => coordinate(lat, lon)?,
        (None, None) => config.fallback_centre,
        _ => {
            return Err(AppError::BadRequest {
                message: "lat and lon must be given together".to_string(),
            });
        }
    };

    let mut request = SearchRequest::new(req.q, hint);
    if let Some(distance) = req.distance {
        request = request.with_radius(distance);
    }
    if let Some(route) = req.route.filter(|r| !r.trim().is_empty()) {
        request = request.with_route(route);
    }

    let limit = req
        .limit
        .unwrap_or(config.display_limit)
        .min(MAX_SEARCH_LIMIT);
    let stops = truncate_for_display(state.navigator.search(&request).await, limit);

    Ok(Json(StopListResponse { stops }))
}

/// A single stop.
async fn stop_detail<S: TransitSource>(
    State(state): State<AppState<S>>,
    Path(key): Path<u64>,
) -> Json<StopDetailResponse> {
    let stop = state.navigator.stop(StopKey(key)).await;
    Json(StopDetailResponse { stop })
}

/// Upcoming departures at a stop.
async fn stop_schedule<S: TransitSource>(
    State(state): State<AppState<S>>,
    Path(key): Path<u64>,
) -> Json<ScheduleResponse> {
    let now = Local::now().naive_local();
    let schedule = state.navigator.schedule_at(StopKey(key), now).await;

    let departures = match schedule.as_ref().map(|s| &s.routes) {
        Some(RouteSchedules::Available(routes)) => routes
            .iter()
            .map(|r| RouteDepartures::from_schedule(r, now, DEPARTURES_PER_ROUTE))
            .collect(),
        _ => Vec::new(),
    };

    Json(ScheduleResponse {
        generated_at: now,
        schedule,
        departures,
    })
}

/// Plan a trip between two stops.
async fn plan_trip<S: TransitSource>(
    State(state): State<AppState<S>>,
    Query(req): Query<TripRequest>,
) -> Json<TripResponse> {
    let plan = state
        .navigator
        .plan(StopKey(req.origin), StopKey(req.destination))
        .await;
    let summary = plan.as_ref().map(TripSummary::from_plan);
    Json(TripResponse { plan, summary })
}

fn coordinate(lat: f64, lon: f64) -> Result<Coordinate, AppError> {
    let at = Coordinate::new(lat, lon);
    if at.is_valid() {
        Ok(at)
    } else {
        Err(AppError::BadRequest {
            message: format!("invalid coordinate: lat={lat}, lon={lon}"),
        })
    }
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
        };

        warn!(%status, %message, "rejected request");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CITY_CENTRE;
    use crate::resolve::{Navigator, ResolverConfig};
    use crate::upstream::MockTransitSource;
    use serde_json::json;

    fn state(source: MockTransitSource) -> AppState<MockTransitSource> {
        AppState::new(Navigator::new(source, ResolverConfig::default()))
    }

    fn stops(n: u64) -> serde_json::Value {
        let stops: Vec<_> = (1..=n)
            .map(|k| {
                json!({ "key": k, "number": 10_000 + k, "name": format!("Main Stop {k}"),
                        "geographic": { "latitude": 49.89, "longitude": -97.14 } })
            })
            .collect();
        json!({ "stops": stops })
    }

    #[test]
    fn router_builds() {
        let _ = create_router(state(MockTransitSource::new()));
    }

    #[tokio::test]
    async fn near_filters_unmappable() {
        let source = MockTransitSource::new().with_area_stops(json!({
            "stops": [
                { "key": 1, "number": 1, "geographic": { "latitude": 49.89, "longitude": -97.14 } },
                { "key": 2, "number": 2 }
            ]
        }));
        let req = NearRequest {
            lat: 49.89,
            lon: -97.14,
            distance: None,
        };

        let Json(resp) = near_stops(State(state(source.clone())), Query(req))
            .await
            .unwrap();
        assert_eq!(resp.stops.len(), 1);
        assert_eq!(source.requests()[0].distance, 2_000);
    }

    #[tokio::test]
    async fn near_rejects_bad_coordinate() {
        let req = NearRequest {
            lat: 149.0,
            lon: -97.14,
            distance: Some(500),
        };
        let result = near_stops(State(state(MockTransitSource::new())), Query(req)).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn search_defaults_and_limit() {
        let source = MockTransitSource::new().with_named_stops("main", stops(30));
        let req = StopSearchRequest {
            q: "Main".into(),
            lat: None,
            lon: None,
            distance: None,
            route: Some("  ".into()),
            limit: None,
        };

        let Json(resp) = search_stops(State(state(source.clone())), Query(req))
            .await
            .unwrap();
        assert_eq!(resp.stops.len(), 12);

        let request = &source.requests()[0];
        assert_eq!(request.near, CITY_CENTRE);
        assert_eq!(request.route, None);
    }

    #[tokio::test]
    async fn search_limit_is_capped() {
        let source = MockTransitSource::new().with_named_stops("main", stops(60));
        let req = StopSearchRequest {
            q: "main".into(),
            lat: Some(49.9),
            lon: Some(-97.2),
            distance: Some(800),
            route: None,
            limit: Some(500),
        };

        let Json(resp) = search_stops(State(state(source.clone())), Query(req))
            .await
            .unwrap();
        assert_eq!(resp.stops.len(), 50);
        assert_eq!(source.requests()[0].distance, 800);
    }

    #[tokio::test]
    async fn search_needs_both_coordinates() {
        let req = StopSearchRequest {
            q: "main".into(),
            lat: Some(49.9),
            lon: None,
            distance: None,
            route: None,
            limit: None,
        };
        let result = search_stops(State(state(MockTransitSource::new())), Query(req)).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn unknown_stop_is_null() {
        let Json(resp) = stop_detail(State(state(MockTransitSource::new())), Path(42)).await;
        assert!(resp.stop.is_none());
    }

    #[tokio::test]
    async fn unavailable_schedule_has_no_departures() {
        let source = MockTransitSource::new().with_schedule(
            StopKey(7),
            json!({ "stop-schedule": { "stop": { "key": 7, "number": 7, "name": "Quiet" } } }),
        );

        let Json(resp) = stop_schedule(State(state(source)), Path(7)).await;
        let schedule = resp.schedule.unwrap();
        assert_eq!(schedule.routes, RouteSchedules::Unavailable);
        assert!(resp.departures.is_empty());
    }

    #[tokio::test]
    async fn failed_trip_is_null() {
        let req = TripRequest {
            origin: 10064,
            destination: 10793,
        };
        let Json(resp) = plan_trip(State(state(MockTransitSource::new().failing())), Query(req)).await;
        assert!(resp.plan.is_none());
        assert!(resp.summary.is_none());
    }

    #[tokio::test]
    async fn trip_carries_summary() {
        let source = MockTransitSource::new().with_any_trip(json!({
            "trips": [{ "segments": [
                { "type": "walk", "to": { "name": "Osborne Station" },
                  "times": { "start": "2024-05-01T10:00:00", "end": "2024-05-01T10:06:00" } }
            ] }]
        }));
        let req = TripRequest {
            origin: 10064,
            destination: 10793,
        };

        let Json(resp) = plan_trip(State(state(source)), Query(req)).await;
        let summary = resp.summary.unwrap();
        assert_eq!(summary.rides, 0);
        assert_eq!(summary.steps, vec!["Walk to Osborne Station"]);
        assert!(summary.departs.is_some() && summary.arrives.is_some());
    }

    #[test]
    fn bad_request_is_400() {
        let response = AppError::BadRequest {
            message: "nope".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
