//! Conversion from transit API DTOs to domain types.
//!
//! This is the only place that knows about upstream field fallbacks. Each
//! function tolerates missing data by defaulting, and isolates bad records
//! so one of them never spoils its siblings.

use tracing::{debug, warn};

use crate::domain::{
    Badge, Coordinate, Distances, PathPoint, RouteSchedule, RouteSchedules, SegmentKind,
    SegmentRoute, SegmentTimes, Stop, StopKey, StopSchedule, StopTime, TimePair, TripPlan,
    TripSegment, parse_upstream_time, segment_color,
};

use super::types::{
    RawEndpoint, RawGeographic, RawRoute, RawRouteSchedule, RawSegment, RawStop,
    RawStopSchedule, RawStopTimes, RawTimePair, RawTrip, Scalar,
};

/// Error while decoding a leg's encoded path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// A token was not a `lon,lat` pair of numbers
    #[error("invalid path point {index}: {token:?}")]
    InvalidPoint { index: usize, token: String },

    /// The shape field was present but not a string
    #[error("shape points are not a string")]
    NotText,
}

/// Convert one upstream stop record into a canonical [`Stop`].
///
/// Position comes from `centre.geographic`, then `geographic`, then the
/// `(0,0)` placeholder. Latitude and longitude that are present but not
/// numeric become `NaN`. Returns `None` when the key or stop number is not
/// an integer, since such a stop cannot be looked up again.
pub fn normalize_stop(raw: &RawStop) -> Option<Stop> {
    let Some(key) = raw.key.as_ref().and_then(Scalar::as_u64) else {
        warn!(key = ?raw.key, name = ?raw.name, "dropping stop without a usable key");
        return None;
    };
    let Some(number) = raw.number.as_ref().and_then(Scalar::as_u64) else {
        warn!(key, number = ?raw.number, "dropping stop without a usable number");
        return None;
    };

    let geographic = raw
        .centre
        .as_ref()
        .and_then(|c| c.geographic.as_ref())
        .or(raw.geographic.as_ref())
        .map(coordinate)
        .unwrap_or(Coordinate::UNKNOWN);

    let distances = raw
        .distances
        .as_ref()
        .and_then(|d| d.direct.as_ref())
        .map(Scalar::as_f64)
        .filter(|d| d.is_finite())
        .map(Distances::from_direct);

    Some(Stop {
        key: StopKey(key),
        name: text(&raw.name).unwrap_or_default(),
        number,
        direction: text(&raw.direction),
        side: text(&raw.side),
        geographic,
        distances,
    })
}

/// Normalize a list of stops, keeping upstream order.
pub fn normalize_stops(raw: &[RawStop]) -> Vec<Stop> {
    raw.iter().filter_map(normalize_stop).collect()
}

fn text(field: &Option<Scalar>) -> Option<String> {
    field.as_ref().and_then(Scalar::as_text)
}

fn coordinate(g: &RawGeographic) -> Coordinate {
    let component = |v: &Option<Scalar>| v.as_ref().map(Scalar::as_f64).unwrap_or(f64::NAN);
    Coordinate::new(component(&g.latitude), component(&g.longitude))
}

/// Convert a stop schedule.
///
/// `fallback_stop` is used when the schedule omits its own stop record.
pub fn convert_stop_schedule(
    raw: &RawStopSchedule,
    fallback_stop: Option<&Stop>,
) -> Option<StopSchedule> {
    let stop = match raw.stop.as_ref().and_then(normalize_stop) {
        Some(stop) => stop,
        None => fallback_stop?.clone(),
    };

    let routes = match &raw.route_schedules {
        None => RouteSchedules::Unavailable,
        Some(routes) => {
            RouteSchedules::Available(routes.iter().map(convert_route_schedule).collect())
        }
    };

    Some(StopSchedule { stop, routes })
}

/// Convert one route's schedule, resolving every field fallback.
pub fn convert_route_schedule(raw: &RawRouteSchedule) -> RouteSchedule {
    let nested = raw.route.as_ref();

    let key = raw
        .key
        .as_ref()
        .or(nested.and_then(|r| r.key.as_ref()))
        .and_then(Scalar::as_u64);

    let number = raw
        .number
        .as_ref()
        .or(nested.and_then(|r| r.number.as_ref()))
        .and_then(Scalar::as_text)
        .unwrap_or_default();

    let name = raw
        .name
        .clone()
        .or_else(|| nested.and_then(|r| r.name.clone()))
        .unwrap_or_else(|| format!("Route {number}").trim_end().to_string());

    let label = raw
        .badge_label
        .as_ref()
        .or(nested.and_then(|r| r.badge_label.as_ref()))
        .and_then(Scalar::as_text)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| {
            if number.is_empty() {
                "Route".to_string()
            } else {
                number.clone()
            }
        });

    let style = raw
        .badge_style
        .as_ref()
        .or(nested.and_then(|r| r.badge_style.as_ref()));

    let badge = Badge {
        label,
        background: style.and_then(|s| s.background_color.clone()),
        foreground: style.and_then(|s| s.color.clone()),
    };

    let times = match (&raw.times, &raw.scheduled_stops) {
        (Some(times), _) => times.iter().map(convert_stop_times).collect(),
        (None, Some(stops)) => stops
            .iter()
            .filter_map(|s| s.times.as_ref())
            .map(convert_stop_times)
            .collect(),
        (None, None) => Vec::new(),
    };

    RouteSchedule {
        key,
        number,
        name,
        badge,
        times,
    }
}

fn convert_stop_times(raw: &RawStopTimes) -> StopTime {
    StopTime {
        departure: convert_time_pair(raw.departure.as_ref()),
        arrival: convert_time_pair(raw.arrival.as_ref()),
    }
}

fn convert_time_pair(raw: Option<&RawTimePair>) -> TimePair {
    let parse = |s: Option<&String>| s.and_then(|s| parse_upstream_time(s));
    match raw {
        Some(pair) => TimePair {
            scheduled: parse(pair.scheduled.as_ref()),
            estimated: parse(pair.estimated.as_ref()),
        },
        None => TimePair::default(),
    }
}

/// Convert the first itinerary of a trip response.
///
/// Returns `None` when upstream offered no itinerary at all. An itinerary
/// with no segments converts to an empty plan.
pub fn convert_first_trip(trips: &[RawTrip]) -> Option<TripPlan> {
    let trip = trips.first()?;
    if trips.len() > 1 {
        debug!(offered = trips.len(), "using first of several itineraries");
    }

    let segments = trip
        .segments
        .iter()
        .enumerate()
        .map(|(idx, seg)| convert_segment(idx, seg))
        .collect();

    Some(TripPlan { segments })
}

/// Convert one leg. A leg with undecodable geometry keeps an empty path.
pub fn convert_segment(index: usize, raw: &RawSegment) -> TripSegment {
    let upstream_type = raw.kind.as_ref().and_then(Scalar::as_text);
    let kind = SegmentKind::classify(upstream_type.as_deref(), raw.route.is_some());

    let path = match segment_points(raw) {
        Ok(path) => path,
        Err(e) => {
            warn!(segment = index, error = %e, "discarding path of malformed segment");
            Vec::new()
        }
    };

    let background = raw
        .route
        .as_ref()
        .and_then(|r| r.badge_style.as_ref())
        .and_then(|s| s.background_color.as_deref());

    TripSegment {
        kind,
        route: raw.route.as_ref().map(segment_route),
        from: raw.from.as_ref().and_then(endpoint_name),
        to: raw.to.as_ref().and_then(endpoint_name),
        times: segment_times(raw),
        path,
        color: segment_color(background, kind),
    }
}

fn segment_route(route: &RawRoute) -> SegmentRoute {
    SegmentRoute {
        number: route
            .number
            .as_ref()
            .and_then(Scalar::as_text)
            .unwrap_or_default(),
        name: route.name.clone().unwrap_or_default(),
    }
}

fn endpoint_name(endpoint: &RawEndpoint) -> Option<String> {
    endpoint
        .name
        .clone()
        .or_else(|| endpoint.stop.as_ref().and_then(|s| text(&s.name)))
}

fn segment_times(raw: &RawSegment) -> SegmentTimes {
    let Some(times) = raw.times.as_ref() else {
        return SegmentTimes::default();
    };
    let pick = |primary: &Option<String>, fallback: &Option<String>| {
        primary
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(fallback.as_deref())
            .and_then(parse_upstream_time)
    };
    SegmentTimes {
        start: pick(&times.start, &times.departure),
        end: pick(&times.end, &times.arrival),
    }
}

fn segment_points(raw: &RawSegment) -> Result<Vec<PathPoint>, PathError> {
    let points = raw.shape.as_ref().and_then(|shape| shape.get("points"));
    match points {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::String(encoded)) => decode_path(encoded),
        Some(_) => Err(PathError::NotText),
    }
}

/// Decode a whitespace-separated list of `lon,lat` tokens into map order.
///
/// Tokens may carry further comma-separated components, which are dropped.
///
/// Blank input decodes to an empty path.
///
/// # Examples
///
/// ```
/// use transit_navigator::upstream::decode_path;
///
/// let path = decode_path("-97.15,49.90 -97.14,49.91").unwrap();
/// assert_eq!(path, vec![(49.90, -97.15), (49.91, -97.14)]);
/// assert!(decode_path("   ").unwrap().is_empty());
/// assert!(decode_path("-97.15;49.90").is_err());
/// ```
pub fn decode_path(encoded: &str) -> Result<Vec<PathPoint>, PathError> {
    encoded
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            let invalid = || PathError::InvalidPoint {
                index,
                token: token.to_string(),
            };
            // Components past the second (altitude) are ignored.
            let mut fields = token.split(',');
            let mut next = || -> Result<f64, PathError> {
                fields
                    .next()
                    .and_then(|f| f.trim().parse().ok())
                    .ok_or_else(invalid)
            };
            let lon = next()?;
            let lat = next()?;
            if !lat.is_finite() || !lon.is_finite() {
                return Err(invalid());
            }
            Ok((lat, lon))
        })
        .collect()
}
