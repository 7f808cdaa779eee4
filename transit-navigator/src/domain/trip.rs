//! Planned trips and their legs.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Polyline color for walking legs.
pub const WALK_COLOR: &str = "#6b7280";

/// Polyline color for legs without a route badge color.
pub const TRANSIT_COLOR: &str = "#0ea5e9";

/// A `(latitude, longitude)` vertex of a leg's drawn path.
pub type PathPoint = (f64, f64);

/// What the rider does during a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Ride,
    Walk,
    /// Transfers, waits and anything else upstream reports.
    Wait,
}

impl SegmentKind {
    /// Classify an upstream segment type.
    ///
    /// An unrecognised type is a ride when the leg carries a route.
    pub fn classify(upstream_type: Option<&str>, has_route: bool) -> Self {
        match upstream_type.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("ride") => SegmentKind::Ride,
            Some(t) if t.eq_ignore_ascii_case("walk") => SegmentKind::Walk,
            _ if has_route => SegmentKind::Ride,
            _ => SegmentKind::Wait,
        }
    }
}

/// Pick the polyline color for a leg.
///
/// # Examples
///
/// ```
/// use transit_navigator::domain::{SegmentKind, TRANSIT_COLOR, WALK_COLOR, segment_color};
///
/// assert_eq!(segment_color(Some("#ff0000"), SegmentKind::Ride), "#ff0000");
/// assert_eq!(segment_color(None, SegmentKind::Walk), WALK_COLOR);
/// assert_eq!(segment_color(None, SegmentKind::Wait), TRANSIT_COLOR);
/// ```
pub fn segment_color(route_background: Option<&str>, kind: SegmentKind) -> String {
    match route_background.map(str::trim).filter(|c| !c.is_empty()) {
        Some(color) => color.to_string(),
        None if kind == SegmentKind::Walk => WALK_COLOR.to_string(),
        None => TRANSIT_COLOR.to_string(),
    }
}

/// Route ridden during a leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRoute {
    pub number: String,
    pub name: String,
}

/// Start and end of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SegmentTimes {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSegment {
    pub kind: SegmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<SegmentRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub times: SegmentTimes,
    /// Empty when upstream had no usable geometry for this leg.
    pub path: Vec<PathPoint>,
    pub color: String,
}

impl TripSegment {
    /// Timeline label, e.g. "Route 16 Selkirk-Osborne" or "Walk to Osborne Station".
    pub fn label(&self) -> String {
        match self.kind {
            SegmentKind::Ride => match &self.route {
                Some(r) => format!("Route {} {}", r.number, r.name),
                None => "Bus".to_string(),
            },
            SegmentKind::Walk => match &self.to {
                Some(to) => format!("Walk to {to}"),
                None => "Walk".to_string(),
            },
            SegmentKind::Wait => "Wait".to_string(),
        }
    }
}

/// The itinerary chosen for a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub segments: Vec<TripSegment>,
}

impl TripPlan {
    /// Departure of the first leg and arrival of the last, when known.
    pub fn span(&self) -> SegmentTimes {
        SegmentTimes {
            start: self.segments.first().and_then(|s| s.times.start),
            end: self.segments.last().and_then(|s| s.times.end),
        }
    }

    /// Number of ride legs.
    pub fn rides(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Ride)
            .count()
    }
}
