//! Domain types for the transit navigator.
//!
//! Everything here is a request-scoped value: built from an upstream
//! response, handed to the presentation layer, never mutated or cached.
//! Upstream quirks are resolved before these types are constructed.

mod geo;
mod schedule;
mod stop;
mod time;
mod trip;

pub use geo::{CITY_CENTRE, Coordinate};
pub use schedule::{Badge, RouteSchedule, RouteSchedules, StopSchedule, StopTime, TimePair};
pub use stop::{Distances, Stop, StopKey, retain_mappable, truncate_for_display, walking_estimate};
pub use time::{Countdown, format_upstream_time, parse_upstream_time};
pub use trip::{
    PathPoint, SegmentKind, SegmentRoute, SegmentTimes, TRANSIT_COLOR, TripPlan, TripSegment,
    WALK_COLOR, segment_color,
};
