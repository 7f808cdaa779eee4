//! Transit API response DTOs.
//!
//! These types map directly to the JSON the transit API returns. Every
//! field is optional because the API omits fields freely, and numeric
//! fields arrive as numbers or strings depending on the endpoint. Field
//! name variants (`badge_label` vs `badge-label` and friends) are listed
//! here once, as serde aliases, so nothing downstream has to know them.
//!
//! Lists use [`lenient`] so a single malformed element is skipped rather
//! than failing the whole response.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A JSON scalar that should be a number but might be a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    /// Numeric value, `NaN` when not numeric.
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Scalar::Other(_) => f64::NAN,
        }
    }

    /// Value as a non-negative integer identity, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        let n = self.as_f64();
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
            Some(n as u64)
        } else {
            None
        }
    }

    /// Value as display text. Integral numbers print without a fraction.
    pub fn as_text(&self) -> Option<String> {
        match self {
            // `Display` prints integral floats without a fraction at any magnitude.
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Other(_) => None,
        }
    }
}

/// Deserialize a list, dropping (and logging) elements that don't fit `T`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(keep_well_formed(values))
}

/// Like [`lenient`], but keeps "field absent or null" distinct from "empty".
pub fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(keep_well_formed))
}

/// Deserialize an optional field, treating a value of the wrong shape as
/// absent (and logging it) instead of failing the enclosing record.
pub fn tolerant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!(error = %e, "ignoring malformed upstream field");
            None
        }
    }))
}

fn keep_well_formed<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index = idx, error = %e, "skipping malformed upstream record");
                None
            }
        })
        .collect()
}

/// Response from `stops.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub stops: Vec<RawStop>,
}

/// Response from `stops/{key}.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopResponse {
    #[serde(default, deserialize_with = "tolerant")]
    pub stop: Option<RawStop>,
}

/// A stop as the API sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStop {
    pub key: Option<Scalar>,
    pub name: Option<Scalar>,
    pub number: Option<Scalar>,
    pub direction: Option<Scalar>,
    pub side: Option<Scalar>,
    /// Preferred position source.
    #[serde(alias = "center", default, deserialize_with = "tolerant")]
    pub centre: Option<RawCentre>,
    /// Position used when `centre` is absent.
    #[serde(default, deserialize_with = "tolerant")]
    pub geographic: Option<RawGeographic>,
    #[serde(default, deserialize_with = "tolerant")]
    pub distances: Option<RawDistances>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCentre {
    #[serde(default, deserialize_with = "tolerant")]
    pub geographic: Option<RawGeographic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeographic {
    pub latitude: Option<Scalar>,
    pub longitude: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDistances {
    pub direct: Option<Scalar>,
}

/// Response from `stops/{key}/schedule.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopScheduleResponse {
    #[serde(rename = "stop-schedule", alias = "stop_schedule")]
    pub stop_schedule: Option<RawStopSchedule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStopSchedule {
    #[serde(default, deserialize_with = "tolerant")]
    pub stop: Option<RawStop>,
    /// `None` means upstream did not send the field at all.
    #[serde(
        rename = "route-schedules",
        alias = "route_schedules",
        default,
        deserialize_with = "lenient_opt"
    )]
    pub route_schedules: Option<Vec<RawRouteSchedule>>,
}

/// Route identity and badge, as found on schedules and trip segments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoute {
    pub key: Option<Scalar>,
    pub number: Option<Scalar>,
    #[serde(default, deserialize_with = "tolerant")]
    pub name: Option<String>,
    #[serde(alias = "badge-label")]
    pub badge_label: Option<Scalar>,
    #[serde(alias = "badge-style", default, deserialize_with = "tolerant")]
    pub badge_style: Option<RawBadgeStyle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBadgeStyle {
    #[serde(
        rename = "background-color",
        alias = "background_color",
        default,
        deserialize_with = "tolerant"
    )]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub color: Option<String>,
}

/// One route's entry in a stop schedule.
///
/// Identity may sit at the top level or in a nested `route` object, and
/// times may be a flat `times` list or wrapped in `scheduled-stops`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRouteSchedule {
    pub key: Option<Scalar>,
    pub number: Option<Scalar>,
    #[serde(default, deserialize_with = "tolerant")]
    pub name: Option<String>,
    #[serde(alias = "badge-label")]
    pub badge_label: Option<Scalar>,
    #[serde(alias = "badge-style", default, deserialize_with = "tolerant")]
    pub badge_style: Option<RawBadgeStyle>,
    #[serde(default, deserialize_with = "tolerant")]
    pub route: Option<RawRoute>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub times: Option<Vec<RawStopTimes>>,
    #[serde(
        rename = "scheduled-stops",
        alias = "scheduled_stops",
        default,
        deserialize_with = "lenient_opt"
    )]
    pub scheduled_stops: Option<Vec<RawScheduledStop>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduledStop {
    #[serde(default, deserialize_with = "tolerant")]
    pub times: Option<RawStopTimes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStopTimes {
    #[serde(default, deserialize_with = "tolerant")]
    pub departure: Option<RawTimePair>,
    #[serde(default, deserialize_with = "tolerant")]
    pub arrival: Option<RawTimePair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTimePair {
    #[serde(default, deserialize_with = "tolerant")]
    pub scheduled: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub estimated: Option<String>,
}

/// Response from `trips.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub trips: Vec<RawTrip>,
}

/// One itinerary option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrip {
    #[serde(default, deserialize_with = "lenient")]
    pub segments: Vec<RawSegment>,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "type")]
    pub kind: Option<Scalar>,
    #[serde(default, deserialize_with = "tolerant")]
    pub route: Option<RawRoute>,
    #[serde(default, deserialize_with = "tolerant")]
    pub from: Option<RawEndpoint>,
    #[serde(default, deserialize_with = "tolerant")]
    pub to: Option<RawEndpoint>,
    #[serde(default, deserialize_with = "tolerant")]
    pub times: Option<RawSegmentTimes>,
    /// Kept loose: a bad shape should only cost this leg its path.
    pub shape: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEndpoint {
    #[serde(default, deserialize_with = "tolerant")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub stop: Option<RawStop>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSegmentTimes {
    #[serde(default, deserialize_with = "tolerant")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub end: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub departure: Option<String>,
    #[serde(default, deserialize_with = "tolerant")]
    pub arrival: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_coercion() {
        assert_eq!(Scalar::Number(10064.0).as_u64(), Some(10064));
        assert_eq!(Scalar::Text(" 10064 ".into()).as_u64(), Some(10064));
        assert_eq!(Scalar::Text("abc".into()).as_u64(), None);
        assert_eq!(Scalar::Number(1.5).as_u64(), None);
        assert_eq!(Scalar::Number(-3.0).as_u64(), None);
        assert!(Scalar::Text("north".into()).as_f64().is_nan());
        assert!(Scalar::Other(json!(true)).as_f64().is_nan());
        assert_eq!(Scalar::Text("49.9".into()).as_f64(), 49.9);
    }

    #[test]
    fn scalar_text() {
        assert_eq!(Scalar::Number(16.0).as_text().as_deref(), Some("16"));
        assert_eq!(Scalar::Number(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Scalar::Text("BLUE".into()).as_text().as_deref(), Some("BLUE"));
        assert_eq!(Scalar::Other(json!({})).as_text(), None);
        assert_eq!(
            Scalar::Number(1e20).as_text().as_deref(),
            Some("100000000000000000000")
        );
        assert_eq!(Scalar::Number(-7.0).as_text().as_deref(), Some("-7"));
    }

    #[test]
    fn wrongly_typed_fields_keep_the_stop() {
        let stop: RawStop = serde_json::from_value(json!({
            "key": 1,
            "number": 1,
            "name": 123,
            "direction": 5,
            "side": ["far"],
            "centre": "downtown",
            "geographic": { "latitude": 49.9, "longitude": -97.1 },
            "distances": 40
        }))
        .unwrap();
        assert_eq!(stop.name.as_ref().and_then(Scalar::as_text).as_deref(), Some("123"));
        assert!(stop.centre.is_none());
        assert!(stop.geographic.is_some());
        assert!(stop.distances.is_none());
    }

    #[test]
    fn wrongly_typed_fields_keep_the_segment() {
        let seg: RawSegment = serde_json::from_value(json!({
            "type": "walk",
            "times": "n/a",
            "from": "Portage at Main",
            "to": { "name": 7, "stop": { "key": 10793, "number": 10793, "name": "Osborne" } },
            "route": [16]
        }))
        .unwrap();
        assert!(seg.times.is_none());
        assert!(seg.from.is_none());
        assert!(seg.route.is_none());
        let to = seg.to.unwrap();
        assert!(to.name.is_none());
        assert!(to.stop.is_some());
    }

    #[test]
    fn malformed_later_itinerary_is_skipped() {
        let resp: TripsResponse = serde_json::from_value(json!({
            "trips": [{ "segments": [{ "type": "walk" }] }, { "segments": 5 }]
        }))
        .unwrap();
        assert_eq!(resp.trips.len(), 1);
        assert_eq!(resp.trips[0].segments.len(), 1);
    }

    #[test]
    fn malformed_stop_is_skipped() {
        let body = json!({
            "stops": [
                { "key": 1, "name": "Good" },
                "not a stop",
                { "key": 3, "name": "Also good" }
            ]
        });
        let resp: StopsResponse = serde_json::from_value(body).unwrap();
        let keys: Vec<_> = resp
            .stops
            .iter()
            .map(|s| s.key.as_ref().and_then(Scalar::as_u64))
            .collect();
        assert_eq!(keys, vec![Some(1), Some(3)]);
    }

    #[test]
    fn missing_stops_field_is_empty() {
        let resp: StopsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.stops.is_empty());
        let resp: StopsResponse = serde_json::from_value(json!({ "stops": null })).unwrap();
        assert!(resp.stops.is_empty());
    }

    #[test]
    fn centre_and_center_both_accepted() {
        let a: RawStop =
            serde_json::from_value(json!({ "centre": { "geographic": { "latitude": 1 } } }))
                .unwrap();
        let b: RawStop =
            serde_json::from_value(json!({ "center": { "geographic": { "latitude": 1 } } }))
                .unwrap();
        assert!(a.centre.is_some());
        assert!(b.centre.is_some());
    }

    #[test]
    fn route_schedules_absent_vs_empty() {
        let absent: RawStopSchedule = serde_json::from_value(json!({ "stop": {} })).unwrap();
        assert!(absent.route_schedules.is_none());

        let empty: RawStopSchedule =
            serde_json::from_value(json!({ "stop": {}, "route-schedules": [] })).unwrap();
        assert_eq!(empty.route_schedules.map(|r| r.len()), Some(0));

        let underscored: RawStopSchedule =
            serde_json::from_value(json!({ "route_schedules": [{}] })).unwrap();
        assert_eq!(underscored.route_schedules.map(|r| r.len()), Some(1));
    }

    #[test]
    fn badge_field_variants() {
        let dashed: RawRoute = serde_json::from_value(json!({
            "badge-label": "16",
            "badge-style": { "background-color": "#fff", "color": "#000" }
        }))
        .unwrap();
        let underscored: RawRoute = serde_json::from_value(json!({
            "badge_label": "16",
            "badge_style": { "background_color": "#fff", "color": "#000" }
        }))
        .unwrap();

        for route in [dashed, underscored] {
            assert_eq!(route.badge_label, Some(Scalar::Text("16".into())));
            let style = route.badge_style.unwrap();
            assert_eq!(style.background_color.as_deref(), Some("#fff"));
            assert_eq!(style.color.as_deref(), Some("#000"));
        }
    }

    #[test]
    fn loose_segment_shape() {
        let seg: RawSegment = serde_json::from_value(json!({
            "type": "walk",
            "shape": ["not", "a", "string"]
        }))
        .unwrap();
        assert!(seg.shape.is_some());
    }
}
