//! Shared fixtures for resolver tests.

use serde_json::{Value, json};

use crate::upstream::MockTransitSource;

use super::{Navigator, ResolverConfig};

/// An upstream stop record at a real-looking position.
pub fn stop_json(key: u64, name: &str) -> Value {
    json!({
        "key": key,
        "name": name,
        "number": key,
        "direction": "Eastbound",
        "side": "Farside",
        "centre": { "geographic": { "latitude": "49.8955", "longitude": "-97.1380" } },
        "distances": { "direct": "120.00" }
    })
}

/// A `stops.json` payload.
pub fn stops_payload(stops: Vec<Value>) -> Value {
    json!({ "stops": stops })
}

pub fn navigator(source: MockTransitSource) -> Navigator<MockTransitSource> {
    Navigator::new(source, ResolverConfig::default())
}
