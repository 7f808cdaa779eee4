//! Stop search by name or number.
//!
//! The upstream name search is scoped to a radius around a location hint
//! and misses stops outside it, and some spellings it does not match at
//! all. When it comes back empty we scan a wide fixed area instead and
//! match names and numbers ourselves.

use tracing::{debug, warn};

use crate::domain::{Coordinate, Stop, truncate_for_display};
use crate::upstream::{StopQuery, TransitSource, UpstreamError, normalize_stops};

use super::Navigator;

/// A stop search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Name or number as typed.
    pub query: String,
    /// Where to centre the upstream name search.
    pub hint: Coordinate,
    /// Radius around `hint`; the configured default when `None`.
    pub radius_m: Option<u32>,
    /// Only stops served by this route.
    pub route: Option<String>,
}

impl SearchRequest {
    /// Create a search for `query` around `hint`.
    pub fn new(query: impl Into<String>, hint: Coordinate) -> Self {
        Self {
            query: query.into(),
            hint,
            radius_m: None,
            route: None,
        }
    }

    /// Search within `radius_m` metres of the hint.
    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    /// Restrict to a route.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }
}

impl<S: TransitSource> Navigator<S> {
    /// Find stops matching a name or stop number.
    ///
    /// Queries shorter than the configured minimum return nothing without
    /// contacting upstream. Upstream failures return nothing as well.
    pub async fn search(&self, request: &SearchRequest) -> Vec<Stop> {
        let query = request.query.trim();
        if query.chars().count() < self.config.min_query_len {
            debug!(query, "query too short, not searching");
            return Vec::new();
        }

        match self.try_search(query, request).await {
            Ok(stops) => stops,
            Err(e) => {
                warn!(query, error = %e, "stop search failed");
                Vec::new()
            }
        }
    }

    /// [`Navigator::search`], truncated to what a result panel shows.
    pub async fn search_for_display(&self, request: &SearchRequest) -> Vec<Stop> {
        truncate_for_display(self.search(request).await, self.config.display_limit)
    }

    async fn try_search(
        &self,
        query: &str,
        request: &SearchRequest,
    ) -> Result<Vec<Stop>, UpstreamError> {
        let radius = request.radius_m.unwrap_or(self.config.search_radius_m);
        let scoped = StopQuery::near(request.hint, radius)
            .named(query)
            .on_route(request.route.clone());

        let stops = normalize_stops(&self.source.stops(&scoped).await?.stops);
        if !stops.is_empty() {
            debug!(query, found = stops.len(), "stop search matched upstream");
            return Ok(stops);
        }

        // The route filter goes to the wide scan too, but is not re-checked
        // when matching text below.
        let wide = StopQuery::near(self.config.fallback_centre, self.config.fallback_radius_m)
            .on_route(request.route.clone());
        let scanned = normalize_stops(&self.source.stops(&wide).await?.stops);
        let matched = filter_fallback(scanned, query, self.config.fallback_limit);

        debug!(query, found = matched.len(), "stop search used wide scan");
        Ok(matched)
    }
}

/// Keep stops whose name or number matches `query`, in order, up to `limit`.
pub fn filter_fallback(stops: Vec<Stop>, query: &str, limit: usize) -> Vec<Stop> {
    stops
        .into_iter()
        .filter(|s| s.matches_text(query))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CITY_CENTRE, StopKey};
    use crate::resolve::test_support::{navigator, stop_json, stops_payload};
    use crate::upstream::MockTransitSource;
    use serde_json::json;

    fn request(query: &str) -> SearchRequest {
        SearchRequest::new(query, Coordinate::new(49.88, -97.15)).with_radius(5000)
    }

    #[tokio::test]
    async fn short_query_never_reaches_upstream() {
        let source = MockTransitSource::new();
        let nav = navigator(source.clone());

        for q in ["", " ", "a", "  b  "] {
            assert!(nav.search(&request(q)).await.is_empty());
        }
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn primary_hit_skips_fallback() {
        let source = MockTransitSource::new().with_named_stops(
            "Osborne",
            stops_payload(vec![
                stop_json(10625, "Osborne Station"),
                stop_json(10626, "Osborne at River"),
            ]),
        );
        let nav = navigator(source.clone());

        let stops = nav.search(&request("  Osborne ")).await;
        let keys: Vec<_> = stops.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![StopKey(10625), StopKey(10626)]);

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name.as_deref(), Some("Osborne"));
        assert_eq!(requests[0].distance, 5000);
        assert_eq!(requests[0].near, Coordinate::new(49.88, -97.15));
    }

    #[tokio::test]
    async fn empty_primary_triggers_one_wide_scan() {
        let source = MockTransitSource::new().with_area_stops(stops_payload(vec![
            stop_json(10001, "Portage at Main"),
            stop_json(10002, "Main at Higgins"),
            stop_json(10003, "Osborne Station"),
            stop_json(10004, "MAIN STREET NORTH"),
        ]));
        let nav = navigator(source.clone());

        let stops = nav.search(&request("Main")).await;
        let keys: Vec<_> = stops.iter().map(|s| s.key.0).collect();
        assert_eq!(keys, vec![10001, 10002, 10004]);

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        let wide = &requests[1];
        assert_eq!(wide.name, None);
        assert_eq!(wide.distance, 15_000);
        assert_eq!(wide.near, CITY_CENTRE);
    }

    #[tokio::test]
    async fn wide_scan_matches_stop_numbers() {
        let source = MockTransitSource::new().with_area_stops(stops_payload(vec![
            stop_json(10064, "Portage at Main"),
            stop_json(20064, "Pembina at Stafford"),
            stop_json(10793, "Osborne Station"),
        ]));
        let nav = navigator(source);

        let stops = nav.search(&request("0064")).await;
        let keys: Vec<_> = stops.iter().map(|s| s.key.0).collect();
        assert_eq!(keys, vec![10064, 20064]);
    }

    #[tokio::test]
    async fn wide_scan_is_capped() {
        let many: Vec<_> = (0..30)
            .map(|i| stop_json(10_000 + i, &format!("Main Stop {i}")))
            .collect();
        let source = MockTransitSource::new().with_area_stops(stops_payload(many));
        let nav = navigator(source);

        let stops = nav.search(&request("main")).await;
        assert_eq!(stops.len(), 20);
        assert_eq!(stops[0].key, StopKey(10_000));
        assert_eq!(stops[19].key, StopKey(10_019));

        let shown = nav.search_for_display(&request("main")).await;
        assert_eq!(shown.len(), 12);
    }

    #[tokio::test]
    async fn route_filter_passed_to_both_fetches() {
        let source = MockTransitSource::new().with_area_stops(stops_payload(vec![stop_json(
            1,
            "Osborne Station",
        )]));
        let nav = navigator(source.clone());

        let stops = nav.search(&request("osborne").with_route("16")).await;
        assert_eq!(stops.len(), 1);

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.route.as_deref() == Some("16")));
    }

    #[tokio::test]
    async fn default_radius_from_config() {
        let source = MockTransitSource::new();
        let nav = navigator(source.clone());

        nav.search(&SearchRequest::new("Osborne", CITY_CENTRE)).await;
        assert_eq!(source.requests()[0].distance, 5_000);
    }

    #[tokio::test]
    async fn upstream_failure_is_empty() {
        let source = MockTransitSource::new().failing();
        let nav = navigator(source.clone());

        assert!(nav.search(&request("Osborne")).await.is_empty());
        // Failure on the scoped fetch ends the search.
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_wide_scan_is_empty() {
        let source = MockTransitSource::new().with_area_stops(json!({ "stops": 7 }));
        let nav = navigator(source);
        assert!(nav.search(&request("Osborne")).await.is_empty());
    }

    #[test]
    fn filter_keeps_order() {
        let nav_stops = vec![
            ("Osborne Station", 3),
            ("Portage", 1),
            ("osborne at river", 2),
        ];
        let stops: Vec<Stop> = nav_stops
            .into_iter()
            .map(|(name, key)| {
                crate::upstream::normalize_stop(
                    &serde_json::from_value(stop_json(key, name)).unwrap(),
                )
                .unwrap()
            })
            .collect();

        let kept: Vec<_> = filter_fallback(stops, "OSBORNE", 20)
            .iter()
            .map(|s| s.key.0)
            .collect();
        assert_eq!(kept, vec![3, 2]);
    }
}
