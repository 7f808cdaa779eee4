//! Resolver configuration.

use std::time::Duration;

use crate::domain::{CITY_CENTRE, Coordinate};

/// Configuration parameters for the resolvers.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Queries shorter than this (after trimming) never reach upstream.
    pub min_query_len: usize,

    /// Default radius for name searches around the location hint (metres).
    pub search_radius_m: u32,

    /// Radius of the fallback scan when a name search finds nothing (metres).
    /// Independent of the radius the caller asked for.
    pub fallback_radius_m: u32,

    /// Centre of the fallback scan.
    pub fallback_centre: Coordinate,

    /// Maximum stops kept from the fallback scan.
    pub fallback_limit: usize,

    /// Maximum stops a search result panel shows.
    pub display_limit: usize,

    /// Radius for populating the map around its initial centre (metres).
    pub map_radius_m: u32,

    /// Radius for stops around the rider's own position (metres).
    pub locate_radius_m: u32,

    /// Departures requested per route for a stop schedule.
    pub schedule_results_per_route: u8,

    /// Quiet period before a typed query is searched.
    pub debounce: Duration,

    /// Upper bound on waiting for a position fix.
    pub geolocation_timeout: Duration,
}

impl ResolverConfig {
    /// Shorthand for a config with a different fallback centre.
    pub fn centred_on(centre: Coordinate) -> Self {
        Self {
            fallback_centre: centre,
            ..Self::default()
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            search_radius_m: 5_000,
            fallback_radius_m: 15_000,
            fallback_centre: CITY_CENTRE,
            fallback_limit: 20,
            display_limit: 12,
            map_radius_m: 2_000,
            locate_radius_m: 1_000,
            schedule_results_per_route: 10,
            debounce: Duration::from_millis(350),
            geolocation_timeout: Duration::from_secs(6),
        }
    }
}
