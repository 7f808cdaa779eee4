//! Stop discovery and trip resolution.
//!
//! This module turns rider intent (a typed query, a position, a pair of
//! stops) into canonical domain values. Every resolver degrades instead of
//! failing: upstream errors are logged and become an empty list or `None`,
//! so callers only ever render a result or a placeholder.
//!
//! Resolver calls share nothing but the read-only [`TransitSource`]; each
//! call is independent and may run concurrently with any other.

mod config;
mod nearby;
mod schedule;
mod search;
mod trip;

#[cfg(test)]
mod test_support;

pub use config::ResolverConfig;
pub use search::{SearchRequest, filter_fallback};

use crate::upstream::TransitSource;

/// Entry point to all resolvers.
pub struct Navigator<S> {
    source: S,
    config: ResolverConfig,
}

impl<S: TransitSource> Navigator<S> {
    /// Create a navigator over the given source.
    pub fn new(source: S, config: ResolverConfig) -> Self {
        Self { source, config }
    }

    /// Resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
