//! Application state for the web layer.

use std::sync::Arc;

use crate::resolve::Navigator;

/// Shared application state.
pub struct AppState<S> {
    /// Resolvers over the configured transit source
    pub navigator: Arc<Navigator<S>>,
}

impl<S> AppState<S> {
    pub fn new(navigator: Navigator<S>) -> Self {
        Self {
            navigator: Arc::new(navigator),
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            navigator: Arc::clone(&self.navigator),
        }
    }
}
