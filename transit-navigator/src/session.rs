//! Keystroke-driven stop search.
//!
//! As a rider types, searches overlap and can complete out of order. A
//! [`SearchSession`] tags every search with a generation and only lets the
//! latest one replace what is displayed. A [`Debouncer`] holds back input
//! until typing pauses so most intermediate prefixes are never searched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::domain::Stop;
use crate::resolve::{Navigator, SearchRequest};
use crate::upstream::TransitSource;

#[derive(Debug, Default)]
struct Displayed {
    generation: u64,
    stops: Vec<Stop>,
}

/// Latest-wins search results for one input box.
pub struct SearchSession<S> {
    navigator: Arc<Navigator<S>>,
    issued: AtomicU64,
    displayed: Mutex<Displayed>,
}

impl<S: TransitSource> SearchSession<S> {
    pub fn new(navigator: Arc<Navigator<S>>) -> Self {
        Self {
            navigator,
            issued: AtomicU64::new(0),
            displayed: Mutex::new(Displayed::default()),
        }
    }

    /// Run a search and display its results if it is still the latest.
    ///
    /// Returns the displayed results, or `None` when a newer search was
    /// issued while this one was in flight.
    pub async fn search(&self, request: SearchRequest) -> Option<Vec<Stop>> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let stops = self.navigator.search_for_display(&request).await;

        let mut displayed = self.displayed.lock().unwrap_or_else(|e| e.into_inner());
        if generation != self.issued.load(Ordering::SeqCst) || generation < displayed.generation {
            debug!(generation, query = %request.query, "discarding superseded search");
            return None;
        }

        displayed.generation = generation;
        displayed.stops = stops.clone();
        Some(stops)
    }

    /// Results currently displayed.
    pub fn displayed(&self) -> Vec<Stop> {
        self.displayed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .stops
            .clone()
    }

    /// A debouncer with the configured quiet period.
    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(self.navigator.config().debounce)
    }

    /// Generation of the most recently issued search, 0 before any.
    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// Waits for input to go quiet.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for the next change, then until no further change arrives for
    /// the window, and return the settled value.
    ///
    /// Returns `None` once the sender is gone and no unseen value remains.
    pub async fn settle(&self, input: &mut watch::Receiver<String>) -> Option<String> {
        input.changed().await.ok()?;
        loop {
            match tokio::time::timeout(self.window, input.changed()).await {
                Ok(Ok(())) => continue,
                // Quiet period elapsed, or the sender went away mid-burst.
                Ok(Err(_)) | Err(_) => return Some(input.borrow_and_update().clone()),
            }
        }
    }
}
