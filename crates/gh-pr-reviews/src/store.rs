//! Store - owns the authoritative state on the main thread
//!
//! Reducers run here; every new state is published to the shared snapshot
//! the background worker hands to middleware.

use crate::actions::Action;
use crate::background::SharedState;
use crate::reducer::reduce;
use crate::state::AppState;
use gh_review_threads::ReviewsEvent;
use std::sync::{Arc, RwLock};

pub struct Store {
    state: AppState,
    shared: SharedState,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        let shared = Arc::new(RwLock::new(initial_state.clone()));
        Self {
            state: initial_state,
            shared,
        }
    }

    /// Get the current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Snapshot handle for the background worker
    pub fn shared_state(&self) -> SharedState {
        Arc::clone(&self.shared)
    }

    /// Run an action through the reducer and publish the result
    ///
    /// Returns the events the panel emitted while handling it.
    pub fn reduce(&mut self, action: &Action) -> Vec<ReviewsEvent> {
        let mut state = reduce(self.state.clone(), action);
        let events = std::mem::take(&mut state.reviews.outbox);
        self.state = state;

        match self.shared.write() {
            Ok(mut shared) => *shared = self.state.clone(),
            Err(e) => log::error!("Failed to publish state: {}", e),
        }

        events
    }
}
