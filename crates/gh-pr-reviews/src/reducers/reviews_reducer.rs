//! Reviews Reducer
//!
//! Handles state transitions for the reviews panel. Semantic panel actions are
//! forwarded to the inner state; the events it emits are queued in the outbox.

use crate::actions::ReviewsPanelAction;
use crate::state::ReviewsState;
use gh_review_threads::ReviewsAction;

/// Reducer for reviews actions.
pub fn reduce_reviews(mut state: ReviewsState, action: &ReviewsPanelAction) -> ReviewsState {
    match action {
        ReviewsPanelAction::Panel(panel_action) => {
            forward_action(&mut state, panel_action.clone());
        }

        // === Loading ===
        ReviewsPanelAction::LoadStart => {
            state.loading = true;
        }

        ReviewsPanelAction::Loaded(loaded) => {
            let loaded = loaded.as_ref().clone();
            state.panel.set_data(loaded.data);
            state.panel.clear_error();
            state.title = Some(loaded.title);
            state.url = Some(loaded.url);
            state.context = Some(loaded.context);
            state.loading = false;
            state.last_loaded = Some(chrono::Local::now());
        }

        ReviewsPanelAction::LoadError(error) => {
            state.loading = false;
            state
                .panel
                .set_error(format!("Failed to load reviews: {error}"));
        }

        // === Reply lifecycle ===
        ReviewsPanelAction::ReplySucceeded { thread_id } => {
            state.panel.reply_succeeded(thread_id);
        }

        ReviewsPanelAction::ReplyFailed { thread_id, error } => {
            state.panel.reply_failed(thread_id, error);
        }

        ReviewsPanelAction::MutationFailed(error) => {
            state.panel.set_error(error.clone());
        }

        ReviewsPanelAction::DismissError => {
            state.panel.clear_error();
        }
    }

    state
}

/// Forward a semantic action to the panel and queue what it emits
fn forward_action(state: &mut ReviewsState, action: ReviewsAction) {
    let events = state.panel.handle_action(action);
    state.outbox.extend(events);
}
