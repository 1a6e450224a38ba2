//! Root reducer
//!
//! Pure function: takes the current state and an action, returns the new state.

use crate::actions::{Action, GlobalAction, ReviewsPanelAction};
use crate::reducers::reviews_reducer::reduce_reviews;
use crate::state::AppState;
use gh_review_threads::ReviewsAction;

/// Rows taken by the header, status bar and panel border
const CHROME_HEIGHT: u16 = 4;

pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::Global(GlobalAction::Quit) => {
            state.running = false;
        }
        Action::Global(GlobalAction::Resize { width, height }) => {
            let resize = ReviewsAction::SetViewport {
                width: *width,
                height: height.saturating_sub(CHROME_HEIGHT),
            };
            state.reviews = reduce_reviews(
                state.reviews,
                &ReviewsPanelAction::Panel(resize),
            );
        }
        Action::Reviews(reviews_action) => {
            state.reviews = reduce_reviews(state.reviews, reviews_action);
        }
        // Key presses are translated by middleware; events never reach reducers
        Action::Global(GlobalAction::KeyPressed(_)) | Action::Event(_) => {}
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_stops_running() {
        let state = reduce(AppState::for_tests(), &Action::Global(GlobalAction::Quit));
        assert!(!state.running);
    }

    #[test]
    fn test_resize_sets_viewport_without_chrome() {
        let state = reduce(
            AppState::for_tests(),
            &Action::Global(GlobalAction::Resize {
                width: 80,
                height: 30,
            }),
        );
        assert_eq!(state.reviews.panel.viewport_height, 26);
        assert!(state.reviews.outbox.is_empty());
    }
}
