//! Actions module
//!
//! Actions are organized by:
//! - Events: facts that re-enter the middleware chain
//! - Global actions that affect the entire application
//! - Reviews actions targeted at the reviews panel

pub mod event;
pub mod global;
pub mod reviews;

pub use event::Event;
pub use global::GlobalAction;
pub use reviews::{LoadedReviews, ReviewsPanelAction};

use gh_review_threads::ReviewsAction;

/// Root action enum - tagged by domain
#[derive(Debug, Clone)]
pub enum Action {
    /// Events are facts/observations that re-enter the middleware chain.
    /// Use `Action::event(Event::X)` to create - ensures visibility at call site.
    Event(Event),

    /// Global application actions
    Global(GlobalAction),

    /// Reviews panel actions
    Reviews(ReviewsPanelAction),
}

impl Action {
    /// Create an event action
    pub fn event(event: Event) -> Self {
        Self::Event(event)
    }

    /// Wrap a semantic panel action
    pub fn panel(action: ReviewsAction) -> Self {
        Self::Reviews(ReviewsPanelAction::Panel(action))
    }
}
