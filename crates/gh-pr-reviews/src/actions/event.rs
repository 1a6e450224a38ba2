//! Event types
//!
//! Events represent facts/observations that have occurred and should be broadcast
//! to the middleware chain. Unlike commands (imperative actions), events allow
//! middleware to react to what happened elsewhere in the system.
//!
//! Events are never forwarded to the reducer. The panel's own outgoing events
//! are drained from state by the main loop and re-injected as `Event::Panel`.
//!
//! ## Naming Convention
//!
//! Events use past tense or descriptive names indicating something has happened:
//! - `ClientReady` (not `InitializeClient`)
//! - `Started` (not `Start`)

use gh_review_threads::ReviewsEvent;

/// Events that re-enter the middleware chain
#[derive(Debug, Clone)]
pub enum Event {
    /// The terminal is up and the first frame was drawn
    Started,

    /// GitHub client has been initialized and is ready for API calls
    ClientReady,

    /// The reviews panel asked for a side effect
    Panel(ReviewsEvent),
}
