//! Reviews panel actions
//!
//! Wraps the panel's semantic actions and carries fetch/post results back
//! into state.

use gh_client::ReviewContext;
use gh_review_threads::model::ThreadId;
use gh_review_threads::{ReviewData, ReviewsAction};

/// Everything produced by one fetch of the pull request
#[derive(Debug, Clone)]
pub struct LoadedReviews {
    pub data: ReviewData,
    pub title: String,
    pub url: String,
    /// Identifiers needed to post replies
    pub context: ReviewContext,
}

#[derive(Debug, Clone)]
pub enum ReviewsPanelAction {
    /// Semantic action handled by the panel state
    Panel(ReviewsAction),

    /// A fetch has started
    LoadStart,
    /// Fresh data arrived
    Loaded(Box<LoadedReviews>),
    /// Fetching failed
    LoadError(String),

    /// The in-flight reply was posted
    ReplySucceeded { thread_id: ThreadId },
    /// The in-flight reply failed; the draft is restored
    ReplyFailed { thread_id: ThreadId, error: String },

    /// Resolving/unresolving a thread failed
    MutationFailed(String),
    /// Hide the error line
    DismissError,
}
