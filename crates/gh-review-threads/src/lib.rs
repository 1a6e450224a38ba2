//! # gh-review-threads
//!
//! A standalone Reviews panel for GitHub pull requests: review summaries,
//! threaded inline comments, reply composition and thread resolution.
//!
//! ## Design Principles
//!
//! Like a widget fed by props, this crate is **instrumented**: it receives the
//! fetched review data and emits [`ReviewsEvent`]s instead of calling an API.
//! Fetching, posting replies and resolving threads belong to the orchestrating
//! application, which reports completion back into [`ReviewsPanelState`].
//!
//! The two pieces with real logic are:
//!
//! - the position translator ([`translate`]), which maps a review comment's
//!   diff position through precomputed [`CommentTranslations`] to a line in
//!   the current file, and
//! - the aggregation helpers ([`aggregate`]), which filter summaries, count
//!   resolved threads and derive per-thread display data.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gh_review_threads::{
//!     parse_unified_diff, CommentTranslations, ReviewData, ReviewsAction, ReviewsPanelState,
//! };
//!
//! let diff = parse_unified_diff(diff_text, base_oid, head_oid)?;
//! let translations = CommentTranslations::from_diff(&diff, |_path| None);
//!
//! let mut state = ReviewsPanelState::default();
//! state.set_data(ReviewData {
//!     summaries,
//!     threads,
//!     translations: Some(translations),
//!     diff: Some(diff),
//!     is_checked_out: false,
//! });
//!
//! for event in state.handle_action(ReviewsAction::OpenFileAtCursor) {
//!     // Process ReviewsEvent (open the editor, post a reply, resolve a thread)
//! }
//! ```

pub mod action;
pub mod aggregate;
pub mod event;
#[cfg(feature = "github")]
pub mod github;
pub mod issueish;
pub mod model;
pub mod parser;
pub mod state;
pub mod traits;
pub mod translate;
pub mod widget;

// Re-export commonly used types
pub use action::ReviewsAction;
pub use aggregate::{filter_summaries, ThreadProgress, ThreadView};
pub use event::{ReplyRequest, ReviewsEvent};
pub use issueish::{IssueishKind, IssueishLink};
pub use model::{
    Author, Comment, CommentState, CommentTranslationTable, CommentTranslations, DiffLine,
    FileDiff, Hunk, LineKind, PullRequestDiff, ReactionContent, ReactionGroup, ReviewState,
    ReviewSummary, ReviewThread,
};
pub use parser::parse_unified_diff;
pub use state::{ReplyDraft, ReviewData, ReviewsPanelState, Section};
pub use traits::{DefaultTheme, ReviewActionError, ReviewActions, ThemeProvider};
pub use translate::{translate, TranslatedPosition, TranslationError};
pub use widget::{FooterHint, ReviewsPanel};
