//! Events emitted by the reviews panel for the parent application to handle.

use crate::issueish::IssueishLink;
use crate::model::{CommentId, ThreadId};
use crate::state::Section;

/// A reply ready to be posted.
///
/// Replies are threaded onto the last comment of the thread (`in_reply_to`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub body: String,
    pub thread_id: ThreadId,
    pub last_comment_id: CommentId,
    pub path: String,
    pub position: Option<u32>,
}

/// Events emitted by the reviews panel.
///
/// The panel never performs side effects. The parent application opens
/// editors and browsers, talks to GitHub, and reports results back through
/// [`ReviewsPanelState::reply_succeeded`] / [`ReviewsPanelState::reply_failed`]
/// or fresh data via [`ReviewsPanelState::set_data`].
///
/// [`ReviewsPanelState::reply_succeeded`]: crate::state::ReviewsPanelState::reply_succeeded
/// [`ReviewsPanelState::reply_failed`]: crate::state::ReviewsPanelState::reply_failed
/// [`ReviewsPanelState::set_data`]: crate::state::ReviewsPanelState::set_data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewsEvent {
    /// Open a file of the working copy at a line.
    OpenFile { path: String, line: u32 },
    /// Show the pull request diff at a diff position.
    OpenDiff { path: String, position: u32 },
    /// Open an issue or pull request referenced from a comment.
    OpenIssueish(IssueishLink),
    /// Open a URL (comment or review permalink) in the browser.
    OpenUrl(String),
    /// A section was collapsed or expanded.
    SectionToggled { section: Section, open: bool },
    /// A thread was collapsed or expanded.
    ThreadToggled { thread_id: ThreadId, open: bool },
    /// Mark a thread resolved. Fire-and-forget.
    ResolveThread { thread_id: ThreadId },
    /// Mark a thread unresolved. Fire-and-forget.
    UnresolveThread { thread_id: ThreadId },
    /// Post a reply.
    SubmitReply(ReplyRequest),
    /// Fetch fresh data.
    Refresh,
    /// The panel should be closed.
    Close,
}
