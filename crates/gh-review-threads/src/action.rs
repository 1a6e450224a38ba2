//! Reviews panel actions
//!
//! Semantic actions the panel state understands. The orchestrating application
//! maps key events to these and dispatches them to [`ReviewsPanelState`].
//!
//! [`ReviewsPanelState`]: crate::state::ReviewsPanelState

use crate::model::ThreadId;
use crate::state::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewsAction {
    // === Navigation ===
    /// Move the cursor to the next row
    CursorDown,
    /// Move the cursor to the previous row
    CursorUp,
    /// Move to the first row
    CursorFirst,
    /// Move to the last row
    CursorLast,
    /// Jump to the next thread header
    NextThread,
    /// Jump to the previous thread header
    PrevThread,

    // === Open/closed state ===
    /// Toggle whatever the cursor is on (section or thread)
    ToggleAtCursor,
    /// Collapse or expand a section
    ToggleSection(Section),
    /// Collapse or expand a thread
    ToggleThread(ThreadId),
    /// Expand every thread
    ExpandAll,
    /// Collapse every thread
    CollapseAll,
    /// Highlight a thread (it stays expanded while highlighted) and move to it
    HighlightThread(ThreadId),
    /// Remove the highlight
    ClearHighlight,

    // === Thread actions ===
    /// Resolve or unresolve the thread under the cursor
    ToggleResolveAtCursor,
    /// Open the commented file at the translated line
    OpenFileAtCursor,
    /// Open the commented position in the diff
    OpenDiffAtCursor,
    /// Open the first issue or pull request linked from the focused comment
    OpenLinkAtCursor,
    /// Open the focused comment (or review) in the browser
    OpenPermalinkAtCursor,

    // === Replying ===
    /// Start or continue a reply to the thread under the cursor
    StartReply,
    /// Insert a character into the reply draft
    ReplyInsertChar(char),
    /// Delete character before the cursor in the reply draft
    ReplyBackspace,
    /// Delete character at the cursor in the reply draft
    ReplyDelete,
    /// Move the draft cursor left
    ReplyCursorLeft,
    /// Move the draft cursor right
    ReplyCursorRight,
    /// Move the draft cursor to the start of the line
    ReplyCursorHome,
    /// Move the draft cursor to the end of the line
    ReplyCursorEnd,
    /// Insert a newline into the reply draft
    ReplyNewline,
    /// Post the reply
    SubmitReply,
    /// Stop editing; the draft text is kept
    CancelReply,

    // === General ===
    /// Fetch fresh review data
    Refresh,
    /// Close the panel
    Close,
    /// Set the viewport height (for scroll calculations)
    SetViewport { width: u16, height: u16 },
}

impl ReviewsAction {
    /// Whether this action is only meaningful while a reply is being edited.
    pub fn is_reply_action(&self) -> bool {
        matches!(
            self,
            ReviewsAction::ReplyInsertChar(_)
                | ReviewsAction::ReplyBackspace
                | ReviewsAction::ReplyDelete
                | ReviewsAction::ReplyCursorLeft
                | ReviewsAction::ReplyCursorRight
                | ReviewsAction::ReplyCursorHome
                | ReviewsAction::ReplyCursorEnd
                | ReviewsAction::ReplyNewline
                | ReviewsAction::SubmitReply
                | ReviewsAction::CancelReply
        )
    }

    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            ReviewsAction::CursorDown
                | ReviewsAction::CursorUp
                | ReviewsAction::CursorFirst
                | ReviewsAction::CursorLast
                | ReviewsAction::NextThread
                | ReviewsAction::PrevThread
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_reply_action() {
        assert!(ReviewsAction::ReplyInsertChar('a').is_reply_action());
        assert!(ReviewsAction::SubmitReply.is_reply_action());
        assert!(!ReviewsAction::StartReply.is_reply_action());
        assert!(!ReviewsAction::CursorDown.is_reply_action());
    }

    #[test]
    fn test_is_navigation() {
        assert!(ReviewsAction::NextThread.is_navigation());
        assert!(!ReviewsAction::Refresh.is_navigation());
    }
}
