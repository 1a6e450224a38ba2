//! Review summaries, threads and comments.
//!
//! These are read-only projections of the fetched GraphQL read model.
//! Mutations (replying, resolving) are requested through events, never applied here.

use chrono::{DateTime, Utc};

/// GraphQL node id of a review thread.
pub type ThreadId = String;
/// GraphQL node id of a review comment.
pub type CommentId = String;
/// GraphQL node id of a pull request review.
pub type ReviewId = String;

/// The author of a review or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// GitHub login.
    pub login: String,
    /// Profile URL.
    pub url: Option<String>,
}

impl Author {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            url: None,
        }
    }

    /// Login to show for an optional author (deleted accounts become "ghost").
    pub fn display_login(author: Option<&Author>) -> &str {
        author.map(|a| a.login.as_str()).unwrap_or("ghost")
    }
}

/// State of a submitted (or not yet submitted) review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Not yet submitted; only visible to its author.
    Pending,
    /// Left comments without approving or rejecting.
    Commented,
    Approved,
    ChangesRequested,
    Dismissed,
}

/// Emoji reaction kinds supported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionContent {
    ThumbsUp,
    ThumbsDown,
    Laugh,
    Hooray,
    Confused,
    Heart,
    Rocket,
    Eyes,
}

impl ReactionContent {
    pub fn emoji(&self) -> &'static str {
        match self {
            ReactionContent::ThumbsUp => "👍",
            ReactionContent::ThumbsDown => "👎",
            ReactionContent::Laugh => "😆",
            ReactionContent::Hooray => "🎉",
            ReactionContent::Confused => "😕",
            ReactionContent::Heart => "❤️",
            ReactionContent::Rocket => "🚀",
            ReactionContent::Eyes => "👀",
        }
    }
}

/// Number of reactions of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionGroup {
    pub content: ReactionContent,
    pub count: u32,
}

/// A top-level review (the summary shown in the "Reviews" section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub id: ReviewId,
    pub author: Option<Author>,
    pub state: ReviewState,
    /// Review body as plain text.
    pub body: String,
    /// When the review was submitted (None while pending).
    pub submitted_at: Option<DateTime<Utc>>,
    pub reactions: Vec<ReactionGroup>,
}

/// Whether a comment belongs to a submitted review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentState {
    /// Part of a review that has not been submitted yet.
    Pending,
    #[default]
    Submitted,
}

/// A single inline review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: Option<Author>,
    /// Rendered HTML body, as delivered by the API.
    pub body_html: String,
    /// Markdown source body, used for terminal rendering and link extraction.
    pub body_text: String,
    /// File path the comment is anchored to.
    pub path: String,
    /// Diff position; None when the line is no longer part of the diff.
    pub position: Option<u32>,
    pub is_minimized: bool,
    pub state: CommentState,
    pub created_at: DateTime<Utc>,
    /// Permalink.
    pub url: String,
    pub reactions: Vec<ReactionGroup>,
}

impl Comment {
    pub fn is_pending(&self) -> bool {
        self.state == CommentState::Pending
    }
}

/// A root comment plus its ordered replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewThread {
    pub id: ThreadId,
    pub is_resolved: bool,
    pub resolved_by: Option<Author>,
    /// Root comment first, then replies in conversation order.
    pub comments: Vec<Comment>,
}

impl ReviewThread {
    /// The comment that opened the thread.
    pub fn root(&self) -> Option<&Comment> {
        self.comments.first()
    }

    /// The most recent comment; replies are addressed to it.
    pub fn last(&self) -> Option<&Comment> {
        self.comments.last()
    }

    /// Whether any comment in the thread is part of an unsubmitted review.
    pub fn has_pending_comments(&self) -> bool {
        self.comments.iter().any(Comment::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: Some(Author::new("octocat")),
            body_html: String::new(),
            body_text: String::new(),
            path: "src/lib.rs".to_string(),
            position: Some(1),
            is_minimized: false,
            state: CommentState::Submitted,
            created_at: Utc::now(),
            url: String::new(),
            reactions: Vec::new(),
        }
    }

    #[test]
    fn test_root_and_last() {
        let thread = ReviewThread {
            id: "t1".to_string(),
            is_resolved: false,
            resolved_by: None,
            comments: vec![comment("c1"), comment("c2"), comment("c3")],
        };

        assert_eq!(thread.root().map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(thread.last().map(|c| c.id.as_str()), Some("c3"));
        assert!(!thread.has_pending_comments());
    }

    #[test]
    fn test_ghost_author() {
        assert_eq!(Author::display_login(None), "ghost");
        let author = Author::new("hubot");
        assert_eq!(Author::display_login(Some(&author)), "hubot");
    }
}
