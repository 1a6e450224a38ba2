//! GitHub API data transfer objects
//!
//! These types represent the review data returned from the GitHub GraphQL API.
//! They are intentionally separate from application domain models
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user, bot or organization that authored something
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// GitHub login
    pub login: String,

    /// Profile URL
    #[serde(default)]
    pub url: Option<String>,
}

/// State of a pull request review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Not submitted yet; only its author can see it
    Pending,
    /// General feedback without explicit approval
    Commented,
    /// Approved the changes
    Approved,
    /// Requested changes
    ChangesRequested,
    /// Dismissed by a maintainer
    Dismissed,
}

/// Emoji reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
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

/// Number of reactions of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionGroup {
    pub content: ReactionContent,
    pub count: u32,
}

/// A top-level pull request review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// GraphQL node ID
    pub id: String,

    /// Review author (None for deleted accounts)
    pub author: Option<Actor>,

    /// Review state
    pub state: ReviewState,

    /// Review body (markdown)
    pub body: String,

    /// When the review was submitted (None while pending)
    pub submitted_at: Option<DateTime<Utc>>,

    /// Review permalink
    pub url: Option<String>,

    /// Reaction counts
    pub reactions: Vec<ReactionGroup>,
}

/// Whether a review comment has been submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewCommentState {
    /// Part of a pending review
    Pending,
    /// Visible to everyone
    #[default]
    Submitted,
}

/// An inline review comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// GraphQL node ID
    pub id: String,

    /// Comment author (None for deleted accounts)
    pub author: Option<Actor>,

    /// Rendered HTML body
    pub body_html: String,

    /// Markdown body
    pub body: String,

    /// File path relative to repository root
    pub path: String,

    /// Diff position (None when the line is no longer in the diff)
    pub position: Option<u32>,

    /// Whether the comment was hidden by a moderator
    pub is_minimized: bool,

    /// Pending or submitted
    pub state: ReviewCommentState,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// Comment permalink
    pub url: String,

    /// Reaction counts
    pub reactions: Vec<ReactionGroup>,
}

/// A review thread: a root comment and its replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewThread {
    /// GraphQL node ID
    pub id: String,

    /// Whether the thread was resolved
    pub is_resolved: bool,

    /// Who resolved the thread
    pub resolved_by: Option<Actor>,

    /// Root comment first, then replies
    pub comments: Vec<ReviewComment>,
}

/// Everything the reviews panel needs for one pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviews {
    /// GraphQL node ID of the pull request
    pub pull_request_id: String,

    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// PR URL for opening in browser
    pub url: String,

    /// HEAD commit SHA
    pub head_sha: String,

    /// Base commit SHA
    pub base_sha: String,

    /// The viewer's own pending review, if one is in progress
    pub viewer_pending_review_id: Option<String>,

    /// Top-level reviews, oldest first
    pub reviews: Vec<Review>,

    /// Review threads
    pub threads: Vec<ReviewThread>,
}

impl PullRequestReviews {
    /// Identifiers needed to post review comments
    pub fn review_context(&self) -> ReviewContext {
        ReviewContext {
            pull_request_id: self.pull_request_id.clone(),
            head_sha: self.head_sha.clone(),
            pending_review_id: self.viewer_pending_review_id.clone(),
        }
    }
}

/// Identifiers needed to post a review comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContext {
    /// GraphQL node ID of the pull request
    pub pull_request_id: String,

    /// Commit the comment is made against
    pub head_sha: String,

    /// The viewer's pending review, if any. Replies join it instead of
    /// being posted on their own.
    pub pending_review_id: Option<String>,
}

/// Input of the `addPullRequestReviewComment` mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPullRequestReviewCommentInput {
    /// The review the comment is added to
    pub pull_request_review_id: String,

    /// Commit the comment is made against
    #[serde(rename = "commitOID", skip_serializing_if = "Option::is_none")]
    pub commit_oid: Option<String>,

    /// Comment body (markdown)
    pub body: String,

    /// File path (new comments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Diff position (new comments only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// Comment being replied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,

    /// Client-chosen id echoed back by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_mutation_id: Option<String>,
}

impl AddPullRequestReviewCommentInput {
    /// Input for a reply to `in_reply_to`, tagged with a fresh client mutation id
    pub fn reply(
        pull_request_review_id: impl Into<String>,
        in_reply_to: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            pull_request_review_id: pull_request_review_id.into(),
            commit_oid: None,
            body: body.into(),
            path: None,
            position: None,
            in_reply_to: Some(in_reply_to.into()),
            client_mutation_id: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// The comment created by `addPullRequestReviewComment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedReviewComment {
    pub id: String,
    pub author: Option<Actor>,
    #[serde(rename = "bodyHTML")]
    pub body_html: String,
    pub is_minimized: bool,
    pub viewer_can_react: bool,
    pub path: String,
    pub position: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub last_edited_at: Option<DateTime<Utc>>,
    pub url: String,
}
