//! GitHub integration via [`gh_client`].
//!
//! Converts the API's read model into panel models and implements
//! [`ReviewActions`] on top of a [`GitHubClient`].

use crate::event::ReplyRequest;
use crate::model::{
    Author, Comment, CommentId, CommentState, CommentTranslations, PullRequestDiff,
    ReactionContent, ReactionGroup, ReviewState, ReviewSummary, ReviewThread,
};
use crate::state::ReviewData;
use crate::traits::{ReviewActionError, ReviewActions};
use async_trait::async_trait;
use gh_client::{GitHubClient, PullRequestReviews, ReviewContext};
use std::sync::Arc;

impl From<gh_client::Actor> for Author {
    fn from(actor: gh_client::Actor) -> Self {
        Self {
            login: actor.login,
            url: actor.url,
        }
    }
}

impl From<gh_client::ReviewState> for ReviewState {
    fn from(state: gh_client::ReviewState) -> Self {
        match state {
            gh_client::ReviewState::Pending => ReviewState::Pending,
            gh_client::ReviewState::Commented => ReviewState::Commented,
            gh_client::ReviewState::Approved => ReviewState::Approved,
            gh_client::ReviewState::ChangesRequested => ReviewState::ChangesRequested,
            gh_client::ReviewState::Dismissed => ReviewState::Dismissed,
        }
    }
}

impl From<gh_client::ReactionContent> for ReactionContent {
    fn from(content: gh_client::ReactionContent) -> Self {
        match content {
            gh_client::ReactionContent::ThumbsUp => ReactionContent::ThumbsUp,
            gh_client::ReactionContent::ThumbsDown => ReactionContent::ThumbsDown,
            gh_client::ReactionContent::Laugh => ReactionContent::Laugh,
            gh_client::ReactionContent::Hooray => ReactionContent::Hooray,
            gh_client::ReactionContent::Confused => ReactionContent::Confused,
            gh_client::ReactionContent::Heart => ReactionContent::Heart,
            gh_client::ReactionContent::Rocket => ReactionContent::Rocket,
            gh_client::ReactionContent::Eyes => ReactionContent::Eyes,
        }
    }
}

impl From<gh_client::ReactionGroup> for ReactionGroup {
    fn from(group: gh_client::ReactionGroup) -> Self {
        Self {
            content: group.content.into(),
            count: group.count,
        }
    }
}

impl From<gh_client::ReviewCommentState> for CommentState {
    fn from(state: gh_client::ReviewCommentState) -> Self {
        match state {
            gh_client::ReviewCommentState::Pending => CommentState::Pending,
            gh_client::ReviewCommentState::Submitted => CommentState::Submitted,
        }
    }
}

impl From<gh_client::Review> for ReviewSummary {
    fn from(review: gh_client::Review) -> Self {
        Self {
            id: review.id,
            author: review.author.map(Into::into),
            state: review.state.into(),
            body: review.body,
            submitted_at: review.submitted_at,
            reactions: review.reactions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<gh_client::ReviewComment> for Comment {
    fn from(comment: gh_client::ReviewComment) -> Self {
        Self {
            id: comment.id,
            author: comment.author.map(Into::into),
            body_html: comment.body_html,
            body_text: comment.body,
            path: comment.path,
            position: comment.position,
            is_minimized: comment.is_minimized,
            state: comment.state.into(),
            created_at: comment.created_at,
            url: comment.url,
            reactions: comment.reactions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<gh_client::ReviewThread> for ReviewThread {
    fn from(thread: gh_client::ReviewThread) -> Self {
        Self {
            id: thread.id,
            is_resolved: thread.is_resolved,
            resolved_by: thread.resolved_by.map(Into::into),
            comments: thread.comments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Assemble panel data from a fetch result and locally computed tables.
pub fn review_data(
    reviews: PullRequestReviews,
    translations: Option<CommentTranslations>,
    diff: Option<PullRequestDiff>,
    is_checked_out: bool,
) -> ReviewData {
    ReviewData {
        summaries: reviews.reviews.into_iter().map(Into::into).collect(),
        threads: reviews.threads.into_iter().map(Into::into).collect(),
        translations,
        diff,
        is_checked_out,
    }
}

/// [`ReviewActions`] backed by the GitHub API.
#[derive(Clone)]
pub struct GitHubReviewActions {
    client: Arc<dyn GitHubClient>,
    context: ReviewContext,
}

impl GitHubReviewActions {
    pub fn new(client: Arc<dyn GitHubClient>, context: ReviewContext) -> Self {
        Self { client, context }
    }
}

#[async_trait]
impl ReviewActions for GitHubReviewActions {
    async fn post_reply(&self, request: ReplyRequest) -> Result<CommentId, ReviewActionError> {
        let comment = self
            .client
            .post_reply(&self.context, &request.last_comment_id, &request.body)
            .await
            .map_err(|e| ReviewActionError::PostFailed(format!("{e:#}")))?;
        log::info!(
            "Posted reply {} to thread {}",
            comment.id,
            request.thread_id
        );
        Ok(comment.id)
    }

    async fn resolve_thread(&self, thread_id: &str) -> Result<(), ReviewActionError> {
        let resolved = self
            .client
            .resolve_thread(thread_id)
            .await
            .map_err(|e| ReviewActionError::ResolveFailed {
                thread_id: thread_id.to_string(),
                message: format!("{e:#}"),
            })?;
        if !resolved {
            log::warn!("Thread {} still unresolved after resolve", thread_id);
        }
        Ok(())
    }

    async fn unresolve_thread(&self, thread_id: &str) -> Result<(), ReviewActionError> {
        let resolved = self
            .client
            .unresolve_thread(thread_id)
            .await
            .map_err(|e| ReviewActionError::ResolveFailed {
                thread_id: thread_id.to_string(),
                message: format!("{e:#}"),
            })?;
        if resolved {
            log::warn!("Thread {} still resolved after unresolve", thread_id);
        }
        Ok(())
    }
}
