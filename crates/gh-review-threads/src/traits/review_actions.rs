//! Trait for performing the mutations the panel requests.

use crate::event::ReplyRequest;
use crate::model::CommentId;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while replying or changing thread resolution.
#[derive(Debug, Error)]
pub enum ReviewActionError {
    /// Failed to post the reply.
    #[error("Failed to post reply: {0}")]
    PostFailed(String),

    /// Failed to resolve or unresolve the thread.
    #[error("Failed to update thread {thread_id}: {message}")]
    ResolveFailed { thread_id: String, message: String },

    /// The action handler is not available.
    #[error("Review actions unavailable: {0}")]
    Unavailable(String),
}

/// Performs the mutations behind [`ReviewsEvent`]s.
///
/// The panel itself never calls this; the orchestrating application does,
/// then reports the outcome back into the panel state.
///
/// [`ReviewsEvent`]: crate::event::ReviewsEvent
///
/// # Example
///
/// ```ignore
/// match event {
///     ReviewsEvent::SubmitReply(request) => {
///         let thread_id = request.thread_id.clone();
///         match actions.post_reply(request).await {
///             Ok(_) => state.reply_succeeded(&thread_id),
///             Err(e) => state.reply_failed(&thread_id, &e.to_string()),
///         };
///     }
///     ReviewsEvent::ResolveThread { thread_id } => {
///         // Fire-and-forget; the next refresh shows the outcome
///         let _ = actions.resolve_thread(&thread_id).await;
///     }
///     _ => {}
/// }
/// ```
#[async_trait]
pub trait ReviewActions: Send + Sync {
    /// Post a reply to the last comment of a thread.
    ///
    /// # Returns
    /// The ID of the created comment on success.
    async fn post_reply(&self, request: ReplyRequest) -> Result<CommentId, ReviewActionError>;

    /// Mark a thread as resolved.
    async fn resolve_thread(&self, thread_id: &str) -> Result<(), ReviewActionError>;

    /// Mark a thread as unresolved.
    async fn unresolve_thread(&self, thread_id: &str) -> Result<(), ReviewActionError>;
}
