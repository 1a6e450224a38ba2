//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy.

use crate::types::{
    AddPullRequestReviewCommentInput, AddedReviewComment, PullRequestReviews, ReviewContext,
};
use async_trait::async_trait;
use log::{debug, warn};

/// GitHub API client trait
///
/// Defines the interface for reading review data and performing review
/// mutations. Implementations can be direct (hitting the API) or test doubles.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::GitHubClient;
///
/// async fn unresolved(client: &dyn GitHubClient) -> anyhow::Result<usize> {
///     let reviews = client.fetch_reviews("rust-lang", "rust", 12345).await?;
///     Ok(reviews.threads.iter().filter(|t| !t.is_resolved).count())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch reviews, review threads and their comments for a pull request
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequestReviews>;

    /// Fetch the unified diff of a pull request
    ///
    /// Review comment positions are counted over this diff.
    async fn fetch_diff(&self, owner: &str, repo: &str, pr_number: u64) -> anyhow::Result<String>;

    /// Add a comment to a review (`addPullRequestReviewComment`)
    async fn add_review_comment(
        &self,
        input: AddPullRequestReviewCommentInput,
    ) -> anyhow::Result<AddedReviewComment>;

    /// Start a pending review on a pull request
    ///
    /// # Returns
    ///
    /// The node ID of the new review
    async fn start_review(&self, pull_request_id: &str, commit_sha: &str)
        -> anyhow::Result<String>;

    /// Submit a pending review as a comment review
    async fn submit_review(&self, review_id: &str) -> anyhow::Result<()>;

    /// Delete a pending review and the comments it holds
    async fn delete_review(&self, review_id: &str) -> anyhow::Result<()>;

    /// Mark a review thread as resolved
    ///
    /// # Returns
    ///
    /// The thread's resolution state as reported back by GitHub
    async fn resolve_thread(&self, thread_id: &str) -> anyhow::Result<bool>;

    /// Mark a review thread as unresolved
    async fn unresolve_thread(&self, thread_id: &str) -> anyhow::Result<bool>;

    /// Reply to a review comment
    ///
    /// The reply joins the viewer's pending review when there is one, so it
    /// stays pending until that review is submitted. Otherwise a review is
    /// started, the reply added, and the review submitted right away. A review
    /// started here is deleted again when adding or submitting fails.
    async fn post_reply(
        &self,
        context: &ReviewContext,
        in_reply_to: &str,
        body: &str,
    ) -> anyhow::Result<AddedReviewComment> {
        let (review_id, started) = match &context.pending_review_id {
            Some(id) => (id.clone(), false),
            None => {
                let id = self
                    .start_review(&context.pull_request_id, &context.head_sha)
                    .await?;
                (id, true)
            }
        };

        debug!(
            "Posting reply to {} in review {} (new review: {})",
            in_reply_to, review_id, started
        );
        let input = AddPullRequestReviewCommentInput::reply(&review_id, in_reply_to, body);
        if !started {
            return self.add_review_comment(input).await;
        }

        let result = match self.add_review_comment(input).await {
            Ok(comment) => self.submit_review(&review_id).await.map(|_| comment),
            Err(e) => Err(e),
        };
        if result.is_err() {
            if let Err(e) = self.delete_review(&review_id).await {
                warn!("Failed to delete pending review {}: {}", review_id, e);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<String>>,
        fail_add: bool,
        fail_submit: bool,
    }

    impl RecordingClient {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GitHubClient for RecordingClient {
        async fn fetch_reviews(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
        ) -> anyhow::Result<PullRequestReviews> {
            anyhow::bail!("not used")
        }

        async fn fetch_diff(&self, _: &str, _: &str, _: u64) -> anyhow::Result<String> {
            anyhow::bail!("not used")
        }

        async fn add_review_comment(
            &self,
            input: AddPullRequestReviewCommentInput,
        ) -> anyhow::Result<AddedReviewComment> {
            self.record(format!(
                "add:{}:{}",
                input.pull_request_review_id,
                input.in_reply_to.clone().unwrap_or_default()
            ));
            if self.fail_add {
                anyhow::bail!("HTTP 502");
            }
            Ok(AddedReviewComment {
                id: "PRRC_new".to_string(),
                author: None,
                body_html: input.body,
                is_minimized: false,
                viewer_can_react: true,
                path: "src/lib.rs".to_string(),
                position: None,
                created_at: Utc::now(),
                last_edited_at: None,
                url: String::new(),
            })
        }

        async fn start_review(&self, pull_request_id: &str, _: &str) -> anyhow::Result<String> {
            self.record(format!("start:{}", pull_request_id));
            Ok("PRR_new".to_string())
        }

        async fn submit_review(&self, review_id: &str) -> anyhow::Result<()> {
            self.record(format!("submit:{}", review_id));
            if self.fail_submit {
                anyhow::bail!("HTTP 502");
            }
            Ok(())
        }

        async fn delete_review(&self, review_id: &str) -> anyhow::Result<()> {
            self.record(format!("delete:{}", review_id));
            Ok(())
        }

        async fn resolve_thread(&self, _: &str) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn unresolve_thread(&self, _: &str) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_reply_without_pending_review_starts_and_submits() {
        let client = RecordingClient::default();
        let context = ReviewContext {
            pull_request_id: "PR_1".to_string(),
            head_sha: "head".to_string(),
            pending_review_id: None,
        };

        let comment = client.post_reply(&context, "PRRC_1", "Thanks").await.unwrap();
        assert_eq!(comment.id, "PRRC_new");
        assert_eq!(
            client.calls(),
            vec!["start:PR_1", "add:PRR_new:PRRC_1", "submit:PRR_new"]
        );
    }

    #[tokio::test]
    async fn test_failed_reply_deletes_started_review() {
        let client = RecordingClient {
            fail_add: true,
            ..Default::default()
        };
        let context = ReviewContext {
            pull_request_id: "PR_1".to_string(),
            head_sha: "head".to_string(),
            pending_review_id: None,
        };

        let err = client.post_reply(&context, "PRRC_1", "Thanks").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(
            client.calls(),
            vec!["start:PR_1", "add:PRR_new:PRRC_1", "delete:PRR_new"]
        );
    }

    #[tokio::test]
    async fn test_failed_submit_deletes_started_review() {
        let client = RecordingClient {
            fail_submit: true,
            ..Default::default()
        };
        let context = ReviewContext {
            pull_request_id: "PR_1".to_string(),
            head_sha: "head".to_string(),
            pending_review_id: None,
        };

        assert!(client.post_reply(&context, "PRRC_1", "Thanks").await.is_err());
        assert_eq!(
            client.calls(),
            vec![
                "start:PR_1",
                "add:PRR_new:PRRC_1",
                "submit:PRR_new",
                "delete:PRR_new"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_existing_pending_review() {
        let client = RecordingClient {
            fail_add: true,
            ..Default::default()
        };
        let context = ReviewContext {
            pull_request_id: "PR_1".to_string(),
            head_sha: "head".to_string(),
            pending_review_id: Some("PRR_pending".to_string()),
        };

        assert!(client.post_reply(&context, "PRRC_1", "Thanks").await.is_err());
        assert_eq!(client.calls(), vec!["add:PRR_pending:PRRC_1"]);
    }

    #[tokio::test]
    async fn test_reply_joins_pending_review() {
        let client = RecordingClient::default();
        let context = ReviewContext {
            pull_request_id: "PR_1".to_string(),
            head_sha: "head".to_string(),
            pending_review_id: Some("PRR_pending".to_string()),
        };

        client.post_reply(&context, "PRRC_1", "Thanks").await.unwrap();
        assert_eq!(client.calls(), vec!["add:PRR_pending:PRRC_1"]);
    }
}
