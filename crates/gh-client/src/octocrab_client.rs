//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! Review data goes through GraphQL; the diff comes from the REST API.

use crate::client::GitHubClient;
use crate::graphql::{
    self, AddCommentData, AddReviewData, DeleteReviewData, GraphQLRequest, GraphQLResponse,
    ResolveData, ReviewsData, SubmitReviewData, UnresolveData, ADD_PULL_REQUEST_REVIEW,
    ADD_PULL_REQUEST_REVIEW_COMMENT, DELETE_PULL_REQUEST_REVIEW, PULL_REQUEST_REVIEWS,
    RESOLVE_REVIEW_THREAD, SUBMIT_PULL_REQUEST_REVIEW, UNRESOLVE_REVIEW_THREAD,
};
use crate::types::{AddPullRequestReviewCommentInput, AddedReviewComment, PullRequestReviews};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// Run a GraphQL operation and decode its data
    async fn graphql<T: DeserializeOwned>(&self, request: &GraphQLRequest) -> anyhow::Result<T> {
        let response: serde_json::Value = self
            .octocrab
            .graphql(request)
            .await
            .context("GraphQL request failed")?;
        let response: GraphQLResponse<T> =
            serde_json::from_value(response).context("Failed to parse GraphQL response")?;
        response.into_result()
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequestReviews> {
        debug!("Fetching reviews for {}/{}#{}", owner, repo, pr_number);

        let request =
            PULL_REQUEST_REVIEWS.request(graphql::reviews_variables(owner, repo, pr_number));
        let data: ReviewsData = self.graphql(&request).await?;
        let reviews = data.into_reviews(owner, repo)?;

        debug!(
            "Fetched {} reviews and {} threads for {}/{}#{}",
            reviews.reviews.len(),
            reviews.threads.len(),
            owner,
            repo,
            pr_number
        );
        Ok(reviews)
    }

    async fn fetch_diff(&self, owner: &str, repo: &str, pr_number: u64) -> anyhow::Result<String> {
        debug!("Fetching diff for {}/{}#{}", owner, repo, pr_number);
        self.octocrab
            .pulls(owner, repo)
            .get_diff(pr_number)
            .await
            .with_context(|| format!("Failed to fetch diff for {}/{}#{}", owner, repo, pr_number))
    }

    async fn add_review_comment(
        &self,
        input: AddPullRequestReviewCommentInput,
    ) -> anyhow::Result<AddedReviewComment> {
        debug!(
            "Adding review comment to {} (operation {})",
            input.pull_request_review_id,
            ADD_PULL_REQUEST_REVIEW_COMMENT.id()
        );

        let request =
            ADD_PULL_REQUEST_REVIEW_COMMENT.request(graphql::add_comment_variables(&input));
        let data: AddCommentData = self.graphql(&request).await?;
        data.add_pull_request_review_comment
            .and_then(|payload| payload.comment)
            .ok_or_else(|| anyhow!("No comment returned from addPullRequestReviewComment"))
    }

    async fn start_review(
        &self,
        pull_request_id: &str,
        commit_sha: &str,
    ) -> anyhow::Result<String> {
        debug!("Starting review on {}", pull_request_id);

        let request = ADD_PULL_REQUEST_REVIEW.request(serde_json::json!({
            "pullRequestId": pull_request_id,
            "commitOID": commit_sha,
        }));
        let data: AddReviewData = self.graphql(&request).await?;
        data.add_pull_request_review
            .and_then(|payload| payload.pull_request_review)
            .map(|review| review.id)
            .ok_or_else(|| anyhow!("No review returned from addPullRequestReview"))
    }

    async fn submit_review(&self, review_id: &str) -> anyhow::Result<()> {
        debug!("Submitting review {}", review_id);

        let request =
            SUBMIT_PULL_REQUEST_REVIEW.request(serde_json::json!({ "reviewId": review_id }));
        let data: SubmitReviewData = self.graphql(&request).await?;
        data.submit_pull_request_review
            .and_then(|payload| payload.pull_request_review)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No review returned from submitPullRequestReview"))
    }

    async fn delete_review(&self, review_id: &str) -> anyhow::Result<()> {
        debug!("Deleting review {}", review_id);

        let request =
            DELETE_PULL_REQUEST_REVIEW.request(serde_json::json!({ "reviewId": review_id }));
        let data: DeleteReviewData = self.graphql(&request).await?;
        data.delete_pull_request_review
            .and_then(|payload| payload.pull_request_review)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No review returned from deletePullRequestReview"))
    }

    async fn resolve_thread(&self, thread_id: &str) -> anyhow::Result<bool> {
        debug!("Resolving thread {}", thread_id);

        let request = RESOLVE_REVIEW_THREAD.request(serde_json::json!({ "threadId": thread_id }));
        let data: ResolveData = self.graphql(&request).await?;
        data.resolve_review_thread
            .and_then(|payload| payload.thread)
            .map(|thread| thread.is_resolved)
            .ok_or_else(|| anyhow!("No thread returned from resolveReviewThread"))
    }

    async fn unresolve_thread(&self, thread_id: &str) -> anyhow::Result<bool> {
        debug!("Unresolving thread {}", thread_id);

        let request =
            UNRESOLVE_REVIEW_THREAD.request(serde_json::json!({ "threadId": thread_id }));
        let data: UnresolveData = self.graphql(&request).await?;
        data.unresolve_review_thread
            .and_then(|payload| payload.thread)
            .map(|thread| thread.is_resolved)
            .ok_or_else(|| anyhow!("No thread returned from unresolveReviewThread"))
    }
}
