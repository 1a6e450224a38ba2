//! GraphQL operations and wire formats
//!
//! Operation texts live here together with the response shapes they
//! produce. Responses are decoded into the DTOs in [`crate::types`].

use crate::types::{
    Actor, AddPullRequestReviewCommentInput, AddedReviewComment, PullRequestReviews,
    ReactionContent, ReactionGroup, Review, ReviewComment, ReviewCommentState, ReviewState,
    ReviewThread,
};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error entry
#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// The data, or the joined error messages
    pub fn into_result(self) -> Result<T> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            bail!("GraphQL errors: {}", messages.join(", "));
        }
        self.data
            .ok_or_else(|| anyhow!("GraphQL response contained no data"))
    }
}

/// Kind of GraphQL operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A named GraphQL operation and its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub kind: OperationKind,
    pub text: &'static str,
}

impl OperationDescriptor {
    /// Content hash identifying the operation (SHA-256 of its text, hex)
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Build a request with the given variables
    pub fn request(&self, variables: serde_json::Value) -> GraphQLRequest {
        GraphQLRequest {
            query: self.text.to_string(),
            variables,
        }
    }
}

/// Read model: reviews, threads, comments and reactions in one round trip.
///
/// Connections are capped at 100 nodes each.
pub const PULL_REQUEST_REVIEWS: OperationDescriptor = OperationDescriptor {
    name: "PullRequestReviews",
    kind: OperationKind::Query,
    text: r#"query PullRequestReviews($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      id
      number
      title
      url
      headRefOid
      baseRefOid
      pendingReviews: reviews(first: 1, states: [PENDING]) {
        nodes { id }
      }
      reviews(first: 100) {
        nodes {
          id
          state
          body
          submittedAt
          url
          author { login url }
          reactionGroups { content reactors { totalCount } }
        }
      }
      reviewThreads(first: 100) {
        nodes {
          id
          isResolved
          resolvedBy { login url }
          comments(first: 100) {
            nodes {
              id
              body
              bodyHTML
              path
              position
              isMinimized
              state
              createdAt
              url
              author { login url }
              reactionGroups { content reactors { totalCount } }
            }
          }
        }
      }
    }
  }
}"#,
};

/// Adds a comment (or a reply, with `inReplyTo`) to a review.
pub const ADD_PULL_REQUEST_REVIEW_COMMENT: OperationDescriptor = OperationDescriptor {
    name: "AddPullRequestReviewComment",
    kind: OperationKind::Mutation,
    text: r#"mutation AddPullRequestReviewComment($input: AddPullRequestReviewCommentInput!) {
  addPullRequestReviewComment(input: $input) {
    comment {
      id
      author { login url }
      bodyHTML
      isMinimized
      viewerCanReact
      path
      position
      createdAt
      lastEditedAt
      url
    }
  }
}"#,
};

/// Starts a pending review.
pub const ADD_PULL_REQUEST_REVIEW: OperationDescriptor = OperationDescriptor {
    name: "AddPullRequestReview",
    kind: OperationKind::Mutation,
    text: r#"mutation AddPullRequestReview($pullRequestId: ID!, $commitOID: GitObjectID) {
  addPullRequestReview(input: { pullRequestId: $pullRequestId, commitOID: $commitOID }) {
    pullRequestReview { id }
  }
}"#,
};

/// Submits a pending review as a plain comment review.
pub const SUBMIT_PULL_REQUEST_REVIEW: OperationDescriptor = OperationDescriptor {
    name: "SubmitPullRequestReview",
    kind: OperationKind::Mutation,
    text: r#"mutation SubmitPullRequestReview($reviewId: ID!) {
  submitPullRequestReview(input: { pullRequestReviewId: $reviewId, event: COMMENT }) {
    pullRequestReview { id state }
  }
}"#,
};

/// Deletes a pending review together with its comments.
pub const DELETE_PULL_REQUEST_REVIEW: OperationDescriptor = OperationDescriptor {
    name: "DeletePullRequestReview",
    kind: OperationKind::Mutation,
    text: r#"mutation DeletePullRequestReview($reviewId: ID!) {
  deletePullRequestReview(input: { pullRequestReviewId: $reviewId }) {
    pullRequestReview { id }
  }
}"#,
};

pub const RESOLVE_REVIEW_THREAD: OperationDescriptor = OperationDescriptor {
    name: "ResolveReviewThread",
    kind: OperationKind::Mutation,
    text: r#"mutation ResolveReviewThread($threadId: ID!) {
  resolveReviewThread(input: { threadId: $threadId }) {
    thread { id isResolved }
  }
}"#,
};

pub const UNRESOLVE_REVIEW_THREAD: OperationDescriptor = OperationDescriptor {
    name: "UnresolveReviewThread",
    kind: OperationKind::Mutation,
    text: r#"mutation UnresolveReviewThread($threadId: ID!) {
  unresolveReviewThread(input: { threadId: $threadId }) {
    thread { id isResolved }
  }
}"#,
};

// === Response shapes ===

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryNode {
    pub pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestNode {
    id: String,
    number: u64,
    title: String,
    url: String,
    head_ref_oid: String,
    base_ref_oid: String,
    pending_reviews: Connection<IdNode>,
    reviews: Connection<ReviewNode>,
    review_threads: Connection<ThreadNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    id: String,
    state: ReviewState,
    body: String,
    submitted_at: Option<DateTime<Utc>>,
    url: Option<String>,
    author: Option<Actor>,
    #[serde(default)]
    reaction_groups: Vec<ReactionGroupNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadNode {
    id: String,
    is_resolved: bool,
    resolved_by: Option<Actor>,
    comments: Connection<CommentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    id: String,
    body: String,
    #[serde(rename = "bodyHTML")]
    body_html: String,
    path: String,
    position: Option<u32>,
    is_minimized: bool,
    state: ReviewCommentState,
    created_at: DateTime<Utc>,
    url: String,
    author: Option<Actor>,
    #[serde(default)]
    reaction_groups: Vec<ReactionGroupNode>,
}

#[derive(Debug, Deserialize)]
struct ReactionGroupNode {
    content: ReactionContent,
    reactors: TotalCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCommentData {
    pub add_pull_request_review_comment: Option<AddCommentPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddCommentPayload {
    pub comment: Option<AddedReviewComment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddReviewData {
    pub add_pull_request_review: Option<ReviewPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitReviewData {
    pub submit_pull_request_review: Option<ReviewPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteReviewData {
    pub delete_pull_request_review: Option<ReviewPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewPayload {
    pub pull_request_review: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolveData {
    pub resolve_review_thread: Option<ThreadPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnresolveData {
    pub unresolve_review_thread: Option<ThreadPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadPayload {
    pub thread: Option<ResolvedThreadNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolvedThreadNode {
    pub is_resolved: bool,
}

// === Variables ===

pub(crate) fn reviews_variables(owner: &str, repo: &str, number: u64) -> serde_json::Value {
    serde_json::json!({ "owner": owner, "repo": repo, "number": number })
}

pub(crate) fn add_comment_variables(input: &AddPullRequestReviewCommentInput) -> serde_json::Value {
    serde_json::json!({ "input": input })
}

// === Conversion ===

impl ReviewsData {
    pub(crate) fn into_reviews(self, owner: &str, repo: &str) -> Result<PullRequestReviews> {
        let pr = self
            .repository
            .ok_or_else(|| anyhow!("Repository {}/{} not found", owner, repo))?
            .pull_request
            .ok_or_else(|| anyhow!("Pull request not found in {}/{}", owner, repo))?;
        Ok(pr.into())
    }
}

impl From<PullRequestNode> for PullRequestReviews {
    fn from(pr: PullRequestNode) -> Self {
        PullRequestReviews {
            pull_request_id: pr.id,
            number: pr.number,
            title: pr.title,
            url: pr.url,
            head_sha: pr.head_ref_oid,
            base_sha: pr.base_ref_oid,
            viewer_pending_review_id: pr.pending_reviews.nodes.into_iter().next().map(|n| n.id),
            reviews: pr.reviews.nodes.into_iter().map(Review::from).collect(),
            threads: pr
                .review_threads
                .nodes
                .into_iter()
                .map(ReviewThread::from)
                .collect(),
        }
    }
}

impl From<ReviewNode> for Review {
    fn from(node: ReviewNode) -> Self {
        Review {
            id: node.id,
            author: node.author,
            state: node.state,
            body: node.body,
            submitted_at: node.submitted_at,
            url: node.url,
            reactions: convert_reactions(node.reaction_groups),
        }
    }
}

impl From<ThreadNode> for ReviewThread {
    fn from(node: ThreadNode) -> Self {
        ReviewThread {
            id: node.id,
            is_resolved: node.is_resolved,
            resolved_by: node.resolved_by,
            comments: node
                .comments
                .nodes
                .into_iter()
                .map(ReviewComment::from)
                .collect(),
        }
    }
}

impl From<CommentNode> for ReviewComment {
    fn from(node: CommentNode) -> Self {
        ReviewComment {
            id: node.id,
            author: node.author,
            body_html: node.body_html,
            body: node.body,
            path: node.path,
            position: node.position,
            is_minimized: node.is_minimized,
            state: node.state,
            created_at: node.created_at,
            url: node.url,
            reactions: convert_reactions(node.reaction_groups),
        }
    }
}

/// Reaction groups without reactions are dropped
fn convert_reactions(groups: Vec<ReactionGroupNode>) -> Vec<ReactionGroup> {
    groups
        .into_iter()
        .filter(|g| g.reactors.total_count > 0)
        .map(|g| ReactionGroup {
            content: g.content,
            count: g.reactors.total_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REVIEWS_FIXTURE: &str = r#"{
      "data": {
        "repository": {
          "pullRequest": {
            "id": "PR_1",
            "number": 42,
            "title": "Add reviews panel",
            "url": "https://github.com/o/r/pull/42",
            "headRefOid": "head",
            "baseRefOid": "base",
            "pendingReviews": { "nodes": [] },
            "reviews": {
              "nodes": [
                {
                  "id": "PRR_1",
                  "state": "APPROVED",
                  "body": "",
                  "submittedAt": "2024-01-02T03:04:05Z",
                  "url": "https://github.com/o/r/pull/42#pullrequestreview-1",
                  "author": { "login": "octocat", "url": "https://github.com/octocat" },
                  "reactionGroups": [
                    { "content": "THUMBS_UP", "reactors": { "totalCount": 2 } },
                    { "content": "EYES", "reactors": { "totalCount": 0 } }
                  ]
                }
              ]
            },
            "reviewThreads": {
              "nodes": [
                {
                  "id": "PRRT_1",
                  "isResolved": false,
                  "resolvedBy": null,
                  "comments": {
                    "nodes": [
                      {
                        "id": "PRRC_1",
                        "body": "Rename this",
                        "bodyHTML": "<p>Rename this</p>",
                        "path": "src/lib.rs",
                        "position": 3,
                        "isMinimized": false,
                        "state": "SUBMITTED",
                        "createdAt": "2024-01-02T03:04:05Z",
                        "url": "https://github.com/o/r/pull/42#discussion_r1",
                        "author": null,
                        "reactionGroups": []
                      },
                      {
                        "id": "PRRC_2",
                        "body": "Done",
                        "bodyHTML": "<p>Done</p>",
                        "path": "src/lib.rs",
                        "position": null,
                        "isMinimized": false,
                        "state": "PENDING",
                        "createdAt": "2024-01-03T03:04:05Z",
                        "url": "https://github.com/o/r/pull/42#discussion_r2",
                        "author": { "login": "hubot" },
                        "reactionGroups": []
                      }
                    ]
                  }
                }
              ]
            }
          }
        }
      }
    }"#;

    #[test]
    fn test_decode_reviews() {
        let response: GraphQLResponse<ReviewsData> = serde_json::from_str(REVIEWS_FIXTURE).unwrap();
        let reviews = response.into_result().unwrap().into_reviews("o", "r").unwrap();

        assert_eq!(reviews.pull_request_id, "PR_1");
        assert_eq!(reviews.head_sha, "head");
        assert_eq!(reviews.viewer_pending_review_id, None);

        assert_eq!(reviews.reviews.len(), 1);
        assert_eq!(reviews.reviews[0].state, ReviewState::Approved);
        assert_eq!(
            reviews.reviews[0].reactions,
            vec![ReactionGroup {
                content: ReactionContent::ThumbsUp,
                count: 2
            }]
        );

        let thread = &reviews.threads[0];
        assert_eq!(thread.comments.len(), 2);
        assert_eq!(thread.comments[0].position, Some(3));
        assert!(thread.comments[0].author.is_none());
        assert_eq!(thread.comments[1].position, None);
        assert_eq!(thread.comments[1].state, ReviewCommentState::Pending);
        assert_eq!(thread.comments[1].author.as_ref().unwrap().url, None);
    }

    #[test]
    fn test_missing_pull_request() {
        let response: GraphQLResponse<ReviewsData> =
            serde_json::from_str(r#"{"data": {"repository": {"pullRequest": null}}}"#).unwrap();
        let err = response.into_result().unwrap().into_reviews("o", "r").unwrap_err();
        assert!(err.to_string().contains("Pull request not found"));
    }

    #[test]
    fn test_errors_take_precedence() {
        let response: GraphQLResponse<ReviewsData> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "Bad credentials"}, {"message": "Nope"}]}"#,
        )
        .unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Bad credentials, Nope");
    }

    #[test]
    fn test_decode_added_comment() {
        let json = r#"{
          "data": {
            "addPullRequestReviewComment": {
              "comment": {
                "id": "PRRC_3",
                "author": { "login": "me", "url": "https://github.com/me" },
                "bodyHTML": "<p>Thanks</p>",
                "isMinimized": false,
                "viewerCanReact": true,
                "path": "src/lib.rs",
                "position": 3,
                "createdAt": "2024-01-04T00:00:00Z",
                "lastEditedAt": null,
                "url": "https://github.com/o/r/pull/42#discussion_r3"
              }
            }
          }
        }"#;
        let response: GraphQLResponse<AddCommentData> = serde_json::from_str(json).unwrap();
        let comment = response
            .into_result()
            .unwrap()
            .add_pull_request_review_comment
            .and_then(|p| p.comment)
            .unwrap();
        assert_eq!(comment.id, "PRRC_3");
        assert!(comment.viewer_can_react);
        assert_eq!(comment.last_edited_at, None);
    }

    #[test]
    fn test_descriptor_id_is_content_hash() {
        let id = ADD_PULL_REQUEST_REVIEW_COMMENT.id();
        assert_eq!(id.len(), 64);
        assert_eq!(id, ADD_PULL_REQUEST_REVIEW_COMMENT.id());
        assert_ne!(id, RESOLVE_REVIEW_THREAD.id());
        assert_ne!(DELETE_PULL_REQUEST_REVIEW.id(), SUBMIT_PULL_REQUEST_REVIEW.id());
        assert_eq!(ADD_PULL_REQUEST_REVIEW_COMMENT.kind, OperationKind::Mutation);
    }

    #[test]
    fn test_add_comment_variables_wrap_input() {
        let input = AddPullRequestReviewCommentInput::reply("PRR_1", "PRRC_1", "ok");
        let variables = add_comment_variables(&input);
        assert_eq!(variables["input"]["inReplyTo"], "PRRC_1");
    }
}
