//! GitHub API client for pull request reviews
//!
//! This crate provides a trait-based GitHub API client covering what a
//! review panel needs: the review read model (reviews, threads, comments,
//! reactions), the unified diff, replying to comments and resolving threads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                 │
//! │  - fetch_reviews()      (GraphQL)               │
//! │  - fetch_diff()         (REST)                  │
//! │  - add_review_comment() (GraphQL mutation)      │
//! │  - resolve_thread() / unresolve_thread()        │
//! │  - post_reply()         (provided)              │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let reviews = client.fetch_reviews("owner", "repo", 42).await?;
//! println!("{} threads", reviews.threads.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod graphql;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::GitHubClient;
pub use client_manager::{ClientManager, TokenResolver};
pub use graphql::{OperationDescriptor, OperationKind, ADD_PULL_REQUEST_REVIEW_COMMENT};
pub use octocrab_client::OctocrabClient;
pub use types::{
    Actor, AddPullRequestReviewCommentInput, AddedReviewComment, PullRequestReviews,
    ReactionContent, ReactionGroup, Review, ReviewComment, ReviewCommentState, ReviewContext,
    ReviewState, ReviewThread,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
