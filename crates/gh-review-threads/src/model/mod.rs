//! Data models for reviews, threads, diffs and position translation.

mod diff;
mod review;
mod translation;

pub use diff::{DiffLine, FileDiff, FileStatus, Hunk, LineKind, PositionedLine, PullRequestDiff};
pub use review::{
    Author, Comment, CommentId, CommentState, ReactionContent, ReactionGroup, ReviewId,
    ReviewState, ReviewSummary, ReviewThread, ThreadId,
};
pub use translation::{content_digest, CommentTranslationTable, CommentTranslations};
