//! Derived view data for review summaries and comment threads.
//!
//! Everything here is a pure function of the fetched data; nothing is cached.

use crate::model::{
    Comment, CommentId, ReactionGroup, ReviewState, ReviewSummary, ReviewThread, ThreadId,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

/// Placeholder shown instead of the body of a minimized comment.
pub const HIDDEN_COMMENT: &str = "This comment was hidden";

/// Badge shown on comments that belong to an unsubmitted review.
pub const PENDING_BADGE: &str = "PENDING";

/// Summaries worth showing in the "Reviews" section, in input order.
///
/// Pending reviews are dropped, and so are plain "commented" reviews without
/// a body (their content lives entirely in the inline threads).
pub fn filter_summaries(summaries: &[ReviewSummary]) -> Vec<&ReviewSummary> {
    summaries
        .iter()
        .filter(|summary| match summary.state {
            ReviewState::Pending => false,
            ReviewState::Commented => !summary.body.is_empty(),
            _ => true,
        })
        .collect()
}

/// Resolved versus total thread count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadProgress {
    pub resolved: usize,
    pub total: usize,
}

impl ThreadProgress {
    pub fn from_threads(threads: &[ReviewThread]) -> Self {
        Self {
            resolved: threads.iter().filter(|t| t.is_resolved).count(),
            total: threads.len(),
        }
    }

    pub fn label(&self) -> String {
        format!("Resolved {} of {}", self.resolved, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.resolved == self.total
    }

    /// Fraction resolved in `0.0..=1.0`, used for the progress gauge.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total as f64
        }
    }
}

impl fmt::Display for ThreadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Where a reply to a thread goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub thread_id: ThreadId,
    /// Replies are threaded onto the most recent comment.
    pub last_comment_id: CommentId,
    pub path: String,
    pub position: Option<u32>,
}

/// Borrowed view of a non-empty thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadView<'a> {
    thread: &'a ReviewThread,
    root: &'a Comment,
    last: &'a Comment,
}

impl<'a> ThreadView<'a> {
    /// None for threads without comments; those are never rendered.
    pub fn new(thread: &'a ReviewThread) -> Option<Self> {
        Some(Self {
            thread,
            root: thread.root()?,
            last: thread.last()?,
        })
    }

    pub fn thread(&self) -> &'a ReviewThread {
        self.thread
    }

    pub fn id(&self) -> &'a str {
        &self.thread.id
    }

    pub fn root(&self) -> &'a Comment {
        self.root
    }

    pub fn last(&self) -> &'a Comment {
        self.last
    }

    /// Every comment after the root.
    pub fn replies(&self) -> &'a [Comment] {
        &self.thread.comments[1..]
    }

    pub fn path(&self) -> &'a str {
        &self.root.path
    }

    pub fn position(&self) -> Option<u32> {
        self.root.position
    }

    pub fn is_resolved(&self) -> bool {
        self.thread.is_resolved
    }

    pub fn reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            thread_id: self.thread.id.clone(),
            last_comment_id: self.last.id.clone(),
            path: self.root.path.clone(),
            position: self.root.position,
        }
    }
}

/// Views for every renderable thread, preserving order.
pub fn thread_views(threads: &[ReviewThread]) -> Vec<ThreadView<'_>> {
    threads.iter().filter_map(ThreadView::new).collect()
}

/// Group thread views by file path, in order of first appearance.
pub fn group_by_path<'a>(views: &[ThreadView<'a>]) -> Vec<(&'a str, Vec<ThreadView<'a>>)> {
    let mut groups: Vec<(&'a str, Vec<ThreadView<'a>>)> = Vec::new();
    for view in views {
        match groups.iter_mut().find(|(path, _)| *path == view.path()) {
            Some((_, group)) => group.push(*view),
            None => groups.push((view.path(), vec![*view])),
        }
    }
    groups
}

/// The initial open set: every thread, or only unresolved ones.
pub fn default_open_threads(threads: &[ReviewThread], collapse_resolved: bool) -> HashSet<ThreadId> {
    threads
        .iter()
        .filter(|t| !(collapse_resolved && t.is_resolved))
        .map(|t| t.id.clone())
        .collect()
}

/// Body text to render for a comment.
pub fn comment_body(comment: &Comment) -> &str {
    if comment.is_minimized {
        HIDDEN_COMMENT
    } else {
        &comment.body_text
    }
}

/// Verb phrase used in a summary header ("octocat approved these changes").
pub fn summary_verb(state: ReviewState) -> &'static str {
    match state {
        ReviewState::Approved => "approved these changes",
        ReviewState::ChangesRequested => "requested changes",
        ReviewState::Commented => "left review comments",
        ReviewState::Dismissed => "dismissed this review",
        ReviewState::Pending => "started a review",
    }
}

/// Coarse relative time ("just now", "5 minutes ago", "3 days ago").
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);

    let (amount, unit) = if delta.num_seconds() < 60 {
        return "just now".to_string();
    } else if delta.num_minutes() < 60 {
        (delta.num_minutes(), "minute")
    } else if delta.num_hours() < 24 {
        (delta.num_hours(), "hour")
    } else if delta.num_days() < 30 {
        (delta.num_days(), "day")
    } else if delta.num_days() < 365 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

/// Compact reaction line, e.g. `👍 2  🎉 1`. Empty groups are skipped.
pub fn reaction_summary(reactions: &[ReactionGroup]) -> String {
    reactions
        .iter()
        .filter(|r| r.count > 0)
        .map(|r| format!("{} {}", r.content.emoji(), r.count))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, CommentState, ReactionContent};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn summary(id: &str, state: ReviewState, body: &str) -> ReviewSummary {
        ReviewSummary {
            id: id.to_string(),
            author: Some(Author::new("octocat")),
            state,
            body: body.to_string(),
            submitted_at: None,
            reactions: Vec::new(),
        }
    }

    fn comment(id: &str, path: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: None,
            body_html: String::new(),
            body_text: format!("body of {id}"),
            path: path.to_string(),
            position: Some(3),
            is_minimized: false,
            state: CommentState::Submitted,
            created_at: Utc::now(),
            url: String::new(),
            reactions: Vec::new(),
        }
    }

    fn thread(id: &str, path: &str, resolved: bool, comments: &[&str]) -> ReviewThread {
        ReviewThread {
            id: id.to_string(),
            is_resolved: resolved,
            resolved_by: None,
            comments: comments.iter().map(|c| comment(c, path)).collect(),
        }
    }

    #[test]
    fn test_filter_summaries() {
        let summaries = vec![
            summary("1", ReviewState::Approved, ""),
            summary("2", ReviewState::Pending, "draft"),
            summary("3", ReviewState::Commented, ""),
            summary("4", ReviewState::Commented, "looks good"),
            summary("5", ReviewState::ChangesRequested, ""),
            summary("6", ReviewState::Commented, " "),
        ];

        let ids: Vec<&str> = filter_summaries(&summaries)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "4", "5", "6"]);
    }

    #[test]
    fn test_progress() {
        let threads = vec![
            thread("a", "x.rs", true, &["c1"]),
            thread("b", "x.rs", false, &["c2"]),
            thread("c", "y.rs", false, &["c3"]),
        ];
        let progress = ThreadProgress::from_threads(&threads);
        assert_eq!(progress.label(), "Resolved 1 of 3");
        assert!(!progress.is_complete());
        assert_eq!(ThreadProgress::default().ratio(), 0.0);
    }

    #[test]
    fn test_thread_view() {
        let t = thread("t", "src/lib.rs", false, &["c1", "c2", "c3"]);
        let view = ThreadView::new(&t).unwrap();

        assert_eq!(view.root().id, "c1");
        assert_eq!(view.last().id, "c3");
        assert_eq!(view.replies().len(), 2);
        assert_eq!(
            view.reply_target(),
            ReplyTarget {
                thread_id: "t".to_string(),
                last_comment_id: "c3".to_string(),
                path: "src/lib.rs".to_string(),
                position: Some(3),
            }
        );
    }

    #[test]
    fn test_empty_threads_are_dropped() {
        let threads = vec![thread("a", "x.rs", false, &[]), thread("b", "x.rs", false, &["c"])];
        let views = thread_views(&threads);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id(), "b");
        assert!(views[0].replies().is_empty());
    }

    #[test]
    fn test_group_by_path_keeps_first_appearance() {
        let threads = vec![
            thread("a", "b.rs", false, &["1"]),
            thread("b", "a.rs", false, &["2"]),
            thread("c", "b.rs", false, &["3"]),
        ];
        let views = thread_views(&threads);
        let groups = group_by_path(&views);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b.rs");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "a.rs");
    }

    #[test]
    fn test_default_open_threads() {
        let threads = vec![
            thread("a", "x.rs", true, &["1"]),
            thread("b", "x.rs", false, &["2"]),
        ];

        let collapsed = default_open_threads(&threads, true);
        assert_eq!(collapsed, HashSet::from(["b".to_string()]));

        let all = default_open_threads(&threads, false);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_hidden_comment_body() {
        let mut c = comment("c", "x.rs");
        assert_eq!(comment_body(&c), "body of c");
        c.is_minimized = true;
        assert_eq!(comment_body(&c), HIDDEN_COMMENT);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(5), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");
    }

    #[test]
    fn test_reaction_summary() {
        let reactions = vec![
            ReactionGroup {
                content: ReactionContent::ThumbsUp,
                count: 2,
            },
            ReactionGroup {
                content: ReactionContent::Eyes,
                count: 0,
            },
            ReactionGroup {
                content: ReactionContent::Hooray,
                count: 1,
            },
        ];
        assert_eq!(reaction_summary(&reactions), "👍 2  🎉 1");
    }
}
