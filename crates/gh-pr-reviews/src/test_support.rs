//! Fixtures shared by unit tests

use chrono::Utc;
use gh_review_threads::{Author, Comment, CommentState, ReviewData, ReviewThread};

pub fn comment(id: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author: Some(Author::new("octocat")),
        body_html: "<p>Looks off by one</p>".to_string(),
        body_text: "Looks off by one".to_string(),
        path: "src/lib.rs".to_string(),
        position: Some(3),
        is_minimized: false,
        state: CommentState::Submitted,
        created_at: Utc::now(),
        url: format!("https://github.com/octo/repo/pull/7#discussion_{id}"),
        reactions: Vec::new(),
    }
}

/// One unresolved thread `T1` with a single comment `C1` on src/lib.rs
pub fn review_data() -> ReviewData {
    ReviewData {
        summaries: Vec::new(),
        threads: vec![ReviewThread {
            id: "T1".to_string(),
            is_resolved: false,
            resolved_by: None,
            comments: vec![comment("C1")],
        }],
        translations: None,
        diff: None,
        is_checked_out: false,
    }
}
