//! End-to-end scenarios: diff text in, panel state and events out.

use chrono::Utc;
use gh_review_threads::aggregate::HIDDEN_COMMENT;
use gh_review_threads::state::Row;
use gh_review_threads::{
    filter_summaries, parse_unified_diff, translate, Author, Comment, CommentState,
    CommentTranslationTable, CommentTranslations, ReviewData, ReviewState, ReviewSummary,
    ReviewThread, ReviewsAction, ReviewsEvent, ReviewsPanelState, ThreadProgress,
};
use pretty_assertions::assert_eq;

const DIFF: &str = r#"diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 fn a() {}
-fn b() {}
+fn b() -> u32 { 1 }
+fn c() {}
 fn d() {}
"#;

const HEAD: &str = "fn a() {}\nfn b() -> u32 { 1 }\nfn c() {}\nfn d() {}\n";

fn comment(id: &str, path: &str, position: Option<u32>) -> Comment {
    Comment {
        id: id.to_string(),
        author: Some(Author::new("octocat")),
        body_html: String::new(),
        body_text: format!("comment {id}"),
        path: path.to_string(),
        position,
        is_minimized: false,
        state: CommentState::Submitted,
        created_at: Utc::now(),
        url: String::new(),
        reactions: Vec::new(),
    }
}

fn thread(id: &str, resolved: bool, comments: Vec<Comment>) -> ReviewThread {
    ReviewThread {
        id: id.to_string(),
        is_resolved: resolved,
        resolved_by: None,
        comments,
    }
}

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

#[test]
fn missing_position_is_outdated_regardless_of_tables() {
    let tables = CommentTranslations::new().with_table(
        "dir/file0",
        CommentTranslationTable::new("d").with_position(10, 10),
    );

    for checked_out in [false, true] {
        let translated = translate("dir/file0", None, Some(&tables), checked_out).unwrap();
        assert_eq!(translated.line_number, None);
        assert_eq!(translated.display_text, "outdated");
    }

    // Without any tables nothing is known yet, not even outdatedness
    let untranslated = translate("dir/file0", None, None, false).unwrap();
    assert_eq!(untranslated.line_number, None);
    assert_eq!(untranslated.display_text, "");
}

#[test]
fn position_without_local_edits_maps_through_diff_table() {
    let tables = CommentTranslations::new().with_table(
        "dir/file0",
        CommentTranslationTable::new("d").with_position(10, 10),
    );

    let translated = translate("dir/file0", Some(10), Some(&tables), true).unwrap();
    assert_eq!(translated.line_number, Some(10));
    assert_eq!(translated.display_text, "10");
}

#[test]
fn local_edits_apply_only_when_checked_out() {
    let diff = parse_unified_diff(DIFF, "base", "head").unwrap();
    let mut translations = CommentTranslations::from_diff(&diff, |_| Some(HEAD.to_string()));

    let working = format!("// header\n{HEAD}");
    translations
        .get_mut("src/lib.rs")
        .unwrap()
        .apply_local_edits(HEAD, &working);

    // Position 5 is " fn d() {}", line 4 at head, line 5 in the working copy
    let at_head = translate("src/lib.rs", Some(5), Some(&translations), false).unwrap();
    assert_eq!(at_head.line_number, Some(4));
    let local = translate("src/lib.rs", Some(5), Some(&translations), true).unwrap();
    assert_eq!(local.line_number, Some(5));

    // A deleted line anchors to the line that replaced it
    let deleted = translate("src/lib.rs", Some(2), Some(&translations), false).unwrap();
    assert_eq!(deleted.line_number, Some(2));

    assert!(!translations.is_stale("src/lib.rs", HEAD));
    assert!(translations.is_stale("src/lib.rs", &working));
}

#[test]
fn summaries_keep_order_and_drop_pending_and_empty_comments() {
    let summaries = vec![
        summary("r1", ReviewState::Approved, ""),
        summary("r2", ReviewState::Pending, "draft"),
        summary("r3", ReviewState::Commented, ""),
        summary("r4", ReviewState::Commented, "Looks good"),
        summary("r7", ReviewState::Commented, "   "),
        summary("r5", ReviewState::ChangesRequested, ""),
        summary("r6", ReviewState::Dismissed, ""),
    ];

    let ids: Vec<&str> = filter_summaries(&summaries)
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["r1", "r4", "r7", "r5", "r6"]);
}

#[test]
fn progress_counts_resolved_threads() {
    let threads = vec![
        thread("t1", false, vec![comment("c1", "a.rs", Some(1))]),
        thread("t2", true, vec![comment("c2", "a.rs", Some(2))]),
        thread("t3", false, vec![comment("c3", "b.rs", Some(1))]),
    ];

    let progress = ThreadProgress::from_threads(&threads);
    assert_eq!(progress.resolved, 1);
    assert!(progress.resolved <= progress.total);
    assert_eq!(progress.label(), "Resolved 1 of 3");
}

#[test]
fn panel_from_parsed_diff() {
    let diff = parse_unified_diff(DIFF, "base", "head").unwrap();
    let translations = CommentTranslations::from_diff(&diff, |_| None);

    let mut hidden = comment("c3", "src/lib.rs", Some(3));
    hidden.is_minimized = true;

    let mut state = ReviewsPanelState::default();
    state.set_data(ReviewData {
        summaries: vec![summary("r1", ReviewState::Approved, "")],
        threads: vec![
            thread(
                "t1",
                false,
                vec![comment("c1", "src/lib.rs", Some(5)), hidden],
            ),
            thread("t2", false, vec![comment("c2", "src/lib.rs", None)]),
            thread("empty", false, Vec::new()),
        ],
        translations: Some(translations),
        diff: Some(diff),
        is_checked_out: false,
    });

    assert_eq!(state.position("c1").display_text, "4");
    assert!(state.position("c2").is_outdated());
    assert!(state.thread("empty").is_none());
    assert_eq!(
        gh_review_threads::aggregate::comment_body(state.thread("t1").unwrap().last()),
        HIDDEN_COMMENT
    );

    // Jump to line from the thread header
    state.handle_action(ReviewsAction::HighlightThread("t1".to_string()));
    assert_eq!(
        state.handle_action(ReviewsAction::OpenFileAtCursor),
        vec![ReviewsEvent::OpenFile {
            path: "src/lib.rs".to_string(),
            line: 4
        }]
    );

    // Outdated comments offer no line jump
    state.handle_action(ReviewsAction::HighlightThread("t2".to_string()));
    assert_eq!(state.current_row(), Some(Row::ThreadHeader("t2".to_string())));
    assert!(state.handle_action(ReviewsAction::OpenFileAtCursor).is_empty());
}

#[test]
fn failed_reply_restores_draft_and_allows_resubmit() {
    let mut state = ReviewsPanelState::default();
    state.set_data(ReviewData {
        threads: vec![thread(
            "t1",
            false,
            vec![comment("c1", "a.rs", Some(1)), comment("c2", "a.rs", Some(1))],
        )],
        ..ReviewData::default()
    });

    state.handle_action(ReviewsAction::HighlightThread("t1".to_string()));
    state.handle_action(ReviewsAction::StartReply);
    for c in "Fixed in abc123".chars() {
        state.handle_action(ReviewsAction::ReplyInsertChar(c));
    }

    let events = state.handle_action(ReviewsAction::SubmitReply);
    let [ReviewsEvent::SubmitReply(request)] = events.as_slice() else {
        panic!("expected a reply submission, got {events:?}");
    };
    assert_eq!(request.last_comment_id, "c2");
    assert!(!state.can_submit_reply("t1"));

    state.reply_failed("t1", "HTTP 502");
    assert_eq!(
        state.draft("t1").map(|d| d.body.as_str()),
        Some("Fixed in abc123")
    );
    assert!(state.error().is_some());
    assert!(state.can_submit_reply("t1"));
}
