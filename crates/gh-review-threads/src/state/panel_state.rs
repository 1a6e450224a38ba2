//! Main state for the reviews panel.

use super::{RefreshGuard, ReplyDraft, ReplyDrafts};
use crate::action::ReviewsAction;
use crate::aggregate::{self, ThreadProgress, ThreadView};
use crate::event::{ReplyRequest, ReviewsEvent};
use crate::issueish::IssueishLink;
use crate::model::{
    Comment, CommentId, CommentTranslations, PullRequestDiff, ReviewId, ReviewSummary,
    ReviewThread, ThreadId,
};
use crate::translate::{translate, TranslatedPosition};
use std::collections::{HashMap, HashSet};

/// Collapsible sections of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Top-level review summaries.
    Summaries,
    /// Inline comment threads.
    Comments,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Summaries => "Reviews",
            Section::Comments => "Comments",
        }
    }
}

/// Everything fetched for one pull request.
#[derive(Debug, Clone, Default)]
pub struct ReviewData {
    pub summaries: Vec<ReviewSummary>,
    pub threads: Vec<ReviewThread>,
    /// None until tables have been computed; positions then render blank.
    pub translations: Option<CommentTranslations>,
    /// Used for the context preview above each thread.
    pub diff: Option<PullRequestDiff>,
    /// Whether the working copy is at the pull request's head revision.
    pub is_checked_out: bool,
}

/// A focusable row of the panel, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    SectionHeader(Section),
    Summary(ReviewId),
    ThreadHeader(ThreadId),
    Comment { thread_id: ThreadId, index: usize },
    ReplyBox(ThreadId),
}

impl Row {
    /// The thread this row belongs to, if any.
    pub fn thread_id(&self) -> Option<&str> {
        match self {
            Row::ThreadHeader(id) | Row::ReplyBox(id) => Some(id),
            Row::Comment { thread_id, .. } => Some(thread_id),
            Row::SectionHeader(_) | Row::Summary(_) => None,
        }
    }
}

/// A reply that has been handed off for posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub thread_id: ThreadId,
    /// Snapshot of the draft, restored if posting fails.
    pub body: String,
}

/// State of the reviews panel.
///
/// All mutation happens through [`handle_action`](Self::handle_action) and the
/// completion callbacks, on the UI thread.
#[derive(Debug, Clone)]
pub struct ReviewsPanelState {
    data: ReviewData,
    loaded: bool,
    /// Translated position per comment, computed once per data update.
    positions: HashMap<CommentId, TranslatedPosition>,
    open_sections: HashSet<Section>,
    open_threads: HashSet<ThreadId>,
    /// Threads whose open state has been initialised.
    known_threads: HashSet<ThreadId>,
    /// Externally supplied open set, applied to threads as they first appear.
    initial_open: Option<HashSet<ThreadId>>,
    collapse_resolved: bool,
    highlighted: Option<ThreadId>,
    drafts: ReplyDrafts,
    /// Thread whose reply box has keyboard focus.
    editing: Option<ThreadId>,
    /// At most one reply is in flight.
    posting: Option<PendingReply>,
    refresh: RefreshGuard,
    error: Option<String>,
    /// Index into [`rows`](Self::rows).
    pub cursor: usize,
    /// First visible row.
    pub scroll_offset: usize,
    pub viewport_height: usize,
}

impl Default for ReviewsPanelState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReviewsPanelState {
    /// Create an empty panel. With `collapse_resolved`, resolved threads start collapsed.
    pub fn new(collapse_resolved: bool) -> Self {
        Self {
            data: ReviewData::default(),
            loaded: false,
            positions: HashMap::new(),
            open_sections: HashSet::from([Section::Summaries, Section::Comments]),
            open_threads: HashSet::new(),
            known_threads: HashSet::new(),
            initial_open: None,
            collapse_resolved,
            highlighted: None,
            drafts: ReplyDrafts::default(),
            editing: None,
            posting: None,
            refresh: RefreshGuard::new(),
            error: None,
            cursor: 0,
            scroll_offset: 0,
            viewport_height: 20,
        }
    }

    /// Use an externally supplied open set for threads that have not been seen yet.
    pub fn with_open_threads(mut self, thread_ids: impl IntoIterator<Item = ThreadId>) -> Self {
        self.initial_open = Some(thread_ids.into_iter().collect());
        self
    }

    /// Replace the displayed data, keeping UI state for threads that still exist.
    pub fn set_data(&mut self, data: ReviewData) {
        let previous_row = self.current_row();

        self.positions = translate_positions(&data);

        for thread in &data.threads {
            if self.known_threads.insert(thread.id.clone()) {
                let open = match &self.initial_open {
                    Some(initial) => initial.contains(&thread.id),
                    None => !(self.collapse_resolved && thread.is_resolved),
                };
                if open {
                    self.open_threads.insert(thread.id.clone());
                }
            }
        }

        self.drafts
            .retain_threads(data.threads.iter().map(|t| t.id.as_str()));

        let exists = |id: &Option<ThreadId>| {
            id.as_ref()
                .is_some_and(|id| data.threads.iter().any(|t| &t.id == id))
        };
        if !exists(&self.editing) {
            self.editing = None;
        }
        if !exists(&self.highlighted) {
            self.highlighted = None;
        }

        log::debug!(
            "Review data updated: {} summaries, {} threads",
            data.summaries.len(),
            data.threads.len()
        );

        self.data = data;
        self.loaded = true;
        self.refocus(previous_row, None);
    }

    // === Read accessors ===

    pub fn data(&self) -> &ReviewData {
        &self.data
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_checked_out(&self) -> bool {
        self.data.is_checked_out
    }

    /// Summaries shown in the "Reviews" section.
    pub fn summaries(&self) -> Vec<&ReviewSummary> {
        aggregate::filter_summaries(&self.data.summaries)
    }

    pub fn summary(&self, id: &str) -> Option<&ReviewSummary> {
        self.data.summaries.iter().find(|s| s.id == id)
    }

    pub fn thread_views(&self) -> Vec<ThreadView<'_>> {
        aggregate::thread_views(&self.data.threads)
    }

    /// Renderable threads grouped by file path.
    pub fn threads_by_path(&self) -> Vec<(&str, Vec<ThreadView<'_>>)> {
        let views = self.thread_views();
        aggregate::group_by_path(&views)
    }

    pub fn thread(&self, thread_id: &str) -> Option<ThreadView<'_>> {
        self.data
            .threads
            .iter()
            .find(|t| t.id == thread_id)
            .and_then(ThreadView::new)
    }

    pub fn progress(&self) -> ThreadProgress {
        ThreadProgress::from_threads(&self.data.threads)
    }

    /// Translated position of a comment; blank for unknown comments.
    pub fn position(&self, comment_id: &str) -> TranslatedPosition {
        self.positions.get(comment_id).cloned().unwrap_or_default()
    }

    pub fn is_section_open(&self, section: Section) -> bool {
        self.open_sections.contains(&section)
    }

    /// Highlighted threads are always expanded.
    pub fn is_thread_open(&self, thread_id: &str) -> bool {
        self.highlighted.as_deref() == Some(thread_id) || self.open_threads.contains(thread_id)
    }

    pub fn open_threads(&self) -> &HashSet<ThreadId> {
        &self.open_threads
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn draft(&self, thread_id: &str) -> Option<&ReplyDraft> {
        self.drafts.get(thread_id)
    }

    pub fn posting(&self) -> Option<&PendingReply> {
        self.posting.as_ref()
    }

    pub fn is_posting(&self, thread_id: &str) -> bool {
        self.posting
            .as_ref()
            .is_some_and(|p| p.thread_id == thread_id)
    }

    /// A reply can be posted when nothing else is in flight and the draft has text.
    pub fn can_submit_reply(&self, thread_id: &str) -> bool {
        self.posting.is_none() && self.drafts.has_text(thread_id)
    }

    /// Shared handle for whoever performs the fetch.
    pub fn refresh_guard(&self) -> &RefreshGuard {
        &self.refresh
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Last error to surface in the status line.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // === Rows and cursor ===

    /// Focusable rows in display order.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = vec![Row::SectionHeader(Section::Summaries)];
        if self.is_section_open(Section::Summaries) {
            rows.extend(
                self.summaries()
                    .into_iter()
                    .map(|s| Row::Summary(s.id.clone())),
            );
        }

        rows.push(Row::SectionHeader(Section::Comments));
        if self.is_section_open(Section::Comments) {
            for (_, group) in self.threads_by_path() {
                for view in group {
                    let id = view.id().to_string();
                    rows.push(Row::ThreadHeader(id.clone()));
                    if self.is_thread_open(&id) {
                        for index in 0..view.thread().comments.len() {
                            rows.push(Row::Comment {
                                thread_id: id.clone(),
                                index,
                            });
                        }
                        rows.push(Row::ReplyBox(id));
                    }
                }
            }
        }
        rows
    }

    pub fn current_row(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Thread under the cursor.
    pub fn focused_thread(&self) -> Option<ThreadView<'_>> {
        let row = self.current_row()?;
        self.thread(row.thread_id()?)
    }

    /// Comment under the cursor; the root comment for thread headers and reply boxes.
    pub fn focused_comment(&self) -> Option<&Comment> {
        match self.current_row()? {
            Row::Comment { thread_id, index } => self.thread(&thread_id)?.thread().comments.get(index),
            Row::ThreadHeader(id) | Row::ReplyBox(id) => Some(self.thread(&id)?.root()),
            Row::SectionHeader(_) | Row::Summary(_) => None,
        }
    }

    fn move_to(&mut self, row: &Row) -> bool {
        match self.rows().iter().position(|r| r == row) {
            Some(index) => {
                self.cursor = index;
                self.ensure_cursor_visible();
                true
            }
            None => false,
        }
    }

    /// Restore focus to `previous` if it still exists, else to `fallback_thread`'s header.
    fn refocus(&mut self, previous: Option<Row>, fallback_thread: Option<&str>) {
        if let Some(row) = previous {
            if self.move_to(&row) {
                return;
            }
            let thread = fallback_thread.or(row.thread_id()).map(str::to_string);
            if let Some(thread) = thread {
                if self.move_to(&Row::ThreadHeader(thread)) {
                    return;
                }
            }
        }
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let height = self.viewport_height.max(1);
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }

    // === Actions ===

    /// Process an action and return any events the application must handle.
    pub fn handle_action(&mut self, action: ReviewsAction) -> Vec<ReviewsEvent> {
        let mut events = Vec::new();

        if action.is_reply_action() {
            if let Some(event) = self.handle_reply_action(&action) {
                events.push(event);
            }
            return events;
        }

        if let Some(event) = self.handle_normal_action(action) {
            events.push(event);
        }
        events
    }

    fn handle_normal_action(&mut self, action: ReviewsAction) -> Option<ReviewsEvent> {
        match action {
            // === Navigation ===
            ReviewsAction::CursorDown => {
                if self.cursor + 1 < self.rows().len() {
                    self.cursor += 1;
                }
                self.ensure_cursor_visible();
                None
            }
            ReviewsAction::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                self.ensure_cursor_visible();
                None
            }
            ReviewsAction::CursorFirst => {
                self.cursor = 0;
                self.scroll_offset = 0;
                None
            }
            ReviewsAction::CursorLast => {
                self.cursor = self.rows().len().saturating_sub(1);
                self.ensure_cursor_visible();
                None
            }
            ReviewsAction::NextThread => {
                let rows = self.rows();
                if let Some(offset) = rows
                    .iter()
                    .skip(self.cursor + 1)
                    .position(|r| matches!(r, Row::ThreadHeader(_)))
                {
                    self.cursor += offset + 1;
                    self.ensure_cursor_visible();
                }
                None
            }
            ReviewsAction::PrevThread => {
                let rows = self.rows();
                if let Some(index) = rows[..self.cursor.min(rows.len())]
                    .iter()
                    .rposition(|r| matches!(r, Row::ThreadHeader(_)))
                {
                    self.cursor = index;
                    self.ensure_cursor_visible();
                }
                None
            }

            // === Open/closed state ===
            ReviewsAction::ToggleAtCursor => match self.current_row()? {
                Row::SectionHeader(section) => self.toggle_section(section),
                row => {
                    let thread_id = row.thread_id()?.to_string();
                    self.toggle_thread(&thread_id)
                }
            },
            ReviewsAction::ToggleSection(section) => self.toggle_section(section),
            ReviewsAction::ToggleThread(thread_id) => self.toggle_thread(&thread_id),
            ReviewsAction::ExpandAll => {
                let previous = self.current_row();
                self.open_threads = self.data.threads.iter().map(|t| t.id.clone()).collect();
                self.refocus(previous, None);
                None
            }
            ReviewsAction::CollapseAll => {
                let previous = self.current_row();
                self.open_threads.clear();
                self.refocus(previous, None);
                None
            }
            ReviewsAction::HighlightThread(thread_id) => {
                self.thread(&thread_id)?;
                self.open_sections.insert(Section::Comments);
                self.highlighted = Some(thread_id.clone());
                self.move_to(&Row::ThreadHeader(thread_id));
                None
            }
            ReviewsAction::ClearHighlight => {
                let previous = self.current_row();
                let thread = self.highlighted.take();
                self.refocus(previous, thread.as_deref());
                None
            }

            // === Thread actions ===
            ReviewsAction::ToggleResolveAtCursor => {
                let thread = self.focused_thread()?;
                let thread_id = thread.id().to_string();
                // No optimistic update; the next fetch shows the new state
                if thread.is_resolved() {
                    Some(ReviewsEvent::UnresolveThread { thread_id })
                } else {
                    Some(ReviewsEvent::ResolveThread { thread_id })
                }
            }
            ReviewsAction::OpenFileAtCursor => {
                let comment = self.focused_comment()?;
                let line = self.position(&comment.id).line_number?;
                Some(ReviewsEvent::OpenFile {
                    path: comment.path.clone(),
                    line,
                })
            }
            ReviewsAction::OpenDiffAtCursor => {
                let comment = self.focused_comment()?;
                Some(ReviewsEvent::OpenDiff {
                    path: comment.path.clone(),
                    position: comment.position?,
                })
            }
            ReviewsAction::OpenLinkAtCursor => {
                let text = match self.current_row()? {
                    Row::Summary(id) => self.summary(&id)?.body.clone(),
                    _ => self.focused_comment()?.body_text.clone(),
                };
                IssueishLink::find_all(&text)
                    .into_iter()
                    .next()
                    .map(ReviewsEvent::OpenIssueish)
            }
            ReviewsAction::OpenPermalinkAtCursor => {
                let url = &self.focused_comment()?.url;
                (!url.is_empty()).then(|| ReviewsEvent::OpenUrl(url.clone()))
            }

            // === Replying ===
            ReviewsAction::StartReply => {
                let thread_id = self.focused_thread()?.id().to_string();
                self.open_threads.insert(thread_id.clone());
                self.drafts.entry(&thread_id);
                self.editing = Some(thread_id.clone());
                self.move_to(&Row::ReplyBox(thread_id));
                None
            }

            // === General ===
            ReviewsAction::Refresh => {
                if self.refresh.is_refreshing() {
                    log::debug!("Refresh already in flight, dropping request");
                    None
                } else {
                    Some(ReviewsEvent::Refresh)
                }
            }
            ReviewsAction::Close => {
                self.editing = None;
                Some(ReviewsEvent::Close)
            }
            ReviewsAction::SetViewport { height, .. } => {
                self.viewport_height = height as usize;
                self.ensure_cursor_visible();
                None
            }

            // Reply actions are routed in handle_action
            ReviewsAction::ReplyInsertChar(_)
            | ReviewsAction::ReplyBackspace
            | ReviewsAction::ReplyDelete
            | ReviewsAction::ReplyCursorLeft
            | ReviewsAction::ReplyCursorRight
            | ReviewsAction::ReplyCursorHome
            | ReviewsAction::ReplyCursorEnd
            | ReviewsAction::ReplyNewline
            | ReviewsAction::SubmitReply
            | ReviewsAction::CancelReply => None,
        }
    }

    fn handle_reply_action(&mut self, action: &ReviewsAction) -> Option<ReviewsEvent> {
        let thread_id = self.editing.clone()?;

        match action {
            ReviewsAction::SubmitReply => return self.submit_reply(&thread_id),
            ReviewsAction::CancelReply => {
                // The draft survives; reopening the reply box continues it
                self.editing = None;
                return None;
            }
            _ => {}
        }

        let draft = self.drafts.entry(&thread_id);
        match action {
            ReviewsAction::ReplyInsertChar(c) => draft.insert_char(*c),
            ReviewsAction::ReplyBackspace => draft.delete_char_before(),
            ReviewsAction::ReplyDelete => draft.delete_char_at(),
            ReviewsAction::ReplyCursorLeft => draft.cursor_left(),
            ReviewsAction::ReplyCursorRight => draft.cursor_right(),
            ReviewsAction::ReplyCursorHome => draft.cursor_home(),
            ReviewsAction::ReplyCursorEnd => draft.cursor_end(),
            ReviewsAction::ReplyNewline => draft.insert_newline(),
            _ => {}
        }
        None
    }

    fn toggle_section(&mut self, section: Section) -> Option<ReviewsEvent> {
        let open = if self.open_sections.remove(&section) {
            false
        } else {
            self.open_sections.insert(section);
            true
        };
        self.move_to(&Row::SectionHeader(section));
        Some(ReviewsEvent::SectionToggled { section, open })
    }

    fn toggle_thread(&mut self, thread_id: &str) -> Option<ReviewsEvent> {
        self.thread(thread_id)?;
        let previous = self.current_row();

        if !self.open_threads.remove(thread_id) {
            self.open_threads.insert(thread_id.to_string());
        }

        self.refocus(previous, Some(thread_id));
        Some(ReviewsEvent::ThreadToggled {
            thread_id: thread_id.to_string(),
            open: self.is_thread_open(thread_id),
        })
    }

    // === Reply lifecycle ===

    /// Hand the thread's draft off for posting.
    ///
    /// Does nothing while another reply is in flight or when the draft is
    /// empty. The draft is cleared; its text is kept until the outcome is
    /// reported.
    pub fn submit_reply(&mut self, thread_id: &str) -> Option<ReviewsEvent> {
        if let Some(pending) = &self.posting {
            log::debug!(
                "Reply to {} still in flight, ignoring submit for {}",
                pending.thread_id,
                thread_id
            );
            return None;
        }
        if !self.drafts.has_text(thread_id) {
            return None;
        }

        let target = self.thread(thread_id)?.reply_target();
        let body = self.drafts.take(thread_id)?;

        self.posting = Some(PendingReply {
            thread_id: thread_id.to_string(),
            body: body.clone(),
        });
        self.editing = None;
        self.error = None;

        log::info!("Submitting reply to thread {}", thread_id);
        Some(ReviewsEvent::SubmitReply(ReplyRequest {
            body,
            thread_id: target.thread_id,
            last_comment_id: target.last_comment_id,
            path: target.path,
            position: target.position,
        }))
    }

    /// The reply for `thread_id` was posted. Returns false for unexpected reports.
    pub fn reply_succeeded(&mut self, thread_id: &str) -> bool {
        if !self.is_posting(thread_id) {
            log::warn!("Unexpected reply success for thread {}", thread_id);
            return false;
        }
        self.posting = None;
        if !self.drafts.has_text(thread_id) {
            self.drafts.remove(thread_id);
        }
        log::info!("Reply to thread {} posted", thread_id);
        true
    }

    /// Posting the reply for `thread_id` failed: restore the draft and surface the error.
    pub fn reply_failed(&mut self, thread_id: &str, error: &str) -> bool {
        if !self.is_posting(thread_id) {
            log::warn!("Unexpected reply failure for thread {}: {}", thread_id, error);
            return false;
        }
        let Some(pending) = self.posting.take() else {
            return false;
        };

        if !self.drafts.restore(thread_id, pending.body) {
            log::debug!("Draft for {} was edited meanwhile, not restoring", thread_id);
        }
        log::error!("Failed to post reply to thread {}: {}", thread_id, error);
        self.error = Some(format!("Failed to post reply: {error}"));
        true
    }
}

/// Translate every comment once; inconsistent tables degrade to "outdated".
fn translate_positions(data: &ReviewData) -> HashMap<CommentId, TranslatedPosition> {
    data.threads
        .iter()
        .flat_map(|t| &t.comments)
        .map(|comment| {
            let translated = translate(
                &comment.path,
                comment.position,
                data.translations.as_ref(),
                data.is_checked_out,
            )
            .unwrap_or_else(|err| {
                log::warn!("Cannot translate position of comment {}: {}", comment.id, err);
                TranslatedPosition::outdated()
            });
            (comment.id.clone(), translated)
        })
        .collect()
}
