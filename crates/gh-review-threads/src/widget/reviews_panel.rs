//! The reviews panel widget.

use crate::aggregate::{self, ThreadView, PENDING_BADGE};
use crate::model::{Author, Comment, DiffLine, LineKind, ReviewSummary};
use crate::state::{ReviewsPanelState, Row, Section};
use crate::traits::ThemeProvider;
use crate::translate::diff_context;
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};

const SUMMARY_INDENT: &str = "  ";
const SUMMARY_BODY_INDENT: &str = "    ";
const THREAD_INDENT: &str = "  ";
const CONTEXT_INDENT: &str = "      ";
const COMMENT_INDENT: &str = "    ";
const COMMENT_BODY_INDENT: &str = "      ";
const REPLY_INDENT: &str = "    ";
const REPLY_BAR: &str = "│ ";

/// A single hint entry for the footer.
#[derive(Debug, Clone)]
pub struct FooterHint {
    /// The key (e.g., "r", "R").
    pub key: String,
    /// The description (e.g., "Reply", "Resolve").
    pub description: String,
}

impl FooterHint {
    /// Create a new footer hint.
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// One screen line and the focusable row it belongs to.
struct DisplayLine {
    row: Option<usize>,
    line: Line<'static>,
}

/// Everything laid out for one frame.
#[derive(Default)]
struct PanelLayout {
    lines: Vec<DisplayLine>,
    /// First display line of each row.
    row_starts: Vec<usize>,
    /// Text cursor inside the reply box being edited: (line, column).
    text_cursor: Option<(usize, usize)>,
}

impl PanelLayout {
    fn push(&mut self, row: Option<usize>, line: Line<'static>) {
        self.lines.push(DisplayLine { row, line });
    }

    fn row_end(&self, row: usize) -> usize {
        self.row_starts
            .get(row + 1)
            .copied()
            .unwrap_or(self.lines.len())
    }
}

/// The reviews panel: review summaries followed by comment threads grouped by file.
///
/// # Example
///
/// ```ignore
/// use gh_review_threads::{DefaultTheme, ReviewsPanel};
///
/// let theme = DefaultTheme;
/// let widget = ReviewsPanel::new(&theme).with_context_lines(4);
/// widget.render_with_state(area, frame.buffer_mut(), &mut state);
/// ```
pub struct ReviewsPanel<'a, T: ThemeProvider> {
    theme: &'a T,
    title: String,
    /// Diff lines previewed above each open thread (0 disables the preview).
    context_lines: usize,
    /// Reference time for relative timestamps; the wall clock when None.
    now: Option<DateTime<Utc>>,
    footer_hints: Vec<FooterHint>,
}

impl<'a, T: ThemeProvider> ReviewsPanel<'a, T> {
    pub fn new(theme: &'a T) -> Self {
        Self {
            theme,
            title: "Reviews".to_string(),
            context_lines: 4,
            now: None,
            footer_hints: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Set footer hints to display at the bottom border.
    pub fn with_footer_hints(mut self, hints: Vec<FooterHint>) -> Self {
        self.footer_hints = hints;
        self
    }
}

impl<T: ThemeProvider> Widget for ReviewsPanel<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // The panel needs its state; see render_with_state
        buf.set_string(
            area.x,
            area.y,
            "Use ReviewsPanel::render_with_state",
            Style::default().fg(Color::Red),
        );
    }
}

impl<T: ThemeProvider> ReviewsPanel<'_, T> {
    /// Render the panel with state.
    pub fn render_with_state(self, area: Rect, buf: &mut Buffer, state: &mut ReviewsPanelState) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.reply_border()))
            .title(format!(" {} ", self.title));
        if let Some(footer) = self.footer_line() {
            block = block.title_bottom(footer);
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let status = self.status_line(state);
        let content_height = if status.is_some() {
            inner.height.saturating_sub(1)
        } else {
            inner.height
        };
        state.viewport_height = content_height as usize;

        let layout = self.layout(state);
        let height = content_height as usize;
        let start = self.first_visible_line(&layout, state, height);

        for (i, display) in layout.lines.iter().skip(start).take(height).enumerate() {
            let y = inner.y + i as u16;
            buf.set_line(inner.x, y, &display.line, inner.width);
            if display.row == Some(state.cursor) {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    Style::default().bg(self.theme.cursor_background()),
                );
            }
        }

        if let Some((line, column)) = layout.text_cursor {
            if line >= start && line < start + height && column < inner.width as usize {
                buf.set_style(
                    Rect::new(inner.x + column as u16, inner.y + (line - start) as u16, 1, 1),
                    Style::default().bg(Color::White).fg(Color::Black),
                );
            }
        }

        if let Some(status) = status {
            buf.set_line(inner.x, inner.y + content_height, &status, inner.width);
        }
    }

    /// Scroll so that the whole cursor row fits, starting from the state's row offset.
    fn first_visible_line(&self, layout: &PanelLayout, state: &ReviewsPanelState, height: usize) -> usize {
        let mut start = layout
            .row_starts
            .get(state.scroll_offset)
            .copied()
            .unwrap_or(0);

        if let Some(&cursor_start) = layout.row_starts.get(state.cursor) {
            let cursor_end = layout.row_end(state.cursor);
            if cursor_start < start {
                start = cursor_start;
            } else if cursor_end > start + height {
                // Rows taller than the viewport show their top
                start = cursor_end.saturating_sub(height).min(cursor_start);
            }
        }
        start
    }

    fn layout(&self, state: &ReviewsPanelState) -> PanelLayout {
        let now = self.now.unwrap_or_else(Utc::now);
        let mut layout = PanelLayout::default();
        let mut current_path: Option<String> = None;

        for (index, row) in state.rows().iter().enumerate() {
            layout.row_starts.push(layout.lines.len());
            let row_index = Some(index);

            match row {
                Row::SectionHeader(section) => {
                    layout.push(row_index, self.section_header(state, *section));
                    if state.is_loaded() && state.is_section_open(*section) {
                        if let Some(empty) = self.empty_section(state, *section) {
                            layout.push(None, empty);
                        }
                    }
                }
                Row::Summary(id) => {
                    if let Some(summary) = state.summary(id) {
                        for line in self.summary_lines(summary, now) {
                            layout.push(row_index, line);
                        }
                    }
                }
                Row::ThreadHeader(id) => {
                    let Some(view) = state.thread(id) else {
                        continue;
                    };
                    if current_path.as_deref() != Some(view.path()) {
                        current_path = Some(view.path().to_string());
                        layout.push(
                            None,
                            Line::from(Span::styled(
                                view.path().to_string(),
                                Style::default()
                                    .fg(self.theme.path_foreground())
                                    .add_modifier(Modifier::BOLD),
                            )),
                        );
                    }
                    layout.push(row_index, self.thread_header(state, view));
                    if state.is_thread_open(id) {
                        for line in self.context_preview(state, view) {
                            layout.push(row_index, line);
                        }
                    }
                }
                Row::Comment { thread_id, index } => {
                    let comment = state
                        .thread(thread_id)
                        .and_then(|view| view.thread().comments.get(*index));
                    if let Some(comment) = comment {
                        for line in self.comment_lines(comment, now) {
                            layout.push(row_index, line);
                        }
                    }
                }
                Row::ReplyBox(thread_id) => self.reply_box(&mut layout, state, thread_id, index),
            }
        }

        if !state.is_loaded() {
            layout.push(None, self.muted(format!("{SUMMARY_INDENT}Loading reviews…")));
        }
        layout
    }

    fn section_header(&self, state: &ReviewsPanelState, section: Section) -> Line<'static> {
        let marker = if state.is_section_open(section) {
            "▾"
        } else {
            "▸"
        };
        let mut spans = vec![Span::styled(
            format!("{marker} {}", section.title()),
            Style::default()
                .fg(self.theme.section_header_foreground())
                .add_modifier(Modifier::BOLD),
        )];

        match section {
            Section::Summaries => {
                spans.push(Span::styled(
                    format!(" ({})", state.summaries().len()),
                    Style::default().fg(self.theme.muted_foreground()),
                ));
            }
            Section::Comments => {
                let progress = state.progress();
                if progress.total > 0 {
                    let color = if progress.is_complete() {
                        self.theme.resolved_foreground()
                    } else {
                        self.theme.unresolved_foreground()
                    };
                    spans.push(Span::styled(
                        format!("  {}", progress.label()),
                        Style::default().fg(color),
                    ));
                }
            }
        }
        Line::from(spans)
    }

    fn empty_section(&self, state: &ReviewsPanelState, section: Section) -> Option<Line<'static>> {
        match section {
            Section::Summaries if state.summaries().is_empty() => {
                Some(self.muted(format!("{SUMMARY_INDENT}No reviews")))
            }
            Section::Comments if state.thread_views().is_empty() => {
                Some(self.muted(format!("{SUMMARY_INDENT}No review comments")))
            }
            _ => None,
        }
    }

    fn summary_lines(&self, summary: &ReviewSummary, now: DateTime<Utc>) -> Vec<Line<'static>> {
        let mut header = vec![
            Span::raw(SUMMARY_INDENT),
            self.author_span(summary.author.as_ref()),
            Span::raw(" "),
            Span::styled(
                aggregate::summary_verb(summary.state).to_string(),
                Style::default().fg(self.theme.review_state_foreground(summary.state)),
            ),
        ];
        if let Some(submitted_at) = summary.submitted_at {
            header.push(Span::styled(
                format!(" · {}", aggregate::relative_time(submitted_at, now)),
                Style::default().fg(self.theme.muted_foreground()),
            ));
        }

        let mut lines = vec![Line::from(header)];
        lines.extend(
            summary
                .body
                .lines()
                .map(|l| Line::raw(format!("{SUMMARY_BODY_INDENT}{l}"))),
        );
        let reactions = aggregate::reaction_summary(&summary.reactions);
        if !reactions.is_empty() {
            lines.push(Line::raw(format!("{SUMMARY_BODY_INDENT}{reactions}")));
        }
        lines
    }

    fn thread_header(&self, state: &ReviewsPanelState, view: ThreadView<'_>) -> Line<'static> {
        let marker = if state.is_thread_open(view.id()) {
            "▾"
        } else {
            "▸"
        };
        let mut spans = vec![Span::raw(format!("{THREAD_INDENT}{marker} "))];

        let position = state.position(&view.root().id);
        if position.is_outdated() {
            spans.push(Span::styled(
                position.display_text,
                Style::default()
                    .fg(self.theme.outdated_foreground())
                    .add_modifier(Modifier::ITALIC),
            ));
        } else if !position.display_text.is_empty() {
            spans.push(Span::raw(format!("line {}", position.display_text)));
        } else {
            spans.push(Span::raw(file_name(view.path()).to_string()));
        }

        let (label, color) = if view.is_resolved() {
            ("Resolved", self.theme.resolved_foreground())
        } else {
            ("Unresolved", self.theme.unresolved_foreground())
        };
        spans.push(Span::styled(format!("  {label}"), Style::default().fg(color)));

        let replies = view.replies().len();
        if replies > 0 {
            let noun = if replies == 1 { "reply" } else { "replies" };
            spans.push(Span::styled(
                format!(" · {replies} {noun}"),
                Style::default().fg(self.theme.muted_foreground()),
            ));
        }

        if view.thread().has_pending_comments() {
            spans.push(Span::raw(" "));
            spans.push(self.pending_badge());
        }
        Line::from(spans)
    }

    fn context_preview(&self, state: &ReviewsPanelState, view: ThreadView<'_>) -> Vec<Line<'static>> {
        let Some(diff) = state.data().diff.as_ref() else {
            return Vec::new();
        };
        diff_context(diff, view.path(), view.position(), self.context_lines)
            .into_iter()
            .map(|line| self.diff_line(line))
            .collect()
    }

    fn diff_line(&self, line: &DiffLine) -> Line<'static> {
        let color = match line.kind {
            LineKind::Addition => self.theme.addition_foreground(),
            LineKind::Deletion => self.theme.deletion_foreground(),
            LineKind::Context => self.theme.muted_foreground(),
        };
        Line::from(Span::styled(
            format!("{CONTEXT_INDENT}{}{}", line.kind.prefix(), line.content),
            Style::default().fg(color),
        ))
    }

    fn comment_lines(&self, comment: &Comment, now: DateTime<Utc>) -> Vec<Line<'static>> {
        let mut header = vec![
            Span::raw(COMMENT_INDENT),
            self.author_span(comment.author.as_ref()),
            Span::styled(
                format!(" · {}", aggregate::relative_time(comment.created_at, now)),
                Style::default().fg(self.theme.muted_foreground()),
            ),
        ];
        if comment.is_pending() {
            header.push(Span::raw(" "));
            header.push(self.pending_badge());
        }

        let mut lines = vec![Line::from(header)];
        let body = aggregate::comment_body(comment);
        if comment.is_minimized {
            lines.push(Line::from(Span::styled(
                format!("{COMMENT_BODY_INDENT}{body}"),
                Style::default()
                    .fg(self.theme.muted_foreground())
                    .add_modifier(Modifier::ITALIC),
            )));
        } else {
            lines.extend(
                body.lines()
                    .map(|l| Line::raw(format!("{COMMENT_BODY_INDENT}{l}"))),
            );
        }

        let reactions = aggregate::reaction_summary(&comment.reactions);
        if !reactions.is_empty() {
            lines.push(Line::raw(format!("{COMMENT_BODY_INDENT}{reactions}")));
        }
        lines
    }

    fn reply_box(&self, layout: &mut PanelLayout, state: &ReviewsPanelState, thread_id: &str, row: usize) {
        let row = Some(row);

        if state.is_posting(thread_id) {
            layout.push(row, self.muted(format!("{REPLY_INDENT}Posting reply…")));
            return;
        }

        let draft = state.draft(thread_id);
        if state.editing() != Some(thread_id) {
            let placeholder = match draft.filter(|d| !d.is_empty()) {
                Some(draft) => format!(
                    "{REPLY_INDENT}Reply (draft): {}",
                    draft.body.lines().next().unwrap_or_default()
                ),
                None => format!("{REPLY_INDENT}Reply…"),
            };
            layout.push(row, self.muted(placeholder));
            return;
        }

        let bar = Span::styled(
            format!("{REPLY_INDENT}{REPLY_BAR}"),
            Style::default().fg(self.theme.reply_border_active()),
        );
        let body = draft.map(|d| d.body.as_str()).unwrap_or_default();
        let first_line = layout.lines.len();
        // split keeps the empty line after a trailing newline
        for text in body.split('\n') {
            layout.push(row, Line::from(vec![bar.clone(), Span::raw(text.to_string())]));
        }

        let (line, column) = draft
            .map(|d| (d.current_line(), d.current_column()))
            .unwrap_or((0, 0));
        let offset = REPLY_INDENT.chars().count() + REPLY_BAR.chars().count();
        layout.text_cursor = Some((first_line + line, offset + column));

        let key = Style::default()
            .fg(self.theme.hint_key_foreground())
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(self.theme.hint_text_foreground());
        layout.push(
            row,
            Line::from(vec![
                Span::raw(REPLY_INDENT),
                Span::styled("Ctrl+S", key),
                Span::styled(" submit  ", text),
                Span::styled("Esc", key),
                Span::styled(" cancel", text),
            ]),
        );
    }

    fn status_line(&self, state: &ReviewsPanelState) -> Option<Line<'static>> {
        if let Some(error) = state.error() {
            return Some(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(self.theme.error_foreground()),
            )));
        }
        state
            .is_refreshing()
            .then(|| self.muted("Refreshing…".to_string()))
    }

    fn footer_line(&self) -> Option<Line<'static>> {
        if self.footer_hints.is_empty() {
            return None;
        }
        let mut spans = vec![Span::raw(" ")];
        for (i, hint) in self.footer_hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    " │ ",
                    Style::default().fg(self.theme.hint_text_foreground()),
                ));
            }
            spans.push(Span::styled(
                hint.key.clone(),
                Style::default()
                    .fg(self.theme.hint_key_foreground())
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", hint.description),
                Style::default().fg(self.theme.hint_text_foreground()),
            ));
        }
        spans.push(Span::raw(" "));
        Some(Line::from(spans))
    }

    fn author_span(&self, author: Option<&Author>) -> Span<'static> {
        Span::styled(
            Author::display_login(author).to_string(),
            Style::default()
                .fg(self.theme.author_foreground())
                .add_modifier(Modifier::BOLD),
        )
    }

    fn pending_badge(&self) -> Span<'static> {
        Span::styled(
            format!(" {PENDING_BADGE} "),
            Style::default()
                .fg(self.theme.pending_badge_foreground())
                .bg(self.theme.pending_badge_background()),
        )
    }

    fn muted(&self, text: String) -> Line<'static> {
        Line::from(Span::styled(
            text,
            Style::default().fg(self.theme.muted_foreground()),
        ))
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
