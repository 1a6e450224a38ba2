use crate::state::AppState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

pub mod header;
pub mod reviews_view;
pub mod status_bar;

/// Render the entire application UI
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(state, chunks[0], f);
    reviews_view::render(state, chunks[1], f);
    status_bar::render(state, chunks[2], f);
}
