//! Header View Model
//!
//! Pre-computes the pull request line shown above the panel.

use crate::state::AppState;
use ratatui::style::Style;

#[derive(Debug, Clone)]
pub struct HeaderViewModel {
    /// "owner/repo#N Title"
    pub title: String,
    /// "Resolved X of Y", empty until loaded
    pub progress: String,
    pub title_style: Style,
    pub progress_style: Style,
}

impl HeaderViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let theme = &state.theme;
        let panel = &state.reviews.panel;

        let title = match &state.reviews.title {
            Some(title) => format!("{} {}", state.target, title),
            None => state.target.to_string(),
        };

        let (progress, progress_color) = if panel.is_loaded() {
            let progress = panel.progress();
            let color = if progress.is_complete() {
                theme.status_success
            } else {
                theme.status_warning
            };
            (progress.label(), color)
        } else {
            (String::new(), theme.text_muted)
        };

        Self {
            title,
            progress,
            title_style: theme.header_style(),
            progress_style: Style::default().fg(progress_color).bg(theme.bg_primary),
        }
    }
}
