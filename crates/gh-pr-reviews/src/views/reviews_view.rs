//! Reviews panel view

use crate::state::AppState;
use crate::theme::ReviewsThemeAdapter;
use gh_review_threads::{FooterHint, ReviewsPanel};
use ratatui::layout::Rect;
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme_adapter = ReviewsThemeAdapter(&state.theme);
    let panel = &state.reviews.panel;

    let hints = if panel.editing().is_some() {
        vec![
            FooterHint::new("Ctrl+S", "Submit"),
            FooterHint::new("Esc", "Cancel"),
        ]
    } else {
        vec![
            FooterHint::new("j/k", "Move"),
            FooterHint::new("n/N", "Thread"),
            FooterHint::new("Enter", "Toggle"),
            FooterHint::new("r", "Reply"),
            FooterHint::new("R", "Resolve"),
            FooterHint::new("o", "Open"),
            FooterHint::new("q", "Quit"),
        ]
    };

    let widget = ReviewsPanel::new(&theme_adapter)
        .with_title(format!(" Reviews · {} ", state.target))
        .with_context_lines(state.app_config.diff_context_lines)
        .with_footer_hints(hints);

    // render_with_state needs &mut; the scroll it computes is recomputed every frame
    let mut render_state = panel.clone();
    widget.render_with_state(area, f.buffer_mut(), &mut render_state);
}
