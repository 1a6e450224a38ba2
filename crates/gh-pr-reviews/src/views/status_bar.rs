//! Status Bar
//!
//! Format: `emoji message                     [working copy]`

use crate::state::AppState;
use crate::view_models::StatusBarViewModel;
use ratatui::layout::Rect;
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let vm = StatusBarViewModel::from_state(state);
    let buf = f.buffer_mut();

    if area.height < 1 {
        return;
    }

    for x in area.x..area.x + area.width {
        buf[(x, area.y)].set_bg(vm.bg_color).set_char(' ');
    }

    let emoji = format!("{} ", vm.emoji);
    buf.set_string(area.x + 1, area.y, &emoji, vm.message_style);
    // emoji renders two cells wide
    let x = area.x + 4;

    let right = if vm.working_copy.is_empty() {
        String::new()
    } else {
        format!("[{}]", vm.working_copy)
    };
    let right_width = right.chars().count() as u16;

    let available = area.width.saturating_sub(x - area.x + right_width + 2) as usize;
    buf.set_stringn(x, area.y, &vm.message, available, vm.message_style);

    if !right.is_empty() && right_width + 2 < area.width {
        let right_x = area.x + area.width - right_width - 1;
        buf.set_string(right_x, area.y, &right, vm.metadata_style);
    }
}
