use crate::state::AppState;
use crate::view_models::HeaderViewModel;
use ratatui::layout::Rect;
use ratatui::Frame;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let vm = HeaderViewModel::from_state(state);
    let buf = f.buffer_mut();

    for x in area.x..area.x + area.width {
        buf[(x, area.y)].set_style(vm.title_style).set_char(' ');
    }
    buf.set_stringn(area.x + 1, area.y, &vm.title, area.width.saturating_sub(2) as usize, vm.title_style);

    let width = vm.progress.chars().count() as u16;
    if !vm.progress.is_empty() && width + 2 < area.width {
        let x = area.x + area.width - width - 1;
        buf.set_string(x, area.y, &vm.progress, vm.progress_style);
    }
}
