pub mod header;
pub mod status_bar;

pub use header::HeaderViewModel;
pub use status_bar::StatusBarViewModel;
