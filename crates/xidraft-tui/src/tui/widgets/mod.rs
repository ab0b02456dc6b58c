// TUI widget modules for each screen panel.

pub mod chemistry;
pub mod confirm;
pub mod formation;
pub mod offer;
pub mod squad;
pub mod status_bar;
