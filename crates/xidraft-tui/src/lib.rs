// Library root: the terminal UI, exposed so the binary and tests share it.

pub mod tui;
