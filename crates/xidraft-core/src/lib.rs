// Library root: squad drafting core (position rules, squad state, chemistry,
// candidate drafting) plus the config, dataset and session plumbing the TUI
// drives over channels.

pub mod app;
pub mod config;
pub mod dataset;
pub mod draft;
pub mod protocol;
pub mod session;
