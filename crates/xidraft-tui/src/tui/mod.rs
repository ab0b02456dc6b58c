// Terminal UI: formation board, draft modal, squad sidebar.
//
// The TUI owns a `ViewState` that mirrors the squad snapshot pushed by the app
// loop. `UiUpdate` messages arrive over an mpsc channel; the TUI applies them
// to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use xidraft_core::dataset::{DataSource, Player};
use xidraft_core::protocol::{SquadSnapshot, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};
use widgets::formation::BOARD_ROWS;

// ---------------------------------------------------------------------------
// Modal and confirmation state
// ---------------------------------------------------------------------------

/// What the draft modal is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftModal {
    /// Waiting for an offer for `slot`.
    Scouting { slot: String },
    /// Offer cards for `slot`; `selected` indexes `candidates`. An empty offer
    /// renders the "no players" notice.
    Offer {
        slot: String,
        candidates: Vec<Player>,
        selected: usize,
    },
    /// The player already in `slot`.
    Detail { slot: String },
}

/// An action waiting on a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetSquad,
    SwitchSource(DataSource),
    Quit,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Latest squad snapshot from the app loop.
    pub snapshot: SquadSnapshot,
    /// Board cursor as (row, column) into `BOARD_ROWS`.
    pub cursor: (usize, usize),
    pub modal: Option<DraftModal>,
    pub confirm: Option<ConfirmAction>,
    /// Last error worth showing in the status bar.
    pub notice: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: SquadSnapshot::default(),
            cursor: (0, 1),
            modal: None,
            confirm: None,
            notice: None,
        }
    }
}

impl ViewState {
    /// Slot key under the board cursor.
    pub fn selected_slot(&self) -> &'static str {
        let (row, col) = self.cursor;
        let row = BOARD_ROWS[row.min(BOARD_ROWS.len() - 1)];
        row[col.min(row.len() - 1)]
    }

    pub fn apply_snapshot(&mut self, snapshot: SquadSnapshot) {
        // A detail view of a slot that was just cleared has nothing to show.
        if let Some(DraftModal::Detail { slot }) = &self.modal {
            if snapshot.player_at(slot).is_none() {
                self.modal = None;
            }
        }
        self.snapshot = snapshot;
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Scouting { slot } => {
            // The modal is opened locally when the request is sent; a cancelled
            // request must not reopen it.
            debug!("Scouting {} acknowledged", slot);
        }
        UiUpdate::CandidatesReady { slot, candidates } => {
            // Only land the offer if the user is still waiting for it.
            let waiting = matches!(
                &state.modal,
                Some(DraftModal::Scouting { slot: s }) if *s == slot
            );
            if waiting {
                state.modal = Some(DraftModal::Offer {
                    slot,
                    candidates,
                    selected: 0,
                });
            }
        }
        UiUpdate::DatasetError(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::formation::render(frame, layout.board, state);
    widgets::squad::render(frame, layout.squad, state);
    widgets::chemistry::render(frame, layout.chemistry, state);
    render_help_bar(frame, &layout, state);

    if state.modal.is_some() {
        widgets::offer::render(frame, layout.board, state);
    }
    if let Some(action) = state.confirm {
        widgets::confirm::render(frame, frame.area(), action);
    }
}

fn help_text(state: &ViewState) -> &'static str {
    if state.confirm.is_some() {
        return " y:Yes | n/Esc:No";
    }
    match &state.modal {
        Some(DraftModal::Scouting { .. }) => " Esc:Cancel",
        Some(DraftModal::Offer { candidates, .. }) if candidates.is_empty() => " Esc:Close",
        Some(DraftModal::Offer { .. }) => " \u{2190}/\u{2192}:Choose | Enter:Sign | 1-9:Sign card | Esc:Close",
        Some(DraftModal::Detail { .. }) => " d:Redraft | Esc:Close",
        None => " Arrows:Move | Enter:Draft/View | d:Redraft | r:Reset | s:Switch catalog | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Runs an async select loop over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App loop is gone
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
