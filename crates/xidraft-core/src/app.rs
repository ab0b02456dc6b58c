// Application state and orchestration logic.
//
// The app loop owns the draft session. The TUI sends `UserCommand`s over an
// mpsc channel; the loop applies them one at a time and pushes `UiUpdate`s
// back. Scouting delays are awaited inline, so commands queue behind them and
// the latest offer always replaces the previous one.

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dataset::{self, DataSource, Player, PlayerId};
use crate::draft::random::RandomSource;
use crate::protocol::{SquadSnapshot, UiUpdate, UserCommand};
use crate::session::DraftSession;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The offer currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOffer {
    pub slot: String,
    pub candidates: Vec<Player>,
}

impl PendingOffer {
    fn take(&mut self, slot: &str, player_id: &PlayerId) -> Option<Player> {
        if self.slot != slot {
            return None;
        }
        let idx = self.candidates.iter().position(|p| &p.id == player_id)?;
        Some(self.candidates.remove(idx))
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub session: DraftSession,
    pub pending_offer: Option<PendingOffer>,
}

impl AppState {
    pub fn new(config: Config, source: DataSource, players: Vec<Player>) -> Self {
        let session = DraftSession::from_config(&config, source, players);
        AppState {
            config,
            session,
            pending_offer: None,
        }
    }

    /// Like `new`, with an explicit random source.
    pub fn with_rng(
        config: Config,
        source: DataSource,
        players: Vec<Player>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let session = DraftSession::new(&config, source, players, rng);
        AppState {
            config,
            session,
            pending_offer: None,
        }
    }

    pub fn build_snapshot(&self) -> SquadSnapshot {
        self.session.snapshot()
    }
}

/// Load the configured default catalog, falling back to the other one when it
/// is missing, unreadable or empty.
pub fn load_initial_catalog(config: &Config) -> anyhow::Result<(DataSource, Vec<Player>)> {
    let preferred = config.draft.default_source;
    match dataset::load_source(preferred, &config.data_paths) {
        Ok(players) => Ok((preferred, players)),
        Err(e) => {
            let fallback = preferred.other();
            warn!(
                "Could not load {}: {}; trying {}",
                preferred.label(),
                e,
                fallback.label()
            );
            let players = dataset::load_source(fallback, &config.data_paths)
                .with_context(|| format!("no usable player catalog (first error: {e})"))?;
            Ok((fallback, players))
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit`, or until either channel
/// closes.
///
/// Sends an initial snapshot so the UI has something to draw.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(state.build_snapshot(), &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = ui_tx.closed() => {
                info!("UI channel closed, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::RequestCandidates { slot } => {
            state.pending_offer = None;
            let _ = ui_tx.send(UiUpdate::Scouting { slot: slot.clone() }).await;

            let candidates = state.session.request_candidates(&slot).await;
            info!("Offer for {}: {} candidates", slot, candidates.len());
            state.pending_offer = Some(PendingOffer {
                slot: slot.clone(),
                candidates: candidates.clone(),
            });
            let _ = ui_tx
                .send(UiUpdate::CandidatesReady { slot, candidates })
                .await;
        }
        UserCommand::ConfirmSelection { slot, player_id } => {
            let picked = state
                .pending_offer
                .as_mut()
                .and_then(|offer| offer.take(&slot, &player_id));
            let Some(player) = picked else {
                warn!(
                    "Ignoring selection of {} for {}: not in the current offer",
                    player_id, slot
                );
                return;
            };
            state.pending_offer = None;
            match state.session.confirm_selection(&slot, player) {
                Ok(_) => send_snapshot(state.build_snapshot(), ui_tx).await,
                Err(e) => warn!("Selection rejected: {}", e),
            }
        }
        UserCommand::ResetSquad => {
            state.pending_offer = None;
            state.session.reset_squad();
            send_snapshot(state.build_snapshot(), ui_tx).await;
        }
        UserCommand::SwitchSource(source) => {
            match dataset::load_source(source, &state.config.data_paths) {
                Ok(players) => {
                    state.pending_offer = None;
                    state.session.switch_source(source, players);
                    send_snapshot(state.build_snapshot(), ui_tx).await;
                }
                Err(e) => {
                    error!("Failed to switch to {}: {}", source.label(), e);
                    let _ = ui_tx.send(UiUpdate::DatasetError(e.to_string())).await;
                }
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn send_snapshot(snapshot: SquadSnapshot, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(snapshot)))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
