// Messages exchanged between the app loop and the terminal UI.

use crate::dataset::{DataSource, Player, PlayerId};
use crate::draft::chemistry::ChemistryBadge;

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Scout a fresh offer for a formation slot. Replaces any pending offer.
    RequestCandidates { slot: String },
    /// Take a player from the pending offer for `slot`.
    ConfirmSelection { slot: String, player_id: PlayerId },
    /// Clear the squad and the used-player set.
    ResetSquad,
    /// Load the other catalog and start over.
    SwitchSource(DataSource),
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full squad state after any change.
    StateSnapshot(Box<SquadSnapshot>),
    /// An offer for `slot` is being drawn.
    Scouting { slot: String },
    /// The offer for `slot`. Empty when nobody is available.
    CandidatesReady {
        slot: String,
        candidates: Vec<Player>,
    },
    /// A catalog could not be loaded; the current session is unchanged.
    DatasetError(String),
}

/// One filled formation slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub slot: String,
    pub player: Player,
}

/// Everything the UI shows about the squad, captured in one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadSnapshot {
    pub source: DataSource,
    /// Players in the active catalog.
    pub catalog_size: usize,
    /// Filled slots in formation order.
    pub assignments: Vec<SlotAssignment>,
    pub average_rating: u32,
    pub badges: Vec<ChemistryBadge>,
    /// Players drafted this session, including replaced ones still held back.
    pub used_count: usize,
}

impl Default for SquadSnapshot {
    fn default() -> Self {
        SquadSnapshot {
            source: DataSource::FiveLeagues,
            catalog_size: 0,
            assignments: Vec::new(),
            average_rating: 0,
            badges: Vec::new(),
            used_count: 0,
        }
    }
}

impl SquadSnapshot {
    pub fn player_at(&self, slot: &str) -> Option<&Player> {
        self.assignments
            .iter()
            .find(|a| a.slot == slot)
            .map(|a| &a.player)
    }

    pub fn filled(&self) -> usize {
        self.assignments.len()
    }
}
