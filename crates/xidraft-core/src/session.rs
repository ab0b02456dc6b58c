// Draft session: one catalog, one squad, and the engine that drafts into it.
//
// The session is a plain value owned by the app loop. Resetting or switching
// catalogs replaces the squad wholesale; nothing is persisted.

use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::dataset::{DataSource, Player};
use crate::draft::chemistry::{compute_badges, ChemistryBadge};
use crate::draft::engine::DraftEngine;
use crate::draft::random::{RandomSource, SeededRandom};
use crate::draft::squad::{SquadError, SquadState};
use crate::protocol::{SlotAssignment, SquadSnapshot};

pub struct DraftSession {
    source: DataSource,
    players: Vec<Player>,
    squad: SquadState,
    engine: DraftEngine,
    rng: Box<dyn RandomSource>,
    offer_size: usize,
    scouting_delay: Duration,
}

impl DraftSession {
    /// Build a session over `players` with an explicit random source.
    pub fn new(
        config: &Config,
        source: DataSource,
        players: Vec<Player>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        DraftSession {
            source,
            players,
            squad: SquadState::new(config.draft.overwrite_policy()),
            engine: DraftEngine::new(config.guarantee.clone()),
            rng,
            offer_size: config.draft.offer_size,
            scouting_delay: config.draft.scouting_delay(),
        }
    }

    /// Build a session whose randomness follows the configured seed.
    pub fn from_config(config: &Config, source: DataSource, players: Vec<Player>) -> Self {
        let rng = SeededRandom::from_optional_seed(config.draft.seed);
        Self::new(config, source, players, Box::new(rng))
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn squad(&self) -> &SquadState {
        &self.squad
    }

    pub fn engine(&self) -> &DraftEngine {
        &self.engine
    }

    pub fn offer_size(&self) -> usize {
        self.offer_size
    }

    /// Scout an offer for `slot_key`: wait out the scouting delay, then draw.
    ///
    /// The draw sees the squad as it is after the delay.
    pub async fn request_candidates(&mut self, slot_key: &str) -> Vec<Player> {
        if !self.scouting_delay.is_zero() {
            tokio::time::sleep(self.scouting_delay).await;
        }
        self.draw_candidates(slot_key)
    }

    /// Draw an offer for `slot_key` immediately.
    pub fn draw_candidates(&mut self, slot_key: &str) -> Vec<Player> {
        self.engine.candidates(
            slot_key,
            self.offer_size,
            &self.players,
            &self.squad,
            &mut self.rng,
        )
    }

    /// Put `player` in `slot_key`. Returns the replaced occupant, if any.
    pub fn confirm_selection(
        &mut self,
        slot_key: &str,
        player: Player,
    ) -> Result<Option<Player>, SquadError> {
        let name = player.name.clone();
        let ovr = player.ovr;
        let previous = self.squad.assign(slot_key, player)?;
        match &previous {
            Some(prev) => info!(
                "Drafted {} ({}) into {}, replacing {}",
                name, ovr, slot_key, prev.name
            ),
            None => info!("Drafted {} ({}) into {}", name, ovr, slot_key),
        }
        Ok(previous)
    }

    pub fn reset_squad(&mut self) {
        self.squad = SquadState::new(self.squad.policy());
        info!("Squad reset");
    }

    /// Replace the catalog and discard the squad.
    pub fn switch_source(&mut self, source: DataSource, players: Vec<Player>) {
        info!(
            "Switching catalog {} -> {} ({} players)",
            self.source.label(),
            source.label(),
            players.len()
        );
        self.source = source;
        self.players = players;
        self.squad = SquadState::new(self.squad.policy());
    }

    pub fn badges(&self) -> Vec<ChemistryBadge> {
        compute_badges(&self.squad.players())
    }

    pub fn snapshot(&self) -> SquadSnapshot {
        SquadSnapshot {
            source: self.source,
            catalog_size: self.players.len(),
            assignments: self
                .squad
                .assignments()
                .into_iter()
                .map(|(slot, player)| SlotAssignment {
                    slot: slot.to_string(),
                    player: player.clone(),
                })
                .collect(),
            average_rating: self.squad.average_rating(),
            badges: self.badges(),
            used_count: self.squad.used_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
