// Squad state: slot assignments, the used-player set and squad aggregates.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use super::positions::{FORMATION_433, is_declared_slot};
use crate::dataset::{Player, PlayerId};

/// What happens to a slot's previous occupant when the slot is drafted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// The replaced player stays in the used set and cannot be offered again
    /// this session.
    #[default]
    RetainUsed,
    /// The replaced player goes back into the draftable pool.
    ReleasePrevious,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquadError {
    #[error("unknown formation slot `{0}`")]
    UnknownSlot(String),
}

/// The squad being drafted.
///
/// Every id in the used set was handed out by the draft engine. Assignments
/// are limited to the declared formation slots.
#[derive(Debug, Clone, Default)]
pub struct SquadState {
    slots: HashMap<String, Player>,
    used_ids: HashSet<PlayerId>,
    policy: OverwritePolicy,
}

impl SquadState {
    pub fn new(policy: OverwritePolicy) -> Self {
        SquadState {
            slots: HashMap::new(),
            used_ids: HashSet::new(),
            policy,
        }
    }

    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    /// Put `player` in `slot_key` and mark them used.
    ///
    /// Returns the slot's previous occupant. Under `RetainUsed` that player's
    /// id stays in the used set.
    pub fn assign(&mut self, slot_key: &str, player: Player) -> Result<Option<Player>, SquadError> {
        if !is_declared_slot(slot_key) {
            return Err(SquadError::UnknownSlot(slot_key.to_string()));
        }

        self.used_ids.insert(player.id.clone());
        let previous = self.slots.insert(slot_key.to_string(), player);

        if let Some(prev) = &previous {
            let replaced_other = self
                .slots
                .get(slot_key)
                .is_some_and(|current| current.id != prev.id);
            if replaced_other && self.policy == OverwritePolicy::ReleasePrevious {
                debug!("Releasing {} ({}) back to the pool", prev.name, prev.id);
                self.used_ids.remove(&prev.id);
            }
        }

        Ok(previous)
    }

    /// Empty every slot and forget all used players.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.used_ids.clear();
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn player_at(&self, slot_key: &str) -> Option<&Player> {
        self.slots.get(slot_key)
    }

    pub fn is_used(&self, id: &PlayerId) -> bool {
        self.used_ids.contains(id)
    }

    pub fn used_count(&self) -> usize {
        self.used_ids.len()
    }

    pub fn total_rating(&self) -> u32 {
        self.slots.values().map(|p| p.ovr).sum()
    }

    /// Mean rating of assigned players rounded to the nearest integer
    /// (halves round up). Zero for an empty squad.
    pub fn average_rating(&self) -> u32 {
        let n = self.slots.len() as u32;
        if n == 0 {
            return 0;
        }
        (2 * self.total_rating() + n) / (2 * n)
    }

    /// Filled slots in formation order.
    pub fn assignments(&self) -> Vec<(&'static str, &Player)> {
        FORMATION_433
            .iter()
            .filter_map(|slot| self.slots.get(*slot).map(|p| (*slot, p)))
            .collect()
    }

    /// Assigned players in formation order.
    pub fn players(&self) -> Vec<&Player> {
        self.assignments().into_iter().map(|(_, p)| p).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, ovr: u32) -> Player {
        Player {
            id: PlayerId::new(id),
            name: format!("Player {id}"),
            position: "CM".into(),
            ovr,
            nation: "England".into(),
            team: "Arsenal".into(),
            league: "Premier League".into(),
            card: String::new(),
            local_image: None,
        }
    }

    #[test]
    fn new_squad_is_empty() {
        let squad = SquadState::new(OverwritePolicy::RetainUsed);
        assert!(squad.is_empty());
        assert_eq!(squad.average_rating(), 0);
        assert_eq!(squad.used_count(), 0);
    }

    #[test]
    fn assign_fills_slot_and_marks_used() {
        let mut squad = SquadState::default();
        let prev = squad.assign("CM_C", player("1", 84)).unwrap();
        assert!(prev.is_none());
        assert_eq!(squad.len(), 1);
        assert_eq!(squad.player_at("CM_C").unwrap().ovr, 84);
        assert!(squad.is_used(&PlayerId::new("1")));
    }

    #[test]
    fn assign_rejects_undeclared_slot() {
        let mut squad = SquadState::default();
        let err = squad.assign("CM", player("1", 84)).unwrap_err();
        assert_eq!(err, SquadError::UnknownSlot("CM".into()));
        assert!(squad.is_empty());
        assert_eq!(squad.used_count(), 0);
    }

    #[test]
    fn overwrite_keeps_previous_id_used_by_default() {
        let mut squad = SquadState::new(OverwritePolicy::RetainUsed);
        squad.assign("ST", player("1", 80)).unwrap();
        let prev = squad.assign("ST", player("2", 88)).unwrap();

        assert_eq!(prev.unwrap().id, PlayerId::new("1"));
        assert_eq!(squad.len(), 1);
        assert_eq!(squad.used_count(), 2);
        assert!(squad.is_used(&PlayerId::new("1")));
        assert!(squad.is_used(&PlayerId::new("2")));
    }

    #[test]
    fn overwrite_releases_previous_when_configured() {
        let mut squad = SquadState::new(OverwritePolicy::ReleasePrevious);
        squad.assign("ST", player("1", 80)).unwrap();
        squad.assign("ST", player("2", 88)).unwrap();

        assert!(!squad.is_used(&PlayerId::new("1")));
        assert!(squad.is_used(&PlayerId::new("2")));
        assert_eq!(squad.used_count(), 1);
    }

    #[test]
    fn reassigning_same_player_keeps_them_used() {
        let mut squad = SquadState::new(OverwritePolicy::ReleasePrevious);
        squad.assign("GK", player("1", 80)).unwrap();
        squad.assign("GK", player("1", 80)).unwrap();
        assert!(squad.is_used(&PlayerId::new("1")));
    }

    #[test]
    fn average_rounds_half_up() {
        let mut squad = SquadState::default();
        squad.assign("LB", player("1", 80)).unwrap();
        squad.assign("RB", player("2", 81)).unwrap();
        assert_eq!(squad.average_rating(), 81);

        squad.assign("GK", player("3", 80)).unwrap();
        // 241 / 3 = 80.33
        assert_eq!(squad.average_rating(), 80);
    }

    #[test]
    fn average_ignores_replaced_players() {
        let mut squad = SquadState::default();
        squad.assign("GK", player("1", 60)).unwrap();
        squad.assign("GK", player("2", 90)).unwrap();
        assert_eq!(squad.average_rating(), 90);
    }

    #[test]
    fn reset_clears_everything() {
        let mut squad = SquadState::default();
        squad.assign("LW", player("1", 85)).unwrap();
        squad.assign("RW", player("2", 87)).unwrap();
        squad.reset();

        assert!(squad.is_empty());
        assert_eq!(squad.average_rating(), 0);
        assert_eq!(squad.used_count(), 0);
        assert!(!squad.is_used(&PlayerId::new("1")));
    }

    #[test]
    fn assignments_follow_formation_order() {
        let mut squad = SquadState::default();
        squad.assign("GK", player("1", 80)).unwrap();
        squad.assign("LW", player("2", 80)).unwrap();
        squad.assign("CB_L", player("3", 80)).unwrap();

        let slots: Vec<&str> = squad.assignments().iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, vec!["LW", "CB_L", "GK"]);
    }
}
