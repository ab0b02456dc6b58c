// Chemistry badges: the most common team, nation and league in the squad.

use crate::dataset::Player;

/// Minimum number of players sharing a value before a badge is shown.
pub const BADGE_MIN_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChemistryCategory {
    Team,
    Nation,
    League,
}

impl ChemistryCategory {
    /// Badge output order.
    pub const ALL: [ChemistryCategory; 3] = [
        ChemistryCategory::Team,
        ChemistryCategory::Nation,
        ChemistryCategory::League,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChemistryCategory::Team => "Team",
            ChemistryCategory::Nation => "Nation",
            ChemistryCategory::League => "League",
        }
    }

    fn value_of<'a>(&self, player: &'a Player) -> &'a str {
        match self {
            ChemistryCategory::Team => &player.team,
            ChemistryCategory::Nation => &player.nation,
            ChemistryCategory::League => &player.league,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemistryBadge {
    pub category: ChemistryCategory,
    pub value: String,
    pub count: usize,
}

/// Compute up to one badge per category, in Team, Nation, League order.
///
/// Within a category the most frequent value wins; ties go to the value seen
/// first. Every player counts, including those with a blank value.
pub fn compute_badges(players: &[&Player]) -> Vec<ChemistryBadge> {
    ChemistryCategory::ALL
        .iter()
        .filter_map(|&category| {
            top_value(players, category)
                .filter(|(_, count)| *count >= BADGE_MIN_COUNT)
                .map(|(value, count)| ChemistryBadge {
                    category,
                    value: value.to_string(),
                    count,
                })
        })
        .collect()
}

/// Most frequent value for `category`, scanning in first-seen order.
fn top_value<'a>(players: &[&'a Player], category: ChemistryCategory) -> Option<(&'a str, usize)> {
    // Insertion-ordered tally.
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for &player in players {
        let value = category.value_of(player);
        match tally.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => tally.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best
}
