// Slot eligibility: which player position codes may fill a formation slot.

use std::fmt;

// ---------------------------------------------------------------------------
// Formation
// ---------------------------------------------------------------------------

/// Slot keys of the 4-3-3 formation in board order (front line to goal).
///
/// Keys with an underscore carry a sub-variant (`CM_L`, `CB_R`); the part
/// before the underscore is the on-board label.
pub const FORMATION_433: &[&str] = &[
    "LW", "ST", "RW", "CM_L", "CM_C", "CM_R", "LB", "CB_L", "CB_R", "RB", "GK",
];

/// Whether `slot_key` is one of the declared formation slots.
pub fn is_declared_slot(slot_key: &str) -> bool {
    FORMATION_433.contains(&slot_key)
}

/// Board order index of a declared slot, used to list assignments stably.
pub fn slot_order(slot_key: &str) -> Option<usize> {
    FORMATION_433.iter().position(|k| *k == slot_key)
}

// ---------------------------------------------------------------------------
// Static rule table
// ---------------------------------------------------------------------------

/// Main-position-only rules. Wide midfield codes (LM/RM) are accepted on the
/// matching wing and on the same-side central midfield slot.
const SLOT_RULES: &[(&str, &[&str])] = &[
    ("LW", &["LW", "LM"]),
    ("ST", &["ST", "CF"]),
    ("RW", &["RW", "RM"]),
    ("CM_L", &["CM", "CDM", "CAM", "LM"]),
    ("CM_C", &["CM", "CDM", "CAM"]),
    ("CM_R", &["CM", "CDM", "CAM", "RM"]),
    ("LB", &["LB", "LWB"]),
    ("CB_L", &["CB"]),
    ("CB_R", &["CB"]),
    ("RB", &["RB", "RWB"]),
    ("GK", &["GK"]),
];

fn lookup(key: &str) -> Option<&'static [&'static str]> {
    SLOT_RULES
        .iter()
        .find(|(slot, _)| *slot == key)
        .map(|(_, codes)| *codes)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Which step of the resolution chain produced the eligible codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The full slot key is in the rule table.
    Exact,
    /// The key minus its `_suffix` is in the rule table.
    BaseKey,
    /// Neither matched; the stripped key is taken as the only position code.
    Literal,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Exact => "exact",
            Resolution::BaseKey => "base-key",
            Resolution::Literal => "literal",
        };
        f.write_str(s)
    }
}

/// The set of position codes accepted by a slot. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligiblePositions {
    pub resolution: Resolution,
    codes: Vec<String>,
}

impl EligiblePositions {
    /// Whether a player with position `code` may fill the slot.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

/// Strip any sub-variant suffix: `"CM_L"` -> `"CM"`, `"ST"` -> `"ST"`.
pub fn base_key(slot_key: &str) -> &str {
    match slot_key.split_once('_') {
        Some((base, _)) => base,
        None => slot_key,
    }
}

/// Resolve the position codes eligible for `slot_key`.
///
/// Resolution order:
/// 1. exact match on the full key
/// 2. match on the key with its suffix stripped
/// 3. the stripped key itself as the sole code
pub fn eligible_positions(slot_key: &str) -> EligiblePositions {
    if let Some(codes) = lookup(slot_key) {
        return EligiblePositions {
            resolution: Resolution::Exact,
            codes: codes.iter().map(|c| c.to_string()).collect(),
        };
    }

    let base = base_key(slot_key);
    if let Some(codes) = lookup(base) {
        return EligiblePositions {
            resolution: Resolution::BaseKey,
            codes: codes.iter().map(|c| c.to_string()).collect(),
        };
    }

    EligiblePositions {
        resolution: Resolution::Literal,
        codes: vec![base.to_string()],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
