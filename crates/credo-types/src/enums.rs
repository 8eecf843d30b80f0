//! Enumeration types for the Credo simulation.
//!
//! Encounter kinds and decision kinds are explicit tagged variants. Neither
//! carries an ordering that the model relies on.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encounters
// ---------------------------------------------------------------------------

/// How an agent met an affiliation during an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    /// The agent was exposed to the affiliation without seeking it out.
    Passive,
    /// The agent sought the affiliation out. Counts double toward impressions.
    Active,
}

impl EncounterKind {
    /// Weight applied to the encounter intensity when folded into an
    /// impression score.
    pub const fn impression_weight(self) -> f64 {
        match self {
            Self::Passive => 1.0,
            Self::Active => 2.0,
        }
    }
}

impl core::fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Passive => f.write_str("PASSIVE"),
            Self::Active => f.write_str("ACTIVE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Outcome of a conversion checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// The agent dismisses the other affiliation.
    Reject,
    /// The agent stays but absorbs something of the other affiliation.
    Adapt,
    /// The agent leaves its home affiliation for the other one.
    Convert,
}

impl core::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Reject => f.write_str("REJECT"),
            Self::Adapt => f.write_str("ADAPT"),
            Self::Convert => f.write_str("CONVERT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_encounters_weigh_double() {
        let ratio = EncounterKind::Active.impression_weight()
            / EncounterKind::Passive.impression_weight();
        assert!((ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decision_kinds_serialize_snake_case() {
        let json = serde_json::to_string(&DecisionKind::Convert).ok();
        assert_eq!(json.as_deref(), Some("\"convert\""));
    }
}
