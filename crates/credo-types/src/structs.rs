//! Core entity structs for the Credo simulation.
//!
//! Covers the shared [`Context`], the static attributes of an
//! [`Affiliation`], transient [`Encounter`] values, the append-only
//! [`DecisionRecord`], and the serialisable snapshot types consumed by
//! reporting.

use serde::{Deserialize, Serialize};

use crate::enums::{DecisionKind, EncounterKind};
use crate::ids::{AffiliationId, AgentId};

/// Number of need dimensions tracked per agent.
pub const NEED_DIMENSIONS: usize = 5;

/// One value per need dimension, in fixed order: pleasure, relationships,
/// self-esteem, conceptual system, transcendence.
pub type NeedVector = [f64; NEED_DIMENSIONS];

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Static environmental parameters shared by every agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Human-readable name.
    pub name: String,
    /// Encounter-likelihood multiplier (nominally 0.0 to 1.0).
    pub fluidity: f64,
    /// Encounter-intensity multiplier (nominally 0.0 to 2.0).
    pub stability: f64,
    /// Scales how strongly a favourable impression pushes toward conversion.
    /// Zero means impressions never tip an adaptation into a conversion.
    pub resilience: f64,
}

// ---------------------------------------------------------------------------
// Affiliation
// ---------------------------------------------------------------------------

/// Static attributes of one competing belief system.
///
/// Membership is not stored here: the registry owns the member partition so
/// that every move goes through a single transfer operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Unique identifier.
    pub id: AffiliationId,
    /// Human-readable name.
    pub name: String,
    /// Encounter-likelihood multiplier (nominally 0.0 to 1.0).
    pub publicity: f64,
    /// Level of satisfaction the affiliation provides on each need dimension.
    pub provisions: NeedVector,
    /// How far advocates cater to an individual during an encounter (1 to 5).
    pub advocate_adaptability: f64,
    /// How adaptable the affiliation looks from a member's perspective
    /// (0.5 to 2.0). Decides between adapting and converting.
    pub member_adaptability: f64,
    /// Idiosyncratic preference value (1 to 20). Agents with a close value
    /// are predisposed toward this affiliation.
    pub random_preference: u32,
}

// ---------------------------------------------------------------------------
// Encounter
// ---------------------------------------------------------------------------

/// A single contact between an agent and a non-home affiliation.
///
/// Intensity is unbounded and is zero when the affiliation provides nothing
/// beyond the agent's current satisfaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Passive exposure or active seeking.
    pub kind: EncounterKind,
    /// Strength of the impression left by the encounter.
    pub intensity: f64,
}

impl Encounter {
    /// Whether the agent sought this encounter out.
    pub const fn is_active(&self) -> bool {
        matches!(self.kind, EncounterKind::Active)
    }

    /// Whether the agent was merely exposed.
    pub const fn is_passive(&self) -> bool {
        matches!(self.kind, EncounterKind::Passive)
    }

    /// Contribution of this encounter to an accumulated impression score.
    pub fn weighted_intensity(&self) -> f64 {
        self.intensity * self.kind.impression_weight()
    }
}

// ---------------------------------------------------------------------------
// DecisionRecord
// ---------------------------------------------------------------------------

/// Immutable entry in an agent's decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// What the agent decided.
    pub kind: DecisionKind,
    /// The agent's home affiliation at the time of the decision.
    pub source: AffiliationId,
    /// The affiliation being evaluated.
    pub target: AffiliationId,
    /// Tick index (1-based) at which the decision was made.
    pub tick: u64,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Reporting view of one agent at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current home affiliation.
    pub home: AffiliationId,
    /// Current need satisfaction levels.
    pub needs: NeedVector,
    /// Fixed priority weights (sum to 1).
    pub priorities: NeedVector,
    /// Idiosyncratic preference value.
    pub random_preference: u32,
    /// Perceived compatibility bias with the home affiliation.
    pub bias: f64,
    /// Decision log in append order.
    pub decisions: Vec<DecisionRecord>,
}

/// Reporting view of one affiliation and its member roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliationSnapshot {
    /// Static attributes.
    pub affiliation: Affiliation,
    /// Members in population order.
    pub members: Vec<AgentId>,
}

/// Full in-memory snapshot of a simulation, suitable for reporting and
/// JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Last completed tick (0 before the first tick).
    pub tick: u64,
    /// The shared context.
    pub context: Context,
    /// Affiliations in registration order.
    pub affiliations: Vec<AffiliationSnapshot>,
    /// Agents in population order.
    pub agents: Vec<AgentSnapshot>,
}

impl SimulationSnapshot {
    /// Look up an affiliation name by ID.
    pub fn affiliation_name(&self, id: AffiliationId) -> Option<&str> {
        self.affiliations
            .iter()
            .find(|a| a.affiliation.id == id)
            .map(|a| a.affiliation.name.as_str())
    }

    /// Look up an agent name by ID.
    pub fn agent_name(&self, id: AgentId) -> Option<&str> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_intensity_doubles_active() {
        let active = Encounter {
            kind: EncounterKind::Active,
            intensity: 1.5,
        };
        let passive = Encounter {
            kind: EncounterKind::Passive,
            intensity: 1.5,
        };
        assert!(active.is_active());
        assert!(passive.is_passive());
        assert!((active.weighted_intensity() - 3.0).abs() < f64::EPSILON);
        assert!((passive.weighted_intensity() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_name_lookup() {
        let affiliation = Affiliation {
            id: AffiliationId::new(),
            name: "Religion 1".to_owned(),
            publicity: 1.0,
            provisions: [0.5; NEED_DIMENSIONS],
            advocate_adaptability: 1.0,
            member_adaptability: 1.0,
            random_preference: 3,
        };
        let id = affiliation.id;
        let snapshot = SimulationSnapshot {
            tick: 0,
            context: Context {
                name: "Society".to_owned(),
                fluidity: 1.0,
                stability: 1.0,
                resilience: 1.0,
            },
            affiliations: vec![AffiliationSnapshot {
                affiliation,
                members: Vec::new(),
            }],
            agents: Vec::new(),
        };
        assert_eq!(snapshot.affiliation_name(id), Some("Religion 1"));
        assert_eq!(snapshot.affiliation_name(AffiliationId::new()), None);
    }
}
