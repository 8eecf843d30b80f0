//! Shared type definitions for the Credo simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the Credo workspace: identifiers, enumerations, entity attributes, and
//! the snapshot types handed to reporting.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and affiliations
//! - [`enums`] -- Encounter kinds, decision kinds
//! - [`structs`] -- Context, affiliation attributes, encounters, decision
//!   records, snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DecisionKind, EncounterKind};
pub use ids::{AffiliationId, AgentId};
pub use structs::{
    Affiliation, AffiliationSnapshot, AgentSnapshot, Context, DecisionRecord, Encounter,
    NEED_DIMENSIONS, NeedVector, SimulationSnapshot,
};
