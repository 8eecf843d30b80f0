//! Error types for the credo-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Numeric edge cases of the model (single-member z-scores, unclamped needs)
//! are defined behaviour and never surface here; these errors cover
//! structural problems such as unknown IDs or a broken membership partition.

use credo_types::{AffiliationId, AgentId};

/// Errors that can occur while creating or updating agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent with the given ID was not found.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent name already exists in the manager.
    #[error("duplicate agent name: {0}")]
    DuplicateName(String),

    /// Priority weights were negative or did not sum to 1.
    #[error("invalid priorities for {name}: {reason}")]
    InvalidPriorities {
        /// The agent whose priorities were rejected.
        name: String,
        /// Description of what is wrong with the weights.
        reason: String,
    },

    /// A membership operation failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

/// Errors raised by the affiliation registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Affiliation with the given ID is not registered.
    #[error("affiliation not found: {0}")]
    AffiliationNotFound(AffiliationId),

    /// Affiliation name is already registered.
    #[error("duplicate affiliation name: {0}")]
    DuplicateName(String),

    /// Agent already belongs to an affiliation.
    #[error("agent {agent_id} is already a member of {affiliation_id}")]
    AlreadyEnrolled {
        /// The agent being enrolled.
        agent_id: AgentId,
        /// The affiliation the agent already belongs to.
        affiliation_id: AffiliationId,
    },

    /// Agent is not a member of the affiliation it is supposed to leave.
    #[error("agent {agent_id} is not a member of {affiliation_id}")]
    NotAMember {
        /// The agent being moved.
        agent_id: AgentId,
        /// The affiliation the agent was expected to belong to.
        affiliation_id: AffiliationId,
    },

    /// The exclusive-membership invariant does not hold.
    #[error("membership partition violated: {reason}")]
    PartitionViolated {
        /// Description of the violation.
        reason: String,
    },
}
