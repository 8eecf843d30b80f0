//! Agent creation and per-agent mutable state.
//!
//! The [`AgentManager`] creates new agents and enforces name uniqueness and
//! well-formed priority weights. It produces an [`AgentState`] holding the
//! need profile, the home affiliation, the impression ledger, and the
//! decision log.
//!
//! The shared context is not stored per agent: there is exactly one, owned
//! by the simulation state and passed to every model function.

use std::collections::BTreeSet;

use credo_types::{AffiliationId, AgentId, AgentSnapshot, DecisionRecord, NeedVector};

use crate::error::AgentError;
use crate::impression::ImpressionLedger;

/// Allowed deviation of the priority sum from 1.
pub const PRIORITY_SUM_TOLERANCE: f64 = 1e-9;

/// Bias assigned at creation and restored after every conversion.
pub const INITIAL_BIAS: f64 = 1.0;

/// Mutable state of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Unique identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// The single affiliation the agent currently belongs to.
    pub home: AffiliationId,
    /// Current satisfaction per need dimension. Nominally 0.0 to 1.0 but
    /// never clamped.
    pub needs: NeedVector,
    /// Fixed weights per need dimension, non-negative and summing to 1.
    pub priorities: NeedVector,
    /// Perceived compatibility with the home affiliation. Starts at 1, grows
    /// on reject/adapt, resets to 1 on convert.
    pub bias: f64,
    /// Idiosyncratic preference value (1 to 20).
    pub random_preference: u32,
    /// Impressions of, and contacts with, non-home affiliations.
    pub ledger: ImpressionLedger,
    /// Append-only decision log.
    pub decisions: Vec<DecisionRecord>,
}

impl AgentState {
    /// Reporting view of this agent.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            home: self.home,
            needs: self.needs,
            priorities: self.priorities,
            random_preference: self.random_preference,
            bias: self.bias,
            decisions: self.decisions.clone(),
        }
    }
}

/// Parameters for creating an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentParams {
    /// Identifier to assign.
    pub id: AgentId,
    /// Display name (must be unique).
    pub name: String,
    /// Initial home affiliation.
    pub home: AffiliationId,
    /// Initial need satisfaction levels.
    pub needs: NeedVector,
    /// Priority weights (non-negative, summing to 1).
    pub priorities: NeedVector,
    /// Idiosyncratic preference value.
    pub random_preference: u32,
}

/// Creates agents and tracks the names in use.
#[derive(Debug, Default)]
pub struct AgentManager {
    /// Set of all agent names currently in use (for uniqueness checks).
    names_in_use: BTreeSet<String>,
}

impl AgentManager {
    /// Create a new empty agent manager.
    pub const fn new() -> Self {
        Self {
            names_in_use: BTreeSet::new(),
        }
    }

    /// Create an agent with bias 1, an empty ledger, and an empty decision
    /// log.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is already taken,
    /// or [`AgentError::InvalidPriorities`] if a weight is negative or the
    /// weights do not sum to 1.
    pub fn create_agent(&mut self, params: AgentParams) -> Result<AgentState, AgentError> {
        if self.names_in_use.contains(&params.name) {
            return Err(AgentError::DuplicateName(params.name));
        }
        validate_priorities(&params.name, &params.priorities)?;
        self.names_in_use.insert(params.name.clone());

        Ok(AgentState {
            id: params.id,
            name: params.name,
            home: params.home,
            needs: params.needs,
            priorities: params.priorities,
            bias: INITIAL_BIAS,
            random_preference: params.random_preference,
            ledger: ImpressionLedger::new(),
            decisions: Vec::new(),
        })
    }

    /// Whether a name is already taken.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names_in_use.contains(name)
    }
}

/// Check that priority weights are non-negative, finite, and sum to 1.
///
/// # Errors
///
/// Returns [`AgentError::InvalidPriorities`] describing the first problem
/// found.
pub fn validate_priorities(name: &str, priorities: &NeedVector) -> Result<(), AgentError> {
    if priorities.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(AgentError::InvalidPriorities {
            name: name.to_owned(),
            reason: format!("weights must be finite and non-negative, got {priorities:?}"),
        });
    }
    let sum: f64 = priorities.iter().sum();
    if (sum - 1.0).abs() > PRIORITY_SUM_TOLERANCE {
        return Err(AgentError::InvalidPriorities {
            name: name.to_owned(),
            reason: format!("weights must sum to 1, got {sum}"),
        });
    }
    Ok(())
}
