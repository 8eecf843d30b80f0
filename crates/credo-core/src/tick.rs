//! Tick cycle: the per-agent loop that drives the Credo simulation.
//!
//! Each tick advances the clock and then visits every agent in creation
//! order. For each agent:
//!
//! 1. **Needs** -- converge toward the home affiliation's provisions.
//! 2. **Crisis** -- one roll; a crisis scales every need down.
//! 3. **Encounters** -- one attempt per non-home affiliation, in
//!    registration order, folded into the agent's impression ledger.
//! 4. **Conversion** -- evaluate pending checkpoints.
//!
//! Agents are processed sequentially and later agents see the effects of
//! earlier agents' conversions within the same tick. All randomness comes
//! from the single seeded stream held in [`SimulationState`], so a run is
//! fully determined by its configuration and seed.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use tracing::{debug, trace};

use credo_agents::{
    AffiliationRegistry, AgentError, AgentState, ModelConfig, RegistryError, check_for_conversion,
    check_for_crisis, gen_encounter, update_needs,
};
use credo_types::{AffiliationId, AgentId, Context, DecisionKind, DecisionRecord};

use crate::clock::{ClockError, SimulationClock};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An agent operation failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent being processed.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// A registry lookup failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Encounters that happened this tick.
    pub encounters: u32,
    /// How many of those were active.
    pub active_encounters: u32,
    /// Crises that struck this tick.
    pub crises: u32,
    /// Decisions made this tick, in agent processing order.
    pub decisions: Vec<(AgentId, DecisionRecord)>,
}

impl TickSummary {
    fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    /// Number of decisions of the given kind made this tick.
    pub fn count(&self, kind: DecisionKind) -> u32 {
        let count = self.decisions.iter().filter(|(_, d)| d.kind == kind).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// The mutable simulation state passed through the tick cycle.
///
/// Bundles everything a tick reads or writes. Components receive the parts
/// they need explicitly; nothing is global.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The simulation clock.
    pub clock: SimulationClock,
    /// The shared social context.
    pub context: Context,
    /// Affiliations and their member sets.
    pub registry: AffiliationRegistry,
    /// Agent mutable state: `agent_id` -> state.
    pub agents: BTreeMap<AgentId, AgentState>,
    /// Agent IDs in creation order (the processing order).
    pub roster: Vec<AgentId>,
    /// Model constants.
    pub model: ModelConfig,
    /// The single random stream for the whole run.
    pub rng: SmallRng,
}

impl SimulationState {
    /// Index of the last completed tick (0 before the first).
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Agents in creation order.
    pub fn agents_in_order(&self) -> impl Iterator<Item = &AgentState> {
        self.roster.iter().filter_map(|id| self.agents.get(id))
    }

    /// Look up an agent by name.
    pub fn agent_by_name(&self, name: &str) -> Option<&AgentState> {
        self.agents_in_order().find(|a| a.name == name)
    }

    /// Verify the exclusive membership invariant over the whole population.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PartitionViolated`] if the member sets do
    /// not partition the agents, or if an agent's recorded home disagrees
    /// with the registry.
    pub fn check_partition(&self) -> Result<(), RegistryError> {
        self.registry.check_partition(self.agents.keys())?;
        for agent in self.agents.values() {
            if self.registry.home_of(agent.id) != Some(agent.home) {
                return Err(RegistryError::PartitionViolated {
                    reason: format!("agent {} home disagrees with the registry", agent.name),
                });
            }
        }
        Ok(())
    }
}

/// Execute a single tick.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or the state is
/// inconsistent (an agent or affiliation referenced but missing).
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let SimulationState {
        clock,
        context,
        registry,
        agents,
        roster,
        model,
        rng,
    } = state;

    let tick = clock.advance()?;
    let mut summary = TickSummary::new(tick);
    let affiliation_ids = registry.ids();

    for &agent_id in roster.as_slice() {
        let agent = agents
            .get_mut(&agent_id)
            .ok_or(TickError::Agent {
                agent_id,
                source: AgentError::AgentNotFound(agent_id),
            })?;
        let home = registry
            .get(agent.home)
            .ok_or(RegistryError::AffiliationNotFound(agent.home))?;

        update_needs(agent, home, model);

        if check_for_crisis(agent, model, rng) {
            summary.crises = summary.crises.saturating_add(1);
        }

        for affiliation_id in others(&affiliation_ids, agent.home) {
            let affiliation = registry
                .get(affiliation_id)
                .ok_or(RegistryError::AffiliationNotFound(affiliation_id))?;
            let Some(encounter) = gen_encounter(agent, affiliation, context, model, rng) else {
                continue;
            };
            trace!(
                tick,
                agent = %agent.name,
                affiliation = %affiliation.name,
                kind = %encounter.kind,
                intensity = encounter.intensity,
                "encounter"
            );
            agent.ledger.observe(affiliation_id, &encounter);
            summary.encounters = summary.encounters.saturating_add(1);
            if encounter.is_active() {
                summary.active_encounters = summary.active_encounters.saturating_add(1);
            }
        }

        let decisions = check_for_conversion(agent_id, agents, registry, context, model, tick)
            .map_err(|source| TickError::Agent { agent_id, source })?;
        summary
            .decisions
            .extend(decisions.into_iter().map(|record| (agent_id, record)));
    }

    debug!(
        tick,
        encounters = summary.encounters,
        active = summary.active_encounters,
        crises = summary.crises,
        decisions = summary.decisions.len(),
        "Tick complete"
    );

    Ok(summary)
}

/// Affiliation IDs other than `home`, in registration order.
fn others(ids: &[AffiliationId], home: AffiliationId) -> impl Iterator<Item = AffiliationId> + '_ {
    ids.iter().copied().filter(move |id| *id != home)
}
