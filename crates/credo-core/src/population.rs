//! Build the initial [`SimulationState`] from a scenario.
//!
//! All randomness is drawn from a single `SmallRng` seeded with
//! `simulation.seed`, in a fixed order:
//!
//! 1. Per affiliation, in file order: its ID, then `member_adaptability`
//!    (integer 5 to 20, divided by 10) and `random_preference` (1 to 20)
//!    when not given.
//! 2. Per agent: its ID, then home, needs, priorities, and
//!    `random_preference` for each field not given.
//!
//! The same stream then drives the simulation itself, so the seed alone
//! determines the whole run.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use credo_agents::{AffiliationRegistry, AgentError, AgentManager, AgentParams, RegistryError};
use credo_types::{Affiliation, AffiliationId, AgentId, Context, NeedVector};

use crate::clock::SimulationClock;
use crate::config::{AffiliationConfig, AgentConfig, ScenarioConfig};
use crate::tick::SimulationState;

/// Letters used for generated agent names.
const NAME_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Errors that can occur while building the population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// The scenario defines no affiliation.
    #[error("scenario defines no affiliations")]
    NoAffiliations,

    /// An agent names a home affiliation that does not exist.
    #[error("agent {agent} names unknown home affiliation {home:?}")]
    UnknownHome {
        /// The agent's name.
        agent: String,
        /// The unknown affiliation name.
        home: String,
    },

    /// Agent creation failed (duplicate name, bad priorities).
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// Affiliation registration or enrollment failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

/// Build the initial simulation state for a scenario.
///
/// # Errors
///
/// Returns [`PopulationError`] if the scenario is structurally invalid: no
/// affiliations, duplicate names, an unknown home, or invalid priorities.
pub fn build_state(config: &ScenarioConfig) -> Result<SimulationState, PopulationError> {
    if config.affiliations.is_empty() {
        return Err(PopulationError::NoAffiliations);
    }

    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);

    let mut registry = AffiliationRegistry::new();
    for entry in &config.affiliations {
        let affiliation = build_affiliation(entry, &mut rng);
        debug!(
            name = %affiliation.name,
            member_adaptability = affiliation.member_adaptability,
            random_preference = affiliation.random_preference,
            "Affiliation registered"
        );
        registry.register(affiliation)?;
    }
    let affiliation_ids = registry.ids();

    let entries: Vec<AgentConfig> = if config.population.agents.is_empty() {
        generated_agents(config.population.size)
    } else {
        config.population.agents.clone()
    };

    let mut manager = AgentManager::new();
    let mut agents = BTreeMap::new();
    let mut roster = Vec::with_capacity(entries.len());
    for entry in entries {
        let params = agent_params(entry, &registry, &affiliation_ids, &mut rng)?;
        let agent = manager.create_agent(params)?;
        registry.enroll(agent.id, agent.home)?;
        roster.push(agent.id);
        agents.insert(agent.id, agent);
    }

    info!(
        scenario = %config.simulation.name,
        seed = config.simulation.seed,
        affiliations = registry.len(),
        agents = roster.len(),
        "Population built"
    );

    Ok(SimulationState {
        clock: SimulationClock::new(),
        context: Context {
            name: config.context.name.clone(),
            fluidity: config.context.fluidity,
            stability: config.context.stability,
            resilience: config.context.resilience,
        },
        registry,
        agents,
        roster,
        model: config.model.clone(),
        rng,
    })
}

fn build_affiliation<R: Rng + ?Sized>(entry: &AffiliationConfig, rng: &mut R) -> Affiliation {
    let id = AffiliationId::from_rng(rng);
    let member_adaptability = entry
        .member_adaptability
        .unwrap_or_else(|| f64::from(rng.random_range(5..=20_u32)) / 10.0);
    let random_preference = entry
        .random_preference
        .unwrap_or_else(|| rng.random_range(1..=20_u32));
    Affiliation {
        id,
        name: entry.name.clone(),
        publicity: entry.publicity,
        provisions: entry.provisions,
        advocate_adaptability: entry.advocate_adaptability,
        member_adaptability,
        random_preference,
    }
}

fn agent_params<R: Rng + ?Sized>(
    entry: AgentConfig,
    registry: &AffiliationRegistry,
    affiliation_ids: &[AffiliationId],
    rng: &mut R,
) -> Result<AgentParams, PopulationError> {
    let id = AgentId::from_rng(rng);

    let home = match entry.home {
        Some(home) => match registry.find_by_name(&home) {
            Some(affiliation) => affiliation.id,
            None => {
                return Err(PopulationError::UnknownHome {
                    agent: entry.name,
                    home,
                });
            }
        },
        None => *affiliation_ids
            .choose(rng)
            .ok_or(PopulationError::NoAffiliations)?,
    };

    let needs = entry.needs.unwrap_or_else(|| random_needs(rng));
    let priorities = entry.priorities.unwrap_or_else(|| random_priorities(rng));
    let random_preference = entry
        .random_preference
        .unwrap_or_else(|| rng.random_range(1..=20_u32));

    Ok(AgentParams {
        id,
        name: entry.name,
        home,
        needs,
        priorities,
        random_preference,
    })
}

/// Needs drawn per dimension as an integer 50 to 89, divided by 100.
fn random_needs<R: Rng + ?Sized>(rng: &mut R) -> NeedVector {
    let mut needs = [0.0; 5];
    for need in &mut needs {
        *need = f64::from(rng.random_range(50..=89_u32)) / 100.0;
    }
    needs
}

/// Integer weights 1 to 10 per dimension, normalised to sum to 1.
fn random_priorities<R: Rng + ?Sized>(rng: &mut R) -> NeedVector {
    let mut weights = [0.0; 5];
    for weight in &mut weights {
        *weight = f64::from(rng.random_range(1..=10_u32));
    }
    let total: f64 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Unnamed placeholders for `size` generated agents.
fn generated_agents(size: u32) -> Vec<AgentConfig> {
    (0..size)
        .map(|index| AgentConfig {
            name: generated_name(index),
            home: None,
            needs: None,
            priorities: None,
            random_preference: None,
        })
        .collect()
}

/// A, B, ..., Z, then A1, B1, ..., Z1, A2, and so on.
pub fn generated_name(index: u32) -> String {
    let letters = u32::try_from(NAME_LETTERS.len()).unwrap_or(1);
    let round = index.checked_div(letters).unwrap_or(0);
    let position = index.checked_rem(letters).unwrap_or(0);
    let letter = usize::try_from(position)
        .ok()
        .and_then(|p| NAME_LETTERS.get(p))
        .map_or('?', |b| char::from(*b));
    if round == 0 {
        letter.to_string()
    } else {
        format!("{letter}{round}")
    }
}
