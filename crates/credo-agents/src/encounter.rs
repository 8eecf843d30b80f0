//! Encounter generation between an agent and a non-home affiliation.
//!
//! Each tick, for every affiliation other than its home, an agent may meet
//! that affiliation. Generation happens in three steps:
//!
//! 1. **Probability**: `quest_val * publicity * fluidity`, doubled and capped
//!    at 1 when the agent is actively questing. One uniform draw decides
//!    whether an encounter happens at all.
//! 2. **Kind**: a second uniform draw; the encounter is active when the
//!    quest value exceeds it.
//! 3. **Intensity**: the product of an idiosyncratic random bias, context
//!    stability, advocate adaptability, and the priority-weighted amount by
//!    which the affiliation's provisions exceed the agent's current needs.
//!
//! Generation has no side effects on agent or affiliation state. The caller
//! folds the result into the agent's impression ledger.

use rand::Rng;

use credo_types::{Affiliation, Context, Encounter, EncounterKind};

use crate::agent::AgentState;
use crate::config::ModelConfig;
use crate::needs::{is_actively_questing, quest_val};

/// Probability that the agent meets the affiliation this tick.
///
/// Only the actively-questing branch is capped at 1. Out-of-range
/// publicity or fluidity values can push the plain product above 1, which
/// simply guarantees an encounter.
pub fn encounter_probability(
    agent: &AgentState,
    affiliation: &Affiliation,
    context: &Context,
    config: &ModelConfig,
) -> f64 {
    let base = quest_val(agent) * affiliation.publicity * context.fluidity;
    if is_actively_questing(agent, config) {
        (base * 2.0).min(1.0)
    } else {
        base
    }
}

/// Idiosyncratic predisposition of the agent toward the affiliation.
///
/// ```text
/// random_bias = ln(max_pref / |agent_pref - affiliation_pref + offset| + 1)
/// ```
///
/// Closer preference values give a larger bias. Equal values leave only the
/// offset in the denominator, which is the maximum, not a division by zero.
pub fn random_bias(agent: &AgentState, affiliation: &Affiliation, config: &ModelConfig) -> f64 {
    let gap = f64::from(agent.random_preference) - f64::from(affiliation.random_preference)
        + config.random_bias_offset;
    (f64::from(config.max_random_preference) / gap.abs() + 1.0).ln()
}

/// Priority-weighted sum of the dimensions where the affiliation provides
/// more than the agent currently has. Deficits count as zero.
pub fn positive_provision_gap(agent: &AgentState, affiliation: &Affiliation) -> f64 {
    agent
        .priorities
        .iter()
        .zip(agent.needs.iter())
        .zip(affiliation.provisions.iter())
        .map(|((priority, need), provision)| priority * (provision - need).max(0.0))
        .sum()
}

/// Strength of an encounter between the agent and the affiliation.
///
/// ```text
/// intensity = random_bias * stability * advocate_adaptability
///             * intensity_scale * positive_provision_gap
/// ```
pub fn encounter_intensity(
    agent: &AgentState,
    affiliation: &Affiliation,
    context: &Context,
    config: &ModelConfig,
) -> f64 {
    random_bias(agent, affiliation, config)
        * context.stability
        * affiliation.advocate_adaptability
        * config.intensity_scale
        * positive_provision_gap(agent, affiliation)
}

/// Decide whether the agent meets the affiliation this tick and, if so,
/// build the encounter.
///
/// Consumes one uniform draw when no encounter occurs and two when one does.
pub fn gen_encounter<R: Rng + ?Sized>(
    agent: &AgentState,
    affiliation: &Affiliation,
    context: &Context,
    config: &ModelConfig,
    rng: &mut R,
) -> Option<Encounter> {
    let probability = encounter_probability(agent, affiliation, context, config);
    let roll: f64 = rng.random();
    if roll > probability {
        return None;
    }

    let kind_roll: f64 = rng.random();
    let kind = if quest_val(agent) > kind_roll {
        EncounterKind::Active
    } else {
        EncounterKind::Passive
    };

    Some(Encounter {
        kind,
        intensity: encounter_intensity(agent, affiliation, context, config),
    })
}
