//! Need dynamics applied to agents each tick.
//!
//! - **Quest value**: the priority-weighted unmet need, divided by the
//!   agent's bias toward its home affiliation. High bias suppresses the
//!   urge to look elsewhere.
//! - **Need update**: each need moves toward the home affiliation's
//!   provision on that dimension by `priority * update_coef` of the gap
//!   (exponential smoothing).
//!
//! Needs are not clamped to `[0, 1]`. A coefficient product above 1 would
//! overshoot the provision, and crises push needs toward 0 independently, so
//! long runs can leave the nominal range. This is accepted model behaviour.

use credo_types::Affiliation;

use crate::agent::AgentState;
use crate::config::ModelConfig;

/// Unmet-need pressure of an agent, discounted by its bias.
///
/// ```text
/// quest_val = sum_i(priority_i * (1 - need_i)) / bias
/// ```
pub fn quest_val(agent: &AgentState) -> f64 {
    let unmet: f64 = agent
        .priorities
        .iter()
        .zip(agent.needs.iter())
        .map(|(priority, need)| priority * (1.0 - need))
        .sum();
    unmet / agent.bias
}

/// Whether the agent is actively searching for something its home
/// affiliation does not provide.
pub fn is_actively_questing(agent: &AgentState, config: &ModelConfig) -> bool {
    quest_val(agent) >= config.active_questing_threshold
}

/// Move each need toward the home affiliation's provision on that
/// dimension.
///
/// ```text
/// need_i += priority_i * update_coef * (provision_i - need_i)
/// ```
pub fn update_needs(agent: &mut AgentState, home: &Affiliation, config: &ModelConfig) {
    for ((need, priority), provision) in agent
        .needs
        .iter_mut()
        .zip(agent.priorities.iter())
        .zip(home.provisions.iter())
    {
        *need += priority * config.update_coef * (provision - *need);
    }
}
