//! Conversion checkpoints: the reject / adapt / convert decision rule.
//!
//! An agent's accumulated impression of another affiliation is evaluated
//! only when its contact count reaches a checkpoint (a positive multiple of
//! the checkpoint interval). At a checkpoint the agent weighs two things:
//!
//! - **Weighted advantage**: how much better the other affiliation's
//!   provisions are than the home affiliation's, weighted by the agent's
//!   priorities and scaled by the advantage scale.
//! - **Relative impression**: the z-score of the agent's impression against
//!   the impressions every member of its home affiliation holds of the same
//!   affiliation (0 for members who never met it). A home affiliation with
//!   a single member uses a fixed z instead of a zero-sample deviation.
//!
//! # Decision rule
//!
//! | z      | condition                                                   | outcome |
//! |--------|-------------------------------------------------------------|---------|
//! | `< 0`  | `advantage + member_adaptability < reject_threshold`        | reject  |
//! | `< 0`  | otherwise                                                   | adapt   |
//! | `>= 0` | `(advantage + 2 z resilience) / member_adaptability < convert_threshold` | adapt |
//! | `>= 0` | otherwise                                                   | convert |
//!
//! `member_adaptability` is that of the affiliation being evaluated.
//!
//! Rejects and adaptations keep the affiliation tracked but move its
//! contact count off the checkpoint. A conversion clears all tracking,
//! resets bias, and transfers membership. Only a favourable adaptation
//! lets evaluation continue to the agent's next pending checkpoint.

use std::collections::BTreeMap;

use tracing::debug;

use credo_types::{
    Affiliation, AffiliationId, AgentId, Context, DecisionKind, DecisionRecord,
};

use crate::agent::{AgentState, INITIAL_BIAS};
use crate::config::ModelConfig;
use crate::error::{AgentError, RegistryError};
use crate::registry::AffiliationRegistry;

/// Outcome of the decision rule, with the bias increase it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// The decision taken.
    pub kind: DecisionKind,
    /// Amount added to the agent's bias. Zero for conversions, which reset
    /// bias instead.
    pub bias_increase: f64,
}

/// The agent's assessment of how much better `candidate` provides than
/// `home`.
///
/// ```text
/// advantage = advantage_scale * sum_i(priority_i * (candidate_i - home_i))
/// ```
pub fn weighted_advantage(
    agent: &AgentState,
    candidate: &Affiliation,
    home: &Affiliation,
    config: &ModelConfig,
) -> f64 {
    let weighted: f64 = agent
        .priorities
        .iter()
        .zip(candidate.provisions.iter())
        .zip(home.provisions.iter())
        .map(|((priority, theirs), ours)| priority * (theirs - ours))
        .sum();
    weighted * config.advantage_scale
}

/// Mean and sample standard deviation (n - 1 denominator).
///
/// Returns `None` for fewer than two values.
pub fn mean_and_sample_stdev(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = f64::from(u32::try_from(values.len()).unwrap_or(u32::MAX));
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((mean, (squares / (n - 1.0)).sqrt()))
}

/// z-score of `own` among `peer_impressions`, which must include `own`.
///
/// A single peer (the agent alone) yields `single_member_z`. Identical
/// impressions across several peers have no spread and yield 0.
pub fn impression_z_score(own: f64, peer_impressions: &[f64], config: &ModelConfig) -> f64 {
    match mean_and_sample_stdev(peer_impressions) {
        None => config.single_member_z,
        Some((mean, stdev)) if stdev > 0.0 => (own - mean) / stdev,
        Some(_) => 0.0,
    }
}

/// Apply the decision rule.
pub fn decide(
    weighted_advantage: f64,
    z: f64,
    member_adaptability: f64,
    resilience: f64,
    config: &ModelConfig,
) -> Verdict {
    if z < 0.0 {
        if weighted_advantage + member_adaptability < config.reject_threshold {
            Verdict {
                kind: DecisionKind::Reject,
                bias_increase: config.reject_bias_increase,
            }
        } else {
            Verdict {
                kind: DecisionKind::Adapt,
                bias_increase: config.reluctant_adapt_bias_increase,
            }
        }
    } else if (weighted_advantage + 2.0 * z * resilience) / member_adaptability
        < config.convert_threshold
    {
        Verdict {
            kind: DecisionKind::Adapt,
            bias_increase: config.favourable_adapt_bias_increase,
        }
    } else {
        Verdict {
            kind: DecisionKind::Convert,
            bias_increase: 0.0,
        }
    }
}

/// Tracked affiliations whose contact count sits on a checkpoint, in
/// first-contact order.
pub fn pending_checkpoints(agent: &AgentState, config: &ModelConfig) -> Vec<AffiliationId> {
    agent
        .ledger
        .iter()
        .filter(|entry| config.is_checkpoint(entry.contacts))
        .map(|entry| entry.affiliation_id)
        .collect()
}

/// Evaluate the agent's pending checkpoints and apply the resulting
/// decisions.
///
/// Checkpoints are visited in first-contact order. A favourable adaptation
/// (z >= 0) moves on to the next pending checkpoint; a reject, a reluctant
/// adaptation, or a conversion ends the evaluation. Each checkpoint
/// recomputes the z-score from the home roster as it stands at that point.
///
/// A conversion transfers membership through the registry before the
/// agent's own state is touched, so a failed transfer leaves the agent
/// unchanged.
///
/// # Errors
///
/// Returns [`AgentError::AgentNotFound`] if the agent or one of its fellow
/// members is missing from `agents`, or a registry error if an affiliation
/// is unknown or membership is inconsistent.
pub fn check_for_conversion(
    agent_id: AgentId,
    agents: &mut BTreeMap<AgentId, AgentState>,
    registry: &mut AffiliationRegistry,
    context: &Context,
    config: &ModelConfig,
    tick: u64,
) -> Result<Vec<DecisionRecord>, AgentError> {
    let agent = agents
        .get(&agent_id)
        .ok_or(AgentError::AgentNotFound(agent_id))?;
    let pending = pending_checkpoints(agent, config);

    let mut records = Vec::new();
    for target_id in pending {
        let (record, z) =
            evaluate_checkpoint(agent_id, target_id, agents, registry, context, config, tick)?;
        records.push(record);
        if record.kind != DecisionKind::Adapt || z < 0.0 {
            break;
        }
    }
    Ok(records)
}

/// Decide on a single checkpoint and apply its effects. Returns the record
/// together with the z-score it was decided on.
fn evaluate_checkpoint(
    agent_id: AgentId,
    target_id: AffiliationId,
    agents: &mut BTreeMap<AgentId, AgentState>,
    registry: &mut AffiliationRegistry,
    context: &Context,
    config: &ModelConfig,
    tick: u64,
) -> Result<(DecisionRecord, f64), AgentError> {
    let agent = agents
        .get(&agent_id)
        .ok_or(AgentError::AgentNotFound(agent_id))?;
    let home_id = agent.home;
    let home = registry
        .get(home_id)
        .ok_or(RegistryError::AffiliationNotFound(home_id))?;
    let target = registry
        .get(target_id)
        .ok_or(RegistryError::AffiliationNotFound(target_id))?;

    let advantage = weighted_advantage(agent, target, home, config);

    let peers = registry.snapshot_members(home_id)?;
    let peer_impressions = peers
        .iter()
        .map(|peer_id| {
            agents
                .get(peer_id)
                .map(|peer| peer.ledger.impression(target_id).unwrap_or(0.0))
                .ok_or(AgentError::AgentNotFound(*peer_id))
        })
        .collect::<Result<Vec<f64>, AgentError>>()?;
    let own = agent.ledger.impression(target_id).unwrap_or(0.0);
    let z = impression_z_score(own, &peer_impressions, config);

    let verdict = decide(
        advantage,
        z,
        target.member_adaptability,
        context.resilience,
        config,
    );

    debug!(
        agent = %agent.name,
        home = %home.name,
        target = %target.name,
        tick,
        advantage,
        z,
        decision = %verdict.kind,
        "conversion checkpoint"
    );

    if verdict.kind == DecisionKind::Convert {
        registry.transfer(agent_id, home_id, target_id)?;
    }

    let agent = agents
        .get_mut(&agent_id)
        .ok_or(AgentError::AgentNotFound(agent_id))?;
    let record = DecisionRecord {
        kind: verdict.kind,
        source: home_id,
        target: target_id,
        tick,
    };
    agent.decisions.push(record);

    match verdict.kind {
        DecisionKind::Reject => {
            agent.ledger.reset_impression(target_id);
            agent.ledger.bump_contacts(target_id);
            agent.bias += verdict.bias_increase;
        }
        DecisionKind::Adapt => {
            agent.ledger.halve_impression(target_id);
            agent.ledger.bump_contacts(target_id);
            agent.bias += verdict.bias_increase;
        }
        DecisionKind::Convert => {
            agent.ledger.clear();
            agent.bias = INITIAL_BIAS;
            agent.home = target_id;
        }
    }

    Ok((record, z))
}
