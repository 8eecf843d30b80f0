//! Life crises.
//!
//! Every tick an agent may suffer a sudden disruption (illness, loss, a
//! mystical experience). The chance has a fixed base plus a term
//! proportional to the agent's priority-weighted need deficit, so
//! dissatisfied agents are more crisis-prone. A crisis scales every need by
//! the crisis effect.

use rand::Rng;
use tracing::trace;

use crate::agent::AgentState;
use crate::config::ModelConfig;

/// Probability of a crisis this tick.
///
/// ```text
/// chance = base_chance + sum_i(chance_coef * priority_i * (1 - need_i))
/// ```
pub fn crisis_chance(agent: &AgentState, config: &ModelConfig) -> f64 {
    agent
        .priorities
        .iter()
        .zip(agent.needs.iter())
        .fold(config.crisis_base_chance, |chance, (priority, need)| {
            chance + config.crisis_chance_coef * priority * (1.0 - need)
        })
}

/// Roll for a crisis and apply it when it strikes.
///
/// Exactly one uniform draw in `[0, 1)` is consumed. Returns whether the
/// crisis struck.
pub fn check_for_crisis<R: Rng + ?Sized>(
    agent: &mut AgentState,
    config: &ModelConfig,
    rng: &mut R,
) -> bool {
    let chance = crisis_chance(agent, config);
    let roll: f64 = rng.random();
    if roll < chance {
        simulate_crisis(agent, config);
        trace!(agent = %agent.name, chance, "crisis struck");
        true
    } else {
        false
    }
}

/// Multiply every need by the crisis effect.
pub fn simulate_crisis(agent: &mut AgentState, config: &ModelConfig) {
    for need in &mut agent.needs {
        *need *= config.crisis_effect;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use credo_types::{AffiliationId, AgentId, NeedVector};

    use super::*;
    use crate::impression::ImpressionLedger;

    fn make_agent(needs: NeedVector) -> AgentState {
        AgentState {
            id: AgentId::new(),
            name: "A".to_owned(),
            home: AffiliationId::new(),
            needs,
            priorities: [0.2; 5],
            bias: 1.0,
            random_preference: 1,
            ledger: ImpressionLedger::new(),
            decisions: Vec::new(),
        }
    }

    #[test]
    fn chance_grows_with_deficit() {
        let config = ModelConfig::default();
        let satisfied = make_agent([1.0; 5]);
        let deprived = make_agent([0.0; 5]);

        assert!((crisis_chance(&satisfied, &config) - 0.01).abs() < 1e-12);
        assert!((crisis_chance(&deprived, &config) - 0.11).abs() < 1e-12);
    }

    #[test]
    fn crisis_scales_every_need_exactly() {
        let config = ModelConfig::default();
        let mut agent = make_agent([0.5, 0.9, 0.1, 1.2, -0.3]);
        let before = agent.needs;

        simulate_crisis(&mut agent, &config);

        for (old, new) in before.iter().zip(agent.needs.iter()) {
            assert!((new - old * 0.4).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn certain_crisis_always_strikes() {
        let config = ModelConfig {
            crisis_base_chance: 1.0,
            ..ModelConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        let mut agent = make_agent([0.5; 5]);

        assert!(check_for_crisis(&mut agent, &config, &mut rng));
        assert!(agent.needs.iter().all(|n| (n - 0.2).abs() < 1e-12));
    }

    #[test]
    fn impossible_crisis_never_strikes() {
        let config = ModelConfig {
            crisis_base_chance: 0.0,
            crisis_chance_coef: 0.0,
            ..ModelConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        let mut agent = make_agent([0.5; 5]);

        for _ in 0..1000 {
            assert!(!check_for_crisis(&mut agent, &config, &mut rng));
        }
        assert!(agent.needs.iter().all(|n| (n - 0.5).abs() < 1e-12));
    }

    #[test]
    fn crisis_frequency_tracks_chance() {
        let config = ModelConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut struck = 0_u32;
        for _ in 0..20_000 {
            // Fresh agent each round so the chance stays at 0.06.
            let mut agent = make_agent([0.5; 5]);
            if check_for_crisis(&mut agent, &config, &mut rng) {
                struck = struck.saturating_add(1);
            }
        }
        // Expected 1200; allow a generous band.
        assert!((900..1500).contains(&struck), "struck {struck} times");
    }
}
