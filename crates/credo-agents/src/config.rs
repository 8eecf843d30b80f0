//! Model constants for need dynamics, crises, encounters, and conversion.
//!
//! The [`ModelConfig`] struct bundles every fixed coefficient of the model so
//! that callers (tick cycle, tests, scenario files) can override defaults.
//! The defaults are the standard model calibration.

use serde::Deserialize;

/// Tunable constants of the agent model.
///
/// Deserialised from the `model` section of the scenario file; any field
/// left out keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Smoothing coefficient for need convergence toward home provisions
    /// (default: 0.7).
    pub update_coef: f64,

    /// Quest value at or above which an agent is actively questing
    /// (default: 0.65).
    pub active_questing_threshold: f64,

    /// Crisis probability independent of need deficit (default: 0.01).
    pub crisis_base_chance: f64,

    /// Crisis probability added per unit of weighted need deficit
    /// (default: 0.1).
    pub crisis_chance_coef: f64,

    /// Multiplier applied to every need when a crisis strikes (default: 0.4).
    pub crisis_effect: f64,

    /// Contact count interval at which conversion is evaluated (default: 50).
    pub checkpoint_interval: u32,

    /// Scale applied to the priority-weighted provision advantage
    /// (default: 50).
    pub advantage_scale: f64,

    /// Upper bound of random preference values (default: 20).
    pub max_random_preference: u32,

    /// Offset keeping the random-bias denominator away from zero
    /// (default: 0.1).
    pub random_bias_offset: f64,

    /// Scale applied to summed positive provision differences
    /// (default: 10).
    pub intensity_scale: f64,

    /// Below this, a peer-unfavourable impression is rejected outright
    /// (default: 2).
    pub reject_threshold: f64,

    /// At or above this, a peer-favourable impression converts the agent
    /// (default: 4).
    pub convert_threshold: f64,

    /// Bias increase on rejection (default: 0.01).
    pub reject_bias_increase: f64,

    /// Bias increase on adaptation from a peer-unfavourable impression
    /// (default: 0.05).
    pub reluctant_adapt_bias_increase: f64,

    /// Bias increase on adaptation from a peer-favourable impression
    /// (default: 0.1).
    pub favourable_adapt_bias_increase: f64,

    /// z-score assumed when the agent is the only member of its home
    /// affiliation (default: 2).
    pub single_member_z: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            update_coef: 0.7,
            active_questing_threshold: 0.65,
            crisis_base_chance: 0.01,
            crisis_chance_coef: 0.1,
            crisis_effect: 0.4,
            checkpoint_interval: 50,
            advantage_scale: 50.0,
            max_random_preference: 20,
            random_bias_offset: 0.1,
            intensity_scale: 10.0,
            reject_threshold: 2.0,
            convert_threshold: 4.0,
            reject_bias_increase: 0.01,
            reluctant_adapt_bias_increase: 0.05,
            favourable_adapt_bias_increase: 0.1,
            single_member_z: 2.0,
        }
    }
}

impl ModelConfig {
    /// Whether a contact count sits on a conversion checkpoint: a positive
    /// multiple of [`checkpoint_interval`](Self::checkpoint_interval).
    ///
    /// An interval of zero disables checkpoints entirely.
    pub const fn is_checkpoint(&self, contacts: u32) -> bool {
        match contacts.checked_rem(self.checkpoint_interval) {
            Some(rem) => contacts > 0 && rem == 0,
            None => false,
        }
    }
}
