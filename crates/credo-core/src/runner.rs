//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`run_tick`] for a fixed number of ticks,
//! notifies a [`TickCallback`] after each one, logs progress at a
//! configurable interval, and tallies the decisions made over the run.
//!
//! [`run_tick`]: crate::tick::run_tick

use tracing::{info, warn};

use credo_types::DecisionKind;

use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    /// Total number of ticks executed by this call.
    pub total_ticks: u64,
    /// Conversions over the run.
    pub conversions: u64,
    /// Adaptations over the run.
    pub adaptations: u64,
    /// Rejections over the run.
    pub rejections: u64,
    /// Encounters over the run.
    pub encounters: u64,
    /// Crises over the run.
    pub crises: u64,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
}

impl SimulationResult {
    fn absorb(&mut self, summary: &TickSummary) {
        self.total_ticks = self.total_ticks.saturating_add(1);
        self.conversions = self
            .conversions
            .saturating_add(u64::from(summary.count(DecisionKind::Convert)));
        self.adaptations = self
            .adaptations
            .saturating_add(u64::from(summary.count(DecisionKind::Adapt)));
        self.rejections = self
            .rejections
            .saturating_add(u64::from(summary.count(DecisionKind::Reject)));
        self.encounters = self.encounters.saturating_add(u64::from(summary.encounters));
        self.crises = self.crises.saturating_add(u64::from(summary.crises));
    }
}

/// Callback invoked after each tick completes.
///
/// The callback receives the tick summary and the current simulation
/// state.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run `ticks` ticks.
///
/// A progress line is logged every `progress_interval` ticks (0 disables
/// it).
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails. Ticks already executed stay
/// applied to `state`.
pub fn run_simulation(
    state: &mut SimulationState,
    ticks: u64,
    progress_interval: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut result = SimulationResult::default();

    info!(
        ticks,
        agents = state.roster.len(),
        affiliations = state.registry.len(),
        "Simulation starting"
    );

    for _ in 0..ticks {
        let summary = tick::run_tick(state)?;
        result.absorb(&summary);
        callback.on_tick(&summary, state);

        if summary
            .tick
            .checked_rem(progress_interval)
            .is_some_and(|r| r == 0)
        {
            info!(
                tick = summary.tick,
                conversions = result.conversions,
                adaptations = result.adaptations,
                rejections = result.rejections,
                "Progress"
            );
        }

        result.final_summary = Some(summary);
    }

    Ok(result)
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        conversions = result.conversions,
        adaptations = result.adaptations,
        rejections = result.rejections,
        encounters = result.encounters,
        crises = result.crises,
        "Simulation ended"
    );

    if result.final_summary.is_none() {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::population::build_state;

    struct CountingCallback {
        ticks: Vec<u64>,
    }

    impl TickCallback for CountingCallback {
        fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
            assert_eq!(summary.tick, state.tick());
            self.ticks.push(summary.tick);
        }
    }

    fn default_state() -> Option<SimulationState> {
        let built = build_state(&ScenarioConfig::default());
        assert!(built.is_ok(), "default scenario failed to build: {built:?}");
        built.ok()
    }

    #[test]
    fn runs_exactly_the_requested_ticks() {
        let Some(mut state) = default_state() else {
            return;
        };
        let mut callback = CountingCallback { ticks: Vec::new() };

        let result = run_simulation(&mut state, 25, 10, &mut callback);

        assert!(result.is_ok());
        let result = result.ok().unwrap_or_default();
        assert_eq!(result.total_ticks, 25);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(25));
        assert_eq!(callback.ticks, (1..=25).collect::<Vec<u64>>());
        assert_eq!(state.tick(), 25);
    }

    #[test]
    fn zero_ticks_is_a_no_op() {
        let Some(mut state) = default_state() else {
            return;
        };
        let result = run_simulation(&mut state, 0, 0, &mut NoOpCallback);
        assert_eq!(result.ok(), Some(SimulationResult::default()));
        assert_eq!(state.tick(), 0);
    }

    #[test]
    fn tallies_match_decision_logs() {
        let Some(mut state) = default_state() else {
            return;
        };
        let result = run_simulation(&mut state, 400, 0, &mut NoOpCallback)
            .ok()
            .unwrap_or_default();

        let logged: u64 = state
            .agents
            .values()
            .map(|a| u64::try_from(a.decisions.len()).unwrap_or(u64::MAX))
            .sum();
        let tallied = result
            .conversions
            .saturating_add(result.adaptations)
            .saturating_add(result.rejections);
        assert_eq!(tallied, logged);
        assert!(state.check_partition().is_ok());
    }

    #[test]
    fn split_runs_match_a_single_run() {
        let (Some(mut whole), Some(mut split)) = (default_state(), default_state()) else {
            return;
        };
        assert!(run_simulation(&mut whole, 300, 0, &mut NoOpCallback).is_ok());
        assert!(run_simulation(&mut split, 120, 0, &mut NoOpCallback).is_ok());
        assert!(run_simulation(&mut split, 180, 0, &mut NoOpCallback).is_ok());

        assert_eq!(whole.tick(), split.tick());
        assert_eq!(whole.agents, split.agents);
        assert_eq!(whole.registry, split.registry);
    }
}
