//! Scenario configuration, tick cycle, and reporting for the Credo simulation.
//!
//! This crate ties the agent model from `credo-agents` into a runnable
//! simulation. It owns the scenario file format, builds the initial
//! population, drives ticks, and renders the end-of-run report.
//!
//! # Modules
//!
//! - [`clock`] -- Simulation clock ([`SimulationClock`])
//! - [`config`] -- Scenario configuration loading ([`ScenarioConfig`])
//! - [`population`] -- Initial state construction from a scenario
//! - [`report`] -- Textual report and JSON snapshot export
//! - [`runner`] -- Bounded simulation loop with tick callbacks
//! - [`tick`] -- Single-tick execution ([`SimulationState`], [`run_tick`])

pub mod clock;
pub mod config;
pub mod population;
pub mod report;
pub mod runner;
pub mod tick;

pub use clock::{ClockError, SimulationClock};
pub use config::{ConfigError, LogFormat, ScenarioConfig};
pub use population::{PopulationError, build_state};
pub use report::{ReportError, render_report, render_snapshot, snapshot, snapshot_json};
pub use runner::{
    NoOpCallback, RunnerError, SimulationResult, TickCallback, log_simulation_end, run_simulation,
};
pub use tick::{SimulationState, TickError, TickSummary, run_tick};
