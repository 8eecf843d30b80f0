//! Tick callback that logs agent decisions by name.

use tracing::{debug, info};

use credo_core::{SimulationState, TickCallback, TickSummary};
use credo_types::DecisionKind;

/// Logs every decision as it happens: conversions at `info`, the rest at
/// `debug`.
#[derive(Debug, Default)]
pub struct DecisionLogger {
    conversions: u64,
}

impl DecisionLogger {
    /// Create a logger with no conversions seen.
    pub const fn new() -> Self {
        Self { conversions: 0 }
    }

    /// Conversions observed so far.
    pub const fn conversions(&self) -> u64 {
        self.conversions
    }
}

impl TickCallback for DecisionLogger {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        for (agent_id, record) in &summary.decisions {
            let agent = state.agents.get(agent_id).map_or("?", |a| a.name.as_str());
            let from = state.registry.get(record.source).map_or("?", |a| a.name.as_str());
            let to = state.registry.get(record.target).map_or("?", |a| a.name.as_str());
            if record.kind == DecisionKind::Convert {
                self.conversions = self.conversions.saturating_add(1);
                info!(tick = record.tick, agent, from, to, "Conversion");
            } else {
                debug!(tick = record.tick, agent, from, to, decision = %record.kind, "Decision");
            }
        }
    }
}
