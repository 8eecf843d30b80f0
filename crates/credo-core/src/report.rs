//! End-of-run reporting: a textual report and a JSON snapshot.
//!
//! Both are pure functions of the simulation state. Rendering twice without
//! an intervening tick produces identical output.

use std::fmt::Write as _;

use credo_types::{AffiliationId, AffiliationSnapshot, AgentSnapshot, DecisionRecord, SimulationSnapshot};

use crate::tick::SimulationState;

/// Width of the `=` rule around section titles.
const RULE_WIDTH: usize = 8;

/// Errors that can occur while producing a report or snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing into the report buffer failed.
    #[error("failed to format report: {source}")]
    Format {
        /// The underlying formatting error.
        #[from]
        source: std::fmt::Error,
    },

    /// JSON serialisation failed.
    #[error("failed to serialise snapshot: {source}")]
    Json {
        /// The underlying serialisation error.
        #[from]
        source: serde_json::Error,
    },
}

/// Capture the current state as a [`SimulationSnapshot`].
///
/// Agents and member rosters follow population (creation) order;
/// affiliations follow registration order.
pub fn snapshot(state: &SimulationState) -> SimulationSnapshot {
    let agents: Vec<AgentSnapshot> = state.agents_in_order().map(|a| a.snapshot()).collect();
    let affiliations = state
        .registry
        .iter()
        .map(|affiliation| AffiliationSnapshot {
            affiliation: affiliation.clone(),
            members: state
                .roster
                .iter()
                .copied()
                .filter(|id| state.registry.is_member(*id, affiliation.id))
                .collect(),
        })
        .collect();

    SimulationSnapshot {
        tick: state.tick(),
        context: state.context.clone(),
        affiliations,
        agents,
    }
}

/// Serialise the current state as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if serialisation fails.
pub fn snapshot_json(state: &SimulationState) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&snapshot(state))?)
}

/// Render the textual report for the current state.
///
/// # Errors
///
/// Returns [`ReportError::Format`] if writing to the buffer fails.
pub fn render_report(state: &SimulationState) -> Result<String, ReportError> {
    render_snapshot(&snapshot(state))
}

/// Render the textual report for a snapshot.
///
/// Three sections: PEOPLE, AFFILIATIONS, and CONTEXTS.
///
/// # Errors
///
/// Returns [`ReportError::Format`] if writing to the buffer fails.
pub fn render_snapshot(snap: &SimulationSnapshot) -> Result<String, ReportError> {
    let mut out = String::new();
    let context = format!("<Context: {}>", snap.context.name);

    writeln!(out, "{}", section_title("PEOPLE"))?;
    writeln!(out, "Number of people: {}", snap.agents.len())?;
    for agent in &snap.agents {
        writeln!(out, "Person {}", person(&agent.name))?;
        writeln!(out, "\tContext {context}")?;
        writeln!(out, "\tAffiliation {}", affiliation_label(snap, agent.home))?;
        writeln!(out, "\tPriorities {:?}", agent.priorities)?;
        writeln!(out, "\tNeeds {:?}", agent.needs)?;
        writeln!(out, "\tRandom_preference {}", agent.random_preference)?;
        writeln!(out, "\tBias {}", agent.bias)?;
        writeln!(out, "\tDecisions:")?;
        for decision in &agent.decisions {
            writeln!(out, "\t\t{}", decision_line(snap, decision))?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", section_title("AFFILIATIONS"))?;
    writeln!(out, "Number of affiliations: {}", snap.affiliations.len())?;
    for entry in &snap.affiliations {
        let a = &entry.affiliation;
        let members: Vec<String> = entry
            .members
            .iter()
            .map(|id| person(snap.agent_name(*id).unwrap_or("?")))
            .collect();
        writeln!(out, "Affiliation <Affiliation: {}>", a.name)?;
        writeln!(out, "\tProvisions {:?}", a.provisions)?;
        writeln!(out, "\tMembers [{}]", members.join(", "))?;
        writeln!(
            out,
            "\tAdvocate Adaptability: {}, Member Adaptability: {}",
            a.advocate_adaptability, a.member_adaptability
        )?;
        writeln!(out, "\tPublicity {}", a.publicity)?;
        writeln!(out, "\tRandom Preference {}", a.random_preference)?;
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", section_title("CONTEXTS"))?;
    writeln!(out, "Number of contexts: 1")?;
    writeln!(out, "Context {context}")?;
    writeln!(
        out,
        "\tResilience = {} Fluidity = {} Stability = {}",
        snap.context.resilience, snap.context.fluidity, snap.context.stability
    )?;
    writeln!(out)?;

    Ok(out)
}

fn section_title(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule} {title} {rule}")
}

fn person(name: &str) -> String {
    format!("<Person: {name}>")
}

fn affiliation_label(snap: &SimulationSnapshot, id: AffiliationId) -> String {
    format!("<Affiliation: {}>", snap.affiliation_name(id).unwrap_or("?"))
}

fn decision_line(snap: &SimulationSnapshot, decision: &DecisionRecord) -> String {
    format!(
        "<Decision: {}; cur: {}, new: {}, time: {}>",
        decision.kind,
        affiliation_label(snap, decision.source),
        affiliation_label(snap, decision.target),
        decision.tick
    )
}
