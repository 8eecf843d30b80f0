//! Agent state and the belief-diffusion model for the Credo simulation.
//!
//! This crate contains the logic layer for agents -- everything that operates
//! on agent and affiliation state without touching I/O. It sits between
//! `credo-types` (which defines the data structures) and `credo-core` (which
//! handles configuration, the tick cycle, and reporting).
//!
//! # Modules
//!
//! - [`agent`] -- Agent creation and per-agent state ([`AgentManager`], [`AgentState`])
//! - [`config`] -- Model constants ([`ModelConfig`])
//! - [`conversion`] -- Checkpoint decisions: reject, adapt, or convert
//! - [`crisis`] -- Random life crises that shrink needs
//! - [`encounter`] -- Encounter probability, kind, and intensity
//! - [`error`] -- Error types for agent and registry operations
//! - [`impression`] -- Per-agent impression and contact tracking ([`ImpressionLedger`])
//! - [`needs`] -- Quest value and need convergence toward the home affiliation
//! - [`registry`] -- Affiliations and the membership partition ([`AffiliationRegistry`])

pub mod agent;
pub mod config;
pub mod conversion;
pub mod crisis;
pub mod encounter;
pub mod error;
pub mod impression;
pub mod needs;
pub mod registry;

// Re-export primary types at crate root for convenience.
pub use agent::{AgentManager, AgentParams, AgentState, INITIAL_BIAS, validate_priorities};
pub use config::ModelConfig;
pub use conversion::{Verdict, check_for_conversion, decide, impression_z_score, weighted_advantage};
pub use crisis::{check_for_crisis, crisis_chance, simulate_crisis};
pub use encounter::{encounter_intensity, encounter_probability, gen_encounter, random_bias};
pub use error::{AgentError, RegistryError};
pub use impression::{ImpressionLedger, TrackedAffiliation};
pub use needs::{is_actively_questing, quest_val, update_needs};
pub use registry::AffiliationRegistry;
