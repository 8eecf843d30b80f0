//! Command-line runner for the Credo simulation.
//!
//! Loads a scenario, builds the population, runs the configured number of
//! ticks, and writes the report (and optionally a JSON snapshot).
//!
//! # Startup Sequence
//!
//! 1. Resolve the scenario path: first argument, else `CREDO_CONFIG`, else
//!    `credo-config.yaml`
//! 2. Load configuration (built-in scenario when the default file is absent)
//! 3. Initialize structured logging (tracing)
//! 4. Build the population from the seeded stream
//! 5. Run the simulation loop
//! 6. Write the report and snapshot

mod decision_log;
mod error;

use std::path::{Path, PathBuf};

use credo_core::config::LoggingConfig;
use credo_core::{LogFormat, ScenarioConfig, SimulationState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::decision_log::DecisionLogger;
use crate::error::EngineError;

/// Scenario file used when neither an argument nor `CREDO_CONFIG` is given.
const DEFAULT_CONFIG_PATH: &str = "credo-config.yaml";

/// Environment variable naming the scenario file.
const CONFIG_ENV: &str = "CREDO_CONFIG";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step, the simulation, or writing
/// the output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()?;
    Ok(())
}

fn run() -> Result<(), EngineError> {
    // 1-2. Load configuration.
    let (config, source) = load_config()?;

    // 3. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!("credo-engine starting");
    info!(
        source = %source,
        scenario = %config.simulation.name,
        seed = config.simulation.seed,
        ticks = config.simulation.ticks,
        "Configuration loaded"
    );

    // 4. Build the population.
    let mut state = credo_core::build_state(&config)?;

    // 5. Run the simulation.
    let mut callback = DecisionLogger::new();
    let result = credo_core::run_simulation(
        &mut state,
        config.simulation.ticks,
        config.logging.progress_interval_ticks,
        &mut callback,
    )?;
    credo_core::log_simulation_end(&result);

    // 6. Write output.
    write_output(&config, &state)?;

    info!(
        total_ticks = result.total_ticks,
        conversions = callback.conversions(),
        "credo-engine shutdown complete"
    );
    Ok(())
}

/// Resolve and load the scenario.
///
/// An explicitly named file must exist. The default file is optional and
/// its absence selects the built-in scenario.
fn load_config() -> Result<(ScenarioConfig, String), EngineError> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    if let Some(path) = explicit {
        let config = ScenarioConfig::from_file(&path)?;
        return Ok((config, path.display().to_string()));
    }

    let path = Path::new(DEFAULT_CONFIG_PATH);
    let source = if path.exists() {
        DEFAULT_CONFIG_PATH.to_owned()
    } else {
        "built-in scenario".to_owned()
    };
    Ok((ScenarioConfig::from_file_or_default(path)?, source))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}

/// Write the report to the configured file (stdout when unset) and the
/// snapshot when a path is configured.
fn write_output(config: &ScenarioConfig, state: &SimulationState) -> Result<(), EngineError> {
    let report = credo_core::render_report(state)?;
    match &config.output.report_path {
        Some(path) => {
            write_file(path, &report)?;
            info!(path = %path.display(), "Report written");
        }
        None => print!("{report}"),
    }

    if let Some(path) = &config.output.snapshot_path {
        let json = credo_core::snapshot_json(state)?;
        write_file(path, &json)?;
        info!(path = %path.display(), "Snapshot written");
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), EngineError> {
    std::fs::write(path, contents).map_err(|source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    })
}
