//! Configuration loading and typed config structures for the Credo simulation.
//!
//! A scenario lives in a YAML file (`credo-config.yaml` by default). This
//! module defines strongly-typed structs that mirror the YAML structure and
//! provides a loader that reads the file and applies environment overrides.
//! Every section is optional: an empty file, or no file at all, yields the
//! built-in scenario (one society, four affiliations, 22 generated agents).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use credo_agents::ModelConfig;
use credo_types::NeedVector;

/// Environment variable overriding `simulation.seed`.
pub const SEED_ENV: &str = "CREDO_SEED";

/// Environment variable overriding `simulation.ticks`.
pub const TICKS_ENV: &str = "CREDO_TICKS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidOverride {
        /// Name of the environment variable.
        var: &'static str,
        /// The offending value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level scenario configuration.
///
/// Mirrors the structure of `credo-config.yaml`. All fields default to the
/// built-in scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Run-level settings (name, seed, length).
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// The shared social context.
    #[serde(default)]
    pub context: ContextConfig,

    /// Affiliations in registration order.
    #[serde(default = "default_affiliations")]
    pub affiliations: Vec<AffiliationConfig>,

    /// Agent population.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Model constants.
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where to write the report and snapshot.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            context: ContextConfig::default(),
            affiliations: default_affiliations(),
            population: PopulationConfig::default(),
            model: ModelConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `CREDO_SEED` overrides `simulation.seed`
    /// - `CREDO_TICKS` overrides `simulation.ticks`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise start from the built-in
    /// scenario. Environment overrides apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file).
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override is not a number.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// An empty document yields the built-in scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override seed and tick count from `CREDO_SEED` / `CREDO_TICKS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a set variable is not a
    /// non-negative integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply seed and tick overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a present value is not a
    /// non-negative integer.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(seed) = parse_override(SEED_ENV, lookup(SEED_ENV))? {
            self.simulation.seed = seed;
        }
        if let Some(ticks) = parse_override(TICKS_ENV, lookup(TICKS_ENV))? {
            self.simulation.ticks = ticks;
        }
        Ok(())
    }
}

fn parse_override(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_err| ConfigError::InvalidOverride { var, value })
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSettings {
    /// Human-readable scenario name.
    #[serde(default = "default_simulation_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            name: default_simulation_name(),
            seed: default_seed(),
            ticks: default_ticks(),
        }
    }
}

/// The shared social context.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContextConfig {
    /// Context name.
    #[serde(default = "default_context_name")]
    pub name: String,

    /// Scales encounter probability.
    #[serde(default = "default_fluidity")]
    pub fluidity: f64,

    /// Scales encounter intensity.
    #[serde(default = "default_unit")]
    pub stability: f64,

    /// Scales the impression term of the convert test.
    #[serde(default = "default_unit")]
    pub resilience: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: default_context_name(),
            fluidity: default_fluidity(),
            stability: default_unit(),
            resilience: default_unit(),
        }
    }
}

/// One affiliation of the scenario.
///
/// `member_adaptability` and `random_preference` are drawn from the seeded
/// stream when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AffiliationConfig {
    /// Unique affiliation name.
    pub name: String,

    /// Visibility; scales encounter probability.
    #[serde(default = "default_unit")]
    pub publicity: f64,

    /// How well the affiliation satisfies each need dimension.
    pub provisions: NeedVector,

    /// How effectively members proselytise; scales intensity.
    #[serde(default = "default_unit")]
    pub advocate_adaptability: f64,

    /// Divides the convert score and offsets the reject test.
    #[serde(default)]
    pub member_adaptability: Option<f64>,

    /// Idiosyncratic preference value (1 to 20).
    #[serde(default)]
    pub random_preference: Option<u32>,
}

/// Agent population.
///
/// When `agents` is non-empty those agents are created and `size` is
/// ignored. Otherwise `size` agents are generated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents to generate.
    #[serde(default = "default_population_size")]
    pub size: u32,

    /// Explicitly described agents.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            agents: Vec::new(),
        }
    }
}

/// One explicitly described agent. Omitted fields are drawn from the
/// seeded stream exactly as for generated agents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfig {
    /// Unique agent name.
    pub name: String,

    /// Name of the initial home affiliation.
    #[serde(default)]
    pub home: Option<String>,

    /// Initial need satisfaction levels.
    #[serde(default)]
    pub needs: Option<NeedVector>,

    /// Priority weights (non-negative, summing to 1).
    #[serde(default)]
    pub priorities: Option<NeedVector>,

    /// Idiosyncratic preference value.
    #[serde(default)]
    pub random_preference: Option<u32>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log a progress line every N ticks (0 disables).
    #[serde(default = "default_progress_interval_ticks")]
    pub progress_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            progress_interval_ticks: default_progress_interval_ticks(),
        }
    }
}

/// Output destinations. The report goes to stdout when no path is set; the
/// snapshot is only written when a path is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// File to write the textual report to.
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    /// File to write the JSON snapshot to.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_simulation_name() -> String {
    "Credo".to_owned()
}

const fn default_seed() -> u64 {
    10
}

const fn default_ticks() -> u64 {
    10_000
}

fn default_context_name() -> String {
    "Society".to_owned()
}

const fn default_fluidity() -> f64 {
    1.5
}

const fn default_unit() -> f64 {
    1.0
}

const fn default_population_size() -> u32 {
    22
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_progress_interval_ticks() -> u64 {
    1000
}

fn default_affiliations() -> Vec<AffiliationConfig> {
    let religion = |name: &str, publicity: f64, provisions: NeedVector, advocate: f64| {
        AffiliationConfig {
            name: name.to_owned(),
            publicity,
            provisions,
            advocate_adaptability: advocate,
            member_adaptability: None,
            random_preference: None,
        }
    };
    vec![
        religion("Religion 1", 2.0, [0.7, 0.8, 0.6, 0.7, 0.77], 5.0),
        religion("Religion 2", 0.8, [0.6, 0.7, 0.8, 0.8, 0.6], 5.0),
        religion("Religion 3", 0.5, [0.8, 0.8, 0.77, 0.77, 0.77], 1.0),
        religion("Religion 4", 0.7, [0.5, 0.6, 0.6, 0.8, 0.9], 8.0),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: BTreeMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn default_config_is_builtin_scenario() {
        let config = ScenarioConfig::default();
        assert_eq!(config.simulation.seed, 10);
        assert_eq!(config.simulation.ticks, 10_000);
        assert_eq!(config.context.name, "Society");
        assert!((config.context.fluidity - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.affiliations.len(), 4);
        assert_eq!(config.population.size, 22);
        assert!(config.population.agents.is_empty());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  name: "Two Faiths"
  seed: 123
  ticks: 500

context:
  name: "Village"
  fluidity: 0.5
  stability: 2.0
  resilience: 0.0

affiliations:
  - name: "High"
    publicity: 1.0
    provisions: [0.9, 0.9, 0.9, 0.9, 0.9]
    advocate_adaptability: 3.0
    member_adaptability: 1.5
    random_preference: 4
  - name: "Low"
    provisions: [0.1, 0.1, 0.1, 0.1, 0.1]

population:
  agents:
    - name: "Ada"
      home: "High"
      needs: [0.5, 0.5, 0.5, 0.5, 0.5]
      priorities: [0.2, 0.2, 0.2, 0.2, 0.2]
      random_preference: 3
    - name: "Bo"

model:
  checkpoint_interval: 10
  convert_threshold: 3.5

logging:
  level: "debug"
  format: "json"
  progress_interval_ticks: 100

output:
  report_path: "out/report.txt"
  snapshot_path: "out/snapshot.json"
"#;

        let config = ScenarioConfig::parse_without_env(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.simulation.name, "Two Faiths");
        assert_eq!(config.simulation.ticks, 500);
        assert!(config.context.resilience.abs() < f64::EPSILON);
        assert_eq!(config.affiliations.len(), 2);
        assert_eq!(
            config.affiliations.first().and_then(|a| a.random_preference),
            Some(4)
        );
        assert_eq!(
            config.affiliations.get(1).and_then(|a| a.member_adaptability),
            None
        );
        assert_eq!(config.population.agents.len(), 2);
        assert_eq!(
            config.population.agents.get(1).and_then(|a| a.home.clone()),
            None
        );
        assert_eq!(config.model.checkpoint_interval, 10);
        // Untouched model constants keep their defaults.
        assert!((config.model.update_coef - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.output.snapshot_path,
            Some(PathBuf::from("out/snapshot.json"))
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ScenarioConfig::parse_without_env("simulation:\n  seed: 7\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.ticks, 10_000);
        assert_eq!(config.affiliations.len(), 4);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = ScenarioConfig::parse_without_env("");
        assert_eq!(config.ok(), Some(ScenarioConfig::default()));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = ScenarioConfig::parse_without_env("simulation: [unterminated");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_seed_and_ticks() {
        let mut config = ScenarioConfig::default();
        let result = config.apply_overrides(lookup_from(&[(SEED_ENV, "99"), (TICKS_ENV, " 250 ")]));
        assert!(result.is_ok());
        assert_eq!(config.simulation.seed, 99);
        assert_eq!(config.simulation.ticks, 250);
    }

    #[test]
    fn absent_overrides_change_nothing() {
        let mut config = ScenarioConfig::default();
        assert!(config.apply_overrides(lookup_from(&[])).is_ok());
        assert_eq!(config, ScenarioConfig::default());
    }

    #[test]
    fn malformed_override_is_an_error() {
        let mut config = ScenarioConfig::default();
        let result = config.apply_overrides(lookup_from(&[(TICKS_ENV, "many")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { var: TICKS_ENV, .. })
        ));
        assert_eq!(config.simulation.ticks, 10_000);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("credo-config.yaml");
        if path.exists() {
            let contents = std::fs::read_to_string(&path).unwrap_or_default();
            let config = ScenarioConfig::parse_without_env(&contents);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
