use clap::ValueEnum;
use search_core::{
    AreaExtent, AreaGeometry, Cell, SessionConfig, TargetPlacement, UniformEffectiveness,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_RUN_ID: &str = "glasses";
const DEFAULT_LAST_KNOWN: [u32; 2] = [160, 290];
const DEFAULT_SESSIONS: usize = 1_000;
const DEFAULT_MAX_ROUNDS: u32 = 50;
const MAX_AREAS: usize = 255;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root game configuration loaded from YAML. Every section is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Map marker shown alongside the search areas; display only.
    #[serde(default = "default_last_known")]
    pub last_known: [u32; 2],
    #[serde(default = "default_areas")]
    pub areas: Vec<AreaConfig>,
    #[serde(default)]
    pub effectiveness: EffectivenessConfig,
    #[serde(default)]
    pub placement: TargetPlacement,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            seed: None,
            last_known: DEFAULT_LAST_KNOWN,
            areas: default_areas(),
            effectiveness: EffectivenessConfig::default(),
            placement: TargetPlacement::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SearchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_areas(&self.areas)?;
        self.session_config()?;
        self.effectiveness_source()?;
        self.simulation.validate()?;
        self.logging.validate()
    }

    /// Core session inputs derived from the configured areas.
    pub fn session_config(&self) -> Result<SessionConfig, ValidationError> {
        let geometry = AreaGeometry::new(self.areas.iter().map(AreaConfig::extent))
            .map_err(|err| invalid("areas", err.to_string()))?;
        let priors: Vec<f64> = self.areas.iter().map(|area| area.prior).collect();
        SessionConfig::new(geometry, priors, self.placement)
            .map_err(|err| invalid("areas.prior", err.to_string()))
    }

    pub fn effectiveness_source(&self) -> Result<UniformEffectiveness, ValidationError> {
        UniformEffectiveness::new(self.effectiveness.min, self.effectiveness.max)
            .map_err(|err| invalid("effectiveness", err.to_string()))
    }

    /// Area configuration by one-based area number.
    pub fn area(&self, number: u8) -> Option<&AreaConfig> {
        (number as usize)
            .checked_sub(1)
            .and_then(|index| self.areas.get(index))
    }

    /// Logging directory with `{run_id}` placeholders substituted.
    pub fn resolved_log_dir(&self) -> PathBuf {
        resolve_template(&self.run_id, &self.logging.directory)
    }
}

/// A rectangular search area given by its map corners and prior.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct AreaConfig {
    /// `(upper-left x, upper-left y, lower-right x, lower-right y)` in map pixels.
    pub corners: [u32; 4],
    pub prior: f64,
}

impl AreaConfig {
    pub const fn new(corners: [u32; 4], prior: f64) -> Self {
        Self { corners, prior }
    }

    pub fn extent(&self) -> AreaExtent {
        let [ul_x, ul_y, lr_x, lr_y] = self.corners;
        AreaExtent::new(lr_x.saturating_sub(ul_x), lr_y.saturating_sub(ul_y))
    }

    /// Translates a local cell into map coordinates.
    pub fn to_global(&self, cell: Cell) -> (u32, u32) {
        (self.corners[0] + cell.x, self.corners[1] + cell.y)
    }
}

fn default_areas() -> Vec<AreaConfig> {
    vec![
        AreaConfig::new([15, 15, 215, 180], 0.2),
        AreaConfig::new([370, 190, 640, 388], 0.3),
        AreaConfig::new([15, 255, 180, 390], 0.2),
        AreaConfig::new([500, 16, 645, 122], 0.3),
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectivenessConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for EffectivenessConfig {
    fn default() -> Self {
        let source = UniformEffectiveness::default();
        Self {
            min: source.low(),
            max: source.high(),
        }
    }
}

/// Scripted area-pair choice used by the simulation harness.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Cycle through every pair in menu order.
    #[default]
    RoundRobin,
    /// Pick a pair uniformly at random each round.
    Random,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_sessions")]
    pub sessions: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sessions: DEFAULT_SESSIONS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            strategy: SelectionStrategy::default(),
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.sessions == 0 {
            return Err(invalid(
                "simulation.sessions",
                "number of sessions must be greater than zero",
            ));
        }
        if self.max_rounds == 0 {
            return Err(invalid(
                "simulation.max_rounds",
                "max_rounds must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_sessions() -> usize {
    DEFAULT_SESSIONS
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            directory: default_log_directory(),
        }
    }
}

impl LoggingConfig {
    /// Fills blank fields with defaults and rejects unknown levels.
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.directory.trim().is_empty() {
            self.directory = default_log_directory();
        }
        if self.level().is_none() {
            return Err(invalid(
                "logging.tracing_level",
                format!(
                    "unknown level '{}', expected trace, debug, info, warn or error",
                    self.tracing_level
                ),
            ));
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "out/{run_id}".to_string()
}

fn default_run_id() -> String {
    DEFAULT_RUN_ID.to_string()
}

fn default_last_known() -> [u32; 2] {
    DEFAULT_LAST_KNOWN
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_areas(areas: &[AreaConfig]) -> Result<(), ValidationError> {
    if areas.len() < 2 {
        return Err(invalid(
            "areas",
            "at least two areas are required since every round searches two",
        ));
    }
    if areas.len() > MAX_AREAS {
        return Err(invalid(
            "areas",
            format!("at most {MAX_AREAS} areas are supported"),
        ));
    }

    for (index, area) in areas.iter().enumerate() {
        let [ul_x, ul_y, lr_x, lr_y] = area.corners;
        if lr_x <= ul_x || lr_y <= ul_y {
            return Err(invalid(
                format!("areas[{index}].corners"),
                "lower-right corner must lie strictly below and right of the upper-left corner",
            ));
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
