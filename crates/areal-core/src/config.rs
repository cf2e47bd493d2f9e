use crate::error::{ArealError, Result};
use crate::models::ValidityMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default suffix appended to right-hand attribute names that collide in a join
pub const DEFAULT_JOIN_SUFFIX: &str = "_right";

/// Default area at or below which a source polygon is treated as degenerate
pub const DEFAULT_AREA_EPSILON: f64 = 1e-12;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// How per-feature work is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExecutionMode {
    /// Single-threaded processing
    #[default]
    Sequential,
    /// Parallel processing on the global rayon pool
    Parallel,
    /// Parallel processing on a dedicated pool with the given thread count
    ParallelWith(usize),
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for areal operations
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// EPSG code assigned to inputs that carry no CRS
    pub crs: ConfigValue<Option<u32>>,
    pub join_suffix: ConfigValue<String>,
    pub area_epsilon: ConfigValue<f64>,
    pub geometry_validity: ConfigValue<ValidityMode>,
    pub execution: ConfigValue<ExecutionMode>,
    pub threads: ConfigValue<Option<usize>>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            crs: ConfigValue::new(None, ConfigSource::Default),
            join_suffix: ConfigValue::new(DEFAULT_JOIN_SUFFIX.to_string(), ConfigSource::Default),
            area_epsilon: ConfigValue::new(DEFAULT_AREA_EPSILON, ConfigSource::Default),
            geometry_validity: ConfigValue::new(ValidityMode::Strict, ConfigSource::Default),
            execution: ConfigValue::new(ExecutionMode::Sequential, ConfigSource::Default),
            threads: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArealError::ConfigMissing {
                key: format!("file {}", path.as_ref().display()),
            },
            _ => ArealError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            },
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ArealError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(crs) = file_config.crs {
            self.crs.update(Some(crs), ConfigSource::File);
        }

        if let Some(suffix) = file_config.join_suffix {
            self.join_suffix.update(parse_join_suffix(&suffix)?, ConfigSource::File);
        }

        if let Some(epsilon) = file_config.area_epsilon {
            self.area_epsilon.update(check_area_epsilon(epsilon)?, ConfigSource::File);
        }

        if let Some(geometry_validity) = file_config.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::File);
        }

        if let Some(execution) = file_config.execution {
            self.execution.update(parse_execution_mode(&execution)?, ConfigSource::File);
        }

        if let Some(threads) = file_config.threads {
            self.threads.update(Some(check_threads(threads)?), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // AREAL_CRS
        if let Ok(crs_str) = env::var("AREAL_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.crs.update(Some(crs), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AREAL_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        // AREAL_JOIN_SUFFIX
        if let Ok(suffix) = env::var("AREAL_JOIN_SUFFIX") {
            match parse_join_suffix(&suffix) {
                Ok(suffix) => self.join_suffix.update(suffix, ConfigSource::Environment),
                Err(_) => tracing::warn!("Invalid AREAL_JOIN_SUFFIX: suffix must not be empty"),
            }
        }

        // AREAL_AREA_EPSILON
        if let Ok(epsilon_str) = env::var("AREAL_AREA_EPSILON") {
            match epsilon_str.parse::<f64>().ok().and_then(|e| check_area_epsilon(e).ok()) {
                Some(epsilon) => self.area_epsilon.update(epsilon, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid AREAL_AREA_EPSILON value '{}': expected a finite non-negative number",
                    epsilon_str
                ),
            }
        }

        // AREAL_GEOMETRY_VALIDITY
        if let Ok(validity_str) = env::var("AREAL_GEOMETRY_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.geometry_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AREAL_GEOMETRY_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        // AREAL_EXECUTION
        if let Ok(execution_str) = env::var("AREAL_EXECUTION") {
            match parse_execution_mode(&execution_str) {
                Ok(mode) => self.execution.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AREAL_EXECUTION value '{}': expected sequential or parallel",
                    execution_str
                ),
            }
        }

        // AREAL_THREADS
        if let Ok(threads_str) = env::var("AREAL_THREADS") {
            match threads_str.parse::<usize>().ok().filter(|n| *n > 0) {
                Some(threads) => self.threads.update(Some(threads), ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid AREAL_THREADS value '{}': expected a positive integer",
                    threads_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(crs) = overrides.crs {
            self.crs.update(Some(crs), ConfigSource::Cli);
        }

        if let Some(suffix) = overrides.join_suffix {
            self.join_suffix.update(suffix, ConfigSource::Cli);
        }

        if let Some(epsilon) = overrides.area_epsilon {
            self.area_epsilon.update(epsilon, ConfigSource::Cli);
        }

        if let Some(geometry_validity) = overrides.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::Cli);
        }

        if let Some(execution) = overrides.execution {
            self.execution.update(execution, ConfigSource::Cli);
        }

        if let Some(threads) = overrides.threads {
            self.threads.update(Some(threads), ConfigSource::Cli);
        }
    }

    /// Effective execution mode; a thread count pins parallel work to a dedicated pool
    pub fn execution_mode(&self) -> ExecutionMode {
        match (self.execution.value, self.threads.value) {
            (ExecutionMode::Parallel, Some(threads)) => ExecutionMode::ParallelWith(threads),
            (mode, _) => mode,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        let crs = self.crs.value.map(|epsg| format!("EPSG:{}", epsg)).unwrap_or_else(|| "unset".to_string());
        map.insert("crs".to_string(), (crs, self.crs.source));

        map.insert(
            "join_suffix".to_string(),
            (self.join_suffix.value.clone(), self.join_suffix.source),
        );

        map.insert(
            "area_epsilon".to_string(),
            (format!("{:e}", self.area_epsilon.value), self.area_epsilon.source),
        );

        map.insert(
            "geometry_validity".to_string(),
            (format!("{:?}", self.geometry_validity.value), self.geometry_validity.source),
        );

        map.insert(
            "execution".to_string(),
            (format!("{:?}", self.execution.value), self.execution.source),
        );

        let threads = self.threads.value.map(|n| n.to_string()).unwrap_or_else(|| "auto".to_string());
        map.insert("threads".to_string(), (threads, self.threads.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    crs: Option<u32>,
    join_suffix: Option<String>,
    area_epsilon: Option<f64>,
    geometry_validity: Option<ValidityMode>,
    execution: Option<String>,
    threads: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub crs: Option<u32>,
    pub join_suffix: Option<String>,
    pub area_epsilon: Option<f64>,
    pub geometry_validity: Option<ValidityMode>,
    pub execution: Option<ExecutionMode>,
    pub threads: Option<usize>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(ArealError::ConfigInvalid {
            key: "geometry_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}

/// Parse execution mode from string (`sequential`, `parallel`, or `parallel:<threads>`)
pub fn parse_execution_mode(s: &str) -> Result<ExecutionMode> {
    let lower = s.to_lowercase();
    match lower.as_str() {
        "sequential" | "seq" => Ok(ExecutionMode::Sequential),
        "parallel" | "par" => Ok(ExecutionMode::Parallel),
        other => {
            let threads = other
                .strip_prefix("parallel:")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n > 0);
            threads.map(ExecutionMode::ParallelWith).ok_or_else(|| ArealError::ConfigInvalid {
                key: "execution".to_string(),
                reason: format!(
                    "Invalid execution mode: {}. Use sequential, parallel, or parallel:<threads>",
                    s
                ),
            })
        }
    }
}

/// Validate a join suffix
pub fn parse_join_suffix(s: &str) -> Result<String> {
    if s.is_empty() {
        return Err(ArealError::ConfigInvalid {
            key: "join_suffix".to_string(),
            reason: "Join suffix must not be empty".to_string(),
        });
    }
    Ok(s.to_string())
}

fn check_area_epsilon(epsilon: f64) -> Result<f64> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(ArealError::ConfigInvalid {
            key: "area_epsilon".to_string(),
            reason: format!("Area epsilon must be finite and non-negative, got {}", epsilon),
        });
    }
    Ok(epsilon)
}

fn check_threads(threads: usize) -> Result<usize> {
    if threads == 0 {
        return Err(ArealError::ConfigInvalid {
            key: "threads".to_string(),
            reason: "Thread count must be positive".to_string(),
        });
    }
    Ok(threads)
}
