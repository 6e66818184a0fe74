//! Configuration models and loaders for the Sail Performance Calculator.

use std::fs::File;
use std::path::{Path, PathBuf};

use sail_hull::HullDimensions;
use sail_plan::{SwitchMatching, SwitchPlan};
use serde::Deserialize;
use thiserror::Error;

/// Vessel configuration: one hull and its sail plans.
#[derive(Debug, Deserialize, Clone)]
pub struct VesselConfig {
    pub name: String,
    pub boat: HullDimensions,
    #[serde(default)]
    pub plans: Vec<PlanConfig>,
    /// Applies to every plan that does not set its own.
    #[serde(default)]
    pub switch_matching: SwitchMatching,
    #[serde(default)]
    pub solver: SolverConfig,
}

/// One sail plan as written in a vessel file.
#[derive(Debug, Deserialize, Clone)]
pub struct PlanConfig {
    pub name: String,
    pub eta: f64,
    pub luff_angle_deg: f64,
    #[serde(default)]
    pub wing_wing_running: bool,
    #[serde(default)]
    pub leeway_coefficient: f64,
    #[serde(default)]
    pub switch_matching: Option<SwitchMatching>,
    #[serde(default)]
    pub switch_plans: Vec<SwitchPlan>,
}

/// Solver iteration controls.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_bucket_size")]
    pub bucket_size: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_tolerance() -> f64 {
    1e-2
}

fn default_bucket_size() -> usize {
    128
}

fn default_max_iterations() -> usize {
    128 * 64
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            tolerance: default_tolerance(),
            bucket_size: default_bucket_size(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load vessel configurations from a TOML file, a YAML list, or a directory of TOML files.
pub fn load_vessel_configs<P: AsRef<Path>>(path: P) -> Result<Vec<VesselConfig>, ConfigError> {
    load_records(path)
}

/// Find a vessel by case-insensitive name.
pub fn find_vessel<'a>(configs: &'a [VesselConfig], name: &str) -> Option<&'a VesselConfig> {
    let upper = name.to_uppercase();
    configs.iter().find(|cfg| cfg.name.to_uppercase() == upper)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        log::debug!("loading TOML record from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        log::debug!("loading YAML records from {}", path.display());
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        log::debug!("loading TOML record from {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
