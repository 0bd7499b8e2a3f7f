use crate::gene_metrics::tolerance::{NanPolicy, ToleranceComparator};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_quality_threshold")]
    pub umi_quality_threshold: u8,
    #[serde(default = "default_quality_threshold")]
    pub genomic_quality_threshold: u8,
    #[serde(default)]
    pub min_mapping_quality: u8,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    #[serde(default)]
    pub nan_policy: NanPolicy,
}

fn default_threads() -> usize {
    1
}

fn default_batch_size() -> usize {
    10_000
}

fn default_quality_threshold() -> u8 {
    30
}

fn default_abs_tol() -> f64 {
    1e-8
}

fn default_rel_tol() -> f64 {
    1e-5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            batch_size: default_batch_size(),
            umi_quality_threshold: default_quality_threshold(),
            genomic_quality_threshold: default_quality_threshold(),
            min_mapping_quality: 0,
            tolerance: ToleranceConfig::default(),
        }
    }
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            abs_tol: default_abs_tol(),
            rel_tol: default_rel_tol(),
            nan_policy: NanPolicy::default(),
        }
    }
}

impl From<ToleranceConfig> for ToleranceComparator {
    fn from(config: ToleranceConfig) -> Self {
        ToleranceComparator::new(config.abs_tol, config.rel_tol).with_nan_policy(config.nan_policy)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "scqc", "scqc-tools")
}

impl Config {
    /// `config.toml` in the platform config directory, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the user config, falling back to defaults when it is absent or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                match Self::from_path(&config_path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring config file: {:#}", e),
                }
            }
        }
        Config::default()
    }

    /// Loads an explicitly named config file; any problem is an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }
}
