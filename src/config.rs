// ⚙️ Configuration - classification thresholds and server settings
// Thresholds are read once at startup and never mutated afterwards

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default composite score above which a batch counts as random
pub const DEFAULT_RANDOMNESS_THRESHOLD: f64 = 0.7;

/// Default coefficient of variation below which variable steps count as incremental
pub const DEFAULT_INCREMENT_VARIATION_THRESHOLD: f64 = 0.2;

// ============================================================================
// ANALYZER CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Composite randomness score must exceed this (default: 0.7)
    pub randomness_threshold: f64,

    /// Coefficient of variation of the steps must stay below this (default: 0.2)
    pub increment_variation_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            randomness_threshold: DEFAULT_RANDOMNESS_THRESHOLD,
            increment_variation_threshold: DEFAULT_INCREMENT_VARIATION_THRESHOLD,
        }
    }
}

impl AnalyzerConfig {
    /// Load thresholds from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: AnalyzerConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Both thresholds must lie in (0, 1]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("randomness_threshold", self.randomness_threshold),
            (
                "increment_variation_threshold",
                self.increment_variation_threshold,
            ),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                bail!("{} must be in (0, 1], got {}", name, value);
            }
        }
        Ok(())
    }
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

pub const ADDR_ENV: &str = "KEY_AUDIT_ADDR";
pub const CONFIG_ENV: &str = "KEY_AUDIT_CONFIG";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub addr: String,

    /// Optional thresholds file
    pub analyzer_config_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ServerConfig {
            addr: lookup(ADDR_ENV)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            analyzer_config_path: lookup(CONFIG_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Thresholds from the configured file, or the defaults
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        match &self.analyzer_config_path {
            Some(path) => AnalyzerConfig::from_file(path),
            None => Ok(AnalyzerConfig::default()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
