//! Main application configuration
//!
//! This module defines the primary configuration structures for the league manager,
//! including TOML file loading, environment variable loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub rating: RatingConfig,
    pub simulation: SimulationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name shown in the startup log
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where league data lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON snapshot file holding the teams, players and matches tables
    pub database_path: PathBuf,
    /// Keep everything in memory and never touch disk
    pub in_memory: bool,
}

/// Match simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fixed seed for reproducible simulations; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "esports-league".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("esports.json"),
            in_memory: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        if let Ok(path) = env::var("DATABASE_PATH") {
            config.storage.database_path = PathBuf::from(path);
        }
        if let Ok(in_memory) = env::var("DATABASE_IN_MEMORY") {
            config.storage.in_memory = in_memory
                .parse()
                .map_err(|_| anyhow!("Invalid DATABASE_IN_MEMORY value: {}", in_memory))?;
        }

        if let Ok(k_factor) = env::var("RATING_K_FACTOR") {
            config.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(initial) = env::var("RATING_INITIAL") {
            config.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL value: {}", initial))?;
        }

        if let Ok(seed) = env::var("SIMULATION_SEED") {
            config.simulation.seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid SIMULATION_SEED value: {}", seed))?,
            );
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if !config.storage.in_memory && config.storage.database_path.as_os_str().is_empty() {
        return Err(anyhow!("Database path cannot be empty"));
    }

    if !config.rating.k_factor.is_finite() || config.rating.k_factor <= 0.0 {
        return Err(anyhow!("K-factor must be a positive number"));
    }
    if config.rating.initial_rating <= 0 {
        return Err(anyhow!("Initial rating must be positive"));
    }

    Ok(())
}
