//! Configuration management for the league manager
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, SimulationSettings, StorageSettings};
pub use rating::RatingConfig;
