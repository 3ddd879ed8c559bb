//! Esports League - terminal manager for esports teams, players and matches
//!
//! This crate tracks teams, players and scheduled matches, simulates pending
//! matches with an Elo rating update, and derives ranked standings from the
//! match history.

pub mod config;
pub mod console;
pub mod error;
pub mod league;
pub mod rating;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LeagueError, Result};
pub use types::*;

// Re-export key components
pub use league::{LeagueManager, OutcomeSource, RngOutcomeSource, ScriptedOutcomeSource};
pub use rating::{EloRatingCalculator, RatingCalculator};
pub use storage::{InMemoryLeagueStore, LeagueStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
