//! Rating system configuration

use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Default K-factor for Elo updates
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating assumed for a team that has never been rated
pub const DEFAULT_INITIAL_RATING: Rating = 1000;

/// Parameters of the Elo rating update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Scale of a single rating adjustment
    pub k_factor: f64,
    /// Rating used when a team has none stored
    pub initial_rating: Rating,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            initial_rating: DEFAULT_INITIAL_RATING,
        }
    }
}
