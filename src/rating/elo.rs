//! Elo rating system implementation
//!
//! Expected scores use the logistic pairing formula with a 400-point scale, and
//! new ratings are rounded half-to-even to the nearest integer.

use crate::config::RatingConfig;
use crate::error::{LeagueError, Result};
use crate::rating::calculator::RatingCalculator;
use crate::types::Rating;

/// Rating difference at which the stronger side is expected to score 10:1
const ELO_SCALE: f64 = 400.0;

/// Expected score of a team rated `rating` against one rated `opponent`
pub fn expected_score(rating: Rating, opponent: Rating) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) as f64 / ELO_SCALE))
}

/// Elo rating calculator with a fixed K-factor
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: RatingConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo calculator
    pub fn new(config: RatingConfig) -> Result<Self> {
        if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
            return Err(LeagueError::Configuration {
                message: format!("K-factor must be positive, got {}", config.k_factor),
            }
            .into());
        }

        Ok(Self { config })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }

    fn adjust(&self, rating: Rating, actual: f64, expected: f64) -> Rating {
        let updated = rating as f64 + self.config.k_factor * (actual - expected);
        updated.round_ties_even() as Rating
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn compute_update(&self, rating_a: Rating, rating_b: Rating) -> (f64, f64) {
        (
            expected_score(rating_a, rating_b),
            expected_score(rating_b, rating_a),
        )
    }

    fn apply_result(
        &self,
        rating_a: Rating,
        rating_b: Rating,
        actual_a: f64,
        actual_b: f64,
    ) -> (Rating, Rating) {
        let (expected_a, expected_b) = self.compute_update(rating_a, rating_b);
        (
            self.adjust(rating_a, actual_a, expected_a),
            self.adjust(rating_b, actual_b, expected_b),
        )
    }

    fn initial_rating(&self) -> Rating {
        self.config.initial_rating
    }
}
