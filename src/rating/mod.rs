//! Rating system integration using the Elo algorithm
//!
//! This module provides the pairwise rating calculator interface and its Elo
//! implementation used by the match simulator and the leaderboard.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::{RatingCalculator, ResolvedRating};
pub use elo::{expected_score, EloRatingCalculator};
