//! Rating calculator trait
//!
//! This module defines the interface for pairwise rating calculations and the
//! single place where an absent team rating is replaced by the default.

use crate::types::{Rating, Team};

/// A team's rating after applying the default for unrated teams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRating {
    pub value: Rating,
    /// True when the team had no stored rating and `value` is the default
    pub was_defaulted: bool,
}

/// Trait for calculating rating changes after a two-team match
pub trait RatingCalculator {
    /// Expected scores of both sides, each in (0, 1)
    ///
    /// # Arguments
    /// * `rating_a` - Current rating of the first team
    /// * `rating_b` - Current rating of the second team
    fn compute_update(&self, rating_a: Rating, rating_b: Rating) -> (f64, f64);

    /// New ratings of both sides given their actual scores (1 for a win, 0 for a loss)
    fn apply_result(
        &self,
        rating_a: Rating,
        rating_b: Rating,
        actual_a: f64,
        actual_b: f64,
    ) -> (Rating, Rating);

    /// Get the rating assumed for teams that have never been rated
    fn initial_rating(&self) -> Rating;

    /// Stored rating of the team, or the initial rating when it has none.
    /// Callers decide whether to persist a defaulted value.
    fn resolve_rating(&self, team: &Team) -> ResolvedRating {
        match team.rating {
            Some(value) => ResolvedRating {
                value,
                was_defaulted: false,
            },
            None => ResolvedRating {
                value: self.initial_rating(),
                was_defaulted: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Calculator that never moves ratings
    struct FlatCalculator;

    impl RatingCalculator for FlatCalculator {
        fn compute_update(&self, _rating_a: Rating, _rating_b: Rating) -> (f64, f64) {
            (0.5, 0.5)
        }

        fn apply_result(
            &self,
            rating_a: Rating,
            rating_b: Rating,
            _actual_a: f64,
            _actual_b: f64,
        ) -> (Rating, Rating) {
            (rating_a, rating_b)
        }

        fn initial_rating(&self) -> Rating {
            1200
        }
    }

    fn team(rating: Option<Rating>) -> Team {
        Team {
            id: 1,
            name: "Sentinels".to_string(),
            genre: "Valorant".to_string(),
            rating,
        }
    }

    #[test]
    fn test_resolve_stored_rating() {
        let resolved = FlatCalculator.resolve_rating(&team(Some(1337)));
        assert_eq!(resolved.value, 1337);
        assert!(!resolved.was_defaulted);
    }

    #[test]
    fn test_resolve_absent_rating_uses_initial() {
        let resolved = FlatCalculator.resolve_rating(&team(None));
        assert_eq!(resolved.value, 1200);
        assert!(resolved.was_defaulted);
    }
}
