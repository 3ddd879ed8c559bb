//! Match simulation
//!
//! Advances every pending match by one stochastic round: each match is decided
//! by a uniform draw against team1's expected score, both teams' ratings are
//! updated, and the whole batch is committed in a single transaction.

use crate::error::{LeagueError, Result};
use crate::rating::RatingCalculator;
use crate::storage::{in_transaction, LeagueStore, MatchFilter, MatchOrder};
use crate::types::{MatchId, MatchResult, Rating, Side, Team, TeamId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Source of uniform draws in [0, 1) deciding match outcomes
#[cfg_attr(test, mockall::automock)]
pub trait OutcomeSource {
    fn next_draw(&mut self) -> f64;
}

/// Outcome source backed by a random number generator
#[derive(Debug, Clone)]
pub struct RngOutcomeSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngOutcomeSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngOutcomeSource<StdRng> {
    /// Reproducible draws from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> OutcomeSource for RngOutcomeSource<R> {
    fn next_draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Outcome source replaying a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedOutcomeSource {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedOutcomeSource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }

    /// Draws that always go to team1 (any expected score above zero beats 0.0)
    pub fn team1_always_wins() -> Self {
        Self::new(vec![0.0])
    }

    /// Draws that always go to team2 (no expected score reaches 1.0)
    pub fn team2_always_wins() -> Self {
        Self::new(vec![1.0])
    }
}

impl OutcomeSource for ScriptedOutcomeSource {
    fn next_draw(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        draw
    }
}

/// One side of a simulated match
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSide {
    pub team_id: TeamId,
    pub name: String,
    pub rating_before: Rating,
    pub rating_after: Rating,
    pub expected_score: f64,
    /// The team had no stored rating and started from the default
    pub was_defaulted: bool,
}

impl SimulatedSide {
    /// Signed rating change
    pub fn delta(&self) -> Rating {
        self.rating_after - self.rating_before
    }
}

/// Result of simulating one pending match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSimulation {
    pub match_id: MatchId,
    pub team1: SimulatedSide,
    pub team2: SimulatedSide,
    pub draw: f64,
    pub winner: Side,
}

impl MatchSimulation {
    pub fn side(&self, side: Side) -> &SimulatedSide {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn winner_side(&self) -> &SimulatedSide {
        self.side(self.winner)
    }

    pub fn winner_id(&self) -> TeamId {
        self.winner_side().team_id
    }
}

/// Everything a simulation batch did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub simulations: Vec<MatchSimulation>,
}

impl SimulationReport {
    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }
}

/// Decides pending matches and applies rating updates
#[derive(Debug, Clone)]
pub struct MatchSimulator<C: RatingCalculator> {
    calculator: C,
}

impl<C: RatingCalculator> MatchSimulator<C> {
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// Simulate every pending match, oldest scheduled first.
    ///
    /// With no pending matches nothing is written and no transaction is opened.
    /// Otherwise all rating and winner updates commit together or not at all.
    pub fn simulate_pending<S>(
        &self,
        store: &mut S,
        source: &mut dyn OutcomeSource,
    ) -> Result<SimulationReport>
    where
        S: LeagueStore + ?Sized,
    {
        let pending = store.list_matches(MatchFilter::Pending, MatchOrder::DateAscending)?;
        if pending.is_empty() {
            info!("No pending matches to simulate");
            return Ok(SimulationReport::default());
        }

        info!("Simulating {} pending matches", pending.len());

        let simulations = in_transaction(store, |store| {
            let mut simulations = Vec::with_capacity(pending.len());

            for mut record in pending {
                // Re-read so a team playing twice in the batch carries its new rating
                let team1 = Self::load_team(store, record.team1_id)?;
                let team2 = Self::load_team(store, record.team2_id)?;

                let resolved1 = self.calculator.resolve_rating(&team1);
                let resolved2 = self.calculator.resolve_rating(&team2);
                let (expected1, expected2) =
                    self.calculator.compute_update(resolved1.value, resolved2.value);

                let draw = source.next_draw();
                let winner = if draw < expected1 {
                    Side::Team1
                } else {
                    Side::Team2
                };
                let result1 = if winner == Side::Team1 {
                    MatchResult::Win
                } else {
                    MatchResult::Loss
                };
                let result2 = if winner == Side::Team2 {
                    MatchResult::Win
                } else {
                    MatchResult::Loss
                };

                let (after1, after2) = self.calculator.apply_result(
                    resolved1.value,
                    resolved2.value,
                    result1.score(),
                    result2.score(),
                );

                record.winner_id = Some(record.team_on(winner));
                store.update_team(&Team {
                    rating: Some(after1),
                    ..team1.clone()
                })?;
                store.update_team(&Team {
                    rating: Some(after2),
                    ..team2.clone()
                })?;
                store.update_match(&record)?;

                debug!(
                    "Match {}: {} ({}) vs {} ({}), draw {:.4} vs expected {:.4} -> {} wins",
                    record.id,
                    team1.name,
                    resolved1.value,
                    team2.name,
                    resolved2.value,
                    draw,
                    expected1,
                    if winner == Side::Team1 {
                        &team1.name
                    } else {
                        &team2.name
                    }
                );

                simulations.push(MatchSimulation {
                    match_id: record.id,
                    team1: SimulatedSide {
                        team_id: team1.id,
                        name: team1.name,
                        rating_before: resolved1.value,
                        rating_after: after1,
                        expected_score: expected1,
                        was_defaulted: resolved1.was_defaulted,
                    },
                    team2: SimulatedSide {
                        team_id: team2.id,
                        name: team2.name,
                        rating_before: resolved2.value,
                        rating_after: after2,
                        expected_score: expected2,
                        was_defaulted: resolved2.was_defaulted,
                    },
                    draw,
                    winner,
                });
            }

            Ok(simulations)
        })?;

        info!("Simulated {} matches", simulations.len());
        Ok(SimulationReport { simulations })
    }

    fn load_team<S>(store: &S, team_id: TeamId) -> Result<Team>
    where
        S: LeagueStore + ?Sized,
    {
        store
            .get_team(team_id)?
            .ok_or_else(|| LeagueError::TeamNotFound { team_id }.into())
    }
}
