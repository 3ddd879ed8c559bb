//! League operations: record management, match simulation and standings

pub mod genres;
pub mod leaderboard;
pub mod manager;
pub mod simulator;

pub use genres::{GenreCatalog, GenreProfile, RoleRule};
pub use leaderboard::{team_standing, LeaderboardBuilder, LeaderboardEntry, RatingTier, TeamStanding};
pub use manager::{LeagueManager, MatchSummary, PlayerChanges, TeamChanges};
pub use simulator::{
    MatchSimulation, MatchSimulator, OutcomeSource, RngOutcomeSource, ScriptedOutcomeSource,
    SimulatedSide, SimulationReport,
};
