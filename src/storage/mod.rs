//! League storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving teams, players
//! and matches, the scoped transaction helper every write goes through, and an
//! in-memory table set that can snapshot itself to a JSON file on commit.

pub mod memory;
pub mod tables;

pub use memory::InMemoryLeagueStore;
pub use tables::Tables;

use crate::error::Result;
use crate::types::{Match, MatchId, NewMatch, NewPlayer, NewTeam, Player, PlayerId, Team, TeamId};
use tracing::warn;

/// Ordering for team listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamOrder {
    /// Insertion order
    #[default]
    Id,
    Name,
}

/// Which matches a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFilter {
    #[default]
    All,
    /// Matches without a winner
    Pending,
}

impl MatchFilter {
    pub fn accepts(&self, record: &Match) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::Pending => record.is_pending(),
        }
    }
}

/// Ordering for match listings; ties always fall back to id order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOrder {
    #[default]
    Id,
    /// Oldest first, unscheduled matches before scheduled ones
    DateAscending,
    /// Newest first, unscheduled matches last
    DateDescending,
}

/// What a team deletion removed along with the team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamRemoval {
    pub players_removed: usize,
    pub matches_removed: usize,
}

/// Trait for league storage operations.
///
/// Every write must happen between `begin` and `commit`/`rollback`; use
/// [`in_transaction`] rather than calling those directly.
#[cfg_attr(test, mockall::automock)]
pub trait LeagueStore {
    /// Get a team by id
    fn get_team(&self, id: TeamId) -> Result<Option<Team>>;

    /// Get a player by id
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;

    /// Get a match by id
    fn get_match(&self, id: MatchId) -> Result<Option<Match>>;

    /// All teams in the given order
    fn list_teams(&self, order: TeamOrder) -> Result<Vec<Team>>;

    /// Players of one team, ordered by name
    fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>>;

    /// Matches accepted by the filter, in the given order
    fn list_matches(&self, filter: MatchFilter, order: MatchOrder) -> Result<Vec<Match>>;

    fn insert_team(&mut self, team: NewTeam) -> Result<Team>;

    /// Fails if the referenced team does not exist
    fn insert_player(&mut self, player: NewPlayer) -> Result<Player>;

    /// Fails if either team does not exist or both sides are the same team
    fn insert_match(&mut self, new_match: NewMatch) -> Result<Match>;

    fn update_team(&mut self, team: &Team) -> Result<()>;

    fn update_player(&mut self, player: &Player) -> Result<()>;

    /// Fails if the winner is set to a team not playing in the match
    fn update_match(&mut self, record: &Match) -> Result<()>;

    /// Remove a team together with its players and every match referencing it.
    /// Returns `None` if the team does not exist.
    fn delete_team(&mut self, id: TeamId) -> Result<Option<TeamRemoval>>;

    /// Returns whether the player existed
    fn delete_player(&mut self, id: PlayerId) -> Result<bool>;

    /// Returns whether the match existed
    fn delete_match(&mut self, id: MatchId) -> Result<bool>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// Discard any open transaction and release the session
    fn close(&mut self) -> Result<()>;
}

/// Run `operation` inside a transaction: commit if it succeeds, roll back if it
/// or the commit fails. The original error is returned either way.
pub fn in_transaction<S, T, F>(store: &mut S, operation: F) -> Result<T>
where
    S: LeagueStore + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    store.begin()?;

    let outcome = match operation(&mut *store) {
        Ok(value) => store.commit().map(|_| value),
        Err(e) => Err(e),
    };

    if outcome.is_err() {
        if let Err(rollback_error) = store.rollback() {
            warn!("Rollback after failed transaction also failed: {}", rollback_error);
        }
    }

    outcome
}
