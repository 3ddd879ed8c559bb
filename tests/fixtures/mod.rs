//! Test fixtures and store wrappers for integration testing

#![allow(dead_code)]

use chrono::NaiveDate;
use esports_league::error::{LeagueError, Result};
use esports_league::league::LeagueManager;
use esports_league::storage::{
    InMemoryLeagueStore, LeagueStore, MatchFilter, MatchOrder, TeamOrder, TeamRemoval,
};
use esports_league::types::{
    Match, MatchId, NewMatch, NewPlayer, NewTeam, Player, PlayerId, Team, TeamId,
};

/// Store that delegates to an in-memory store but fails the Nth team update.
/// Counting starts at 1 and spans every transaction.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: InMemoryLeagueStore,
    fail_on_team_update: Option<usize>,
    team_updates: usize,
    transactions: usize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the store to fail the `nth` team update from now on
    pub fn fail_on_team_update(&mut self, nth: usize) {
        self.fail_on_team_update = Some(nth);
        self.team_updates = 0;
    }

    /// Number of transactions opened so far
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn inner(&self) -> &InMemoryLeagueStore {
        &self.inner
    }
}

impl LeagueStore for FailingStore {
    fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        self.inner.get_team(id)
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        self.inner.get_player(id)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        self.inner.get_match(id)
    }

    fn list_teams(&self, order: TeamOrder) -> Result<Vec<Team>> {
        self.inner.list_teams(order)
    }

    fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>> {
        self.inner.list_players(team_id)
    }

    fn list_matches(&self, filter: MatchFilter, order: MatchOrder) -> Result<Vec<Match>> {
        self.inner.list_matches(filter, order)
    }

    fn insert_team(&mut self, team: NewTeam) -> Result<Team> {
        self.inner.insert_team(team)
    }

    fn insert_player(&mut self, player: NewPlayer) -> Result<Player> {
        self.inner.insert_player(player)
    }

    fn insert_match(&mut self, new_match: NewMatch) -> Result<Match> {
        self.inner.insert_match(new_match)
    }

    fn update_team(&mut self, team: &Team) -> Result<()> {
        self.team_updates += 1;
        if self.fail_on_team_update == Some(self.team_updates) {
            return Err(LeagueError::persistence("disk full").into());
        }
        self.inner.update_team(team)
    }

    fn update_player(&mut self, player: &Player) -> Result<()> {
        self.inner.update_player(player)
    }

    fn update_match(&mut self, record: &Match) -> Result<()> {
        self.inner.update_match(record)
    }

    fn delete_team(&mut self, id: TeamId) -> Result<Option<TeamRemoval>> {
        self.inner.delete_team(id)
    }

    fn delete_player(&mut self, id: PlayerId) -> Result<bool> {
        self.inner.delete_player(id)
    }

    fn delete_match(&mut self, id: MatchId) -> Result<bool> {
        self.inner.delete_match(id)
    }

    fn begin(&mut self) -> Result<()> {
        self.transactions += 1;
        self.inner.begin()
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.inner.rollback()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

/// A fixed "today" so date validation does not depend on the clock
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Create teams in the given genre, returning their ids in creation order
pub fn seed_teams<S: LeagueStore>(
    manager: &mut LeagueManager<S>,
    names: &[&str],
    genre: &str,
) -> Vec<TeamId> {
    names
        .iter()
        .map(|name| manager.create_team(name, genre).unwrap().id)
        .collect()
}

/// Current stored ratings of the given teams
pub fn stored_ratings<S: LeagueStore>(
    manager: &LeagueManager<S>,
    team_ids: &[TeamId],
) -> Vec<Option<i64>> {
    team_ids
        .iter()
        .map(|id| manager.get_team(*id).unwrap().rating)
        .collect()
}
