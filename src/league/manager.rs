//! League manager implementation
//!
//! This module provides the `LeagueManager` that owns the store handle and runs
//! every record operation: validation first, then the write inside a scoped
//! transaction. Simulation and standings are delegated to the simulator and
//! the leaderboard builder.

use crate::error::{LeagueError, Result};
use crate::league::genres::GenreCatalog;
use crate::league::leaderboard::{LeaderboardBuilder, LeaderboardEntry};
use crate::league::simulator::{MatchSimulator, OutcomeSource, SimulationReport};
use crate::rating::EloRatingCalculator;
use crate::storage::{in_transaction, LeagueStore, MatchFilter, MatchOrder, TeamOrder, TeamRemoval};
use crate::types::{
    Match, MatchId, NewMatch, NewPlayer, NewTeam, Player, PlayerId, Team, TeamId,
};
use chrono::NaiveDate;
use tracing::info;

/// Requested changes to a team; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub genre: Option<String>,
}

/// Requested changes to a player; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// A match with its teams' names resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub record: Match,
    pub team1_name: String,
    pub team2_name: String,
    pub winner_name: Option<String>,
}

/// Owns the store session and runs league operations against it
pub struct LeagueManager<S: LeagueStore> {
    store: S,
    catalog: GenreCatalog,
    simulator: MatchSimulator<EloRatingCalculator>,
    leaderboard: LeaderboardBuilder<EloRatingCalculator>,
}

fn required_name(value: &str, what: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LeagueError::validation(format!("{} name cannot be empty", what)).into());
    }
    Ok(value.to_string())
}

impl<S: LeagueStore> LeagueManager<S> {
    /// Create a manager with the default Elo calculator and genre catalog
    pub fn new(store: S) -> Self {
        Self::with_calculator(store, EloRatingCalculator::default())
    }

    pub fn with_calculator(store: S, calculator: EloRatingCalculator) -> Self {
        Self {
            store,
            catalog: GenreCatalog::standard(),
            simulator: MatchSimulator::new(calculator.clone()),
            leaderboard: LeaderboardBuilder::new(calculator),
        }
    }

    pub fn catalog(&self) -> &GenreCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Close the store session, discarding any open transaction
    pub fn close(&mut self) -> Result<()> {
        self.store.close()
    }

    fn require_team(&self, team_id: TeamId) -> Result<Team> {
        self.store
            .get_team(team_id)?
            .ok_or_else(|| LeagueError::TeamNotFound { team_id }.into())
    }

    fn require_player(&self, player_id: PlayerId) -> Result<Player> {
        self.store
            .get_player(player_id)?
            .ok_or_else(|| LeagueError::PlayerNotFound { player_id }.into())
    }

    fn require_match(&self, match_id: MatchId) -> Result<Match> {
        self.store
            .get_match(match_id)?
            .ok_or_else(|| LeagueError::MatchNotFound { match_id }.into())
    }

    // Teams

    pub fn create_team(&mut self, name: &str, genre: &str) -> Result<Team> {
        let new_team = NewTeam {
            name: required_name(name, "Team")?,
            genre: self.catalog.canonical_genre(genre)?.to_string(),
        };

        let team = in_transaction(&mut self.store, |store| store.insert_team(new_team))?;
        info!("Created team '{}' ({}) with id {}", team.name, team.genre, team.id);
        Ok(team)
    }

    pub fn list_teams(&self, order: TeamOrder) -> Result<Vec<Team>> {
        self.store.list_teams(order)
    }

    pub fn get_team(&self, team_id: TeamId) -> Result<Team> {
        self.require_team(team_id)
    }

    pub fn update_team(&mut self, team_id: TeamId, changes: TeamChanges) -> Result<Team> {
        let mut team = self.require_team(team_id)?;

        if let Some(name) = changes.name {
            team.name = required_name(&name, "Team")?;
        }
        if let Some(genre) = changes.genre {
            team.genre = self.catalog.canonical_genre(&genre)?.to_string();
        }

        in_transaction(&mut self.store, |store| store.update_team(&team))?;
        info!("Updated team {}: {} ({})", team.id, team.name, team.genre);
        Ok(team)
    }

    /// Delete a team with its players and every match it appears in
    pub fn delete_team(&mut self, team_id: TeamId) -> Result<TeamRemoval> {
        self.require_team(team_id)?;
        let removal = in_transaction(&mut self.store, |store| store.delete_team(team_id))?
            .ok_or(LeagueError::TeamNotFound { team_id })?;

        info!(
            "Deleted team {} with {} players and {} matches",
            team_id, removal.players_removed, removal.matches_removed
        );
        Ok(removal)
    }

    // Players

    pub fn add_player(&mut self, team_id: TeamId, name: &str, role: &str) -> Result<Player> {
        let team = self.require_team(team_id)?;
        let new_player = NewPlayer {
            name: required_name(name, "Player")?,
            role: self.catalog.validate_role(&team.genre, role)?,
            team_id,
        };

        let player = in_transaction(&mut self.store, |store| store.insert_player(new_player))?;
        info!(
            "Added player '{}' as {} to team '{}'",
            player.name, player.role, team.name
        );
        Ok(player)
    }

    /// A team and its players ordered by name
    pub fn list_players(&self, team_id: TeamId) -> Result<(Team, Vec<Player>)> {
        let team = self.require_team(team_id)?;
        let players = self.store.list_players(team_id)?;
        Ok((team, players))
    }

    /// Every team with its players, teams in id order
    pub fn roster(&self) -> Result<Vec<(Team, Vec<Player>)>> {
        self.store
            .list_teams(TeamOrder::Id)?
            .into_iter()
            .map(|team| {
                let players = self.store.list_players(team.id)?;
                Ok((team, players))
            })
            .collect()
    }

    pub fn get_player(&self, player_id: PlayerId) -> Result<Player> {
        self.require_player(player_id)
    }

    pub fn update_player(&mut self, player_id: PlayerId, changes: PlayerChanges) -> Result<Player> {
        let mut player = self.require_player(player_id)?;

        if let Some(name) = changes.name {
            player.name = required_name(&name, "Player")?;
        }
        if let Some(role) = changes.role {
            let team = self.require_team(player.team_id)?;
            player.role = self.catalog.validate_role(&team.genre, &role)?;
        }

        in_transaction(&mut self.store, |store| store.update_player(&player))?;
        info!("Updated player {}: {} ({})", player.id, player.name, player.role);
        Ok(player)
    }

    pub fn delete_player(&mut self, player_id: PlayerId) -> Result<()> {
        self.require_player(player_id)?;
        let existed = in_transaction(&mut self.store, |store| store.delete_player(player_id))?;
        if !existed {
            return Err(LeagueError::PlayerNotFound { player_id }.into());
        }

        info!("Deleted player {}", player_id);
        Ok(())
    }

    // Matches

    /// Both teams of a prospective match; a team paired with itself is
    /// rejected before the store is consulted
    pub fn check_pairing(&self, team1_id: TeamId, team2_id: TeamId) -> Result<(Team, Team)> {
        if team1_id == team2_id {
            return Err(LeagueError::validation("A team cannot play against itself").into());
        }

        let team1 = self.require_team(team1_id)?;
        let team2 = self.require_team(team2_id)?;
        Ok((team1, team2))
    }

    /// Schedule a pending match between two different teams
    pub fn schedule_match(
        &mut self,
        team1_id: TeamId,
        team2_id: TeamId,
        date: Option<NaiveDate>,
    ) -> Result<MatchSummary> {
        let (team1, team2) = self.check_pairing(team1_id, team2_id)?;

        let record = in_transaction(&mut self.store, |store| {
            store.insert_match(NewMatch {
                team1_id,
                team2_id,
                date,
            })
        })?;

        info!(
            "Scheduled match {}: {} vs {} on {:?}",
            record.id, team1.name, team2.name, record.date
        );
        Ok(MatchSummary {
            record,
            team1_name: team1.name,
            team2_name: team2.name,
            winner_name: None,
        })
    }

    /// Move a match to a new date; the winner, if any, is kept
    pub fn reschedule_match(&mut self, match_id: MatchId, date: NaiveDate) -> Result<Match> {
        let mut record = self.require_match(match_id)?;
        record.date = Some(date);

        in_transaction(&mut self.store, |store| store.update_match(&record))?;
        info!("Match {} rescheduled to {}", match_id, date);
        Ok(record)
    }

    pub fn delete_match(&mut self, match_id: MatchId) -> Result<()> {
        self.require_match(match_id)?;
        let existed = in_transaction(&mut self.store, |store| store.delete_match(match_id))?;
        if !existed {
            return Err(LeagueError::MatchNotFound { match_id }.into());
        }

        info!("Deleted match {}", match_id);
        Ok(())
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<MatchSummary> {
        let record = self.require_match(match_id)?;
        self.summarize(record)
    }

    /// Every match, most recent first with unscheduled matches last
    pub fn match_history(&self) -> Result<Vec<MatchSummary>> {
        self.store
            .list_matches(MatchFilter::All, MatchOrder::DateDescending)?
            .into_iter()
            .map(|record| self.summarize(record))
            .collect()
    }

    fn summarize(&self, record: Match) -> Result<MatchSummary> {
        let team1 = self.require_team(record.team1_id)?;
        let team2 = self.require_team(record.team2_id)?;
        let winner_name = record.winner_id.map(|winner| {
            if winner == team1.id {
                team1.name.clone()
            } else {
                team2.name.clone()
            }
        });

        Ok(MatchSummary {
            record,
            team1_name: team1.name,
            team2_name: team2.name,
            winner_name,
        })
    }

    // Simulation and standings

    pub fn simulate_matches(&mut self, source: &mut dyn OutcomeSource) -> Result<SimulationReport> {
        self.simulator.simulate_pending(&mut self.store, source)
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.leaderboard.build(&self.store)
    }
}
