//! The teams, players and matches tables with their constraints
//!
//! `Tables` is plain data: it serializes to the snapshot file as-is and is cloned
//! to form a transaction savepoint. Foreign keys and the match check constraints
//! are enforced here, the way a relational store would enforce them.

use crate::error::{LeagueError, Result};
use crate::storage::{MatchFilter, MatchOrder, TeamOrder, TeamRemoval};
use crate::types::{Match, MatchId, NewMatch, NewPlayer, NewTeam, Player, PlayerId, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory relational tables keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub teams: BTreeMap<TeamId, Team>,
    pub players: BTreeMap<PlayerId, Player>,
    pub matches: BTreeMap<MatchId, Match>,
    next_team_id: TeamId,
    next_player_id: PlayerId,
    next_match_id: MatchId,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            teams: BTreeMap::new(),
            players: BTreeMap::new(),
            matches: BTreeMap::new(),
            next_team_id: 1,
            next_player_id: 1,
            next_match_id: 1,
        }
    }
}

fn constraint_violation(message: String) -> anyhow::Error {
    LeagueError::persistence(format!("constraint failed: {}", message)).into()
}

impl Tables {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn match_record(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub fn teams_ordered(&self, order: TeamOrder) -> Vec<Team> {
        let mut teams: Vec<Team> = self.teams.values().cloned().collect();
        if order == TeamOrder::Name {
            teams.sort_by(|a, b| a.name.cmp(&b.name));
        }
        teams
    }

    pub fn players_of(&self, team_id: TeamId) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .values()
            .filter(|player| player.team_id == team_id)
            .cloned()
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }

    pub fn matches_where(&self, filter: MatchFilter, order: MatchOrder) -> Vec<Match> {
        // BTreeMap iteration yields id order, and the sorts below are stable
        let mut matches: Vec<Match> = self
            .matches
            .values()
            .filter(|record| filter.accepts(record))
            .cloned()
            .collect();

        match order {
            MatchOrder::Id => {}
            MatchOrder::DateAscending => matches.sort_by(|a, b| a.date.cmp(&b.date)),
            MatchOrder::DateDescending => matches.sort_by(|a, b| b.date.cmp(&a.date)),
        }
        matches
    }

    pub fn insert_team(&mut self, new_team: NewTeam) -> Team {
        let team = Team {
            id: self.next_team_id,
            name: new_team.name,
            genre: new_team.genre,
            rating: None,
        };
        self.next_team_id += 1;
        self.teams.insert(team.id, team.clone());
        team
    }

    pub fn insert_player(&mut self, new_player: NewPlayer) -> Result<Player> {
        self.check_team_exists(new_player.team_id, "players.team_id")?;

        let player = Player {
            id: self.next_player_id,
            name: new_player.name,
            role: new_player.role,
            team_id: new_player.team_id,
        };
        self.next_player_id += 1;
        self.players.insert(player.id, player.clone());
        Ok(player)
    }

    pub fn insert_match(&mut self, new_match: NewMatch) -> Result<Match> {
        let record = Match {
            id: self.next_match_id,
            team1_id: new_match.team1_id,
            team2_id: new_match.team2_id,
            date: new_match.date,
            winner_id: None,
        };
        self.check_match(&record)?;

        self.next_match_id += 1;
        self.matches.insert(record.id, record.clone());
        Ok(record)
    }

    pub fn update_team(&mut self, team: &Team) -> Result<()> {
        match self.teams.get_mut(&team.id) {
            Some(row) => {
                *row = team.clone();
                Ok(())
            }
            None => Err(LeagueError::TeamNotFound { team_id: team.id }.into()),
        }
    }

    pub fn update_player(&mut self, player: &Player) -> Result<()> {
        if !self.players.contains_key(&player.id) {
            return Err(LeagueError::PlayerNotFound {
                player_id: player.id,
            }
            .into());
        }
        self.check_team_exists(player.team_id, "players.team_id")?;

        self.players.insert(player.id, player.clone());
        Ok(())
    }

    pub fn update_match(&mut self, record: &Match) -> Result<()> {
        if !self.matches.contains_key(&record.id) {
            return Err(LeagueError::MatchNotFound {
                match_id: record.id,
            }
            .into());
        }
        self.check_match(record)?;

        self.matches.insert(record.id, record.clone());
        Ok(())
    }

    pub fn delete_team(&mut self, id: TeamId) -> Option<TeamRemoval> {
        self.teams.remove(&id)?;

        let players_before = self.players.len();
        self.players.retain(|_, player| player.team_id != id);

        let matches_before = self.matches.len();
        self.matches.retain(|_, record| !record.involves(id));

        Some(TeamRemoval {
            players_removed: players_before - self.players.len(),
            matches_removed: matches_before - self.matches.len(),
        })
    }

    pub fn delete_player(&mut self, id: PlayerId) -> bool {
        self.players.remove(&id).is_some()
    }

    pub fn delete_match(&mut self, id: MatchId) -> bool {
        self.matches.remove(&id).is_some()
    }

    fn check_team_exists(&self, team_id: TeamId, column: &str) -> Result<()> {
        if self.teams.contains_key(&team_id) {
            Ok(())
        } else {
            Err(constraint_violation(format!(
                "{} references missing team {}",
                column, team_id
            )))
        }
    }

    fn check_match(&self, record: &Match) -> Result<()> {
        if record.team1_id == record.team2_id {
            return Err(constraint_violation(format!(
                "match {} has team {} on both sides",
                record.id, record.team1_id
            )));
        }
        self.check_team_exists(record.team1_id, "matches.team1_id")?;
        self.check_team_exists(record.team2_id, "matches.team2_id")?;

        if let Some(winner) = record.winner_id {
            if !record.involves(winner) {
                return Err(constraint_violation(format!(
                    "winner {} of match {} is not playing in it",
                    winner, record.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_team(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            genre: "CS2".to_string(),
        }
    }

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 5, day)
    }

    fn seeded() -> Tables {
        let mut tables = Tables::default();
        tables.insert_team(new_team("Vitality"));
        tables.insert_team(new_team("Astralis"));
        tables.insert_team(new_team("MOUZ"));
        tables
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut tables = seeded();
        assert!(tables.delete_team(3).is_some());

        let team = tables.insert_team(new_team("FaZe"));
        assert_eq!(team.id, 4);
        assert_eq!(team.rating, None);
    }

    #[test]
    fn test_teams_ordered_by_name() {
        let tables = seeded();
        let names: Vec<String> = tables
            .teams_ordered(TeamOrder::Name)
            .into_iter()
            .map(|team| team.name)
            .collect();
        assert_eq!(names, vec!["Astralis", "MOUZ", "Vitality"]);

        let ids: Vec<TeamId> = tables
            .teams_ordered(TeamOrder::Id)
            .iter()
            .map(|team| team.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_player_foreign_key() {
        let mut tables = seeded();
        let result = tables.insert_player(NewPlayer {
            name: "ZywOo".to_string(),
            role: "AWPer".to_string(),
            team_id: 99,
        });

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeagueError>(),
            Some(LeagueError::Persistence { .. })
        ));
        assert!(tables.players.is_empty());
    }

    #[test]
    fn test_match_check_constraints() {
        let mut tables = seeded();

        assert!(tables
            .insert_match(NewMatch {
                team1_id: 1,
                team2_id: 1,
                date: None,
            })
            .is_err());

        let mut record = tables
            .insert_match(NewMatch {
                team1_id: 1,
                team2_id: 2,
                date: None,
            })
            .unwrap();

        record.winner_id = Some(3);
        assert!(tables.update_match(&record).is_err());

        record.winner_id = Some(2);
        tables.update_match(&record).unwrap();
        assert_eq!(tables.match_record(record.id).unwrap().winner_id, Some(2));
    }

    #[test]
    fn test_match_ordering_by_date() {
        let mut tables = seeded();
        let fixtures = [(1, 2, date(20)), (1, 3, None), (2, 3, date(5)), (1, 2, None)];
        for (team1_id, team2_id, day) in fixtures {
            tables
                .insert_match(NewMatch {
                    team1_id,
                    team2_id,
                    date: day,
                })
                .unwrap();
        }

        let ascending: Vec<MatchId> = tables
            .matches_where(MatchFilter::All, MatchOrder::DateAscending)
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ascending, vec![2, 4, 3, 1]);

        let descending: Vec<MatchId> = tables
            .matches_where(MatchFilter::All, MatchOrder::DateDescending)
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(descending, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_delete_team_cascades() {
        let mut tables = seeded();
        for name in ["apEX", "ropz"] {
            tables
                .insert_player(NewPlayer {
                    name: name.to_string(),
                    role: "Rifler".to_string(),
                    team_id: 1,
                })
                .unwrap();
        }
        tables
            .insert_player(NewPlayer {
                name: "device".to_string(),
                role: "AWPer".to_string(),
                team_id: 2,
            })
            .unwrap();
        tables
            .insert_match(NewMatch {
                team1_id: 1,
                team2_id: 2,
                date: None,
            })
            .unwrap();
        tables
            .insert_match(NewMatch {
                team1_id: 2,
                team2_id: 3,
                date: None,
            })
            .unwrap();

        let removal = tables.delete_team(1).unwrap();
        assert_eq!(
            removal,
            TeamRemoval {
                players_removed: 2,
                matches_removed: 1,
            }
        );
        assert_eq!(tables.players.len(), 1);
        assert_eq!(tables.matches.len(), 1);
        assert!(tables.delete_team(1).is_none());
    }

    #[test]
    fn test_update_missing_rows() {
        let mut tables = seeded();
        let ghost = Team {
            id: 42,
            name: "Ghost".to_string(),
            genre: "CS2".to_string(),
            rating: Some(1000),
        };
        let err = tables.update_team(&ghost).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeagueError>(),
            Some(LeagueError::TeamNotFound { team_id: 42 })
        ));
    }

    #[test]
    fn test_snapshot_serialization_keeps_counters() {
        let mut tables = seeded();
        tables.delete_team(3);

        let json = serde_json::to_string(&tables).unwrap();
        let mut restored: Tables = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tables);
        assert_eq!(restored.insert_team(new_team("NAVI")).id, 4);
    }
}
