//! Common types used throughout the league manager

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for teams
pub type TeamId = i64;

/// Unique identifier for players
pub type PlayerId = i64;

/// Unique identifier for matches
pub type MatchId = i64;

/// Integer skill rating stored per team
pub type Rating = i64;

/// A team record as stored in the `teams` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub genre: String,
    /// Absent until the team's first simulated match
    pub rating: Option<Rating>,
}

/// A player record as stored in the `players` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: String,
    pub team_id: TeamId,
}

/// A match record as stored in the `matches` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub date: Option<NaiveDate>,
    /// `None` while the match is pending
    pub winner_id: Option<TeamId>,
}

impl Match {
    pub fn is_pending(&self) -> bool {
        self.winner_id.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.winner_id.is_some()
    }

    /// Whether the team plays in this match as team1 or team2
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    /// Win or loss from the given team's point of view, `None` while pending
    pub fn result_for(&self, team_id: TeamId) -> Option<MatchResult> {
        self.winner_id.map(|winner| {
            if winner == team_id {
                MatchResult::Win
            } else {
                MatchResult::Loss
            }
        })
    }

    /// Team id occupying the given side
    pub fn team_on(&self, side: Side) -> TeamId {
        match side {
            Side::Team1 => self.team1_id,
            Side::Team2 => self.team2_id,
        }
    }
}

/// Fields for a new team; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub genre: String,
}

/// Fields for a new player; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub role: String,
    pub team_id: TeamId,
}

/// Fields for a new, pending match; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub date: Option<NaiveDate>,
}

/// Which slot of a match a team occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Team1,
    Team2,
}

/// Result of a completed match from one team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    /// Single-letter form used in the leaderboard
    pub fn symbol(self) -> char {
        match self {
            MatchResult::Win => 'W',
            MatchResult::Loss => 'L',
        }
    }

    /// Actual score fed into the rating update
    pub fn score(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Loss => 0.0,
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
