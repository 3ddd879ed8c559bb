//! Leaderboard derivation
//!
//! Builds ranked standings from persisted teams and matches without writing
//! anything back. Unrated teams are shown at the default rating.

use crate::error::Result;
use crate::rating::RatingCalculator;
use crate::storage::{LeagueStore, MatchFilter, MatchOrder, TeamOrder};
use crate::types::{Match, Rating, Team, TeamId};

/// Number of most recent matches considered for the form string
pub const FORM_WINDOW: usize = 5;

/// Form shown for a team without any completed recent match
pub const EMPTY_FORM: &str = "-";

/// Display band of a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Elite,
    Strong,
    Rising,
    Developing,
}

impl RatingTier {
    pub fn for_rating(rating: Rating) -> Self {
        if rating > 1200 {
            RatingTier::Elite
        } else if rating > 1100 {
            RatingTier::Strong
        } else if rating > 1000 {
            RatingTier::Rising
        } else {
            RatingTier::Developing
        }
    }
}

impl std::fmt::Display for RatingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RatingTier::Elite => "Elite",
            RatingTier::Strong => "Strong",
            RatingTier::Rising => "Rising",
            RatingTier::Developing => "Developing",
        };
        f.write_str(name)
    }
}

/// One row of the standings
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position after sorting
    pub rank: usize,
    pub team_id: TeamId,
    pub name: String,
    pub genre: String,
    pub rating: Rating,
    pub wins: u32,
    pub losses: u32,
    /// Percentage of completed matches won, 0 without completed matches
    pub win_rate: f64,
    pub form: String,
}

impl LeaderboardEntry {
    /// Win-loss record, e.g. "3-1"
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }

    pub fn tier(&self) -> RatingTier {
        RatingTier::for_rating(self.rating)
    }
}

/// Statistics derived from one team's matches
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStanding {
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub form: String,
}

/// Derive wins, losses, win rate and recent form for a team.
/// `matches` may contain other teams' matches; they are ignored.
pub fn team_standing(team_id: TeamId, matches: &[Match]) -> TeamStanding {
    let mut involved: Vec<&Match> = matches
        .iter()
        .filter(|record| record.involves(team_id))
        .collect();

    let completed = involved.iter().filter(|record| record.is_completed()).count() as u32;
    let wins = involved
        .iter()
        .filter(|record| record.winner_id == Some(team_id))
        .count() as u32;
    let losses = completed - wins;

    let win_rate = if completed == 0 {
        0.0
    } else {
        wins as f64 / completed as f64 * 100.0
    };

    // Newest first; undated matches count as least recent
    involved.sort_by(|a, b| b.date.cmp(&a.date));
    let form: String = involved
        .iter()
        .take(FORM_WINDOW)
        .filter_map(|record| record.result_for(team_id))
        .map(|result| result.symbol())
        .collect();

    TeamStanding {
        wins,
        losses,
        win_rate,
        form: if form.is_empty() {
            EMPTY_FORM.to_string()
        } else {
            form
        },
    }
}

/// Builds ranked standings from the store
#[derive(Debug, Clone)]
pub struct LeaderboardBuilder<C: RatingCalculator> {
    calculator: C,
}

impl<C: RatingCalculator> LeaderboardBuilder<C> {
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// Standings for every team, highest rating first.
    /// Teams with equal ratings keep their id order.
    pub fn build<S>(&self, store: &S) -> Result<Vec<LeaderboardEntry>>
    where
        S: LeagueStore + ?Sized,
    {
        let teams = store.list_teams(TeamOrder::Id)?;
        let matches = store.list_matches(MatchFilter::All, MatchOrder::Id)?;
        Ok(self.rank(&teams, &matches))
    }

    /// Rank already-loaded teams; `teams` order decides ties
    pub fn rank(&self, teams: &[Team], matches: &[Match]) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = teams
            .iter()
            .map(|team| {
                let standing = team_standing(team.id, matches);
                LeaderboardEntry {
                    rank: 0,
                    team_id: team.id,
                    name: team.name.clone(),
                    genre: team.genre.clone(),
                    rating: self.calculator.resolve_rating(team).value,
                    wins: standing.wins,
                    losses: standing.losses,
                    win_rate: standing.win_rate,
                    form: standing.form,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.rating.cmp(&a.rating));
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::EloRatingCalculator;
    use crate::storage::{in_transaction, InMemoryLeagueStore};
    use crate::types::{MatchId, NewTeam};
    use chrono::NaiveDate;

    fn team(id: TeamId, rating: Option<Rating>) -> Team {
        Team {
            id,
            name: format!("Team {}", id),
            genre: "Overwatch".to_string(),
            rating,
        }
    }

    fn played(
        id: MatchId,
        team1_id: TeamId,
        team2_id: TeamId,
        day: Option<u32>,
        winner_id: Option<TeamId>,
    ) -> Match {
        Match {
            id,
            team1_id,
            team2_id,
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2026, 4, d)),
            winner_id,
        }
    }

    fn builder() -> LeaderboardBuilder<EloRatingCalculator> {
        LeaderboardBuilder::new(EloRatingCalculator::default())
    }

    #[test]
    fn test_team_without_matches() {
        let standing = team_standing(1, &[]);
        assert_eq!(standing.wins, 0);
        assert_eq!(standing.losses, 0);
        assert_eq!(standing.win_rate, 0.0);
        assert_eq!(standing.form, "-");
    }

    #[test]
    fn test_pending_only_has_zero_win_rate() {
        let matches = vec![played(1, 1, 2, Some(1), None)];
        let standing = team_standing(1, &matches);
        assert_eq!(standing.win_rate, 0.0);
        assert_eq!(standing.form, "-");
    }

    #[test]
    fn test_wins_losses_and_rate() {
        let matches = vec![
            played(1, 1, 2, Some(1), Some(1)),
            played(2, 3, 1, Some(2), Some(3)),
            played(3, 1, 3, Some(3), Some(1)),
            played(4, 2, 3, Some(4), Some(2)),
            played(5, 1, 2, Some(5), None),
        ];

        let standing = team_standing(1, &matches);
        assert_eq!(standing.wins, 2);
        assert_eq!(standing.losses, 1);
        assert!((standing.win_rate - 200.0 / 3.0).abs() < 1e-9);
        // Match 5 is the most recent but still pending
        assert_eq!(standing.form, "WLW");
    }

    #[test]
    fn test_form_uses_five_most_recent_matches() {
        // Seven matches, alternating results; the oldest two fall outside the window
        let mut matches: Vec<Match> = (1..=7)
            .map(|n| {
                let winner = if n % 2 == 0 { 1 } else { 2 };
                played(n, 1, 2, Some(n as u32), Some(winner))
            })
            .collect();
        // An undated completed match counts as least recent
        matches.push(played(8, 1, 2, None, Some(1)));

        let standing = team_standing(1, &matches);
        assert_eq!(standing.form, "LWLWL");
        assert_eq!(standing.form.len(), FORM_WINDOW);
        assert_eq!(standing.wins, 4);
        assert_eq!(standing.losses, 4);
    }

    #[test]
    fn test_pending_matches_take_form_slots() {
        let matches = vec![
            played(1, 1, 2, Some(1), Some(1)),
            played(2, 1, 2, Some(10), None),
            played(3, 1, 2, Some(11), None),
            played(4, 1, 2, Some(12), None),
            played(5, 1, 2, Some(13), None),
            played(6, 1, 2, Some(14), None),
        ];
        assert_eq!(team_standing(1, &matches).form, "-");
    }

    #[test]
    fn test_ties_keep_original_order() {
        let teams = vec![team(1, Some(1050)), team(2, Some(1050)), team(3, Some(900))];
        let entries = builder().rank(&teams, &[]);

        let ids: Vec<TeamId> = entries.iter().map(|entry| entry.team_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let ranks: Vec<usize> = entries.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_sorted_by_rating_with_default() {
        let teams = vec![team(1, Some(900)), team(2, None), team(3, Some(1250))];
        let entries = builder().rank(&teams, &[]);

        let ids: Vec<TeamId> = entries.iter().map(|entry| entry.team_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(entries[1].rating, 1000);
        assert_eq!(entries[0].tier(), RatingTier::Elite);
        assert_eq!(entries[1].tier(), RatingTier::Developing);
        assert_eq!(entries[0].record(), "0-0");
    }

    #[test]
    fn test_build_does_not_persist_default() {
        let mut store = InMemoryLeagueStore::new();
        in_transaction(&mut store, |store| {
            store.insert_team(NewTeam {
                name: "Unrated".to_string(),
                genre: "Fifa".to_string(),
            })
        })
        .unwrap();

        let entries = builder().build(&store).unwrap();
        assert_eq!(entries[0].rating, 1000);
        assert_eq!(store.get_team(1).unwrap().unwrap().rating, None);
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(RatingTier::for_rating(1201), RatingTier::Elite);
        assert_eq!(RatingTier::for_rating(1200), RatingTier::Strong);
        assert_eq!(RatingTier::for_rating(1101), RatingTier::Strong);
        assert_eq!(RatingTier::for_rating(1001), RatingTier::Rising);
        assert_eq!(RatingTier::for_rating(1000), RatingTier::Developing);
        assert_eq!(RatingTier::Rising.to_string(), "Rising");
    }
}
