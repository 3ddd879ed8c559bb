//! Plain-text table rendering for console output

use crate::league::{LeaderboardEntry, MatchSummary, SimulationReport};
use crate::types::{Player, Team};
use crate::utils::format_date;

/// Legend printed under the leaderboard
pub const FORM_LEGEND: &str = "Recent form shows results from last 5 matches (W=Win, L=Loss)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// A bordered text table; cells may span several lines
#[derive(Debug, Clone)]
pub struct TextTable {
    title: Option<String>,
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            title: None,
            headers: columns.iter().map(|(name, _)| name.to_string()).collect(),
            aligns: columns.iter().map(|(_, align)| *align).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(|line| line.chars().count()).max().unwrap_or(0);
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(widest);
                }
            }
        }
        widths
    }

    fn pad(text: &str, width: usize, align: Align) -> String {
        let fill = width.saturating_sub(text.chars().count());
        match align {
            Align::Left => format!("{}{}", text, " ".repeat(fill)),
            Align::Right => format!("{}{}", " ".repeat(fill), text),
            Align::Center => {
                let left = fill / 2;
                format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
            }
        }
    }

    fn separator(widths: &[usize]) -> String {
        let parts: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
        format!("+{}+", parts.join("+"))
    }

    fn line(&self, cells: &[&str], widths: &[usize], header: bool) -> String {
        let parts: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let text = cells.get(index).copied().unwrap_or("");
                let align = if header {
                    Align::Left
                } else {
                    self.aligns[index]
                };
                format!(" {} ", Self::pad(text, *width, align))
            })
            .collect();
        format!("|{}|", parts.join("|"))
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let separator = Self::separator(&widths);
        let mut out = String::new();

        if let Some(title) = &self.title {
            out.push_str(title);
            out.push('\n');
        }

        out.push_str(&separator);
        out.push('\n');
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        out.push_str(&self.line(&headers, &widths, true));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');

        for row in &self.rows {
            let split: Vec<Vec<&str>> = row.iter().map(|cell| cell.lines().collect()).collect();
            let height = split.iter().map(Vec::len).max().unwrap_or(1).max(1);
            for line_index in 0..height {
                let cells: Vec<&str> = split
                    .iter()
                    .map(|lines| lines.get(line_index).copied().unwrap_or(""))
                    .collect();
                out.push_str(&self.line(&cells, &widths, false));
                out.push('\n');
            }
        }

        out.push_str(&separator);
        out.push('\n');
        out
    }
}

pub fn teams_table(teams: &[Team]) -> String {
    let mut table = TextTable::new(&[
        ("ID", Align::Center),
        ("Name", Align::Left),
        ("Genre", Align::Left),
        ("Rating", Align::Center),
    ])
    .with_title("All Teams");

    for team in teams {
        table.add_row(vec![
            team.id.to_string(),
            team.name.clone(),
            team.genre.clone(),
            team.rating
                .map(|rating| rating.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    table.render()
}

/// Compact team list shown before choosing teams for a match
pub fn team_picker(teams: &[Team]) -> String {
    let mut table = TextTable::new(&[
        ("ID", Align::Left),
        ("Team", Align::Left),
        ("Game", Align::Left),
    ]);
    for team in teams {
        table.add_row(vec![team.id.to_string(), team.name.clone(), team.genre.clone()]);
    }
    table.render()
}

pub fn players_table(team: &Team, players: &[Player]) -> String {
    let mut table = TextTable::new(&[
        ("ID", Align::Center),
        ("Player Name", Align::Left),
        ("Role", Align::Left),
    ])
    .with_title(format!("Players of {} ({})", team.name, team.genre));

    for player in players {
        table.add_row(vec![
            player.id.to_string(),
            player.name.clone(),
            player.role.clone(),
        ]);
    }
    table.render()
}

/// All players across the league with the team each belongs to
pub fn roster_table(roster: &[(Team, Vec<Player>)]) -> String {
    let mut table = TextTable::new(&[
        ("ID", Align::Center),
        ("Player Name", Align::Left),
        ("Role", Align::Left),
        ("Team", Align::Left),
    ])
    .with_title("All Players");

    for (team, players) in roster {
        for player in players {
            table.add_row(vec![
                player.id.to_string(),
                player.name.clone(),
                player.role.clone(),
                team.name.clone(),
            ]);
        }
    }
    table.render()
}

pub fn history_table(history: &[MatchSummary]) -> String {
    let mut table = TextTable::new(&[
        ("ID", Align::Right),
        ("Team 1", Align::Left),
        ("VS", Align::Center),
        ("Team 2", Align::Left),
        ("Date", Align::Left),
        ("Winner", Align::Left),
    ])
    .with_title("Match History");

    for summary in history {
        let winner = match &summary.winner_name {
            Some(name) => format!("-> {}", name),
            None => "Pending".to_string(),
        };
        table.add_row(vec![
            summary.record.id.to_string(),
            summary.team1_name.clone(),
            "VS".to_string(),
            summary.team2_name.clone(),
            format_date(summary.record.date),
            winner,
        ]);
    }
    table.render()
}

pub fn simulation_table(report: &SimulationReport) -> String {
    let mut table = TextTable::new(&[
        ("Match", Align::Left),
        ("Ratings Before", Align::Left),
        ("Outcome", Align::Left),
        ("Ratings After", Align::Left),
        ("Δ", Align::Right),
    ]);

    for simulation in &report.simulations {
        let (one, two) = (&simulation.team1, &simulation.team2);
        table.add_row(vec![
            format!("{} vs {}", one.name, two.name),
            format!(
                "{}: {}\n{}: {}",
                one.name, one.rating_before, two.name, two.rating_before
            ),
            format!("{} wins", simulation.winner_side().name),
            format!(
                "{}: {}\n{}: {}",
                one.name, one.rating_after, two.name, two.rating_after
            ),
            format!("{:+}\n{:+}", one.delta(), two.delta()),
        ]);
    }
    table.render()
}

pub fn leaderboard_table(entries: &[LeaderboardEntry]) -> String {
    let mut table = TextTable::new(&[
        ("#", Align::Right),
        ("Team", Align::Left),
        ("Game", Align::Left),
        ("Rating", Align::Right),
        ("Tier", Align::Left),
        ("Record", Align::Center),
        ("Win %", Align::Right),
        ("Form", Align::Center),
    ]);

    for entry in entries {
        table.add_row(vec![
            entry.rank.to_string(),
            entry.name.clone(),
            entry.genre.clone(),
            entry.rating.to_string(),
            entry.tier().to_string(),
            entry.record(),
            format!("{:.1}%", entry.win_rate),
            entry.form.clone(),
        ]);
    }

    let mut out = table.render();
    out.push_str(FORM_LEGEND);
    out.push('\n');
    out
}
