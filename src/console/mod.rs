//! Interactive console front end
//!
//! A numbered main menu drives the league manager. Input is validated at this
//! boundary, every operation's error is reported and the loop continues, and
//! the loop ends on the exit option or when input runs out.

pub mod prompt;
pub mod render;

pub use prompt::{is_input_closed, InputClosed, Prompt};

use crate::error::{classify, LeagueError, Result};
use crate::league::{LeagueManager, OutcomeSource, PlayerChanges, RoleRule, TeamChanges};
use crate::storage::{LeagueStore, TeamOrder};
use crate::types::{MatchId, PlayerId, TeamId};
use crate::utils::{format_date, parse_date, parse_id, parse_schedule_date, DATE_FORMAT};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Main menu entries in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    CreateTeam,
    ListTeams,
    AddPlayer,
    ListPlayers,
    ScheduleMatch,
    SimulateMatches,
    MatchHistory,
    Leaderboard,
    UpdateTeam,
    DeleteTeam,
    UpdatePlayer,
    DeletePlayer,
    UpdateMatch,
    DeleteMatch,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 15] = [
        MenuOption::CreateTeam,
        MenuOption::ListTeams,
        MenuOption::AddPlayer,
        MenuOption::ListPlayers,
        MenuOption::ScheduleMatch,
        MenuOption::SimulateMatches,
        MenuOption::MatchHistory,
        MenuOption::Leaderboard,
        MenuOption::UpdateTeam,
        MenuOption::DeleteTeam,
        MenuOption::UpdatePlayer,
        MenuOption::DeletePlayer,
        MenuOption::UpdateMatch,
        MenuOption::DeleteMatch,
        MenuOption::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuOption::CreateTeam => "1",
            MenuOption::ListTeams => "2",
            MenuOption::AddPlayer => "3",
            MenuOption::ListPlayers => "4",
            MenuOption::ScheduleMatch => "5",
            MenuOption::SimulateMatches => "6",
            MenuOption::MatchHistory => "7",
            MenuOption::Leaderboard => "8",
            MenuOption::UpdateTeam => "9",
            MenuOption::DeleteTeam => "10",
            MenuOption::UpdatePlayer => "11",
            MenuOption::DeletePlayer => "12",
            MenuOption::UpdateMatch => "13",
            MenuOption::DeleteMatch => "14",
            MenuOption::Exit => "0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::CreateTeam => "Create Team",
            MenuOption::ListTeams => "List all teams",
            MenuOption::AddPlayer => "Add Player",
            MenuOption::ListPlayers => "List all players",
            MenuOption::ScheduleMatch => "Schedule Match",
            MenuOption::SimulateMatches => "Simulate Matches",
            MenuOption::MatchHistory => "Match History",
            MenuOption::Leaderboard => "Leaderboard",
            MenuOption::UpdateTeam => "Update Team",
            MenuOption::DeleteTeam => "Delete Team",
            MenuOption::UpdatePlayer => "Update Player",
            MenuOption::DeletePlayer => "Delete Player",
            MenuOption::UpdateMatch => "Update Match",
            MenuOption::DeleteMatch => "Delete Match",
            MenuOption::Exit => "Exit",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.iter().copied().find(|option| option.key() == key)
    }
}

/// Message shown to the user for a failed operation
pub fn describe_error(error: &anyhow::Error) -> String {
    match classify(error) {
        Some(LeagueError::Validation { reason }) => reason.clone(),
        _ => format!("{:#}", error),
    }
}

/// One interactive session over a league manager
pub struct Console<'a, S: LeagueStore, R, W> {
    manager: &'a mut LeagueManager<S>,
    source: &'a mut dyn OutcomeSource,
    prompt: Prompt<R, W>,
    today: NaiveDate,
}

impl<'a, S: LeagueStore, R: BufRead, W: Write> Console<'a, S, R, W> {
    pub fn new(
        manager: &'a mut LeagueManager<S>,
        source: &'a mut dyn OutcomeSource,
        input: R,
        output: W,
        today: NaiveDate,
    ) -> Self {
        Self {
            manager,
            source,
            prompt: Prompt::new(input, output),
            today,
        }
    }

    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Run the menu loop until the user exits or input ends.
    /// Only output failures end the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        self.prompt.say("Esports Tournament Manager")?;
        self.prompt
            .say("Manage teams, players, matches, and leaderboards.")?;

        loop {
            self.show_menu()?;

            let choice = match self.prompt.ask("\nYour choice", None) {
                Ok(choice) => choice,
                Err(e) if is_input_closed(&e) => break,
                Err(e) if e.is::<std::io::Error>() => return Err(e),
                Err(e) => {
                    self.prompt.say(format!("✗ {}", describe_error(&e)))?;
                    continue;
                }
            };

            let option = match MenuOption::from_key(&choice) {
                Some(option) => option,
                None => {
                    self.prompt
                        .say("Please select one of the available options")?;
                    continue;
                }
            };

            if option == MenuOption::Exit {
                self.prompt
                    .say("Thank you for using the Tournament Manager! Goodbye!")?;
                return Ok(());
            }

            self.prompt.say(format!("\n>> {} selected...", option.label()))?;
            match self.dispatch(option) {
                Ok(()) => {}
                Err(e) if is_input_closed(&e) => break,
                Err(e) if e.is::<std::io::Error>() => return Err(e),
                Err(e) => self.report_failure(option, &e)?,
            }
        }

        debug!("Input closed, leaving the menu");
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        self.prompt.say("")?;
        for option in MenuOption::ALL {
            self.prompt.say(format!("[{}] {}", option.key(), option.label()))?;
        }
        Ok(())
    }

    fn report_failure(&mut self, option: MenuOption, error: &anyhow::Error) -> Result<()> {
        match classify(error) {
            Some(league_error) if league_error.is_user_error() => {
                debug!("{} rejected: {}", option.label(), error)
            }
            _ => warn!("{} failed: {:#}", option.label(), error),
        }
        self.prompt.say(format!("✗ {}", describe_error(error)))
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<()> {
        match option {
            MenuOption::CreateTeam => self.create_team(),
            MenuOption::ListTeams => self.list_teams(),
            MenuOption::AddPlayer => self.add_player(),
            MenuOption::ListPlayers => self.list_players(),
            MenuOption::ScheduleMatch => self.schedule_match(),
            MenuOption::SimulateMatches => self.simulate_matches(),
            MenuOption::MatchHistory => self.match_history(),
            MenuOption::Leaderboard => self.leaderboard(),
            MenuOption::UpdateTeam => self.update_team(),
            MenuOption::DeleteTeam => self.delete_team(),
            MenuOption::UpdatePlayer => self.update_player(),
            MenuOption::DeletePlayer => self.delete_player(),
            MenuOption::UpdateMatch => self.update_match(),
            MenuOption::DeleteMatch => self.delete_match(),
            MenuOption::Exit => Ok(()),
        }
    }

    fn ask_team_id(&mut self, label: &str) -> Result<TeamId> {
        let answer = self.prompt.ask(label, Some("0"))?;
        parse_id(&answer, "team")
    }

    fn ask_player_id(&mut self, label: &str) -> Result<PlayerId> {
        let answer = self.prompt.ask(label, Some("0"))?;
        parse_id(&answer, "player")
    }

    fn ask_match_id(&mut self, label: &str) -> Result<MatchId> {
        let answer = self.prompt.ask(label, Some("0"))?;
        parse_id(&answer, "match")
    }

    /// Ask for a match date until it parses and is not in the past
    fn ask_match_date(&mut self, label: &str, default: &str) -> Result<Option<NaiveDate>> {
        loop {
            let answer = self.prompt.ask(label, Some(default))?;
            match parse_schedule_date(&answer, self.today) {
                Ok(date) => return Ok(date),
                Err(e) => self.prompt.say(format!("✗ {}", describe_error(&e)))?,
            }
        }
    }

    fn show_teams(&mut self) -> Result<bool> {
        let teams = self.manager.list_teams(TeamOrder::Id)?;
        if teams.is_empty() {
            self.prompt.say("No teams found.")?;
            return Ok(false);
        }
        self.prompt.show(&render::teams_table(&teams))?;
        Ok(true)
    }

    fn show_roster(&mut self) -> Result<bool> {
        let roster = self.manager.roster()?;
        if roster.iter().all(|(_, players)| players.is_empty()) {
            self.prompt.say("No players found.")?;
            return Ok(false);
        }
        self.prompt.show(&render::roster_table(&roster))?;
        Ok(true)
    }

    fn show_history(&mut self) -> Result<bool> {
        let history = self.manager.match_history()?;
        if history.is_empty() {
            self.prompt.say("No matches to be displayed.")?;
            return Ok(false);
        }
        self.prompt.show(&render::history_table(&history))?;
        Ok(true)
    }

    fn create_team(&mut self) -> Result<()> {
        let name = self.prompt.ask("Team Name", None)?;
        let genres: Vec<&str> = self.manager.catalog().genres().collect();
        let default_genre = self.manager.catalog().default_genre();
        let genre = self
            .prompt
            .ask_choice("Genre", &genres, Some(default_genre))?;

        let team = self.manager.create_team(&name, &genre)?;
        self.prompt.say(format!(
            "✓ Added team {} ({}) (ID: {})",
            team.name, team.genre, team.id
        ))
    }

    fn list_teams(&mut self) -> Result<()> {
        self.show_teams().map(|_| ())
    }

    fn add_player(&mut self) -> Result<()> {
        if !self.show_teams()? {
            return Ok(());
        }

        let team_id = self.ask_team_id("Enter team ID to add a player")?;
        let team = self.manager.get_team(team_id)?;
        let name = self.prompt.ask("Player Name", None)?;
        let role = match self.manager.catalog().roles_for(&team.genre) {
            RoleRule::Restricted(roles) => self.prompt.ask_choice("Role", roles, None)?,
            RoleRule::Unrestricted => self.prompt.ask("Role", None)?,
        };

        let player = self.manager.add_player(team.id, &name, &role)?;
        self.prompt.say(format!(
            "✓ Added player '{}' as {} to team '{}'",
            player.name, player.role, team.name
        ))
    }

    fn list_players(&mut self) -> Result<()> {
        if !self.show_teams()? {
            return Ok(());
        }

        let team_id = self.ask_team_id("Enter team ID to list players")?;
        let (team, players) = self.manager.list_players(team_id)?;

        if players.is_empty() {
            return self
                .prompt
                .say(format!("No players found in team '{}'", team.name));
        }
        self.prompt.show(&render::players_table(&team, &players))
    }

    fn schedule_match(&mut self) -> Result<()> {
        let teams = self.manager.list_teams(TeamOrder::Id)?;
        if teams.is_empty() {
            return self.prompt.say("✗ No teams available to schedule matches");
        }
        self.prompt.show(&render::team_picker(&teams))?;

        let team1_id = parse_id(&self.prompt.ask("Enter ID of first team", None)?, "team")?;
        let team2_id = parse_id(&self.prompt.ask("Enter ID of second team", None)?, "team")?;
        self.manager.check_pairing(team1_id, team2_id)?;

        let date = self.ask_match_date("Enter match date (YYYY-MM-DD)", "")?;
        let summary = self.manager.schedule_match(team1_id, team2_id, date)?;

        self.prompt.say("✓ Match scheduled:")?;
        self.prompt
            .say(format!("  {} vs {}", summary.team1_name, summary.team2_name))?;
        self.prompt
            .say(format!("  Date: {}", format_date(summary.record.date)))?;
        self.prompt.say(format!("  Match ID: {}", summary.record.id))
    }

    fn simulate_matches(&mut self) -> Result<()> {
        let report = self.manager.simulate_matches(&mut *self.source)?;
        if report.is_empty() {
            return self.prompt.say("No pending matches to simulate");
        }

        self.prompt
            .say(format!("Found {} matches to simulate:", report.len()))?;
        self.prompt.show(&render::simulation_table(&report))?;
        self.prompt
            .say("✓ All matches simulated and rankings updated!")
    }

    fn match_history(&mut self) -> Result<()> {
        self.show_history().map(|_| ())
    }

    fn leaderboard(&mut self) -> Result<()> {
        let entries = self.manager.leaderboard()?;
        if entries.is_empty() {
            return self.prompt.say("No teams found in the system");
        }
        self.prompt.show(&render::leaderboard_table(&entries))
    }

    fn update_team(&mut self) -> Result<()> {
        if !self.show_teams()? {
            return Ok(());
        }

        let team_id = self.ask_team_id("Enter team ID to update")?;
        let team = self.manager.get_team(team_id)?;

        let name = self.prompt.ask("New team name", Some(&team.name))?;
        let genre = self.prompt.ask("New genre", Some(&team.genre))?;
        let changes = TeamChanges {
            name: (name != team.name).then_some(name),
            genre: (genre != team.genre).then_some(genre),
        };

        let team = self.manager.update_team(team_id, changes)?;
        self.prompt
            .say(format!("✓ Team updated: {} ({})", team.name, team.genre))
    }

    fn delete_team(&mut self) -> Result<()> {
        if !self.show_teams()? {
            return Ok(());
        }

        let team_id = self.ask_team_id("Enter team ID to delete")?;
        let team = self.manager.get_team(team_id)?;

        let question = format!("Are you sure you want to delete team '{}'?", team.name);
        if !self.prompt.confirm(&question)? {
            return self.prompt.say("Cancelled.");
        }

        let removal = self.manager.delete_team(team_id)?;
        self.prompt.say(format!(
            "✓ Team deleted ({} players and {} matches removed)",
            removal.players_removed, removal.matches_removed
        ))
    }

    fn update_player(&mut self) -> Result<()> {
        if !self.show_roster()? {
            return Ok(());
        }

        let player_id = self.ask_player_id("Enter player ID to update")?;
        let player = self.manager.get_player(player_id)?;

        let name = self.prompt.ask("New player name", Some(&player.name))?;
        let role = self.prompt.ask("New role", Some(&player.role))?;
        let changes = PlayerChanges {
            name: (name != player.name).then_some(name),
            role: (role != player.role).then_some(role),
        };

        let player = self.manager.update_player(player_id, changes)?;
        self.prompt
            .say(format!("✓ Player updated: {} ({})", player.name, player.role))
    }

    fn delete_player(&mut self) -> Result<()> {
        if !self.show_roster()? {
            return Ok(());
        }

        let player_id = self.ask_player_id("Enter player ID to delete")?;
        let player = self.manager.get_player(player_id)?;

        let question = format!("Are you sure you want to delete player '{}'?", player.name);
        if !self.prompt.confirm(&question)? {
            return self.prompt.say("Cancelled.");
        }

        self.manager.delete_player(player_id)?;
        self.prompt.say("✓ Player deleted")
    }

    fn update_match(&mut self) -> Result<()> {
        if !self.show_history()? {
            return Ok(());
        }

        let match_id = self.ask_match_id("Enter match ID to update")?;
        let summary = self.manager.get_match(match_id)?;
        let current = summary.record.date;

        let answer = self.prompt.ask(
            "New match date (YYYY-MM-DD)",
            current
                .map(|date| date.format(DATE_FORMAT).to_string())
                .as_deref(),
        )?;
        let date = match parse_date(&answer)? {
            Some(date) if Some(date) != current => {
                if date < self.today {
                    return Err(LeagueError::validation("Date cannot be in the past").into());
                }
                date
            }
            _ => return self.prompt.say("No changes made."),
        };

        let record = self.manager.reschedule_match(match_id, date)?;
        self.prompt.say(format!(
            "✓ Match date updated to {}",
            format_date(record.date)
        ))
    }

    fn delete_match(&mut self) -> Result<()> {
        if !self.show_history()? {
            return Ok(());
        }

        let match_id = self.ask_match_id("Enter match ID to delete")?;
        self.manager.get_match(match_id)?;

        if !self.prompt.confirm("Are you sure you want to delete this match?")? {
            return self.prompt.say("Cancelled.");
        }

        self.manager.delete_match(match_id)?;
        self.prompt.say("✓ Match deleted")
    }
}
