//! In-memory league storage with optional JSON snapshot persistence
//!
//! Reads and writes go straight to the live tables. `begin` takes a savepoint
//! (a clone of the tables), `rollback` restores it, and `commit` drops it after
//! writing the snapshot file when one is configured. The file is written to a
//! temporary sibling and renamed into place, so a crash never leaves it torn.

use crate::error::{LeagueError, Result};
use crate::storage::{LeagueStore, MatchFilter, MatchOrder, Tables, TeamOrder, TeamRemoval};
use crate::types::{Match, MatchId, NewMatch, NewPlayer, NewTeam, Player, PlayerId, Team, TeamId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// In-memory league storage implementation
#[derive(Debug, Default)]
pub struct InMemoryLeagueStore {
    tables: Tables,
    savepoint: Option<Tables>,
    snapshot_path: Option<PathBuf>,
    closed: bool,
}

impl InMemoryLeagueStore {
    /// Create an empty store that never touches disk
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot file, loading it if it exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let tables = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                LeagueError::persistence(format!("failed to read {}: {}", path.display(), e))
            })?;
            let tables: Tables = serde_json::from_str(&contents).map_err(|e| {
                LeagueError::persistence(format!("failed to parse {}: {}", path.display(), e))
            })?;
            info!(
                "Loaded league database from {} ({} teams, {} players, {} matches)",
                path.display(),
                tables.teams.len(),
                tables.players.len(),
                tables.matches.len()
            );
            tables
        } else {
            info!("Creating new league database at {}", path.display());
            Tables::default()
        };

        Ok(Self {
            tables,
            savepoint: None,
            snapshot_path: Some(path),
            closed: false,
        })
    }

    /// Snapshot file backing this store, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn in_transaction(&self) -> bool {
        self.savepoint.is_some()
    }

    /// Current table contents (for inspection and tests)
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(LeagueError::persistence("the store session is closed").into());
        }
        Ok(())
    }

    fn writable(&mut self) -> Result<&mut Tables> {
        self.ensure_open()?;
        if self.savepoint.is_none() {
            return Err(LeagueError::persistence("write attempted outside a transaction").into());
        }
        Ok(&mut self.tables)
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LeagueError::persistence(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.tables)
            .map_err(|e| LeagueError::persistence(format!("failed to serialize tables: {}", e)))?;

        let temp_path = path.with_extension("json.tmp");
        let written = fs::write(&temp_path, json)
            .map_err(|e| format!("failed to write {}: {}", temp_path.display(), e))
            .and_then(|()| {
                fs::rename(&temp_path, path)
                    .map_err(|e| format!("failed to replace {}: {}", path.display(), e))
            });
        if let Err(message) = written {
            // Leave no stale temp file next to the snapshot
            if let Err(e) = fs::remove_file(&temp_path) {
                debug!("Could not remove {}: {}", temp_path.display(), e);
            }
            return Err(LeagueError::persistence(message).into());
        }

        debug!("Wrote league snapshot to {}", path.display());
        Ok(())
    }
}

impl LeagueStore for InMemoryLeagueStore {
    fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        self.ensure_open()?;
        Ok(self.tables.team(id).cloned())
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        self.ensure_open()?;
        Ok(self.tables.player(id).cloned())
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        self.ensure_open()?;
        Ok(self.tables.match_record(id).cloned())
    }

    fn list_teams(&self, order: TeamOrder) -> Result<Vec<Team>> {
        self.ensure_open()?;
        Ok(self.tables.teams_ordered(order))
    }

    fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>> {
        self.ensure_open()?;
        Ok(self.tables.players_of(team_id))
    }

    fn list_matches(&self, filter: MatchFilter, order: MatchOrder) -> Result<Vec<Match>> {
        self.ensure_open()?;
        Ok(self.tables.matches_where(filter, order))
    }

    fn insert_team(&mut self, team: NewTeam) -> Result<Team> {
        Ok(self.writable()?.insert_team(team))
    }

    fn insert_player(&mut self, player: NewPlayer) -> Result<Player> {
        self.writable()?.insert_player(player)
    }

    fn insert_match(&mut self, new_match: NewMatch) -> Result<Match> {
        self.writable()?.insert_match(new_match)
    }

    fn update_team(&mut self, team: &Team) -> Result<()> {
        self.writable()?.update_team(team)
    }

    fn update_player(&mut self, player: &Player) -> Result<()> {
        self.writable()?.update_player(player)
    }

    fn update_match(&mut self, record: &Match) -> Result<()> {
        self.writable()?.update_match(record)
    }

    fn delete_team(&mut self, id: TeamId) -> Result<Option<TeamRemoval>> {
        Ok(self.writable()?.delete_team(id))
    }

    fn delete_player(&mut self, id: PlayerId) -> Result<bool> {
        Ok(self.writable()?.delete_player(id))
    }

    fn delete_match(&mut self, id: MatchId) -> Result<bool> {
        Ok(self.writable()?.delete_match(id))
    }

    fn begin(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.savepoint.is_some() {
            return Err(LeagueError::persistence("a transaction is already open").into());
        }
        self.savepoint = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.savepoint.is_none() {
            return Err(LeagueError::persistence("no transaction to commit").into());
        }

        if let Some(path) = &self.snapshot_path {
            // The savepoint stays in place on failure so the caller can roll back
            self.write_snapshot(path)?;
        }

        self.savepoint = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        match self.savepoint.take() {
            Some(savepoint) => {
                self.tables = savepoint;
                debug!("Transaction rolled back");
                Ok(())
            }
            None => Err(LeagueError::persistence("no transaction to roll back").into()),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.savepoint.is_some() {
            warn!("Closing store with an open transaction; rolling it back");
            self.rollback()?;
        }
        self.closed = true;
        info!("League store session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::in_transaction;
    use tempfile::TempDir;

    fn new_team(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            genre: "Valorant".to_string(),
        }
    }

    #[test]
    fn test_writes_require_a_transaction() {
        let mut store = InMemoryLeagueStore::new();
        let err = store.insert_team(new_team("Fnatic")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Persistence error: write attempted outside a transaction"
        );
        assert!(store.list_teams(TeamOrder::Id).unwrap().is_empty());
    }

    #[test]
    fn test_commit_keeps_writes() {
        let mut store = InMemoryLeagueStore::new();
        let team = in_transaction(&mut store, |store| store.insert_team(new_team("Fnatic"))).unwrap();

        assert!(!store.in_transaction());
        assert_eq!(store.get_team(team.id).unwrap(), Some(team));
    }

    #[test]
    fn test_rollback_restores_savepoint() {
        let mut store = InMemoryLeagueStore::new();
        in_transaction(&mut store, |store| store.insert_team(new_team("Fnatic"))).unwrap();

        let result: Result<()> = in_transaction(&mut store, |store| {
            store.insert_team(new_team("Paper Rex"))?;
            store.delete_team(1)?;
            Err(LeagueError::persistence("simulated failure").into())
        });

        assert!(result.is_err());
        let names: Vec<String> = store
            .list_teams(TeamOrder::Id)
            .unwrap()
            .into_iter()
            .map(|team| team.name)
            .collect();
        assert_eq!(names, vec!["Fnatic"]);
    }

    #[test]
    fn test_nested_begin_is_rejected() {
        let mut store = InMemoryLeagueStore::new();
        store.begin().unwrap();
        assert!(store.begin().is_err());
        store.rollback().unwrap();
        assert!(store.rollback().is_err());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("league.json");

        {
            let mut store = InMemoryLeagueStore::open(&path).unwrap();
            in_transaction(&mut store, |store| {
                let team = store.insert_team(new_team("Fnatic"))?;
                store.insert_player(NewPlayer {
                    name: "Boaster".to_string(),
                    role: "Controller".to_string(),
                    team_id: team.id,
                })
            })
            .unwrap();

            // Rolled back work never reaches the file
            store.begin().unwrap();
            store.insert_team(new_team("Uncommitted")).unwrap();
            store.close().unwrap();
        }

        let reopened = InMemoryLeagueStore::open(&path).unwrap();
        let teams = reopened.list_teams(TeamOrder::Id).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Fnatic");
        assert_eq!(reopened.list_players(teams[0].id).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_failure_keeps_savepoint() {
        let dir = TempDir::new().unwrap();
        // A directory where the snapshot file should be makes the rename fail
        let path = dir.path().join("league.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = InMemoryLeagueStore {
            snapshot_path: Some(path.clone()),
            ..InMemoryLeagueStore::default()
        };

        let result = in_transaction(&mut store, |store| store.insert_team(new_team("Fnatic")));
        assert!(result.is_err());
        assert!(!store.in_transaction());
        assert!(store.list_teams(TeamOrder::Id).unwrap().is_empty());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_closed_store_rejects_access() {
        let mut store = InMemoryLeagueStore::new();
        store.close().unwrap();
        assert!(store.get_team(1).is_err());
        assert!(store.begin().is_err());
        assert!(store.close().is_ok());
    }

    #[test]
    fn test_corrupt_snapshot_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("league.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = InMemoryLeagueStore::open(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeagueError>(),
            Some(LeagueError::Persistence { .. })
        ));
    }
}
