#![forbid(unsafe_code)]

//! In-memory source table.

use std::collections::BTreeMap;

use bgrid_core::{GameId, TeamId};
use bgrid_render::{GameRecord, SourceTable, SurfaceResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySourceTable {
    games: BTreeMap<GameId, GameRecord>,
    teams: BTreeMap<TeamId, String>,
    writes: u64,
}

impl MemorySourceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed team names, in seed order starting at 1.
    #[must_use]
    pub fn with_teams<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for (index, name) in names.into_iter().enumerate() {
            self.teams.insert(TeamId::new(index as u32 + 1), name.to_string());
        }
        self
    }

    /// Store a record without counting it as an engine write.
    pub fn set_game(&mut self, game: GameId, record: GameRecord) {
        self.games.insert(game, record);
    }

    #[must_use]
    pub fn game(&self, game: GameId) -> GameRecord {
        self.games.get(&game).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn team(&self, team: TeamId) -> Option<&str> {
        self.teams.get(&team).map(String::as_str)
    }

    /// Writes made through [`SourceTable`].
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl SourceTable for MemorySourceTable {
    fn read_game(&self, game: GameId) -> SurfaceResult<GameRecord> {
        Ok(self.game(game))
    }

    fn write_game(&mut self, game: GameId, record: &GameRecord) -> SurfaceResult<()> {
        self.writes += 1;
        if *record == GameRecord::default() {
            self.games.remove(&game);
        } else {
            self.games.insert(game, record.clone());
        }
        Ok(())
    }

    fn read_team(&self, team: TeamId) -> SurfaceResult<Option<String>> {
        Ok(self.teams.get(&team).cloned())
    }

    fn write_team(&mut self, team: TeamId, name: &str) -> SurfaceResult<()> {
        self.writes += 1;
        self.teams.insert(team, name.to_string());
        Ok(())
    }
}
