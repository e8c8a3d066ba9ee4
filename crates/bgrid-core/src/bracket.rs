#![forbid(unsafe_code)]

//! Tournament bracket definitions.
//!
//! A [`Bracket`] is the static shape of a tournament: an ordered list of
//! games, each naming where its two teams come from. Destinations (where a
//! game's winner and loser go next) are not stored; they are derived by
//! inverting the sources, so the two can never disagree.
//!
//! Definitions are loaded from JSON:
//!
//! ```json
//! {
//!   "name": "4 Team Single",
//!   "team_count": 4,
//!   "games": [
//!     { "id": 1, "top": "T1", "bottom": "T4" },
//!     { "id": 2, "top": "T2", "bottom": "T3" },
//!     { "id": 3, "top": "W1", "bottom": "W2" }
//!   ]
//! }
//! ```
//!
//! Source tags are parsed into [`SlotSource`] during deserialization and the
//! whole definition is validated before a `Bracket` is handed out.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};
use crate::ids::{GameId, SlotSource, TeamId};

/// One of the two team positions of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Top,
    Bottom,
}

impl Slot {
    /// The other slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Which output of a game feeds another game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner,
    Loser,
}

/// A single game in a bracket definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDef {
    pub id: GameId,
    pub top: SlotSource,
    pub bottom: SlotSource,
}

impl GameDef {
    #[must_use]
    pub const fn new(id: GameId, top: SlotSource, bottom: SlotSource) -> Self {
        Self { id, top, bottom }
    }

    /// Source of the given slot.
    #[must_use]
    pub const fn source(&self, slot: Slot) -> SlotSource {
        match slot {
            Slot::Top => self.top,
            Slot::Bottom => self.bottom,
        }
    }

    /// Games feeding the top and bottom slots.
    #[must_use]
    pub const fn feeding_games(&self) -> [Option<GameId>; 2] {
        [self.top.feeding_game(), self.bottom.feeding_game()]
    }
}

/// Where a game's winner or loser advances to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub game: GameId,
    pub slot: Slot,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawBracket {
    name: String,
    team_count: u32,
    games: Vec<GameDef>,
}

/// A validated tournament definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bracket {
    name: String,
    team_count: u32,
    /// Sorted by id.
    games: Vec<GameDef>,
}

impl Bracket {
    /// Build and validate a bracket.
    pub fn new(name: impl Into<String>, team_count: u32, mut games: Vec<GameDef>) -> Result<Self> {
        games.sort_by_key(|game| game.id);
        let bracket = Self {
            name: name.into(),
            team_count,
            games,
        };
        bracket.validate()?;
        Ok(bracket)
    }

    /// Parse and validate a JSON definition.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawBracket = serde_json::from_str(json)?;
        Self::new(raw.name, raw.team_count, raw.games)
    }

    /// Load a JSON definition from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BracketError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Serialize back to the JSON file format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Single elimination for a power-of-two field with standard seeding
    /// (1 plays N, 2 plays N-1, ...), top seeds spread to opposite halves.
    pub fn single_elimination(name: impl Into<String>, team_count: u32) -> Result<Self> {
        if team_count < 2 || !team_count.is_power_of_two() {
            return Err(BracketError::UnsupportedTeamCount(team_count));
        }
        let order = seed_order(team_count);
        let mut games = Vec::with_capacity(team_count as usize - 1);
        let mut next_id = 1u32;
        let mut previous_round = Vec::new();
        for pair in order.chunks_exact(2) {
            let id = GameId::new(next_id);
            next_id += 1;
            games.push(GameDef::new(
                id,
                SlotSource::Team(TeamId::new(pair[0])),
                SlotSource::Team(TeamId::new(pair[1])),
            ));
            previous_round.push(id);
        }
        while previous_round.len() > 1 {
            let mut round = Vec::with_capacity(previous_round.len() / 2);
            for pair in previous_round.chunks_exact(2) {
                let id = GameId::new(next_id);
                next_id += 1;
                games.push(GameDef::new(
                    id,
                    SlotSource::WinnerOf(pair[0]),
                    SlotSource::WinnerOf(pair[1]),
                ));
                round.push(id);
            }
            previous_round = round;
        }
        Self::new(name, team_count, games)
    }

    /// Four-team double elimination without an if-necessary game.
    pub fn double_elimination_4(name: impl Into<String>) -> Result<Self> {
        use SlotSource::{LoserOf, Team, WinnerOf};
        let g = GameId::new;
        let t = TeamId::new;
        Self::new(
            name,
            4,
            vec![
                GameDef::new(g(1), Team(t(1)), Team(t(4))),
                GameDef::new(g(2), Team(t(2)), Team(t(3))),
                GameDef::new(g(3), WinnerOf(g(1)), WinnerOf(g(2))),
                GameDef::new(g(4), LoserOf(g(1)), LoserOf(g(2))),
                GameDef::new(g(5), LoserOf(g(3)), WinnerOf(g(4))),
                GameDef::new(g(6), WinnerOf(g(3)), WinnerOf(g(5))),
            ],
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn team_count(&self) -> u32 {
        self.team_count
    }

    /// All games in id order.
    #[must_use]
    pub fn games(&self) -> &[GameDef] {
        &self.games
    }

    /// Look up a game by id.
    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&GameDef> {
        self.games
            .binary_search_by_key(&id, |game| game.id)
            .ok()
            .map(|index| &self.games[index])
    }

    /// Where the given output of `id` advances to.
    #[must_use]
    pub fn advance_of(&self, id: GameId, outcome: Outcome) -> Option<Advance> {
        let wanted = match outcome {
            Outcome::Winner => SlotSource::WinnerOf(id),
            Outcome::Loser => SlotSource::LoserOf(id),
        };
        self.games.iter().find_map(|game| {
            [Slot::Top, Slot::Bottom]
                .into_iter()
                .find(|slot| game.source(*slot) == wanted)
                .map(|slot| Advance {
                    game: game.id,
                    slot,
                })
        })
    }

    /// Where the winner of `id` goes.
    #[must_use]
    pub fn winner_to(&self, id: GameId) -> Option<Advance> {
        self.advance_of(id, Outcome::Winner)
    }

    /// Where the loser of `id` goes.
    #[must_use]
    pub fn loser_to(&self, id: GameId) -> Option<Advance> {
        self.advance_of(id, Outcome::Loser)
    }

    /// Every (consumer, slot) pair fed by an output of `id`.
    pub fn consumers_of(&self, id: GameId) -> impl Iterator<Item = Advance> + '_ {
        self.games.iter().flat_map(move |game| {
            [Slot::Top, Slot::Bottom]
                .into_iter()
                .filter(move |slot| game.source(*slot).feeding_game() == Some(id))
                .map(move |slot| Advance {
                    game: game.id,
                    slot,
                })
        })
    }

    fn validate(&self) -> Result<()> {
        for pair in self.games.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(BracketError::DuplicateGame(pair[0].id));
            }
        }

        let mut consumed: Vec<(SlotSource, GameId)> = Vec::new();
        for game in &self.games {
            for source in [game.top, game.bottom] {
                match source {
                    SlotSource::Team(team) => {
                        if team.get() > self.team_count {
                            return Err(BracketError::UnknownTeam {
                                game: game.id,
                                team,
                                team_count: self.team_count,
                            });
                        }
                    }
                    SlotSource::WinnerOf(source_game) | SlotSource::LoserOf(source_game) => {
                        if self.game(source_game).is_none() {
                            return Err(BracketError::UnknownSourceGame {
                                game: game.id,
                                source_game,
                            });
                        }
                        if source_game >= game.id {
                            return Err(BracketError::ForwardReference {
                                game: game.id,
                                source_game,
                            });
                        }
                        if let Some((_, first)) = consumed.iter().find(|(s, _)| *s == source) {
                            return Err(BracketError::OutputConsumedTwice {
                                source_game,
                                first: *first,
                                second: game.id,
                            });
                        }
                        consumed.push((source, game.id));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Standard seeding order for a power-of-two field.
fn seed_order(team_count: u32) -> Vec<u32> {
    let mut order = vec![1u32, 2];
    while (order.len() as u32) < team_count {
        let size = order.len() as u32 * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, size + 1 - seed])
            .collect();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_spreads_top_seeds() {
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn single_elimination_8_has_7_games() {
        let bracket = Bracket::single_elimination("8 Team", 8).unwrap();
        assert_eq!(bracket.games().len(), 7);
        let final_game = bracket.game(GameId::new(7)).unwrap();
        assert_eq!(final_game.top, SlotSource::WinnerOf(GameId::new(5)));
        assert_eq!(final_game.bottom, SlotSource::WinnerOf(GameId::new(6)));
        assert_eq!(bracket.winner_to(GameId::new(7)), None);
        assert_eq!(
            bracket.winner_to(GameId::new(2)),
            Some(Advance {
                game: GameId::new(5),
                slot: Slot::Bottom
            })
        );
    }

    #[test]
    fn single_elimination_rejects_odd_counts() {
        assert!(matches!(
            Bracket::single_elimination("x", 6),
            Err(BracketError::UnsupportedTeamCount(6))
        ));
        assert!(Bracket::single_elimination("x", 1).is_err());
    }

    #[test]
    fn double_elimination_routes_losers() {
        let bracket = Bracket::double_elimination_4("DE4").unwrap();
        assert_eq!(
            bracket.loser_to(GameId::new(3)),
            Some(Advance {
                game: GameId::new(5),
                slot: Slot::Top
            })
        );
        let consumers: Vec<_> = bracket.consumers_of(GameId::new(1)).collect();
        assert_eq!(consumers.len(), 2);
    }

    #[test]
    fn json_definition_loads_and_validates() {
        let json = r#"{
            "name": "4 Team Single",
            "team_count": 4,
            "games": [
                { "id": 3, "top": "W1", "bottom": "W2" },
                { "id": 1, "top": "T1", "bottom": "T4" },
                { "id": 2, "top": "T2", "bottom": "T3" }
            ]
        }"#;
        let bracket = Bracket::from_json_str(json).unwrap();
        assert_eq!(bracket.name(), "4 Team Single");
        assert_eq!(bracket.games()[0].id, GameId::new(1));
        let again = Bracket::from_json_str(&bracket.to_json().unwrap()).unwrap();
        assert_eq!(again, bracket);
    }

    #[test]
    fn rejects_forward_and_duplicate_references() {
        let forward = r#"{"name":"x","team_count":2,"games":[
            {"id":1,"top":"W2","bottom":"T1"},{"id":2,"top":"T1","bottom":"T2"}]}"#;
        assert!(matches!(
            Bracket::from_json_str(forward),
            Err(BracketError::ForwardReference { .. })
        ));

        let twice = r#"{"name":"x","team_count":4,"games":[
            {"id":1,"top":"T1","bottom":"T2"},
            {"id":2,"top":"W1","bottom":"T3"},
            {"id":3,"top":"W1","bottom":"T4"}]}"#;
        assert!(matches!(
            Bracket::from_json_str(twice),
            Err(BracketError::OutputConsumedTwice { .. })
        ));

        let team = r#"{"name":"x","team_count":2,"games":[{"id":1,"top":"T1","bottom":"T3"}]}"#;
        assert!(matches!(
            Bracket::from_json_str(team),
            Err(BracketError::UnknownTeam { .. })
        ));

        let bad_tag = r#"{"name":"x","team_count":2,"games":[{"id":1,"top":"Q1","bottom":"T2"}]}"#;
        assert!(Bracket::from_json_str(bad_tag).is_err());
    }
}
