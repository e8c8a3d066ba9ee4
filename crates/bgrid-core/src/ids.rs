#![forbid(unsafe_code)]

//! Identity handles for games and teams.
//!
//! A [`GameId`] is the game number printed on the bracket. It is stable for
//! the lifetime of a bracket definition and independent of where (or whether)
//! the game is currently placed on the grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BracketError;

/// Stable identity of a bracket game (its game number, starting at 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u32);

impl GameId {
    /// Create a game id from its number.
    #[inline]
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The game number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game {}", self.0)
    }
}

impl From<u32> for GameId {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Identity of a seeded team (its seed, starting at 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(u32);

impl TeamId {
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Where one of a game's two teams comes from.
///
/// The compact tags `T1`, `W3`, `L2` used in bracket files are parsed into
/// this type once, when the definition is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotSource {
    /// A seeded team.
    Team(TeamId),
    /// The winner of another game.
    WinnerOf(GameId),
    /// The loser of another game.
    LoserOf(GameId),
}

impl SlotSource {
    /// The game this slot is fed from, if any.
    #[must_use]
    pub const fn feeding_game(self) -> Option<GameId> {
        match self {
            Self::Team(_) => None,
            Self::WinnerOf(game) | Self::LoserOf(game) => Some(game),
        }
    }

    /// Compact tag form (`T1`, `W3`, `L2`).
    #[must_use]
    pub fn tag(self) -> String {
        match self {
            Self::Team(team) => format!("T{}", team.get()),
            Self::WinnerOf(game) => format!("W{}", game.get()),
            Self::LoserOf(game) => format!("L{}", game.get()),
        }
    }
}

impl fmt::Display for SlotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(team) => write!(f, "{team}"),
            Self::WinnerOf(game) => write!(f, "Winner of {game}"),
            Self::LoserOf(game) => write!(f, "Loser of {game}"),
        }
    }
}

impl FromStr for SlotSource {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let mut chars = tag.chars();
        let prefix = chars.next().map(|c| c.to_ascii_uppercase());
        let number: u32 = chars
            .as_str()
            .parse()
            .map_err(|_| BracketError::InvalidSourceTag { tag: tag.to_string() })?;
        if number == 0 {
            return Err(BracketError::InvalidSourceTag { tag: tag.to_string() });
        }
        match prefix {
            Some('T') => Ok(Self::Team(TeamId::new(number))),
            Some('W') => Ok(Self::WinnerOf(GameId::new(number))),
            Some('L') => Ok(Self::LoserOf(GameId::new(number))),
            _ => Err(BracketError::InvalidSourceTag { tag: tag.to_string() }),
        }
    }
}

impl TryFrom<String> for SlotSource {
    type Error = BracketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotSource> for String {
    fn from(value: SlotSource) -> Self {
        value.tag()
    }
}
