use std::path::PathBuf;

use thiserror::Error;

use crate::ids::{GameId, TeamId};

pub type Result<T> = std::result::Result<T, BracketError>;

/// Errors raised while loading or validating a bracket definition.
#[derive(Debug, Error)]
pub enum BracketError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid source tag: {tag:?}")]
    InvalidSourceTag { tag: String },

    #[error("duplicate game number {0}")]
    DuplicateGame(GameId),

    #[error("{game} references unknown {source_game}")]
    UnknownSourceGame { game: GameId, source_game: GameId },

    #[error("{game} must be fed by earlier games, but references {source_game}")]
    ForwardReference { game: GameId, source_game: GameId },

    #[error("{game} references {team}, but the bracket has {team_count} teams")]
    UnknownTeam {
        game: GameId,
        team: TeamId,
        team_count: u32,
    },

    #[error("the output of {source_game} is consumed by both {first} and {second}")]
    OutputConsumedTwice {
        source_game: GameId,
        first: GameId,
        second: GameId,
    },

    #[error("unsupported team count {0}: single elimination needs a power of two >= 2")]
    UnsupportedTeamCount(u32),
}
