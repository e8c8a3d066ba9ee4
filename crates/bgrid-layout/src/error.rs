use bgrid_core::{GameId, OverlapKind, Region};
use thiserror::Error;

/// Why a placement was rejected. Raised before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementFailure {
    #[error("{region} is not a full day column block of the minimum height")]
    Misaligned { region: Region },

    #[error("{region} overlaps {} ({kind:?})", owner_label(.with))]
    Overlap {
        region: Region,
        /// Game owning the overlapped item; `None` for an orphan line.
        with: Option<GameId>,
        kind: OverlapKind,
    },

    #[error("{game} must sit right of {feeder}")]
    FeederNotEarlier { game: GameId, feeder: GameId },

    #[error("{game} must sit left of {consumer}")]
    ConsumerNotLater { game: GameId, consumer: GameId },

    #[error("{0} is already on the grid")]
    AlreadyPlaced(GameId),

    #[error("{0} is not on the grid")]
    NotPlaced(GameId),

    #[error("{0} is not part of the bracket")]
    UnknownGame(GameId),

    #[error("{region} holds a connector line, not a game")]
    NotAGame { region: Region },
}

fn owner_label(with: &Option<GameId>) -> String {
    match with {
        Some(game) => game.to_string(),
        None => "an orphan line".to_string(),
    }
}

impl PlacementFailure {
    /// The target region is taken.
    #[must_use]
    pub fn is_structural_conflict(&self) -> bool {
        matches!(self, Self::Overlap { .. } | Self::AlreadyPlaced(_))
    }

    /// Bracket order would run right to left.
    #[must_use]
    pub fn is_dependency_violation(&self) -> bool {
        matches!(
            self,
            Self::FeederNotEarlier { .. } | Self::ConsumerNotLater { .. }
        )
    }
}
