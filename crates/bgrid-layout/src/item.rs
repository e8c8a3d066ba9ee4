#![forbid(unsafe_code)]

use bgrid_core::{GameId, Region};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a grid item draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    GameBlock,
    ConnectorLine,
}

/// One placed element of the bracket grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    pub region: Region,
    pub kind: ItemKind,
    /// The game for a block; the game whose output a connector carries.
    /// `None` for an orphan connector.
    pub game_id: Option<GameId>,
    pub swap_top_bottom: bool,
    pub connected_top: bool,
    pub connected_bottom: bool,
    /// Scheduled field. Owned by the source table; a new block carries the
    /// proposed value.
    pub field: Option<String>,
    pub start_time: Option<NaiveDateTime>,
}

/// Identity used when diffing two grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub region: Region,
    pub game_id: Option<GameId>,
}

impl GridItem {
    /// A game block with default orientation and no schedule.
    #[must_use]
    pub fn game(game_id: GameId, region: Region) -> Self {
        Self {
            region,
            kind: ItemKind::GameBlock,
            game_id: Some(game_id),
            swap_top_bottom: false,
            connected_top: false,
            connected_bottom: false,
            field: None,
            start_time: None,
        }
    }

    #[must_use]
    pub fn connector(region: Region, source: Option<GameId>) -> Self {
        Self {
            region,
            kind: ItemKind::ConnectorLine,
            game_id: source,
            swap_top_bottom: false,
            connected_top: false,
            connected_bottom: false,
            field: None,
            start_time: None,
        }
    }

    #[must_use]
    pub fn with_swap(mut self, swap_top_bottom: bool) -> Self {
        self.swap_top_bottom = swap_top_bottom;
        self
    }

    #[must_use]
    pub fn with_schedule(mut self, field: Option<String>, start_time: Option<NaiveDateTime>) -> Self {
        self.field = field;
        self.start_time = start_time;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_game(&self) -> bool {
        self.kind == ItemKind::GameBlock
    }

    #[inline]
    #[must_use]
    pub fn is_connector(&self) -> bool {
        self.kind == ItemKind::ConnectorLine
    }

    /// The block of `game_id`.
    #[inline]
    #[must_use]
    pub fn is_block_of(&self, game_id: GameId) -> bool {
        self.is_game() && self.game_id == Some(game_id)
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey {
            kind: self.kind,
            region: self.region,
            game_id: self.game_id,
        }
    }

    /// Same identity but different displayed content.
    #[must_use]
    pub fn content_differs(&self, other: &GridItem) -> bool {
        self.swap_top_bottom != other.swap_top_bottom
    }
}
