#![forbid(unsafe_code)]

//! Moving a placed game to a new region.

use std::fmt;

use bgrid_core::{Bracket, GameDef, GameId, Region, Slot};

use crate::error::PlacementFailure;
use crate::grid::GridModel;
use crate::item::GridItem;
use crate::pattern::BlockGeometry;

/// Soft problem found while moving; the move still happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveWarning {
    /// The feeder outputs support both orientations.
    AmbiguousOrientation { game: GameId, swap_top_bottom: bool },
}

impl fmt::Display for MoveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousOrientation {
                game,
                swap_top_bottom,
            } => write!(
                f,
                "orientation of {game} is ambiguous; chose {}",
                if *swap_top_bottom { "swapped" } else { "unswapped" }
            ),
        }
    }
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub grid: GridModel,
    pub warning: Option<MoveWarning>,
}

/// Top/bottom orientation chosen for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Orientation {
    pub swap: bool,
    /// The nearest-line reading disagrees with `swap`.
    pub ambiguous: bool,
}

/// Orientation of `game` placed at `region`.
///
/// Two placed feeders are ordered by output row: a top source whose output
/// lies below the bottom source's swaps the block. With one feeder, its
/// output is compared against the block's own output row. Without feeders
/// `fallback` is kept.
pub(crate) fn infer_orientation(
    grid: &GridModel,
    game: &GameDef,
    region: &Region,
    fallback: bool,
) -> Orientation {
    let geometry = BlockGeometry::new(*region);
    let output_of = |slot: Slot| {
        game.source(slot)
            .feeding_game()
            .filter(|feeder| *feeder != game.id)
            .and_then(|feeder| grid.game_item(feeder))
            .map(|item| BlockGeometry::new(item.region).output_row())
    };

    match (output_of(Slot::Top), output_of(Slot::Bottom)) {
        (Some(top), Some(bottom)) => {
            let swap = top > bottom;
            let line = geometry.top_line_row();
            let (top_distance, bottom_distance) = (top.abs_diff(line), bottom.abs_diff(line));
            let alternative = if top_distance == bottom_distance {
                swap
            } else {
                bottom_distance < top_distance
            };
            Orientation {
                swap,
                ambiguous: alternative != swap,
            }
        }
        (Some(top), None) => Orientation {
            swap: top > geometry.output_row(),
            ambiguous: false,
        },
        (None, Some(bottom)) => Orientation {
            swap: bottom < geometry.output_row(),
            ambiguous: false,
        },
        (None, None) => Orientation {
            swap: fallback,
            ambiguous: false,
        },
    }
}

/// Validates and builds moves against one bracket definition.
#[derive(Debug, Clone, Copy)]
pub struct GameMover<'a> {
    bracket: &'a Bracket,
}

impl<'a> GameMover<'a> {
    #[must_use]
    pub const fn new(bracket: &'a Bracket) -> Self {
        Self { bracket }
    }

    /// Move the game of `item_old` to `item_new`'s region.
    ///
    /// Checks run in order: alignment, bracket order against placed feeders
    /// and consumers, then overlap with other blocks. Connectors crossed by
    /// the new region are dropped. `grid` is never modified.
    pub fn move_game(
        &self,
        grid: &GridModel,
        item_old: &GridItem,
        item_new: &GridItem,
        bracket_name: &str,
    ) -> Result<MoveOutcome, PlacementFailure> {
        let region = item_new.region;
        let _span = tracing::debug_span!("grid.move", bracket = bracket_name, %region).entered();

        let game_id = match item_old.game_id {
            Some(id) if item_old.is_game() => id,
            _ => {
                return Err(PlacementFailure::NotAGame {
                    region: item_old.region,
                });
            }
        };
        let game = self
            .bracket
            .game(game_id)
            .ok_or(PlacementFailure::UnknownGame(game_id))?;
        let current = grid
            .game_item(game_id)
            .ok_or(PlacementFailure::NotPlaced(game_id))?;

        if !grid.pattern().is_aligned(&region) {
            return Err(PlacementFailure::Misaligned { region });
        }
        grid.check_order(game, &region, self.bracket)?;
        if let Some((other, kind)) = grid.first_overlapping_block(&region, Some(game_id)) {
            return Err(PlacementFailure::Overlap {
                region,
                with: other.game_id,
                kind,
            });
        }

        let orientation = infer_orientation(grid, game, &region, current.swap_top_bottom);
        let mut moved = current.clone().with_swap(orientation.swap);
        moved.region = region;

        let mut candidate = grid.clone();
        candidate.detach_lines(game_id);
        candidate.replace_block(game_id, moved);
        candidate.connect_game(game, self.bracket);

        let warning = orientation.ambiguous.then(|| {
            tracing::warn!(
                game = game_id.get(),
                swap = orientation.swap,
                "feeder outputs allow both orientations"
            );
            MoveWarning::AmbiguousOrientation {
                game: game_id,
                swap_top_bottom: orientation.swap,
            }
        });
        Ok(MoveOutcome {
            grid: candidate,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed() -> (Bracket, GridModel) {
        let bracket = Bracket::single_elimination("Main", 4).unwrap();
        let mut grid = GridModel::default();
        for (id, region) in [
            (1, Region::new(0, 11, 3, 3)),
            (2, Region::new(11, 11, 3, 3)),
            (3, Region::new(4, 14, 9, 3)),
        ] {
            grid = grid
                .build_new_grid_for_game_add(bracket.game(GameId::new(id)).unwrap(), region, &bracket)
                .unwrap();
        }
        (bracket, grid)
    }

    fn block(grid: &GridModel, id: u32) -> GridItem {
        grid.game_item(GameId::new(id)).unwrap().clone()
    }

    fn target(region: Region) -> GridItem {
        GridItem::game(GameId::new(0), region)
    }

    #[test]
    fn misaligned_target_is_rejected() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let err = mover
            .move_game(&grid, &block(&grid, 3), &target(Region::new(4, 14, 10, 3)), "Main")
            .unwrap_err();
        assert!(matches!(err, PlacementFailure::Misaligned { .. }));
    }

    #[test]
    fn moving_consumer_left_of_feeder_is_rejected() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let err = mover
            .move_game(&grid, &block(&grid, 3), &target(Region::new(40, 11, 3, 3)), "Main")
            .unwrap_err();
        assert_eq!(
            err,
            PlacementFailure::FeederNotEarlier {
                game: GameId::new(3),
                feeder: GameId::new(1)
            }
        );
    }

    #[test]
    fn moving_feeder_past_consumer_is_rejected() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let err = mover
            .move_game(&grid, &block(&grid, 1), &target(Region::new(40, 11, 12, 3)), "Main")
            .unwrap_err();
        assert!(err.is_dependency_violation());
    }

    #[test]
    fn overlap_with_other_block_is_rejected() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let err = mover
            .move_game(&grid, &block(&grid, 2), &target(Region::new(5, 11, 3, 3)), "Main")
            .unwrap_err();
        assert!(matches!(
            err,
            PlacementFailure::Overlap { with: Some(id), .. } if id == GameId::new(1)
        ));
    }

    #[test]
    fn overlapping_own_old_region_is_allowed() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let outcome = mover
            .move_game(&grid, &block(&grid, 3), &target(Region::new(6, 14, 9, 3)), "Main")
            .unwrap();
        assert_eq!(block(&outcome.grid, 3).region, Region::new(6, 14, 9, 3));
        // Rows no longer line up, so both connectors are gone.
        assert!(outcome.grid.items().iter().all(GridItem::is_game));
        assert!(!block(&outcome.grid, 3).connected_top);
        assert_eq!(grid.items().iter().filter(|item| item.is_connector()).count(), 2);
    }

    #[test]
    fn unplaced_game_is_rejected() {
        let bracket = Bracket::single_elimination("Main", 4).unwrap();
        let grid = GridModel::default();
        let mover = GameMover::new(&bracket);
        let old = GridItem::game(GameId::new(1), Region::new(0, 11, 3, 3));
        let err = mover
            .move_game(&grid, &old, &target(Region::new(20, 11, 3, 3)), "Main")
            .unwrap_err();
        assert_eq!(err, PlacementFailure::NotPlaced(GameId::new(1)));
    }

    #[test]
    fn swapped_feeders_swap_the_block() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        let outcome = mover
            .move_game(&grid, &block(&grid, 1), &target(Region::new(22, 11, 3, 3)), "Main")
            .unwrap();
        let grid = outcome.grid;
        // Game 1 now outputs at row 27, below game 2's row 16.
        let moved3 = mover
            .move_game(&grid, &block(&grid, 3), &target(Region::new(15, 14, 9, 3)), "Main")
            .unwrap();
        let game3 = block(&moved3.grid, 3);
        assert!(game3.swap_top_bottom);
        assert!(moved3.warning.is_none());
        assert!(game3.connected_top && game3.connected_bottom);
    }

    #[test]
    fn feeders_on_one_side_warn() {
        let (bracket, grid) = placed();
        let mover = GameMover::new(&bracket);
        // Swap the feeders' vertical order, then put game 3 below both.
        let grid = mover
            .move_game(&grid, &block(&grid, 1), &target(Region::new(22, 11, 3, 3)), "Main")
            .unwrap()
            .grid;
        let outcome = mover
            .move_game(&grid, &block(&grid, 3), &target(Region::new(40, 11, 9, 3)), "Main")
            .unwrap();
        assert!(block(&outcome.grid, 3).swap_top_bottom);
        assert_eq!(
            outcome.warning,
            Some(MoveWarning::AmbiguousOrientation {
                game: GameId::new(3),
                swap_top_bottom: true
            })
        );
    }

    #[test]
    fn connector_cannot_be_moved() {
        let (bracket, grid) = placed();
        let line = grid.items().iter().find(|item| item.is_connector()).unwrap().clone();
        let err = GameMover::new(&bracket)
            .move_game(&grid, &line, &target(Region::new(40, 11, 9, 3)), "Main")
            .unwrap_err();
        assert!(matches!(err, PlacementFailure::NotAGame { .. }));
    }
}
