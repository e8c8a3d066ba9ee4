#![forbid(unsafe_code)]

//! Brackets, layouts, and a ready-made surface/table pair.

use std::sync::Arc;

use bgrid_core::{Bracket, BracketError, GameId, Region};
use bgrid_layout::{GridModel, GridSettings, PlacementFailure};
use bgrid_render::{
    ApplyError, ChangeApplier, GameDataDelta, SurfaceResult, build_from_surface,
};

use crate::source::MemorySourceTable;
use crate::surface::MemorySurface;

/// Bracket name used by every fixture.
pub const BRACKET_NAME: &str = "Main";

/// Seed names, strongest first.
pub const TEAM_NAMES: [&str; 16] = [
    "Eagles", "Hawks", "Owls", "Falcons", "Ravens", "Herons", "Kites", "Ospreys", "Condors",
    "Harriers", "Kestrels", "Merlins", "Swifts", "Terns", "Wrens", "Larks",
];

/// Both first-round games of a four-team bracket on day 0, the final on
/// day 1 lined up with their output rows (5 and 16).
pub const FOUR_TEAM_LAYOUT: [(u32, Region); 3] = [
    (1, Region::new(0, 11, 3, 3)),
    (2, Region::new(11, 11, 3, 3)),
    (3, Region::new(4, 14, 9, 3)),
];

/// [`FOUR_TEAM_LAYOUT`] plus the first two losers-side games of
/// [`double_elimination`], stacked below it.
pub const DOUBLE_ELIMINATION_LAYOUT: [(u32, Region); 5] = [
    (1, Region::new(0, 11, 3, 3)),
    (2, Region::new(11, 11, 3, 3)),
    (3, Region::new(4, 14, 9, 3)),
    (4, Region::new(24, 11, 6, 3)),
    (5, Region::new(24, 11, 12, 3)),
];

pub fn single_elimination(team_count: u32) -> Result<Bracket, BracketError> {
    Bracket::single_elimination(BRACKET_NAME, team_count)
}

pub fn double_elimination() -> Result<Bracket, BracketError> {
    Bracket::double_elimination_4(BRACKET_NAME)
}

/// An in-memory host holding one bracket.
#[derive(Debug, Clone)]
pub struct Workbench {
    pub surface: MemorySurface,
    pub source: MemorySourceTable,
    pub bracket: Bracket,
    pub settings: Arc<GridSettings>,
}

impl Workbench {
    /// Empty surface, teams named from [`TEAM_NAMES`].
    #[must_use]
    pub fn new(bracket: Bracket) -> Self {
        let teams = TEAM_NAMES.iter().copied().take(bracket.team_count() as usize);
        Self {
            surface: MemorySurface::new(),
            source: MemorySourceTable::new().with_teams(teams),
            bracket,
            settings: Arc::new(GridSettings::default()),
        }
    }

    #[must_use]
    pub fn empty_grid(&self) -> GridModel {
        GridModel::new(Arc::clone(&self.settings))
    }

    /// `grid` with game `number` placed at `region`.
    pub fn place(
        &self,
        grid: &GridModel,
        number: u32,
        region: Region,
    ) -> Result<GridModel, PlacementFailure> {
        let game = self
            .bracket
            .game(GameId::new(number))
            .ok_or(PlacementFailure::UnknownGame(GameId::new(number)))?;
        grid.build_new_grid_for_game_add(game, region, &self.bracket)
    }

    /// Place every `(game, region)` pair in order on an empty grid.
    pub fn place_all(&self, layout: &[(u32, Region)]) -> Result<GridModel, PlacementFailure> {
        layout
            .iter()
            .try_fold(self.empty_grid(), |grid, (number, region)| {
                self.place(&grid, *number, *region)
            })
    }

    pub fn applier(&mut self) -> ChangeApplier<'_, MemorySurface, MemorySourceTable> {
        ChangeApplier::new(
            &mut self.surface,
            &mut self.source,
            &self.bracket,
            &self.settings.pattern,
        )
    }

    /// Apply the diff from `old` to `new`.
    pub fn apply(
        &mut self,
        old: &GridModel,
        new: &GridModel,
    ) -> Result<Vec<GameDataDelta>, ApplyError> {
        let name = self.bracket.name().to_string();
        self.applier().diff_and_apply_changes(old, new, &name)
    }

    /// Read the grid back from the surface.
    pub fn rebuild(&self) -> SurfaceResult<GridModel> {
        build_from_surface(
            &self.surface,
            &self.source,
            &self.bracket,
            Arc::clone(&self.settings),
        )
    }
}
