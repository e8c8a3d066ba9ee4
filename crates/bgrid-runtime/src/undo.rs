#![forbid(unsafe_code)]

//! Snapshot undo/redo for bracket edits.
//!
//! Every successful command records the grid as it was *before* the edit
//! together with the source-table deltas the edit produced. Undo rebuilds the
//! live grid from the surface, applies the diff back to the snapshot, and
//! restores each delta's `before` values. The live grid it replaced goes on
//! the redo stack, so redo is the same walk in the other direction.
//!
//! # Architecture
//!
//! ```text
//! set_undo_grid(G0, d1)      undo()                     redo()
//! ┌──────────────────────┐   ┌──────────────────────┐   ┌──────────────────────┐
//! │ Undo: [.., (G0, d1)] │   │ Undo: [..]           │   │ Undo: [.., (G0, d1)] │
//! │ Redo: []             │   │ Redo: [(G1, d1)]     │   │ Redo: []             │
//! │ Surface: G1          │   │ Surface: G0, d1^-1   │   │ Surface: G1, d1      │
//! └──────────────────────┘   └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! A new edit clears the redo stack. The undo stack is bounded by
//! [`UndoConfig::max_depth`]; the oldest entries are evicted first.
//!
//! # Failure
//!
//! The grid diff of an undo must not produce source-table deltas of its own:
//! the recorded deltas are the only data edits an undo may make. A diff that
//! does is reported as [`UndoError::UnexpectedDeltas`]. Any failure puts the
//! popped entry back, leaving both stacks as they were.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use bgrid_core::Bracket;
use bgrid_layout::{GridModel, GridSettings};
use bgrid_render::{
    ApplyError, ChangeApplier, GameDataDelta, SourceTable, Surface, SurfaceError,
    build_from_surface,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the undo history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    /// Maximum number of entries kept on the undo stack.
    pub max_depth: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

impl UndoConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No depth limit (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// One reversible step: the grid to return to and the data edits to revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoItem {
    pub grid: GridModel,
    pub deltas: Vec<GameDataDelta>,
}

/// Failure while undoing or redoing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Restoring the grid changed source data on its own.
    #[error("restoring the grid produced {count} unexpected data change(s)")]
    UnexpectedDeltas { count: usize },
}

/// What an undo or redo runs against.
pub struct UndoContext<'a, S: Surface + ?Sized, T: SourceTable + ?Sized> {
    pub surface: &'a mut S,
    pub source: &'a mut T,
    pub bracket: &'a Bracket,
    pub settings: &'a Arc<GridSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

/// Bounded undo and redo stacks of grid snapshots.
pub struct UndoManager {
    undo_stack: VecDeque<UndoItem>,
    redo_stack: VecDeque<UndoItem>,
    config: UndoConfig,
}

impl fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(UndoConfig::default())
    }
}

impl UndoManager {
    #[must_use]
    pub fn new(config: UndoConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &UndoConfig {
        &self.config
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Record the grid before an edit and the deltas the edit made.
    ///
    /// Clears the redo stack.
    pub fn set_undo_grid(&mut self, grid: &GridModel, deltas: Vec<GameDataDelta>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(UndoItem {
            grid: grid.clone(),
            deltas,
        });
        self.enforce_limits();
        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            items = grid.len(),
            "undo entry recorded"
        );
    }

    /// Return the surface to the most recent snapshot.
    ///
    /// `Ok(false)` when there is nothing to undo.
    pub fn undo<S, T>(&mut self, ctx: UndoContext<'_, S, T>) -> Result<bool, UndoError>
    where
        S: Surface + ?Sized,
        T: SourceTable + ?Sized,
    {
        let Some(entry) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        let _span = tracing::debug_span!("undo.undo", deltas = entry.deltas.len()).entered();
        match restore(ctx, &entry, Direction::Undo) {
            Ok(live) => {
                self.redo_stack.push_back(UndoItem {
                    grid: live,
                    deltas: entry.deltas,
                });
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push_back(entry);
                Err(err)
            }
        }
    }

    /// Re-apply the most recently undone step.
    ///
    /// `Ok(false)` when there is nothing to redo.
    pub fn redo<S, T>(&mut self, ctx: UndoContext<'_, S, T>) -> Result<bool, UndoError>
    where
        S: Surface + ?Sized,
        T: SourceTable + ?Sized,
    {
        let Some(entry) = self.redo_stack.pop_back() else {
            return Ok(false);
        };
        let _span = tracing::debug_span!("undo.redo", deltas = entry.deltas.len()).entered();
        match restore(ctx, &entry, Direction::Redo) {
            Ok(live) => {
                self.undo_stack.push_back(UndoItem {
                    grid: live,
                    deltas: entry.deltas,
                });
                self.enforce_limits();
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push_back(entry);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The entry the next undo would restore.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&UndoItem> {
        self.undo_stack.back()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limits(&mut self) {
        while self.undo_stack.len() > self.config.max_depth {
            self.undo_stack.pop_front();
        }
    }
}

/// Walk the surface to `entry.grid` and revert or replay its deltas.
///
/// Returns the live grid found before the walk.
fn restore<S, T>(
    ctx: UndoContext<'_, S, T>,
    entry: &UndoItem,
    direction: Direction,
) -> Result<GridModel, UndoError>
where
    S: Surface + ?Sized,
    T: SourceTable + ?Sized,
{
    let UndoContext {
        surface,
        source,
        bracket,
        settings,
    } = ctx;
    let live = build_from_surface(&*surface, &*source, bracket, Arc::clone(settings))?;

    let produced = ChangeApplier::new(&mut *surface, &mut *source, bracket, &settings.pattern)
        .diff_and_apply_changes(&live, &entry.grid, bracket.name())?;
    if !produced.is_empty() {
        match direction {
            Direction::Undo => {
                tracing::error!(count = produced.len(), "undo diff changed source data");
                return Err(UndoError::UnexpectedDeltas {
                    count: produced.len(),
                });
            }
            // Re-inserted blocks refill unset values; the recorded deltas win.
            Direction::Redo => {
                tracing::debug!(count = produced.len(), "insert defaults superseded on redo");
            }
        }
    }

    let mut ordered: Vec<&GameDataDelta> = entry.deltas.iter().collect();
    if direction == Direction::Undo {
        ordered.reverse();
    }
    for delta in ordered {
        let mut record = source.read_game(delta.game_id)?;
        match direction {
            Direction::Undo => delta.restore_before(&mut record),
            Direction::Redo => delta.reapply_after(&mut record),
        }
        source.write_game(delta.game_id, &record)?;
    }

    let touched: BTreeSet<_> = entry.deltas.iter().map(|delta| delta.game_id).collect();
    let mut applier = ChangeApplier::new(&mut *surface, &mut *source, bracket, &settings.pattern);
    for game_id in touched {
        if let Some(item) = entry.grid.game_item(game_id) {
            applier.refresh_game(item)?;
        }
    }
    tracing::debug!(
        direction = ?direction,
        removed_from = live.len(),
        restored = entry.grid.len(),
        "grid restored"
    );
    Ok(live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgrid_core::GameId;
    use bgrid_harness::{
        FOUR_TEAM_LAYOUT, MemorySourceTable, MemorySurface, Workbench, single_elimination,
    };
    use bgrid_render::{GameRecord, ValueChange};

    fn context(bench: &mut Workbench) -> UndoContext<'_, MemorySurface, MemorySourceTable> {
        UndoContext {
            surface: &mut bench.surface,
            source: &mut bench.source,
            bracket: &bench.bracket,
            settings: &bench.settings,
        }
    }

    #[test]
    fn empty_stacks_report_nothing_done() {
        let mut bench = Workbench::new(single_elimination(4).unwrap());
        let mut undo = UndoManager::default();
        assert!(!undo.undo(context(&mut bench)).unwrap());
        assert!(!undo.redo(context(&mut bench)).unwrap());
        assert!(bench.surface.log().is_empty());
    }

    #[test]
    fn new_entry_clears_redo() {
        let mut bench = Workbench::new(single_elimination(4).unwrap());
        let empty = bench.empty_grid();
        let grid = bench.place_all(&FOUR_TEAM_LAYOUT).unwrap();
        let deltas = bench.apply(&empty, &grid).unwrap();

        let mut undo = UndoManager::default();
        undo.set_undo_grid(&empty, deltas);
        assert!(undo.undo(context(&mut bench)).unwrap());
        assert!(undo.can_redo());
        undo.set_undo_grid(&empty, Vec::new());
        assert!(!undo.can_redo());
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut undo = UndoManager::new(UndoConfig::new(2));
        let grid = GridModel::default();
        for _ in 0..5 {
            undo.set_undo_grid(&grid, Vec::new());
        }
        assert_eq!(undo.undo_depth(), 2);
    }

    #[test]
    fn undo_of_a_placement_clears_surface_and_defaults() {
        let mut bench = Workbench::new(single_elimination(4).unwrap());
        let empty = bench.empty_grid();
        let grid = bench.place_all(&FOUR_TEAM_LAYOUT).unwrap();
        let blank = bench.surface.checksum();
        let deltas = bench.apply(&empty, &grid).unwrap();

        let mut undo = UndoManager::default();
        undo.set_undo_grid(&empty, deltas);
        assert!(undo.undo(context(&mut bench)).unwrap());
        assert_eq!(bench.surface.checksum(), blank);
        assert_eq!(bench.source.game(GameId::new(1)), GameRecord::default());
        assert_eq!(undo.redo_depth(), 1);

        assert!(undo.redo(context(&mut bench)).unwrap());
        assert_eq!(bench.source.game(GameId::new(1)).field.as_deref(), Some("Field #1"));
        assert!(bench.rebuild().unwrap().diff(&grid, "Main").is_empty());
        assert_eq!(undo.undo_depth(), 1);
    }

    #[test]
    fn unexpected_deltas_keep_the_entry() {
        let mut bench = Workbench::new(single_elimination(4).unwrap());
        let grid = bench.place_all(&FOUR_TEAM_LAYOUT).unwrap();

        // A snapshot whose blocks are not on the surface and whose games
        // have no stored schedule makes the diff insert with defaults.
        let mut undo = UndoManager::default();
        undo.set_undo_grid(&grid, Vec::new());
        let result = undo.undo(context(&mut bench));
        assert!(matches!(result, Err(UndoError::UnexpectedDeltas { count: 3 })));
        assert_eq!(undo.undo_depth(), 1);
        assert_eq!(undo.redo_depth(), 0);
    }

    #[test]
    fn deltas_revert_in_reverse_order() {
        let mut bench = Workbench::new(single_elimination(4).unwrap());
        let game = GameId::new(1);
        bench.source.set_game(game, GameRecord::new(Some("C".into()), None));
        let step = |before: &str, after: &str| GameDataDelta {
            game_id: game,
            field: ValueChange::between(Some(before.to_string()), Some(after.to_string())),
            start_time: None,
        };

        let mut undo = UndoManager::default();
        undo.set_undo_grid(&bench.empty_grid(), vec![step("A", "B"), step("B", "C")]);
        assert!(undo.undo(context(&mut bench)).unwrap());
        assert_eq!(bench.source.game(game).field.as_deref(), Some("A"));
        assert!(undo.redo(context(&mut bench)).unwrap());
        assert_eq!(bench.source.game(game).field.as_deref(), Some("C"));
    }
}
