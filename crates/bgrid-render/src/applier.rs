#![forbid(unsafe_code)]

//! Two-phase application of grid diffs to a surface.
//!
//! Every remove of a batch completes before the first insert, so a block
//! moving onto cells another block is leaving never sees them occupied. A
//! failure aborts the rest of the batch; nothing is rolled back.

use bgrid_core::{Bracket, GameDef, GameId, Region, Slot, SlotSource};
use bgrid_layout::{
    BlockGeometry, ChangeOp, GridChange, GridDiff, GridItem, GridModel, GridPattern, ItemKind,
    displayed_slot,
};
use thiserror::Error;

use crate::block::{BindingPart, BlockText, advance_text, binding_name, render_block, render_connector};
use crate::checkpoint::ScopedCheckpoint;
use crate::source::{GameDataDelta, GameRecord, apply_first_time_defaults};
use crate::surface::{SourceTable, Surface, SurfaceError};

/// Failure while applying changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// An insert found the game already bound on the surface.
    #[error("{game} is already bound at {region}")]
    InternalConsistency { game: GameId, region: Region },

    #[error("{0} is not part of the bracket")]
    UnknownGame(GameId),

    #[error("game block at {region} carries no game id")]
    Unidentified { region: Region },

    #[error("diff for bracket {actual:?} applied to bracket {expected:?}")]
    BracketMismatch { expected: String, actual: String },

    #[error("{op:?} change passed to the wrong phase")]
    WrongPhase { op: ChangeOp },
}

/// Applies structural changes of one bracket to a surface and its source
/// table.
pub struct ChangeApplier<'a, S: Surface + ?Sized, T: SourceTable + ?Sized> {
    surface: &'a mut S,
    source: &'a mut T,
    bracket: &'a Bracket,
    pattern: &'a GridPattern,
}

impl<'a, S: Surface + ?Sized, T: SourceTable + ?Sized> ChangeApplier<'a, S, T> {
    pub fn new(
        surface: &'a mut S,
        source: &'a mut T,
        bracket: &'a Bracket,
        pattern: &'a GridPattern,
    ) -> Self {
        Self {
            surface,
            source,
            bracket,
            pattern,
        }
    }

    /// Diff `old` against `new` and apply the result.
    pub fn diff_and_apply_changes(
        &mut self,
        old: &GridModel,
        new: &GridModel,
        bracket_name: &str,
    ) -> Result<Vec<GameDataDelta>, ApplyError> {
        self.apply_diff(&old.diff(new, bracket_name))
    }

    /// Apply every remove, then every insert.
    ///
    /// Returns the source-table edits made by first-time defaults of new
    /// blocks.
    pub fn apply_diff(&mut self, diff: &GridDiff) -> Result<Vec<GameDataDelta>, ApplyError> {
        if diff.bracket_name != self.bracket.name() {
            return Err(ApplyError::BracketMismatch {
                expected: self.bracket.name().to_string(),
                actual: diff.bracket_name.clone(),
            });
        }
        let _span = tracing::debug_span!(
            "apply.diff",
            bracket = %diff.bracket_name,
            removes = diff.removes.len(),
            inserts = diff.inserts.len()
        )
        .entered();

        self.scoped("bracket.apply", |applier| {
            for change in &diff.removes {
                applier.execute_remove_change(change)?;
            }
            let mut deltas = Vec::new();
            for change in &diff.inserts {
                if let Some(delta) = applier.execute_add_change(change, false)? {
                    deltas.push(delta);
                }
            }
            Ok(deltas)
        })
    }

    /// Re-render one placed block from the current source table.
    pub fn refresh_game(&mut self, item: &GridItem) -> Result<(), ApplyError> {
        let _span = tracing::debug_span!("apply.refresh", region = %item.region).entered();
        self.scoped("bracket.refresh", |applier| {
            applier.execute_remove_change(&GridChange::new(ChangeOp::RemoveLite, item.clone()))?;
            applier.execute_add_change(&GridChange::new(ChangeOp::InsertLite, item.clone()), false)?;
            Ok(())
        })
    }

    /// Take one item off the surface.
    pub fn execute_remove_change(&mut self, change: &GridChange) -> Result<(), ApplyError> {
        if !change.op.is_remove() {
            return Err(ApplyError::WrongPhase { op: change.op });
        }
        let item = &change.item;
        if item.kind == ItemKind::ConnectorLine {
            self.surface.clear_formatting(item.region)?;
            return Ok(());
        }

        let game_id = block_game(item)?;
        let game = self.game(game_id)?;
        let bound = self
            .surface
            .lookup_name(&binding_name(self.bracket.name(), game_id, BindingPart::GameNumber))?
            .is_some();
        if bound {
            self.save_team_overrides(item, game)?;
            if change.op == ChangeOp::Remove {
                for part in BindingPart::ALL {
                    self.surface
                        .unbind_name(&binding_name(self.bracket.name(), game_id, part))?;
                }
            }
        }
        self.surface.clear_region(item.region)?;
        tracing::debug!(game = game_id.get(), region = %item.region, op = ?change.op, "block removed");
        Ok(())
    }

    /// Put one item on the surface.
    ///
    /// A full insert fills unset source-table values from the item's
    /// proposed schedule (all of them when `overwrite`) and returns what it
    /// changed.
    pub fn execute_add_change(
        &mut self,
        change: &GridChange,
        overwrite: bool,
    ) -> Result<Option<GameDataDelta>, ApplyError> {
        if change.op.is_remove() {
            return Err(ApplyError::WrongPhase { op: change.op });
        }
        let item = &change.item;
        if item.kind == ItemKind::ConnectorLine {
            self.surface
                .write_region_content(item.region, &render_connector(item.region, self.pattern))?;
            return Ok(None);
        }

        let game_id = block_game(item)?;
        let game = self.game(game_id)?;
        let full = change.op == ChangeOp::Insert;
        let mut delta = None;
        if full {
            let number = binding_name(self.bracket.name(), game_id, BindingPart::GameNumber);
            if let Some(region) = self.surface.lookup_name(&number)? {
                tracing::error!(game = game_id.get(), %region, "insert found game already bound");
                return Err(ApplyError::InternalConsistency {
                    game: game_id,
                    region,
                });
            }
            let current = self.source.read_game(game_id)?;
            let proposed = GameRecord::new(item.field.clone(), item.start_time);
            let (merged, changed) =
                apply_first_time_defaults(game_id, &current, &proposed, overwrite);
            if changed.is_some() {
                self.source.write_game(game_id, &merged)?;
            }
            delta = changed;
        }

        let text = self.block_text(game)?;
        self.surface
            .write_region_content(item.region, &render_block(item, game, &text))?;

        if full {
            let geometry = BlockGeometry::new(item.region);
            for part in BindingPart::ALL {
                self.surface.bind_name(
                    &binding_name(self.bracket.name(), game_id, part),
                    part.cell(&geometry),
                )?;
            }
        }
        tracing::debug!(game = game_id.get(), region = %item.region, op = ?change.op, "block rendered");
        Ok(delta)
    }

    fn scoped<R>(
        &mut self,
        label: &str,
        work: impl FnOnce(&mut ChangeApplier<'_, S, T>) -> Result<R, ApplyError>,
    ) -> Result<R, ApplyError> {
        let mut scope = ScopedCheckpoint::open(&mut *self.surface, label)?;
        let result = {
            let mut inner = ChangeApplier {
                surface: &mut *scope,
                source: &mut *self.source,
                bracket: self.bracket,
                pattern: self.pattern,
            };
            work(&mut inner)
        };
        let released = scope.release();
        let value = result?;
        released?;
        Ok(value)
    }

    fn game(&self, game_id: GameId) -> Result<&'a GameDef, ApplyError> {
        self.bracket
            .game(game_id)
            .ok_or(ApplyError::UnknownGame(game_id))
    }

    fn block_text(&self, game: &GameDef) -> Result<BlockText, ApplyError> {
        let record = self.source.read_game(game.id)?;
        Ok(BlockText {
            top_team: self.team_label(game.top)?,
            bottom_team: self.team_label(game.bottom)?,
            field: record.field,
            start_time: record.start_time,
            advance_to: advance_text(self.bracket, game.id),
        })
    }

    fn team_label(&self, source: SlotSource) -> Result<String, ApplyError> {
        let name = match source {
            SlotSource::Team(team) => self.source.read_team(team)?,
            SlotSource::WinnerOf(_) | SlotSource::LoserOf(_) => None,
        };
        Ok(name.unwrap_or_else(|| source.to_string()))
    }

    /// Names typed over seeded team cells go back to the source table.
    fn save_team_overrides(&mut self, item: &GridItem, game: &GameDef) -> Result<(), ApplyError> {
        let snapshot = self
            .surface
            .read_region_snapshot(&[item.region])?
            .into_iter()
            .next()
            .ok_or_else(|| SurfaceError::Unavailable("empty snapshot batch".into()))?;
        let geometry = BlockGeometry::new(item.region);
        for slot in [Slot::Top, Slot::Bottom] {
            let SlotSource::Team(team) = game.source(slot) else {
                continue;
            };
            let cell = geometry.team_cell(displayed_slot(slot, item.swap_top_bottom));
            let data = snapshot.cell(cell.row, cell.column);
            if data.is_literal_override() {
                self.source.write_team(team, data.value.trim())?;
                tracing::debug!(game = game.id.get(), team = team.get(), "team name override saved");
            }
        }
        Ok(())
    }
}

fn block_game(item: &GridItem) -> Result<GameId, ApplyError> {
    item.game_id.ok_or(ApplyError::Unidentified {
        region: item.region,
    })
}
