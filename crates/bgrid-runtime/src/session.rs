#![forbid(unsafe_code)]

//! The editing session: one bracket on one surface.
//!
//! [`BracketSession`] owns everything a command needs: the surface, the
//! source table, the bracket definition, the configuration, and the undo
//! history. Every structural command follows the same path:
//!
//! 1. Rebuild the live grid from the surface.
//! 2. Validate the edit and build a candidate grid.
//! 3. Diff and apply, removes before inserts.
//! 4. Record the live grid and the deltas for undo.
//!
//! Nothing is recorded unless every step succeeds. Methods take `&mut self`,
//! so one session runs one command at a time; [`SessionHandle`] shares a
//! session across threads behind a mutex.

use std::fmt;
use std::sync::{Arc, Mutex};

use bgrid_core::{Bracket, GameId, Region};
use bgrid_layout::{GameMover, GridItem, GridModel, GridSettings, MoveWarning, PlacementFailure};
use bgrid_render::{
    ApplyError, ChangeApplier, GameDataDelta, GameRecord, SourceTable, Surface, SurfaceError,
    build_from_surface,
};
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::{BracketConfig, ConfigError};
use crate::undo::{UndoContext, UndoError, UndoManager};

/// What a successful command changed besides the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Source-table edits, as recorded for undo.
    pub deltas: Vec<GameDataDelta>,
    pub warning: Option<MoveWarning>,
}

impl CommandOutcome {
    fn with_deltas(deltas: Vec<GameDataDelta>) -> Self {
        Self {
            deltas,
            warning: None,
        }
    }
}

/// Why a command failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Placement(#[from] PlacementFailure),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error("{0} is not part of the bracket")]
    UnknownGame(GameId),

    #[error("{0} is not on the grid")]
    NotPlaced(GameId),
}

pub struct BracketSession<S: Surface, T: SourceTable> {
    surface: S,
    source: T,
    bracket: Bracket,
    config: BracketConfig,
    settings: Arc<GridSettings>,
    undo: UndoManager,
}

impl<S: Surface, T: SourceTable> fmt::Debug for BracketSession<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BracketSession")
            .field("bracket", &self.bracket.name())
            .field("games", &self.bracket.games().len())
            .field("undo", &self.undo)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, T: SourceTable> BracketSession<S, T> {
    /// Open a session; fails when `config` does not validate.
    pub fn new(
        surface: S,
        source: T,
        bracket: Bracket,
        config: BracketConfig,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let settings = Arc::new(config.settings());
        let undo = UndoManager::new(config.undo.clone());
        tracing::info!(
            bracket = bracket.name(),
            games = bracket.games().len(),
            "bracket session opened"
        );
        Ok(Self {
            surface,
            source,
            bracket,
            config,
            settings,
            undo,
        })
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for edits made outside the engine, like a user typing.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }

    #[must_use]
    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    #[must_use]
    pub fn config(&self) -> &BracketConfig {
        &self.config
    }

    #[must_use]
    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    /// Give back the surface and the source table.
    pub fn into_parts(self) -> (S, T) {
        (self.surface, self.source)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The grid as currently bound on the surface.
    pub fn current_grid(&self) -> Result<GridModel, SessionError> {
        Ok(build_from_surface(
            &self.surface,
            &self.source,
            &self.bracket,
            Arc::clone(&self.settings),
        )?)
    }

    /// Region covering every placed item plus the configured margin.
    pub fn print_area(&self) -> Result<Option<Region>, SessionError> {
        Ok(self.current_grid()?.get_print_area(self.config.print_margin))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Place `game_id` at `selection`, snapped to a day column.
    pub fn add_game(
        &mut self,
        game_id: GameId,
        selection: Region,
    ) -> Result<CommandOutcome, SessionError> {
        let _span = tracing::debug_span!("session.add_game", game = game_id.get()).entered();
        let live = self.current_grid()?;
        let game = self
            .bracket
            .game(game_id)
            .ok_or(SessionError::UnknownGame(game_id))?;
        let region = live.adjust_selection_for_game_insert_or_move(&selection);
        let candidate = live.build_new_grid_for_game_add(game, region, &self.bracket)?;

        let outcome = self.commit(&live, &candidate)?;
        tracing::info!(
            game = game_id.get(),
            %region,
            deltas = outcome.deltas.len(),
            "game added"
        );
        Ok(outcome)
    }

    /// Move a placed game to `selection`, snapped to a day column.
    pub fn move_game(
        &mut self,
        game_id: GameId,
        selection: Region,
    ) -> Result<CommandOutcome, SessionError> {
        let _span = tracing::debug_span!("session.move_game", game = game_id.get()).entered();
        if self.bracket.game(game_id).is_none() {
            return Err(SessionError::UnknownGame(game_id));
        }
        let live = self.current_grid()?;
        let old = live
            .game_item(game_id)
            .ok_or(SessionError::NotPlaced(game_id))?
            .clone();
        let region = live.adjust_selection_for_game_insert_or_move(&selection);
        let moved = GameMover::new(&self.bracket).move_game(
            &live,
            &old,
            &GridItem::game(game_id, region),
            self.bracket.name(),
        )?;
        if let Some(warning) = &moved.warning {
            tracing::warn!(game = game_id.get(), %warning, "move kept a guessed orientation");
        }

        let mut outcome = self.commit(&live, &moved.grid)?;
        outcome.warning = moved.warning;
        tracing::info!(
            game = game_id.get(),
            from = %old.region,
            to = %region,
            "game moved"
        );
        Ok(outcome)
    }

    /// Take a placed game and its lines off the surface.
    pub fn remove_game(&mut self, game_id: GameId) -> Result<CommandOutcome, SessionError> {
        let _span = tracing::debug_span!("session.remove_game", game = game_id.get()).entered();
        if self.bracket.game(game_id).is_none() {
            return Err(SessionError::UnknownGame(game_id));
        }
        let live = self.current_grid()?;
        let candidate = live
            .remove_game(game_id)
            .ok_or(SessionError::NotPlaced(game_id))?;

        let outcome = self.commit(&live, &candidate)?;
        tracing::info!(game = game_id.get(), "game removed");
        Ok(outcome)
    }

    /// Set a game's field and start time.
    ///
    /// The layout is untouched; the edit is recorded as a delta and a placed
    /// block is re-rendered. Setting the values already stored is a no-op.
    pub fn set_game_schedule(
        &mut self,
        game_id: GameId,
        field: Option<String>,
        start_time: Option<NaiveDateTime>,
    ) -> Result<CommandOutcome, SessionError> {
        let _span = tracing::debug_span!("session.set_schedule", game = game_id.get()).entered();
        if self.bracket.game(game_id).is_none() {
            return Err(SessionError::UnknownGame(game_id));
        }
        let live = self.current_grid()?;
        let before = self.source.read_game(game_id)?;
        let after = GameRecord::new(field, start_time);
        let Some(delta) = GameDataDelta::between(game_id, &before, &after) else {
            return Ok(CommandOutcome::default());
        };

        self.source.write_game(game_id, &after)?;
        if let Some(item) = live.game_item(game_id) {
            self.applier().refresh_game(item)?;
        }
        self.undo.set_undo_grid(&live, vec![delta.clone()]);
        tracing::info!(
            game = game_id.get(),
            field = ?after.field,
            start_time = ?after.start_time,
            "game schedule set"
        );
        Ok(CommandOutcome::with_deltas(vec![delta]))
    }

    /// Revert the most recent command. `Ok(false)` when there is none.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let ctx = UndoContext {
            surface: &mut self.surface,
            source: &mut self.source,
            bracket: &self.bracket,
            settings: &self.settings,
        };
        let done = self.undo.undo(ctx)?;
        if done {
            tracing::info!(
                undo_depth = self.undo.undo_depth(),
                redo_depth = self.undo.redo_depth(),
                "undo"
            );
        }
        Ok(done)
    }

    /// Replay the most recently undone command. `Ok(false)` when there is
    /// none.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        let ctx = UndoContext {
            surface: &mut self.surface,
            source: &mut self.source,
            bracket: &self.bracket,
            settings: &self.settings,
        };
        let done = self.undo.redo(ctx)?;
        if done {
            tracing::info!(
                undo_depth = self.undo.undo_depth(),
                redo_depth = self.undo.redo_depth(),
                "redo"
            );
        }
        Ok(done)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn applier(&mut self) -> ChangeApplier<'_, S, T> {
        ChangeApplier::new(
            &mut self.surface,
            &mut self.source,
            &self.bracket,
            &self.settings.pattern,
        )
    }

    /// Apply `live -> candidate` and record `live` for undo.
    fn commit(
        &mut self,
        live: &GridModel,
        candidate: &GridModel,
    ) -> Result<CommandOutcome, SessionError> {
        let diff = live.diff(candidate, self.bracket.name());
        if diff.is_empty() {
            tracing::debug!("command left the grid unchanged");
            return Ok(CommandOutcome::default());
        }
        let deltas = self.applier().apply_diff(&diff)?;
        self.undo.set_undo_grid(live, deltas.clone());
        Ok(CommandOutcome::with_deltas(deltas))
    }
}

/// A session shared between threads.
///
/// Entry points are serialized by the lock; a panic inside one does not
/// poison the session for the next caller.
pub struct SessionHandle<S: Surface, T: SourceTable> {
    inner: Arc<Mutex<BracketSession<S, T>>>,
}

impl<S: Surface, T: SourceTable> Clone for SessionHandle<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Surface, T: SourceTable> fmt::Debug for SessionHandle<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl<S: Surface, T: SourceTable> SessionHandle<S, T> {
    #[must_use]
    pub fn new(session: BracketSession<S, T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `work` with exclusive access to the session.
    pub fn with_session<R>(&self, work: impl FnOnce(&mut BracketSession<S, T>) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        work(&mut guard)
    }
}
