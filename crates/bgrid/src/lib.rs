#![forbid(unsafe_code)]

//! bracketgrid public facade crate.
//!
//! Re-exports the stable surface of the internal crates and offers a
//! prelude for hosts embedding a bracket editor.
//!
//! ```rust,ignore
//! use bgrid::prelude::*;
//!
//! let bracket = Bracket::single_elimination("Main", 8)?;
//! let mut session = BracketSession::new(surface, table, bracket, BracketConfig::default())?;
//! session.add_game(GameId::new(1), Region::new(0, 11, 3, 3))?;
//! session.undo()?;
//! ```

// --- Core re-exports -------------------------------------------------------

pub use bgrid_core::{
    AreaSnapshot, Bracket, BracketError, CellData, CellFormat, GameDef, GameId, OverlapKind,
    Region, RegionContent, Slot, SlotSource, TeamId,
};

// --- Layout re-exports -----------------------------------------------------

pub use bgrid_layout::{
    ChangeOp, GameMover, GridChange, GridDiff, GridItem, GridModel, GridPattern, GridSettings,
    MoveOutcome, MoveWarning, PlacementFailure, ScheduleConfig, get_feeding_line_region,
    get_outgoing_line_region,
};

// --- Render re-exports -----------------------------------------------------

pub use bgrid_render::{
    ApplyError, ChangeApplier, GameDataDelta, GameRecord, SourceTable, Surface, SurfaceError,
    SurfaceResult, ValueChange, build_from_surface,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use bgrid_runtime::{
    BracketConfig, BracketSession, CommandOutcome, ConfigError, SessionError, SessionHandle,
    UndoConfig, UndoError, UndoManager,
};

// --- Errors ---------------------------------------------------------------

/// Any failure a bracketgrid call can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Bracket(#[from] BracketError),

    #[error(transparent)]
    Placement(#[from] PlacementFailure),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Session(#[from] SessionError),

    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Undo(#[from] UndoError),

    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for bracketgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bracket, Error, GameId, GridItem, GridModel, Region, Result, SlotSource, SourceTable,
        Surface, TeamId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{BracketConfig, BracketSession, CommandOutcome, SessionHandle};

    pub use crate::{core, layout, render};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use bgrid_core as core;
pub use bgrid_layout as layout;
pub use bgrid_render as render;
#[cfg(feature = "runtime")]
pub use bgrid_runtime as runtime;
