#![forbid(unsafe_code)]

//! Test support for bracketgrid.
//!
//! An in-memory [`MemorySurface`] and [`MemorySourceTable`] stand in for the
//! host, and [`Workbench`] bundles them with a bracket so tests can place,
//! apply, and rebuild in a few lines.

pub mod fixtures;
pub mod source;
pub mod surface;

pub use fixtures::{
    BRACKET_NAME, DOUBLE_ELIMINATION_LAYOUT, FOUR_TEAM_LAYOUT, TEAM_NAMES, Workbench,
    double_elimination, single_elimination,
};
pub use source::MemorySourceTable;
pub use surface::{CHECKSUM_PREFIX, MemorySurface, SurfaceOp};
