#![forbid(unsafe_code)]

//! Bracket grid layout: placement rules, diffing, and line recovery.
//!
//! # Role in bracketgrid
//! `bgrid-layout` is the pure half of the pipeline. It decides where games
//! may go and what the grid should look like afterwards, and computes the
//! structural edits between two layouts. It never touches the surface; the
//! only surface-shaped input it reads is an [`bgrid_core::AreaSnapshot`]
//! handed to the line scanners.
//!
//! # Key types
//! - [`GridPattern`] / [`BlockGeometry`]: day columns and block rows.
//! - [`GridModel`]: ordered items with query, add, remove, and diff.
//! - [`GameMover`]: validated moves with orientation inference.
//! - [`GridDiff`]: removes and inserts, applied in that order downstream.

pub mod change;
pub mod error;
pub mod grid;
pub mod item;
pub mod line_locator;
pub mod mover;
pub mod pattern;
pub mod schedule;

pub use change::{ChangeOp, GridChange, GridDiff};
pub use error::PlacementFailure;
pub use grid::{GameInfoRange, GridModel, GridSettings};
pub use item::{GridItem, ItemKey, ItemKind};
pub use line_locator::{get_feeding_line_region, get_outgoing_line_region};
pub use mover::{GameMover, MoveOutcome, MoveWarning};
pub use pattern::{BlockGeometry, ColumnKind, GridPattern, displayed_slot};
pub use schedule::{LatestTime, ScheduleConfig, ScheduledSlot};
