#![forbid(unsafe_code)]

//! Core: geometry, identities, bracket definitions, and cell snapshots.
//!
//! # Role in bracketgrid
//! `bgrid-core` holds the vocabulary every other crate speaks. It has no
//! knowledge of the grid layout rules or of the surface the bracket is drawn
//! on.
//!
//! # Primary responsibilities
//! - **Region**: rectangles of sheet cells and their overlap classification.
//! - **GameId / SlotSource**: stable game identity and typed team sources.
//! - **Bracket**: validated tournament definitions (JSON or generated).
//! - **AreaSnapshot**: batched cell content used by the line scanners.

pub mod bracket;
pub mod cell;
pub mod error;
pub mod geometry;
pub mod ids;

pub use bracket::{Advance, Bracket, GameDef, Outcome, Slot};
pub use cell::{AreaSnapshot, CellData, CellFormat, RegionContent};
pub use error::BracketError;
pub use geometry::{OverlapKind, Region};
pub use ids::{GameId, SlotSource, TeamId};
