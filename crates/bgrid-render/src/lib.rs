#![forbid(unsafe_code)]

//! Surface boundary: drawing blocks and applying grid diffs.
//!
//! # Role in bracketgrid
//! `bgrid-render` is where layouts meet the host. It defines the
//! [`Surface`] and [`SourceTable`] traits an adapter implements, renders
//! game blocks and connector lines into cell content, applies a
//! [`bgrid_layout::GridDiff`] in two phases, and rebuilds a
//! [`bgrid_layout::GridModel`] from what is bound on the surface.
//!
//! # Primary responsibilities
//! - **ChangeApplier**: removes first, then inserts, inside one checkpoint.
//! - **build_from_surface**: bindings to blocks, formatting to lines.
//! - **GameDataDelta**: source-table edits made by first-time defaults.
//! - **ScopedCheckpoint**: host-side object lifetimes tied to a scope.

pub mod applier;
pub mod block;
pub mod build;
pub mod checkpoint;
pub mod source;
pub mod surface;

pub use applier::{ApplyError, ChangeApplier};
pub use block::{
    BindingPart, BlockText, advance_text, binding_name, binding_prefix, parse_binding_name,
    render_block, render_connector,
};
pub use build::build_from_surface;
pub use checkpoint::{CheckpointArena, CheckpointId, ScopedCheckpoint};
pub use source::{GameDataDelta, GameRecord, ValueChange, apply_first_time_defaults};
pub use surface::{SourceTable, Surface, SurfaceError, SurfaceResult};
