#![forbid(unsafe_code)]

//! Sessions, undo/redo, and configuration for bracketgrid.
//!
//! # Role in bracketgrid
//! `bgrid-runtime` ties the pure layout rules and the surface boundary into
//! commands a host can dispatch. A [`BracketSession`] is the explicit context
//! every entry point runs against; nothing lives in global state.
//!
//! # How it fits in the system
//! A command rebuilds the live grid with `bgrid_render::build_from_surface`,
//! asks `bgrid-layout` for a candidate, applies the diff with
//! `bgrid_render::ChangeApplier`, and records the live grid in the
//! [`UndoManager`].
//!
//! # Feature flags
//! - `subscriber`: [`logging::init_tracing`] for hosts without their own
//!   tracing subscriber.

pub mod config;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod session;
pub mod undo;

pub use config::{BracketConfig, ConfigError};
pub use session::{BracketSession, CommandOutcome, SessionError, SessionHandle};
pub use undo::{UndoConfig, UndoContext, UndoError, UndoItem, UndoManager};
