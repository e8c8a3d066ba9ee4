#![forbid(unsafe_code)]

//! Boundary between the bracket engine and the host it draws on.
//!
//! The engine never holds host objects across calls. Everything it needs is
//! expressed through two traits: [`Surface`] for the cell grid and its named
//! bindings, and [`SourceTable`] for the durable per-game and per-team data
//! that survives layout changes. Both are synchronous: an adapter for a host
//! with asynchronous round trips blocks inside each call.

use bgrid_core::{AreaSnapshot, GameId, Region, RegionContent, TeamId};
use thiserror::Error;

use crate::checkpoint::CheckpointId;
use crate::source::GameRecord;

/// Failure reported by a surface or source-table adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("surface unavailable: {0}")]
    Unavailable(String),

    #[error("region {region} is outside the surface")]
    OutOfBounds { region: Region },

    #[error("content for {region} has {actual} cells, expected {expected}")]
    ContentMismatch {
        region: Region,
        expected: u64,
        actual: u64,
    },

    #[error("name {name:?} is already bound")]
    NameInUse { name: String },

    #[error("name {name:?} is not bound")]
    UnknownName { name: String },

    #[error("source table: {0}")]
    Source(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// The presentation surface: a grid of cells plus named cell bindings.
pub trait Surface {
    /// Read several regions in one round trip, in request order.
    fn read_region_snapshot(&self, regions: &[Region]) -> SurfaceResult<Vec<AreaSnapshot>>;

    /// Replace every cell of `region`.
    fn write_region_content(&mut self, region: Region, content: &RegionContent) -> SurfaceResult<()>;

    /// Attach a name to a region so the host can track edits to it.
    fn bind_name(&mut self, name: &str, region: Region) -> SurfaceResult<()>;

    fn unbind_name(&mut self, name: &str) -> SurfaceResult<()>;

    /// Current region of a bound name.
    fn lookup_name(&self, name: &str) -> SurfaceResult<Option<Region>>;

    /// Every bound name starting with `prefix`, with its region.
    fn names_with_prefix(&self, prefix: &str) -> SurfaceResult<Vec<(String, Region)>>;

    /// Clear values, formulas, and formatting.
    fn clear_region(&mut self, region: Region) -> SurfaceResult<()>;

    /// Clear formatting only.
    fn clear_formatting(&mut self, region: Region) -> SurfaceResult<()>;

    /// Open a scope for host-side objects created by the following calls.
    fn checkpoint(&mut self, _label: &str) -> SurfaceResult<CheckpointId> {
        Ok(CheckpointId::NONE)
    }

    /// Release everything created since `checkpoint`.
    fn release_checkpoint(&mut self, _id: CheckpointId) -> SurfaceResult<()> {
        Ok(())
    }
}

/// Durable per-game and per-team data, independent of placement.
pub trait SourceTable {
    fn read_game(&self, game: GameId) -> SurfaceResult<GameRecord>;

    fn write_game(&mut self, game: GameId, record: &GameRecord) -> SurfaceResult<()>;

    fn read_team(&self, team: TeamId) -> SurfaceResult<Option<String>>;

    fn write_team(&mut self, team: TeamId, name: &str) -> SurfaceResult<()>;
}
