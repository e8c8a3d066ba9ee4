#![forbid(unsafe_code)]

//! In-memory surface.
//!
//! Cells are stored sparsely; a cell that becomes blank is dropped. Every
//! mutating call is recorded in an operation log so tests can check phase
//! ordering, and a failure can be injected after a fixed number of
//! mutations.

use std::cell::Cell;
use std::collections::BTreeMap;

use bgrid_core::{AreaSnapshot, CellData, CellFormat, Region, RegionContent};
use bgrid_render::{CheckpointArena, CheckpointId, Surface, SurfaceError, SurfaceResult};

/// Prefix of [`MemorySurface::checksum`] values.
pub const CHECKSUM_PREFIX: &str = "blake3:";

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Write(Region),
    Clear(Region),
    ClearFormatting(Region),
    Bind(String),
    Unbind(String),
    Checkpoint(CheckpointId),
    Release(CheckpointId),
}

impl SurfaceOp {
    /// Whether the op takes content off the surface.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Clear(_) | Self::ClearFormatting(_) | Self::Unbind(_))
    }

    /// Whether the op puts content on the surface.
    #[must_use]
    pub fn is_addition(&self) -> bool {
        matches!(self, Self::Write(_) | Self::Bind(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    cells: BTreeMap<(u32, u32), CellData>,
    names: BTreeMap<String, Region>,
    checkpoints: CheckpointArena,
    log: Vec<SurfaceOp>,
    bounds: Option<Region>,
    budget: Option<usize>,
    reads: Cell<u64>,
}

impl MemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every access outside `bounds`.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Region) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Fail every mutation after the next `count`.
    pub fn fail_after(&mut self, count: usize) {
        self.budget = Some(count);
    }

    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> CellData {
        self.cells.get(&(row, column)).cloned().unwrap_or_default()
    }

    /// Edit a cell directly, the way a user typing into the host would.
    pub fn set_cell(&mut self, row: u32, column: u32, cell: CellData) {
        if cell.is_blank() {
            self.cells.remove(&(row, column));
        } else {
            self.cells.insert((row, column), cell);
        }
    }

    #[must_use]
    pub fn snapshot(&self, region: Region) -> AreaSnapshot {
        let cells = region.cells().map(|(row, column)| self.cell(row, column)).collect();
        AreaSnapshot::from_cells(region, cells).unwrap_or_else(|| AreaSnapshot::blank(region))
    }

    /// Bound names in order.
    pub fn names(&self) -> impl Iterator<Item = (&str, Region)> + '_ {
        self.names.iter().map(|(name, region)| (name.as_str(), *region))
    }

    /// Number of non-blank cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn log(&self) -> &[SurfaceOp] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.log)
    }

    /// Snapshot calls served so far.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    #[must_use]
    pub fn checkpoints(&self) -> &CheckpointArena {
        &self.checkpoints
    }

    /// Digest of every cell and binding.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for ((row, column), cell) in &self.cells {
            hasher.update(&row.to_le_bytes());
            hasher.update(&column.to_le_bytes());
            hasher.update(&cell.format.bits().to_le_bytes());
            hasher.update(cell.value.as_bytes());
            hasher.update(&[0]);
            if let Some(formula) = &cell.formula {
                hasher.update(formula.as_bytes());
            }
            hasher.update(&[0]);
        }
        for (name, region) in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(region.to_string().as_bytes());
        }
        format!("{CHECKSUM_PREFIX}{}", hasher.finalize().to_hex())
    }

    fn check_bounds(&self, region: Region) -> SurfaceResult<()> {
        match self.bounds {
            Some(bounds) if !bounds.contains(&region) => Err(SurfaceError::OutOfBounds { region }),
            _ => Ok(()),
        }
    }

    fn record(&mut self, op: SurfaceOp) -> SurfaceResult<()> {
        if let Some(budget) = self.budget.as_mut() {
            if *budget == 0 {
                tracing::debug!(?op, "injected surface failure");
                return Err(SurfaceError::Unavailable(format!("injected failure at {op:?}")));
            }
            *budget -= 1;
        }
        self.log.push(op);
        Ok(())
    }
}

impl Surface for MemorySurface {
    fn read_region_snapshot(&self, regions: &[Region]) -> SurfaceResult<Vec<AreaSnapshot>> {
        self.reads.set(self.reads.get() + 1);
        regions
            .iter()
            .map(|region| {
                self.check_bounds(*region)?;
                Ok(self.snapshot(*region))
            })
            .collect()
    }

    fn write_region_content(&mut self, region: Region, content: &RegionContent) -> SurfaceResult<()> {
        self.check_bounds(region)?;
        let source = content.region();
        if source.row_count != region.row_count || source.column_count != region.column_count {
            return Err(SurfaceError::ContentMismatch {
                region,
                expected: region.area(),
                actual: source.area(),
            });
        }
        self.record(SurfaceOp::Write(region))?;
        for (row, column) in region.cells() {
            let cell = content
                .cell(
                    source.row + (row - region.row),
                    source.column + (column - region.column),
                )
                .clone();
            self.set_cell(row, column, cell);
        }
        Ok(())
    }

    fn bind_name(&mut self, name: &str, region: Region) -> SurfaceResult<()> {
        self.check_bounds(region)?;
        if self.names.contains_key(name) {
            return Err(SurfaceError::NameInUse {
                name: name.to_string(),
            });
        }
        self.record(SurfaceOp::Bind(name.to_string()))?;
        self.names.insert(name.to_string(), region);
        Ok(())
    }

    fn unbind_name(&mut self, name: &str) -> SurfaceResult<()> {
        if !self.names.contains_key(name) {
            return Err(SurfaceError::UnknownName {
                name: name.to_string(),
            });
        }
        self.record(SurfaceOp::Unbind(name.to_string()))?;
        self.names.remove(name);
        Ok(())
    }

    fn lookup_name(&self, name: &str) -> SurfaceResult<Option<Region>> {
        Ok(self.names.get(name).copied())
    }

    fn names_with_prefix(&self, prefix: &str) -> SurfaceResult<Vec<(String, Region)>> {
        Ok(self
            .names
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, region)| (name.clone(), *region))
            .collect())
    }

    fn clear_region(&mut self, region: Region) -> SurfaceResult<()> {
        self.check_bounds(region)?;
        self.record(SurfaceOp::Clear(region))?;
        self.cells
            .retain(|(row, column), _| !region.contains_cell(*row, *column));
        Ok(())
    }

    fn clear_formatting(&mut self, region: Region) -> SurfaceResult<()> {
        self.check_bounds(region)?;
        self.record(SurfaceOp::ClearFormatting(region))?;
        for key in region.cells() {
            let blank = match self.cells.get_mut(&key) {
                Some(cell) => {
                    cell.format = CellFormat::empty();
                    cell.is_blank()
                }
                None => false,
            };
            if blank {
                self.cells.remove(&key);
            }
        }
        Ok(())
    }

    fn checkpoint(&mut self, label: &str) -> SurfaceResult<CheckpointId> {
        let id = self.checkpoints.open(label);
        self.log.push(SurfaceOp::Checkpoint(id));
        Ok(id)
    }

    fn release_checkpoint(&mut self, id: CheckpointId) -> SurfaceResult<()> {
        self.checkpoints.release(id);
        self.log.push(SurfaceOp::Release(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_cell_by_cell() {
        let mut surface = MemorySurface::new();
        let region = Region::new(2, 1, 3, 2);
        let mut content = AreaSnapshot::blank(Region::new(0, 1, 0, 2));
        *content.cell_mut(0, 1).unwrap() = CellData::text("Eagles", CellFormat::TEAM_NAME);
        surface.write_region_content(region, &content).unwrap();
        assert_eq!(surface.cell(2, 4).value, "Eagles");
        assert_eq!(surface.occupied(), 1);
    }

    #[test]
    fn mismatched_content_is_rejected() {
        let mut surface = MemorySurface::new();
        let content = AreaSnapshot::blank(Region::new(0, 2, 0, 2));
        let result = surface.write_region_content(Region::new(0, 1, 0, 2), &content);
        assert!(matches!(result, Err(SurfaceError::ContentMismatch { expected: 2, actual: 4, .. })));
    }

    #[test]
    fn clear_formatting_keeps_values() {
        let mut surface = MemorySurface::new();
        surface.set_cell(1, 1, CellData::text("x", CellFormat::CONNECTOR));
        surface.set_cell(1, 2, CellData::styled(CellFormat::CONNECTOR));
        surface.clear_formatting(Region::new(1, 1, 1, 2)).unwrap();
        assert_eq!(surface.cell(1, 1).value, "x");
        assert!(surface.cell(1, 1).format.is_empty());
        assert_eq!(surface.occupied(), 1);
    }

    #[test]
    fn names_are_unique_and_prefix_scoped() {
        let mut surface = MemorySurface::new();
        surface.bind_name("Main_G1_T", Region::cell(0, 3)).unwrap();
        surface.bind_name("Main_G1_B", Region::cell(6, 3)).unwrap();
        surface.bind_name("Other_G1_T", Region::cell(0, 9)).unwrap();
        assert!(matches!(
            surface.bind_name("Main_G1_T", Region::cell(1, 1)),
            Err(SurfaceError::NameInUse { .. })
        ));
        let names = surface.names_with_prefix("Main_G").unwrap();
        assert_eq!(names.len(), 2);
        assert!(matches!(surface.unbind_name("Main_G9_T"), Err(SurfaceError::UnknownName { .. })));
    }

    #[test]
    fn bounds_are_enforced() {
        let mut surface = MemorySurface::new().with_bounds(Region::new(0, 10, 0, 10));
        assert!(surface.clear_region(Region::new(8, 4, 0, 1)).is_err());
        assert!(surface.read_region_snapshot(&[Region::new(0, 10, 0, 10)]).is_ok());
    }

    #[test]
    fn injected_failure_stops_mutations() {
        let mut surface = MemorySurface::new();
        surface.fail_after(1);
        surface.clear_region(Region::cell(0, 0)).unwrap();
        assert!(matches!(
            surface.clear_region(Region::cell(0, 0)),
            Err(SurfaceError::Unavailable(_))
        ));
        assert_eq!(surface.log().len(), 1);
    }

    #[test]
    fn checksum_tracks_content() {
        let mut surface = MemorySurface::new();
        let empty = surface.checksum();
        assert!(empty.starts_with(CHECKSUM_PREFIX));
        surface.set_cell(0, 0, CellData::styled(CellFormat::THIN));
        assert_ne!(surface.checksum(), empty);
        surface.set_cell(0, 0, CellData::default());
        assert_eq!(surface.checksum(), empty);
    }
}
