#![forbid(unsafe_code)]

//! Cell content snapshots.
//!
//! The surface is read in bulk: one [`AreaSnapshot`] per requested region,
//! holding every cell's value, formula, and formatting marks. Scanners work
//! on snapshots only, so a full re-layout costs one round trip instead of
//! one per cell.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Region;

bitflags! {
    /// Formatting marks the bracket engine reads back from the surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CellFormat: u16 {
        /// Horizontal line through the cell.
        const CONNECTOR   = 1 << 0;
        /// Cell sits in a narrow line column.
        const THIN        = 1 << 1;
        /// Vertical line down the cell.
        const VERTICAL    = 1 << 2;
        const TEAM_NAME   = 1 << 3;
        const SCORE       = 1 << 4;
        const GAME_NUMBER = 1 << 5;
        const GAME_INFO   = 1 << 6;
        /// Set on a game-number cell whose game shows its sources swapped.
        const SWAPPED     = 1 << 7;
    }
}

/// One cell's content and formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellData {
    /// Displayed value.
    pub value: String,
    /// Formula, if the value is computed.
    pub formula: Option<String>,
    pub format: CellFormat,
}

impl CellData {
    /// A blank cell carrying only formatting.
    #[must_use]
    pub fn styled(format: CellFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// A literal text cell.
    #[must_use]
    pub fn text(value: impl Into<String>, format: CellFormat) -> Self {
        Self {
            value: value.into(),
            formula: None,
            format,
        }
    }

    /// A computed cell.
    #[must_use]
    pub fn formula(value: impl Into<String>, formula: impl Into<String>, format: CellFormat) -> Self {
        Self {
            value: value.into(),
            formula: Some(formula.into()),
            format,
        }
    }

    /// The cell shows something.
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// A non-empty value typed over the computed content.
    #[inline]
    #[must_use]
    pub fn is_literal_override(&self) -> bool {
        self.formula.is_none() && self.has_value()
    }

    /// Nothing to show and no formatting.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.has_value() && self.formula.is_none() && self.format.is_empty()
    }
}

static BLANK: CellData = CellData {
    value: String::new(),
    formula: None,
    format: CellFormat::empty(),
};

/// Dense, row-major copy of a rectangular area of the surface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AreaSnapshot {
    region: Region,
    cells: Vec<CellData>,
}

impl AreaSnapshot {
    /// A snapshot with every cell blank.
    #[must_use]
    pub fn blank(region: Region) -> Self {
        Self {
            region,
            cells: vec![CellData::default(); region.area() as usize],
        }
    }

    /// Wrap existing cells; returns `None` when the cell count does not match
    /// the region.
    #[must_use]
    pub fn from_cells(region: Region, cells: Vec<CellData>) -> Option<Self> {
        (cells.len() as u64 == region.area()).then_some(Self { region, cells })
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    fn index(&self, row: u32, column: u32) -> Option<usize> {
        self.region.contains_cell(row, column).then(|| {
            (row - self.region.row) as usize * self.region.column_count as usize
                + (column - self.region.column) as usize
        })
    }

    /// Cell at an absolute position. Positions outside the area read blank.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> &CellData {
        self.index(row, column)
            .and_then(|index| self.cells.get(index))
            .unwrap_or(&BLANK)
    }

    /// Formatting at an absolute position.
    #[inline]
    #[must_use]
    pub fn format(&self, row: u32, column: u32) -> CellFormat {
        self.cell(row, column).format
    }

    /// Whether the cell at an absolute position shows a value.
    #[inline]
    #[must_use]
    pub fn has_value(&self, row: u32, column: u32) -> bool {
        self.cell(row, column).has_value()
    }

    /// Mutable cell access; `None` outside the area.
    pub fn cell_mut(&mut self, row: u32, column: u32) -> Option<&mut CellData> {
        let index = self.index(row, column)?;
        self.cells.get_mut(index)
    }

    /// Copy out the cells of a sub-region.
    #[must_use]
    pub fn sub_snapshot(&self, region: Region) -> AreaSnapshot {
        let cells = region
            .cells()
            .map(|(row, column)| self.cell(row, column).clone())
            .collect();
        AreaSnapshot { region, cells }
    }

    /// Iterate `(row, column, cell)` row-major.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellData)> + '_ {
        self.region
            .cells()
            .zip(self.cells.iter())
            .map(|((row, column), cell)| (row, column, cell))
    }
}

/// Content for a region write. Every cell of the region is replaced.
pub type RegionContent = AreaSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_area_reads_blank() {
        let snapshot = AreaSnapshot::blank(Region::new(2, 2, 2, 2));
        assert!(snapshot.cell(0, 0).is_blank());
        assert!(snapshot.cell(100, 100).is_blank());
    }

    #[test]
    fn cell_mut_writes_in_place() {
        let mut snapshot = AreaSnapshot::blank(Region::new(2, 2, 2, 2));
        *snapshot.cell_mut(3, 3).unwrap() = CellData::text("Eagles", CellFormat::TEAM_NAME);
        assert_eq!(snapshot.cell(3, 3).value, "Eagles");
        assert!(snapshot.has_value(3, 3));
        assert!(!snapshot.has_value(2, 2));
        assert!(snapshot.cell_mut(4, 4).is_none());
    }

    #[test]
    fn literal_override_needs_value_without_formula() {
        assert!(CellData::text("Hawks", CellFormat::empty()).is_literal_override());
        assert!(!CellData::formula("Hawks", "=T1", CellFormat::empty()).is_literal_override());
        assert!(!CellData::text("  ", CellFormat::empty()).is_literal_override());
    }

    #[test]
    fn from_cells_checks_size() {
        assert!(AreaSnapshot::from_cells(Region::new(0, 2, 0, 2), vec![CellData::default(); 3]).is_none());
        assert!(AreaSnapshot::from_cells(Region::new(0, 2, 0, 2), vec![CellData::default(); 4]).is_some());
    }

    #[test]
    fn sub_snapshot_copies_cells() {
        let mut snapshot = AreaSnapshot::blank(Region::new(0, 4, 0, 4));
        snapshot.cell_mut(1, 1).unwrap().format = CellFormat::CONNECTOR;
        let sub = snapshot.sub_snapshot(Region::new(1, 1, 0, 3));
        assert_eq!(sub.format(1, 1), CellFormat::CONNECTOR);
        assert_eq!(sub.format(1, 0), CellFormat::empty());
    }
}
