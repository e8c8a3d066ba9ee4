#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// How two regions relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlapKind {
    /// No shared cell.
    #[default]
    None,
    /// Both regions cover exactly the same cells.
    Equal,
    /// The regions share cells but neither contains the other.
    Crosses,
    /// `self` fully contains the other region.
    Contains,
    /// `self` lies fully inside the other region.
    ContainedBy,
}

impl OverlapKind {
    /// True for every kind except [`OverlapKind::None`].
    #[inline]
    pub const fn overlaps(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A rectangle of grid cells.
///
/// Uses sheet coordinates (0-indexed, origin at top-left). A region with a
/// zero row or column count is empty and overlaps nothing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Region {
    /// First row (inclusive).
    pub row: u32,
    /// Number of rows.
    pub row_count: u32,
    /// First column (inclusive).
    pub column: u32,
    /// Number of columns.
    pub column_count: u32,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(row: u32, row_count: u32, column: u32, column_count: u32) -> Self {
        Self {
            row,
            row_count,
            column,
            column_count,
        }
    }

    /// A single-cell region.
    #[inline]
    pub const fn cell(row: u32, column: u32) -> Self {
        Self::new(row, 1, column, 1)
    }

    /// Region spanning the inclusive row and column ranges.
    ///
    /// Bounds are swapped when given in reverse order.
    pub fn from_bounds(first_row: u32, last_row: u32, first_column: u32, last_column: u32) -> Self {
        let (top, bottom) = (first_row.min(last_row), first_row.max(last_row));
        let (left, right) = (first_column.min(last_column), first_column.max(last_column));
        Self::new(top, bottom - top + 1, left, right - left + 1)
    }

    /// Last row (inclusive). Equal to `row` for empty regions.
    #[inline]
    pub const fn last_row(&self) -> u32 {
        self.row + self.row_count.saturating_sub(1)
    }

    /// Last column (inclusive). Equal to `column` for empty regions.
    #[inline]
    pub const fn last_column(&self) -> u32 {
        self.column + self.column_count.saturating_sub(1)
    }

    /// Row one past the end.
    #[inline]
    pub const fn end_row(&self) -> u32 {
        self.row.saturating_add(self.row_count)
    }

    /// Column one past the end.
    #[inline]
    pub const fn end_column(&self) -> u32 {
        self.column.saturating_add(self.column_count)
    }

    /// Number of cells.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.row_count as u64 * self.column_count as u64
    }

    /// Check if the region covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }

    /// Check if a cell is inside the region.
    #[inline]
    pub const fn contains_cell(&self, row: u32, column: u32) -> bool {
        row >= self.row && row < self.end_row() && column >= self.column && column < self.end_column()
    }

    /// Exact equality of position and size.
    #[inline]
    pub fn is_equal(&self, other: &Region) -> bool {
        self == other
    }

    /// Check whether `other` lies fully inside `self`.
    pub fn contains(&self, other: &Region) -> bool {
        !other.is_empty()
            && other.row >= self.row
            && other.end_row() <= self.end_row()
            && other.column >= self.column
            && other.end_column() <= self.end_column()
    }

    /// Compute the intersection with another region, returning `None` if no overlap.
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let row = self.row.max(other.row);
        let column = self.column.max(other.column);
        let end_row = self.end_row().min(other.end_row());
        let end_column = self.end_column().min(other.end_column());

        if row < end_row && column < end_column {
            Some(Region::new(row, end_row - row, column, end_column - column))
        } else {
            None
        }
    }

    /// Classify how `self` overlaps `other`.
    pub fn overlap_kind(&self, other: &Region) -> OverlapKind {
        if self.intersection(other).is_none() {
            return OverlapKind::None;
        }
        if self == other {
            OverlapKind::Equal
        } else if self.contains(other) {
            OverlapKind::Contains
        } else if other.contains(self) {
            OverlapKind::ContainedBy
        } else {
            OverlapKind::Crosses
        }
    }

    /// Smallest region covering both.
    ///
    /// Empty regions do not contribute to the result.
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let row = self.row.min(other.row);
        let column = self.column.min(other.column);
        let end_row = self.end_row().max(other.end_row());
        let end_column = self.end_column().max(other.end_column());
        Region::new(row, end_row - row, column, end_column - column)
    }

    /// Grow the region by `margin` cells on every side, clamped at the origin.
    pub fn expand(&self, margin: u32) -> Region {
        let row = self.row.saturating_sub(margin);
        let column = self.column.saturating_sub(margin);
        let end_row = self.end_row().saturating_add(margin);
        let end_column = self.end_column().saturating_add(margin);
        Region::new(row, end_row - row, column, end_column - column)
    }

    /// Same size, moved to a new origin.
    #[inline]
    pub const fn with_origin(&self, row: u32, column: u32) -> Region {
        Region::new(row, self.row_count, column, self.column_count)
    }

    /// Same origin with a different row count.
    #[inline]
    pub const fn with_row_count(&self, row_count: u32) -> Region {
        Region::new(self.row, row_count, self.column, self.column_count)
    }

    /// Same origin with a different column count.
    #[inline]
    pub const fn with_column_count(&self, column_count: u32) -> Region {
        Region::new(self.row, self.row_count, self.column, column_count)
    }

    /// Iterate the cells row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.row..self.end_row())
            .flat_map(move |row| (self.column..self.end_column()).map(move |col| (row, col)))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "R{}C{}:R{}C{}",
            self.row,
            self.column,
            self.last_row(),
            self.last_column()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlapKind, Region};

    #[test]
    fn region_contains_cell_edges() {
        let region = Region::new(2, 5, 3, 4);
        assert!(region.contains_cell(2, 3));
        assert!(region.contains_cell(6, 6));
        assert!(!region.contains_cell(7, 3));
        assert!(!region.contains_cell(2, 7));
    }

    #[test]
    fn overlap_kind_classifies_all_cases() {
        let base = Region::new(4, 11, 3, 3);
        assert_eq!(base.overlap_kind(&base), OverlapKind::Equal);
        assert_eq!(
            base.overlap_kind(&Region::new(5, 2, 4, 1)),
            OverlapKind::Contains
        );
        assert_eq!(
            Region::new(5, 2, 4, 1).overlap_kind(&base),
            OverlapKind::ContainedBy
        );
        assert_eq!(
            base.overlap_kind(&Region::new(10, 11, 5, 3)),
            OverlapKind::Crosses
        );
        assert_eq!(
            base.overlap_kind(&Region::new(15, 3, 3, 3)),
            OverlapKind::None
        );
    }

    #[test]
    fn adjacent_regions_do_not_overlap() {
        let left = Region::new(0, 5, 0, 3);
        let right = Region::new(0, 5, 3, 3);
        assert_eq!(left.overlap_kind(&right), OverlapKind::None);
        assert!(!left.overlap_kind(&right).overlaps());
    }

    #[test]
    fn empty_region_overlaps_nothing() {
        let empty = Region::new(3, 0, 3, 3);
        assert_eq!(
            empty.overlap_kind(&Region::new(0, 10, 0, 10)),
            OverlapKind::None
        );
    }

    #[test]
    fn union_and_expand() {
        let a = Region::new(4, 11, 3, 3);
        let b = Region::new(9, 1, 6, 6);
        assert_eq!(a.union(&b), Region::new(4, 11, 3, 9));
        assert_eq!(a.expand(2), Region::new(2, 15, 1, 7));
        assert_eq!(Region::new(0, 1, 1, 1).expand(3), Region::new(0, 4, 0, 5));
        assert_eq!(Region::default().union(&a), a);
    }

    #[test]
    fn from_bounds_normalizes_order() {
        assert_eq!(Region::from_bounds(14, 4, 5, 3), Region::new(4, 11, 3, 3));
    }

    #[test]
    fn cells_iterates_row_major() {
        let cells: Vec<_> = Region::new(1, 2, 5, 2).cells().collect();
        assert_eq!(cells, vec![(1, 5), (1, 6), (2, 5), (2, 6)]);
    }
}
