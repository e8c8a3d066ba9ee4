#![forbid(unsafe_code)]

//! Recover connector lines from surface formatting.
//!
//! Connector lines have no stored identity. They are found by walking a row
//! of an [`AreaSnapshot`] cell by cell, following `CONNECTOR` marks until the
//! line runs into a team name or stops being drawn. Both scanners are pure
//! and never read outside the snapshot.

use bgrid_core::{AreaSnapshot, CellFormat, Region};

/// Span of the line feeding a block's incoming line cell.
///
/// `line_region` is the block's team-column cell on a line row. The scan
/// walks left from the column before it while the line row carries a
/// connector and the team-name row (above for the top team, below for the
/// bottom) is empty. The last thin column reached is the feeder's own output
/// cell, so the span starts just right of it.
#[must_use]
pub fn get_feeding_line_region(
    area: &AreaSnapshot,
    line_region: Region,
    is_top_team: bool,
) -> Option<Region> {
    let row = line_region.row;
    let name_row = if is_top_team {
        row.checked_sub(1)
    } else {
        row.checked_add(1)
    };
    let lower_bound = area.region().column;

    let mut leftmost = None;
    let mut last_thin = None;
    let mut column = line_region.column;
    while column > lower_bound {
        column -= 1;
        let format = area.format(row, column);
        let name_clear = name_row.is_none_or(|name_row| !area.has_value(name_row, column));
        if !format.contains(CellFormat::CONNECTOR) || !name_clear {
            break;
        }
        leftmost = Some(column);
        if format.contains(CellFormat::THIN) {
            last_thin = Some(column);
        }
    }

    let first = match last_thin {
        Some(thin) => thin + 1,
        None => leftmost?,
    };
    let last = line_region.column.checked_sub(1)?;
    (first <= last).then(|| Region::from_bounds(row, row, first, last))
}

/// Span of the line leaving a block's output cell.
///
/// The scan walks right from the column after `start_region` while cells
/// carry a connector and both neighbouring rows are empty. A thin column
/// closes a day, so the span ends at the last thin column seen; anything
/// after it belongs to the next block's underline. A line is at least two
/// columns wide.
#[must_use]
pub fn get_outgoing_line_region(area: &AreaSnapshot, start_region: Region) -> Option<Region> {
    let row = start_region.row;
    let first = start_region.column.checked_add(1)?;
    let end = area.region().end_column();

    let mut last_thin = None;
    let mut column = first;
    while column < end {
        let format = area.format(row, column);
        let above_clear = row
            .checked_sub(1)
            .is_none_or(|above| !area.has_value(above, column));
        let below_clear = !area.has_value(row + 1, column);
        if !format.contains(CellFormat::CONNECTOR) || !above_clear || !below_clear {
            break;
        }
        if format.contains(CellFormat::THIN) {
            last_thin = Some(column);
        }
        column += 1;
    }

    let last = last_thin?;
    (last > first).then(|| Region::from_bounds(row, row, first, last))
}
