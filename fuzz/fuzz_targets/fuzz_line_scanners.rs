#![no_main]

use arbitrary::Arbitrary;
use bgrid_core::{AreaSnapshot, CellData, CellFormat, Region};
use bgrid_layout::{get_feeding_line_region, get_outgoing_line_region};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    origin_row: u8,
    origin_column: u8,
    rows: u8,
    columns: u8,
    /// Format bits and a value flag per cell, row-major.
    cells: Vec<(u16, bool)>,
    start_row: u8,
    start_column: u8,
    is_top_team: bool,
}

fuzz_target!(|input: Input| {
    let rows = u32::from(input.rows % 24) + 1;
    let columns = u32::from(input.columns % 40) + 1;
    let region = Region::new(
        u32::from(input.origin_row),
        rows,
        u32::from(input.origin_column),
        columns,
    );
    let mut area = AreaSnapshot::blank(region);
    for ((row, column), (bits, has_value)) in region.cells().zip(input.cells.iter().copied()) {
        let format = CellFormat::from_bits_truncate(bits);
        let cell = if has_value {
            CellData::text("x", format)
        } else {
            CellData::styled(format)
        };
        if let Some(slot) = area.cell_mut(row, column) {
            *slot = cell;
        }
    }

    // Starting cells may sit anywhere, including outside the snapshot.
    let start = Region::cell(u32::from(input.start_row), u32::from(input.start_column));

    if let Some(span) = get_outgoing_line_region(&area, start) {
        assert_eq!(span.row, start.row, "outgoing span left its row");
        assert_eq!(span.row_count, 1);
        assert_eq!(span.column, start.column + 1, "outgoing span detached");
        assert!(region.contains(&span), "outgoing span outside the snapshot");
        assert!(span.column_count >= 2, "outgoing span shorter than two columns");
        assert!(
            area.format(span.row, span.last_column())
                .contains(CellFormat::CONNECTOR | CellFormat::THIN),
            "outgoing span must end on a thin line cell"
        );
    }

    if let Some(span) = get_feeding_line_region(&area, start, input.is_top_team) {
        assert_eq!(span.row, start.row, "feeding span left its row");
        assert_eq!(span.row_count, 1);
        assert_eq!(span.last_column() + 1, start.column, "feeding span detached");
        assert!(region.contains(&span), "feeding span outside the snapshot");
        for column in span.column..=span.last_column() {
            assert!(area.format(span.row, column).contains(CellFormat::CONNECTOR));
        }
    }
});
