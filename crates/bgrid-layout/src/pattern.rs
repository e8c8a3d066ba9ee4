#![forbid(unsafe_code)]

//! Column classification and game-block geometry.
//!
//! The sheet is divided into day triples. Starting at
//! [`GridPattern::first_day_column`], every three columns form one calendar
//! day: a wide team column, a score column, and a thin line column.
//!
//! ```text
//!  col:   3     4    5  6     7    8
//!        ┌─────┬───┬─┐┌─────┬───┬─┐
//!   r0   │Team1│   │ ││     │   │ │
//!   r0+1 │─────┼───┼┐││     │   │ │
//!        │     │   │││      ...
//!   o    │G 1  │   │├┼──────────── ...   output row
//!        │info │   │││
//!   r0+h-2─────┼───┼┘│
//!   r0+h-1Team4│   │ │
//!        └─────┴───┴─┘
//!          day 0        day 1
//! ```

use bgrid_core::{Region, Slot};
use serde::{Deserialize, Serialize};

/// Role of a column within the day pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Left of the first day.
    Margin,
    Team,
    Score,
    Line,
}

/// Tunable grid layout rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPattern {
    /// Team column of day 0.
    pub first_day_column: u32,
    /// Rows given to a game placed from a short selection.
    pub default_game_rows: u32,
    /// Smallest block that still has distinct line, number, and info rows.
    pub min_game_rows: u32,
}

impl Default for GridPattern {
    fn default() -> Self {
        Self {
            first_day_column: 3,
            default_game_rows: 11,
            min_game_rows: 7,
        }
    }
}

impl GridPattern {
    /// Number of columns in one day.
    pub const DAY_WIDTH: u32 = 3;

    /// Classify a column.
    #[must_use]
    pub fn classify(&self, column: u32) -> ColumnKind {
        match column.checked_sub(self.first_day_column) {
            None => ColumnKind::Margin,
            Some(offset) => match offset % Self::DAY_WIDTH {
                0 => ColumnKind::Team,
                1 => ColumnKind::Score,
                _ => ColumnKind::Line,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn is_line_column(&self, column: u32) -> bool {
        self.classify(column) == ColumnKind::Line
    }

    /// Day index of a column, `None` in the margin.
    #[must_use]
    pub fn day_index(&self, column: u32) -> Option<u32> {
        column
            .checked_sub(self.first_day_column)
            .map(|offset| offset / Self::DAY_WIDTH)
    }

    /// Team column of a day.
    #[must_use]
    pub fn team_column_for_day(&self, day: u32) -> u32 {
        self.first_day_column + day * Self::DAY_WIDTH
    }

    /// A block sits on a team column, spans one day, and is tall enough.
    #[must_use]
    pub fn is_aligned(&self, region: &Region) -> bool {
        self.classify(region.column) == ColumnKind::Team
            && region.column_count == Self::DAY_WIDTH
            && region.row_count >= self.min_game_rows
    }
}

/// Named rows and columns of a placed game block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    region: Region,
}

impl BlockGeometry {
    #[must_use]
    pub const fn new(region: Region) -> Self {
        Self { region }
    }

    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    #[must_use]
    pub const fn team_column(&self) -> u32 {
        self.region.column
    }

    #[must_use]
    pub const fn score_column(&self) -> u32 {
        self.region.column + 1
    }

    #[must_use]
    pub const fn line_column(&self) -> u32 {
        self.region.column + 2
    }

    #[must_use]
    pub const fn top_team_row(&self) -> u32 {
        self.region.row
    }

    #[must_use]
    pub const fn top_line_row(&self) -> u32 {
        self.region.row + 1
    }

    #[must_use]
    pub const fn bottom_line_row(&self) -> u32 {
        self.region.last_row().saturating_sub(1)
    }

    #[must_use]
    pub const fn bottom_team_row(&self) -> u32 {
        self.region.last_row()
    }

    /// Row the winner line leaves the block on.
    #[must_use]
    pub const fn output_row(&self) -> u32 {
        self.region.row + self.region.row_count / 2
    }

    /// Cell the outgoing line starts from.
    #[must_use]
    pub const fn output_cell(&self) -> Region {
        Region::cell(self.output_row(), self.line_column())
    }

    #[must_use]
    pub const fn game_number_cell(&self) -> Region {
        Region::cell(self.output_row(), self.team_column())
    }

    /// Team-name cell of a displayed slot.
    #[must_use]
    pub const fn team_cell(&self, displayed: Slot) -> Region {
        match displayed {
            Slot::Top => Region::cell(self.top_team_row(), self.team_column()),
            Slot::Bottom => Region::cell(self.bottom_team_row(), self.team_column()),
        }
    }

    /// Row an incoming line meets for a displayed slot.
    #[must_use]
    pub const fn line_row(&self, displayed: Slot) -> u32 {
        match displayed {
            Slot::Top => self.top_line_row(),
            Slot::Bottom => self.bottom_line_row(),
        }
    }

    /// Cell an incoming line ends against.
    #[must_use]
    pub const fn incoming_line_cell(&self, displayed: Slot) -> Region {
        Region::cell(self.line_row(displayed), self.team_column())
    }
}

/// Displayed position of a source slot given the swap flag.
#[must_use]
pub const fn displayed_slot(slot: Slot, swap_top_bottom: bool) -> Slot {
    if swap_top_bottom { slot.other() } else { slot }
}
