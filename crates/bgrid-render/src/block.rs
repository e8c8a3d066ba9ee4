#![forbid(unsafe_code)]

//! Cell content of game blocks and connector lines.
//!
//! A block is drawn as two team names joined by a bracket line that runs
//! down the day's thin column and leaves on the output row:
//!
//! ```text
//!   Eagles      ·  │            top team      (binding _T)
//!   ───────────────┐            top line row
//!                  │
//!   Game 3         ├───         output row    (binding _N)
//!   Field #1       │            info rows
//!   Sat 09:00      │
//!   W: Game 5      │
//!   ───────────────┘            bottom line row
//!   Hawks       ·               bottom team   (binding _B)
//! ```

use std::fmt;

use bgrid_core::{
    AreaSnapshot, Bracket, CellData, CellFormat, GameDef, GameId, Region, RegionContent, Slot,
};
use bgrid_layout::{BlockGeometry, GameInfoRange, GridItem, GridPattern, displayed_slot};
use chrono::NaiveDateTime;

/// Which editable cell a named binding tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingPart {
    TopTeam,
    BottomTeam,
    GameNumber,
}

impl BindingPart {
    pub const ALL: [Self; 3] = [Self::TopTeam, Self::BottomTeam, Self::GameNumber];

    #[must_use]
    pub const fn suffix(self) -> char {
        match self {
            Self::TopTeam => 'T',
            Self::BottomTeam => 'B',
            Self::GameNumber => 'N',
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "T" => Some(Self::TopTeam),
            "B" => Some(Self::BottomTeam),
            "N" => Some(Self::GameNumber),
            _ => None,
        }
    }

    /// The bound cell of a block.
    #[must_use]
    pub fn cell(self, geometry: &BlockGeometry) -> Region {
        match self {
            Self::TopTeam => geometry.team_cell(Slot::Top),
            Self::BottomTeam => geometry.team_cell(Slot::Bottom),
            Self::GameNumber => geometry.game_number_cell(),
        }
    }
}

/// Prefix shared by every binding of a bracket.
#[must_use]
pub fn binding_prefix(bracket_name: &str) -> String {
    format!("{bracket_name}_G")
}

/// `{bracket}_G{n}_{T|B|N}`.
#[must_use]
pub fn binding_name(bracket_name: &str, game: GameId, part: BindingPart) -> String {
    format!("{bracket_name}_G{}_{}", game.get(), part.suffix())
}

/// Inverse of [`binding_name`] for one bracket.
#[must_use]
pub fn parse_binding_name(bracket_name: &str, name: &str) -> Option<(GameId, BindingPart)> {
    let rest = name.strip_prefix(&binding_prefix(bracket_name))?;
    let (number, suffix) = rest.rsplit_once('_')?;
    let number: u32 = number.parse().ok().filter(|n| *n > 0)?;
    Some((GameId::new(number), BindingPart::from_suffix(suffix)?))
}

/// Text shown inside a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockText {
    pub top_team: String,
    pub bottom_team: String,
    pub field: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    /// Where the winner and loser go, already formatted.
    pub advance_to: Option<String>,
}

/// Advance-to line of a game, `None` for the final.
#[must_use]
pub fn advance_text(bracket: &Bracket, game: GameId) -> Option<String> {
    let parts: Vec<String> = [
        bracket.winner_to(game).map(|advance| format!("W: {}", advance.game)),
        bracket.loser_to(game).map(|advance| format!("L: {}", advance.game)),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join("  "))
}

struct TimeLabel(NaiveDateTime);

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%a %H:%M"))
    }
}

const LINE_CELL: CellFormat = CellFormat::THIN.union(CellFormat::VERTICAL);
const LINE_CORNER: CellFormat = LINE_CELL.union(CellFormat::CONNECTOR);

/// Full content of a game block.
#[must_use]
pub fn render_block(item: &GridItem, game: &GameDef, text: &BlockText) -> RegionContent {
    let geometry = BlockGeometry::new(item.region);
    let mut content = AreaSnapshot::blank(item.region);
    let team = geometry.team_column();
    let score = geometry.score_column();
    let line = geometry.line_column();

    let mut put = |row: u32, column: u32, cell: CellData| {
        if let Some(slot) = content.cell_mut(row, column) {
            *slot = cell;
        }
    };

    // Bracket line down the thin column.
    for row in geometry.top_line_row()..=geometry.bottom_line_row() {
        put(row, line, CellData::styled(LINE_CELL));
    }
    put(geometry.top_team_row(), line, CellData::styled(CellFormat::THIN));
    put(geometry.bottom_team_row(), line, CellData::styled(CellFormat::THIN));
    for row in [geometry.top_line_row(), geometry.bottom_line_row(), geometry.output_row()] {
        put(row, line, CellData::styled(LINE_CORNER));
    }
    for row in [geometry.top_line_row(), geometry.bottom_line_row()] {
        put(row, team, CellData::styled(CellFormat::CONNECTOR));
        put(row, score, CellData::styled(CellFormat::CONNECTOR));
    }

    // Team names, each under its displayed slot.
    for slot in [Slot::Top, Slot::Bottom] {
        let source = game.source(slot);
        let name = match slot {
            Slot::Top => &text.top_team,
            Slot::Bottom => &text.bottom_team,
        };
        let cell = geometry.team_cell(displayed_slot(slot, item.swap_top_bottom));
        put(
            cell.row,
            cell.column,
            CellData::formula(name.clone(), format!("={}", source.tag()), CellFormat::TEAM_NAME),
        );
        put(cell.row, score, CellData::styled(CellFormat::SCORE));
    }

    let mut number_format = CellFormat::GAME_NUMBER;
    if item.swap_top_bottom {
        number_format |= CellFormat::SWAPPED;
    }
    let number = geometry.game_number_cell();
    put(
        number.row,
        number.column,
        CellData::formula(game.id.to_string(), format!("=GAME({})", game.id.get()), number_format),
    );

    if let Some(info) = GameInfoRange::for_block(&item.region) {
        for (row, value) in info_lines(&info, text) {
            put(row, team, CellData::text(value, CellFormat::GAME_INFO));
            put(row, score, CellData::styled(CellFormat::GAME_INFO));
        }
    }
    content
}

fn info_lines(info: &GameInfoRange, text: &BlockText) -> Vec<(u32, String)> {
    let field = text.field.clone().unwrap_or_default();
    let time = text
        .start_time
        .map(|time| TimeLabel(time).to_string())
        .unwrap_or_default();
    let mut lines = Vec::with_capacity(3);
    match info.field_row() {
        Some(row) => {
            lines.push((row, field));
            lines.push((info.time_row(), time));
        }
        None => {
            let joined = match (field.is_empty(), time.is_empty()) {
                (false, false) => format!("{field} {time}"),
                (false, true) => field,
                _ => time,
            };
            lines.push((info.time_row(), joined));
        }
    }
    if let (Some(row), Some(advance)) = (info.advance_row(), &text.advance_to) {
        lines.push((row, advance.clone()));
    }
    lines
}

/// Content of a connector line: connector marks, thin on line columns.
#[must_use]
pub fn render_connector(region: Region, pattern: &GridPattern) -> RegionContent {
    let mut content = AreaSnapshot::blank(region);
    for (row, column) in region.cells() {
        let mut format = CellFormat::CONNECTOR;
        if pattern.is_line_column(column) {
            format |= CellFormat::THIN;
        }
        if let Some(cell) = content.cell_mut(row, column) {
            cell.format = format;
        }
    }
    content
}
