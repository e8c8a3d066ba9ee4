#![forbid(unsafe_code)]

//! Rebuild a [`GridModel`] from what is bound on the surface.
//!
//! Blocks come only from complete, consistent name bindings. Connector
//! lines have no bindings and are recovered from cell formatting with the
//! line scanners. Anything that does not add up is left out and logged.

use std::collections::BTreeMap;
use std::sync::Arc;

use bgrid_core::{AreaSnapshot, Bracket, CellFormat, GameId, Region, Slot};
use bgrid_layout::{
    BlockGeometry, GridItem, GridModel, GridPattern, GridSettings, get_feeding_line_region,
    get_outgoing_line_region,
};

use crate::block::{BindingPart, binding_prefix, parse_binding_name};
use crate::surface::{SourceTable, Surface, SurfaceError, SurfaceResult};

#[derive(Debug, Default, Clone, Copy)]
struct Bindings {
    top: Option<Region>,
    bottom: Option<Region>,
    number: Option<Region>,
}

impl Bindings {
    fn set(&mut self, part: BindingPart, region: Region) {
        let slot = match part {
            BindingPart::TopTeam => &mut self.top,
            BindingPart::BottomTeam => &mut self.bottom,
            BindingPart::GameNumber => &mut self.number,
        };
        *slot = Some(region);
    }
}

/// Block covered by a game's bindings, or why the game is left out.
fn block_region(bindings: &Bindings, pattern: &GridPattern) -> Result<Region, &'static str> {
    let (Some(top), Some(bottom), Some(number)) = (bindings.top, bindings.bottom, bindings.number)
    else {
        return Err("incomplete bindings");
    };
    if top.column != bottom.column || top.row >= bottom.row {
        return Err("team bindings out of order");
    }
    let region = Region::from_bounds(top.row, bottom.row, top.column, top.column + 2);
    if !pattern.is_aligned(&region) {
        return Err("misaligned block");
    }
    if BlockGeometry::new(region).game_number_cell() != number {
        return Err("game number away from the output row");
    }
    Ok(region)
}

/// Reconstruct the grid of `bracket` from its bindings on `surface`.
///
/// Games with missing or inconsistent bindings, misaligned geometry, or ids
/// the bracket does not know are omitted. Orientation is read from the game
/// number cell; field and start time come from `source`.
pub fn build_from_surface<S, T>(
    surface: &S,
    source: &T,
    bracket: &Bracket,
    settings: Arc<GridSettings>,
) -> SurfaceResult<GridModel>
where
    S: Surface + ?Sized,
    T: SourceTable + ?Sized,
{
    let _span = tracing::debug_span!("surface.build", bracket = bracket.name()).entered();

    let mut bound: BTreeMap<GameId, Bindings> = BTreeMap::new();
    for (name, region) in surface.names_with_prefix(&binding_prefix(bracket.name()))? {
        match parse_binding_name(bracket.name(), &name) {
            Some((game, part)) => bound.entry(game).or_default().set(part, region),
            None => tracing::warn!(name = %name, "ignoring unrecognised binding"),
        }
    }

    let mut blocks: Vec<(GameId, Region)> = Vec::with_capacity(bound.len());
    for (game_id, bindings) in &bound {
        if bracket.game(*game_id).is_none() {
            tracing::warn!(game = game_id.get(), "omitting bound game unknown to the bracket");
            continue;
        }
        let region = match block_region(bindings, &settings.pattern) {
            Ok(region) => region,
            Err(reason) => {
                tracing::warn!(game = game_id.get(), reason, "omitting corrupt game");
                continue;
            }
        };
        if let Some((other, _)) = blocks
            .iter()
            .find(|(_, placed)| placed.overlap_kind(&region).overlaps())
        {
            tracing::warn!(
                game = game_id.get(),
                other = other.get(),
                %region,
                "omitting game overlapping another block"
            );
            continue;
        }
        blocks.push((*game_id, region));
    }

    let Some(bounds) = blocks
        .iter()
        .map(|(_, region)| *region)
        .reduce(|acc, region| acc.union(&region))
    else {
        return Ok(GridModel::new(settings));
    };
    let scan_area = Region::from_bounds(
        bounds.row.saturating_sub(1),
        bounds.last_row() + 1,
        0,
        bounds.last_column(),
    );
    let area = surface
        .read_region_snapshot(&[scan_area])?
        .into_iter()
        .next()
        .ok_or_else(|| SurfaceError::Unavailable("empty snapshot batch".into()))?;

    let mut items = Vec::with_capacity(blocks.len() * 2);
    for (game_id, region) in &blocks {
        let geometry = BlockGeometry::new(*region);
        let number = geometry.game_number_cell();
        let swap = area
            .format(number.row, number.column)
            .contains(CellFormat::SWAPPED);
        let record = source.read_game(*game_id)?;
        items.push(
            GridItem::game(*game_id, *region)
                .with_swap(swap)
                .with_schedule(record.field, record.start_time),
        );
    }

    let mut lines: Vec<GridItem> = Vec::new();
    for (game_id, region) in &blocks {
        let output = BlockGeometry::new(*region).output_cell();
        if let Some(span) = get_outgoing_line_region(&area, output)
            && clear_of_blocks(&blocks, &span)
        {
            lines.push(GridItem::connector(span, Some(*game_id)));
        }
    }
    for (game_id, region) in &blocks {
        for span in orphan_lines(&area, &blocks, &lines, region) {
            tracing::warn!(game = game_id.get(), %span, "recovered orphan line");
            lines.push(GridItem::connector(span, None));
        }
    }
    items.extend(lines);

    let mut grid = GridModel::from_items(settings, items);
    grid.refresh_connections();
    tracing::debug!(
        games = blocks.len(),
        items = grid.len(),
        omitted = bound.len() - blocks.len(),
        "grid rebuilt from surface"
    );
    Ok(grid)
}

fn clear_of_blocks(blocks: &[(GameId, Region)], span: &Region) -> bool {
    !blocks
        .iter()
        .any(|(_, region)| region.overlap_kind(span).overlaps())
}

/// Lines drawn into a block's incoming rows that no recovered item feeds.
fn orphan_lines(
    area: &AreaSnapshot,
    blocks: &[(GameId, Region)],
    lines: &[GridItem],
    region: &Region,
) -> Vec<Region> {
    let geometry = BlockGeometry::new(*region);
    let Some(left) = geometry.team_column().checked_sub(1) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    for displayed in [Slot::Top, Slot::Bottom] {
        let row = geometry.line_row(displayed);
        let fed_by_line = lines
            .iter()
            .any(|line| line.region.row == row && line.region.last_column() == left);
        let fed_by_block = blocks
            .iter()
            .any(|(_, other)| BlockGeometry::new(*other).output_cell() == Region::cell(row, left));
        if fed_by_line || fed_by_block {
            continue;
        }
        let incoming = geometry.incoming_line_cell(displayed);
        if let Some(span) = get_feeding_line_region(area, incoming, displayed == Slot::Top)
            && clear_of_blocks(blocks, &span)
            && !lines.iter().any(|line| line.region.overlap_kind(&span).overlaps())
        {
            found.push(span);
        }
    }
    found
}
