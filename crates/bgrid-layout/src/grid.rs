#![forbid(unsafe_code)]

//! The in-memory bracket layout.
//!
//! A [`GridModel`] is rebuilt from the surface at the start of every
//! operation, copied, edited into a candidate, and diffed back against the
//! original. It is never mutated in place by the public API: every editing
//! call returns a new model.

use std::sync::Arc;

use bgrid_core::{Bracket, GameDef, GameId, OverlapKind, Region, Slot};
use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::change::{ChangeOp, GridChange, GridDiff};
use crate::error::PlacementFailure;
use crate::item::{GridItem, ItemKey};
use crate::mover::infer_orientation;
use crate::pattern::{BlockGeometry, ColumnKind, GridPattern, displayed_slot};
use crate::schedule::{LatestTime, ScheduleConfig, ScheduledSlot};

/// Layout and calendar rules shared by every model built for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub pattern: GridPattern,
    pub schedule: ScheduleConfig,
}

/// Rows reserved for a game's field, start time, and advance-to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfoRange {
    /// Team and score columns of the reserved rows.
    pub region: Region,
    /// Field and time share one row.
    pub compressed: bool,
}

impl GameInfoRange {
    /// Info rows of a block at `region`, `None` when the block has no room.
    ///
    /// The rows strictly between the output row and the bottom line row are
    /// available. Three or more give the full template in the first three;
    /// one or two give the compressed one.
    #[must_use]
    pub fn for_block(region: &Region) -> Option<Self> {
        let geometry = BlockGeometry::new(*region);
        let first = geometry.output_row() + 1;
        let available = geometry.bottom_line_row().checked_sub(first)?;
        if available == 0 {
            return None;
        }
        Some(Self {
            region: Region::new(first, available.min(3), geometry.team_column(), 2),
            compressed: available < 3,
        })
    }

    /// Row holding the field alone; absent when compressed.
    #[must_use]
    pub const fn field_row(&self) -> Option<u32> {
        if self.compressed {
            None
        } else {
            Some(self.region.row)
        }
    }

    /// Row holding the start time (and the field when compressed).
    #[must_use]
    pub const fn time_row(&self) -> u32 {
        if self.compressed {
            self.region.row
        } else {
            self.region.row + 1
        }
    }

    #[must_use]
    pub const fn advance_row(&self) -> Option<u32> {
        let row = self.time_row() + 1;
        if row <= self.region.last_row() {
            Some(row)
        } else {
            None
        }
    }
}

/// Ordered collection of placed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    settings: Arc<GridSettings>,
    items: Vec<GridItem>,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(Arc::new(GridSettings::default()))
    }
}

impl GridModel {
    /// An empty grid.
    #[must_use]
    pub fn new(settings: Arc<GridSettings>) -> Self {
        Self {
            settings,
            items: Vec::new(),
        }
    }

    /// A grid holding `items` as given.
    #[must_use]
    pub fn from_items(settings: Arc<GridSettings>, items: Vec<GridItem>) -> Self {
        Self { settings, items }
    }

    #[must_use]
    pub fn settings(&self) -> &Arc<GridSettings> {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &GridPattern {
        &self.settings.pattern
    }

    #[inline]
    #[must_use]
    pub fn schedule(&self) -> &ScheduleConfig {
        &self.settings.schedule
    }

    #[must_use]
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item. Used while rebuilding from the surface.
    pub fn push(&mut self, item: GridItem) {
        self.items.push(item);
    }

    pub fn game_blocks(&self) -> impl Iterator<Item = &GridItem> + '_ {
        self.items.iter().filter(|item| item.is_game())
    }

    /// The block of a game, if placed.
    #[must_use]
    pub fn game_item(&self, game_id: GameId) -> Option<&GridItem> {
        self.items.iter().find(|item| item.is_block_of(game_id))
    }

    // ---- queries -----------------------------------------------------------

    /// First item, in insertion order, overlapping `region`.
    #[must_use]
    pub fn get_first_overlapping_item(&self, region: &Region) -> (Option<&GridItem>, OverlapKind) {
        self.items
            .iter()
            .map(|item| (item, region.overlap_kind(&item.region)))
            .find(|(_, kind)| kind.overlaps())
            .map_or((None, OverlapKind::None), |(item, kind)| (Some(item), kind))
    }

    /// First game block overlapping `region`, skipping one game.
    #[must_use]
    pub fn first_overlapping_block(
        &self,
        region: &Region,
        except: Option<GameId>,
    ) -> Option<(&GridItem, OverlapKind)> {
        self.game_blocks()
            .filter(|item| except.is_none() || item.game_id != except)
            .map(|item| (item, region.overlap_kind(&item.region)))
            .find(|(_, kind)| kind.overlaps())
    }

    /// The game a selection points at.
    ///
    /// Connector lines are ignored. When the raw selection touches no block,
    /// the selection snapped to a placement is tried.
    #[must_use]
    pub fn infer_game_item_from_selection(&self, region: &Region) -> Option<&GridItem> {
        self.first_overlapping_block(region, None)
            .or_else(|| {
                let adjusted = self.adjust_selection_for_game_insert_or_move(region);
                self.first_overlapping_block(&adjusted, None)
            })
            .map(|(item, _)| item)
    }

    /// Snap a selection onto a day's team column with a usable height.
    #[must_use]
    pub fn adjust_selection_for_game_insert_or_move(&self, region: &Region) -> Region {
        let pattern = self.pattern();
        let column = match pattern.classify(region.column) {
            ColumnKind::Margin => pattern.first_day_column,
            ColumnKind::Team => region.column,
            ColumnKind::Score => region.column - 1,
            ColumnKind::Line => region.column + 1,
        };
        let row_count = if region.row_count < pattern.min_game_rows {
            pattern.default_game_rows
        } else {
            region.row_count
        };
        Region::new(region.row, row_count, column, GridPattern::DAY_WIDTH)
    }

    /// Placed blocks feeding the top and bottom slots of `game`.
    #[must_use]
    pub fn get_feeding_games_for_game(&self, game: &GameDef) -> [Option<&GridItem>; 2] {
        game.feeding_games()
            .map(|feeder| feeder.and_then(|id| self.game_item(id)))
    }

    /// A game's block followed by the connectors carrying its output.
    #[must_use]
    pub fn get_all_game_items(&self, game_id: GameId) -> Vec<&GridItem> {
        let mut found: Vec<&GridItem> = self.game_item(game_id).into_iter().collect();
        found.extend(
            self.items
                .iter()
                .filter(|item| item.is_connector() && item.game_id == Some(game_id)),
        );
        found
    }

    /// Visit every item matching `predicate`; returns how many were visited.
    pub fn enumerate_matching<V, P>(&self, mut visitor: V, predicate: P) -> usize
    where
        V: FnMut(&GridItem),
        P: Fn(&GridItem) -> bool,
    {
        let mut visited = 0;
        for item in self.items.iter().filter(|item| predicate(item)) {
            visitor(item);
            visited += 1;
        }
        visited
    }

    /// Info text rows of a block, `None` when the block has no room.
    #[must_use]
    pub fn get_range_info_for_game_info(&self, region: &Region) -> Option<GameInfoRange> {
        GameInfoRange::for_block(region)
    }

    /// Smallest region covering every item, grown by `margin`.
    #[must_use]
    pub fn get_print_area(&self, margin: u32) -> Option<Region> {
        let covered = self
            .items
            .iter()
            .map(|item| item.region)
            .reduce(|acc, region| acc.union(&region))?;
        Some(covered.expand(margin))
    }

    // ---- calendar ----------------------------------------------------------

    #[must_use]
    pub fn get_date_from_grid_column(&self, column: u32) -> Option<NaiveDate> {
        self.pattern()
            .day_index(column)
            .and_then(|day| self.schedule().date_for_day(day))
    }

    /// Latest start time among the blocks in `date`'s column band.
    #[must_use]
    pub fn get_latest_time_for_date(&self, date: NaiveDate) -> LatestTime {
        let mut latest = LatestTime::default();
        let Some(day) = self.schedule().day_for_date(date) else {
            return latest;
        };
        for item in self.game_blocks() {
            if self.pattern().day_index(item.region.column) != Some(day) {
                continue;
            }
            if let Some(start) = item.start_time
                && start.date() == date
            {
                latest.observe(start, item.field.as_deref());
            }
        }
        latest
    }

    #[must_use]
    pub fn get_first_slot_for_date(&self, date: NaiveDate) -> NaiveDateTime {
        self.schedule().first_slot(date)
    }

    /// Field and time for one more game in a column's day.
    #[must_use]
    pub fn schedule_for_column(&self, column: u32) -> Option<ScheduledSlot> {
        let date = self.get_date_from_grid_column(column)?;
        Some(
            self.schedule()
                .next_slot(date, &self.get_latest_time_for_date(date)),
        )
    }

    // ---- editing -----------------------------------------------------------

    /// A copy of the grid with `game` placed at `region`.
    pub fn build_new_grid_for_game_add(
        &self,
        game: &GameDef,
        region: Region,
        bracket: &Bracket,
    ) -> Result<GridModel, PlacementFailure> {
        let _span = tracing::debug_span!("grid.add", game = game.id.get(), %region).entered();

        if !self.pattern().is_aligned(&region) {
            return Err(PlacementFailure::Misaligned { region });
        }
        if let (Some(item), kind) = self.get_first_overlapping_item(&region) {
            return Err(PlacementFailure::Overlap {
                region,
                with: item.game_id,
                kind,
            });
        }
        if self.game_item(game.id).is_some() {
            return Err(PlacementFailure::AlreadyPlaced(game.id));
        }
        self.check_order(game, &region, bracket)?;

        let orientation = infer_orientation(self, game, &region, false);
        let slot = self.schedule_for_column(region.column);
        let block = GridItem::game(game.id, region)
            .with_swap(orientation.swap)
            .with_schedule(
                slot.as_ref().and_then(|slot| slot.field.clone()),
                slot.map(|slot| slot.start_time),
            );

        let mut candidate = self.clone();
        candidate.items.push(block);
        candidate.connect_game(game, bracket);
        tracing::debug!(
            game = game.id.get(),
            swap = orientation.swap,
            items = candidate.items.len(),
            "candidate grid built for add"
        );
        Ok(candidate)
    }

    /// A copy of the grid without `game_id` and its connectors.
    #[must_use]
    pub fn remove_game(&self, game_id: GameId) -> Option<GridModel> {
        self.game_item(game_id)?;
        let mut candidate = self.clone();
        candidate.detach_lines(game_id);
        candidate.items.retain(|item| !item.is_block_of(game_id));
        candidate.refresh_connections();
        Some(candidate)
    }

    /// Edits turning `self` into `other`.
    ///
    /// Items are matched by kind, region, and game. A matched block whose
    /// orientation changed is rewritten in place with a lite pair.
    #[must_use]
    pub fn diff(&self, other: &GridModel, bracket_name: &str) -> GridDiff {
        let _span = tracing::debug_span!(
            "grid.diff",
            bracket = bracket_name,
            old = self.items.len(),
            new = other.items.len()
        )
        .entered();

        let mut pending: FxHashMap<ItemKey, SmallVec<[usize; 1]>> =
            FxHashMap::with_capacity_and_hasher(other.items.len(), Default::default());
        for (index, item) in other.items.iter().enumerate() {
            pending.entry(item.key()).or_default().push(index);
        }

        let mut matched = vec![false; other.items.len()];
        let mut diff = GridDiff::new(bracket_name);
        for item in &self.items {
            let partner = pending
                .get_mut(&item.key())
                .filter(|indices| !indices.is_empty())
                .map(|indices| indices.remove(0));
            match partner {
                Some(index) => {
                    matched[index] = true;
                    let target = &other.items[index];
                    if item.content_differs(target) {
                        diff.push(GridChange::new(ChangeOp::RemoveLite, item.clone()));
                        diff.push(GridChange::new(ChangeOp::InsertLite, target.clone()));
                    }
                }
                None => diff.push(GridChange::new(ChangeOp::Remove, item.clone())),
            }
        }
        for (index, item) in other.items.iter().enumerate() {
            if !matched[index] {
                diff.push(GridChange::new(ChangeOp::Insert, item.clone()));
            }
        }

        tracing::debug!(
            removes = diff.removes.len(),
            inserts = diff.inserts.len(),
            "grid diff computed"
        );
        diff
    }

    /// Recompute every block's connection flags from geometry.
    pub fn refresh_connections(&mut self) {
        let flags: Vec<Option<(bool, bool)>> = self
            .items
            .iter()
            .map(|item| {
                item.is_game().then(|| {
                    let geometry = BlockGeometry::new(item.region);
                    (
                        self.line_reaches(&geometry, Slot::Top),
                        self.line_reaches(&geometry, Slot::Bottom),
                    )
                })
            })
            .collect();
        for (item, flags) in self.items.iter_mut().zip(flags) {
            if let Some((top, bottom)) = flags {
                item.connected_top = top;
                item.connected_bottom = bottom;
            }
        }
    }

    // ---- internals shared with the mover -----------------------------------

    /// Feeders must sit strictly left of `region`, consumers strictly right.
    pub(crate) fn check_order(
        &self,
        game: &GameDef,
        region: &Region,
        bracket: &Bracket,
    ) -> Result<(), PlacementFailure> {
        for feeder in game.feeding_games().into_iter().flatten() {
            if let Some(item) = self.game_item(feeder)
                && item.region.column >= region.column
            {
                return Err(PlacementFailure::FeederNotEarlier {
                    game: game.id,
                    feeder,
                });
            }
        }
        for advance in bracket.consumers_of(game.id) {
            if let Some(item) = self.game_item(advance.game)
                && item.region.column <= region.column
            {
                return Err(PlacementFailure::ConsumerNotLater {
                    game: game.id,
                    consumer: advance.game,
                });
            }
        }
        Ok(())
    }

    /// Replace a game's block in place, keeping its position in the order.
    pub(crate) fn replace_block(&mut self, game_id: GameId, block: GridItem) {
        match self.items.iter_mut().find(|item| item.is_block_of(game_id)) {
            Some(slot) => *slot = block,
            None => self.items.push(block),
        }
    }

    /// Remove the connectors out of a game and into its current block.
    pub(crate) fn detach_lines(&mut self, game_id: GameId) {
        let Some(block) = self.game_item(game_id) else {
            return;
        };
        let geometry = BlockGeometry::new(block.region);
        self.items.retain(|item| {
            !(item.is_connector()
                && (item.game_id == Some(game_id) || ends_at_block(item, &geometry)))
        });
    }

    /// Rebuild the connectors into and out of a placed game, then drop lines
    /// that now run into or alongside a block.
    pub(crate) fn connect_game(&mut self, game: &GameDef, bracket: &Bracket) {
        self.detach_lines(game.id);
        self.drop_blocked_connectors();
        let Some(block) = self.game_item(game.id).cloned() else {
            return;
        };
        let geometry = BlockGeometry::new(block.region);

        let mut lines = Vec::new();
        for slot in [Slot::Top, Slot::Bottom] {
            let Some(feeder_id) = game.source(slot).feeding_game() else {
                continue;
            };
            let Some(feeder) = self.game_item(feeder_id) else {
                continue;
            };
            let row = geometry.line_row(displayed_slot(slot, block.swap_top_bottom));
            if let Some(span) = self.connector_span(&feeder.region, row, geometry.team_column()) {
                lines.push(GridItem::connector(span, Some(feeder_id)));
            }
        }
        for advance in bracket.consumers_of(game.id) {
            let Some(consumer) = self.game_item(advance.game) else {
                continue;
            };
            let target = BlockGeometry::new(consumer.region);
            let row = target.line_row(displayed_slot(advance.slot, consumer.swap_top_bottom));
            if let Some(span) = self.connector_span(&block.region, row, target.team_column()) {
                lines.push(GridItem::connector(span, Some(game.id)));
            }
        }
        for line in lines {
            if !self
                .items
                .iter()
                .any(|item| item.region.overlap_kind(&line.region).overlaps())
            {
                self.items.push(line);
            }
        }
        self.refresh_connections();
    }

    /// Remove connectors crossed by a block, or whose neighbouring rows are.
    pub(crate) fn drop_blocked_connectors(&mut self) {
        let blocks: SmallVec<[Region; 16]> = self.game_blocks().map(|item| item.region).collect();
        self.items.retain(|item| {
            !item.is_connector()
                || !blocks
                    .iter()
                    .any(|block| block.overlap_kind(&corridor(&item.region)).overlaps())
        });
    }

    /// Line from a feeder's output to a target column, if one can be drawn.
    fn connector_span(&self, feeder: &Region, row: u32, target_column: u32) -> Option<Region> {
        let feeder = BlockGeometry::new(*feeder);
        if feeder.output_row() != row {
            return None;
        }
        let first = feeder.line_column() + 1;
        let last = target_column.checked_sub(1)?;
        if last < first {
            return None;
        }
        let span = Region::from_bounds(row, row, first, last);
        let blocked = self
            .game_blocks()
            .any(|item| item.region.overlap_kind(&corridor(&span)).overlaps());
        (!blocked).then_some(span)
    }

    /// Whether something feeds the line row of a displayed slot.
    fn line_reaches(&self, geometry: &BlockGeometry, displayed: Slot) -> bool {
        let Some(left) = geometry.team_column().checked_sub(1) else {
            return false;
        };
        let row = geometry.line_row(displayed);
        self.items.iter().any(|item| {
            if item.is_game() {
                BlockGeometry::new(item.region).output_cell() == Region::cell(row, left)
            } else {
                item.region.row == row && item.region.last_column() == left
            }
        })
    }
}

/// The line plus the rows directly above and below it.
fn corridor(line: &Region) -> Region {
    let top = line.row.saturating_sub(1);
    Region::from_bounds(top, line.row + 1, line.column, line.last_column())
}

/// Connector ending against one of the block's incoming line rows.
fn ends_at_block(item: &GridItem, geometry: &BlockGeometry) -> bool {
    geometry.team_column().checked_sub(1) == Some(item.region.last_column())
        && (item.region.row == geometry.top_line_row()
            || item.region.row == geometry.bottom_line_row())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket() -> Bracket {
        Bracket::single_elimination("Main", 4).unwrap()
    }

    fn grid() -> GridModel {
        GridModel::default()
    }

    fn game(bracket: &Bracket, id: u32) -> &GameDef {
        bracket.game(GameId::new(id)).unwrap()
    }

    /// Games 1 and 2 stacked on day 0, game 3 on day 2 lined up with both.
    fn three_games() -> (Bracket, GridModel) {
        let bracket = bracket();
        let grid = grid()
            .build_new_grid_for_game_add(game(&bracket, 1), Region::new(0, 11, 3, 3), &bracket)
            .unwrap()
            .build_new_grid_for_game_add(game(&bracket, 2), Region::new(11, 11, 3, 3), &bracket)
            .unwrap();
        // Output rows are 5 and 16; top line row 5 means r0 = 4, bottom line 16 means h = 14.
        let grid = grid
            .build_new_grid_for_game_add(game(&bracket, 3), Region::new(4, 14, 9, 3), &bracket)
            .unwrap();
        (bracket, grid)
    }

    #[test]
    fn add_places_block_with_schedule() {
        let bracket = bracket();
        let next = grid()
            .build_new_grid_for_game_add(game(&bracket, 1), Region::new(4, 11, 3, 3), &bracket)
            .unwrap();
        let block = next.game_item(GameId::new(1)).unwrap();
        assert_eq!(block.field.as_deref(), Some("Field #1"));
        assert_eq!(
            block.start_time,
            Some(next.schedule().first_slot(next.schedule().first_day))
        );
        assert!(!block.swap_top_bottom);
    }

    #[test]
    fn add_rejects_misaligned_and_taken_regions() {
        let bracket = bracket();
        let g1 = game(&bracket, 1);
        assert!(matches!(
            grid().build_new_grid_for_game_add(g1, Region::new(4, 11, 4, 3), &bracket),
            Err(PlacementFailure::Misaligned { .. })
        ));
        let placed = grid()
            .build_new_grid_for_game_add(g1, Region::new(4, 11, 3, 3), &bracket)
            .unwrap();
        let again = placed.build_new_grid_for_game_add(g1, Region::new(4, 11, 3, 3), &bracket);
        assert!(matches!(
            again,
            Err(PlacementFailure::Overlap { kind: OverlapKind::Equal, .. })
        ));
        let elsewhere = placed.build_new_grid_for_game_add(g1, Region::new(40, 11, 3, 3), &bracket);
        assert_eq!(elsewhere.unwrap_err(), PlacementFailure::AlreadyPlaced(GameId::new(1)));
    }

    #[test]
    fn add_rejects_consumer_left_of_feeder() {
        let bracket = bracket();
        let placed = grid()
            .build_new_grid_for_game_add(game(&bracket, 3), Region::new(4, 11, 9, 3), &bracket)
            .unwrap();
        let err = placed
            .build_new_grid_for_game_add(game(&bracket, 1), Region::new(4, 11, 12, 3), &bracket)
            .unwrap_err();
        assert!(err.is_dependency_violation());
    }

    #[test]
    fn aligned_feeders_get_connectors_and_flags() {
        let (_, grid) = three_games();
        let connectors: Vec<_> = grid.items().iter().filter(|item| item.is_connector()).collect();
        assert_eq!(connectors.len(), 2);
        assert_eq!(connectors[0].region, Region::new(5, 1, 6, 3));
        assert_eq!(connectors[1].region, Region::new(16, 1, 6, 3));
        let block = grid.game_item(GameId::new(3)).unwrap();
        assert!(block.connected_top && block.connected_bottom);
        assert_eq!(grid.get_all_game_items(GameId::new(1)).len(), 2);
    }

    #[test]
    fn adjacent_day_feeder_needs_no_connector() {
        let bracket = bracket();
        let grid = grid()
            .build_new_grid_for_game_add(game(&bracket, 1), Region::new(0, 11, 3, 3), &bracket)
            .unwrap()
            .build_new_grid_for_game_add(game(&bracket, 3), Region::new(4, 11, 6, 3), &bracket)
            .unwrap();
        assert!(grid.items().iter().all(GridItem::is_game));
        assert!(grid.game_item(GameId::new(3)).unwrap().connected_top);
    }

    #[test]
    fn remove_game_drops_block_and_lines() {
        let (_, grid) = three_games();
        let without = grid.remove_game(GameId::new(3)).unwrap();
        assert_eq!(without.len(), 2);
        assert!(without.items().iter().all(GridItem::is_game));
        assert!(grid.remove_game(GameId::new(4)).is_none());
    }

    #[test]
    fn diff_of_self_is_empty() {
        let (_, grid) = three_games();
        assert!(grid.diff(&grid, "Main").is_empty());
    }

    #[test]
    fn diff_reports_swap_as_lite_pair() {
        let (_, grid) = three_games();
        let mut flipped = grid.clone();
        flipped.items[2].swap_top_bottom = true;
        let diff = grid.diff(&flipped, "Main");
        assert_eq!(diff.removes.len(), 1);
        assert_eq!(diff.removes[0].op, ChangeOp::RemoveLite);
        assert_eq!(diff.inserts[0].op, ChangeOp::InsertLite);
    }

    #[test]
    fn diff_against_empty_removes_everything() {
        let (_, grid) = three_games();
        let diff = grid.diff(&GridModel::default(), "Main");
        assert_eq!(diff.removes.len(), grid.len());
        assert!(diff.inserts.is_empty());
        assert!(diff.removes.iter().all(|change| change.op == ChangeOp::Remove));
    }

    #[test]
    fn selection_snaps_to_team_column() {
        let grid = grid();
        assert_eq!(
            grid.adjust_selection_for_game_insert_or_move(&Region::new(2, 1, 4, 1)),
            Region::new(2, 11, 3, 3)
        );
        assert_eq!(
            grid.adjust_selection_for_game_insert_or_move(&Region::new(2, 9, 5, 1)),
            Region::new(2, 9, 6, 3)
        );
        assert_eq!(
            grid.adjust_selection_for_game_insert_or_move(&Region::new(2, 3, 0, 2)),
            Region::new(2, 11, 3, 3)
        );
    }

    #[test]
    fn selection_infers_game_but_not_connector() {
        let (_, grid) = three_games();
        let hit = grid.infer_game_item_from_selection(&Region::cell(20, 4)).unwrap();
        assert_eq!(hit.game_id, Some(GameId::new(2)));
        assert!(grid.infer_game_item_from_selection(&Region::cell(5, 7)).is_none());
    }

    #[test]
    fn info_range_layouts() {
        let grid = grid();
        let full = grid.get_range_info_for_game_info(&Region::new(4, 11, 3, 3)).unwrap();
        assert!(!full.compressed);
        assert_eq!(full.field_row(), Some(10));
        assert_eq!(full.time_row(), 11);
        assert_eq!(full.advance_row(), Some(12));

        let two = grid.get_range_info_for_game_info(&Region::new(0, 9, 3, 3)).unwrap();
        assert!(two.compressed);
        assert_eq!(two.field_row(), None);
        assert_eq!(two.time_row(), 5);
        assert_eq!(two.advance_row(), Some(6));

        let one = grid.get_range_info_for_game_info(&Region::new(0, 7, 3, 3)).unwrap();
        assert!(one.compressed);
        assert_eq!(one.advance_row(), None);

        assert!(grid.get_range_info_for_game_info(&Region::new(0, 5, 3, 3)).is_none());
    }

    #[test]
    fn tie_break_fills_fields_then_advances() {
        let bracket = Bracket::single_elimination("Main", 8).unwrap();
        let mut grid = grid();
        let mut slots = Vec::new();
        for (index, id) in [1, 2, 3].into_iter().enumerate() {
            let region = Region::new(index as u32 * 11, 11, 3, 3);
            grid = grid
                .build_new_grid_for_game_add(bracket.game(GameId::new(id)).unwrap(), region, &bracket)
                .unwrap();
            let block = grid.game_item(GameId::new(id)).unwrap();
            slots.push((block.field.clone().unwrap(), block.start_time.unwrap()));
        }
        assert_eq!(slots[0].0, "Field #1");
        assert_eq!(slots[1].0, "Field #2");
        assert_eq!(slots[1].1, slots[0].1);
        assert_eq!(slots[2].0, "Field #1");
        assert_eq!(slots[2].1 - slots[0].1, chrono::Duration::hours(3));
    }

    #[test]
    fn dates_follow_day_columns() {
        let grid = grid();
        let first = grid.schedule().first_day;
        assert_eq!(grid.get_date_from_grid_column(3), Some(first));
        assert_eq!(grid.get_date_from_grid_column(8), first.succ_opt());
        assert_eq!(grid.get_date_from_grid_column(1), None);
    }

    #[test]
    fn print_area_covers_all_items() {
        let (_, grid) = three_games();
        let area = grid.get_print_area(1).unwrap();
        for item in grid.items() {
            assert!(area.contains(&item.region));
        }
        assert_eq!(area.row, 0);
        assert_eq!(area.column, 2);
        assert!(GridModel::default().get_print_area(1).is_none());
    }

    #[test]
    fn enumerate_counts_matches() {
        let (_, grid) = three_games();
        let mut seen = Vec::new();
        let count = grid.enumerate_matching(|item| seen.push(item.region), GridItem::is_connector);
        assert_eq!(count, 2);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn feeding_games_follow_slots() {
        let (bracket, grid) = three_games();
        let [top, bottom] = grid.get_feeding_games_for_game(game(&bracket, 3));
        assert_eq!(top.unwrap().game_id, Some(GameId::new(1)));
        assert_eq!(bottom.unwrap().game_id, Some(GameId::new(2)));
    }
}
