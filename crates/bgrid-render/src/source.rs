#![forbid(unsafe_code)]

//! Durable game data and the deltas recorded against it.

use bgrid_core::GameId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What the source table stores for a game. `None` is the unset sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub field: Option<String>,
    pub start_time: Option<NaiveDateTime>,
}

impl GameRecord {
    #[must_use]
    pub fn new(field: Option<String>, start_time: Option<NaiveDateTime>) -> Self {
        Self { field, start_time }
    }
}

/// One value before and after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    pub before: T,
    pub after: T,
}

impl<T: PartialEq> ValueChange<T> {
    /// `None` when nothing changed.
    #[must_use]
    pub fn between(before: T, after: T) -> Option<Self> {
        (before != after).then_some(Self { before, after })
    }
}

/// Field and start-time edits made to one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDataDelta {
    pub game_id: GameId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<ValueChange<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ValueChange<Option<NaiveDateTime>>>,
}

impl GameDataDelta {
    #[must_use]
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            field: None,
            start_time: None,
        }
    }

    /// Delta between two records of the same game, if they differ.
    #[must_use]
    pub fn between(game_id: GameId, before: &GameRecord, after: &GameRecord) -> Option<Self> {
        Self {
            game_id,
            field: ValueChange::between(before.field.clone(), after.field.clone()),
            start_time: ValueChange::between(before.start_time, after.start_time),
        }
        .non_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field.is_none() && self.start_time.is_none()
    }

    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    /// Put back the values recorded before the edit.
    pub fn restore_before(&self, record: &mut GameRecord) {
        if let Some(change) = &self.field {
            record.field.clone_from(&change.before);
        }
        if let Some(change) = &self.start_time {
            record.start_time = change.before;
        }
    }

    /// Put back the values recorded after the edit.
    pub fn reapply_after(&self, record: &mut GameRecord) {
        if let Some(change) = &self.field {
            record.field.clone_from(&change.after);
        }
        if let Some(change) = &self.start_time {
            record.start_time = change.after;
        }
    }
}

/// Merge proposed values into a stored record.
///
/// A proposed value replaces the stored one only while the stored one is
/// still unset, or always when `overwrite` is set. Returns the merged record
/// and the delta of what actually changed.
#[must_use]
pub fn apply_first_time_defaults(
    game_id: GameId,
    current: &GameRecord,
    proposed: &GameRecord,
    overwrite: bool,
) -> (GameRecord, Option<GameDataDelta>) {
    let mut merged = current.clone();
    if let Some(field) = &proposed.field
        && (overwrite || current.field.is_none())
    {
        merged.field = Some(field.clone());
    }
    if let Some(start_time) = proposed.start_time
        && (overwrite || current.start_time.is_none())
    {
        merged.start_time = Some(start_time);
    }
    let delta = GameDataDelta::between(game_id, current, &merged);
    (merged, delta)
}
