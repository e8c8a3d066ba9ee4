#![forbid(unsafe_code)]

//! Structural edits between two grids.

use serde::{Deserialize, Serialize};

use crate::item::GridItem;

/// Kind of edit.
///
/// Lite edits rewrite a block's content in place and leave its named
/// bindings alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeOp {
    Insert,
    Remove,
    InsertLite,
    RemoveLite,
}

impl ChangeOp {
    #[inline]
    #[must_use]
    pub const fn is_remove(self) -> bool {
        matches!(self, Self::Remove | Self::RemoveLite)
    }

    #[inline]
    #[must_use]
    pub const fn is_lite(self) -> bool {
        matches!(self, Self::InsertLite | Self::RemoveLite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridChange {
    pub op: ChangeOp,
    pub item: GridItem,
}

impl GridChange {
    #[must_use]
    pub const fn new(op: ChangeOp, item: GridItem) -> Self {
        Self { op, item }
    }
}

/// Edits that turn one grid into another, already split by phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDiff {
    pub bracket_name: String,
    pub removes: Vec<GridChange>,
    pub inserts: Vec<GridChange>,
}

impl GridDiff {
    #[must_use]
    pub fn new(bracket_name: impl Into<String>) -> Self {
        Self {
            bracket_name: bracket_name.into(),
            removes: Vec::new(),
            inserts: Vec::new(),
        }
    }

    /// Queue a change in the phase its op belongs to.
    pub fn push(&mut self, change: GridChange) {
        if change.op.is_remove() {
            self.removes.push(change);
        } else {
            self.inserts.push(change);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removes.is_empty() && self.inserts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.removes.len() + self.inserts.len()
    }

    /// Every change, removes first.
    pub fn changes(&self) -> impl Iterator<Item = &GridChange> + '_ {
        self.removes.iter().chain(self.inserts.iter())
    }
}
