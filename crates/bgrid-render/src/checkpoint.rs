#![forbid(unsafe_code)]

//! Scoped lifetimes for host-side objects.
//!
//! Some hosts hand out tracked proxy objects that stay alive until they are
//! explicitly released. An apply pass opens a checkpoint before its first
//! surface call and releases it when it ends, on success and on every error
//! path alike, through [`ScopedCheckpoint`].
//!
//! [`CheckpointArena`] is the bookkeeping an adapter needs to honour that
//! contract: it hands out ids and remembers which scopes are still open.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::surface::{Surface, SurfaceResult};

/// Handle of an open checkpoint. [`CheckpointId::NONE`] is returned by
/// surfaces that track nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckpointId(u64);

impl CheckpointId {
    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Open checkpoints of one adapter, innermost last.
#[derive(Debug, Default, Clone)]
pub struct CheckpointArena {
    next: u64,
    open: Vec<(CheckpointId, String)>,
    opened_total: u64,
}

impl CheckpointArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new checkpoint.
    pub fn open(&mut self, label: &str) -> CheckpointId {
        self.next += 1;
        self.opened_total += 1;
        let id = CheckpointId(self.next);
        self.open.push((id, label.to_string()));
        id
    }

    /// Release a checkpoint and every checkpoint opened after it.
    ///
    /// Returns how many were released; zero for an unknown id.
    pub fn release(&mut self, id: CheckpointId) -> usize {
        match self.open.iter().position(|(open, _)| *open == id) {
            Some(index) => {
                let released = self.open.len() - index;
                self.open.truncate(index);
                released
            }
            None => 0,
        }
    }

    /// Number of checkpoints still open.
    #[must_use]
    pub fn live(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn opened_total(&self) -> u64 {
        self.opened_total
    }

    /// Labels of the open checkpoints, outermost first.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.open.iter().map(|(_, label)| label.as_str())
    }
}

/// RAII guard holding a surface checkpoint open.
///
/// Derefs to the surface so work can continue through the guard. Dropping
/// it releases the checkpoint; [`ScopedCheckpoint::release`] does the same
/// and reports the release error instead of logging it.
pub struct ScopedCheckpoint<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    id: CheckpointId,
    released: bool,
}

impl<'s, S: Surface + ?Sized> ScopedCheckpoint<'s, S> {
    /// Open a checkpoint on `surface`.
    pub fn open(surface: &'s mut S, label: &str) -> SurfaceResult<Self> {
        let id = surface.checkpoint(label)?;
        Ok(Self {
            surface,
            id,
            released: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> CheckpointId {
        self.id
    }

    /// Release now and surface any error.
    pub fn release(mut self) -> SurfaceResult<()> {
        self.released = true;
        self.surface.release_checkpoint(self.id)
    }
}

impl<S: Surface + ?Sized> Deref for ScopedCheckpoint<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for ScopedCheckpoint<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for ScopedCheckpoint<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(error) = self.surface.release_checkpoint(self.id) {
            tracing::warn!(checkpoint = self.id.get(), %error, "checkpoint release failed");
        }
    }
}

impl<S: Surface + ?Sized> fmt::Debug for ScopedCheckpoint<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCheckpoint")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
