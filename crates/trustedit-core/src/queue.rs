//! The ordered queue of pending changesets plus its undo stack.
//!
//! `pending` is FIFO: the first changeset added is the first applied.
//! `undone` is LIFO: the most recently undone changeset is the first
//! redone. A changeset lives in at most one of the two at a time.
//!
//! The queue is a pure data structure; it performs no I/O and publishes no
//! events. Every mutation recomputes the dirty flag exactly once and
//! reports the outcome as a [`DirtyTransition`], which the session manager
//! turns into at most one `queue_updated` event per operation.

use crate::changeset::Changeset;
use crate::error::QueueError;

/// Outcome of the per-mutation dirty recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyTransition {
    /// Flag kept its previous value.
    Unchanged,
    /// Flag flipped to the contained value.
    Changed(bool),
}

impl DirtyTransition {
    /// The new flag value when the flag flipped.
    pub fn changed_to(self) -> Option<bool> {
        match self {
            DirtyTransition::Unchanged => None,
            DirtyTransition::Changed(dirty) => Some(dirty),
        }
    }
}

/// FIFO queue of pending changesets with a parallel undo stack.
#[derive(Debug, Clone)]
pub struct ChangeQueue<C> {
    pending: Vec<C>,
    undone: Vec<C>,
    dirty: bool,
}

impl<C> Default for ChangeQueue<C> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            undone: Vec::new(),
            dirty: false,
        }
    }
}

impl<C: Changeset> ChangeQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a changeset to the back of the pending queue. Never fails.
    pub fn add(&mut self, changeset: C) -> DirtyTransition {
        self.pending.push(changeset);
        self.update_dirty()
    }

    /// Remove and return the front of the pending queue.
    pub fn dequeue(&mut self) -> Result<(C, DirtyTransition), QueueError> {
        if self.pending.is_empty() {
            return Err(QueueError::Empty);
        }
        let changeset = self.pending.remove(0);
        Ok((changeset, self.update_dirty()))
    }

    /// Discard the entire pending queue. The undo stack is untouched.
    pub fn clear(&mut self) -> DirtyTransition {
        self.pending.clear();
        self.update_dirty()
    }

    /// Drop only the most recently added pending changeset, without
    /// recording it on the undo stack. No-op on an empty queue.
    pub fn discard_last(&mut self) -> Option<(C, DirtyTransition)> {
        let changeset = self.pending.pop()?;
        Some((changeset, self.update_dirty()))
    }

    /// Move the last-added pending changeset onto the undo stack.
    /// Returns `None` when pending is empty (a no-op, not an error).
    pub fn undo(&mut self) -> Option<DirtyTransition> {
        let changeset = self.pending.pop()?;
        self.undone.push(changeset);
        Some(self.update_dirty())
    }

    /// Move the most recently undone changeset back onto the pending tail.
    /// Returns `None` when the undo stack is empty.
    pub fn redo(&mut self) -> Option<DirtyTransition> {
        let changeset = self.undone.pop()?;
        self.pending.push(changeset);
        Some(self.update_dirty())
    }

    /// Drain the whole pending queue onto the undo stack, back to front,
    /// as if `undo` had been called once per element. Repeated `redo`
    /// replays the drained changesets in their original order.
    pub fn checkpoint(&mut self) -> DirtyTransition {
        while let Some(changeset) = self.pending.pop() {
            self.undone.push(changeset);
        }
        self.update_dirty()
    }

    /// True iff there are unapplied pending changes.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read-only view of the pending queue, in application order.
    pub fn pending(&self) -> &[C] {
        &self.pending
    }

    /// Read-only view of the undo stack, oldest first.
    pub fn undone(&self) -> &[C] {
        &self.undone
    }

    // Recompute the derived flag; called exactly once per mutation.
    fn update_dirty(&mut self) -> DirtyTransition {
        let dirty = self.is_dirty();
        if dirty == self.dirty {
            DirtyTransition::Unchanged
        } else {
            self.dirty = dirty;
            DirtyTransition::Changed(dirty)
        }
    }
}
