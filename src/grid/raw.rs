//! RawStore: the append-only staging buffer of a multi-grid.

use super::shape::CellId;
use crate::debug_invariants::DebugInvariants;
use crate::grid_error::MultiGridError;

/// Items and their cells in insertion order, as two parallel sequences.
///
/// # Invariants
///
/// - `items.len() == cells.len()`.
#[derive(Clone, Debug)]
pub struct RawStore<const D: usize, T> {
    items: Vec<T>,
    cells: Vec<CellId<D>>,
}

impl<const D: usize, T> Default for RawStore<D, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cells: Vec::new(),
        }
    }
}

impl<const D: usize, T> RawStore<D, T> {
    /// Empty store with room for `capacity` entries in both sequences.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Append one entry. The cell must already be validated.
    #[inline]
    pub(crate) fn push(&mut self, cell: CellId<D>, item: T) {
        self.items.push(item);
        self.cells.push(cell);
    }

    /// Reserve room for `additional` more entries.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
        self.cells.reserve(additional);
    }

    /// Drop every entry, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.cells.clear();
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.items.len(), self.cells.len());
        self.items.len()
    }

    /// Whether no entry has been appended since the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries the store can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity().min(self.cells.capacity())
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cell ids in insertion order, parallel to [`items`](Self::items).
    #[inline]
    pub fn cells(&self) -> &[CellId<D>] {
        &self.cells
    }

    /// `(cell, item)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellId<D>, &T)> {
        self.cells.iter().zip(&self.items)
    }
}

impl<const D: usize, T> DebugInvariants for RawStore<D, T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "RawStore invalid");
    }

    fn validate_invariants(&self) -> Result<(), MultiGridError> {
        if self.items.len() != self.cells.len() {
            return Err(MultiGridError::RawLengthMismatch {
                items: self.items.len(),
                cells: self.cells.len(),
            });
        }
        Ok(())
    }
}
