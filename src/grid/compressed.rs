//! CompressedLayout: CSR-style, cell-grouped copy of a raw buffer.
//!
//! Built by a three-pass counting sort (count, exclusive prefix sum,
//! scatter). After a rebuild the items of storage id `s` occupy
//! `data[start[s] .. start[s] + count[s]]`.

use std::ops::Range;

use super::raw::RawStore;
use super::shape::GridShape;
use crate::debug_invariants::DebugInvariants;
use crate::grid_error::MultiGridError;

/// Dense item array plus per-cell `count`/`start` offsets.
///
/// # Invariants (after [`rebuild`](Self::rebuild))
///
/// - `count`, `start` and `scratch` have one entry per cell;
/// - `Σ count == data.len()`;
/// - `start` is the exclusive prefix sum of `count`.
#[derive(Clone, Debug)]
pub struct CompressedLayout<T> {
    data: Vec<T>,
    count: Vec<usize>,
    start: Vec<usize>,
    /// Next free slot per cell; only meaningful during the scatter pass.
    scratch: Vec<usize>,
}

impl<T> CompressedLayout<T> {
    /// Zeroed per-cell arrays for `num_cells` cells and room for
    /// `capacity` items.
    pub fn new(num_cells: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            count: vec![0; num_cells],
            start: vec![0; num_cells],
            scratch: vec![0; num_cells],
        }
    }

    /// Length of every per-cell array.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.count.len()
    }

    /// The grouped items.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Items per cell, by storage id.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.count
    }

    /// First slot of each cell in [`data`](Self::data), by storage id.
    #[inline]
    pub fn starts(&self) -> &[usize] {
        &self.start
    }

    /// `[begin, end)` of storage id `id` in [`data`](Self::data).
    #[inline]
    pub fn span(&self, id: usize) -> Range<usize> {
        let begin = self.start[id];
        begin..begin + self.count[id]
    }

    /// Items of storage id `id`.
    #[inline]
    pub fn cell(&self, id: usize) -> &[T] {
        &self.data[self.span(id)]
    }

    /// Allocated item slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Regroup `raw` by cell.
    ///
    /// Within a cell, items keep their insertion order. `shape` must be the
    /// shape the per-cell arrays were sized for.
    ///
    /// # Complexity
    /// **O(C + N)** time for `C` cells and `N` raw items; no allocation
    /// beyond growing `data` to `N`.
    pub fn rebuild<const D: usize>(&mut self, shape: &GridShape<D>, raw: &RawStore<D, T>)
    where
        T: Clone + Default,
    {
        debug_assert_eq!(shape.num_cells(), self.num_cells());

        // 1) count
        self.count.fill(0);
        for cell in raw.cells() {
            self.count[shape.linearize(cell)] += 1;
        }

        // 2) exclusive prefix sum
        let mut next = 0usize;
        for (start, &count) in self.start.iter_mut().zip(&self.count) {
            *start = next;
            next += count;
        }

        // 3) scatter
        self.data.resize(raw.len(), T::default());
        self.scratch.copy_from_slice(&self.start);
        for (cell, item) in raw.iter() {
            let slot = &mut self.scratch[shape.linearize(cell)];
            self.data[*slot].clone_from(item);
            *slot += 1;
        }

        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
    }
}

impl<T> DebugInvariants for CompressedLayout<T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CompressedLayout invalid");
    }

    fn validate_invariants(&self) -> Result<(), MultiGridError> {
        let num_cells = self.count.len();
        for (name, len) in [("start", self.start.len()), ("scratch", self.scratch.len())] {
            if len != num_cells {
                return Err(MultiGridError::CellArrayLength {
                    name,
                    expected: num_cells,
                    found: len,
                });
            }
        }

        let mut expected = 0usize;
        for (cell, (&start, &count)) in self.start.iter().zip(&self.count).enumerate() {
            if start != expected {
                return Err(MultiGridError::StartOffsetMismatch {
                    cell,
                    expected,
                    found: start,
                });
            }
            expected = expected.checked_add(count).ok_or(MultiGridError::CountMismatch {
                expected: usize::MAX,
                found: self.data.len(),
            })?;
        }
        if expected != self.data.len() {
            return Err(MultiGridError::CountMismatch {
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl<T> CompressedLayout<T> {
    /// Test helper to corrupt one start offset.
    pub(crate) fn force_start(&mut self, id: usize, start: usize) {
        self.start[id] = start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_2x2() -> (GridShape<2>, RawStore<2, i32>) {
        let shape = GridShape::new([2, 2]).unwrap();
        let mut raw = RawStore::with_capacity(4);
        raw.push([0, 0], 10);
        raw.push([1, 0], 20);
        raw.push([0, 0], 11);
        raw.push([1, 1], 30);
        (shape, raw)
    }

    #[test]
    fn fresh_layout_is_empty_and_valid() {
        let c = CompressedLayout::<u8>::new(6, 16);
        assert_eq!(c.num_cells(), 6);
        assert!(c.data().is_empty());
        assert!(c.capacity() >= 16);
        assert!(c.counts().iter().all(|&n| n == 0));
        assert!(c.validate_invariants().is_ok());
    }

    #[test]
    fn rebuild_groups_by_storage_id() {
        let (shape, raw) = raw_2x2();
        let mut c = CompressedLayout::new(shape.num_cells(), 0);
        c.rebuild(&shape, &raw);
        assert_eq!(c.counts(), &[2, 1, 0, 1]);
        assert_eq!(c.starts(), &[0, 2, 3, 3]);
        assert_eq!(c.data(), &[10, 11, 20, 30]);
        assert_eq!(c.span(2), 3..3);
        assert_eq!(c.cell(0), &[10, 11]);
    }

    #[test]
    fn rebuild_shrinks_after_fewer_items() {
        let (shape, mut raw) = raw_2x2();
        let mut c = CompressedLayout::new(shape.num_cells(), 0);
        c.rebuild(&shape, &raw);
        raw.clear();
        raw.push([1, 1], 7);
        c.rebuild(&shape, &raw);
        assert_eq!(c.data(), &[7]);
        assert_eq!(c.counts(), &[0, 0, 0, 1]);
        assert_eq!(c.starts(), &[0, 0, 0, 0]);
    }

    #[test]
    fn detects_bad_start_offset() {
        let (shape, raw) = raw_2x2();
        let mut c = CompressedLayout::new(shape.num_cells(), 0);
        c.rebuild(&shape, &raw);
        c.force_start(2, 1);
        assert_eq!(
            c.validate_invariants().unwrap_err(),
            MultiGridError::StartOffsetMismatch { cell: 2, expected: 3, found: 1 }
        );
    }
}
