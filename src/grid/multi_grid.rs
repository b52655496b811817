//! MultiGrid: a fixed-shape D-dimensional grid holding any number of items
//! per cell.
//!
//! The grid has two states. While [`Mutable`](GridState::Mutable), items are
//! appended to a raw buffer in insertion order and cells cannot be queried.
//! [`compress`](MultiGrid::compress) regroups the raw buffer by cell with a
//! counting sort and moves the grid to [`Queryable`](GridState::Queryable),
//! where every cell is a contiguous slice. Any `add`, `extend` or `clear`
//! drops the grid back to `Mutable`; queries never compress implicitly.
//!
//! Views returned by the query methods borrow the grid, so a view cannot
//! outlive the compressed snapshot it points into.

use std::ops::Range;

use super::compressed::CompressedLayout;
use super::raw::RawStore;
use super::shape::{CellId, GridShape, GridSize};
use crate::debug_invariants::DebugInvariants;
use crate::grid_error::MultiGridError;

/// Which buffer is authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridState {
    /// The raw buffer is authoritative; the compressed buffer is stale.
    #[default]
    Mutable,
    /// The compressed buffer mirrors the raw buffer and may be queried.
    Queryable,
}

/// Construction options for [`MultiGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridOpts {
    /// Expected number of items. Advisory: exceeding it only reallocates.
    pub buff_size: usize,
}

/// Spatial bucket container over a `D`-dimensional regular grid.
///
/// # Example
/// ```rust
/// # fn try_main() -> Result<(), multi_grid::grid_error::MultiGridError> {
/// use multi_grid::grid::MultiGrid;
/// let mut grid = MultiGrid::<2, i32>::new([2, 2], 4)?;
/// grid.add([0, 0], 10)?;
/// grid.add([1, 1], 30)?;
/// grid.add([0, 0], 11)?;
/// grid.compress();
/// let mut bucket = grid.enumerate(&[0, 0])?.to_vec();
/// bucket.sort();
/// assert_eq!(bucket, vec![10, 11]);
/// assert!(grid.enumerate(&[0, 1])?.is_empty());
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct MultiGrid<const D: usize, T> {
    shape: GridShape<D>,
    state: GridState,
    raw: RawStore<D, T>,
    compressed: CompressedLayout<T>,
    buff_size: usize,
    /// Set once the raw buffer has outgrown `buff_size` since the last
    /// `clear` and that was logged.
    outgrown: bool,
}

impl<const D: usize, T> MultiGrid<D, T> {
    /// Build an empty grid with `grid_size` cells along each axis, reserving
    /// room for `buff_size` items.
    ///
    /// # Errors
    /// `InvalidShape` if any extent is zero, `ShapeOverflow` if the cell
    /// count does not fit in `usize`.
    pub fn new(grid_size: GridSize<D>, buff_size: usize) -> Result<Self, MultiGridError> {
        Self::with_opts(grid_size, GridOpts { buff_size })
    }

    /// Build an empty grid from construction options.
    pub fn with_opts(grid_size: GridSize<D>, opts: GridOpts) -> Result<Self, MultiGridError> {
        let shape = GridShape::new(grid_size)?;
        Ok(Self::from_shape(shape, opts))
    }

    /// Build an empty grid over an already validated shape.
    pub fn with_shape(shape: GridShape<D>) -> Self {
        Self::from_shape(shape, GridOpts::default())
    }

    fn from_shape(shape: GridShape<D>, opts: GridOpts) -> Self {
        Self {
            shape,
            state: GridState::Mutable,
            raw: RawStore::with_capacity(opts.buff_size),
            compressed: CompressedLayout::new(shape.num_cells(), opts.buff_size),
            buff_size: opts.buff_size,
            outgrown: false,
        }
    }

    /// Append `item` to cell `cell_id`.
    ///
    /// # Errors
    /// `OutOfRange` if `cell_id` is outside the grid; nothing is appended.
    ///
    /// # Complexity
    /// Amortized **O(D)**.
    pub fn add(&mut self, cell_id: CellId<D>, item: T) -> Result<(), MultiGridError> {
        self.shape.check(&cell_id)?;
        self.invalidate();
        self.raw.push(cell_id, item);
        self.note_growth();
        Ok(())
    }

    /// Append a batch of `(cell, item)` pairs.
    ///
    /// The whole batch is validated first; on error nothing is appended.
    pub fn extend<I>(&mut self, entries: I) -> Result<(), MultiGridError>
    where
        I: IntoIterator<Item = (CellId<D>, T)>,
    {
        let batch: Vec<(CellId<D>, T)> = entries.into_iter().collect();
        for (cell_id, _) in &batch {
            self.shape.check(cell_id)?;
        }
        self.invalidate();
        self.raw.reserve(batch.len());
        for (cell_id, item) in batch {
            self.raw.push(cell_id, item);
        }
        self.note_growth();
        Ok(())
    }

    /// Drop every item, keeping all allocations.
    ///
    /// Re-arms the capacity-hint warning, so each fill between two clears
    /// logs at most once.
    pub fn clear(&mut self) {
        log::trace!("MultiGrid::clear: dropping {} items", self.raw.len());
        self.invalidate();
        self.raw.clear();
        self.outgrown = false;
    }

    /// Mark the compressed buffer stale. Only mutating operations call this.
    #[inline]
    fn invalidate(&mut self) {
        self.state = GridState::Mutable;
    }

    /// Warn the first time the raw buffer outgrows the capacity hint.
    fn note_growth(&mut self) {
        if !self.outgrown && self.buff_size > 0 && self.raw.len() > self.buff_size {
            self.outgrown = true;
            log::warn!(
                "MultiGrid: {} items exceed the capacity hint of {}; buffers will reallocate",
                self.raw.len(),
                self.buff_size
            );
        }
    }

    /// Regroup the raw buffer by cell and make the grid queryable.
    ///
    /// Does nothing if the grid is already compressed.
    ///
    /// # Complexity
    /// **O(C + N)** for `C` cells and `N` items.
    ///
    /// # Determinism
    /// Items sharing a cell currently keep their insertion order, but callers
    /// should treat the order within a cell as unspecified.
    pub fn compress(&mut self)
    where
        T: Clone + Default,
    {
        if self.state == GridState::Queryable {
            log::trace!("MultiGrid::compress: already compressed");
            return;
        }
        log::debug!(
            "MultiGrid::compress: {} items into {} cells",
            self.raw.len(),
            self.shape.num_cells()
        );
        self.compressed.rebuild(&self.shape, &self.raw);
        self.state = GridState::Queryable;
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
    }

    #[inline]
    fn queryable(&self) -> Result<&CompressedLayout<T>, MultiGridError> {
        match self.state {
            GridState::Queryable => Ok(&self.compressed),
            GridState::Mutable => Err(MultiGridError::NotCompressed),
        }
    }

    /// All items stored in `cell_id`.
    ///
    /// # Errors
    /// `NotCompressed` if the grid was mutated since the last
    /// [`compress`](Self::compress), otherwise `OutOfRange` for a cell outside
    /// the grid.
    ///
    /// # Complexity
    /// **O(D)**.
    pub fn enumerate(&self, cell_id: &CellId<D>) -> Result<&[T], MultiGridError> {
        let layout = self.queryable()?;
        let id = self.shape.try_linearize(cell_id)?;
        Ok(layout.cell(id))
    }

    /// `[begin, end)` of `cell_id` within [`compressed_data`](Self::compressed_data).
    ///
    /// Same errors as [`enumerate`](Self::enumerate).
    pub fn bounds(&self, cell_id: &CellId<D>) -> Result<Range<usize>, MultiGridError> {
        let layout = self.queryable()?;
        let id = self.shape.try_linearize(cell_id)?;
        Ok(layout.span(id))
    }

    /// Number of items in `cell_id`.
    pub fn cell_len(&self, cell_id: &CellId<D>) -> Result<usize, MultiGridError> {
        let layout = self.queryable()?;
        let id = self.shape.try_linearize(cell_id)?;
        Ok(layout.counts()[id])
    }

    /// Every item, grouped by cell in storage-id order.
    pub fn compressed_data(&self) -> Result<&[T], MultiGridError> {
        Ok(self.queryable()?.data())
    }

    /// The compressed layout, including per-cell counts and start offsets.
    pub fn layout(&self) -> Result<&CompressedLayout<T>, MultiGridError> {
        self.queryable()
    }

    /// `(cell, items)` for every cell in storage-id order, empty cells
    /// included.
    pub fn iter_cells(
        &self,
    ) -> Result<impl Iterator<Item = (CellId<D>, &[T])> + '_, MultiGridError> {
        let layout = self.queryable()?;
        Ok(self
            .shape
            .cells()
            .enumerate()
            .map(move |(id, cell)| (cell, layout.cell(id))))
    }

    /// Like [`iter_cells`](Self::iter_cells) but skips empty cells.
    pub fn iter_occupied(
        &self,
    ) -> Result<impl Iterator<Item = (CellId<D>, &[T])> + '_, MultiGridError> {
        Ok(self.iter_cells()?.filter(|(_, items)| !items.is_empty()))
    }

    /// Items of every cell within Chebyshev distance `radius` of `cell_id`,
    /// clipped to the grid. Cells are visited in storage-id order.
    ///
    /// `radius == 0` yields the items of `cell_id` alone.
    ///
    /// # Errors
    /// `NotCompressed`, then `OutOfRange` for a center outside the grid.
    pub fn neighborhood(
        &self,
        cell_id: &CellId<D>,
        radius: usize,
    ) -> Result<impl Iterator<Item = &T> + '_, MultiGridError> {
        let layout = self.queryable()?;
        let shape = &self.shape;
        let cells = shape.box_around(cell_id, radius)?;
        Ok(cells.flat_map(move |cell| layout.cell(shape.linearize(&cell)).iter()))
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> GridState {
        self.state
    }

    /// Whether cells may be queried.
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.state == GridState::Queryable
    }

    /// Items in the raw buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the raw buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Validated grid extents.
    #[inline]
    pub fn shape(&self) -> &GridShape<D> {
        &self.shape
    }

    /// Cells along each axis.
    #[inline]
    pub fn grid_size(&self) -> &GridSize<D> {
        self.shape.extents()
    }

    /// Total number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.shape.num_cells()
    }

    /// Items the raw buffer holds without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Raw items in insertion order.
    #[inline]
    pub fn raw_items(&self) -> &[T] {
        self.raw.items()
    }

    /// Raw cell ids in insertion order, parallel to [`raw_items`](Self::raw_items).
    #[inline]
    pub fn raw_cells(&self) -> &[CellId<D>] {
        self.raw.cells()
    }
}

impl<const D: usize, T> DebugInvariants for MultiGrid<D, T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MultiGrid invalid");
    }

    fn validate_invariants(&self) -> Result<(), MultiGridError> {
        self.raw.validate_invariants()?;
        let num_cells = self.shape.num_cells();
        if self.compressed.num_cells() != num_cells {
            return Err(MultiGridError::CellArrayLength {
                name: "count",
                expected: num_cells,
                found: self.compressed.num_cells(),
            });
        }
        if self.state == GridState::Queryable {
            self.compressed.validate_invariants()?;
            if self.compressed.data().len() != self.raw.len() {
                return Err(MultiGridError::CountMismatch {
                    expected: self.raw.len(),
                    found: self.compressed.data().len(),
                });
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(MultiGrid<3, f64>: Send, Sync, Clone);
    assert_impl_all!(GridState: Copy, Eq);
}
