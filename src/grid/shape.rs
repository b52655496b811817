//! GridShape: extents of a D-dimensional regular grid and the linearization
//! of its cell coordinates.
//!
//! Cell `(c_0, …, c_{D-1})` maps to storage id `Σ c_i · ∏_{j<i} n_j`, so
//! dimension 0 varies fastest. Every per-cell array in this crate is indexed
//! by that storage id, and every iteration over cells follows it.

use crate::grid_error::MultiGridError;

/// Number of cells along each axis.
pub type GridSize<const D: usize> = [usize; D];

/// Coordinates of one cell, `0 <= id[i] < size[i]`.
pub type CellId<const D: usize> = [usize; D];

/// Validated, immutable grid extents.
///
/// # Invariants
///
/// - every extent is at least 1;
/// - `num_cells` equals the product of the extents and fits in `usize`.
///
/// Serialized as a plain list of extents; deserialization re-validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct GridShape<const D: usize> {
    extents: GridSize<D>,
    num_cells: usize,
}

impl<const D: usize> GridShape<D> {
    const DIMENSION_IS_POSITIVE: () = assert!(D > 0, "a grid needs at least one dimension");

    /// Validate `extents` and compute the cell count.
    ///
    /// # Errors
    /// `InvalidShape { axis }` for the first zero extent, or `ShapeOverflow`
    /// if the cell count does not fit in `usize`.
    ///
    /// # Example
    /// ```rust
    /// # fn try_main() -> Result<(), multi_grid::grid_error::MultiGridError> {
    /// use multi_grid::grid::GridShape;
    /// let shape = GridShape::new([3, 4])?;
    /// assert_eq!(shape.num_cells(), 12);
    /// assert_eq!(shape.try_linearize(&[2, 3])?, 11);
    /// # Ok(())
    /// # }
    /// # try_main().unwrap();
    /// ```
    pub fn new(extents: GridSize<D>) -> Result<Self, MultiGridError> {
        let () = Self::DIMENSION_IS_POSITIVE;
        let mut num_cells = 1usize;
        for (axis, &n) in extents.iter().enumerate() {
            if n == 0 {
                return Err(MultiGridError::InvalidShape { axis });
            }
            num_cells = num_cells
                .checked_mul(n)
                .ok_or(MultiGridError::ShapeOverflow)?;
        }
        Ok(Self { extents, num_cells })
    }

    /// Extent along each axis.
    #[inline]
    pub fn extents(&self) -> &GridSize<D> {
        &self.extents
    }

    /// Total number of cells `C`.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Whether `cell` lies inside the grid.
    #[inline]
    pub fn contains(&self, cell: &CellId<D>) -> bool {
        cell.iter().zip(&self.extents).all(|(&c, &n)| c < n)
    }

    /// Check `cell` against the extents.
    ///
    /// # Errors
    /// `OutOfRange` naming the first offending axis.
    #[inline]
    pub fn check(&self, cell: &CellId<D>) -> Result<(), MultiGridError> {
        for (axis, (&index, &extent)) in cell.iter().zip(&self.extents).enumerate() {
            if index >= extent {
                return Err(MultiGridError::OutOfRange {
                    axis,
                    index,
                    extent,
                });
            }
        }
        Ok(())
    }

    /// Storage id of `cell`. The cell must already be in range; an
    /// out-of-range id aliases a valid cell, so callers outside this crate go
    /// through [`try_linearize`](Self::try_linearize).
    ///
    /// # Complexity
    /// **O(D)**.
    #[inline]
    pub(crate) fn linearize(&self, cell: &CellId<D>) -> usize {
        debug_assert!(self.contains(cell), "linearize: {cell:?} outside {:?}", self.extents);
        let mut id = 0usize;
        let mut mult = 1usize;
        for (&c, &n) in cell.iter().zip(&self.extents) {
            id += c * mult;
            mult *= n;
        }
        id
    }

    /// Storage id of `cell`: `Σ cell[i] · ∏_{j<i} extent[j]`.
    ///
    /// # Errors
    /// `OutOfRange` naming the first offending axis.
    pub fn try_linearize(&self, cell: &CellId<D>) -> Result<usize, MultiGridError> {
        self.check(cell)?;
        Ok(self.linearize(cell))
    }

    /// Inverse of [`try_linearize`](Self::try_linearize).
    ///
    /// # Errors
    /// `StorageIdOutOfRange` if `id >= num_cells()`.
    pub fn delinearize(&self, id: usize) -> Result<CellId<D>, MultiGridError> {
        if id >= self.num_cells {
            return Err(MultiGridError::StorageIdOutOfRange {
                id,
                num_cells: self.num_cells,
            });
        }
        let mut rest = id;
        let mut cell = [0usize; D];
        for (c, &n) in cell.iter_mut().zip(&self.extents) {
            *c = rest % n;
            rest /= n;
        }
        Ok(cell)
    }

    /// All cells in storage-id order.
    pub fn cells(&self) -> BoxCells<D> {
        BoxCells::new([0; D], self.extents.map(|n| n - 1))
    }

    /// Cells whose coordinates differ from `center` by at most `radius` on
    /// every axis, clipped to the grid, in storage-id order.
    ///
    /// # Errors
    /// `OutOfRange` if `center` is not a cell of the grid.
    pub fn box_around(
        &self,
        center: &CellId<D>,
        radius: usize,
    ) -> Result<BoxCells<D>, MultiGridError> {
        self.check(center)?;
        let mut lo = [0usize; D];
        let mut hi = [0usize; D];
        for axis in 0..D {
            lo[axis] = center[axis].saturating_sub(radius);
            hi[axis] = center[axis].saturating_add(radius).min(self.extents[axis] - 1);
        }
        Ok(BoxCells::new(lo, hi))
    }
}

impl<const D: usize> TryFrom<Vec<usize>> for GridShape<D> {
    type Error = MultiGridError;

    fn try_from(extents: Vec<usize>) -> Result<Self, Self::Error> {
        let found = extents.len();
        let extents: GridSize<D> = extents
            .try_into()
            .map_err(|_| MultiGridError::DimensionMismatch { expected: D, found })?;
        Self::new(extents)
    }
}

impl<const D: usize> From<GridShape<D>> for Vec<usize> {
    fn from(shape: GridShape<D>) -> Self {
        shape.extents.to_vec()
    }
}

/// Iterator over an inclusive box of cells `lo ..= hi`, axis 0 fastest.
#[derive(Clone, Debug)]
pub struct BoxCells<const D: usize> {
    lo: CellId<D>,
    hi: CellId<D>,
    next: Option<CellId<D>>,
}

impl<const D: usize> BoxCells<D> {
    fn new(lo: CellId<D>, hi: CellId<D>) -> Self {
        let next = lo.iter().zip(&hi).all(|(l, h)| l <= h).then_some(lo);
        Self { lo, hi, next }
    }
}

impl<const D: usize> Iterator for BoxCells<D> {
    type Item = CellId<D>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut succ = current;
        let mut advanced = false;
        for axis in 0..D {
            if succ[axis] < self.hi[axis] {
                succ[axis] += 1;
                advanced = true;
                break;
            }
            succ[axis] = self.lo[axis];
        }
        self.next = advanced.then_some(succ);
        Some(current)
    }
}


#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let s = GridShape::new([3, 4, 5]).unwrap();
        let text = serde_json::to_string(&s).unwrap();
        assert_eq!(text, "[3,4,5]");
        let back: GridShape<3> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn json_rejects_invalid_shapes() {
        assert!(serde_json::from_str::<GridShape<2>>("[3,0]").is_err());
        assert!(serde_json::from_str::<GridShape<2>>("[3,4,5]").is_err());
    }
}
