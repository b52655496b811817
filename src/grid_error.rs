//! MultiGridError: unified error type for multi-grid public APIs
//!
//! Every fallible operation on [`GridShape`](crate::grid::GridShape) and
//! [`MultiGrid`](crate::grid::MultiGrid) reports through this type. Errors are
//! raised before any mutation takes place, so a failed call leaves the
//! container exactly as it was.

use thiserror::Error;

/// Unified error type for multi-grid operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MultiGridError {
    /// A grid extent was zero along `axis`.
    #[error("Invalid grid shape: extent along axis {axis} must be greater than zero")]
    InvalidShape {
        /// Offending axis.
        axis: usize,
    },
    /// The product of all extents does not fit in `usize`.
    #[error("Invalid grid shape: total cell count overflows usize")]
    ShapeOverflow,
    /// A shape was given with the wrong number of axes.
    #[error("Dimension mismatch: expected {expected} extents, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the grid type.
        expected: usize,
        /// Number of extents supplied.
        found: usize,
    },
    /// A cell coordinate lies outside the grid.
    #[error("Cell id out of range: index {index} on axis {axis} (extent {extent})")]
    OutOfRange {
        /// Offending axis.
        axis: usize,
        /// Coordinate supplied on that axis.
        index: usize,
        /// Grid extent on that axis.
        extent: usize,
    },
    /// A query was issued while the grid holds uncompressed data.
    #[error("Grid is not compressed: call `compress()` before querying cells")]
    NotCompressed,
    /// A linear storage id does not name a cell of the grid.
    #[error("Storage id {id} out of range for grid with {num_cells} cells")]
    StorageIdOutOfRange {
        /// Storage id supplied.
        id: usize,
        /// Total number of cells.
        num_cells: usize,
    },
    /// Raw item and cell sequences disagree in length.
    #[error("Raw buffer mismatch: {items} items but {cells} cell ids")]
    RawLengthMismatch {
        /// Number of raw items.
        items: usize,
        /// Number of raw cell ids.
        cells: usize,
    },
    /// A per-cell array does not have one entry per cell.
    #[error("Per-cell array `{name}` has length {found}, expected {expected}")]
    CellArrayLength {
        /// Which array.
        name: &'static str,
        /// Expected length (the cell count).
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// Per-cell counts do not add up to the compressed length.
    #[error("Count mismatch: cell counts sum to {expected}, compressed data holds {found}")]
    CountMismatch {
        /// Sum of per-cell counts.
        expected: usize,
        /// Length of the compressed data (or raw buffer).
        found: usize,
    },
    /// A start offset is not the prefix sum of the preceding counts.
    #[error("Start offset mismatch at cell {cell}: expected {expected}, found {found}")]
    StartOffsetMismatch {
        /// Linear storage id of the cell.
        cell: usize,
        /// Prefix sum of counts before `cell`.
        expected: usize,
        /// Stored start offset.
        found: usize,
    },
}
