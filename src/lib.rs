#![cfg_attr(docsrs, feature(doc_cfg))]
//! # multi-grid
//!
//! multi-grid is a fixed-shape, N-dimensional spatial bucket container for
//! scientific computing codes. Items tagged with an integer cell coordinate
//! are appended to a staging buffer, then compressed by a counting sort into
//! a CSR-like layout where the items of any cell form one contiguous slice.
//! Typical use is spatial binning for neighbor search: many inserts per time
//! step, then many cell queries against the same snapshot.
//!
//! ## Features
//! - `MultiGrid<D, T>` with the dimensionality as a const generic, so cell
//!   ids are stack arrays and appends never allocate per item
//! - Explicit two-phase state: queries fail with
//!   [`MultiGridError::NotCompressed`](grid_error::MultiGridError::NotCompressed)
//!   instead of compressing behind the caller's back
//! - Cell views are borrowed slices, so the compiler rejects mutation while a
//!   view is alive
//! - Invariant checking through [`DebugInvariants`], on in debug builds and
//!   with the `check-invariants` feature
//!
//! ## Usage
//!
//! ```rust
//! # fn try_main() -> Result<(), multi_grid::grid_error::MultiGridError> {
//! use multi_grid::prelude::*;
//!
//! let mut grid = MultiGrid::<2, u32>::new([4, 4], 16)?;
//! grid.add([1, 2], 7)?;
//! grid.add([1, 2], 9)?;
//! grid.add([3, 0], 1)?;
//! grid.compress();
//! assert_eq!(grid.enumerate(&[1, 2])?.len(), 2);
//! assert_eq!(grid.neighborhood(&[2, 1], 1)?.count(), 3);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```
//!
//! ## Determinism
//!
//! Linearization is fixed (axis 0 varies fastest) and compression is a
//! sequential counting sort, so the compressed layout is a deterministic
//! function of the insertion sequence. The order of items inside one cell is
//! nevertheless not part of the public contract.

pub mod debug_invariants;
pub mod grid;
pub mod grid_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::grid::{CellId, GridOpts, GridShape, GridSize, GridState, MultiGrid};
    pub use crate::grid_error::MultiGridError;
}
