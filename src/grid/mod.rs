//! Grid module: shape, raw buffer, compressed layout and the multi-grid
//! container built from them.
#![warn(missing_docs)]

pub mod compressed;
pub mod multi_grid;
pub mod raw;
pub mod shape;

pub use crate::debug_invariants::DebugInvariants;

pub use compressed::CompressedLayout;
pub use multi_grid::{GridOpts, GridState, MultiGrid};
pub use raw::RawStore;
pub use shape::{BoxCells, CellId, GridShape, GridSize};

/// Alias for the common two-dimensional grid.
pub type MultiGrid2<T> = MultiGrid<2, T>;
/// Alias for the common three-dimensional grid.
pub type MultiGrid3<T> = MultiGrid<3, T>;
