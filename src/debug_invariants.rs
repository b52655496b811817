//! Structural self-checks for the grid buffers.
//!
//! The raw buffer, the compressed layout and the grid itself implement
//! [`DebugInvariants`]. Checks run after every compression in debug builds,
//! and in release builds with the `check-invariants` feature.

use crate::grid_error::MultiGridError;

/// Validation of a buffer's structural invariants (parallel lengths,
/// per-cell array sizes, count/start prefix sums).
pub trait DebugInvariants {
    /// Panic on the first broken invariant when checking is enabled.
    fn debug_assert_invariants(&self);
    /// Return the first broken invariant as a [`MultiGridError`].
    fn validate_invariants(&self) -> Result<(), MultiGridError>;
}

/// Panic with a `[grid invariants]` prefix if `$expr` yields `Err` and
/// invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[grid invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
