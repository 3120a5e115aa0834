//! Shared test utilities for the dhm-hydro-adjust workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Raster generators with predictable values
//! - The reference rasters and geometries used across the test suites
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Asserts that two grids have the same shape and approximately equal cells.
///
/// NaN cells only match NaN cells.
#[macro_export]
macro_rules! assert_grid_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = &$left;
        let right = &$right;
        assert_eq!(left.dim(), right.dim(), "grid shapes differ");
        for ((idx, l), r) in left.indexed_iter().zip(right.iter()) {
            let (l, r): (f64, f64) = (*l, *r);
            if l.is_nan() || r.is_nan() {
                assert!(
                    l.is_nan() && r.is_nan(),
                    "cell {:?}: left {:?}, right {:?}",
                    idx,
                    l,
                    r
                );
            } else {
                assert!(
                    (l - r).abs() <= $epsilon,
                    "cell {:?}: left {:?}, right {:?}",
                    idx,
                    l,
                    r
                );
            }
        }
    }};
}
