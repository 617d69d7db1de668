//! Element-level kernels which the engines are built from.
//!
//! Kernels operate on contiguous slices and the [`Matrix`](matrix::Matrix)
//! scratch type rather than on arrays, so they can be shared by the
//! sequential and parallel engines.

pub mod decomp;
pub mod eig;
pub mod matmul;
pub mod matrix;
pub mod reduce;
pub mod stats;
pub mod svd;
