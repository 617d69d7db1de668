//! Interfaces which numerical backends ("engines") implement.
//!
//! An [`Engine`] bundles implementations of the [`Math`], [`LinAlg`] and
//! [`Statistics`] interfaces, plus the extended [`MathEx`] and [`LinAlgEx`]
//! interfaces reachable from them. Engines operate on type-erased
//! [`Value`]s so that they can be stored as trait objects in the
//! [registry](crate::registry). The typed functions in [`crate::math`],
//! [`crate::linalg`] and [`crate::stat`] convert to and from `Value`s and
//! dispatch to the default engine.
//!
//! Every per-axis reduction returns a result with one less axis than its
//! input, and fails with [`ArrayError::InvalidAxis`](ndkit_array::ArrayError)
//! if the axis is out of range.

use std::fmt;
use std::fmt::{Debug, Display};

use crate::errors::OpError;
use crate::value::{Scalar, Value};

/// Key which identifies an engine implementation in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineType(&'static str);

impl EngineType {
    /// Single-threaded engine which is always available.
    pub const PURE: EngineType = EngineType::new("pure");

    /// Engine which runs large operations on the ndkit thread pool.
    pub const PARALLEL: EngineType = EngineType::new("parallel");

    pub const fn new(name: &'static str) -> EngineType {
        EngineType(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Matrix norms supported by [`LinAlg::norm`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Norm {
    /// Frobenius norm, the square root of the sum of squared magnitudes.
    Fro,

    /// Maximum over rows of the sum of absolute values.
    Inf,

    /// Maximum over columns of the sum of absolute values.
    N1,

    /// Largest absolute value.
    Max,
}

/// A numerical backend.
pub trait Engine: Send + Sync + Debug {
    /// Return the key under which this engine is registered.
    fn engine_type(&self) -> EngineType;

    /// Return a human-readable name for this engine.
    fn name(&self) -> &str {
        self.engine_type().name()
    }

    fn math(&self) -> &dyn Math;

    fn linalg(&self) -> &dyn LinAlg;

    fn stat(&self) -> &dyn Statistics;
}

/// Reductions and scans.
///
/// The ordering-based operations (`arg_max`, `max` etc.) fail with
/// [`OpError::UnsupportedType`] for complex inputs and with
/// [`OpError::InvalidValue`] for empty inputs.
pub trait Math: Send + Sync {
    /// Return the flat row-major index of the first occurrence of the
    /// largest element.
    fn arg_max(&self, a: &Value) -> Result<usize, OpError>;

    /// Return the flat row-major index of the first occurrence of the
    /// smallest element.
    fn arg_min(&self, a: &Value) -> Result<usize, OpError>;

    /// Return the indices of the largest elements along `axis`, as an
    /// `Int64` array.
    fn arg_max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;

    /// Return the indices of the smallest elements along `axis`, as an
    /// `Int64` array.
    fn arg_min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;

    fn max(&self, a: &Value) -> Result<Scalar, OpError>;

    fn min(&self, a: &Value) -> Result<Scalar, OpError>;

    fn max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;

    fn min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;

    /// Return the sum of all elements. The sum of an empty array is zero.
    fn sum(&self, a: &Value) -> Result<Scalar, OpError>;

    fn sum_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;

    /// Return running totals.
    ///
    /// If `axis` is `None` the input is flattened and the result is a
    /// vector. Otherwise the result has the same shape as the input.
    fn cum_sum(&self, a: &Value, axis: Option<usize>) -> Result<Value, OpError>;

    fn math_ex(&self) -> &dyn MathEx;
}

/// Element-wise transcendental functions.
///
/// Integer inputs produce `Float64` outputs. Float and complex inputs keep
/// their element type.
pub trait MathEx: Send + Sync {
    fn exp(&self, a: &Value) -> Result<Value, OpError>;

    /// Natural logarithm.
    fn log(&self, a: &Value) -> Result<Value, OpError>;

    fn sin(&self, a: &Value) -> Result<Value, OpError>;

    fn cos(&self, a: &Value) -> Result<Value, OpError>;
}

/// Products, inverses, powers and norms.
pub trait LinAlg: Send + Sync {
    /// Compute a vector-vector, matrix-vector or matrix-matrix product.
    ///
    /// Both operands must have the same element type. A vector-vector
    /// product returns a rank-0 array.
    fn dot(&self, a: &Value, b: &Value) -> Result<Value, OpError>;

    /// Compute the inverse of a square matrix.
    ///
    /// Integer inputs are promoted to `Float64`.
    fn inv(&self, a: &Value) -> Result<Value, OpError>;

    /// Raise a square matrix to a non-negative integer power.
    fn pow(&self, a: &Value, n: u32) -> Result<Value, OpError>;

    /// Compute a norm of a matrix.
    fn norm(&self, a: &Value, norm: Norm) -> Result<f64, OpError>;

    fn linalg_ex(&self) -> &dyn LinAlgEx;
}

/// Matrix decompositions and linear solvers.
///
/// Integer inputs are promoted to `Float64`.
pub trait LinAlgEx: Send + Sync {
    /// Compute `(Q, R)` such that `A = Q * R`.
    fn qr(&self, a: &Value) -> Result<(Value, Value), OpError>;

    /// Compute `(P, L, U)` such that `A = P * L * U`.
    fn plu(&self, a: &Value) -> Result<(Value, Value, Value), OpError>;

    /// Compute the thin singular value decomposition `(U, S, Vh)`.
    ///
    /// `S` is a vector of singular values in descending order, with the real
    /// counterpart of the input's element type.
    fn svd(&self, a: &Value) -> Result<(Value, Value, Value), OpError>;

    /// Compute the eigenvalues and eigenvectors (as columns) of a square
    /// matrix. The outputs are always complex.
    fn eig(&self, a: &Value) -> Result<(Value, Value), OpError>;

    /// Solve `A * X = B` for `X`, where `B` is a vector or matrix.
    fn solve(&self, a: &Value, b: &Value) -> Result<Value, OpError>;
}

/// Statistics over whole arrays or along an axis.
pub trait Statistics: Send + Sync {
    /// Return the median of all elements. Complex inputs are not supported.
    fn median(&self, a: &Value) -> Result<f64, OpError>;

    /// Return the mean of all elements, optionally weighted by a real array
    /// of the same shape.
    fn average(&self, a: &Value, weights: Option<&Value>) -> Result<Scalar, OpError>;

    /// Return the mean of all elements.
    ///
    /// Integer inputs produce a `Float64` result.
    fn mean(&self, a: &Value) -> Result<Scalar, OpError>;

    fn mean_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError>;
}
