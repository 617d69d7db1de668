//! ndkit provides N-dimensional arrays together with math, linear algebra
//! and statistics functions whose implementation is supplied by pluggable
//! engines.
//!
//! # Arrays
//!
//! The array type, [`NdArray`], lives in the [ndkit-array](ndkit_array)
//! crate and is re-exported here. Arrays are tagged with their rank (`D1` to
//! `D4`, or `DN` for a rank which is only known at runtime) and share a
//! reference-counted buffer with any views created from them.
//!
//! ```
//! use ndkit::{D1Array, D2Array};
//!
//! let a = D1Array::from([1, 2, 3]);
//! let b = D1Array::from([10, 20, 30]);
//! assert_eq!(&a + &b, D1Array::from([11, 22, 33]));
//!
//! let m = D1Array::from([1, 2, 3, 4, 5, 6]).reshape([2, 3]).unwrap();
//! assert_eq!(m.reshape([3, 2]).unwrap(), D2Array::from([[1, 2], [3, 4], [5, 6]]));
//! ```
//!
//! # Math, linear algebra and statistics
//!
//! The [`math`], [`linalg`] and [`stat`] modules contain generic functions
//! which convert their inputs to type-erased [`Value`]s and forward them to
//! the default [`Engine`]. Results are converted back to typed arrays.
//!
//! ```
//! use ndkit::{linalg, math, D1Array, D2Array};
//! use ndkit::linalg::Dot;
//!
//! let a = D1Array::from([1, 2, 3, 4, 5]);
//! assert_eq!(math::cum_sum(&a).unwrap(), D1Array::from([1, 3, 6, 10, 15]));
//!
//! let m = D2Array::from([[2f64, 1.], [1., 3.]]);
//! let identity = m.dot(&linalg::inv(&m).unwrap()).unwrap();
//! assert!((identity.get([1, 1]).unwrap() - 1.).abs() < 1e-12);
//! ```
//!
//! # Engines
//!
//! Two engines are built in:
//!
//! - [`PureEngine`] (type `pure`) evaluates every operation on the calling
//!   thread.
//! - [`ParallelEngine`] (type `parallel`) runs reductions, products and
//!   element-wise functions on large inputs in a Rayon thread pool, and
//!   delegates everything else to the pure engine.
//!
//! Additional engines can be added to the [process-wide
//! registry](registry::registry) with
//! [`register`](registry::EngineRegistry::register). The default engine is
//! resolved once, on first use, and every caller observes the same engine
//! from then on.
//!
//! ## Configuration
//!
//! - `NDKIT_ENGINE` selects the default engine by name. If it is unset or
//!   names an engine that is not registered, `parallel` is used if
//!   available, then `pure`.
//! - `NDKIT_NUM_THREADS` sets the size of the thread pool used by the
//!   parallel engine. It defaults to the number of physical cores.
//!
//! The default can also be set programmatically with
//! [`set_default_engine`], provided the default has not been resolved yet.
//!
//! # File I/O
//!
//! The [`io`] module reads and writes arrays as `.npy` or `.csv` files.

mod env;
mod number;
mod threading;

pub mod engine;
pub mod engines;
pub mod errors;
pub mod io;
pub mod kernels;
pub mod linalg;
pub mod math;
pub mod registry;
pub mod stat;
pub mod value;

pub use engine::{Engine, EngineType, LinAlg, LinAlgEx, Math, MathEx, Norm, Statistics};
pub use engines::{ParallelEngine, PureEngine};
pub use errors::OpError;
pub use number::{FloatElement, Magnitude, Promote, RealElement};
pub use registry::{engine, linalg_engine, math_engine, set_default_engine, stat_engine};
pub use threading::{thread_pool, ThreadPool};
pub use value::{CastError, Scalar, Value, ValueElement};

pub use ndkit_array::{
    ArrayError, D1Array, D2Array, D3Array, D4Array, DataType, DnArray, Element, NdArray,
};
