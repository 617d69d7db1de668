use ndkit_array::{ArrayError, Cast, DnArray, Element};
use rayon::prelude::*;

use crate::engine::{Engine, EngineType, LinAlg, LinAlgEx, Math, MathEx, Norm, Statistics};
use crate::errors::OpError;
use crate::kernels::decomp::{inv, lu, qr, solve};
use crate::kernels::eig::{eig, Eig};
use crate::kernels::matmul::{dot, matmul, matrix_power, par_dot, par_matmul};
use crate::kernels::matrix::Matrix;
use crate::kernels::reduce;
use crate::kernels::stats::{self, AverageError};
use crate::kernels::svd::{svd, Svd};
use crate::number::{FloatElement, Magnitude, Promote, RealElement};
use crate::value::{Scalar, Value, ValueElement};

use super::{matrix_from, matrix_value, new_value, promote, square_matrix_from, type_mismatch};

const EMPTY_ARRAY: OpError = OpError::InvalidValue("array is empty");
const EMPTY_AXIS: OpError = OpError::InvalidValue("cannot reduce an axis of size 0");

/// Whether a kernel runs on the calling thread or on the current Rayon
/// thread pool.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum Exec {
    Sequential,
    Parallel,
}

/// Engine which evaluates every operation with single-threaded generic
/// kernels.
///
/// This engine is always registered and supports every element type.
#[derive(Debug, Default)]
pub struct PureEngine {}

impl PureEngine {
    pub fn new() -> PureEngine {
        PureEngine {}
    }
}

impl Engine for PureEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::PURE
    }

    fn math(&self) -> &dyn Math {
        self
    }

    fn linalg(&self) -> &dyn LinAlg {
        self
    }

    fn stat(&self) -> &dyn Statistics {
        self
    }
}

fn arg_reduce<T: RealElement>(
    array: &DnArray<T>,
    reducer: fn(&[T]) -> Option<usize>,
) -> Result<usize, OpError> {
    reducer(&array.to_vec()).ok_or(EMPTY_ARRAY)
}

fn arg_reduce_axis<T: RealElement>(
    array: &DnArray<T>,
    axis: usize,
    reducer: fn(&[T]) -> Option<usize>,
) -> Result<Value, OpError> {
    let (shape, indices) = reduce::reduce_axis(&array.to_vec(), array.shape(), axis, |lane| {
        reducer(lane).map(|i| i as i64)
    })?;
    let indices: Option<Vec<i64>> = indices.into_iter().collect();
    new_value(&shape, indices.ok_or(EMPTY_AXIS)?)
}

fn value_reduce<T: RealElement + ValueElement>(
    array: &DnArray<T>,
    reducer: fn(&[T]) -> Option<T>,
) -> Result<Scalar, OpError> {
    reducer(&array.to_vec())
        .map(T::into_scalar)
        .ok_or(EMPTY_ARRAY)
}

fn value_reduce_axis<T: RealElement + ValueElement>(
    array: &DnArray<T>,
    axis: usize,
    reducer: fn(&[T]) -> Option<T>,
) -> Result<Value, OpError> {
    let (shape, values) = reduce::reduce_axis(&array.to_vec(), array.shape(), axis, |lane| {
        reducer(lane)
    })?;
    let values: Option<Vec<T>> = values.into_iter().collect();
    new_value(&shape, values.ok_or(EMPTY_AXIS)?)
}

pub(super) fn sum_typed<T: ValueElement>(array: &DnArray<T>, exec: Exec) -> Scalar {
    let data = array.to_vec();
    let total = match exec {
        Exec::Sequential => reduce::sum(&data),
        Exec::Parallel => reduce::par_sum(&data),
    };
    total.into_scalar()
}

fn sum_axis_typed<T: ValueElement>(array: &DnArray<T>, axis: usize) -> Result<Value, OpError> {
    let (shape, sums) = reduce::reduce_axis(&array.to_vec(), array.shape(), axis, |lane| {
        reduce::sum(lane)
    })?;
    new_value(&shape, sums)
}

fn cum_sum_typed<T: ValueElement>(array: &DnArray<T>, axis: Option<usize>) -> Result<Value, OpError> {
    let data = array.to_vec();
    match axis {
        None => new_value(&[data.len()], reduce::cum_sum(&data)),
        Some(axis) => {
            let sums = reduce::cum_sum_axis(&data, array.shape(), axis)?;
            new_value(array.shape(), sums)
        }
    }
}

pub(super) fn map_float<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
    f: fn(T) -> T,
    exec: Exec,
) -> Result<Value, OpError> {
    match exec {
        Exec::Sequential => Ok(T::into_value(array.map(f))),
        Exec::Parallel => {
            let data: Vec<T> = array.to_vec().into_par_iter().map(f).collect();
            new_value(array.shape(), data)
        }
    }
}

pub(super) fn dot_typed<T: ValueElement>(
    a: &DnArray<T>,
    b: &DnArray<T>,
    exec: Exec,
) -> Result<Value, OpError> {
    let (x, y) = (a.to_vec(), b.to_vec());
    let mm: fn(&[T], usize, usize, &[T], usize) -> Vec<T> = match exec {
        Exec::Sequential => matmul,
        Exec::Parallel => par_matmul,
    };
    let shape_mismatch = || {
        OpError::Array(ArrayError::ShapeMismatch {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
        })
    };

    match (a.shape(), b.shape()) {
        (&[k], &[k2]) => {
            if k != k2 {
                return Err(shape_mismatch());
            }
            let product = match exec {
                Exec::Sequential => dot(&x, &y),
                Exec::Parallel => par_dot(&x, &y),
            };
            Ok(T::into_value(DnArray::scalar(product)))
        }
        (&[m, k], &[k2]) => {
            if k != k2 {
                return Err(shape_mismatch());
            }
            new_value(&[m], mm(&x, m, k, &y, 1))
        }
        (&[k], &[k2, n]) => {
            if k != k2 {
                return Err(shape_mismatch());
            }
            new_value(&[n], mm(&x, 1, k, &y, n))
        }
        (&[m, k], &[k2, n]) => {
            if k != k2 {
                return Err(shape_mismatch());
            }
            new_value(&[m, n], mm(&x, m, k, &y, n))
        }
        _ => Err(OpError::InvalidValue(
            "dot operands must be vectors or matrices",
        )),
    }
}

fn pow_typed<T: ValueElement>(array: &DnArray<T>, n: u32) -> Result<Value, OpError> {
    let mat = square_matrix_from(array)?;
    let size = mat.rows();
    new_value(&[size, size], matrix_power(mat.data(), size, n))
}

fn norm_typed<T: Element + Magnitude>(array: &DnArray<T>, norm: Norm) -> Result<f64, OpError> {
    let mat = matrix_from(array)?;
    let (rows, cols) = (mat.rows(), mat.cols());
    let mags: Vec<f64> = mat.data().iter().map(|x| x.magnitude()).collect();

    let value = match norm {
        Norm::Fro => mags.iter().map(|x| x * x).sum::<f64>().sqrt(),
        Norm::Max => mags.iter().fold(0f64, |acc, &x| acc.max(x)),
        Norm::Inf => mags
            .chunks(cols.max(1))
            .map(|row| row.iter().sum::<f64>())
            .fold(0f64, f64::max),
        Norm::N1 => (0..cols)
            .map(|j| (0..rows).map(|i| mags[i * cols + j]).sum::<f64>())
            .fold(0f64, f64::max),
    };
    Ok(value)
}

fn inv_typed<T: FloatElement + ValueElement>(array: &DnArray<T>) -> Result<Value, OpError> {
    let mat = square_matrix_from(array)?;
    matrix_value(inv(&mat)?)
}

fn solve_typed<T: FloatElement + ValueElement>(
    a: &DnArray<T>,
    b: &DnArray<T>,
) -> Result<Value, OpError> {
    let mat = square_matrix_from(a)?;
    let (rhs, is_vector) = match *b.shape() {
        [n] => (Matrix::from_vec(n, 1, b.to_vec()), true),
        [n, k] => (Matrix::from_vec(n, k, b.to_vec()), false),
        _ => {
            return Err(OpError::InvalidValue(
                "right-hand side must be a vector or matrix",
            ))
        }
    };
    if rhs.rows() != mat.rows() {
        return Err(ArrayError::ShapeMismatch {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
        }
        .into());
    }

    let x = solve(&mat, &rhs)?;
    if is_vector {
        new_value(&[x.rows()], x.data().to_vec())
    } else {
        matrix_value(x)
    }
}

fn qr_typed<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
) -> Result<(Value, Value), OpError> {
    let (q, r) = qr(&matrix_from(array)?);
    Ok((matrix_value(q)?, matrix_value(r)?))
}

fn plu_typed<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
) -> Result<(Value, Value, Value), OpError> {
    let decomp = lu(&matrix_from(array)?);
    let p = decomp.permutation_matrix();
    Ok((
        matrix_value(p)?,
        matrix_value(decomp.l)?,
        matrix_value(decomp.u)?,
    ))
}

fn svd_typed<T>(array: &DnArray<T>) -> Result<(Value, Value, Value), OpError>
where
    T: FloatElement + ValueElement,
    T::Real: ValueElement,
{
    let Svd { u, s, vh } = svd(&matrix_from(array)?)?;
    Ok((matrix_value(u)?, new_value(&[s.len()], s)?, matrix_value(vh)?))
}

fn eig_typed<T: Promote + Cast<T::Complex>>(array: &DnArray<T>) -> Result<(Value, Value), OpError> {
    let mat = square_matrix_from(array)?;
    let n = mat.rows();
    let data: Vec<T::Complex> = mat.data().iter().map(|&x| x.cast()).collect();
    let Eig { values, vectors } = eig(&Matrix::from_vec(n, n, data))?;
    Ok((new_value(&[n], values)?, matrix_value(vectors)?))
}

fn median_typed<T: RealElement>(array: &DnArray<T>) -> Result<f64, OpError> {
    stats::median(&array.to_vec()).ok_or(EMPTY_ARRAY)
}

pub(super) fn mean_typed<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
    exec: Exec,
) -> Result<Scalar, OpError> {
    let data = array.to_vec();
    let mean = match exec {
        Exec::Sequential => stats::mean(&data),
        Exec::Parallel => stats::par_mean(&data),
    };
    mean.map(T::into_scalar).ok_or(EMPTY_ARRAY)
}

fn mean_axis_typed<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
    axis: usize,
) -> Result<Value, OpError> {
    let (shape, means) = reduce::reduce_axis(&array.to_vec(), array.shape(), axis, |lane| {
        stats::mean(lane)
    })?;
    let means: Option<Vec<T>> = means.into_iter().collect();
    new_value(&shape, means.ok_or(EMPTY_AXIS)?)
}

fn average_typed<T: FloatElement + ValueElement>(
    array: &DnArray<T>,
    weights: &[f64],
) -> Result<Scalar, OpError> {
    stats::weighted_average(&array.to_vec(), weights)
        .map(T::into_scalar)
        .map_err(|err| match err {
            AverageError::Empty => EMPTY_ARRAY,
            AverageError::LengthMismatch => {
                OpError::InvalidValue("weights must have one element per input element")
            }
            AverageError::ZeroWeight => OpError::InvalidValue("weights sum to zero"),
        })
}

/// Convert average weights to `f64`. Complex weights are not supported.
fn weights_vec(weights: &Value) -> Result<Vec<f64>, OpError> {
    if weights.dtype().is_complex() {
        return Err(OpError::UnsupportedType(weights.dtype()));
    }
    let weights: DnArray<f64> = weights
        .as_type(ndkit_array::DataType::Float64)?
        .into_array()?;
    Ok(weights.to_vec())
}

impl Math for PureEngine {
    fn arg_max(&self, a: &Value) -> Result<usize, OpError> {
        dispatch_real!(a, array => arg_reduce(array, reduce::arg_max))
    }

    fn arg_min(&self, a: &Value) -> Result<usize, OpError> {
        dispatch_real!(a, array => arg_reduce(array, reduce::arg_min))
    }

    fn arg_max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        dispatch_real!(a, array => arg_reduce_axis(array, axis, reduce::arg_max))
    }

    fn arg_min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        dispatch_real!(a, array => arg_reduce_axis(array, axis, reduce::arg_min))
    }

    fn max(&self, a: &Value) -> Result<Scalar, OpError> {
        dispatch_real!(a, array => value_reduce(array, reduce::max))
    }

    fn min(&self, a: &Value) -> Result<Scalar, OpError> {
        dispatch_real!(a, array => value_reduce(array, reduce::min))
    }

    fn max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        dispatch_real!(a, array => value_reduce_axis(array, axis, reduce::max))
    }

    fn min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        dispatch_real!(a, array => value_reduce_axis(array, axis, reduce::min))
    }

    fn sum(&self, a: &Value) -> Result<Scalar, OpError> {
        dispatch_all!(a, array => Ok(sum_typed(array, Exec::Sequential)))
    }

    fn sum_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        dispatch_all!(a, array => sum_axis_typed(array, axis))
    }

    fn cum_sum(&self, a: &Value, axis: Option<usize>) -> Result<Value, OpError> {
        dispatch_all!(a, array => cum_sum_typed(array, axis))
    }

    fn math_ex(&self) -> &dyn MathEx {
        self
    }
}

impl MathEx for PureEngine {
    fn exp(&self, a: &Value) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => map_float(array, FloatElement::exp, Exec::Sequential))
    }

    fn log(&self, a: &Value) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => map_float(array, FloatElement::ln, Exec::Sequential))
    }

    fn sin(&self, a: &Value) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => map_float(array, FloatElement::sin, Exec::Sequential))
    }

    fn cos(&self, a: &Value) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => map_float(array, FloatElement::cos, Exec::Sequential))
    }
}

impl LinAlg for PureEngine {
    fn dot(&self, a: &Value, b: &Value) -> Result<Value, OpError> {
        dispatch_pair!(a, b, (x, y) => dot_typed(x, y, Exec::Sequential))
    }

    fn inv(&self, a: &Value) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => inv_typed(array))
    }

    fn pow(&self, a: &Value, n: u32) -> Result<Value, OpError> {
        dispatch_all!(a, array => pow_typed(array, n))
    }

    fn norm(&self, a: &Value, norm: Norm) -> Result<f64, OpError> {
        dispatch_all!(a, array => norm_typed(array, norm))
    }

    fn linalg_ex(&self) -> &dyn LinAlgEx {
        self
    }
}

impl LinAlgEx for PureEngine {
    fn qr(&self, a: &Value) -> Result<(Value, Value), OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => qr_typed(array))
    }

    fn plu(&self, a: &Value) -> Result<(Value, Value, Value), OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => plu_typed(array))
    }

    fn svd(&self, a: &Value) -> Result<(Value, Value, Value), OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => svd_typed(array))
    }

    fn eig(&self, a: &Value) -> Result<(Value, Value), OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => eig_typed(array))
    }

    fn solve(&self, a: &Value, b: &Value) -> Result<Value, OpError> {
        let (a, b) = (promote(a)?, promote(b)?);
        if a.dtype() != b.dtype() {
            return Err(type_mismatch(&b, &a));
        }
        dispatch_float_pair!(&a, &b, (x, y) => solve_typed(x, y))
    }
}

impl Statistics for PureEngine {
    fn median(&self, a: &Value) -> Result<f64, OpError> {
        dispatch_real!(a, array => median_typed(array))
    }

    fn average(&self, a: &Value, weights: Option<&Value>) -> Result<Scalar, OpError> {
        let Some(weights) = weights else {
            return self.mean(a);
        };
        if weights.shape() != a.shape() {
            return Err(ArrayError::ShapeMismatch {
                left: a.shape().to_vec(),
                right: weights.shape().to_vec(),
            }
            .into());
        }
        let weights = weights_vec(weights)?;
        let a = promote(a)?;
        dispatch_float!(&a, array => average_typed(array, &weights))
    }

    fn mean(&self, a: &Value) -> Result<Scalar, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => mean_typed(array, Exec::Sequential))
    }

    fn mean_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        let a = promote(a)?;
        dispatch_float!(&a, array => mean_axis_typed(array, axis))
    }
}
