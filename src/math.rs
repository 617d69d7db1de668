//! Reductions, scans and element-wise functions, evaluated by the default
//! engine.
//!
//! ```
//! use ndkit::math;
//! use ndkit_array::{D1Array, D2Array};
//!
//! let a = D1Array::from([1, 2, 3, 4, 5]);
//! assert_eq!(math::sum(&a).unwrap(), 15);
//! assert_eq!(math::cum_sum(&a).unwrap(), D1Array::from([1, 3, 6, 10, 15]));
//!
//! let m = D2Array::from([[1, 5], [7, 2]]);
//! assert_eq!(math::arg_max(&m).unwrap(), 2);
//! assert_eq!(math::max_axis(&m, 0).unwrap(), D1Array::from([7, 5]));
//! ```

use ndkit_array::{D1Array, Dimension, NdArray, RemoveAxis};

use crate::errors::OpError;
use crate::number::Promote;
use crate::registry::math_engine;
use crate::value::{value_of, ValueElement};

/// Return the flat row-major index of the first occurrence of the largest
/// element.
pub fn arg_max<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<usize, OpError> {
    math_engine()?.arg_max(&value_of(a))
}

/// Return the flat row-major index of the first occurrence of the smallest
/// element.
pub fn arg_min<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<usize, OpError> {
    math_engine()?.arg_min(&value_of(a))
}

/// Return the indices of the largest elements along `axis`.
pub fn arg_max_axis<T: ValueElement, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<i64, D::Smaller>, OpError> {
    let indices = math_engine()?.arg_max_axis(&value_of(a), axis)?;
    Ok(indices.into_array()?)
}

/// Return the indices of the smallest elements along `axis`.
pub fn arg_min_axis<T: ValueElement, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<i64, D::Smaller>, OpError> {
    let indices = math_engine()?.arg_min_axis(&value_of(a), axis)?;
    Ok(indices.into_array()?)
}

pub fn max<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<T, OpError> {
    let max = math_engine()?.max(&value_of(a))?;
    Ok(T::from_scalar(max)?)
}

pub fn min<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<T, OpError> {
    let min = math_engine()?.min(&value_of(a))?;
    Ok(T::from_scalar(min)?)
}

pub fn max_axis<T: ValueElement, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<T, D::Smaller>, OpError> {
    let max = math_engine()?.max_axis(&value_of(a), axis)?;
    Ok(max.into_array()?)
}

pub fn min_axis<T: ValueElement, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<T, D::Smaller>, OpError> {
    let min = math_engine()?.min_axis(&value_of(a), axis)?;
    Ok(min.into_array()?)
}

/// Return the sum of all elements.
pub fn sum<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<T, OpError> {
    let sum = math_engine()?.sum(&value_of(a))?;
    Ok(T::from_scalar(sum)?)
}

/// Return the sums of elements along `axis`.
pub fn sum_axis<T: ValueElement, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<T, D::Smaller>, OpError> {
    let sums = math_engine()?.sum_axis(&value_of(a), axis)?;
    Ok(sums.into_array()?)
}

/// Return the running totals of the elements in row-major order.
pub fn cum_sum<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<D1Array<T>, OpError> {
    let sums = math_engine()?.cum_sum(&value_of(a), None)?;
    Ok(sums.into_array()?)
}

/// Return the running totals along `axis`.
pub fn cum_sum_axis<T: ValueElement, D: Dimension>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<T, D>, OpError> {
    let sums = math_engine()?.cum_sum(&value_of(a), Some(axis))?;
    Ok(sums.into_array()?)
}

/// Compute `e^x` for each element.
pub fn exp<T: Promote, D: Dimension>(a: &NdArray<T, D>) -> Result<NdArray<T::Float, D>, OpError> {
    let result = math_engine()?.math_ex().exp(&value_of(a))?;
    Ok(result.into_array()?)
}

/// Compute the natural logarithm of each element.
pub fn log<T: Promote, D: Dimension>(a: &NdArray<T, D>) -> Result<NdArray<T::Float, D>, OpError> {
    let result = math_engine()?.math_ex().log(&value_of(a))?;
    Ok(result.into_array()?)
}

pub fn sin<T: Promote, D: Dimension>(a: &NdArray<T, D>) -> Result<NdArray<T::Float, D>, OpError> {
    let result = math_engine()?.math_ex().sin(&value_of(a))?;
    Ok(result.into_array()?)
}

pub fn cos<T: Promote, D: Dimension>(a: &NdArray<T, D>) -> Result<NdArray<T::Float, D>, OpError> {
    let result = math_engine()?.math_ex().cos(&value_of(a))?;
    Ok(result.into_array()?)
}
