//! Descriptive statistics, evaluated by the default engine.

use ndkit_array::{Dimension, NdArray, RemoveAxis};

use crate::errors::OpError;
use crate::number::Promote;
use crate::registry::stat_engine;
use crate::value::{value_of, ValueElement};

/// Return the median of all elements.
///
/// For an even number of elements this is the mean of the two middle
/// values. Complex inputs are not supported.
pub fn median<T: ValueElement, D: Dimension>(a: &NdArray<T, D>) -> Result<f64, OpError> {
    stat_engine()?.median(&value_of(a))
}

/// Return the mean of all elements.
pub fn mean<T: Promote, D: Dimension>(a: &NdArray<T, D>) -> Result<T::Float, OpError> {
    let mean = stat_engine()?.mean(&value_of(a))?;
    Ok(<T::Float as ValueElement>::from_scalar(mean)?)
}

/// Return the means of elements along `axis`.
pub fn mean_axis<T: Promote, D: RemoveAxis>(
    a: &NdArray<T, D>,
    axis: usize,
) -> Result<NdArray<T::Float, D::Smaller>, OpError> {
    let means = stat_engine()?.mean_axis(&value_of(a), axis)?;
    Ok(means.into_array()?)
}

/// Return the average of all elements, optionally weighted.
///
/// `weights` must have the same shape as `a`. Without weights this is the
/// same as [`mean`].
pub fn average<T: Promote, D: Dimension, W: ValueElement>(
    a: &NdArray<T, D>,
    weights: Option<&NdArray<W, D>>,
) -> Result<T::Float, OpError> {
    let weights = weights.map(value_of);
    let average = stat_engine()?.average(&value_of(a), weights.as_ref())?;
    Ok(<T::Float as ValueElement>::from_scalar(average)?)
}
