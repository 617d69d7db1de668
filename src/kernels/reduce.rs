//! Reductions over whole arrays and along a single axis.

use ndkit_array::{ArrayError, Element, Shape};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::number::RealElement;

/// Return the sum of elements. Integer sums wrap around on overflow.
pub fn sum<T: Element>(xs: &[T]) -> T {
    xs.iter().fold(T::zero(), |acc, &x| acc.wrapping_add(x))
}

/// Parallel version of [`sum`].
pub fn par_sum<T: Element>(xs: &[T]) -> T {
    xs.par_iter().copied().reduce(T::zero, T::wrapping_add)
}

/// Return the index of the first occurrence of the largest element, or
/// `None` if `xs` is empty.
pub fn arg_max<T: RealElement>(xs: &[T]) -> Option<usize> {
    arg_best(xs, |x, best| x > best)
}

/// Return the index of the first occurrence of the smallest element, or
/// `None` if `xs` is empty.
pub fn arg_min<T: RealElement>(xs: &[T]) -> Option<usize> {
    arg_best(xs, |x, best| x < best)
}

fn arg_best<T: Copy, F: Fn(T, T) -> bool>(xs: &[T], better: F) -> Option<usize> {
    let (first, rest) = xs.split_first()?;
    let mut best_index = 0;
    let mut best = *first;
    for (i, &x) in rest.iter().enumerate() {
        if better(x, best) {
            best = x;
            best_index = i + 1;
        }
    }
    Some(best_index)
}

pub fn max<T: RealElement>(xs: &[T]) -> Option<T> {
    arg_max(xs).map(|i| xs[i])
}

pub fn min<T: RealElement>(xs: &[T]) -> Option<T> {
    arg_min(xs).map(|i| xs[i])
}

/// Return the running totals of `xs`.
pub fn cum_sum<T: Element>(xs: &[T]) -> Vec<T> {
    xs.iter()
        .scan(T::zero(), |acc, &x| {
            *acc = acc.wrapping_add(x);
            Some(*acc)
        })
        .collect()
}

/// Sizes of the blocks of a row-major array on either side of `axis`.
struct AxisSplit {
    /// Product of the sizes of axes before `axis`.
    outer: usize,
    /// Size of `axis`.
    len: usize,
    /// Product of the sizes of axes after `axis`.
    inner: usize,
}

fn split_at_axis(shape: &[usize], axis: usize) -> Result<AxisSplit, ArrayError> {
    if axis >= shape.len() {
        return Err(ArrayError::InvalidAxis {
            axis,
            ndim: shape.len(),
        });
    }
    Ok(AxisSplit {
        outer: shape[..axis].iter().product(),
        len: shape[axis],
        inner: shape[axis + 1..].iter().product(),
    })
}

/// Reduce each lane of a row-major array along `axis` with `reduce`.
///
/// Returns the shape of the output, which is `shape` with `axis` removed,
/// and the reduced values in row-major order. Lanes are passed to `reduce`
/// as contiguous slices.
pub fn reduce_axis<T: Copy, U, F: Fn(&[T]) -> U>(
    data: &[T],
    shape: &[usize],
    axis: usize,
    reduce: F,
) -> Result<(Shape, Vec<U>), ArrayError> {
    let AxisSplit { outer, len, inner } = split_at_axis(shape, axis)?;

    let mut out_shape: Shape = SmallVec::from_slice(shape);
    out_shape.remove(axis);

    let mut lane = Vec::with_capacity(len);
    let mut out = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        let block = &data[o * len * inner..(o + 1) * len * inner];
        for i in 0..inner {
            lane.clear();
            lane.extend((0..len).map(|k| block[k * inner + i]));
            out.push(reduce(&lane));
        }
    }
    Ok((out_shape, out))
}

/// Compute running totals along `axis` of a row-major array.
///
/// The output has the same shape as the input.
pub fn cum_sum_axis<T: Element>(
    data: &[T],
    shape: &[usize],
    axis: usize,
) -> Result<Vec<T>, ArrayError> {
    let AxisSplit { outer, len, inner } = split_at_axis(shape, axis)?;

    let mut out = data.to_vec();
    for o in 0..outer {
        let block = &mut out[o * len * inner..(o + 1) * len * inner];
        for k in 1..len {
            for i in 0..inner {
                let prev = block[(k - 1) * inner + i];
                block[k * inner + i] = block[k * inner + i].wrapping_add(prev);
            }
        }
    }
    Ok(out)
}
