//! Statistics over sequences of elements.

use num_traits::AsPrimitive;

use crate::number::{FloatElement, RealElement};

use super::reduce::{par_sum, sum};

/// Return the median of `xs`, or `None` if it is empty.
///
/// For an even number of elements this is the mean of the two middle
/// elements.
pub fn median<T: RealElement>(xs: &[T]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = xs.iter().map(|x| x.as_()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.)
    }
}

/// Return the arithmetic mean of `xs`, or `None` if it is empty.
pub fn mean<T: FloatElement>(xs: &[T]) -> Option<T> {
    if xs.is_empty() {
        return None;
    }
    Some(sum(xs) / T::from_f64(xs.len() as f64))
}

/// Parallel version of [`mean`].
pub fn par_mean<T: FloatElement>(xs: &[T]) -> Option<T> {
    if xs.is_empty() {
        return None;
    }
    Some(par_sum(xs) / T::from_f64(xs.len() as f64))
}

/// Errors from computing a weighted average.
#[derive(Debug, PartialEq)]
pub enum AverageError {
    Empty,
    LengthMismatch,
    ZeroWeight,
}

/// Return the mean of `xs` weighted by `weights`.
pub fn weighted_average<T: FloatElement>(xs: &[T], weights: &[f64]) -> Result<T, AverageError> {
    if xs.is_empty() {
        return Err(AverageError::Empty);
    }
    if xs.len() != weights.len() {
        return Err(AverageError::LengthMismatch);
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0. {
        return Err(AverageError::ZeroWeight);
    }
    let weighted_sum = xs
        .iter()
        .zip(weights)
        .fold(T::zero(), |acc, (&x, &w)| acc + x * T::from_f64(w));
    Ok(weighted_sum / T::from_f64(total_weight))
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::{mean, median, par_mean, weighted_average, AverageError};

    #[test]
    fn test_median() {
        assert_eq!(median(&[3, 1, 2]), Some(2.));
        assert_eq!(median(&[4., 1., 3., 2.]), Some(2.5));
        assert_eq!(median::<i32>(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1., 2., 3., 4.]), Some(2.5));
        assert_eq!(par_mean(&[1f32, 2., 3., 4.]), Some(2.5));
        assert_eq!(
            mean(&[Complex64::new(1., 1.), Complex64::new(3., -1.)]),
            Some(Complex64::new(2., 0.))
        );
        assert_eq!(mean::<f64>(&[]), None);
    }

    #[test]
    fn test_weighted_average() {
        assert_eq!(weighted_average(&[1., 2., 3.], &[3., 1., 0.]), Ok(1.25));
        assert_eq!(
            weighted_average(&[1., 2.], &[1.]),
            Err(AverageError::LengthMismatch)
        );
        assert_eq!(
            weighted_average(&[1., 2.], &[1., -1.]),
            Err(AverageError::ZeroWeight)
        );
    }
}
