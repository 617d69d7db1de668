use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::zip;

use num_complex::Complex;

use crate::dim::Dimension;
use crate::dtype::Element;
use crate::index_iterator::Indices;
use crate::NdArray;

/// Trait that tests whether two values are approximately equal.
///
/// The comparison takes into account both the absolute difference of the values
/// and the relative difference.
///
/// The behavior of this trait is designed to match NumPy's `np.allclose`.
pub trait ApproxEq: Sized {
    /// Type of the tolerance values.
    type Tolerance: Copy;

    /// Return the default absolute tolerance value.
    fn default_abs_tolerance() -> Self::Tolerance;

    /// Return the default relative tolerance value.
    fn default_rel_tolerance() -> Self::Tolerance;

    /// Test whether `self` is "close" to `other` according to the formula:
    ///
    /// ```text
    /// (self - other).abs() <= atol + rtol * other.abs()
    /// ```
    fn approx_eq_with_atol_rtol(
        &self,
        other: &Self,
        atol: Self::Tolerance,
        rtol: Self::Tolerance,
    ) -> bool;

    /// Test if `other` is approximately equal to `self` with a maximum
    /// absolute difference of `epsilon`.
    fn approx_eq_with_tolerance(&self, other: &Self, epsilon: Self::Tolerance) -> bool {
        self.approx_eq_with_atol_rtol(other, epsilon, Self::default_rel_tolerance())
    }

    /// Test if `other` is approximately equal to `self` with the default
    /// tolerances for this type.
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_with_atol_rtol(
            other,
            Self::default_abs_tolerance(),
            Self::default_rel_tolerance(),
        )
    }
}

macro_rules! impl_approx_eq_float {
    ($type:ty) => {
        impl ApproxEq for $type {
            type Tolerance = $type;

            /// Default that matches `allclose` in NumPy.
            #[inline]
            fn default_abs_tolerance() -> $type {
                1e-8
            }

            /// Default that matches `allclose` in NumPy.
            #[inline]
            fn default_rel_tolerance() -> $type {
                1e-5
            }

            #[inline]
            fn approx_eq_with_atol_rtol(&self, other: &$type, atol: $type, rtol: $type) -> bool {
                (self - other).abs() <= atol + rtol * other.abs()
            }
        }

        impl ApproxEq for Complex<$type> {
            type Tolerance = $type;

            #[inline]
            fn default_abs_tolerance() -> $type {
                1e-8
            }

            #[inline]
            fn default_rel_tolerance() -> $type {
                1e-5
            }

            #[inline]
            fn approx_eq_with_atol_rtol(
                &self,
                other: &Complex<$type>,
                atol: $type,
                rtol: $type,
            ) -> bool {
                (self - other).norm() <= atol + rtol * other.norm()
            }
        }
    };
}

impl_approx_eq_float!(f32);
impl_approx_eq_float!(f64);

macro_rules! impl_approx_eq_int {
    ($type:ty) => {
        impl ApproxEq for $type {
            type Tolerance = $type;

            #[inline]
            fn default_abs_tolerance() -> $type {
                0
            }

            #[inline]
            fn default_rel_tolerance() -> $type {
                0
            }

            #[inline]
            fn approx_eq_with_atol_rtol(&self, other: &$type, atol: $type, rtol: $type) -> bool {
                (self - other).abs() <= atol + rtol * other.abs()
            }
        }
    };
}

impl_approx_eq_int!(i8);
impl_approx_eq_int!(i16);
impl_approx_eq_int!(i32);
impl_approx_eq_int!(i64);

#[derive(Debug)]
pub enum ExpectEqualError {
    ShapeMismatch(String),
    ValueMismatch(String),
}

impl Display for ExpectEqualError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectEqualError::ShapeMismatch(details) => write!(f, "{}", details),
            ExpectEqualError::ValueMismatch(details) => write!(f, "{}", details),
        }
    }
}

impl Error for ExpectEqualError {}

/// Check that the shapes of two arrays are equal and that their contents
/// are approximately equal.
///
/// If there are mismatches, this returns an `Err` with a message indicating
/// the count of mismatches and details of the first N cases.
pub fn expect_equal<T, D>(x: &NdArray<T, D>, y: &NdArray<T, D>) -> Result<(), ExpectEqualError>
where
    T: Element + ApproxEq,
    D: Dimension,
{
    expect_equal_with_tolerance(x, y, T::default_abs_tolerance(), T::default_rel_tolerance())
}

/// Check that the shapes of two arrays are equal and that their contents
/// are approximately equal.
///
/// This is like [expect_equal] but allows custom tolerance values.
pub fn expect_equal_with_tolerance<T, D>(
    x: &NdArray<T, D>,
    y: &NdArray<T, D>,
    atol: T::Tolerance,
    rtol: T::Tolerance,
) -> Result<(), ExpectEqualError>
where
    T: Element + ApproxEq,
    D: Dimension,
{
    if x.shape() != y.shape() {
        return Err(ExpectEqualError::ShapeMismatch(format!(
            "Arrays have different shapes. {:?} vs. {:?}",
            x.shape(),
            y.shape()
        )));
    }

    let mismatches: Vec<_> = zip(Indices::from_shape(x.shape()), zip(x.iter(), y.iter()))
        .filter(|(_, (xi, yi))| !xi.approx_eq_with_atol_rtol(yi, atol, rtol))
        .map(|(index, (xi, yi))| (index.to_vec(), xi, yi))
        .collect();

    if !mismatches.is_empty() {
        let max_examples = 16;
        Err(ExpectEqualError::ValueMismatch(format!(
            "Array values differ at {} of {} indexes: {:?}{}",
            mismatches.len(),
            x.size(),
            &mismatches[..mismatches.len().min(max_examples)],
            if mismatches.len() > max_examples {
                "..."
            } else {
                ""
            }
        )))
    } else {
        Ok(())
    }
}
