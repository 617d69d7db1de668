//! Numeric traits implemented by element types, used to write kernels once
//! for several element types.

use std::ops::Neg;

use ndkit_array::Element;
use num_complex::{Complex, Complex32, Complex64};
use num_traits::{AsPrimitive, Float};

use crate::value::ValueElement;

/// Element types which are ordered, ie. the integer and real float types.
pub trait RealElement: Element + PartialOrd + AsPrimitive<f64> {}

impl<T: Element + PartialOrd + AsPrimitive<f64>> RealElement for T {}

/// Return the absolute value (or modulus, for complex numbers) of an
/// element as an `f64`.
pub trait Magnitude {
    fn magnitude(self) -> f64;
}

macro_rules! impl_magnitude_real {
    ($type:ty) => {
        impl Magnitude for $type {
            fn magnitude(self) -> f64 {
                (self as f64).abs()
            }
        }
    };
}

impl_magnitude_real!(i8);
impl_magnitude_real!(i16);
impl_magnitude_real!(i32);
impl_magnitude_real!(i64);
impl_magnitude_real!(f32);
impl_magnitude_real!(f64);

impl Magnitude for Complex32 {
    fn magnitude(self) -> f64 {
        self.norm() as f64
    }
}

impl Magnitude for Complex64 {
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Real and complex floating point element types.
///
/// These are the element types which decompositions and transcendental
/// functions operate on.
pub trait FloatElement: Element + Neg<Output = Self> + Magnitude {
    /// Type of the real and imaginary parts.
    type Real: Float + RealElement + Magnitude;

    fn from_real(re: Self::Real) -> Self;

    fn from_f64(val: f64) -> Self;

    fn real_from_f64(val: f64) -> Self::Real;

    fn conj(self) -> Self;

    /// Return the absolute value, or modulus for complex numbers.
    fn abs(self) -> Self::Real;

    fn sqrt(self) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;

    fn to_complex(self) -> Complex<Self::Real>;
}

macro_rules! impl_float_element_real {
    ($type:ty) => {
        impl FloatElement for $type {
            type Real = $type;

            fn from_real(re: $type) -> $type {
                re
            }

            fn from_f64(val: f64) -> $type {
                val as $type
            }

            fn real_from_f64(val: f64) -> $type {
                val as $type
            }

            fn conj(self) -> $type {
                self
            }

            fn abs(self) -> $type {
                <$type>::abs(self)
            }

            fn sqrt(self) -> $type {
                <$type>::sqrt(self)
            }

            fn exp(self) -> $type {
                <$type>::exp(self)
            }

            fn ln(self) -> $type {
                <$type>::ln(self)
            }

            fn sin(self) -> $type {
                <$type>::sin(self)
            }

            fn cos(self) -> $type {
                <$type>::cos(self)
            }

            fn to_complex(self) -> Complex<$type> {
                Complex::new(self, 0.)
            }
        }
    };
}

impl_float_element_real!(f32);
impl_float_element_real!(f64);

macro_rules! impl_float_element_complex {
    ($type:ty, $real:ty) => {
        impl FloatElement for $type {
            type Real = $real;

            fn from_real(re: $real) -> $type {
                Complex::new(re, 0.)
            }

            fn from_f64(val: f64) -> $type {
                Complex::new(val as $real, 0.)
            }

            fn real_from_f64(val: f64) -> $real {
                val as $real
            }

            fn conj(self) -> $type {
                Complex::conj(&self)
            }

            fn abs(self) -> $real {
                self.norm()
            }

            fn sqrt(self) -> $type {
                Complex::sqrt(self)
            }

            fn exp(self) -> $type {
                Complex::exp(self)
            }

            fn ln(self) -> $type {
                Complex::ln(self)
            }

            fn sin(self) -> $type {
                Complex::sin(self)
            }

            fn cos(self) -> $type {
                Complex::cos(self)
            }

            fn to_complex(self) -> $type {
                self
            }
        }
    };
}

impl_float_element_complex!(Complex32, f32);
impl_float_element_complex!(Complex64, f64);

/// Maps an element type to the types of results of operations which
/// produce fractional values.
///
/// Integer types are promoted to `f64`. Float and complex types are
/// preserved.
pub trait Promote: ValueElement {
    /// Element type of results such as `exp(x)`, `inv(m)` or `mean(x)`.
    type Float: ValueElement + FloatElement;

    /// Real counterpart of [`Promote::Float`], eg. for singular values.
    type Real: ValueElement + FloatElement;

    /// Complex counterpart of [`Promote::Float`], eg. for eigenvalues.
    type Complex: ValueElement + FloatElement;
}

macro_rules! impl_promote {
    ($type:ty, $float:ty, $real:ty, $complex:ty) => {
        impl Promote for $type {
            type Float = $float;
            type Real = $real;
            type Complex = $complex;
        }
    };
}

impl_promote!(i8, f64, f64, Complex64);
impl_promote!(i16, f64, f64, Complex64);
impl_promote!(i32, f64, f64, Complex64);
impl_promote!(i64, f64, f64, Complex64);
impl_promote!(f32, f32, f32, Complex32);
impl_promote!(f64, f64, f64, Complex64);
impl_promote!(Complex32, Complex32, f32, Complex32);
impl_promote!(Complex64, Complex64, f64, Complex64);

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::{FloatElement, Magnitude};

    #[test]
    fn test_magnitude() {
        assert_eq!((-3i8).magnitude(), 3.);
        assert_eq!((-2.5f32).magnitude(), 2.5);
        assert_eq!(Complex64::new(3., 4.).magnitude(), 5.);
    }

    #[test]
    fn test_float_element() {
        let z = Complex64::new(1., 2.);
        assert_eq!(FloatElement::conj(z), Complex64::new(1., -2.));
        assert_eq!(FloatElement::abs(Complex64::new(3., 4.)), 5.);
        assert_eq!(<f32 as FloatElement>::from_f64(0.5), 0.5f32);
        assert_eq!(2f64.to_complex(), Complex64::new(2., 0.));
    }
}
