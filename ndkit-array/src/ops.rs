//! Element-wise arithmetic operators for arrays.
//!
//! Binary operators require both operands to have the same shape. The
//! operator traits panic on a mismatch, the `try_*` methods return an error
//! instead. Scalars apply uniformly to every element.

use std::iter::zip;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::{Complex32, Complex64};

use crate::dim::Dimension;
use crate::dtype::Element;
use crate::errors::ArrayError;
use crate::NdArray;

impl<T: Element, D: Dimension> NdArray<T, D> {
    fn check_same_shape(&self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        if self.shape() != other.shape() {
            return Err(ArrayError::ShapeMismatch {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }
        Ok(())
    }

    fn zip_with<F: Fn(T, T) -> T>(&self, other: &NdArray<T, D>, f: F) -> Result<Self, ArrayError> {
        self.check_same_shape(other)?;
        let data = zip(self.iter(), other.iter()).map(|(x, y)| f(x, y)).collect();
        Ok(Self::from_shape_and_vec(self.shape(), data))
    }

    fn zip_assign<F: Fn(T, T) -> T>(&mut self, other: &NdArray<T, D>, f: F) -> Result<(), ArrayError> {
        self.check_same_shape(other)?;

        // Snapshot `other` first, since it may share this array's buffer.
        let values = other.to_vec();
        self.zip_apply(&values, f);
        Ok(())
    }

    /// Add corresponding elements of two arrays with the same shape.
    pub fn try_add(&self, other: &NdArray<T, D>) -> Result<Self, ArrayError> {
        self.zip_with(other, |x, y| x + y)
    }

    /// Subtract corresponding elements of two arrays with the same shape.
    pub fn try_sub(&self, other: &NdArray<T, D>) -> Result<Self, ArrayError> {
        self.zip_with(other, |x, y| x - y)
    }

    /// Multiply corresponding elements of two arrays with the same shape.
    pub fn try_mul(&self, other: &NdArray<T, D>) -> Result<Self, ArrayError> {
        self.zip_with(other, |x, y| x * y)
    }

    /// Divide corresponding elements of two arrays with the same shape.
    ///
    /// Integer division truncates toward zero.
    pub fn try_div(&self, other: &NdArray<T, D>) -> Result<Self, ArrayError> {
        self.zip_with(other, |x, y| x / y)
    }

    /// In-place version of [`NdArray::try_add`].
    ///
    /// The result is written to this array's buffer, so it is visible
    /// through every view which shares it.
    pub fn try_add_assign(&mut self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        self.zip_assign(other, |x, y| x + y)
    }

    /// In-place version of [`NdArray::try_sub`].
    pub fn try_sub_assign(&mut self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        self.zip_assign(other, |x, y| x - y)
    }

    /// In-place version of [`NdArray::try_mul`].
    pub fn try_mul_assign(&mut self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        self.zip_assign(other, |x, y| x * y)
    }

    /// In-place version of [`NdArray::try_div`].
    pub fn try_div_assign(&mut self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        self.zip_assign(other, |x, y| x / y)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $try_method:ident, $op:tt) => {
        impl<T: Element, D: Dimension> $trait<&NdArray<T, D>> for &NdArray<T, D> {
            type Output = NdArray<T, D>;

            /// Panics if the shapes of the operands differ.
            fn $method(self, rhs: &NdArray<T, D>) -> NdArray<T, D> {
                self.$try_method(rhs).unwrap_or_else(|err| panic!("{}", err))
            }
        }

        impl<T: Element, D: Dimension> $trait<&NdArray<T, D>> for NdArray<T, D> {
            type Output = NdArray<T, D>;

            fn $method(self, rhs: &NdArray<T, D>) -> NdArray<T, D> {
                (&self).$method(rhs)
            }
        }

        impl<T: Element, D: Dimension> $trait<NdArray<T, D>> for NdArray<T, D> {
            type Output = NdArray<T, D>;

            fn $method(self, rhs: NdArray<T, D>) -> NdArray<T, D> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Element, D: Dimension> $trait<T> for &NdArray<T, D> {
            type Output = NdArray<T, D>;

            fn $method(self, rhs: T) -> NdArray<T, D> {
                self.map(|x| x $op rhs)
            }
        }

        impl<T: Element, D: Dimension> $trait<T> for NdArray<T, D> {
            type Output = NdArray<T, D>;

            fn $method(self, rhs: T) -> NdArray<T, D> {
                self.map(|x| x $op rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, try_add, +);
impl_binary_op!(Sub, sub, try_sub, -);
impl_binary_op!(Mul, mul, try_mul, *);
impl_binary_op!(Div, div, try_div, /);

// Operators with the scalar on the left can't be implemented generically
// over `T`, so they are implemented for each element type.
macro_rules! impl_scalar_lhs_op {
    ($trait:ident, $method:ident, $op:tt, [$($ty:ty),*]) => {
        $(
            impl<D: Dimension> $trait<&NdArray<$ty, D>> for $ty {
                type Output = NdArray<$ty, D>;

                fn $method(self, rhs: &NdArray<$ty, D>) -> NdArray<$ty, D> {
                    rhs.map(|x| self $op x)
                }
            }

            impl<D: Dimension> $trait<NdArray<$ty, D>> for $ty {
                type Output = NdArray<$ty, D>;

                fn $method(self, rhs: NdArray<$ty, D>) -> NdArray<$ty, D> {
                    rhs.map(|x| self $op x)
                }
            }
        )*
    };
}

macro_rules! impl_scalar_lhs_ops {
    ($($ty:ty),*) => {
        impl_scalar_lhs_op!(Add, add, +, [$($ty),*]);
        impl_scalar_lhs_op!(Sub, sub, -, [$($ty),*]);
        impl_scalar_lhs_op!(Mul, mul, *, [$($ty),*]);
        impl_scalar_lhs_op!(Div, div, /, [$($ty),*]);
    };
}

impl_scalar_lhs_ops!(i8, i16, i32, i64, f32, f64, Complex32, Complex64);

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $try_method:ident, $op:tt) => {
        impl<T: Element, D: Dimension> $trait<&NdArray<T, D>> for NdArray<T, D> {
            /// Panics if the shapes of the operands differ.
            fn $method(&mut self, rhs: &NdArray<T, D>) {
                if let Err(err) = self.$try_method(rhs) {
                    panic!("{}", err);
                }
            }
        }

        impl<T: Element, D: Dimension> $trait<T> for NdArray<T, D> {
            fn $method(&mut self, rhs: T) {
                self.apply(|x| x $op rhs);
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, try_add_assign, +);
impl_assign_op!(SubAssign, sub_assign, try_sub_assign, -);
impl_assign_op!(MulAssign, mul_assign, try_mul_assign, *);
impl_assign_op!(DivAssign, div_assign, try_div_assign, /);

impl<T: Element + Neg<Output = T>, D: Dimension> Neg for &NdArray<T, D> {
    type Output = NdArray<T, D>;

    fn neg(self) -> NdArray<T, D> {
        self.map(|x| -x)
    }
}

impl<T: Element + Neg<Output = T>, D: Dimension> Neg for NdArray<T, D> {
    type Output = NdArray<T, D>;

    fn neg(self) -> NdArray<T, D> {
        -&self
    }
}
