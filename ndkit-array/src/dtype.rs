//! Element types that can be stored in arrays.

use std::fmt;
use std::fmt::Debug;

use num_complex::{Complex32, Complex64};
use num_traits::Num;

/// Enum specifying the element type of an array.
///
/// The native codes returned by [`DataType::native_code`] are part of the
/// persisted format of arrays and of the boundary with native engines, so
/// they never change.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    ComplexFloat32,
    ComplexFloat64,
}

impl DataType {
    /// All data types, in order of native code.
    pub const ALL: [DataType; 8] = [
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
        DataType::ComplexFloat32,
        DataType::ComplexFloat64,
    ];

    /// Return the size of elements of this type in bytes.
    pub fn item_size(self) -> usize {
        match self {
            DataType::Int8 => 1,
            DataType::Int16 => 2,
            DataType::Int32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::Float64 | DataType::ComplexFloat32 => 8,
            DataType::ComplexFloat64 => 16,
        }
    }

    /// Return the stable numeric code identifying this type.
    pub fn native_code(self) -> i32 {
        match self {
            DataType::Int8 => 1,
            DataType::Int16 => 2,
            DataType::Int32 => 3,
            DataType::Int64 => 4,
            DataType::Float32 => 5,
            DataType::Float64 => 6,
            DataType::ComplexFloat32 => 7,
            DataType::ComplexFloat64 => 8,
        }
    }

    /// Look up a data type by its native code.
    pub fn from_native_code(code: i32) -> Option<DataType> {
        Self::ALL.into_iter().find(|dtype| dtype.native_code() == code)
    }

    /// Return true if this is a real (integer or floating point) type.
    pub fn is_number(self) -> bool {
        !self.is_complex()
    }

    /// Return true if this is a complex type.
    pub fn is_complex(self) -> bool {
        matches!(self, DataType::ComplexFloat32 | DataType::ComplexFloat64)
    }

    /// Return true if this is a real or complex floating point type.
    pub fn is_float(self) -> bool {
        !matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }
}

impl fmt::Display for DataType {
    /// Format this enum value in the style of the corresponding Rust type (eg.
    /// "i32" for `DataType::Int32`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "i8",
            DataType::Int16 => "i16",
            DataType::Int32 => "i32",
            DataType::Int64 => "i64",
            DataType::Float32 => "f32",
            DataType::Float64 => "f64",
            DataType::ComplexFloat32 => "c32",
            DataType::ComplexFloat64 => "c64",
        };
        write!(f, "{}", name)
    }
}

/// Trait for types which can be stored in an array.
///
/// This is implemented for exactly one Rust type per [`DataType`].
pub trait Element:
    Copy + Clone + Debug + Default + PartialEq + Num + Send + Sync + 'static
{
    /// The data type tag for this element type.
    const DTYPE: DataType;

    /// Add two elements. Integer addition wraps around on overflow.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Multiply two elements. Integer multiplication wraps around on
    /// overflow.
    fn wrapping_mul(self, rhs: Self) -> Self;
}

macro_rules! impl_element_int {
    ($type:ty, $dtype:ident) => {
        impl Element for $type {
            const DTYPE: DataType = DataType::$dtype;

            fn wrapping_add(self, rhs: Self) -> Self {
                <$type>::wrapping_add(self, rhs)
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                <$type>::wrapping_mul(self, rhs)
            }
        }
    };
}

macro_rules! impl_element_float {
    ($type:ty, $dtype:ident) => {
        impl Element for $type {
            const DTYPE: DataType = DataType::$dtype;

            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    };
}

impl_element_int!(i8, Int8);
impl_element_int!(i16, Int16);
impl_element_int!(i32, Int32);
impl_element_int!(i64, Int64);
impl_element_float!(f32, Float32);
impl_element_float!(f64, Float64);
impl_element_float!(Complex32, ComplexFloat32);
impl_element_float!(Complex64, ComplexFloat64);

/// Element conversions in the style of Rust's `as` casts.
///
/// Real to real conversions use `as` (truncating towards zero when narrowing
/// floats to ints, wrapping when narrowing ints). Real to complex conversions
/// set the imaginary part to zero. There is no conversion from complex to
/// real types.
pub trait Cast<T> {
    /// Convert `self` to type T.
    fn cast(self) -> T;
}

macro_rules! impl_cast_real {
    ($src:ty => $($dest:ty),+) => {
        $(
            impl Cast<$dest> for $src {
                #[inline]
                fn cast(self) -> $dest {
                    self as $dest
                }
            }
        )+

        impl Cast<Complex32> for $src {
            #[inline]
            fn cast(self) -> Complex32 {
                Complex32::new(self as f32, 0.)
            }
        }

        impl Cast<Complex64> for $src {
            #[inline]
            fn cast(self) -> Complex64 {
                Complex64::new(self as f64, 0.)
            }
        }
    };
}

impl_cast_real!(i8 => i8, i16, i32, i64, f32, f64);
impl_cast_real!(i16 => i8, i16, i32, i64, f32, f64);
impl_cast_real!(i32 => i8, i16, i32, i64, f32, f64);
impl_cast_real!(i64 => i8, i16, i32, i64, f32, f64);
impl_cast_real!(f32 => i8, i16, i32, i64, f32, f64);
impl_cast_real!(f64 => i8, i16, i32, i64, f32, f64);

impl Cast<Complex32> for Complex32 {
    #[inline]
    fn cast(self) -> Complex32 {
        self
    }
}

impl Cast<Complex64> for Complex32 {
    #[inline]
    fn cast(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }
}

impl Cast<Complex32> for Complex64 {
    #[inline]
    fn cast(self) -> Complex32 {
        Complex32::new(self.re as f32, self.im as f32)
    }
}

impl Cast<Complex64> for Complex64 {
    #[inline]
    fn cast(self) -> Complex64 {
        self
    }
}
