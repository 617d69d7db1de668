//! Type-erased arrays and scalars, used at the boundary between the typed
//! API and engines.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use ndkit_array::{ArrayError, Cast, DataType, Dimension, DnArray, Element, NdArray};
use num_complex::{Complex32, Complex64};

/// Errors when converting a [`Value`] or [`Scalar`] to a value of a specific
/// type and/or rank.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CastError {
    /// The number of dimensions does not match.
    WrongRank { actual: usize, expected: usize },

    /// The data type of elements does not match.
    WrongType {
        actual: DataType,
        expected: DataType,
    },
}

impl Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongRank { actual, expected } => {
                write!(
                    f,
                    "expected array with {} dims but has {} dims",
                    expected, actual
                )
            }
            Self::WrongType { actual, expected } => {
                write!(
                    f,
                    "expected array with type {} but has type {}",
                    expected, actual
                )
            }
        }
    }
}

impl Error for CastError {}

/// An array whose element type is determined at runtime.
///
/// Converting a typed array into a `Value` and back does not copy the
/// elements. The `Value` shares the buffer of the array it was created from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(DnArray<i8>),
    Int16(DnArray<i16>),
    Int32(DnArray<i32>),
    Int64(DnArray<i64>),
    Float32(DnArray<f32>),
    Float64(DnArray<f64>),
    ComplexFloat32(DnArray<Complex32>),
    ComplexFloat64(DnArray<Complex64>),
}

/// Evaluate `$body` with `$array` bound to the typed array inside `$value`.
///
/// `$body` is expanded once per variant, so it may be generic over the
/// element type.
macro_rules! map_value {
    ($value:expr, $array:ident, $body:expr) => {
        match $value {
            Value::Int8($array) => $body,
            Value::Int16($array) => $body,
            Value::Int32($array) => $body,
            Value::Int64($array) => $body,
            Value::Float32($array) => $body,
            Value::Float64($array) => $body,
            Value::ComplexFloat32($array) => $body,
            Value::ComplexFloat64($array) => $body,
        }
    };
}

impl Value {
    /// Return the data type of elements in this array.
    pub fn dtype(&self) -> DataType {
        match self {
            Value::Int8(_) => DataType::Int8,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::ComplexFloat32(_) => DataType::ComplexFloat32,
            Value::ComplexFloat64(_) => DataType::ComplexFloat64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        map_value!(self, array, array.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Return the number of elements.
    pub fn size(&self) -> usize {
        map_value!(self, array, array.size())
    }

    /// Convert this value into an array with a given element type and rank.
    pub fn into_array<T: ValueElement, D: Dimension>(self) -> Result<NdArray<T, D>, CastError> {
        let array = T::array_from_value(self)?;
        let ndim = array.ndim();
        array.into_dim().map_err(|_| CastError::WrongRank {
            actual: ndim,
            expected: D::NDIM.unwrap_or(ndim),
        })
    }

    /// Return a value which views the same buffer as this one.
    ///
    /// Unlike `clone`, which copies the elements, writes through either
    /// value are visible through the other.
    pub fn share(&self) -> Value {
        map_value!(self, array, ValueElement::into_value(array.as_dyn()))
    }

    /// Convert each element to the type `dtype`, producing a new array.
    ///
    /// Converting complex elements to a real type fails with
    /// [`ArrayError::TypeMismatch`].
    pub fn as_type(&self, dtype: DataType) -> Result<Value, ArrayError> {
        match self {
            Value::Int8(array) => Ok(cast_real(array, dtype)),
            Value::Int16(array) => Ok(cast_real(array, dtype)),
            Value::Int32(array) => Ok(cast_real(array, dtype)),
            Value::Int64(array) => Ok(cast_real(array, dtype)),
            Value::Float32(array) => Ok(cast_real(array, dtype)),
            Value::Float64(array) => Ok(cast_real(array, dtype)),
            Value::ComplexFloat32(array) => cast_complex(array, dtype),
            Value::ComplexFloat64(array) => cast_complex(array, dtype),
        }
    }
}

fn cast_real<T>(array: &DnArray<T>, dtype: DataType) -> Value
where
    T: Element
        + Cast<i8>
        + Cast<i16>
        + Cast<i32>
        + Cast<i64>
        + Cast<f32>
        + Cast<f64>
        + Cast<Complex32>
        + Cast<Complex64>,
{
    match dtype {
        DataType::Int8 => Value::Int8(array.as_type()),
        DataType::Int16 => Value::Int16(array.as_type()),
        DataType::Int32 => Value::Int32(array.as_type()),
        DataType::Int64 => Value::Int64(array.as_type()),
        DataType::Float32 => Value::Float32(array.as_type()),
        DataType::Float64 => Value::Float64(array.as_type()),
        DataType::ComplexFloat32 => Value::ComplexFloat32(array.as_type()),
        DataType::ComplexFloat64 => Value::ComplexFloat64(array.as_type()),
    }
}

fn cast_complex<T>(array: &DnArray<T>, dtype: DataType) -> Result<Value, ArrayError>
where
    T: Element + Cast<Complex32> + Cast<Complex64>,
{
    match dtype {
        DataType::ComplexFloat32 => Ok(Value::ComplexFloat32(array.as_type())),
        DataType::ComplexFloat64 => Ok(Value::ComplexFloat64(array.as_type())),
        to => Err(ArrayError::TypeMismatch { from: T::DTYPE, to }),
    }
}

/// A scalar value with runtime-determined type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    ComplexFloat32(Complex32),
    ComplexFloat64(Complex64),
}

impl Scalar {
    pub fn dtype(&self) -> DataType {
        match self {
            Scalar::Int8(_) => DataType::Int8,
            Scalar::Int16(_) => DataType::Int16,
            Scalar::Int32(_) => DataType::Int32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::Float32(_) => DataType::Float32,
            Scalar::Float64(_) => DataType::Float64,
            Scalar::ComplexFloat32(_) => DataType::ComplexFloat32,
            Scalar::ComplexFloat64(_) => DataType::ComplexFloat64,
        }
    }
}

/// Element types which have a [`Value`] and [`Scalar`] variant.
pub trait ValueElement: Element {
    /// Wrap an array in the [`Value`] variant for this element type.
    fn into_value(array: DnArray<Self>) -> Value;

    /// Extract the array from a value of this element type.
    fn array_from_value(value: Value) -> Result<DnArray<Self>, CastError>;

    fn into_scalar(self) -> Scalar;

    /// Extract the element from a scalar of this element type.
    fn from_scalar(scalar: Scalar) -> Result<Self, CastError>;
}

/// Declare conversions between `Value` / `Scalar` and typed arrays and
/// elements.
macro_rules! impl_value_conversions {
    ($variant:ident, $element_type:ty) => {
        // T => Scalar
        impl From<$element_type> for Scalar {
            fn from(val: $element_type) -> Scalar {
                Scalar::$variant(val)
            }
        }

        // Scalar => T
        impl TryFrom<Scalar> for $element_type {
            type Error = CastError;

            fn try_from(scalar: Scalar) -> Result<$element_type, CastError> {
                match scalar {
                    Scalar::$variant(val) => Ok(val),
                    other => Err(CastError::WrongType {
                        actual: other.dtype(),
                        expected: <$element_type as Element>::DTYPE,
                    }),
                }
            }
        }

        // NdArray<T, D> => Value
        impl<D: Dimension> From<NdArray<$element_type, D>> for Value {
            fn from(array: NdArray<$element_type, D>) -> Value {
                Value::$variant(array.into_dyn())
            }
        }

        // Value => NdArray<T, D>
        impl<D: Dimension> TryFrom<Value> for NdArray<$element_type, D> {
            type Error = CastError;

            fn try_from(value: Value) -> Result<NdArray<$element_type, D>, CastError> {
                value.into_array()
            }
        }

        impl ValueElement for $element_type {
            fn into_value(array: DnArray<$element_type>) -> Value {
                Value::$variant(array)
            }

            fn array_from_value(value: Value) -> Result<DnArray<$element_type>, CastError> {
                match value {
                    Value::$variant(array) => Ok(array),
                    other => Err(CastError::WrongType {
                        actual: other.dtype(),
                        expected: <$element_type as Element>::DTYPE,
                    }),
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn from_scalar(scalar: Scalar) -> Result<$element_type, CastError> {
                scalar.try_into()
            }
        }
    };
}

impl_value_conversions!(Int8, i8);
impl_value_conversions!(Int16, i16);
impl_value_conversions!(Int32, i32);
impl_value_conversions!(Int64, i64);
impl_value_conversions!(Float32, f32);
impl_value_conversions!(Float64, f64);
impl_value_conversions!(ComplexFloat32, Complex32);
impl_value_conversions!(ComplexFloat64, Complex64);

/// Create a value which shares the buffer of `array`.
pub fn value_of<T: ValueElement, D: Dimension>(array: &NdArray<T, D>) -> Value {
    T::into_value(array.as_dyn())
}

#[cfg(test)]
mod tests {
    use ndkit_array::{ArrayError, D1Array, D2Array, D3Array, DataType, DnArray};
    use num_complex::Complex64;

    use super::{value_of, CastError, Scalar, Value};

    #[test]
    fn test_array_from_value() {
        let original = D2Array::from([[1., 2.], [3., 4.]]);
        let value: Value = original.clone().into();
        assert_eq!(value.dtype(), DataType::Float64);
        assert_eq!(value.shape(), &[2, 2]);

        let dyn_array: DnArray<f64> = value.clone().try_into().unwrap();
        assert_eq!(dyn_array.shape(), &[2, 2]);

        let mat: D2Array<f64> = value.clone().into_array().unwrap();
        assert_eq!(mat, original);

        let err: Result<D2Array<i32>, _> = value.clone().try_into();
        assert_eq!(
            err,
            Err(CastError::WrongType {
                actual: DataType::Float64,
                expected: DataType::Int32,
            })
        );

        let err: Result<D3Array<f64>, _> = value.try_into();
        assert_eq!(
            err,
            Err(CastError::WrongRank {
                actual: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn test_value_shares_buffer() {
        let array = D1Array::from([1, 2, 3]);
        let value = value_of(&array);
        let mut round_trip: D1Array<i32> = value.into_array().unwrap();
        round_trip.set([0], 10).unwrap();
        assert_eq!(array.to_vec(), [10, 2, 3]);
    }

    #[test]
    fn test_share_and_clone() {
        let value = Value::from(D1Array::from([1.5f64, 2.5]));

        let mut shared: D1Array<f64> = value.share().into_array().unwrap();
        shared.set([1], 0.).unwrap();
        let copied: D1Array<f64> = value.clone().into_array().unwrap();
        assert_eq!(copied.to_vec(), [1.5, 0.]);

        let mut copied = copied;
        copied.set([0], 0.).unwrap();
        assert_eq!(value, Value::from(D1Array::from([1.5f64, 0.])));
    }

    #[test]
    fn test_scalar_conversions() {
        let scalar = Scalar::from(2.5f32);
        assert_eq!(scalar.dtype(), DataType::Float32);
        assert_eq!(f32::try_from(scalar), Ok(2.5));
        assert_eq!(
            i64::try_from(scalar),
            Err(CastError::WrongType {
                actual: DataType::Float32,
                expected: DataType::Int64,
            })
        );
    }

    #[test]
    fn test_as_type() {
        let value: Value = D1Array::from([1.5f32, -2.5]).into();

        let ints = value.as_type(DataType::Int32).unwrap();
        assert_eq!(ints, Value::from(D1Array::from([1, -2])));

        let complex = value.as_type(DataType::ComplexFloat64).unwrap();
        assert_eq!(
            complex,
            Value::from(D1Array::from([
                Complex64::new(1.5, 0.),
                Complex64::new(-2.5, 0.)
            ]))
        );

        assert_eq!(
            complex.as_type(DataType::Float64),
            Err(ArrayError::TypeMismatch {
                from: DataType::ComplexFloat64,
                to: DataType::Float64,
            })
        );
    }
}
