//! Built-in engine implementations.

use ndkit_array::{ArrayError, DataType, DnArray, Element};

use crate::errors::OpError;
use crate::kernels::matrix::Matrix;
use crate::value::{Value, ValueElement};

/// Evaluate `$body` with `$array` bound to the typed array inside a value
/// of any element type.
macro_rules! dispatch_all {
    ($value:expr, $array:ident => $body:expr) => {{
        let value: &Value = $value;
        match value {
            Value::Int8($array) => $body,
            Value::Int16($array) => $body,
            Value::Int32($array) => $body,
            Value::Int64($array) => $body,
            Value::Float32($array) => $body,
            Value::Float64($array) => $body,
            Value::ComplexFloat32($array) => $body,
            Value::ComplexFloat64($array) => $body,
        }
    }};
}

/// Like [`dispatch_all`], but fails with [`OpError::UnsupportedType`] for
/// complex values.
macro_rules! dispatch_real {
    ($value:expr, $array:ident => $body:expr) => {{
        let value: &Value = $value;
        match value {
            Value::Int8($array) => $body,
            Value::Int16($array) => $body,
            Value::Int32($array) => $body,
            Value::Int64($array) => $body,
            Value::Float32($array) => $body,
            Value::Float64($array) => $body,
            Value::ComplexFloat32(_) | Value::ComplexFloat64(_) => {
                Err(OpError::UnsupportedType(value.dtype()))
            }
        }
    }};
}

/// Like [`dispatch_all`], but fails with [`OpError::UnsupportedType`] for
/// integer values. Use [`promote`] first to convert integers to floats.
macro_rules! dispatch_float {
    ($value:expr, $array:ident => $body:expr) => {{
        let value: &Value = $value;
        match value {
            Value::Float32($array) => $body,
            Value::Float64($array) => $body,
            Value::ComplexFloat32($array) => $body,
            Value::ComplexFloat64($array) => $body,
            Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
                Err(OpError::UnsupportedType(value.dtype()))
            }
        }
    }};
}

/// Evaluate `$body` with `$x` and `$y` bound to the typed arrays inside two
/// values, which must have the same element type.
macro_rules! dispatch_pair {
    ($a:expr, $b:expr, ($x:ident, $y:ident) => $body:expr) => {{
        let (a, b): (&Value, &Value) = ($a, $b);
        match (a, b) {
            (Value::Int8($x), Value::Int8($y)) => $body,
            (Value::Int16($x), Value::Int16($y)) => $body,
            (Value::Int32($x), Value::Int32($y)) => $body,
            (Value::Int64($x), Value::Int64($y)) => $body,
            (Value::Float32($x), Value::Float32($y)) => $body,
            (Value::Float64($x), Value::Float64($y)) => $body,
            (Value::ComplexFloat32($x), Value::ComplexFloat32($y)) => $body,
            (Value::ComplexFloat64($x), Value::ComplexFloat64($y)) => $body,
            _ => Err(type_mismatch(b, a)),
        }
    }};
}

/// Like [`dispatch_pair`], for pairs of float or complex values.
macro_rules! dispatch_float_pair {
    ($a:expr, $b:expr, ($x:ident, $y:ident) => $body:expr) => {{
        let (a, b): (&Value, &Value) = ($a, $b);
        match (a, b) {
            (Value::Float32($x), Value::Float32($y)) => $body,
            (Value::Float64($x), Value::Float64($y)) => $body,
            (Value::ComplexFloat32($x), Value::ComplexFloat32($y)) => $body,
            (Value::ComplexFloat64($x), Value::ComplexFloat64($y)) => $body,
            _ if a.dtype() == b.dtype() => Err(OpError::UnsupportedType(a.dtype())),
            _ => Err(type_mismatch(b, a)),
        }
    }};
}

mod parallel;
mod pure;

pub use parallel::ParallelEngine;
pub use pure::PureEngine;

fn type_mismatch(from: &Value, to: &Value) -> OpError {
    ArrayError::TypeMismatch {
        from: from.dtype(),
        to: to.dtype(),
    }
    .into()
}

/// Convert integer values to `Float64`. Float and complex values are
/// returned unchanged, sharing their buffer.
fn promote(value: &Value) -> Result<Value, OpError> {
    if value.dtype().is_float() {
        Ok(value.share())
    } else {
        Ok(value.as_type(DataType::Float64)?)
    }
}

/// Create a value from elements in row-major order.
fn new_value<T: ValueElement>(shape: &[usize], data: Vec<T>) -> Result<Value, OpError> {
    Ok(T::into_value(DnArray::from_data(shape, data)?))
}

/// Copy a rank-2 array into a matrix.
fn matrix_from<T: Element>(array: &DnArray<T>) -> Result<Matrix<T>, OpError> {
    match *array.shape() {
        [rows, cols] => Ok(Matrix::from_vec(rows, cols, array.to_vec())),
        _ => Err(ArrayError::DimensionMismatch {
            expected: 2,
            actual: array.ndim(),
        }
        .into()),
    }
}

/// Copy a rank-2 array with equal dimensions into a matrix.
fn square_matrix_from<T: Element>(array: &DnArray<T>) -> Result<Matrix<T>, OpError> {
    let mat = matrix_from(array)?;
    if mat.rows() != mat.cols() {
        return Err(OpError::InvalidValue("matrix must be square"));
    }
    Ok(mat)
}

fn matrix_value<T: ValueElement>(mat: Matrix<T>) -> Result<Value, OpError> {
    Ok(T::into_value(mat.into_array()?.into_dyn()))
}

#[cfg(test)]
mod tests {
    use ndkit_array::{ArrayError, D1Array, D2Array, DataType};

    use super::{matrix_from, promote, square_matrix_from};
    use crate::errors::OpError;
    use crate::value::Value;

    #[test]
    fn test_promote() {
        let ints = Value::from(D1Array::from([1i32, 2]));
        let promoted = promote(&ints).unwrap();
        assert_eq!(promoted, Value::from(D1Array::from([1f64, 2.])));

        let floats = Value::from(D1Array::from([1f32, 2.]));
        let Value::Float32(promoted) = promote(&floats).unwrap() else {
            panic!("expected a Float32 value");
        };
        let Value::Float32(original) = &floats else {
            panic!("expected a Float32 value");
        };
        assert!(promoted.data().ptr_eq(original.data()));
        assert_eq!(promoted.to_vec(), [1., 2.]);
    }

    #[test]
    fn test_matrix_from() {
        let vector = D1Array::from([1, 2, 3]).into_dyn();
        assert_eq!(
            matrix_from(&vector).err(),
            Some(OpError::Array(ArrayError::DimensionMismatch {
                expected: 2,
                actual: 1
            }))
        );

        let mat = D2Array::from([[1, 2, 3], [4, 5, 6]]).into_dyn();
        assert_eq!(matrix_from(&mat).unwrap().cols(), 3);
        assert_eq!(
            square_matrix_from(&mat).err(),
            Some(OpError::InvalidValue("matrix must be square"))
        );
    }
}
