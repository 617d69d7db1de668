//! Encoding and decoding of comma-separated text files.
//!
//! Each row of a matrix is written as one line. Vectors and scalars are
//! written as a single line.

use std::fmt::Display;
use std::str::FromStr;

use ndkit_array::{DataType, DnArray};
use num_complex::{Complex32, Complex64};

use super::FormatError;
use crate::value::{Value, ValueElement};

/// Maximum rank of arrays which can be stored in a CSV file.
const MAX_NDIM: usize = 2;

fn too_many_dims(ndim: usize) -> FormatError {
    FormatError::FormatUnsupported(format!(
        "csv files support at most {} dimensions but array has {}",
        MAX_NDIM, ndim
    ))
}

fn format_array<T: ValueElement + Display>(array: &DnArray<T>) -> String {
    let cols = match *array.shape() {
        [_, cols] => cols,
        _ => array.size(),
    };
    let fields: Vec<String> = array.iter().map(|x| x.to_string()).collect();

    let mut text = String::new();
    if cols == 0 {
        return text;
    }
    for row in fields.chunks(cols) {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

/// Serialize an array with at most 2 dimensions as CSV.
pub fn encode(value: &Value) -> Result<String, FormatError> {
    if value.ndim() > MAX_NDIM {
        return Err(too_many_dims(value.ndim()));
    }
    let text = match value {
        Value::Int8(array) => format_array(array),
        Value::Int16(array) => format_array(array),
        Value::Int32(array) => format_array(array),
        Value::Int64(array) => format_array(array),
        Value::Float32(array) => format_array(array),
        Value::Float64(array) => format_array(array),
        Value::ComplexFloat32(array) => format_array(array),
        Value::ComplexFloat64(array) => format_array(array),
    };
    Ok(text)
}

fn parse_array<T: ValueElement + FromStr>(
    fields: &[&str],
    shape: &[usize],
) -> Result<Value, FormatError> {
    let data = fields
        .iter()
        .map(|field| {
            field
                .parse::<T>()
                .map_err(|_| FormatError::Parse(format!("invalid {} value \"{}\"", T::DTYPE, field)))
        })
        .collect::<Result<Vec<T>, _>>()?;
    Ok(T::into_value(DnArray::from_data(shape, data)?))
}

/// Parse CSV text into an array of type `dtype`.
///
/// The result is a matrix with one row per non-empty line, unless `ndim`
/// requests a vector or scalar and the text has a compatible shape.
pub fn decode(text: &str, dtype: DataType, ndim: Option<usize>) -> Result<Value, FormatError> {
    if let Some(ndim) = ndim.filter(|&ndim| ndim > MAX_NDIM) {
        return Err(too_many_dims(ndim));
    }

    let rows: Vec<Vec<&str>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(str::trim).collect())
        .collect();

    let n_rows = rows.len();
    let n_cols = rows.first().map(|row| row.len()).unwrap_or(0);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n_cols) {
        return Err(FormatError::Parse(format!(
            "row {} has {} fields but row 0 has {}",
            i,
            row.len(),
            n_cols
        )));
    }

    let shape = match ndim {
        Some(0) if n_rows * n_cols == 1 => vec![],
        Some(1) if n_rows <= 1 => vec![n_cols],
        Some(1) if n_cols == 1 => vec![n_rows],
        _ => vec![n_rows, n_cols],
    };
    let fields: Vec<&str> = rows.into_iter().flatten().collect();

    match dtype {
        DataType::Int8 => parse_array::<i8>(&fields, &shape),
        DataType::Int16 => parse_array::<i16>(&fields, &shape),
        DataType::Int32 => parse_array::<i32>(&fields, &shape),
        DataType::Int64 => parse_array::<i64>(&fields, &shape),
        DataType::Float32 => parse_array::<f32>(&fields, &shape),
        DataType::Float64 => parse_array::<f64>(&fields, &shape),
        DataType::ComplexFloat32 => parse_array::<Complex32>(&fields, &shape),
        DataType::ComplexFloat64 => parse_array::<Complex64>(&fields, &shape),
    }
}

#[cfg(test)]
mod tests {
    use ndkit_array::{D1Array, D2Array, D3Array, DataType, DnArray};
    use ndkit_testing::TestCases;
    use num_complex::Complex64;

    use super::{decode, encode};
    use crate::io::FormatError;
    use crate::value::Value;

    #[test]
    fn test_encode() {
        #[derive(Debug)]
        struct Case {
            value: Value,
            expected: &'static str,
        }

        let cases = [
            Case {
                value: D2Array::from([[1, 2], [3, 4]]).into(),
                expected: "1,2\n3,4\n",
            },
            Case {
                value: D1Array::from([0.5, -1., 2.25]).into(),
                expected: "0.5,-1,2.25\n",
            },
            Case {
                value: DnArray::scalar(7i64).into(),
                expected: "7\n",
            },
            Case {
                value: D1Array::from([Complex64::new(1., 2.), Complex64::new(3., -4.)]).into(),
                expected: "1+2i,3-4i\n",
            },
        ];

        cases.test_each(|case| {
            assert_eq!(encode(&case.value).unwrap(), case.expected);
        });

        let cube = Value::from(D3Array::from([[[1, 2]], [[3, 4]]]));
        assert!(matches!(
            encode(&cube),
            Err(FormatError::FormatUnsupported(_))
        ));
    }

    #[test]
    fn test_decode() {
        let text = " 1, 2,3\n\n4,5 ,6\n";
        let value = decode(text, DataType::Int16, None).unwrap();
        assert_eq!(value, Value::from(D2Array::from([[1i16, 2, 3], [4, 5, 6]])));

        let value = decode("1.5,2\n", DataType::Float32, Some(1)).unwrap();
        assert_eq!(value, Value::from(D1Array::from([1.5f32, 2.])));

        let value = decode("1\n2\n3\n", DataType::Int32, Some(1)).unwrap();
        assert_eq!(value, Value::from(D1Array::from([1, 2, 3])));

        let value = decode("42\n", DataType::Int8, Some(0)).unwrap();
        assert_eq!(value, Value::from(DnArray::scalar(42i8)));

        let value = decode("1+2i,-3i\n", DataType::ComplexFloat64, Some(1)).unwrap();
        assert_eq!(
            value,
            Value::from(D1Array::from([Complex64::new(1., 2.), Complex64::new(0., -3.)]))
        );

        let value = decode("", DataType::Float64, None).unwrap();
        assert_eq!(value.shape(), &[0, 0]);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode("1,2\n3\n", DataType::Int32, None),
            Err(FormatError::Parse(_))
        ));
        assert!(matches!(
            decode("1,x\n", DataType::Int32, None),
            Err(FormatError::Parse(_))
        ));
        assert!(matches!(
            decode("1.5\n", DataType::Int32, None),
            Err(FormatError::Parse(_))
        ));
        assert!(matches!(
            decode("1\n", DataType::Int32, Some(3)),
            Err(FormatError::FormatUnsupported(_))
        ));
    }
}
