//! Reading and writing arrays to files.
//!
//! The file format is chosen from the extension of the path:
//!
//! - `.npy` - NumPy's binary format (version 1.0, little-endian, C order).
//!   Only integer and float elements are supported.
//! - `.csv` - Comma-separated text, for arrays with at most 2 dimensions.
//!   Complex elements are written as `re+imi`.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::path::Path;

use ndkit_array::{ArrayError, DataType, Dimension, NdArray};

use crate::value::{value_of, CastError, Value, ValueElement};

mod csv;
mod npy;

/// Errors when reading or writing an array file.
#[derive(Debug)]
pub enum FormatError {
    /// The file format does not support this extension, element type or
    /// number of dimensions.
    FormatUnsupported(String),

    /// The file contents could not be parsed.
    Parse(String),

    /// The element type stored in the file is not the requested type.
    DtypeMismatch {
        expected: DataType,
        actual: DataType,
    },

    /// The file contents do not form a valid array of the requested rank.
    Array(ArrayError),

    /// Reading or writing the file failed.
    Io(std::io::Error),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatUnsupported(details) => {
                write!(f, "unsupported format: {}", details)
            }
            FormatError::Parse(details) => write!(f, "parse error: {}", details),
            FormatError::DtypeMismatch { expected, actual } => write!(
                f,
                "file contains elements of type {} but {} was requested",
                actual, expected
            ),
            FormatError::Array(err) => write!(f, "{}", err),
            FormatError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FormatError::Array(err) => Some(err),
            FormatError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FormatError {
    fn from(val: std::io::Error) -> FormatError {
        FormatError::Io(val)
    }
}

impl From<ArrayError> for FormatError {
    fn from(val: ArrayError) -> FormatError {
        FormatError::Array(val)
    }
}

impl From<CastError> for FormatError {
    fn from(val: CastError) -> FormatError {
        match val {
            CastError::WrongType { actual, expected } => {
                FormatError::DtypeMismatch { expected, actual }
            }
            CastError::WrongRank { actual, expected } => {
                FormatError::Array(ArrayError::DimensionMismatch { expected, actual })
            }
        }
    }
}

/// Supported file formats.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Format {
    Npy,
    Csv,
}

impl Format {
    fn from_path(path: &Path) -> Result<Format, FormatError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("npy") => Ok(Format::Npy),
            Some("csv") => Ok(Format::Csv),
            Some(ext) => Err(FormatError::FormatUnsupported(format!(
                "unknown file extension \"{}\"",
                ext
            ))),
            None => Err(FormatError::FormatUnsupported(
                "file has no extension".to_string(),
            )),
        }
    }
}

/// Read an array with element type `dtype` from a file.
///
/// `ndim` is the rank of the array the caller expects, if known. It is used
/// to read single-row or single-column CSV files as vectors.
pub fn read_value<P: AsRef<Path>>(
    path: P,
    dtype: DataType,
    ndim: Option<usize>,
) -> Result<Value, FormatError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let value = match format {
        Format::Npy => {
            let value = npy::decode(&std::fs::read(path)?)?;
            if value.dtype() != dtype {
                return Err(FormatError::DtypeMismatch {
                    expected: dtype,
                    actual: value.dtype(),
                });
            }
            value
        }
        Format::Csv => csv::decode(&std::fs::read_to_string(path)?, dtype, ndim)?,
    };
    log::debug!(
        "Read {:?} array with shape {:?} from {}",
        format,
        value.shape(),
        path.display()
    );
    Ok(value)
}

/// Write an array to a file, replacing its contents.
pub fn write_value<P: AsRef<Path>>(path: P, value: &Value) -> Result<(), FormatError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    match format {
        Format::Npy => std::fs::write(path, npy::encode(value)?)?,
        Format::Csv => std::fs::write(path, csv::encode(value)?)?,
    }
    log::debug!(
        "Wrote {:?} array with shape {:?} to {}",
        format,
        value.shape(),
        path.display()
    );
    Ok(())
}

/// Read a typed array from a `.npy` or `.csv` file.
///
/// Fails with [`FormatError::DtypeMismatch`] if an `.npy` file stores a
/// different element type than `T`, or with a [`FormatError::Array`] error
/// if the rank of the stored array does not match `D`.
pub fn read<T: ValueElement, D: Dimension, P: AsRef<Path>>(
    path: P,
) -> Result<NdArray<T, D>, FormatError> {
    let value = read_value(path, T::DTYPE, D::NDIM)?;
    Ok(value.into_array()?)
}

/// Write a typed array to a `.npy` or `.csv` file.
pub fn write<T: ValueElement, D: Dimension, P: AsRef<Path>>(
    path: P,
    array: &NdArray<T, D>,
) -> Result<(), FormatError> {
    write_value(path, &value_of(array))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use ndkit_array::{ArrayError, D1Array, D2Array, D3Array, DataType, DnArray};
    use num_complex::Complex64;

    use super::{read, write, Format, FormatError};

    /// Path to a file in a temporary directory which is unique to a test.
    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ndkit-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.npy")).unwrap(), Format::Npy);
        assert_eq!(Format::from_path(Path::new("a.CSV")).unwrap(), Format::Csv);
        assert!(matches!(
            Format::from_path(Path::new("a.txt")),
            Err(FormatError::FormatUnsupported(_))
        ));
        assert!(matches!(
            Format::from_path(Path::new("array")),
            Err(FormatError::FormatUnsupported(_))
        ));
    }

    #[test]
    fn test_npy_file() {
        let path = temp_path("matrix.npy");
        let array = D2Array::from([[1.5f32, -2.], [3., 4.25]]);
        write(&path, &array).unwrap();
        assert_eq!(read::<f32, _, _>(&path).unwrap(), array);

        let dyn_array: DnArray<f32> = read(&path).unwrap();
        assert_eq!(dyn_array.shape(), &[2, 2]);

        assert!(matches!(
            read::<f64, ndkit_array::D2, _>(&path),
            Err(FormatError::DtypeMismatch {
                expected: DataType::Float64,
                actual: DataType::Float32,
            })
        ));
        assert!(matches!(
            read::<f32, ndkit_array::D1, _>(&path),
            Err(FormatError::Array(ArrayError::DimensionMismatch {
                expected: 1,
                actual: 2,
            }))
        ));

        let complex = D1Array::from([Complex64::new(1., 2.)]);
        assert!(matches!(
            write(temp_path("complex.npy"), &complex),
            Err(FormatError::FormatUnsupported(_))
        ));
    }

    #[test]
    fn test_csv_file() {
        let path = temp_path("matrix.csv");
        let array = D2Array::from([[1, 2, 3], [4, 5, 6]]);
        write(&path, &array).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,2,3\n4,5,6\n");
        assert_eq!(read::<i32, _, _>(&path).unwrap(), array);

        let path = temp_path("vector.csv");
        let vector = D1Array::from([0.5, -1.]);
        write(&path, &vector).unwrap();
        assert_eq!(read::<f64, _, _>(&path).unwrap(), vector);

        let cube = D3Array::from([[[1, 2]]]);
        assert!(matches!(
            write(temp_path("cube.csv"), &cube),
            Err(FormatError::FormatUnsupported(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read::<f32, ndkit_array::D1, _>(temp_path("missing.npy"));
        assert!(matches!(result, Err(FormatError::Io(_))));
    }
}
