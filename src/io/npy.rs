//! Encoding and decoding of NumPy `.npy` files.
//!
//! See <https://numpy.org/doc/stable/reference/generated/numpy.lib.format.html>.

use ndkit_array::{DataType, DnArray};

use super::FormatError;
use crate::value::{Value, ValueElement};

const MAGIC: &[u8] = b"\x93NUMPY";

/// The total size of the preamble and header is a multiple of this.
const HEADER_ALIGN: usize = 64;

/// Elements which can be stored in `.npy` files.
trait NpyElement: ValueElement {
    /// Value of the `descr` field in the header.
    const DESCR: &'static str;

    fn extend_le_bytes(self, buf: &mut Vec<u8>);

    /// Decode an element from `size_of::<Self>()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_npy_element {
    ($type:ty, $descr:literal) => {
        impl NpyElement for $type {
            const DESCR: &'static str = $descr;

            fn extend_le_bytes(self, buf: &mut Vec<u8>) {
                buf.extend(self.to_le_bytes());
            }

            fn from_le_slice(bytes: &[u8]) -> $type {
                let mut le_bytes = [0u8; std::mem::size_of::<$type>()];
                le_bytes.copy_from_slice(bytes);
                <$type>::from_le_bytes(le_bytes)
            }
        }
    };
}

impl_npy_element!(i8, "|i1");
impl_npy_element!(i16, "<i2");
impl_npy_element!(i32, "<i4");
impl_npy_element!(i64, "<i8");
impl_npy_element!(f32, "<f4");
impl_npy_element!(f64, "<f8");

/// Read little-endian encoded integers from a byte buffer.
struct ByteReader<'a> {
    pos: usize,
    buf: &'a [u8],
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { pos: 0, buf }
    }

    /// Return the next `n` bytes, or None if there aren't enough.
    fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let chunk = self.buf.get(self.pos..self.pos.checked_add(n)?)?;
        self.pos += n;
        Some(chunk)
    }

    fn read_u16(&mut self) -> Option<u16> {
        let bytes = self.read_bytes(2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn remainder(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

/// Fields of the header dictionary.
#[derive(Debug, PartialEq)]
struct Header {
    dtype: DataType,
    fortran_order: bool,
    shape: Vec<usize>,
}

fn parse_error(details: &str) -> FormatError {
    FormatError::Parse(details.to_string())
}

fn unsupported_dtype(dtype: DataType) -> FormatError {
    FormatError::FormatUnsupported(format!(
        "npy files do not support elements of type {}",
        dtype
    ))
}

/// Map a `descr` string such as `<f4` to a data type.
fn parse_descr(descr: &str) -> Result<DataType, FormatError> {
    let (byte_order, type_code) = match descr.chars().next() {
        Some(order @ ('<' | '>' | '|' | '=')) => (order, &descr[1..]),
        _ => ('=', descr),
    };

    let dtype = match type_code {
        "i1" => DataType::Int8,
        "i2" => DataType::Int16,
        "i4" => DataType::Int32,
        "i8" => DataType::Int64,
        "f4" => DataType::Float32,
        "f8" => DataType::Float64,
        "c8" => return Err(unsupported_dtype(DataType::ComplexFloat32)),
        "c16" => return Err(unsupported_dtype(DataType::ComplexFloat64)),
        _ => {
            return Err(FormatError::FormatUnsupported(format!(
                "npy element type \"{}\" is not supported",
                descr
            )))
        }
    };

    let big_endian = byte_order == '>' || (byte_order == '=' && cfg!(target_endian = "big"));
    if big_endian && dtype.item_size() > 1 {
        return Err(FormatError::FormatUnsupported(
            "big-endian npy files are not supported".to_string(),
        ));
    }

    Ok(dtype)
}

/// Return the text following `'key':` in a header dictionary.
fn dict_entry<'a>(header: &'a str, key: &str) -> Result<&'a str, FormatError> {
    let start = [format!("'{}'", key), format!("\"{}\"", key)]
        .iter()
        .find_map(|quoted| header.find(quoted.as_str()).map(|pos| pos + quoted.len()))
        .ok_or_else(|| FormatError::Parse(format!("header is missing \"{}\"", key)))?;
    header[start..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim_start)
        .ok_or_else(|| FormatError::Parse(format!("header entry \"{}\" has no value", key)))
}

fn parse_header(header: &str) -> Result<Header, FormatError> {
    let descr = dict_entry(header, "descr")?;
    let quote = descr
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| parse_error("descr is not a string"))?;
    let descr = &descr[1..];
    let end = descr
        .find(quote)
        .ok_or_else(|| parse_error("descr is not a string"))?;
    let dtype = parse_descr(&descr[..end])?;

    let fortran_order = dict_entry(header, "fortran_order")?;
    let fortran_order = if fortran_order.starts_with("True") {
        true
    } else if fortran_order.starts_with("False") {
        false
    } else {
        return Err(parse_error("fortran_order is not a boolean"));
    };

    let shape = dict_entry(header, "shape")?;
    let shape = shape
        .strip_prefix('(')
        .and_then(|shape| shape.split_once(')'))
        .map(|(dims, _)| dims)
        .ok_or_else(|| parse_error("shape is not a tuple"))?;
    let shape = shape
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| FormatError::Parse(format!("invalid dimension \"{}\"", dim)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Header {
        dtype,
        fortran_order,
        shape,
    })
}

fn format_header(descr: &str, shape: &[usize]) -> Result<Vec<u8>, FormatError> {
    let shape = match shape {
        [size] => format!("({},)", size),
        _ => {
            let dims: Vec<String> = shape.iter().map(|dim| dim.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    };
    let mut dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        descr, shape
    );

    // Magic, version and header length, followed by the dict and a newline.
    let unpadded_len = MAGIC.len() + 4 + dict.len() + 1;
    let padding = (HEADER_ALIGN - unpadded_len % HEADER_ALIGN) % HEADER_ALIGN;
    dict.extend(std::iter::repeat(' ').take(padding));
    dict.push('\n');

    let header_len = u16::try_from(dict.len()).map_err(|_| {
        FormatError::FormatUnsupported("array has too many dimensions for npy".to_string())
    })?;

    let mut buf = Vec::with_capacity(unpadded_len + padding);
    buf.extend(MAGIC);
    buf.extend([1, 0]);
    buf.extend(header_len.to_le_bytes());
    buf.extend(dict.as_bytes());
    Ok(buf)
}

fn encode_array<T: NpyElement>(array: &DnArray<T>) -> Result<Vec<u8>, FormatError> {
    let mut buf = format_header(T::DESCR, array.shape())?;
    buf.reserve(array.size() * std::mem::size_of::<T>());
    for x in array.iter() {
        x.extend_le_bytes(&mut buf);
    }
    Ok(buf)
}

/// Serialize an array in `.npy` format, version 1.0.
pub fn encode(value: &Value) -> Result<Vec<u8>, FormatError> {
    match value {
        Value::Int8(array) => encode_array(array),
        Value::Int16(array) => encode_array(array),
        Value::Int32(array) => encode_array(array),
        Value::Int64(array) => encode_array(array),
        Value::Float32(array) => encode_array(array),
        Value::Float64(array) => encode_array(array),
        Value::ComplexFloat32(_) | Value::ComplexFloat64(_) => Err(unsupported_dtype(value.dtype())),
    }
}

fn decode_array<T: NpyElement>(header: &Header, data: &[u8]) -> Result<Value, FormatError> {
    let elements: Vec<T> = data
        .chunks_exact(std::mem::size_of::<T>())
        .map(T::from_le_slice)
        .collect();

    let array = if header.fortran_order {
        let reversed: Vec<usize> = header.shape.iter().rev().copied().collect();
        let perm: Vec<usize> = (0..reversed.len()).rev().collect();
        DnArray::from_data(reversed.as_slice(), elements)?
            .permuted(&perm)?
            .deep_copy()
    } else {
        DnArray::from_data(header.shape.as_slice(), elements)?
    };
    Ok(T::into_value(array))
}

/// Deserialize an array from the contents of a `.npy` file.
pub fn decode(buf: &[u8]) -> Result<Value, FormatError> {
    let too_short = || parse_error("file is too short");
    let mut reader = ByteReader::new(buf);

    let magic = reader.read_bytes(MAGIC.len()).ok_or_else(too_short)?;
    if magic != MAGIC {
        return Err(parse_error("file does not start with npy magic"));
    }

    let version = reader.read_bytes(2).ok_or_else(too_short)?;
    let header_len = match version[0] {
        1 => reader.read_u16().map(usize::from),
        2 | 3 => reader.read_u32().map(|len| len as usize),
        major => {
            return Err(FormatError::FormatUnsupported(format!(
                "npy version {}.{} is not supported",
                major, version[1]
            )))
        }
    }
    .ok_or_else(too_short)?;

    let header = reader.read_bytes(header_len).ok_or_else(too_short)?;
    let header =
        std::str::from_utf8(header).map_err(|_| parse_error("header is not valid text"))?;
    let header = parse_header(header)?;

    let size: usize = header.shape.iter().product();
    let data = reader.remainder();
    let expected_len = size * header.dtype.item_size();
    if data.len() != expected_len {
        return Err(FormatError::Parse(format!(
            "expected {} bytes of element data but found {}",
            expected_len,
            data.len()
        )));
    }

    match header.dtype {
        DataType::Int8 => decode_array::<i8>(&header, data),
        DataType::Int16 => decode_array::<i16>(&header, data),
        DataType::Int32 => decode_array::<i32>(&header, data),
        DataType::Int64 => decode_array::<i64>(&header, data),
        DataType::Float32 => decode_array::<f32>(&header, data),
        DataType::Float64 => decode_array::<f64>(&header, data),
        DataType::ComplexFloat32 | DataType::ComplexFloat64 => {
            Err(unsupported_dtype(header.dtype))
        }
    }
}

#[cfg(test)]
mod tests {
    use ndkit_array::{D1Array, D2Array, DataType, DnArray};
    use ndkit_testing::TestCases;
    use num_complex::Complex32;

    use super::{decode, encode, parse_header, Header, HEADER_ALIGN};
    use crate::io::FormatError;
    use crate::value::Value;

    /// Build an npy file from a header dict and element data.
    fn npy_file(dict: &str, data: &[u8]) -> Vec<u8> {
        let mut buf = b"\x93NUMPY\x01\x00".to_vec();
        buf.extend((dict.len() as u16).to_le_bytes());
        buf.extend(dict.as_bytes());
        buf.extend(data);
        buf
    }

    #[test]
    fn test_encode() {
        let value = Value::from(D1Array::from([1i32, 2, 3]));
        let buf = encode(&value).unwrap();

        assert_eq!(buf.len(), 128 + 12);
        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % HEADER_ALIGN, 0);
        assert_eq!(buf[10 + header_len - 1], b'\n');

        let header = std::str::from_utf8(&buf[10..10 + header_len]).unwrap();
        assert!(header.starts_with("{'descr': '<i4', 'fortran_order': False, 'shape': (3,), }"));
        assert_eq!(&buf[128..132], &1i32.to_le_bytes());

        let complex = Value::from(D1Array::from([Complex32::new(1., 1.)]));
        assert!(matches!(
            encode(&complex),
            Err(FormatError::FormatUnsupported(_))
        ));
    }

    #[test]
    fn test_encode_decode() {
        let values = [
            Value::from(D2Array::from([[1i8, -2], [3, 4]])),
            Value::from(D1Array::from([i64::MIN, 0, i64::MAX])),
            Value::from(D2Array::from([[0.5f64, -1.25, 3.]])),
            Value::from(DnArray::scalar(7.5f32)),
            Value::from(DnArray::<i16>::zeros([2, 0, 3].as_slice())),
        ];
        for value in values {
            let decoded = decode(&encode(&value).unwrap()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_parse_header() {
        #[derive(Debug)]
        struct Case {
            header: &'static str,
            expected: Header,
        }

        let cases = [
            Case {
                header: "{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3), }",
                expected: Header {
                    dtype: DataType::Float64,
                    fortran_order: false,
                    shape: vec![2, 3],
                },
            },
            Case {
                header: "{'shape': (), 'fortran_order': True, 'descr': '|i1'}",
                expected: Header {
                    dtype: DataType::Int8,
                    fortran_order: true,
                    shape: vec![],
                },
            },
            Case {
                header: "{\"descr\": \"<i2\", \"fortran_order\": False, \"shape\": (4L,)}",
                expected: Header {
                    dtype: DataType::Int16,
                    fortran_order: false,
                    shape: vec![4],
                },
            },
        ];

        cases.test_each(|case| {
            assert_eq!(parse_header(case.header).unwrap(), case.expected);
        })
    }

    #[test]
    fn test_decode_fortran_order() {
        let data: Vec<u8> = [1i32, 4, 2, 5, 3, 6]
            .iter()
            .flat_map(|x| x.to_le_bytes())
            .collect();
        let buf = npy_file(
            "{'descr': '<i4', 'fortran_order': True, 'shape': (2, 3), }\n",
            &data,
        );
        let value = decode(&buf).unwrap();
        assert_eq!(value, Value::from(D2Array::from([[1, 2, 3], [4, 5, 6]])));
    }

    #[test]
    fn test_decode_errors() {
        let header = "{'descr': '<i4', 'fortran_order': False, 'shape': (2,), }\n";
        let cases = [
            (b"NOTNPY".to_vec(), "parse"),
            (npy_file(header, &[0; 4]), "parse"),
            (
                npy_file(
                    "{'descr': '<c8', 'fortran_order': False, 'shape': (1,), }\n",
                    &[0; 8],
                ),
                "unsupported",
            ),
            (
                npy_file(
                    "{'descr': '>f4', 'fortran_order': False, 'shape': (1,), }\n",
                    &[0; 4],
                ),
                "unsupported",
            ),
            (
                npy_file("{'descr': '<i4', 'shape': (1,), }\n", &[0; 4]),
                "parse",
            ),
        ];

        for (buf, kind) in cases {
            let result = decode(&buf);
            match kind {
                "parse" => assert!(matches!(result, Err(FormatError::Parse(_))), "{:?}", result),
                _ => assert!(
                    matches!(result, Err(FormatError::FormatUnsupported(_))),
                    "{:?}",
                    result
                ),
            }
        }
    }
}
