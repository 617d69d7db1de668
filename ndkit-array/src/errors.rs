//! Error types that are reported by array operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::dtype::DataType;
use crate::slice_range::SliceRange;

/// Errors that can occur when slicing an array.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceError {
    /// The slice spec has more items than the array has axes.
    TooManyItems { ndim: usize, items: usize },

    /// An index in the slice spec is out of bounds for the corresponding
    /// axis.
    InvalidIndex {
        axis: usize,
        index: isize,
        size: usize,
    },

    /// A range in the slice spec is out of bounds for the corresponding axis.
    InvalidRange {
        axis: usize,
        range: SliceRange,
        size: usize,
    },

    /// A range in the slice spec, or the step passed to a range
    /// constructor, has a step of 0.
    ZeroStep { axis: usize },
}

impl Display for SliceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::TooManyItems { ndim, items } => write!(
                f,
                "slice spec has {} items but array has {} axes",
                items, ndim
            ),
            SliceError::InvalidIndex { axis, index, size } => write!(
                f,
                "slice index {} is invalid for axis {} of size {}",
                index, axis, size
            ),
            SliceError::InvalidRange { axis, range, size } => write!(
                f,
                "slice range {} is invalid for axis {} of size {}",
                range, axis, size
            ),
            SliceError::ZeroStep { axis } => write!(f, "slice step for axis {} is zero", axis),
        }
    }
}

impl Error for SliceError {}

/// Errors reported by array construction, indexing, view and element-wise
/// operations.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// Operands have different shapes where equal shapes are required.
    ShapeMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
    },

    /// An index is outside the extent of an axis, or a flat index is outside
    /// the buffer.
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        size: usize,
    },

    /// An axis argument is outside `[0, ndim)`.
    InvalidAxis { axis: usize, ndim: usize },

    /// An element type cannot be used for, or converted by, an operation.
    TypeMismatch { from: DataType, to: DataType },

    /// The number of axes does not match the array's rank tag or the length
    /// of an index.
    DimensionMismatch { expected: usize, actual: usize },

    /// A data length does not match the product of a shape.
    LengthMismatch { expected: usize, actual: usize },

    /// Slicing failed.
    InvalidSlice(SliceError),
}

impl Display for ArrayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayError::ShapeMismatch { left, right } => {
                write!(f, "shapes {:?} and {:?} do not match", left, right)
            }
            ArrayError::IndexOutOfBounds { axis, index, size } => write!(
                f,
                "index {} is out of bounds for axis {} with size {}",
                index, axis, size
            ),
            ArrayError::InvalidAxis { axis, ndim } => {
                write!(f, "axis {} is invalid for array with {} axes", axis, ndim)
            }
            ArrayError::TypeMismatch { from, to } => {
                write!(f, "cannot convert elements of type {} to {}", from, to)
            }
            ArrayError::DimensionMismatch { expected, actual } => {
                write!(f, "expected {} axes but found {}", expected, actual)
            }
            ArrayError::LengthMismatch { expected, actual } => {
                write!(f, "expected {} elements but found {}", expected, actual)
            }
            ArrayError::InvalidSlice(err) => write!(f, "invalid slice: {}", err),
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArrayError::InvalidSlice(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SliceError> for ArrayError {
    fn from(val: SliceError) -> ArrayError {
        ArrayError::InvalidSlice(val)
    }
}
