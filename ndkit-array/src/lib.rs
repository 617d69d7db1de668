//! ndkit_array provides strided multi-dimensional arrays whose storage can
//! be shared between many handles.
//!
//! # Storage and layout
//!
//! An array is a combination of a [MemoryView], an offset into it and a
//! [Layout]. The memory view is a reference-counted buffer of elements of a
//! single [DataType]. The layout holds the extent of each axis (the _shape_)
//! and the number of elements to step over in the buffer to move along each
//! axis (the _strides_). Strides may be negative, for example after slicing
//! with a reversed range.
//!
//! # Array types
//!
//! The array type is [NdArray], which is generic over the element type and a
//! rank tag. Type aliases exist for the common ranks:
//!
//! | Rank    | Alias |
//! | ----    | ----- |
//! | 1       | [D1Array] |
//! | 2       | [D2Array] |
//! | 3       | [D3Array] |
//! | 4       | [D4Array] |
//! | Dynamic | [DnArray] |
//!
//! # Views
//!
//! Slicing, transposing, squeezing and (for arrays with a row-major layout)
//! reshaping produce views which share the buffer of the source. Writes
//! through any handle are visible through all of them:
//!
//! ```
//! use ndkit_array::D2Array;
//!
//! let matrix = D2Array::from([[1, 2], [3, 4]]);
//! let mut column = matrix.slice((.., 1));
//! column.set(&[0], 20).unwrap();
//!
//! assert_eq!(matrix.to_vec(), [1, 20, 3, 4]);
//! assert_eq!(matrix.transpose().to_vec(), [1, 3, 20, 4]);
//! ```
//!
//! Use [NdArray::deep_copy] to get an independent, row-major copy.
//!
//! # Serialization
//!
//! Arrays can be serialized and deserialized using [serde](https://serde.rs)
//! if the `serde` feature is enabled. The serialized representation of an
//! array includes its shape and elements in row-major (C) order:
//!
//! ```json
//! {
//!   "shape": [2, 2],
//!   "data": [0.5, 1.0, 1.5, 2.0]
//! }
//! ```

mod array;
pub mod dim;
pub mod dtype;
pub mod errors;
mod index_iterator;
pub mod layout;
pub mod memory;
mod ops;
pub mod slice_range;

mod impl_debug;
#[cfg(feature = "serde")]
mod impl_serialize;

// Re-exports for convenience.
pub use array::{ArrayId, CopyStrategy, D1Array, D2Array, D3Array, D4Array, DnArray, NdArray};
pub use dim::{Dimension, InsertAxis, IntoShape, RemoveAxis, Shape, D1, D2, D3, D4, DN};
pub use dtype::{Cast, DataType, Element};
pub use errors::{ArrayError, SliceError};
pub use index_iterator::{DynIndex, Indices, Offsets};
pub use layout::Layout;
pub use memory::MemoryView;
pub use slice_range::{IntoSliceItems, SliceItem, SliceRange};

/// This module provides a convenient way to import the most common types
/// from this library via a glob import.
pub mod prelude {
    pub use super::{Cast, CopyStrategy, DataType, Dimension, Element, NdArray};
}

// Public for use by other crates in this repo, but considered internal to
// the project.
#[doc(hidden)]
pub mod test_util;
