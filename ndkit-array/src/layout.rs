//! Shape and stride arithmetic.

use smallvec::SmallVec;

use crate::dim::Shape;
use crate::errors::{ArrayError, SliceError};
use crate::index_iterator::{Indices, Offsets};
use crate::slice_range::SliceItem;

/// Storage for strides. Strides are signed so that views can traverse an
/// axis in reverse.
pub type Strides = SmallVec<[isize; 4]>;

/// Return the row-major strides for a shape.
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    let mut strides: Strides = SmallVec::from_elem(0, shape.len());
    let mut stride = 1isize;
    for (s, &size) in strides.iter_mut().zip(shape).rev() {
        *s = stride;
        stride *= size.max(1) as isize;
    }
    strides
}

/// Return true if `strides` are the row-major strides for `shape`.
///
/// Strides of axes with size 1 are ignored since they never contribute to an
/// offset. Arrays with no elements are always contiguous.
pub fn is_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    if shape.iter().any(|&size| size == 0) {
        return true;
    }
    let mut expected = 1isize;
    for (&size, &stride) in shape.iter().zip(strides).rev() {
        if size != 1 && stride != expected {
            return false;
        }
        expected *= size as isize;
    }
    true
}

/// Check that `axis` is valid for an array with `ndim` axes.
pub(crate) fn check_axis(axis: usize, ndim: usize) -> Result<(), ArrayError> {
    if axis < ndim {
        Ok(())
    } else {
        Err(ArrayError::InvalidAxis { axis, ndim })
    }
}

/// Shape and strides of an array.
///
/// Offsets computed from a layout are relative to the array's base offset
/// into its buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Create a row-major layout for `shape`.
    pub fn from_shape(shape: &[usize]) -> Layout {
        Layout {
            shape: SmallVec::from_slice(shape),
            strides: contiguous_strides(shape),
        }
    }

    /// Create a layout from explicit shape and strides.
    pub fn from_shape_and_strides(shape: &[usize], strides: &[isize]) -> Result<Layout, ArrayError> {
        if shape.len() != strides.len() {
            return Err(ArrayError::DimensionMismatch {
                expected: shape.len(),
                actual: strides.len(),
            });
        }
        Ok(Layout {
            shape: SmallVec::from_slice(shape),
            strides: SmallVec::from_slice(strides),
        })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Return the size of axis `axis`.
    pub fn size(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    /// Return the number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if the strides are the row-major strides for the shape.
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Return the offset of the element at `index`.
    ///
    /// Fails if the index has the wrong length or any component is outside
    /// its axis.
    pub fn offset(&self, index: &[usize]) -> Result<isize, ArrayError> {
        if index.len() != self.ndim() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.ndim(),
                actual: index.len(),
            });
        }
        let mut offset = 0;
        for (axis, ((&idx, &size), &stride)) in index
            .iter()
            .zip(self.shape.iter())
            .zip(self.strides.iter())
            .enumerate()
        {
            if idx >= size {
                return Err(ArrayError::IndexOutOfBounds {
                    axis,
                    index: idx,
                    size,
                });
            }
            offset += idx as isize * stride;
        }
        Ok(offset)
    }

    /// Return the smallest and largest offsets of elements in this layout,
    /// or `None` if the layout is empty.
    pub fn offset_range(&self) -> Option<(isize, isize)> {
        if self.is_empty() {
            return None;
        }
        let mut min = 0;
        let mut max = 0;
        for (&size, &stride) in self.shape.iter().zip(self.strides.iter()) {
            let extent = (size as isize - 1) * stride;
            if extent < 0 {
                min += extent;
            } else {
                max += extent;
            }
        }
        Some((min, max))
    }

    /// Return an iterator over indices of this layout in row-major order.
    pub fn indices(&self) -> Indices {
        Indices::from_shape(&self.shape)
    }

    /// Return an iterator over buffer offsets of elements, in row-major
    /// order of their indices, for an array starting at `base`.
    pub fn offsets(&self, base: usize) -> Offsets {
        Offsets::new(base, &self.shape, &self.strides)
    }

    /// Return the axes ordered from the largest absolute stride to the
    /// smallest.
    ///
    /// This is the order in which the axes are laid out in memory. The sort
    /// is stable, so a row-major layout returns `0..ndim`.
    pub fn memory_order(&self) -> SmallVec<[usize; 4]> {
        let mut order: SmallVec<[usize; 4]> = (0..self.ndim()).collect();
        order.sort_by_key(|&axis| std::cmp::Reverse(self.strides[axis].unsigned_abs()));
        order
    }

    /// Return a layout with the axes permuted so that axis `i` of the result
    /// is axis `perm[i]` of `self`.
    pub fn permuted(&self, perm: &[usize]) -> Result<Layout, ArrayError> {
        if perm.len() != self.ndim() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.ndim(),
                actual: perm.len(),
            });
        }
        let mut seen: SmallVec<[bool; 4]> = SmallVec::from_elem(false, self.ndim());
        for &axis in perm {
            check_axis(axis, self.ndim())?;
            if std::mem::replace(&mut seen[axis], true) {
                return Err(ArrayError::InvalidAxis {
                    axis,
                    ndim: self.ndim(),
                });
            }
        }
        Ok(Layout {
            shape: perm.iter().map(|&axis| self.shape[axis]).collect(),
            strides: perm.iter().map(|&axis| self.strides[axis]).collect(),
        })
    }

    /// Return a layout with the order of axes reversed.
    pub fn transposed(&self) -> Layout {
        Layout {
            shape: self.shape.iter().rev().copied().collect(),
            strides: self.strides.iter().rev().copied().collect(),
        }
    }

    /// Remove axis `axis`, which must have size 1, or every axis of size 1
    /// if `axis` is `None`.
    pub fn squeezed(&self, axis: Option<usize>) -> Result<Layout, ArrayError> {
        let keep = |i: usize| match axis {
            Some(axis) => i != axis,
            None => self.shape[i] != 1,
        };
        if let Some(axis) = axis {
            check_axis(axis, self.ndim())?;
            if self.shape[axis] != 1 {
                return Err(ArrayError::ShapeMismatch {
                    left: self.shape.to_vec(),
                    right: vec![1],
                });
            }
        }
        Ok(Layout {
            shape: (0..self.ndim())
                .filter(|&i| keep(i))
                .map(|i| self.shape[i])
                .collect(),
            strides: (0..self.ndim())
                .filter(|&i| keep(i))
                .map(|i| self.strides[i])
                .collect(),
        })
    }

    /// Insert an axis of size 1 at position `axis`, which may equal `ndim`.
    pub fn with_inserted_axis(&self, axis: usize) -> Result<Layout, ArrayError> {
        check_axis(axis, self.ndim() + 1)?;

        // Give the new axis the stride it would have in a row-major layout,
        // so that inserting an axis preserves contiguity.
        let stride = if axis < self.ndim() {
            self.strides[axis] * self.shape[axis] as isize
        } else {
            1
        };

        let mut layout = self.clone();
        layout.shape.insert(axis, 1);
        layout.strides.insert(axis, stride);
        Ok(layout)
    }

    /// Remove axis `axis` by selecting the element at `index` along it.
    ///
    /// Returns the new layout and the offset of the selected position.
    pub fn index_axis(&self, axis: usize, index: usize) -> Result<(Layout, isize), ArrayError> {
        check_axis(axis, self.ndim())?;
        let size = self.shape[axis];
        if index >= size {
            return Err(ArrayError::IndexOutOfBounds { axis, index, size });
        }
        let mut layout = self.clone();
        layout.shape.remove(axis);
        let stride = layout.strides.remove(axis);
        Ok((layout, index as isize * stride))
    }

    /// Apply a slice spec to this layout.
    ///
    /// Axes sliced with an index are removed. Axes sliced with a range keep
    /// their position, with the stride multiplied by the range's step. Axes
    /// after the last item are kept in full.
    ///
    /// Returns the new layout and the offset of its first element relative
    /// to this layout's first element. The offset is zero if the result is
    /// empty.
    pub fn slice(&self, items: &[SliceItem]) -> Result<(Layout, isize), SliceError> {
        if items.len() > self.ndim() {
            return Err(SliceError::TooManyItems {
                ndim: self.ndim(),
                items: items.len(),
            });
        }

        let mut shape = Shape::new();
        let mut strides = Strides::new();
        let mut offset = 0isize;

        for (axis, (&size, &stride)) in self.shape.iter().zip(self.strides.iter()).enumerate() {
            match items.get(axis) {
                Some(SliceItem::Index(index)) => {
                    let pos = if *index < 0 {
                        *index + size as isize
                    } else {
                        *index
                    };
                    if pos < 0 || pos >= size as isize {
                        return Err(SliceError::InvalidIndex {
                            axis,
                            index: *index,
                            size,
                        });
                    }
                    offset += pos * stride;
                }
                Some(SliceItem::Range(range)) => {
                    if range.step() == 0 {
                        return Err(SliceError::ZeroStep { axis });
                    }
                    let resolved = range.resolve(size).ok_or(SliceError::InvalidRange {
                        axis,
                        range: *range,
                        size,
                    })?;
                    offset += resolved.start as isize * stride;
                    shape.push(resolved.steps);
                    // The stride of an axis with at most one element is never
                    // used to step, and `stride * step` may overflow for a
                    // step larger than the axis.
                    if resolved.steps > 1 {
                        strides.push(stride * range.step());
                    } else {
                        strides.push(stride);
                    }
                }
                None => {
                    shape.push(size);
                    strides.push(stride);
                }
            }
        }

        let layout = Layout { shape, strides };
        if layout.is_empty() {
            offset = 0;
        }
        Ok((layout, offset))
    }
}
