use std::any::Any;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use num_traits::Float;
use smallvec::SmallVec;

use crate::dim::{Dimension, InsertAxis, IntoShape, RemoveAxis, Shape, D1, D2, D3, D4, DN};
use crate::dtype::{Cast, DataType, Element};
use crate::errors::{ArrayError, SliceError};
use crate::index_iterator::Indices;
use crate::layout::{check_axis, contiguous_strides, Layout};
use crate::memory::MemoryView;
use crate::slice_range::{IntoSliceItems, SliceItem, SliceRange};

/// Process-unique identity of an array handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    fn next() -> ArrayId {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ArrayId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Controls whether a type conversion always copies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CopyStrategy {
    /// Always produce a dense, row-major copy.
    #[default]
    Full,

    /// Copy only if the source is a view or the element type changes.
    /// Otherwise the result shares the source's buffer.
    Meaningful,
}

/// A multi-dimensional array of elements of type `T`, with a rank tag `D`.
///
/// An array is a [`MemoryView`] plus an offset and a [`Layout`] which maps
/// indices to positions in the buffer. Views created by slicing, transposing
/// etc. share the buffer of the array they were created from, so writes
/// through a view are visible through its base and vice versa.
///
/// Arrays created from new data own their buffer and have no base. Views
/// record the [`ArrayId`] of the owning array at the root of the chain they
/// were derived from. The link is informational only, the buffer is kept
/// alive by the views themselves.
pub struct NdArray<T, D: Dimension = DN> {
    data: MemoryView<T>,

    // Offset of the element at index zero in `data`.
    //
    // Constructors must ensure every index valid for `layout` maps to a
    // position within `data`.
    offset: usize,
    layout: Layout,
    id: ArrayId,
    base: Option<ArrayId>,
    _dim: PhantomData<D>,
}

/// One-dimensional array.
pub type D1Array<T> = NdArray<T, D1>;

/// Two-dimensional array.
pub type D2Array<T> = NdArray<T, D2>;

/// Three-dimensional array.
pub type D3Array<T> = NdArray<T, D3>;

/// Four-dimensional array.
pub type D4Array<T> = NdArray<T, D4>;

/// Array with a rank that is only known at runtime.
pub type DnArray<T> = NdArray<T, DN>;

fn shape_len(shape: &[usize]) -> usize {
    shape.iter().product()
}

impl<T: Element, D: Dimension> NdArray<T, D> {
    fn from_parts(data: MemoryView<T>, offset: usize, layout: Layout, base: Option<ArrayId>) -> Self {
        debug_assert!(D::accepts(layout.ndim()));
        NdArray {
            data,
            offset,
            layout,
            id: ArrayId::next(),
            base,
            _dim: PhantomData,
        }
    }

    /// Create an array which owns a new buffer with a row-major layout.
    pub(crate) fn from_shape_and_vec(shape: &[usize], data: Vec<T>) -> Self {
        debug_assert_eq!(shape_len(shape), data.len());
        Self::from_parts(MemoryView::new(data), 0, Layout::from_shape(shape), None)
    }

    /// Create a view of this array's buffer with a different layout.
    fn view_with<E: Dimension>(&self, layout: Layout, offset_delta: isize) -> NdArray<T, E> {
        NdArray::from_parts(
            self.data.clone(),
            (self.offset as isize + offset_delta) as usize,
            layout,
            Some(self.root()),
        )
    }

    /// Return the id of the array which owns the buffer.
    fn root(&self) -> ArrayId {
        self.base.unwrap_or(self.id)
    }

    /// Create an array from a shape and row-major data.
    ///
    /// Fails if the length of `data` is not the product of `shape`.
    pub fn from_data<S: IntoShape<Dim = D>>(shape: S, data: Vec<T>) -> Result<Self, ArrayError> {
        let shape = shape.into_shape();
        if shape_len(&shape) != data.len() {
            return Err(ArrayError::LengthMismatch {
                expected: shape_len(&shape),
                actual: data.len(),
            });
        }
        Ok(Self::from_shape_and_vec(&shape, data))
    }

    /// Create an array which uses `data` as its buffer, with a row-major
    /// layout.
    ///
    /// The array shares the buffer with every other handle to `data`.
    pub fn from_memory_view<S: IntoShape<Dim = D>>(
        shape: S,
        data: MemoryView<T>,
    ) -> Result<Self, ArrayError> {
        let shape = shape.into_shape();
        if shape_len(&shape) != data.len() {
            return Err(ArrayError::LengthMismatch {
                expected: shape_len(&shape),
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(data, 0, Layout::from_shape(&shape), None))
    }

    /// Create an array filled with `value`.
    pub fn full<S: IntoShape<Dim = D>>(shape: S, value: T) -> Self {
        let shape = shape.into_shape();
        Self::from_shape_and_vec(&shape, vec![value; shape_len(&shape)])
    }

    /// Create an array filled with zeros.
    pub fn zeros<S: IntoShape<Dim = D>>(shape: S) -> Self {
        Self::full(shape, T::zero())
    }

    /// Create an array filled with ones.
    pub fn ones<S: IntoShape<Dim = D>>(shape: S) -> Self {
        Self::full(shape, T::one())
    }

    /// Create an array by calling `f` with the index of each element, in
    /// row-major order.
    pub fn from_fn<S: IntoShape<Dim = D>, F: FnMut(&[usize]) -> T>(shape: S, mut f: F) -> Self {
        let shape = shape.into_shape();
        let data = Indices::from_shape(&shape).map(|index| f(&index)).collect();
        Self::from_shape_and_vec(&shape, data)
    }

    /// Concatenate arrays along an existing axis.
    ///
    /// The arrays must have the same extent in every other axis.
    pub fn concat(axis: usize, arrays: &[&Self]) -> Result<Self, ArrayError> {
        let Some(first) = arrays.first() else {
            return Err(ArrayError::LengthMismatch {
                expected: 1,
                actual: 0,
            });
        };
        check_axis(axis, first.ndim())?;

        let mut out_shape: Shape = SmallVec::from_slice(first.shape());
        out_shape[axis] = 0;
        for array in arrays {
            if array.ndim() != first.ndim() {
                return Err(ArrayError::DimensionMismatch {
                    expected: first.ndim(),
                    actual: array.ndim(),
                });
            }
            let extents_match = (0..first.ndim())
                .filter(|&i| i != axis)
                .all(|i| array.shape()[i] == first.shape()[i]);
            if !extents_match {
                return Err(ArrayError::ShapeMismatch {
                    left: first.shape().to_vec(),
                    right: array.shape().to_vec(),
                });
            }
            out_shape[axis] += array.shape()[axis];
        }

        let outer: usize = shape_len(&first.shape()[..axis]);
        let inner: usize = shape_len(&first.shape()[axis + 1..]);
        let sources: Vec<Vec<T>> = arrays.iter().map(|a| a.to_vec()).collect();

        let mut data = Vec::with_capacity(shape_len(&out_shape));
        for o in 0..outer {
            for (array, src) in arrays.iter().zip(&sources) {
                let chunk = array.shape()[axis] * inner;
                data.extend_from_slice(&src[o * chunk..(o + 1) * chunk]);
            }
        }
        Ok(Self::from_shape_and_vec(&out_shape, data))
    }

    /// Stack arrays of equal shape along a new axis inserted at `axis`.
    pub fn stack(axis: usize, arrays: &[&Self]) -> Result<NdArray<T, D::Larger>, ArrayError>
    where
        D: InsertAxis,
    {
        let expanded = arrays
            .iter()
            .map(|array| array.unsqueeze(axis))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<_> = expanded.iter().collect();
        NdArray::concat(axis, &refs)
    }

    /// Return the buffer backing this array.
    pub fn data(&self) -> &MemoryView<T> {
        &self.data
    }

    /// Return the position of the element at index zero in the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Return the number of axes.
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Return the number of elements.
    pub fn size(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn dtype(&self) -> DataType {
        T::DTYPE
    }

    pub fn id(&self) -> ArrayId {
        self.id
    }

    /// Return the id of the array that owns the buffer this view was derived
    /// from, or `None` if this array owns its buffer.
    pub fn base(&self) -> Option<ArrayId> {
        self.base
    }

    /// Return true if this array is a view of another array's buffer.
    pub fn is_view(&self) -> bool {
        self.base.is_some()
    }

    /// Return true if the layout is row-major, starts at the beginning of the
    /// buffer and spans all of it.
    pub fn consistent(&self) -> bool {
        self.offset == 0 && self.layout.is_contiguous() && self.data.len() == self.size()
    }

    fn element_offset(&self, index: &[usize]) -> Result<usize, ArrayError> {
        let delta = self.layout.offset(index)?;
        Ok((self.offset as isize + delta) as usize)
    }

    /// Return the element at `index`.
    pub fn get(&self, index: D::Index<'_>) -> Result<T, ArrayError> {
        let offset = self.element_offset(index.as_ref())?;
        self.data.get(offset)
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: D::Index<'_>, value: T) -> Result<(), ArrayError> {
        let offset = self.element_offset(index.as_ref())?;
        self.data.set(offset, value)
    }

    /// Return the only element of an array with a single element.
    pub fn item(&self) -> Result<T, ArrayError> {
        if self.size() != 1 {
            return Err(ArrayError::LengthMismatch {
                expected: 1,
                actual: self.size(),
            });
        }
        self.data.get(self.offset)
    }

    /// Return the elements in row-major order of their indices.
    pub fn to_vec(&self) -> Vec<T> {
        let consistent = self.consistent();
        let data = self.data.read();
        if consistent {
            return data.clone();
        }
        self.layout.offsets(self.offset).map(|o| data[o]).collect()
    }

    /// Return an iterator over a snapshot of the elements, in row-major
    /// order.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Return an iterator over the indices of this array, in row-major
    /// order.
    pub fn indices(&self) -> Indices {
        self.layout.indices()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.apply(|_| value)
    }

    /// Replace every element with the result of `f`.
    pub fn apply<F: Fn(T) -> T>(&mut self, f: F) {
        let mut data = self.data.write();
        for offset in self.layout.offsets(self.offset) {
            data[offset] = f(data[offset]);
        }
    }

    /// Replace every element `x` with `f(x, y)` where `y` is the element at
    /// the same index in `values`, which must be in row-major order.
    pub(crate) fn zip_apply<F: Fn(T, T) -> T>(&mut self, values: &[T], f: F) {
        debug_assert_eq!(values.len(), self.size());
        let mut data = self.data.write();
        for (offset, &y) in self.layout.offsets(self.offset).zip(values) {
            data[offset] = f(data[offset], y);
        }
    }

    /// Copy the elements of `other`, which must have the same shape, into
    /// this array.
    ///
    /// `other` may overlap with this array.
    pub fn assign(&mut self, other: &NdArray<T, D>) -> Result<(), ArrayError> {
        if self.shape() != other.shape() {
            return Err(ArrayError::ShapeMismatch {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }
        let values = other.to_vec();
        self.zip_apply(&values, |_, y| y);
        Ok(())
    }

    /// Return a new array with `f` applied to each element.
    pub fn map<U: Element, F: Fn(T) -> U>(&self, f: F) -> NdArray<U, D> {
        let data = self.iter().map(f).collect();
        NdArray::from_shape_and_vec(self.shape(), data)
    }

    /// Return a view which selects part of this array.
    ///
    /// Each item slices the axis at the same position. Axes sliced with an
    /// index are removed, axes beyond the last item are kept in full.
    ///
    /// Panics if the slice spec is invalid. See [`NdArray::try_slice`].
    pub fn slice<I: IntoSliceItems>(&self, items: I) -> DnArray<T> {
        self.try_slice(items).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Fallible version of [`NdArray::slice`].
    pub fn try_slice<I: IntoSliceItems>(&self, items: I) -> Result<DnArray<T>, ArrayError> {
        let (layout, delta) = self.layout.slice(items.into_slice_items().as_ref())?;
        Ok(self.view_with(layout, delta))
    }

    /// Return a view which slices selected axes.
    ///
    /// `items` maps axis numbers to an index (which removes the axis) or a
    /// range. Axes that are not mentioned are kept in full.
    pub fn slice_map(&self, items: &[(usize, SliceItem)]) -> Result<DnArray<T>, ArrayError> {
        let mut full: SmallVec<[Option<SliceItem>; 4]> = SmallVec::from_elem(None, self.ndim());
        for &(axis, item) in items {
            check_axis(axis, self.ndim())?;
            if full[axis].replace(item).is_some() {
                return Err(ArrayError::InvalidAxis {
                    axis,
                    ndim: self.ndim(),
                });
            }
        }
        let full: SmallVec<[SliceItem; 4]> = full
            .into_iter()
            .map(|item| item.unwrap_or_else(SliceItem::full_range))
            .collect();
        self.try_slice(full.as_slice())
    }

    /// Return a view which narrows a single axis to `range`.
    pub fn slice_axis<R: Into<SliceRange>>(&self, axis: usize, range: R) -> Result<Self, ArrayError> {
        check_axis(axis, self.ndim())?;
        let mut items: SmallVec<[SliceItem; 4]> =
            SmallVec::from_elem(SliceItem::full_range(), axis + 1);
        items[axis] = SliceItem::Range(range.into());
        let (layout, delta) = self.layout.slice(&items)?;
        Ok(self.view_with(layout, delta))
    }

    /// Return a view of the slice at `index` along `axis`, which has one
    /// fewer axis.
    pub fn index_axis(&self, axis: usize, index: usize) -> Result<NdArray<T, D::Smaller>, ArrayError>
    where
        D: RemoveAxis,
    {
        let (layout, delta) = self.layout.index_axis(axis, index)?;
        Ok(self.view_with(layout, delta))
    }

    /// Return a view of the slice at position `index` of the first axis.
    pub fn at(&self, index: usize) -> Result<NdArray<T, D::Smaller>, ArrayError>
    where
        D: RemoveAxis,
    {
        self.index_axis(0, index)
    }

    /// Return a view with the order of axes reversed.
    pub fn transpose(&self) -> Self {
        self.view_with(self.layout.transposed(), 0)
    }

    /// Return a view with axes permuted so that axis `i` of the result is
    /// axis `perm[i]` of this array.
    pub fn permuted(&self, perm: &[usize]) -> Result<Self, ArrayError> {
        let layout = self.layout.permuted(perm)?;
        Ok(self.view_with(layout, 0))
    }

    /// Return a view without the size-1 axis `axis`, or without every size-1
    /// axis if `axis` is `None`.
    pub fn squeeze(&self, axis: Option<usize>) -> Result<DnArray<T>, ArrayError> {
        let layout = self.layout.squeezed(axis)?;
        Ok(self.view_with(layout, 0))
    }

    /// Return a view with a size-1 axis inserted at position `axis`.
    pub fn unsqueeze(&self, axis: usize) -> Result<NdArray<T, D::Larger>, ArrayError>
    where
        D: InsertAxis,
    {
        let layout = self.layout.with_inserted_axis(axis)?;
        Ok(self.view_with(layout, 0))
    }

    /// Return an array with the same elements in row-major order and a new
    /// shape.
    ///
    /// If this array is [consistent](NdArray::consistent) the result is a
    /// view which shares the buffer. Otherwise the elements are first copied
    /// into a new buffer.
    pub fn reshape<S: IntoShape>(&self, shape: S) -> Result<NdArray<T, S::Dim>, ArrayError> {
        let shape = shape.into_shape();
        if shape_len(&shape) != self.size() {
            return Err(ArrayError::LengthMismatch {
                expected: self.size(),
                actual: shape_len(&shape),
            });
        }
        Ok(self.reshaped(&shape))
    }

    fn reshaped<E: Dimension>(&self, shape: &[usize]) -> NdArray<T, E> {
        if self.consistent() {
            self.view_with(Layout::from_shape(shape), 0)
        } else {
            NdArray::from_shape_and_vec(shape, self.to_vec())
        }
    }

    /// Return a one-dimensional array of the elements in row-major order.
    ///
    /// Like [`NdArray::reshape`], this shares the buffer if the array is
    /// consistent.
    pub fn flatten(&self) -> D1Array<T> {
        self.reshaped(&[self.size()])
    }

    /// Copy this array into a new, dense buffer.
    ///
    /// The copy holds exactly the elements of this array and keeps the order
    /// in which axes are laid out in memory, so the copy of a transposed
    /// array is also transposed. Use [`NdArray::deep_copy`] to get a
    /// row-major copy.
    pub fn copy(&self) -> Self {
        let order = self.layout.memory_order();
        let in_memory_order = self
            .layout
            .permuted(&order)
            .unwrap_or_else(|_| self.layout.clone());

        let data = {
            let src = self.data.read();
            in_memory_order
                .offsets(self.offset)
                .map(|o| src[o])
                .collect()
        };

        let dense_strides = contiguous_strides(in_memory_order.shape());
        let mut strides: SmallVec<[isize; 4]> = SmallVec::from_elem(0, self.ndim());
        for (i, &axis) in order.iter().enumerate() {
            strides[axis] = dense_strides[i];
        }
        let layout = Layout::from_shape_and_strides(self.shape(), &strides)
            .unwrap_or_else(|_| Layout::from_shape(self.shape()));

        Self::from_parts(MemoryView::new(data), 0, layout, None)
    }

    /// Copy this array into a new, dense, row-major buffer.
    ///
    /// The result is always [consistent](NdArray::consistent).
    pub fn deep_copy(&self) -> Self {
        Self::from_shape_and_vec(self.shape(), self.to_vec())
    }

    /// Convert each element to type `U`, producing a new row-major array.
    pub fn as_type<U: Element>(&self) -> NdArray<U, D>
    where
        T: Cast<U>,
    {
        self.map(|x| x.cast())
    }

    /// Convert each element to type `U` using the given copy strategy.
    ///
    /// With [`CopyStrategy::Meaningful`], converting an array which owns its
    /// buffer to its own element type returns a view which shares the buffer.
    pub fn to_type<U: Element>(&self, strategy: CopyStrategy) -> NdArray<U, D>
    where
        T: Cast<U>,
    {
        if strategy == CopyStrategy::Meaningful && !self.is_view() {
            if let Some(data) = (&self.data as &dyn Any).downcast_ref::<MemoryView<U>>() {
                return NdArray::from_parts(
                    data.clone(),
                    self.offset,
                    self.layout.clone(),
                    Some(self.root()),
                );
            }
        }
        self.as_type()
    }

    /// Convert this array to one with a dynamic rank, sharing the buffer.
    pub fn into_dyn(self) -> DnArray<T> {
        NdArray {
            data: self.data,
            offset: self.offset,
            layout: self.layout,
            id: self.id,
            base: self.base,
            _dim: PhantomData,
        }
    }

    /// Return a handle to this array with a dynamic rank tag.
    ///
    /// The handle has the same identity as this array.
    pub fn as_dyn(&self) -> DnArray<T> {
        NdArray {
            data: self.data.clone(),
            offset: self.offset,
            layout: self.layout.clone(),
            id: self.id,
            base: self.base,
            _dim: PhantomData,
        }
    }

    /// Convert this array to one with rank tag `E`.
    ///
    /// Fails if the number of axes does not match `E`.
    pub fn into_dim<E: Dimension>(self) -> Result<NdArray<T, E>, ArrayError> {
        if !E::accepts(self.ndim()) {
            return Err(ArrayError::DimensionMismatch {
                expected: E::NDIM.unwrap_or(self.ndim()),
                actual: self.ndim(),
            });
        }
        Ok(NdArray {
            data: self.data,
            offset: self.offset,
            layout: self.layout,
            id: self.id,
            base: self.base,
            _dim: PhantomData,
        })
    }
}

impl<T: Element> DnArray<T> {
    /// Create a rank-0 array holding a single value.
    pub fn scalar(value: T) -> DnArray<T> {
        Self::from_shape_and_vec(&[], vec![value])
    }
}

impl<T: Element> D1Array<T> {
    /// Create a vector from a `Vec`.
    pub fn from_vec(data: Vec<T>) -> D1Array<T> {
        Self::from_shape_and_vec(&[data.len()], data)
    }

    /// Create a vector of values from `start` up to (but excluding) `end`,
    /// in increments of `step`.
    ///
    /// Panics if `step` is zero. See [`D1Array::try_arange`].
    pub fn arange(start: T, end: T, step: T) -> D1Array<T>
    where
        T: PartialOrd,
    {
        Self::try_arange(start, end, step).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Fallible version of [`D1Array::arange`].
    ///
    /// Fails with [`SliceError::ZeroStep`] if `step` is zero.
    pub fn try_arange(start: T, end: T, step: T) -> Result<D1Array<T>, SliceError>
    where
        T: PartialOrd,
    {
        if step == T::zero() {
            return Err(SliceError::ZeroStep { axis: 0 });
        }
        let ascending = step > T::zero();
        let mut data = Vec::new();
        let mut x = start;
        while (ascending && x < end) || (!ascending && x > end) {
            data.push(x);
            let next = x.wrapping_add(step);

            // Stop if an integer sequence wrapped past the end of its type.
            if (ascending && next < x) || (!ascending && next > x) {
                break;
            }
            x = next;
        }
        Ok(Self::from_vec(data))
    }

    /// Create a vector of `n` evenly spaced values from `start` to `stop`
    /// inclusive.
    pub fn linspace(start: T, stop: T, n: usize) -> D1Array<T>
    where
        T: Float,
    {
        if n == 1 {
            return Self::from_vec(vec![start]);
        }
        let intervals = (1..n).fold(T::zero(), |acc, _| acc + T::one());
        let step = (stop - start) / intervals;

        let mut data = Vec::with_capacity(n);
        let mut i = T::zero();
        for _ in 0..n.saturating_sub(1) {
            data.push(start + step * i);
            i = i + T::one();
        }
        if n > 1 {
            data.push(stop);
        }
        Self::from_vec(data)
    }
}

impl<T: Element> D2Array<T> {
    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> D2Array<T> {
        Self::from_fn([n, n], |index| {
            if index[0] == index[1] {
                T::one()
            } else {
                T::zero()
            }
        })
    }
}

impl<T: Element, D: Dimension> Clone for NdArray<T, D> {
    /// Clones the array with [`NdArray::copy`].
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T: Element, D: Dimension> PartialEq for NdArray<T, D> {
    /// Arrays are equal if they have the same shape and the same elements in
    /// row-major order, regardless of layout or buffer.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

impl<T: Element> From<Vec<T>> for D1Array<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for D1Array<T> {
    fn from(data: [T; N]) -> Self {
        Self::from_vec(data.into())
    }
}

impl<T: Element, const C: usize, const R: usize> From<[[T; C]; R]> for D2Array<T> {
    fn from(data: [[T; C]; R]) -> Self {
        let data: Vec<T> = data.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_shape_and_vec(&[R, C], data)
    }
}

impl<T: Element, const K: usize, const C: usize, const R: usize> From<[[[T; K]; C]; R]>
    for D3Array<T>
{
    fn from(data: [[[T; K]; C]; R]) -> Self {
        let data: Vec<T> = data
            .iter()
            .flat_map(|mat| mat.iter().flat_map(|row| row.iter().copied()))
            .collect();
        Self::from_shape_and_vec(&[R, C, K], data)
    }
}

impl<T: Element> From<D1Array<T>> for DnArray<T> {
    fn from(array: D1Array<T>) -> Self {
        array.into_dyn()
    }
}

impl<T: Element> From<D2Array<T>> for DnArray<T> {
    fn from(array: D2Array<T>) -> Self {
        array.into_dyn()
    }
}

impl<T: Element> From<D3Array<T>> for DnArray<T> {
    fn from(array: D3Array<T>) -> Self {
        array.into_dyn()
    }
}

impl<T: Element> From<D4Array<T>> for DnArray<T> {
    fn from(array: D4Array<T>) -> Self {
        array.into_dyn()
    }
}

#[cfg(test)]
mod tests;
