use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use smallvec::SmallVec;

/// Specifies a subset of an axis to include when slicing an array.
///
/// Can be constructed from an index or range using `index_or_range.into()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliceItem {
    /// Extract a specific index from an axis.
    ///
    /// The number of axes in the sliced view will be one minus the number
    /// of axes sliced with an index. If the index is negative, it counts
    /// back from the end of the axis.
    Index(isize),

    /// Include a subset of the range of the axis.
    Range(SliceRange),
}

impl SliceItem {
    /// Return a SliceItem that extracts the full range of an axis.
    #[inline]
    pub fn full_range() -> Self {
        (..).into()
    }

    /// Return a SliceItem that extracts part of an axis.
    #[inline]
    pub fn range(start: isize, end: Option<isize>, step: isize) -> SliceItem {
        SliceItem::Range(SliceRange::new(start, end, step))
    }
}

// Slicing with an unsuffixed integer literal (eg. `array.slice([0, 1])`)
// resolves to this impl.
impl From<i32> for SliceItem {
    #[inline]
    fn from(value: i32) -> Self {
        SliceItem::Index(value as isize)
    }
}

impl From<isize> for SliceItem {
    #[inline]
    fn from(value: isize) -> Self {
        SliceItem::Index(value)
    }
}

impl From<usize> for SliceItem {
    #[inline]
    fn from(value: usize) -> Self {
        SliceItem::Index(value as isize)
    }
}

impl<R> From<R> for SliceItem
where
    R: Into<SliceRange>,
{
    fn from(value: R) -> Self {
        SliceItem::Range(value.into())
    }
}

/// Used to convert sequences of indices and/or ranges into a uniform
/// `[SliceItem]` array that can be used to slice an array.
///
/// This trait is implemented for:
///
///  - Individual indices and ranges (types satisfying `Into<SliceItem>`)
///  - Arrays of indices or ranges
///  - Tuples of indices and/or ranges
///  - `[SliceItem]` slices
pub trait IntoSliceItems {
    type Array: AsRef<[SliceItem]>;

    fn into_slice_items(self) -> Self::Array;
}

impl<'a> IntoSliceItems for &'a [SliceItem] {
    type Array = &'a [SliceItem];

    fn into_slice_items(self) -> &'a [SliceItem] {
        self
    }
}

impl IntoSliceItems for Vec<SliceItem> {
    type Array = Vec<SliceItem>;

    fn into_slice_items(self) -> Vec<SliceItem> {
        self
    }
}

impl<const N: usize, T: Into<SliceItem>> IntoSliceItems for [T; N] {
    type Array = [SliceItem; N];

    fn into_slice_items(self) -> [SliceItem; N] {
        self.map(|x| x.into())
    }
}

impl<T: Into<SliceItem>> IntoSliceItems for T {
    type Array = [SliceItem; 1];

    fn into_slice_items(self) -> [SliceItem; 1] {
        [self.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>> IntoSliceItems for (T1, T2) {
    type Array = [SliceItem; 2];

    fn into_slice_items(self) -> [SliceItem; 2] {
        [self.0.into(), self.1.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>, T3: Into<SliceItem>> IntoSliceItems
    for (T1, T2, T3)
{
    type Array = [SliceItem; 3];

    fn into_slice_items(self) -> [SliceItem; 3] {
        [self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<T1: Into<SliceItem>, T2: Into<SliceItem>, T3: Into<SliceItem>, T4: Into<SliceItem>>
    IntoSliceItems for (T1, T2, T3, T4)
{
    type Array = [SliceItem; 4];

    fn into_slice_items(self) -> [SliceItem; 4] {
        [self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

/// Dynamically sized array of [`SliceItem`]s, which avoids allocating in the
/// common case where the length is small.
pub type DynSliceItems = SmallVec<[SliceItem; 4]>;

/// A range for slicing an [`NdArray`](crate::NdArray).
///
/// This has two main differences from [`Range`].
///
/// - A step between indices can be specified. The step can be
///   negative, which means that the axis is traversed in reverse order and
///   the resulting view has a negative stride.
/// - The `start` and `end` indexes can also be negative, in which case they
///   count backwards from the end of the axis.
///
/// Unlike NumPy, endpoints are not clamped. A range whose endpoints fall
/// outside the axis is an error, even when it would select every element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceRange {
    /// First index in range.
    pub start: isize,

    /// Index (exclusive) at which the range stops, or None if the range
    /// extends to the end of the axis in the direction of `step`.
    pub end: Option<isize>,

    /// Distance between selected indices. Slicing an array with a step of
    /// 0 fails with [`SliceError::ZeroStep`](crate::SliceError::ZeroStep).
    step: isize,
}

/// Position of the first selected element and the number of selected
/// elements, for a range applied to an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedRange {
    pub start: usize,
    pub steps: usize,
}

impl SliceRange {
    /// Create a new range from `start` to `end`. The `start` index is inclusive
    /// and the `end` value is exclusive. If `end` is None, the range spans
    /// to the end of the axis.
    #[inline]
    pub fn new(start: isize, end: Option<isize>, step: isize) -> SliceRange {
        SliceRange { start, end, step }
    }

    /// Create a range which counts down from `start` to `end` inclusive,
    /// traversing the axis in reverse.
    pub fn down_to(start: isize, end: isize) -> SliceRange {
        let end = if end == 0 { None } else { Some(end - 1) };
        SliceRange::new(start, end, -1)
    }

    /// Return a copy of this range with a different step.
    pub fn with_step(self, step: isize) -> SliceRange {
        SliceRange::new(self.start, self.end, step)
    }

    pub fn step(&self) -> isize {
        self.step
    }

    /// Resolve this range against an axis of size `size`.
    ///
    /// Returns `None` if the step is zero or an endpoint is out of bounds.
    /// Valid endpoints depend on the direction. Going forwards, `start` and `end` must be in
    /// `[0, size]` after negative values are offset by `size`. Going
    /// backwards, they must be in `[-1, size)`.
    pub fn resolve(&self, size: usize) -> Option<ResolvedRange> {
        let len = size as isize;
        let normalize = |index: isize| if index < 0 { index + len } else { index };

        let start = normalize(self.start);
        if self.step == 0 {
            return None;
        }
        if self.step > 0 {
            let end = self.end.map(normalize).unwrap_or(len);
            if !(0..=len).contains(&start) || !(0..=len).contains(&end) {
                return None;
            }
            let steps = if end > start {
                (end - start - 1) as usize / self.step as usize + 1
            } else {
                0
            };
            Some(ResolvedRange {
                start: start as usize,
                steps,
            })
        } else {
            // When counting down, `-1` for `end` would be normalized to
            // `size - 1`, so `None` is the only way to include index 0.
            let end = self.end.map(normalize).unwrap_or(-1);
            if !(-1..len).contains(&start) || !(-1..len).contains(&end) {
                return None;
            }
            let steps = if start > end {
                (start - end - 1) as usize / self.step.unsigned_abs() + 1
            } else {
                0
            };
            Some(ResolvedRange {
                start: start.max(0) as usize,
                steps,
            })
        }
    }

    /// Return the number of elements selected from an axis of size `size`,
    /// or `None` if the range is out of bounds.
    pub fn steps(&self, size: usize) -> Option<usize> {
        self.resolve(size).map(|r| r.steps)
    }
}

impl fmt::Display for SliceRange {
    /// Format the range as `start:end:step`, omitting `end` if it is `None`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}:{}", self.start, end, self.step),
            None => write!(f, "{}::{}", self.start, self.step),
        }
    }
}

impl<T> From<Range<T>> for SliceRange
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: std::fmt::Debug,
{
    fn from(r: Range<T>) -> SliceRange {
        let start = r.start.try_into().unwrap();
        let end = r.end.try_into().unwrap();
        SliceRange::new(start, Some(end), 1)
    }
}

impl<T> From<RangeTo<T>> for SliceRange
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: std::fmt::Debug,
{
    fn from(r: RangeTo<T>) -> SliceRange {
        let end = r.end.try_into().unwrap();
        SliceRange::new(0, Some(end), 1)
    }
}

impl<T> From<RangeFrom<T>> for SliceRange
where
    T: TryInto<isize>,
    <T as TryInto<isize>>::Error: std::fmt::Debug,
{
    fn from(r: RangeFrom<T>) -> SliceRange {
        let start = r.start.try_into().unwrap();
        SliceRange::new(start, None, 1)
    }
}

impl From<RangeFull> for SliceRange {
    fn from(_: RangeFull) -> SliceRange {
        SliceRange::new(0, None, 1)
    }
}
