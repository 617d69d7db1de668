use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

/// The index type used by dynamic-rank iteration.
pub type DynIndex = SmallVec<[usize; 4]>;

/// Iterator over all N-dimensional indices within a shape, in row-major
/// order.
///
/// The shape may be empty (rank 0), in which case the iterator yields a
/// single empty index. This is consistent with eg. `ndindex` in NumPy.
#[derive(Clone, Debug)]
pub struct Indices {
    shape: DynIndex,
    next: Option<DynIndex>,

    /// Remaining iteration steps.
    steps: usize,
}

impl Indices {
    /// Return an iterator over all the indices where each axis is between
    /// `0` and `shape[axis]`.
    pub fn from_shape(shape: &[usize]) -> Indices {
        let steps = shape.iter().product();
        Indices {
            shape: SmallVec::from_slice(shape),
            next: (steps > 0).then(|| smallvec![0; shape.len()]),
            steps,
        }
    }
}

impl Iterator for Indices {
    type Item = DynIndex;

    /// Return the next index in the sequence, or `None` after all indices
    /// have been returned.
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.steps -= 1;

        let mut next = current.clone();
        let mut has_next = false;
        for (index, &size) in next.iter_mut().zip(self.shape.iter()).rev() {
            *index += 1;
            if *index == size {
                *index = 0;
            } else {
                has_next = true;
                break;
            }
        }
        self.next = has_next.then_some(next);

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.steps, Some(self.steps))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}

/// Iterator over the buffer offsets of elements in a strided layout, in the
/// row-major order of their logical indices.
///
/// Strides may be negative. The caller guarantees that every offset visited
/// is non-negative.
#[derive(Clone, Debug)]
pub struct Offsets {
    shape: DynIndex,
    strides: SmallVec<[isize; 4]>,
    index: DynIndex,
    offset: isize,
    remaining: usize,
}

impl Offsets {
    pub fn new(base: usize, shape: &[usize], strides: &[isize]) -> Offsets {
        assert_eq!(shape.len(), strides.len());
        Offsets {
            shape: SmallVec::from_slice(shape),
            strides: SmallVec::from_slice(strides),
            index: smallvec![0; shape.len()],
            offset: base as isize,
            remaining: shape.iter().product(),
        }
    }
}

impl Iterator for Offsets {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset as usize;

        for axis in (0..self.shape.len()).rev() {
            self.index[axis] += 1;
            self.offset += self.strides[axis];
            if self.index[axis] < self.shape[axis] {
                break;
            }
            self.offset -= self.strides[axis] * self.shape[axis] as isize;
            self.index[axis] = 0;
        }

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets {}

impl FusedIterator for Offsets {}

#[cfg(test)]
mod tests {
    use super::{Indices, Offsets};

    #[test]
    fn test_indices() {
        let indices: Vec<Vec<usize>> = Indices::from_shape(&[2, 3])
            .map(|index| index.to_vec())
            .collect();
        assert_eq!(
            indices,
            [[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]].map(|i| i.to_vec())
        );

        let mut iter = Indices::from_shape(&[]);
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|i| i.len()), Some(0));
        assert!(iter.next().is_none());

        assert_eq!(Indices::from_shape(&[3, 0, 2]).count(), 0);
    }

    #[test]
    fn test_offsets() {
        let offsets: Vec<_> = Offsets::new(0, &[2, 3], &[3, 1]).collect();
        assert_eq!(offsets, [0, 1, 2, 3, 4, 5]);

        // Transposed
        let offsets: Vec<_> = Offsets::new(0, &[3, 2], &[1, 3]).collect();
        assert_eq!(offsets, [0, 3, 1, 4, 2, 5]);

        // Reversed columns of a 2x3 matrix
        let offsets: Vec<_> = Offsets::new(2, &[2, 3], &[3, -1]).collect();
        assert_eq!(offsets, [2, 1, 0, 5, 4, 3]);

        let offsets: Vec<_> = Offsets::new(4, &[], &[]).collect();
        assert_eq!(offsets, [4]);

        let mut offsets = Offsets::new(0, &[4, 0], &[1, 1]);
        assert_eq!(offsets.len(), 0);
        assert!(offsets.next().is_none());
    }
}
