//! Shared, flat element buffers.

use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dtype::{DataType, Element};
use crate::errors::ArrayError;

/// Flat buffer of elements of a single type, shared by an array and every
/// view derived from it.
///
/// Cloning a `MemoryView` creates another handle to the same buffer. Writes
/// through any handle are visible through all of them. Use
/// [`MemoryView::deep_clone`] to copy the elements into a new buffer.
///
/// The buffer is guarded by a lock so that handles can be shared across
/// threads. Each operation holds the lock only for its own duration, so
/// concurrent writers to overlapping elements still need to coordinate.
pub struct MemoryView<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for MemoryView<T> {
    fn clone(&self) -> Self {
        MemoryView {
            data: self.data.clone(),
        }
    }
}

impl<T> MemoryView<T> {
    /// Create a buffer which takes ownership of `data`.
    pub fn new(data: Vec<T>) -> MemoryView<T> {
        MemoryView {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Return the number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Return true if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if `self` and `other` are handles to the same buffer.
    pub fn ptr_eq(&self, other: &MemoryView<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        // A panic while holding the lock cannot leave a `Vec<T>` of `Copy`
        // elements in an invalid state.
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Element> MemoryView<T> {
    /// Create a buffer of `len` zeros.
    pub fn zeros(len: usize) -> MemoryView<T> {
        MemoryView::new(vec![T::zero(); len])
    }

    /// Return the element type of the buffer.
    pub fn dtype(&self) -> DataType {
        T::DTYPE
    }

    /// Return the element at flat index `index`.
    pub fn get(&self, index: usize) -> Result<T, ArrayError> {
        let data = self.read();
        data.get(index)
            .copied()
            .ok_or(ArrayError::IndexOutOfBounds {
                axis: 0,
                index,
                size: data.len(),
            })
    }

    /// Replace the element at flat index `index`.
    pub fn set(&self, index: usize, value: T) -> Result<(), ArrayError> {
        let mut data = self.write();
        let size = data.len();
        let elem = data.get_mut(index).ok_or(ArrayError::IndexOutOfBounds {
            axis: 0,
            index,
            size,
        })?;
        *elem = value;
        Ok(())
    }

    /// Copy the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Copy the elements into a new, unshared buffer.
    pub fn deep_clone(&self) -> MemoryView<T> {
        MemoryView::new(self.to_vec())
    }

    /// Return an iterator over a snapshot of the elements.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Set every element to `value`.
    pub fn fill(&self, value: T) {
        self.write().fill(value);
    }

    fn apply_scalar(&self, value: T, op: impl Fn(T, T) -> T) {
        for x in self.write().iter_mut() {
            *x = op(*x, value);
        }
    }

    fn apply_elementwise(
        &self,
        other: &MemoryView<T>,
        op: impl Fn(T, T) -> T,
    ) -> Result<(), ArrayError> {
        // Never hold a lock on `other` while taking the write lock on `self`.
        // That deadlocks if they are the same buffer, or if another thread
        // applies an operation in the opposite direction.
        if self.ptr_eq(other) {
            for x in self.write().iter_mut() {
                *x = op(*x, *x);
            }
            return Ok(());
        }

        let src = other.to_vec();
        let mut dest = self.write();
        if src.len() != dest.len() {
            return Err(ArrayError::LengthMismatch {
                expected: dest.len(),
                actual: src.len(),
            });
        }
        for (x, &y) in dest.iter_mut().zip(src.iter()) {
            *x = op(*x, y);
        }
        Ok(())
    }

    /// Add each element of `other` to the corresponding element of `self`.
    ///
    /// Fails with [`ArrayError::LengthMismatch`] if the buffers have
    /// different lengths.
    pub fn try_add_assign(&self, other: &MemoryView<T>) -> Result<(), ArrayError> {
        self.apply_elementwise(other, |x, y| x + y)
    }

    /// Subtract each element of `other` from the corresponding element of
    /// `self`.
    pub fn try_sub_assign(&self, other: &MemoryView<T>) -> Result<(), ArrayError> {
        self.apply_elementwise(other, |x, y| x - y)
    }

    /// Multiply each element of `self` by the corresponding element of
    /// `other`.
    pub fn try_mul_assign(&self, other: &MemoryView<T>) -> Result<(), ArrayError> {
        self.apply_elementwise(other, |x, y| x * y)
    }

    /// Divide each element of `self` by the corresponding element of
    /// `other`.
    pub fn try_div_assign(&self, other: &MemoryView<T>) -> Result<(), ArrayError> {
        self.apply_elementwise(other, |x, y| x / y)
    }
}

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $try_method:ident, $op:tt) => {
        impl<T: Element> $trait<T> for MemoryView<T> {
            fn $method(&mut self, rhs: T) {
                self.apply_scalar(rhs, |x, y| x $op y);
            }
        }

        impl<T: Element> $trait<&MemoryView<T>> for MemoryView<T> {
            /// Panics if the buffers have different lengths.
            fn $method(&mut self, rhs: &MemoryView<T>) {
                if let Err(err) = self.$try_method(rhs) {
                    panic!("{}", err);
                }
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, try_add_assign, +);
impl_assign_op!(SubAssign, sub_assign, try_sub_assign, -);
impl_assign_op!(MulAssign, mul_assign, try_mul_assign, *);
impl_assign_op!(DivAssign, div_assign, try_div_assign, /);

impl<T: Element> From<Vec<T>> for MemoryView<T> {
    fn from(data: Vec<T>) -> Self {
        MemoryView::new(data)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for MemoryView<T> {
    fn from(data: [T; N]) -> Self {
        MemoryView::new(data.into())
    }
}

impl<T: Element> PartialEq for MemoryView<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl<T: fmt::Debug> fmt::Debug for MemoryView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryView").field(&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::MemoryView;
    use crate::dtype::DataType;
    use crate::errors::ArrayError;

    #[test]
    fn test_scalar_compound_ops() {
        let mut view = MemoryView::from([10i32, 20, 30]);
        view += 5;
        assert_eq!(view.to_vec(), [15, 25, 35]);

        let mut view = MemoryView::from([10i32, 20, 30]);
        view -= 5;
        assert_eq!(view.to_vec(), [5, 15, 25]);

        let mut view = MemoryView::from([10i32, 20, 30]);
        view *= 5;
        assert_eq!(view.to_vec(), [50, 100, 150]);

        let mut view = MemoryView::from([10i32, 20, 30]);
        view /= 5;
        assert_eq!(view.to_vec(), [2, 4, 6]);

        let mut view = MemoryView::from([-7i8, 7]);
        view /= 2;
        assert_eq!(view.to_vec(), [-3, 3]);
    }

    #[test]
    fn test_elementwise_compound_ops() {
        let mut view = MemoryView::from([1.0f64, 2.0, 3.0]);
        let other = MemoryView::from([0.5f64, 0.5, 1.5]);
        view += &other;
        assert_eq!(view.to_vec(), [1.5, 2.5, 4.5]);
        view *= &other;
        assert_eq!(view.to_vec(), [0.75, 1.25, 6.75]);

        let mut view = MemoryView::from([Complex64::new(1., 1.)]);
        view -= &MemoryView::from([Complex64::new(0., 1.)]);
        assert_eq!(view.to_vec(), [Complex64::new(1., 0.)]);
    }

    #[test]
    fn test_self_aliasing_ops() {
        let mut view = MemoryView::from([1i64, 2, 3]);
        let alias = view.clone();
        view += &alias;
        assert_eq!(alias.to_vec(), [2, 4, 6]);
        assert!(view.try_div_assign(&alias).is_ok());
        assert_eq!(view.to_vec(), [1, 1, 1]);
    }

    #[test]
    fn test_opposing_ops_on_two_threads() {
        let a = MemoryView::from(vec![1i64; 64]);
        let b = MemoryView::from(vec![1i64; 64]);

        std::thread::scope(|s| {
            let (mut a1, b1) = (a.clone(), b.clone());
            let (mut b2, a2) = (b.clone(), a.clone());
            s.spawn(move || {
                for _ in 0..1000 {
                    a1 *= &b1;
                }
            });
            s.spawn(move || {
                for _ in 0..1000 {
                    b2 *= &a2;
                }
            });
        });

        assert!(a.iter().all(|x| x == 1));
        assert!(b.iter().all(|x| x == 1));
    }

    #[test]
    fn test_length_mismatch() {
        let view = MemoryView::from([1i16, 2, 3]);
        let other = MemoryView::from([1i16, 2]);
        assert_eq!(
            view.try_add_assign(&other),
            Err(ArrayError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(view.to_vec(), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "expected 3 elements but found 2")]
    fn test_length_mismatch_operator_panics() {
        let mut view = MemoryView::from([1i16, 2, 3]);
        view -= &MemoryView::from([1i16, 2]);
    }

    #[test]
    fn test_get_set_and_sharing() {
        let view = MemoryView::from([1.0f32, 2.0]);
        let alias = view.clone();
        view.set(1, 5.0).unwrap();
        assert_eq!(alias.get(1), Ok(5.0));
        assert_eq!(
            alias.get(2),
            Err(ArrayError::IndexOutOfBounds {
                axis: 0,
                index: 2,
                size: 2
            })
        );
        assert_eq!(view.dtype(), DataType::Float32);

        let copy = view.deep_clone();
        view.fill(0.);
        assert_eq!(copy.to_vec(), [1.0, 5.0]);
        assert!(!copy.ptr_eq(&view));
        assert!(alias.ptr_eq(&view));
    }
}
