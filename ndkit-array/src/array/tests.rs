use num_complex::Complex64;

use ndkit_testing::TestCases;

use crate::errors::{ArrayError, SliceError};
use crate::slice_range::{SliceItem, SliceRange};
use crate::{CopyStrategy, D1Array, D2Array, D3Array, DnArray, NdArray, D2, D3, DN};

#[test]
fn test_from_data() {
    let x = D2Array::from_data([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(x.shape(), &[2, 3]);
    assert_eq!(x.strides(), &[3, 1]);
    assert!(x.consistent());
    assert!(!x.is_view());
    assert_eq!(x.base(), None);

    let err = DnArray::from_data(&[2, 2], vec![1., 2., 3.]).err();
    assert_eq!(
        err,
        Some(ArrayError::LengthMismatch {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn test_constructors() {
    let x = D2Array::<f32>::zeros([2, 2]);
    assert_eq!(x.to_vec(), [0., 0., 0., 0.]);

    let x = DnArray::<i8>::ones(&[3]);
    assert_eq!(x.to_vec(), [1, 1, 1]);

    let x = D2Array::from_fn([2, 3], |index| (index[0] * 10 + index[1]) as i32);
    assert_eq!(x, D2Array::from([[0, 1, 2], [10, 11, 12]]));

    let x = D1Array::arange(0, 10, 3);
    assert_eq!(x.to_vec(), [0, 3, 6, 9]);
    let x = D1Array::arange(5., 0., -2.);
    assert_eq!(x.to_vec(), [5., 3., 1.]);
    let x = D1Array::arange(120i8, 127, 5);
    assert_eq!(x.to_vec(), [120, 125]);
    assert_eq!(
        D1Array::try_arange(0, 5, 0).err(),
        Some(SliceError::ZeroStep { axis: 0 })
    );

    let x = D1Array::linspace(0., 1., 5);
    assert_eq!(x.to_vec(), [0., 0.25, 0.5, 0.75, 1.]);
    assert!(D1Array::<f64>::linspace(0., 1., 0).is_empty());

    let x = D2Array::<i64>::identity(3);
    assert_eq!(x, D2Array::from([[1, 0, 0], [0, 1, 0], [0, 0, 1]]));

    let x = DnArray::scalar(7i16);
    assert_eq!(x.ndim(), 0);
    assert_eq!(x.item(), Ok(7));
    assert_eq!(x.get(&[]), Ok(7));

    let x = D3Array::from([[[1, 2], [3, 4]], [[5, 6], [7, 8]]]);
    assert_eq!(x.shape(), &[2, 2, 2]);
    assert_eq!(x.get([1, 0, 1]), Ok(6));
}

#[test]
fn test_get_set() {
    let mut x = D2Array::from([[1, 2, 3], [4, 5, 6]]);
    assert_eq!(x.get([1, 2]), Ok(6));
    x.set([0, 1], 20).unwrap();
    assert_eq!(x.to_vec(), [1, 20, 3, 4, 5, 6]);

    assert_eq!(
        x.get([2, 0]),
        Err(ArrayError::IndexOutOfBounds {
            axis: 0,
            index: 2,
            size: 2
        })
    );
    assert_eq!(
        x.set([0, 3], 1),
        Err(ArrayError::IndexOutOfBounds {
            axis: 1,
            index: 3,
            size: 3
        })
    );

    let y = x.as_dyn();
    assert_eq!(
        y.get(&[1]),
        Err(ArrayError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn test_view_aliasing() {
    let mut a = D2Array::from([[1, 2, 3], [4, 5, 6]]);
    let mut v = a.at(1).unwrap();
    assert!(v.is_view());
    assert_eq!(v.base(), Some(a.id()));
    assert!(!v.consistent());

    v.set([0], 40).unwrap();
    assert_eq!(a.get([1, 0]), Ok(40));

    a.set([1, 2], 60).unwrap();
    assert_eq!(v.to_vec(), [40, 5, 60]);

    // Views of views point at the array which owns the buffer.
    let w = v.slice_axis(0, 1..).unwrap();
    assert_eq!(w.base(), Some(a.id()));
    assert_eq!(w.to_vec(), [5, 60]);
}

#[test]
fn test_slice() {
    let x = D2Array::from([[1, 2, 3], [4, 5, 6]]);

    let col = x.slice((.., 1));
    assert_eq!(col.shape(), &[2]);
    assert_eq!(col.to_vec(), [2, 5]);

    // Full range with step 1 keeps strides but is still a view.
    let all = x.slice(..);
    assert_eq!(all.strides(), x.strides());
    assert!(all.is_view());
    assert!(all.consistent());

    let reversed = x.slice((SliceRange::new(-1, None, -1), SliceRange::down_to(2, 0)));
    assert_eq!(reversed.strides(), &[-3, -1]);
    assert_eq!(reversed.to_vec(), [6, 5, 4, 3, 2, 1]);
    assert!(!reversed.consistent());

    let stepped = x.slice((.., SliceRange::new(0, None, 2)));
    assert_eq!(stepped.to_vec(), [1, 3, 4, 6]);

    let empty = x.slice((.., 2..1));
    assert_eq!(empty.shape(), &[2, 0]);
    assert!(empty.is_empty());
    assert!(empty.to_vec().is_empty());

    assert_eq!(
        x.try_slice((.., 0..4)).err(),
        Some(ArrayError::InvalidSlice(SliceError::InvalidRange {
            axis: 1,
            range: SliceRange::new(0, Some(4), 1),
            size: 3
        }))
    );
    assert!(x.try_slice([0, 0, 0]).is_err());
    assert_eq!(
        x.try_slice((.., SliceRange::new(0, None, 0))).err(),
        Some(ArrayError::InvalidSlice(SliceError::ZeroStep { axis: 1 }))
    );
}

#[test]
fn test_slice_step_larger_than_axis() {
    let x = D1Array::arange(0, 5, 1);
    let y = x.slice(SliceRange::new(0, None, isize::MAX));
    assert_eq!(y.to_vec(), [0]);

    let y = x.slice(SliceRange::new(-1, None, isize::MIN));
    assert_eq!(y.to_vec(), [4]);

    let m = D2Array::from([[1, 2, 3], [4, 5, 6]]);
    let y = m.slice((SliceRange::new(1, None, isize::MAX), SliceRange::new(0, None, 2)));
    assert_eq!(y.shape(), &[1, 2]);
    assert_eq!(y.to_vec(), [4, 6]);
}

#[test]
#[should_panic(expected = "slice step for axis 0 is zero")]
fn test_slice_zero_step_panics() {
    D1Array::arange(0, 5, 1).slice(SliceRange::new(0, None, 0));
}

#[test]
fn test_slice_map() {
    let x = D3Array::from_fn([2, 3, 4], |i| (i[0] * 100 + i[1] * 10 + i[2]) as i32);
    let y = x
        .slice_map(&[(2, SliceItem::Index(3)), (0, SliceItem::range(1, None, 1))])
        .unwrap();
    assert_eq!(y.shape(), &[1, 3]);
    assert_eq!(y.to_vec(), [103, 113, 123]);

    assert_eq!(
        x.slice_map(&[(3, SliceItem::Index(0))]).err(),
        Some(ArrayError::InvalidAxis { axis: 3, ndim: 3 })
    );
    assert!(x
        .slice_map(&[(0, SliceItem::Index(0)), (0, SliceItem::Index(1))])
        .is_err());
}

#[test]
fn test_at() {
    let x = D3Array::from([[[1, 2], [3, 4]], [[5, 6], [7, 8]]]);
    let m = x.at(1).unwrap();
    assert_eq!(m, D2Array::from([[5, 6], [7, 8]]));
    let v = m.at(0).unwrap();
    assert_eq!(v.to_vec(), [5, 6]);
    assert!(x.at(2).is_err());

    let col = x.index_axis(2, 1).unwrap();
    assert_eq!(col, D2Array::from([[2, 4], [6, 8]]));
}

#[test]
fn test_transpose() {
    let x = D2Array::from([[1, 2, 3], [4, 5, 6]]);
    let t = x.transpose();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.base(), Some(x.id()));
    assert_eq!(t, D2Array::from([[1, 4], [2, 5], [3, 6]]));
    assert!(!t.consistent());

    let tt = t.transpose();
    assert_eq!(tt, x);
    assert_eq!(tt.base(), Some(x.id()));

    let x = D3Array::<f32>::zeros([2, 3, 4]);
    let p = x.permuted(&[1, 2, 0]).unwrap();
    assert_eq!(p.shape(), &[3, 4, 2]);
    assert!(x.permuted(&[0, 1]).is_err());
}

#[test]
fn test_squeeze_unsqueeze() {
    let x = DnArray::from_data(&[1, 3, 1], vec![1, 2, 3]).unwrap();
    let s = x.squeeze(None).unwrap();
    assert_eq!(s.shape(), &[3]);
    assert!(s.is_view());

    let s = x.squeeze(Some(0)).unwrap();
    assert_eq!(s.shape(), &[3, 1]);
    assert!(x.squeeze(Some(1)).is_err());

    let v = D1Array::from([1, 2, 3]);
    let row: D2Array<i32> = v.unsqueeze(0).unwrap();
    assert_eq!(row.shape(), &[1, 3]);
    let col = v.unsqueeze(1).unwrap();
    assert_eq!(col.shape(), &[3, 1]);
    assert_eq!(col.to_vec(), [1, 2, 3]);
    assert!(v.unsqueeze(2).is_err());
}

#[test]
fn test_reshape() {
    let x = D1Array::from([1, 2, 3, 4, 5, 6]);
    let y = x.reshape([2, 3]).unwrap();
    assert_eq!(y.base(), Some(x.id()));
    let z = y.reshape([3, 2]).unwrap();
    assert_eq!(z, D2Array::from([[1, 2], [3, 4], [5, 6]]));

    // Shares the buffer when consistent.
    let mut z = z;
    z.set([0, 0], 10).unwrap();
    assert_eq!(x.get([0]), Ok(10));

    // Copies when not consistent.
    let t = y.transpose();
    let r = t.reshape([6]).unwrap();
    assert_eq!(r.to_vec(), [10, 4, 2, 5, 3, 6]);
    assert!(!r.is_view());
    assert!(r.consistent());

    assert_eq!(
        x.reshape([4, 2]).err(),
        Some(ArrayError::LengthMismatch {
            expected: 6,
            actual: 8
        })
    );

    let dynamic = x.reshape(&[1, 2, 3, 1, 1]).unwrap();
    assert_eq!(dynamic.ndim(), 5);
    assert_eq!(t.flatten().to_vec(), [10, 4, 2, 5, 3, 6]);
}

#[test]
fn test_copy_and_deep_copy() {
    let mut a = D2Array::from([[1., 2.], [3., 4.]]);
    let c = a.deep_copy();
    let shallow = a.copy();
    a.set([0, 0], 100.).unwrap();
    assert_eq!(c.get([0, 0]), Ok(1.));
    assert_eq!(shallow.get([0, 0]), Ok(1.));
    assert!(c.consistent());
    assert!(shallow.consistent());

    // `copy` keeps the memory order of the source's axes, `deep_copy` is
    // always row-major.
    let t = a.transpose();
    let tc = t.copy();
    assert_eq!(tc, t);
    assert_eq!(tc.strides(), &[1, 2]);
    assert!(!tc.consistent());
    assert!(!tc.is_view());
    let td = t.deep_copy();
    assert_eq!(td, t);
    assert!(td.consistent());

    let r = a.slice((.., SliceRange::new(-1, None, -1)));
    let rc = r.copy();
    assert_eq!(rc.to_vec(), [2., 100., 4., 3.]);
    assert!(rc.consistent());

    let cloned = a.clone();
    assert_eq!(cloned, a);
    assert_ne!(cloned.id(), a.id());
}

#[test]
fn test_type_conversion() {
    let x = D1Array::from([1.75f64, -2.5, 3.0]);
    let y: D1Array<i32> = x.as_type();
    assert_eq!(y.to_vec(), [1, -2, 3]);

    let z: D1Array<Complex64> = y.as_type();
    assert_eq!(z.get([1]), Ok(Complex64::new(-2., 0.)));

    // Meaningful copies share the buffer unless the source is a view or the
    // type changes.
    let same: D1Array<f64> = x.to_type(CopyStrategy::Meaningful);
    assert!(same.data().ptr_eq(x.data()));
    assert_eq!(same.base(), Some(x.id()));

    let full: D1Array<f64> = x.to_type(CopyStrategy::Full);
    assert!(!full.data().ptr_eq(x.data()));

    let view = x.slice_axis(0, 1..).unwrap();
    let copied: D1Array<f64> = view.to_type(CopyStrategy::Meaningful);
    assert!(!copied.data().ptr_eq(x.data()));
    assert_eq!(copied.to_vec(), [-2.5, 3.0]);

    let narrowed: D1Array<f32> = x.to_type(CopyStrategy::Meaningful);
    assert_eq!(narrowed.to_vec(), [1.75, -2.5, 3.0]);
}

#[test]
fn test_equality() {
    let a = D2Array::from([[1, 2], [3, 4]]);
    let b = DnArray::from_data(&[4], vec![1, 2, 3, 4])
        .unwrap()
        .reshape([2, 2])
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, a.transpose());
    assert_ne!(
        a.as_dyn(),
        DnArray::from_data(&[4], vec![1, 2, 3, 4]).unwrap()
    );
}

#[test]
fn test_rank_conversions() {
    let x = DnArray::from_data(&[2, 2], vec![1, 2, 3, 4]).unwrap();
    let id = x.id();
    let m: D2Array<i32> = x.into_dim().unwrap();
    assert_eq!(m.id(), id);

    let err = m.as_dyn().into_dim::<D3>().err();
    assert_eq!(
        err,
        Some(ArrayError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    );

    let d: NdArray<i32, DN> = m.into_dyn();
    assert_eq!(d.into_dim::<D2>().map(|m| m.shape().to_vec()), Ok(vec![2, 2]));
}

#[test]
fn test_fill_map_assign() {
    let mut a = D2Array::from([[1, 2], [3, 4]]);
    let mut col = a.index_axis(1, 0).unwrap();
    col.fill(0);
    assert_eq!(a.to_vec(), [0, 2, 0, 4]);

    let doubled = a.map(|x| x as f32 * 2.);
    assert_eq!(doubled.to_vec(), [0., 4., 0., 8.]);

    // Assigning a transposed view of the same buffer.
    let t = a.transpose();
    a.assign(&t).unwrap();
    assert_eq!(a.to_vec(), [0, 0, 2, 4]);

    let b = D2Array::from([[1, 2, 3]]);
    assert!(a.assign(&b).is_err());
}

#[test]
fn test_concat_and_stack() {
    #[derive(Debug)]
    struct Case {
        axis: usize,
        expected: Vec<usize>,
    }

    let a = D2Array::from([[1, 2], [3, 4]]);
    let b = D2Array::from([[5, 6], [7, 8]]);

    [
        Case {
            axis: 0,
            expected: vec![4, 2],
        },
        Case {
            axis: 1,
            expected: vec![2, 4],
        },
    ]
    .test_each(|case| {
        let c = D2Array::concat(case.axis, &[&a, &b]).unwrap();
        assert_eq!(c.shape(), case.expected.as_slice());
    });

    let c = D2Array::concat(1, &[&a, &b]).unwrap();
    assert_eq!(c.to_vec(), [1, 2, 5, 6, 3, 4, 7, 8]);

    let s = D2Array::stack(0, &[&a, &b]).unwrap();
    assert_eq!(s.shape(), &[2, 2, 2]);
    assert_eq!(s.at(1).unwrap(), b);
    let s = D2Array::stack(2, &[&a, &b]).unwrap();
    assert_eq!(s.get([0, 1, 1]), Ok(6));

    let wide = D2Array::from([[1, 2, 3]]);
    assert!(matches!(
        D2Array::concat(0, &[&a, &wide]),
        Err(ArrayError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        D2Array::concat(2, &[&a, &b]),
        Err(ArrayError::InvalidAxis { axis: 2, ndim: 2 })
    ));
    assert!(D2Array::stack(0, &[&a, &wide]).is_err());
}

#[test]
fn test_memory_view_sharing() {
    let buf = crate::MemoryView::from(vec![1, 2, 3, 4]);
    let mut a = D2Array::from_memory_view([2, 2], buf.clone()).unwrap();
    a.set([1, 1], 40).unwrap();
    assert_eq!(buf.to_vec(), [1, 2, 3, 40]);
    assert!(D2Array::from_memory_view([3, 2], buf).is_err());
}
