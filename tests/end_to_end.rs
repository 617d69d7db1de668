use ndkit::linalg::{inv, Dot};
use ndkit::{math, stat, D1Array, D2Array};
use ndkit_array::test_util::expect_equal_with_tolerance;
use ndkit_array::{CopyStrategy, DnArray};

#[test]
fn test_element_wise_arithmetic() {
    let a = D1Array::from([1, 2, 3]);
    let b = D1Array::from([10, 20, 30]);

    assert_eq!(&a + &b, D1Array::from([11, 22, 33]));
    assert_eq!(&a + 100, D1Array::from([101, 102, 103]));
    assert_eq!(5 + &a, D1Array::from([6, 7, 8]));

    let bytes = D1Array::from([1i8, 2, 5]);
    assert_eq!(10i8 / &bytes, D1Array::from([10, 5, 2]));
}

#[test]
fn test_cum_sum() {
    let a = D1Array::from([1, 2, 3, 4, 5]);
    assert_eq!(math::cum_sum(&a), Ok(D1Array::from([1, 3, 6, 10, 15])));
}

#[test]
fn test_reshape_chain() {
    let a = D1Array::from([1, 2, 3, 4, 5, 6]);
    let reshaped = a.reshape([2, 3]).unwrap().reshape([3, 2]).unwrap();
    assert_eq!(reshaped, D2Array::from([[1, 2], [3, 4], [5, 6]]));
}

#[test]
fn test_inverse_round_trip() {
    for n in 1..=6 {
        let m = D2Array::from_fn([n, n], |index| {
            let (i, j) = (index[0] as f64, index[1] as f64);
            if index[0] == index[1] {
                n as f64 + 1.
            } else {
                (i - j).sin()
            }
        });
        let product = m.dot(&inv(&m).unwrap()).unwrap();
        expect_equal_with_tolerance(&product, &D2Array::identity(n), 1e-10, 0.).unwrap();
    }
}

#[test]
fn test_operations_on_views() {
    let a = DnArray::from_data([2, 3, 4].as_slice(), (0..24).map(|x| x as f64).collect()).unwrap();
    let view = a.slice((.., 1, 1..3));
    assert!(!view.consistent());
    assert_eq!(view.to_vec(), vec![5., 6., 17., 18.]);

    assert_eq!(math::sum(&view), Ok(46.));
    assert_eq!(stat::mean(&view), Ok(11.5));
    assert_eq!(stat::median(&view), Ok(11.5));

    let copy = view.to_type::<f32>(CopyStrategy::Meaningful);
    assert_eq!(math::max(&copy), Ok(18f32));
}
