//! Linear algebra on vectors and matrices, evaluated by the default engine.
//!
//! Functions which produce fractional results, such as [`inv`] or [`qr`],
//! promote integer inputs to `f64`. Float and complex inputs keep their
//! element type.
//!
//! ```
//! use ndkit::linalg::{inv, Dot};
//! use ndkit_array::D2Array;
//!
//! let m = D2Array::from([[4f64, 7.], [2., 6.]]);
//! let product = m.dot(&inv(&m).unwrap()).unwrap();
//! assert!((product.get([0, 0]).unwrap() - 1.).abs() < 1e-12);
//! assert!(product.get([0, 1]).unwrap().abs() < 1e-12);
//! ```

use ndkit_array::{D1Array, D2Array, Dimension, DnArray, NdArray};

use crate::errors::OpError;
use crate::number::Promote;
use crate::registry::linalg_engine;
use crate::value::{value_of, ValueElement};

pub use crate::engine::Norm;

/// Inner products of vectors and matrices.
///
/// This is implemented for the vector-vector, matrix-vector, vector-matrix
/// and matrix-matrix cases. The inner dimensions of the operands must match.
pub trait Dot<Rhs> {
    type Output;

    fn dot(&self, rhs: &Rhs) -> Result<Self::Output, OpError>;
}

impl<T: ValueElement> Dot<D1Array<T>> for D1Array<T> {
    type Output = T;

    fn dot(&self, rhs: &D1Array<T>) -> Result<T, OpError> {
        let product = linalg_engine()?.dot(&value_of(self), &value_of(rhs))?;
        let product: DnArray<T> = product.into_array()?;
        Ok(product.item()?)
    }
}

macro_rules! impl_dot {
    ($lhs:ident, $rhs:ident, $output:ident) => {
        impl<T: ValueElement> Dot<$rhs<T>> for $lhs<T> {
            type Output = $output<T>;

            fn dot(&self, rhs: &$rhs<T>) -> Result<$output<T>, OpError> {
                let product = linalg_engine()?.dot(&value_of(self), &value_of(rhs))?;
                Ok(product.into_array()?)
            }
        }
    };
}

impl_dot!(D2Array, D1Array, D1Array);
impl_dot!(D1Array, D2Array, D1Array);
impl_dot!(D2Array, D2Array, D2Array);

/// Compute the inner product of `a` and `b`.
///
/// This is a function form of [`Dot::dot`].
pub fn dot<A: Dot<B>, B>(a: &A, b: &B) -> Result<A::Output, OpError> {
    a.dot(b)
}

/// Return the inverse of a square matrix.
///
/// Fails with [`OpError::SingularMatrix`] if `a` is not invertible.
pub fn inv<T: Promote>(a: &D2Array<T>) -> Result<D2Array<T::Float>, OpError> {
    let inverse = linalg_engine()?.inv(&value_of(a))?;
    Ok(inverse.into_array()?)
}

/// Raise a square matrix to a non-negative integer power.
///
/// `pow(a, 0)` is the identity matrix.
pub fn pow<T: ValueElement>(a: &D2Array<T>, n: u32) -> Result<D2Array<T>, OpError> {
    let power = linalg_engine()?.pow(&value_of(a), n)?;
    Ok(power.into_array()?)
}

/// Compute a matrix norm.
pub fn norm<T: ValueElement>(a: &D2Array<T>, norm: Norm) -> Result<f64, OpError> {
    linalg_engine()?.norm(&value_of(a), norm)
}

/// Solve `a x = b` for `x`, where `a` is square and `b` is a vector or a
/// matrix with one column per right-hand side.
pub fn solve<T: Promote, D: Dimension>(
    a: &D2Array<T>,
    b: &NdArray<T, D>,
) -> Result<NdArray<T::Float, D>, OpError> {
    let x = linalg_engine()?
        .linalg_ex()
        .solve(&value_of(a), &value_of(b))?;
    Ok(x.into_array()?)
}

/// Compute the QR decomposition of an `m x n` matrix.
///
/// Returns `(q, r)` where `q` is an `m x m` unitary matrix and `r` is an
/// `m x n` upper triangular matrix.
pub fn qr<T: Promote>(a: &D2Array<T>) -> Result<(D2Array<T::Float>, D2Array<T::Float>), OpError> {
    let (q, r) = linalg_engine()?.linalg_ex().qr(&value_of(a))?;
    Ok((q.into_array()?, r.into_array()?))
}

/// Compute the LU decomposition of an `m x n` matrix with partial pivoting.
///
/// Returns `(p, l, u)` such that `a = p l u`, where `p` is a permutation
/// matrix, `l` is unit lower triangular with shape `m x k` and `u` is upper
/// triangular with shape `k x n`, for `k = min(m, n)`.
#[allow(clippy::type_complexity)]
pub fn plu<T: Promote>(
    a: &D2Array<T>,
) -> Result<(D2Array<T::Float>, D2Array<T::Float>, D2Array<T::Float>), OpError> {
    let (p, l, u) = linalg_engine()?.linalg_ex().plu(&value_of(a))?;
    Ok((p.into_array()?, l.into_array()?, u.into_array()?))
}

/// Compute the thin singular value decomposition of an `m x n` matrix.
///
/// Returns `(u, s, vh)` such that `a = u diag(s) vh`. The singular values
/// `s` are real, non-negative and in descending order.
#[allow(clippy::type_complexity)]
pub fn svd<T: Promote>(
    a: &D2Array<T>,
) -> Result<(D2Array<T::Float>, D1Array<T::Real>, D2Array<T::Float>), OpError> {
    let (u, s, vh) = linalg_engine()?.linalg_ex().svd(&value_of(a))?;
    Ok((u.into_array()?, s.into_array()?, vh.into_array()?))
}

/// Compute the eigenvalues and right eigenvectors of a square matrix.
///
/// Results are complex even for real inputs. Column `i` of the returned
/// matrix is the unit-norm eigenvector for eigenvalue `i`.
pub fn eig<T: Promote>(
    a: &D2Array<T>,
) -> Result<(D1Array<T::Complex>, D2Array<T::Complex>), OpError> {
    let (values, vectors) = linalg_engine()?.linalg_ex().eig(&value_of(a))?;
    Ok((values.into_array()?, vectors.into_array()?))
}

#[cfg(test)]
mod tests {
    use ndkit_array::test_util::{expect_equal, expect_equal_with_tolerance};
    use ndkit_array::{ArrayError, D1Array, D2Array, DataType};
    use ndkit_testing::TestCases;
    use num_complex::Complex64;

    use super::{dot, eig, inv, norm, plu, pow, qr, solve, svd, Dot, Norm};
    use crate::errors::OpError;

    #[test]
    fn test_dot() {
        let v = D1Array::from([1, 2, 3]);
        let m = D2Array::from([[1, 0, 2], [0, 1, -1]]);

        assert_eq!(v.dot(&v), Ok(14));
        assert_eq!(m.dot(&v), Ok(D1Array::from([7, -1])));
        assert_eq!(D1Array::from([1, 1]).dot(&m), Ok(D1Array::from([1, 1, 1])));
        assert_eq!(
            dot(&m, &m.transpose()),
            Ok(D2Array::from([[5, -2], [-2, 2]]))
        );

        let complex = D1Array::from([Complex64::new(0., 1.), Complex64::new(1., 0.)]);
        assert_eq!(complex.dot(&complex), Ok(Complex64::new(0., 0.)));

        assert_eq!(
            m.dot(&m),
            Err(OpError::Array(ArrayError::ShapeMismatch {
                left: vec![2, 3],
                right: vec![2, 3],
            }))
        );
    }

    #[test]
    fn test_inv_dot_round_trip() {
        #[derive(Debug)]
        struct Case {
            matrix: D2Array<f64>,
        }

        let cases = [
            Case {
                matrix: D2Array::from([[4., 7.], [2., 6.]]),
            },
            Case {
                matrix: D2Array::from([[0., 1., 2.], [1., 0., 3.], [4., -3., 8.]]),
            },
            Case {
                matrix: D2Array::from_fn([5, 5], |index| {
                    if index[0] == index[1] {
                        10.
                    } else {
                        (index[0] as f64 - index[1] as f64) * 0.5
                    }
                }),
            },
        ];

        cases.test_each(|case| {
            let n = case.matrix.shape()[0];
            let product = case.matrix.dot(&inv(&case.matrix).unwrap()).unwrap();
            expect_equal_with_tolerance(&product, &D2Array::identity(n), 1e-9, 0.).unwrap();
        })
    }

    #[test]
    fn test_inv_errors() {
        let ints = D2Array::from([[2, 0], [0, 4]]);
        let inverse = inv(&ints).unwrap();
        assert_eq!(inverse.dtype(), DataType::Float64);
        assert_eq!(inverse, D2Array::from([[0.5, 0.], [0., 0.25]]));

        assert_eq!(
            inv(&D2Array::from([[1f64, 2.], [2., 4.]])),
            Err(OpError::SingularMatrix)
        );
        assert_eq!(
            inv(&D2Array::from([[1f64, 2., 3.]])),
            Err(OpError::InvalidValue("matrix must be square"))
        );
    }

    #[test]
    fn test_pow_and_norm() {
        let m = D2Array::from([[1, 1], [1, 0]]);
        assert_eq!(pow(&m, 0), Ok(D2Array::identity(2)));
        assert_eq!(pow(&m, 10), Ok(D2Array::from([[89, 55], [55, 34]])));

        let m = D2Array::from([[1., -2.], [-3., 4.]]);
        assert_eq!(norm(&m, Norm::Max), Ok(4.));
        assert_eq!(norm(&m, Norm::Inf), Ok(7.));
        assert_eq!(norm(&m, Norm::N1), Ok(6.));
        assert!((norm(&m, Norm::Fro).unwrap() - 30f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_solve() {
        let a = D2Array::from([[3f64, 1.], [1., 2.]]);
        let b = D1Array::from([9., 8.]);
        let x = solve(&a, &b).unwrap();
        expect_equal(&x, &D1Array::from([2., 3.])).unwrap();

        let b = D2Array::from([[9., 3.], [8., 1.]]);
        let x = solve(&a, &b).unwrap();
        expect_equal(&x, &D2Array::from([[2., 1.], [3., 0.]])).unwrap();

        let ints = solve(&D2Array::from([[2, 0], [0, 4]]), &D1Array::from([2, 2])).unwrap();
        assert_eq!(ints, D1Array::from([1., 0.5]));
    }

    #[test]
    fn test_decompositions() {
        let a = D2Array::from([[2f64, -1., 0.], [-1., 2., -1.], [0., -1., 2.], [1., 1., 1.]]);

        let (q, r) = qr(&a).unwrap();
        assert_eq!(q.shape(), &[4, 4]);
        assert_eq!(r.shape(), &[4, 3]);
        expect_equal(&q.dot(&r).unwrap(), &a).unwrap();

        let (p, l, u) = plu(&a).unwrap();
        assert_eq!(l.shape(), &[4, 3]);
        assert_eq!(u.shape(), &[3, 3]);
        expect_equal(&p.dot(&l.dot(&u).unwrap()).unwrap(), &a).unwrap();

        let (u, s, vh) = svd(&a).unwrap();
        assert_eq!(u.shape(), &[4, 3]);
        assert_eq!(vh.shape(), &[3, 3]);
        let s_mat = D2Array::from_fn([3, 3], |index| {
            if index[0] == index[1] {
                s.get([index[0]]).unwrap()
            } else {
                0.
            }
        });
        expect_equal(&u.dot(&s_mat.dot(&vh).unwrap()).unwrap(), &a).unwrap();
        let s = s.to_vec();
        assert!(s.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_eig() {
        let a = D2Array::from([[2, 0], [0, 3]]);
        let (values, vectors): (D1Array<Complex64>, D2Array<Complex64>) = eig(&a).unwrap();
        assert_eq!(values.dtype(), DataType::ComplexFloat64);
        assert_eq!(vectors.shape(), &[2, 2]);

        let mut re: Vec<f64> = values.iter().map(|v| v.re).collect();
        re.sort_by(f64::total_cmp);
        assert!((re[0] - 2.).abs() < 1e-12);
        assert!((re[1] - 3.).abs() < 1e-12);
        assert!(values.iter().all(|v| v.im.abs() < 1e-12));

        // Each column satisfies A v = lambda v.
        let complex_a = a.map(|x| Complex64::new(x as f64, 0.));
        let av = complex_a.dot(&vectors).unwrap();
        for (j, lambda) in values.iter().enumerate() {
            for i in 0..2 {
                let lhs = av.get([i, j]).unwrap();
                let rhs = vectors.get([i, j]).unwrap() * lambda;
                assert!((lhs - rhs).norm() < 1e-9);
            }
        }
    }
}
