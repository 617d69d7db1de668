//! Singular value decomposition using one-sided Jacobi rotations.

use num_traits::{Float, One, Zero};

use crate::errors::OpError;
use crate::number::FloatElement;

use super::matrix::Matrix;

/// Maximum number of sweeps over all column pairs before giving up.
const MAX_SWEEPS: usize = 60;

/// Thin singular value decomposition `A = U * diag(S) * Vh` of an `m x n`
/// matrix, where `k = min(m, n)`.
pub struct Svd<T: FloatElement> {
    /// `m x k` matrix with orthonormal columns.
    pub u: Matrix<T>,

    /// Singular values in descending order.
    pub s: Vec<T::Real>,

    /// `k x n` matrix with orthonormal rows.
    pub vh: Matrix<T>,
}

/// Return the conjugate transpose of `a`.
pub fn adjoint<T: FloatElement>(a: &Matrix<T>) -> Matrix<T> {
    let mut out = Matrix::zeros(a.cols(), a.rows());
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            out[[j, i]] = a[[i, j]].conj();
        }
    }
    out
}

/// Compute the thin SVD of `a`.
///
/// Returns [`OpError::NumericFailure`] if the rotations do not converge.
pub fn svd<T: FloatElement>(a: &Matrix<T>) -> Result<Svd<T>, OpError> {
    if a.rows() < a.cols() {
        // Decompose `A^H = U' S V'^H`, then `A = V' S U'^H`.
        let Svd { u, s, vh } = svd_tall(&adjoint(a))?;
        return Ok(Svd {
            u: adjoint(&vh),
            s,
            vh: adjoint(&u),
        });
    }
    svd_tall(a)
}

/// Compute the thin SVD of a matrix with at least as many rows as columns.
fn svd_tall<T: FloatElement>(a: &Matrix<T>) -> Result<Svd<T>, OpError> {
    let (m, n) = (a.rows(), a.cols());
    let mut u = a.clone();
    let mut v = Matrix::<T>::identity(n);
    let tolerance = T::Real::epsilon() * T::real_from_f64(m.max(1) as f64);

    let mut converged = n < 2;
    for _ in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        let mut rotated = false;
        for p in 0..n {
            for q in p + 1..n {
                let mut alpha = T::Real::zero();
                let mut beta = T::Real::zero();
                let mut gamma = T::zero();
                for i in 0..m {
                    let (up, uq) = (u[[i, p]], u[[i, q]]);
                    alpha = alpha + up.abs() * up.abs();
                    beta = beta + uq.abs() * uq.abs();
                    gamma = gamma + up.conj() * uq;
                }

                let gamma_abs = gamma.abs();
                if gamma_abs.is_zero() || gamma_abs <= tolerance * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                // Rotate column `q` by the phase of `gamma` so that the
                // remaining rotation is real.
                let phase = gamma / T::from_real(gamma_abs);
                let two = T::real_from_f64(2.);
                let zeta = (beta - alpha) / (two * gamma_abs);
                let sign = if zeta >= T::Real::zero() {
                    T::Real::one()
                } else {
                    -T::Real::one()
                };
                let t = sign / (zeta.abs() + (T::Real::one() + zeta * zeta).sqrt());
                let c = (T::Real::one() + t * t).sqrt().recip();
                let s = c * t;

                rotate_columns(&mut u, p, q, c, s, phase);
                rotate_columns(&mut v, p, q, c, s, phase);
            }
        }
        converged = !rotated;
    }
    if !converged {
        return Err(OpError::NumericFailure("SVD did not converge"));
    }

    let norms: Vec<T::Real> = (0..n)
        .map(|j| {
            (0..m)
                .fold(T::Real::zero(), |acc, i| acc + u[[i, j]].abs() * u[[i, j]].abs())
                .sqrt()
        })
        .collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| norms[b].partial_cmp(&norms[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut u_out = Matrix::zeros(m, n);
    let mut vh = Matrix::zeros(n, n);
    let mut s = Vec::with_capacity(n);
    for (k, &j) in order.iter().enumerate() {
        let sigma = norms[j];
        s.push(sigma);

        // Columns for zero singular values are left as-is.
        let scale = if sigma.is_zero() {
            T::one()
        } else {
            T::from_real(sigma.recip())
        };
        for i in 0..m {
            u_out[[i, k]] = u[[i, j]] * scale;
        }
        for i in 0..n {
            vh[[k, i]] = v[[i, j]].conj();
        }
    }

    Ok(Svd { u: u_out, s, vh })
}

/// Replace columns `p` and `q` of `a` with
/// `(c * a_p - s * conj(phase) * a_q, s * phase * a_p + c * a_q)`.
fn rotate_columns<T: FloatElement>(
    a: &mut Matrix<T>,
    p: usize,
    q: usize,
    c: T::Real,
    s: T::Real,
    phase: T,
) {
    let (c, s) = (T::from_real(c), T::from_real(s));
    for i in 0..a.rows() {
        let (ap, aq) = (a[[i, p]], a[[i, q]]);
        a[[i, p]] = c * ap - s * phase.conj() * aq;
        a[[i, q]] = s * phase * ap + c * aq;
    }
}

#[cfg(test)]
mod tests {
    use ndkit_array::D2Array;
    use num_complex::Complex64;

    use super::{adjoint, svd, Svd};
    use crate::kernels::matrix::Matrix;
    use crate::number::{FloatElement, Magnitude};

    fn reconstruct<T: FloatElement>(svd: &Svd<T>) -> Matrix<T> {
        let mut us = svd.u.clone();
        for i in 0..us.rows() {
            for j in 0..us.cols() {
                us[[i, j]] = us[[i, j]] * T::from_real(svd.s[j]);
            }
        }
        us.matmul(&svd.vh)
    }

    fn assert_close<T: FloatElement>(a: &Matrix<T>, b: &Matrix<T>) {
        assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()));
        for (x, y) in a.data().iter().zip(b.data()) {
            assert!((*x - *y).magnitude() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_svd_real() {
        let cases = [
            Matrix::from_array(&D2Array::from([[3f64, 0.], [0., -2.]])),
            Matrix::from_array(&D2Array::from([[1., 2.], [3., 4.], [5., 6.]])),
            Matrix::from_array(&D2Array::from([[1., 0., 1.], [-1., 2., 0.5]])),
        ];

        for a in cases {
            let decomp = svd(&a).unwrap();
            let k = a.rows().min(a.cols());
            assert_eq!((decomp.u.rows(), decomp.u.cols()), (a.rows(), k));
            assert_eq!(decomp.s.len(), k);
            assert_eq!((decomp.vh.rows(), decomp.vh.cols()), (k, a.cols()));

            assert!(decomp.s.windows(2).all(|w| w[0] >= w[1]));
            assert_close(&reconstruct(&decomp), &a);
            assert_close(&adjoint(&decomp.u).matmul(&decomp.u), &Matrix::identity(k));
            assert_close(&decomp.vh.matmul(&adjoint(&decomp.vh)), &Matrix::identity(k));
        }
    }

    #[test]
    fn test_svd_singular_values() {
        let a = Matrix::from_array(&D2Array::from([[3f64, 0.], [0., -2.]]));
        let decomp = svd(&a).unwrap();
        assert!((decomp.s[0] - 3.).abs() < 1e-12);
        assert!((decomp.s[1] - 2.).abs() < 1e-12);
    }

    #[test]
    fn test_svd_complex() {
        let a = Matrix::from_array(&D2Array::from([
            [Complex64::new(1., 2.), Complex64::new(0., -1.)],
            [Complex64::new(3., 0.), Complex64::new(1., 1.)],
        ]));
        let decomp = svd(&a).unwrap();
        assert_close(&reconstruct(&decomp), &a);
        assert_close(&adjoint(&decomp.u).matmul(&decomp.u), &Matrix::identity(2));
    }
}
