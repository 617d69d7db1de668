//! Eigendecomposition of general square matrices.
//!
//! The matrix is reduced to upper Hessenberg form with Householder
//! reflections, then to upper triangular (Schur) form with shifted QR
//! iterations using Givens rotations. Eigenvectors are recovered by back
//! substitution on the triangular factor.

use num_traits::{Float, One, Zero};

use crate::errors::OpError;
use crate::number::FloatElement;

use super::decomp::{householder_vector, reflect_cols, reflect_rows};
use super::matrix::Matrix;

/// Number of iterations on a block after which an exceptional shift is used.
const EXCEPTIONAL_SHIFT_INTERVAL: usize = 10;

/// Maximum number of QR iterations per row of the matrix.
const MAX_ITERATIONS_PER_ROW: usize = 30;

/// Result of [`eig`].
pub struct Eig<C> {
    /// Eigenvalues, in the order they appear on the diagonal of the Schur
    /// form.
    pub values: Vec<C>,

    /// Matrix whose columns are the unit-norm eigenvectors.
    pub vectors: Matrix<C>,
}

/// Compute the eigenvalues and eigenvectors of the square matrix `a`.
///
/// `C` is expected to be a complex type, since real matrices may have
/// complex eigenvalues.
pub fn eig<C: FloatElement>(a: &Matrix<C>) -> Result<Eig<C>, OpError> {
    let n = a.rows();
    if a.cols() != n {
        return Err(OpError::InvalidValue("matrix must be square"));
    }

    let (mut h, mut z) = hessenberg(a);
    schur(&mut h, &mut z)?;

    let values: Vec<C> = (0..n).map(|i| h[[i, i]]).collect();
    let vectors = eigenvectors(&h, &z);
    Ok(Eig { values, vectors })
}

/// Reduce `a` to upper Hessenberg form `H` and return `(H, Z)` where
/// `A = Z * H * Z^H`.
fn hessenberg<C: FloatElement>(a: &Matrix<C>) -> (Matrix<C>, Matrix<C>) {
    let n = a.rows();
    let mut h = a.clone();
    let mut z = Matrix::identity(n);

    for j in 0..n.saturating_sub(2) {
        let x: Vec<C> = (j + 1..n).map(|i| h[[i, j]]).collect();
        let Some(v) = householder_vector(&x) else {
            continue;
        };
        reflect_rows(&mut h, &v, j + 1);
        reflect_cols(&mut h, &v, j + 1);
        reflect_cols(&mut z, &v, j + 1);

        for i in j + 2..n {
            h[[i, j]] = C::zero();
        }
    }

    (h, z)
}

/// Reduce the upper Hessenberg matrix `h` to upper triangular form in place,
/// accumulating the transformations into `z`.
fn schur<C: FloatElement>(h: &mut Matrix<C>, z: &mut Matrix<C>) -> Result<(), OpError> {
    let n = h.rows();
    if n < 2 {
        return Ok(());
    }

    let eps = C::Real::epsilon();
    let max_iterations = MAX_ITERATIONS_PER_ROW * n;
    let mut total_iterations = 0;
    let mut block_iterations = 0;
    let mut hi = n - 1;

    while hi > 0 {
        // Find the start of the unreduced block which ends at `hi`.
        let mut lo = hi;
        while lo > 0 {
            let scale = h[[lo - 1, lo - 1]].abs() + h[[lo, lo]].abs();
            let scale = if scale.is_zero() { C::Real::one() } else { scale };
            if h[[lo, lo - 1]].abs() <= eps * scale {
                h[[lo, lo - 1]] = C::zero();
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            block_iterations = 0;
            continue;
        }

        total_iterations += 1;
        if total_iterations > max_iterations {
            return Err(OpError::NumericFailure("eigenvalue iteration did not converge"));
        }
        block_iterations += 1;

        let shift = if block_iterations % EXCEPTIONAL_SHIFT_INTERVAL == 0 {
            let mut offset = h[[hi, hi - 1]].abs();
            if hi >= 2 {
                offset = offset + h[[hi - 1, hi - 2]].abs();
            }
            h[[hi, hi]] + C::from_real(offset)
        } else {
            wilkinson_shift(h, hi)
        };

        qr_step(h, z, lo, hi, shift);
    }

    Ok(())
}

/// Return the eigenvalue of the trailing 2x2 block ending at `hi` which is
/// closest to `h[hi, hi]`.
fn wilkinson_shift<C: FloatElement>(h: &Matrix<C>, hi: usize) -> C {
    let a = h[[hi - 1, hi - 1]];
    let b = h[[hi - 1, hi]];
    let c = h[[hi, hi - 1]];
    let d = h[[hi, hi]];

    let half = C::from_f64(0.5);
    let mid = (a + d) * half;
    let diff = (a - d) * half;
    let disc = (diff * diff + b * c).sqrt();

    let mu1 = mid + disc;
    let mu2 = mid - disc;
    if (mu1 - d).abs() <= (mu2 - d).abs() {
        mu1
    } else {
        mu2
    }
}

/// Perform one shifted QR iteration on rows and columns `lo..=hi` of the
/// Hessenberg matrix `h`.
fn qr_step<C: FloatElement>(
    h: &mut Matrix<C>,
    z: &mut Matrix<C>,
    lo: usize,
    hi: usize,
    shift: C,
) {
    let n = h.rows();
    for k in lo..=hi {
        h[[k, k]] = h[[k, k]] - shift;
    }

    // Compute `R = G^H * (H - shift * I)`, one rotation per subdiagonal
    // element.
    let mut rotations = Vec::with_capacity(hi - lo);
    for k in lo..hi {
        let x = h[[k, k]];
        let y = h[[k + 1, k]];
        let r = (x.abs() * x.abs() + y.abs() * y.abs()).sqrt();
        let (c, s) = if r.is_zero() {
            (C::one(), C::zero())
        } else {
            let r = C::from_real(r);
            (x / r, y / r)
        };

        for j in k..n {
            let (hk, hk1) = (h[[k, j]], h[[k + 1, j]]);
            h[[k, j]] = c.conj() * hk + s.conj() * hk1;
            h[[k + 1, j]] = -s * hk + c * hk1;
        }
        rotations.push((c, s));
    }

    // Compute `R * G + shift * I`.
    for (k, (c, s)) in (lo..hi).zip(rotations) {
        let rows = (k + 2).min(hi) + 1;
        for i in 0..rows {
            let (hk, hk1) = (h[[i, k]], h[[i, k + 1]]);
            h[[i, k]] = hk * c + hk1 * s;
            h[[i, k + 1]] = -hk * s.conj() + hk1 * c.conj();
        }
        for i in 0..n {
            let (zk, zk1) = (z[[i, k]], z[[i, k + 1]]);
            z[[i, k]] = zk * c + zk1 * s;
            z[[i, k + 1]] = -zk * s.conj() + zk1 * c.conj();
        }
    }

    for k in lo..=hi {
        h[[k, k]] = h[[k, k]] + shift;
    }
}

/// Compute unit-norm eigenvectors of `A = Z * T * Z^H`, given the upper
/// triangular `T` and unitary `Z`.
fn eigenvectors<C: FloatElement>(t: &Matrix<C>, z: &Matrix<C>) -> Matrix<C> {
    let n = t.rows();
    let norm = t
        .data()
        .iter()
        .fold(C::Real::zero(), |acc, x| acc.max(x.abs()));
    let small = if norm.is_zero() {
        C::Real::epsilon()
    } else {
        C::Real::epsilon() * norm
    };

    let mut vectors = Matrix::zeros(n, n);
    let mut y = vec![C::zero(); n];
    for k in 0..n {
        let lambda = t[[k, k]];

        // Solve `(T - lambda * I) y = 0` with `y[k] = 1` and `y[k+1..] = 0`.
        y.fill(C::zero());
        y[k] = C::one();
        for i in (0..k).rev() {
            let mut acc = C::zero();
            for j in i + 1..=k {
                acc = acc + t[[i, j]] * y[j];
            }
            let mut denom = t[[i, i]] - lambda;
            if denom.abs() < small {
                denom = C::from_real(small);
            }
            y[i] = -acc / denom;
        }

        let mut x = vec![C::zero(); n];
        for (i, xi) in x.iter_mut().enumerate() {
            for (j, &yj) in y.iter().enumerate().take(k + 1) {
                *xi = *xi + z[[i, j]] * yj;
            }
        }
        let x_norm = x
            .iter()
            .fold(C::Real::zero(), |acc, v| acc + v.abs() * v.abs())
            .sqrt();
        let scale = C::from_real(x_norm.recip());
        for (i, xi) in x.into_iter().enumerate() {
            vectors[[i, k]] = xi * scale;
        }
    }
    vectors
}

#[cfg(test)]
mod tests {
    use ndkit_array::D2Array;
    use num_complex::Complex64;

    use super::{eig, Eig};
    use crate::kernels::matrix::Matrix;

    fn complex_matrix<const N: usize>(rows: [[f64; N]; N]) -> Matrix<Complex64> {
        let rows = rows.map(|row| row.map(|x| Complex64::new(x, 0.)));
        Matrix::from_array(&D2Array::from(rows))
    }

    /// Check that `A v = lambda v` for each eigenpair.
    fn check_eigenpairs(a: &Matrix<Complex64>, decomp: &Eig<Complex64>) {
        let n = a.rows();
        for k in 0..n {
            let lambda = decomp.values[k];
            let v: Vec<Complex64> = (0..n).map(|i| decomp.vectors[[i, k]]).collect();
            let v_norm: f64 = v.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();
            assert!((v_norm - 1.).abs() < 1e-9);

            for i in 0..n {
                let av: Complex64 = (0..n).map(|j| a[[i, j]] * v[j]).sum();
                assert!(
                    (av - lambda * v[i]).norm() < 1e-8,
                    "eigenpair {} of {:?} is wrong",
                    k,
                    a
                );
            }
        }
    }

    fn sorted_by_re_im(mut values: Vec<Complex64>) -> Vec<Complex64> {
        values.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        values
    }

    #[test]
    fn test_eig_diagonal() {
        let a = complex_matrix([[2., 0.], [0., 3.]]);
        let decomp = eig(&a).unwrap();
        assert_eq!(
            decomp.values,
            [Complex64::new(2., 0.), Complex64::new(3., 0.)]
        );
        check_eigenpairs(&a, &decomp);
    }

    #[test]
    fn test_eig_rotation() {
        let a = complex_matrix([[0., -1.], [1., 0.]]);
        let decomp = eig(&a).unwrap();
        let values = sorted_by_re_im(decomp.values.clone());
        assert!((values[0] - Complex64::new(0., -1.)).norm() < 1e-10);
        assert!((values[1] - Complex64::new(0., 1.)).norm() < 1e-10);
        check_eigenpairs(&a, &decomp);
    }

    #[test]
    fn test_eig_general() {
        let cases = [
            complex_matrix([[4., 1., 2.], [0.5, 3., -1.], [2., -2., 1.]]),
            complex_matrix([[1., 2., 3., 4.], [0., 1., 0., 2.], [5., 1., 1., 0.], [1., 1., 1., 1.]]),
        ];
        for a in cases {
            let decomp = eig(&a).unwrap();
            check_eigenpairs(&a, &decomp);

            // The eigenvalues sum to the trace.
            let trace: Complex64 = (0..a.rows()).map(|i| a[[i, i]]).sum();
            let total: Complex64 = decomp.values.iter().sum();
            assert!((trace - total).norm() < 1e-9);
        }
    }

    #[test]
    fn test_eig_complex_input() {
        let a = Matrix::from_array(&D2Array::from([
            [Complex64::new(1., 1.), Complex64::new(2., 0.)],
            [Complex64::new(0., -1.), Complex64::new(3., -2.)],
        ]));
        let decomp = eig(&a).unwrap();
        check_eigenpairs(&a, &decomp);
    }
}
