//! LU and QR decompositions, and the inverse and linear solvers built on
//! LU.

use num_traits::{Float, Zero};

use crate::errors::OpError;
use crate::number::FloatElement;

use super::matrix::Matrix;

/// Result of an LU decomposition with partial pivoting of an `m x n`
/// matrix `A`.
///
/// Row `i` of `L * U` is row `perm[i]` of `A`.
pub struct Lu<T> {
    /// Unit lower triangular `m x k` matrix, where `k = min(m, n)`.
    pub l: Matrix<T>,

    /// Upper triangular `k x n` matrix.
    pub u: Matrix<T>,

    pub perm: Vec<usize>,
}

impl<T: FloatElement> Lu<T> {
    /// Return the permutation matrix `P` such that `A = P * L * U`.
    pub fn permutation_matrix(&self) -> Matrix<T> {
        let m = self.perm.len();
        let mut p = Matrix::zeros(m, m);
        for (i, &row) in self.perm.iter().enumerate() {
            p[[row, i]] = T::one();
        }
        p
    }
}

/// Compute the LU decomposition of `a` with partial pivoting.
pub fn lu<T: FloatElement>(a: &Matrix<T>) -> Lu<T> {
    let (m, n) = (a.rows(), a.cols());
    let k = m.min(n);

    let mut u = a.clone();
    let mut l = Matrix::zeros(m, k);
    let mut perm: Vec<usize> = (0..m).collect();

    for j in 0..k {
        // Choose the row with the largest entry in column `j` as the pivot.
        let mut pivot = j;
        for i in j + 1..m {
            if u[[i, j]].abs() > u[[pivot, j]].abs() {
                pivot = i;
            }
        }
        if pivot != j {
            u.swap_rows(j, pivot);
            l.swap_rows(j, pivot);
            perm.swap(j, pivot);
        }

        let pivot_val = u[[j, j]];
        if pivot_val.abs().is_zero() {
            // Column is already zero below the diagonal.
            continue;
        }
        for i in j + 1..m {
            let factor = u[[i, j]] / pivot_val;
            l[[i, j]] = factor;
            for c in j..n {
                u[[i, c]] = u[[i, c]] - factor * u[[j, c]];
            }
            u[[i, j]] = T::zero();
        }
    }

    for j in 0..k {
        l[[j, j]] = T::one();
    }

    Lu {
        l,
        u: u.block(k, n),
        perm,
    }
}

/// Solve `A * X = B` for `X`, where `A` is square.
///
/// Returns [`OpError::SingularMatrix`] if `A` is singular.
pub fn solve<T: FloatElement>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>, OpError> {
    let n = a.rows();
    if a.cols() != n {
        return Err(OpError::InvalidValue("matrix must be square"));
    }
    if b.rows() != n {
        return Err(OpError::InvalidValue(
            "right-hand side must have as many rows as the matrix",
        ));
    }

    let Lu { l, u, perm } = lu(a);
    let scale = a
        .data()
        .iter()
        .map(|x| x.abs())
        .fold(T::Real::zero(), |acc, x| acc.max(x));
    let tolerance = scale * T::Real::epsilon() * T::real_from_f64(n as f64);
    for i in 0..n {
        let pivot = u[[i, i]].abs();
        if pivot <= tolerance || !pivot.is_finite() {
            return Err(OpError::SingularMatrix);
        }
    }

    let cols = b.cols();
    let mut x = Matrix::zeros(n, cols);
    for c in 0..cols {
        // Forward substitution, `L * y = P^T * b`.
        let mut y = vec![T::zero(); n];
        for i in 0..n {
            let mut acc = b[[perm[i], c]];
            for j in 0..i {
                acc = acc - l[[i, j]] * y[j];
            }
            y[i] = acc;
        }

        // Back substitution, `U * x = y`.
        for i in (0..n).rev() {
            let mut acc = y[i];
            for j in i + 1..n {
                acc = acc - u[[i, j]] * x[[j, c]];
            }
            x[[i, c]] = acc / u[[i, i]];
        }
    }
    Ok(x)
}

/// Compute the inverse of a square matrix.
pub fn inv<T: FloatElement>(a: &Matrix<T>) -> Result<Matrix<T>, OpError> {
    solve(a, &Matrix::identity(a.rows()))
}

/// Compute the Householder reflector `v` which maps `x` to a multiple of
/// the first unit vector, normalized to unit length.
///
/// Returns `None` if `x` is already in the required form.
pub(super) fn householder_vector<T: FloatElement>(x: &[T]) -> Option<Vec<T>> {
    let (&x0, rest) = x.split_first()?;
    let tail_norm_sq = rest
        .iter()
        .fold(T::Real::zero(), |acc, &v| acc + v.abs() * v.abs());
    if tail_norm_sq.is_zero() {
        return None;
    }

    let norm = (x0.abs() * x0.abs() + tail_norm_sq).sqrt();

    // Choose the sign of `alpha` to avoid cancellation in `x0 - alpha`.
    let phase = if x0.abs().is_zero() {
        T::one()
    } else {
        x0 / T::from_real(x0.abs())
    };
    let alpha = -phase * T::from_real(norm);

    let mut v = x.to_vec();
    v[0] = x0 - alpha;
    let v_norm = v
        .iter()
        .fold(T::Real::zero(), |acc, &e| acc + e.abs() * e.abs())
        .sqrt();
    let inv_norm = T::from_real(v_norm.recip());
    for e in v.iter_mut() {
        *e = *e * inv_norm;
    }
    Some(v)
}

/// Replace rows `start..` of `a` with `(I - 2vv^H) * a[start.., ..]`.
pub(super) fn reflect_rows<T: FloatElement>(a: &mut Matrix<T>, v: &[T], start: usize) {
    let two = T::from_f64(2.);
    for c in 0..a.cols() {
        let mut dot = T::zero();
        for (k, &vk) in v.iter().enumerate() {
            dot = dot + vk.conj() * a[[start + k, c]];
        }
        let scaled = two * dot;
        for (k, &vk) in v.iter().enumerate() {
            a[[start + k, c]] = a[[start + k, c]] - vk * scaled;
        }
    }
}

/// Replace columns `start..` of `a` with `a[.., start..] * (I - 2vv^H)`.
pub(super) fn reflect_cols<T: FloatElement>(a: &mut Matrix<T>, v: &[T], start: usize) {
    let two = T::from_f64(2.);
    for r in 0..a.rows() {
        let mut dot = T::zero();
        for (k, &vk) in v.iter().enumerate() {
            dot = dot + a[[r, start + k]] * vk;
        }
        let scaled = two * dot;
        for (k, &vk) in v.iter().enumerate() {
            a[[r, start + k]] = a[[r, start + k]] - scaled * vk.conj();
        }
    }
}

/// Compute the QR decomposition `A = Q * R` of an `m x n` matrix using
/// Householder reflections.
///
/// `Q` is an `m x m` unitary matrix and `R` is an `m x n` upper triangular
/// matrix.
pub fn qr<T: FloatElement>(a: &Matrix<T>) -> (Matrix<T>, Matrix<T>) {
    let (m, n) = (a.rows(), a.cols());
    let mut q = Matrix::identity(m);
    let mut r = a.clone();

    for j in 0..n.min(m.saturating_sub(1)) {
        let x: Vec<T> = (j..m).map(|i| r[[i, j]]).collect();
        let Some(v) = householder_vector(&x) else {
            continue;
        };
        reflect_rows(&mut r, &v, j);
        reflect_cols(&mut q, &v, j);

        for i in j + 1..m {
            r[[i, j]] = T::zero();
        }
    }

    (q, r)
}
