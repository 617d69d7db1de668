//! Matrix and vector products.

use ndkit_array::Element;
use rayon::prelude::*;

/// Compute the dot product of two vectors of equal length.
///
/// Integer products and sums wrap around on overflow, here and in the other
/// functions in this module.
pub fn dot<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc.wrapping_add(x.wrapping_mul(y)))
}

/// Parallel version of [`dot`].
pub fn par_dot<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.par_iter()
        .zip(b)
        .map(|(&x, &y)| x.wrapping_mul(y))
        .reduce(T::zero, T::wrapping_add)
}

/// Multiply a row-major `m x k` matrix `a` by a row-major `k x n` matrix `b`.
pub fn matmul<T: Element>(a: &[T], m: usize, k: usize, b: &[T], n: usize) -> Vec<T> {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);

    let mut out = vec![T::zero(); m * n];
    for (a_row, out_row) in a.chunks(k.max(1)).zip(out.chunks_mut(n.max(1))).take(m) {
        matmul_row(a_row, b, n, out_row);
    }
    out
}

/// Parallel version of [`matmul`] which computes blocks of output rows in
/// separate tasks.
pub fn par_matmul<T: Element>(a: &[T], m: usize, k: usize, b: &[T], n: usize) -> Vec<T> {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);

    let mut out = vec![T::zero(); m * n];
    if n == 0 || k == 0 {
        return out;
    }
    out.par_chunks_mut(n)
        .zip(a.par_chunks(k))
        .for_each(|(out_row, a_row)| matmul_row(a_row, b, n, out_row));
    out
}

/// Compute one row of a matrix product: `out_row = a_row * b`.
fn matmul_row<T: Element>(a_row: &[T], b: &[T], n: usize, out_row: &mut [T]) {
    // Iterate over `b` in row order so that memory is accessed sequentially.
    for (p, &a_val) in a_row.iter().enumerate() {
        let b_row = &b[p * n..(p + 1) * n];
        for (out, &b_val) in out_row.iter_mut().zip(b_row) {
            *out = out.wrapping_add(a_val.wrapping_mul(b_val));
        }
    }
}

/// Raise a square `n x n` matrix to the power `exp` by repeated squaring.
///
/// `pow(m, 0)` is the identity matrix.
pub fn matrix_power<T: Element>(mat: &[T], n: usize, exp: u32) -> Vec<T> {
    let mut result = vec![T::zero(); n * n];
    for i in 0..n {
        result[i * n + i] = T::one();
    }

    let mut base = mat.to_vec();
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = matmul(&result, n, n, &base, n);
        }
        exp >>= 1;
        if exp > 0 {
            base = matmul(&base, n, n, &base, n);
        }
    }
    result
}
