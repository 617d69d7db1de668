use std::ops::{Index, IndexMut};

use ndkit_array::{D2Array, Element};

use crate::errors::OpError;

/// A dense, row-major matrix used as scratch space by the decomposition
/// kernels.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Matrix<T> {
        Matrix {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Matrix<T> {
        let mut mat = Self::zeros(n, n);
        for i in 0..n {
            mat[[i, i]] = T::one();
        }
        mat
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Matrix<T> {
        assert_eq!(data.len(), rows * cols, "data length does not match shape");
        Matrix { rows, cols, data }
    }

    /// Copy the elements of `array` in row-major order.
    pub fn from_array(array: &D2Array<T>) -> Matrix<T> {
        let [rows, cols] = [array.shape()[0], array.shape()[1]];
        Matrix {
            rows,
            cols,
            data: array.to_vec(),
        }
    }

    pub fn into_array(self) -> Result<D2Array<T>, OpError> {
        Ok(D2Array::from_data([self.rows, self.cols], self.data)?)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Return a copy of the top-left `rows x cols` block.
    pub fn block(&self, rows: usize, cols: usize) -> Matrix<T> {
        let mut out = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                out[[i, j]] = self[[i, j]];
            }
        }
        out
    }

    pub fn transposed(&self) -> Matrix<T> {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out[[j, i]] = self[[i, j]];
            }
        }
        out
    }

    pub fn matmul(&self, other: &Matrix<T>) -> Matrix<T> {
        assert_eq!(self.cols, other.rows, "matrix shapes are incompatible");
        Matrix {
            rows: self.rows,
            cols: other.cols,
            data: super::matmul::matmul(&self.data, self.rows, self.cols, &other.data, other.cols),
        }
    }
}

impl<T> Index<[usize; 2]> for Matrix<T> {
    type Output = T;

    fn index(&self, [i, j]: [usize; 2]) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<[usize; 2]> for Matrix<T> {
    fn index_mut(&mut self, [i, j]: [usize; 2]) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}
