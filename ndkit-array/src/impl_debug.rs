use std::fmt::{Debug, Error, Formatter};

use crate::dim::Dimension;
use crate::dtype::Element;
use crate::NdArray;

/// Entry in the formatted representation of an array's data.
enum Entry<T: Debug> {
    Value(T),

    /// "..." used to elide long axes.
    Ellipsis,
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Entry::Value(val) => write!(f, "{:?}", val),
            Entry::Ellipsis => write!(f, "..."),
        }
    }
}

/// Configuration for debug formatting of an array.
struct FormatOptions {
    /// Maximum number of columns to print before eliding.
    pub max_columns: usize,

    /// Maximum number of rows to print before eliding.
    pub max_rows: usize,

    /// Maximum number of sub-matrices to print before eliding.
    pub max_matrices: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_columns: 10,
            max_rows: 10,
            max_matrices: 10,
        }
    }
}

/// A [`Debug`]-implementing wrapper around an array reference with custom
/// formatting options.
struct FormatArray<'a, T, D: Dimension> {
    array: &'a NdArray<T, D>,
    opts: FormatOptions,
}

impl<'a, T: Element, D: Dimension> FormatArray<'a, T, D> {
    fn new(array: &'a NdArray<T, D>, opts: FormatOptions) -> Self {
        Self { array, opts }
    }

    /// Format a single vector as a list (`[0, 1, 2, ... n]`).
    fn write_vector(&self, f: &mut Formatter<'_>, row: &[T]) -> Result<(), Error> {
        let len = row.len();
        let head = row.iter().take(self.opts.max_columns / 2);
        let tail = row
            .iter()
            .skip(self.opts.max_columns / 2)
            .skip(len.saturating_sub(self.opts.max_columns));

        let mut data_fmt = f.debug_list();
        data_fmt.entries(head.map(Entry::Value));
        if len > self.opts.max_columns {
            data_fmt.entry(&Entry::<T>::Ellipsis);
        }
        data_fmt.entries(tail.map(Entry::Value));
        data_fmt.finish()
    }

    /// Format a row-major matrix with `cols` columns.
    ///
    /// `extra_indent` is the indentation of rows after the first one.
    fn write_matrix(
        &self,
        f: &mut Formatter<'_>,
        mat: &[T],
        rows: usize,
        cols: usize,
        extra_indent: usize,
    ) -> Result<(), Error> {
        write!(f, "[")?;
        let shown_rows = rows.min(self.opts.max_rows);
        for row in 0..shown_rows {
            self.write_vector(f, &mat[row * cols..(row + 1) * cols])?;

            if row < shown_rows - 1 {
                write!(f, ",\n{:>width$}", ' ', width = extra_indent + 1)?;
            } else if rows > self.opts.max_rows {
                write!(f, ",\n{}...", " ".repeat(extra_indent + 1))?;
            }
        }
        write!(f, "]")?;
        Ok(())
    }
}

impl<T: Element, D: Dimension> Debug for FormatArray<'_, T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let array = self.array;
        let data = array.to_vec();
        let shape = array.shape();

        match array.ndim() {
            0 => write!(f, "({:?})", data[0])?,
            1 => self.write_vector(f, &data)?,
            n => {
                // Format arrays with >= 2 axes as a sequence of matrices.
                let outer_dims = n - 2;
                write!(f, "{}", "[".repeat(outer_dims))?;

                let rows = shape[n - 2];
                let cols = shape[n - 1];
                let n_matrices: usize = shape[..outer_dims].iter().product();
                let shown = n_matrices.min(self.opts.max_matrices);

                for i in 0..shown {
                    if i > 0 {
                        write!(f, "{}", " ".repeat(outer_dims))?;
                    }

                    let mat_len = rows * cols;
                    self.write_matrix(
                        f,
                        &data[i * mat_len..(i + 1) * mat_len],
                        rows,
                        cols,
                        outer_dims,
                    )?;

                    if i < shown - 1 {
                        write!(f, ",\n\n")?;
                    } else if n_matrices > self.opts.max_matrices {
                        write!(f, "\n\n{}...\n\n", " ".repeat(outer_dims))?;
                    }
                }

                write!(f, "{}", "]".repeat(outer_dims))?;
            }
        }

        write!(
            f,
            ", shape={:?}, strides={:?}, dtype={}",
            shape,
            array.strides(),
            array.dtype()
        )
    }
}

impl<T: Element, D: Dimension> Debug for NdArray<T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", FormatArray::new(self, FormatOptions::default()))
    }
}
