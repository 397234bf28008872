//! Dense row-major matrix used to assemble and solve MNA systems.

use std::fmt;
use std::ops::{AddAssign, Index, IndexMut, Mul, MulAssign};

use crate::error::{Result, SpiceError};

/// A dense, row-major `height x width` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    height: usize,
    width: usize,
}

impl<T: Default + Clone> Matrix<T> {
    /// Create a matrix with every entry set to `T::default()` (zero for numbers).
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            data: vec![T::default(); height * width],
            height,
            width,
        }
    }

    /// Build a matrix from a list of rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(height * width);
        for row in rows {
            if row.len() != width {
                return Err(SpiceError::dimension_mismatch(
                    "from_rows",
                    (1, width),
                    (1, row.len()),
                ));
            }
            data.extend(row);
        }
        Ok(Self { data, height, width })
    }

    /// Build an `N x 1` column vector.
    pub fn column(values: Vec<T>) -> Self {
        Self {
            height: values.len(),
            width: 1,
            data: values,
        }
    }

    /// Return the transposed matrix, `result(j, i) = self(i, j)`.
    pub fn transpose(&self) -> Self {
        let mut result = Self::new(self.width, self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                result[(col, row)] = self[(row, col)].clone();
            }
        }
        result
    }

    /// Join two matrices side by side. Heights must match.
    pub fn join_horizontal(left: &Self, right: &Self) -> Result<Self> {
        if left.height != right.height {
            return Err(SpiceError::dimension_mismatch(
                "horizontal join",
                left.shape(),
                right.shape(),
            ));
        }
        let mut result = Self::new(left.height, left.width + right.width);
        result.replace(0, 0, left)?;
        result.replace(0, left.width, right)?;
        Ok(result)
    }

    /// Stack two matrices on top of each other. Widths must match.
    pub fn join_vertical(upper: &Self, lower: &Self) -> Result<Self> {
        if upper.width != lower.width {
            return Err(SpiceError::dimension_mismatch(
                "vertical join",
                upper.shape(),
                lower.shape(),
            ));
        }
        let mut result = Self::new(upper.height + lower.height, upper.width);
        result.replace(0, 0, upper)?;
        result.replace(upper.height, 0, lower)?;
        Ok(result)
    }
}

impl<T> Matrix<T> {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(SpiceError::IndexOutOfRange {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    /// Bounds-checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        let offset = self.offset(row, col)?;
        Ok(&self.data[offset])
    }

    /// Bounds-checked mutable element access.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let offset = self.offset(row, col)?;
        Ok(&mut self.data[offset])
    }

    /// Swap two rows in place.
    ///
    /// # Panics
    /// Panics if either row is out of bounds.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        assert!(
            a < self.height && b < self.height,
            "row swap ({a}, {b}) outside of matrix with {} rows",
            self.height
        );
        if a == b {
            return;
        }
        for col in 0..self.width {
            self.data.swap(a * self.width + col, b * self.width + col);
        }
    }
}

impl<T: Clone> Matrix<T> {
    /// Overwrite the block starting at `(row, col)` with `sub`.
    ///
    /// Fails if the block would extend past the matrix bounds.
    pub fn replace(&mut self, row: usize, col: usize, sub: &Matrix<T>) -> Result<()> {
        if sub.height == 0 || sub.width == 0 {
            return Ok(());
        }
        // Check the far corner before writing anything.
        self.offset(row + sub.height - 1, col + sub.width - 1)?;

        for y in 0..sub.height {
            let dst = (row + y) * self.width + col;
            let src = y * sub.width;
            self.data[dst..dst + sub.width].clone_from_slice(&sub.data[src..src + sub.width]);
        }
        Ok(())
    }
}

impl<T: Copy + MulAssign> Matrix<T> {
    /// Multiply every entry by `k` in place.
    pub fn scale(&mut self, k: T) {
        for value in &mut self.data {
            *value *= k;
        }
    }
}

impl<T> Matrix<T>
where
    T: Copy + Default + AddAssign + Mul<Output = T>,
{
    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        if self.width != rhs.height {
            return Err(SpiceError::dimension_mismatch(
                "multiplication",
                self.shape(),
                rhs.shape(),
            ));
        }

        let mut result = Matrix::new(self.height, rhs.width);
        for i in 0..self.height {
            for j in 0..rhs.width {
                let mut sum = T::default();
                for k in 0..self.width {
                    sum += self[(i, k)] * rhs[(k, j)];
                }
                result[(i, j)] = sum;
            }
        }
        Ok(result)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.height && col < self.width,
            "index ({row}, {col}) outside of {}x{} matrix",
            self.height,
            self.width
        );
        &self.data[row * self.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.height && col < self.width,
            "index ({row}, {col}) outside of {}x{} matrix",
            self.height,
            self.width
        );
        &mut self.data[row * self.width + col]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "{:>12} ", self.data[row * self.width + col].to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
