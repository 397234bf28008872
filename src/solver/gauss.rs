//! Gaussian elimination with partial pivoting on complex systems.

use num_complex::Complex64;

use crate::error::{Result, SpiceError};
use crate::matrix::Matrix;

/// Solve the augmented system `[A | z]` and return `x` as an `N x 1` column.
///
/// The input is never modified; elimination runs on a private copy.
///
/// For each column `k` the row with the largest `|a_ik|` (`i >= k`) becomes
/// the pivot row. Ties go to the lowest row index, so identical inputs
/// always take identical elimination paths. If that largest magnitude is
/// `<= tolerance` the system is reported as singular at column `k`.
///
/// Rows below the pivot are reduced as `row_i = row_i * (-pivot / a_ik) + row_k`.
/// Rows whose entry in column `k` is already `<= tolerance` are left alone.
pub fn gaussian_elimination(system: &Matrix<Complex64>, tolerance: f64) -> Result<Matrix<Complex64>> {
    let n = system.height();
    if system.width() != n + 1 {
        return Err(SpiceError::dimension_mismatch(
            "gaussian elimination",
            system.shape(),
            (n, n + 1),
        ));
    }

    let mut mat = system.clone();

    for k in 0..n {
        let mut pivot_row = k;
        let mut max = mat[(k, k)].norm();
        for i in k + 1..n {
            let magnitude = mat[(i, k)].norm();
            if magnitude > max {
                max = magnitude;
                pivot_row = i;
            }
        }

        if max.is_nan() || max <= tolerance {
            return Err(SpiceError::SingularMatrix { column: k });
        }

        mat.swap_rows(pivot_row, k);
        let pivot = mat[(k, k)];

        for i in k + 1..n {
            let entry = mat[(i, k)];
            if entry.norm() <= tolerance {
                continue;
            }
            let factor = -pivot / entry;
            for col in k..=n {
                let upper = mat[(k, col)];
                let cell = &mut mat[(i, col)];
                *cell = *cell * factor + upper;
            }
        }
    }

    let mut x: Matrix<Complex64> = Matrix::new(n, 1);
    for i in (0..n).rev() {
        let mut acc = mat[(i, n)];
        for j in i + 1..n {
            acc -= mat[(i, j)] * x[(j, 0)];
        }
        x[(i, 0)] = acc / mat[(i, i)];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn real_system(rows: Vec<Vec<f64>>) -> Matrix<Complex64> {
        Matrix::from_rows(
            rows.into_iter()
                .map(|r| r.into_iter().map(|v| Complex64::new(v, 0.0)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_solves_real_system() {
        // 2x + y = 5, x + 3y = 10
        let system = real_system(vec![vec![2.0, 1.0, 5.0], vec![1.0, 3.0, 10.0]]);
        let x = gaussian_elimination(&system, 0.0).unwrap();
        assert_eq!(x.shape(), (2, 1));
        assert_relative_eq!(x[(0, 0)].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[(1, 0)].re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_needs_row_swap() {
        // Zero on the first diagonal entry
        let system = real_system(vec![
            vec![0.0, 1.0, 1.0, 5.0],
            vec![1.0, 0.0, 2.0, 7.0],
            vec![3.0, 1.0, 0.0, 5.0],
        ]);
        let x = gaussian_elimination(&system, 0.0).unwrap();
        assert_relative_eq!(x[(0, 0)].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[(1, 0)].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[(2, 0)].re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_system() {
        // (1+j) x = 2j  ->  x = 1 + j
        let system = Matrix::from_rows(vec![vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)]])
            .unwrap();
        let x = gaussian_elimination(&system, 0.0).unwrap();
        assert_relative_eq!(x[(0, 0)].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[(0, 0)].im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_input_untouched() {
        let system = real_system(vec![vec![0.0, 1.0, 2.0], vec![4.0, 1.0, 3.0]]);
        let before = system.clone();
        gaussian_elimination(&system, 0.0).unwrap();
        assert_eq!(system, before);
    }

    #[test]
    fn test_singular_reports_column() {
        let system = real_system(vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]]);
        assert!(matches!(
            gaussian_elimination(&system, 0.0),
            Err(SpiceError::SingularMatrix { column: 1 })
        ));

        let zero_column = real_system(vec![vec![0.0, 1.0, 1.0], vec![0.0, 2.0, 1.0]]);
        assert!(matches!(
            gaussian_elimination(&zero_column, 0.0),
            Err(SpiceError::SingularMatrix { column: 0 })
        ));
    }

    #[test]
    fn test_tolerance_rejects_small_pivot() {
        let system = real_system(vec![vec![1e-12, 1.0]]);
        assert!(gaussian_elimination(&system, 0.0).is_ok());
        assert!(gaussian_elimination(&system, 1e-9).is_err());
    }

    #[test]
    fn test_wrong_width_rejected() {
        let square = real_system(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(matches!(
            gaussian_elimination(&square, 0.0),
            Err(SpiceError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_system() {
        let empty: Matrix<Complex64> = Matrix::new(0, 1);
        assert_eq!(gaussian_elimination(&empty, 0.0).unwrap().shape(), (0, 1));
    }

    #[test]
    fn test_deterministic() {
        let system = real_system(vec![
            vec![1.0, 1.0, 0.0, 1.0],
            vec![1.0, -1.0, 1.0, 0.0],
            vec![-1.0, 0.0, 1.0, 2.0],
        ]);
        let a = gaussian_elimination(&system, 0.0).unwrap();
        let b = gaussian_elimination(&system, 0.0).unwrap();
        assert_eq!(a, b);
    }
}
