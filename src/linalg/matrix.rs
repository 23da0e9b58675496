//! Dense row-major matrix.
//!
//! Construction always deep-copies the input so the matrix never aliases
//! caller-owned storage. Row and column counts are fixed after construction
//! except through the explicit row-mutating operations.

use crate::linalg::{LinalgError, Vector};
use std::fmt::Write as _;

/// Rectangular 2-D array of `f64`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix by deep-copying a slice of equal-length rows.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] when the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(LinalgError::DimensionMismatch {
                    expected: cols.to_string(),
                    got: row.len().to_string(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// The n-by-n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut result = Self::zeros(n, n);
        for i in 0..n {
            result.data[i * n + i] = 1.0;
        }
        result
    }

    /// Number of data points (rows).
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of features (columns).
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64, LinalgError> {
        self.check_cell(i, j)?;
        Ok(self.data[i * self.cols + j])
    }

    /// Overwrite the cell at `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<(), LinalgError> {
        self.check_cell(i, j)?;
        self.data[i * self.cols + j] = value;
        Ok(())
    }

    /// Row `i` as a freshly-allocated [`Vector`].
    pub fn row(&self, i: usize) -> Result<Vector, LinalgError> {
        Ok(Vector::from_slice(self.row_slice(i)?))
    }

    /// Borrow row `i` as a slice.
    pub fn row_slice(&self, i: usize) -> Result<&[f64], LinalgError> {
        if i >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                len: self.rows,
            });
        }
        Ok(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Replace row `i` with the components of `input`.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] unless `input.len()` equals the
    /// column count.
    pub fn set_row(&mut self, i: usize, input: &Vector) -> Result<(), LinalgError> {
        if i >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                len: self.rows,
            });
        }
        if input.len() != self.cols {
            return Err(LinalgError::DimensionMismatch {
                expected: self.cols.to_string(),
                got: input.len().to_string(),
            });
        }
        self.data[i * self.cols..(i + 1) * self.cols].copy_from_slice(input.as_slice());
        Ok(())
    }

    /// Element-wise sum.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] unless shapes match exactly.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, LinalgError> {
        self.check_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Element-wise difference (`self - other`).
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix, LinalgError> {
        self.add(&other.negate())
    }

    /// Every cell multiplied by `scalar`.
    pub fn scale(&self, scalar: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x * scalar).collect(),
        }
    }

    /// Every cell multiplied by -1.
    pub fn negate(&self) -> Matrix {
        self.scale(-1.0)
    }

    /// The transpose.
    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        result
    }

    /// Matrix-vector product.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] unless the column count equals the
    /// vector length.
    pub fn times_vector(&self, vector: &Vector) -> Result<Vector, LinalgError> {
        if self.cols != vector.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: self.cols.to_string(),
                got: vector.len().to_string(),
            });
        }
        let mut result = Vector::new();
        let v = vector.as_slice();
        for i in 0..self.rows {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            let sum: f64 = row.iter().zip(v).map(|(a, b)| a * b).sum();
            result.append(sum);
        }
        Ok(result)
    }

    /// Matrix product (standard triple loop).
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] unless the inner dimensions match.
    pub fn times(&self, other: &Matrix) -> Result<Matrix, LinalgError> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                expected: self.cols.to_string(),
                got: other.rows.to_string(),
            });
        }
        let mut result = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..other.rows {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                result.data[i * other.cols + j] = sum;
            }
        }
        Ok(result)
    }

    /// The inverse, via Gaussian elimination with scaled partial pivoting.
    ///
    /// Pivoting reorders a permutation index array instead of swapping rows
    /// in storage; elimination multipliers are recorded in the lower
    /// triangle and replayed against an identity-seeded right-hand side,
    /// which is then back-substituted column by column.
    ///
    /// Singular input is not detected: a zero pivot propagates infinities
    /// and NaNs into the result. Callers must pass a well-conditioned
    /// matrix.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] when the matrix is not square.
    pub fn invert(&self) -> Result<Matrix, LinalgError> {
        if self.rows != self.cols {
            return Err(LinalgError::DimensionMismatch {
                expected: format!("{}x{}", self.rows, self.rows),
                got: format!("{}x{}", self.rows, self.cols),
            });
        }
        let n = self.rows;
        if n == 0 {
            return Ok(Matrix::zeros(0, 0));
        }

        let mut a = self.data.clone();
        let mut index: Vec<usize> = (0..n).collect();
        gaussian_eliminate(&mut a, n, &mut index);

        // Replay the recorded multipliers against an identity RHS.
        let mut b = Matrix::identity(n).data;
        for i in 0..n - 1 {
            for j in i + 1..n {
                let ratio = a[index[j] * n + i];
                for k in 0..n {
                    let sub = ratio * b[index[i] * n + k];
                    b[index[j] * n + k] -= sub;
                }
            }
        }

        // Back substitution, one column of the inverse at a time.
        let mut x = vec![0.0; n * n];
        for i in 0..n {
            x[(n - 1) * n + i] = b[index[n - 1] * n + i] / a[index[n - 1] * n + (n - 1)];
            for j in (0..n - 1).rev() {
                let mut value = b[index[j] * n + i];
                for k in j + 1..n {
                    value -= a[index[j] * n + k] * x[k * n + i];
                }
                x[j * n + i] = value / a[index[j] * n + j];
            }
        }
        Ok(Matrix {
            rows: n,
            cols: n,
            data: x,
        })
    }

    /// Print every row to stdout with 2-decimal cells.
    pub fn print(&self) {
        for i in 0..self.rows {
            println!("{}", self.format_row(i));
        }
        println!();
    }

    /// Print the first and last 5 rows when there are more than 10.
    pub fn print_truncated(&self) {
        if self.rows <= 10 {
            self.print();
            return;
        }
        for i in 0..5 {
            println!("{}", self.format_row(i));
        }
        println!("...");
        for i in self.rows - 5..self.rows {
            println!("{}", self.format_row(i));
        }
        println!("Dimensions: {} x {}\n", self.rows, self.cols);
    }

    fn format_row(&self, i: usize) -> String {
        let mut line = String::new();
        for j in 0..self.cols {
            let _ = write!(line, "{:.2} ", self.data[i * self.cols + j]);
        }
        line
    }

    fn check_cell(&self, i: usize, j: usize) -> Result<(), LinalgError> {
        if i >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                len: self.rows,
            });
        }
        if j >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: j,
                len: self.cols,
            });
        }
        Ok(())
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<(), LinalgError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(LinalgError::DimensionMismatch {
                expected: format!("{}x{}", self.rows, self.cols),
                got: format!("{}x{}", other.rows, other.cols),
            });
        }
        Ok(())
    }
}

// Reduces `a` (n x n, row-major) to upper-triangular form, storing the
// elimination multipliers below the diagonal. Pivot rows are chosen by the
// largest |a[row][col]| / rowScale ratio and tracked through `index` so the
// underlying storage is never reordered.
fn gaussian_eliminate(a: &mut [f64], n: usize, index: &mut [usize]) {
    for (i, slot) in index.iter_mut().enumerate() {
        *slot = i;
    }

    // Scale factor per row: the largest absolute value in that row.
    let mut scale = vec![0.0; n];
    for i in 0..n {
        let mut largest = 0.0;
        for j in 0..n {
            let magnitude = a[i * n + j].abs();
            if magnitude > largest {
                largest = magnitude;
            }
        }
        scale[i] = largest;
    }

    for j in 0..n.saturating_sub(1) {
        let mut best = 0.0;
        let mut pivot = j;
        for i in j..n {
            let ratio = a[index[i] * n + j].abs() / scale[index[i]];
            if ratio > best {
                best = ratio;
                pivot = i;
            }
        }
        index.swap(j, pivot);

        for i in j + 1..n {
            let multiplier = a[index[i] * n + j] / a[index[j] * n + j];
            a[index[i] * n + j] = multiplier;
            for l in j + 1..n {
                let sub = multiplier * a[index[j] * n + l];
                a[index[i] * n + l] -= sub;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "expected {}, got {}", b, a);
    }

    #[test]
    fn test_from_rows_deep_copies() {
        let mut source = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = Matrix::from_rows(&source).unwrap();
        source[0][0] = 99.0;
        assert_eq!(m.get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            Matrix::from_rows(&rows),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_add_and_subtract() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![4.0, 3.0], vec![2.0, 1.0]]).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum, Matrix::from_rows(&[vec![5.0, 5.0], vec![5.0, 5.0]]).unwrap());
        let diff = sum.subtract(&b).unwrap();
        assert_eq!(diff, a);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            a.add(&b),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_scale_and_negate() {
        let a = Matrix::from_rows(&[vec![1.0, -2.0]]).unwrap();
        assert_eq!(a.scale(2.0), Matrix::from_rows(&[vec![2.0, -4.0]]).unwrap());
        assert_eq!(a.negate(), Matrix::from_rows(&[vec![-1.0, 2.0]]).unwrap());
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = a.transpose();
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_cols(), 2);
        assert_eq!(t.get(2, 1).unwrap(), 6.0);
    }

    #[test]
    fn test_times_vector() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let v = Vector::from_slice(&[5.0, 6.0]);
        let result = a.times_vector(&v).unwrap();
        assert_eq!(result, Vector::from_slice(&[17.0, 39.0]));
    }

    #[test]
    fn test_times_vector_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let v = Vector::from_slice(&[1.0, 2.0]);
        assert!(matches!(
            a.times_vector(&v),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_times() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let product = a.times(&b).unwrap();
        assert_eq!(
            product,
            Matrix::from_rows(&[vec![2.0, 1.0], vec![4.0, 3.0]]).unwrap()
        );
    }

    #[test]
    fn test_times_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert!(matches!(
            a.times(&b),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_invert_2x2_exact() {
        let m = Matrix::from_rows(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        let inv = m.invert().unwrap();
        assert_close(inv.get(0, 0).unwrap(), 0.6, 1e-9);
        assert_close(inv.get(0, 1).unwrap(), -0.7, 1e-9);
        assert_close(inv.get(1, 0).unwrap(), -0.2, 1e-9);
        assert_close(inv.get(1, 1).unwrap(), 0.4, 1e-9);
    }

    #[test]
    fn test_invert_times_original_is_identity() {
        let m = Matrix::from_rows(&[
            vec![2.0, -1.0, 0.0],
            vec![-1.0, 2.0, -1.0],
            vec![0.0, -1.0, 2.0],
        ])
        .unwrap();
        let product = m.times(&m.invert().unwrap()).unwrap();
        let identity = Matrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_close(product.get(i, j).unwrap(), identity.get(i, j).unwrap(), 1e-6);
            }
        }
    }

    #[test]
    fn test_invert_requires_pivoting() {
        // Zero in the top-left corner forces a pivot reorder.
        let m = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let inv = m.invert().unwrap();
        assert_close(inv.get(0, 0).unwrap(), 0.0, 1e-12);
        assert_close(inv.get(0, 1).unwrap(), 1.0, 1e-12);
        assert_close(inv.get(1, 0).unwrap(), 1.0, 1e-12);
        assert_close(inv.get(1, 1).unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn test_invert_rejects_non_square() {
        let m = Matrix::zeros(2, 3);
        assert!(matches!(
            m.invert(),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_set_row() {
        let mut m = Matrix::zeros(2, 3);
        m.set_row(1, &Vector::from_slice(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(m.row(1).unwrap(), Vector::from_slice(&[1.0, 2.0, 3.0]));
        assert!(matches!(
            m.set_row(1, &Vector::from_slice(&[1.0])),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut m = Matrix::zeros(2, 2);
        assert!(matches!(
            m.get(2, 0),
            Err(LinalgError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            m.set(0, 2, 1.0),
            Err(LinalgError::IndexOutOfRange { .. })
        ));
        m.set(1, 1, 8.0).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), 8.0);
    }
}
