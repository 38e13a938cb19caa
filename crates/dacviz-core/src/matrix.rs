//! Square integer matrices and quadrant addressing.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_DEMO_SIZE;

/// Error type for matrix preconditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// The input had no rows.
    #[error("matrix has no rows")]
    Empty,

    /// A row's length differs from the number of rows.
    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Two operands have different sizes.
    #[error("size mismatch: {left}x{left} against {right}x{right}")]
    SizeMismatch { left: usize, right: usize },

    /// The size cannot be halved recursively down to 1.
    #[error("size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// The size is below what a demo can partition.
    #[error("size {size} is below the minimum of {min}")]
    TooSmall { size: usize, min: usize },

    /// An operation expected one specific size.
    #[error("expected a {expected}x{expected} matrix, got {actual}x{actual}")]
    UnexpectedSize { expected: usize, actual: usize },

    /// A submatrix window does not fit inside its source.
    #[error("{size}x{size} block at ({row}, {col}) exceeds a {bound}x{bound} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        size: usize,
        bound: usize,
    },
}

/// One of the four equal blocks of a matrix with even size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    /// Top-left, `11`.
    TopLeft,
    /// Top-right, `12`.
    TopRight,
    /// Bottom-left, `21`.
    BottomLeft,
    /// Bottom-right, `22`.
    BottomRight,
}

impl Quadrant {
    /// All quadrants in row-major order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Two-digit row/column code used in block labels.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "11",
            Quadrant::TopRight => "12",
            Quadrant::BottomLeft => "21",
            Quadrant::BottomRight => "22",
        }
    }

    /// Row and column offset of this quadrant for blocks of size `half`.
    #[must_use]
    pub fn offset(self, half: usize) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half),
            Quadrant::BottomLeft => (half, 0),
            Quadrant::BottomRight => (half, half),
        }
    }

    /// Position in [`Quadrant::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Quadrant::TopLeft => 0,
            Quadrant::TopRight => 1,
            Quadrant::BottomLeft => 2,
            Quadrant::BottomRight => 3,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Square matrix of `i64` values in row-major order.
///
/// Every operation in this crate returns a fresh matrix; [`Matrix::place`]
/// is the one in-place write, used by the playback accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Matrix {
    size: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Create a `size`x`size` zero matrix.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    /// Create the `size`x`size` identity matrix.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size);
        for i in 0..size {
            m.data[i * size + i] = 1;
        }
        m
    }

    /// Create a 1x1 matrix.
    #[must_use]
    pub fn scalar(value: i64) -> Self {
        Self {
            size: 1,
            data: vec![value],
        }
    }

    /// Build a matrix from rows, rejecting empty or non-square input.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::Empty);
        }
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            data.extend(values);
        }
        Ok(Self { size, data })
    }

    /// Generate a matrix with entries drawn uniformly from `0..max_entry`.
    pub fn random<R: Rng + ?Sized>(size: usize, max_entry: i64, rng: &mut R) -> Self {
        let bound = max_entry.max(1);
        let data = (0..size * size)
            .map(|_| rng.random_range(0..bound))
            .collect();
        Self { size, data }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> i64 {
        assert!(row < self.size && col < self.size, "index out of bounds");
        self.data[row * self.size + col]
    }

    /// Entry of a 1x1 matrix.
    #[must_use]
    pub fn as_scalar(&self) -> Option<i64> {
        (self.size == 1).then(|| self.data[0])
    }

    /// Copy the rows out as nested vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.data.chunks(self.size).map(<[i64]>::to_vec).collect()
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.data.chunks(self.size.max(1))
    }

    /// Copy a `size`x`size` window starting at `(row, col)`.
    ///
    /// Always returns a matrix, including for `size == 1`.
    pub fn submatrix(&self, row: usize, col: usize, size: usize) -> Result<Self, MatrixError> {
        if row + size > self.size || col + size > self.size {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                size,
                bound: self.size,
            });
        }
        let mut data = Vec::with_capacity(size * size);
        for r in row..row + size {
            let start = r * self.size + col;
            data.extend_from_slice(&self.data[start..start + size]);
        }
        Ok(Self { size, data })
    }

    /// Copy one quadrant. The size must be even.
    pub fn quadrant(&self, quadrant: Quadrant) -> Result<Self, MatrixError> {
        if self.size < 2 || self.size % 2 != 0 {
            return Err(MatrixError::NotPowerOfTwo(self.size));
        }
        let half = self.size / 2;
        let (row, col) = quadrant.offset(half);
        self.submatrix(row, col, half)
    }

    /// Split into the four quadrants in [`Quadrant::ALL`] order.
    pub fn quadrants(&self) -> Result<[Self; 4], MatrixError> {
        Ok([
            self.quadrant(Quadrant::TopLeft)?,
            self.quadrant(Quadrant::TopRight)?,
            self.quadrant(Quadrant::BottomLeft)?,
            self.quadrant(Quadrant::BottomRight)?,
        ])
    }

    /// Reassemble a matrix from four equally sized quadrants.
    pub fn from_quadrants(blocks: &[Self; 4]) -> Result<Self, MatrixError> {
        let half = blocks[0].size;
        for block in &blocks[1..] {
            ensure_same_size(&blocks[0], block)?;
        }
        let mut out = Self::zeros(half * 2);
        for (quadrant, block) in Quadrant::ALL.iter().zip(blocks) {
            let (row, col) = quadrant.offset(half);
            out.place(block, row, col)?;
        }
        Ok(out)
    }

    /// Write `block` into this matrix with its top-left corner at `(row, col)`.
    pub fn place(&mut self, block: &Self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row + block.size > self.size || col + block.size > self.size {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                size: block.size,
                bound: self.size,
            });
        }
        for (i, src) in block.rows().enumerate() {
            let start = (row + i) * self.size + col;
            self.data[start..start + block.size].copy_from_slice(src);
        }
        Ok(())
    }

    pub(crate) fn data(&self) -> &[i64] {
        &self.data
    }

    pub(crate) fn from_raw(size: usize, data: Vec<i64>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { size, data }
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<i64>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .data
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str("[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{v:>width$}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Fail unless both operands have the same size.
pub fn ensure_same_size(a: &Matrix, b: &Matrix) -> Result<(), MatrixError> {
    if a.size() == b.size() {
        Ok(())
    } else {
        Err(MatrixError::SizeMismatch {
            left: a.size(),
            right: b.size(),
        })
    }
}

/// Fail unless `size` is a power of two no smaller than a demo can split.
pub fn ensure_demo_size(size: usize) -> Result<(), MatrixError> {
    if !size.is_power_of_two() {
        return Err(MatrixError::NotPowerOfTwo(size));
    }
    if size < MIN_DEMO_SIZE {
        return Err(MatrixError::TooSmall {
            size,
            min: MIN_DEMO_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn m4() -> Matrix {
        Matrix::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 10, 11, 12],
            vec![13, 14, 15, 16],
        ])
        .unwrap()
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert_eq!(Matrix::from_rows(vec![]), Err(MatrixError::Empty));
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn submatrix_copies_window() {
        let sub = m4().submatrix(1, 2, 2).unwrap();
        assert_eq!(sub.to_rows(), vec![vec![7, 8], vec![11, 12]]);
    }

    #[test]
    fn submatrix_of_size_one_is_still_a_matrix() {
        let sub = m4().submatrix(3, 0, 1).unwrap();
        assert_eq!(sub.size(), 1);
        assert_eq!(sub.as_scalar(), Some(13));
    }

    #[test]
    fn submatrix_out_of_bounds() {
        let err = m4().submatrix(3, 3, 2).unwrap_err();
        assert!(matches!(err, MatrixError::OutOfBounds { bound: 4, .. }));
    }

    #[test]
    fn quadrants_round_trip() {
        let m = m4();
        let q = m.quadrants().unwrap();
        assert_eq!(q[1].to_rows(), vec![vec![3, 4], vec![7, 8]]);
        assert_eq!(Matrix::from_quadrants(&q).unwrap(), m);
    }

    #[test]
    fn quadrant_of_odd_matrix_fails() {
        let m = Matrix::zeros(3);
        assert!(m.quadrant(Quadrant::TopLeft).is_err());
    }

    #[test]
    fn place_writes_block() {
        let mut acc = Matrix::zeros(4);
        acc.place(&Matrix::identity(2), 2, 2).unwrap();
        assert_eq!(acc.get(2, 2), 1);
        assert_eq!(acc.get(3, 3), 1);
        assert_eq!(acc.get(0, 0), 0);
    }

    #[test]
    fn place_rejects_overflowing_block() {
        let mut acc = Matrix::zeros(2);
        assert!(acc.place(&Matrix::zeros(2), 1, 0).is_err());
    }

    #[test]
    fn random_respects_bound_and_seed() {
        let mut rng = SmallRng::seed_from_u64(7);
        let a = Matrix::random(8, 10, &mut rng);
        assert!(a.data().iter().all(|v| (0..10).contains(v)));

        let mut rng = SmallRng::seed_from_u64(7);
        let b = Matrix::random(8, 10, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn quadrant_codes() {
        let codes: Vec<_> = Quadrant::ALL.iter().map(|q| q.code()).collect();
        assert_eq!(codes, vec!["11", "12", "21", "22"]);
        assert_eq!(Quadrant::BottomLeft.offset(4), (4, 0));
    }

    #[test]
    fn demo_size_validation() {
        assert!(ensure_demo_size(4).is_ok());
        assert_eq!(ensure_demo_size(6), Err(MatrixError::NotPowerOfTwo(6)));
        assert_eq!(
            ensure_demo_size(1),
            Err(MatrixError::TooSmall { size: 1, min: 2 })
        );
    }

    #[test]
    fn serde_uses_nested_rows() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1,2],[3,4]]");
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<Matrix>("[[1,2],[3]]").is_err());
    }

    #[test]
    fn display_aligns_columns() {
        let m = Matrix::from_rows(vec![vec![1, 22], vec![333, 4]]).unwrap();
        assert_eq!(m.to_string(), "[  1  22]\n[333   4]");
    }
}
