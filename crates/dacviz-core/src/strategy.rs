//! Multiplication strategy trait and its implementations.

use crate::matrix::{ensure_same_size, Matrix, MatrixError};
use crate::ops::{multiply_naive_recursive, multiply_strassen, reference_multiply, Counted, OpCounts};
use crate::registry::Algorithm;

/// Narrow interface over the recursive multiplications.
pub trait Multiplier: Send + Sync {
    /// Multiply two square matrices of equal size.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError>;

    /// Display name of this strategy.
    fn name(&self) -> &str;

    /// The recursion this strategy performs, if it is one of the animated ones.
    fn algorithm(&self) -> Option<Algorithm> {
        None
    }
}

/// The 8-product divide-and-conquer recursion.
pub struct NaiveRecursive;

impl NaiveRecursive {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NaiveRecursive {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplier for NaiveRecursive {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
        multiply_naive_recursive(a, b)
    }

    fn name(&self) -> &'static str {
        "NaiveRecursive"
    }

    fn algorithm(&self) -> Option<Algorithm> {
        Some(Algorithm::Naive)
    }
}

/// Strassen's 7-product recursion.
pub struct Strassen;

impl Strassen {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Strassen {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplier for Strassen {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
        multiply_strassen(a, b)
    }

    fn name(&self) -> &'static str {
        "Strassen"
    }

    fn algorithm(&self) -> Option<Algorithm> {
        Some(Algorithm::Strassen)
    }
}

/// Row-by-column product, used as the baseline in comparisons.
///
/// Reports `n³` multiplications and `n²(n-1)` additions.
pub struct Schoolbook;

impl Schoolbook {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Schoolbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplier for Schoolbook {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
        ensure_same_size(a, b)?;
        let n = a.size() as u64;
        let value = reference_multiply(a, b)?;
        Ok(Counted::new(
            value,
            OpCounts::new(n * n * n.saturating_sub(1), n * n * n),
        ))
    }

    fn name(&self) -> &'static str {
        "Schoolbook"
    }
}
