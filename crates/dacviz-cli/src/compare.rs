//! Run every available multiplier on the same inputs.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use dacviz_core::ops::reference_multiply;
use dacviz_core::{Matrix, MultiplierFactory, OpCounts};

use crate::error::CliError;

/// One multiplier's outcome on the shared inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub name: String,
    pub counts: OpCounts,
    pub duration: Duration,
    /// Result equals the textbook product.
    pub matches: bool,
}

/// Multiply `a × b` with every multiplier the factory offers.
pub fn compare(
    a: &Matrix,
    b: &Matrix,
    factory: &dyn MultiplierFactory,
) -> Result<Vec<ComparisonRow>, CliError> {
    let expected = reference_multiply(a, b)?;
    factory
        .available()
        .into_iter()
        .map(|key| {
            let multiplier = factory.get(key)?;
            let start = Instant::now();
            let product = multiplier.multiply(a, b)?;
            let duration = start.elapsed();
            let matches = product.value == expected;
            if matches {
                debug!(
                    multiplier = multiplier.name(),
                    additions = product.counts.additions,
                    multiplications = product.counts.multiplications,
                    "Comparison run"
                );
            } else {
                warn!(multiplier = multiplier.name(), "Result differs from reference");
            }
            Ok(ComparisonRow {
                name: multiplier.name().to_string(),
                counts: product.counts,
                duration,
                matches,
            })
        })
        .collect()
}

/// Every row agrees with the reference.
#[must_use]
pub fn all_match(rows: &[ComparisonRow]) -> bool {
    rows.iter().all(|r| r.matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacviz_core::DefaultFactory;
    use dacviz_core::Multiplier;
    use std::sync::Arc;

    fn inputs() -> (Matrix, Matrix) {
        let a = Matrix::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 1, 2, 3],
            vec![4, 5, 6, 7],
        ])
        .unwrap();
        (a, Matrix::identity(4))
    }

    #[test]
    fn every_multiplier_agrees() {
        let (a, b) = inputs();
        let rows = compare(&a, &b, &DefaultFactory::new()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(all_match(&rows));
        let naive = rows.iter().find(|r| r.name == "NaiveRecursive").unwrap();
        assert_eq!(naive.counts, OpCounts::new(48, 64));
        let strassen = rows.iter().find(|r| r.name == "Strassen").unwrap();
        assert_eq!(strassen.counts, OpCounts::new(100, 56));
    }

    struct Broken;

    impl Multiplier for Broken {
        fn multiply(
            &self,
            a: &Matrix,
            _b: &Matrix,
        ) -> Result<dacviz_core::Counted<Matrix>, dacviz_core::MatrixError> {
            Ok(dacviz_core::Counted::new(Matrix::zeros(a.size()), OpCounts::default()))
        }

        fn name(&self) -> &str {
            "Broken"
        }
    }

    struct BrokenFactory;

    impl MultiplierFactory for BrokenFactory {
        fn get(
            &self,
            _name: &str,
        ) -> Result<Arc<dyn Multiplier>, dacviz_core::registry::UnknownAlgorithm> {
            Ok(Arc::new(Broken))
        }

        fn available(&self) -> Vec<&str> {
            vec!["broken"]
        }
    }

    #[test]
    fn mismatch_is_reported() {
        let (a, b) = inputs();
        let rows = compare(&a, &b, &BrokenFactory).unwrap();
        assert!(!all_match(&rows));
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let (a, _) = inputs();
        assert!(compare(&a, &Matrix::identity(2), &DefaultFactory::new()).is_err());
    }
}
