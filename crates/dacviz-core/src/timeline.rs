//! Precomputed event timelines.
//!
//! A [`Timeline`] holds every event of one demo level, with all values
//! computed up front. Playback only decides how much of it is revealed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BASE_CASE_SIZE, LEFT_NAME, RIGHT_NAME};
use crate::event::{
    Computation, Event, Operand, OperandExpr, Placement, Slot, Term, TermKind,
};
use crate::labels::{block_label, product_label, sum_label};
use crate::matrix::{ensure_demo_size, ensure_same_size, Matrix, MatrixError, Quadrant};
use crate::ops::{
    add, combination_formula, combine_products, multiply_base_2x2_with_steps,
    multiply_naive_recursive, multiply_strassen, strassen_level, BlockRef, Counted, FactorDef,
    OpCounts, Side, NAIVE_SLOTS, STRASSEN_COMBINATIONS, STRASSEN_PRODUCTS, STRASSEN_SUMS,
};
use crate::registry::Algorithm;

/// Immutable event sequence for one pair of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    algorithm: Algorithm,
    left_name: String,
    right_name: String,
    left: Matrix,
    right: Matrix,
    events: Vec<Event>,
    result: Matrix,
    counts: OpCounts,
}

/// Quadrants of both inputs with their labels.
struct Split {
    blocks: [[Matrix; 4]; 2],
    labels: [[String; 4]; 2],
    half: usize,
}

impl Split {
    fn new(a: &Matrix, b: &Matrix, left_name: &str, right_name: &str) -> Result<Self, MatrixError> {
        let labels = |name: &str| Quadrant::ALL.map(|q| block_label(name, q));
        Ok(Self {
            blocks: [a.quadrants()?, b.quadrants()?],
            labels: [labels(left_name), labels(right_name)],
            half: a.size() / 2,
        })
    }

    fn side(side: Side) -> usize {
        match side {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    fn operand(&self, r: BlockRef) -> Operand {
        let s = Self::side(r.side);
        let q = r.quadrant.index();
        Operand::block(self.labels[s][q].clone(), self.blocks[s][q].clone())
    }
}

impl Timeline {
    /// Build the timeline for `a × b`, naming the inputs `A` and `B`.
    pub fn build(a: &Matrix, b: &Matrix, algorithm: Algorithm) -> Result<Self, MatrixError> {
        Self::build_named(a, b, algorithm, LEFT_NAME, RIGHT_NAME)
    }

    /// Build the timeline for `a × b` with explicit operand names.
    ///
    /// Nested demos pass the labels of the blocks they were opened on.
    pub fn build_named(
        a: &Matrix,
        b: &Matrix,
        algorithm: Algorithm,
        left_name: &str,
        right_name: &str,
    ) -> Result<Self, MatrixError> {
        ensure_same_size(a, b)?;
        ensure_demo_size(a.size())?;

        let split = Split::new(a, b, left_name, right_name)?;
        let mut events = vec![Event::Init, Event::ShowPartition { size: a.size() }];
        let (result, counts) = match algorithm {
            Algorithm::Naive => build_naive(&split, &mut events)?,
            Algorithm::Strassen => build_strassen(a, b, &split, &mut events)?,
        };
        events.push(Event::Done {
            result: result.clone(),
            counts,
        });

        debug!(
            %algorithm,
            size = a.size(),
            events = events.len(),
            multiplications = counts.multiplications,
            additions = counts.additions,
            "Timeline built"
        );

        Ok(Self {
            algorithm,
            left_name: left_name.to_string(),
            right_name: right_name.to_string(),
            left: a.clone(),
            right: b.clone(),
            events,
            result,
            counts,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Size of the inputs.
    #[must_use]
    pub fn size(&self) -> usize {
        self.left.size()
    }

    #[must_use]
    pub fn left(&self) -> &Matrix {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &Matrix {
        &self.right
    }

    #[must_use]
    pub fn left_name(&self) -> &str {
        &self.left_name
    }

    #[must_use]
    pub fn right_name(&self) -> &str {
        &self.right_name
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Final product.
    #[must_use]
    pub fn result(&self) -> &Matrix {
        &self.result
    }

    /// Operations of the whole level, recursion included.
    #[must_use]
    pub fn counts(&self) -> OpCounts {
        self.counts
    }

    /// Slots of this timeline in order.
    #[must_use]
    pub fn slots(&self) -> &'static [Slot] {
        Slot::for_algorithm(self.algorithm)
    }

    /// The computation for `slot`, if this timeline has one.
    #[must_use]
    pub fn computation(&self, slot: Slot) -> Option<&Computation> {
        self.events.iter().find_map(|e| match e {
            Event::ShowComputation(c) if c.slot == slot => Some(c.as_ref()),
            _ => None,
        })
    }

    /// Index of the `ShowComputation` event for `slot`.
    #[must_use]
    pub fn computation_index(&self, slot: Slot) -> Option<usize> {
        self.events
            .iter()
            .position(|e| matches!(e, Event::ShowComputation(c) if c.slot == slot))
    }

    /// Partial result as of `cursor`: every block copy and combination up to
    /// and including it, written into a zero matrix.
    #[must_use]
    pub fn result_at(&self, cursor: usize) -> Matrix {
        let mut acc = Matrix::zeros(self.size());
        for event in self.events.iter().take(cursor.saturating_add(1)) {
            let written = match event {
                Event::CopyResult {
                    result,
                    placement: Placement::Block { row, col },
                    ..
                } => acc.place(result, *row, *col),
                Event::Combine {
                    result, row, col, ..
                } => acc.place(result, *row, *col),
                _ => Ok(()),
            };
            if let Err(err) = written {
                debug!(%err, "Skipping block that does not fit the accumulator");
            }
        }
        acc
    }

    /// Products set aside up to and including `cursor`.
    #[must_use]
    pub fn products_at(&self, cursor: usize) -> Vec<(Slot, &Matrix)> {
        self.events
            .iter()
            .take(cursor.saturating_add(1))
            .filter_map(|e| match e {
                Event::CopyResult {
                    slot,
                    result,
                    placement: Placement::Product,
                } => Some((*slot, result)),
                _ => None,
            })
            .collect()
    }
}

/// A product term between two operands, valued by `algorithm`'s recursion.
fn product_term(
    left: Operand,
    right: Operand,
    algorithm: Algorithm,
) -> Result<Counted<Term>, MatrixError> {
    let (value, steps, counts) = if left.value.size() == BASE_CASE_SIZE {
        let base = multiply_base_2x2_with_steps(&left.value, &right.value)?;
        (base.result, Some(base.steps), base.counts)
    } else {
        let product = match algorithm {
            Algorithm::Naive => multiply_naive_recursive(&left.value, &right.value)?,
            Algorithm::Strassen => multiply_strassen(&left.value, &right.value)?,
        };
        (product.value, None, product.counts)
    };
    let term = Term {
        description: product_label(&left.label, &right.label),
        kind: TermKind::Product,
        left,
        right: Some(right),
        value,
        steps,
    };
    Ok(Counted::new(term, counts))
}

fn build_naive(split: &Split, events: &mut Vec<Event>) -> Result<(Matrix, OpCounts), MatrixError> {
    let mut counts = OpCounts::default();
    let mut blocks = Vec::with_capacity(4);

    for (slot, (quadrant, pairs)) in Slot::NAIVE.into_iter().zip(NAIVE_SLOTS) {
        let [first, second] = pairs.map(|(qa, qb)| {
            product_term(
                split.operand(BlockRef {
                    side: Side::Left,
                    quadrant: qa,
                }),
                split.operand(BlockRef {
                    side: Side::Right,
                    quadrant: qb,
                }),
                Algorithm::Naive,
            )
        });
        let (first, second) = (first?, second?);
        let total = add(&first.value.value, &second.value.value)?;
        counts += first.counts + second.counts + total.counts;

        let (row, col) = quadrant.offset(split.half);
        events.push(Event::StartQuadrant { slot });
        events.push(Event::ShowComputation(Box::new(Computation {
            slot,
            term1: first.value,
            term2: second.value,
            product: None,
            result: total.value.clone(),
        })));
        events.push(Event::CopyResult {
            slot,
            result: total.value.clone(),
            placement: Placement::Block { row, col },
        });
        blocks.push(total.value);
    }

    let blocks: [Matrix; 4] = blocks
        .try_into()
        .map_err(|_| MatrixError::NotPowerOfTwo(split.half * 2))?;
    Ok((Matrix::from_quadrants(&blocks)?, counts))
}

fn build_strassen(
    a: &Matrix,
    b: &Matrix,
    split: &Split,
    events: &mut Vec<Event>,
) -> Result<(Matrix, OpCounts), MatrixError> {
    let level = strassen_level(a, b)?;

    // A factor as a term of the slot, and as an operand of the product.
    let factor = |def: FactorDef| -> (Term, Operand) {
        match def {
            FactorDef::Block(r) => {
                let operand = split.operand(r);
                let term = Term {
                    description: operand.label.clone(),
                    kind: TermKind::Block,
                    left: operand.clone(),
                    right: None,
                    value: operand.value.clone(),
                    steps: None,
                };
                (term, operand)
            }
            FactorDef::Sum(i) => {
                let def = STRASSEN_SUMS[i];
                let (lhs, rhs) = (split.operand(def.lhs), split.operand(def.rhs));
                let label = sum_label(&lhs.label, def.op, &rhs.label);
                let value = level.sums[i].clone();
                let operand = Operand {
                    label: label.clone(),
                    value: value.clone(),
                    expr: Some(OperandExpr {
                        lhs: Box::new(lhs.clone()),
                        op: def.op,
                        rhs: Box::new(rhs.clone()),
                    }),
                };
                let term = Term {
                    description: label,
                    kind: TermKind::Sum(def.op),
                    left: lhs,
                    right: Some(rhs),
                    value,
                    steps: None,
                };
                (term, operand)
            }
        }
    };

    for (k, (slot, (f1, f2))) in Slot::STRASSEN.into_iter().zip(STRASSEN_PRODUCTS).enumerate() {
        let (term1, left) = factor(f1);
        let (term2, right) = factor(f2);
        let product = product_term(left, right, Algorithm::Strassen)?;
        debug_assert_eq!(product.value.value, level.products[k]);

        events.push(Event::StartQuadrant { slot });
        events.push(Event::ShowComputation(Box::new(Computation {
            slot,
            term1,
            term2,
            product: Some(product.value),
            result: level.products[k].clone(),
        })));
        events.push(Event::CopyResult {
            slot,
            result: level.products[k].clone(),
            placement: Placement::Product,
        });
    }

    for (quadrant, terms) in &STRASSEN_COMBINATIONS {
        let block = combine_products(&level.products, terms)?;
        let (row, col) = quadrant.offset(split.half);
        events.push(Event::Combine {
            quadrant: *quadrant,
            formula: format!("C{} = {}", quadrant.code(), combination_formula(terms)),
            result: block.value,
            row,
            col,
        });
    }

    Ok((level.result, level.counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::reference_multiply;

    fn a2() -> Matrix {
        Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap()
    }

    fn b2() -> Matrix {
        Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap()
    }

    fn a4() -> Matrix {
        Matrix::from_rows(vec![
            vec![2, 7, 1, 8],
            vec![2, 8, 1, 8],
            vec![4, 5, 9, 0],
            vec![4, 5, 2, 3],
        ])
        .unwrap()
    }

    fn b4() -> Matrix {
        Matrix::from_rows(vec![
            vec![1, 4, 1, 4],
            vec![2, 1, 3, 5],
            vec![6, 2, 3, 7],
            vec![3, 0, 9, 5],
        ])
        .unwrap()
    }

    fn kinds(t: &Timeline) -> Vec<&'static str> {
        t.events().iter().map(Event::kind).collect()
    }

    #[test]
    fn naive_shape() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Naive).unwrap();
        let k = kinds(&t);
        assert_eq!(k.len(), 2 + 4 * 3 + 1);
        assert_eq!(k[0], "init");
        assert_eq!(k[1], "show_partition");
        assert_eq!(k[k.len() - 1], "done");
        for i in 0..4 {
            assert_eq!(
                &k[2 + i * 3..5 + i * 3],
                &["start_quadrant", "show_computation", "copy_result"]
            );
        }
    }

    #[test]
    fn strassen_shape() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Strassen).unwrap();
        let k = kinds(&t);
        assert_eq!(k.len(), 2 + 7 * 3 + 4 + 1);
        assert!(k[23..27].iter().all(|kind| *kind == "combine"));
    }

    #[test]
    fn naive_terms_are_block_products() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Naive).unwrap();
        let c = t.computation(Slot::C11).unwrap();
        assert_eq!(c.term1.description, "A11 × B11");
        assert_eq!(c.term2.description, "A12 × B21");
        assert!(c.term1.steps.is_some());
        assert_eq!(c.product, None);

        let c22 = t.computation(Slot::C22).unwrap();
        assert_eq!(c22.term1.description, "A21 × B12");
        assert_eq!(c22.term2.description, "A22 × B22");
    }

    #[test]
    fn two_by_two_terms_have_no_breakdown() {
        let t = Timeline::build(&a2(), &b2(), Algorithm::Naive).unwrap();
        let c = t.computation(Slot::C11).unwrap();
        assert!(c.term1.steps.is_none());
        assert_eq!(c.term1.value.as_scalar(), Some(5));
        assert_eq!(c.term2.value.as_scalar(), Some(14));
        assert_eq!(c.result.as_scalar(), Some(19));
        assert_eq!(t.result().to_rows(), vec![vec![19, 22], vec![43, 50]]);
    }

    #[test]
    fn strassen_factors_and_products() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Strassen).unwrap();
        let m2 = t.computation(Slot::M2).unwrap();
        assert_eq!(m2.term1.description, "A21+A22");
        assert_eq!(m2.term1.kind, TermKind::Sum(crate::ops::SumOp::Add));
        assert_eq!(m2.term2.kind, TermKind::Block);
        assert_eq!(m2.term2.description, "B11");

        let product = m2.product.as_ref().unwrap();
        assert_eq!(product.description, "(A21+A22) × B11");
        assert!(product.left.expr.is_some());
        assert!(product.right.as_ref().unwrap().expr.is_none());
        assert_eq!(product.value, m2.result);
    }

    #[test]
    fn fold_reconstructs_the_result() {
        for alg in Algorithm::ALL {
            let t = Timeline::build(&a4(), &b4(), alg).unwrap();
            let expected = reference_multiply(&a4(), &b4()).unwrap();
            assert_eq!(t.result(), &expected);
            assert_eq!(t.result_at(t.len() - 1), expected);
            assert_eq!(t.result_at(0), Matrix::zeros(4));
        }
    }

    #[test]
    fn strassen_products_are_set_aside() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Strassen).unwrap();
        // Before the combinations, the accumulator stays empty.
        assert_eq!(t.result_at(22), Matrix::zeros(4));
        assert_eq!(t.products_at(22).len(), 7);
        assert_eq!(t.products_at(4).len(), 1);
    }

    #[test]
    fn counts_match_the_recursions() {
        let naive = Timeline::build(&a4(), &b4(), Algorithm::Naive).unwrap();
        assert_eq!(naive.counts(), multiply_naive_recursive(&a4(), &b4()).unwrap().counts);
        let strassen = Timeline::build(&a4(), &b4(), Algorithm::Strassen).unwrap();
        assert_eq!(strassen.counts(), OpCounts::new(100, 56));
    }

    #[test]
    fn two_by_two_strassen_shows_one_level() {
        let t = Timeline::build(&a2(), &b2(), Algorithm::Strassen).unwrap();
        assert_eq!(t.counts(), OpCounts::new(18, 7));
        assert_eq!(t.result().to_rows(), vec![vec![19, 22], vec![43, 50]]);
    }

    #[test]
    fn nested_labels() {
        let t = Timeline::build_named(&a4(), &b4(), Algorithm::Naive, "A12", "B21").unwrap();
        let c = t.computation(Slot::C12).unwrap();
        assert_eq!(c.term1.description, "A1211 × B2112");
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            Timeline::build(&Matrix::scalar(1), &Matrix::scalar(2), Algorithm::Naive).unwrap_err(),
            MatrixError::TooSmall { size: 1, min: 2 }
        );
        assert!(matches!(
            Timeline::build(&a2(), &a4(), Algorithm::Strassen),
            Err(MatrixError::SizeMismatch { .. })
        ));
        let z = Matrix::zeros(6);
        assert_eq!(
            Timeline::build(&z, &z, Algorithm::Naive).unwrap_err(),
            MatrixError::NotPowerOfTwo(6)
        );
    }

    #[test]
    fn combine_formulas() {
        let t = Timeline::build(&a4(), &b4(), Algorithm::Strassen).unwrap();
        let formulas: Vec<_> = t
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Combine { formula, .. } => Some(formula.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(formulas[0], "C11 = M1 + M4 - M5 + M7");
        assert_eq!(formulas[3], "C22 = M1 - M2 + M3 + M6");
    }
}
