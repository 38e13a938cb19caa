//! Matrix arithmetic with scalar operation counting.
//!
//! Every function returns its counts next to its value; counts of a
//! recursion are the sum of the counts of its parts.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::matrix::{ensure_same_size, Matrix, MatrixError, Quadrant};
use crate::matrix::Quadrant::{
    BottomLeft as Q21, BottomRight as Q22, TopLeft as Q11, TopRight as Q12,
};

/// Scalar additions and multiplications performed by an operation.
///
/// Subtractions are counted as additions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpCounts {
    pub additions: u64,
    pub multiplications: u64,
}

impl OpCounts {
    /// Counts with the given additions and multiplications.
    #[must_use]
    pub const fn new(additions: u64, multiplications: u64) -> Self {
        Self {
            additions,
            multiplications,
        }
    }

    /// Counts of an elementwise pass over a `size`x`size` matrix.
    #[must_use]
    pub const fn elementwise(size: usize) -> Self {
        Self::new((size * size) as u64, 0)
    }

    /// Total scalar operations.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.additions + self.multiplications
    }
}

impl Add for OpCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.additions + rhs.additions,
            self.multiplications + rhs.multiplications,
        )
    }
}

impl AddAssign for OpCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for OpCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A value together with the operations it took to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub value: T,
    pub counts: OpCounts,
}

impl<T> Counted<T> {
    #[must_use]
    pub fn new(value: T, counts: OpCounts) -> Self {
        Self { value, counts }
    }
}

/// One entry of a 2x2 product: `a×b + c×d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStep {
    /// Row and column of the entry.
    pub position: (usize, usize),
    /// Factors of the first product.
    pub first_factors: (i64, i64),
    /// Factors of the second product.
    pub second_factors: (i64, i64),
    pub first_product: i64,
    pub second_product: i64,
    pub sum: i64,
}

impl CellStep {
    /// Formula text, e.g. `(1×5) + (2×7) = 19`.
    #[must_use]
    pub fn formula(&self) -> String {
        format!(
            "({}×{}) + ({}×{}) = {}",
            self.first_factors.0,
            self.first_factors.1,
            self.second_factors.0,
            self.second_factors.1,
            self.sum
        )
    }
}

/// Result of a 2x2 product with its per-entry breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseProduct {
    pub result: Matrix,
    /// One step per entry, row-major.
    pub steps: Vec<CellStep>,
    pub counts: OpCounts,
}

/// Which input of a product a block is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A quadrant of one of the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub side: Side,
    pub quadrant: Quadrant,
}

impl BlockRef {
    const fn left(quadrant: Quadrant) -> Self {
        Self {
            side: Side::Left,
            quadrant,
        }
    }

    const fn right(quadrant: Quadrant) -> Self {
        Self {
            side: Side::Right,
            quadrant,
        }
    }
}

/// Sign of a term in a sum of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SumOp {
    Add,
    Subtract,
}

impl SumOp {
    /// Operator symbol used in labels and formulas.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            SumOp::Add => '+',
            SumOp::Subtract => '-',
        }
    }

    /// Apply the operation elementwise.
    pub fn apply(self, a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
        match self {
            SumOp::Add => add(a, b),
            SumOp::Subtract => subtract(a, b),
        }
    }
}

/// One of Strassen's ten block sums, `lhs op rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumDef {
    pub lhs: BlockRef,
    pub op: SumOp,
    pub rhs: BlockRef,
}

/// One factor of a Strassen product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorDef {
    /// A plain input block.
    Block(BlockRef),
    /// An index into [`STRASSEN_SUMS`].
    Sum(usize),
}

const fn sum(lhs: BlockRef, op: SumOp, rhs: BlockRef) -> SumDef {
    SumDef { lhs, op, rhs }
}

/// S1..S10.
pub const STRASSEN_SUMS: [SumDef; 10] = [
    sum(BlockRef::left(Q11), SumOp::Add, BlockRef::left(Q22)),
    sum(BlockRef::right(Q11), SumOp::Add, BlockRef::right(Q22)),
    sum(BlockRef::left(Q21), SumOp::Add, BlockRef::left(Q22)),
    sum(BlockRef::right(Q12), SumOp::Subtract, BlockRef::right(Q22)),
    sum(BlockRef::right(Q21), SumOp::Subtract, BlockRef::right(Q11)),
    sum(BlockRef::left(Q11), SumOp::Add, BlockRef::left(Q12)),
    sum(BlockRef::left(Q21), SumOp::Subtract, BlockRef::left(Q11)),
    sum(BlockRef::right(Q11), SumOp::Add, BlockRef::right(Q12)),
    sum(BlockRef::left(Q12), SumOp::Subtract, BlockRef::left(Q22)),
    sum(BlockRef::right(Q21), SumOp::Add, BlockRef::right(Q22)),
];

/// Factors of M1..M7.
pub const STRASSEN_PRODUCTS: [(FactorDef, FactorDef); 7] = [
    (FactorDef::Sum(0), FactorDef::Sum(1)),
    (FactorDef::Sum(2), FactorDef::Block(BlockRef::right(Q11))),
    (FactorDef::Block(BlockRef::left(Q11)), FactorDef::Sum(3)),
    (FactorDef::Block(BlockRef::left(Q22)), FactorDef::Sum(4)),
    (FactorDef::Sum(5), FactorDef::Block(BlockRef::right(Q22))),
    (FactorDef::Sum(6), FactorDef::Sum(7)),
    (FactorDef::Sum(8), FactorDef::Sum(9)),
];

/// Output quadrants as signed sums of M-products (zero-based indices).
///
/// The first term of each combination is always added.
pub const STRASSEN_COMBINATIONS: [(Quadrant, &[(SumOp, usize)]); 4] = [
    (
        Q11,
        &[
            (SumOp::Add, 0),
            (SumOp::Add, 3),
            (SumOp::Subtract, 4),
            (SumOp::Add, 6),
        ],
    ),
    (Q12, &[(SumOp::Add, 2), (SumOp::Add, 4)]),
    (Q21, &[(SumOp::Add, 1), (SumOp::Add, 3)]),
    (
        Q22,
        &[
            (SumOp::Add, 0),
            (SumOp::Subtract, 1),
            (SumOp::Add, 2),
            (SumOp::Add, 5),
        ],
    ),
];

/// Output quadrant and its two block products for the 8-product recursion.
pub const NAIVE_SLOTS: [(Quadrant, [(Quadrant, Quadrant); 2]); 4] = [
    (Q11, [(Q11, Q11), (Q12, Q21)]),
    (Q12, [(Q11, Q12), (Q12, Q22)]),
    (Q21, [(Q21, Q11), (Q22, Q21)]),
    (Q22, [(Q21, Q12), (Q22, Q22)]),
];

/// Text of a Strassen combination, e.g. `M1 + M4 - M5 + M7`.
#[must_use]
pub fn combination_formula(terms: &[(SumOp, usize)]) -> String {
    let mut out = String::new();
    for (i, (op, index)) in terms.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push(op.symbol());
            out.push(' ');
        }
        out.push_str(&format!("M{}", index + 1));
    }
    out
}

fn elementwise(
    a: &Matrix,
    b: &Matrix,
    f: impl Fn(i64, i64) -> i64,
) -> Result<Counted<Matrix>, MatrixError> {
    ensure_same_size(a, b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| f(x, y))
        .collect();
    Ok(Counted::new(
        Matrix::from_raw(a.size(), data),
        OpCounts::elementwise(a.size()),
    ))
}

/// Elementwise sum. Counts `n²` additions.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
    elementwise(a, b, |x, y| x + y)
}

/// Elementwise difference. Counts `n²` additions.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
    elementwise(a, b, |x, y| x - y)
}

/// Textbook `O(n³)` product. Works for any matching size.
pub fn reference_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    ensure_same_size(a, b)?;
    let n = a.size();
    let mut data = vec![0; n * n];
    for i in 0..n {
        for k in 0..n {
            let aik = a.get(i, k);
            for j in 0..n {
                data[i * n + j] += aik * b.get(k, j);
            }
        }
    }
    Ok(Matrix::from_raw(n, data))
}

/// Multiply two 2x2 matrices, recording how each entry is formed.
///
/// Counts 8 multiplications and 4 additions.
pub fn multiply_base_2x2_with_steps(a: &Matrix, b: &Matrix) -> Result<BaseProduct, MatrixError> {
    ensure_same_size(a, b)?;
    if a.size() != 2 {
        return Err(MatrixError::UnexpectedSize {
            expected: 2,
            actual: a.size(),
        });
    }

    let mut steps = Vec::with_capacity(4);
    let mut data = Vec::with_capacity(4);
    for i in 0..2 {
        for j in 0..2 {
            let first_factors = (a.get(i, 0), b.get(0, j));
            let second_factors = (a.get(i, 1), b.get(1, j));
            let first_product = first_factors.0 * first_factors.1;
            let second_product = second_factors.0 * second_factors.1;
            let sum = first_product + second_product;
            data.push(sum);
            steps.push(CellStep {
                position: (i, j),
                first_factors,
                second_factors,
                first_product,
                second_product,
                sum,
            });
        }
    }

    Ok(BaseProduct {
        result: Matrix::from_raw(2, data),
        steps,
        counts: OpCounts::new(4, 8),
    })
}

fn ensure_multipliable(a: &Matrix, b: &Matrix) -> Result<(), MatrixError> {
    ensure_same_size(a, b)?;
    if a.size().is_power_of_two() {
        Ok(())
    } else {
        Err(MatrixError::NotPowerOfTwo(a.size()))
    }
}

/// Shared base cases: a scalar product at size 1, the 2x2 product at size 2.
fn base_case(a: &Matrix, b: &Matrix) -> Result<Option<Counted<Matrix>>, MatrixError> {
    match a.size() {
        1 => Ok(Some(Counted::new(
            Matrix::scalar(a.get(0, 0) * b.get(0, 0)),
            OpCounts::new(0, 1),
        ))),
        2 => {
            let base = multiply_base_2x2_with_steps(a, b)?;
            Ok(Some(Counted::new(base.result, base.counts)))
        }
        _ => Ok(None),
    }
}

/// The 8-product divide-and-conquer recursion.
pub fn multiply_naive_recursive(a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
    ensure_multipliable(a, b)?;
    if let Some(done) = base_case(a, b)? {
        return Ok(done);
    }

    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    let mut counts = OpCounts::default();
    let mut blocks = Vec::with_capacity(4);
    for (_, [(a1, b1), (a2, b2)]) in NAIVE_SLOTS {
        let first = multiply_naive_recursive(&qa[a1.index()], &qb[b1.index()])?;
        let second = multiply_naive_recursive(&qa[a2.index()], &qb[b2.index()])?;
        let total = add(&first.value, &second.value)?;
        counts += first.counts + second.counts + total.counts;
        blocks.push(total.value);
    }
    let blocks: [Matrix; 4] = blocks
        .try_into()
        .map_err(|_| MatrixError::NotPowerOfTwo(a.size()))?;
    Ok(Counted::new(Matrix::from_quadrants(&blocks)?, counts))
}

/// Strassen's 7-product recursion.
pub fn multiply_strassen(a: &Matrix, b: &Matrix) -> Result<Counted<Matrix>, MatrixError> {
    ensure_multipliable(a, b)?;
    if let Some(done) = base_case(a, b)? {
        return Ok(done);
    }
    let level = strassen_level(a, b)?;
    Ok(Counted::new(level.result, level.counts))
}

/// Everything computed by one level of Strassen's recursion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrassenLevel {
    /// S1..S10.
    pub sums: Vec<Matrix>,
    /// M1..M7.
    pub products: Vec<Matrix>,
    /// Counts of each product, recursion included.
    pub product_counts: Vec<OpCounts>,
    pub result: Matrix,
    /// Counts of the whole level: sums, products and combinations.
    pub counts: OpCounts,
}

/// Run exactly one level of Strassen's recursion over the quadrants.
///
/// Unlike [`multiply_strassen`] this never stops at size 2: a 2x2 input is
/// split into 1x1 blocks.
pub fn strassen_level(a: &Matrix, b: &Matrix) -> Result<StrassenLevel, MatrixError> {
    ensure_multipliable(a, b)?;
    if a.size() < 2 {
        return Err(MatrixError::TooSmall {
            size: a.size(),
            min: 2,
        });
    }

    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    let block = |r: BlockRef| match r.side {
        Side::Left => &qa[r.quadrant.index()],
        Side::Right => &qb[r.quadrant.index()],
    };

    let mut counts = OpCounts::default();
    let mut sums = Vec::with_capacity(STRASSEN_SUMS.len());
    for def in &STRASSEN_SUMS {
        let s = def.op.apply(block(def.lhs), block(def.rhs))?;
        counts += s.counts;
        sums.push(s.value);
    }

    let mut products = Vec::with_capacity(STRASSEN_PRODUCTS.len());
    let mut product_counts = Vec::with_capacity(STRASSEN_PRODUCTS.len());
    for (left, right) in &STRASSEN_PRODUCTS {
        let factor = |f: FactorDef| match f {
            FactorDef::Block(r) => block(r),
            FactorDef::Sum(i) => &sums[i],
        };
        let m = multiply_strassen(factor(*left), factor(*right))?;
        counts += m.counts;
        product_counts.push(m.counts);
        products.push(m.value);
    }

    let mut blocks = Vec::with_capacity(4);
    for (_, terms) in &STRASSEN_COMBINATIONS {
        let c = combine_products(&products, terms)?;
        counts += c.counts;
        blocks.push(c.value);
    }
    let blocks: [Matrix; 4] = blocks
        .try_into()
        .map_err(|_| MatrixError::NotPowerOfTwo(a.size()))?;

    Ok(StrassenLevel {
        sums,
        products,
        product_counts,
        result: Matrix::from_quadrants(&blocks)?,
        counts,
    })
}

/// Evaluate a signed sum of products.
pub fn combine_products(
    products: &[Matrix],
    terms: &[(SumOp, usize)],
) -> Result<Counted<Matrix>, MatrixError> {
    let Some(((_, first), rest)) = terms.split_first() else {
        return Err(MatrixError::Empty);
    };
    let first = products.get(*first).ok_or(MatrixError::Empty)?;
    let mut acc = Counted::new(first.clone(), OpCounts::default());
    for (op, index) in rest {
        let m = products.get(*index).ok_or(MatrixError::Empty)?;
        let next = op.apply(&acc.value, m)?;
        acc = Counted::new(next.value, acc.counts + next.counts);
    }
    Ok(acc)
}
