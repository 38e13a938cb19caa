//! Block labels.
//!
//! A block is named after its operand with one two-digit quadrant code per
//! recursion level: `A12` is the top-right block of `A`, and `A1221` the
//! bottom-left block of `A12`. Operand names that are expressions are
//! parenthesized first, so the top-left block of `A11+A22` is
//! `(A11+A22)11`.

use crate::matrix::Quadrant;
use crate::ops::SumOp;

/// True when `name` has an operator outside parentheses.
#[must_use]
pub fn is_compound(name: &str) -> bool {
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' | '-' | '×' | ' ' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Label of one quadrant of the operand called `name`.
#[must_use]
pub fn block_label(name: &str, quadrant: Quadrant) -> String {
    if is_compound(name) {
        format!("({name}){}", quadrant.code())
    } else {
        format!("{name}{}", quadrant.code())
    }
}

/// Label of a sum or difference of two blocks, e.g. `A11+A22`.
#[must_use]
pub fn sum_label(lhs: &str, op: SumOp, rhs: &str) -> String {
    format!("{}{}{}", wrap(lhs), op.symbol(), wrap(rhs))
}

/// Description of a product, e.g. `A11 × B11`.
#[must_use]
pub fn product_label(left: &str, right: &str) -> String {
    format!("{} × {}", wrap(left), wrap(right))
}

fn wrap(name: &str) -> String {
    if is_compound(name) {
        format!("({name})")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_blocks() {
        let labels: Vec<_> = Quadrant::ALL.iter().map(|q| block_label("A", *q)).collect();
        assert_eq!(labels, vec!["A11", "A12", "A21", "A22"]);
    }

    #[test]
    fn nested_blocks_append_codes() {
        let parent = block_label("A", Quadrant::TopRight);
        assert_eq!(block_label(&parent, Quadrant::BottomLeft), "A1221");
        let deeper = block_label("A1221", Quadrant::BottomRight);
        assert_eq!(deeper, "A122122");
    }

    #[test]
    fn compound_names_are_parenthesized() {
        let s = sum_label("A11", SumOp::Add, "A22");
        assert_eq!(s, "A11+A22");
        assert_eq!(block_label(&s, Quadrant::TopRight), "(A11+A22)12");
    }

    #[test]
    fn product_of_sums() {
        assert_eq!(product_label("A11+A22", "B11"), "(A11+A22) × B11");
        assert_eq!(product_label("A11", "B11"), "A11 × B11");
        assert_eq!(sum_label("B12", SumOp::Subtract, "B22"), "B12-B22");
    }

    #[test]
    fn compound_detection() {
        assert!(!is_compound("A1221"));
        assert!(is_compound("B21-B11"));
        assert!(!is_compound("(A11+A22)21"));
        assert_eq!(
            sum_label("(A11+A22)21", SumOp::Add, "(A11+A22)22"),
            "(A11+A22)21+(A11+A22)22"
        );
    }
}
