//! Plain-text rendering of matrices and timeline events.

use std::fmt::Write as _;

use dacviz_core::{Computation, Event, Matrix, Placement, PlaybackController, Term, TermKind};

use crate::output::format_counts;

/// Rows of `m` as text. With `partition`, a divider separates the quadrants.
///
/// ```text
/// [1 2 | 3 4]
/// [5 6 | 7 8]
/// [----+----]
/// ...
/// ```
#[must_use]
pub fn matrix_lines(m: &Matrix, partition: bool) -> Vec<String> {
    let n = m.size();
    let half = n / 2;
    let split = partition && n >= 2;
    let width = m
        .rows()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(n + 1);
    for (i, row) in m.rows().enumerate() {
        let mut line = String::from("[");
        for (j, v) in row.iter().enumerate() {
            if j > 0 {
                line.push(' ');
            }
            if split && j == half {
                line.push_str("| ");
            }
            let _ = write!(line, "{v:>width$}");
        }
        line.push(']');
        if split && i == half {
            lines.push(divider(&line));
        }
        lines.push(line);
    }
    lines
}

fn divider(row: &str) -> String {
    row.chars()
        .map(|c| match c {
            '[' | ']' => c,
            '|' => '+',
            _ => '-',
        })
        .collect()
}

/// Labelled blocks laid out left to right.
#[must_use]
pub fn side_by_side(blocks: &[(String, Vec<String>)]) -> Vec<String> {
    let widths: Vec<usize> = blocks
        .iter()
        .map(|(label, lines)| {
            lines
                .iter()
                .map(|l| l.chars().count())
                .chain(std::iter::once(label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let height = blocks.iter().map(|(_, l)| l.len()).max().unwrap_or(0);

    let mut out = Vec::with_capacity(height + 1);
    let mut row_of = |cell: &dyn Fn(usize) -> String| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(k, w)| pad(&cell(k), *w))
            .collect();
        out.push(cells.join("   ").trim_end().to_string());
    };
    row_of(&|k| blocks[k].0.clone());
    for r in 0..height {
        row_of(&|k| blocks[k].1.get(r).cloned().unwrap_or_default());
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// `left × right = value`, each operand labelled.
#[must_use]
pub fn term_lines(term: &Term) -> Vec<String> {
    let mut blocks = vec![(
        term.left.label.clone(),
        matrix_lines(&term.left.value, false),
    )];
    if let Some(right) = &term.right {
        let op = match term.kind {
            TermKind::Sum(op) => op.symbol().to_string(),
            _ => "×".to_string(),
        };
        blocks.push((op, Vec::new()));
        blocks.push((right.label.clone(), matrix_lines(&right.value, false)));
    }
    blocks.push(("=".into(), Vec::new()));
    blocks.push((term.description.clone(), matrix_lines(&term.value, false)));
    side_by_side(&blocks)
}

/// Every term of a computation, then its result.
#[must_use]
pub fn computation_lines(c: &Computation) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, term) in [("term1", &c.term1), ("term2", &c.term2)] {
        lines.push(format!("{name}: {}", term.description));
        lines.extend(term_lines(term).into_iter().map(|l| format!("  {l}")));
    }
    if let Some(product) = &c.product {
        lines.push(format!("product: {}", product.description));
        lines.extend(term_lines(product).into_iter().map(|l| format!("  {l}")));
    }
    lines.push(format!("{} =", c.slot));
    lines.extend(matrix_lines(&c.result, false).into_iter().map(|l| format!("  {l}")));
    lines
}

/// Matrices worth showing for the controller's current event.
#[must_use]
pub fn event_lines(controller: &PlaybackController) -> Vec<String> {
    let timeline = controller.timeline();
    let inputs = |partition: bool| {
        side_by_side(&[
            (
                timeline.left_name().to_string(),
                matrix_lines(timeline.left(), partition),
            ),
            (
                timeline.right_name().to_string(),
                matrix_lines(timeline.right(), partition),
            ),
        ])
    };
    match controller.current_event() {
        Event::Init => inputs(false),
        Event::ShowPartition { .. } => inputs(true),
        Event::StartQuadrant { .. } => Vec::new(),
        Event::ShowComputation(c) => computation_lines(c),
        Event::CopyResult {
            slot,
            result,
            placement: Placement::Product,
        } => side_by_side(&[(slot.to_string(), matrix_lines(result, false))]),
        Event::CopyResult { .. } => side_by_side(&[(
            "C".into(),
            matrix_lines(&controller.current_result(), true),
        )]),
        Event::Combine {
            quadrant, result, ..
        } => side_by_side(&[
            (format!("C{}", quadrant.code()), matrix_lines(result, false)),
            ("C".into(), matrix_lines(&controller.current_result(), true)),
        ]),
        Event::Done { result, counts } => {
            let mut lines = side_by_side(&[("C".into(), matrix_lines(result, false))]);
            lines.push(format_counts(counts));
            lines
        }
    }
}
