//! Timeline events and the values they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::{Matrix, Quadrant};
use crate::ops::{CellStep, OpCounts, SumOp};
use crate::registry::Algorithm;

/// One computation step of a timeline: an output quadrant for the naive
/// recursion, an intermediate product for Strassen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    C11,
    C12,
    C21,
    C22,
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    M7,
}

impl Slot {
    /// Slots of the naive recursion, in timeline order.
    pub const NAIVE: [Slot; 4] = [Slot::C11, Slot::C12, Slot::C21, Slot::C22];

    /// Slots of Strassen's recursion, in timeline order.
    pub const STRASSEN: [Slot; 7] = [
        Slot::M1,
        Slot::M2,
        Slot::M3,
        Slot::M4,
        Slot::M5,
        Slot::M6,
        Slot::M7,
    ];

    /// The slots of `algorithm` in timeline order.
    #[must_use]
    pub fn for_algorithm(algorithm: Algorithm) -> &'static [Slot] {
        match algorithm {
            Algorithm::Naive => &Self::NAIVE,
            Algorithm::Strassen => &Self::STRASSEN,
        }
    }

    /// Position within the slot list of its algorithm.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Slot::C11 | Slot::M1 => 0,
            Slot::C12 | Slot::M2 => 1,
            Slot::C21 | Slot::M3 => 2,
            Slot::C22 | Slot::M4 => 3,
            Slot::M5 => 4,
            Slot::M6 => 5,
            Slot::M7 => 6,
        }
    }

    /// Output quadrant written by a naive slot.
    #[must_use]
    pub fn quadrant(self) -> Option<Quadrant> {
        match self {
            Slot::C11 => Some(Quadrant::TopLeft),
            Slot::C12 => Some(Quadrant::TopRight),
            Slot::C21 => Some(Quadrant::BottomLeft),
            Slot::C22 => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Slot::C11 => "C11",
            Slot::C12 => "C12",
            Slot::C21 => "C21",
            Slot::C22 => "C22",
            Slot::M1 => "M1",
            Slot::M2 => "M2",
            Slot::M3 => "M3",
            Slot::M4 => "M4",
            Slot::M5 => "M5",
            Slot::M6 => "M6",
            Slot::M7 => "M7",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selects one of the two terms of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKey {
    First,
    Second,
}

impl TermKey {
    pub const ALL: [TermKey; 2] = [TermKey::First, TermKey::Second];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            TermKey::First => 0,
            TermKey::Second => 1,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TermKey::First => "term1",
            TermKey::Second => "term2",
        }
    }
}

/// A named matrix feeding a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub label: String,
    pub value: Matrix,
    /// Present when the operand is itself a sum or difference of two blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<OperandExpr>,
}

impl Operand {
    /// A plain block.
    #[must_use]
    pub fn block(label: impl Into<String>, value: Matrix) -> Self {
        Self {
            label: label.into(),
            value,
            expr: None,
        }
    }
}

/// `lhs op rhs` over two labelled blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandExpr {
    pub lhs: Box<Operand>,
    pub op: SumOp,
    pub rhs: Box<Operand>,
}

/// How a term's value is formed from its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    /// `left × right`.
    Product,
    /// `left + right` or `left - right`.
    Sum(SumOp),
    /// `left` itself; nothing to compute.
    Block,
}

/// One of the values a slot is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Human-readable form, e.g. `A11 × B11`.
    pub description: String,
    pub kind: TermKind,
    pub left: Operand,
    /// Absent for [`TermKind::Block`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Operand>,
    /// Precomputed value of the term.
    pub value: Matrix,
    /// Per-entry breakdown, present for products of 2x2 operands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<CellStep>>,
}

impl Term {
    /// Size of the operands.
    #[must_use]
    pub fn operand_size(&self) -> usize {
        self.left.value.size()
    }
}

/// Payload of a `ShowComputation` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computation {
    pub slot: Slot,
    pub term1: Term,
    pub term2: Term,
    /// Strassen only: `term1 × term2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Term>,
    /// Value the slot contributes, revealed once the gate is satisfied.
    pub result: Matrix,
}

impl Computation {
    #[must_use]
    pub fn term(&self, key: TermKey) -> &Term {
        match key {
            TermKey::First => &self.term1,
            TermKey::Second => &self.term2,
        }
    }
}

/// Where a `CopyResult` puts its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Placement {
    /// Into the result accumulator at the given offset.
    Block { row: usize, col: usize },
    /// Into the product panel; not part of the result matrix.
    Product,
}

/// One step of a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Init,
    ShowPartition {
        size: usize,
    },
    StartQuadrant {
        slot: Slot,
    },
    ShowComputation(Box<Computation>),
    CopyResult {
        slot: Slot,
        result: Matrix,
        placement: Placement,
    },
    /// Strassen: one output quadrant assembled from the M-products.
    Combine {
        quadrant: Quadrant,
        formula: String,
        result: Matrix,
        row: usize,
        col: usize,
    },
    Done {
        result: Matrix,
        counts: OpCounts,
    },
}

impl Event {
    /// Short identifier of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Init => "init",
            Event::ShowPartition { .. } => "show_partition",
            Event::StartQuadrant { .. } => "start_quadrant",
            Event::ShowComputation(_) => "show_computation",
            Event::CopyResult { .. } => "copy_result",
            Event::Combine { .. } => "combine",
            Event::Done { .. } => "done",
        }
    }

    /// Slot this event belongs to, if any.
    #[must_use]
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Event::StartQuadrant { slot } | Event::CopyResult { slot, .. } => Some(*slot),
            Event::ShowComputation(c) => Some(c.slot),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Event::Done { .. })
    }
}
