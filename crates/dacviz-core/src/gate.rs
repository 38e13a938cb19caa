//! Per-slot resolution state and the gate predicates built on it.
//!
//! Each slot has two terms and, for Strassen, a product stage that opens once
//! both factors are known. With sequential gating a resolved slot is only
//! *committed* when every earlier slot is; [`ComputationState::next_eligible`]
//! is the index of the first uncommitted slot.

use serde::{Deserialize, Serialize};

use crate::event::{Slot, TermKey, TermKind};
use crate::matrix::Matrix;
use crate::ops::CellStep;
use crate::timeline::Timeline;

/// How a term or product got its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// One-shot computation.
    Direct,
    /// 2x2 product shown entry by entry.
    Breakdown,
    /// A nested demo ran to completion.
    SubDemo,
    /// A nested demo was closed early; the value was computed directly.
    Fallback,
    /// A plain block factor, known from the start.
    Given,
}

impl Resolution {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Resolution::Direct => "direct",
            Resolution::Breakdown => "breakdown",
            Resolution::SubDemo => "sub-demo",
            Resolution::Fallback => "fallback",
            Resolution::Given => "given",
        }
    }
}

/// Part of a slot that can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Term(TermKey),
    /// Strassen: the product of the two factors.
    Product,
}

impl Stage {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stage::Term(key) => key.name(),
            Stage::Product => "product",
        }
    }
}

/// A resolved value and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub resolution: Resolution,
    pub result: Matrix,
}

/// State of one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    terms: [Option<Resolved>; 2],
    product: Option<Resolved>,
    has_product: bool,
    committed: bool,
}

impl SlotState {
    #[must_use]
    pub fn term(&self, key: TermKey) -> Option<&Resolved> {
        self.terms[key.index()].as_ref()
    }

    #[must_use]
    pub fn product(&self) -> Option<&Resolved> {
        self.product.as_ref()
    }

    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&Resolved> {
        match stage {
            Stage::Term(key) => self.term(key),
            Stage::Product => self.product(),
        }
    }

    /// Both terms are resolved.
    #[must_use]
    pub fn factors_ready(&self) -> bool {
        self.terms.iter().all(Option::is_some)
    }

    /// Every stage of the slot is resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.factors_ready() && (!self.has_product || self.product.is_some())
    }

    #[must_use]
    pub fn has_product_stage(&self) -> bool {
        self.has_product
    }

    /// Number of resolved terms, 0 to 2.
    #[must_use]
    pub fn resolved_terms(&self) -> usize {
        self.terms.iter().filter(|t| t.is_some()).count()
    }
}

/// Why a gate action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The timeline has no computation for the slot.
    UnknownSlot,
    /// The product was requested before both factors were resolved.
    FactorsPending,
    /// The slot has no product stage.
    NoProductStage,
    /// A nested demo is open; the parent is modal.
    SubDemoOpen,
    /// There is no nested demo to close.
    NoSubDemo,
}

impl IgnoreReason {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            IgnoreReason::UnknownSlot => "no computation for this slot",
            IgnoreReason::FactorsPending => "resolve both factors first",
            IgnoreReason::NoProductStage => "this slot has no product stage",
            IgnoreReason::SubDemoOpen => "close the nested demo first",
            IgnoreReason::NoSubDemo => "no nested demo is open",
        }
    }
}

/// Result of a gate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The stage now has a value.
    Resolved(Resolution),
    /// The stage was resolved by a 2x2 breakdown; the steps are returned for display.
    Breakdown(Vec<CellStep>),
    /// A nested demo was opened at the given depth.
    SubDemoOpened { depth: usize },
    /// The stage already had a value; nothing changed.
    AlreadyResolved,
    /// The action was not allowed.
    Ignored(IgnoreReason),
}

impl GateOutcome {
    /// The action changed resolution state.
    #[must_use]
    pub fn changed_state(&self) -> bool {
        matches!(self, GateOutcome::Resolved(_) | GateOutcome::Breakdown(_))
    }
}

/// Resolution state of every slot of one timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationState {
    slots: Vec<SlotState>,
    order: &'static [Slot],
    sequential: bool,
    next_eligible: usize,
}

impl ComputationState {
    /// Fresh state for `timeline`. Plain block factors start out resolved.
    #[must_use]
    pub fn for_timeline(timeline: &Timeline, sequential: bool) -> Self {
        let order = timeline.slots();
        let slots = order
            .iter()
            .map(|slot| {
                let mut state = SlotState::default();
                if let Some(c) = timeline.computation(*slot) {
                    state.has_product = c.product.is_some();
                    for key in TermKey::ALL {
                        let term = c.term(key);
                        if term.kind == TermKind::Block {
                            state.terms[key.index()] = Some(Resolved {
                                resolution: Resolution::Given,
                                result: term.value.clone(),
                            });
                        }
                    }
                }
                state
            })
            .collect();
        Self {
            slots,
            order,
            sequential,
            next_eligible: 0,
        }
    }

    /// Record a value for one stage of `slot`.
    ///
    /// Product requests are ignored until both factors are resolved.
    pub fn resolve(
        &mut self,
        slot: Slot,
        stage: Stage,
        resolution: Resolution,
        result: Matrix,
    ) -> GateOutcome {
        let Some(index) = self.position(slot) else {
            return GateOutcome::Ignored(IgnoreReason::UnknownSlot);
        };
        if let Err(reason) = self.check(index, stage) {
            return GateOutcome::Ignored(reason);
        }
        let state = &mut self.slots[index];
        let entry = match stage {
            Stage::Term(key) => &mut state.terms[key.index()],
            Stage::Product => &mut state.product,
        };
        if entry.is_some() {
            return GateOutcome::AlreadyResolved;
        }
        *entry = Some(Resolved { resolution, result });
        self.advance();
        GateOutcome::Resolved(resolution)
    }

    /// Whether `stage` of `slot` can accept a value right now.
    pub fn check_stage(&self, slot: Slot, stage: Stage) -> Result<(), IgnoreReason> {
        let index = self.position(slot).ok_or(IgnoreReason::UnknownSlot)?;
        self.check(index, stage)
    }

    fn check(&self, index: usize, stage: Stage) -> Result<(), IgnoreReason> {
        let state = &self.slots[index];
        if stage == Stage::Product {
            if !state.has_product {
                return Err(IgnoreReason::NoProductStage);
            }
            if !state.factors_ready() {
                return Err(IgnoreReason::FactorsPending);
            }
        }
        Ok(())
    }

    /// Commit resolved slots starting at `next_eligible`, cascading over
    /// successors that were resolved early.
    fn advance(&mut self) {
        while let Some(state) = self.slots.get_mut(self.next_eligible) {
            if !state.is_resolved() {
                break;
            }
            state.committed = true;
            self.next_eligible += 1;
        }
    }

    fn position(&self, slot: Slot) -> Option<usize> {
        self.order.iter().position(|s| *s == slot)
    }

    #[must_use]
    pub fn slot(&self, slot: Slot) -> Option<&SlotState> {
        self.position(slot).map(|i| &self.slots[i])
    }

    /// Every stage of `slot` is resolved.
    #[must_use]
    pub fn is_resolved(&self, slot: Slot) -> bool {
        self.slot(slot).is_some_and(SlotState::is_resolved)
    }

    /// The gate predicate: `slot` may be passed.
    ///
    /// Without sequential gating this is the same as [`Self::is_resolved`].
    #[must_use]
    pub fn is_committed(&self, slot: Slot) -> bool {
        if self.sequential {
            self.slot(slot).is_some_and(|s| s.committed)
        } else {
            self.is_resolved(slot)
        }
    }

    /// Index of the first slot that is not yet committed.
    #[must_use]
    pub fn next_eligible(&self) -> usize {
        self.next_eligible
    }

    /// The slot `next_eligible` points at, if any remain.
    #[must_use]
    pub fn next_eligible_slot(&self) -> Option<Slot> {
        self.order.get(self.next_eligible).copied()
    }

    #[must_use]
    pub fn is_sequential(&self) -> bool {
        self.sequential
    }

    /// The term still needs a value.
    #[must_use]
    pub fn term_enabled(&self, slot: Slot, key: TermKey) -> bool {
        self.slot(slot).is_some_and(|s| s.term(key).is_none())
    }

    /// The product stage is open and still needs a value.
    #[must_use]
    pub fn product_enabled(&self, slot: Slot) -> bool {
        self.slot(slot)
            .is_some_and(|s| s.has_product && s.factors_ready() && s.product.is_none())
    }

    /// Slots in timeline order.
    #[must_use]
    pub fn order(&self) -> &'static [Slot] {
        self.order
    }
}
