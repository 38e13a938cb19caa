//! Playback controller: cursor, navigation, gate actions and nested demos.
//!
//! Controllers form a tree. A controller owns at most one open nested demo;
//! while it is open the parent ignores navigation and gate actions, and the
//! host drives [`PlaybackController::active_mut`] instead.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::constants::BASE_CASE_SIZE;
use crate::event::{Event, Slot, Term, TermKey, TermKind};
use crate::gate::{ComputationState, GateOutcome, IgnoreReason, Resolution, Stage};
use crate::matrix::{ensure_demo_size, Matrix, MatrixError};
use crate::narration;
use crate::observer::{DemoObserver, ObserverSubject, StateChange, SubDemoRequest};
use crate::ops::multiply_base_2x2_with_steps;
use crate::options::Options;
use crate::registry::Algorithm;
use crate::timeline::Timeline;

/// Outcome of a navigation request. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved.
    Moved,
    /// A gate, or an open nested demo, refused the move.
    Blocked,
    /// Already on the first event.
    AtStart,
    /// Already on the last event.
    AtEnd,
}

impl Navigation {
    #[must_use]
    pub fn moved(self) -> bool {
        self == Navigation::Moved
    }
}

/// A nested demo and the stage of the parent it will resolve.
pub struct SubDemo {
    slot: Slot,
    stage: Stage,
    label: String,
    controller: PlaybackController,
}

impl SubDemo {
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Description of the product being expanded.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }
}

/// Cursor over one timeline plus the gate state of its slots.
pub struct PlaybackController {
    options: Options,
    depth: usize,
    timeline: Timeline,
    cursor: usize,
    finished: bool,
    state: ComputationState,
    child: Option<Box<SubDemo>>,
    subject: Arc<ObserverSubject>,
}

impl PlaybackController {
    /// Controller over `a × b`.
    pub fn new(a: &Matrix, b: &Matrix, options: Options) -> Result<Self, MatrixError> {
        let options = options.normalize();
        let timeline = Timeline::build(a, b, options.algorithm)?;
        Ok(Self::with_timeline(
            timeline,
            options,
            0,
            Arc::new(ObserverSubject::new()),
        ))
    }

    /// Controller over freshly generated inputs of `options.size`.
    pub fn generated<R: Rng + ?Sized>(options: Options, rng: &mut R) -> Result<Self, MatrixError> {
        let options = options.normalize();
        let a = Matrix::random(options.size, options.max_entry, rng);
        let b = Matrix::random(options.size, options.max_entry, rng);
        Self::new(&a, &b, options)
    }

    fn with_timeline(
        timeline: Timeline,
        options: Options,
        depth: usize,
        subject: Arc<ObserverSubject>,
    ) -> Self {
        let state = ComputationState::for_timeline(&timeline, options.sequential_gating());
        Self {
            options,
            depth,
            timeline,
            cursor: 1,
            finished: false,
            state,
            child: None,
            subject,
        }
    }

    /// Replace the inputs with random `n`x`n` matrices and start over.
    ///
    /// Resets the gate state, closes any nested demo and puts the cursor on
    /// the first event after `Init`.
    pub fn generate<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<(), MatrixError> {
        ensure_demo_size(n)?;
        let a = Matrix::random(n, self.options.max_entry, rng);
        let b = Matrix::random(n, self.options.max_entry, rng);
        let timeline = Timeline::build_named(
            &a,
            &b,
            self.options.algorithm,
            self.timeline.left_name(),
            self.timeline.right_name(),
        )?;

        self.options.size = n;
        self.state = ComputationState::for_timeline(&timeline, self.options.sequential_gating());
        self.timeline = timeline;
        self.cursor = 1;
        self.finished = false;
        self.child = None;

        debug!(depth = self.depth, size = n, "Demo regenerated");
        self.subject.notify(&StateChange::Generated {
            depth: self.depth,
            size: n,
        });
        Ok(())
    }

    /// Register an observer. Nested demos share the registration.
    pub fn subscribe(&self, observer: Arc<dyn DemoObserver>) {
        self.subject.register(observer);
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.timeline.algorithm()
    }

    /// Nesting depth; the top-level demo is 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn state(&self) -> &ComputationState {
        &self.state
    }

    #[must_use]
    pub fn current_event(&self) -> &Event {
        &self.timeline.events()[self.cursor]
    }

    /// Slot of the current event, if it belongs to one.
    #[must_use]
    pub fn current_slot(&self) -> Option<Slot> {
        self.current_event().slot()
    }

    /// The cursor is on the `Done` event.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor + 1 == self.timeline.len()
    }

    /// The cursor has reached `Done` at least once.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.finished
    }

    /// A nested demo is open and this controller is waiting for it.
    #[must_use]
    pub fn is_modal(&self) -> bool {
        self.child.is_some()
    }

    fn gate_satisfied(&self) -> bool {
        match self.current_event() {
            Event::ShowComputation(c) => self.state.is_committed(c.slot),
            _ => true,
        }
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        !self.is_modal() && self.cursor + 1 < self.timeline.len() && self.gate_satisfied()
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        !self.is_modal() && self.cursor > 0
    }

    /// Advance one event unless the current gate is unsatisfied.
    pub fn next(&mut self) -> Navigation {
        if self.is_modal() {
            return Navigation::Blocked;
        }
        if self.cursor + 1 >= self.timeline.len() {
            return Navigation::AtEnd;
        }
        if !self.gate_satisfied() {
            debug!(depth = self.depth, cursor = self.cursor, "Advance refused by gate");
            return Navigation::Blocked;
        }
        self.cursor += 1;
        if self.is_done() {
            self.finished = true;
        }
        self.moved();
        Navigation::Moved
    }

    /// Step back one event. Gate state is kept.
    pub fn prev(&mut self) -> Navigation {
        if self.is_modal() {
            return Navigation::Blocked;
        }
        if self.cursor == 0 {
            return Navigation::AtStart;
        }
        self.cursor -= 1;
        self.moved();
        Navigation::Moved
    }

    fn moved(&self) {
        debug!(depth = self.depth, cursor = self.cursor, "Cursor moved");
        self.subject.notify(&StateChange::Moved {
            depth: self.depth,
            cursor: self.cursor,
        });
    }

    /// Result matrix as of the cursor.
    #[must_use]
    pub fn current_result(&self) -> Matrix {
        self.timeline.result_at(self.cursor)
    }

    /// Strassen products revealed so far.
    #[must_use]
    pub fn revealed_products(&self) -> Vec<(Slot, &Matrix)> {
        self.timeline.products_at(self.cursor)
    }

    /// Commentary for the current event.
    #[must_use]
    pub fn comment(&self) -> String {
        narration::comment(&self.timeline, self.cursor, &self.state)
    }

    /// The term can still be computed.
    #[must_use]
    pub fn term_enabled(&self, slot: Slot, key: TermKey) -> bool {
        !self.is_modal() && self.state.term_enabled(slot, key)
    }

    /// The product stage of `slot` is open and unresolved.
    #[must_use]
    pub fn product_enabled(&self, slot: Slot) -> bool {
        !self.is_modal() && self.state.product_enabled(slot)
    }

    /// Resolve a term with a one-shot computation.
    pub fn compute_term(&mut self, slot: Slot, key: TermKey) -> Result<GateOutcome, MatrixError> {
        self.compute(slot, Stage::Term(key))
    }

    /// Resolve a term by showing how it is computed.
    ///
    /// Products above the base size open a nested demo; 2x2 products return
    /// their breakdown; scalars and factor sums resolve directly.
    pub fn show_computation(
        &mut self,
        slot: Slot,
        key: TermKey,
    ) -> Result<GateOutcome, MatrixError> {
        self.show(slot, Stage::Term(key))
    }

    /// Resolve a Strassen product with a one-shot computation.
    pub fn compute_product(&mut self, slot: Slot) -> Result<GateOutcome, MatrixError> {
        self.compute(slot, Stage::Product)
    }

    /// Resolve a Strassen product by showing how it is computed.
    pub fn show_product(&mut self, slot: Slot) -> Result<GateOutcome, MatrixError> {
        self.show(slot, Stage::Product)
    }

    /// Compute or show any stage.
    pub fn apply(&mut self, slot: Slot, stage: Stage, show: bool) -> Result<GateOutcome, MatrixError> {
        if show {
            self.show(slot, stage)
        } else {
            self.compute(slot, stage)
        }
    }

    /// The term behind a stage, or why the stage cannot be acted on.
    fn stage_term(&self, slot: Slot, stage: Stage) -> Result<&Term, IgnoreReason> {
        if self.is_modal() {
            return Err(IgnoreReason::SubDemoOpen);
        }
        let computation = self
            .timeline
            .computation(slot)
            .ok_or(IgnoreReason::UnknownSlot)?;
        self.state.check_stage(slot, stage)?;
        match stage {
            Stage::Term(key) => Ok(computation.term(key)),
            Stage::Product => computation
                .product
                .as_ref()
                .ok_or(IgnoreReason::NoProductStage),
        }
    }

    fn is_stage_resolved(&self, slot: Slot, stage: Stage) -> bool {
        self.state
            .slot(slot)
            .is_some_and(|s| s.stage(stage).is_some())
    }

    fn compute(&mut self, slot: Slot, stage: Stage) -> Result<GateOutcome, MatrixError> {
        let term = match self.stage_term(slot, stage) {
            Ok(term) => term,
            Err(reason) => return Ok(GateOutcome::Ignored(reason)),
        };
        if self.is_stage_resolved(slot, stage) {
            return Ok(GateOutcome::AlreadyResolved);
        }
        let value = evaluate(term, self.algorithm())?;
        Ok(self.resolve(slot, stage, Resolution::Direct, value))
    }

    fn show(&mut self, slot: Slot, stage: Stage) -> Result<GateOutcome, MatrixError> {
        let term = match self.stage_term(slot, stage) {
            Ok(term) => term,
            Err(reason) => return Ok(GateOutcome::Ignored(reason)),
        };
        if self.is_stage_resolved(slot, stage) {
            return Ok(GateOutcome::AlreadyResolved);
        }
        if term.kind != TermKind::Product || term.operand_size() == 1 {
            let value = evaluate(term, self.algorithm())?;
            return Ok(self.resolve(slot, stage, Resolution::Direct, value));
        }
        if term.operand_size() == BASE_CASE_SIZE {
            let base = multiply_base_2x2_with_steps(&term.left.value, right_value(term))?;
            return Ok(match self.resolve(slot, stage, Resolution::Breakdown, base.result) {
                GateOutcome::Resolved(_) => GateOutcome::Breakdown(base.steps),
                other => other,
            });
        }
        let term = term.clone();
        self.open_sub_demo(slot, stage, &term)
    }

    fn resolve(&mut self, slot: Slot, stage: Stage, resolution: Resolution, value: Matrix) -> GateOutcome {
        let outcome = self.state.resolve(slot, stage, resolution, value);
        if let GateOutcome::Resolved(resolution) = outcome {
            debug!(
                depth = self.depth,
                slot = %slot,
                stage = stage.name(),
                resolution = resolution.name(),
                "Stage resolved"
            );
            self.subject.notify(&StateChange::Resolved {
                depth: self.depth,
                slot,
                stage,
                resolution,
            });
        }
        outcome
    }

    fn open_sub_demo(&mut self, slot: Slot, stage: Stage, term: &Term) -> Result<GateOutcome, MatrixError> {
        let right = term.right.as_ref().unwrap_or(&term.left);
        let timeline = Timeline::build_named(
            &term.left.value,
            &right.value,
            self.algorithm(),
            &term.left.label,
            &right.label,
        )?;
        let depth = self.depth + 1;
        let request = SubDemoRequest {
            label: term.description.clone(),
            left_label: term.left.label.clone(),
            right_label: right.label.clone(),
            left: term.left.value.clone(),
            right: right.value.clone(),
            depth,
            algorithm: self.algorithm(),
            slot,
        };
        let controller = Self::with_timeline(
            timeline,
            self.options.clone(),
            depth,
            Arc::clone(&self.subject),
        );

        info!(
            depth,
            slot = %slot,
            label = %term.description,
            size = term.operand_size(),
            "Opening nested demo"
        );
        self.child = Some(Box::new(SubDemo {
            slot,
            stage,
            label: term.description.clone(),
            controller,
        }));
        self.subject.notify_sub_demo(&request);
        Ok(GateOutcome::SubDemoOpened { depth })
    }

    /// Close this controller's nested demo and hand its value to the gate.
    ///
    /// A demo that reached its `Done` event resolves the stage with its
    /// result. One closed early resolves it with the directly computed
    /// product instead, recorded as [`Resolution::Fallback`].
    pub fn close_sub_demo(&mut self) -> Result<GateOutcome, MatrixError> {
        let Some(sub) = self.child.take() else {
            return Ok(GateOutcome::Ignored(IgnoreReason::NoSubDemo));
        };
        let SubDemo {
            slot,
            stage,
            label,
            controller,
        } = *sub;

        let (resolution, value) = if controller.finished {
            info!(depth = controller.depth, slot = %slot, %label, "Nested demo completed");
            (Resolution::SubDemo, controller.timeline.result().clone())
        } else {
            warn!(
                depth = controller.depth,
                slot = %slot,
                %label,
                cursor = controller.cursor,
                events = controller.timeline.len(),
                "Nested demo closed before completion; using the directly computed product"
            );
            let direct = self
                .algorithm()
                .multiplier()
                .multiply(controller.timeline.left(), controller.timeline.right())?;
            (Resolution::Fallback, direct.value)
        };

        let outcome = self.resolve(slot, stage, resolution, value);
        self.subject.notify(&StateChange::SubDemoClosed {
            depth: self.depth,
            slot,
            resolution,
        });
        Ok(outcome)
    }

    /// Close the deepest open nested demo anywhere below this controller.
    pub fn close_innermost(&mut self) -> Result<GateOutcome, MatrixError> {
        let nested = match &self.child {
            None => return Ok(GateOutcome::Ignored(IgnoreReason::NoSubDemo)),
            Some(sub) => sub.controller.is_modal(),
        };
        if nested {
            if let Some(sub) = self.child.as_mut() {
                return sub.controller.close_innermost();
            }
        }
        self.close_sub_demo()
    }

    #[must_use]
    pub fn sub_demo(&self) -> Option<&SubDemo> {
        self.child.as_deref()
    }

    /// The deepest open demo: the one the host should drive.
    #[must_use]
    pub fn active(&self) -> &PlaybackController {
        match &self.child {
            Some(sub) => sub.controller.active(),
            None => self,
        }
    }

    pub fn active_mut(&mut self) -> &mut PlaybackController {
        match self.child {
            Some(ref mut sub) => sub.controller.active_mut(),
            None => self,
        }
    }

    /// Labels of the open nested demos, outermost first.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut current = self;
        while let Some(sub) = &current.child {
            labels.push(sub.label.as_str());
            current = &sub.controller;
        }
        labels
    }
}

fn right_value(term: &Term) -> &Matrix {
    term.right.as_ref().map_or(&term.left.value, |r| &r.value)
}

/// Compute a term's value from its operands.
fn evaluate(term: &Term, algorithm: Algorithm) -> Result<Matrix, MatrixError> {
    match term.kind {
        TermKind::Product => Ok(algorithm
            .multiplier()
            .multiply(&term.left.value, right_value(term))?
            .value),
        TermKind::Sum(op) => Ok(op.apply(&term.left.value, right_value(term))?.value),
        TermKind::Block => Ok(term.left.value.clone()),
    }
}
