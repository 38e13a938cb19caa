//! Non-interactive playback.
//!
//! Drives a controller tree from its current event to `Done`, satisfying
//! every gate on the way. Nested demos opened along the route are played to
//! completion and closed, so their results flow back as sub-demo
//! resolutions.

use std::io::Write;

use tracing::debug;

use dacviz_core::{
    Event, GateOutcome, Navigation, PlaybackController, Slot, Stage, SubDemo, TermKey, TermKind,
};

use crate::error::CliError;
use crate::presenter::DemoPresenter;

const STAGES: [Stage; 3] = [
    Stage::Term(TermKey::First),
    Stage::Term(TermKey::Second),
    Stage::Product,
];

/// How autoplay resolves gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayPolicy {
    /// Show 2x2 products entry by entry.
    pub breakdowns: bool,
    /// Expand larger products into nested demos while the current depth is
    /// below this.
    pub max_depth: usize,
}

impl AutoplayPolicy {
    /// Compute every gate in one shot.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            breakdowns: false,
            max_depth: 0,
        }
    }

    /// Breakdowns plus nested demos down to `max_depth`.
    #[must_use]
    pub fn expanded(max_depth: usize) -> Self {
        Self {
            breakdowns: true,
            max_depth,
        }
    }
}

impl Default for AutoplayPolicy {
    fn default() -> Self {
        Self::expanded(0)
    }
}

/// What an autoplay run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayReport {
    /// Cursor moves, across all depths.
    pub steps: usize,
    /// Stages resolved by direct computation.
    pub computed: usize,
    pub breakdowns: usize,
    pub sub_demos: usize,
}

/// Play `root` to its `Done` event.
pub fn autoplay(
    root: &mut PlaybackController,
    policy: &AutoplayPolicy,
    presenter: &dyn DemoPresenter,
    out: &mut dyn Write,
) -> Result<AutoplayReport, CliError> {
    let mut report = AutoplayReport::default();
    presenter.present_step(root.active(), out)?;

    loop {
        if root.active().is_done() {
            if root.active().depth() == 0 {
                break;
            }
            let Some((slot, stage, depth)) = innermost(root)
                .map(|sub| (sub.slot(), sub.stage(), sub.controller().depth() - 1))
            else {
                break;
            };
            let outcome = root.close_innermost()?;
            presenter.present_outcome(depth, slot, stage, &outcome, out)?;
            continue;
        }

        let active = root.active_mut();
        if resolve_gate(active, policy, presenter, out, &mut report)? {
            presenter.present_step(root.active(), out)?;
            continue;
        }
        match active.next() {
            Navigation::Moved => {
                report.steps += 1;
                presenter.present_step(active, out)?;
            }
            Navigation::Blocked | Navigation::AtStart | Navigation::AtEnd => {
                return Err(CliError::Stuck {
                    depth: active.depth(),
                    cursor: active.cursor(),
                });
            }
        }
    }

    debug!(
        steps = report.steps,
        computed = report.computed,
        breakdowns = report.breakdowns,
        sub_demos = report.sub_demos,
        "Autoplay finished"
    );
    Ok(report)
}

fn innermost(root: &PlaybackController) -> Option<&SubDemo> {
    let mut sub = root.sub_demo()?;
    while let Some(next) = sub.controller().sub_demo() {
        sub = next;
    }
    Some(sub)
}

/// Resolve the open stages of the gate under the cursor. True when a nested
/// demo was opened and playback should descend into it.
fn resolve_gate(
    active: &mut PlaybackController,
    policy: &AutoplayPolicy,
    presenter: &dyn DemoPresenter,
    out: &mut dyn Write,
    report: &mut AutoplayReport,
) -> Result<bool, CliError> {
    let Event::ShowComputation(computation) = active.current_event() else {
        return Ok(false);
    };
    let slot = computation.slot;

    for stage in STAGES {
        let Some(show) = wants_show(active, slot, stage, policy) else {
            continue;
        };
        let outcome = active.apply(slot, stage, show)?;
        presenter.present_outcome(active.depth(), slot, stage, &outcome, out)?;
        match outcome {
            GateOutcome::SubDemoOpened { .. } => {
                report.sub_demos += 1;
                return Ok(true);
            }
            GateOutcome::Breakdown(_) => report.breakdowns += 1,
            GateOutcome::Resolved(_) => report.computed += 1,
            GateOutcome::AlreadyResolved | GateOutcome::Ignored(_) => {}
        }
    }
    Ok(false)
}

/// Whether to show rather than compute `stage`; `None` when there is
/// nothing left to do for it.
fn wants_show(
    active: &PlaybackController,
    slot: Slot,
    stage: Stage,
    policy: &AutoplayPolicy,
) -> Option<bool> {
    let state = active.state().slot(slot)?;
    if state.stage(stage).is_some() {
        return None;
    }
    let computation = active.timeline().computation(slot)?;
    let term = match stage {
        Stage::Term(key) => computation.term(key),
        Stage::Product => computation.product.as_ref()?,
    };
    if term.kind != TermKind::Product {
        return Some(false);
    }
    Some(match term.operand_size() {
        2 => policy.breakdowns,
        n if n > 2 => active.depth() < policy.max_depth,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::CliPresenter;
    use dacviz_core::{Algorithm, Matrix, Options};

    fn seeded(size: usize, seed: i64) -> Matrix {
        let rows = (0..size as i64)
            .map(|i| (0..size as i64).map(|j| (i * 7 + j * 3 + seed) % 10).collect())
            .collect();
        Matrix::from_rows(rows).unwrap()
    }

    fn run(
        alg: Algorithm,
        size: usize,
        policy: AutoplayPolicy,
    ) -> (PlaybackController, AutoplayReport, String) {
        let options = Options::for_algorithm(alg);
        let mut c = PlaybackController::new(&seeded(size, 1), &seeded(size, 2), options).unwrap();
        let presenter = CliPresenter::new(true, false);
        let mut buf = Vec::new();
        let report = autoplay(&mut c, &policy, &presenter, &mut buf).unwrap();
        (c, report, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn direct_naive_reaches_done() {
        let (c, report, text) = run(Algorithm::Naive, 4, AutoplayPolicy::direct());
        assert!(c.is_done());
        assert_eq!(c.depth(), 0);
        assert_eq!(report.computed, 8);
        assert_eq!(report.breakdowns, 0);
        assert_eq!(report.steps, c.timeline().len() - 2);
        assert!(text.contains("Complete! Matrix multiplication finished."));
        assert_eq!(&c.current_result(), c.timeline().result());
    }

    #[test]
    fn breakdowns_for_two_by_two_products() {
        let (_, report, text) = run(Algorithm::Naive, 4, AutoplayPolicy::expanded(0));
        assert_eq!(report.breakdowns, 8);
        assert_eq!(report.sub_demos, 0);
        assert!(text.contains("C11 term1: breakdown"));
    }

    #[test]
    fn strassen_resolves_sums_then_products() {
        let (c, report, text) = run(Algorithm::Strassen, 4, AutoplayPolicy::direct());
        assert!(c.is_done());
        assert_eq!(c.revealed_products().len(), 7);
        // M1..M7 each need their product; M1, M6 and M7 have two sum factors,
        // the rest one sum and one plain block.
        assert_eq!(report.computed, 7 + 10);
        assert!(text.contains("M1 product: direct"));
    }

    #[test]
    fn nested_demos_are_played_and_closed() {
        let (c, report, text) = run(Algorithm::Naive, 8, AutoplayPolicy::expanded(1));
        assert!(c.is_done());
        assert!(c.sub_demo().is_none());
        assert_eq!(report.sub_demos, 8);
        assert!(text.contains("C11 term1: opening nested demo (depth 1)"));
        assert!(text.contains("  C11 term1: sub-demo"));
        let state = c.state().slot(Slot::C11).unwrap();
        assert_eq!(
            state.term(TermKey::First).unwrap().resolution,
            dacviz_core::Resolution::SubDemo
        );
    }

    #[test]
    fn strassen_nested_demo_for_products() {
        let (c, report, _) = run(Algorithm::Strassen, 8, AutoplayPolicy::expanded(1));
        assert!(c.is_done());
        assert_eq!(report.sub_demos, 7);
        assert_eq!(&c.current_result(), c.timeline().result());
    }

    #[test]
    fn resumes_from_an_open_nested_demo() {
        let a = seeded(8, 3);
        let mut c = PlaybackController::new(&a, &a, Options::default()).unwrap();
        c.show_computation(Slot::C21, TermKey::Second).unwrap();
        let presenter = CliPresenter::new(false, true);
        let mut sink = Vec::new();
        autoplay(&mut c, &AutoplayPolicy::direct(), &presenter, &mut sink).unwrap();
        assert!(c.is_done());
        assert!(sink.is_empty());
    }
}
