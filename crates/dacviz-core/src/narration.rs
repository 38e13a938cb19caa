//! Human-readable commentary for each event.

use crate::event::{Computation, Event, Placement, Slot, TermKind};
use crate::gate::ComputationState;
use crate::labels::product_label;
use crate::registry::Algorithm;
use crate::timeline::Timeline;

/// Commentary for the event at `cursor`, taking gate state into account.
#[must_use]
pub fn comment(timeline: &Timeline, cursor: usize, state: &ComputationState) -> String {
    let Some(event) = timeline.event(cursor) else {
        return String::new();
    };
    match event {
        Event::Init => match timeline.algorithm() {
            Algorithm::Naive => "Starting divide-and-conquer matrix multiplication...".into(),
            Algorithm::Strassen => "Starting Strassen matrix multiplication...".into(),
        },
        Event::ShowPartition { size } => {
            let half = size / 2;
            format!("Partitioning {size}×{size} matrices into {half}×{half} blocks")
        }
        Event::StartQuadrant { slot } => match timeline.computation(*slot) {
            Some(c) => format!("Computing {}", equation(c)),
            None => format!("Computing {slot}"),
        },
        Event::ShowComputation(c) => gate_comment(c, state),
        Event::CopyResult {
            slot,
            placement: Placement::Block { .. },
            ..
        } => format!("{slot} computation complete and copied to result matrix"),
        Event::CopyResult {
            slot,
            placement: Placement::Product,
            ..
        } => format!("{slot} computed and set aside for the final combination"),
        Event::Combine { formula, .. } => format!("Combining products: {formula}"),
        Event::Done { .. } => "Complete! Matrix multiplication finished.".into(),
    }
}

/// `C11 = A11 × B11 + A12 × B21` or `M1 = (A11+A22) × (B11+B22)`.
#[must_use]
pub fn equation(c: &Computation) -> String {
    match &c.product {
        Some(_) => format!(
            "{} = {}",
            c.slot,
            product_label(&c.term1.description, &c.term2.description)
        ),
        None => format!(
            "{} = {} + {}",
            c.slot, c.term1.description, c.term2.description
        ),
    }
}

fn gate_comment(c: &Computation, state: &ComputationState) -> String {
    let slot = c.slot;
    let Some(slot_state) = state.slot(slot) else {
        return format!("Interactive computation for {slot}.");
    };
    if state.is_committed(slot) {
        return format!("Computation complete for {slot}. You may proceed to the next step.");
    }
    if slot_state.is_resolved() {
        let waiting = state.next_eligible_slot().map_or_else(String::new, |s| s.to_string());
        return format!("{slot} is computed but is only committed after {waiting}.");
    }
    if slot_state.has_product_stage() && slot_state.factors_ready() {
        return format!(
            "Both factors of {slot} are ready. Compute the product or show its computation."
        );
    }
    if c.term1.kind == TermKind::Product {
        format!(
            "Interactive computation for {slot}. Choose \"Compute\" or \"Show Computation\" for each term."
        )
    } else {
        format!("Interactive computation for {slot}. Perform the additions for each factor.")
    }
}

/// Name of the first slot whose computation is not yet committed.
#[must_use]
pub fn pending_slot(state: &ComputationState) -> Option<Slot> {
    state.order().iter().copied().find(|s| !state.is_committed(*s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TermKey;
    use crate::gate::{Resolution, Stage};
    use crate::matrix::Matrix;

    fn timeline(alg: Algorithm) -> Timeline {
        let a = Matrix::from_rows(vec![
            vec![1, 0, 2, 0],
            vec![0, 1, 0, 2],
            vec![3, 0, 1, 0],
            vec![0, 3, 0, 1],
        ])
        .unwrap();
        Timeline::build(&a, &a, alg).unwrap()
    }

    #[test]
    fn fixed_comments() {
        let t = timeline(Algorithm::Naive);
        let state = ComputationState::for_timeline(&t, false);
        assert_eq!(
            comment(&t, 0, &state),
            "Starting divide-and-conquer matrix multiplication..."
        );
        assert_eq!(
            comment(&t, 1, &state),
            "Partitioning 4×4 matrices into 2×2 blocks"
        );
        assert_eq!(
            comment(&t, 2, &state),
            "Computing C11 = A11 × B11 + A12 × B21"
        );
        assert_eq!(
            comment(&t, 4, &state),
            "C11 computation complete and copied to result matrix"
        );
        assert_eq!(
            comment(&t, t.len() - 1, &state),
            "Complete! Matrix multiplication finished."
        );
    }

    #[test]
    fn gate_comment_follows_resolution() {
        let t = timeline(Algorithm::Naive);
        let mut state = ComputationState::for_timeline(&t, false);
        assert!(comment(&t, 3, &state).starts_with("Interactive computation for C11."));

        let c = t.computation(Slot::C11).unwrap();
        for key in TermKey::ALL {
            state.resolve(Slot::C11, Stage::Term(key), Resolution::Direct, c.term(key).value.clone());
        }
        assert_eq!(
            comment(&t, 3, &state),
            "Computation complete for C11. You may proceed to the next step."
        );
    }

    #[test]
    fn strassen_comments() {
        let t = timeline(Algorithm::Strassen);
        let state = ComputationState::for_timeline(&t, true);
        assert_eq!(
            comment(&t, 2, &state),
            "Computing M1 = (A11+A22) × (B11+B22)"
        );
        assert!(comment(&t, 3, &state).contains("Perform the additions"));
        assert_eq!(pending_slot(&state), Some(Slot::M1));
        assert!(comment(&t, 23, &state).starts_with("Combining products: C11 ="));
    }

    #[test]
    fn out_of_range_cursor_is_silent() {
        let t = timeline(Algorithm::Naive);
        let state = ComputationState::for_timeline(&t, false);
        assert_eq!(comment(&t, 99, &state), "");
    }
}
