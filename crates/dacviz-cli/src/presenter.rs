//! Step-by-step text presenter.

use std::io::{self, Write};

use dacviz_core::{Event, GateOutcome, PlaybackController, Resolution, Slot, Stage, Timeline};

use crate::compare::ComparisonRow;
use crate::output::{format_counts, format_duration, format_number};
use crate::render::{event_lines, matrix_lines};
use crate::ui::print_warning;

/// Presents playback to a text stream.
pub trait DemoPresenter {
    /// Commentary, and matrices where useful, for the current event.
    fn present_step(&self, controller: &PlaybackController, out: &mut dyn Write) -> io::Result<()>;

    /// What a gate action on `slot` did.
    fn present_outcome(
        &self,
        depth: usize,
        slot: Slot,
        stage: Stage,
        outcome: &GateOutcome,
        out: &mut dyn Write,
    ) -> io::Result<()>;

    /// Final product and operation counts.
    fn present_summary(&self, timeline: &Timeline, out: &mut dyn Write) -> io::Result<()>;

    fn present_comparison(&self, rows: &[ComparisonRow], out: &mut dyn Write) -> io::Result<()>;

    fn present_error(&self, error: &str);
}

/// CLI presenter.
pub struct CliPresenter {
    verbose: bool,
    quiet: bool,
}

impl CliPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

impl DemoPresenter for CliPresenter {
    fn present_step(&self, controller: &PlaybackController, out: &mut dyn Write) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let pad = indent(controller.depth());
        let last = controller.timeline().len().saturating_sub(1);
        writeln!(
            out,
            "{pad}[{}/{last}] {}",
            controller.cursor(),
            controller.comment()
        )?;

        let wanted = self.verbose
            || matches!(
                controller.current_event(),
                Event::ShowPartition { .. } | Event::Done { .. }
            );
        if wanted {
            for line in event_lines(controller) {
                writeln!(out, "{pad}    {line}")?;
            }
        }
        Ok(())
    }

    fn present_outcome(
        &self,
        depth: usize,
        slot: Slot,
        stage: Stage,
        outcome: &GateOutcome,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let pad = indent(depth);
        let stage = stage.name();
        match outcome {
            GateOutcome::Resolved(resolution) => {
                if *resolution == Resolution::Fallback {
                    print_warning(&format!(
                        "{slot} {stage}: nested demo closed before it finished, using the direct product"
                    ));
                }
                writeln!(out, "{pad}  {slot} {stage}: {}", resolution.name())
            }
            GateOutcome::Breakdown(steps) => {
                writeln!(out, "{pad}  {slot} {stage}: breakdown")?;
                if self.verbose {
                    for step in steps {
                        let (row, col) = step.position;
                        writeln!(out, "{pad}    [{row},{col}] {}", step.formula())?;
                    }
                }
                Ok(())
            }
            GateOutcome::SubDemoOpened { depth } => {
                writeln!(out, "{pad}  {slot} {stage}: opening nested demo (depth {depth})")
            }
            GateOutcome::AlreadyResolved => Ok(()),
            GateOutcome::Ignored(reason) => {
                writeln!(out, "{pad}  {slot} {stage}: ignored, {}", reason.describe())
            }
        }
    }

    fn present_summary(&self, timeline: &Timeline, out: &mut dyn Write) -> io::Result<()> {
        if self.quiet {
            for line in matrix_lines(timeline.result(), false) {
                writeln!(out, "{line}")?;
            }
            return Ok(());
        }

        writeln!(out, "\nAlgorithm: {}", timeline.algorithm().title())?;
        writeln!(out, "Size: {0}×{0}", timeline.size())?;
        writeln!(out, "Operations: {}", format_counts(&timeline.counts()))?;
        writeln!(out, "C = A × B =")?;
        for line in matrix_lines(timeline.result(), false) {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    }

    fn present_comparison(&self, rows: &[ComparisonRow], out: &mut dyn Write) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        writeln!(out, "\nComparison Results:")?;
        writeln!(out, "{:-<72}", "")?;
        writeln!(
            out,
            "  {:<16} {:>16} {:>16} {:>10}",
            "Algorithm", "Multiplications", "Additions", "Time"
        )?;
        for row in rows {
            let status = if row.matches { "OK" } else { "MISMATCH" };
            writeln!(
                out,
                "  {:<16} {:>16} {:>16} {:>10} [{status}]",
                row.name,
                format_number(row.counts.multiplications),
                format_number(row.counts.additions),
                format_duration(row.duration),
            )?;
        }
        Ok(())
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dacviz_core::{Matrix, OpCounts, Options, TermKey};

    fn controller() -> PlaybackController {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
        PlaybackController::new(&a, &b, Options::default()).unwrap()
    }

    fn text(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn presenter_quiet_mode() {
        let presenter = CliPresenter::new(false, true);
        assert!(presenter.quiet);
        let c = controller();
        assert_eq!(text(|out| presenter.present_step(&c, out)), "");
    }

    #[test]
    fn presenter_verbose_mode() {
        let presenter = CliPresenter::new(true, false);
        assert!(presenter.verbose);
        assert!(!presenter.quiet);
    }

    #[test]
    fn step_shows_partition() {
        let presenter = CliPresenter::new(false, false);
        let c = controller();
        let s = text(|out| presenter.present_step(&c, out));
        assert!(s.starts_with("[1/14] Partitioning 2×2 matrices into 1×1 blocks"));
        assert!(s.contains("[1 | 2]"));
    }

    #[test]
    fn nested_steps_are_indented() {
        let presenter = CliPresenter::new(false, false);
        let a = Matrix::identity(8);
        let mut c = PlaybackController::new(&a, &a, Options::default()).unwrap();
        c.show_computation(Slot::C11, TermKey::First).unwrap();
        let s = text(|out| presenter.present_step(c.active(), out));
        assert!(s.starts_with("  [1/"));
    }

    #[test]
    fn outcome_lines() {
        let presenter = CliPresenter::new(true, false);
        let s = text(|out| {
            presenter.present_outcome(
                0,
                Slot::C11,
                Stage::Term(TermKey::First),
                &GateOutcome::Resolved(Resolution::Direct),
                out,
            )
        });
        assert_eq!(s, "  C11 term1: direct\n");

        let s = text(|out| {
            presenter.present_outcome(
                1,
                Slot::M1,
                Stage::Product,
                &GateOutcome::SubDemoOpened { depth: 2 },
                out,
            )
        });
        assert_eq!(s, "    M1 product: opening nested demo (depth 2)\n");

        let s = text(|out| {
            presenter.present_outcome(
                0,
                Slot::C12,
                Stage::Term(TermKey::Second),
                &GateOutcome::AlreadyResolved,
                out,
            )
        });
        assert!(s.is_empty());
    }

    #[test]
    fn fallback_outcome_is_reported() {
        let presenter = CliPresenter::new(false, false);
        let s = text(|out| {
            presenter.present_outcome(
                0,
                Slot::C22,
                Stage::Term(TermKey::First),
                &GateOutcome::Resolved(Resolution::Fallback),
                out,
            )
        });
        assert_eq!(s, "  C22 term1: fallback\n");

        let quiet = CliPresenter::new(false, true);
        let s = text(|out| {
            quiet.present_outcome(
                0,
                Slot::C22,
                Stage::Term(TermKey::First),
                &GateOutcome::Resolved(Resolution::Fallback),
                out,
            )
        });
        assert!(s.is_empty());
    }

    #[test]
    fn breakdown_lists_entries_when_verbose() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
        let steps = dacviz_core::ops::multiply_base_2x2_with_steps(&a, &b)
            .unwrap()
            .steps;
        let outcome = GateOutcome::Breakdown(steps);

        let verbose = CliPresenter::new(true, false);
        let stage = Stage::Term(TermKey::First);
        let s = text(|out| verbose.present_outcome(0, Slot::C11, stage, &outcome, out));
        assert!(s.contains("[0,0] (1×5) + (2×7) = 19"));

        let normal = CliPresenter::new(false, false);
        let s = text(|out| normal.present_outcome(0, Slot::C11, stage, &outcome, out));
        assert_eq!(s.lines().count(), 1);
    }

    #[test]
    fn summary_quiet_prints_only_matrix() {
        let c = controller();
        let quiet = CliPresenter::new(false, true);
        let s = text(|out| quiet.present_summary(c.timeline(), out));
        assert_eq!(s, "[19 22]\n[43 50]\n");

        let normal = CliPresenter::new(false, false);
        let s = text(|out| normal.present_summary(c.timeline(), out));
        assert!(s.contains("Operations: 8 multiplications, 4 additions"));
    }

    #[test]
    fn comparison_table() {
        let presenter = CliPresenter::new(false, false);
        let rows = vec![
            ComparisonRow {
                name: "Strassen".into(),
                counts: OpCounts::new(100, 56),
                duration: Duration::from_micros(12),
                matches: true,
            },
            ComparisonRow {
                name: "Broken".into(),
                counts: OpCounts::default(),
                duration: Duration::from_millis(1),
                matches: false,
            },
        ];
        let s = text(|out| presenter.present_comparison(&rows, out));
        assert!(s.contains("Strassen"));
        assert!(s.contains("[OK]"));
        assert!(s.contains("[MISMATCH]"));

        let quiet = CliPresenter::new(false, true);
        assert!(text(|out| quiet.present_comparison(&rows, out)).is_empty());
    }

    #[test]
    fn presenter_present_error() {
        let presenter = CliPresenter::new(false, false);
        presenter.present_error("test error message");
        presenter.present_error("");
    }
}
