//! Interactive computation panel: narration, the gate of the current slot
//! and the last breakdown.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use dacviz_core::narration::equation;
use dacviz_core::{CellStep, Computation, Event, Matrix, PlaybackController, Stage, TermKey};

use crate::styles::ColorTheme;

/// Stages of a computation in selection order.
#[must_use]
pub fn stages(c: &Computation) -> Vec<Stage> {
    let mut stages = vec![Stage::Term(TermKey::First), Stage::Term(TermKey::Second)];
    if c.product.is_some() {
        stages.push(Stage::Product);
    }
    stages
}

/// `[19 22; 43 50]`.
#[must_use]
pub fn compact(m: &Matrix) -> String {
    let rows: Vec<String> = m
        .rows()
        .map(|row| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    format!("[{}]", rows.join("; "))
}

/// What the panel shows besides the controller itself.
pub struct PanelState<'a> {
    pub selection: Stage,
    pub breakdown: Option<&'a [CellStep]>,
    pub status: Option<&'a str>,
}

fn stage_line(
    controller: &PlaybackController,
    c: &Computation,
    stage: Stage,
    selected: bool,
    theme: &ColorTheme,
) -> Line<'static> {
    let term = match stage {
        Stage::Term(key) => Some(c.term(key)),
        Stage::Product => c.product.as_ref(),
    };
    let description = term.map_or_else(String::new, |t| t.description.clone());
    let marker = if selected { "▶ " } else { "  " };
    let label = format!("{marker}{:<8} {description}", stage.name());
    let label = if selected {
        Span::styled(label, theme.selected_style())
    } else {
        Span::styled(label, theme.text_style())
    };

    let resolved = controller
        .state()
        .slot(c.slot)
        .and_then(|s| s.stage(stage));
    let enabled = match stage {
        Stage::Term(key) => controller.term_enabled(c.slot, key),
        Stage::Product => controller.product_enabled(c.slot),
    };
    let status = match resolved {
        Some(r) => Span::styled(
            format!("  = {}  ({})", compact(&r.result), r.resolution.name()),
            theme.success_style(),
        ),
        None if enabled => Span::styled("  [c]ompute / [s]how", theme.muted_style()),
        None => Span::styled("  waiting for factors", theme.muted_style()),
    };
    Line::from(vec![label, status])
}

/// Lines of the panel for the controller's current event.
#[must_use]
pub fn computation_lines(
    controller: &PlaybackController,
    view: &PanelState<'_>,
    theme: &ColorTheme,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            controller.comment(),
            theme.text_style().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
    ];

    if let Event::ShowComputation(c) = controller.current_event() {
        lines.push(Line::styled(equation(c), theme.header_style()));
        for stage in stages(c) {
            lines.push(stage_line(controller, c, stage, stage == view.selection, theme));
        }
        if controller.state().is_resolved(c.slot) {
            lines.push(Line::styled(
                format!("{} = {}", c.slot, compact(&c.result)),
                theme.success_style(),
            ));
        }
    }

    if let Some(steps) = view.breakdown {
        lines.push(Line::raw(""));
        for step in steps {
            let (i, j) = step.position;
            lines.push(Line::raw(format!("({i},{j}): {}", step.formula())));
        }
    }

    if let Some(status) = view.status {
        lines.push(Line::raw(""));
        lines.push(Line::styled(status.to_string(), theme.warning_style()));
    }
    lines
}

/// Render the computation panel.
pub fn render_computation(
    frame: &mut Frame,
    area: Rect,
    controller: &PlaybackController,
    view: &PanelState<'_>,
    theme: &ColorTheme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Computation ")
        .border_style(theme.border_style());
    let paragraph = Paragraph::new(computation_lines(controller, view, theme))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
