//! TUI header panel.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use dacviz_core::PlaybackController;

/// Render the header: algorithm, size, step of the active demo and the
/// chain of open nested demos.
pub fn render_header(frame: &mut Frame, area: Rect, root: &PlaybackController) {
    let active = root.active();
    let size = active.timeline().size();
    let last = active.timeline().len().saturating_sub(1);

    let mut lines = vec![Line::from(vec![
        Span::styled("dacviz", Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            " | {} | {size}×{size} | step {}/{last}",
            active.algorithm().title(),
            active.cursor()
        )),
    ])];

    let crumbs = root.breadcrumbs();
    if !crumbs.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("depth {}: ", active.depth()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(crumbs.join(" › ")),
        ]));
    }

    let block = Block::default().borders(Borders::BOTTOM);
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
