//! TUI footer panel.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const HINTS: [(&str, &str); 8] = [
    ("n/p", "next/prev"),
    ("tab", "select"),
    ("c", "compute"),
    ("s", "show"),
    ("esc", "close"),
    ("g", "new"),
    ("l", "logs"),
    ("q", "quit"),
];

/// Render the footer panel with keyboard shortcuts.
pub fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(HINTS.len() * 2);
    for (i, (key, action)) in HINTS.iter().enumerate() {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        let sep = if i + 1 < HINTS.len() { " | " } else { "" };
        spans.push(Span::raw(format!(": {action}{sep}")));
    }

    let block = Block::default().borders(Borders::TOP);
    let paragraph = Paragraph::new(vec![Line::from(spans)]).block(block);
    frame.render_widget(paragraph, area);
}
