//! Scrollable log panel.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::styles::ColorTheme;

/// Scroll state for the log panel.
///
/// `offset` is the index of the last visible line; the panel shows the
/// lines that fit above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogScrollState {
    pub offset: usize,
    /// Follow new lines as they arrive.
    pub auto_scroll: bool,
}

impl LogScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
        }
    }

    /// Follow a new line when auto-scroll is on.
    pub fn on_new_message(&mut self, total_logs: usize) {
        if self.auto_scroll {
            self.offset = total_logs.saturating_sub(1);
        }
    }

    /// Keep the offset valid after `removed` lines were dropped from the top.
    pub fn on_trimmed(&mut self, removed: usize) {
        if !self.auto_scroll {
            self.offset = self.offset.saturating_sub(removed);
        }
    }

    pub fn scroll_up(&mut self) {
        self.page_up(1);
    }

    pub fn scroll_down(&mut self, total_logs: usize) {
        self.page_down(1, total_logs);
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.auto_scroll = false;
        self.offset = self.offset.saturating_sub(page_size);
    }

    /// Moving onto the last line turns auto-scroll back on.
    pub fn page_down(&mut self, page_size: usize, total_logs: usize) {
        let last = total_logs.saturating_sub(1);
        self.offset = (self.offset + page_size).min(last);
        if self.offset >= last {
            self.auto_scroll = true;
        }
    }

    pub fn home(&mut self) {
        self.auto_scroll = false;
        self.offset = 0;
    }

    pub fn end(&mut self, total_logs: usize) {
        self.auto_scroll = true;
        self.offset = total_logs.saturating_sub(1);
    }

    /// Range of lines to draw in a panel `height` lines tall.
    #[must_use]
    pub fn window(&self, total_logs: usize, height: usize) -> std::ops::Range<usize> {
        let end = (self.offset + 1).min(total_logs);
        let end = if self.auto_scroll { total_logs } else { end.max(height.min(total_logs)) };
        end.saturating_sub(height)..end
    }
}

impl Default for LogScrollState {
    fn default() -> Self {
        Self::new()
    }
}

fn line_style(log: &str, theme: &ColorTheme) -> Style {
    if log.starts_with("[ERROR]") {
        theme.error_style()
    } else if log.starts_with("[WARN]") || log.contains("fallback") {
        theme.warning_style()
    } else if log.contains("nested demo") {
        theme.header_style()
    } else {
        Style::default()
    }
}

/// Render the scrollable log panel.
pub fn render_logs(
    frame: &mut Frame,
    area: Rect,
    logs: &[String],
    scroll: &LogScrollState,
    theme: &ColorTheme,
) {
    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let total = logs.len();
    let window = scroll.window(total, visible_height);

    let title = if total > visible_height {
        format!(" Log {}-{} of {total} ", window.start + 1, window.end)
    } else {
        " Log ".to_string()
    };

    let items: Vec<ListItem> = logs[window]
        .iter()
        .map(|log| ListItem::new(Line::raw(log.as_str())).style(line_style(log, theme)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.muted_style()),
    );

    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn scroll_state_initial() {
        let state = LogScrollState::new();
        assert_eq!(state.offset, 0);
        assert!(state.auto_scroll);
    }

    #[test]
    fn new_messages_follow_bottom() {
        let mut state = LogScrollState::new();
        state.on_new_message(10);
        assert_eq!(state.offset, 9);
        assert_eq!(state.window(10, 4), 6..10);
    }

    #[test]
    fn scrolled_back_window_stays_put() {
        let mut state = LogScrollState::new();
        state.on_new_message(20);
        for _ in 0..10 {
            state.scroll_up();
        }
        assert!(!state.auto_scroll);
        assert_eq!(state.window(20, 5), 5..10);
        state.on_new_message(21);
        assert_eq!(state.window(21, 5), 5..10);
    }

    #[test]
    fn window_near_top_fills_panel() {
        let mut state = LogScrollState::new();
        state.home();
        assert_eq!(state.window(20, 5), 0..5);
        assert_eq!(state.window(3, 5), 0..3);
    }

    #[test]
    fn scroll_down_to_bottom_enables_auto_scroll() {
        let mut state = LogScrollState::new();
        state.auto_scroll = false;
        state.offset = 8;
        state.scroll_down(10);
        assert!(state.auto_scroll);
    }

    #[test]
    fn paging() {
        let mut state = LogScrollState::new();
        state.offset = 15;
        state.page_up(10);
        assert_eq!(state.offset, 5);
        assert!(!state.auto_scroll);
        state.page_up(10);
        assert_eq!(state.offset, 0);
        state.page_down(100, 20);
        assert_eq!(state.offset, 19);
        assert!(state.auto_scroll);
    }

    #[test]
    fn trimming_shifts_manual_offset() {
        let mut state = LogScrollState::new();
        state.home();
        state.offset = 4;
        state.on_trimmed(1);
        assert_eq!(state.offset, 3);
    }

    #[test]
    fn home_end() {
        let mut state = LogScrollState::new();
        state.offset = 50;
        state.home();
        assert_eq!(state.offset, 0);
        assert!(!state.auto_scroll);
        state.end(30);
        assert_eq!(state.offset, 29);
        assert!(state.auto_scroll);
    }

    #[test]
    fn log_lines_follow_theme() {
        let theme = ColorTheme::default();
        assert_eq!(line_style("[ERROR] bad size", &theme), theme.error_style());
        assert_eq!(
            line_style("C12 term1: fallback", &theme),
            theme.warning_style()
        );
        assert_eq!(line_style("plain", &theme), Style::default());
    }

    #[test]
    fn render_shows_latest_lines() {
        let logs: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let mut state = LogScrollState::new();
        state.on_new_message(logs.len());
        let mut terminal = Terminal::new(TestBackend::new(40, 7)).unwrap();
        let frame = terminal
            .draw(|frame| {
                let area = frame.area();
                render_logs(frame, area, &logs, &state, &ColorTheme::default());
            })
            .unwrap();
        let row = |y: u16| -> String {
            (0..frame.area.width)
                .map(|x| frame.buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("Log 26-30 of 30"));
        assert!(row(5).contains("line 29"));
    }
}
