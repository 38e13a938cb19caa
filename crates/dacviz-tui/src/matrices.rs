//! Matrix panel: the two inputs, the partial result and the Strassen
//! product panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use dacviz_core::{Algorithm, Event, Matrix, PlaybackController, Quadrant};

use crate::styles::ColorTheme;

/// Rows of `m`, entries of `highlight` drawn in the highlight style.
#[must_use]
pub fn matrix_lines(
    m: &Matrix,
    highlight: Option<Quadrant>,
    theme: &ColorTheme,
) -> Vec<Line<'static>> {
    let n = m.size();
    let half = n / 2;
    let width = m
        .rows()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    let inside = |i: usize, j: usize| {
        highlight.is_some_and(|q| {
            let (r, c) = q.offset(half);
            (r..r + half).contains(&i) && (c..c + half).contains(&j)
        })
    };

    m.rows()
        .enumerate()
        .map(|(i, row)| {
            let spans: Vec<Span<'static>> = row
                .iter()
                .enumerate()
                .map(|(j, v)| {
                    let text = format!(" {v:>width$}");
                    if inside(i, j) {
                        Span::styled(text, theme.highlight_style())
                    } else {
                        Span::styled(text, theme.text_style())
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Quadrant the current event works on, if any.
#[must_use]
pub fn focus(controller: &PlaybackController) -> Option<Quadrant> {
    match controller.current_event() {
        Event::Combine { quadrant, .. } => Some(*quadrant),
        event => event.slot().and_then(|slot| slot.quadrant()),
    }
}

fn panel(
    frame: &mut Frame,
    area: Rect,
    title: String,
    lines: Vec<Line<'static>>,
    theme: &ColorTheme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render `A`, `B`, the partial `C` and, for Strassen, the products
/// revealed so far.
pub fn render_matrices(
    frame: &mut Frame,
    area: Rect,
    controller: &PlaybackController,
    theme: &ColorTheme,
) {
    let timeline = controller.timeline();
    let strassen = controller.algorithm() == Algorithm::Strassen;
    let constraints = if strassen {
        vec![Constraint::Ratio(1, 4); 4]
    } else {
        vec![Constraint::Ratio(1, 3); 3]
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    panel(
        frame,
        columns[0],
        format!(" {} ", timeline.left_name()),
        matrix_lines(timeline.left(), None, theme),
        theme,
    );
    panel(
        frame,
        columns[1],
        format!(" {} ", timeline.right_name()),
        matrix_lines(timeline.right(), None, theme),
        theme,
    );
    panel(
        frame,
        columns[2],
        " C ".to_string(),
        matrix_lines(&controller.current_result(), focus(controller), theme),
        theme,
    );

    if strassen {
        let mut lines = Vec::new();
        for (slot, product) in controller.revealed_products() {
            lines.push(Line::styled(format!("{slot}"), theme.header_style()));
            lines.extend(matrix_lines(product, None, theme));
        }
        if lines.is_empty() {
            lines.push(Line::styled("none yet", theme.muted_style()));
        }
        panel(frame, columns[3], " Products ".to_string(), lines, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacviz_core::{Options, Slot};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(controller: &PlaybackController) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        let theme = ColorTheme::default();
        let frame = terminal
            .draw(|frame| {
                let area = frame.area();
                render_matrices(frame, area, controller, &theme);
            })
            .unwrap();
        frame.buffer.clone()
    }

    #[test]
    fn highlighted_quadrant() {
        let m = Matrix::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 1, 2, 3],
            vec![4, 5, 6, 7],
        ])
        .unwrap();
        let theme = ColorTheme::default();
        let lines = matrix_lines(&m, Some(Quadrant::TopRight), &theme);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].spans[2].style, theme.highlight_style());
        assert_eq!(lines[0].spans[1].style, theme.text_style());
        assert_eq!(lines[2].spans[2].style, theme.text_style());
        assert_eq!(lines[1].spans[3].content, " 8");
    }

    #[test]
    fn focus_follows_slot() {
        let a = Matrix::identity(4);
        let mut c = PlaybackController::new(&a, &a, Options::default()).unwrap();
        assert_eq!(focus(&c), None);
        c.next();
        assert_eq!(focus(&c), Some(Quadrant::TopLeft));
    }

    #[test]
    fn naive_panels() {
        let a = Matrix::identity(4);
        let c = PlaybackController::new(&a, &a, Options::default()).unwrap();
        let screen = text(&draw(&c));
        assert!(screen.contains(" A "));
        assert!(screen.contains(" B "));
        assert!(screen.contains(" C "));
        assert!(!screen.contains("Products"));
    }

    #[test]
    fn strassen_product_panel() {
        let a = Matrix::identity(4);
        let mut c =
            PlaybackController::new(&a, &a, Options::for_algorithm(Algorithm::Strassen)).unwrap();
        assert!(text(&draw(&c)).contains("none yet"));

        for _ in 0..3 {
            if let Some(slot) = c.current_slot() {
                for key in dacviz_core::TermKey::ALL {
                    c.compute_term(slot, key).unwrap();
                }
                c.compute_product(slot).unwrap();
            }
            c.next();
        }
        assert_eq!(c.current_slot(), Some(Slot::M1));
        assert!(text(&draw(&c)).contains("M1"));
    }
}
