use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::app::App;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` with background-colored spaces up to `width` cells
pub(super) fn pad_line<'a>(mut spans: Vec<Span<'a>>, width: usize, style: Style) -> Line<'a> {
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
    Line::from(spans)
}

/// Left text plus a right-aligned hint, when both fit
pub(super) fn with_right_hint<'a>(
    mut spans: Vec<Span<'a>>,
    hint: &str,
    width: usize,
    fill: Style,
    hint_style: Style,
) -> Line<'a> {
    let used = spans_width(&spans);
    let hint_width = unicode::display_width(hint);
    if used + hint_width < width {
        spans.push(Span::styled(" ".repeat(width - used - hint_width), fill));
        spans.push(Span::styled(hint.to_string(), hint_style));
    }
    pad_line(spans, width, fill)
}

/// Base style on the app background
pub(super) fn base(app: &App) -> Style {
    Style::default().fg(app.theme.text).bg(app.theme.background)
}

pub(super) fn dim(app: &App) -> Style {
    Style::default().fg(app.theme.dim).bg(app.theme.background)
}

pub(super) fn header(app: &App) -> Style {
    Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD)
}

/// Row style for a list row, highlighted when under the cursor
pub(super) fn row_style(app: &App, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
    } else {
        base(app)
    }
}

/// The `▎` marker drawn left of the selected row
pub(super) fn cursor_marker(app: &App, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(
            "\u{258E}",
            Style::default()
                .fg(app.theme.selection_border)
                .bg(app.theme.selection_bg),
        )
    } else {
        Span::styled(" ", Style::default().bg(app.theme.background))
    }
}

/// First row to draw so that `cursor` stays within `height` visible rows
pub(super) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height - 1)
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A popup of fixed size centered in `area`, shrunk to fit
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
