use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::config::View;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the tab bar: one tab per view, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25C6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", bg_style),
    ];
    let mut sep_cols: Vec<usize> = Vec::new();

    for (i, view) in View::ALL.iter().enumerate() {
        let is_current = app.view == *view;
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, view.label()),
            tab_style(app, is_current),
        ));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Right side: uploads in flight
    let in_flight = app.uploads_in_flight();
    if in_flight > 0 {
        let indicator = format!("\u{2191} {} uploading ", in_flight);
        let used = spans_width(&spans);
        let width = area.width as usize;
        let ind_width = indicator.chars().count();
        if used + ind_width < width {
            spans.push(Span::styled(" ".repeat(width - used - ind_width), bg_style));
            spans.push(Span::styled(
                indicator,
                Style::default().fg(app.theme.blue).bg(bg),
            ));
        }
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_list_every_view_with_number() {
        let app = seeded_app();
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = out.lines().next().unwrap();
        for (i, view) in View::ALL.iter().enumerate() {
            assert!(first.contains(&format!("{} {}", i + 1, view.label())));
        }
        assert!(out.lines().nth(1).unwrap().contains('\u{2534}'));
    }

    #[test]
    fn upload_indicator_appears_while_uploading() {
        let mut app = seeded_app();
        app.uploads.enqueue("acta.pdf", 10, None, None);
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(out.contains("1 uploading"));
    }
}
