pub mod calendar_view;
pub mod documents_view;
pub mod help_overlay;
mod helpers;
pub mod kanban_view;
pub mod popups;
pub mod profile_view;
pub mod projects_view;
pub mod status_row;
pub mod tab_bar;
pub mod users_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use crate::model::config::View;

use super::app::{App, Mode};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Projects => projects_view::render_projects_view(frame, app, chunks[1]),
        View::Kanban => kanban_view::render_kanban_view(frame, app, chunks[1]),
        View::Calendar => calendar_view::render_calendar_view(frame, app, chunks[1]),
        View::Documents => documents_view::render_documents_view(frame, app, chunks[1]),
        View::Users => users_view::render_users_view(frame, app, chunks[1]),
        View::Profile => profile_view::render_profile_view(frame, app, chunks[1]),
    }

    if app.task_detail.is_some() {
        popups::render_task_detail(frame, app, chunks[1]);
    }
    match app.mode {
        Mode::Form => popups::render_form(frame, app, area),
        Mode::Confirm => popups::render_confirm(frame, app, area),
        Mode::Picker => popups::render_picker(frame, app, area),
        _ => {}
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
