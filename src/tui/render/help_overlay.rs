use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::config::View;
use crate::tui::app::App;

use super::helpers::centered_rect;

const NAV: &str = " \u{2191}\u{2193}/jk";

/// (key, description)
type Binding = (&'static str, &'static str);

const PROJECTS_KEYS: &[Binding] = &[
    (NAV, "Move cursor"),
    (" Enter", "Open project"),
    (" n", "New project"),
    (" e", "Edit project"),
    (" s", "Cycle status"),
    (" d", "Delete project"),
    (" l", "Link documents (open project)"),
    (" x", "Unlink document (open project)"),
    (" Esc", "Back to list"),
];

const KANBAN_KEYS: &[Binding] = &[
    (NAV, "Move cursor"),
    (" \u{2190}\u{2192}/hl", "Switch lane"),
    (" Enter", "Task details"),
    (" n", "New task in lane"),
    (" e", "Edit task"),
    (" d", "Delete task"),
    (" m", "Grab card (arrows move, Enter drop)"),
    (" Esc", "Cancel move"),
];

const CALENDAR_KEYS: &[Binding] = &[
    (" \u{2190}\u{2192}/hl", "Previous / next day"),
    (NAV, "Previous / next week"),
    (" [ ]", "Previous / next month"),
    (" t", "Today"),
    (" n", "New task on selected day"),
];

const DOCUMENTS_KEYS: &[Binding] = &[
    (NAV, "Move cursor"),
    (" \u{2190}\u{2192}/hl", "Folders / files pane"),
    (" Enter", "Open folder"),
    (" n", "New folder"),
    (" a", "Upload file"),
    (" r", "Rename file"),
    (" d", "Delete file"),
    (" /", "Search by name"),
    (" t", "Cycle type filter"),
    (" x / R / c", "Cancel / retry / clear uploads"),
    (" Esc", "Clear filters"),
];

const USERS_KEYS: &[Binding] = &[
    (NAV, "Move cursor"),
    (" Enter", "Open collaborator"),
    (" n", "Invite collaborator"),
    (" a", "Assign projects (open user)"),
    (" x", "Remove from project (open user)"),
    (" Esc", "Back to list"),
];

const PROFILE_KEYS: &[Binding] = &[];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    let (title, bindings) = view_bindings(app.view);
    lines.push(Line::from(Span::styled(title, header_style)));
    for &(key, desc) in bindings {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " 1-6", "Switch view", key_style, desc_style);
    add_binding(&mut lines, " Tab/S-Tab", "Next / previous view", key_style, desc_style);
    add_binding(&mut lines, " u", "Undo", key_style, desc_style);
    add_binding(&mut lines, " U/Ctrl+R", "Redo", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn view_bindings(view: View) -> (&'static str, &'static [Binding]) {
    match view {
        View::Projects => (" Projects", PROJECTS_KEYS),
        View::Kanban => (" Tasks", KANBAN_KEYS),
        View::Calendar => (" Calendar", CALENDAR_KEYS),
        View::Documents => (" Documents", DOCUMENTS_KEYS),
        View::Users => (" Users", USERS_KEYS),
        View::Profile => (" Profile", PROFILE_KEYS),
    }
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
