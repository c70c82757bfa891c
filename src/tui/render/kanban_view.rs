use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::task::{Task, TaskStatus};
use crate::ops::project_ops;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::helpers::{cursor_marker, dim, pad_line, row_style, scroll_offset};

/// Rows a card occupies, including the gap below it
const CARD_HEIGHT: usize = 4;

/// Render the kanban board: one column per lane
pub fn render_kanban_view(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (status, column) in TaskStatus::ALL.iter().zip(columns.iter()) {
        render_lane(frame, app, *status, *column);
    }
}

fn render_lane(frame: &mut Frame, app: &App, status: TaskStatus, area: Rect) {
    let bg = app.theme.background;
    let tasks = app.lane(status);
    let is_current = app.kanban.lane == status;

    let title_style = Style::default()
        .fg(app.theme.status_color(status))
        .bg(bg)
        .add_modifier(if is_current { Modifier::BOLD } else { Modifier::empty() });
    let border_color = if is_current { app.theme.selection_border } else { app.theme.dim };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Span::styled(
            format!(" {} ({}) ", status.label(), tasks.len()),
            title_style,
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(" (empty)", dim(app))));
    } else {
        let visible = (inner.height as usize / CARD_HEIGHT).max(1);
        let cursor = if is_current { app.kanban.row } else { 0 };
        let offset = scroll_offset(cursor, visible);
        let names = project_ops::project_name_map(app.store.projects());
        for (row, task) in tasks.iter().enumerate().skip(offset).take(visible) {
            let selected = is_current && row == app.kanban.row;
            let project = task
                .project_id
                .as_deref()
                .and_then(|id| names.get(id).copied());
            push_card(&mut lines, app, task, project, selected, width);
        }
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn push_card<'a>(
    lines: &mut Vec<Line<'a>>,
    app: &App,
    task: &Task,
    project: Option<&str>,
    selected: bool,
    width: usize,
) {
    let bg = app.theme.background;
    let style = row_style(app, selected);
    let grabbed = app.mode == Mode::Move
        && app
            .move_state
            .as_ref()
            .is_some_and(|m| m.task_id == task.id);
    let fill = if selected { style } else { Style::default().bg(bg) };

    let title_style = if grabbed {
        style.fg(app.theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::BOLD)
    };
    let prefix = if grabbed { "\u{25B6} " } else { "" };
    let title = unicode::truncate_to_width(
        &format!("{}{}", prefix, task.title),
        width.saturating_sub(2),
    );
    lines.push(pad_line(
        vec![cursor_marker(app, selected), Span::styled(format!(" {}", title), title_style)],
        width,
        fill,
    ));

    let badge_bg = if selected { app.theme.selection_bg } else { bg };
    lines.push(pad_line(
        vec![
            cursor_marker(app, selected),
            Span::styled(
                format!(" \u{25CF} {}", task.priority.label()),
                Style::default()
                    .fg(app.theme.priority_color(task.priority))
                    .bg(badge_bg),
            ),
            Span::styled(
                format!("  {}", task.date.format("%d %b %H:%M")),
                Style::default().fg(app.theme.dim).bg(badge_bg),
            ),
        ],
        width,
        fill,
    ));

    let project_text = match project {
        Some(name) => unicode::truncate_to_width(&format!(" @{}", name), width.saturating_sub(1)),
        None => String::new(),
    };
    lines.push(pad_line(
        vec![
            cursor_marker(app, selected),
            Span::styled(project_text, Style::default().fg(app.theme.purple).bg(badge_bg)),
        ],
        width,
        fill,
    ));
    lines.push(Line::from(""));
}
