use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::project::Project;
use crate::ops::{doc_ops, project_ops, task_ops};
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{base, cursor_marker, dim, header, pad_line, row_style, scroll_offset};

const NAME_W: usize = 36;
const CLIENT_W: usize = 20;
const STATUS_W: usize = 13;
const DATES_W: usize = 22;

/// Render the projects page: the list, or the open project's detail
pub fn render_projects_view(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.open_project() {
        Some(project) => detail_lines(app, project, area),
        None => list_lines(app, area),
    };
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
}

fn date_range(project: &Project) -> String {
    format!(
        "{} \u{2192} {}",
        project.start_date.format("%d %b"),
        project.end_date.format("%d %b %Y")
    )
}

fn list_lines<'a>(app: &App, area: Rect) -> Vec<Line<'a>> {
    let width = area.width as usize;
    let bg = app.theme.background;
    let projects = app.store.projects();

    let mut summary = vec![Span::styled(format!(" Projects ({})", projects.len()), header(app))];
    for (status, count) in project_ops::status_counts(projects) {
        summary.push(Span::styled(
            "   \u{25CF} ",
            Style::default().fg(app.theme.project_status_color(status)).bg(bg),
        ));
        summary.push(Span::styled(format!("{} {}", status.label(), count), dim(app)));
    }
    let mut lines = vec![Line::from(summary), Line::from("")];

    if projects.is_empty() {
        lines.push(Line::from(Span::styled(" No projects yet. Press n to create one.", dim(app))));
        return lines;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {}{}{}{}Tasks",
            unicode::fit_to_width("Name", NAME_W),
            unicode::fit_to_width("Client", CLIENT_W),
            unicode::fit_to_width("Status", STATUS_W),
            unicode::fit_to_width("Dates", DATES_W),
        ),
        dim(app),
    )));

    let visible = (area.height as usize).saturating_sub(lines.len()).max(1);
    let offset = scroll_offset(app.projects.cursor, visible);
    for (idx, project) in projects.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == app.projects.cursor;
        let style = row_style(app, selected);
        let stats = project_ops::project_summary(&project.id, app.store.tasks(), app.store.files());
        let spans = vec![
            cursor_marker(app, selected),
            Span::styled(
                format!(" {}", unicode::fit_to_width(&project.name, NAME_W)),
                style,
            ),
            Span::styled(unicode::fit_to_width(&project.client, CLIENT_W), style),
            Span::styled(
                unicode::fit_to_width(project.status.label(), STATUS_W),
                style.fg(app.theme.project_status_color(project.status)),
            ),
            Span::styled(unicode::fit_to_width(&date_range(project), DATES_W), style),
            Span::styled(format!("{}/{}", stats.done, stats.tasks), style),
        ];
        lines.push(pad_line(spans, width, style));
    }
    lines
}

fn detail_lines<'a>(app: &App, project: &Project, area: Rect) -> Vec<Line<'a>> {
    let width = area.width as usize;
    let bg = app.theme.background;
    let stats = project_ops::project_summary(&project.id, app.store.tasks(), app.store.files());

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" \u{2190} ", dim(app)),
            Span::styled(project.name.clone(), header(app)),
            Span::styled("  ", base(app)),
            Span::styled(
                project.status.label(),
                Style::default().fg(app.theme.project_status_color(project.status)).bg(bg),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Client  ", dim(app)),
            Span::styled(project.client.clone(), base(app)),
            Span::styled("   Dates  ", dim(app)),
            Span::styled(date_range(project), base(app)),
        ]),
    ];
    if !project.description.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                " {}",
                unicode::truncate_to_width(&project.description, width.saturating_sub(2))
            ),
            base(app),
        )));
    }
    lines.push(Line::from(""));

    // Tasks
    let tasks = task_ops::tasks_for_project(app.store.tasks(), &project.id);
    lines.push(Line::from(Span::styled(
        format!(" Tasks ({}/{} done)", stats.done, stats.tasks),
        header(app),
    )));
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled("   No tasks", dim(app))));
    }
    for task in tasks {
        lines.push(Line::from(vec![
            Span::styled(
                "   \u{25CF} ",
                Style::default().fg(app.theme.priority_color(task.priority)).bg(bg),
            ),
            Span::styled(
                unicode::fit_to_width(&task.title, 40),
                base(app),
            ),
            Span::styled(
                unicode::fit_to_width(task.status.label(), 14),
                Style::default().fg(app.theme.status_color(task.status)).bg(bg),
            ),
            Span::styled(task.date.format("%d %b %H:%M").to_string(), dim(app)),
        ]));
    }
    lines.push(Line::from(""));

    // Linked documents
    let files = app.open_project_files();
    lines.push(Line::from(Span::styled(
        format!(" Documents ({})", files.len()),
        header(app),
    )));
    if files.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No linked documents. Press l to link some.",
            dim(app),
        )));
        return lines;
    }
    let visible = (area.height as usize).saturating_sub(lines.len()).max(1);
    let offset = scroll_offset(app.projects.detail_cursor, visible);
    for (idx, file) in files.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == app.projects.detail_cursor;
        let style = row_style(app, selected);
        let spans = vec![
            cursor_marker(app, selected),
            Span::styled(format!("  {}", unicode::fit_to_width(&file.name, 44)), style),
            Span::styled(
                unicode::fit_to_width(&doc_ops::file_type_label(&file.mime_type), 10),
                style,
            ),
            Span::styled(doc_ops::format_file_size(file.size), style.fg(app.theme.dim)),
        ];
        lines.push(pad_line(spans, width, style));
    }
    lines
}
