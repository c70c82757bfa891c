use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::{project_ops, task_ops};
use crate::tui::app::App;
use crate::tui::form::{FieldInput, FormField};
use crate::util::unicode;

use super::helpers::{base, centered_fixed, cursor_marker, dim, header, pad_line, row_style, scroll_offset};

/// Width of the label column in forms and detail popups
const LABEL_WIDTH: usize = 12;

/// Bordered popup frame with a title; returns the inner area
fn popup_block(frame: &mut Frame, app: &App, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .title(Span::styled(format!(" {} ", title), header(app)))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn label_span(app: &App, label: &str) -> Span<'static> {
    Span::styled(format!(" {:<width$}", label, width = LABEL_WIDTH), dim(app))
}

/// Read-only card for the task under the kanban cursor
pub fn render_task_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(task) = app
        .task_detail
        .as_deref()
        .and_then(|id| task_ops::find_task(app.store.tasks(), id))
    else {
        return;
    };
    let popup = centered_fixed(60, 9, area);
    let inner = popup_block(frame, app, popup, "Task");
    let width = inner.width as usize;
    let bg = app.theme.background;

    let project = match task.project_id.as_deref() {
        Some(id) => project_ops::find_project(app.store.projects(), id)
            .map_or_else(|| format!("{} (missing)", id), |p| p.name.clone()),
        None => "(none)".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(&task.title, width.saturating_sub(1))),
            header(app),
        )),
        Line::from(""),
        Line::from(vec![
            label_span(app, "Status"),
            Span::styled(
                task.status.label(),
                Style::default().fg(app.theme.status_color(task.status)).bg(bg),
            ),
        ]),
        Line::from(vec![
            label_span(app, "Priority"),
            Span::styled(
                task.priority.label(),
                Style::default().fg(app.theme.priority_color(task.priority)).bg(bg),
            ),
        ]),
        Line::from(vec![
            label_span(app, "Date"),
            Span::styled(task.date.format("%a %d %b %Y %H:%M").to_string(), base(app)),
        ]),
        Line::from(vec![
            label_span(app, "Project"),
            Span::styled(
                unicode::truncate_to_width(&project, width.saturating_sub(LABEL_WIDTH + 1)),
                Style::default().fg(app.theme.purple).bg(bg),
            ),
        ]),
        Line::from(Span::styled(" Esc close  e edit", dim(app))),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// Modal form: one row per field, the focused one marked and showing a cursor
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let height = form.fields.len() as u16 + 4;
    let popup = centered_fixed(64, height, area);
    let inner = popup_block(frame, app, popup, &form.title);
    let width = inner.width as usize;
    let value_width = width.saturating_sub(LABEL_WIDTH + 3);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let mut spans = vec![cursor_marker(app, focused), label_span(app, field.label)];
        spans.extend(field_spans(app, field, focused, value_width));
        let fill = if focused { row_style(app, true) } else { base(app) };
        lines.push(pad_line(spans, width, fill));
    }
    lines.push(Line::from(""));
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        ))),
        None => lines.push(Line::from(Span::styled(" Enter save  Esc cancel", dim(app)))),
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

fn field_spans(app: &App, field: &FormField, focused: bool, width: usize) -> Vec<Span<'static>> {
    let style = row_style(app, focused);
    match &field.input {
        FieldInput::Text { value, cursor } if focused => {
            // Keep the tail visible when the value outgrows the box
            let (before, after) = value.split_at((*cursor).min(value.len()));
            let before_width = unicode::display_width(before);
            let before = if before_width >= width {
                let skip = before_width + 1 - width;
                let mut start = 0;
                while unicode::display_width(&before[..start]) < skip {
                    match unicode::next_grapheme_boundary(before, start) {
                        Some(next) => start = next,
                        None => break,
                    }
                }
                &before[start..]
            } else {
                before
            };
            let room = width.saturating_sub(unicode::display_width(before) + 1);
            vec![
                Span::styled(before.to_string(), style),
                Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(app.theme.selection_bg),
                ),
                Span::styled(unicode::truncate_to_width(after, room), style),
            ]
        }
        FieldInput::Text { value, .. } => {
            vec![Span::styled(unicode::truncate_to_width(value, width), style)]
        }
        FieldInput::Choice { .. } => {
            let text = unicode::truncate_to_width(field.display(), width.saturating_sub(4));
            if focused {
                vec![Span::styled(
                    format!("\u{25C2} {} \u{25B8}", text),
                    style.fg(app.theme.highlight).add_modifier(Modifier::BOLD),
                )]
            } else {
                vec![Span::styled(text, style)]
            }
        }
    }
}

/// y/n question for a destructive action
pub fn render_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    let width = (unicode::display_width(&confirm.message) + 6).max(30).min(area.width as usize);
    let popup = centered_fixed(width as u16, 6, area);
    let inner = popup_block(frame, app, popup, "Confirm");
    let text_width = inner.width as usize;

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                " {}",
                unicode::truncate_to_width(&confirm.message, text_width.saturating_sub(1))
            ),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " y",
                Style::default()
                    .fg(app.theme.red)
                    .bg(app.theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" confirm  ", dim(app)),
            Span::styled(
                "n",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(app.theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" cancel", dim(app)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

/// Checkbox list for linking documents or assigning projects
pub fn render_picker(frame: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };
    let rows = picker.items.len().max(1) as u16;
    let popup = centered_fixed(64, (rows + 4).min(area.height.saturating_sub(2)), area);
    let inner = popup_block(frame, app, popup, &picker.title);
    let width = inner.width as usize;
    let visible = (inner.height as usize).saturating_sub(2).max(1);

    let mut lines: Vec<Line> = Vec::new();
    if picker.items.is_empty() {
        lines.push(Line::from(Span::styled(" Nothing to choose", dim(app))));
    }
    let offset = scroll_offset(picker.cursor, visible);
    for (idx, (id, label)) in picker.items.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == picker.cursor;
        let checked = picker.selected.contains(id);
        let style = row_style(app, selected);
        let check_style = if checked {
            style.fg(app.theme.green)
        } else {
            style
        };
        let spans = vec![
            cursor_marker(app, selected),
            Span::styled(if checked { "[x] " } else { "[ ] " }, check_style),
            Span::styled(unicode::truncate_to_width(label, width.saturating_sub(5)), style),
        ];
        lines.push(pad_line(spans, width, style));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {} selected", picker.selected.len()),
        dim(app),
    )));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::View;
    use crate::tui::app::{ConfirmAction, ConfirmState, Mode, Picker, PickerKind};
    use crate::tui::form::{Form, FormKind};
    use crate::ops::task_ops::TaskInput;
    use crate::model::task::TaskStatus;
    use crate::tui::render::test_helpers::*;
    use std::collections::HashSet;

    fn draw<F: FnOnce(&mut Frame, Rect)>(f: F) -> String {
        render_to_string(TERM_W, TERM_H, f)
    }

    #[test]
    fn task_detail_shows_fields() {
        let mut app = app_on(View::Kanban);
        app.task_detail = Some("101".into());
        let out = draw(|frame, area| render_task_detail(frame, &app, area));
        assert!(out.contains("REVISIÓN GENERAL"));
        assert!(out.contains("Urgent"));
        assert!(out.contains("Wed 11 Feb 2026 09:32"));
        assert!(out.contains("PARQUE RINCONADAS DE LOS ANGELES"));
    }

    #[test]
    fn task_detail_without_task_draws_nothing() {
        let mut app = app_on(View::Kanban);
        app.task_detail = Some("nope".into());
        let out = draw(|frame, area| render_task_detail(frame, &app, area));
        assert_eq!(out, "");
    }

    #[test]
    fn form_shows_fields_and_error() {
        let mut app = app_on(View::Kanban);
        let mut form = Form::task(
            FormKind::NewTask,
            &TaskInput::new(TaskStatus::Todo),
            app.store.projects(),
        );
        form.error = Some("title is required".into());
        app.form = Some(form);
        app.mode = Mode::Form;
        let out = draw(|frame, area| render_form(frame, &app, area));
        assert!(out.contains("New task"));
        assert!(out.contains("Title"));
        assert!(out.contains("Priority"));
        assert!(out.contains("title is required"));
        // Focused empty title shows the cursor block
        assert!(out.contains('\u{258C}'));
    }

    #[test]
    fn confirm_shows_message_and_keys() {
        let mut app = seeded_app();
        app.confirm = Some(ConfirmState {
            message: "Delete file \"Acuerdo_Legal.pdf\"?".into(),
            action: ConfirmAction::DeleteFile {
                file_id: "file8".into(),
            },
        });
        let out = draw(|frame, area| render_confirm(frame, &app, area));
        assert!(out.contains("Delete file \"Acuerdo_Legal.pdf\"?"));
        assert!(out.contains("y confirm  n cancel"));
    }

    #[test]
    fn picker_marks_selected_items() {
        let mut app = seeded_app();
        let mut selected = HashSet::new();
        selected.insert("file2".to_string());
        app.picker = Some(Picker {
            kind: PickerKind::LinkFiles {
                project_id: "1".into(),
            },
            title: "Link documents".into(),
            items: vec![
                ("file2".into(), "Contrato_RaulBerber.pdf".into()),
                ("file4".into(), "Plano_Estructural_UD2Carlos.dwg".into()),
            ],
            selected,
            cursor: 1,
        });
        let out = draw(|frame, area| render_picker(frame, &app, area));
        assert!(out.contains("[x] Contrato_RaulBerber.pdf"));
        assert!(out.contains("[ ] Plano_Estructural_UD2Carlos.dwg"));
        assert!(out.contains("1 selected"));
    }
}
