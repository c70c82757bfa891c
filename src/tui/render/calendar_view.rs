use chrono::{Datelike, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::{calendar, project_ops};
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{base, dim, header, pad_line};

/// Render the month grid with per-day task counts, then the selected day's tasks
pub fn render_calendar_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let cell = (width / 7).max(4);
    let state = &app.calendar;

    let grid = calendar::month_grid(state.year, state.month);
    let days = calendar::tasks_by_day(app.store.tasks(), &grid);
    let today = Local::now().date_naive();

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(" \u{25C2} ", dim(app)),
            Span::styled(calendar::month_title(state.year, state.month), header(app)),
            Span::styled(" \u{25B8}", dim(app)),
        ]),
        Line::from(""),
    ];

    let weekday_spans: Vec<Span> = calendar::WEEKDAY_LABELS
        .iter()
        .map(|d| Span::styled(unicode::fit_to_width(&format!(" {}", d), cell), dim(app)))
        .collect();
    lines.push(Line::from(weekday_spans));

    for week in grid.chunks(7) {
        let mut spans = Vec::new();
        for day in week {
            let count = days.get(day).map_or(0, Vec::len);
            let label = if count > 0 {
                format!(" {:>2} \u{25CF}{}", day.day(), count)
            } else {
                format!(" {:>2}", day.day())
            };
            let mut style = if day.month() == state.month {
                base(app)
            } else {
                dim(app)
            };
            if count > 0 && day.month() == state.month {
                style = style.fg(app.theme.cyan);
            }
            if *day == today {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if *day == state.cursor {
                style = style
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(unicode::fit_to_width(&label, cell), style));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    // Selected day
    let selected = days.get(&state.cursor).map(Vec::as_slice).unwrap_or_default();
    lines.push(Line::from(vec![
        Span::styled(format!(" {}", state.cursor.format("%A %d %B")), header(app)),
        Span::styled(format!("  ({} tasks)", selected.len()), dim(app)),
    ]));
    if selected.is_empty() {
        lines.push(Line::from(Span::styled("   Nothing scheduled. Press n to add a task.", dim(app))));
    }
    let names = project_ops::project_name_map(app.store.projects());
    for task in selected {
        let mut spans = vec![
            Span::styled(format!("   {} ", task.date.format("%H:%M")), dim(app)),
            Span::styled(
                "\u{25CF} ",
                Style::default().fg(app.theme.priority_color(task.priority)).bg(bg),
            ),
            Span::styled(unicode::fit_to_width(&task.title, 36), base(app)),
            Span::styled(
                unicode::fit_to_width(task.status.label(), 14),
                Style::default().fg(app.theme.status_color(task.status)).bg(bg),
            ),
        ];
        if let Some(name) = task.project_id.as_deref().and_then(|id| names.get(id)) {
            spans.push(Span::styled(
                format!("@{}", name),
                Style::default().fg(app.theme.purple).bg(bg),
            ));
        }
        lines.push(pad_line(spans, width, Style::default().bg(bg)));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
