use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::{doc_ops, task_ops};
use crate::tui::app::App;

use super::helpers::{base, dim, header};

/// Render the signed-in profile and a summary of the workspace
pub fn render_profile_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let profile = &app.profile;
    let avatar = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.purple)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", base(app)),
            Span::styled("     ", avatar),
        ]),
        Line::from(vec![
            Span::styled("  ", base(app)),
            Span::styled(format!("  {}  ", profile.initial()), avatar),
            Span::styled("  ", base(app)),
            Span::styled(profile.name.clone(), header(app)),
        ]),
        Line::from(vec![
            Span::styled("  ", base(app)),
            Span::styled("     ", avatar),
            Span::styled("  ", base(app)),
            Span::styled(profile.email.clone(), Style::default().fg(app.theme.cyan).bg(bg)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Organization  ", dim(app)),
            Span::styled(profile.organization.clone(), base(app)),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Workspace", header(app))),
    ];

    let store = &app.store;
    let total_size: u64 = store.files().iter().map(|f| f.size).sum();
    let mut lanes = Vec::new();
    for (status, count) in task_ops::lane_counts(store.tasks()) {
        lanes.push(format!("{} {}", count, status.label().to_lowercase()));
    }
    let rows = [
        ("Projects", store.projects().len().to_string()),
        ("Tasks", format!("{} ({})", store.tasks().len(), lanes.join(", "))),
        ("Folders", store.folders().len().to_string()),
        (
            "Documents",
            format!(
                "{} ({})",
                store.files().len(),
                doc_ops::format_file_size(total_size)
            ),
        ),
        ("Collaborators", store.users().len().to_string()),
    ];
    for (label, value) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<16}", label), dim(app)),
            Span::styled(value, base(app)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
