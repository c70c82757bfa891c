use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::user::CollaboratorUser;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{base, cursor_marker, dim, header, pad_line, row_style, scroll_offset};

const NAME_W: usize = 26;
const EMAIL_W: usize = 28;
const PROJECTS_W: usize = 11;

/// Render collaborators: the list, or one collaborator's assignments
pub fn render_users_view(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.open_user() {
        Some(user) => detail_lines(app, user, area),
        None => list_lines(app, area),
    };
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
}

fn list_lines<'a>(app: &App, area: Rect) -> Vec<Line<'a>> {
    let width = area.width as usize;
    let users = app.store.users();
    let mut lines = vec![
        Line::from(Span::styled(format!(" Collaborators ({})", users.len()), header(app))),
        Line::from(""),
    ];
    if users.is_empty() {
        lines.push(Line::from(Span::styled(
            " Nobody invited yet. Press n to invite someone.",
            dim(app),
        )));
        return lines;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {}{}{}Invited",
            unicode::fit_to_width("Name", NAME_W),
            unicode::fit_to_width("Email", EMAIL_W),
            unicode::fit_to_width("Projects", PROJECTS_W),
        ),
        dim(app),
    )));

    let visible = (area.height as usize).saturating_sub(lines.len()).max(1);
    let offset = scroll_offset(app.users.cursor, visible);
    for (idx, user) in users.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == app.users.cursor;
        let style = row_style(app, selected);
        let spans = vec![
            cursor_marker(app, selected),
            Span::styled(format!(" {}", unicode::fit_to_width(&user.name, NAME_W)), style),
            Span::styled(unicode::fit_to_width(&user.email, EMAIL_W), style.fg(app.theme.cyan)),
            Span::styled(
                unicode::fit_to_width(&user.project_ids.len().to_string(), PROJECTS_W),
                style,
            ),
            Span::styled(user.invited_at.format("%d %b %Y").to_string(), style.fg(app.theme.dim)),
        ];
        lines.push(pad_line(spans, width, style));
    }
    lines
}

fn detail_lines<'a>(app: &App, user: &CollaboratorUser, area: Rect) -> Vec<Line<'a>> {
    let width = area.width as usize;
    let bg = app.theme.background;
    let projects = app.open_user_projects();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" \u{2190} ", dim(app)),
            Span::styled(user.name.clone(), header(app)),
            Span::styled(format!("  {}", user.email), Style::default().fg(app.theme.cyan).bg(bg)),
        ]),
        Line::from(Span::styled(
            format!(" Invited {}", user.invited_at.format("%d %b %Y %H:%M")),
            dim(app),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Projects ({})", projects.len()), header(app))),
    ];

    if projects.is_empty() {
        lines.push(Line::from(Span::styled(
            "   Not assigned to any project. Press a to assign.",
            dim(app),
        )));
        return lines;
    }

    let visible = (area.height as usize).saturating_sub(lines.len()).max(1);
    let offset = scroll_offset(app.users.detail_cursor, visible);
    for (idx, project) in projects.iter().enumerate().skip(offset).take(visible) {
        let selected = idx == app.users.detail_cursor;
        let style = row_style(app, selected);
        let spans = vec![
            cursor_marker(app, selected),
            Span::styled(format!("  {}", unicode::fit_to_width(&project.name, 50)), style),
            Span::styled(
                project.status.label(),
                style.fg(app.theme.project_status_color(project.status)),
            ),
        ];
        lines.push(pad_line(spans, width, style));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " a assign  x remove  Esc back",
        base(app).fg(app.theme.dim),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::View;
    use crate::tui::render::test_helpers::*;

    fn page(app: &App) -> String {
        render_to_string(TERM_W, 24, |frame, area| render_users_view(frame, app, area))
    }

    #[test]
    fn list_shows_collaborators() {
        let app = app_on(View::Users);
        let out = page(&app);
        assert!(out.contains("Collaborators (5)"));
        assert!(out.contains("Antonio Reyes"));
        assert!(out.contains("antonio@atria.com"));
        assert!(out.contains("15 Jan 2026"));
        assert!(out.contains("Miguel Ángel Torres"));
    }

    #[test]
    fn detail_lists_assigned_projects() {
        let mut app = app_on(View::Users);
        app.users.open = Some("u2".into());
        let out = page(&app);
        assert!(out.contains("Daniela Montoya"));
        assert!(out.contains("Projects (3)"));
        assert!(out.contains("CANCHA Y FORO CULTURAL"));
        assert!(out.contains("PARQUE RINCONADAS DE LOS ANGELES"));
        assert!(out.contains("CAMPESTRE VILLAS DEL ALAMO"));
        assert!(!out.contains("PARQUE CHACON 1"));
    }

    #[test]
    fn unassigned_user_gets_hint() {
        let mut app = app_on(View::Users);
        app.users.open = Some("u5".into());
        let out = page(&app);
        assert!(out.contains("Projects (0)"));
        assert!(out.contains("Press a to assign"));
    }
}
