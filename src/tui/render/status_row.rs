use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::model::config::View;
use crate::tui::app::{App, DocsFocus, Mode};

use super::helpers::{pad_line, with_right_hint};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let fill = Style::default().bg(bg);
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(msg) = &app.status {
                let color = if msg.is_error { app.theme.red } else { app.theme.text_bright };
                spans.push(Span::styled(msg.text.clone(), Style::default().fg(color).bg(bg)));
            } else if app.view == View::Documents && !app.docs.query.is_empty() {
                // Active search stays visible, dimmed
                spans.push(Span::styled(format!("/{}", app.docs.query), hint_style));
            } else if let Some(label) = app.store.undo_label() {
                spans.push(Span::styled(format!("u undo {}", label), hint_style));
            }
            if app.show_key_hints {
                with_right_hint(spans, navigate_hint(app), width, fill, hint_style)
            } else {
                pad_line(spans, width, fill)
            }
        }
        Mode::Move => {
            let spans = vec![Span::styled(
                "MOVE",
                Style::default().fg(app.theme.background).bg(app.theme.highlight),
            )];
            with_right_hint(
                spans,
                "\u{2190}\u{2191}\u{2193}\u{2192} move  Enter drop  Esc cancel",
                width,
                fill,
                hint_style,
            )
        }
        Mode::Search => {
            // Search prompt: /pattern▌
            let spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            with_right_hint(spans, "Enter keep  Esc clear", width, fill, hint_style)
        }
        Mode::Form => with_right_hint(
            Vec::new(),
            "Tab next field  \u{2190}\u{2192} change  Enter save  Esc cancel",
            width,
            fill,
            hint_style,
        ),
        Mode::Confirm => with_right_hint(Vec::new(), "y confirm  n cancel", width, fill, hint_style),
        Mode::Picker => with_right_hint(
            Vec::new(),
            "Space toggle  Enter apply  Esc cancel",
            width,
            fill,
            hint_style,
        ),
    };

    let paragraph = Paragraph::new(line).style(fill);
    frame.render_widget(paragraph, area);
}

fn navigate_hint(app: &App) -> &'static str {
    match app.view {
        View::Projects if app.projects.open.is_some() => "l link  x unlink  e edit  Esc back",
        View::Projects => "n new  e edit  s status  d delete  Enter open",
        View::Kanban => "n new  e edit  m move  d delete  Enter details",
        View::Calendar => "hjkl day  [ ] month  t today  n new task",
        View::Documents => match app.docs.focus {
            DocsFocus::Folders => "Enter open  n folder  a upload  / search  t type",
            DocsFocus::Files => "r rename  d delete  a upload  / search  t type",
        },
        View::Users if app.users.open.is_some() => "a assign  x remove  Esc back",
        View::Users => "n invite  Enter open",
        View::Profile => "? help  q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status_line(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn shows_status_message() {
        let mut app = seeded_app();
        app.set_error("task not found: 9");
        assert_eq!(status_line(&app), "task not found: 9");
    }

    #[test]
    fn key_hints_follow_config() {
        let mut app = app_on(View::Kanban);
        assert_eq!(status_line(&app), "");
        app.show_key_hints = true;
        assert!(status_line(&app).ends_with("Enter details"));
    }

    #[test]
    fn offers_undo_of_last_change() {
        let mut app = app_on(View::Kanban);
        app.store.delete_task("101").unwrap();
        assert_eq!(status_line(&app), "u undo delete task");
        app.set_status("Deleted task");
        assert_eq!(status_line(&app), "Deleted task");
    }

    #[test]
    fn move_mode_badge() {
        let mut app = app_on(View::Kanban);
        app.mode = Mode::Move;
        let line = status_line(&app);
        assert!(line.starts_with("MOVE"));
        assert!(line.ends_with("Esc cancel"));
    }

    #[test]
    fn search_prompt_shows_query() {
        let mut app = app_on(View::Documents);
        app.mode = Mode::Search;
        app.search_input = "plan".into();
        assert!(status_line(&app).starts_with("/plan\u{258C}"));
    }
}
