mod confirm;
mod form;
mod move_mode;
mod navigate;
mod picker;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use form::handle_form;
use move_mode::handle_move;
use navigate::handle_navigate;
use picker::handle_picker;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Move => handle_move(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::Picker => handle_picker(app, key),
        Mode::Search => handle_search(app, key),
    }
}

/// Terminals differ on whether Shift+u arrives as `u` or `U`; always use `U`
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::View;
    use crate::model::task::TaskStatus;
    use crate::model::{AppConfig, Seed};
    use crate::ops::task_ops;
    use crate::state::Store;
    use crate::tui::app::{ConfirmAction, DocsFocus, PickerKind};
    use pretty_assertions::assert_eq;

    fn app_on(view: View) -> App {
        let mut app = App::new(Store::new(Seed::builtin().unwrap()), &AppConfig::default());
        app.view = view;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn lane_ids(app: &App, status: TaskStatus) -> Vec<String> {
        task_ops::lane(app.store.tasks(), status)
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn number_keys_and_tab_switch_views() {
        let mut app = app_on(View::Projects);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view, View::Kanban);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Calendar);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, View::Kanban);
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.view, View::Profile);
    }

    #[test]
    fn q_quits() {
        let mut app = app_on(View::Projects);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn shift_u_is_redo() {
        let mut app = app_on(View::Kanban);
        app.store.delete_task("101").unwrap();
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.store.tasks().len(), 4);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::SHIFT));
        assert_eq!(app.store.tasks().len(), 3);
    }

    #[test]
    fn move_mode_drops_as_single_change() {
        let mut app = app_on(View::Kanban);
        // Grab 101 (top of To do), carry it right twice into Done
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode, Mode::Move);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        // Store untouched until the drop
        assert_eq!(lane_ids(&app, TaskStatus::Done), Vec::<String>::new());
        assert_eq!(app.kanban.lane, TaskStatus::Done);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(lane_ids(&app, TaskStatus::Done), vec!["101"]);
        assert_eq!(lane_ids(&app, TaskStatus::Todo), vec!["102", "103"]);
        // One undo restores the original board
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(lane_ids(&app, TaskStatus::Todo), vec!["101", "102", "103"]);
        assert!(!app.store.can_undo());
    }

    #[test]
    fn move_mode_escape_restores_board() {
        let mut app = app_on(View::Kanban);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.lane(TaskStatus::Todo)[0].id, "102");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.move_state.is_none());
        assert_eq!(lane_ids(&app, TaskStatus::Todo), vec!["101", "102", "103"]);
        assert_eq!(app.selected_task().unwrap().id, "102");
        assert!(!app.store.can_undo());
    }

    #[test]
    fn new_task_form_validates_then_creates() {
        let mut app = app_on(View::Kanban);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Form);
        // Submit with an empty title
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(app.form.as_ref().unwrap().error.as_deref(), Some("title is required"));

        type_str(&mut app, "Replanteo");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2026-03-02 08:00");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        let todo = app.lane(TaskStatus::Todo);
        assert_eq!(todo[0].title, "Replanteo");
        assert_eq!(app.selected_task().unwrap().title, "Replanteo");
    }

    #[test]
    fn form_escape_discards() {
        let mut app = app_on(View::Projects);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Nuevo");
        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());
        assert_eq!(app.store.projects().len(), 10);
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut app = app_on(View::Kanban);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(
            app.confirm.as_ref().unwrap().action,
            ConfirmAction::DeleteTask { task_id: "101".into() }
        );
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.tasks().len(), 4);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.store.tasks().len(), 3);
        assert_eq!(app.selected_task().unwrap().id, "102");
    }

    #[test]
    fn documents_select_folder_and_search() {
        let mut app = app_on(View::Documents);
        assert_eq!(app.docs.focus, DocsFocus::Folders);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        let selected = app.docs.selected_folder.clone().unwrap();
        assert_eq!(app.visible_files().iter().filter(|f| f.folder_id.as_deref() != Some(selected.as_str())).count(), 0);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "zzz");
        assert!(app.visible_files().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.docs.query, "");
    }

    #[test]
    fn rename_file_from_files_pane() {
        let mut app = app_on(View::Documents);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.docs.focus, DocsFocus::Files);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, Mode::Form);
        // Clear the prefilled name word by word, then type a new one
        for _ in 0..10 {
            handle_key(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        }
        type_str(&mut app, "plano.pdf");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.files()[0].name, "plano.pdf");
    }

    #[test]
    fn upload_form_enqueues() {
        let mut app = app_on(View::Documents);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "foto.png");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.uploads_in_flight(), 1);
        assert_eq!(app.uploads.items()[0].mime_type, "image/png");
        // Cancel and retry
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.uploads_in_flight(), 0);
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.uploads_in_flight(), 1);
    }

    #[test]
    fn link_files_to_open_project() {
        let mut app = app_on(View::Projects);
        let project_id = app.store.projects()[0].id.clone();
        let linked_before = crate::ops::doc_ops::project_files(app.store.files(), &project_id).len();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.projects.open.as_deref(), Some(project_id.as_str()));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.mode, Mode::Picker);
        assert_eq!(
            app.picker.as_ref().unwrap().kind,
            PickerKind::LinkFiles { project_id: project_id.clone() }
        );
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        let linked_after = crate::ops::doc_ops::project_files(app.store.files(), &project_id).len();
        assert_eq!(linked_after, linked_before + 1);
    }

    #[test]
    fn invite_rejects_bad_email() {
        let mut app = app_on(View::Users);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Lucía");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "lucia@");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Form);
        assert!(app.form.as_ref().unwrap().error.is_some());
        type_str(&mut app, "atria.com");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.users()[0].email, "lucia@atria.com");
        assert_eq!(app.users.cursor, 0);
    }

    #[test]
    fn calendar_month_keys() {
        let mut app = app_on(View::Calendar);
        app.calendar = crate::tui::app::CalendarState::at(
            chrono::NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        press(&mut app, KeyCode::Char(']'));
        assert_eq!((app.calendar.year, app.calendar.month), (2026, 2));
        assert_eq!(app.calendar.cursor, chrono::NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        press(&mut app, KeyCode::Char('l'));
        assert_eq!((app.calendar.year, app.calendar.month), (2026, 3));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.calendar.cursor, chrono::NaiveDate::from_ymd_opt(2026, 2, 22).unwrap());
    }
}
