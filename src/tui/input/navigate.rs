use chrono::{Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::config::View;
use crate::model::document::FileStatus;
use crate::model::task::TaskStatus;
use crate::ops::doc_ops::{self, FileFilter};
use crate::ops::project_ops::{self, ProjectInput};
use crate::ops::task_ops::TaskInput;
use crate::ops::{calendar, user_ops};
use crate::tui::app::{
    App, CalendarState, ConfirmAction, ConfirmState, DocsFocus, Mode, Picker, PickerKind,
};
use crate::tui::form::{Form, FormKind};

use super::move_mode::enter_move_mode;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay swallows everything but its own toggles
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if app.task_detail.is_some() {
        handle_task_detail(app, key);
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.redo();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            switch_view(app, View::ALL[idx]);
            return;
        }
        KeyCode::Tab => {
            switch_view(app, app.view.next());
            return;
        }
        KeyCode::BackTab => {
            switch_view(app, app.view.prev());
            return;
        }
        KeyCode::Char('u') => {
            app.undo();
            return;
        }
        KeyCode::Char('U') => {
            app.redo();
            return;
        }
        _ => {}
    }

    match app.view {
        View::Projects => handle_projects(app, key),
        View::Kanban => handle_kanban(app, key),
        View::Calendar => handle_calendar(app, key),
        View::Documents => handle_documents(app, key),
        View::Users => handle_users(app, key),
        View::Profile => {}
    }
}

fn switch_view(app: &mut App, view: View) {
    app.view = view;
    app.clamp_cursors();
}

/// j/k style movement over a list of `len` rows
fn step_cursor(cursor: &mut usize, len: usize, key: KeyCode) -> bool {
    let last = len.saturating_sub(1);
    match key {
        KeyCode::Char('j') | KeyCode::Down => *cursor = (*cursor + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => *cursor = cursor.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => *cursor = 0,
        KeyCode::Char('G') | KeyCode::End => *cursor = last,
        _ => return false,
    }
    true
}

fn open_form(app: &mut App, form: Form) {
    app.form = Some(form);
    app.mode = Mode::Form;
}

fn ask(app: &mut App, message: String, action: ConfirmAction) {
    app.confirm = Some(ConfirmState { message, action });
    app.mode = Mode::Confirm;
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn handle_projects(app: &mut App, key: KeyEvent) {
    if app.projects.open.is_some() {
        handle_project_detail(app, key);
        return;
    }
    let len = app.store.projects().len();
    if step_cursor(&mut app.projects.cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char('n') => {
            open_form(app, Form::project(FormKind::NewProject, &ProjectInput::default()));
        }
        KeyCode::Char('e') => edit_selected_project(app),
        KeyCode::Char('d') => {
            if let Some(project) = app.selected_project() {
                let message = format!("Delete project \"{}\"?", project.name);
                let action = ConfirmAction::DeleteProject {
                    project_id: project.id.clone(),
                };
                ask(app, message, action);
            }
        }
        KeyCode::Char('s') => cycle_project_status(app),
        KeyCode::Enter => {
            if let Some(project) = app.selected_project() {
                app.projects.open = Some(project.id.clone());
                app.projects.detail_cursor = 0;
            }
        }
        _ => {}
    }
}

fn edit_selected_project(app: &mut App) {
    let project = match app.projects.open.is_some() {
        true => app.open_project(),
        false => app.selected_project(),
    };
    if let Some(project) = project {
        let form = Form::project(
            FormKind::EditProject(project.id.clone()),
            &ProjectInput::from_project(project),
        );
        open_form(app, form);
    }
}

fn cycle_project_status(app: &mut App) {
    let Some(project) = app.selected_project() else {
        return;
    };
    let mut input = ProjectInput::from_project(project);
    input.status = input.status.cycle();
    let id = project.id.clone();
    let result = project_ops::validate_project_input(&input)
        .map_err(|e| e.to_string())
        .and_then(|draft| app.store.update_project(&id, draft).map_err(|e| e.to_string()));
    match result {
        Ok(()) => app.set_status(format!("Status: {}", input.status.label())),
        Err(e) => app.set_error(e),
    }
}

fn handle_project_detail(app: &mut App, key: KeyEvent) {
    let len = app.open_project_files().len();
    if step_cursor(&mut app.projects.detail_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            app.projects.open = None;
        }
        KeyCode::Char('e') => edit_selected_project(app),
        KeyCode::Char('l') => open_link_picker(app),
        KeyCode::Char('x') => {
            let Some(project_id) = app.projects.open.clone() else {
                return;
            };
            let file = app
                .open_project_files()
                .get(app.projects.detail_cursor)
                .map(|f| (f.id.clone(), f.name.clone()));
            if let Some((file_id, name)) = file {
                let message = format!("Unlink \"{}\" from this project?", name);
                ask(app, message, ConfirmAction::UnlinkFile { file_id, project_id });
            }
        }
        _ => {}
    }
}

fn open_link_picker(app: &mut App) {
    let Some((project_id, project_name)) = app
        .open_project()
        .map(|p| (p.id.clone(), p.name.clone()))
    else {
        return;
    };
    let filter = FileFilter {
        not_linked_to: Some(project_id.clone()),
        ..FileFilter::default()
    };
    let items: Vec<(String, String)> = doc_ops::filter_files(app.store.files(), &filter)
        .into_iter()
        .map(|f| (f.id.clone(), f.name.clone()))
        .collect();
    if items.is_empty() {
        app.set_status("Every document is already linked");
        return;
    }
    app.picker = Some(Picker {
        kind: PickerKind::LinkFiles { project_id },
        title: format!("Link documents to {}", project_name),
        items,
        selected: Default::default(),
        cursor: 0,
    });
    app.mode = Mode::Picker;
}

// ---------------------------------------------------------------------------
// Kanban
// ---------------------------------------------------------------------------

fn handle_kanban(app: &mut App, key: KeyEvent) {
    let len = app.lane(app.kanban.lane).len();
    if step_cursor(&mut app.kanban.row, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            if let Some(prev) = app.kanban.lane.prev() {
                app.kanban.lane = prev;
                app.clamp_cursors();
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if let Some(next) = app.kanban.lane.next() {
                app.kanban.lane = next;
                app.clamp_cursors();
            }
        }
        KeyCode::Char('n') => {
            let form = Form::task(
                FormKind::NewTask,
                &TaskInput::new(app.kanban.lane),
                app.store.projects(),
            );
            open_form(app, form);
        }
        KeyCode::Char('e') => edit_selected_task(app),
        KeyCode::Char('d') => delete_selected_task(app),
        KeyCode::Char('m') => enter_move_mode(app),
        KeyCode::Enter => {
            if let Some(task) = app.selected_task() {
                app.task_detail = Some(task.id.clone());
            }
        }
        _ => {}
    }
}

fn edit_selected_task(app: &mut App) {
    let task = match app.task_detail.as_deref() {
        Some(id) => crate::ops::task_ops::find_task(app.store.tasks(), id),
        None => app.selected_task(),
    };
    if let Some(task) = task {
        let form = Form::task(
            FormKind::EditTask(task.id.clone()),
            &TaskInput::from_task(task),
            app.store.projects(),
        );
        open_form(app, form);
    }
}

fn delete_selected_task(app: &mut App) {
    let task = match app.task_detail.as_deref() {
        Some(id) => crate::ops::task_ops::find_task(app.store.tasks(), id),
        None => app.selected_task(),
    };
    if let Some(task) = task {
        let message = format!("Delete task \"{}\"?", task.title);
        let action = ConfirmAction::DeleteTask {
            task_id: task.id.clone(),
        };
        ask(app, message, action);
    }
}

/// Keys while the task detail popup is open
fn handle_task_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.task_detail = None,
        KeyCode::Char('e') => edit_selected_task(app),
        KeyCode::Char('d') => delete_selected_task(app),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn handle_calendar(app: &mut App, key: KeyEvent) {
    let cursor = app.calendar.cursor;
    let moved = match key.code {
        KeyCode::Char('h') | KeyCode::Left => cursor.checked_sub_days(Days::new(1)),
        KeyCode::Char('l') | KeyCode::Right => cursor.checked_add_days(Days::new(1)),
        KeyCode::Char('k') | KeyCode::Up => cursor.checked_sub_days(Days::new(7)),
        KeyCode::Char('j') | KeyCode::Down => cursor.checked_add_days(Days::new(7)),
        KeyCode::Char('[') => shift_month(app, -1),
        KeyCode::Char(']') => shift_month(app, 1),
        KeyCode::Char('t') => Some(Local::now().date_naive()),
        KeyCode::Char('n') => {
            let mut input = TaskInput::new(TaskStatus::Todo);
            input.date = format!("{} 09:00", cursor.format("%Y-%m-%d"));
            let form = Form::task(FormKind::NewTask, &input, app.store.projects());
            open_form(app, form);
            None
        }
        _ => None,
    };
    if let Some(date) = moved {
        app.calendar = CalendarState::at(date);
    }
}

/// Same day of the month `delta` months away, clamped to that month's length
fn shift_month(app: &App, delta: i32) -> Option<NaiveDate> {
    let (year, month) = calendar::shift_month(app.calendar.year, app.calendar.month, delta);
    let day = chrono::Datelike::day(&app.calendar.cursor);
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

fn handle_documents(app: &mut App, key: KeyEvent) {
    // Keys shared by both panes
    match key.code {
        KeyCode::Char('/') => {
            app.search_input = app.docs.query.clone();
            app.mode = Mode::Search;
            return;
        }
        KeyCode::Char('t') => {
            cycle_type_filter(app);
            return;
        }
        KeyCode::Char('a') => {
            let folder_id = app.docs.selected_folder.clone();
            let name = doc_ops::folder_name(app.store.folders(), folder_id.as_deref());
            let name = if folder_id.is_none() { doc_ops::ALL_FILES } else { name };
            let form = Form::upload(folder_id.clone(), name, app.store.projects());
            open_form(app, form);
            return;
        }
        KeyCode::Char('x') => {
            let ids: Vec<u64> = app.uploads.items().iter().map(|u| u.id).collect();
            let cancelled = ids
                .into_iter()
                .filter(|id| app.uploads.fail(*id, "cancelled"))
                .count();
            if cancelled > 0 {
                app.set_status(format!("Cancelled {} upload(s)", cancelled));
            }
            return;
        }
        KeyCode::Char('R') => {
            let failed: Vec<u64> = app
                .uploads
                .items()
                .iter()
                .filter(|u| u.status == FileStatus::Error)
                .map(|u| u.id)
                .collect();
            for id in &failed {
                app.uploads.retry(*id);
            }
            if !failed.is_empty() {
                app.set_status(format!("Retrying {} upload(s)", failed.len()));
            }
            return;
        }
        KeyCode::Char('c') => {
            app.uploads.clear_ready();
            return;
        }
        KeyCode::Esc => {
            app.docs.query.clear();
            app.docs.type_filter = None;
            app.clamp_cursors();
            return;
        }
        _ => {}
    }

    match app.docs.focus {
        DocsFocus::Folders => handle_folder_pane(app, key),
        DocsFocus::Files => handle_file_pane(app, key),
    }
}

fn handle_folder_pane(app: &mut App, key: KeyEvent) {
    let len = app.folder_rows().len() + 1;
    if step_cursor(&mut app.docs.folder_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => app.docs.focus = DocsFocus::Files,
        KeyCode::Enter | KeyCode::Char(' ') => {
            let folder = app.cursor_folder();
            if let Some(id) = folder.as_deref()
                && doc_ops::has_children(app.store.folders(), id)
                && !app.docs.expanded.remove(id)
            {
                app.docs.expanded.insert(id.to_string());
            }
            app.docs.selected_folder = folder;
            app.docs.file_cursor = 0;
            app.clamp_cursors();
        }
        KeyCode::Char('n') => {
            let parent = app.cursor_folder();
            let name = match parent.as_deref() {
                Some(id) => doc_ops::folder_name(app.store.folders(), Some(id)),
                None => doc_ops::ALL_FILES,
            };
            let form = Form::folder(parent.clone(), name);
            open_form(app, form);
        }
        _ => {}
    }
}

fn handle_file_pane(app: &mut App, key: KeyEvent) {
    let len = app.visible_files().len();
    if step_cursor(&mut app.docs.file_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.docs.focus = DocsFocus::Folders,
        KeyCode::Char('r') => {
            if let Some(file) = app.selected_file() {
                let form = Form::rename(file);
                open_form(app, form);
            }
        }
        KeyCode::Char('d') => {
            if let Some(file) = app.selected_file() {
                let message = format!("Delete \"{}\"?", file.name);
                let action = ConfirmAction::DeleteFile {
                    file_id: file.id.clone(),
                };
                ask(app, message, action);
            }
        }
        _ => {}
    }
}

/// None, then each MIME type present, then back to None
fn cycle_type_filter(app: &mut App) {
    let types: Vec<String> = doc_ops::file_types(app.store.files())
        .into_iter()
        .map(String::from)
        .collect();
    let next = match app.docs.type_filter.as_deref() {
        None => types.first().cloned(),
        Some(current) => types
            .iter()
            .position(|t| t == current)
            .and_then(|i| types.get(i + 1).cloned()),
    };
    match next.as_deref() {
        Some(mime) => app.set_status(format!("Type: {}", doc_ops::file_type_label(mime))),
        None => app.set_status("Type: all"),
    }
    app.docs.type_filter = next;
    app.docs.file_cursor = 0;
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

fn handle_users(app: &mut App, key: KeyEvent) {
    if app.users.open.is_some() {
        handle_user_detail(app, key);
        return;
    }
    let len = app.store.users().len();
    if step_cursor(&mut app.users.cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char('n') => {
            let form = Form::invite(app.store.projects());
            open_form(app, form);
        }
        KeyCode::Enter => {
            if let Some(user) = app.selected_user() {
                app.users.open = Some(user.id.clone());
                app.users.detail_cursor = 0;
            }
        }
        _ => {}
    }
}

fn handle_user_detail(app: &mut App, key: KeyEvent) {
    let len = app.open_user_projects().len();
    if step_cursor(&mut app.users.detail_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            app.users.open = None;
        }
        KeyCode::Char('a') => open_assign_picker(app),
        KeyCode::Char('x') => {
            let Some((user_id, user_name)) = app.open_user().map(|u| (u.id.clone(), u.name.clone()))
            else {
                return;
            };
            let project = app
                .open_user_projects()
                .get(app.users.detail_cursor)
                .map(|p| (p.id.clone(), p.name.clone()));
            if let Some((project_id, project_name)) = project {
                let message = format!("Remove {} from \"{}\"?", user_name, project_name);
                ask(app, message, ConfirmAction::RemoveFromProject { user_id, project_id });
            }
        }
        _ => {}
    }
}

fn open_assign_picker(app: &mut App) {
    let Some(user) = app.open_user() else {
        return;
    };
    let (user_id, user_name) = (user.id.clone(), user.name.clone());
    let (_, available) = user_ops::partition_projects(user, app.store.projects());
    let items: Vec<(String, String)> = available
        .into_iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();
    if items.is_empty() {
        app.set_status(format!("{} is on every project", user_name));
        return;
    }
    app.picker = Some(Picker {
        kind: PickerKind::AssignProjects { user_id },
        title: format!("Assign projects to {}", user_name),
        items,
        selected: Default::default(),
        cursor: 0,
    });
    app.mode = Mode::Picker;
}
