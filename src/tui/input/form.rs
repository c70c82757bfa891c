use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::model::task::{Priority, TaskStatus};
use crate::model::project::ProjectStatus;
use crate::model::config::View;
use crate::ops::project_ops::{self, ProjectInput};
use crate::ops::task_ops::{self, TaskInput};
use crate::ops::user_ops;
use crate::tui::app::{App, Mode};
use crate::tui::form::{Form, FormKind};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('w') | KeyCode::Backspace => form.delete_word(),
            KeyCode::Char('a') => form.home(),
            KeyCode::Char('e') => form.end(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => submit(app),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.move_left(),
        KeyCode::Right => form.move_right(),
        KeyCode::Home => form.home(),
        KeyCode::End => form.end(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        _ => {}
    }
}

/// Validate and apply the open form. A failure keeps the form open with
/// the message shown under its fields.
fn submit(app: &mut App) {
    let Some(form) = app.form.clone() else {
        return;
    };
    match apply(app, &form) {
        Ok(message) => {
            debug!(form = %form.title, "form submitted");
            app.form = None;
            app.mode = Mode::Navigate;
            app.clamp_cursors();
            app.set_status(message);
        }
        Err(e) => {
            if let Some(open) = app.form.as_mut() {
                open.error = Some(e);
            }
        }
    }
}

fn apply(app: &mut App, form: &Form) -> Result<String, String> {
    match &form.kind {
        FormKind::NewTask | FormKind::EditTask(_) => {
            let input = TaskInput {
                title: form.text(0).to_string(),
                date: form.text(1).to_string(),
                priority: form
                    .choice(2)
                    .and_then(|p| p.parse::<Priority>().ok())
                    .unwrap_or(Priority::Medium),
                status: form
                    .choice(3)
                    .and_then(|s| s.parse::<TaskStatus>().ok())
                    .unwrap_or(TaskStatus::Todo),
                project_id: form.choice(4).map(String::from),
            };
            let draft = task_ops::validate_task_input(&input).map_err(|e| e.to_string())?;
            let id = match &form.kind {
                FormKind::EditTask(id) => {
                    app.store
                        .update_task(id, draft)
                        .map_err(|e| e.to_string())?;
                    id.clone()
                }
                _ => app.store.create_task(draft).map_err(|e| e.to_string())?,
            };
            if app.view == View::Kanban {
                app.focus_task(&id);
            }
            Ok(format!("Saved \"{}\"", input.title.trim()))
        }
        FormKind::NewProject | FormKind::EditProject(_) => {
            let input = ProjectInput {
                name: form.text(0).to_string(),
                client: form.text(1).to_string(),
                start_date: form.text(2).to_string(),
                end_date: form.text(3).to_string(),
                status: form
                    .choice(4)
                    .and_then(|s| s.parse::<ProjectStatus>().ok())
                    .unwrap_or(ProjectStatus::Pending),
                description: form.text(5).to_string(),
            };
            let draft = project_ops::validate_project_input(&input).map_err(|e| e.to_string())?;
            let name = draft.name.clone();
            match &form.kind {
                FormKind::EditProject(id) => app
                    .store
                    .update_project(id, draft)
                    .map_err(|e| e.to_string())?,
                _ => {
                    app.store.create_project(draft).map_err(|e| e.to_string())?;
                    app.projects.cursor = 0;
                }
            }
            Ok(format!("Saved project \"{}\"", name))
        }
        FormKind::NewFolder { parent_id } => {
            let name = form.text(0).trim().to_string();
            app.store
                .create_folder(&name, parent_id.as_deref())
                .map_err(|e| e.to_string())?;
            if let Some(parent) = parent_id {
                app.docs.expanded.insert(parent.clone());
            }
            Ok(format!("Created folder \"{}\"", name))
        }
        FormKind::RenameFile(file_id) => {
            app.store
                .rename_file(file_id, form.text(0))
                .map_err(|e| e.to_string())?;
            Ok(format!("Renamed to \"{}\"", form.text(0).trim()))
        }
        FormKind::Invite => {
            let project_ids: Vec<String> = form.choice(2).map(String::from).into_iter().collect();
            let invite = user_ops::validate_invite(form.text(0), form.text(1), &project_ids)
                .map_err(|e| e.to_string())?;
            let email = invite.email.clone();
            app.store.invite_user(invite).map_err(|e| e.to_string())?;
            app.users.cursor = 0;
            Ok(format!("Invitation sent to {}", email))
        }
        FormKind::Upload { folder_id } => {
            let name = form.text(0).trim();
            if name.is_empty() {
                return Err("file name is required".into());
            }
            let size: u64 = form
                .text(1)
                .trim()
                .parse()
                .map_err(|_| "size must be a number of bytes".to_string())?;
            app.uploads.enqueue(
                name,
                size,
                folder_id.clone(),
                form.choice(2).map(String::from),
            );
            Ok(format!("Uploading {}", name))
        }
    }
}
