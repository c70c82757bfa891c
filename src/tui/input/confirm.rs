use crossterm::event::{KeyCode, KeyEvent};

use crate::state::StoreError;
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                match execute(app, state.action) {
                    Ok(message) => app.set_status(message),
                    Err(e) => app.set_error(e.to_string()),
                }
                app.clamp_cursors();
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn execute(app: &mut App, action: ConfirmAction) -> Result<&'static str, StoreError> {
    match action {
        ConfirmAction::DeleteTask { task_id } => {
            app.store.delete_task(&task_id)?;
            app.task_detail = None;
            Ok("Task deleted")
        }
        ConfirmAction::DeleteProject { project_id } => {
            app.store.delete_project(&project_id)?;
            app.projects.open = None;
            Ok("Project deleted")
        }
        ConfirmAction::DeleteFile { file_id } => {
            app.store.delete_file(&file_id)?;
            Ok("Document deleted")
        }
        ConfirmAction::UnlinkFile {
            file_id,
            project_id,
        } => {
            app.store.unlink_file(&file_id, &project_id)?;
            Ok("Document unlinked")
        }
        ConfirmAction::RemoveFromProject {
            user_id,
            project_id,
        } => {
            app.store.remove_user_from_project(&user_id, &project_id)?;
            Ok("Removed from project")
        }
    }
}
