use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode, PickerKind};

pub(super) fn handle_picker(app: &mut App, key: KeyEvent) {
    let Some(picker) = app.picker.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    let last = picker.items.len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => picker.cursor = (picker.cursor + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => picker.cursor = picker.cursor.saturating_sub(1),
        KeyCode::Char(' ') => picker.toggle(),
        KeyCode::Enter => apply(app),
        KeyCode::Esc => {
            app.picker = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn apply(app: &mut App) {
    let Some(picker) = app.picker.take() else {
        return;
    };
    app.mode = Mode::Navigate;
    let chosen = picker.chosen();
    if chosen.is_empty() {
        app.set_status("Nothing selected");
        return;
    }
    let result = match &picker.kind {
        PickerKind::LinkFiles { project_id } => app.store.link_files(&chosen, project_id),
        PickerKind::AssignProjects { user_id } => app.store.assign_projects(user_id, &chosen),
    };
    match result {
        Ok(()) => app.set_status(format!("Added {} item(s)", chosen.len())),
        Err(e) => app.set_error(e.to_string()),
    }
    app.clamp_cursors();
}
