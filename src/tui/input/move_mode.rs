use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::ops::task_ops::{self, MoveDirection};
use crate::tui::app::{App, Mode, MoveState};

/// Grab the card under the kanban cursor. The board is previewed on a copy
/// until the card is dropped.
pub(super) fn enter_move_mode(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let task_id = task.id.clone();
    let title = task.title.clone();
    app.move_state = Some(MoveState {
        task_id,
        preview: app.store.tasks().to_vec(),
    });
    app.mode = Mode::Move;
    app.set_status(format!("Moving \"{}\"", title));
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    let direction = match key.code {
        KeyCode::Char('k') | KeyCode::Up => Some(MoveDirection::Up),
        KeyCode::Char('j') | KeyCode::Down => Some(MoveDirection::Down),
        KeyCode::Char('h') | KeyCode::Left => Some(MoveDirection::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(MoveDirection::Right),
        _ => None,
    };

    if let Some(direction) = direction {
        if let Some(state) = app.move_state.as_mut() {
            state.preview = task_ops::neighbor_move(&state.preview, &state.task_id, direction);
            let task_id = state.task_id.clone();
            app.focus_task(&task_id);
        }
        return;
    }

    match key.code {
        KeyCode::Enter => drop_card(app),
        KeyCode::Esc => cancel_move(app),
        _ => {}
    }
}

/// Commit the previewed board as one undoable change
fn drop_card(app: &mut App) {
    let Some(state) = app.move_state.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    let status = task_ops::find_task(&state.preview, &state.task_id).map(|t| t.status);
    let before = app.store.revision();
    app.store.replace_tasks(state.preview);
    app.mode = Mode::Navigate;
    app.focus_task(&state.task_id);

    if app.store.revision() != before {
        debug!(task = %state.task_id, status = ?status, "dropped card");
        if let Some(status) = status {
            app.set_status(format!("Moved to {}", status.label()));
        }
    }
}

fn cancel_move(app: &mut App) {
    if let Some(state) = app.move_state.take() {
        app.focus_task(&state.task_id);
    }
    app.mode = Mode::Navigate;
}
