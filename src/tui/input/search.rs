use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, DocsFocus, Mode};
use crate::util::unicode;

/// Document search: the file table filters as the query is typed
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            apply_query(app);
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            app.docs.focus = DocsFocus::Files;
        }
        KeyCode::Backspace if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let start = unicode::word_boundary_left(&app.search_input, app.search_input.len());
            app.search_input.truncate(start);
            apply_query(app);
        }
        KeyCode::Backspace => {
            if let Some(prev) =
                unicode::prev_grapheme_boundary(&app.search_input, app.search_input.len())
            {
                app.search_input.truncate(prev);
            }
            apply_query(app);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
            apply_query(app);
        }
        _ => {}
    }
}

fn apply_query(app: &mut App) {
    app.docs.query = app.search_input.clone();
    app.docs.file_cursor = 0;
    app.clamp_cursors();
}
