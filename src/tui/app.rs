use std::collections::HashSet;
use std::io;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::{Regex, RegexBuilder};
use tracing::{error, info};

use crate::model::config::View;
use crate::model::document::{DocFile, FileStatus};
use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::model::user::{CollaboratorUser, Profile};
use crate::model::{AppConfig, Seed};
use crate::ops::doc_ops::{self, FileFilter, FolderRow};
use crate::ops::task_ops;
use crate::ops::upload::UploadQueue;
use crate::state::{Scope, Store};

use super::form::Form;
use super::input;
use super::render;
use super::theme::Theme;

/// How often uploads advance while the UI is idle
const TICK_RATE: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A kanban card is grabbed and follows the arrow keys
    Move,
    Form,
    Confirm,
    Picker,
    /// Typing a document search query
    Search,
}

/// Kanban cursor: a lane and a row within it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KanbanState {
    pub lane: TaskStatus,
    pub row: usize,
}

/// A grabbed card. `preview` is the board as it would look if dropped now.
#[derive(Debug, Clone)]
pub struct MoveState {
    pub task_id: String,
    pub preview: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub year: i32,
    pub month: u32,
    /// Selected day; always inside the shown month
    pub cursor: NaiveDate,
}

impl CalendarState {
    pub fn at(date: NaiveDate) -> Self {
        CalendarState {
            year: date.year(),
            month: date.month(),
            cursor: date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocsFocus {
    Folders,
    Files,
}

#[derive(Debug, Clone)]
pub struct DocsState {
    pub focus: DocsFocus,
    /// Row 0 is "All files", row i+1 is folder row i
    pub folder_cursor: usize,
    pub file_cursor: usize,
    pub selected_folder: Option<String>,
    pub expanded: HashSet<String>,
    pub query: String,
    pub type_filter: Option<String>,
}

impl Default for DocsState {
    fn default() -> Self {
        DocsState {
            focus: DocsFocus::Folders,
            folder_cursor: 0,
            file_cursor: 0,
            selected_folder: None,
            expanded: HashSet::new(),
            query: String::new(),
            type_filter: None,
        }
    }
}

/// List cursor plus an optional open record (project or collaborator)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub cursor: usize,
    /// Id of the record whose detail page is open
    pub open: Option<String>,
    /// Cursor inside the detail page's list
    pub detail_cursor: usize,
}

/// A destructive action waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { task_id: String },
    DeleteProject { project_id: String },
    DeleteFile { file_id: String },
    UnlinkFile { file_id: String, project_id: String },
    RemoveFromProject { user_id: String, project_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerKind {
    /// Link documents to a project
    LinkFiles { project_id: String },
    /// Add projects to a collaborator
    AssignProjects { user_id: String },
}

/// Multi-select list popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub title: String,
    /// (id, label)
    pub items: Vec<(String, String)>,
    pub selected: HashSet<String>,
    pub cursor: usize,
}

impl Picker {
    pub fn toggle(&mut self) {
        if let Some((id, _)) = self.items.get(self.cursor)
            && !self.selected.remove(id)
        {
            self.selected.insert(id.clone());
        }
    }

    /// Selected ids in list order
    pub fn chosen(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|(id, _)| self.selected.contains(id))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Transient message in the status row, cleared on the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub store: Store,
    pub profile: Profile,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub projects: ListState,
    pub kanban: KanbanState,
    pub move_state: Option<MoveState>,
    /// Task whose detail popup is open
    pub task_detail: Option<String>,
    pub calendar: CalendarState,
    pub docs: DocsState,
    pub uploads: UploadQueue,
    pub users: ListState,
    pub form: Option<Form>,
    pub confirm: Option<ConfirmState>,
    pub picker: Option<Picker>,
    /// Help overlay visible
    pub show_help: bool,
    /// Search mode: query being typed
    pub search_input: String,
    pub status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Store, config: &AppConfig) -> Self {
        App {
            store,
            profile: config.profile.clone(),
            view: config.ui.start_view(),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            projects: ListState::default(),
            kanban: KanbanState {
                lane: TaskStatus::Todo,
                row: 0,
            },
            move_state: None,
            task_detail: None,
            calendar: CalendarState::at(Local::now().date_naive()),
            docs: DocsState::default(),
            uploads: UploadQueue::new(),
            users: ListState::default(),
            form: None,
            confirm: None,
            picker: None,
            show_help: false,
            search_input: String::new(),
            status: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    // -----------------------------------------------------------------------
    // Kanban
    // -----------------------------------------------------------------------

    /// The task list the board shows: the move preview while a card is grabbed
    pub fn board(&self) -> &[Task] {
        match &self.move_state {
            Some(state) => &state.preview,
            None => self.store.tasks(),
        }
    }

    pub fn lane(&self, status: TaskStatus) -> Vec<&Task> {
        task_ops::lane(self.board(), status)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.lane(self.kanban.lane).get(self.kanban.row).copied()
    }

    /// Put the kanban cursor on `task_id`, wherever it is on the board
    pub fn focus_task(&mut self, task_id: &str) {
        let Some(task) = task_ops::find_task(self.board(), task_id) else {
            return;
        };
        let status = task.status;
        if let Some(row) = self.lane(status).iter().position(|t| t.id == task_id) {
            self.kanban = KanbanState { lane: status, row };
        }
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    pub fn folder_rows(&self) -> Vec<FolderRow> {
        doc_ops::folder_rows(self.store.folders(), &self.docs.expanded)
    }

    /// Folder under the sidebar cursor; `None` for "All files"
    pub fn cursor_folder(&self) -> Option<String> {
        match self.docs.folder_cursor {
            0 => None,
            n => self.folder_rows().get(n - 1).map(|r| r.folder_id.clone()),
        }
    }

    pub fn file_filter(&self) -> FileFilter {
        FileFilter {
            folder_id: self.docs.selected_folder.clone(),
            query: self.docs.query.clone(),
            mime_type: self.docs.type_filter.clone(),
            not_linked_to: None,
        }
    }

    pub fn visible_files(&self) -> Vec<&DocFile> {
        doc_ops::filter_files(self.store.files(), &self.file_filter())
    }

    pub fn selected_file(&self) -> Option<&DocFile> {
        self.visible_files().get(self.docs.file_cursor).copied()
    }

    /// Case-insensitive regex for highlighting the active document query
    pub fn search_re(&self) -> Option<Regex> {
        if self.docs.query.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(&self.docs.query))
            .case_insensitive(true)
            .build()
            .ok()
    }

    // -----------------------------------------------------------------------
    // Projects and collaborators
    // -----------------------------------------------------------------------

    pub fn selected_project(&self) -> Option<&Project> {
        self.store.projects().get(self.projects.cursor)
    }

    pub fn open_project(&self) -> Option<&Project> {
        let id = self.projects.open.as_deref()?;
        self.store.projects().iter().find(|p| p.id == id)
    }

    pub fn open_project_files(&self) -> Vec<&DocFile> {
        match self.projects.open.as_deref() {
            Some(id) => doc_ops::project_files(self.store.files(), id),
            None => Vec::new(),
        }
    }

    pub fn selected_user(&self) -> Option<&CollaboratorUser> {
        self.store.users().get(self.users.cursor)
    }

    pub fn open_user(&self) -> Option<&CollaboratorUser> {
        let id = self.users.open.as_deref()?;
        self.store.users().iter().find(|u| u.id == id)
    }

    /// Projects the open collaborator is assigned to, in project order
    pub fn open_user_projects(&self) -> Vec<&Project> {
        match self.open_user() {
            Some(user) => {
                crate::ops::user_ops::partition_projects(user, self.store.projects()).0
            }
            None => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Housekeeping
    // -----------------------------------------------------------------------

    /// Keep every cursor inside its list after the data changed
    pub fn clamp_cursors(&mut self) {
        let lane_len = self.lane(self.kanban.lane).len();
        self.kanban.row = self.kanban.row.min(lane_len.saturating_sub(1));

        self.projects.cursor = clamp(self.projects.cursor, self.store.projects().len());
        if self.projects.open.is_some() && self.open_project().is_none() {
            self.projects.open = None;
        }
        self.projects.detail_cursor =
            clamp(self.projects.detail_cursor, self.open_project_files().len());

        self.users.cursor = clamp(self.users.cursor, self.store.users().len());
        if self.users.open.is_some() && self.open_user().is_none() {
            self.users.open = None;
        }
        self.users.detail_cursor = clamp(self.users.detail_cursor, self.open_user_projects().len());

        if let Some(folder) = self.docs.selected_folder.as_deref()
            && doc_ops::find_folder(self.store.folders(), folder).is_none()
        {
            self.docs.selected_folder = None;
        }
        self.docs.folder_cursor = clamp(self.docs.folder_cursor, self.folder_rows().len() + 1);
        self.docs.file_cursor = clamp(self.docs.file_cursor, self.visible_files().len());

        if let Some(id) = self.task_detail.as_deref()
            && task_ops::find_task(self.store.tasks(), id).is_none()
        {
            self.task_detail = None;
        }
    }

    /// Undo the last change and jump to the view it touched
    pub fn undo(&mut self) {
        match self.store.undo() {
            Some((label, scope)) => {
                self.view = scope_view(scope);
                self.set_status(format!("Undid {}", label));
            }
            None => self.set_status("Nothing to undo"),
        }
        self.clamp_cursors();
    }

    pub fn redo(&mut self) {
        match self.store.redo() {
            Some((label, scope)) => {
                self.view = scope_view(scope);
                self.set_status(format!("Redid {}", label));
            }
            None => self.set_status("Nothing to redo"),
        }
        self.clamp_cursors();
    }

    /// Advance simulated uploads; finished ones become ready files
    pub fn tick(&mut self) {
        for done in self.uploads.tick() {
            let name = done.name.clone();
            let id = self.store.add_uploaded_file(done, &self.profile.name);
            info!(file = %id, name = %name, "upload finished");
            self.set_status(format!("Uploaded {}", name));
        }
        self.clamp_cursors();
    }

    /// Uploads still moving through the pipeline
    pub fn uploads_in_flight(&self) -> usize {
        self.uploads
            .items()
            .iter()
            .filter(|u| {
                matches!(
                    u.status,
                    FileStatus::Pending | FileStatus::Uploading | FileStatus::Processing
                )
            })
            .count()
    }
}

/// The view that shows what a batch of this scope changed
fn scope_view(scope: Scope) -> View {
    match scope {
        Scope::Tasks => View::Kanban,
        Scope::Projects => View::Projects,
        Scope::Documents => View::Documents,
        Scope::Users => View::Users,
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

/// Run the TUI application
pub fn run(seed: Seed, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(Store::new(seed), config);
    info!(view = app.view.label(), "starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the default hook prints the panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);
    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(revision = app.store.revision(), "dashboard closed");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if last_tick.elapsed() >= TICK_RATE {
            if app.uploads.is_active() {
                app.tick();
            }
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::View;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(Store::new(Seed::builtin().unwrap()), &AppConfig::default())
    }

    #[test]
    fn starts_on_configured_view() {
        let mut config = AppConfig::default();
        config.ui.start_view = Some("kanban".into());
        let app = App::new(Store::new(Seed::builtin().unwrap()), &config);
        assert_eq!(app.view, View::Kanban);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn undo_and_redo_jump_to_changed_view() {
        let mut app = app();
        app.view = View::Kanban;
        assert!(app.store.move_task("101", TaskStatus::Done, None));
        app.view = View::Documents;

        app.undo();
        assert_eq!(app.view, View::Kanban);
        let task = task_ops::find_task(app.store.tasks(), "101").unwrap();
        assert_eq!(task.status, TaskStatus::Todo);

        app.view = View::Profile;
        app.redo();
        assert_eq!(app.view, View::Kanban);
        assert_eq!(app.lane(TaskStatus::Done).len(), 1);
    }

    #[test]
    fn undo_with_empty_history_keeps_view() {
        let mut app = app();
        app.view = View::Calendar;
        app.undo();
        assert_eq!(app.view, View::Calendar);
        assert_eq!(app.status.as_ref().unwrap().text, "Nothing to undo");
    }

    #[test]
    fn selected_task_follows_lane_cursor() {
        let mut app = app();
        assert_eq!(app.selected_task().unwrap().id, "101");
        app.kanban = KanbanState {
            lane: TaskStatus::InProgress,
            row: 0,
        };
        assert_eq!(app.selected_task().unwrap().id, "104");
        app.kanban.lane = TaskStatus::Done;
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn board_uses_move_preview() {
        let mut app = app();
        let preview =
            task_ops::move_task(app.store.tasks(), "101", TaskStatus::Done, None);
        app.move_state = Some(MoveState {
            task_id: "101".into(),
            preview,
        });
        assert_eq!(app.lane(TaskStatus::Done).len(), 1);
        // The store itself is untouched
        assert_eq!(task_ops::lane(app.store.tasks(), TaskStatus::Done).len(), 0);
    }

    #[test]
    fn focus_task_finds_lane_and_row() {
        let mut app = app();
        app.focus_task("103");
        assert_eq!(app.kanban, KanbanState { lane: TaskStatus::Todo, row: 2 });
        app.focus_task("104");
        assert_eq!(app.kanban, KanbanState { lane: TaskStatus::InProgress, row: 0 });
    }

    #[test]
    fn visible_files_follow_folder_and_query() {
        let mut app = app();
        assert_eq!(app.visible_files().len(), 10);
        app.docs.selected_folder = Some("f1".into());
        assert_eq!(app.visible_files().len(), 2);
        app.docs.selected_folder = None;
        app.docs.query = "zzz-no-match".into();
        assert!(app.visible_files().is_empty());
        assert!(app.selected_file().is_none());
    }

    #[test]
    fn cursor_folder_skips_all_files_row() {
        let mut app = app();
        assert_eq!(app.cursor_folder(), None);
        app.docs.folder_cursor = 1;
        assert_eq!(app.cursor_folder().as_deref(), Some(app.folder_rows()[0].folder_id.as_str()));
    }

    #[test]
    fn clamp_after_delete() {
        let mut app = app();
        app.kanban.row = 2;
        app.store.delete_task("103").unwrap();
        app.clamp_cursors();
        assert_eq!(app.kanban.row, 1);
    }

    #[test]
    fn undo_reports_label() {
        let mut app = app();
        app.undo();
        assert_eq!(app.status.as_ref().unwrap().text, "Nothing to undo");
        app.store.delete_task("101").unwrap();
        app.undo();
        assert_eq!(app.status.as_ref().unwrap().text, "Undid delete task");
        assert_eq!(app.store.tasks().len(), 4);
    }

    #[test]
    fn tick_turns_upload_into_file() {
        let mut app = app();
        app.uploads.enqueue("acta.pdf", 2048, Some("f2".into()), None);
        // pending -> uploading, 10 progress steps, -> processing, 3 processing ticks
        for _ in 0..20 {
            app.tick();
        }
        assert_eq!(app.store.files().len(), 11);
        let file = &app.store.files()[0];
        assert_eq!(file.name, "acta.pdf");
        assert_eq!(file.uploaded_by, app.profile.name);
        assert_eq!(app.uploads_in_flight(), 0);
    }

    #[test]
    fn picker_toggle_and_chosen_order() {
        let mut picker = Picker {
            kind: PickerKind::AssignProjects { user_id: "u1".into() },
            title: "Assign".into(),
            items: vec![("1".into(), "A".into()), ("2".into(), "B".into())],
            selected: HashSet::new(),
            cursor: 1,
        };
        picker.toggle();
        picker.cursor = 0;
        picker.toggle();
        assert_eq!(picker.chosen(), vec!["1".to_string(), "2".to_string()]);
        picker.toggle();
        assert_eq!(picker.chosen(), vec!["2".to_string()]);
    }
}
