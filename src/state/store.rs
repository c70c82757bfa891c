use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::model::document::{DocFile, FileStatus, Folder};
use crate::model::project::{Project, ProjectDraft};
use crate::model::seed::Seed;
use crate::model::task::{Task, TaskDraft, TaskStatus};
use crate::model::user::CollaboratorUser;
use crate::ops::doc_ops::{self, DocError};
use crate::ops::project_ops::{self, ProjectError};
use crate::ops::task_ops::{self, MoveDirection, TaskError};
use crate::ops::upload::CompletedUpload;
use crate::ops::user_ops::{self, Invite, InviteError};

use super::history::{Entry, History, Scope};
use super::ids::IdGen;

/// Any failure from a store update
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Doc(#[from] DocError),
    #[error(transparent)]
    User(#[from] InviteError),
}

/// Owner of every collection the dashboard shows.
///
/// All mutations go through [`Store::batch`]: the closure edits a draft copy,
/// and the draft replaces the live collections in one step only when the
/// closure succeeds. Each committed batch that changes something records an
/// undo snapshot and bumps [`Store::revision`].
#[derive(Debug)]
pub struct Store {
    data: Seed,
    revision: u64,
    history: History,
    ids: IdGen,
}

impl Store {
    pub fn new(seed: Seed) -> Self {
        let ids = IdGen::starting_at(max_numeric_id(&seed));
        Store {
            data: seed,
            revision: 0,
            history: History::new(),
            ids,
        }
    }

    pub fn data(&self) -> &Seed {
        &self.data
    }

    pub fn projects(&self) -> &[Project] {
        &self.data.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    pub fn folders(&self) -> &[Folder] {
        &self.data.folders
    }

    pub fn files(&self) -> &[DocFile] {
        &self.data.files
    }

    pub fn users(&self) -> &[CollaboratorUser] {
        &self.data.users
    }

    /// Incremented on every committed change, undo and redo
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Label of the change `undo` would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.history.peek_undo().map(|entry| entry.label)
    }

    /// Run `edit` against a draft of the collections and commit it on success.
    /// On error the live collections are untouched.
    pub fn batch<T, E>(
        &mut self,
        label: &'static str,
        scope: Scope,
        edit: impl FnOnce(&mut Seed, &mut IdGen) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut draft = self.data.clone();
        let out = edit(&mut draft, &mut self.ids)?;
        if draft != self.data {
            let previous = std::mem::replace(&mut self.data, draft);
            self.history.push(Entry {
                label,
                scope,
                snapshot: previous,
            });
            self.revision += 1;
            debug!(label, revision = self.revision, "batch committed");
        }
        Ok(out)
    }

    /// Restore the state before the last batch
    pub fn undo(&mut self) -> Option<(&'static str, Scope)> {
        let current = self.data.clone();
        let entry = self.history.undo(current)?;
        self.data = entry.snapshot;
        self.revision += 1;
        debug!(label = entry.label, revision = self.revision, "undo");
        Some((entry.label, entry.scope))
    }

    pub fn redo(&mut self) -> Option<(&'static str, Scope)> {
        let current = self.data.clone();
        let entry = self.history.redo(current)?;
        self.data = entry.snapshot;
        self.revision += 1;
        debug!(label = entry.label, revision = self.revision, "redo");
        Some((entry.label, entry.scope))
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Returns the new task's id
    pub fn create_task(&mut self, draft: TaskDraft) -> Result<String, StoreError> {
        self.batch("create task", Scope::Tasks, |data, ids| {
            let id = ids.task();
            data.tasks = task_ops::create_task(&data.tasks, Task::from_draft(id.clone(), draft));
            Ok(id)
        })
    }

    /// Returns whether the board changed
    pub fn move_task(&mut self, task_id: &str, status: TaskStatus, before: Option<&str>) -> bool {
        let before_rev = self.revision;
        let _ = self.batch("move task", Scope::Tasks, |data, _| {
            data.tasks = task_ops::move_task(&data.tasks, task_id, status, before);
            Ok::<_, StoreError>(())
        });
        self.revision != before_rev
    }

    pub fn neighbor_move(&mut self, task_id: &str, direction: MoveDirection) -> bool {
        let before_rev = self.revision;
        let _ = self.batch("move task", Scope::Tasks, |data, _| {
            data.tasks = task_ops::neighbor_move(&data.tasks, task_id, direction);
            Ok::<_, StoreError>(())
        });
        self.revision != before_rev
    }

    /// Replace the whole task list with an already-reordered one, e.g. the
    /// result of a keyboard drag that is dropped as a single change
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let _ = self.batch("move task", Scope::Tasks, |data, _| {
            data.tasks = tasks;
            Ok::<_, StoreError>(())
        });
    }

    pub fn update_task(&mut self, task_id: &str, draft: TaskDraft) -> Result<(), StoreError> {
        self.batch("edit task", Scope::Tasks, |data, _| {
            let task = Task::from_draft(task_id.to_string(), draft);
            data.tasks = task_ops::update_task(&data.tasks, task)?;
            Ok(())
        })
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<(), StoreError> {
        self.batch("delete task", Scope::Tasks, |data, _| {
            data.tasks = task_ops::delete_task(&data.tasks, task_id)?;
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub fn create_project(&mut self, draft: ProjectDraft) -> Result<String, StoreError> {
        self.batch("create project", Scope::Projects, |data, ids| {
            let id = ids.project();
            data.projects =
                project_ops::create_project(&data.projects, Project::from_draft(id.clone(), draft));
            Ok(id)
        })
    }

    pub fn update_project(&mut self, project_id: &str, draft: ProjectDraft) -> Result<(), StoreError> {
        self.batch("edit project", Scope::Projects, |data, _| {
            let project = Project::from_draft(project_id.to_string(), draft);
            data.projects = project_ops::update_project(&data.projects, project)?;
            Ok(())
        })
    }

    /// Removes the project and clears task references to it
    pub fn delete_project(&mut self, project_id: &str) -> Result<(), StoreError> {
        self.batch("delete project", Scope::Projects, |data, _| {
            let (projects, tasks) =
                project_ops::delete_project(&data.projects, &data.tasks, project_id)?;
            data.projects = projects;
            data.tasks = tasks;
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    pub fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String, StoreError> {
        self.batch("create folder", Scope::Documents, |data, ids| {
            let folder = Folder {
                id: ids.folder(),
                name: name.trim().to_string(),
                parent_id: parent_id.map(String::from),
                created_at: now(),
            };
            let id = folder.id.clone();
            data.folders = doc_ops::create_folder(&data.folders, folder)?;
            Ok(id)
        })
    }

    pub fn rename_file(&mut self, file_id: &str, name: &str) -> Result<(), StoreError> {
        self.batch("rename file", Scope::Documents, |data, _| {
            data.files = doc_ops::rename_file(&data.files, file_id, name)?;
            Ok(())
        })
    }

    pub fn delete_file(&mut self, file_id: &str) -> Result<(), StoreError> {
        self.batch("delete file", Scope::Documents, |data, _| {
            data.files = doc_ops::delete_file(&data.files, file_id)?;
            Ok(())
        })
    }

    pub fn link_files(&mut self, file_ids: &[String], project_id: &str) -> Result<(), StoreError> {
        self.batch("link files", Scope::Documents, |data, _| {
            if project_ops::find_project(&data.projects, project_id).is_none() {
                return Err(ProjectError::NotFound(project_id.to_string()).into());
            }
            data.files = doc_ops::link_files(&data.files, file_ids, project_id);
            Ok(())
        })
    }

    pub fn unlink_file(&mut self, file_id: &str, project_id: &str) -> Result<(), StoreError> {
        self.batch("unlink file", Scope::Documents, |data, _| {
            data.files = doc_ops::unlink_file(&data.files, file_id, project_id)?;
            Ok(())
        })
    }

    /// Store a finished upload as a ready file. Returns the file id.
    pub fn add_uploaded_file(&mut self, upload: CompletedUpload, uploaded_by: &str) -> String {
        let result = self.batch("upload file", Scope::Documents, |data, ids| {
            let file = DocFile {
                id: ids.file(),
                name: upload.name,
                folder_id: upload.folder_id,
                mime_type: upload.mime_type,
                size: upload.size,
                uploaded_by: uploaded_by.to_string(),
                uploaded_at: now(),
                status: FileStatus::Ready,
                project_ids: upload.project_id.into_iter().collect(),
            };
            let id = file.id.clone();
            data.files = doc_ops::add_file(&data.files, file);
            Ok::<_, StoreError>(id)
        });
        result.unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------------

    pub fn invite_user(&mut self, invite: Invite) -> Result<String, StoreError> {
        self.batch("invite user", Scope::Users, |data, ids| {
            let id = ids.user();
            data.users = user_ops::invite_user(&data.users, invite, id.clone(), now());
            Ok(id)
        })
    }

    pub fn assign_projects(&mut self, user_id: &str, project_ids: &[String]) -> Result<(), StoreError> {
        self.batch("assign projects", Scope::Users, |data, _| {
            data.users = user_ops::assign_projects(&data.users, user_id, project_ids)?;
            Ok(())
        })
    }

    pub fn remove_user_from_project(&mut self, user_id: &str, project_id: &str) -> Result<(), StoreError> {
        self.batch("remove from project", Scope::Users, |data, _| {
            data.users = user_ops::remove_from_project(&data.users, user_id, project_id)?;
            Ok(())
        })
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Largest timestamp embedded in an existing id, so new ids sort after them
fn max_numeric_id(seed: &Seed) -> i64 {
    let tasks = seed.tasks.iter().map(|t| t.id.as_str());
    let projects = seed.projects.iter().map(|p| p.id.as_str());
    let folders = seed.folders.iter().filter_map(|f| f.id.strip_prefix('f'));
    let files = seed.files.iter().filter_map(|f| f.id.strip_prefix("file"));
    let users = seed.users.iter().filter_map(|u| u.id.strip_prefix('u'));
    tasks
        .chain(projects)
        .chain(folders)
        .chain(files)
        .chain(users)
        .filter_map(|id| id.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use pretty_assertions::assert_eq;

    fn store() -> Store {
        Store::new(Seed::builtin().unwrap())
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            status: TaskStatus::Done,
            date: NaiveDateTime::parse_from_str("2026-02-20 09:00", "%Y-%m-%d %H:%M").unwrap(),
            priority: Priority::Low,
            project_id: Some("1".into()),
        }
    }

    fn task_ids(store: &Store) -> Vec<&str> {
        store.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn new_ids_sort_after_existing_ones() {
        let mut seed = Seed::builtin().unwrap();
        let far_future = Local::now().timestamp_millis() + 1_000_000;
        seed.tasks[0].id = far_future.to_string();
        let mut store = Store::new(seed);
        let id = store.create_task(draft("Later")).unwrap();
        assert_eq!(id, (far_future + 1).to_string());
    }

    #[test]
    fn undo_label_names_last_change() {
        let mut store = store();
        assert_eq!(store.undo_label(), None);
        store.create_task(draft("Inspect")).unwrap();
        assert_eq!(store.undo_label(), Some("create task"));
        store.delete_task("101").unwrap();
        assert_eq!(store.undo_label(), Some("delete task"));
        store.undo();
        assert_eq!(store.undo_label(), Some("create task"));
    }

    #[test]
    fn batch_commits_and_bumps_revision() {
        let mut store = store();
        let id = store.create_task(draft("Inspect")).unwrap();
        assert_eq!(store.revision(), 1);
        assert_eq!(store.tasks()[0].id, id);
        assert!(store.can_undo());
    }

    #[test]
    fn failed_batch_changes_nothing() {
        let mut store = store();
        let before = store.data().clone();
        let result: Result<(), StoreError> = store.batch("two step", Scope::Tasks, |data, _| {
            data.tasks.clear();
            Err(TaskError::NotFound("x".into()).into())
        });
        assert!(result.is_err());
        assert_eq!(store.data(), &before);
        assert_eq!(store.revision(), 0);
        assert!(!store.can_undo());
    }

    #[test]
    fn unchanged_batch_is_not_recorded() {
        let mut store = store();
        assert!(!store.move_task("nope", TaskStatus::Done, None));
        assert_eq!(store.revision(), 0);
        assert!(!store.can_undo());
    }

    #[test]
    fn move_then_undo_restores_order() {
        let mut store = store();
        let before: Vec<String> = task_ids(&store).into_iter().map(String::from).collect();
        assert!(store.move_task("103", TaskStatus::Todo, Some("101")));
        assert_eq!(task_ids(&store), vec!["103", "101", "102", "104"]);

        assert_eq!(store.undo(), Some(("move task", Scope::Tasks)));
        assert_eq!(task_ids(&store), before);

        store.redo();
        assert_eq!(task_ids(&store), vec!["103", "101", "102", "104"]);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn delete_project_clears_task_reference() {
        let mut store = store();
        store.delete_project("2").unwrap();
        let task = store.tasks().iter().find(|t| t.id == "104").unwrap();
        assert_eq!(task.project_id, None);
        // Files keep their dangling ids
        let file = store.files().iter().find(|f| f.id == "file2").unwrap();
        assert_eq!(file.project_ids, vec!["2".to_string()]);
    }

    #[test]
    fn update_missing_task_errors() {
        let mut store = store();
        assert_eq!(
            store.update_task("nope", draft("x")),
            Err(StoreError::Task(TaskError::NotFound("nope".into())))
        );
    }

    #[test]
    fn documents_round() {
        let mut store = store();
        let folder = store.create_folder("Permisos", Some("f1")).unwrap();
        assert!(folder.starts_with('f'));
        assert_eq!(store.folders()[0].parent_id.as_deref(), Some("f1"));

        store.rename_file("file9", "Nota.docx").unwrap();
        store.link_files(&["file9".into()], "3").unwrap();
        assert!(store.link_files(&["file9".into()], "404").is_err());
        store.unlink_file("file9", "3").unwrap();
        store.delete_file("file9").unwrap();
        assert!(store.files().iter().all(|f| f.id != "file9"));

        let id = store.add_uploaded_file(
            CompletedUpload {
                name: "Foto.jpg".into(),
                mime_type: "image/jpeg".into(),
                size: 10,
                folder_id: Some("f3".into()),
                project_id: Some("1".into()),
            },
            "Antonio García",
        );
        assert!(id.starts_with("file"));
        let file = &store.files()[0];
        assert_eq!(file.status, FileStatus::Ready);
        assert_eq!(file.project_ids, vec!["1".to_string()]);
    }

    #[test]
    fn collaborators_round() {
        let mut store = store();
        let invite = user_ops::validate_invite("Ana", "ana@atria.com", &[]).unwrap();
        let id = store.invite_user(invite).unwrap();
        assert!(id.starts_with('u'));
        store.assign_projects(&id, &["1".into(), "2".into()]).unwrap();
        store.remove_user_from_project(&id, "1").unwrap();
        assert_eq!(store.users()[0].project_ids, vec!["2".to_string()]);

        // Three batches, three undos back to the fixture
        for _ in 0..3 {
            store.undo();
        }
        assert_eq!(store.users().len(), 5);
    }
}
