use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::document::{DocFile, Folder};
use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::model::user::CollaboratorUser;
use crate::ops::calendar::{WEEKDAY_LABELS, month_title};
use crate::ops::doc_ops::{self, Crumb};
use crate::ops::project_ops::{self, ProjectSummary};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LaneJson<'a> {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ProjectJson<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub tasks: usize,
    pub done: usize,
    pub files: usize,
}

#[derive(Serialize)]
pub struct CrumbJson {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileJson<'a> {
    #[serde(flatten)]
    pub file: &'a DocFile,
    pub type_label: String,
    pub size_label: String,
}

#[derive(Serialize)]
pub struct DocsJson<'a> {
    pub breadcrumbs: Vec<CrumbJson>,
    pub files: Vec<FileJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJson<'a> {
    #[serde(flatten)]
    pub user: &'a CollaboratorUser,
    pub project_names: Vec<&'a str>,
}

#[derive(Serialize)]
pub struct DayJson<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a str>,
}

#[derive(Serialize)]
pub struct CalendarJson<'a> {
    pub month: String,
    pub days: Vec<DayJson<'a>>,
}

pub fn project_to_json<'a>(project: &'a Project, summary: ProjectSummary) -> ProjectJson<'a> {
    ProjectJson {
        project,
        tasks: summary.tasks,
        done: summary.done,
        files: summary.files,
    }
}

pub fn file_to_json(file: &DocFile) -> FileJson<'_> {
    FileJson {
        file,
        type_label: doc_ops::file_type_label(&file.mime_type),
        size_label: doc_ops::format_file_size(file.size),
    }
}

pub fn crumbs_to_json(crumbs: Vec<Crumb>) -> Vec<CrumbJson> {
    crumbs
        .into_iter()
        .map(|c| CrumbJson {
            id: c.id,
            name: c.name,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One task as a single line: id, priority, title, date, project
pub fn format_task_line(task: &Task, project_name: Option<&str>) -> String {
    let project = project_name
        .map(|name| format!("  @{}", name))
        .unwrap_or_default();
    format!(
        "{:<6} [{}] {}  ({}){}",
        task.id,
        task.priority.as_str(),
        task.title,
        task.date.format("%Y-%m-%d %H:%M"),
        project
    )
}

pub fn format_lane_header(status: TaskStatus, count: usize) -> String {
    format!("== {} ({}) ==", status.label(), count)
}

/// The board, one block per lane, in list order within each lane
pub fn format_board(tasks: &[&Task], projects: &[Project], lanes: &[TaskStatus]) -> Vec<String> {
    let names = project_ops::project_name_map(projects);
    let mut lines = Vec::new();
    for (i, status) in lanes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let lane: Vec<&&Task> = tasks.iter().filter(|t| t.status == *status).collect();
        lines.push(format_lane_header(*status, lane.len()));
        if lane.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for task in lane {
            let project = task
                .project_id
                .as_deref()
                .and_then(|id| names.get(id).copied());
            lines.push(format!("  {}", format_task_line(task, project)));
        }
    }
    lines
}

/// Month grid with a task count next to each busy day. Days of the
/// neighbouring months are dimmed to `.`.
pub fn format_calendar(year: i32, month: u32, days: &IndexMap<NaiveDate, Vec<&Task>>) -> Vec<String> {
    let mut lines = vec![month_title(year, month), String::new()];
    lines.push(
        WEEKDAY_LABELS
            .iter()
            .map(|d| format!("{:<7}", d))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );
    let cells: Vec<String> = days
        .iter()
        .map(|(date, tasks)| {
            if date.month() != month {
                return format!("{:<7}", " .");
            }
            let count = if tasks.is_empty() {
                String::new()
            } else {
                format!("*{}", tasks.len())
            };
            format!("{:<7}", format!("{:>2}{}", date.day(), count))
        })
        .collect();
    for week in cells.chunks(7) {
        lines.push(week.concat().trim_end().to_string());
    }
    lines
}

pub fn format_project_line(project: &Project, summary: ProjectSummary) -> String {
    format!(
        "{:<4} {} [{}]  {} -> {}  tasks {}/{}  files {}  client: {}",
        project.id,
        project.name,
        project.status.label(),
        project.start_date,
        project.end_date,
        summary.done,
        summary.tasks,
        summary.files,
        project.client
    )
}

pub fn format_breadcrumbs(crumbs: &[Crumb]) -> String {
    crumbs
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn format_file_line(file: &DocFile, folders: &[Folder]) -> String {
    format!(
        "{:<8} {}  {}  {}  {}  {} {}",
        file.id,
        file.name,
        doc_ops::file_type_label(&file.mime_type),
        doc_ops::format_file_size(file.size),
        doc_ops::folder_name(folders, file.folder_id.as_deref()),
        file.uploaded_by,
        file.uploaded_at.format("%Y-%m-%d")
    )
}

pub fn format_user_line(user: &CollaboratorUser, project_names: &[&str]) -> String {
    let projects = if project_names.is_empty() {
        "no projects".to_string()
    } else {
        project_names.join(", ")
    };
    format!("{:<4} {} <{}>  {}", user.id, user.name, user.email, projects)
}
