use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::document::DocFile;
use crate::model::project::{Project, ProjectDraft, ProjectStatus};
use crate::model::task::{Task, TaskStatus};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("name is required")]
    NameRequired,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("end date is before start date")]
    EndBeforeStart,
}

/// Prepend a new project (newest first)
pub fn create_project(projects: &[Project], project: Project) -> Vec<Project> {
    let mut out = Vec::with_capacity(projects.len() + 1);
    out.push(project);
    out.extend_from_slice(projects);
    out
}

pub fn update_project(projects: &[Project], updated: Project) -> Result<Vec<Project>, ProjectError> {
    let idx = projects
        .iter()
        .position(|p| p.id == updated.id)
        .ok_or_else(|| ProjectError::NotFound(updated.id.clone()))?;
    let mut out = projects.to_vec();
    out[idx] = updated;
    Ok(out)
}

/// Remove a project and clear every task reference to it.
///
/// Files and collaborators keep their ids; lookups through
/// [`project_name_map`] simply skip ids that no longer resolve.
pub fn delete_project(
    projects: &[Project],
    tasks: &[Task],
    project_id: &str,
) -> Result<(Vec<Project>, Vec<Task>), ProjectError> {
    if !projects.iter().any(|p| p.id == project_id) {
        return Err(ProjectError::NotFound(project_id.to_string()));
    }
    let remaining = projects
        .iter()
        .filter(|p| p.id != project_id)
        .cloned()
        .collect();
    let unlinked = tasks
        .iter()
        .map(|t| {
            if t.project_id.as_deref() == Some(project_id) {
                Task {
                    project_id: None,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();
    Ok((remaining, unlinked))
}

pub fn find_project<'a>(projects: &'a [Project], project_id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == project_id)
}

/// Id → name lookup for resolving weak references
pub fn project_name_map(projects: &[Project]) -> HashMap<&str, &str> {
    projects
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect()
}

/// Resolve a list of project ids to names, skipping dangling ids
pub fn project_names<'a>(projects: &'a [Project], ids: &[String]) -> Vec<&'a str> {
    ids.iter()
        .filter_map(|id| find_project(projects, id).map(|p| p.name.as_str()))
        .collect()
}

/// Counts shown on a project's detail panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectSummary {
    pub tasks: usize,
    pub done: usize,
    pub files: usize,
}

pub fn project_summary(project_id: &str, tasks: &[Task], files: &[DocFile]) -> ProjectSummary {
    let project_tasks = tasks
        .iter()
        .filter(|t| t.project_id.as_deref() == Some(project_id));
    let (total, done) = project_tasks.fold((0, 0), |(total, done), t| {
        (total + 1, done + usize::from(t.status == TaskStatus::Done))
    });
    ProjectSummary {
        tasks: total,
        done,
        files: files
            .iter()
            .filter(|f| f.project_ids.iter().any(|id| id == project_id))
            .count(),
    }
}

/// Number of projects in each status, in `ProjectStatus::ALL` order
pub fn status_counts(projects: &[Project]) -> [(ProjectStatus, usize); 3] {
    ProjectStatus::ALL.map(|s| (s, projects.iter().filter(|p| p.status == s).count()))
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

/// Raw form values for the project drawer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInput {
    pub name: String,
    pub client: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
    pub description: String,
}

impl Default for ProjectInput {
    fn default() -> Self {
        ProjectInput {
            name: String::new(),
            client: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            status: ProjectStatus::Pending,
            description: String::new(),
        }
    }
}

impl ProjectInput {
    pub fn from_project(project: &Project) -> Self {
        ProjectInput {
            name: project.name.clone(),
            client: project.client.clone(),
            start_date: project.start_date.format("%Y-%m-%d").to_string(),
            end_date: project.end_date.format("%Y-%m-%d").to_string(),
            status: project.status,
            description: project.description.clone(),
        }
    }
}

pub fn validate_project_input(input: &ProjectInput) -> Result<ProjectDraft, ProjectError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ProjectError::NameRequired);
    }
    let start_date = parse_day(&input.start_date)?;
    let end_date = parse_day(&input.end_date)?;
    if end_date < start_date {
        return Err(ProjectError::EndBeforeStart);
    }
    Ok(ProjectDraft {
        name: name.to_string(),
        status: input.status,
        start_date,
        end_date,
        client: input.client.trim().to_string(),
        description: input.description.trim().to_string(),
    })
}

fn parse_day(s: &str) -> Result<NaiveDate, ProjectError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ProjectError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seed;
    use pretty_assertions::assert_eq;

    fn seed() -> Seed {
        Seed::builtin().unwrap()
    }

    #[test]
    fn test_delete_project_unlinks_tasks() {
        let seed = seed();
        let (projects, tasks) = delete_project(&seed.projects, &seed.tasks, "5").unwrap();
        assert_eq!(projects.len(), 9);
        assert!(find_project(&projects, "5").is_none());
        let review = tasks.iter().find(|t| t.id == "101").unwrap();
        assert_eq!(review.project_id, None);
        // Other references untouched
        let delivery = tasks.iter().find(|t| t.id == "102").unwrap();
        assert_eq!(delivery.project_id.as_deref(), Some("6"));
    }

    #[test]
    fn test_delete_missing_project() {
        let seed = seed();
        assert_eq!(
            delete_project(&seed.projects, &seed.tasks, "404").unwrap_err(),
            ProjectError::NotFound("404".into())
        );
    }

    #[test]
    fn test_project_names_skip_dangling() {
        let seed = seed();
        let names = project_names(&seed.projects, &["1".into(), "gone".into(), "6".into()]);
        assert_eq!(names, vec!["PARQUE CHACON 1", "PARQUE LA PILA"]);
    }

    #[test]
    fn test_project_summary() {
        let seed = seed();
        let summary = project_summary("1", &seed.tasks, &seed.files);
        assert_eq!(summary.tasks, 0);
        assert_eq!(summary.files, 5);
        let summary = project_summary("2", &seed.tasks, &seed.files);
        assert_eq!(summary.tasks, 1);
        assert_eq!(summary.done, 0);
    }

    #[test]
    fn test_create_and_update() {
        let seed = seed();
        let mut input = ProjectInput {
            name: " New park ".into(),
            start_date: "2026-05-01".into(),
            end_date: "2026-06-01".into(),
            ..Default::default()
        };
        let draft = validate_project_input(&input).unwrap();
        let created = create_project(&seed.projects, Project::from_draft("99".into(), draft));
        assert_eq!(created[0].id, "99");
        assert_eq!(created[0].name, "New park");

        input.status = ProjectStatus::Completed;
        let draft = validate_project_input(&input).unwrap();
        let updated = update_project(&created, Project::from_draft("99".into(), draft)).unwrap();
        assert_eq!(updated[0].status, ProjectStatus::Completed);
        assert_eq!(updated.len(), created.len());
    }

    #[test]
    fn test_validate_project_input() {
        let mut input = ProjectInput::default();
        assert_eq!(validate_project_input(&input), Err(ProjectError::NameRequired));
        input.name = "X".into();
        input.start_date = "2026-13-01".into();
        assert_eq!(
            validate_project_input(&input),
            Err(ProjectError::InvalidDate("2026-13-01".into()))
        );
        input.start_date = "2026-04-01".into();
        input.end_date = "2026-03-01".into();
        assert_eq!(validate_project_input(&input), Err(ProjectError::EndBeforeStart));
    }

    #[test]
    fn test_status_counts() {
        let seed = seed();
        assert_eq!(
            status_counts(&seed.projects),
            [
                (ProjectStatus::InProgress, 5),
                (ProjectStatus::Pending, 3),
                (ProjectStatus::Completed, 2)
            ]
        );
    }
}
