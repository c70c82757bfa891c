use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::seed::Seed;

/// Structured result from `atria check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A fixture error (the data cannot be shown faithfully).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears more than once in one collection
    #[serde(rename = "duplicate_id")]
    DuplicateId {
        collection: &'static str,
        id: String,
        count: usize,
    },
    /// Following `parentId` from this folder leads back to it
    #[serde(rename = "folder_cycle")]
    FolderCycle { folder_id: String },
}

/// A dangling weak reference. Views skip these, so they are not fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    #[serde(rename = "task_project")]
    TaskProject { task_id: String, project_id: String },
    #[serde(rename = "file_folder")]
    FileFolder { file_id: String, folder_id: String },
    #[serde(rename = "file_project")]
    FileProject { file_id: String, project_id: String },
    #[serde(rename = "user_project")]
    UserProject { user_id: String, project_id: String },
    #[serde(rename = "folder_parent")]
    FolderParent { folder_id: String, parent_id: String },
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::DuplicateId {
                collection,
                id,
                count,
            } => write!(f, "duplicate {} id '{}' ({} times)", collection, id, count),
            CheckError::FolderCycle { folder_id } => {
                write!(f, "folder '{}' is its own ancestor", folder_id)
            }
        }
    }
}

impl std::fmt::Display for CheckWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckWarning::TaskProject {
                task_id,
                project_id,
            } => write!(f, "task '{}' references missing project '{}'", task_id, project_id),
            CheckWarning::FileFolder { file_id, folder_id } => {
                write!(f, "file '{}' references missing folder '{}'", file_id, folder_id)
            }
            CheckWarning::FileProject {
                file_id,
                project_id,
            } => write!(f, "file '{}' references missing project '{}'", file_id, project_id),
            CheckWarning::UserProject {
                user_id,
                project_id,
            } => write!(f, "user '{}' references missing project '{}'", user_id, project_id),
            CheckWarning::FolderParent {
                folder_id,
                parent_id,
            } => write!(f, "folder '{}' references missing parent '{}'", folder_id, parent_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a fixture and return structured results.
///
/// Checks performed:
/// 1. No duplicate ids within a collection
/// 2. No folder is its own ancestor
/// 3. Warnings for every weak reference that does not resolve
pub fn check(seed: &Seed) -> CheckReport {
    let mut report = CheckReport::default();

    push_duplicates("project", seed.projects.iter().map(|p| p.id.as_str()), &mut report);
    push_duplicates("task", seed.tasks.iter().map(|t| t.id.as_str()), &mut report);
    push_duplicates("folder", seed.folders.iter().map(|f| f.id.as_str()), &mut report);
    push_duplicates("file", seed.files.iter().map(|f| f.id.as_str()), &mut report);
    push_duplicates("user", seed.users.iter().map(|u| u.id.as_str()), &mut report);

    let project_ids: HashSet<&str> = seed.projects.iter().map(|p| p.id.as_str()).collect();
    let folder_ids: HashSet<&str> = seed.folders.iter().map(|f| f.id.as_str()).collect();

    for folder in &seed.folders {
        if let Some(parent) = folder.parent_id.as_deref()
            && !folder_ids.contains(parent)
        {
            report.warnings.push(CheckWarning::FolderParent {
                folder_id: folder.id.clone(),
                parent_id: parent.to_string(),
            });
        }
    }
    for folder_id in find_folder_cycles(seed) {
        report.errors.push(CheckError::FolderCycle { folder_id });
    }

    for task in &seed.tasks {
        if let Some(project) = task.project_id.as_deref()
            && !project_ids.contains(project)
        {
            report.warnings.push(CheckWarning::TaskProject {
                task_id: task.id.clone(),
                project_id: project.to_string(),
            });
        }
    }

    for file in &seed.files {
        if let Some(folder) = file.folder_id.as_deref()
            && !folder_ids.contains(folder)
        {
            report.warnings.push(CheckWarning::FileFolder {
                file_id: file.id.clone(),
                folder_id: folder.to_string(),
            });
        }
        for project in &file.project_ids {
            if !project_ids.contains(project.as_str()) {
                report.warnings.push(CheckWarning::FileProject {
                    file_id: file.id.clone(),
                    project_id: project.clone(),
                });
            }
        }
    }

    for user in &seed.users {
        for project in &user.project_ids {
            if !project_ids.contains(project.as_str()) {
                report.warnings.push(CheckWarning::UserProject {
                    user_id: user.id.clone(),
                    project_id: project.clone(),
                });
            }
        }
    }

    report.valid = report.errors.is_empty();
    report
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn push_duplicates<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
    report: &mut CheckReport,
) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    for (id, count) in counts {
        if count > 1 {
            report.errors.push(CheckError::DuplicateId {
                collection,
                id: id.to_string(),
                count,
            });
        }
    }
}

/// Folders that reach themselves by following `parent_id`, in list order
fn find_folder_cycles(seed: &Seed) -> Vec<String> {
    let parents: IndexMap<&str, Option<&str>> = seed
        .folders
        .iter()
        .map(|f| (f.id.as_str(), f.parent_id.as_deref()))
        .collect();

    let mut cyclic = Vec::new();
    for &start in parents.keys() {
        let mut seen = HashSet::new();
        let mut current = parents.get(start).copied().flatten();
        while let Some(id) = current {
            if id == start {
                cyclic.push(start.to_string());
                break;
            }
            // Entered a cycle that does not include `start`
            if !seen.insert(id) {
                break;
            }
            current = parents.get(id).copied().flatten();
        }
    }
    cyclic
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Folder;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn seed() -> Seed {
        Seed::builtin().unwrap()
    }

    fn folder(id: &str, parent: Option<&str>) -> Folder {
        Folder {
            id: id.into(),
            name: id.to_uppercase(),
            parent_id: parent.map(String::from),
            created_at: NaiveDateTime::parse_from_str("2026-01-05 10:00", "%Y-%m-%d %H:%M")
                .unwrap(),
        }
    }

    #[test]
    fn test_builtin_fixture_is_clean() {
        let report = check(&seed());
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut seed = seed();
        let dup = seed.tasks[0].clone();
        seed.tasks.push(dup);
        let report = check(&seed);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![CheckError::DuplicateId {
                collection: "task",
                id: "101".into(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_folder_cycle() {
        let mut seed = seed();
        seed.folders = vec![
            folder("a", Some("b")),
            folder("b", Some("a")),
            folder("c", Some("a")),
        ];
        seed.files.clear();
        let report = check(&seed);
        assert_eq!(
            report.errors,
            vec![
                CheckError::FolderCycle {
                    folder_id: "a".into()
                },
                CheckError::FolderCycle {
                    folder_id: "b".into()
                },
            ]
        );
    }

    #[test]
    fn test_dangling_references_warn() {
        let mut seed = seed();
        seed.tasks[0].project_id = Some("404".into());
        seed.files[0].folder_id = Some("gone".into());
        seed.files[1].project_ids.push("405".into());
        seed.users[0].project_ids.push("406".into());
        seed.folders.push(folder("f9", Some("nowhere")));
        let report = check(&seed);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 5);
        assert!(report.warnings.contains(&CheckWarning::TaskProject {
            task_id: "101".into(),
            project_id: "404".into(),
        }));
        assert!(report.warnings.contains(&CheckWarning::FolderParent {
            folder_id: "f9".into(),
            parent_id: "nowhere".into(),
        }));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut seed = seed();
        seed.users[0].project_ids.push("406".into());
        let json = serde_json::to_value(check(&seed)).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["warnings"][0]["type"], "user_project");
        assert_eq!(json["warnings"][0]["project_id"], "406");
    }

    #[test]
    fn test_display_messages() {
        let err = CheckError::FolderCycle {
            folder_id: "f1".into(),
        };
        assert_eq!(err.to_string(), "folder 'f1' is its own ancestor");
    }
}
