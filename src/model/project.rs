use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Pending,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::InProgress,
        ProjectStatus::Pending,
        ProjectStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Pending => "pending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Pending => "Pending",
        }
    }

    /// Cycle through statuses in `ALL` order (form field toggling)
    pub fn cycle(self) -> ProjectStatus {
        match self {
            ProjectStatus::InProgress => ProjectStatus::Pending,
            ProjectStatus::Pending => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::InProgress,
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(ProjectStatus::Completed),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "pending" => Ok(ProjectStatus::Pending),
            other => Err(format!("unknown project status '{}'", other)),
        }
    }
}

/// A client project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub client: String,
    pub description: String,
}

/// Everything a project has except its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub client: String,
    pub description: String,
}

impl Project {
    pub fn from_draft(id: String, draft: ProjectDraft) -> Self {
        Project {
            id,
            name: draft.name,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            client: draft.client,
            description: draft.description,
        }
    }
}
