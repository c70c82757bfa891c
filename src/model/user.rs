use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A collaborator invited to one or more projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
    pub invited_at: NaiveDateTime,
}

/// The signed-in account shown on the profile view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub organization: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Antonio García".into(),
            email: "antonio@atria.com".into(),
            organization: "Atria".into(),
        }
    }
}

impl Profile {
    /// Upper-cased first character of the name, used as an avatar
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}
