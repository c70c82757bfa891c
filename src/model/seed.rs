use serde::{Deserialize, Serialize};

use super::document::{DocFile, Folder};
use super::project::Project;
use super::task::Task;
use super::user::CollaboratorUser;

/// The fixture shipped inside the binary
pub const BUILTIN_SEED: &str = include_str!("../data/seed.json");

/// Initial collections the dashboard starts from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<DocFile>,
    #[serde(default)]
    pub users: Vec<CollaboratorUser>,
}

impl Seed {
    /// Parse the built-in fixture
    pub fn builtin() -> Result<Seed, serde_json::Error> {
        serde_json::from_str(BUILTIN_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_seed_parses() {
        let seed = Seed::builtin().unwrap();
        assert_eq!(seed.projects.len(), 10);
        assert_eq!(seed.tasks.len(), 4);
        assert_eq!(seed.folders.len(), 5);
        assert_eq!(seed.files.len(), 10);
        assert_eq!(seed.users.len(), 5);
    }

    #[test]
    fn test_builtin_seed_nested_folder() {
        let seed = Seed::builtin().unwrap();
        let legal = seed.folders.iter().find(|f| f.id == "f5").unwrap();
        assert_eq!(legal.parent_id.as_deref(), Some("f1"));
    }
}
