use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::user::Profile;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme color overrides, e.g. `background = "#000000"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Priority badge overrides keyed by `urgent`, `medium`, `low`
    #[serde(default)]
    pub priority_colors: HashMap<String, String>,
    /// View shown at startup (`projects`, `kanban`, `calendar`, `documents`, `users`, `profile`)
    #[serde(default)]
    pub start_view: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Filter directive, e.g. `info` or `atria=debug`
    #[serde(default = "default_level")]
    pub level: String,
    /// Write logs to a file (always the case in TUI mode)
    #[serde(default = "default_true")]
    pub file: bool,
    /// Log directory; defaults to the platform data dir
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: default_level(),
            file: true,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Seed fixture to load instead of the built-in one
    #[serde(default)]
    pub seed: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".into()
}

/// Top-level screens of the dashboard, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Projects,
    Kanban,
    Calendar,
    Documents,
    Users,
    Profile,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Projects,
        View::Kanban,
        View::Calendar,
        View::Documents,
        View::Users,
        View::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Projects => "Projects",
            View::Kanban => "Tasks",
            View::Calendar => "Calendar",
            View::Documents => "Documents",
            View::Users => "Users",
            View::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projects" => Ok(View::Projects),
            "kanban" | "tasks" => Ok(View::Kanban),
            "calendar" => Ok(View::Calendar),
            "documents" | "docs" => Ok(View::Documents),
            "users" => Ok(View::Users),
            "profile" => Ok(View::Profile),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

impl UiConfig {
    /// The configured start view, falling back to projects
    pub fn start_view(&self) -> View {
        self.start_view
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(View::Projects)
    }
}
