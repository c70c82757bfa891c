use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "atria", about = concat!("atria v", env!("CARGO_PKG_VERSION"), " - projects, tasks and documents in the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Load collections from this fixture instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the task board, lane by lane
    Tasks(TasksArgs),
    /// Move a task and print the resulting board (nothing is saved)
    Mv(MvArgs),
    /// Show a month of scheduled tasks
    Calendar(CalendarArgs),
    /// List projects with task and file counts
    Projects,
    /// Browse documents
    Docs(DocsArgs),
    /// List collaborators and their projects
    Users,
    /// Validate fixture integrity
    Check,
    /// Print the built-in fixture as JSON
    Seed,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Only this lane (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Only tasks of this project ID
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Target lane (todo, in-progress, done)
    pub status: String,
    /// Drop in front of this task ID
    #[arg(long)]
    pub before: Option<String>,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show as YYYY-MM (default: current month)
    #[arg(long)]
    pub month: Option<String>,
}

#[derive(Args)]
pub struct DocsArgs {
    /// Folder ID to browse (default: all files)
    #[arg(long)]
    pub folder: Option<String>,
    /// Case-insensitive file name filter
    #[arg(long)]
    pub search: Option<String>,
    /// Only this MIME type
    #[arg(long = "type")]
    pub mime_type: Option<String>,
}
