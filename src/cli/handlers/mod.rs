use std::path::Path;

use chrono::{Datelike, Local};
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::seed_io;
use crate::model::seed::{BUILTIN_SEED, Seed};
use crate::model::task::{Task, TaskStatus};
use crate::ops::{calendar, check, doc_ops, project_ops, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand. `seed_path` is already resolved from `--seed` and
/// `[data] seed`; `None` means the built-in fixture.
pub fn dispatch(cli: Cli, seed_path: Option<&Path>) -> CmdResult {
    let Cli { command, json, .. } = cli;
    let Some(cmd) = command else {
        return Err("no subcommand given (try `atria --help`)".into());
    };

    // `seed` prints the embedded fixture verbatim and needs nothing loaded
    if let Commands::Seed = cmd {
        print!("{}", BUILTIN_SEED);
        return Ok(());
    }

    let seed = seed_io::load_seed(seed_path)?;
    match cmd {
        Commands::Tasks(args) => cmd_tasks(&seed, args, json),
        Commands::Mv(args) => cmd_mv(seed, args, json),
        Commands::Calendar(args) => cmd_calendar(&seed, args, json),
        Commands::Projects => cmd_projects(&seed, json),
        Commands::Docs(args) => cmd_docs(&seed, args, json),
        Commands::Users => cmd_users(&seed, json),
        Commands::Check => cmd_check(&seed, json),
        Commands::Seed => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_status(s: &str) -> Result<TaskStatus, Box<dyn std::error::Error>> {
    s.parse::<TaskStatus>().map_err(Box::<dyn std::error::Error>::from)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_board(seed: &Seed, tasks: &[&Task], lanes: &[TaskStatus], json: bool) -> CmdResult {
    if json {
        let board: Vec<LaneJson> = lanes
            .iter()
            .map(|status| LaneJson {
                status: *status,
                label: status.label(),
                tasks: tasks.iter().copied().filter(|t| t.status == *status).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_lines(&format_board(tasks, &seed.projects, lanes));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_tasks(seed: &Seed, args: TasksArgs, json: bool) -> CmdResult {
    let lanes = match args.status.as_deref() {
        Some(s) => vec![parse_status(s)?],
        None => TaskStatus::ALL.to_vec(),
    };
    let tasks: Vec<&Task> = match args.project.as_deref() {
        Some(project_id) => task_ops::tasks_for_project(&seed.tasks, project_id),
        None => seed.tasks.iter().collect(),
    };
    print_board(seed, &tasks, &lanes, json)
}

fn cmd_mv(mut seed: Seed, args: MvArgs, json: bool) -> CmdResult {
    let status = parse_status(&args.status)?;
    if task_ops::find_task(&seed.tasks, &args.id).is_none() {
        return Err(format!("task not found: {}", args.id).into());
    }
    seed.tasks = task_ops::move_task(&seed.tasks, &args.id, status, args.before.as_deref());
    debug!(task = %args.id, status = %status, before = ?args.before, "moved task");
    let tasks: Vec<&Task> = seed.tasks.iter().collect();
    print_board(&seed, &tasks, &TaskStatus::ALL, json)
}

fn cmd_calendar(seed: &Seed, args: CalendarArgs, json: bool) -> CmdResult {
    let (year, month) = match args.month.as_deref() {
        Some(s) => calendar::parse_month(s)
            .ok_or_else(|| format!("invalid month '{}' (expected YYYY-MM)", s))?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };
    let grid = calendar::month_grid(year, month);
    let days = calendar::tasks_by_day(&seed.tasks, &grid);

    if json {
        let out = CalendarJson {
            month: format!("{:04}-{:02}", year, month),
            days: days
                .iter()
                .filter(|(date, _)| date.month() == month)
                .map(|(date, tasks)| DayJson {
                    date: *date,
                    tasks: tasks.iter().map(|t| t.id.as_str()).collect(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(&format_calendar(year, month, &days));
    }
    Ok(())
}

fn cmd_projects(seed: &Seed, json: bool) -> CmdResult {
    let summaries = seed
        .projects
        .iter()
        .map(|p| (p, project_ops::project_summary(&p.id, &seed.tasks, &seed.files)));

    if json {
        let out: Vec<ProjectJson> = summaries.map(|(p, s)| project_to_json(p, s)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (project, summary) in summaries {
            println!("{}", format_project_line(project, summary));
        }
    }
    Ok(())
}

fn cmd_docs(seed: &Seed, args: DocsArgs, json: bool) -> CmdResult {
    if let Some(folder) = args.folder.as_deref()
        && doc_ops::find_folder(&seed.folders, folder).is_none()
    {
        return Err(format!("folder not found: {}", folder).into());
    }
    let filter = doc_ops::FileFilter {
        folder_id: args.folder.clone(),
        query: args.search.unwrap_or_default(),
        mime_type: args.mime_type,
        not_linked_to: None,
    };
    let crumbs = doc_ops::breadcrumbs(&seed.folders, args.folder.as_deref());
    let files = doc_ops::filter_files(&seed.files, &filter);

    if json {
        let out = DocsJson {
            breadcrumbs: crumbs_to_json(crumbs),
            files: files.into_iter().map(file_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_breadcrumbs(&crumbs));
        println!();
        if files.is_empty() {
            println!("  (no files)");
        }
        for file in files {
            println!("  {}", format_file_line(file, &seed.folders));
        }
    }
    Ok(())
}

fn cmd_users(seed: &Seed, json: bool) -> CmdResult {
    if json {
        let out: Vec<UserJson> = seed
            .users
            .iter()
            .map(|user| UserJson {
                user,
                project_names: project_ops::project_names(&seed.projects, &user.project_ids),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for user in &seed.users {
            let names = project_ops::project_names(&seed.projects, &user.project_ids);
            println!("{}", format_user_line(user, &names));
        }
    }
    Ok(())
}

fn cmd_check(seed: &Seed, json: bool) -> CmdResult {
    let report = check::check(seed);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if !report.errors.is_empty() {
            println!("Errors:");
            for err in &report.errors {
                println!("  {}", err);
            }
        }
        if !report.warnings.is_empty() {
            if !report.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &report.warnings {
                println!("  {}", warn);
            }
        }
        if report.valid {
            println!("✓ fixture is valid");
        } else {
            println!("✗ fixture has errors");
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(format!("{} integrity error(s)", report.errors.len()).into())
    }
}
