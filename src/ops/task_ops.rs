use chrono::{NaiveDate, NaiveDateTime};

use crate::model::task::{Priority, Task, TaskDraft, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Validation failures for the task form
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    TitleRequired,
    #[error("date is required")]
    DateRequired,
    #[error("invalid date '{0}' (expected YYYY-MM-DD HH:MM)")]
    InvalidDate(String),
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Move `task_id` into the `target_status` lane and return the reordered list.
///
/// With a `target_task_id` that is still present once the mover is taken out,
/// the task lands immediately before it. Otherwise it lands right after the
/// last task of the target lane, or at the very end when that lane is empty.
/// An unknown `task_id` returns the list unchanged.
pub fn move_task(
    tasks: &[Task],
    task_id: &str,
    target_status: TaskStatus,
    target_task_id: Option<&str>,
) -> Vec<Task> {
    let Some(idx) = tasks.iter().position(|t| t.id == task_id) else {
        return tasks.to_vec();
    };

    let mut remainder = tasks.to_vec();
    let mut moved = remainder.remove(idx);
    moved.status = target_status;

    let before_target = target_task_id
        .and_then(|target| remainder.iter().position(|t| t.id == target));

    let insert_idx = match before_target {
        Some(i) => i,
        None => remainder
            .iter()
            .rposition(|t| t.status == target_status)
            .map_or(remainder.len(), |i| i + 1),
    };

    remainder.insert(insert_idx, moved);
    remainder
}

/// Direction for keyboard-driven card moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Nudge a card one step in `direction`, expressed as a [`move_task`] call.
///
/// Up/Down reorder inside the card's lane; Left/Right send it to the tail of
/// the neighbouring lane. Steps past the board edge are no-ops.
pub fn neighbor_move(tasks: &[Task], task_id: &str, direction: MoveDirection) -> Vec<Task> {
    let Some(task) = find_task(tasks, task_id) else {
        return tasks.to_vec();
    };
    let status = task.status;

    match direction {
        MoveDirection::Left | MoveDirection::Right => {
            let target = if direction == MoveDirection::Left {
                status.prev()
            } else {
                status.next()
            };
            match target {
                Some(target) => move_task(tasks, task_id, target, None),
                None => tasks.to_vec(),
            }
        }
        MoveDirection::Up => {
            let lane = lane(tasks, status);
            match lane.iter().position(|t| t.id == task_id) {
                Some(i) if i > 0 => {
                    let target = lane[i - 1].id.clone();
                    move_task(tasks, task_id, status, Some(&target))
                }
                _ => tasks.to_vec(),
            }
        }
        MoveDirection::Down => {
            let lane = lane(tasks, status);
            let Some(i) = lane.iter().position(|t| t.id == task_id) else {
                return tasks.to_vec();
            };
            if i + 1 >= lane.len() {
                return tasks.to_vec();
            }
            // Insert before the card two slots down, or at the lane tail
            let target = lane.get(i + 2).map(|t| t.id.clone());
            move_task(tasks, task_id, status, target.as_deref())
        }
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Prepend a new task (newest first)
pub fn create_task(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut out = Vec::with_capacity(tasks.len() + 1);
    out.push(task);
    out.extend_from_slice(tasks);
    out
}

/// Replace the task with the same id
pub fn update_task(tasks: &[Task], updated: Task) -> Result<Vec<Task>, TaskError> {
    let idx = tasks
        .iter()
        .position(|t| t.id == updated.id)
        .ok_or_else(|| TaskError::NotFound(updated.id.clone()))?;
    let mut out = tasks.to_vec();
    out[idx] = updated;
    Ok(out)
}

pub fn delete_task(tasks: &[Task], task_id: &str) -> Result<Vec<Task>, TaskError> {
    if find_task(tasks, task_id).is_none() {
        return Err(TaskError::NotFound(task_id.to_string()));
    }
    Ok(tasks.iter().filter(|t| t.id != task_id).cloned().collect())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == task_id)
}

/// Tasks of one lane, in list order
pub fn lane(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Card count per lane, in board order
pub fn lane_counts(tasks: &[Task]) -> [(TaskStatus, usize); 3] {
    TaskStatus::ALL.map(|s| (s, tasks.iter().filter(|t| t.status == s).count()))
}

pub fn tasks_for_project<'a>(tasks: &'a [Task], project_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.project_id.as_deref() == Some(project_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

/// Raw form values for creating or editing a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub date: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub project_id: Option<String>,
}

impl TaskInput {
    /// Empty form for a new card in `status` (medium priority, no project)
    pub fn new(status: TaskStatus) -> Self {
        TaskInput {
            title: String::new(),
            date: String::new(),
            priority: Priority::Medium,
            status,
            project_id: None,
        }
    }

    /// Prefilled form for editing an existing task
    pub fn from_task(task: &Task) -> Self {
        TaskInput {
            title: task.title.clone(),
            date: task.date.format("%Y-%m-%d %H:%M").to_string(),
            priority: task.priority,
            status: task.status,
            project_id: task.project_id.clone(),
        }
    }
}

pub fn validate_task_input(input: &TaskInput) -> Result<TaskDraft, DraftError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(DraftError::TitleRequired);
    }
    let date_text = input.date.trim();
    if date_text.is_empty() {
        return Err(DraftError::DateRequired);
    }
    let date =
        parse_task_date(date_text).ok_or_else(|| DraftError::InvalidDate(date_text.to_string()))?;

    Ok(TaskDraft {
        title: title.to_string(),
        status: input.status,
        date,
        priority: input.priority,
        project_id: input.project_id.clone().filter(|p| !p.is_empty()),
    })
}

/// Parse `YYYY-MM-DD HH:MM`, the `T`-separated form (with optional seconds),
/// or a bare date (midnight).
pub fn parse_task_date(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
