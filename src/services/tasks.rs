use jiff::{Timestamp, Zoned, civil::Date, tz::TimeZone};
use thiserror::Error;

use crate::{
    models::task::{Priority, Status, Task, TaskDraft},
    storage::{Storage, StorageError},
    store::TaskStore,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task reference is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTask(Vec<String>),
}

/// Finds the task a user means by `reference`.
///
/// Tries an id prefix first (at least 4 hex characters), then a case-insensitive
/// title match: an exact title wins, otherwise the fragment must match exactly
/// one task.
pub fn resolve_task<'a>(tasks: &'a [Task], reference: &str) -> Result<&'a Task, ResolveTaskError> {
    let needle = reference.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ResolveTaskError::TaskNotFound(reference.to_string()));
    }

    if looks_like_id(&needle) {
        let compact = needle.replace('-', "");
        let by_id: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.id.simple().to_string().starts_with(&compact))
            .collect();
        match by_id.len() {
            0 => {}
            1 => return Ok(by_id[0]),
            _ => return Err(ambiguous(&by_id)),
        }
    }

    let matching: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .collect();

    match matching.len() {
        0 => Err(ResolveTaskError::TaskNotFound(reference.to_string())),
        1 => Ok(matching[0]),
        _ => {
            let exact: Vec<&Task> = matching
                .iter()
                .copied()
                .filter(|t| t.title.to_lowercase() == needle)
                .collect();
            if exact.len() == 1 {
                Ok(exact[0])
            } else {
                Err(ambiguous(&matching))
            }
        }
    }
}

fn looks_like_id(needle: &str) -> bool {
    needle.len() >= 4 && needle.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn ambiguous(tasks: &[&Task]) -> ResolveTaskError {
    ResolveTaskError::AmbiguousTask(
        tasks
            .iter()
            .map(|t| format!("{} ({})", t.title, t.short_id()))
            .collect(),
    )
}

/// Parses `YYYY-MM-DD` (start of that day locally), `today`, `tomorrow`, or an
/// RFC 3339 timestamp.
pub fn parse_due_date(input: &str) -> Result<Timestamp, String> {
    let input = input.trim();
    let today = Zoned::now().date();

    let date = match input.to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => Some(today.tomorrow().map_err(|e| e.to_string())?),
        _ => None,
    };

    if let Some(date) = date {
        return start_of_day(date);
    }

    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    input
        .parse::<Date>()
        .map_err(|e| e.to_string())
        .and_then(start_of_day)
}

fn start_of_day(date: Date) -> Result<Timestamp, String> {
    date.to_zoned(TimeZone::system())
        .map(|zoned| zoned.timestamp())
        .map_err(|e| e.to_string())
}

/// Trims tags, drops a leading `#` and empty entries, and removes duplicates
/// while keeping the first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').trim().to_string();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddTaskParameters {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due: Option<String>,
    pub tags: Vec<String>,
}

pub fn add_task(
    store: &mut TaskStore<impl Storage>,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(AddTaskError::EmptyTitle);
    }

    let due_date = match parameters.due {
        Some(due) => Some(
            parse_due_date(&due).map_err(|e| AddTaskError::InvalidDueDate(due.clone(), e))?,
        ),
        None => None,
    };

    let draft = TaskDraft {
        title,
        description: parameters.description.unwrap_or_default(),
        status: parameters.status.unwrap_or_default(),
        priority: parameters.priority.unwrap_or_default(),
        due_date,
        tags: normalize_tags(parameters.tags),
    };

    Ok(store.add_task(draft)?)
}

#[derive(Debug, Error)]
pub enum EditTaskError {
    #[error(transparent)]
    Resolve(#[from] ResolveTaskError),

    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct EditTaskParameters {
    pub reference: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due: Option<String>,
    pub clear_due: bool,
    /// Replaces the tag set when non-empty
    pub tags: Vec<String>,
    pub clear_tags: bool,
}

pub fn edit_task(
    store: &mut TaskStore<impl Storage>,
    parameters: EditTaskParameters,
) -> Result<Task, EditTaskError> {
    let mut task = resolve_task(store.tasks(), &parameters.reference)?.clone();

    if let Some(title) = parameters.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(EditTaskError::EmptyTitle);
        }
        task.title = title;
    }
    if let Some(description) = parameters.description {
        task.description = description;
    }
    if let Some(priority) = parameters.priority {
        task.priority = priority;
    }
    if parameters.clear_due {
        task.due_date = None;
    } else if let Some(due) = parameters.due {
        task.due_date =
            Some(parse_due_date(&due).map_err(|e| EditTaskError::InvalidDueDate(due.clone(), e))?);
    }
    if parameters.clear_tags {
        task.tags.clear();
    } else if !parameters.tags.is_empty() {
        task.tags = normalize_tags(parameters.tags);
    }
    if let Some(status) = parameters.status {
        task.transition_to(status, Timestamp::now());
    }

    store.update_task(task.clone())?;
    Ok(task)
}

#[derive(Debug, Error)]
pub enum CompleteTaskError {
    #[error(transparent)]
    Resolve(#[from] ResolveTaskError),

    #[error("Task '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn complete_task(
    store: &mut TaskStore<impl Storage>,
    reference: &str,
) -> Result<Task, CompleteTaskError> {
    let open_tasks: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| !t.is_completed())
        .cloned()
        .collect();

    // Prefer open tasks so a finished duplicate does not make the reference ambiguous
    let task = match resolve_task(&open_tasks, reference) {
        Ok(task) => task.clone(),
        Err(ResolveTaskError::TaskNotFound(_)) => {
            let task = resolve_task(store.tasks(), reference)?;
            return Err(CompleteTaskError::AlreadyCompleted(task.title.clone()));
        }
        Err(e) => return Err(e.into()),
    };

    store.complete_task(task.id)?;
    Ok(store.get_task(task.id).cloned().unwrap_or(task))
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error(transparent)]
    Resolve(#[from] ResolveTaskError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn delete_task(
    store: &mut TaskStore<impl Storage>,
    reference: &str,
) -> Result<Task, DeleteTaskError> {
    let task = resolve_task(store.tasks(), reference)?.clone();
    store.delete_task(task.id)?;
    Ok(task)
}

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error(transparent)]
    Resolve(#[from] ResolveTaskError),

    #[error("Position must be at least 1")]
    InvalidPosition,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Moves a task to the 1-based `position` of the stored order, clamped to the
/// end of the list. Returns the task and the position it landed on.
pub fn move_task(
    store: &mut TaskStore<impl Storage>,
    reference: &str,
    position: usize,
) -> Result<(Task, usize), MoveTaskError> {
    if position == 0 {
        return Err(MoveTaskError::InvalidPosition);
    }

    let task = resolve_task(store.tasks(), reference)?.clone();
    let mut order: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id != task.id)
        .cloned()
        .collect();
    let index = (position - 1).min(order.len());
    order.insert(index, task.clone());

    store.reorder_tasks(order)?;
    Ok((task, index + 1))
}
