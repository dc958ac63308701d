use jiff::civil::Date;
use serde_json::Value;
use thiserror::Error;

use crate::{
    models::task::Task,
    storage::{Storage, StorageError, TASKS_KEY},
};

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Import file is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Import file must contain a JSON array of tasks, found {0}")]
    NotAnArray(&'static str),

    #[error("Import file contains a malformed task: {0}")]
    InvalidTask(#[source] serde_json::Error),
}

/// Loads the persisted task list.
///
/// Missing, unreadable or unparsable data all yield an empty list; the failure
/// is only logged.
pub fn load_tasks(storage: &impl Storage) -> Vec<Task> {
    let content = match storage.read(TASKS_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => return vec![],
        Err(e) => {
            tracing::warn!(error = %e, "could not read stored tasks, starting empty");
            return vec![];
        }
    };

    match serde_json::from_str::<Vec<Task>>(&content) {
        Ok(tasks) => {
            tracing::debug!(count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored tasks are not parsable, starting empty");
            vec![]
        }
    }
}

pub fn save_tasks(storage: &impl Storage, tasks: &[Task]) -> Result<(), StorageError> {
    let json = export_blob(tasks)?;
    storage.write(TASKS_KEY, &json)
}

/// JSON document of the full task list, the same text that is stored under `todos`.
pub fn export_blob(tasks: &[Task]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(tasks).map_err(|e| StorageError::SerializeFailed { source: e })
}

pub fn import_blob(text: &str) -> Result<Vec<Task>, FormatError> {
    let value: Value = serde_json::from_str(text).map_err(FormatError::InvalidJson)?;

    if !value.is_array() {
        return Err(FormatError::NotAnArray(json_kind(&value)));
    }

    serde_json::from_value(value).map_err(FormatError::InvalidTask)
}

/// Download name for an export made on `date`
pub fn export_file_name(date: Date) -> String {
    format!("taskflow-export-{}.json", date)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
