use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// Title of the task
    pub title: String,
    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,
    /// Where the task is in its lifecycle
    pub status: Status,
    /// How urgent the task is
    pub priority: Priority,
    /// When the task is due
    pub due_date: Option<Timestamp>,
    /// Tags of the task, in the order the user entered them
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the task was created
    pub created_at: Timestamp,
    /// When the task was completed
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Builds a brand new task from a draft: fresh id, `created_at` set to `now`.
    pub fn from_draft(draft: TaskDraft, now: Timestamp) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            tags: draft.tags,
            created_at: now,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Moves the task to `status`, keeping `completed_at` in step with it.
    ///
    /// `completed_at` is stamped only when the task enters `Completed` and
    /// cleared when it leaves it. Staying in `Completed` keeps the original stamp.
    pub fn transition_to(&mut self, status: Status, now: Timestamp) {
        match (self.status, status) {
            (Status::Completed, Status::Completed) => {}
            (_, Status::Completed) => self.completed_at = Some(now),
            (Status::Completed, _) => self.completed_at = None,
            _ => {}
        }
        self.status = status;
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// Short form of the id shown in listings
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// The user-editable part of a task, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Ordinal used when sorting: high=3, medium=2, low=1
    pub fn weight(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid {kind} '{value}'. Expected one of: {}", .expected.join(", "))]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl Status {
    pub const NAMES: &'static [&'static str] = &["pending", "in-progress", "completed"];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
                expected: Status::NAMES,
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Priority {
    pub const NAMES: &'static [&'static str] = &["low", "medium", "high"];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
                expected: Priority::NAMES,
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_serializes_with_original_field_names() {
        let task = Task {
            title: String::from("Write report"),
            status: Status::InProgress,
            priority: Priority::High,
            ..Task::from_draft(TaskDraft::default(), ts("2024-01-01T00:00:00Z"))
        };
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00Z");
        assert!(value["dueDate"].is_null());
        assert!(value["completedAt"].is_null());
    }

    #[test]
    fn test_deserializes_browser_iso_timestamps() {
        let json = r#"{
            "id": "6f1c3b4e-8a8f-4c44-9a55-1d2f6f1f0a11",
            "title": "Buy milk",
            "description": "",
            "status": "pending",
            "priority": "low",
            "dueDate": "2024-03-01T10:00:00.000Z",
            "tags": ["home"],
            "createdAt": "2024-02-01T08:30:00.000Z",
            "completedAt": null
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.due_date, Some(ts("2024-03-01T10:00:00Z")));
        assert_eq!(task.tags, vec!["home"]);
    }

    #[test]
    fn test_transition_stamps_and_clears_completed_at() {
        let mut task = Task::from_draft(TaskDraft::default(), ts("2024-01-01T00:00:00Z"));

        task.transition_to(Status::Completed, ts("2024-01-02T00:00:00Z"));
        assert_eq!(task.completed_at, Some(ts("2024-01-02T00:00:00Z")));

        task.transition_to(Status::Completed, ts("2024-01-03T00:00:00Z"));
        assert_eq!(task.completed_at, Some(ts("2024-01-02T00:00:00Z")));

        task.transition_to(Status::Pending, ts("2024-01-04T00:00:00Z"));
        assert_eq!(task.completed_at, None);

        task.transition_to(Status::Completed, ts("2024-01-05T00:00:00Z"));
        assert_eq!(task.completed_at, Some(ts("2024-01-05T00:00:00Z")));
    }

    #[test]
    fn test_parse_status_and_priority() {
        assert_eq!("In-Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }
}
