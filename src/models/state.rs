use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::task::{ParseEnumError, Priority, Status, Task};

/// Everything the store owns for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Canonical task list, order is significant
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub sort: Sort,
    pub history: History,
}

impl StoreState {
    /// Fresh session state seeded with an already loaded task list.
    pub fn seeded(tasks: Vec<Task>, sort: Sort) -> Self {
        Self {
            tasks,
            sort,
            ..Self::default()
        }
    }
}

/// `None` on `status`/`priority` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub search: String,
    pub tags: Vec<String>,
}

impl Filter {
    pub fn is_unrestricted(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.search.is_empty()
            && self.tags.is_empty()
    }

    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(tags) = patch.tags {
            let mut unique: Vec<String> = Vec::with_capacity(tags.len());
            for tag in tags {
                if !unique.contains(&tag) {
                    unique.push(tag);
                }
            }
            self.tags = unique;
        }
    }
}

/// Partial filter update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub status: Option<Option<Status>>,
    pub priority: Option<Option<Priority>>,
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl FilterPatch {
    /// A patch that puts every field back to "no restriction".
    pub fn reset() -> Self {
        Self {
            status: Some(None),
            priority: Some(None),
            search: Some(String::new()),
            tags: Some(vec![]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub by: SortBy,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            by: SortBy::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    DueDate,
    Priority,
    #[default]
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortBy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "duedate" | "due" => Ok(SortBy::DueDate),
            "priority" => Ok(SortBy::Priority),
            "createdat" | "created" => Ok(SortBy::CreatedAt),
            "title" => Ok(SortBy::Title),
            _ => Err(ParseEnumError {
                kind: "sort field",
                value: s.to_string(),
                expected: &["due-date", "priority", "created-at", "title"],
            }),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::DueDate => "due date",
            SortBy::Priority => "priority",
            SortBy::CreatedAt => "creation date",
            SortBy::Title => "title",
        })
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(ParseEnumError {
                kind: "sort direction",
                value: s.to_string(),
                expected: &["asc", "desc"],
            }),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Linear undo/redo timeline of full task-list snapshots.
///
/// `past` is oldest first, `future` is nearest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub past: Vec<Vec<Task>>,
    pub future: Vec<Vec<Task>>,
}

impl History {
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_patch_only_touches_given_fields() {
        let mut filter = Filter {
            status: Some(Status::Pending),
            search: String::from("milk"),
            ..Filter::default()
        };

        filter.apply(FilterPatch {
            priority: Some(Some(Priority::High)),
            ..FilterPatch::default()
        });

        assert_eq!(filter.status, Some(Status::Pending));
        assert_eq!(filter.priority, Some(Priority::High));
        assert_eq!(filter.search, "milk");
    }

    #[test]
    fn test_filter_patch_tags_behave_as_a_set() {
        let mut filter = Filter::default();
        filter.apply(FilterPatch {
            tags: Some(vec!["a".into(), "b".into(), "a".into()]),
            ..FilterPatch::default()
        });
        assert_eq!(filter.tags, vec!["a", "b"]);

        filter.apply(FilterPatch::reset());
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let sort = Sort::default();
        assert_eq!(sort.by, SortBy::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_parse_sort_by_aliases() {
        assert_eq!("due-date".parse::<SortBy>(), Ok(SortBy::DueDate));
        assert_eq!("dueDate".parse::<SortBy>(), Ok(SortBy::DueDate));
        assert_eq!("created".parse::<SortBy>(), Ok(SortBy::CreatedAt));
        assert!("size".parse::<SortBy>().is_err());
    }
}
