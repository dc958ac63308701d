use std::cmp::Ordering;

use jiff::{Timestamp, Zoned};
use serde::Serialize;

use crate::models::{
    state::{Filter, Sort, SortBy},
    task::{Priority, Status, Task},
};

/// Tasks that pass `filter`, ordered by `sort`.
///
/// Filters are combined with AND; the tag filter matches a task carrying any
/// of the requested tags.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &Filter, sort: Sort) -> Vec<&'a Task> {
    let search = filter.search.to_lowercase();

    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.status.is_none_or(|status| t.status == status))
        .filter(|t| filter.priority.is_none_or(|priority| t.priority == priority))
        .filter(|t| search.is_empty() || t.title.to_lowercase().contains(&search))
        .filter(|t| filter.tags.is_empty() || t.has_any_tag(&filter.tags))
        .collect();

    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

fn compare(a: &Task, b: &Task, sort: Sort) -> Ordering {
    match sort.by {
        // Undated tasks go last whatever the direction
        SortBy::DueDate => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => sort.direction.apply(x.cmp(&y)),
        },
        SortBy::Priority => sort
            .direction
            .apply(a.priority.weight().cmp(&b.priority.weight())),
        SortBy::Title => sort.direction.apply(compare_titles(&a.title, &b.title)),
        SortBy::CreatedAt => sort.direction.apply(a.created_at.cmp(&b.created_at)),
    }
}

/// Dictionary-style order: case is ignored first and only breaks ties.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    /// Open tasks whose due date has passed
    pub overdue: usize,
    /// Open tasks due between now and the end of tomorrow
    pub due_soon: usize,
    /// Open high-priority tasks
    pub high_priority: usize,
}

impl Stats {
    pub fn completion_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

pub fn compute_stats(tasks: &[Task], now: &Zoned) -> Stats {
    let now_ts = now.timestamp();
    let horizon = end_of_tomorrow(now);

    let mut stats = Stats {
        total: tasks.len(),
        ..Stats::default()
    };

    for task in tasks {
        match task.status {
            Status::Completed => {
                stats.completed += 1;
                continue;
            }
            Status::Pending => stats.pending += 1,
            Status::InProgress => stats.in_progress += 1,
        }

        if task.priority == Priority::High {
            stats.high_priority += 1;
        }

        if let Some(due) = task.due_date {
            if due < now_ts {
                stats.overdue += 1;
            } else if due > now_ts && due < horizon {
                stats.due_soon += 1;
            }
        }
    }

    stats
}

/// First instant of the day after tomorrow, in `now`'s time zone.
fn end_of_tomorrow(now: &Zoned) -> Timestamp {
    now.date()
        .tomorrow()
        .and_then(|tomorrow| tomorrow.tomorrow())
        .and_then(|day_after| day_after.to_zoned(now.time_zone().clone()))
        .map(|zoned| zoned.timestamp())
        .unwrap_or(Timestamp::MAX)
}

/// Every distinct tag, in order of first appearance.
pub fn tag_index(tasks: &[Task]) -> Vec<String> {
    let mut tags: Vec<String> = vec![];
    for tag in tasks.iter().flat_map(|t| t.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
