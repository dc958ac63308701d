use jiff::Timestamp;
use uuid::Uuid;

use crate::models::{
    state::{FilterPatch, Sort, StoreState},
    task::{Status, Task},
};

/// Everything that can happen to the store.
///
/// Actions carry any time or identity they need so that [`reduce`] stays pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(Uuid),
    CompleteTask { id: Uuid, at: Timestamp },
    ClearCompleted,
    ReorderTasks(Vec<Task>),
    Undo,
    Redo,
    SetFilter(FilterPatch),
    SetSort(Sort),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddTask(_) => "add_task",
            Action::UpdateTask(_) => "update_task",
            Action::DeleteTask(_) => "delete_task",
            Action::CompleteTask { .. } => "complete_task",
            Action::ClearCompleted => "clear_completed",
            Action::ReorderTasks(_) => "reorder_tasks",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::SetFilter(_) => "set_filter",
            Action::SetSort(_) => "set_sort",
        }
    }
}

/// Applies `action` to `state`.
///
/// Never fails. Updating or completing a task that is not there leaves the
/// state untouched, history included. Deleting one still records history.
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::AddTask(task) => {
            let mut tasks = Vec::with_capacity(state.tasks.len() + 1);
            tasks.push(task);
            tasks.extend(state.tasks.iter().cloned());
            commit(state, tasks)
        }
        Action::UpdateTask(task) => {
            let Some(index) = position(&state, task.id) else {
                return state;
            };
            let mut tasks = state.tasks.clone();
            tasks[index] = task;
            commit(state, tasks)
        }
        Action::DeleteTask(id) => {
            let tasks = state.tasks.iter().filter(|t| t.id != id).cloned().collect();
            commit(state, tasks)
        }
        Action::CompleteTask { id, at } => {
            let Some(index) = position(&state, id) else {
                return state;
            };
            if state.tasks[index].is_completed() {
                return state;
            }
            let mut tasks = state.tasks.clone();
            tasks[index].status = Status::Completed;
            tasks[index].completed_at = Some(at);
            commit(state, tasks)
        }
        Action::ClearCompleted => {
            let tasks = state
                .tasks
                .iter()
                .filter(|t| !t.is_completed())
                .cloned()
                .collect();
            commit(state, tasks)
        }
        Action::ReorderTasks(tasks) => commit(state, tasks),
        Action::Undo => {
            let Some(previous) = state.history.past.pop() else {
                return state;
            };
            let current = std::mem::replace(&mut state.tasks, previous);
            state.history.future.insert(0, current);
            state
        }
        Action::Redo => {
            if state.history.future.is_empty() {
                return state;
            }
            let next = state.history.future.remove(0);
            let current = std::mem::replace(&mut state.tasks, next);
            state.history.past.push(current);
            state
        }
        Action::SetFilter(patch) => {
            state.filter.apply(patch);
            state
        }
        Action::SetSort(sort) => {
            state.sort = sort;
            state
        }
    }
}

/// Replaces the task list, pushing the old one onto `past` and discarding `future`.
fn commit(mut state: StoreState, tasks: Vec<Task>) -> StoreState {
    let previous = std::mem::replace(&mut state.tasks, tasks);
    state.history.past.push(previous);
    state.history.future.clear();
    state
}

fn position(state: &StoreState, id: Uuid) -> Option<usize> {
    state.tasks.iter().position(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        state::{SortBy, SortDirection},
        task::{Priority, TaskDraft},
    };

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn task(title: &str, status: Status) -> Task {
        let mut task = Task::from_draft(
            TaskDraft {
                title: title.to_string(),
                ..TaskDraft::default()
            },
            ts("2024-01-01T00:00:00Z"),
        );
        task.transition_to(status, ts("2024-01-01T12:00:00Z"));
        task
    }

    fn state_with(tasks: Vec<Task>) -> StoreState {
        StoreState::seeded(tasks, Sort::default())
    }

    /// One instance of every action that mutates `tasks`, valid against `state`.
    fn mutating_actions(state: &StoreState) -> Vec<Action> {
        let first = state.tasks[0].clone();
        let mut edited = first.clone();
        edited.title = String::from("Edited");
        let mut reversed = state.tasks.clone();
        reversed.reverse();

        vec![
            Action::AddTask(task("New", Status::Pending)),
            Action::UpdateTask(edited),
            Action::DeleteTask(first.id),
            Action::CompleteTask {
                id: first.id,
                at: ts("2024-02-01T00:00:00Z"),
            },
            Action::ClearCompleted,
            Action::ReorderTasks(reversed),
        ]
    }

    #[test]
    fn test_add_prepends() {
        let state = state_with(vec![task("Old", Status::Pending)]);
        let new_task = task("New", Status::Pending);

        let next = reduce(state.clone(), Action::AddTask(new_task.clone()));

        assert_eq!(next.tasks.len(), state.tasks.len() + 1);
        assert_eq!(next.tasks[0], new_task);
        assert_eq!(next.history.past, vec![state.tasks]);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let a = task("A", Status::Pending);
        let b = task("B", Status::Pending);
        let state = state_with(vec![a.clone(), b.clone()]);
        let mut edited = b.clone();
        edited.priority = Priority::High;

        let next = reduce(state, Action::UpdateTask(edited.clone()));

        assert_eq!(next.tasks, vec![a, edited]);
    }

    #[test]
    fn test_delete_removes_by_id() {
        let a = task("A", Status::Pending);
        let b = task("B", Status::Pending);
        let state = state_with(vec![a.clone(), b.clone()]);

        let next = reduce(state, Action::DeleteTask(a.id));

        assert_eq!(next.tasks, vec![b]);
    }

    #[test]
    fn test_complete_sets_status_and_timestamp() {
        let a = task("A", Status::InProgress);
        let state = state_with(vec![a.clone()]);
        let at = ts("2024-03-01T08:00:00Z");

        let next = reduce(state, Action::CompleteTask { id: a.id, at });

        assert_eq!(next.tasks[0].status, Status::Completed);
        assert_eq!(next.tasks[0].completed_at, Some(at));
    }

    #[test]
    fn test_complete_is_idempotent_on_completed_task() {
        let a = task("A", Status::Completed);
        let state = state_with(vec![a.clone()]);

        let next = reduce(
            state.clone(),
            Action::CompleteTask {
                id: a.id,
                at: ts("2030-01-01T00:00:00Z"),
            },
        );

        assert_eq!(next, state);
    }

    #[test]
    fn test_unknown_ids_are_silent_no_ops() {
        let state = state_with(vec![task("A", Status::Pending)]);
        let stranger = task("Stranger", Status::Pending);

        for action in [
            Action::UpdateTask(stranger.clone()),
            Action::CompleteTask {
                id: stranger.id,
                at: ts("2024-01-02T00:00:00Z"),
            },
        ] {
            assert_eq!(reduce(state.clone(), action), state);
        }
    }

    #[test]
    fn test_delete_unknown_id_still_records_history() {
        let a = task("A", Status::Pending);
        let added = reduce(StoreState::default(), Action::AddTask(a.clone()));
        let undone = reduce(added, Action::Undo);
        assert_eq!(undone.history.future.len(), 1);

        let next = reduce(undone, Action::DeleteTask(Uuid::new_v4()));

        assert!(next.tasks.is_empty());
        assert_eq!(next.history.past.len(), 1);
        assert!(next.history.future.is_empty());
    }

    #[test]
    fn test_clear_completed_keeps_open_tasks_in_order() {
        let a = task("A", Status::Pending);
        let b = task("B", Status::Completed);
        let c = task("C", Status::InProgress);
        let state = state_with(vec![a.clone(), b, c.clone()]);

        let next = reduce(state, Action::ClearCompleted);

        assert_eq!(next.tasks, vec![a, c]);
    }

    #[test]
    fn test_undo_restores_prior_tasks_and_redo_reapplies() {
        let base = state_with(vec![
            task("A", Status::Pending),
            task("B", Status::Completed),
        ]);

        for action in mutating_actions(&base) {
            let name = action.name();
            let mutated = reduce(base.clone(), action);

            let undone = reduce(mutated.clone(), Action::Undo);
            assert_eq!(undone.tasks, base.tasks, "undo after {name}");

            let redone = reduce(undone, Action::Redo);
            assert_eq!(redone.tasks, mutated.tasks, "redo after {name}");
            assert_eq!(redone.history, mutated.history, "history after {name}");
        }
    }

    #[test]
    fn test_mutation_after_undo_discards_future() {
        let base = state_with(vec![task("A", Status::Pending)]);

        for action in mutating_actions(&base) {
            let name = action.name();
            let state = reduce(base.clone(), Action::AddTask(task("X", Status::Pending)));
            let state = reduce(state, Action::Undo);
            assert!(state.history.can_redo());

            let state = reduce(state, action);
            assert!(state.history.future.is_empty(), "future kept after {name}");
        }
    }

    #[test]
    fn test_undo_and_redo_on_empty_history_are_no_ops() {
        let state = state_with(vec![task("A", Status::Pending)]);

        assert_eq!(reduce(state.clone(), Action::Undo), state);
        assert_eq!(reduce(state.clone(), Action::Redo), state);
    }

    #[test]
    fn test_multi_step_undo_walks_back_in_order() {
        let first = task("First", Status::Pending);
        let second = task("Second", Status::Pending);
        let state = state_with(vec![]);

        let state = reduce(state, Action::AddTask(first.clone()));
        let state = reduce(state, Action::AddTask(second.clone()));
        let state = reduce(state, Action::Undo);
        assert_eq!(state.tasks, vec![first.clone()]);

        let state = reduce(state, Action::Undo);
        assert!(state.tasks.is_empty());
        assert_eq!(state.history.future.len(), 2);

        let state = reduce(state, Action::Redo);
        let state = reduce(state, Action::Redo);
        assert_eq!(state.tasks, vec![second, first]);
    }

    #[test]
    fn test_filter_and_sort_bypass_history() {
        let state = state_with(vec![task("A", Status::Pending)]);
        let sort = Sort {
            by: SortBy::Title,
            direction: SortDirection::Asc,
        };

        let next = reduce(
            state.clone(),
            Action::SetFilter(FilterPatch {
                search: Some(String::from("a")),
                ..FilterPatch::default()
            }),
        );
        let next = reduce(next, Action::SetSort(sort));

        assert_eq!(next.filter.search, "a");
        assert_eq!(next.sort, sort);
        assert_eq!(next.tasks, state.tasks);
        assert_eq!(next.history, state.history);
    }
}
