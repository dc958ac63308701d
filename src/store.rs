use jiff::{Timestamp, Zoned};
use uuid::Uuid;

use crate::{
    models::{
        state::{FilterPatch, Sort, StoreState},
        task::{Task, TaskDraft},
    },
    storage::{
        Storage, StorageError, TASKS_KEY,
        tasks::{FormatError, export_blob, import_blob, load_tasks, save_tasks},
    },
};

pub mod accent;
pub mod reducer;
pub mod views;

use reducer::{Action, reduce};
use views::Stats;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The session's task store.
///
/// Owns the [`StoreState`] and mirrors the task list to storage after every
/// action that changes it. Construct one per session and pass it around.
pub struct TaskStore<S: Storage> {
    state: StoreState,
    storage: S,
    initial_sort: Sort,
}

impl<S: Storage> TaskStore<S> {
    /// Opens a session seeded from whatever `storage` holds.
    pub fn open(storage: S, initial_sort: Sort) -> Self {
        let tasks = load_tasks(&storage);
        Self {
            state: StoreState::seeded(tasks, initial_sort),
            storage,
            initial_sort,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), StorageError> {
        let name = action.name();
        let previous = std::mem::take(&mut self.state);
        let tasks_before = previous.tasks.clone();
        self.state = reduce(previous, action);

        tracing::debug!(
            action = name,
            tasks = self.state.tasks.len(),
            past = self.state.history.past.len(),
            future = self.state.history.future.len(),
            "dispatched"
        );

        if self.state.tasks != tasks_before {
            save_tasks(&self.storage, &self.state.tasks)?;
        }
        Ok(())
    }

    /// Creates a task from `draft` and puts it at the top of the list.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task, StorageError> {
        let task = Task::from_draft(draft, Timestamp::now());
        self.dispatch(Action::AddTask(task.clone()))?;
        Ok(task)
    }

    pub fn update_task(&mut self, task: Task) -> Result<(), StorageError> {
        self.dispatch(Action::UpdateTask(task))
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<(), StorageError> {
        self.dispatch(Action::DeleteTask(id))
    }

    pub fn complete_task(&mut self, id: Uuid) -> Result<(), StorageError> {
        self.dispatch(Action::CompleteTask {
            id,
            at: Timestamp::now(),
        })
    }

    pub fn clear_completed(&mut self) -> Result<(), StorageError> {
        self.dispatch(Action::ClearCompleted)
    }

    pub fn reorder_tasks(&mut self, tasks: Vec<Task>) -> Result<(), StorageError> {
        self.dispatch(Action::ReorderTasks(tasks))
    }

    pub fn undo(&mut self) -> Result<bool, StorageError> {
        let can_undo = self.state.history.can_undo();
        self.dispatch(Action::Undo)?;
        Ok(can_undo)
    }

    pub fn redo(&mut self) -> Result<bool, StorageError> {
        let can_redo = self.state.history.can_redo();
        self.dispatch(Action::Redo)?;
        Ok(can_redo)
    }

    pub fn set_filter(&mut self, patch: FilterPatch) -> Result<(), StorageError> {
        self.dispatch(Action::SetFilter(patch))
    }

    pub fn set_sort(&mut self, sort: Sort) -> Result<(), StorageError> {
        self.dispatch(Action::SetSort(sort))
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        views::visible_tasks(&self.state.tasks, &self.state.filter, self.state.sort)
    }

    pub fn stats(&self) -> Stats {
        views::compute_stats(&self.state.tasks, &Zoned::now())
    }

    pub fn all_tags(&self) -> Vec<String> {
        views::tag_index(&self.state.tasks)
    }

    pub fn export(&self) -> Result<String, StorageError> {
        export_blob(&self.state.tasks)
    }

    /// Replaces the whole list with the tasks in `text`, then reloads the session.
    ///
    /// A payload that is not a JSON array of tasks leaves everything untouched.
    pub fn import(&mut self, text: &str) -> Result<usize, ImportError> {
        let tasks = import_blob(text).inspect_err(|e| {
            tracing::error!(error = %e, "rejected import");
        })?;
        let count = tasks.len();
        let written = self.reorder_tasks(tasks);
        // Reload either way so the session matches what is on disk.
        self.reload();
        written.inspect_err(|e| {
            tracing::error!(error = %e, "could not store imported tasks");
        })?;
        tracing::info!(count, "imported tasks");
        Ok(count)
    }

    /// Drops every stored task and starts a fresh session.
    pub fn clear_all_data(&mut self) -> Result<(), StorageError> {
        self.storage.remove(TASKS_KEY)?;
        self.reload();
        tracing::info!("cleared all task data");
        Ok(())
    }

    /// Starts over from storage: fresh history, default filter, initial sort.
    pub fn reload(&mut self) {
        self.state = StoreState::seeded(load_tasks(&self.storage), self.initial_sort);
    }
}
