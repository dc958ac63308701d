use std::{path::PathBuf, str::FromStr};

use clap::{Args, Subcommand};
use colored::*;
use thiserror::Error;

use crate::{
    models::{
        accent::Accent,
        state::{FilterPatch, Sort, SortBy, SortDirection},
        task::{Priority, Status},
    },
    services::{
        tasks::{
            AddTaskError, AddTaskParameters, CompleteTaskError, DeleteTaskError, EditTaskError,
            EditTaskParameters, MoveTaskError, ResolveTaskError, add_task, complete_task,
            delete_task, edit_task, move_task, normalize_tags,
        },
        transfer::{TransferError, export_to_file, import_from_file},
    },
    storage::{Storage, StorageError},
    store::{TaskStore, accent::AccentStore},
    ui,
};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tasks through the current filter and sort
    List(ListArgs),

    /// Add a new task at the top of the list
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status
        #[arg(short, long)]
        status: Option<Status>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Due date (e.g., "2025-03-01", "tomorrow")
        #[arg(long)]
        due: Option<String>,

        /// Add tags (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        tag: Vec<String>,
    },

    /// Edit an existing task
    Edit {
        /// Task id prefix or part of its title
        task: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status
        #[arg(short, long)]
        status: Option<Status>,

        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,

        /// New due date
        #[arg(long, conflicts_with = "no_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        no_due: bool,

        /// Replace the tags (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append, conflicts_with = "no_tags")]
        tag: Vec<String>,

        /// Remove every tag
        #[arg(long)]
        no_tags: bool,
    },

    /// Complete a task
    Done { task: String },

    /// Delete a task
    Delete { task: String },

    /// Remove every completed task
    ClearCompleted,

    /// Move a task to a position in the list (1 is the top)
    Move { task: String, position: usize },

    /// Undo the last change made in this session
    Undo,

    /// Redo the last undone change
    Redo,

    /// Change the filter used by `list`
    Filter {
        #[command(flatten)]
        filter: FilterArgs,

        /// Drop every restriction first
        #[arg(long)]
        reset: bool,
    },

    /// Change the sort used by `list`
    Sort {
        /// Field to sort by (due-date, priority, created-at, title)
        by: SortBy,

        #[command(flatten)]
        direction: DirectionArgs,
    },

    /// List every tag in use
    Tags,

    /// Show task statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all tasks to a JSON file
    Export {
        /// Output file (defaults to taskflow-export-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of an exported JSON file
    Import { file: PathBuf },

    /// Show or change the accent colour
    Accent { accent: Option<Accent> },

    /// Delete all task data
    Reset {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Start an interactive session that keeps undo history
    Shell,
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sort by (due-date, priority, created-at, title)
    #[arg(long)]
    pub sort: Option<SortBy>,

    #[command(flatten)]
    pub direction: DirectionArgs,
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Only tasks with this status ("all" to clear)
    #[arg(short, long)]
    pub status: Option<Choice<Status>>,

    /// Only tasks with this priority ("all" to clear)
    #[arg(short, long)]
    pub priority: Option<Choice<Priority>>,

    /// Only tasks whose title contains this text ("" to clear)
    #[arg(long)]
    pub search: Option<String>,

    /// Only tasks with any of these tags (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Drop the tag restriction
    #[arg(long, conflicts_with = "tag")]
    pub any_tag: bool,
}

impl FilterArgs {
    fn into_patch(self) -> FilterPatch {
        let tags = if self.any_tag {
            Some(vec![])
        } else if self.tag.is_empty() {
            None
        } else {
            Some(normalize_tags(self.tag))
        };

        FilterPatch {
            status: self.status.map(Choice::into_option),
            priority: self.priority.map(Choice::into_option),
            search: self.search,
            tags,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct DirectionArgs {
    /// Ascending order
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Descending order
    #[arg(long)]
    pub desc: bool,
}

impl DirectionArgs {
    fn resolve(&self) -> Option<SortDirection> {
        match (self.asc, self.desc) {
            (true, _) => Some(SortDirection::Asc),
            (_, true) => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// A filter value that can also be "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Choice<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "any" => Ok(Choice::All),
            _ => s.parse().map(Choice::Only),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    AddTask(#[from] AddTaskError),

    #[error(transparent)]
    EditTask(#[from] EditTaskError),

    #[error(transparent)]
    CompleteTask(#[from] CompleteTaskError),

    #[error(transparent)]
    DeleteTask(#[from] DeleteTaskError),

    #[error(transparent)]
    MoveTask(#[from] MoveTaskError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Refusing to delete all tasks without --yes")]
    ResetNotConfirmed,

    #[error("Already inside a shell session")]
    NestedShell,
}

impl CommandError {
    fn resolve_error(&self) -> Option<&ResolveTaskError> {
        match self {
            CommandError::EditTask(EditTaskError::Resolve(e))
            | CommandError::CompleteTask(CompleteTaskError::Resolve(e))
            | CommandError::DeleteTask(DeleteTaskError::Resolve(e))
            | CommandError::MoveTask(MoveTaskError::Resolve(e)) => Some(e),
            _ => None,
        }
    }
}

/// Print an error the way every command reports failures
pub fn report_error(error: &CommandError) {
    match error.resolve_error() {
        Some(ResolveTaskError::AmbiguousTask(candidates)) => {
            eprintln!(
                "{} Task reference is ambiguous. Multiple tasks found:",
                "Error:".red().bold()
            );
            for candidate in candidates {
                eprintln!("  - {}", candidate);
            }
            eprintln!("\nPlease be more specific or use the task id.");
        }
        Some(ResolveTaskError::TaskNotFound(reference)) => {
            eprintln!("{} Task '{}' not found", "Error:".red().bold(), reference);
            eprintln!("\nRun `taskflow list` to see task ids.");
        }
        None => eprintln!("{} {}", "Error:".red().bold(), error),
    }
}

/// One store plus the accent preference, alive for a whole session.
pub struct Session<S: Storage> {
    pub tasks: TaskStore<S>,
    pub accent: AccentStore<S>,
}

impl<S: Storage + Clone> Session<S> {
    pub fn open(storage: S, initial_sort: Sort) -> Self {
        Self {
            accent: AccentStore::open(storage.clone()),
            tasks: TaskStore::open(storage, initial_sort),
        }
    }
}

pub fn execute<S: Storage>(session: &mut Session<S>, command: Commands) -> Result<(), CommandError> {
    let accent = session.accent.accent();
    let store = &mut session.tasks;

    match command {
        Commands::List(args) => {
            let patch = args.filter.into_patch();
            if !patch.is_empty() {
                store.set_filter(patch)?;
            }
            if args.sort.is_some() || args.direction.resolve().is_some() {
                let current = store.state().sort;
                store.set_sort(Sort {
                    by: args.sort.unwrap_or(current.by),
                    direction: args.direction.resolve().unwrap_or(current.direction),
                })?;
            }
            render_list(store, accent);
        }
        Commands::Add {
            title,
            description,
            status,
            priority,
            due,
            tag,
        } => {
            let task = add_task(
                store,
                AddTaskParameters {
                    title,
                    description,
                    status,
                    priority,
                    due,
                    tags: tag,
                },
            )?;
            println!("✓ Task added: {}", task.title);
            println!("  {}", task.short_id().dimmed());
        }
        Commands::Edit {
            task,
            title,
            description,
            status,
            priority,
            due,
            no_due,
            tag,
            no_tags,
        } => {
            let task = edit_task(
                store,
                EditTaskParameters {
                    reference: task,
                    title,
                    description,
                    status,
                    priority,
                    due,
                    clear_due: no_due,
                    tags: tag,
                    clear_tags: no_tags,
                },
            )?;
            println!("✓ Task updated");
            ui::render_task_detail(&task, accent);
        }
        Commands::Done { task } => {
            let task = complete_task(store, &task)?;
            println!("✓ Task completed: {}", task.title);
        }
        Commands::Delete { task } => {
            let task = delete_task(store, &task)?;
            println!("✓ Task deleted: {}", task.title);
        }
        Commands::ClearCompleted => {
            let before = store.tasks().len();
            store.clear_completed()?;
            let removed = before - store.tasks().len();
            let task_word = if removed == 1 { "task" } else { "tasks" };
            println!("✓ Cleared {} completed {}", removed, task_word);
        }
        Commands::Move { task, position } => {
            let (task, landed) = move_task(store, &task, position)?;
            println!("✓ Moved '{}' to position {}", task.title, landed);
        }
        Commands::Undo => {
            if store.undo()? {
                println!("↶ Undone");
            } else {
                println!("Nothing to undo");
            }
        }
        Commands::Redo => {
            if store.redo()? {
                println!("↷ Redone");
            } else {
                println!("Nothing to redo");
            }
        }
        Commands::Filter { filter, reset } => {
            if reset {
                store.set_filter(FilterPatch::reset())?;
            }
            store.set_filter(filter.into_patch())?;
            println!(
                "Showing {}",
                ui::describe_view(&store.state().filter, store.state().sort)
            );
        }
        Commands::Sort { by, direction } => {
            let current = store.state().sort;
            store.set_sort(Sort {
                by,
                direction: direction.resolve().unwrap_or(current.direction),
            })?;
            println!(
                "Showing {}",
                ui::describe_view(&store.state().filter, store.state().sort)
            );
        }
        Commands::Tags => ui::render_tags(&store.all_tags(), accent),
        Commands::Stats { json: false } => ui::render_stats(&store.stats(), accent),
        Commands::Stats { json: true } => {
            println!("{}", serde_json::to_string_pretty(&store.stats())?);
        }
        Commands::Export { output } => {
            let cwd = std::env::current_dir()?;
            let path = export_to_file(&*store, output, &cwd)?;
            println!("✓ Exported {} tasks to {}", store.tasks().len(), path.display());
        }
        Commands::Import { file } => {
            let count = import_from_file(store, &file)?;
            println!("✓ Imported {} tasks from {}", count, file.display());
        }
        Commands::Accent { accent: None } => ui::render_accents(accent),
        Commands::Accent {
            accent: Some(new_accent),
        } => {
            session.accent.set(new_accent)?;
            println!(
                "✓ Accent set to {}",
                new_accent.as_str().color(new_accent.color())
            );
        }
        Commands::Reset { yes } => {
            if !yes {
                return Err(CommandError::ResetNotConfirmed);
            }
            store.clear_all_data()?;
            println!("✓ All task data deleted");
        }
        Commands::Shell => return Err(CommandError::NestedShell),
    }

    Ok(())
}

fn render_list<S: Storage>(store: &TaskStore<S>, accent: Accent) {
    let state = store.state();
    let visible = store.filtered_tasks();

    if store.tasks().is_empty() {
        println!("No tasks yet");
        return;
    }

    ui::render_view_header("Tasks", visible.len(), accent);
    println!("  {}\n", ui::describe_view(&state.filter, state.sort).dimmed());

    if visible.is_empty() {
        println!("  No tasks match the current filter");
        return;
    }
    for task in visible {
        ui::render_task_line(task, accent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parses_all() {
        assert_eq!("all".parse::<Choice<Status>>(), Ok(Choice::All));
        assert_eq!(
            "completed".parse::<Choice<Status>>(),
            Ok(Choice::Only(Status::Completed))
        );
        assert!("nope".parse::<Choice<Priority>>().is_err());
    }

    #[test]
    fn test_filter_args_into_patch() {
        let patch = FilterArgs {
            status: Some(Choice::All),
            priority: Some(Choice::Only(Priority::High)),
            search: None,
            tag: vec!["#work".into()],
            any_tag: false,
        }
        .into_patch();

        assert_eq!(patch.status, Some(None));
        assert_eq!(patch.priority, Some(Some(Priority::High)));
        assert_eq!(patch.search, None);
        assert_eq!(patch.tags, Some(vec![String::from("work")]));
    }

    #[test]
    fn test_empty_filter_args_make_empty_patch() {
        assert!(FilterArgs::default().into_patch().is_empty());
    }
}
