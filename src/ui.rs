use colored::*;
use jiff::{Timestamp, Zoned, tz::TimeZone};

use crate::{
    models::{
        accent::Accent,
        state::{Filter, Sort},
        task::{Priority, Status, Task},
    },
    store::views::Stats,
};

const DETAIL_SEPARATOR: &str = "  ·  ";

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool, accent: Accent) -> ColoredString {
    match task.status {
        Status::Completed => "✓".dimmed(),
        _ if is_overdue => "●".red(),
        Status::InProgress => "◐".color(accent.color()),
        Status::Pending => "○".normal(),
    }
}

fn priority_marker(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "!!!".red().bold(),
        Priority::Medium => "!! ".yellow(),
        Priority::Low => "!  ".dimmed(),
    }
}

/// Check if an open task is past its due date
pub fn is_overdue(task: &Task, now: Timestamp) -> bool {
    !task.is_completed() && task.due_date.is_some_and(|due| due < now)
}

/// Render a single task line: short id, glyph, priority, title and right-aligned details
pub fn render_task_line(task: &Task, accent: Accent) {
    let terminal_width = get_terminal_width();
    let overdue = is_overdue(task, Timestamp::now());

    let id_str = task.short_id();
    let glyph = get_status_glyph(task, overdue, accent);
    let left_visible = format!("  {}  {}  {}  {}", id_str, " ", "   ", task.title);
    let left = format!(
        "  {}  {}  {}  {}",
        id_str.dimmed(),
        glyph,
        priority_marker(task.priority),
        if task.is_completed() {
            task.title.dimmed()
        } else {
            task.title.bold()
        }
    );

    let due_label = task.due_date.map(|due| format!("due {}", format_day(due)));
    let tag_list = tags_label(task);
    let right_section = [due_label.clone(), tag_list.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(DETAIL_SEPARATOR);

    if right_section.is_empty() {
        println!("{}", left);
        return;
    }

    let right = [
        due_label.map(|label| {
            if overdue {
                label.red().to_string()
            } else {
                label.dimmed().to_string()
            }
        }),
        tag_list.map(|label| label.dimmed().to_string()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(&DETAIL_SEPARATOR.dimmed().to_string());

    let total_content = left_visible.chars().count() + right_section.chars().count();

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right);
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", left);
        println!("{}{}", " ".repeat(20), right);
    }
}

fn tags_label(task: &Task) -> Option<String> {
    if task.tags.is_empty() {
        return None;
    }
    Some(
        task.tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Render the full record of one task, used after add/edit
pub fn render_task_detail(task: &Task, accent: Accent) {
    println!("  {}", task.title.bold());
    println!("  {} {}", "id".dimmed(), task.id);
    println!(
        "  {} {}  {} {}",
        "status".dimmed(),
        task.status.to_string().color(accent.color()),
        "priority".dimmed(),
        task.priority
    );
    if !task.description.is_empty() {
        println!("  {}", task.description);
    }
    if let Some(due) = task.due_date {
        println!("  {} {}", "due".dimmed(), format_day(due));
    }
    if !task.tags.is_empty() {
        println!("  {} {}", "tags".dimmed(), task.tags.join(", "));
    }
}

/// Format a point in time as a day label (e.g., "Today", "Tomorrow", "Feb 15")
pub fn format_day(timestamp: Timestamp) -> String {
    let zoned = Zoned::new(timestamp, TimeZone::system());
    let date = zoned.date();
    let today = Zoned::now().date();

    if date == today {
        "today".to_string()
    } else if today.tomorrow().is_ok_and(|tomorrow| tomorrow == date) {
        "tomorrow".to_string()
    } else if today.yesterday().is_ok_and(|yesterday| yesterday == date) {
        "yesterday".to_string()
    } else if date.year() == today.year() {
        date.strftime("%b %d").to_string()
    } else {
        date.strftime("%b %d %Y").to_string()
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, accent: Accent) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!(
        "\n  {} ({} {})\n",
        title.color(accent.color()).bold(),
        count,
        task_word
    );
}

/// Render a section header (e.g., "Tags")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// One line describing the active filter and sort
pub fn describe_view(filter: &Filter, sort: Sort) -> String {
    let mut parts = vec![];
    if let Some(status) = filter.status {
        parts.push(format!("status {}", status));
    }
    if let Some(priority) = filter.priority {
        parts.push(format!("priority {}", priority));
    }
    if !filter.search.is_empty() {
        parts.push(format!("matching \"{}\"", filter.search));
    }
    if !filter.tags.is_empty() {
        parts.push(format!("tagged {}", filter.tags.join(" or ")));
    }

    let filter_part = if filter.is_unrestricted() {
        String::from("all tasks")
    } else {
        parts.join(", ")
    };
    format!("{} · by {} {}", filter_part, sort.by, sort.direction)
}

pub fn render_stats(stats: &Stats, accent: Accent) {
    render_view_header("Statistics", stats.total, accent);

    let rows = [
        ("Completed", stats.completed),
        ("Pending", stats.pending),
        ("In progress", stats.in_progress),
        ("Overdue", stats.overdue),
        ("Due soon", stats.due_soon),
        ("High priority", stats.high_priority),
    ];
    for (label, value) in rows {
        let value_str = value.to_string();
        let value_str = match label {
            "Overdue" if value > 0 => value_str.red().bold(),
            _ => value_str.bold(),
        };
        println!("  {:<14} {}", label.dimmed(), value_str);
    }

    let rate = stats.completion_rate();
    let filled = usize::from(rate) / 5;
    println!(
        "\n  {} {}{} {}%",
        "Progress".dimmed(),
        "█".repeat(filled).color(accent.color()),
        "░".repeat(20 - filled).dimmed(),
        rate
    );
}

pub fn render_tags(tags: &[String], accent: Accent) {
    if tags.is_empty() {
        println!("No tags yet");
        return;
    }
    render_section_header("Tags");
    for tag in tags {
        println!("  {} {}", "#".color(accent.color()), tag);
    }
}

pub fn render_accents(current: Accent) {
    for accent in Accent::ALL {
        let marker = if accent == current { "●" } else { "○" };
        println!(
            "  {} {}",
            marker.color(accent.color()),
            accent.as_str().color(accent.color())
        );
    }
}
