//! Command-line surface over the task store

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use todo_core::{
    Category, KeyValueStore, Priority, StatusFilter, TaskFilter, TaskRepository, TaskStats,
    TaskStore, TaskSubmission,
};

use crate::output::{self, short_id};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Track tasks in a local key-value store")]
pub struct Cli {
    /// Directory holding the task store (overrides TODO_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a task
    Add(AddArgs),
    /// Edit a task; omitted fields keep their current value
    Edit(EditArgs),
    /// Mark a task completed or active again
    Toggle(IdArgs),
    /// Delete a task
    #[command(alias = "rm")]
    Delete(IdArgs),
    /// List tasks matching a filter
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show summary statistics
    Stats,
}

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    #[arg(short = 'd', long = "description")]
    pub description: Option<String>,
    #[arg(short = 'p', long = "priority", value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(short = 'c', long = "category", value_parser = parse_category)]
    pub category: Option<Category>,
    /// Due date (YYYY-MM-DD)
    #[arg(long = "due")]
    pub due: Option<String>,
}

#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Task ID or unambiguous prefix
    pub id: String,
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,
    #[arg(short = 'd', long = "description", conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long = "clear-description")]
    pub clear_description: bool,
    #[arg(short = 'p', long = "priority", value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(short = 'c', long = "category", value_parser = parse_category)]
    pub category: Option<Category>,
    /// Due date (YYYY-MM-DD)
    #[arg(long = "due", conflicts_with = "clear_due")]
    pub due: Option<String>,
    #[arg(long = "clear-due")]
    pub clear_due: bool,
}

#[derive(Debug, Parser)]
pub struct IdArgs {
    /// Task ID or unambiguous prefix
    pub id: String,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Case-insensitive text to find in title or description
    #[arg(short = 's', long = "search", default_value = "")]
    pub search: String,
    /// all, active or completed
    #[arg(long = "status", default_value = "all", value_parser = parse_status)]
    pub status: StatusFilter,
    #[arg(short = 'p', long = "priority", value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(short = 'c', long = "category", value_parser = parse_category)]
    pub category: Option<Category>,
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    raw.parse().map_err(|e: todo_core::Error| e.to_string())
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse().map_err(|e: todo_core::Error| e.to_string())
}

fn parse_status(raw: &str) -> Result<StatusFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(StatusFilter::All),
        "active" => Ok(StatusFilter::Active),
        "completed" | "done" => Ok(StatusFilter::Completed),
        other => Err(format!(
            "'{}' is not one of all, active, completed",
            other
        )),
    }
}

/// Resolve a full task ID or a unique prefix of one
fn resolve_id<S: KeyValueStore>(store: &TaskStore<S>, raw: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(raw.trim()) {
        return Ok(id);
    }

    let prefix = raw.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("task ID is required");
    }
    let matches: Vec<Uuid> = store
        .list()
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no task matches ID '{}'", raw),
        _ => bail!("multiple tasks match ID '{}'", raw),
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Execute one command against the store, writing results to `out`
pub fn run<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    cmd: Commands,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        Commands::Add(args) => {
            let mut submission = TaskSubmission::new(args.title);
            submission.description = args.description;
            submission.due_date = args.due;
            if let Some(priority) = args.priority {
                submission = submission.with_priority(priority);
            }
            if let Some(category) = args.category {
                submission = submission.with_category(category);
            }

            let task = store.create(&submission).context("failed to create task")?;
            if json {
                write_json(out, &task)?;
            } else {
                writeln!(out, "Created task {}: {}", short_id(&task), task.title)?;
            }
        }
        Commands::Edit(args) => {
            let id = resolve_id(store, &args.id)?;
            let current = store
                .get(id)
                .ok_or(todo_core::Error::TaskNotFound(id))?;

            let mut submission = TaskSubmission::from_task(current);
            if let Some(title) = args.title {
                submission.title = title;
            }
            if args.clear_description {
                submission.description = None;
            } else if args.description.is_some() {
                submission.description = args.description;
            }
            if let Some(priority) = args.priority {
                submission = submission.with_priority(priority);
            }
            if let Some(category) = args.category {
                submission = submission.with_category(category);
            }
            if args.clear_due {
                submission.due_date = None;
            } else if args.due.is_some() {
                submission.due_date = args.due;
            }

            let task = store
                .update(id, &submission)
                .context("failed to update task")?;
            if json {
                write_json(out, &task)?;
            } else {
                writeln!(out, "Updated task {}: {}", short_id(&task), task.title)?;
            }
        }
        Commands::Toggle(args) => {
            let id = resolve_id(store, &args.id)?;
            let task = store
                .toggle_completed(id)
                .context("failed to toggle task")?;
            if json {
                write_json(out, &task)?;
            } else {
                let state = if task.completed { "completed" } else { "active" };
                writeln!(out, "Marked task {} {}", short_id(&task), state)?;
            }
        }
        Commands::Delete(args) => {
            let id = resolve_id(store, &args.id)?;
            let task = store.delete(id).context("failed to delete task")?;
            if json {
                write_json(out, &task)?;
            } else {
                writeln!(out, "Deleted task {}: {}", short_id(&task), task.title)?;
            }
        }
        Commands::List(args) => {
            let filter = TaskFilter {
                search: args.search,
                status: args.status,
                priority: args.priority,
                category: args.category,
            };
            let visible = filter.apply(store.list());
            if json {
                write_json(out, &visible)?;
            } else if visible.is_empty() {
                let hint = if store.list().is_empty() {
                    "Create your first task to get started!"
                } else {
                    "Try adjusting your filters"
                };
                writeln!(out, "No tasks found. {}", hint)?;
            } else {
                output::task_table(visible).write_to(&mut *out)?;
            }
        }
        Commands::Stats => {
            let stats = TaskStats::summarize(store.list());
            if json {
                write_json(out, &stats)?;
            } else {
                output::stats_table(&stats).write_to(&mut *out)?;
            }
        }
    }
    Ok(())
}
