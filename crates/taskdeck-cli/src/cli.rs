use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taskdeck_core::domain::{Priority, TaskId};
use taskdeck_core::listing::{PAGE_SIZE_OPTIONS, SortDirection, SortKey};

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Track personal tasks with change history")]
pub struct Cli {
    /// Task data file (overrides `data_file` from config).
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Only log errors. Notifications go to the log instead of the terminal.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of tasks.
    List(ListArgs),
    /// Create a task.
    Add(AddArgs),
    /// Flip a task between completed and pending.
    Toggle { id: TaskId },
    /// Change title, description, priority or due date.
    Edit(EditArgs),
    /// Delete a task permanently.
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a task's change history.
    History { id: TaskId },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text to look for in titles and descriptions.
    #[arg(short, long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Tie-breaker key; must differ from --sort.
    #[arg(long)]
    pub then: Option<SortKey>,

    /// Only applies when sorting by dueDate.
    #[arg(long)]
    pub direction: Option<SortDirection>,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// One of 5, 10, 25 or 50.
    #[arg(long, value_parser = page_size)]
    pub page_size: Option<usize>,
}

fn page_size(input: &str) -> anyhow::Result<usize> {
    let size: usize = input.parse()?;
    anyhow::ensure!(
        PAGE_SIZE_OPTIONS.contains(&size),
        "page size must be one of {PAGE_SIZE_OPTIONS:?}"
    );
    Ok(size)
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub title: String,

    /// Due date as yyyy-mm-dd.
    #[arg(long)]
    pub due: String,

    #[arg(long, default_value = "Medium")]
    pub priority: Priority,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: TaskId,

    #[arg(long)]
    pub title: Option<String>,

    /// Pass an empty string to clear it.
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    /// Due date as yyyy-mm-dd.
    #[arg(long)]
    pub due: Option<String>,
}
