use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use taskdeck_core::app::{DeleteOutcome, EditSession, ListState, TaskListView, TaskService, parse_due_date};
use taskdeck_core::config::TaskdeckConfig;
use taskdeck_core::domain::NewTask;
use taskdeck_core::impls::TracingNotifier;
use taskdeck_core::listing::SortConfig;
use taskdeck_core::ports::{Clock, Notifier, StaticConfirm, SystemClock};

mod cli;
mod console;
mod data_file;
mod render;

use cli::{Cli, Commands, EditArgs, ListArgs};
use console::{ConsoleNotifier, StdinConfirm};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("taskdeck error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = TaskdeckConfig::load().context("failed to load configuration")?;
    let data_path: PathBuf = cli.data_file.clone().unwrap_or_else(|| config.data_file.clone());

    let store = Arc::new(data_file::load(&data_path)?);
    let notifier: Arc<dyn Notifier> = if cli.quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let service = TaskService::new(store.clone(), Arc::new(SystemClock), notifier.clone());

    let initial = config.list.initial_state();
    let mut view = TaskListView::open(store.clone(), notifier, initial).await?;

    let mutated = match cli.command {
        Commands::List(args) => {
            list(&mut view, args).await?;
            false
        }
        Commands::Add(args) => {
            let due_date = parse_due_date(&args.due)?;
            let mut new = NewTask::new(args.title, args.priority, due_date);
            if let Some(description) = args.description {
                new = new.with_description(description);
            }
            let id = service.create_task(new).await?;
            println!("{id}");
            true
        }
        Commands::Toggle { id } => {
            let task = view.find(id)?;
            service.toggle_completion(task, !task.completed).await?;
            true
        }
        Commands::Edit(args) => {
            edit(&service, &view, args).await?;
            true
        }
        Commands::Delete { id, yes } => {
            view.find(id)?;
            let outcome = if yes {
                service.delete_task(id, &StaticConfirm(true)).await?
            } else {
                service.delete_task(id, &StdinConfirm).await?
            };
            outcome == DeleteOutcome::Deleted
        }
        Commands::History { id } => {
            let session = EditSession::open(view.find(id)?.clone());
            let lines = session.history_lines();
            if lines.is_empty() {
                println!("No changes recorded.");
            }
            for line in lines {
                println!("{line}");
            }
            false
        }
    };

    // release the feed before touching the file
    drop(view);
    if mutated {
        data_file::save(&data_path, &store).await?;
    }
    Ok(())
}

async fn list(view: &mut TaskListView, args: ListArgs) -> anyhow::Result<()> {
    let current: ListState = view.state().clone();
    let mut sort = current.sort;
    if let Some(primary) = args.sort {
        sort = SortConfig {
            primary,
            ..sort
        };
    }
    if let Some(secondary) = args.then {
        anyhow::ensure!(
            secondary != sort.primary,
            "--then must differ from the primary sort key ({})",
            sort.primary
        );
        sort.secondary = Some(secondary);
    } else if sort.secondary == Some(sort.primary) {
        sort.secondary = None;
    }
    if let Some(direction) = args.direction {
        sort.direction = direction;
    }
    view.set_sort(sort).await?;

    if let Some(page_size) = args.page_size {
        view.set_page_size(page_size);
    }
    view.set_search(args.search);
    view.set_page(args.page);

    println!("{}", render::page(&view.page(), SystemClock.now()));
    Ok(())
}

async fn edit(service: &TaskService, view: &TaskListView, args: EditArgs) -> anyhow::Result<()> {
    let mut session = EditSession::open(view.find(args.id)?.clone());
    let fields = session.fields_mut();
    if let Some(title) = args.title {
        fields.title = title;
    }
    if let Some(description) = args.description {
        fields.description = description;
    }
    if let Some(priority) = args.priority {
        fields.priority = priority;
    }
    if let Some(due) = args.due {
        fields.due_date = due;
    }
    session.submit(service).await?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKDECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
