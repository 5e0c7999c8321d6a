//! Command-line client for the todolist service.
//!
//! Loads every list and its tasks, optionally runs one command, then prints
//! the lists through the read projections. Run with `--help` for the
//! commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use todolists::config::Config;
use todolists::transport::HttpTransport;
use todolists::types::{FilterValue, TaskId, TaskPatch, TaskStatus, TodolistId};
use todolists::{selectors, AppState, TodolistsAction, TodolistsApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "todolists", version, about = "Todolist client for the remote todolist service")]
struct Cli {
    /// Without a command, just show every list
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create a list
    AddList {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Rename a list
    RenameList {
        list: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a list and its tasks
    RmList { list: String },
    /// Add a task to a list
    AddTask {
        list: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Mark a task completed
    Complete { list: String, task: String },
    /// Mark a task new again
    Reopen { list: String, task: String },
    /// Delete a task
    RmTask { list: String, task: String },
    /// Choose which of a list's tasks are shown
    Filter {
        list: String,
        #[arg(value_enum)]
        filter: Filter,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Filter {
    All,
    Active,
    Completed,
}

impl From<Filter> for FilterValue {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => Self::All,
            Filter::Active => Self::Active,
            Filter::Completed => Self::Completed,
        }
    }
}

/// What to do after the initial load
enum Plan {
    Show,
    Sync(TodolistsAction),
    Filter(TodolistId, FilterValue),
}

impl From<Option<Cmd>> for Plan {
    fn from(cmd: Option<Cmd>) -> Self {
        let status = |list: String, task: String, status| {
            Self::Sync(TodolistsAction::UpdateTask {
                todolist_id: TodolistId::new(list),
                task_id: TaskId::new(task),
                patch: TaskPatch::new().status(status),
            })
        };

        match cmd {
            None => Self::Show,
            Some(Cmd::AddList { title }) => Self::Sync(TodolistsAction::CreateTodolist { title: title.join(" ") }),
            Some(Cmd::RenameList { list, title }) => Self::Sync(TodolistsAction::UpdateTodolistTitle {
                id: TodolistId::new(list),
                title: title.join(" "),
            }),
            Some(Cmd::RmList { list }) => Self::Sync(TodolistsAction::RemoveTodolist {
                id: TodolistId::new(list),
            }),
            Some(Cmd::AddTask { list, title }) => Self::Sync(TodolistsAction::CreateTask {
                todolist_id: TodolistId::new(list),
                title: title.join(" "),
            }),
            Some(Cmd::Complete { list, task }) => status(list, task, TaskStatus::Completed),
            Some(Cmd::Reopen { list, task }) => status(list, task, TaskStatus::New),
            Some(Cmd::RmTask { list, task }) => Self::Sync(TodolistsAction::RemoveTask {
                todolist_id: TodolistId::new(list),
                task_id: TaskId::new(task),
            }),
            Some(Cmd::Filter { list, filter }) => Self::Filter(TodolistId::new(list), filter.into()),
        }
    }
}

fn render(state: &AppState) -> String {
    let mut out = String::new();

    if state.todolists.is_empty() {
        out.push_str("No todolists.\n");
    }

    for todolist in selectors::todolists(state) {
        out.push_str(&format!("{} [{}] ({})\n", todolist.title, todolist.filter, todolist.id));
        let tasks = selectors::visible_tasks(state, &todolist.id);
        if tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for task in tasks {
            let mark = if task.status == TaskStatus::Completed { 'x' } else { ' ' };
            out.push_str(&format!("  [{mark}] {} ({})\n", task.title, task.id));
        }
    }

    out
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.client.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let plan = Plan::from(Cli::parse().cmd);

    tracing::info!(base_url = %config.api.base_url, "Starting todolist client");

    let transport = HttpTransport::new(&config.api).context("failed to build HTTP transport")?;
    let app = TodolistsApp::new(Arc::new(transport), config.client.settle_timeout);

    app.execute(TodolistsAction::FetchTodolists)
        .await
        .context("failed to load todolists")?;

    let ids: Vec<TodolistId> = app
        .state(|s| s.todolists.items().iter().map(|tl| tl.id.clone()).collect())
        .await;
    for todolist_id in ids {
        if let Err(error) = app.execute(TodolistsAction::FetchTasks { todolist_id: todolist_id.clone() }).await {
            tracing::warn!(%todolist_id, %error, "Failed to load tasks");
        }
    }

    match plan {
        Plan::Show => {},
        Plan::Sync(action) => {
            let kind = action.kind();
            app.execute(action).await.with_context(|| format!("{kind} failed"))?;
        },
        Plan::Filter(id, filter) => {
            app.dispatch(TodolistsAction::TodolistFilterChanged { id, filter }).await?;
        },
    }

    print!("{}", app.state(render).await);

    if let Err(error) = app.shutdown(config.client.shutdown_timeout).await {
        tracing::error!(%error, "Shutdown did not complete cleanly");
    }

    Ok(())
}
