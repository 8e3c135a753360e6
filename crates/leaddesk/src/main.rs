// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaddesk - daily call-task lifecycle for a real-estate CRM.
//!
//! This is the binary entry point: the trigger daemon (`serve`) plus one
//! subcommand per folder and task operation.

mod app;
mod output;
mod serve;
mod tasks;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leaddesk_config::model::LeaddeskConfig;
use leaddesk_core::LeaddeskError;
use leaddesk_daily::{SortOrder, ViewFilter};

/// Leaddesk - daily call-task lifecycle for a real-estate CRM.
#[derive(Parser, Debug)]
#[command(name = "leaddesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the generation and closing triggers until interrupted.
    Serve,
    /// Generate today's folder now, regardless of the hour.
    Generate {
        /// Ignore the recorded "already generated today" guard.
        #[arg(long)]
        force: bool,
    },
    /// Close today's folder now, regardless of the hour.
    Close {
        /// Ignore the recorded "already closed today" guard.
        #[arg(long)]
        force: bool,
    },
    /// Show today's worklist.
    Today {
        /// active, archived, or all.
        #[arg(long, default_value = "active")]
        view: ViewFilter,
        /// priority, name, or type.
        #[arg(long, default_value = "priority")]
        sort: SortOrder,
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as being called.
    Start { id: String },
    /// Record a call outcome and archive the task.
    Resolve {
        id: String,
        /// Free-text outcome, e.g. "Richiamare" or "Appuntamento fissato".
        outcome: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Archive a task without an outcome.
    Archive { id: String },
    /// Put an archived task back on the worklist.
    Restore { id: String },
    /// Swap the priorities of two adjacent active tasks.
    Reorder { first: String, second: String },
    /// Move a task one place up the worklist.
    Up { id: String },
    /// Move a task one place down the worklist.
    Down { id: String },
    /// Replace a task's notes.
    Notes { id: String, text: String },
    /// Permanently delete a task.
    Delete { id: String },
    /// Show a day's performance summary.
    Summary {
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// List recent folders, newest first.
    History {
        #[arg(long, default_value_t = 14)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Show undelivered change events from the outbox.
    Outbox {
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Mark the listed events as delivered.
        #[arg(long)]
        ack: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> LeaddeskConfig {
    let loaded = match path {
        Some(path) => leaddesk_config::load_and_validate_path(path),
        None => leaddesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            leaddesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: LeaddeskConfig) -> Result<(), LeaddeskError> {
    let command = match cli.command {
        None => {
            println!("leaddesk: use --help for available commands");
            return Ok(());
        }
        Some(Commands::Serve) => return serve::run_serve(config).await,
        Some(command) => command,
    };

    serve::init_tracing(&config.app.log_level);
    let app = app::App::open(&config).await?;
    let out = output::Output::new(cli.plain);
    let result = match command {
        // Handled above.
        Commands::Serve => Ok(()),
        Commands::Generate { force } => tasks::generate(&app, &out, force).await,
        Commands::Close { force } => tasks::close(&app, &out, force).await,
        Commands::Today { view, sort, json } => tasks::today(&app, &out, view, sort, json).await,
        Commands::Start { id } => tasks::start(&app, &out, &id).await,
        Commands::Resolve { id, outcome, notes } => {
            tasks::resolve(&app, &out, &id, &outcome, notes).await
        }
        Commands::Archive { id } => tasks::archive(&app, &out, &id).await,
        Commands::Restore { id } => tasks::restore(&app, &out, &id).await,
        Commands::Reorder { first, second } => tasks::reorder(&app, &out, &first, &second).await,
        Commands::Up { id } => tasks::move_up(&app, &out, &id).await,
        Commands::Down { id } => tasks::move_down(&app, &out, &id).await,
        Commands::Notes { id, text } => tasks::notes(&app, &out, &id, &text).await,
        Commands::Delete { id } => tasks::delete(&app, &out, &id).await,
        Commands::Summary { date, json } => tasks::summary(&app, &out, date, json).await,
        Commands::History { limit, json } => tasks::history(&app, &out, limit, json).await,
        Commands::Outbox { limit, ack } => tasks::outbox(&app, &out, limit, ack).await,
    };
    app.shutdown().await;
    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    if let Err(e) = run(cli, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
