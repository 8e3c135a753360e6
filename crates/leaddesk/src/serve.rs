// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leaddesk serve` command implementation.
//!
//! Opens the store, restores the trigger state, and runs the periodic
//! generation and closing checks until SIGINT or SIGTERM.

use std::time::Duration;

use leaddesk_config::model::LeaddeskConfig;
use leaddesk_core::LeaddeskError;
use leaddesk_scheduler::{run_triggers, shutdown};
use tracing::info;

use crate::app::App;

/// Runs the `leaddesk serve` command.
pub async fn run_serve(config: LeaddeskConfig) -> Result<(), LeaddeskError> {
    init_tracing(&config.app.log_level);
    info!(name = %config.app.name, "starting leaddesk serve");

    let app = App::open(&config).await?;
    let cancel = shutdown::install_signal_handler();

    if config.scheduler.enabled {
        let interval = Duration::from_secs(config.scheduler.poll_interval_secs);
        info!(
            generation_hour = config.scheduler.generation_hour,
            closing_hour = config.scheduler.closing_hour,
            state_path = %config.scheduler.state_path,
            "daily triggers enabled"
        );
        run_triggers(app.triggers.clone(), interval, cancel).await;
    } else {
        info!("daily triggers disabled, waiting for shutdown signal");
        cancel.cancelled().await;
    }

    app.shutdown().await;
    info!("leaddesk serve stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leaddesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
