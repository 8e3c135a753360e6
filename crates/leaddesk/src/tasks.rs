// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folder and task subcommands.

use chrono::NaiveDate;
use leaddesk_core::{DailyTaskItem, LeaddeskError};
use leaddesk_daily::{SortOrder, TaskRow, ViewFilter, project};
use leaddesk_scheduler::TriggerOutcome;
use serde::Serialize;

use crate::app::App;
use crate::output::{Output, describe_skip};

#[derive(Serialize)]
struct WorklistJson<'a> {
    folder: &'a leaddesk_core::DailyFolder,
    tasks: &'a [TaskRow],
}

pub async fn generate(app: &App, out: &Output, force: bool) -> Result<(), LeaddeskError> {
    match app.triggers.generate_now(force).await? {
        TriggerOutcome::Generated(generated) => out.ok(&format!(
            "generated folder for {} with {} tasks ({} new contacts, {} follow-ups)",
            generated.folder.date,
            generated.tasks.len(),
            generated.folder.total_contacts,
            generated.folder.total_followups
        )),
        TriggerOutcome::Skipped(reason) => out.skipped(&describe_skip(reason)),
        TriggerOutcome::Closed(_) => {}
    }
    Ok(())
}

pub async fn close(app: &App, out: &Output, force: bool) -> Result<(), LeaddeskError> {
    match app.triggers.close_now(force).await? {
        TriggerOutcome::Closed(folder) => out.ok(&format!(
            "closed folder for {}: {} calls, {} successful, {} appointments",
            folder.date, folder.completed_calls, folder.successful_calls, folder.appointments_set
        )),
        TriggerOutcome::Skipped(reason) => out.skipped(&describe_skip(reason)),
        TriggerOutcome::Generated(_) => {}
    }
    Ok(())
}

pub async fn today(
    app: &App,
    out: &Output,
    view: ViewFilter,
    sort: SortOrder,
    json: bool,
) -> Result<(), LeaddeskError> {
    let Some(folder_view) = app.lifecycle.load_today().await? else {
        out.skipped("no folder for today yet; run `leaddesk generate`");
        return Ok(());
    };
    let rows = app.lifecycle.rows(folder_view.tasks).await?;
    let rows = project(rows, view, sort);
    if json {
        out.json(&WorklistJson {
            folder: &folder_view.folder,
            tasks: &rows,
        });
    } else {
        out.worklist(folder_view.folder.date, &rows);
    }
    Ok(())
}

fn describe(task: &DailyTaskItem) -> String {
    format!("task {} ({})", task.id, task.status)
}

pub async fn start(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    let task = app.machine.start(id).await?;
    out.ok(&format!("calling {}", describe(&task)));
    Ok(())
}

pub async fn resolve(
    app: &App,
    out: &Output,
    id: &str,
    outcome: &str,
    notes: Option<String>,
) -> Result<(), LeaddeskError> {
    let resolution = app.machine.resolve(id, outcome, notes).await?;
    out.ok(&format!(
        "resolved {} as {}",
        describe(&resolution.task),
        resolution.category
    ));
    if let Some(appointment) = &resolution.follow_up {
        out.ok(&format!(
            "follow-up {} on {}: {}",
            appointment.appointment_type, appointment.date, appointment.title
        ));
        if let Some(script) = &appointment.whatsapp_script {
            println!("\n    {script}\n");
        }
    }
    Ok(())
}

pub async fn archive(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    let task = app.machine.archive_manual(id).await?;
    out.ok(&format!("archived {}", describe(&task)));
    Ok(())
}

pub async fn restore(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    let task = app.machine.restore(id).await?;
    out.ok(&format!("restored {}", describe(&task)));
    Ok(())
}

fn report_swap(out: &Output, (a, b): (DailyTaskItem, DailyTaskItem)) {
    out.ok(&format!(
        "task {} now at priority {}, task {} at {}",
        a.id, a.priority, b.id, b.priority
    ));
}

pub async fn reorder(
    app: &App,
    out: &Output,
    first: &str,
    second: &str,
) -> Result<(), LeaddeskError> {
    report_swap(out, app.machine.reorder(first, second).await?);
    Ok(())
}

pub async fn move_up(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    report_swap(out, app.machine.move_up(id).await?);
    Ok(())
}

pub async fn move_down(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    report_swap(out, app.machine.move_down(id).await?);
    Ok(())
}

pub async fn notes(app: &App, out: &Output, id: &str, text: &str) -> Result<(), LeaddeskError> {
    let task = app.machine.edit_notes(id, text).await?;
    out.ok(&format!("updated notes of {}", describe(&task)));
    Ok(())
}

pub async fn delete(app: &App, out: &Output, id: &str) -> Result<(), LeaddeskError> {
    app.machine.delete(id).await?;
    out.ok(&format!("deleted task {id}"));
    Ok(())
}

pub async fn summary(
    app: &App,
    out: &Output,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<(), LeaddeskError> {
    let date = date.unwrap_or_else(|| app.lifecycle.today());
    let summary = app.lifecycle.summary(date).await?;
    if json {
        out.json(&summary);
    } else {
        out.summary(&summary);
    }
    Ok(())
}

pub async fn history(
    app: &App,
    out: &Output,
    limit: usize,
    json: bool,
) -> Result<(), LeaddeskError> {
    let folders = app.lifecycle.history(limit).await?;
    if json {
        out.json(&folders);
    } else {
        out.history(&folders);
    }
    Ok(())
}

pub async fn outbox(app: &App, out: &Output, limit: usize, ack: bool) -> Result<(), LeaddeskError> {
    let pending = app.store.pending_notifications(limit).await?;
    if pending.is_empty() {
        out.skipped("no pending events");
        return Ok(());
    }
    for entry in &pending {
        println!("  #{:<6} {:<20} {}", entry.id, entry.kind, entry.created_at);
    }
    if ack {
        for entry in &pending {
            app.store.mark_delivered(entry.id).await?;
        }
        out.ok(&format!("marked {} events delivered", pending.len()));
    }
    Ok(())
}
