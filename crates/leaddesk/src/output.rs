// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for command results.
//!
//! Colors are used only when stdout is a TTY and `--plain` was not passed.

use std::io::IsTerminal;

use chrono::NaiveDate;
use leaddesk_core::{DailyFolder, FolderStatus, TaskStatus, TaskType};
use leaddesk_daily::{DailySummary, TaskRow};
use leaddesk_scheduler::SkipReason;
use serde::Serialize;

pub struct Output {
    color: bool,
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "calling",
        TaskStatus::Completed => "done",
        TaskStatus::Skipped => "skipped",
        TaskStatus::Archived => "archived",
    }
}

fn type_label(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::FollowUp => "follow-up",
        TaskType::Callback => "callback",
        TaskType::NewContact => "new",
    }
}

/// Human-readable reason for a trigger that did not fire.
pub fn describe_skip(reason: SkipReason) -> String {
    match reason {
        SkipReason::BeforeHour(hour) => format!("not before {hour:02}:00"),
        SkipReason::AlreadyRecorded => "already done today".to_string(),
        SkipReason::FolderExists => "today's folder already exists".to_string(),
        SkipReason::NoFolder => "no folder for today".to_string(),
        SkipReason::FolderNotActive => "today's folder is already closed".to_string(),
    }
}

/// Success rate as a percentage with one decimal.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

impl Output {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn ok(&self, message: &str) {
        if self.color {
            use colored::Colorize;
            println!("  {} {message}", "✓".green());
        } else {
            println!("  [OK] {message}");
        }
    }

    pub fn skipped(&self, message: &str) {
        if self.color {
            use colored::Colorize;
            println!("  {} {}", "-".yellow(), message.yellow());
        } else {
            println!("  [SKIP] {message}");
        }
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn header(&self, title: &str) {
        println!();
        if self.color {
            use colored::Colorize;
            println!("  {}", title.bold());
        } else {
            println!("  {title}");
        }
        println!("  {}", "-".repeat(60));
    }

    pub fn worklist(&self, date: NaiveDate, rows: &[TaskRow]) {
        self.header(&format!("leaddesk worklist {date}"));
        if rows.is_empty() {
            println!("    (no tasks)");
        }
        for row in rows {
            let time = row
                .task
                .scheduled_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            let line = format!(
                "{:>4}  {time}  {:<10} {:<9} {:<28} {}",
                row.task.priority,
                type_label(row.task.task_type),
                status_label(row.task.status),
                row.owner_name,
                row.task.id,
            );
            if self.color && row.task.task_type == TaskType::FollowUp {
                use colored::Colorize;
                println!("  {}", line.cyan());
            } else {
                println!("  {line}");
            }
        }
        println!();
    }

    pub fn summary(&self, summary: &DailySummary) {
        let folder = &summary.folder;
        self.header(&format!("leaddesk summary {} ({})", folder.date, folder.status));
        println!(
            "    Planned:      {} new contacts, {} follow-ups",
            folder.total_contacts, folder.total_followups
        );
        println!(
            "    Calls:        {} completed, {} successful ({})",
            folder.completed_calls,
            folder.successful_calls,
            format_rate(summary.success_rate)
        );
        println!("    Appointments: {}", folder.appointments_set);
        let s = &summary.by_status;
        println!(
            "    Tasks:        {} pending, {} calling, {} archived",
            s.pending, s.in_progress, s.archived
        );
        println!();
    }

    pub fn history(&self, folders: &[DailyFolder]) {
        self.header("leaddesk history");
        for folder in folders {
            let status = match folder.status {
                FolderStatus::Active => "open",
                FolderStatus::Completed => "closed",
                FolderStatus::Cancelled => "cancelled",
            };
            println!(
                "    {}  {:<9} {:>3} calls  {:>3} successful  {:>3} appointments",
                folder.date,
                status,
                folder.completed_calls,
                folder.successful_calls,
                folder.appointments_set
            );
        }
        println!();
    }
}
