use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use sovq::api::{
    BatchResult, CmdMessage, ItemOutcome, MessageLevel, StatusSummary, SyncSummary, WorkQueue,
};
use sovq::error::{Result, SovqError};
use sovq::model::{Report, ReportStatus, SyncStatus, UploadedFile};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 28;
const STATUS_WIDTH: usize = 15;
const TYPE_WIDTH: usize = 16;
const FILE_WIDTH: usize = 44;
const TIME_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// In JSON mode stdout carries only the document; warnings go to stderr.
pub(super) fn print_warnings_to_stderr(messages: &[CmdMessage]) {
    for message in messages {
        if message.level == MessageLevel::Warning {
            eprintln!("{}", message.content.yellow());
        }
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(SovqError::Serialization)?;
    println!("{}", out);
    Ok(())
}

pub(super) fn print_reports(reports: &[Report]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }

    for report in reports {
        let name = pad_to_width(&truncate_to_width(&report.name, NAME_WIDTH), NAME_WIDTH);
        let kind = format!("{:<width$}", report.report_type, width = TYPE_WIDTH);
        let status = format!("{:<width$}", report.status, width = STATUS_WIDTH);
        println!(
            "  {}  {}{}{}{}",
            report.id.dimmed(),
            name,
            kind.normal(),
            color_report_status(report.status, &status),
            format_time_ago(report.updated_at).dimmed()
        );
    }
}

pub(super) fn print_report_detail(report: &Report) {
    println!("{}", report.name.bold());
    println!("--------------------------------");
    println!("{:<12}{}", "id", report.id);
    println!("{:<12}{}", "type", report.report_type);
    println!(
        "{:<12}{}",
        "status",
        color_report_status(report.status, report.status.as_str())
    );
    println!(
        "{:<12}{}",
        "description",
        report.description.as_deref().unwrap_or("-")
    );
    println!("{:<12}{}", "created", report.created_at.to_rfc3339());
    println!("{:<12}{}", "updated", report.updated_at.to_rfc3339());
    print_attachments(&report.attachments);
}

pub(super) fn print_attachments(attachments: &[String]) {
    if attachments.is_empty() {
        println!("{}", "No attachments.".dimmed());
        return;
    }
    println!("attachments ({}):", attachments.len());
    for filename in attachments {
        println!("  {}", filename);
    }
}

pub(super) fn print_uploads(uploads: &[UploadedFile]) {
    if uploads.is_empty() {
        println!("No uploads found.");
        return;
    }

    for upload in uploads {
        let name = pad_to_width(&truncate_to_width(&upload.filename, FILE_WIDTH), FILE_WIDTH);
        let status = format!("{:<width$}", upload.sync_status, width = STATUS_WIDTH);
        println!(
            "  {}{}{:>10}  {}",
            name,
            color_sync_status(upload.sync_status, &status),
            format_size(upload.size),
            format_time_ago(upload.uploaded_at).dimmed()
        );
    }
}

pub(super) fn print_batch(batch: &BatchResult, verb: &str) {
    println!(
        "{}",
        format!("{} {} of {}", verb, batch.updated(), batch.items.len()).green()
    );
    for item in batch.skipped() {
        let reason = match item.outcome {
            ItemOutcome::NotFound => "not found".to_string(),
            ItemOutcome::NotPending(status) => format!("already {}", status),
            ItemOutcome::Updated => continue,
        };
        println!("  {} {}", item.key.yellow(), format!("({})", reason).dimmed());
    }
}

pub(super) fn print_sync_summary(summary: &SyncSummary) {
    let rows = [
        (SyncStatus::PendingSync, summary.pending_sync),
        (SyncStatus::Synced, summary.synced),
        (SyncStatus::Processing, summary.processing),
        (SyncStatus::Processed, summary.processed),
    ];
    for (status, count) in rows {
        let label = format!("{:<width$}", status, width = STATUS_WIDTH);
        println!("  {}{:>5}", color_sync_status(status, &label), count);
    }
    println!("  {:<width$}{:>5}", "total", summary.total(), width = STATUS_WIDTH);
}

pub(super) fn print_queue(queue: &WorkQueue) {
    let sections = [
        ("Needs research", &queue.needs_research, queue.summary.needs_research),
        ("Needs update", &queue.needs_update, queue.summary.needs_update),
        ("Recently uploaded", &queue.raw_uploaded, queue.summary.raw_uploaded),
    ];
    for (title, items, total) in sections {
        println!("{} ({})", title.bold(), total);
        if items.is_empty() {
            println!("  {}", "-".dimmed());
        }
        for item in items {
            println!(
                "  {}  {}",
                item.id.dimmed(),
                truncate_to_width(&item.name, NAME_WIDTH)
            );
        }
        if total > items.len() {
            println!("  {}", format!("... and {} more", total - items.len()).dimmed());
        }
        println!();
    }

    match queue.next_item() {
        Some(next) => println!("Next: {} ({})", next.name.bold(), next.id),
        None => println!("{}", "Nothing to do.".green()),
    }
    if queue.summary.pending_sync > 0 {
        println!(
            "{}",
            format!("{} upload(s) pending sync", queue.summary.pending_sync).yellow()
        );
    }
}

pub(super) fn print_status_summary(summary: &StatusSummary) {
    println!("{} ({})", "Reports".bold(), summary.reports.total);
    for (status, count) in &summary.reports.by_status {
        let label = format!("{:<width$}", status, width = STATUS_WIDTH);
        println!("  {}{:>5}", color_report_status(*status, &label), count);
    }
    println!("{} ({})", "Uploads".bold(), summary.uploads.total);
    for (status, count) in &summary.uploads.by_sync_status {
        let label = format!("{:<width$}", status, width = STATUS_WIDTH);
        println!("  {}{:>5}", color_sync_status(*status, &label), count);
    }
}

fn color_report_status(status: ReportStatus, text: &str) -> colored::ColoredString {
    match status {
        ReportStatus::NeedsResearch => text.red(),
        ReportStatus::RawUploaded => text.cyan(),
        ReportStatus::InProgress => text.blue(),
        ReportStatus::Completed => text.green(),
        ReportStatus::NeedsUpdate => text.yellow(),
    }
}

fn color_sync_status(status: SyncStatus, text: &str) -> colored::ColoredString {
    match status {
        SyncStatus::PendingSync => text.yellow(),
        SyncStatus::Synced => text.cyan(),
        SyncStatus::Processing => text.blue(),
        SyncStatus::Processed => text.green(),
    }
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
