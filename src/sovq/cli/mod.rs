//! CLI client: parse arguments, call the API, print the result.
//!
//! Every handler follows the same shape: one API call, then either the
//! `--json` document or the human-readable table plus messages.

mod args;
mod print;

use args::{Cli, Commands, ReportCommands, UploadCommands};
use clap::Parser;
use print::*;
use sovq::api::{CmdMessage, CmdResult};
use sovq::error::{Result, SovqError};
use sovq::init::{initialize, SovqContext};
use sovq::logging::init_logging;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd, cli.data_dir.clone())?;

    let filter = if cli.verbose { "debug" } else { ctx.config.log.as_str() };
    init_logging(filter);
    tracing::debug!(data_dir = %ctx.data_dir.display(), "context ready");

    let out = Output { json: cli.json };
    match cli.command {
        Commands::Report(cmd) => handle_report(&ctx, &out, cmd),
        Commands::Upload(cmd) => handle_upload(&ctx, &out, cmd),
        Commands::Queue => handle_queue(&ctx, &out),
        Commands::Summary => handle_summary(&ctx, &out),
        Commands::Markdown => handle_markdown(&ctx),
    }
}

struct Output {
    json: bool,
}

impl Output {
    /// Messages for a terminal, the changed records for `--json`.
    fn result(&self, result: &CmdResult) -> Result<()> {
        if self.json {
            print_warnings_to_stderr(&result.messages);
            if !result.affected_reports.is_empty() {
                return print_json(&result.affected_reports);
            }
            return print_json(&result.uploads);
        }
        print_messages(&result.messages);
        Ok(())
    }
}

fn handle_report(ctx: &SovqContext, out: &Output, cmd: ReportCommands) -> Result<()> {
    let api = &ctx.api;
    match cmd {
        ReportCommands::Add {
            name,
            report_type,
            description,
        } => {
            let result = api.create_report(&name, &report_type, description)?;
            if out.json {
                return print_json(&result.affected_reports[..]);
            }
            print_messages(&result.messages);
            Ok(())
        }
        ReportCommands::List {
            report_type,
            status,
        } => {
            let result = api.list_reports(report_type.as_deref(), status.as_deref())?;
            if out.json {
                return print_json(&result.listed_reports);
            }
            print_reports(&result.listed_reports);
            Ok(())
        }
        ReportCommands::Show { id } => {
            let result = api.get_report(&id)?;
            if out.json {
                return print_json(&result.listed_reports[..]);
            }
            for report in &result.listed_reports {
                print_report_detail(report);
            }
            Ok(())
        }
        ReportCommands::Update {
            id,
            name,
            status,
            description,
        } => {
            let result = api.update_report(&id, name, status.as_deref(), description)?;
            out.result(&result)
        }
        ReportCommands::Delete { id } => {
            let result = api.delete_report(&id)?;
            out.result(&result)
        }
        ReportCommands::Attach { id, filename } => {
            let result = api.attach_file(&id, &filename)?;
            out.result(&result)
        }
        ReportCommands::Attachments { id } => {
            let result = api.get_attachments(&id)?;
            if out.json {
                return print_json(&result.attachments);
            }
            print_attachments(&result.attachments);
            Ok(())
        }
        ReportCommands::BatchStatus { updates } => {
            let batch = api.batch_update_status(&updates)?;
            if out.json {
                return print_json(&batch);
            }
            print_batch(&batch, "Updated");
            Ok(())
        }
    }
}

fn handle_upload(ctx: &SovqContext, out: &Output, cmd: UploadCommands) -> Result<()> {
    let api = &ctx.api;
    match cmd {
        UploadCommands::Put { path, report, name } => {
            let bytes = std::fs::read(&path)?;
            let original_name = match name {
                Some(name) => name,
                None => file_name_of(&path)?,
            };
            let receipt = api.upload(&bytes, &original_name, report.as_deref())?;
            if out.json {
                return print_json(&receipt);
            }
            print_messages(&[CmdMessage::success(format!(
                "Stored {} as {} ({})",
                original_name, receipt.stored_filename, receipt.sync_status
            ))]);
            Ok(())
        }
        UploadCommands::Pending => {
            let result = api.list_pending()?;
            if out.json {
                return print_json(&result.uploads);
            }
            print_uploads(&result.uploads);
            Ok(())
        }
        UploadCommands::MarkSynced { filenames } => {
            let batch = api.mark_synced(&filenames[..])?;
            if out.json {
                return print_json(&batch);
            }
            print_batch(&batch, "Marked synced");
            Ok(())
        }
        UploadCommands::SetStatus { filename, status } => {
            let result = api.set_sync_status(&filename, &status)?;
            out.result(&result)
        }
        UploadCommands::Status => {
            let summary = api.sync_summary()?;
            if out.json {
                return print_json(&summary);
            }
            print_sync_summary(&summary);
            Ok(())
        }
        UploadCommands::Download { filename, output } => {
            let download = api.download(&filename)?;
            match output {
                Some(target) => {
                    std::fs::write(&target, &download.bytes)?;
                    eprintln!("Wrote {} bytes to {}", download.bytes.len(), target.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&download.bytes)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
        UploadCommands::Files => {
            let files = api.list_stored_files()?;
            if out.json {
                return print_json(&files);
            }
            if files.is_empty() {
                print_messages(&[CmdMessage::info("No stored files.")]);
            }
            for file in &files {
                println!("{}", file);
            }
            Ok(())
        }
    }
}

fn handle_queue(ctx: &SovqContext, out: &Output) -> Result<()> {
    let queue = ctx.api.work_queue()?;
    if out.json {
        return print_json(&queue);
    }
    print_queue(&queue);
    Ok(())
}

fn handle_summary(ctx: &SovqContext, out: &Output) -> Result<()> {
    let summary = ctx.api.status_summary()?;
    if out.json {
        return print_json(&summary);
    }
    print_status_summary(&summary);
    Ok(())
}

fn handle_markdown(ctx: &SovqContext) -> Result<()> {
    print!("{}", ctx.api.render_markdown()?);
    Ok(())
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            SovqError::validation(format!("cannot take a filename from {}", path.display()))
        })
}
