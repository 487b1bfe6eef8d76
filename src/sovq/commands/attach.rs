use crate::commands::helpers::find_report_mut;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SovqError};
use crate::store::DataStore;

/// Appends `filename` to the report's attachments.
///
/// The link is advisory: the filename is not checked against tracked uploads
/// or stored blobs, and attaching the same name twice keeps both entries.
pub fn run<S: DataStore>(store: &S, report_id: &str, filename: &str) -> Result<CmdResult> {
    if filename.trim().is_empty() {
        return Err(SovqError::validation("attachment filename is required"));
    }

    let report = store.modify_reports(|reports| {
        let report = find_report_mut(reports, report_id)?;
        report.attachments.push(filename.to_string());
        report.touch();
        Ok(report.clone())
    })?;

    tracing::info!(id = %report.id, filename, "attachment added");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Attached {} to report {}",
        filename, report.name
    )));
    result.attachments = report.attachments.clone();
    result.affected_reports.push(report);
    Ok(result)
}

/// The report's attachment list, in append order.
pub fn list<S: DataStore>(store: &S, report_id: &str) -> Result<CmdResult> {
    let report = store.get_report(report_id)?;
    Ok(CmdResult::default().with_attachments(report.attachments))
}
