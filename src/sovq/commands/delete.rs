use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

/// Removes the report record only. Its attachments stay in blob storage and
/// any tracked uploads keep their sync state.
pub fn run<S: DataStore>(store: &S, id: &str) -> Result<CmdResult> {
    let report = store.remove_report(id)?;
    tracing::info!(id = %report.id, "report deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted report: {}",
        report.name
    )));
    result.affected_reports.push(report);
    Ok(result)
}
