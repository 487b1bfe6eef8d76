use crate::commands::helpers::{find_report_mut, optional_text, required_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ReportStatus;
use crate::store::DataStore;

/// Fields to change. Absent fields are left alone; a blank description
/// counts as absent.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub name: Option<String>,
    pub status: Option<ReportStatus>,
    pub description: Option<String>,
}

pub fn run<S: DataStore>(store: &S, id: &str, patch: ReportPatch) -> Result<CmdResult> {
    // Validate before touching the store so a bad patch has no effect.
    let name = patch.name.as_deref().map(required_name).transpose()?;
    let description = optional_text(patch.description);

    let (report, previous_status) = store.modify_reports(|reports| {
        let report = find_report_mut(reports, id)?;
        let previous_status = report.status;

        if let Some(name) = name {
            report.name = name;
        }
        if let Some(status) = patch.status {
            report.status = status;
        }
        if let Some(description) = description {
            report.description = Some(description);
        }
        report.touch();
        Ok((report.clone(), previous_status))
    })?;

    let mut result = CmdResult::default();
    if !previous_status.follows_lifecycle(report.status) {
        tracing::warn!(
            id = %report.id,
            from = %previous_status,
            to = %report.status,
            "status change outside the usual lifecycle"
        );
        result.add_message(CmdMessage::warning(format!(
            "Status moved from {} to {} (outside the usual lifecycle)",
            previous_status, report.status
        )));
    }

    tracing::info!(id = %report.id, status = %report.status, "report updated");
    result.add_message(CmdMessage::success(format!(
        "Updated report: {}",
        report.name
    )));
    result.affected_reports.push(report);
    Ok(result)
}
