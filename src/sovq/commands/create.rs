use crate::commands::helpers::{optional_text, required_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{generate_report_id, Report, ReportType};
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &S,
    name: &str,
    report_type: ReportType,
    description: Option<String>,
) -> Result<CmdResult> {
    let name = required_name(name)?;
    let mut report = Report::new(name, report_type, optional_text(description));

    let report = store.modify_reports(move |reports| {
        while reports.iter().any(|r| r.id == report.id) {
            report.id = generate_report_id();
        }
        reports.push(report.clone());
        Ok(report)
    })?;

    tracing::info!(id = %report.id, name = %report.name, "report created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created report: {} ({})",
        report.name, report.id
    )));
    result.affected_reports.push(report);
    Ok(result)
}
