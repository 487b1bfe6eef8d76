//! Markdown summary of the reports collection.
//!
//! Display only: the output is written next to `reports.json` on every save
//! and served on demand, but nothing ever parses it back.

use crate::model::{Report, ReportType};
use std::fmt::Write;

const TITLE: &str = "# Sovereign & Quasi-Sovereign Reports";
const TABLE_HEADER: &str = "| Name | Status | Description | Attachments |\n\
                            |------|--------|-------------|-------------|\n";

fn section_heading(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Sovereign => "## Sovereign Reports",
        ReportType::QuasiSovereign => "## Quasi-Sovereign Reports",
    }
}

/// Table cells are single-line and must not contain a bare column separator.
fn cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

pub fn render_markdown(reports: &[Report]) -> String {
    let mut md = format!("{}\n\n", TITLE);

    for report_type in ReportType::ALL {
        md.push_str(section_heading(report_type));
        md.push_str("\n\n");

        let rows: Vec<&Report> = reports
            .iter()
            .filter(|r| r.report_type == report_type)
            .collect();

        if rows.is_empty() {
            let _ = writeln!(md, "_No {} reports yet_\n", report_type);
            continue;
        }

        md.push_str(TABLE_HEADER);
        for r in rows {
            let description = r.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("-");
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} files |",
                cell(&r.name),
                r.status,
                cell(description),
                r.attachments.len()
            );
        }
        md.push('\n');
    }

    md
}
