use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Report, ReportStatus, ReportType};
use crate::store::DataStore;

/// Equality filters, AND'ed. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.report_type.map_or(true, |t| report.report_type == t)
            && self.status.map_or(true, |s| report.status == s)
    }
}

/// Reports matching `filter`, in storage order.
pub fn run<S: DataStore>(store: &S, filter: &ReportFilter) -> Result<CmdResult> {
    let reports: Vec<Report> = store
        .list_reports()?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();
    Ok(CmdResult::default().with_listed_reports(reports))
}

pub fn find<S: DataStore>(store: &S, id: &str) -> Result<CmdResult> {
    let report = store.get_report(id)?;
    Ok(CmdResult::default().with_listed_reports(vec![report]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::fixtures::mem_store;
    use crate::commands::{create, update};
    use crate::error::SovqError;

    fn seed<S: DataStore>(store: &S) {
        create::run(store, "Germany", ReportType::Sovereign, None).unwrap();
        create::run(store, "KfW", ReportType::QuasiSovereign, None).unwrap();
        create::run(store, "France", ReportType::Sovereign, None).unwrap();
    }

    fn names(result: &CmdResult) -> Vec<&str> {
        result
            .listed_reports
            .iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    #[test]
    fn lists_everything_in_storage_order() {
        let store = mem_store();
        seed(&store);
        let result = run(&store, &ReportFilter::default()).unwrap();
        assert_eq!(names(&result), vec!["Germany", "KfW", "France"]);
    }

    #[test]
    fn filters_by_type() {
        let store = mem_store();
        seed(&store);
        let filter = ReportFilter {
            report_type: Some(ReportType::Sovereign),
            ..Default::default()
        };
        let result = run(&store, &filter).unwrap();
        assert_eq!(names(&result), vec!["Germany", "France"]);
    }

    #[test]
    fn filters_are_anded() {
        let store = mem_store();
        seed(&store);
        let france = store.list_reports().unwrap()[2].id.clone();
        let patch = update::ReportPatch {
            status: Some(ReportStatus::Completed),
            ..Default::default()
        };
        update::run(&store, &france, patch).unwrap();

        let filter = ReportFilter {
            report_type: Some(ReportType::Sovereign),
            status: Some(ReportStatus::Completed),
        };
        assert_eq!(names(&run(&store, &filter).unwrap()), vec!["France"]);

        let filter = ReportFilter {
            report_type: Some(ReportType::QuasiSovereign),
            status: Some(ReportStatus::Completed),
        };
        assert!(run(&store, &filter).unwrap().listed_reports.is_empty());
    }

    #[test]
    fn find_unknown_is_not_found() {
        let store = mem_store();
        assert!(matches!(
            find(&store, "missing").unwrap_err(),
            SovqError::ReportNotFound(_)
        ));
    }
}
