use crate::commands::{BatchResult, ItemOutcome};
use crate::error::Result;
use crate::model::ReportStatus;
use crate::store::DataStore;
use serde::Deserialize;

/// One entry of a batch status update, as sent by the processing agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    pub status: ReportStatus,
}

/// Sets each report's status in one load-save cycle. Unknown ids are
/// skipped; every other item is applied.
pub fn run<S: DataStore>(store: &S, updates: &[StatusUpdate]) -> Result<BatchResult> {
    if updates.is_empty() {
        return Ok(BatchResult::default());
    }

    let batch = store.modify_reports(|reports| {
        let mut batch = BatchResult::default();
        for update in updates {
            match reports.iter_mut().find(|r| r.id == update.id) {
                Some(report) => {
                    report.status = update.status;
                    report.touch();
                    batch.push(&update.id, ItemOutcome::Updated);
                }
                None => {
                    tracing::debug!(id = %update.id, "batch status: unknown report skipped");
                    batch.push(&update.id, ItemOutcome::NotFound);
                }
            }
        }
        Ok(batch)
    })?;

    tracing::info!(
        updated = batch.updated(),
        requested = updates.len(),
        "batch status update"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::helpers::fixtures::mem_store;
    use crate::model::ReportType;

    #[test]
    fn applies_known_and_skips_unknown() {
        let store = mem_store();
        let id = create::run(&store, "Germany", ReportType::Sovereign, None)
            .unwrap()
            .affected_reports[0]
            .id
            .clone();

        let updates = vec![
            StatusUpdate {
                id: "report_0_missing".into(),
                status: ReportStatus::Completed,
            },
            StatusUpdate {
                id: id.clone(),
                status: ReportStatus::Completed,
            },
        ];
        let batch = run(&store, &updates).unwrap();

        assert_eq!(batch.updated(), 1);
        assert_eq!(batch.outcome_of(&id), Some(ItemOutcome::Updated));
        assert_eq!(
            batch.outcome_of("report_0_missing"),
            Some(ItemOutcome::NotFound)
        );
        assert_eq!(
            store.get_report(&id).unwrap().status,
            ReportStatus::Completed
        );
    }

    #[test]
    fn parses_agent_payload() {
        let raw = r#"[{"id": "report_1_abc", "status": "needs-update"}]"#;
        let updates: Vec<StatusUpdate> = serde_json::from_str(raw).unwrap();
        assert_eq!(updates[0].status, ReportStatus::NeedsUpdate);
    }

    #[test]
    fn empty_batch_touches_nothing() {
        let store = mem_store();
        store.backend().set_simulate_write_error(true);
        assert_eq!(run(&store, &[]).unwrap().updated(), 0);
    }
}
