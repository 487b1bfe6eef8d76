//! # Work Queue
//!
//! Read-only views computed from the current contents of both collections.
//! Nothing here writes.
//!
//! The queue tells the processing agent what to do next, in fixed priority:
//!
//! 1. `needs-research`: reports with no source material yet.
//! 2. `needs-update`: finished work sent back by a reviewer.
//! 3. `raw-uploaded`: fresh uploads, capped at [`RECENT_UPLOADS_LIMIT`] for
//!    situational awareness rather than as a full worklist.
//!
//! The pending-sync count rides along so the agent knows whether to pull files
//! first.

use crate::error::Result;
use crate::model::{Report, ReportStatus, ReportType, SyncStatus, UploadedFile};
use crate::store::DataStore;
use serde::Serialize;
use std::collections::BTreeMap;

pub const RECENT_UPLOADS_LIMIT: usize = 5;

/// Lightweight projection of a report for queue consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBrief {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Report> for ReportBrief {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            report_type: r.report_type,
            description: r.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueCounts {
    pub needs_research: usize,
    pub needs_update: usize,
    /// Full count, not capped like the `raw_uploaded` list.
    pub raw_uploaded: usize,
    pub pending_sync: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkQueue {
    pub needs_research: Vec<ReportBrief>,
    pub needs_update: Vec<ReportBrief>,
    pub raw_uploaded: Vec<ReportBrief>,
    pub summary: QueueCounts,
}

impl WorkQueue {
    /// The single most urgent item, following the queue priority.
    pub fn next_item(&self) -> Option<&ReportBrief> {
        self.needs_research
            .first()
            .or_else(|| self.needs_update.first())
            .or_else(|| self.raw_uploaded.first())
    }

    pub fn is_empty(&self) -> bool {
        self.needs_research.is_empty()
            && self.needs_update.is_empty()
            && self.raw_uploaded.is_empty()
    }
}

pub fn derive_queue(reports: &[Report], uploads: &[UploadedFile]) -> WorkQueue {
    let with_status = |status: ReportStatus| -> Vec<ReportBrief> {
        reports
            .iter()
            .filter(|r| r.status == status)
            .map(ReportBrief::from)
            .collect()
    };

    let needs_research = with_status(ReportStatus::NeedsResearch);
    let needs_update = with_status(ReportStatus::NeedsUpdate);
    let mut raw_uploaded = with_status(ReportStatus::RawUploaded);

    let summary = QueueCounts {
        needs_research: needs_research.len(),
        needs_update: needs_update.len(),
        raw_uploaded: raw_uploaded.len(),
        pending_sync: uploads
            .iter()
            .filter(|u| u.sync_status == SyncStatus::PendingSync)
            .count(),
    };
    raw_uploaded.truncate(RECENT_UPLOADS_LIMIT);

    WorkQueue {
        needs_research,
        needs_update,
        raw_uploaded,
        summary,
    }
}

pub fn build<S: DataStore>(store: &S) -> Result<WorkQueue> {
    let reports = store.list_reports()?;
    let uploads = store.list_uploads()?;
    Ok(derive_queue(&reports, &uploads))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCounts {
    pub total: usize,
    /// Only statuses that occur; no zero entries.
    pub by_status: BTreeMap<ReportStatus, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCounts {
    pub total: usize,
    /// Only statuses that occur; no zero entries.
    pub by_sync_status: BTreeMap<SyncStatus, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub reports: ReportCounts,
    pub uploads: UploadCounts,
}

pub fn derive_summary(reports: &[Report], uploads: &[UploadedFile]) -> StatusSummary {
    let mut by_status = BTreeMap::new();
    for r in reports {
        *by_status.entry(r.status).or_insert(0) += 1;
    }
    let mut by_sync_status = BTreeMap::new();
    for u in uploads {
        *by_sync_status.entry(u.sync_status).or_insert(0) += 1;
    }

    StatusSummary {
        reports: ReportCounts {
            total: reports.len(),
            by_status,
        },
        uploads: UploadCounts {
            total: uploads.len(),
            by_sync_status,
        },
    }
}

pub fn summary<S: DataStore>(store: &S) -> Result<StatusSummary> {
    let reports = store.list_reports()?;
    let uploads = store.list_uploads()?;
    Ok(derive_summary(&reports, &uploads))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, status: ReportStatus) -> Report {
        let mut r = Report::new(name.into(), ReportType::Sovereign, None);
        r.status = status;
        r
    }

    fn upload(name: &str, status: SyncStatus) -> UploadedFile {
        let mut u = UploadedFile::new(name.into(), name.into(), 1);
        u.sync_status = status;
        u
    }

    #[test]
    fn partitions_by_status() {
        let reports = vec![
            report("A", ReportStatus::NeedsResearch),
            report("B", ReportStatus::RawUploaded),
            report("C", ReportStatus::NeedsResearch),
            report("D", ReportStatus::Completed),
        ];
        let queue = derive_queue(&reports, &[]);

        assert_eq!(queue.summary.needs_research, 2);
        assert_eq!(queue.summary.raw_uploaded, 1);
        assert_eq!(queue.summary.needs_update, 0);
        assert_eq!(queue.needs_research.len(), 2);
        assert_eq!(queue.needs_research[0].name, "A");
        assert_eq!(queue.needs_research[1].name, "C");
    }

    #[test]
    fn raw_uploaded_list_is_capped_but_count_is_not() {
        let reports: Vec<_> = (0..8)
            .map(|i| report(&format!("R{}", i), ReportStatus::RawUploaded))
            .collect();
        let queue = derive_queue(&reports, &[]);

        assert_eq!(queue.raw_uploaded.len(), RECENT_UPLOADS_LIMIT);
        assert_eq!(queue.raw_uploaded[0].name, "R0");
        assert_eq!(queue.summary.raw_uploaded, 8);
    }

    #[test]
    fn counts_pending_uploads() {
        let uploads = vec![
            upload("a", SyncStatus::PendingSync),
            upload("b", SyncStatus::Synced),
            upload("c", SyncStatus::PendingSync),
        ];
        assert_eq!(derive_queue(&[], &uploads).summary.pending_sync, 2);
    }

    #[test]
    fn next_item_follows_priority() {
        let mut reports = vec![
            report("raw", ReportStatus::RawUploaded),
            report("update", ReportStatus::NeedsUpdate),
            report("research", ReportStatus::NeedsResearch),
        ];
        let queue = derive_queue(&reports, &[]);
        assert_eq!(queue.next_item().unwrap().name, "research");

        reports.retain(|r| r.status != ReportStatus::NeedsResearch);
        let queue = derive_queue(&reports, &[]);
        assert_eq!(queue.next_item().unwrap().name, "update");

        reports.retain(|r| r.status != ReportStatus::NeedsUpdate);
        let queue = derive_queue(&reports, &[]);
        assert_eq!(queue.next_item().unwrap().name, "raw");

        assert!(derive_queue(&[], &[]).next_item().is_none());
        assert!(derive_queue(&[], &[]).is_empty());
    }

    #[test]
    fn queue_serializes_in_camel_case() {
        let queue = derive_queue(&[report("A", ReportStatus::NeedsResearch)], &[]);
        let json = serde_json::to_value(&queue).unwrap();
        assert_eq!(json["summary"]["needsResearch"], 1);
        assert_eq!(json["needsResearch"][0]["type"], "sovereign");
        assert!(json["needsResearch"][0].get("status").is_none());
    }

    #[test]
    fn summary_omits_zero_counts() {
        let reports = vec![
            report("A", ReportStatus::Completed),
            report("B", ReportStatus::Completed),
            report("C", ReportStatus::InProgress),
        ];
        let uploads = vec![upload("a", SyncStatus::Processed)];
        let summary = derive_summary(&reports, &uploads);

        assert_eq!(summary.reports.total, 3);
        assert_eq!(summary.reports.by_status.len(), 2);
        assert_eq!(summary.reports.by_status[&ReportStatus::Completed], 2);
        assert!(!summary
            .reports
            .by_status
            .contains_key(&ReportStatus::NeedsResearch));
        assert_eq!(summary.uploads.total, 1);
        assert_eq!(summary.uploads.by_sync_status.len(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reports"]["byStatus"]["completed"], 2);
        assert!(json["reports"]["byStatus"].get("needs-research").is_none());
        assert_eq!(json["uploads"]["bySyncStatus"]["processed"], 1);
    }

    #[test]
    fn empty_collections_summarize_to_zero_totals() {
        let summary = derive_summary(&[], &[]);
        assert_eq!(summary.reports.total, 0);
        assert!(summary.reports.by_status.is_empty());
        assert!(summary.uploads.by_sync_status.is_empty());
    }
}
