//! # Upload Sync Tracking
//!
//! Tracks each stored blob's hand-off from the producing side to the
//! processing agent:
//!
//! ```text
//! pending-sync ──mark_synced──> synced ──> processing ──> processed
//! ```
//!
//! [`mark_synced`] is the only guarded transition: it moves a record only if
//! it is exactly `pending-sync`. [`set_status`] is an unguarded override the
//! processing agent may use to jump anywhere, backwards included. Jumps off
//! the linear progression are allowed but reported as warnings.
//!
//! Tracking is independent of reports: a tracked upload may be attached to
//! zero, one or several reports, or referenced by none.

use crate::commands::helpers::find_upload_mut;
use crate::commands::{BatchResult, CmdMessage, CmdResult, ItemOutcome};
use crate::error::Result;
use crate::model::{SyncStatus, UploadedFile};
use crate::store::DataStore;
use serde::Serialize;

/// Start tracking a stored blob as `pending-sync`.
///
/// Always succeeds. Tracking a filename that is already tracked replaces the
/// old record, since the blob under that name has been rewritten.
pub fn track<S: DataStore>(
    store: &S,
    stored_filename: &str,
    original_name: &str,
    size: u64,
) -> Result<UploadedFile> {
    let upload = UploadedFile::new(stored_filename.to_string(), original_name.to_string(), size);
    store.upsert_upload(upload.clone())?;
    tracing::info!(filename = %upload.filename, size, "upload tracked");
    Ok(upload)
}

/// All uploads still waiting for the processing agent, in storage order.
pub fn pending<S: DataStore>(store: &S) -> Result<CmdResult> {
    let uploads = store
        .list_uploads()?
        .into_iter()
        .filter(|u| u.sync_status == SyncStatus::PendingSync)
        .collect();
    Ok(CmdResult::default().with_uploads(uploads))
}

/// Move each listed filename from `pending-sync` to `synced`.
///
/// Unknown filenames and records in any other status are skipped, never
/// failing the batch. A filename listed twice is updated at most once.
pub fn mark_synced<S: DataStore, F: AsRef<str>>(store: &S, filenames: &[F]) -> Result<BatchResult> {
    if filenames.is_empty() {
        return Ok(BatchResult::default());
    }

    let batch = store.modify_uploads(|uploads| {
        let mut batch = BatchResult::default();
        for filename in filenames.iter().map(AsRef::as_ref) {
            let outcome = match uploads.iter_mut().find(|u| u.filename == filename) {
                None => ItemOutcome::NotFound,
                Some(upload) if upload.sync_status != SyncStatus::PendingSync => {
                    ItemOutcome::NotPending(upload.sync_status)
                }
                Some(upload) => {
                    upload.set_sync_status(SyncStatus::Synced);
                    ItemOutcome::Updated
                }
            };
            if outcome != ItemOutcome::Updated {
                tracing::debug!(filename, ?outcome, "mark synced: skipped");
            }
            batch.push(filename, outcome);
        }
        Ok(batch)
    })?;

    tracing::info!(
        updated = batch.updated(),
        requested = filenames.len(),
        "marked uploads synced"
    );
    Ok(batch)
}

/// Unconditionally overwrite an upload's sync status.
pub fn set_status<S: DataStore>(store: &S, filename: &str, status: SyncStatus) -> Result<CmdResult> {
    let (upload, previous) = store.modify_uploads(|uploads| {
        let upload = find_upload_mut(uploads, filename)?;
        let previous = upload.sync_status;
        upload.set_sync_status(status);
        Ok((upload.clone(), previous))
    })?;

    let mut result = CmdResult::default();
    if !previous.follows_progression(status) {
        tracing::warn!(filename, from = %previous, to = %status, "sync status jumped");
        result.add_message(CmdMessage::warning(format!(
            "{} moved from {} to {} (not the next sync step)",
            filename, previous, status
        )));
    }
    tracing::info!(filename, status = %status, "sync status set");
    result.add_message(CmdMessage::success(format!(
        "Updated {} sync status to {}",
        filename, status
    )));
    Ok(result.with_uploads(vec![upload]))
}

/// Tracked upload counts per sync status. Every status is present, zeros
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub pending_sync: usize,
    pub synced: usize,
    pub processing: usize,
    pub processed: usize,
}

impl SyncSummary {
    pub fn from_uploads(uploads: &[UploadedFile]) -> Self {
        let mut summary = SyncSummary::default();
        for upload in uploads {
            match upload.sync_status {
                SyncStatus::PendingSync => summary.pending_sync += 1,
                SyncStatus::Synced => summary.synced += 1,
                SyncStatus::Processing => summary.processing += 1,
                SyncStatus::Processed => summary.processed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.pending_sync + self.synced + self.processing + self.processed
    }
}

pub fn summary<S: DataStore>(store: &S) -> Result<SyncSummary> {
    Ok(SyncSummary::from_uploads(&store.list_uploads()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::fixtures::mem_store;
    use crate::error::SovqError;

    #[test]
    fn tracked_upload_is_pending() {
        let store = mem_store();
        track(&store, "a_1.md", "report.md", 1024).unwrap();

        let pending = pending(&store).unwrap().uploads;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].filename, "a_1.md");
        assert_eq!(pending[0].original_name, "report.md");
        assert_eq!(pending[0].size, 1024);
        assert_eq!(pending[0].sync_status, SyncStatus::PendingSync);
        assert_eq!(pending[0].synced_at, None);
    }

    #[test]
    fn mark_synced_moves_out_of_pending() {
        let store = mem_store();
        track(&store, "a_1.md", "report.md", 1024).unwrap();

        let batch = mark_synced(&store, &["a_1.md"]).unwrap();
        assert_eq!(batch.updated(), 1);
        assert!(pending(&store).unwrap().uploads.is_empty());

        let upload = store.get_upload("a_1.md").unwrap();
        assert_eq!(upload.sync_status, SyncStatus::Synced);
        assert!(upload.synced_at.is_some());
    }

    #[test]
    fn mark_synced_twice_updates_once() {
        let store = mem_store();
        track(&store, "a_1.md", "report.md", 1024).unwrap();

        assert_eq!(mark_synced(&store, &["a_1.md"]).unwrap().updated(), 1);
        let second = mark_synced(&store, &["a_1.md"]).unwrap();
        assert_eq!(second.updated(), 0);
        assert_eq!(
            second.outcome_of("a_1.md"),
            Some(ItemOutcome::NotPending(SyncStatus::Synced))
        );
    }

    #[test]
    fn mark_synced_reports_per_item_outcomes() {
        let store = mem_store();
        track(&store, "a.md", "a.md", 1).unwrap();
        track(&store, "b.md", "b.md", 1).unwrap();
        track(&store, "c.md", "c.md", 1).unwrap();
        set_status(&store, "b.md", SyncStatus::Processing).unwrap();

        let batch = mark_synced(&store, &["a.md", "b.md", "ghost.md", "c.md", "a.md"]).unwrap();
        assert_eq!(batch.updated(), 2);
        assert_eq!(
            batch.items.iter().map(|i| i.outcome).collect::<Vec<_>>(),
            vec![
                ItemOutcome::Updated,
                ItemOutcome::NotPending(SyncStatus::Processing),
                ItemOutcome::NotFound,
                ItemOutcome::Updated,
                ItemOutcome::NotPending(SyncStatus::Synced),
            ]
        );
    }

    #[test]
    fn set_status_overrides_in_any_direction() {
        let store = mem_store();
        track(&store, "a.md", "a.md", 1).unwrap();

        let result = set_status(&store, "a.md", SyncStatus::Processed).unwrap();
        assert!(result.has_warnings());
        assert_eq!(result.uploads[0].synced_at, None);

        let result = set_status(&store, "a.md", SyncStatus::PendingSync).unwrap();
        assert!(result.has_warnings());
        assert_eq!(
            store.get_upload("a.md").unwrap().sync_status,
            SyncStatus::PendingSync
        );
    }

    #[test]
    fn set_status_stamps_synced_at_only_for_synced() {
        let store = mem_store();
        track(&store, "a.md", "a.md", 1).unwrap();

        let result = set_status(&store, "a.md", SyncStatus::Synced).unwrap();
        assert!(!result.has_warnings());
        assert!(result.uploads[0].synced_at.is_some());
    }

    #[test]
    fn set_status_unknown_file_is_not_found() {
        let store = mem_store();
        assert!(matches!(
            set_status(&store, "ghost.md", SyncStatus::Synced).unwrap_err(),
            SovqError::UploadNotFound(_)
        ));
    }

    #[test]
    fn retracking_replaces_the_record() {
        let store = mem_store();
        track(&store, "a.md", "a.md", 1).unwrap();
        mark_synced(&store, &["a.md"]).unwrap();
        track(&store, "a.md", "a.md", 7).unwrap();

        let uploads = store.list_uploads().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].size, 7);
        assert_eq!(uploads[0].sync_status, SyncStatus::PendingSync);
    }

    #[test]
    fn summary_counts_every_status() {
        let store = mem_store();
        for name in ["a.md", "b.md", "c.md"] {
            track(&store, name, name, 1).unwrap();
        }
        mark_synced(&store, &["a.md"]).unwrap();
        set_status(&store, "b.md", SyncStatus::Processed).unwrap();

        let summary = summary(&store).unwrap();
        assert_eq!(
            summary,
            SyncSummary {
                pending_sync: 1,
                synced: 1,
                processing: 0,
                processed: 1,
            }
        );
        assert_eq!(summary.total(), 3);

        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["pendingSync"], 1);
        assert_eq!(json["processing"], 0);
    }
}
