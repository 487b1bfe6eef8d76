//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every operation, whatever sits in front of it (the bundled
//! CLI, or a network transport someone wires up later).
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs**: enum-valued arguments arrive as text and are parsed
//!   here, so an unknown type or status is a validation error at the boundary
//! - **Returns structured types**, never formatted text (except the markdown view,
//!   which *is* text)
//!
//! `SovqApi<S: DataStore>` is generic over the store: production uses
//! `RecordStore<FsBackend>`, tests use `RecordStore<MemBackend>`.
//!
//! All methods take `&self`. The store serializes writers internally, so one
//! `SovqApi` can be shared between threads behind an `Arc`.

use crate::commands;
use crate::error::{Result, SovqError};
use crate::markdown;
use crate::model::{ReportStatus, ReportType, SyncStatus, UploadedFile};
use crate::store::DataStore;

pub struct SovqApi<S: DataStore> {
    store: S,
}

impl<S: DataStore> SovqApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Reports ---

    pub fn create_report(
        &self,
        name: &str,
        report_type: &str,
        description: Option<String>,
    ) -> Result<CmdResult> {
        if report_type.trim().is_empty() {
            return Err(SovqError::validation("report type is required"));
        }
        let report_type: ReportType = report_type.parse()?;
        commands::create::run(&self.store, name, report_type, description)
    }

    pub fn list_reports(
        &self,
        report_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<CmdResult> {
        let filter = ReportFilter {
            report_type: report_type.map(str::parse).transpose()?,
            status: status.map(str::parse).transpose()?,
        };
        commands::list::run(&self.store, &filter)
    }

    pub fn get_report(&self, id: &str) -> Result<CmdResult> {
        commands::list::find(&self.store, id)
    }

    pub fn update_report(
        &self,
        id: &str,
        name: Option<String>,
        status: Option<&str>,
        description: Option<String>,
    ) -> Result<CmdResult> {
        let patch = ReportPatch {
            name,
            status: status.map(str::parse::<ReportStatus>).transpose()?,
            description,
        };
        commands::update::run(&self.store, id, patch)
    }

    pub fn delete_report(&self, id: &str) -> Result<CmdResult> {
        commands::delete::run(&self.store, id)
    }

    pub fn attach_file(&self, report_id: &str, filename: &str) -> Result<CmdResult> {
        commands::attach::run(&self.store, report_id, filename)
    }

    pub fn get_attachments(&self, report_id: &str) -> Result<CmdResult> {
        commands::attach::list(&self.store, report_id)
    }

    /// `updates_json` is the agent payload: `[{"id": "...", "status": "..."}]`.
    pub fn batch_update_status(&self, updates_json: &str) -> Result<BatchResult> {
        let updates: Vec<StatusUpdate> = serde_json::from_str(updates_json)
            .map_err(|e| SovqError::validation(format!("invalid batch payload: {}", e)))?;
        commands::batch::run(&self.store, &updates)
    }

    // --- Uploads ---

    pub fn upload(
        &self,
        bytes: &[u8],
        original_name: &str,
        report_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        commands::upload::put(&self.store, bytes, original_name, report_id)
    }

    pub fn upload_base64(
        &self,
        content: &str,
        original_name: &str,
        report_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        commands::upload::put_base64(&self.store, content, original_name, report_id)
    }

    pub fn track_upload(
        &self,
        stored_filename: &str,
        original_name: &str,
        size: u64,
    ) -> Result<UploadedFile> {
        commands::sync::track(&self.store, stored_filename, original_name, size)
    }

    pub fn list_pending(&self) -> Result<CmdResult> {
        commands::sync::pending(&self.store)
    }

    pub fn mark_synced<F: AsRef<str>>(&self, filenames: &[F]) -> Result<BatchResult> {
        commands::sync::mark_synced(&self.store, filenames)
    }

    pub fn set_sync_status(&self, filename: &str, status: &str) -> Result<CmdResult> {
        let status: SyncStatus = status.parse()?;
        commands::sync::set_status(&self.store, filename, status)
    }

    pub fn sync_summary(&self) -> Result<SyncSummary> {
        commands::sync::summary(&self.store)
    }

    pub fn download(&self, filename: &str) -> Result<Download> {
        commands::upload::download(&self.store, filename)
    }

    pub fn list_stored_files(&self) -> Result<Vec<String>> {
        commands::upload::stored(&self.store)
    }

    // --- Derived views ---

    pub fn work_queue(&self) -> Result<WorkQueue> {
        commands::queue::build(&self.store)
    }

    pub fn status_summary(&self) -> Result<StatusSummary> {
        commands::queue::summary(&self.store)
    }

    pub fn render_markdown(&self) -> Result<String> {
        Ok(markdown::render_markdown(&self.store.list_reports()?))
    }
}

pub use commands::batch::StatusUpdate;
pub use commands::list::ReportFilter;
pub use commands::queue::{ReportBrief, StatusSummary, WorkQueue};
pub use commands::sync::SyncSummary;
pub use commands::update::ReportPatch;
pub use commands::upload::{Download, UploadReceipt};
pub use commands::{BatchResult, CmdMessage, CmdResult, ItemOutcome, MessageLevel};
