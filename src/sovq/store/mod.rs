//! # Storage Layer
//!
//! Two collections are persisted, each as one monolithic document:
//!
//! - **reports**: every [`Report`], in insertion order.
//! - **uploads**: every tracked [`UploadedFile`], in insertion order.
//!
//! Uploaded bytes ("blobs") are stored separately, keyed by their stored
//! filename.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw I/O. Whole-collection load/save plus blob
//!   read/write. [`fs_backend::FsBackend`] for production,
//!   [`mem_backend::MemBackend`] for tests.
//! - [`DataStore`]: the repository interface the commands talk to. It is
//!   transaction-shaped: [`DataStore::modify_reports`] and
//!   [`DataStore::modify_uploads`] run a closure over the loaded collection and
//!   persist the result only when the closure succeeds. `get`/`upsert`/`remove`
//!   are provided on top of those.
//! - [`record_store::RecordStore`]: the `DataStore` implementation. It holds one
//!   lock per collection across the full load-mutate-save cycle, so concurrent
//!   writers cannot lose each other's updates.
//!
//! Rewriting the whole document is a detail of the backends; nothing above
//! `DataStore` depends on it.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//! ├── reports.json   # { "reports": [...] }
//! ├── uploads.json   # { "uploads": [...] }
//! ├── reports.md     # derived view, rewritten on every reports save
//! └── uploads/       # blobs, keyed by stored filename
//! ```
//!
//! There is no cross-collection transaction. Reports and uploads are
//! modified in separate cycles.

use crate::error::{Result, SovqError};
use crate::model::{Report, UploadedFile};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::RecordStore;

/// Repository interface over both collections and the blob area.
pub trait DataStore {
    /// All reports in storage order.
    fn list_reports(&self) -> Result<Vec<Report>>;

    /// Load the reports, run `f`, and save if `f` returned `Ok`.
    /// An `Err` from `f` leaves the stored collection untouched.
    fn modify_reports<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Report>) -> Result<T>;

    /// All tracked uploads in storage order.
    fn list_uploads(&self) -> Result<Vec<UploadedFile>>;

    /// Uploads counterpart of [`DataStore::modify_reports`].
    fn modify_uploads<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<UploadedFile>) -> Result<T>;

    fn put_blob(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Store a blob under a key nobody holds yet. `Ok(false)` means the key
    /// was taken and nothing was written.
    fn claim_blob(&self, name: &str, bytes: &[u8]) -> Result<bool>;

    /// Blob bytes, or `BlobNotFound`.
    fn get_blob(&self, name: &str) -> Result<Vec<u8>>;

    fn blob_exists(&self, name: &str) -> Result<bool>;

    fn list_blobs(&self) -> Result<Vec<String>>;

    fn get_report(&self, id: &str) -> Result<Report> {
        self.list_reports()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| SovqError::ReportNotFound(id.to_string()))
    }

    /// Replace the report with the same id, or append it.
    fn upsert_report(&self, report: Report) -> Result<()> {
        self.modify_reports(|reports| {
            match reports.iter_mut().find(|r| r.id == report.id) {
                Some(existing) => *existing = report,
                None => reports.push(report),
            }
            Ok(())
        })
    }

    /// Remove and return the report, or `ReportNotFound`.
    fn remove_report(&self, id: &str) -> Result<Report> {
        self.modify_reports(|reports| {
            let pos = reports
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| SovqError::ReportNotFound(id.to_string()))?;
            Ok(reports.remove(pos))
        })
    }

    fn get_upload(&self, filename: &str) -> Result<UploadedFile> {
        self.list_uploads()?
            .into_iter()
            .find(|u| u.filename == filename)
            .ok_or_else(|| SovqError::UploadNotFound(filename.to_string()))
    }

    /// Replace the upload with the same filename, or append it.
    fn upsert_upload(&self, upload: UploadedFile) -> Result<()> {
        self.modify_uploads(|uploads| {
            match uploads.iter_mut().find(|u| u.filename == upload.filename) {
                Some(existing) => *existing = upload,
                None => uploads.push(upload),
            }
            Ok(())
        })
    }
}

/// Reduce a caller-supplied filename to `[A-Za-z0-9._-]`, replacing every
/// other character with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// True if `name` can be used as an on-disk blob key as-is.
pub fn is_storage_key(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_to_restricted_charset() {
        assert_eq!(sanitize_filename("report.md"), "report.md");
        assert_eq!(sanitize_filename("my report (v2).pdf"), "my_report__v2_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("Ünïcode.txt"), "_n_code.txt");
    }

    #[test]
    fn storage_keys() {
        assert!(is_storage_key("report_1_abc_file.md"));
        assert!(is_storage_key("1700000000000_a-b.txt"));
        assert!(!is_storage_key(""));
        assert!(!is_storage_key("."));
        assert!(!is_storage_key(".."));
        assert!(!is_storage_key(".hidden"));
        assert!(!is_storage_key("a/b"));
        assert!(!is_storage_key("a b"));
    }
}
