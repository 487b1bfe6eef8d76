use super::backend::StorageBackend;
use super::DataStore;
use crate::error::{Result, SovqError};
use crate::markdown::render_markdown;
use crate::model::{Report, UploadedFile};
use std::sync::{Mutex, MutexGuard};

/// [`DataStore`] over any [`StorageBackend`].
///
/// Each collection has its own lock, held from load to save. Reads take no
/// lock: backends guarantee a reader sees either the old or the new document.
/// Blob writes are keyed by filename and bypass both locks.
pub struct RecordStore<B: StorageBackend> {
    /// Exposed as pub(crate) for tests that need to poke the backend directly.
    pub(crate) backend: B,
    reports_lock: Mutex<()>,
    uploads_lock: Mutex<()>,
}

fn acquire<'a>(lock: &'a Mutex<()>, what: &str) -> Result<MutexGuard<'a, ()>> {
    lock.lock()
        .map_err(|_| SovqError::Store(format!("{} lock poisoned by a panicked writer", what)))
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            reports_lock: Mutex::new(()),
            uploads_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: StorageBackend> DataStore for RecordStore<B> {
    fn list_reports(&self) -> Result<Vec<Report>> {
        self.backend.load_reports()
    }

    fn modify_reports<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Report>) -> Result<T>,
    {
        let _guard = acquire(&self.reports_lock, "reports")?;
        let mut reports = self.backend.load_reports()?;
        let out = f(&mut reports)?;
        self.backend.save_reports(&reports)?;
        tracing::debug!(count = reports.len(), "saved reports");

        // The view is derived; a failure here does not undo the save above.
        if let Err(e) = self.backend.write_view(&render_markdown(&reports)) {
            tracing::warn!(error = %e, "failed to refresh markdown view");
        }
        Ok(out)
    }

    fn list_uploads(&self) -> Result<Vec<UploadedFile>> {
        self.backend.load_uploads()
    }

    fn modify_uploads<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<UploadedFile>) -> Result<T>,
    {
        let _guard = acquire(&self.uploads_lock, "uploads")?;
        let mut uploads = self.backend.load_uploads()?;
        let out = f(&mut uploads)?;
        self.backend.save_uploads(&uploads)?;
        tracing::debug!(count = uploads.len(), "saved uploads");
        Ok(out)
    }

    fn put_blob(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.backend.write_blob(name, bytes)?;
        tracing::debug!(name, size = bytes.len(), "stored blob");
        Ok(())
    }

    fn claim_blob(&self, name: &str, bytes: &[u8]) -> Result<bool> {
        let claimed = self.backend.create_blob(name, bytes)?;
        if claimed {
            tracing::debug!(name, size = bytes.len(), "stored new blob");
        }
        Ok(claimed)
    }

    fn get_blob(&self, name: &str) -> Result<Vec<u8>> {
        self.backend
            .read_blob(name)?
            .ok_or_else(|| SovqError::BlobNotFound(name.to_string()))
    }

    fn blob_exists(&self, name: &str) -> Result<bool> {
        self.backend.blob_exists(name)
    }

    fn list_blobs(&self) -> Result<Vec<String>> {
        self.backend.list_blobs()
    }
}
