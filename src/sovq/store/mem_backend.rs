use super::backend::StorageBackend;
use crate::error::{Result, SovqError};
use crate::model::{Report, UploadedFile};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage backend for testing.
///
/// Uses `Mutex` rather than `RefCell` so a store built on it can be shared
/// across threads in the concurrent-writer tests.
#[derive(Default)]
pub struct MemBackend {
    reports: Mutex<Vec<Report>>,
    uploads: Mutex<Vec<UploadedFile>>,
    view: Mutex<Option<String>>,
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    simulate_write_error: AtomicBool,
}

fn guard<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| SovqError::Store("memory backend lock poisoned".to_string()))
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Last markdown view written, if any.
    pub fn view(&self) -> Option<String> {
        self.view.lock().ok().and_then(|v| v.clone())
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(SovqError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_reports(&self) -> Result<Vec<Report>> {
        Ok(guard(&self.reports)?.clone())
    }

    fn save_reports(&self, reports: &[Report]) -> Result<()> {
        self.check_writable()?;
        *guard(&self.reports)? = reports.to_vec();
        Ok(())
    }

    fn load_uploads(&self) -> Result<Vec<UploadedFile>> {
        Ok(guard(&self.uploads)?.clone())
    }

    fn save_uploads(&self, uploads: &[UploadedFile]) -> Result<()> {
        self.check_writable()?;
        *guard(&self.uploads)? = uploads.to_vec();
        Ok(())
    }

    fn write_view(&self, markdown: &str) -> Result<()> {
        self.check_writable()?;
        *guard(&self.view)? = Some(markdown.to_string());
        Ok(())
    }

    fn write_blob(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.check_writable()?;
        guard(&self.blobs)?.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn create_blob(&self, name: &str, bytes: &[u8]) -> Result<bool> {
        self.check_writable()?;
        let mut blobs = guard(&self.blobs)?;
        if blobs.contains_key(name) {
            return Ok(false);
        }
        blobs.insert(name.to_string(), bytes.to_vec());
        Ok(true)
    }

    fn read_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(guard(&self.blobs)?.get(name).cloned())
    }

    fn blob_exists(&self, name: &str) -> Result<bool> {
        Ok(guard(&self.blobs)?.contains_key(name))
    }

    fn list_blobs(&self) -> Result<Vec<String>> {
        Ok(guard(&self.blobs)?.keys().cloned().collect())
    }
}
