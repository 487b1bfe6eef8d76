use crate::error::Result;
use crate::model::{Report, UploadedFile};

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while [`super::RecordStore`] handles locking and the load-mutate-save cycle.
///
/// Collections are whole-document: a load returns everything, a save
/// replaces everything.
pub trait StorageBackend: Send + Sync {
    // --- Collections ---

    /// Load the reports collection, creating an empty one on first access.
    fn load_reports(&self) -> Result<Vec<Report>>;

    /// Replace the reports collection.
    /// MUST be atomic: no reader may observe a half-written collection.
    fn save_reports(&self, reports: &[Report]) -> Result<()>;

    /// Load the tracked uploads collection, creating an empty one on first access.
    fn load_uploads(&self) -> Result<Vec<UploadedFile>>;

    /// Replace the tracked uploads collection. Same atomicity rule as reports.
    fn save_uploads(&self, uploads: &[UploadedFile]) -> Result<()>;

    // --- Derived view ---

    /// Write the derived markdown view (display only, never read back).
    fn write_view(&self, markdown: &str) -> Result<()>;

    // --- Blobs ---

    /// Store blob bytes under a storage key. Overwrites an existing blob.
    fn write_blob(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Store blob bytes only if no blob has that key yet. Returns false,
    /// writing nothing, when the key is taken. The check and the write are
    /// one atomic step.
    fn create_blob(&self, name: &str, bytes: &[u8]) -> Result<bool>;

    /// Read blob bytes. Returns Ok(None) if no blob has that key.
    fn read_blob(&self, name: &str) -> Result<Option<Vec<u8>>>;

    fn blob_exists(&self, name: &str) -> Result<bool>;

    /// Keys of all stored blobs, sorted.
    fn list_blobs(&self) -> Result<Vec<String>>;
}
