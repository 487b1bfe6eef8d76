//! # Upload Handling
//!
//! The compound "store a document" flow:
//!
//! 1. If a report id is given, check the report exists (nothing is written otherwise).
//! 2. Derive a stored filename: the original name reduced to `[A-Za-z0-9._-]`,
//!    prefixed with the report id, or with a millisecond timestamp when there is
//!    no report.
//! 3. Write the blob. Unscoped names are claimed atomically, so concurrent
//!    uploads of the same file never share a blob.
//! 4. Track it as `pending-sync`.
//! 5. Attach it to the report, if any.
//!
//! Steps 3-5 are separate writes with no shared transaction. A failure part way
//! leaves a tracked-but-unattached (or stored-but-untracked) file, which the
//! rest of the system tolerates.

use crate::commands::{attach, sync};
use crate::error::{Result, SovqError};
use crate::model::{SyncStatus, UploadedFile};
use crate::store::{is_storage_key, sanitize_filename, DataStore};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub stored_filename: String,
    pub size: u64,
    pub sync_status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
}

pub fn put<S: DataStore>(
    store: &S,
    bytes: &[u8],
    original_name: &str,
    report_id: Option<&str>,
) -> Result<UploadReceipt> {
    let original_name = original_name.trim();
    if original_name.is_empty() {
        return Err(SovqError::validation("filename is required"));
    }

    if let Some(id) = report_id {
        store.get_report(id)?;
    }

    let stored_filename = store_blob(store, bytes, original_name, report_id)?;

    let size = bytes.len() as u64;
    let upload = sync::track(store, &stored_filename, original_name, size)?;

    if let Some(id) = report_id {
        attach::run(store, id, &stored_filename)?;
    }

    tracing::info!(
        stored = %stored_filename,
        original = original_name,
        size,
        report = report_id.unwrap_or("-"),
        "upload stored"
    );

    Ok(UploadReceipt {
        stored_filename,
        size,
        sync_status: upload.sync_status,
        report_id: report_id.map(str::to_string),
    })
}

/// Same as [`put`], for content that arrives base64-encoded.
pub fn put_base64<S: DataStore>(
    store: &S,
    content: &str,
    original_name: &str,
    report_id: Option<&str>,
) -> Result<UploadReceipt> {
    let bytes = STANDARD
        .decode(content.trim())
        .map_err(|e| SovqError::validation(format!("content is not valid base64: {}", e)))?;
    put(store, &bytes, original_name, report_id)
}

/// Write the blob and return its stored name.
///
/// Report-scoped names reuse the report id as the uniqueness token, so a
/// re-upload of the same file to the same report replaces the blob.
/// Unscoped names use a millisecond token, bumped until a free name is
/// claimed.
fn store_blob<S: DataStore>(
    store: &S,
    bytes: &[u8],
    original_name: &str,
    report_id: Option<&str>,
) -> Result<String> {
    let safe = sanitize_filename(original_name);
    if let Some(id) = report_id {
        let name = format!("{}_{}", sanitize_filename(id), safe);
        store.put_blob(&name, bytes)?;
        return Ok(name);
    }

    let mut token = Utc::now().timestamp_millis();
    loop {
        let candidate = format!("{}_{}", token, safe);
        if store.claim_blob(&candidate, bytes)? {
            return Ok(candidate);
        }
        token += 1;
    }
}

#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Tracking record, if the blob is tracked.
    pub upload: Option<UploadedFile>,
}

pub fn download<S: DataStore>(store: &S, filename: &str) -> Result<Download> {
    if !is_storage_key(filename) {
        return Err(SovqError::validation(format!(
            "'{}' is not a valid stored filename",
            filename
        )));
    }

    let bytes = store.get_blob(filename)?;
    let upload = store
        .list_uploads()?
        .into_iter()
        .find(|u| u.filename == filename);

    Ok(Download {
        filename: filename.to_string(),
        bytes,
        upload,
    })
}

/// Names of every stored blob, tracked or not, sorted.
pub fn stored<S: DataStore>(store: &S) -> Result<Vec<String>> {
    store.list_blobs()
}
