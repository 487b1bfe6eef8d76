use super::backend::StorageBackend;
use super::is_storage_key;
use crate::error::{Result, SovqError};
use crate::model::{Report, UploadedFile};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const REPORTS_FILE: &str = "reports.json";
pub const UPLOADS_FILE: &str = "uploads.json";
pub const VIEW_FILE: &str = "reports.md";
pub const BLOB_DIR: &str = "uploads";

#[derive(Serialize, Deserialize, Default)]
struct ReportsDoc {
    #[serde(default)]
    reports: Vec<Report>,
}

#[derive(Serialize)]
struct ReportsDocRef<'a> {
    reports: &'a [Report],
}

#[derive(Serialize, Deserialize, Default)]
struct UploadsDoc {
    #[serde(default)]
    uploads: Vec<UploadedFile>,
}

#[derive(Serialize)]
struct UploadsDocRef<'a> {
    uploads: &'a [UploadedFile],
}

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn view_path(&self) -> PathBuf {
        self.root.join(VIEW_FILE)
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.root.join(BLOB_DIR)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SovqError::Io)?;
        }
        Ok(())
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf> {
        if !is_storage_key(name) {
            return Err(SovqError::validation(format!(
                "'{}' is not a valid stored filename",
                name
            )));
        }
        Ok(self.blob_dir().join(name))
    }

    /// Write to a temp file in the same directory, then rename over the target.
    fn write_atomic(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(dir)?;
        let stem = target
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("data");
        let tmp = dir.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
        fs::write(&tmp, bytes).map_err(SovqError::Io)?;
        if let Err(e) = fs::rename(&tmp, target) {
            let _ = fs::remove_file(&tmp);
            return Err(SovqError::Io(e));
        }
        Ok(())
    }

    /// Publish `bytes` at `target` only if nothing is there yet. Returns false
    /// when another writer got there first. Unlocked readers go through this,
    /// so it must never replace an existing file.
    fn create_if_absent(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<bool> {
        self.ensure_dir(dir)?;
        let tmp = dir.join(format!(".init-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, bytes).map_err(SovqError::Io)?;
        let linked = fs::hard_link(&tmp, target);
        let _ = fs::remove_file(&tmp);
        match linked {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(SovqError::Io(e)),
        }
    }

    fn load_doc<T>(&self, filename: &str) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        self.ensure_dir(&self.root)?;
        let path = self.root.join(filename);
        if !path.exists() {
            let initial = T::default();
            let content = serde_json::to_string_pretty(&initial).map_err(SovqError::Serialization)?;
            if self.create_if_absent(&self.root, &path, content.as_bytes())? {
                tracing::debug!(path = %path.display(), "created empty collection");
                return Ok(initial);
            }
        }

        let content = fs::read_to_string(&path).map_err(SovqError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "malformed collection document");
            SovqError::Serialization(e)
        })
    }

    fn save_doc<T: Serialize>(&self, filename: &str, doc: &T) -> Result<()> {
        let path = self.root.join(filename);
        let content = serde_json::to_string_pretty(doc).map_err(SovqError::Serialization)?;
        self.write_atomic(&self.root, &path, content.as_bytes())
    }
}

impl StorageBackend for FsBackend {
    fn load_reports(&self) -> Result<Vec<Report>> {
        let doc: ReportsDoc = self.load_doc(REPORTS_FILE)?;
        Ok(doc.reports)
    }

    fn save_reports(&self, reports: &[Report]) -> Result<()> {
        self.save_doc(REPORTS_FILE, &ReportsDocRef { reports })
    }

    fn load_uploads(&self) -> Result<Vec<UploadedFile>> {
        let doc: UploadsDoc = self.load_doc(UPLOADS_FILE)?;
        Ok(doc.uploads)
    }

    fn save_uploads(&self, uploads: &[UploadedFile]) -> Result<()> {
        self.save_doc(UPLOADS_FILE, &UploadsDocRef { uploads })
    }

    fn write_view(&self, markdown: &str) -> Result<()> {
        self.write_atomic(&self.root, &self.view_path(), markdown.as_bytes())
    }

    fn write_blob(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.blob_path(name)?;
        self.write_atomic(&self.blob_dir(), &path, bytes)
    }

    fn create_blob(&self, name: &str, bytes: &[u8]) -> Result<bool> {
        let path = self.blob_path(name)?;
        self.create_if_absent(&self.blob_dir(), &path, bytes)
    }

    fn read_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(SovqError::Io)?;
        Ok(Some(bytes))
    }

    fn blob_exists(&self, name: &str) -> Result<bool> {
        Ok(self.blob_path(name)?.is_file())
    }

    fn list_blobs(&self) -> Result<Vec<String>> {
        let dir = self.blob_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(SovqError::Io)? {
            let entry = entry.map_err(SovqError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                // Skip in-flight temp files
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
