//! # Bootstrapping
//!
//! [`initialize`] turns a working directory and an optional data-directory
//! override into a ready [`SovqContext`]:
//!
//! 1. Load [`SovqConfig`] as seen from `cwd`.
//! 2. Pick the data directory: the override if given, else the configured
//!    `data_dir`. Relative paths resolve against `cwd`.
//! 3. Build `SovqApi<RecordStore<FsBackend>>` rooted there.
//!
//! Nothing is created on disk here. The backend creates the directory and
//! empty collections on first access.

use crate::api::SovqApi;
use crate::config::SovqConfig;
use crate::error::Result;
use crate::store::fs_backend::FsBackend;
use crate::store::RecordStore;
use std::path::{Path, PathBuf};

pub struct SovqContext {
    pub api: SovqApi<RecordStore<FsBackend>>,
    pub config: SovqConfig,
    pub data_dir: PathBuf,
}

pub fn initialize(cwd: &Path, data_override: Option<PathBuf>) -> Result<SovqContext> {
    let config = SovqConfig::load(cwd)?;

    let data_dir = match data_override {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => config.resolve_data_dir(cwd),
    };
    tracing::debug!(data_dir = %data_dir.display(), "initializing store");

    let store = RecordStore::with_backend(FsBackend::new(data_dir.clone()));
    Ok(SovqContext {
        api: SovqApi::new(store),
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn override_wins_and_resolves_relative_to_cwd() {
        let dir = tempdir().unwrap();
        let ctx = initialize(dir.path(), Some(PathBuf::from("elsewhere"))).unwrap();
        assert_eq!(ctx.data_dir, dir.path().join("elsewhere"));
        assert_eq!(ctx.api.store().backend().root(), dir.path().join("elsewhere"));
    }

    #[test]
    fn local_config_picks_data_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("sovq.toml"), "data_dir = \"store\"\n").unwrap();

        let ctx = initialize(dir.path(), None).unwrap();
        assert_eq!(ctx.data_dir, dir.path().join("store"));
    }

    #[test]
    fn nothing_is_written_until_first_use() {
        let dir = tempdir().unwrap();
        let ctx = initialize(dir.path(), Some(dir.path().join("data"))).unwrap();
        assert!(!ctx.data_dir.exists());

        ctx.api.list_reports(None, None).unwrap();
        assert!(ctx.data_dir.join("reports.json").exists());
    }
}
