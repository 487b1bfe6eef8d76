//! # Configuration
//!
//! Sovq configuration is loaded with [`confique`], layering environment
//! variables, TOML files and compiled defaults.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Environment variables**: `SOVQ_DATA_DIR`, `SOVQ_LOG`.
//! 2. **Local Config**: `./sovq.toml` in the working directory.
//! 3. **User Config**: `sovq.toml` in the OS-appropriate config directory
//!    (via the `directories` crate).
//! 4. **Compiled Defaults**: via `#[config(default = ...)]`.
//!
//! Missing files are skipped. The CLI's `--data-dir` flag overrides all of the above.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `SOVQ_DATA_DIR` | `data` | Root of the persisted collections and blobs |
//! | `log` | `SOVQ_LOG` | `warn` | Log filter used when `RUST_LOG` is unset |

use crate::error::{Result, SovqError};
use confique::{Builder, Config};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "sovq.toml";

/// Configuration for sovq, stored in `sovq.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SovqConfig {
    /// Data directory. Relative paths resolve against the working directory.
    #[config(env = "SOVQ_DATA_DIR", default = "data")]
    pub data_dir: PathBuf,

    /// Fallback log filter (e.g. "warn", "sovq=debug").
    #[config(env = "SOVQ_LOG", default = "warn")]
    pub log: String,
}

impl Default for SovqConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log: "warn".to_string(),
        }
    }
}

impl SovqConfig {
    /// Load the layered configuration as seen from `cwd`.
    pub fn load(cwd: &Path) -> Result<Self> {
        let mut files = vec![cwd.join(CONFIG_FILE)];
        files.extend(user_config_file());
        Self::load_layers(SovqConfig::builder().env(), &files)
    }

    /// Add `files` to `builder`, highest priority first, and load.
    fn load_layers(mut builder: Builder<Self>, files: &[PathBuf]) -> Result<Self> {
        for file in files {
            builder = builder.file(file.clone());
        }
        builder
            .load()
            .map_err(|e| SovqError::Store(format!("failed to load configuration: {}", e)))
    }

    /// `data_dir`, made absolute against `cwd` if it is relative.
    pub fn resolve_data_dir(&self, cwd: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            cwd.join(&self.data_dir)
        }
    }
}

/// `<config_dir>/sovq.toml`, when the platform has a config directory.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "sovq", "sovq").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
