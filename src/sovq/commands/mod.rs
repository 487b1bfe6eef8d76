//! # Command Layer
//!
//! One module per operation. Every command takes a `&S: DataStore`, works on
//! plain Rust types and returns plain Rust types. Nothing here prints.
//!
//! - Report lifecycle: [`create`], [`list`], [`update`], [`delete`], [`attach`], [`batch`]
//! - Upload sync tracking: [`sync`], [`upload`]
//! - Derived views: [`queue`]

use crate::model::{Report, SyncStatus, UploadedFile};
use serde::Serialize;

pub mod attach;
pub mod batch;
pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod queue;
pub mod sync;
pub mod update;
pub mod upload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Reports created or changed by the command.
    pub affected_reports: Vec<Report>,
    /// Reports returned by a read.
    pub listed_reports: Vec<Report>,
    /// Tracked uploads created, changed or listed.
    pub uploads: Vec<UploadedFile>,
    pub attachments: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_reports(mut self, reports: Vec<Report>) -> Self {
        self.listed_reports = reports;
        self
    }

    pub fn with_uploads(mut self, uploads: Vec<UploadedFile>) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Outcome of one item in a best-effort batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemOutcome {
    Updated,
    /// No record with that key.
    NotFound,
    /// Record exists but is not `pending-sync`; carries its current status.
    NotPending(SyncStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResult {
    pub key: String,
    pub outcome: ItemOutcome,
}

/// Per-item results of a best-effort batch. Items are evaluated
/// independently; skipped items never abort the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub items: Vec<ItemResult>,
}

impl BatchResult {
    pub fn push(&mut self, key: impl Into<String>, outcome: ItemOutcome) {
        self.items.push(ItemResult {
            key: key.into(),
            outcome,
        });
    }

    /// Number of items that actually changed.
    pub fn updated(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == ItemOutcome::Updated)
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItemResult> {
        self.items
            .iter()
            .filter(|i| i.outcome != ItemOutcome::Updated)
    }

    pub fn outcome_of(&self, key: &str) -> Option<ItemOutcome> {
        self.items.iter().find(|i| i.key == key).map(|i| i.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_only_updates() {
        let mut batch = BatchResult::default();
        batch.push("a", ItemOutcome::Updated);
        batch.push("b", ItemOutcome::NotFound);
        batch.push("c", ItemOutcome::NotPending(SyncStatus::Synced));
        batch.push("d", ItemOutcome::Updated);

        assert_eq!(batch.updated(), 2);
        assert_eq!(batch.skipped().count(), 2);
        assert_eq!(batch.outcome_of("b"), Some(ItemOutcome::NotFound));
        assert_eq!(batch.outcome_of("zzz"), None);
    }
}
