//! # Core Data Types
//!
//! Two record kinds live side by side:
//!
//! - [`Report`]: a research unit moving through a workflow ([`ReportStatus`]).
//! - [`UploadedFile`]: a stored blob moving through the hand-off between the
//!   producing side and the processing agent ([`SyncStatus`]).
//!
//! The two are linked only by name: a report's `attachments` hold stored
//! filenames, and nothing checks that a matching [`UploadedFile`] exists.
//! Deleting one side never touches the other.
//!
//! Field names serialize in camelCase and enum values in kebab-case, which is
//! the layout of the persisted `reports.json` / `uploads.json` documents.

use crate::error::{Result, SovqError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    Sovereign,
    QuasiSovereign,
}

impl ReportType {
    /// Fixed rendering order.
    pub const ALL: [ReportType; 2] = [ReportType::Sovereign, ReportType::QuasiSovereign];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Sovereign => "sovereign",
            ReportType::QuasiSovereign => "quasi-sovereign",
        }
    }
}

/// Workflow status of a report.
///
/// The intended lifecycle is:
///
/// ```text
/// needs-research ──> raw-uploaded ──> in-progress ──> completed
///                                        ▲   │            │
///                                        │   ▼            │
///                                     needs-update <──────┘
/// ```
///
/// The lifecycle is documentation, not a rule: updates may set any status
/// from any other. [`ReportStatus::follows_lifecycle`] lets callers notice
/// when a change leaves the intended path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    NeedsResearch,
    RawUploaded,
    InProgress,
    Completed,
    NeedsUpdate,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::NeedsResearch,
        ReportStatus::RawUploaded,
        ReportStatus::InProgress,
        ReportStatus::Completed,
        ReportStatus::NeedsUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::NeedsResearch => "needs-research",
            ReportStatus::RawUploaded => "raw-uploaded",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Completed => "completed",
            ReportStatus::NeedsUpdate => "needs-update",
        }
    }

    /// Statuses reachable in one step along the intended lifecycle.
    pub fn intended_next(&self) -> &'static [ReportStatus] {
        match self {
            ReportStatus::NeedsResearch => &[ReportStatus::RawUploaded],
            ReportStatus::RawUploaded => &[ReportStatus::InProgress],
            ReportStatus::InProgress => &[ReportStatus::Completed, ReportStatus::NeedsUpdate],
            ReportStatus::Completed => &[ReportStatus::NeedsUpdate],
            ReportStatus::NeedsUpdate => &[ReportStatus::InProgress],
        }
    }

    /// True when moving from `self` to `to` stays on the intended lifecycle.
    /// Staying in place counts as on-path.
    pub fn follows_lifecycle(&self, to: ReportStatus) -> bool {
        *self == to || self.intended_next().contains(&to)
    }
}

/// Hand-off stage of an uploaded blob: `pending-sync → synced → processing → processed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    PendingSync,
    Synced,
    Processing,
    Processed,
}

impl SyncStatus {
    pub const ALL: [SyncStatus; 4] = [
        SyncStatus::PendingSync,
        SyncStatus::Synced,
        SyncStatus::Processing,
        SyncStatus::Processed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::PendingSync => "pending-sync",
            SyncStatus::Synced => "synced",
            SyncStatus::Processing => "processing",
            SyncStatus::Processed => "processed",
        }
    }

    pub fn next(&self) -> Option<SyncStatus> {
        match self {
            SyncStatus::PendingSync => Some(SyncStatus::Synced),
            SyncStatus::Synced => Some(SyncStatus::Processing),
            SyncStatus::Processing => Some(SyncStatus::Processed),
            SyncStatus::Processed => None,
        }
    }

    pub fn follows_progression(&self, to: SyncStatus) -> bool {
        *self == to || self.next() == Some(to)
    }
}

macro_rules! enum_text {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = SovqError;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == trimmed)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = <$ty>::ALL.iter().map(|v| v.as_str()).collect();
                        SovqError::Validation(format!(
                            "invalid {} '{}' (expected one of: {})",
                            $what,
                            s,
                            allowed.join(", ")
                        ))
                    })
            }
        }
    };
}

enum_text!(ReportType, "report type");
enum_text!(ReportStatus, "report status");
enum_text!(SyncStatus, "sync status");

/// Returns a timestamp strictly later than `prev`.
///
/// Wall-clock reads can repeat (coarse clocks) or go backwards (NTP), so when
/// `now` does not advance past `prev` we step one microsecond past it.
pub fn stamp_after(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}

pub fn generate_report_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("report_{}_{}", Utc::now().timestamp_millis(), &token[..9])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(name: String, report_type: ReportType, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_report_id(),
            name,
            report_type,
            status: ReportStatus::RawUploaded,
            description,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; always moves it forward.
    pub fn touch(&mut self) {
        self.updated_at = stamp_after(self.updated_at);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub synced_at: Option<DateTime<Utc>>,
}

impl UploadedFile {
    pub fn new(filename: String, original_name: String, size: u64) -> Self {
        Self {
            filename,
            original_name,
            size,
            uploaded_at: Utc::now(),
            sync_status: SyncStatus::PendingSync,
            synced_at: None,
        }
    }

    /// Sets the sync status, stamping `synced_at` only when entering `synced`.
    pub fn set_sync_status(&mut self, status: SyncStatus) {
        self.sync_status = status;
        if status == SyncStatus::Synced {
            self.synced_at = Some(Utc::now());
        }
    }
}
