//! Backup snapshot and dashboard statistics types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::SavedForm;
use crate::submission::Submission;

/// Version tag written into every backup.
pub const BACKUP_VERSION: &str = "1.0";

/// Full snapshot of forms and submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub forms: Vec<SavedForm>,
    pub submissions: Vec<Submission>,
    pub stats: BackupCounts,
}

/// Where a freshly written backup can be fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupReceipt {
    pub backup_url: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
    pub counts: BackupCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCounts {
    pub total_forms: usize,
    pub total_submissions: usize,
    pub test_submissions: usize,
}

/// Dashboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub forms: FormStats,
    pub submissions: SubmissionStats,
    pub storage: StorageStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    /// Forms created in the last 7 days.
    pub recent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total: usize,
    pub tests: usize,
    pub real: usize,
    pub with_files: usize,
    /// Submissions received in the last 24 hours.
    pub recent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub checked_at: DateTime<Utc>,
    pub blob_connected: bool,
}
