//! Backup snapshots and dashboard statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use formcraft_types::backup::{
    BACKUP_VERSION, Backup, BackupCounts, BackupReceipt, FormStats, Stats, StorageStats,
    SubmissionStats,
};
use formcraft_types::error::StorageError;
use formcraft_types::form::SavedForm;
use formcraft_types::storage::{BACKUPS_PREFIX, FORMS_PREFIX, SUBMISSIONS_PREFIX};
use formcraft_types::submission::{FieldValue, Submission};

use super::{load_all, put_json};
use crate::storage::blob_store::BlobStore;

const RECENT_FORMS_DAYS: i64 = 7;
const RECENT_SUBMISSIONS_HOURS: i64 = 24;

pub struct BackupService<S: BlobStore> {
    store: Arc<S>,
}

impl<S: BlobStore> BackupService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Snapshot every form and submission into `backups/backup-{ms}.json`.
    #[tracing::instrument(skip_all)]
    pub async fn create_backup(&self) -> Result<BackupReceipt, StorageError> {
        let (forms, submissions) = self.load().await?;
        let timestamp = Utc::now();
        let counts = BackupCounts {
            total_forms: forms.len(),
            total_submissions: submissions.len(),
            test_submissions: submissions.iter().filter(|s| s.is_test).count(),
        };

        let backup = Backup {
            timestamp,
            version: BACKUP_VERSION.to_string(),
            forms,
            submissions,
            stats: counts,
        };
        let path = format!("{BACKUPS_PREFIX}backup-{}.json", timestamp.timestamp_millis());
        let entry = put_json(self.store.as_ref(), &path, &backup).await?;

        tracing::info!(
            path = %entry.path,
            forms = counts.total_forms,
            submissions = counts.total_submissions,
            "backup written"
        );
        Ok(BackupReceipt {
            backup_url: entry.url,
            path: entry.path,
            timestamp,
            counts,
        })
    }

    /// Dashboard statistics. An unreachable store yields zero counts with
    /// `blob_connected = false` rather than an error.
    pub async fn stats(&self) -> Stats {
        match self.load().await {
            Ok((forms, submissions)) => compute_stats(&forms, &submissions, Utc::now(), true),
            Err(e) => {
                tracing::warn!(error = %e, "store unreachable while computing stats");
                compute_stats(&[], &[], Utc::now(), false)
            }
        }
    }

    async fn load(&self) -> Result<(Vec<SavedForm>, Vec<Submission>), StorageError> {
        let forms = load_all(self.store.as_ref(), FORMS_PREFIX).await?;
        let submissions = load_all(self.store.as_ref(), SUBMISSIONS_PREFIX).await?;
        Ok((forms, submissions))
    }
}

pub fn compute_stats(
    forms: &[SavedForm],
    submissions: &[Submission],
    now: DateTime<Utc>,
    blob_connected: bool,
) -> Stats {
    let mut by_type = BTreeMap::new();
    for form in forms {
        *by_type.entry(form.schema.form_type().to_string()).or_insert(0) += 1;
    }
    let forms_since = now - Duration::days(RECENT_FORMS_DAYS);
    let submissions_since = now - Duration::hours(RECENT_SUBMISSIONS_HOURS);

    let tests = submissions.iter().filter(|s| s.is_test).count();
    let with_files = submissions
        .iter()
        .filter(|s| {
            !s.files.is_empty() || s.fields.values().any(|v| matches!(v, FieldValue::File(_)))
        })
        .count();

    Stats {
        forms: FormStats {
            total: forms.len(),
            by_type,
            recent: forms.iter().filter(|f| f.created_at > forms_since).count(),
        },
        submissions: SubmissionStats {
            total: submissions.len(),
            tests,
            real: submissions.len() - tests,
            with_files,
            recent: submissions
                .iter()
                .filter(|s| s.timestamp > submissions_since)
                .count(),
        },
        storage: StorageStats {
            checked_at: now,
            blob_connected,
        },
    }
}
