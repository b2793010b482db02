//! Backup and statistics handlers.

use axum::extract::State;

use formcraft_types::backup::{BackupReceipt, Stats};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

/// GET /api/v1/backup - Snapshot every form and submission to one blob.
pub async fn create_backup(
    State(state): State<AppState>,
) -> Result<ApiResponse<BackupReceipt>, AppError> {
    let ctx = RequestContext::start();

    let receipt = state.backup_service.create_backup().await?;
    let url = receipt.backup_url.clone();

    Ok(ctx.success(receipt).with_link("download", &url))
}

/// GET /api/v1/stats - Aggregate dashboard statistics.
///
/// Storage failures are reported in the payload (`storage.blobConnected`)
/// rather than as an error.
pub async fn get_stats(State(state): State<AppState>) -> ApiResponse<Stats> {
    let ctx = RequestContext::start();

    let stats = state.backup_service.stats().await;

    ctx.success(stats).with_link("self", "/api/v1/stats")
}
